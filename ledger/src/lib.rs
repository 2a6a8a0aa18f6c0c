//! Client for the external vote ledger.
//!
//! The ledger is a smart contract reached through a gateway HTTP API. It is
//! treated as a black box with four operations: register an election, toggle
//! its active flag, cast a vote, and read a tally. Mutating operations
//! submit a transaction and suspend the caller until it is confirmed; the
//! client never retries — retry policy belongs to the caller.

pub mod client;
pub mod error;
pub mod gateway;

pub use client::LedgerClient;
pub use error::LedgerError;
pub use gateway::{GatewayClient, GatewayConfig};
