//! HTTP API surface.
//!
//! A thin axum layer over the election coordinator: handlers parse the
//! request, stamp the current time, delegate, and translate the result.
//! All protocol decisions live in `scrutin-election`; nothing here touches
//! the ledger or the record store directly.

pub mod error;
pub mod handlers;
pub mod server;

pub use error::RpcError;
pub use server::{AppState, RpcServer};
