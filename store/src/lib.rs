//! Abstract storage traits for the Scrutin record store.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the codebase depends only on the traits.
//!
//! The record store owns the mutable off-chain projection of each election:
//! lifecycle status, candidate list, cached vote counts, the voted set, and
//! timestamps. It never owns the authoritative tally — once an election has
//! been activated that lives on the vote ledger.

pub mod election;
pub mod error;
pub mod user;

pub use election::{CandidateRecord, ElectionRecord, ElectionStore};
pub use error::StoreError;
pub use user::{UserRecord, UserStore};
