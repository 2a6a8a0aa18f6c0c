//! Election core — the dual-write protocol between the mutable record store
//! and the append-only vote ledger.
//!
//! Every lifecycle transition and every vote follows the same discipline:
//! validate against the record store, perform the ledger transaction(s) and
//! wait for confirmation, and only then commit the off-chain state. A ledger
//! failure leaves the record store untouched, so the operation can be
//! retried from scratch without double-submitting anything.

pub mod coordinator;
pub mod error;
pub mod locks;
pub mod results;
pub mod votes;

pub use coordinator::ElectionCoordinator;
pub use error::ElectionError;
pub use locks::ElectionLocks;
pub use results::{CandidateTally, VerifiedResults, WinnerSummary};
pub use votes::VoteReceipt;

/// Length of the voting window opened at activation.
pub const VOTING_WINDOW_SECS: u64 = 15 * 60;

/// Bounds on the candidate list for an election to be activatable.
pub const MIN_CANDIDATES: usize = 2;
pub const MAX_CANDIDATES: usize = 3;
