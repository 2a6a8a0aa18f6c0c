//! The `LedgerClient` trait — the seam between the coordinators and the
//! actual chain transport.
//!
//! Constructed explicitly and passed in as a dependency so tests can
//! substitute a fake ledger; never a process-wide singleton.

use crate::LedgerError;
use async_trait::async_trait;
use scrutin_types::LedgerId;

/// The four ledger operations the election service needs.
///
/// Mutating methods submit a transaction and await on-chain confirmation in
/// a single call — no speculative return, no retries. `read_tally` uses a
/// non-mutating connection and needs no signing credential.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Register an election with a fixed candidate count.
    async fn register_election(
        &self,
        election: &LedgerId,
        candidate_count: u32,
    ) -> Result<(), LedgerError>;

    /// Toggle whether the election accepts votes.
    async fn set_active(&self, election: &LedgerId, active: bool) -> Result<(), LedgerError>;

    /// Cast a vote for the candidate at `candidate_position` (1-based).
    /// The contract rejects duplicate voters and inactive elections.
    async fn submit_vote(
        &self,
        election: &LedgerId,
        candidate_position: u32,
        voter: &LedgerId,
    ) -> Result<(), LedgerError>;

    /// Read the authoritative vote count for one candidate position.
    async fn read_tally(
        &self,
        election: &LedgerId,
        candidate_position: u32,
    ) -> Result<u64, LedgerError>;
}
