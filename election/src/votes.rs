//! Vote submission — the per-voter dual-write protocol.
//!
//! Preconditions run in order and short-circuit: the election exists, is
//! Active, the voter has not voted, and the chosen candidate resolves to a
//! frozen ledger position. Only then is the vote submitted on-chain, and
//! only after confirmation is the off-chain cache committed (atomic
//! mark-voted + increment). The whole sequence runs under the election's
//! lock, so two concurrent votes from the same voter cannot both pass the
//! duplicate check, and no increment is ever lost.

use crate::coordinator::ElectionCoordinator;
use crate::error::ElectionError;
use scrutin_types::{ElectionId, LedgerId, Timestamp, UserId};
use serde::Serialize;
use tracing::info;

/// Confirmation returned to the voter after a successful cast.
#[derive(Clone, Debug, Serialize)]
pub struct VoteReceipt {
    pub election: ElectionId,
    pub candidate: UserId,
    /// The candidate's frozen 1-based ledger position the vote was recorded
    /// against.
    pub position: u32,
}

impl ElectionCoordinator {
    /// Cast a vote for `candidate` (a candidate's user id) in an election.
    ///
    /// On ledger failure nothing off-chain is mutated: the voted set is
    /// untouched, so a retry is not falsely rejected as a duplicate.
    pub async fn cast_vote(
        &self,
        election_id: &ElectionId,
        voter: &UserId,
        candidate: &UserId,
        now: Timestamp,
    ) -> Result<VoteReceipt, ElectionError> {
        let lock = self.locks.for_election(election_id);
        let _guard = lock.lock().await;

        let mut record = self.store.get_election(election_id)?;
        self.lazily_complete(&mut record, now)?;

        if !record.status.accepts_votes() {
            return Err(ElectionError::InvalidState(format!(
                "election is {}, votes are only accepted while Active",
                record.status
            )));
        }
        if record.has_voted(voter) {
            return Err(ElectionError::DuplicateAction(format!(
                "voter {voter} has already voted in this election"
            )));
        }
        let position = record
            .candidate(candidate)
            .ok_or_else(|| {
                ElectionError::Validation(format!(
                    "user {candidate} is not a candidate in this election"
                ))
            })?
            .position
            .ok_or_else(|| {
                // Unreachable for an Active election; positions freeze at
                // activation.
                ElectionError::InvalidState("candidate has no frozen position".into())
            })?;

        let ledger_election = LedgerId::encode(election_id.as_str());
        let ledger_voter = LedgerId::encode(voter.as_str());
        info!(election = %election_id, voter = %voter, position, "submitting vote to ledger");
        self.ledger
            .submit_vote(&ledger_election, position, &ledger_voter)
            .await?;

        // Confirmed on-chain; commit the off-chain cache.
        self.store.commit_vote(election_id, voter, position)?;
        info!(election = %election_id, voter = %voter, "vote recorded");

        Ok(VoteReceipt {
            election: election_id.clone(),
            candidate: candidate.clone(),
            position,
        })
    }
}
