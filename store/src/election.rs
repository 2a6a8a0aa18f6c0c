//! Election record storage.

use crate::StoreError;
use scrutin_types::{ElectionId, ElectionStatus, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// A candidate entry inside an election document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// The user standing as this candidate.
    pub user: UserId,
    /// Cached vote count. Off-chain cache only — once the election is Active
    /// or Completed the ledger tally is the source of truth.
    pub votes: u64,
    /// Fixed 1-based position on the ledger, assigned when the candidate
    /// list is frozen at activation. Never renumbered afterwards.
    pub position: Option<u32>,
}

impl CandidateRecord {
    pub fn new(user: UserId) -> Self {
        Self {
            user,
            votes: 0,
            position: None,
        }
    }
}

/// The mutable off-chain projection of one election.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ElectionRecord {
    pub id: ElectionId,
    pub title: String,
    pub department: String,
    pub section: String,
    pub status: ElectionStatus,
    /// Registration order. Index order at freeze time determines each
    /// candidate's permanent ledger position.
    pub candidates: Vec<CandidateRecord>,
    /// Voters who have already cast a vote in this election.
    pub voted: Vec<UserId>,
    /// Set when the election transitions to Active.
    pub start_time: Option<Timestamp>,
    /// Voting deadline, set at activation. An off-chain concept: the ledger
    /// has no independent notion of time.
    pub end_time: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl ElectionRecord {
    pub fn new(
        id: ElectionId,
        title: impl Into<String>,
        department: impl Into<String>,
        section: impl Into<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            department: department.into(),
            section: section.into(),
            status: ElectionStatus::Pending,
            candidates: Vec::new(),
            voted: Vec::new(),
            start_time: None,
            end_time: None,
            created_at,
        }
    }

    pub fn has_voted(&self, voter: &UserId) -> bool {
        self.voted.contains(voter)
    }

    pub fn is_candidate(&self, user: &UserId) -> bool {
        self.candidates.iter().any(|c| &c.user == user)
    }

    pub fn candidate(&self, user: &UserId) -> Option<&CandidateRecord> {
        self.candidates.iter().find(|c| &c.user == user)
    }

    /// Assign ledger positions 1..N in registration order. Called exactly
    /// once, at the Pending → Active transition.
    pub fn freeze_positions(&mut self) {
        for (index, candidate) in self.candidates.iter_mut().enumerate() {
            candidate.position = Some(index as u32 + 1);
        }
    }

    /// Whether the voting deadline has passed while the election is Active.
    pub fn deadline_passed(&self, now: Timestamp) -> bool {
        self.status == ElectionStatus::Active
            && self.end_time.is_some_and(|end| end.is_past(now))
    }

    /// The candidate with the most cached votes. Ties are broken by
    /// registration order: the first-registered candidate wins, which is a
    /// deliberate deterministic policy, not an accident of iteration.
    pub fn leading_candidate(&self) -> Option<&CandidateRecord> {
        let mut leader: Option<&CandidateRecord> = None;
        for candidate in &self.candidates {
            match leader {
                Some(current) if candidate.votes <= current.votes => {}
                _ => leader = Some(candidate),
            }
        }
        leader
    }
}

/// Trait for election document storage.
pub trait ElectionStore {
    fn get_election(&self, id: &ElectionId) -> Result<ElectionRecord, StoreError>;
    fn put_election(&self, record: &ElectionRecord) -> Result<(), StoreError>;
    fn exists(&self, id: &ElectionId) -> Result<bool, StoreError>;
    fn election_count(&self) -> Result<u64, StoreError>;

    /// The most recently completed election (latest end time), if any.
    fn latest_completed(&self) -> Result<Option<ElectionRecord>, StoreError>;

    /// Atomically mark `voter` as having voted and increment the cached
    /// count of the candidate at `position`.
    ///
    /// Must fail with [`StoreError::Duplicate`] — without mutating anything —
    /// if the voter is already in the voted set. Backends must make the
    /// check-and-commit a single atomic operation so two interleaved calls
    /// for the same voter cannot both succeed.
    fn commit_vote(
        &self,
        id: &ElectionId,
        voter: &UserId,
        position: u32,
    ) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ElectionRecord {
        let mut rec = ElectionRecord::new(
            ElectionId::new("e1"),
            "CR Election",
            "CSE",
            "A",
            Timestamp::new(1000),
        );
        rec.candidates.push(CandidateRecord::new(UserId::new("alice")));
        rec.candidates.push(CandidateRecord::new(UserId::new("bob")));
        rec
    }

    #[test]
    fn new_record_is_pending_and_empty() {
        let rec = ElectionRecord::new(
            ElectionId::new("e1"),
            "t",
            "d",
            "s",
            Timestamp::new(0),
        );
        assert_eq!(rec.status, ElectionStatus::Pending);
        assert!(rec.candidates.is_empty());
        assert!(rec.voted.is_empty());
        assert!(rec.start_time.is_none());
        assert!(rec.end_time.is_none());
    }

    #[test]
    fn freeze_assigns_positions_in_registration_order() {
        let mut rec = record();
        rec.freeze_positions();
        assert_eq!(rec.candidates[0].position, Some(1));
        assert_eq!(rec.candidates[1].position, Some(2));
    }

    #[test]
    fn deadline_only_passes_while_active() {
        let mut rec = record();
        rec.end_time = Some(Timestamp::new(2000));
        assert!(!rec.deadline_passed(Timestamp::new(3000))); // still Pending

        rec.status = ElectionStatus::Active;
        assert!(!rec.deadline_passed(Timestamp::new(2000))); // not strictly past
        assert!(rec.deadline_passed(Timestamp::new(2001)));

        rec.status = ElectionStatus::Completed;
        assert!(!rec.deadline_passed(Timestamp::new(3000)));
    }

    #[test]
    fn leading_candidate_breaks_ties_by_registration_order() {
        let mut rec = record();
        rec.candidates[0].votes = 3;
        rec.candidates[1].votes = 3;
        assert_eq!(rec.leading_candidate().unwrap().user, UserId::new("alice"));

        rec.candidates[1].votes = 4;
        assert_eq!(rec.leading_candidate().unwrap().user, UserId::new("bob"));
    }

    #[test]
    fn leading_candidate_none_without_candidates() {
        let rec = ElectionRecord::new(
            ElectionId::new("e1"),
            "t",
            "d",
            "s",
            Timestamp::new(0),
        );
        assert!(rec.leading_candidate().is_none());
    }
}
