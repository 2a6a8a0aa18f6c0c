//! Result reconciliation — cross-checking cached tallies against the ledger.
//!
//! Once an election is Completed, the reconciler reads both stores
//! independently: the off-chain cached count and the ledger's authoritative
//! tally per frozen candidate position. A candidate verifies only if the two
//! agree. The winner is computed from the cached counts with ties broken by
//! registration order.

use crate::coordinator::ElectionCoordinator;
use crate::error::ElectionError;
use scrutin_types::{ElectionId, ElectionStatus, LedgerId, Timestamp, UserId};
use serde::Serialize;
use tracing::warn;

/// Reconciliation result for one candidate.
#[derive(Clone, Debug, Serialize)]
pub struct CandidateTally {
    pub user: UserId,
    pub name: String,
    pub position: u32,
    pub cached_votes: u64,
    pub ledger_votes: u64,
    /// Whether the off-chain cache agrees with the ledger.
    pub verified: bool,
}

/// Verified results for a completed election.
#[derive(Clone, Debug, Serialize)]
pub struct VerifiedResults {
    pub election: ElectionId,
    pub title: String,
    pub candidates: Vec<CandidateTally>,
    /// The winning candidate's user id, by cached count with
    /// first-registered tie-breaking. None only for a candidate-less record,
    /// which cannot occur for an activated election.
    pub winner: Option<UserId>,
}

/// Public winner surface for the most recent completed election.
#[derive(Clone, Debug, Serialize)]
pub struct WinnerSummary {
    pub election_title: String,
    pub department: String,
    pub section: String,
    pub winner: UserId,
    pub winner_name: String,
}

impl ElectionCoordinator {
    /// Reconcile a completed election's cached tallies against the ledger.
    ///
    /// Rejected with `InvalidState` while the election is Pending or Active
    /// — tallies are only meaningful to reconcile once voting has closed.
    /// A read past the voting deadline completes the election first (lazy
    /// path), so results become available without an explicit stop.
    pub async fn verified_results(
        &self,
        election_id: &ElectionId,
        now: Timestamp,
    ) -> Result<VerifiedResults, ElectionError> {
        let record = {
            let lock = self.locks.for_election(election_id);
            let _guard = lock.lock().await;
            let mut record = self.store.get_election(election_id)?;
            self.lazily_complete(&mut record, now)?;
            record
        };

        if record.status != ElectionStatus::Completed {
            return Err(ElectionError::InvalidState(format!(
                "election is {}, results can only be verified once Completed",
                record.status
            )));
        }

        let ledger_election = LedgerId::encode(election_id.as_str());
        let mut candidates = Vec::with_capacity(record.candidates.len());
        for candidate in &record.candidates {
            let position = candidate.position.ok_or_else(|| {
                ElectionError::InvalidState("candidate has no frozen position".into())
            })?;
            let ledger_votes = self.ledger.read_tally(&ledger_election, position).await?;
            let verified = ledger_votes == candidate.votes;
            if !verified {
                warn!(
                    election = %election_id,
                    position,
                    cached = candidate.votes,
                    ledger = ledger_votes,
                    "cached tally disagrees with ledger"
                );
            }
            let name = self
                .users
                .get_user(&candidate.user)
                .map(|u| u.name)
                .unwrap_or_else(|_| candidate.user.to_string());
            candidates.push(CandidateTally {
                user: candidate.user.clone(),
                name,
                position,
                cached_votes: candidate.votes,
                ledger_votes,
                verified,
            });
        }

        let winner = record.leading_candidate().map(|c| c.user.clone());
        Ok(VerifiedResults {
            election: record.id,
            title: record.title,
            candidates,
            winner,
        })
    }

    /// The winner of the most recently completed election, for the public
    /// landing surface. Operates purely on the record store — no ledger
    /// call, no authentication context.
    pub fn latest_winner(&self) -> Result<Option<WinnerSummary>, ElectionError> {
        let Some(record) = self.store.latest_completed()? else {
            return Ok(None);
        };
        let Some(leader) = record.leading_candidate() else {
            return Ok(None);
        };
        let winner_name = self
            .users
            .get_user(&leader.user)
            .map(|u| u.name)
            .unwrap_or_else(|_| leader.user.to_string());
        Ok(Some(WinnerSummary {
            election_title: record.title.clone(),
            department: record.department.clone(),
            section: record.section.clone(),
            winner: leader.user.clone(),
            winner_name,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrutin_nullables::{NullClock, NullLedger, NullStore};
    use scrutin_store::{ElectionStore, UserRecord, UserStore};
    use scrutin_types::Role;
    use std::sync::Arc;

    struct Fixture {
        coordinator: ElectionCoordinator,
        store: Arc<NullStore>,
        ledger: Arc<NullLedger>,
        clock: NullClock,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(NullStore::new());
        let ledger = Arc::new(NullLedger::new());
        Fixture {
            coordinator: ElectionCoordinator::new(store.clone(), store.clone(), ledger.clone()),
            store,
            ledger,
            clock: NullClock::new(1_000_000),
        }
    }

    fn seed_user(store: &NullStore, id: &str, name: &str) {
        store
            .put_user(&UserRecord {
                id: UserId::new(id),
                college_id: format!("21CS{id}"),
                name: name.into(),
                role: Role::Student,
                department: "CSE".into(),
                section: "A".into(),
            })
            .unwrap();
    }

    /// Build an Active election, cast the given votes, and stop it.
    async fn completed_election(fx: &Fixture, votes: &[(&str, &str)]) -> ElectionId {
        let record = fx
            .coordinator
            .create_election("CR Election", "CSE", "A", fx.clock.now())
            .unwrap();
        for user in ["alice", "bob"] {
            seed_user(&fx.store, user, user);
            fx.coordinator
                .add_candidate(&record.id, &UserId::new(user))
                .await
                .unwrap();
        }
        fx.coordinator
            .activate(&record.id, fx.clock.now())
            .await
            .unwrap();
        for (voter, candidate) in votes {
            fx.coordinator
                .cast_vote(
                    &record.id,
                    &UserId::new(*voter),
                    &UserId::new(*candidate),
                    fx.clock.now(),
                )
                .await
                .unwrap();
        }
        fx.coordinator
            .deactivate(&record.id, fx.clock.now())
            .await
            .unwrap();
        record.id
    }

    #[tokio::test]
    async fn matching_tallies_verify_for_all_candidates() {
        let fx = fixture();
        let id = completed_election(
            &fx,
            &[("v1", "alice"), ("v2", "bob"), ("v3", "alice")],
        )
        .await;

        let results = fx
            .coordinator
            .verified_results(&id, fx.clock.now())
            .await
            .unwrap();
        assert_eq!(results.candidates.len(), 2);
        assert!(results.candidates.iter().all(|c| c.verified));
        assert_eq!(results.candidates[0].cached_votes, 2);
        assert_eq!(results.candidates[0].ledger_votes, 2);
        assert_eq!(results.winner, Some(UserId::new("alice")));
    }

    #[tokio::test]
    async fn single_mismatch_flags_only_that_candidate() {
        let fx = fixture();
        let id = completed_election(&fx, &[("v1", "alice"), ("v2", "bob")]).await;

        // The ledger reports a different count for bob (position 2) only.
        fx.ledger
            .override_tally(&LedgerId::encode(id.as_str()), 2, 7);

        let results = fx
            .coordinator
            .verified_results(&id, fx.clock.now())
            .await
            .unwrap();
        assert!(results.candidates[0].verified);
        assert!(!results.candidates[1].verified);
        assert_eq!(results.candidates[1].cached_votes, 1);
        assert_eq!(results.candidates[1].ledger_votes, 7);
    }

    #[tokio::test]
    async fn results_rejected_before_completion() {
        let fx = fixture();
        let record = fx
            .coordinator
            .create_election("CR Election", "CSE", "A", fx.clock.now())
            .unwrap();
        let err = fx
            .coordinator
            .verified_results(&record.id, fx.clock.now())
            .await
            .unwrap_err();
        assert!(matches!(err, ElectionError::InvalidState(_)));
    }

    #[tokio::test]
    async fn results_available_after_lazy_completion() {
        let fx = fixture();
        let record = fx
            .coordinator
            .create_election("CR Election", "CSE", "A", fx.clock.now())
            .unwrap();
        for user in ["alice", "bob"] {
            seed_user(&fx.store, user, user);
            fx.coordinator
                .add_candidate(&record.id, &UserId::new(user))
                .await
                .unwrap();
        }
        fx.coordinator
            .activate(&record.id, fx.clock.now())
            .await
            .unwrap();
        fx.coordinator
            .cast_vote(
                &record.id,
                &UserId::new("v1"),
                &UserId::new("bob"),
                fx.clock.now(),
            )
            .await
            .unwrap();

        // No explicit stop; the deadline passing is enough.
        fx.clock.advance_past_voting_window();
        let results = fx
            .coordinator
            .verified_results(&record.id, fx.clock.now())
            .await
            .unwrap();
        assert_eq!(results.winner, Some(UserId::new("bob")));
        assert!(results.candidates.iter().all(|c| c.verified));
    }

    #[tokio::test]
    async fn winner_tie_breaks_to_first_registered() {
        let fx = fixture();
        let id = completed_election(&fx, &[("v1", "alice"), ("v2", "bob")]).await;
        let results = fx
            .coordinator
            .verified_results(&id, fx.clock.now())
            .await
            .unwrap();
        // 1-1 tie: alice registered first.
        assert_eq!(results.winner, Some(UserId::new("alice")));
    }

    #[tokio::test]
    async fn latest_winner_reports_most_recent_completed() {
        let fx = fixture();
        let first = completed_election(&fx, &[("v1", "alice")]).await;
        fx.clock.advance(3600);
        let second = completed_election(
            &fx,
            &[("v4", "bob"), ("v5", "bob"), ("v6", "alice")],
        )
        .await;
        assert_ne!(first, second);

        let summary = fx.coordinator.latest_winner().unwrap().unwrap();
        assert_eq!(summary.winner, UserId::new("bob"));
        assert_eq!(summary.winner_name, "bob");
        assert_eq!(summary.department, "CSE");
    }

    #[tokio::test]
    async fn latest_winner_none_without_completed_elections() {
        let fx = fixture();
        fx.coordinator
            .create_election("CR Election", "CSE", "A", fx.clock.now())
            .unwrap();
        assert!(fx.coordinator.latest_winner().unwrap().is_none());
    }
}
