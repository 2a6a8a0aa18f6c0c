//! Lifecycle coordination: Pending → Active → Completed.
//!
//! The activation path performs two ledger transactions (register, then
//! activate) and only commits the off-chain transition after both confirm.
//! Completion happens either explicitly (admin stop, which also deactivates
//! the election on the ledger) or lazily when a read observes the voting
//! deadline has passed — the deadline is an off-chain concept, so the lazy
//! path deliberately does not touch the ledger.

use crate::error::ElectionError;
use crate::locks::ElectionLocks;
use crate::{MAX_CANDIDATES, MIN_CANDIDATES, VOTING_WINDOW_SECS};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use scrutin_ledger::{LedgerClient, LedgerError};
use scrutin_store::{CandidateRecord, ElectionRecord, ElectionStore, UserStore};
use scrutin_types::{ElectionId, ElectionStatus, LedgerId, Timestamp, UserId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

type Blake2b256 = Blake2b<U32>;

/// Orchestrates every operation that touches both the record store and the
/// vote ledger. All dependencies are injected; tests substitute fakes.
pub struct ElectionCoordinator {
    pub(crate) store: Arc<dyn ElectionStore + Send + Sync>,
    pub(crate) users: Arc<dyn UserStore + Send + Sync>,
    pub(crate) ledger: Arc<dyn LedgerClient>,
    pub(crate) locks: ElectionLocks,
    id_nonce: AtomicU64,
}

impl ElectionCoordinator {
    pub fn new(
        store: Arc<dyn ElectionStore + Send + Sync>,
        users: Arc<dyn UserStore + Send + Sync>,
        ledger: Arc<dyn LedgerClient>,
    ) -> Self {
        Self {
            store,
            users,
            ledger,
            locks: ElectionLocks::new(),
            id_nonce: AtomicU64::new(0),
        }
    }

    /// Create a new Pending election. Touches only the record store.
    pub fn create_election(
        &self,
        title: &str,
        department: &str,
        section: &str,
        now: Timestamp,
    ) -> Result<ElectionRecord, ElectionError> {
        for (field, value) in [
            ("title", title),
            ("department", department),
            ("section", section),
        ] {
            if value.trim().is_empty() {
                return Err(ElectionError::Validation(format!("{field} must not be empty")));
            }
        }

        // The nonce restarts at zero with the process, so after a restart a
        // same-second creation with identical fields can land on an id that
        // is already stored. Re-derive (each call bumps the nonce) until the
        // id is unused rather than overwrite.
        let mut id = self.derive_election_id(title, department, section, now);
        while self.store.exists(&id)? {
            id = self.derive_election_id(title, department, section, now);
        }
        let record = ElectionRecord::new(id.clone(), title, department, section, now);
        self.store.put_election(&record)?;
        info!(election = %id, %title, "election created");
        Ok(record)
    }

    /// Register a user as a candidate. Pending elections only — the
    /// candidate list is immutable once the election has been activated.
    pub async fn add_candidate(
        &self,
        election_id: &ElectionId,
        user_id: &UserId,
    ) -> Result<ElectionRecord, ElectionError> {
        let lock = self.locks.for_election(election_id);
        let _guard = lock.lock().await;

        let mut record = self.store.get_election(election_id)?;
        if !record.status.accepts_candidates() {
            return Err(ElectionError::InvalidState(format!(
                "candidates are frozen once an election leaves Pending (status is {})",
                record.status
            )));
        }
        if !self.users.exists(user_id)? {
            return Err(ElectionError::Validation(format!(
                "candidate user {user_id} does not exist"
            )));
        }
        if record.is_candidate(user_id) {
            return Err(ElectionError::DuplicateAction(format!(
                "user {user_id} is already a candidate"
            )));
        }

        record.candidates.push(CandidateRecord::new(user_id.clone()));
        self.store.put_election(&record)?;
        debug!(election = %election_id, candidate = %user_id, "candidate registered");
        Ok(record)
    }

    /// Pending → Active.
    ///
    /// Strictly ordered: freeze candidate positions, register the election
    /// on the ledger, activate it on the ledger, and only after both
    /// transactions confirm, commit the off-chain transition. If either
    /// ledger call fails the record store is left untouched — still Pending,
    /// referencing no on-chain state — and the caller may retry from the
    /// start.
    pub async fn activate(
        &self,
        election_id: &ElectionId,
        now: Timestamp,
    ) -> Result<ElectionRecord, ElectionError> {
        let lock = self.locks.for_election(election_id);
        let _guard = lock.lock().await;

        let stored = self.store.get_election(election_id)?;
        if stored.status != ElectionStatus::Pending {
            return Err(ElectionError::InvalidState(format!(
                "election is {}, only Pending elections can be activated",
                stored.status
            )));
        }
        let count = stored.candidates.len();
        if !(MIN_CANDIDATES..=MAX_CANDIDATES).contains(&count) {
            return Err(ElectionError::InvalidState(format!(
                "election must have {MIN_CANDIDATES} or {MAX_CANDIDATES} candidates, has {count}"
            )));
        }

        // Work on a copy: nothing is persisted until the ledger confirms.
        let mut record = stored;
        record.freeze_positions();

        let ledger_election = LedgerId::encode(election_id.as_str());
        info!(election = %election_id, candidates = count, "registering election on ledger");
        match self
            .ledger
            .register_election(&ledger_election, count as u32)
            .await
        {
            Ok(()) => {}
            // A previous attempt may have registered the election and then
            // failed before the activation transaction; the contract reports
            // the re-registration as a duplicate. Resume at activation.
            Err(LedgerError::Rejected(reason)) if reason.contains("already exists") => {
                info!(election = %election_id, "election already registered on ledger");
            }
            Err(err) => return Err(err.into()),
        }
        info!(election = %election_id, "activating election on ledger");
        self.ledger.set_active(&ledger_election, true).await?;

        record.status = ElectionStatus::Active;
        record.start_time = Some(now);
        record.end_time = Some(now.plus_secs(VOTING_WINDOW_SECS));
        self.store.put_election(&record)?;
        info!(election = %election_id, end = %record.end_time.unwrap(), "election active");
        Ok(record)
    }

    /// Active → Completed, explicit path: deactivate on the ledger first,
    /// then close the off-chain record with `end_time = now`.
    pub async fn deactivate(
        &self,
        election_id: &ElectionId,
        now: Timestamp,
    ) -> Result<ElectionRecord, ElectionError> {
        let lock = self.locks.for_election(election_id);
        let _guard = lock.lock().await;

        let mut record = self.store.get_election(election_id)?;
        if record.status != ElectionStatus::Active {
            return Err(ElectionError::InvalidState(format!(
                "election is {}, only Active elections can be stopped",
                record.status
            )));
        }

        let ledger_election = LedgerId::encode(election_id.as_str());
        info!(election = %election_id, "deactivating election on ledger");
        self.ledger.set_active(&ledger_election, false).await?;

        record.status = ElectionStatus::Completed;
        record.end_time = Some(now);
        self.store.put_election(&record)?;
        info!(election = %election_id, "election completed");
        self.locks.discard(election_id);
        Ok(record)
    }

    /// Read one election, applying lazy completion.
    pub async fn get_election(
        &self,
        election_id: &ElectionId,
        now: Timestamp,
    ) -> Result<ElectionRecord, ElectionError> {
        let lock = self.locks.for_election(election_id);
        let _guard = lock.lock().await;

        let mut record = self.store.get_election(election_id)?;
        self.lazily_complete(&mut record, now)?;
        Ok(record)
    }

    /// Active → Completed, lazy path: a read has observed `now` past the
    /// voting deadline. The deadline exists only off-chain, so no ledger
    /// transaction is made and `end_time` keeps its previously computed
    /// value. Callers must hold the election's lock.
    pub(crate) fn lazily_complete(
        &self,
        record: &mut ElectionRecord,
        now: Timestamp,
    ) -> Result<(), ElectionError> {
        if record.deadline_passed(now) {
            record.status = ElectionStatus::Completed;
            self.store.put_election(record)?;
            warn!(election = %record.id, "voting deadline passed, marked completed");
        }
        if record.status == ElectionStatus::Completed {
            // Terminal state: no further contention on this election.
            self.locks.discard(&record.id);
        }
        Ok(())
    }

    fn derive_election_id(
        &self,
        title: &str,
        department: &str,
        section: &str,
        now: Timestamp,
    ) -> ElectionId {
        let nonce = self.id_nonce.fetch_add(1, Ordering::Relaxed);
        let mut hasher = Blake2b256::new();
        hasher.update(title.as_bytes());
        hasher.update(department.as_bytes());
        hasher.update(section.as_bytes());
        hasher.update(now.as_secs().to_be_bytes());
        hasher.update(nonce.to_be_bytes());
        let digest = hasher.finalize();
        let id: String = digest[..12].iter().map(|b| format!("{:02x}", b)).collect();
        ElectionId::new(id)
    }
}
