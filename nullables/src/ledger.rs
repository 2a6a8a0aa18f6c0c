//! Nullable ledger — an in-memory vote ledger with the real contract rules.
//!
//! Enforces what the deployed contract enforces: an election must be
//! registered before it can be toggled or voted on, votes are rejected while
//! inactive, and a (election, voter) pair may vote at most once. Tests can
//! additionally inject failures, override reported tallies, and count
//! invocations.

use async_trait::async_trait;
use scrutin_ledger::{LedgerClient, LedgerError};
use scrutin_types::LedgerId;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
struct Inner {
    /// Registered elections and their candidate counts.
    registered: HashMap<LedgerId, u32>,
    active: HashSet<LedgerId>,
    /// (election, voter) pairs that have voted.
    voters: HashSet<(LedgerId, LedgerId)>,
    /// Authoritative tallies keyed by (election, position).
    tallies: HashMap<(LedgerId, u32), u64>,
    /// Tally values reported instead of the real ones, for reconciliation
    /// mismatch tests.
    tally_overrides: HashMap<(LedgerId, u32), u64>,
    /// If set, the next mutating call fails with this connection error.
    fail_next: Option<String>,
    /// If set, the mutating call with this sequence number fails.
    fail_at_mutation: Option<(u64, String)>,
    total_calls: u64,
    mutating_calls: u64,
}

/// A thread-safe in-memory [`LedgerClient`] for testing.
#[derive(Default)]
pub struct NullLedger {
    inner: Mutex<Inner>,
}

impl NullLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next mutating call fail with a connection error.
    pub fn fail_next(&self, message: impl Into<String>) {
        self.inner.lock().unwrap().fail_next = Some(message.into());
    }

    /// Make the `n`-th mutating call from now (1-based) fail with a
    /// connection error; earlier and later calls succeed. Lets tests break
    /// the middle of a multi-transaction sequence.
    pub fn fail_nth_mutation(&self, n: u64, message: impl Into<String>) {
        let mut inner = self.inner.lock().unwrap();
        let target = inner.mutating_calls + n;
        inner.fail_at_mutation = Some((target, message.into()));
    }

    /// Report `votes` for (election, position) instead of the real tally.
    pub fn override_tally(&self, election: &LedgerId, position: u32, votes: u64) {
        self.inner
            .lock()
            .unwrap()
            .tally_overrides
            .insert((*election, position), votes);
    }

    /// Number of ledger invocations of any kind.
    pub fn call_count(&self) -> u64 {
        self.inner.lock().unwrap().total_calls
    }

    /// Number of mutating (transaction-submitting) invocations.
    pub fn mutation_count(&self) -> u64 {
        self.inner.lock().unwrap().mutating_calls
    }

    pub fn is_registered(&self, election: &LedgerId) -> bool {
        self.inner.lock().unwrap().registered.contains_key(election)
    }

    pub fn is_active(&self, election: &LedgerId) -> bool {
        self.inner.lock().unwrap().active.contains(election)
    }

    /// The real (non-overridden) tally.
    pub fn recorded_tally(&self, election: &LedgerId, position: u32) -> u64 {
        self.inner
            .lock()
            .unwrap()
            .tallies
            .get(&(*election, position))
            .copied()
            .unwrap_or(0)
    }

    fn begin_mutation(inner: &mut Inner) -> Result<(), LedgerError> {
        inner.total_calls += 1;
        inner.mutating_calls += 1;
        if let Some(message) = inner.fail_next.take() {
            return Err(LedgerError::Connection(message));
        }
        if let Some((target, message)) = inner.fail_at_mutation.take() {
            if target == inner.mutating_calls {
                return Err(LedgerError::Connection(message));
            }
            inner.fail_at_mutation = Some((target, message));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerClient for NullLedger {
    async fn register_election(
        &self,
        election: &LedgerId,
        candidate_count: u32,
    ) -> Result<(), LedgerError> {
        let mut inner = self.inner.lock().unwrap();
        Self::begin_mutation(&mut inner)?;
        if inner.registered.contains_key(election) {
            return Err(LedgerError::Rejected("election already exists".into()));
        }
        if candidate_count == 0 {
            return Err(LedgerError::Rejected("candidate count must be positive".into()));
        }
        inner.registered.insert(*election, candidate_count);
        Ok(())
    }

    async fn set_active(&self, election: &LedgerId, active: bool) -> Result<(), LedgerError> {
        let mut inner = self.inner.lock().unwrap();
        Self::begin_mutation(&mut inner)?;
        if !inner.registered.contains_key(election) {
            return Err(LedgerError::Rejected("unknown election".into()));
        }
        if active {
            inner.active.insert(*election);
        } else {
            inner.active.remove(election);
        }
        Ok(())
    }

    async fn submit_vote(
        &self,
        election: &LedgerId,
        candidate_position: u32,
        voter: &LedgerId,
    ) -> Result<(), LedgerError> {
        let mut inner = self.inner.lock().unwrap();
        Self::begin_mutation(&mut inner)?;
        let Some(&candidate_count) = inner.registered.get(election) else {
            return Err(LedgerError::Rejected("unknown election".into()));
        };
        if !inner.active.contains(election) {
            return Err(LedgerError::Rejected("election not active".into()));
        }
        if candidate_position == 0 || candidate_position > candidate_count {
            return Err(LedgerError::Rejected("candidate out of range".into()));
        }
        if !inner.voters.insert((*election, *voter)) {
            return Err(LedgerError::Rejected("voter has already voted".into()));
        }
        *inner.tallies.entry((*election, candidate_position)).or_insert(0) += 1;
        Ok(())
    }

    async fn read_tally(
        &self,
        election: &LedgerId,
        candidate_position: u32,
    ) -> Result<u64, LedgerError> {
        let mut inner = self.inner.lock().unwrap();
        inner.total_calls += 1;
        if !inner.registered.contains_key(election) {
            return Err(LedgerError::Rejected("unknown election".into()));
        }
        let key = (*election, candidate_position);
        if let Some(&votes) = inner.tally_overrides.get(&key) {
            return Ok(votes);
        }
        Ok(inner.tallies.get(&key).copied().unwrap_or(0))
    }
}
