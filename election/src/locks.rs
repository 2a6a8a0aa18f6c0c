//! Per-election mutual exclusion.
//!
//! Ledger confirmation takes seconds, and concurrent requests can touch the
//! same election while one is in flight (two students voting at once, a vote
//! landing while the admin stops the election). Each election gets its own
//! async mutex, held across the entire check → ledger-call → commit
//! sequence, so interleaved sequences on the same election cannot both pass
//! the same precondition. Elections are independent, so cross-election
//! operations never contend.

use scrutin_types::ElectionId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Registry of per-election async mutexes.
#[derive(Default)]
pub struct ElectionLocks {
    // std Mutex guards only the map lookup; the per-election tokio Mutex is
    // the one held across await points.
    inner: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl ElectionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mutex for one election, created on first use.
    pub fn for_election(&self, id: &ElectionId) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = self.inner.lock().unwrap();
        map.entry(id.as_str().to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Drop the entry for an election, keeping the map from growing without
    /// bound. Only call after the election's Completed status has been
    /// persisted: a holder of the old mutex and a caller that recreates the
    /// entry can then overlap, which is harmless once the state is terminal
    /// and every operation re-checks it under its own lock.
    pub fn discard(&self, id: &ElectionId) {
        self.inner.lock().unwrap().remove(id.as_str());
    }
}
