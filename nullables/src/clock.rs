//! Nullable clock — deterministic time for testing.

use scrutin_types::Timestamp;
use std::sync::atomic::{AtomicU64, Ordering};

/// A deterministic clock for testing. Time only advances when told to.
///
/// Atomics rather than a `Cell` so a single clock can be shared across the
/// tasks a tokio multi-thread test spawns.
pub struct NullClock {
    current: AtomicU64,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current: AtomicU64::new(initial_secs),
        }
    }

    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.current.load(Ordering::Relaxed))
    }

    /// Advance time by a number of seconds.
    pub fn advance(&self, secs: u64) {
        self.current.fetch_add(secs, Ordering::Relaxed);
    }

    /// Jump past a 15-minute voting window.
    pub fn advance_past_voting_window(&self) {
        self.advance(15 * 60 + 1);
    }

    pub fn set(&self, secs: u64) {
        self.current.store(secs, Ordering::Relaxed);
    }
}
