//! Nullable infrastructure — deterministic in-memory stand-ins for the
//! ledger, the record store, and the clock, used throughout the test suites.

pub mod clock;
pub mod ledger;
pub mod store;

pub use clock::NullClock;
pub use ledger::NullLedger;
pub use store::NullStore;
