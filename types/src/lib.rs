//! Fundamental types shared across the Scrutin election service.

pub mod id;
pub mod ledger_id;
pub mod status;
pub mod time;

pub use id::{ElectionId, UserId};
pub use ledger_id::LedgerId;
pub use status::{ElectionStatus, Role};
pub use time::Timestamp;
