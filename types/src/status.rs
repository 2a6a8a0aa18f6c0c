//! Election lifecycle status and user roles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an election.
///
/// Transitions are monotonic: Pending → Active → Completed, never reversed.
/// Completed is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElectionStatus {
    /// Created off-chain; candidates may still be added. Nothing on the
    /// ledger references this election yet.
    Pending,
    /// Registered and activated on the ledger; votes are being accepted.
    Active,
    /// Voting closed. The ledger tally is final and reconcilable.
    Completed,
}

impl ElectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElectionStatus::Pending => "Pending",
            ElectionStatus::Active => "Active",
            ElectionStatus::Completed => "Completed",
        }
    }

    /// Whether candidate registration is still allowed.
    pub fn accepts_candidates(&self) -> bool {
        matches!(self, ElectionStatus::Pending)
    }

    /// Whether votes are accepted in this state.
    pub fn accepts_votes(&self) -> bool {
        matches!(self, ElectionStatus::Active)
    }
}

impl fmt::Display for ElectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role of a user account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Student,
    SectionAdmin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::SectionAdmin => "SectionAdmin",
            Role::SuperAdmin => "SuperAdmin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::SectionAdmin | Role::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
