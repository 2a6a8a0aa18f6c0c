//! Core error taxonomy.
//!
//! Every failure surfaces as a typed variant; nothing is swallowed and
//! nothing is retried here. `Ledger` failures specifically guarantee that
//! the record store was not touched for that attempt, so a caller-initiated
//! retry is always safe and fully re-validated.

use scrutin_ledger::LedgerError;
use scrutin_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ElectionError {
    /// Malformed input, rejected before any state is touched.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("election not found: {0}")]
    NotFound(String),

    /// The operation is not permitted in the election's current lifecycle
    /// state (activating a non-Pending election, voting outside Active,
    /// reconciling before Completed, ...).
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The action was already performed: voter already voted, candidate
    /// already registered. Safe to surface as "already done".
    #[error("already done: {0}")]
    DuplicateAction(String),

    #[error("ledger operation failed: {0}")]
    Ledger(#[from] LedgerError),

    #[error("record store error: {0}")]
    Storage(StoreError),
}

impl From<StoreError> for ElectionError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(key) => ElectionError::NotFound(key),
            // The store's conditional commit refusing a second vote is the
            // same duplicate the precondition check catches on the fast path.
            StoreError::Duplicate(key) => ElectionError::DuplicateAction(key),
            other => ElectionError::Storage(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_found_maps_variant_to_variant() {
        let err: ElectionError = StoreError::NotFound("e1".into()).into();
        assert!(matches!(err, ElectionError::NotFound(_)));
    }

    #[test]
    fn store_duplicate_maps_to_duplicate_action() {
        let err: ElectionError = StoreError::Duplicate("v1".into()).into();
        assert!(matches!(err, ElectionError::DuplicateAction(_)));
    }

    #[test]
    fn other_store_errors_wrap_as_storage() {
        let err: ElectionError = StoreError::Backend("down".into()).into();
        assert!(matches!(err, ElectionError::Storage(_)));
    }
}
