use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),

    /// Conditional write failed because the key was already present — used
    /// by `commit_vote` to reject a second vote from the same voter.
    #[error("duplicate record: {0}")]
    Duplicate(String),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
