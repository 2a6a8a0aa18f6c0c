//! Ledger client error type.

use thiserror::Error;

/// Any failure of a ledger operation. Network faults, contract-level
/// rejections, and confirmation timeouts all surface through this one type;
/// the caller decides whether to retry (the core never does).
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger connection failed: {0}")]
    Connection(String),

    /// The transaction was executed and reverted by the contract, e.g.
    /// "already voted" or "election not active".
    #[error("transaction rejected by ledger: {0}")]
    Rejected(String),

    #[error("transaction {tx_hash} not confirmed within {waited_secs}s")]
    ConfirmationTimeout { tx_hash: String, waited_secs: u64 },

    #[error("unexpected gateway response: {0}")]
    InvalidResponse(String),

    /// A mutating call was attempted on a client constructed without a
    /// signing credential.
    #[error("no signing credential configured for ledger writes")]
    SignerMissing,
}
