//! Fixed-width ledger identifiers and the codec that produces them.
//!
//! The vote ledger addresses records by 32-byte identifiers. Record-store ids
//! are variable-length strings, so they are mapped deterministically into the
//! fixed width: short ids are zero-padded with their byte length recorded in
//! the final byte, long ids fall back to a Blake2b-256 digest of the full
//! byte sequence. The mapping is one-way by design — a `LedgerId` is never
//! decoded back to its source string, only re-derived from it.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;

type Blake2b256 = Blake2b<U32>;

/// Source bytes longer than this are hashed instead of padded. The final
/// byte of the 32-byte slot is reserved for the source byte length, so
/// inputs that are zero-extensions of one another cannot collide.
const PAD_CAPACITY: usize = 31;

/// A 32-byte identifier in the format the vote ledger requires.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerId([u8; 32]);

impl LedgerId {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Encode a record-store identifier into the fixed-width ledger format.
    ///
    /// Deterministic and total: equal inputs always produce equal outputs,
    /// on both the padded and the hashed branch. Two distinct inputs that
    /// both fit the padded branch can never collide: unequal lengths differ
    /// in the length byte, equal lengths differ in the data bytes.
    pub fn encode(source: &str) -> Self {
        let bytes = source.as_bytes();
        if bytes.len() <= PAD_CAPACITY {
            let mut out = [0u8; 32];
            out[..bytes.len()].copy_from_slice(bytes);
            out[31] = bytes.len() as u8;
            Self(out)
        } else {
            let mut hasher = Blake2b256::new();
            hasher.update(bytes);
            let digest = hasher.finalize();
            let mut out = [0u8; 32];
            out.copy_from_slice(&digest);
            Self(out)
        }
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex form used when addressing the ledger over the gateway API.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Debug for LedgerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LedgerId({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for LedgerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

// Inline hex encoding to avoid adding the `hex` crate as a dependency of types.
mod hex {
    pub fn encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_id_is_zero_padded_with_length_byte() {
        let id = LedgerId::encode("abc");
        let mut expected = [0u8; 32];
        expected[..3].copy_from_slice(b"abc");
        expected[31] = 3;
        assert_eq!(id.as_bytes(), &expected);
    }

    #[test]
    fn thirty_one_bytes_still_padded() {
        let source = "a".repeat(31);
        let id = LedgerId::encode(&source);
        assert_eq!(&id.as_bytes()[..31], source.as_bytes());
        assert_eq!(id.as_bytes()[31], 31);
    }

    #[test]
    fn thirty_two_bytes_takes_hash_branch() {
        let source = "a".repeat(32);
        let id = LedgerId::encode(&source);
        // The hashed form must not be the padded prefix of the input.
        assert_ne!(&id.as_bytes()[..31], &source.as_bytes()[..31]);
    }

    #[test]
    fn hashed_branch_is_deterministic() {
        let source = "x".repeat(100);
        assert_eq!(LedgerId::encode(&source), LedgerId::encode(&source));
    }

    #[test]
    fn distinct_short_ids_never_collide() {
        assert_ne!(LedgerId::encode("ab"), LedgerId::encode("abc"));
        assert_ne!(LedgerId::encode("ab"), LedgerId::encode("ba"));
        // Zero-extensions of the same source differ in the length byte.
        assert_ne!(LedgerId::encode(""), LedgerId::encode("\0"));
        assert_ne!(LedgerId::encode("abc"), LedgerId::encode("abc\0"));
        assert_ne!(LedgerId::encode("abc\0"), LedgerId::encode("abc\0\0"));
    }

    #[test]
    fn multibyte_utf8_counts_bytes_not_chars() {
        // 16 three-byte chars = 48 bytes, over capacity despite 16 chars.
        let source = "\u{20AC}".repeat(16);
        let id = LedgerId::encode(&source);
        assert_ne!(&id.as_bytes()[..31], &source.as_bytes()[..31]);
    }

    #[test]
    fn hex_roundtrip_formatting() {
        let id = LedgerId::encode("abc");
        assert_eq!(id.to_hex().len(), 64);
        assert!(id.to_hex().starts_with("616263"));
    }
}
