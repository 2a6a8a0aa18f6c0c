use proptest::prelude::*;

use scrutin_types::{LedgerId, Timestamp};

proptest! {
    /// Codec determinism: encode(x) == encode(x) for all x, both branches.
    #[test]
    fn encode_is_deterministic(s in ".{0,64}") {
        prop_assert_eq!(LedgerId::encode(&s), LedgerId::encode(&s));
    }

    /// Short-form injectivity: distinct inputs under the padding branch
    /// never produce the same ledger identifier. The input class covers
    /// the full ASCII range including NUL, so zero-extension pairs like
    /// "x" vs "x\0" are exercised.
    #[test]
    fn padded_branch_is_injective(a in "[\\x00-\\x7f]{0,31}", b in "[\\x00-\\x7f]{0,31}") {
        // Both inputs are ASCII, so byte length == char count <= 31.
        if a != b {
            prop_assert_ne!(LedgerId::encode(&a), LedgerId::encode(&b));
        }
    }

    /// Padded ids carry the source bytes verbatim, then zeros, then the
    /// source byte length in the final byte.
    #[test]
    fn padded_branch_preserves_prefix(s in "[a-zA-Z0-9]{0,31}") {
        let id = LedgerId::encode(&s);
        prop_assert_eq!(&id.as_bytes()[..s.len()], s.as_bytes());
        prop_assert!(id.as_bytes()[s.len()..31].iter().all(|&b| b == 0));
        prop_assert_eq!(id.as_bytes()[31] as usize, s.len());
    }

    /// LedgerId bincode serialization roundtrip.
    #[test]
    fn ledger_id_bincode_roundtrip(s in ".{0,64}") {
        let id = LedgerId::encode(&s);
        let encoded = bincode::serialize(&id).unwrap();
        let decoded: LedgerId = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, id);
    }

    /// Timestamp ordering matches the underlying seconds.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }

    /// elapsed_since is the saturating difference.
    #[test]
    fn timestamp_elapsed_since(base in 0u64..1_000_000, offset in 0u64..1_000_000) {
        let t = Timestamp::new(base);
        let now = Timestamp::new(base + offset);
        prop_assert_eq!(t.elapsed_since(now), offset);
    }

    /// is_past is strict: a timestamp is never in the past relative to itself.
    #[test]
    fn timestamp_is_past_strict(secs in 0u64..1_000_000, ahead in 1u64..1_000_000) {
        let t = Timestamp::new(secs);
        prop_assert!(!t.is_past(t));
        prop_assert!(t.is_past(Timestamp::new(secs + ahead)));
    }
}
