use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Number of hex characters in an [`ItemUuid`].
pub const UUID_HEX_LEN: usize = 32;

/// Random identifier assigned to every item at creation.
///
/// Always exactly 32 lowercase hexadecimal characters (the "simple" form of
/// a 128-bit uuid). Construction goes through [`ItemUuid::parse`], so a
/// value of this type is valid by construction.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemUuid(String);

impl ItemUuid {
    /// Validate and wrap a 32-character lowercase hex string.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        if s.len() != UUID_HEX_LEN {
            return Err(TypeError::InvalidLength {
                expected: UUID_HEX_LEN,
                actual: s.len(),
            });
        }
        if s.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(TypeError::NotLowercase(s.to_string()));
        }
        hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        Ok(Self(s.to_string()))
    }

    /// The hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short representation (first 8 characters).
    pub fn short(&self) -> &str {
        &self.0[..8]
    }
}

impl fmt::Debug for ItemUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemUuid({})", self.short())
    }
}

impl fmt::Display for ItemUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ItemUuid {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ItemUuid {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ItemUuid> for String {
    fn from(uuid: ItemUuid) -> Self {
        uuid.0
    }
}

/// Source of fresh [`ItemUuid`]s.
///
/// The item store calls [`UuidGenerator::next`] exactly once for every item
/// it creates.
pub trait UuidGenerator: Send + Sync {
    fn next(&self) -> ItemUuid;
}

/// Generates random (v4) uuids.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomUuidGenerator;

impl UuidGenerator for RandomUuidGenerator {
    fn next(&self) -> ItemUuid {
        ItemUuid(::uuid::Uuid::new_v4().simple().to_string())
    }
}

/// Deterministic generator yielding `0000…0001`, `0000…0002`, …
///
/// Useful for tests and reproducible demos.
#[derive(Debug, Default)]
pub struct SequentialUuidGenerator {
    counter: AtomicU64,
}

impl SequentialUuidGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting after `last`, e.g. when resuming from a snapshot.
    pub fn starting_after(last: u64) -> Self {
        Self {
            counter: AtomicU64::new(last),
        }
    }
}

impl UuidGenerator for SequentialUuidGenerator {
    fn next(&self) -> ItemUuid {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        ItemUuid(format!("{n:032x}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn random_uuids_are_valid_and_distinct() {
        let generator = RandomUuidGenerator;
        let a = generator.next();
        let b = generator.next();
        assert_ne!(a, b);
        assert!(ItemUuid::parse(a.as_str()).is_ok());
        assert_eq!(a.as_str().len(), UUID_HEX_LEN);
    }

    #[test]
    fn sequential_generator_counts_up() {
        let generator = SequentialUuidGenerator::new();
        assert_eq!(generator.next().as_str(), "00000000000000000000000000000001");
        assert_eq!(generator.next().as_str(), "00000000000000000000000000000002");
    }

    #[test]
    fn sequential_generator_resumes() {
        let generator = SequentialUuidGenerator::starting_after(0xff);
        assert_eq!(generator.next().as_str(), "00000000000000000000000000000100");
    }

    #[test]
    fn rejects_wrong_length() {
        let err = ItemUuid::parse("abc").unwrap_err();
        assert_eq!(err, TypeError::InvalidLength { expected: 32, actual: 3 });
    }

    #[test]
    fn rejects_uppercase() {
        let err = ItemUuid::parse("0123456789ABCDEF0123456789abcdef").unwrap_err();
        assert!(matches!(err, TypeError::NotLowercase(_)));
    }

    #[test]
    fn rejects_non_hex() {
        let err = ItemUuid::parse("0123456789abcdef0123456789abcdez").unwrap_err();
        assert!(matches!(err, TypeError::InvalidHex(_)));
    }

    #[test]
    fn serde_validates() {
        let ok: ItemUuid =
            serde_json::from_str("\"0123456789abcdef0123456789abcdef\"").unwrap();
        assert_eq!(ok.short(), "01234567");
        assert!(serde_json::from_str::<ItemUuid>("\"nope\"").is_err());
    }

    proptest! {
        #[test]
        fn any_lowercase_hex_of_len_32_parses(s in "[0-9a-f]{32}") {
            let uuid = ItemUuid::parse(&s).unwrap();
            prop_assert_eq!(uuid.as_str(), s.as_str());
        }

        #[test]
        fn other_lengths_are_rejected(s in "[0-9a-f]{0,31}") {
            prop_assert!(ItemUuid::parse(&s).is_err());
        }
    }
}
