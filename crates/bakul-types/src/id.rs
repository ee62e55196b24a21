use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Store-assigned identity of a tree item.
///
/// Ids are handed out by the item store when an item is first created and
/// never change afterwards. A store assigns them in strictly increasing
/// order, so comparing two ids from the same store compares their creation
/// order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    /// Wrap a raw numeric id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw numeric id.
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// The id following this one.
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| TypeError::InvalidItemId(s.to_string()))
    }
}

impl From<u64> for ItemId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        let id: ItemId = "42".parse().unwrap();
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = "abc".parse::<ItemId>().unwrap_err();
        assert_eq!(err, TypeError::InvalidItemId("abc".into()));
    }

    #[test]
    fn next_is_greater() {
        let id = ItemId::new(7);
        assert!(id.next() > id);
        assert_eq!(id.next().get(), 8);
    }

    #[test]
    fn serde_is_transparent() {
        let json = serde_json::to_string(&ItemId::new(3)).unwrap();
        assert_eq!(json, "3");
        let back: ItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ItemId::new(3));
    }
}
