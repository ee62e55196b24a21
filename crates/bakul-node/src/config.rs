//! Node service configuration.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Settings for a [`NodeService`](crate::NodeService).
///
/// ```toml
/// max_conflict_retries = 8
/// reserved_keys = ["identifier", "dateCreated", "dateModified"]
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// How many times a conflicting schema binding or property write is
    /// re-run before the conflict is reported.
    pub max_conflict_retries: u32,
    /// Keys dropped from property writes.
    pub reserved_keys: BTreeSet<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            max_conflict_retries: 8,
            reserved_keys: [
                "identifier",
                "dateCreated",
                "dateModified",
                "date_created",
                "date_modified",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl NodeConfig {
    pub fn is_reserved(&self, key: &str) -> bool {
        self.reserved_keys.contains(key)
    }
}
