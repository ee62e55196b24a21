//! CLI configuration.
//!
//! ```toml
//! data = "bakul-data.json"
//!
//! [node]
//! max_conflict_retries = 8
//!
//! [[schema.node_types]]
//! name = "article"
//!
//! [[schema.node_types.fields]]
//! name = "title"
//! field_type = "text"
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use bakul_node::NodeConfig;
use bakul_schema::SchemaConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "bakul.toml";
pub const DEFAULT_DATA_FILE: &str = "bakul-data.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Snapshot file holding the item tree.
    pub data: PathBuf,
    pub schema: SchemaConfig,
    pub node: NodeConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data: PathBuf::from(DEFAULT_DATA_FILE),
            schema: SchemaConfig::default(),
            node: NodeConfig::default(),
        }
    }
}

impl CliConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// The explicit config file, else `bakul.toml` if present, else
    /// defaults; `data` overrides the snapshot path.
    pub fn resolve(explicit: Option<&Path>, data: Option<PathBuf>) -> anyhow::Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        if let Some(data) = data {
            config.data = data;
        }
        Ok(config)
    }
}
