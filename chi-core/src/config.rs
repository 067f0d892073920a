//! Runtime configuration.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Runtime configuration data.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    /// The name given to volume claims whose template does not name its claim.
    #[serde(default = "Config::default_volume_claim_name")]
    pub default_volume_claim_name: String,
    /// The number of shards generated for a cluster which declares neither shards nor a count.
    #[serde(default = "Config::default_count")]
    pub default_shards_count: u32,
    /// The number of replicas generated for a shard which declares neither replicas nor a count.
    #[serde(default = "Config::default_count")]
    pub default_replicas_count: u32,
}

impl Config {
    /// Create a new config instance from the runtime environment.
    pub fn new() -> Result<Self> {
        envy::from_env().context("error building config from env")
    }

    fn default_volume_claim_name() -> String {
        "clickhouse-data".into()
    }

    fn default_count() -> u32 {
        1
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_volume_claim_name: Self::default_volume_claim_name(),
            default_shards_count: Self::default_count(),
            default_replicas_count: Self::default_count(),
        }
    }
}
