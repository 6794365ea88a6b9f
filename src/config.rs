use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "arena.toml";
pub const DEFAULT_CATALOGUE_PATH: &str = "db.json";
pub const DEFAULT_OPPONENT_POOL_LIMIT: usize = 151;

fn default_catalogue() -> PathBuf {
    PathBuf::from(DEFAULT_CATALOGUE_PATH)
}

fn default_cpu_delay_ms() -> u64 {
    1500
}

fn default_pool_limit() -> usize {
    DEFAULT_OPPONENT_POOL_LIMIT
}

/// Settings shared by the arena binaries, read from `arena.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArenaConfig {
    #[serde(default = "default_catalogue")]
    pub catalogue: PathBuf,
    #[serde(default = "default_cpu_delay_ms")]
    pub cpu_delay_ms: u64,
    #[serde(default = "default_pool_limit")]
    pub opponent_pool_limit: usize,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            catalogue: default_catalogue(),
            cpu_delay_ms: default_cpu_delay_ms(),
            opponent_pool_limit: default_pool_limit(),
            seed: None,
        }
    }
}

impl ArenaConfig {
    /// Reads the config file; a missing file yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(ArenaConfig::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Failed to parse TOML from {}", path.display()))
    }

    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let config: ArenaConfig = toml::from_str(raw)?;
        if config.opponent_pool_limit == 0 {
            anyhow::bail!("opponent_pool_limit must be > 0");
        }
        Ok(config)
    }

    pub fn cpu_delay(&self) -> Duration {
        Duration::from_millis(self.cpu_delay_ms)
    }
}
