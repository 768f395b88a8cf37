use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use fcl_engine::EngineConfig;
use fcl_server::ServerConfig;

/// Top-level `fcl` configuration file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FclConfig {
    /// Subscriber level when `--verbose` is not given.
    pub log_level: String,
    pub engine: EngineConfig,
    pub server: ServerConfig,
}

impl Default for FclConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            engine: EngineConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl FclConfig {
    /// Load from `path`, or defaults when no path was given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                Self::from_toml(&raw).with_context(|| format!("parsing config {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Level the subscriber is installed at.
    pub fn tracing_level(&self, verbose: bool) -> anyhow::Result<tracing::Level> {
        if verbose {
            return Ok(tracing::Level::DEBUG);
        }
        self.log_level
            .parse()
            .map_err(|_| anyhow::anyhow!("unknown log_level {:?}", self.log_level))
    }
}
