use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;

use crate::reassembly::ReassemblyConfig;
use crate::session::SessionConfig;
use crate::transcript::ClassifyConfig;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,

    #[serde(default)]
    pub reassembly: ReassemblySettings,

    /// Full replacement for the classification tables; omit to use the
    /// built-in taxonomy covering both wire generations
    #[serde(default)]
    pub classify: Option<ClassifyConfig>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ReassemblySettings {
    /// Seconds a partial message may wait for its remaining parts
    #[serde(default = "default_stale_secs")]
    pub stale_secs: u64,

    #[serde(default = "default_max_pending")]
    pub max_pending_messages: usize,

    #[serde(default = "default_max_buffered")]
    pub max_buffered_bytes: usize,
}

fn default_stale_secs() -> u64 {
    300
}

fn default_max_pending() -> usize {
    256
}

fn default_max_buffered() -> usize {
    1024 * 1024
}

impl Default for ReassemblySettings {
    fn default() -> Self {
        Self {
            stale_secs: default_stale_secs(),
            max_pending_messages: default_max_pending(),
            max_buffered_bytes: default_max_buffered(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Build a session configuration from the loaded settings.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            reassembly: ReassemblyConfig {
                stale_after: Duration::from_secs(self.reassembly.stale_secs),
                max_pending_messages: self.reassembly.max_pending_messages,
                max_buffered_bytes: self.reassembly.max_buffered_bytes,
            },
            classify: self.classify.clone().unwrap_or_default(),
            ..SessionConfig::default()
        }
    }
}
