use crate::document::TAB_STOP;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tab_stop: usize,
    pub quit_times: usize,
    pub message_timeout_secs: u64,
    pub escape_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tab_stop: TAB_STOP,
            quit_times: 3,
            message_timeout_secs: 5,
            escape_timeout_ms: 100,
        }
    }
}

impl Config {
    pub fn message_timeout(&self) -> Duration {
        Duration::from_secs(self.message_timeout_secs)
    }

    pub fn escape_timeout(&self) -> Duration {
        Duration::from_millis(self.escape_timeout_ms)
    }
}

/// Loads settings from an explicitly named TOML file. Without a path the
/// built-in defaults are used; nothing is looked up implicitly.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let raw =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    parse_config(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn parse_config(raw: &str) -> Result<Config> {
    let mut cfg: Config = toml::from_str(raw)?;
    cfg.tab_stop = cfg.tab_stop.max(1);
    Ok(cfg)
}

pub fn render_config(cfg: &Config) -> Result<String> {
    toml::to_string_pretty(cfg).context("Failed to serialize config")
}
