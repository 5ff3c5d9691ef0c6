// src/config.rs
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

pub const ENV_CONFIG_PATH: &str = "BOXWATCH_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/boxwatch.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub gemini_api_key: String,
    pub pushbullet_api_key: String,
    /// Directory holding one ledger file per source.
    #[serde(default = "default_ledger_dir")]
    pub ledger_dir: PathBuf,
    /// Disable to print summaries without pushing notifications.
    #[serde(default = "default_notify")]
    pub notify: bool,
}

fn default_ledger_dir() -> PathBuf {
    PathBuf::from("ledger")
}

fn default_notify() -> bool {
    true
}

/// Load config from `$BOXWATCH_CONFIG`, falling back to
/// `config/boxwatch.toml`.
pub fn load_default() -> Result<Config> {
    let path = std::env::var(ENV_CONFIG_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
    load_from(&path)
}

pub fn load_from(path: &Path) -> Result<Config> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    let cfg: Config =
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))?;
    validate(&cfg)?;
    Ok(cfg)
}

fn validate(cfg: &Config) -> Result<()> {
    if cfg.gemini_api_key.trim().is_empty() {
        bail!("missing required field: gemini_api_key");
    }
    if cfg.pushbullet_api_key.trim().is_empty() {
        bail!("missing required field: pushbullet_api_key");
    }
    Ok(())
}
