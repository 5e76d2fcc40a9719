use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_WINDOW_HOURS: u32 = 24;

#[derive(Debug, Deserialize, Clone)]
pub struct VitalsConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub window: WindowConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    /// Health document (JSON). Relative paths are taken from the config file's directory.
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WindowConfig {
    #[serde(default = "default_hours")]
    pub hours: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            hours: DEFAULT_WINDOW_HOURS,
        }
    }
}

fn default_hours() -> u32 {
    DEFAULT_WINDOW_HOURS
}

pub fn parse_config(contents: &str) -> Result<VitalsConfig> {
    let config: VitalsConfig = toml::from_str(contents).context("parsing vitals config")?;
    if config.window.hours == 0 {
        anyhow::bail!("window.hours must be positive");
    }
    Ok(config)
}

pub fn read_config(path: &Path) -> Result<VitalsConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let mut config =
        parse_config(&contents).with_context(|| format!("parsing config {}", path.display()))?;
    if config.source.path.is_relative() {
        if let Some(dir) = path.parent() {
            config.source.path = dir.join(&config.source.path);
        }
    }
    Ok(config)
}
