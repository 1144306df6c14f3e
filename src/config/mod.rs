//! Configuration, read from `~/.config/selah/config.toml` at startup.
//! A default file is written on first run; missing keys fall back to
//! their defaults.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use serde::Deserialize;

use crate::app::{Result, SelahError};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Translation used when none is given on the command line.
    pub default_translation: String,
    /// Base URL of the remote scripture source.
    pub api_base_url: String,
    /// Remote fetch timeout.
    pub http_timeout_secs: u64,
    /// TTL for cached books and verses.
    pub cache_retention_days: i64,
    /// How long reading events are kept.
    pub history_retention_days: i64,
    /// How long generated devotionals are kept.
    pub devotional_retention_days: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_translation: "RVR1960".to_string(),
            api_base_url: "https://bolls.life/api".to_string(),
            http_timeout_secs: 30,
            cache_retention_days: 7,
            history_retention_days: 90,
            devotional_retention_days: 30,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::default_config_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            Self::write_default(path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| SelahError::Config(format!("{}: {e}", path.display())))?;
        Ok(config)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SelahError::Config("Could not find config directory".into()))?;
        Ok(config_dir.join("selah").join("config.toml"))
    }

    fn write_default(path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(path)?;
        file.write_all(Self::default_content().as_bytes())?;
        Ok(())
    }

    fn default_content() -> String {
        r#"# selah configuration

# Translation used when none is given on the command line.
default_translation = "RVR1960"

# Base URL of the remote scripture source.
api_base_url = "https://bolls.life/api"

# Remote fetch timeout in seconds.
http_timeout_secs = 30

# Days before cached scripture is evicted.
cache_retention_days = 7

# Days of reading history to keep.
history_retention_days = 90

# Days of generated devotionals to keep.
devotional_retention_days = 30
"#
        .to_string()
    }
}
