//! Definition options loaded from a JSON file

use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// Which firmware revision answers to the shared `EFEKTA_iAQ3` model id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Iaq3Revision {
    R10,
    #[default]
    R11,
}

/// Options shared by all definitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reject settings outside the advertised domain before writing
    pub validate_ranges: bool,
    pub iaq3_revision: Iaq3Revision,
    /// Answer genTime reports with a local time write
    pub time_sync: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            validate_ranges: false,
            iaq3_revision: Iaq3Revision::default(),
            time_sync: true,
        }
    }
}

/// Load options from a JSON file, falling back to defaults
pub async fn load_config(path: &Path) -> Config {
    match fs::read_to_string(path).await {
        Ok(contents) => match serde_json::from_str::<Config>(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::warn!("Failed to parse config file {:?}: {}", path, e);
                Config::default()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file found at {:?}, using defaults", path);
            Config::default()
        }
        Err(e) => {
            tracing::warn!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}
