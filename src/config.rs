// Configuration for the interactive session

use crate::filter::Filter;
use crate::models::{Category, Priority};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const APP_NAME: &str = "taskboard";
const CONFIG_FILE: &str = "config.yaml";

/// Presentation defaults, all optional in the file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Category used by `add` when none is given
    pub default_category: Category,
    /// Priority used by `add` when none is given
    pub default_priority: Priority,
    /// Filter selected when the session starts
    pub filter: Filter,
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_category: Category::default(),
            default_priority: Priority::default(),
            filter: Filter::All,
            color: true,
        }
    }
}

impl Config {
    /// Load from an explicit path, or from the default location
    ///
    /// A missing file at either location yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_fallback(path, default_config_path())
    }

    fn load_with_fallback(path: Option<&Path>, fallback: Option<PathBuf>) -> Result<Self> {
        match (path, fallback) {
            (Some(path), _) => Self::load_from(path),
            (None, Some(fallback)) => Self::load_from(&fallback),
            (None, None) => {
                debug!("No config directory on this platform, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = ?path, "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents =
            fs::read_to_string(path).with_context(|| format!("Failed to read config file: {}", path.display()))?;

        // An empty file deserializes to unit, not a mapping
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        info!(path = ?path, "Loaded config");
        Ok(config)
    }
}

/// `<config dir>/taskboard/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILE))
}
