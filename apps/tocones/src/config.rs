//! # Configuration
//!
//! Optional TOML file:
//!
//! ```toml
//! [roster]
//! supervisors = ["Hernandez, Erika"]
//! chainsaw_operators = ["Cruz Cardona, Cristian Danilo"]
//!
//! [output]
//! directory = "/srv/evaluaciones"
//! ```
//!
//! Missing sections or keys fall back to the built-in defaults. The default
//! location is `<config dir>/tocones/config.toml`; when that file does not
//! exist the defaults are used. A path given explicitly must exist and parse.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tocones_core::{Roster, ToconesError};

/// Application directory under the user's config dir.
pub const CONFIG_DIR_NAME: &str = "tocones";

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Where exports are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Fixed output directory; the platform default is used when unset.
    pub directory: Option<PathBuf>,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub roster: Roster,
    pub output: OutputConfig,
}

impl AppConfig {
    /// Default config file location, if the platform has a config dir.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parse configuration text.
    pub fn from_toml(text: &str) -> Result<Self, ToconesError> {
        toml::from_str(text).map_err(|e| ToconesError::ConfigError(e.to_string()))
    }

    /// Read and parse a config file.
    pub fn from_file(path: &Path) -> Result<Self, ToconesError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ToconesError::ConfigError(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&text)
    }

    /// Load from an explicit path, else from the default location if present.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ToconesError> {
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "Loading configuration");
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "Loading configuration");
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}
