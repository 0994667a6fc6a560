//! Configuration file support for harbour-ports.
//!
//! Two locations are read:
//! - Global: `~/.harbour/ports.toml` - User-wide defaults
//! - Project: `.harbour/ports.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, key by key.
//!
//! ```toml
//! [filter]
//! triplet = "x64-linux"
//!
//! [variables]
//! VCPKG_TARGET_ARCHITECTURE = "x64"
//! VCPKG_CMAKE_SYSTEM_NAME = "Linux"
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::Triplet;

/// harbour-ports configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dependency filter settings
    pub filter: FilterConfig,

    /// Build variables exposed to qualifier expressions
    pub variables: BTreeMap<String, String>,
}

/// Dependency filter settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Default target triplet (e.g., x64-windows, x64-linux)
    pub triplet: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.filter.triplet.is_some() {
            self.filter.triplet = other.filter.triplet;
        }
        self.variables.extend(other.variables);
    }

    /// Configured default triplet, if any.
    pub fn triplet(&self) -> Option<Triplet> {
        self.filter
            .triplet
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .map(Triplet::from_canonical_name)
    }

    /// Variables in the shape the dependency filter expects.
    pub fn variable_map(&self) -> HashMap<String, String> {
        self.variables
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.harbour/ports.toml)
/// 2. Global config (~/.harbour/ports.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global harbour config directory (~/.harbour).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".harbour"))
}

/// Get the global config path (~/.harbour/ports.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("ports.toml"))
}

/// Get the project config path (.harbour/ports.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".harbour").join("ports.toml")
}
