//! Configuration module for treeprobe.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - Environment variable overrides
//! - CLI argument overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `TREEPROBE_` and use double
//! underscores to separate nested levels:
//! - `TREEPROBE_GITSERVER__FRONTEND_URL=frontend-internal:3090` sets `gitserver.frontend_url`
//! - `TREEPROBE_GITSERVER__MAX_CONCURRENT_LOOKUPS=16` sets `gitserver.max_concurrent_lookups`
//! - `TREEPROBE_LOGGING__DEFAULT=debug` sets `logging.default`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::existence::DEFAULT_MAX_CONCURRENT_LOOKUPS;

/// Directory holding the settings file.
pub const CONFIG_DIR: &str = ".treeprobe";

/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "TREEPROBE_";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Git server settings
    #[serde(default)]
    pub gitserver: GitserverConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GitserverConfig {
    /// Url of the frontend internal API.
    ///
    /// When unset, existence checks are skipped and every path is treated
    /// as present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontend_url: Option<String>,

    /// Timeout for a single directory listing, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Directory listings in flight at once within a round
    #[serde(default = "default_max_concurrent_lookups")]
    pub max_concurrent_lookups: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Default level for all modules
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-module level overrides, e.g. `treeprobe::gitserver = "trace"`
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_max_concurrent_lookups() -> usize {
    DEFAULT_MAX_CONCURRENT_LOOKUPS
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            gitserver: GitserverConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for GitserverConfig {
    fn default() -> Self {
        Self {
            frontend_url: None,
            request_timeout_secs: default_request_timeout_secs(),
            max_concurrent_lookups: default_max_concurrent_lookups(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

impl GitserverConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join("settings.toml"));

        Self::load_from(config_path)
    }

    /// Load configuration from a specific file, still honoring env overrides
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            // Double underscore (__) separates nested levels,
            // single underscore (_) remains as is within field names
            .merge(Env::prefixed(ENV_PREFIX).map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
            .extract()
            .map_err(Box::new)
    }

    /// Find the settings file by looking for `.treeprobe` from the current
    /// directory up to the filesystem root
    fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        current
            .ancestors()
            .map(|ancestor| ancestor.join(CONFIG_DIR))
            .find(|dir| dir.is_dir())
            .map(|dir| dir.join("settings.toml"))
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        std::fs::write(path, self.to_toml()?)?;

        Ok(())
    }

    /// Render the settings as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
