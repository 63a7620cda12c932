//! Configuration management for crocon
//!
//! Settings load from an optional TOML profile file, then environment
//! variables, then CLI flags; later layers win. The library itself never
//! reads configuration — these values feed the CLI and embedders that
//! want the same defaults.
//!
//! # Environment Variables
//!
//! - `CROCON_DEFAULT_JAVA_VERSION`: Java version assumed when a request
//!   omits one - default: "1.20.4"
//! - `CROCON_DEFAULT_BEDROCK_VERSION`: Bedrock version assumed when a
//!   request omits one - default: "1.20.80"
//! - `CROCON_PREWARM`: Build the default resolver pair at startup
//!   (true|false) - default: "false"
//! - `CROCON_LOG_LEVEL`: Logging level - default: "info"
//! - `CROCON_LOG_JSON`: Emit JSON log lines (true|false) - default: "false"
//!
//! # Profile file
//!
//! `--config FILE`, or `$XDG_CONFIG_HOME/crocon/config.toml` when
//! present, with the same keys in snake_case:
//!
//! ```toml
//! default_java_version = "1.20.4"
//! default_bedrock_version = "1.20.80"
//! prewarm = true
//! log_level = "debug"
//! log_json = false
//! ```

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::versions::GameVersion;

const DEFAULT_JAVA_VERSION: &str = "1.20.4";
const DEFAULT_BEDROCK_VERSION: &str = "1.20.80";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {error}")]
    ReadFailed { path: PathBuf, error: String },

    #[error("Failed to parse config file {path}: {error}")]
    ParseFailed { path: PathBuf, error: String },

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Optional keys as they appear in the profile file; also used as the
/// overlay shape for the env layer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Profile {
    default_java_version: Option<String>,
    default_bedrock_version: Option<String>,
    prewarm: Option<bool>,
    log_level: Option<String>,
    log_json: Option<bool>,
}

/// Resolved configuration for the crocon CLI.
#[derive(Debug, Clone)]
pub struct CroconConfig {
    /// Java version assumed when a request omits one
    pub default_java_version: String,

    /// Bedrock version assumed when a request omits one
    pub default_bedrock_version: String,

    /// Build the default resolver pair at startup
    pub prewarm: bool,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Emit JSON log lines instead of the human format
    pub log_json: bool,
}

impl Default for CroconConfig {
    fn default() -> Self {
        CroconConfig {
            default_java_version: DEFAULT_JAVA_VERSION.to_string(),
            default_bedrock_version: DEFAULT_BEDROCK_VERSION.to_string(),
            prewarm: false,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_json: false,
        }
    }
}

impl CroconConfig {
    /// Load configuration: defaults, then the profile file, then the
    /// environment. `config_path` is the explicit `--config` value; when
    /// `None` the default profile location is used if it exists.
    pub fn load(config_path: Option<&Path>) -> Result<CroconConfig, ConfigError> {
        let mut config = CroconConfig::default();

        match config_path {
            Some(path) => config.apply(read_profile(path)?),
            None => {
                if let Some(path) = default_profile_path() {
                    if path.is_file() {
                        config.apply(read_profile(&path)?);
                    }
                }
            }
        }

        config.apply(env_profile());
        Ok(config)
    }

    fn apply(&mut self, profile: Profile) {
        if let Some(v) = profile.default_java_version {
            self.default_java_version = v;
        }
        if let Some(v) = profile.default_bedrock_version {
            self.default_bedrock_version = v;
        }
        if let Some(v) = profile.prewarm {
            self.prewarm = v;
        }
        if let Some(v) = profile.log_level {
            self.log_level = v.to_lowercase();
        }
        if let Some(v) = profile.log_json {
            self.log_json = v;
        }
    }

    /// Validates the configuration: versions must parse and the log level
    /// must be a known name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (label, value) in [
            ("default_java_version", &self.default_java_version),
            ("default_bedrock_version", &self.default_bedrock_version),
        ] {
            if value.parse::<GameVersion>().is_err() {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid {}: {}",
                    label, value
                )));
            }
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                other
            ))),
        }
    }
}

fn read_profile(path: &Path) -> Result<Profile, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseFailed {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

fn default_profile_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("crocon").join("config.toml"))
}

fn env_profile() -> Profile {
    let get = |key: &str| env::var(key).ok().filter(|v| !v.is_empty());
    let get_bool = |key: &str| get(key).and_then(|v| v.parse::<bool>().ok());
    Profile {
        default_java_version: get("CROCON_DEFAULT_JAVA_VERSION"),
        default_bedrock_version: get("CROCON_DEFAULT_BEDROCK_VERSION"),
        prewarm: get_bool("CROCON_PREWARM"),
        log_level: get("CROCON_LOG_LEVEL"),
        log_json: get_bool("CROCON_LOG_JSON"),
    }
}
