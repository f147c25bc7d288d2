//! Configuration for hostfacts
//!
//! Loaded from an optional JSON file. Every field has a default, so an
//! empty object `{}` is a valid configuration.
//!
//! ```json
//! {
//!   "debug": false,
//!   "default_interpreter": "/bin/sh",
//!   "command_timeout_ms": 5000,
//!   "load_catalog": true,
//!   "root_dir": "/"
//! }
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::facts::{ExecSettings, DEFAULT_INTERPRETER};
use crate::observability::{log_event_with_fields, parse_debug_flag, Event};

/// Environment variable overriding the `debug` setting
pub const DEBUG_ENV: &str = "HOSTFACTS_DEBUG";

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactsConfig {
    /// Emit debug-channel diagnostics (default: false)
    #[serde(default)]
    pub debug: bool,

    /// Interpreter for command resolutions (default: "/bin/sh")
    #[serde(default = "default_interpreter")]
    pub default_interpreter: String,

    /// Kill commands running longer than this; absent means wait forever
    #[serde(default)]
    pub command_timeout_ms: Option<u64>,

    /// Register the built-in fact catalog (default: true)
    #[serde(default = "default_load_catalog")]
    pub load_catalog: bool,

    /// Root that catalog file probes are resolved against (default: "/")
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,
}

fn default_interpreter() -> String {
    DEFAULT_INTERPRETER.to_string()
}

fn default_load_catalog() -> bool {
    true
}

fn default_root_dir() -> PathBuf {
    PathBuf::from("/")
}

impl Default for FactsConfig {
    fn default() -> Self {
        Self {
            debug: false,
            default_interpreter: default_interpreter(),
            command_timeout_ms: None,
            load_catalog: default_load_catalog(),
            root_dir: default_root_dir(),
        }
    }
}

impl FactsConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&content)?;

        let display = path.display().to_string();
        log_event_with_fields(Event::ConfigLoaded, &[("path", &display)]);
        Ok(config)
    }

    /// Parse and validate configuration text
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: FactsConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.default_interpreter.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_interpreter must not be empty".into(),
            ));
        }
        if self.command_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid("command_timeout_ms must be > 0".into()));
        }
        Ok(())
    }

    /// Apply `HOSTFACTS_DEBUG` if it is set
    pub fn apply_env(&mut self) {
        if let Ok(raw) = env::var(DEBUG_ENV) {
            self.debug = parse_debug_flag(&raw);
        }
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_ms.map(Duration::from_millis)
    }

    /// Execution settings for a registry built from this configuration
    pub fn exec_settings(&self) -> ExecSettings {
        ExecSettings {
            default_interpreter: self.default_interpreter.clone(),
            timeout: self.command_timeout(),
        }
    }
}
