//! Configuration loading — the rule list, read once from a TOML file.
//!
//! The file is `config.toml` in the directory containing the executable.
//! There are no defaults: a missing, unreadable, or malformed file, or one
//! defining no rules, is an error and the daemon refuses to start.
//!
//! ```toml
//! [[rule]]
//! must_contain = "alert"
//! run_command = "echo ALERT"
//!
//! # `run_command` may be left out; matching messages are then just deleted.
//! [[rule]]
//! must_contain = "spam"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use smsrelay_domain::error::SmsRelayError;
use smsrelay_domain::rule::{Rule, RuleSet};

/// Name of the configuration file next to the executable.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Rules in evaluation order (`[[rule]]` tables).
    #[serde(rename = "rule", default)]
    pub rules: Vec<Rule>,
}

impl Config {
    /// Read `config.toml` from beside the running executable.
    ///
    /// # Errors
    ///
    /// Same as [`Config::default_path`] and [`Config::from_file`].
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        tracing::info!(path = %path.display(), "reading config");
        Self::from_file(&path)
    }

    /// Path of `config.toml` beside the running executable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Locate`] if the executable path is unknown.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let exe = std::env::current_exe().map_err(ConfigError::Locate)?;
        let dir = exe.parent().unwrap_or_else(|| Path::new("."));
        Ok(dir.join(CONFIG_FILE_NAME))
    }

    /// Read and parse the given file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read (including when
    /// it does not exist) and [`ConfigError::Parse`] if it is not valid TOML
    /// of the expected shape.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validate and convert into the immutable rule set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when no rule is defined.
    pub fn into_rule_set(self) -> Result<RuleSet, ConfigError> {
        for rule in self.rules.iter().filter(|rule| rule.has_empty_command()) {
            tracing::warn!(pattern = %rule.must_contain, "rule has no command to run");
        }
        RuleSet::new(self.rules).map_err(ConfigError::Validation)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The executable's own location could not be determined.
    #[error("failed to locate the executable directory")]
    Locate(#[source] std::io::Error),
    /// File I/O failure.
    #[error("failed to read config file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// TOML parse failure.
    #[error("failed to parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// Semantic validation failure.
    #[error("invalid configuration")]
    Validation(#[source] SmsRelayError),
}
