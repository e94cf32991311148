//! Runtime configuration loaded from TOML.
//!
//! # Responsibility
//! - Define every tunable with a default so an absent file is valid.
//! - Validate values before the store or logger is built from them.
//!
//! # Invariants
//! - `storage_key` is non-empty after trim.
//! - `data_dir`, when set, is absolute.
//! - `log_level` is one of `trace|debug|info|warn|error|off`.
//! - `[chat]` delays are each at most `ReplyDelay::MAX_MS`.

use crate::logging::normalize_level;
use crate::service::chat_service::ReplyDelay;
use crate::store::DEFAULT_STORAGE_KEY;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// SQLite file name inside the data directory.
pub const DB_FILE_NAME: &str = "deskkit.sqlite3";
/// Log directory name inside the data directory.
pub const LOG_DIR_NAME: &str = "logs";

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeskConfig {
    /// Key under which the document is stored.
    pub storage_key: String,
    /// Directory for the database and logs. `None` lets the caller choose a
    /// platform default.
    pub data_dir: Option<PathBuf>,
    pub log_level: String,
    pub chat: ChatConfig,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            data_dir: None,
            log_level: crate::logging::default_log_level().to_string(),
            chat: ChatConfig::default(),
        }
    }
}

/// Simulated assistant latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChatConfig {
    pub min_delay_ms: u64,
    pub jitter_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        let delay = ReplyDelay::default();
        Self {
            min_delay_ms: delay.min_ms,
            jitter_ms: delay.jitter_ms,
        }
    }
}

impl DeskConfig {
    /// Parses and validates TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, returning defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key cannot be empty".to_string()));
        }
        if let Some(dir) = &self.data_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "data_dir must be an absolute path, got `{}`",
                    dir.display()
                )));
            }
        }
        for (name, value) in [
            ("chat.min_delay_ms", self.chat.min_delay_ms),
            ("chat.jitter_ms", self.chat.jitter_ms),
        ] {
            if value > ReplyDelay::MAX_MS {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be at most {} ms, got {value}",
                    ReplyDelay::MAX_MS
                )));
            }
        }
        if !self.logging_disabled() {
            normalize_level(&self.log_level).map_err(|err| ConfigError::Invalid(err.to_string()))?;
        }
        Ok(())
    }

    /// True when `log_level = "off"`.
    pub fn logging_disabled(&self) -> bool {
        self.log_level.trim().eq_ignore_ascii_case("off")
    }

    pub fn reply_delay(&self) -> ReplyDelay {
        ReplyDelay {
            min_ms: self.chat.min_delay_ms,
            jitter_ms: self.chat.jitter_ms,
        }
    }

    /// Database path under `data_dir`.
    pub fn db_path(data_dir: &Path) -> PathBuf {
        data_dir.join(DB_FILE_NAME)
    }

    /// Log directory under `data_dir`.
    pub fn log_dir(data_dir: &Path) -> PathBuf {
        data_dir.join(LOG_DIR_NAME)
    }
}
