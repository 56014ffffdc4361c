//! Application configuration.
//!
//! # Responsibility
//! - Load `AppConfig` from an optional TOML file.
//! - Provide defaults for every missing key.
//!
//! # Invariants
//! - A missing config file is an error only when a path was given.
//! - `port` is never zero and `host` is never blank after `load`.

use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DATA_DIR: &str = "data";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
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

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding one `<collection>.json` file per entity.
    pub data_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// Rolling log directory; logs go to stderr when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Loads from `path` when given, otherwise returns defaults.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("host cannot be empty".to_string()));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid("port must be greater than 0".to_string()));
        }
        Ok(())
    }

    /// Path of the JSON file backing `collection`.
    pub fn collection_path(&self, collection: &str) -> PathBuf {
        collection_path(&self.data_dir, collection)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn collection_path(data_dir: &Path, collection: &str) -> PathBuf {
    data_dir.join(format!("{collection}.json"))
}
