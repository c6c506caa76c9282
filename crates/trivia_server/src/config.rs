//! Environment-driven server configuration.
//!
//! Every variable is optional; blank values fall back to the default.

use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "TRIVIA_DB_PATH";
pub const BIND_ADDR_VAR: &str = "TRIVIA_BIND_ADDR";
pub const LOG_LEVEL_VAR: &str = "TRIVIA_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "TRIVIA_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "trivia.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "trivia-logs";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub db_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub log_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBindAddr { value: String, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBindAddr { value, message } => {
                write!(f, "{BIND_ADDR_VAR}=`{value}` is not a socket address: {message}")
            }
        }
    }
}

impl Error for ConfigError {}

impl ServerConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration from a fixed set of variables.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|trimmed| !trimmed.is_empty())
        };

        let bind_raw = value(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|err| ConfigError::InvalidBindAddr {
                value: bind_raw.clone(),
                message: err.to_string(),
            })?;

        Ok(Self {
            db_path: value(DB_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            bind_addr,
            log_level: value(LOG_LEVEL_VAR)
                .unwrap_or_else(|| trivia_core::default_log_level().to_string()),
            log_dir: value(LOG_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME)),
        })
    }
}
