use crate::core::{LiteError, Result};
use rusqlite::ffi;
use serde::Deserialize;
use std::ffi::c_int;
use std::fs;
use std::path::Path;

/// Top-level configuration structure parsed from a TOML file.
#[derive(Debug, Deserialize)]
pub struct Config {
    pub database: ConnectionConfig,
}

/// How a [`Connection`](crate::Connection) is opened.
///
/// `foreign_keys` and `busy_timeout_ms` are only applied when set; otherwise
/// the engine defaults stay in effect.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub path: String,
    pub read_only: bool,
    pub create: bool,
    pub foreign_keys: Option<bool>,
    pub busy_timeout_ms: Option<u32>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        ConnectionConfig {
            path: String::new(),
            read_only: false,
            create: true,
            foreign_keys: None,
            busy_timeout_ms: None,
        }
    }
}

impl ConnectionConfig {
    /// Parses a configuration file body and returns its `[database]` table.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        parse_config(content).map(|config| config.database)
    }

    /// Flags for `sqlite3_open_v2`. A read-only open never creates the file.
    pub(crate) fn open_flags(&self) -> c_int {
        if self.read_only {
            ffi::SQLITE_OPEN_READONLY
        } else if self.create {
            ffi::SQLITE_OPEN_READWRITE | ffi::SQLITE_OPEN_CREATE
        } else {
            ffi::SQLITE_OPEN_READWRITE
        }
    }

    fn validate(&self) -> Result<()> {
        if self.path.is_empty() {
            return Err(LiteError::Config("database.path must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Loads configuration from a TOML file at the given path.
///
/// # Example
///
/// ```no_run
/// let config = litehandle::config::load_config("litehandle.toml")?;
/// println!("{:?}", config.database);
/// # Ok::<_, litehandle::LiteError>(())
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    config.database.validate()?;
    Ok(config)
}
