// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `CONCH_`-prefixed environment variables (`CONCH_AUTH__HASH_COST=12`).
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::auth::password::{DEFAULT_HASH_COST, DEFAULT_MAX_PASSWORD_BYTES};
use crate::auth::rate_limit::{DEFAULT_LOCKOUT_DURATION, DEFAULT_MAX_ATTEMPTS};
use crate::error::AppError;


/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "CONCH_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub auth: AuthSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Which storage engine backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Rows live only as long as the process
    Memory,
    /// Rows are snapshotted to `<path>/conch.json`
    #[default]
    FlatFile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// Data directory for the flat-file engine
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// scrypt cost as log2(N)
    pub hash_cost: u8,
    pub max_password_bytes: usize,
    /// Failed logins before a lockout; 0 disables lockouts
    pub max_failed_logins: u32,
    pub lockout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 8080 }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self { backend: StorageBackend::default(), path: PathBuf::from("data") }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            hash_cost: DEFAULT_HASH_COST,
            max_password_bytes: DEFAULT_MAX_PASSWORD_BYTES,
            max_failed_logins: DEFAULT_MAX_ATTEMPTS,
            lockout_secs: DEFAULT_LOCKOUT_DURATION.as_secs(),
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}

impl Settings {
    /// Load from `config.toml` and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load from `path` and the environment; a missing file is not an error
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let settings: Settings = Self::figment(path)
            .extract()
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Provider stack used by [`Settings::load_from`]
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject values the server cannot run with
    pub fn validate(&self) -> Result<(), AppError> {
        if self.server.port == 0 {
            return Err(AppError::Config("server.port must be non-zero".into()));
        }
        if !(1..=20).contains(&self.auth.hash_cost) {
            return Err(AppError::Config("auth.hash_cost must be between 1 and 20".into()));
        }
        if self.auth.max_password_bytes == 0 {
            return Err(AppError::Config("auth.max_password_bytes must be non-zero".into()));
        }
        if !LOG_LEVELS.contains(&self.log.level.to_lowercase().as_str()) {
            return Err(AppError::Config(format!("unknown log.level '{}'", self.log.level)));
        }
        self.bind_addr()?;
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid server address: {e}")))
    }
}
