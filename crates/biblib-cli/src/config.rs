//! The biblib configuration file.
//!
//! Lookup order for the file is the `--config` flag, then `BIBLIB_CONFIG`,
//! then `<config dir>/biblib/config.toml`. A missing file means defaults.
//! Selected `BIBLIB_*` environment variables override whatever the file
//! says.

use std::path::PathBuf;

use biblib_auth::{AuthConfig, DEFAULT_USER_HEADER};
use biblib_storage::{MEMORY_URL, StoreConfig};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Name used for the config directory and in messages.
pub const PROJECT_NAME: &str = "biblib";

/// Points at a config file.
pub const ENV_CONFIG: &str = "BIBLIB_CONFIG";
/// Overrides `server.bind`.
pub const ENV_BIND: &str = "BIBLIB_BIND";
/// Overrides `database.url`.
pub const ENV_DATABASE_URL: &str = "BIBLIB_DATABASE_URL";
/// Overrides `auth.user_header`.
pub const ENV_USER_HEADER: &str = "BIBLIB_USER_HEADER";
/// Overrides `log.level`.
pub const ENV_LOG_LEVEL: &str = "BIBLIB_LOG_LEVEL";

/// Default tracing filter.
pub const DEFAULT_LOG_LEVEL: &str = "info,biblib=debug,tower_http=info";

/// Complete service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiblibConfig {
    /// HTTP listener.
    pub server: ServerConfig,
    /// Storage backend.
    pub database: DatabaseConfig,
    /// Gateway identity header.
    pub auth: AuthSection,
    /// Logging.
    pub log: LogConfig,
}

/// `[server]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
        }
    }
}

/// `[database]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `"memory"` or a `sqlite:` URL.
    pub url: String,
    /// Pool size for SQLite.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: MEMORY_URL.to_string(),
            max_connections: 5,
        }
    }
}

/// `[auth]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSection {
    /// Header carrying the caller's absolute uid.
    pub user_header: String,
}

impl Default for AuthSection {
    fn default() -> Self {
        Self {
            user_header: DEFAULT_USER_HEADER.to_string(),
        }
    }
}

/// `[log]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directives; `RUST_LOG` wins when set.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json: false,
        }
    }
}

impl BiblibConfig {
    /// `<config dir>/biblib/config.toml`, if the platform has a config dir.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(PROJECT_NAME).join("config.toml"))
    }

    /// The file `load` would read.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        match std::env::var(ENV_CONFIG) {
            Ok(path) if !path.is_empty() => Some(PathBuf::from(path)),
            _ => Self::default_config_path(),
        }
    }

    /// Reads the resolved file (or defaults) and applies environment
    /// overrides.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        let mut config = match Self::resolve_config_path(explicit) {
            Some(path) if path.exists() => {
                let content =
                    std::fs::read_to_string(&path).map_err(|e| Error::io_with_path(e, &path))?;
                Self::from_toml_str(&content)
                    .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?
            }
            _ => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parses a TOML document; absent keys take their defaults.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Overrides fields from `lookup`, which maps variable names to values.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(bind) = non_empty(ENV_BIND) {
            self.server.bind = bind;
        }
        if let Some(url) = non_empty(ENV_DATABASE_URL) {
            self.database.url = url;
        }
        if let Some(header) = non_empty(ENV_USER_HEADER) {
            self.auth.user_header = header;
        }
        if let Some(level) = non_empty(ENV_LOG_LEVEL) {
            self.log.level = level;
        }
    }

    /// Serializes as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// The overridable settings as `BIBLIB_*` variables.
    pub fn to_env_vars(&self) -> Vec<(String, String)> {
        vec![
            (ENV_BIND.to_string(), self.server.bind.clone()),
            (ENV_DATABASE_URL.to_string(), self.database.url.clone()),
            (ENV_USER_HEADER.to_string(), self.auth.user_header.clone()),
            (ENV_LOG_LEVEL.to_string(), self.log.level.clone()),
        ]
    }

    /// Storage settings for `biblib_storage::connect`.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections.max(1),
        }
    }

    /// Auth middleware settings.
    pub fn auth_config(&self) -> Result<AuthConfig> {
        Ok(AuthConfig::new(&self.auth.user_header)?)
    }
}
