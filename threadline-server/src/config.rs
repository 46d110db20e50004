//! Server configuration - file and environment loading
//!
//! Configuration is read from `~/.threadline/config.toml` when present, then
//! overridden by environment variables:
//! - `DATABASE_URL`: PostgreSQL connection string
//! - `THREADLINE_BIND`: address to listen on (e.g. 127.0.0.1:3030)
//! - `THREADLINE_REVALIDATE_URL`: webhook receiving revalidation requests
//!
//! Command-line flags take precedence over both (see threadline-cli).

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid value for {var}: {reason}")]
    InvalidEnv { var: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadlineConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub revalidate: RevalidateSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: SocketAddr,
    /// Allow any CORS origin instead of localhost only
    pub cors_permissive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevalidateSection {
    /// Endpoint receiving `POST {"path": ...}`; revalidation is skipped when unset
    pub url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3030)),
            cors_permissive: false,
        }
    }
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 5,
        }
    }
}

impl Default for RevalidateSection {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: 5,
        }
    }
}

impl ThreadlineConfig {
    /// Config file path: ~/.threadline/config.toml
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".threadline/config.toml")
    }

    /// Load the default config file (if any) and apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Self::default()
        };
        config.apply_env(|var| std::env::var(var).ok())?;
        Ok(config)
    }

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

    /// Apply overrides from a variable lookup (the process environment in production).
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&'static str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = Some(url);
        }

        if let Some(bind) = lookup("THREADLINE_BIND") {
            self.server.bind = bind.parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::InvalidEnv {
                    var: "THREADLINE_BIND",
                    reason: e.to_string(),
                }
            })?;
        }

        if let Some(url) = lookup("THREADLINE_REVALIDATE_URL") {
            self.revalidate.url = Some(url).filter(|u| !u.is_empty());
        }

        Ok(())
    }
}
