//! CLI configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. The `--db` flag wins over `MEDIZAP_DB_PATH`.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Database file name inside the platform data directory.
const DB_FILE_NAME: &str = "medizap.db";

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite database file
    pub db_path: PathBuf,

    /// Pool size
    pub max_connections: u32,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// ## Sources (first match wins)
    /// - db path: `db_override` → `MEDIZAP_DB_PATH` → platform data dir
    /// - pool size: `MEDIZAP_DB_MAX_CONNECTIONS` → 5
    pub fn load(db_override: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::from_lookup(db_override, |key| env::var(key).ok())
    }

    fn from_lookup(
        db_override: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let db_path = match db_override {
            Some(path) => path,
            None => match lookup("MEDIZAP_DB_PATH") {
                Some(path) if !path.trim().is_empty() => PathBuf::from(path),
                _ => default_db_path()?,
            },
        };

        let max_connections: u32 = lookup("MEDIZAP_DB_MAX_CONNECTIONS")
            .unwrap_or_else(|| "5".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("MEDIZAP_DB_MAX_CONNECTIONS".to_string()))?;

        if max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "MEDIZAP_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(AppConfig {
            db_path,
            max_connections,
        })
    }

    /// Creates the directory holding the database file, if missing.
    pub fn ensure_db_dir(&self) -> Result<(), ConfigError> {
        match self.db_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)
                .map_err(|e| ConfigError::DataDir(format!("{}: {}", dir.display(), e))),
            _ => Ok(()),
        }
    }
}

/// Platform-specific data directory.
///
/// - **macOS**: `~/Library/Application Support/com.medizap.medizap/medizap.db`
/// - **Windows**: `%APPDATA%\medizap\medizap\data\medizap.db`
/// - **Linux**: `~/.local/share/medizap/medizap.db`
fn default_db_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("com", "medizap", "medizap")
        .ok_or_else(|| ConfigError::MissingRequired("MEDIZAP_DB_PATH".to_string()))?;

    Ok(dirs.data_dir().join(DB_FILE_NAME))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Cannot create data directory {0}")]
    DataDir(String),
}
