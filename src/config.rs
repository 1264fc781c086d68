use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::{BaseDirs, UserDirs};

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".contact-book";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "contacts.sqlite";
const LOG_DIR_NAME: &str = "logs";
const EXPORT_DIR_NAME: &str = "exports";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Overrides the data directory, mostly for trying things out without
/// touching the real contact book.
pub const HOME_ENV: &str = "CONTACT_BOOK_HOME";
/// Log level spec passed to the file logger, e.g. `debug`.
pub const LOG_LEVEL_ENV: &str = "CONTACT_BOOK_LOG";

/// Resolved locations and settings for one run of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub export_dir: PathBuf,
    pub log_level: String,
}

impl AppConfig {
    /// Build the configuration from the environment and the user's home.
    pub fn load() -> Result<Self> {
        let data_dir = match env::var_os(HOME_ENV).filter(|value| !value.is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };

        let mut config = Self::with_data_dir(&data_dir);
        let documents =
            UserDirs::new().and_then(|dirs| dirs.document_dir().map(Path::to_path_buf));
        if let Some(documents) = documents {
            config.export_dir = documents;
        }
        if let Ok(level) = env::var(LOG_LEVEL_ENV) {
            if !level.trim().is_empty() {
                config.log_level = level.trim().to_string();
            }
        }
        Ok(config)
    }

    /// Lay every path out beneath `data_dir` with the default log level.
    pub fn with_data_dir(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            db_path: data_dir.join(DB_FILE_NAME),
            log_dir: data_dir.join(LOG_DIR_NAME),
            export_dir: data_dir.join(EXPORT_DIR_NAME),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Resolve the absolute path to the data directory inside the user's home.
fn default_data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_live_under_the_data_dir() {
        let config = AppConfig::with_data_dir(Path::new("/tmp/book"));

        assert_eq!(config.db_path, Path::new("/tmp/book/contacts.sqlite"));
        assert_eq!(config.log_dir, Path::new("/tmp/book/logs"));
        assert_eq!(config.export_dir, Path::new("/tmp/book/exports"));
        assert_eq!(config.log_level, "info");
    }
}
