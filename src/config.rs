//! Runtime configuration shared by the CLI and TUI.
//!
//! Resolution order for the storage file: explicit path (the `--db` flag),
//! then `MARKNOTE_DB`, then `{data_dir}/marknote/storage.db`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Environment variable overriding the storage file path.
pub const DB_ENV: &str = "MARKNOTE_DB";
/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "MARKNOTE_LOG";

const APP_DIR: &str = "marknote";
const DB_FILE: &str = "storage.db";
const LOG_FILE: &str = "marknote.log";
const DEFAULT_LOG_FILTER: &str = "info";

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SQLite file holding the storage slots.
    pub db_path: PathBuf,
    /// Log file, kept next to the storage file.
    pub log_path: PathBuf,
    /// `tracing_subscriber::EnvFilter` directive.
    pub log_filter: String,
}

impl Config {
    /// Resolves the configuration from an optional explicit path and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if no path is given and the platform data directory
    /// cannot be determined.
    pub fn resolve(db_override: Option<&Path>) -> Result<Self> {
        let db_path = match db_override {
            Some(path) => path.to_path_buf(),
            None => match std::env::var_os(DB_ENV) {
                Some(path) if !path.is_empty() => PathBuf::from(path),
                _ => default_database_path()?,
            },
        };

        let log_path = db_path
            .parent()
            .map(|dir| dir.join(LOG_FILE))
            .unwrap_or_else(|| PathBuf::from(LOG_FILE));

        let log_filter =
            std::env::var(LOG_ENV).unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            db_path,
            log_path,
            log_filter,
        })
    }

    /// Creates the directory holding the storage file if needed.
    pub fn ensure_data_directory(&self) -> Result<()> {
        if let Some(parent) = self.db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }
        Ok(())
    }
}

/// Gets the cross-platform default storage path.
///
/// Returns `{data_dir}/marknote/storage.db` where `data_dir` is:
/// - Linux: `~/.local/share`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
pub fn default_database_path() -> Result<PathBuf> {
    let data_dir =
        dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine data directory"))?;

    Ok(data_dir.join(APP_DIR).join(DB_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    #[serial]
    fn explicit_path_wins_over_environment() {
        // SAFETY: serialized with other env-mutating tests
        unsafe { std::env::set_var(DB_ENV, "/tmp/from-env.db") };
        let config = Config::resolve(Some(Path::new("/tmp/explicit.db"))).unwrap();
        unsafe { std::env::remove_var(DB_ENV) };

        assert_eq!(config.db_path, PathBuf::from("/tmp/explicit.db"));
        assert_eq!(config.log_path, PathBuf::from("/tmp/marknote.log"));
    }

    #[test]
    #[serial]
    fn environment_path_used_without_override() {
        unsafe { std::env::set_var(DB_ENV, "/tmp/from-env.db") };
        let config = Config::resolve(None).unwrap();
        unsafe { std::env::remove_var(DB_ENV) };

        assert_eq!(config.db_path, PathBuf::from("/tmp/from-env.db"));
    }

    #[test]
    #[serial]
    fn log_filter_defaults_to_info() {
        unsafe { std::env::remove_var(LOG_ENV) };
        let config = Config::resolve(Some(Path::new("/tmp/x.db"))).unwrap();
        assert_eq!(config.log_filter, "info");

        unsafe { std::env::set_var(LOG_ENV, "marknote=debug") };
        let config = Config::resolve(Some(Path::new("/tmp/x.db"))).unwrap();
        unsafe { std::env::remove_var(LOG_ENV) };
        assert_eq!(config.log_filter, "marknote=debug");
    }

    #[test]
    fn default_path_lives_under_app_directory() {
        let path = default_database_path().unwrap();
        assert!(path.to_string_lossy().contains("marknote"));
        assert!(path.to_string_lossy().ends_with("storage.db"));
    }

    #[test]
    fn ensure_data_directory_creates_parents() {
        let dir = tempdir().unwrap();
        let config = Config {
            db_path: dir.path().join("a").join("b").join("storage.db"),
            log_path: dir.path().join("a").join("b").join("marknote.log"),
            log_filter: "info".to_string(),
        };

        config.ensure_data_directory().unwrap();
        assert!(dir.path().join("a").join("b").is_dir());
    }
}
