//! Configuration types and parsing for ladder.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file names looked up by [`StoreConfig::load_from_dir`], in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["ladder.yml", "ladder.yaml"];

/// Path value that opens a private in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Repository configuration from ladder.yml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// SQLite database file, relative paths resolve against the config directory
    pub database_path: String,

    /// Directory holding archived trace files, content-addressed by checksum.
    /// Trace rows are still deduplicated when no archive is configured.
    #[serde(default)]
    pub trace_archive: Option<String>,

    /// How long a writer waits on a locked database before giving up
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// SQLite journal mode
    #[serde(default)]
    pub journal_mode: JournalMode,

    /// What to do with soft references (task turnpoint codes, launch point
    /// club codes) that do not resolve to an existing row
    #[serde(default)]
    pub dangling_references: DanglingReferencePolicy,
}

/// SQLite journal mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalMode {
    /// Write-ahead log: readers do not block the single writer
    #[default]
    Wal,
    /// Rollback journal
    Delete,
}

impl JournalMode {
    /// Value passed to `PRAGMA journal_mode`
    pub fn as_str(&self) -> &'static str {
        match self {
            JournalMode::Wal => "WAL",
            JournalMode::Delete => "DELETE",
        }
    }
}

/// Policy for soft references that point at nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DanglingReferencePolicy {
    /// Log a warning and store the reference anyway
    #[default]
    Warn,
    /// Fail the write
    Reject,
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

impl StoreConfig {
    /// Config with defaults for everything except the database path
    pub fn new(database_path: impl Into<String>) -> Self {
        Self {
            database_path: database_path.into(),
            trace_archive: None,
            busy_timeout_ms: default_busy_timeout_ms(),
            journal_mode: JournalMode::default(),
            dangling_references: DanglingReferencePolicy::default(),
        }
    }

    /// Config for a private in-memory database
    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY_PATH)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: StoreConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        log::debug!("Loaded store config from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a directory
    /// Looks for ladder.yml or ladder.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
            .map_or_else(
                || {
                    Err(CoreError::ConfigNotFound {
                        path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
                    })
                },
                |path| Self::load(&path),
            )
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.database_path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database_path cannot be empty".to_string(),
            });
        }
        if self.busy_timeout_ms == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "busy_timeout_ms must be greater than zero".to_string(),
            });
        }
        if self.trace_archive.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(CoreError::ConfigInvalid {
                message: "trace_archive cannot be empty when set".to_string(),
            });
        }
        Ok(())
    }

    /// Whether the database lives in memory only
    pub fn is_in_memory(&self) -> bool {
        self.database_path == IN_MEMORY_PATH
    }

    /// Database path resolved against `root`
    pub fn database_path_absolute(&self, root: &Path) -> PathBuf {
        resolve(root, &self.database_path)
    }

    /// Trace archive directory resolved against `root`, if configured
    pub fn trace_archive_absolute(&self, root: &Path) -> Option<PathBuf> {
        self.trace_archive.as_deref().map(|p| resolve(root, p))
    }

    /// Busy timeout as a `Duration`
    pub fn busy_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.busy_timeout_ms)
    }
}

fn resolve(root: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
