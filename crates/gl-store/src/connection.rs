//! Ladder database connection wrapper.
//!
//! [`LadderDb`] owns a SQLite [`Connection`] and provides helpers for opening,
//! migrating, and transacting against the ladder database. Several importer
//! and scoring processes may open the same file; SQLite's locking plus the
//! schema's unique constraints keep them consistent.

use crate::error::{StoreError, StoreResult};
use crate::migration::run_migrations;
use gl_core::{DanglingReferencePolicy, StoreConfig};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Wrapper around a SQLite connection to the ladder database.
///
/// Single-threaded: each process (or thread) opens its own `LadderDb`.
pub struct LadderDb {
    conn: Connection,
    trace_archive: Option<PathBuf>,
    dangling_references: DanglingReferencePolicy,
}

impl LadderDb {
    /// Open (or create) the database described by `config`, resolving
    /// relative paths against `root`, and run pending migrations.
    pub fn open(config: &StoreConfig, root: &Path) -> StoreResult<Self> {
        let conn = if config.is_in_memory() {
            Connection::open_in_memory()
                .map_err(|e| StoreError::ConnectionError(e.to_string()))?
        } else {
            let path = config.database_path_absolute(root);
            Connection::open(&path)
                .map_err(|e| StoreError::ConnectionError(format!("{e}: {}", path.display())))?
        };
        configure(&conn, config)?;
        run_migrations(&conn)?;

        Ok(Self {
            conn,
            trace_archive: config.trace_archive_absolute(root),
            dangling_references: config.dangling_references,
        })
    }

    /// Open (or create) the database file at `path` with default settings.
    pub fn open_path(path: &Path) -> StoreResult<Self> {
        let config = StoreConfig::new(path.display().to_string());
        Self::open(&config, Path::new("."))
    }

    /// Create an in-memory database with all migrations applied.
    ///
    /// Useful for unit tests that don't need persistence.
    pub fn open_memory() -> StoreResult<Self> {
        Self::open(&StoreConfig::in_memory(), Path::new("."))
    }

    /// Replace the dangling-reference policy for subsequent writes.
    pub fn with_dangling_references(mut self, policy: DanglingReferencePolicy) -> Self {
        self.dangling_references = policy;
        self
    }

    /// Replace the trace archive directory for subsequent interns.
    pub fn with_trace_archive(mut self, archive: Option<PathBuf>) -> Self {
        self.trace_archive = archive;
        self
    }

    /// Borrow the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn trace_archive(&self) -> Option<&Path> {
        self.trace_archive.as_deref()
    }

    pub fn dangling_references(&self) -> DanglingReferencePolicy {
        self.dangling_references
    }

    /// Execute `body` within a `BEGIN IMMEDIATE` / `COMMIT` transaction,
    /// rolling back on error.
    ///
    /// `IMMEDIATE` takes the write lock up front, so a concurrent writer in
    /// another process waits (up to the busy timeout) instead of failing
    /// halfway through the body.
    pub fn transaction<F, T>(&self, body: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T>,
    {
        self.conn
            .execute_batch("BEGIN IMMEDIATE")
            .map_err(|e| StoreError::TransactionError(format!("BEGIN failed: {e}")))?;

        let result = body(&self.conn);

        match &result {
            Ok(_) => {
                if let Err(commit_err) = self.conn.execute_batch("COMMIT") {
                    let _ = self.conn.execute_batch("ROLLBACK");
                    return Err(StoreError::TransactionError(format!(
                        "COMMIT failed: {commit_err}"
                    )));
                }
            }
            Err(_) => {
                let _ = self.conn.execute_batch("ROLLBACK");
            }
        }
        result
    }
}

/// Apply per-connection settings. Must run outside any transaction.
fn configure(conn: &Connection, config: &StoreConfig) -> StoreResult<()> {
    conn.busy_timeout(config.busy_timeout())
        .map_err(|e| StoreError::ConnectionError(format!("busy_timeout: {e}")))?;
    conn.pragma_update(None, "foreign_keys", true)
        .map_err(|e| StoreError::ConnectionError(format!("enable foreign_keys: {e}")))?;

    if !config.is_in_memory() {
        let mode: String = conn
            .pragma_update_and_check(None, "journal_mode", config.journal_mode.as_str(), |row| {
                row.get(0)
            })
            .map_err(|e| StoreError::ConnectionError(format!("journal_mode: {e}")))?;
        log::debug!("Ladder database journal_mode={mode}");
    }
    Ok(())
}

#[cfg(test)]
#[path = "connection_test.rs"]
mod tests;
