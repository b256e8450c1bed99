//! Schema migration runner for the ladder database.
//!
//! Tracks applied migration versions in `schema_version` and runs any
//! unapplied migrations on each open.

use crate::ddl::MIGRATIONS;
use crate::error::{StoreError, StoreResult};
use rusqlite::Connection;

/// Ensure the `schema_version` table exists.
fn ensure_version_table(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
             version    INTEGER NOT NULL,
             applied_at TEXT NOT NULL DEFAULT (datetime('now'))
         );",
    )
    .map_err(|e| {
        StoreError::MigrationError(format!("failed to create schema_version table: {e}"))
    })?;
    Ok(())
}

/// Return the highest applied migration version, or 0 if none.
pub fn current_version(conn: &Connection) -> StoreResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )
        .map_err(|e| StoreError::MigrationError(format!("failed to read schema version: {e}")))?;
    Ok(version)
}

/// Run all unapplied migrations against `conn`.
///
/// Each migration and its `schema_version` row commit together inside an
/// immediate transaction, so two processes opening a fresh file at the same
/// time cannot both apply the same version.
pub fn run_migrations(conn: &Connection) -> StoreResult<()> {
    ensure_version_table(conn)?;

    for migration in MIGRATIONS {
        conn.execute_batch("BEGIN IMMEDIATE")
            .map_err(|e| StoreError::MigrationError(format!("BEGIN failed: {e}")))?;

        let applied = current_version(conn).and_then(|current| {
            if migration.version <= current {
                return Ok(false);
            }
            log::debug!("Applying ladder migration v{:03}", migration.version);

            conn.execute_batch(migration.sql).map_err(|e| {
                StoreError::MigrationError(format!(
                    "migration v{:03} failed: {e}",
                    migration.version
                ))
            })?;

            conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                rusqlite::params![migration.version],
            )
            .map_err(|e| {
                StoreError::MigrationError(format!(
                    "failed to record migration v{:03}: {e}",
                    migration.version
                ))
            })?;
            Ok(true)
        });

        match applied {
            Ok(_) => conn
                .execute_batch("COMMIT")
                .map_err(|e| StoreError::MigrationError(format!("COMMIT failed: {e}")))?,
            Err(e) => {
                let _ = conn.execute_batch("ROLLBACK");
                return Err(e);
            }
        }
    }
    Ok(())
}
