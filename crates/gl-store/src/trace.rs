//! Content-addressed trace store.
//!
//! A trace is identified by the SHA-256 of its bytes. Interning content that
//! is already stored returns the existing row untouched, so the filename and
//! download time always describe the first ingestion.
//!
//! When an archive directory is configured the bytes are also written to
//! `<archive>/<h0>/<h1>/<hash>`, where `h0` and `h1` are the first two hex
//! digits of the checksum.

use crate::error::{StoreError, StoreResult, StoreResultExt};
use crate::reference::{find_or_create, Resolved};
use chrono::NaiveDateTime;
use gl_core::{compute_checksum, is_valid_checksum};
use rusqlite::{Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};

/// A stored trace.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub id: i64,
    pub downloaded_at: NaiveDateTime,
    pub original_filename: String,
    pub sha256_hash: String,
}

const SELECT_TRACE: &str = "SELECT id, downloaded_at, original_filename, sha256_hash FROM trace";

fn trace_from_row(row: &Row<'_>) -> rusqlite::Result<Trace> {
    Ok(Trace {
        id: row.get(0)?,
        downloaded_at: row.get(1)?,
        original_filename: row.get(2)?,
        sha256_hash: row.get(3)?,
    })
}

/// Fetch a trace by row id.
pub fn get_trace(conn: &Connection, id: i64) -> StoreResult<Trace> {
    conn.query_row(&format!("{SELECT_TRACE} WHERE id = ?1"), [id], trace_from_row)
        .optional()
        .query_context("select trace")?
        .ok_or_else(|| StoreError::not_found("trace", id))
}

/// Find a trace by checksum.
pub fn find_trace_by_checksum(conn: &Connection, sha256_hash: &str) -> StoreResult<Option<Trace>> {
    conn.query_row(
        &format!("{SELECT_TRACE} WHERE sha256_hash = ?1"),
        [sha256_hash],
        trace_from_row,
    )
    .optional()
    .query_context("select trace by sha256_hash")
}

/// Store `bytes` once.
///
/// Returns the existing row when identical content was interned before
/// (`created == false`); otherwise archives the bytes (when `archive` is set)
/// and inserts a new row.
pub fn intern_trace(
    conn: &Connection,
    archive: Option<&Path>,
    bytes: &[u8],
    original_filename: &str,
    downloaded_at: NaiveDateTime,
) -> StoreResult<Resolved<Trace>> {
    let sha256_hash = compute_checksum(bytes);

    let resolved = find_or_create(
        conn,
        "trace",
        |conn| find_trace_by_checksum(conn, &sha256_hash),
        |conn| {
            if let Some(root) = archive {
                archive_bytes(root, &sha256_hash, bytes)?;
            }
            conn.execute(
                "INSERT INTO trace (downloaded_at, original_filename, sha256_hash) VALUES (?1, ?2, ?3)",
                rusqlite::params![downloaded_at, original_filename, sha256_hash],
            )
            .query_context("insert trace")?;
            get_trace(conn, conn.last_insert_rowid())
        },
    )?;

    if resolved.created {
        log::debug!("Interned trace {original_filename} as {sha256_hash}");
    } else {
        log::warn!(
            "Found existing trace with same hash: {sha256_hash} ({original_filename} duplicates {})",
            resolved.row.original_filename
        );
    }
    Ok(resolved)
}

/// Archive location of the trace with checksum `sha256_hash` under `root`.
pub fn trace_path(root: &Path, sha256_hash: &str) -> StoreResult<PathBuf> {
    if !is_valid_checksum(sha256_hash) {
        return Err(StoreError::InvalidInput(format!(
            "'{sha256_hash}' is not a sha256 checksum"
        )));
    }
    Ok(root
        .join(&sha256_hash[0..1])
        .join(&sha256_hash[1..2])
        .join(sha256_hash))
}

/// Read an archived trace back, checking the content still matches its hash.
pub fn read_trace(root: &Path, trace: &Trace) -> StoreResult<Vec<u8>> {
    let path = trace_path(root, &trace.sha256_hash)?;
    let bytes = std::fs::read(&path).map_err(|e| StoreError::ArchiveError {
        path: path.display().to_string(),
        source: e,
    })?;
    let actual = compute_checksum(&bytes);
    if actual != trace.sha256_hash {
        return Err(StoreError::ArchiveError {
            path: path.display().to_string(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("archived content hashes to {actual}"),
            ),
        });
    }
    Ok(bytes)
}

/// Write the bytes to the archive unless a file for this hash already exists.
/// Content is written to a temporary sibling and renamed into place.
fn archive_bytes(root: &Path, sha256_hash: &str, bytes: &[u8]) -> StoreResult<PathBuf> {
    let path = trace_path(root, sha256_hash)?;
    if path.exists() {
        return Ok(path);
    }
    let archive_err = |p: &Path, e: std::io::Error| StoreError::ArchiveError {
        path: p.display().to_string(),
        source: e,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| archive_err(parent, e))?;
    }
    let tmp = path.with_extension(format!("{}.tmp", std::process::id()));
    std::fs::write(&tmp, bytes).map_err(|e| archive_err(&tmp, e))?;
    std::fs::rename(&tmp, &path).map_err(|e| archive_err(&path, e))?;
    log::debug!("Archived trace to {}", path.display());
    Ok(path)
}

#[cfg(test)]
#[path = "trace_test.rs"]
mod tests;
