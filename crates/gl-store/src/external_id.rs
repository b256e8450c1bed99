//! Optional unique external identifiers.
//!
//! Five columns correlate local rows with the ladder: `club.ladder_code` and
//! the `ladder_id` column of `pilot`, `launch_point`, `glider_model`, and
//! `flight`. All are nullable, unique among non-null values, and follow the
//! same write rule:
//!
//! - null -> value: back-filled once correlation succeeds
//! - value -> same value: no-op
//! - value -> different value: [`StoreError::IntegrityConflict`], never overwritten
//!
//! A value already held by a different row fails the unique constraint and is
//! surfaced as a [`StoreError::ConstraintViolation`].

use crate::error::{StoreError, StoreResult, StoreResultExt};
use gl_core::{ClubCode, LadderId};
use rusqlite::types::{FromSql, ToSql};
use rusqlite::{Connection, OptionalExtension};
use std::fmt::Display;

/// Tables carrying a `ladder_id` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LadderTable {
    Pilot,
    LaunchPoint,
    GliderModel,
    Flight,
}

impl LadderTable {
    pub const ALL: [LadderTable; 4] = [
        LadderTable::Pilot,
        LadderTable::LaunchPoint,
        LadderTable::GliderModel,
        LadderTable::Flight,
    ];

    pub fn table(&self) -> &'static str {
        match self {
            LadderTable::Pilot => "pilot",
            LadderTable::LaunchPoint => "launch_point",
            LadderTable::GliderModel => "glider_model",
            LadderTable::Flight => "flight",
        }
    }
}

/// Every external-identifier column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalColumn {
    ClubLadderCode,
    LadderId(LadderTable),
}

impl ExternalColumn {
    pub fn table(&self) -> &'static str {
        match self {
            ExternalColumn::ClubLadderCode => "club",
            ExternalColumn::LadderId(t) => t.table(),
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            ExternalColumn::ClubLadderCode => "ladder_code",
            ExternalColumn::LadderId(_) => "ladder_id",
        }
    }

    /// `table.column`, for messages.
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.table(), self.column())
    }
}

impl From<LadderTable> for ExternalColumn {
    fn from(table: LadderTable) -> Self {
        ExternalColumn::LadderId(table)
    }
}

/// Set the ladder ID of row `row_id` in `table`.
pub fn link_ladder_id(
    conn: &Connection,
    table: LadderTable,
    row_id: i64,
    ladder_id: LadderId,
) -> StoreResult<()> {
    link_column(conn, table.into(), row_id, ladder_id.get())
}

/// Set the ladder code of club `club_id`.
pub fn link_club_code(conn: &Connection, club_id: i64, code: &ClubCode) -> StoreResult<()> {
    link_column(
        conn,
        ExternalColumn::ClubLadderCode,
        club_id,
        code.as_str().to_string(),
    )
}

fn link_column<V>(conn: &Connection, column: ExternalColumn, row_id: i64, value: V) -> StoreResult<()>
where
    V: ToSql + FromSql + PartialEq + Display,
{
    let table = column.table();
    let col = column.column();

    if !needs_link(column, row_id, read_column(conn, column, row_id)?, &value)? {
        return Ok(());
    }

    let updated = conn
        .execute(
            &format!("UPDATE {table} SET {col} = ?1 WHERE id = ?2 AND {col} IS NULL"),
            rusqlite::params![value, row_id],
        )
        .query_context("link external id")?;

    if updated == 0 {
        // Another writer filled the column after it was read.
        let current = read_column(conn, column, row_id)?;
        if needs_link(column, row_id, current, &value)? {
            return Err(StoreError::QueryError(format!(
                "{} of row {row_id} is still null but the update wrote nothing",
                column.qualified()
            )));
        }
        return Ok(());
    }

    log::debug!("Linked {} of row {row_id} to {value}", column.qualified());
    Ok(())
}

/// Current value of `column` for `row_id`; `None` when the row is missing.
fn read_column<V: FromSql>(
    conn: &Connection,
    column: ExternalColumn,
    row_id: i64,
) -> StoreResult<Option<Option<V>>> {
    conn.query_row(
        &format!("SELECT {} FROM {} WHERE id = ?1", column.column(), column.table()),
        [row_id],
        |row| row.get(0),
    )
    .optional()
    .query_context("select external id")
}

/// Whether a null column must be written, applying the link rule to a value
/// already present.
fn needs_link<V>(
    column: ExternalColumn,
    row_id: i64,
    current: Option<Option<V>>,
    value: &V,
) -> StoreResult<bool>
where
    V: PartialEq + Display,
{
    match current {
        None => Err(StoreError::not_found(column.table(), row_id)),
        Some(None) => Ok(true),
        Some(Some(existing)) if existing == *value => Ok(false),
        Some(Some(existing)) => Err(StoreError::IntegrityConflict {
            column: column.qualified(),
            row_id,
            existing: existing.to_string(),
            attempted: value.to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "external_id_test.rs"]
mod tests;
