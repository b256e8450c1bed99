//! Rows whose external identifier has not been matched yet.

use crate::error::{StoreResult, StoreResultExt};
use crate::external_id::ExternalColumn;
use rusqlite::Connection;

/// Row ids in `column`'s table where `column` is null, ascending.
pub fn unlinked_rows(conn: &Connection, column: ExternalColumn) -> StoreResult<Vec<i64>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT id FROM {} WHERE {} IS NULL ORDER BY id",
            column.table(),
            column.column()
        ))
        .query_context("prepare unlinked_rows")?;

    let ids = stmt
        .query_map([], |row| row.get(0))
        .query_context("query unlinked_rows")?
        .collect::<Result<Vec<i64>, _>>()
        .query_context("collect unlinked_rows")?;
    Ok(ids)
}

/// Number of rows where `column` is null.
pub fn count_unlinked(conn: &Connection, column: ExternalColumn) -> StoreResult<i64> {
    conn.query_row(
        &format!(
            "SELECT COUNT(*) FROM {} WHERE {} IS NULL",
            column.table(),
            column.column()
        ),
        [],
        |row| row.get(0),
    )
    .query_context("count unlinked")
}

#[cfg(test)]
#[path = "unlinked_test.rs"]
mod tests;
