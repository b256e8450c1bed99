//! Table introspection helpers.

use crate::error::{StoreError, StoreResult, StoreResultExt};
use crate::row_helpers::is_plain_identifier;
use rusqlite::Connection;

/// List all user tables in the database, including `schema_version`.
pub fn list_tables(conn: &Connection) -> StoreResult<Vec<String>> {
    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
             ORDER BY name",
        )
        .query_context("prepare list_tables")?;

    let names = stmt
        .query_map([], |row| row.get(0))
        .query_context("query list_tables")?
        .collect::<Result<Vec<String>, _>>()
        .query_context("collect list_tables")?;
    Ok(names)
}

/// Get the row count for a table.
pub fn table_row_count(conn: &Connection, table_name: &str) -> StoreResult<i64> {
    if !is_plain_identifier(table_name) {
        return Err(StoreError::InvalidInput(format!(
            "invalid table name '{table_name}': must contain only alphanumeric characters and underscores"
        )));
    }
    let count: i64 = conn
        .query_row(&format!("SELECT COUNT(*) FROM {table_name}"), [], |row| {
            row.get(0)
        })
        .map_err(|e| StoreError::QueryError(format!("count failed for {table_name}: {e}")))?;
    Ok(count)
}

#[cfg(test)]
#[path = "adhoc_test.rs"]
mod tests;
