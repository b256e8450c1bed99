//! Gliders, keyed by registration.

use super::{find_or_create, warn_if_differs, Resolved};
use crate::error::{StoreError, StoreResult, StoreResultExt};
use crate::row_helpers::get_parsed;
use gl_core::Registration;
use rusqlite::{Connection, OptionalExtension, Row};

/// A stored glider. `model` references `glider_model.id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Glider {
    pub id: i64,
    pub reg: Registration,
    pub model: Option<i64>,
}

const SELECT_GLIDER: &str = "SELECT id, reg, model FROM glider";

fn glider_from_row(row: &Row<'_>) -> rusqlite::Result<Glider> {
    Ok(Glider {
        id: row.get(0)?,
        reg: get_parsed(row, 1)?,
        model: row.get(2)?,
    })
}

/// Fetch a glider by row id.
pub fn get_glider(conn: &Connection, id: i64) -> StoreResult<Glider> {
    conn.query_row(&format!("{SELECT_GLIDER} WHERE id = ?1"), [id], glider_from_row)
        .optional()
        .query_context("select glider")?
        .ok_or_else(|| StoreError::not_found("glider", id))
}

/// Find a glider by registration.
pub fn find_glider_by_reg(conn: &Connection, reg: &Registration) -> StoreResult<Option<Glider>> {
    conn.query_row(
        &format!("{SELECT_GLIDER} WHERE reg = ?1"),
        [reg.as_str()],
        glider_from_row,
    )
    .optional()
    .query_context("select glider by reg")
}

/// Find a glider by registration, creating it when absent.
///
/// `model` must reference an existing glider model; a dangling id fails with a
/// foreign-key [`StoreError::ConstraintViolation`].
pub fn find_or_create_glider(
    conn: &Connection,
    reg: &Registration,
    model: Option<i64>,
) -> StoreResult<Resolved<Glider>> {
    let resolved = find_or_create(
        conn,
        "glider",
        |conn| find_glider_by_reg(conn, reg),
        |conn| {
            conn.execute(
                "INSERT INTO glider (reg, model) VALUES (?1, ?2)",
                rusqlite::params![reg.as_str(), model],
            )
            .query_context("insert glider")?;
            get_glider(conn, conn.last_insert_rowid())
        },
    )?;

    if !resolved.created {
        let differs = model.is_some() && model != resolved.row.model;
        warn_if_differs("glider", reg.as_str(), differs);
    }
    Ok(resolved)
}
