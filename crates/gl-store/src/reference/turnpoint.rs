//! Turnpoints, keyed by their 3-character code.

use super::{find_or_create, warn_if_differs, Resolved};
use crate::error::{StoreError, StoreResult, StoreResultExt};
use crate::row_helpers::get_parsed;
use gl_core::TurnpointCode;
use rusqlite::{Connection, OptionalExtension, Row};

#[derive(Debug, Clone, PartialEq)]
pub struct Turnpoint {
    pub id: i64,
    pub code: TurnpointCode,
    pub lat: f64,
    pub lon: f64,
    pub height_amsl: Option<f64>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTurnpoint {
    pub code: TurnpointCode,
    pub lat: f64,
    pub lon: f64,
    pub height_amsl: Option<f64>,
    pub description: Option<String>,
}

impl NewTurnpoint {
    fn differs_from(&self, tp: &Turnpoint) -> bool {
        self.lat != tp.lat
            || self.lon != tp.lon
            || (self.height_amsl.is_some() && self.height_amsl != tp.height_amsl)
            || (self.description.is_some() && self.description != tp.description)
    }
}

const SELECT_TURNPOINT: &str =
    "SELECT id, code, lat, lon, height_amsl, description FROM turnpoint";

fn turnpoint_from_row(row: &Row<'_>) -> rusqlite::Result<Turnpoint> {
    Ok(Turnpoint {
        id: row.get(0)?,
        code: get_parsed(row, 1)?,
        lat: row.get(2)?,
        lon: row.get(3)?,
        height_amsl: row.get(4)?,
        description: row.get(5)?,
    })
}

/// Fetch a turnpoint by row id.
pub fn get_turnpoint(conn: &Connection, id: i64) -> StoreResult<Turnpoint> {
    conn.query_row(
        &format!("{SELECT_TURNPOINT} WHERE id = ?1"),
        [id],
        turnpoint_from_row,
    )
    .optional()
    .query_context("select turnpoint")?
    .ok_or_else(|| StoreError::not_found("turnpoint", id))
}

/// Find a turnpoint by code.
pub fn find_turnpoint_by_code(
    conn: &Connection,
    code: &TurnpointCode,
) -> StoreResult<Option<Turnpoint>> {
    conn.query_row(
        &format!("{SELECT_TURNPOINT} WHERE code = ?1"),
        [code.as_str()],
        turnpoint_from_row,
    )
    .optional()
    .query_context("select turnpoint by code")
}

/// Whether a turnpoint with `code` exists.
pub fn turnpoint_exists(conn: &Connection, code: &TurnpointCode) -> StoreResult<bool> {
    conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM turnpoint WHERE code = ?1)",
        [code.as_str()],
        |row| row.get(0),
    )
    .query_context("check turnpoint exists")
}

/// Find a turnpoint by code, creating it when absent.
pub fn find_or_create_turnpoint(
    conn: &Connection,
    new: &NewTurnpoint,
) -> StoreResult<Resolved<Turnpoint>> {
    let resolved = find_or_create(
        conn,
        "turnpoint",
        |conn| find_turnpoint_by_code(conn, &new.code),
        |conn| {
            conn.execute(
                "INSERT INTO turnpoint (code, lat, lon, height_amsl, description)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    new.code.as_str(),
                    new.lat,
                    new.lon,
                    new.height_amsl,
                    new.description,
                ],
            )
            .query_context("insert turnpoint")?;
            get_turnpoint(conn, conn.last_insert_rowid())
        },
    )?;

    if !resolved.created {
        warn_if_differs("turnpoint", new.code.as_str(), new.differs_from(&resolved.row));
    }
    Ok(resolved)
}
