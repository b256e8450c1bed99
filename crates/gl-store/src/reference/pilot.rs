//! Pilots, keyed by ladder ID.

use super::{find_or_create, warn_if_differs, Resolved};
use crate::error::{StoreError, StoreResult, StoreResultExt};
use crate::row_helpers::get_ladder_id;
use gl_core::LadderId;
use rusqlite::{Connection, OptionalExtension, Row};

/// A stored pilot.
#[derive(Debug, Clone, PartialEq)]
pub struct Pilot {
    pub id: i64,
    pub forename: String,
    pub surname: String,
    pub ladder_id: Option<LadderId>,
}

/// Attributes for a pilot to find or create.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPilot {
    pub forename: String,
    pub surname: String,
    pub ladder_id: Option<LadderId>,
}

impl NewPilot {
    pub fn new(
        forename: impl Into<String>,
        surname: impl Into<String>,
        ladder_id: Option<LadderId>,
    ) -> Self {
        Self {
            forename: forename.into(),
            surname: surname.into(),
            ladder_id,
        }
    }

    fn differs_from(&self, pilot: &Pilot) -> bool {
        self.forename != pilot.forename || self.surname != pilot.surname
    }

    fn full_name(&self) -> String {
        format!("{} {}", self.forename, self.surname)
    }
}

const SELECT_PILOT: &str = "SELECT id, forename, surname, ladder_id FROM pilot";

fn pilot_from_row(row: &Row<'_>) -> rusqlite::Result<Pilot> {
    Ok(Pilot {
        id: row.get(0)?,
        forename: row.get(1)?,
        surname: row.get(2)?,
        ladder_id: get_ladder_id(row, 3)?,
    })
}

/// Fetch a pilot by row id.
pub fn get_pilot(conn: &Connection, id: i64) -> StoreResult<Pilot> {
    conn.query_row(&format!("{SELECT_PILOT} WHERE id = ?1"), [id], pilot_from_row)
        .optional()
        .query_context("select pilot")?
        .ok_or_else(|| StoreError::not_found("pilot", id))
}

/// Find a pilot by ladder ID.
pub fn find_pilot_by_ladder_id(
    conn: &Connection,
    ladder_id: LadderId,
) -> StoreResult<Option<Pilot>> {
    conn.query_row(
        &format!("{SELECT_PILOT} WHERE ladder_id = ?1"),
        [ladder_id.get()],
        pilot_from_row,
    )
    .optional()
    .query_context("select pilot by ladder_id")
}

/// Find a pilot without a ladder ID by name.
pub fn find_pilot_by_name(
    conn: &Connection,
    forename: &str,
    surname: &str,
) -> StoreResult<Option<Pilot>> {
    conn.query_row(
        &format!(
            "{SELECT_PILOT} WHERE ladder_id IS NULL AND forename = ?1 AND surname = ?2 \
             ORDER BY id LIMIT 1"
        ),
        [forename, surname],
        pilot_from_row,
    )
    .optional()
    .query_context("select pilot by name")
}

/// Find a pilot by ladder ID (or by name when no ladder ID is given),
/// creating it when absent.
///
/// Names carry no unique constraint, so a pilot without a ladder ID is only
/// created once when this runs inside an immediate transaction (see
/// [`crate::LadderDb::find_or_create_pilot`]).
pub fn find_or_create_pilot(conn: &Connection, new: &NewPilot) -> StoreResult<Resolved<Pilot>> {
    if new.forename.trim().is_empty() || new.surname.trim().is_empty() {
        return Err(StoreError::InvalidInput(format!(
            "pilot needs a forename and surname, got '{}'",
            new.full_name()
        )));
    }

    let resolved = find_or_create(
        conn,
        "pilot",
        |conn| match new.ladder_id {
            Some(ladder_id) => find_pilot_by_ladder_id(conn, ladder_id),
            None => find_pilot_by_name(conn, &new.forename, &new.surname),
        },
        |conn| insert_pilot(conn, new),
    )?;

    if !resolved.created {
        let key = new
            .ladder_id
            .map_or_else(|| new.full_name(), |id| id.to_string());
        warn_if_differs("pilot", &key, new.differs_from(&resolved.row));
    }
    Ok(resolved)
}

fn insert_pilot(conn: &Connection, new: &NewPilot) -> StoreResult<Pilot> {
    conn.execute(
        "INSERT INTO pilot (forename, surname, ladder_id) VALUES (?1, ?2, ?3)",
        rusqlite::params![new.forename, new.surname, new.ladder_id.map(LadderId::get)],
    )
    .query_context("insert pilot")?;
    get_pilot(conn, conn.last_insert_rowid())
}
