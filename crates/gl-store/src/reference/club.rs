//! Clubs, keyed by their ladder code.

use super::{find_or_create, warn_if_differs, Resolved};
use crate::error::{StoreError, StoreResult, StoreResultExt};
use crate::row_helpers::get_parsed_opt;
use gl_core::ClubCode;
use rusqlite::{Connection, OptionalExtension, Row};

/// A stored club.
#[derive(Debug, Clone, PartialEq)]
pub struct Club {
    pub id: i64,
    pub club_name: Option<String>,
    pub is_university: Option<bool>,
    pub ladder_code: Option<ClubCode>,
}

/// Attributes for a club to find or create.
///
/// Flight listings only carry the club code, while the ladder's club listing
/// carries all three fields, so everything is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewClub {
    pub club_name: Option<String>,
    pub is_university: Option<bool>,
    pub ladder_code: Option<ClubCode>,
}

impl NewClub {
    /// A club known only by its ladder code.
    pub fn with_code(code: ClubCode) -> Self {
        Self {
            ladder_code: Some(code),
            ..Default::default()
        }
    }

    fn differs_from(&self, club: &Club) -> bool {
        let name_differs = self.club_name.is_some() && self.club_name != club.club_name;
        let flag_differs = self.is_university.is_some() && self.is_university != club.is_university;
        name_differs || flag_differs
    }
}

const SELECT_CLUB: &str = "SELECT id, club_name, is_university, ladder_code FROM club";

fn club_from_row(row: &Row<'_>) -> rusqlite::Result<Club> {
    Ok(Club {
        id: row.get(0)?,
        club_name: row.get(1)?,
        is_university: row.get(2)?,
        ladder_code: get_parsed_opt(row, 3)?,
    })
}

/// Fetch a club by row id.
pub fn get_club(conn: &Connection, id: i64) -> StoreResult<Club> {
    conn.query_row(&format!("{SELECT_CLUB} WHERE id = ?1"), [id], club_from_row)
        .optional()
        .query_context("select club")?
        .ok_or_else(|| StoreError::not_found("club", id))
}

/// Find a club by its ladder code.
pub fn find_club_by_code(conn: &Connection, code: &ClubCode) -> StoreResult<Option<Club>> {
    conn.query_row(
        &format!("{SELECT_CLUB} WHERE ladder_code = ?1"),
        [code.as_str()],
        club_from_row,
    )
    .optional()
    .query_context("select club by ladder_code")
}

/// Find a club that has no ladder code by its name.
pub fn find_club_by_name(conn: &Connection, name: &str) -> StoreResult<Option<Club>> {
    conn.query_row(
        &format!("{SELECT_CLUB} WHERE ladder_code IS NULL AND club_name = ?1 ORDER BY id LIMIT 1"),
        [name],
        club_from_row,
    )
    .optional()
    .query_context("select club by name")
}

/// Find a club by ladder code (or by name when no code is given), creating it
/// when absent. An existing club is never renamed.
///
/// Only the ladder code is backed by a unique constraint. Run inside an
/// immediate transaction (see [`crate::LadderDb::find_or_create_club`]) so
/// two writers cannot both create the same club by name.
pub fn find_or_create_club(conn: &Connection, new: &NewClub) -> StoreResult<Resolved<Club>> {
    let key = match (&new.ladder_code, &new.club_name) {
        (Some(code), _) => code.to_string(),
        (None, Some(name)) => name.clone(),
        (None, None) => {
            return Err(StoreError::InvalidInput(
                "club needs a ladder code or a name".to_string(),
            ))
        }
    };

    let resolved = find_or_create(
        conn,
        "club",
        |conn| match &new.ladder_code {
            Some(code) => find_club_by_code(conn, code),
            None => find_club_by_name(conn, &key),
        },
        |conn| insert_club(conn, new),
    )?;

    if !resolved.created {
        warn_if_differs("club", &key, new.differs_from(&resolved.row));
    }
    Ok(resolved)
}

fn insert_club(conn: &Connection, new: &NewClub) -> StoreResult<Club> {
    conn.execute(
        "INSERT INTO club (club_name, is_university, ladder_code) VALUES (?1, ?2, ?3)",
        rusqlite::params![
            new.club_name,
            new.is_university,
            new.ladder_code.as_ref().map(ClubCode::as_str),
        ],
    )
    .query_context("insert club")?;
    get_club(conn, conn.last_insert_rowid())
}
