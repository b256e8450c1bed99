//! Launch points (gliding sites), keyed by ladder ID.

use super::club::find_club_by_code;
use super::{check_soft_reference, find_or_create, warn_if_differs, Resolved};
use crate::error::{StoreError, StoreResult, StoreResultExt};
use crate::row_helpers::{get_ladder_id, get_parsed_opt};
use gl_core::{ClubCode, DanglingReferencePolicy, LadderId};
use rusqlite::{Connection, OptionalExtension, Row};

/// A stored launch point. `height_amsl` is in metres.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchPoint {
    pub id: i64,
    pub site_name: String,
    pub lat: f64,
    pub lon: f64,
    pub height_amsl: Option<f64>,
    pub ladder_id: Option<LadderId>,
    /// Soft reference to `club.ladder_code`.
    pub club_ladder_code: Option<ClubCode>,
}

/// Attributes for a launch point to find or create. `height_amsl` is in
/// metres; the ladder publishes feet, see [`gl_core::feet_to_metres`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewLaunchPoint {
    pub site_name: String,
    pub lat: f64,
    pub lon: f64,
    pub height_amsl: Option<f64>,
    pub ladder_id: Option<LadderId>,
    pub club_ladder_code: Option<ClubCode>,
}

impl NewLaunchPoint {
    fn differs_from(&self, lp: &LaunchPoint) -> bool {
        self.site_name != lp.site_name
            || self.lat != lp.lat
            || self.lon != lp.lon
            || (self.club_ladder_code.is_some() && self.club_ladder_code != lp.club_ladder_code)
    }
}

const SELECT_LAUNCH_POINT: &str =
    "SELECT id, site_name, lat, lon, height_amsl, ladder_id, club_ladder_code FROM launch_point";

fn launch_point_from_row(row: &Row<'_>) -> rusqlite::Result<LaunchPoint> {
    Ok(LaunchPoint {
        id: row.get(0)?,
        site_name: row.get(1)?,
        lat: row.get(2)?,
        lon: row.get(3)?,
        height_amsl: row.get(4)?,
        ladder_id: get_ladder_id(row, 5)?,
        club_ladder_code: get_parsed_opt(row, 6)?,
    })
}

/// Fetch a launch point by row id.
pub fn get_launch_point(conn: &Connection, id: i64) -> StoreResult<LaunchPoint> {
    conn.query_row(
        &format!("{SELECT_LAUNCH_POINT} WHERE id = ?1"),
        [id],
        launch_point_from_row,
    )
    .optional()
    .query_context("select launch_point")?
    .ok_or_else(|| StoreError::not_found("launch point", id))
}

pub fn find_launch_point_by_ladder_id(
    conn: &Connection,
    ladder_id: LadderId,
) -> StoreResult<Option<LaunchPoint>> {
    conn.query_row(
        &format!("{SELECT_LAUNCH_POINT} WHERE ladder_id = ?1"),
        [ladder_id.get()],
        launch_point_from_row,
    )
    .optional()
    .query_context("select launch_point by ladder_id")
}

/// Find a launch point without a ladder ID by site name.
pub fn find_launch_point_by_site(
    conn: &Connection,
    site_name: &str,
) -> StoreResult<Option<LaunchPoint>> {
    conn.query_row(
        &format!("{SELECT_LAUNCH_POINT} WHERE ladder_id IS NULL AND site_name = ?1 ORDER BY id LIMIT 1"),
        [site_name],
        launch_point_from_row,
    )
    .optional()
    .query_context("select launch_point by site_name")
}

/// Find a launch point by ladder ID (or by site name when no ladder ID is
/// given), creating it when absent.
///
/// The owning club's code is checked against `club.ladder_code` before
/// insert and handled according to `policy` when no such club exists.
///
/// Site names are not unique in the schema. Run inside an immediate
/// transaction (see [`crate::LadderDb::find_or_create_launch_point`]) so a
/// launch point without a ladder ID is created once.
pub fn find_or_create_launch_point(
    conn: &Connection,
    policy: DanglingReferencePolicy,
    new: &NewLaunchPoint,
) -> StoreResult<Resolved<LaunchPoint>> {
    if new.site_name.trim().is_empty() {
        return Err(StoreError::InvalidInput(
            "launch point needs a site name".to_string(),
        ));
    }

    let resolved = find_or_create(
        conn,
        "launch point",
        |conn| match new.ladder_id {
            Some(ladder_id) => find_launch_point_by_ladder_id(conn, ladder_id),
            None => find_launch_point_by_site(conn, &new.site_name),
        },
        |conn| {
            if let Some(code) = &new.club_ladder_code {
                let exists = find_club_by_code(conn, code)?.is_some();
                check_soft_reference(policy, "launch point club", code.as_str(), exists)?;
            }
            insert_launch_point(conn, new)
        },
    )?;

    if !resolved.created {
        warn_if_differs("launch point", &new.site_name, new.differs_from(&resolved.row));
    }
    Ok(resolved)
}

fn insert_launch_point(conn: &Connection, new: &NewLaunchPoint) -> StoreResult<LaunchPoint> {
    conn.execute(
        "INSERT INTO launch_point (site_name, lat, lon, height_amsl, ladder_id, club_ladder_code)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            new.site_name,
            new.lat,
            new.lon,
            new.height_amsl,
            new.ladder_id.map(LadderId::get),
            new.club_ladder_code.as_ref().map(ClubCode::as_str),
        ],
    )
    .query_context("insert launch_point")?;
    get_launch_point(conn, conn.last_insert_rowid())
}
