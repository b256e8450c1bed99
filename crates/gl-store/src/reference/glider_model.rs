//! Glider models, keyed by model name.

use super::{find_or_create, warn_if_differs, Resolved};
use crate::error::{StoreError, StoreResult, StoreResultExt};
use crate::row_helpers::{get_ladder_id, get_parsed};
use gl_core::{GliderType, LadderId};
use rusqlite::{Connection, OptionalExtension, Row};

/// A stored glider model with its handicap.
#[derive(Debug, Clone, PartialEq)]
pub struct GliderModel {
    pub id: i64,
    pub model_name: GliderType,
    pub seats: Option<i64>,
    pub vintage: Option<bool>,
    pub turbo: Option<bool>,
    pub handicap: Option<f64>,
    pub ladder_id: Option<LadderId>,
}

/// Attributes for a glider model to find or create.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGliderModel {
    pub model_name: GliderType,
    pub seats: Option<i64>,
    pub vintage: Option<bool>,
    pub turbo: Option<bool>,
    pub handicap: Option<f64>,
    pub ladder_id: Option<LadderId>,
}

impl NewGliderModel {
    /// A model known only by name and (optionally) ladder ID, as seen in
    /// flight listings.
    pub fn named(model_name: GliderType, ladder_id: Option<LadderId>) -> Self {
        Self {
            model_name,
            seats: None,
            vintage: None,
            turbo: None,
            handicap: None,
            ladder_id,
        }
    }

    /// Whether a supplied attribute disagrees with the stored row. A ladder ID
    /// offered for a model stored without one counts: it is not written here
    /// and must be linked separately.
    pub(super) fn differs_from(&self, model: &GliderModel) -> bool {
        (self.seats.is_some() && self.seats != model.seats)
            || (self.vintage.is_some() && self.vintage != model.vintage)
            || (self.turbo.is_some() && self.turbo != model.turbo)
            || (self.handicap.is_some() && self.handicap != model.handicap)
            || (self.ladder_id.is_some() && self.ladder_id != model.ladder_id)
    }
}

const SELECT_GLIDER_MODEL: &str =
    "SELECT id, model_name, seats, vintage, turbo, handicap, ladder_id FROM glider_model";

fn glider_model_from_row(row: &Row<'_>) -> rusqlite::Result<GliderModel> {
    Ok(GliderModel {
        id: row.get(0)?,
        model_name: get_parsed(row, 1)?,
        seats: row.get(2)?,
        vintage: row.get(3)?,
        turbo: row.get(4)?,
        handicap: row.get(5)?,
        ladder_id: get_ladder_id(row, 6)?,
    })
}

/// Fetch a glider model by row id.
pub fn get_glider_model(conn: &Connection, id: i64) -> StoreResult<GliderModel> {
    conn.query_row(
        &format!("{SELECT_GLIDER_MODEL} WHERE id = ?1"),
        [id],
        glider_model_from_row,
    )
    .optional()
    .query_context("select glider_model")?
    .ok_or_else(|| StoreError::not_found("glider model", id))
}

/// Find a glider model by name.
pub fn find_glider_model_by_name(
    conn: &Connection,
    model_name: &GliderType,
) -> StoreResult<Option<GliderModel>> {
    conn.query_row(
        &format!("{SELECT_GLIDER_MODEL} WHERE model_name = ?1"),
        [model_name.as_str()],
        glider_model_from_row,
    )
    .optional()
    .query_context("select glider_model by name")
}

/// Find a glider model by ladder ID.
pub fn find_glider_model_by_ladder_id(
    conn: &Connection,
    ladder_id: LadderId,
) -> StoreResult<Option<GliderModel>> {
    conn.query_row(
        &format!("{SELECT_GLIDER_MODEL} WHERE ladder_id = ?1"),
        [ladder_id.get()],
        glider_model_from_row,
    )
    .optional()
    .query_context("select glider_model by ladder_id")
}

/// Find a glider model by name, creating it when absent.
///
/// A stored model keeps its ladder ID; a null one is not back-filled here
/// (use [`crate::external_id::link_ladder_id`]).
pub fn find_or_create_glider_model(
    conn: &Connection,
    new: &NewGliderModel,
) -> StoreResult<Resolved<GliderModel>> {
    let resolved = find_or_create(
        conn,
        "glider model",
        |conn| find_glider_model_by_name(conn, &new.model_name),
        |conn| insert_glider_model(conn, new),
    )?;

    if !resolved.created {
        warn_if_differs(
            "glider model",
            new.model_name.as_str(),
            new.differs_from(&resolved.row),
        );
    }
    Ok(resolved)
}

fn insert_glider_model(conn: &Connection, new: &NewGliderModel) -> StoreResult<GliderModel> {
    conn.execute(
        "INSERT INTO glider_model (model_name, seats, vintage, turbo, handicap, ladder_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            new.model_name.as_str(),
            new.seats,
            new.vintage,
            new.turbo,
            new.handicap,
            new.ladder_id.map(LadderId::get),
        ],
    )
    .query_context("insert glider_model")?;
    get_glider_model(conn, conn.last_insert_rowid())
}
