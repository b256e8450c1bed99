//! Flight records: the fact table linking pilot, club, glider, trace, and
//! task with the scoring values supplied by an external scoring engine.

use crate::error::{ConstraintKind, StoreError, StoreResult, StoreResultExt};
use crate::external_id::{link_ladder_id, LadderTable};
use crate::row_helpers::get_ladder_id;
use crate::task::{task_exists, TaskId};
use chrono::NaiveDateTime;
use gl_core::LadderId;
use rusqlite::{Connection, OptionalExtension, Row};

/// References from a flight to other tables. Any of them may still be unknown
/// when a flight is first recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlightLinks {
    pub pilot: Option<i64>,
    pub club: Option<i64>,
    pub glider: Option<i64>,
    pub trace: Option<i64>,
    pub task: Option<TaskId>,
}

/// Boolean classifiers reported with each flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlightFlags {
    pub is_weekend: bool,
    pub is_junior: bool,
    /// Flight qualifies for height points
    pub is_height: bool,
    pub is_two_seater: bool,
    pub is_wooden: bool,
    pub has_engine: bool,
    pub penalty: bool,
}

/// Values computed by the scoring engine. Overwritten as a unit.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoringFields {
    pub speed: Option<f64>,
    pub handicap_speed: Option<f64>,
    pub scoring_distance: Option<f64>,
    pub speed_points: Option<f64>,
    pub height_gain: Option<f64>,
    pub height_points: Option<f64>,
    pub total_points: Option<f64>,
}

/// A flight to record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewFlight {
    pub links: FlightLinks,
    pub flight_date: Option<NaiveDateTime>,
    pub scraped_at: Option<NaiveDateTime>,
    pub flags: FlightFlags,
    pub scoring: ScoringFields,
    pub ladder_id: Option<LadderId>,
}

/// A stored flight.
#[derive(Debug, Clone, PartialEq)]
pub struct Flight {
    pub id: i64,
    pub links: FlightLinks,
    pub flight_date: Option<NaiveDateTime>,
    pub scraped_at: Option<NaiveDateTime>,
    pub flags: FlightFlags,
    pub scoring: ScoringFields,
    pub ladder_id: Option<LadderId>,
}

const SELECT_FLIGHT: &str = "SELECT id, pilot, club, glider, trace, task, flight_date, scraped_at,
        is_weekend, is_junior, is_height, is_two_seater, is_wooden, has_engine, penalty,
        speed, handicap_speed, scoring_distance, speed_points, height_gain, height_points,
        total_points, ladder_id
     FROM flight";

fn flight_from_row(row: &Row<'_>) -> rusqlite::Result<Flight> {
    Ok(Flight {
        id: row.get(0)?,
        links: FlightLinks {
            pilot: row.get(1)?,
            club: row.get(2)?,
            glider: row.get(3)?,
            trace: row.get(4)?,
            task: row.get(5)?,
        },
        flight_date: row.get(6)?,
        scraped_at: row.get(7)?,
        flags: FlightFlags {
            is_weekend: row.get(8)?,
            is_junior: row.get(9)?,
            is_height: row.get(10)?,
            is_two_seater: row.get(11)?,
            is_wooden: row.get(12)?,
            has_engine: row.get(13)?,
            penalty: row.get(14)?,
        },
        scoring: ScoringFields {
            speed: row.get(15)?,
            handicap_speed: row.get(16)?,
            scoring_distance: row.get(17)?,
            speed_points: row.get(18)?,
            height_gain: row.get(19)?,
            height_points: row.get(20)?,
            total_points: row.get(21)?,
        },
        ladder_id: get_ladder_id(row, 22)?,
    })
}

/// Insert a flight.
///
/// Non-null pilot, club, glider, and trace references are enforced by the
/// database; the task reference is checked here because `task.id` is shared
/// by all legs of a task. Either failure is a foreign-key
/// [`StoreError::ConstraintViolation`].
pub fn record_flight(conn: &Connection, new: &NewFlight) -> StoreResult<Flight> {
    if let Some(task_id) = new.links.task {
        if !task_exists(conn, task_id)? {
            return Err(StoreError::ConstraintViolation {
                kind: ConstraintKind::ForeignKey,
                detail: format!("flight.task references undefined task {task_id}"),
            });
        }
    }

    let FlightLinks {
        pilot,
        club,
        glider,
        trace,
        task,
    } = new.links;
    let flags = &new.flags;
    let scoring = &new.scoring;

    conn.execute(
        "INSERT INTO flight (
             pilot, club, glider, trace, task, flight_date, scraped_at,
             is_weekend, is_junior, is_height, is_two_seater, is_wooden, has_engine, penalty,
             speed, handicap_speed, scoring_distance, speed_points, height_gain, height_points,
             total_points, ladder_id
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22)",
        rusqlite::params![
            pilot,
            club,
            glider,
            trace,
            task,
            new.flight_date,
            new.scraped_at,
            flags.is_weekend,
            flags.is_junior,
            flags.is_height,
            flags.is_two_seater,
            flags.is_wooden,
            flags.has_engine,
            flags.penalty,
            scoring.speed,
            scoring.handicap_speed,
            scoring.scoring_distance,
            scoring.speed_points,
            scoring.height_gain,
            scoring.height_points,
            scoring.total_points,
            new.ladder_id.map(LadderId::get),
        ],
    )
    .query_context("insert flight")?;

    let flight = get_flight(conn, conn.last_insert_rowid())?;
    log::debug!(
        "Recorded flight {} (ladder id {:?})",
        flight.id,
        flight.ladder_id
    );
    Ok(flight)
}

/// Fetch a flight by row id.
pub fn get_flight(conn: &Connection, id: i64) -> StoreResult<Flight> {
    conn.query_row(&format!("{SELECT_FLIGHT} WHERE id = ?1"), [id], flight_from_row)
        .optional()
        .query_context("select flight")?
        .ok_or_else(|| StoreError::not_found("flight", id))
}

/// Find a flight by ladder ID, used by importers to skip flights already
/// recorded.
pub fn find_flight_by_ladder_id(
    conn: &Connection,
    ladder_id: LadderId,
) -> StoreResult<Option<Flight>> {
    conn.query_row(
        &format!("{SELECT_FLIGHT} WHERE ladder_id = ?1"),
        [ladder_id.get()],
        flight_from_row,
    )
    .optional()
    .query_context("select flight by ladder_id")
}

/// Flights with `from <= flight_date < to`, oldest first.
pub fn flights_between(
    conn: &Connection,
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> StoreResult<Vec<Flight>> {
    let mut stmt = conn
        .prepare(&format!(
            "{SELECT_FLIGHT} WHERE flight_date >= ?1 AND flight_date < ?2 ORDER BY flight_date, id"
        ))
        .query_context("prepare flights_between")?;

    let flights = stmt
        .query_map(rusqlite::params![from, to], flight_from_row)
        .query_context("query flights_between")?
        .collect::<Result<Vec<_>, _>>()
        .query_context("collect flights_between")?;
    Ok(flights)
}

/// Overwrite the scoring values of a flight. Re-applying the same values
/// leaves the row unchanged.
pub fn update_scoring(conn: &Connection, flight_id: i64, scoring: &ScoringFields) -> StoreResult<()> {
    let updated = conn
        .execute(
            "UPDATE flight SET
                 speed = ?1, handicap_speed = ?2, scoring_distance = ?3, speed_points = ?4,
                 height_gain = ?5, height_points = ?6, total_points = ?7
             WHERE id = ?8",
            rusqlite::params![
                scoring.speed,
                scoring.handicap_speed,
                scoring.scoring_distance,
                scoring.speed_points,
                scoring.height_gain,
                scoring.height_points,
                scoring.total_points,
                flight_id,
            ],
        )
        .query_context("update flight scoring")?;

    if updated == 0 {
        return Err(StoreError::not_found("flight", flight_id));
    }
    Ok(())
}

/// Back-fill the ladder ID of a flight (null -> value once).
pub fn link_flight_ladder_id(
    conn: &Connection,
    flight_id: i64,
    ladder_id: LadderId,
) -> StoreResult<()> {
    link_ladder_id(conn, LadderTable::Flight, flight_id, ladder_id)
}

#[cfg(test)]
#[path = "flight_test.rs"]
mod tests;
