//! Transactional operations on [`LadderDb`].
//!
//! Each method is one logical change committed atomically: one find-or-create,
//! one trace intern, one whole task definition, or one flight insert/update.
//! Reads run directly against the connection.

use crate::connection::LadderDb;
use crate::error::StoreResult;
use crate::external_id::{self, LadderTable};
use crate::flight::{self, Flight, NewFlight, ScoringFields};
use crate::reference::{
    club, glider, glider_model, launch_point, pilot, turnpoint, Club, Glider, GliderModel,
    LaunchPoint, NewClub, NewGliderModel, NewLaunchPoint, NewPilot, NewTurnpoint, Pilot,
    Resolved, Turnpoint,
};
use crate::task::{self, TaskId};
use crate::trace::{self, Trace};
use chrono::NaiveDateTime;
use gl_core::{ClubCode, LadderId, Registration, TurnpointCode};

impl LadderDb {
    // ── Reference data ─────────────────────────────────────────────────

    pub fn find_or_create_club(&self, new: &NewClub) -> StoreResult<Resolved<Club>> {
        self.transaction(|conn| club::find_or_create_club(conn, new))
    }

    pub fn find_or_create_pilot(&self, new: &NewPilot) -> StoreResult<Resolved<Pilot>> {
        self.transaction(|conn| pilot::find_or_create_pilot(conn, new))
    }

    pub fn find_or_create_glider_model(
        &self,
        new: &NewGliderModel,
    ) -> StoreResult<Resolved<GliderModel>> {
        self.transaction(|conn| glider_model::find_or_create_glider_model(conn, new))
    }

    pub fn find_or_create_glider(
        &self,
        reg: &Registration,
        model: Option<i64>,
    ) -> StoreResult<Resolved<Glider>> {
        self.transaction(|conn| glider::find_or_create_glider(conn, reg, model))
    }

    pub fn find_or_create_launch_point(
        &self,
        new: &NewLaunchPoint,
    ) -> StoreResult<Resolved<LaunchPoint>> {
        let policy = self.dangling_references();
        self.transaction(|conn| launch_point::find_or_create_launch_point(conn, policy, new))
    }

    pub fn find_or_create_turnpoint(&self, new: &NewTurnpoint) -> StoreResult<Resolved<Turnpoint>> {
        self.transaction(|conn| turnpoint::find_or_create_turnpoint(conn, new))
    }

    /// Back-fill a null ladder ID on a pilot, launch point, glider model, or flight.
    pub fn link_ladder_id(
        &self,
        table: LadderTable,
        row_id: i64,
        ladder_id: LadderId,
    ) -> StoreResult<()> {
        self.transaction(|conn| external_id::link_ladder_id(conn, table, row_id, ladder_id))
    }

    /// Back-fill a null ladder code on a club.
    pub fn link_club_code(&self, club_id: i64, code: &ClubCode) -> StoreResult<()> {
        self.transaction(|conn| external_id::link_club_code(conn, club_id, code))
    }

    // ── Trace store ────────────────────────────────────────────────────

    /// Store trace content once, archiving it when an archive is configured.
    pub fn intern_trace(
        &self,
        bytes: &[u8],
        original_filename: &str,
        downloaded_at: NaiveDateTime,
    ) -> StoreResult<Resolved<Trace>> {
        let archive = self.trace_archive();
        self.transaction(|conn| {
            trace::intern_trace(conn, archive, bytes, original_filename, downloaded_at)
        })
    }

    // ── Tasks ──────────────────────────────────────────────────────────

    /// Define all legs of `task_id` atomically.
    pub fn define_task(&self, task_id: TaskId, codes: &[TurnpointCode]) -> StoreResult<()> {
        let policy = self.dangling_references();
        self.transaction(|conn| task::define_task(conn, policy, task_id, codes))
    }

    /// Allocate a task ID and define the task under it atomically.
    pub fn define_new_task(&self, codes: &[TurnpointCode]) -> StoreResult<TaskId> {
        let policy = self.dangling_references();
        self.transaction(|conn| task::define_new_task(conn, policy, codes))
    }

    pub fn get_task(&self, task_id: TaskId) -> StoreResult<Vec<TurnpointCode>> {
        task::get_task(self.conn(), task_id)
    }

    // ── Flights ────────────────────────────────────────────────────────

    pub fn record_flight(&self, new: &NewFlight) -> StoreResult<Flight> {
        self.transaction(|conn| flight::record_flight(conn, new))
    }

    pub fn update_scoring(&self, flight_id: i64, scoring: &ScoringFields) -> StoreResult<()> {
        self.transaction(|conn| flight::update_scoring(conn, flight_id, scoring))
    }

    pub fn link_flight_ladder_id(&self, flight_id: i64, ladder_id: LadderId) -> StoreResult<()> {
        self.transaction(|conn| flight::link_flight_ladder_id(conn, flight_id, ladder_id))
    }

    pub fn get_flight(&self, flight_id: i64) -> StoreResult<Flight> {
        flight::get_flight(self.conn(), flight_id)
    }
}

#[cfg(test)]
#[path = "repository_test.rs"]
mod tests;
