//! Batch prefill of reference data from ladder listings.
//!
//! Each function runs find-or-create for every row it is given. All functions
//! take `&Connection` so callers can wrap a whole listing in a single
//! transaction via `LadderDb::transaction`.

use crate::error::StoreResult;
use crate::reference::club::find_or_create_club;
use crate::reference::glider_model::find_or_create_glider_model;
use crate::reference::launch_point::find_or_create_launch_point;
use crate::reference::pilot::find_or_create_pilot;
use crate::reference::turnpoint::find_or_create_turnpoint;
use crate::reference::{NewClub, NewGliderModel, NewLaunchPoint, NewPilot, NewTurnpoint, Resolved};
use gl_core::DanglingReferencePolicy;
use rusqlite::Connection;

/// Rows created versus rows that were already present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrefillSummary {
    pub created: usize,
    pub existing: usize,
}

impl PrefillSummary {
    fn record<T>(&mut self, resolved: &Resolved<T>) {
        if resolved.created {
            self.created += 1;
        } else {
            self.existing += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.created + self.existing
    }
}

fn prefill<T, R>(
    entity: &'static str,
    rows: &[T],
    mut resolve: impl FnMut(&T) -> StoreResult<Resolved<R>>,
) -> StoreResult<PrefillSummary> {
    let mut summary = PrefillSummary::default();
    for row in rows {
        summary.record(&resolve(row)?);
    }
    log::debug!(
        "Prefilled {entity}: {} created, {} existing",
        summary.created,
        summary.existing
    );
    Ok(summary)
}

/// Insert the ladder's glider list.
pub fn prefill_glider_models(
    conn: &Connection,
    models: &[NewGliderModel],
) -> StoreResult<PrefillSummary> {
    prefill("glider models", models, |m| find_or_create_glider_model(conn, m))
}

/// Insert the ladder's club list.
pub fn prefill_clubs(conn: &Connection, clubs: &[NewClub]) -> StoreResult<PrefillSummary> {
    prefill("clubs", clubs, |c| find_or_create_club(conn, c))
}

/// Insert the ladder's launch point list. Prefill clubs first so the launch
/// points' club codes resolve.
pub fn prefill_launch_points(
    conn: &Connection,
    policy: DanglingReferencePolicy,
    launch_points: &[NewLaunchPoint],
) -> StoreResult<PrefillSummary> {
    prefill("launch points", launch_points, |lp| {
        find_or_create_launch_point(conn, policy, lp)
    })
}

/// Insert the ladder's active pilot list.
pub fn prefill_pilots(conn: &Connection, pilots: &[NewPilot]) -> StoreResult<PrefillSummary> {
    prefill("pilots", pilots, |p| find_or_create_pilot(conn, p))
}

/// Insert a turnpoint list.
pub fn prefill_turnpoints(
    conn: &Connection,
    turnpoints: &[NewTurnpoint],
) -> StoreResult<PrefillSummary> {
    prefill("turnpoints", turnpoints, |tp| find_or_create_turnpoint(conn, tp))
}

#[cfg(test)]
#[path = "populate_test.rs"]
mod populate_tests;
