//! Reference data: clubs, pilots, glider models, gliders, launch points, and
//! turnpoints.
//!
//! Each submodule exposes `find_or_create_*`, keyed by the entity's natural
//! key. When the key already exists the stored row wins: differing attributes
//! are logged and ignored, never written over the first ingestion.

pub mod club;
pub mod glider;
pub mod glider_model;
pub mod launch_point;
pub mod pilot;
pub mod turnpoint;

pub use club::{Club, NewClub};
pub use glider::Glider;
pub use glider_model::{GliderModel, NewGliderModel};
pub use launch_point::{LaunchPoint, NewLaunchPoint};
pub use pilot::{NewPilot, Pilot};
pub use turnpoint::{NewTurnpoint, Turnpoint};

use crate::error::{StoreError, StoreResult};
use gl_core::DanglingReferencePolicy;
use rusqlite::Connection;

/// Outcome of a find-or-create call.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub row: T,
    /// `true` when this call inserted the row.
    pub created: bool,
}

impl<T> Resolved<T> {
    pub fn into_row(self) -> T {
        self.row
    }
}

/// Look up by natural key, inserting when absent.
///
/// A unique violation on insert means another writer created the key between
/// the lookup and the insert; the lookup is retried once and the violation is
/// surfaced if the row still cannot be found.
pub(crate) fn find_or_create<T, L, I>(
    conn: &Connection,
    entity: &'static str,
    lookup: L,
    insert: I,
) -> StoreResult<Resolved<T>>
where
    L: Fn(&Connection) -> StoreResult<Option<T>>,
    I: FnOnce(&Connection) -> StoreResult<T>,
{
    if let Some(row) = lookup(conn)? {
        return Ok(Resolved {
            row,
            created: false,
        });
    }

    match insert(conn) {
        Ok(row) => Ok(Resolved { row, created: true }),
        Err(err) if err.is_unique_violation() => {
            log::debug!("{entity} insert lost a race ({err}), retrying as lookup");
            match lookup(conn)? {
                Some(row) => Ok(Resolved {
                    row,
                    created: false,
                }),
                None => Err(err),
            }
        }
        Err(err) => Err(err),
    }
}

/// Apply the dangling-reference policy to a soft reference.
pub(crate) fn check_soft_reference(
    policy: DanglingReferencePolicy,
    reference: &'static str,
    code: &str,
    exists: bool,
) -> StoreResult<()> {
    if exists {
        return Ok(());
    }
    match policy {
        DanglingReferencePolicy::Warn => {
            log::warn!("Dangling {reference} reference '{code}' stored without a matching row");
            Ok(())
        }
        DanglingReferencePolicy::Reject => Err(StoreError::DanglingReference {
            reference,
            code: code.to_string(),
        }),
    }
}

/// Log when a find-or-create hit an existing row whose attributes differ from
/// the ones supplied. The stored row is kept as-is.
pub(crate) fn warn_if_differs(entity: &'static str, key: &str, differs: bool) {
    if differs {
        log::warn!("{entity} '{key}' already exists with different attributes; keeping stored row");
    }
}

#[cfg(test)]
#[path = "reference_test.rs"]
mod tests;
