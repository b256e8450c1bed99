//! Repository for gliding ladder results.
//!
//! Provides a SQLite-backed store for clubs, pilots, gliders, launch points,
//! turnpoints, flight traces, tasks, and scored flights. The relational
//! schema is the contract shared with importers, scoring engines, and the
//! ladder-correlation process; this crate owns the schema, its invariants,
//! and the find-or-create / dedup operations those collaborators rely on.
//!
//! Entity functions take `&Connection` so callers can group them in a single
//! transaction via [`LadderDb::transaction`]. The methods on [`LadderDb`]
//! wrap each logical change in its own transaction.

pub mod connection;
pub mod ddl;
pub mod error;
pub mod external_id;
pub mod flight;
pub mod migration;
pub mod populate;
pub mod query;
pub mod reference;
pub mod repository;
pub(crate) mod row_helpers;
pub mod task;
pub mod trace;

pub use connection::LadderDb;
pub use error::{ConstraintKind, StoreError, StoreResult};
pub use external_id::{ExternalColumn, LadderTable};
pub use flight::{Flight, FlightFlags, FlightLinks, NewFlight, ScoringFields};
pub use reference::Resolved;
pub use task::TaskId;
pub use trace::Trace;
