//! Read helpers for the ladder-correlation and scoring collaborators.
//!
//! - [`unlinked`] - rows still lacking an external identifier
//! - [`adhoc`] - table listing and row counts

pub mod adhoc;
pub mod unlinked;

pub use adhoc::{list_tables, table_row_count};
pub use unlinked::{count_unlinked, unlinked_rows};
