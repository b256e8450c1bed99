//! gl-core - Core library for the gliding ladder store
//!
//! This crate provides the storage-independent vocabulary shared by the
//! repository and its collaborators: validated club / turnpoint codes, glider
//! registrations, the optional ladder identifier type, trace checksums, unit
//! conversion, and the store configuration file.

pub mod checksum;
pub mod club_code;
pub mod config;
pub mod error;
pub mod glider_type;
pub mod ladder_id;
mod newtype_string;
pub mod registration;
pub mod turnpoint_code;
pub mod units;

pub use checksum::{compute_checksum, is_valid_checksum};
pub use club_code::ClubCode;
pub use config::{DanglingReferencePolicy, JournalMode, StoreConfig};
pub use error::{CoreError, CoreResult};
pub use glider_type::GliderType;
pub use ladder_id::LadderId;
pub use registration::Registration;
pub use turnpoint_code::TurnpointCode;
pub use units::feet_to_metres;
