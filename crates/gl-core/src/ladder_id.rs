//! External ladder identifier.
//!
//! Pilots, launch points, glider models and flights each carry an optional
//! ladder ID. The column is nullable and unique among non-null values, so in
//! Rust it is always handled as `Option<LadderId>`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned to an entity by the external ranking service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LadderId(i64);

impl LadderId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for LadderId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<LadderId> for i64 {
    fn from(id: LadderId) -> Self {
        id.0
    }
}

impl fmt::Display for LadderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
