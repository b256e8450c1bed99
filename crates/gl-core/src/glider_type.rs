//! Strongly-typed glider model name.

use crate::newtype_string::{check_non_empty, define_newtype_string};

define_newtype_string! {
    /// A glider model name (e.g. `LS8-18`), the natural key of a glider model.
    pub struct GliderType;
    kind = "glider type";
    check = check_non_empty;
}
