//! Strongly-typed glider registration.

use crate::newtype_string::{check_non_empty, define_newtype_string};

define_newtype_string! {
    /// A glider registration or competition number as reported to the ladder.
    pub struct Registration;
    kind = "glider registration";
    check = check_non_empty;
}
