//! Strongly-typed ladder club code.

use crate::newtype_string::{check_code, define_newtype_string};

define_newtype_string! {
    /// The ladder's 3-character club code (e.g. `CAM`), stored upper-case.
    pub struct ClubCode;
    kind = "club code";
    check = check_code;
}
