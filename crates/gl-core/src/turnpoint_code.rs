//! Strongly-typed turnpoint code.

use crate::newtype_string::{check_code, define_newtype_string};

define_newtype_string! {
    /// A 3-character turnpoint code, the natural key of a turnpoint.
    pub struct TurnpointCode;
    kind = "turnpoint code";
    check = check_code;
}

impl TurnpointCode {
    /// Parse an ordered list of codes, failing on the first invalid one.
    pub fn parse_all<I, S>(codes: I) -> crate::error::CoreResult<Vec<TurnpointCode>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        codes.into_iter().map(TurnpointCode::parse).collect()
    }
}
