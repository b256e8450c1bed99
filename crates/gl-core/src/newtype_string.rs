//! Macro for defining validated string newtypes.
//!
//! Every newtype shares the same set of trait impls (Display, Deref, AsRef,
//! Borrow, TryFrom, PartialEq, Serialize, Deserialize) and differs only in the
//! check applied on construction. The check receives the raw input and returns
//! the normalized form or a reason for rejection.

/// Define a validated string newtype.
///
/// Generates:
/// - The struct with `Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize`
/// - Custom `Deserialize` (runs the check)
/// - `new()` (panics on invalid input), `try_new()` (returns Option),
///   `parse()` (returns [`CoreError::InvalidValue`](crate::CoreError::InvalidValue)),
///   `as_str()`, `into_inner()`
/// - `Display`, `AsRef<str>`, `Deref<Target=str>`, `Borrow<str>`
/// - `TryFrom<String>`, `TryFrom<&str>`, `FromStr`
/// - `PartialEq<str>`, `PartialEq<&str>`, `PartialEq<String>`
macro_rules! define_newtype_string {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident;
        kind = $kind:literal;
        check = $check:path;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
        #[serde(transparent)]
        $vis struct $Name(String);

        impl<'de> serde::Deserialize<'de> for $Name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                $Name::parse(s).map_err(serde::de::Error::custom)
            }
        }

        impl $Name {
            /// Create a new instance, panicking if the value fails validation.
            ///
            /// Prefer [`parse`](Self::parse) when handling untrusted input.
            pub fn new(value: impl Into<String>) -> Self {
                match Self::parse(value) {
                    Ok(v) => v,
                    Err(e) => panic!("{e}"),
                }
            }

            /// Try to create a new instance, returning `None` if validation fails.
            pub fn try_new(value: impl Into<String>) -> Option<Self> {
                Self::parse(value).ok()
            }

            /// Validate and normalize `value`.
            pub fn parse(value: impl Into<String>) -> $crate::error::CoreResult<Self> {
                let raw = value.into();
                match $check(&raw) {
                    Ok(normalized) => Ok(Self(normalized)),
                    Err(reason) => Err($crate::error::CoreError::InvalidValue {
                        kind: $kind,
                        value: raw,
                        reason,
                    }),
                }
            }

            /// Return the underlying value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the inner `String`.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $Name {
            fn as_ref(&self) -> &str { &self.0 }
        }

        impl std::ops::Deref for $Name {
            type Target = str;
            fn deref(&self) -> &str { &self.0 }
        }

        impl std::borrow::Borrow<str> for $Name {
            fn borrow(&self) -> &str { &self.0 }
        }

        impl std::str::FromStr for $Name {
            type Err = $crate::error::CoreError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $Name {
            type Error = $crate::error::CoreError;
            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::parse(s)
            }
        }

        impl TryFrom<&str> for $Name {
            type Error = $crate::error::CoreError;
            fn try_from(s: &str) -> Result<Self, Self::Error> {
                Self::parse(s)
            }
        }

        impl PartialEq<str> for $Name {
            fn eq(&self, other: &str) -> bool { self.0 == other }
        }

        impl PartialEq<&str> for $Name {
            fn eq(&self, other: &&str) -> bool { self.0 == *other }
        }

        impl PartialEq<String> for $Name {
            fn eq(&self, other: &String) -> bool { self.0 == *other }
        }
    };
}

pub(crate) use define_newtype_string;

/// Length of ladder club codes and turnpoint codes.
pub(crate) const CODE_LEN: usize = 3;

/// Check for 3-character ladder codes. Codes are stored upper-case.
pub(crate) fn check_code(raw: &str) -> Result<String, &'static str> {
    let trimmed = raw.trim();
    if trimmed.len() != CODE_LEN {
        return Err("must be exactly 3 characters");
    }
    if !trimmed.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err("must contain only ASCII letters and digits");
    }
    Ok(trimmed.to_ascii_uppercase())
}

/// Check for free-form names: surrounding whitespace is dropped, empty is rejected.
pub(crate) fn check_non_empty(raw: &str) -> Result<String, &'static str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err("must not be empty")
    } else {
        Ok(trimmed.to_string())
    }
}
