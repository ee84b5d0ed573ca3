/// Validated newtype wrappers for record identifiers and rule-table paths.
///
/// Each newtype enforces its shape at construction time via [`TryFrom<&str>`].
/// Once constructed, the inner value is immutable (no `DerefMut`). Serde
/// `Deserialize` impls re-run validation so a malformed identifier is rejected
/// at the deserialization boundary instead of reaching the evaluators.
use std::fmt;
use std::ops::Deref;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced when constructing a validated newtype from an invalid string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewtypeError {
    /// The string did not match the expected format.
    InvalidFormat {
        /// Name of the type that rejected the input.
        type_name: &'static str,
        /// A human-readable description of the expected format.
        expected: &'static str,
        /// The input that was rejected.
        got: String,
    },
}

impl fmt::Display for NewtypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat {
                type_name,
                expected,
                got,
            } => write!(f, "invalid {type_name}: expected {expected}, got {got:?}"),
        }
    }
}

impl std::error::Error for NewtypeError {}

// ---------------------------------------------------------------------------
// Regex statics
// ---------------------------------------------------------------------------

/// One or more dot-separated segments of ASCII letters, digits, `_` or `-`.
static FIELD_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+(\.[A-Za-z0-9_-]+)*$")
        .unwrap_or_else(|_| unreachable!("field path pattern is a valid regex"))
});

// ---------------------------------------------------------------------------
// Non-empty string identifiers
// ---------------------------------------------------------------------------

/// Declares a string identifier newtype whose only constraint is non-emptiness.
///
/// All of the identifiers the engine receives are opaque keys minted by the
/// persistence layer; the engine compares them but never interprets them.
macro_rules! non_empty_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl TryFrom<&str> for $name {
            type Error = NewtypeError;

            fn try_from(s: &str) -> Result<Self, Self::Error> {
                if s.trim().is_empty() {
                    Err(NewtypeError::InvalidFormat {
                        type_name: stringify!($name),
                        expected: "non-empty string",
                        got: s.to_owned(),
                    })
                } else {
                    Ok(Self(s.to_owned()))
                }
            }
        }

        impl Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                s.serialize_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                let s = String::deserialize(d)?;
                Self::try_from(s.as_str()).map_err(de::Error::custom)
            }
        }
    };
}

non_empty_id!(
    /// Identifier of a subject record (the student/case the record describes).
    ///
    /// Consent records refer to their subject by the same identifier.
    RecordId
);

non_empty_id!(
    /// Identifier of the tenant (organisation) that owns a record.
    TenantId
);

non_empty_id!(
    /// Identifier of a single section within a report document.
    SectionId
);

// ---------------------------------------------------------------------------
// FieldPath
// ---------------------------------------------------------------------------

/// A dot-separated path addressing a field inside a subject record's sections.
///
/// `careHistory` addresses a whole section; `identity.nationalId` addresses a
/// single field inside the `identity` section. Segments address object keys
/// only; array elements are not addressable.
///
/// Validated against `^[A-Za-z0-9_-]+(\.[A-Za-z0-9_-]+)*$`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath(String);

impl TryFrom<&str> for FieldPath {
    type Error = NewtypeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        if FIELD_PATH_RE.is_match(s) {
            Ok(Self(s.to_owned()))
        } else {
            Err(NewtypeError::InvalidFormat {
                type_name: "FieldPath",
                expected: "dot-separated segments of [A-Za-z0-9_-] (e.g. identity.nationalId)",
                got: s.to_owned(),
            })
        }
    }
}

impl FieldPath {
    /// Returns the path segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Returns the first segment, i.e. the top-level section the path lives in.
    pub fn section(&self) -> &str {
        self.0.split('.').next().unwrap_or(self.0.as_str())
    }

    /// Returns the number of segments in the path.
    pub fn depth(&self) -> usize {
        self.0.split('.').count()
    }
}

impl Deref for FieldPath {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Self::try_from(s.as_str()).map_err(de::Error::custom)
    }
}
