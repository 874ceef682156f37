//! Version-tagged entities.
//!
//! A versioned record carries `version: V` as a literal. [`VersionTag`] is the
//! zero-sized field that pins the literal: it serializes as `V` and refuses
//! any other number on read. A family of versions is an enum implementing
//! [`VersionedFamily`]; [`decode_family`] reads the tag first and only then
//! interprets the rest of the record with the matching shape. There is no
//! implicit migration; each old version provides an explicit upgrade.

use std::fmt;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Name of the version field on every versioned record.
pub const VERSION_FIELD: &str = "version";

/// A record shape pinned to one version number.
pub trait Versioned {
    const VERSION: u32;
}

/// A closed set of versions of one entity.
pub trait VersionedFamily: Sized {
    /// Family name used in diagnostics.
    const FAMILY: &'static str;

    /// Interpret `value` as the shape of `version`. Unknown versions must be rejected.
    fn from_version(version: u32, value: Value) -> Result<Self, VersionError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// Record has no version field.
    #[error("missing `version` field")]
    Missing,

    /// Version field is not an unsigned 32-bit number.
    #[error("`version` field is not a version number")]
    NotANumber,

    /// Version is not part of the family.
    #[error("unknown {family} version {found}")]
    Unknown { family: &'static str, found: u32 },

    /// Known version, but the record does not match its shape.
    #[error("invalid {family} v{version}: {reason}")]
    Shape {
        family: &'static str,
        version: u32,
        reason: String,
    },
}

/// Literal version marker. `VersionTag<2>` only ever holds the number 2.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VersionTag<const V: u32>;

impl<const V: u32> VersionTag<V> {
    #[must_use]
    pub const fn get(self) -> u32 {
        V
    }
}

impl<const V: u32> fmt::Debug for VersionTag<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{V}")
    }
}

impl<const V: u32> Serialize for VersionTag<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(V)
    }
}

impl<'de, const V: u32> Deserialize<'de> for VersionTag<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let found = u32::deserialize(deserializer)?;
        if found == V {
            Ok(VersionTag)
        } else {
            Err(D::Error::custom(format_args!(
                "expected version {V}, found {found}"
            )))
        }
    }
}

/// Read the version tag of a record without interpreting anything else.
pub fn read_version(value: &Value) -> Result<u32, VersionError> {
    let raw = value.get(VERSION_FIELD).ok_or(VersionError::Missing)?;
    raw.as_u64()
        .and_then(|version| u32::try_from(version).ok())
        .ok_or(VersionError::NotANumber)
}

/// Decode a family member, branching on the version tag first.
pub fn decode_family<F: VersionedFamily>(value: Value) -> Result<F, VersionError> {
    let version = read_version(&value)?;
    F::from_version(version, value)
}

/// Decode `value` with the shape of one known version.
pub fn decode_shape<T: DeserializeOwned>(
    family: &'static str,
    version: u32,
    value: Value,
) -> Result<T, VersionError> {
    serde_json::from_value(value).map_err(|err| VersionError::Shape {
        family,
        version,
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Tagged {
        version: VersionTag<3>,
        name: String,
    }

    #[test]
    fn tag_serializes_as_literal() {
        let value = serde_json::to_value(Tagged {
            version: VersionTag,
            name: "x".into(),
        })
        .unwrap();
        assert_eq!(value, json!({ "version": 3, "name": "x" }));
    }

    #[test]
    fn tag_rejects_other_numbers() {
        let err = serde_json::from_value::<Tagged>(json!({ "version": 4, "name": "x" }))
            .unwrap_err()
            .to_string();
        assert!(err.contains("expected version 3, found 4"), "{err}");
    }

    #[test]
    fn read_version_distinguishes_missing_and_malformed() {
        assert_eq!(read_version(&json!({ "version": 1 })), Ok(1));
        assert_eq!(read_version(&json!({})), Err(VersionError::Missing));
        assert_eq!(
            read_version(&json!({ "version": "1" })),
            Err(VersionError::NotANumber)
        );
        assert_eq!(
            read_version(&json!({ "version": -1 })),
            Err(VersionError::NotANumber)
        );
        assert_eq!(read_version(&json!(null)), Err(VersionError::Missing));
    }
}
