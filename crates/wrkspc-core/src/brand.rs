//! Branded identifiers.
//!
//! Every identifier that shares a primitive representation with unrelated
//! values gets its own one-field wrapper. `Type::new` is the only constructor;
//! decoding from the wire goes through `Deserialize`. Brands never convert
//! into each other implicitly:
//!
//! ```compile_fail
//! use wrkspc_core::{DatasetId, FilePath};
//!
//! fn load(path: FilePath) -> FilePath { path }
//!
//! let id = DatasetId::new("ds-1");
//! load(id);
//! ```
//!
//! Raw primitives are rejected the same way:
//!
//! ```compile_fail
//! use wrkspc_core::RunId;
//!
//! fn cancel(run: &RunId) -> &str { run.as_str() }
//!
//! cancel(&"run-1");
//! ```
//!
//! Crossing brands takes an explicit, greppable re-wrap:
//!
//! ```
//! use wrkspc_core::{DatasetId, FilePath};
//!
//! let path = FilePath::new("data/users.csv");
//! let id = DatasetId::new(path.as_str());
//! assert_eq!(id.as_str(), "data/users.csv");
//! ```

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

macro_rules! string_brand {
    ($(#[$meta:meta])* $name:ident($inner:ty)) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[repr(transparent)]
        #[serde(transparent)]
        pub struct $name($inner);

        impl $name {
            #[must_use]
            pub fn new(raw: impl Into<$inner>) -> Self {
                Self(raw.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

macro_rules! index_brand {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[repr(transparent)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            #[must_use]
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            #[must_use]
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_brand!(
    /// Identifier of a loaded dataset.
    DatasetId(SmolStr)
);

string_brand!(
    /// Workspace path of a source file. Stable for the lifetime of the file reference.
    FilePath(SmolStr)
);

string_brand!(
    /// Content hash computed by the dataset loader. Never recomputed here.
    ContentHash(SmolStr)
);

string_brand!(
    /// Identifier of a test run.
    RunId(SmolStr)
);

string_brand!(
    /// Correlation id embedded in request-shaped messages and echoed by replies.
    RequestId(SmolStr)
);

string_brand!(
    /// Standard base64 text. Built from bytes with [`Base64Content::encode`].
    Base64Content(String)
);

index_brand!(
    /// Byte offset into a source file.
    ByteOffset
);

index_brand!(
    /// Zero-based column position inside a dataset header.
    ColumnIndex
);

index_brand!(
    /// Zero-based data row inside a dataset, not counting the header.
    RowIndex
);

impl FilePath {
    /// Last path component, accepting both separators.
    #[must_use]
    pub fn file_name(&self) -> &str {
        let raw = self.as_str();
        raw.rsplit(['/', '\\']).next().unwrap_or(raw)
    }
}

impl Base64Content {
    #[must_use]
    pub fn encode(bytes: &[u8]) -> Self {
        Self(STANDARD.encode(bytes))
    }

    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(self.0.as_bytes())
    }

    /// Length of the encoded text.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brands_compare_by_underlying_value() {
        assert_eq!(RunId::new("run-7"), RunId::new(String::from("run-7")));
        assert_ne!(RunId::new("run-7"), RunId::new("run-8"));
        assert_eq!(ByteOffset::new(3), ByteOffset::new(3));
    }

    #[test]
    fn brands_serialize_as_their_primitive() {
        let id = serde_json::to_value(DatasetId::new("ds-1")).unwrap();
        assert_eq!(id, serde_json::json!("ds-1"));
        let offset = serde_json::to_value(ByteOffset::new(42)).unwrap();
        assert_eq!(offset, serde_json::json!(42));

        let back: FilePath = serde_json::from_value(serde_json::json!("a/b.csv")).unwrap();
        assert_eq!(back, FilePath::new("a/b.csv"));
    }

    #[test]
    fn file_name_handles_both_separators() {
        assert_eq!(FilePath::new("data/users.csv").file_name(), "users.csv");
        assert_eq!(FilePath::new(r"C:\data\users.csv").file_name(), "users.csv");
        assert_eq!(FilePath::new("users.csv").file_name(), "users.csv");
    }

    #[test]
    fn base64_content_roundtrips_bytes() {
        let content = Base64Content::encode(b"name,age\nada,36\n");
        assert_eq!(content.as_str(), "bmFtZSxhZ2UKYWRhLDM2Cg==");
        assert_eq!(content.decode().unwrap(), b"name,age\nada,36\n");
    }

    #[test]
    fn base64_content_reports_invalid_text() {
        let content = Base64Content::new("not base64!");
        assert!(content.decode().is_err());
    }
}
