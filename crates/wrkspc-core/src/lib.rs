//! Shared value types for the wrkspc extension host and its webview.
//!
//! - brand: nominal wrappers around primitive identifiers
//! - versioned: `version`-tagged entities and family decoding
//! - auth/settings/dataset/editor: domain values carried across the boundary
//! - state: the synchronized webview state and its persisted versions

pub mod auth;
pub mod brand;
pub mod dataset;
pub mod editor;
pub mod settings;
pub mod state;
pub mod versioned;

pub use auth::AuthGateway;
pub use brand::{
    Base64Content, ByteOffset, ColumnIndex, ContentHash, DatasetId, FilePath, RequestId, RowIndex,
    RunId,
};
pub use dataset::{CsvSettings, DatasetEntry, DatasetMeta};
pub use editor::{Cursor, EditorFile, Span};
pub use settings::Settings;
pub use state::{DatasetSlice, PersistedState, Slice, WebviewState, WebviewStateV1};
pub use versioned::{read_version, VersionError, VersionTag, Versioned, VersionedFamily};
