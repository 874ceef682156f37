//! Synchronized webview state.
//!
//! The state is one object made of independently optional slices. A missing
//! slice always means "default for that slice". What the webview persisted
//! may come from an older build, so reads go through [`PersistedState`],
//! which branches on the version tag and upgrades explicitly.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::AuthGateway;
use crate::brand::{FilePath, RunId};
use crate::dataset::{DatasetEntry, DatasetMeta};
use crate::settings::Settings;
use crate::versioned::{decode_shape, VersionError, VersionTag, Versioned, VersionedFamily};

/// Datasets keyed by the file they were loaded from.
pub type DatasetSlice = BTreeMap<FilePath, DatasetEntry>;

/// Named slices of [`WebviewState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slice {
    Auth,
    Settings,
    Datasets,
    Run,
}

impl Slice {
    pub const ALL: [Slice; 4] = [Slice::Auth, Slice::Settings, Slice::Datasets, Slice::Run];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Slice::Auth => "auth",
            Slice::Settings => "settings",
            Slice::Datasets => "datasets",
            Slice::Run => "runId",
        }
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current state shape (version 2).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebviewState {
    pub version: VersionTag<2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthGateway>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
    #[serde(default)]
    pub datasets: DatasetSlice,
    /// Active test run; `null` when none is running.
    #[serde(default)]
    pub run_id: Option<RunId>,
}

impl Versioned for WebviewState {
    const VERSION: u32 = 2;
}

impl WebviewState {
    /// Fresh session state: every slice at its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings slice, or defaults when absent.
    #[must_use]
    pub fn settings_or_default(&self) -> Settings {
        self.settings.clone().unwrap_or_default()
    }

    /// Slices whose value differs between `self` and `other`.
    #[must_use]
    pub fn changed_slices(&self, other: &WebviewState) -> Vec<Slice> {
        Slice::ALL
            .into_iter()
            .filter(|slice| match slice {
                Slice::Auth => self.auth != other.auth,
                Slice::Settings => self.settings != other.settings,
                Slice::Datasets => self.datasets != other.datasets,
                Slice::Run => self.run_id != other.run_id,
            })
            .collect()
    }
}

/// State persisted by builds that predate dataset content.
///
/// Datasets were stored as bare metadata under `csvs`, and the run slice was
/// named `testRunId`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebviewStateV1 {
    pub version: VersionTag<1>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthGateway>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
    #[serde(default)]
    pub csvs: BTreeMap<FilePath, DatasetMeta>,
    #[serde(default)]
    pub test_run_id: Option<RunId>,
}

impl Versioned for WebviewStateV1 {
    const VERSION: u32 = 1;
}

impl WebviewStateV1 {
    #[must_use]
    pub fn upgrade(self) -> WebviewState {
        WebviewState {
            version: VersionTag,
            auth: self.auth,
            settings: self.settings,
            datasets: self
                .csvs
                .into_iter()
                .map(|(path, meta)| (path, DatasetEntry::new(meta)))
                .collect(),
            run_id: self.test_run_id,
        }
    }
}

/// Every state version a webview may have persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PersistedState {
    V1(WebviewStateV1),
    V2(WebviewState),
}

impl VersionedFamily for PersistedState {
    const FAMILY: &'static str = "WebviewState";

    fn from_version(version: u32, value: Value) -> Result<Self, VersionError> {
        match version {
            WebviewStateV1::VERSION => {
                decode_shape(Self::FAMILY, version, value).map(PersistedState::V1)
            }
            WebviewState::VERSION => {
                decode_shape(Self::FAMILY, version, value).map(PersistedState::V2)
            }
            found => Err(VersionError::Unknown {
                family: Self::FAMILY,
                found,
            }),
        }
    }
}

impl PersistedState {
    #[must_use]
    pub fn version(&self) -> u32 {
        match self {
            PersistedState::V1(_) => WebviewStateV1::VERSION,
            PersistedState::V2(_) => WebviewState::VERSION,
        }
    }

    #[must_use]
    pub fn into_latest(self) -> WebviewState {
        match self {
            PersistedState::V1(state) => state.upgrade(),
            PersistedState::V2(state) => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brand::{ContentHash, DatasetId};

    fn meta(path: &str) -> DatasetMeta {
        DatasetMeta {
            id: DatasetId::new(format!("ds-{path}")),
            path: FilePath::new(path),
            hash: ContentHash::new("abc"),
            size: 3,
            rows: 1,
            header: vec!["a".into()],
            settings: None,
        }
    }

    #[test]
    fn changed_slices_reports_only_differences() {
        let base = WebviewState::new();
        let mut next = base.clone();
        next.run_id = Some(RunId::new("run-1"));
        assert_eq!(base.changed_slices(&next), vec![Slice::Run]);

        next.datasets.insert(FilePath::new("a.csv"), DatasetEntry::new(meta("a.csv")));
        assert_eq!(base.changed_slices(&next), vec![Slice::Datasets, Slice::Run]);
        assert!(next.changed_slices(&next).is_empty());
    }

    #[test]
    fn v1_upgrade_moves_csvs_into_dataset_entries() {
        let mut v1 = WebviewStateV1::default();
        v1.csvs.insert(FilePath::new("a.csv"), meta("a.csv"));
        v1.test_run_id = Some(RunId::new("run-3"));
        v1.auth = Some(AuthGateway::from_key("vercel", "secret-key"));

        let upgraded = v1.clone().upgrade();
        assert_eq!(upgraded.auth, v1.auth);
        assert_eq!(upgraded.run_id, Some(RunId::new("run-3")));
        let entry = &upgraded.datasets[&FilePath::new("a.csv")];
        assert_eq!(entry.meta, meta("a.csv"));
        assert_eq!(entry.content, None);
    }

    #[test]
    fn persisted_version_matches_variant() {
        assert_eq!(PersistedState::V1(WebviewStateV1::default()).version(), 1);
        assert_eq!(PersistedState::V2(WebviewState::new()).version(), 2);
    }
}
