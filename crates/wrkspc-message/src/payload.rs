//! Message payloads.
//!
//! Every payload is plain data: it survives a structured clone unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};

use wrkspc_core::{AuthGateway, DatasetEntry, FilePath, RequestId, RunId};

/// Body of `auth-ext-update`. An absent `auth` means signed out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUpdatePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthGateway>,
}

/// Body of `auth-wv-gateway-set`. Carries the raw key typed by the user.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayKeyPayload {
    pub key: String,
}

impl fmt::Debug for GatewayKeyPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayKeyPayload")
            .field("key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingPayload {
    pub enabled: bool,
}

/// Body of `dataset-wv-csv-request`. Without a `path` the host asks the user to pick a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvRequestPayload {
    pub request_id: RequestId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<FilePath>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvLoaded {
    pub request_id: RequestId,
    pub entry: DatasetEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvFailed {
    pub request_id: RequestId,
    pub error: String,
}

/// Body of `dataset-ext-csv-content`, the reply to a CSV request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CsvContentPayload {
    Ok(CsvLoaded),
    Error(CsvFailed),
}

impl CsvContentPayload {
    #[must_use]
    pub fn request_id(&self) -> &RequestId {
        match self {
            CsvContentPayload::Ok(loaded) => &loaded.request_id,
            CsvContentPayload::Error(failed) => &failed.request_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestRef {
    pub request_id: RequestId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathPayload {
    pub path: FilePath,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunPayload {
    pub run_id: RunId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Ok,
    Error,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunCompletePayload {
    pub run_id: RunId,
    pub status: RunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
