//! The closed set of messages exchanged between the host and the webview.
//!
//! Each variant has a unique `type` literal and at most one payload. Routing
//! code matches on [`Message`] or [`MessageKind`] without a wildcard arm, so a
//! new variant does not build until every dispatch site handles it.

use std::fmt;

use serde::{Deserialize, Serialize};

use wrkspc_core::{EditorFile, RequestId, Settings, WebviewState};

use crate::payload::{
    AuthUpdatePayload, CsvContentPayload, CsvRequestPayload, GatewayKeyPayload, PathPayload,
    RequestRef, RunCompletePayload, RunPayload, StreamingPayload,
};

/// Side of the boundary a message is emitted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    Host,
    Webview,
}

impl Origin {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Origin::Host => "host",
            Origin::Webview => "webview",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Message {
    // Lifecycle
    #[serde(rename = "lifecycle-webview-ready")]
    WebviewReady,
    #[serde(rename = "lifecycle-ext-state")]
    StatePush(WebviewState),

    // Auth
    #[serde(rename = "auth-ext-update")]
    AuthUpdate(AuthUpdatePayload),
    #[serde(rename = "auth-wv-logout")]
    AuthLogout,
    #[serde(rename = "auth-wv-gateway-set")]
    GatewaySet(GatewayKeyPayload),
    #[serde(rename = "auth-wv-gateway-clear")]
    GatewayClear,
    #[serde(rename = "auth-wv-gateway-revalidate")]
    GatewayRevalidate,

    // Settings
    #[serde(rename = "settings-ext-update")]
    SettingsUpdate(Settings),
    #[serde(rename = "settings-wv-streaming-set")]
    StreamingSet(StreamingPayload),

    // Datasets
    #[serde(rename = "dataset-wv-csv-request")]
    CsvRequest(CsvRequestPayload),
    #[serde(rename = "dataset-ext-csv-content")]
    CsvContent(CsvContentPayload),
    #[serde(rename = "dataset-ext-csv-select-cancel")]
    CsvSelectCancel(RequestRef),
    #[serde(rename = "dataset-wv-remove")]
    DatasetRemove(PathPayload),

    // Test runs
    #[serde(rename = "run-wv-start")]
    RunStart(RunPayload),
    #[serde(rename = "run-wv-cancel")]
    RunCancel(RunPayload),
    #[serde(rename = "run-ext-complete")]
    RunComplete(RunCompletePayload),

    // Editor
    #[serde(rename = "editor-ext-active-change")]
    ActiveFileChange(Option<EditorFile>),
}

impl Message {
    #[must_use]
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::WebviewReady => MessageKind::WebviewReady,
            Message::StatePush(_) => MessageKind::StatePush,
            Message::AuthUpdate(_) => MessageKind::AuthUpdate,
            Message::AuthLogout => MessageKind::AuthLogout,
            Message::GatewaySet(_) => MessageKind::GatewaySet,
            Message::GatewayClear => MessageKind::GatewayClear,
            Message::GatewayRevalidate => MessageKind::GatewayRevalidate,
            Message::SettingsUpdate(_) => MessageKind::SettingsUpdate,
            Message::StreamingSet(_) => MessageKind::StreamingSet,
            Message::CsvRequest(_) => MessageKind::CsvRequest,
            Message::CsvContent(_) => MessageKind::CsvContent,
            Message::CsvSelectCancel(_) => MessageKind::CsvSelectCancel,
            Message::DatasetRemove(_) => MessageKind::DatasetRemove,
            Message::RunStart(_) => MessageKind::RunStart,
            Message::RunCancel(_) => MessageKind::RunCancel,
            Message::RunComplete(_) => MessageKind::RunComplete,
            Message::ActiveFileChange(_) => MessageKind::ActiveFileChange,
        }
    }

    #[must_use]
    pub fn origin(&self) -> Origin {
        self.kind().origin()
    }

    /// Correlation id of request-shaped messages and their replies.
    #[must_use]
    pub fn request_id(&self) -> Option<&RequestId> {
        match self {
            Message::CsvRequest(payload) => Some(&payload.request_id),
            Message::CsvContent(payload) => Some(payload.request_id()),
            Message::CsvSelectCancel(payload) => Some(&payload.request_id),
            Message::WebviewReady
            | Message::StatePush(_)
            | Message::AuthUpdate(_)
            | Message::AuthLogout
            | Message::GatewaySet(_)
            | Message::GatewayClear
            | Message::GatewayRevalidate
            | Message::SettingsUpdate(_)
            | Message::StreamingSet(_)
            | Message::DatasetRemove(_)
            | Message::RunStart(_)
            | Message::RunCancel(_)
            | Message::RunComplete(_)
            | Message::ActiveFileChange(_) => None,
        }
    }
}

/// Payload-free mirror of [`Message`] used for routing and subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageKind {
    WebviewReady,
    StatePush,
    AuthUpdate,
    AuthLogout,
    GatewaySet,
    GatewayClear,
    GatewayRevalidate,
    SettingsUpdate,
    StreamingSet,
    CsvRequest,
    CsvContent,
    CsvSelectCancel,
    DatasetRemove,
    RunStart,
    RunCancel,
    RunComplete,
    ActiveFileChange,
}

impl MessageKind {
    pub const ALL: [MessageKind; 17] = [
        MessageKind::WebviewReady,
        MessageKind::StatePush,
        MessageKind::AuthUpdate,
        MessageKind::AuthLogout,
        MessageKind::GatewaySet,
        MessageKind::GatewayClear,
        MessageKind::GatewayRevalidate,
        MessageKind::SettingsUpdate,
        MessageKind::StreamingSet,
        MessageKind::CsvRequest,
        MessageKind::CsvContent,
        MessageKind::CsvSelectCancel,
        MessageKind::DatasetRemove,
        MessageKind::RunStart,
        MessageKind::RunCancel,
        MessageKind::RunComplete,
        MessageKind::ActiveFileChange,
    ];

    /// The `type` literal on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::WebviewReady => "lifecycle-webview-ready",
            MessageKind::StatePush => "lifecycle-ext-state",
            MessageKind::AuthUpdate => "auth-ext-update",
            MessageKind::AuthLogout => "auth-wv-logout",
            MessageKind::GatewaySet => "auth-wv-gateway-set",
            MessageKind::GatewayClear => "auth-wv-gateway-clear",
            MessageKind::GatewayRevalidate => "auth-wv-gateway-revalidate",
            MessageKind::SettingsUpdate => "settings-ext-update",
            MessageKind::StreamingSet => "settings-wv-streaming-set",
            MessageKind::CsvRequest => "dataset-wv-csv-request",
            MessageKind::CsvContent => "dataset-ext-csv-content",
            MessageKind::CsvSelectCancel => "dataset-ext-csv-select-cancel",
            MessageKind::DatasetRemove => "dataset-wv-remove",
            MessageKind::RunStart => "run-wv-start",
            MessageKind::RunCancel => "run-wv-cancel",
            MessageKind::RunComplete => "run-ext-complete",
            MessageKind::ActiveFileChange => "editor-ext-active-change",
        }
    }

    #[must_use]
    pub fn from_type(raw: &str) -> Option<MessageKind> {
        MessageKind::ALL.into_iter().find(|kind| kind.as_str() == raw)
    }

    #[must_use]
    pub fn origin(self) -> Origin {
        match self {
            MessageKind::WebviewReady
            | MessageKind::AuthLogout
            | MessageKind::GatewaySet
            | MessageKind::GatewayClear
            | MessageKind::GatewayRevalidate
            | MessageKind::StreamingSet
            | MessageKind::CsvRequest
            | MessageKind::DatasetRemove
            | MessageKind::RunStart
            | MessageKind::RunCancel => Origin::Webview,
            MessageKind::StatePush
            | MessageKind::AuthUpdate
            | MessageKind::SettingsUpdate
            | MessageKind::CsvContent
            | MessageKind::CsvSelectCancel
            | MessageKind::RunComplete
            | MessageKind::ActiveFileChange => Origin::Host,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
