//! One representative value per message kind, for dispatch and boundary tests.

use wrkspc_core::{
    AuthGateway, ByteOffset, ContentHash, Cursor, DatasetEntry, DatasetId, DatasetMeta, EditorFile,
    FilePath, RequestId, RunId, Settings, WebviewState,
};

use crate::message::Message;
use crate::payload::{
    AuthUpdatePayload, CsvContentPayload, CsvLoaded, CsvRequestPayload, GatewayKeyPayload,
    PathPayload, RequestRef, RunCompletePayload, RunPayload, RunStatus, StreamingPayload,
};

#[must_use]
pub fn sample_dataset(path: &str) -> DatasetEntry {
    DatasetEntry::new(DatasetMeta {
        id: DatasetId::new(format!("ds-{path}")),
        path: FilePath::new(path),
        hash: ContentHash::new("2c26b46b68ffc68f"),
        size: 24,
        rows: 2,
        header: vec!["name".into(), "age".into()],
        settings: None,
    })
}

/// Every [`Message`] variant exactly once, in declaration order.
#[must_use]
pub fn sample_messages() -> Vec<Message> {
    vec![
        Message::WebviewReady,
        Message::StatePush(WebviewState::new()),
        Message::AuthUpdate(AuthUpdatePayload {
            auth: Some(AuthGateway::from_key("vercel", "vck_sample_key_0001")),
        }),
        Message::AuthLogout,
        Message::GatewaySet(GatewayKeyPayload {
            key: "vck_sample_key_0001".into(),
        }),
        Message::GatewayClear,
        Message::GatewayRevalidate,
        Message::SettingsUpdate(Settings {
            streaming: Some(true),
            playground: None,
        }),
        Message::StreamingSet(StreamingPayload { enabled: false }),
        Message::CsvRequest(CsvRequestPayload {
            request_id: RequestId::new("csv-data-request-1"),
            path: Some(FilePath::new("data/users.csv")),
            delimiter: None,
        }),
        Message::CsvContent(CsvContentPayload::Ok(CsvLoaded {
            request_id: RequestId::new("csv-data-request-1"),
            entry: sample_dataset("data/users.csv"),
        })),
        Message::CsvSelectCancel(RequestRef {
            request_id: RequestId::new("csv-data-request-2"),
        }),
        Message::DatasetRemove(PathPayload {
            path: FilePath::new("data/users.csv"),
        }),
        Message::RunStart(RunPayload {
            run_id: RunId::new("run-1"),
        }),
        Message::RunCancel(RunPayload {
            run_id: RunId::new("run-1"),
        }),
        Message::RunComplete(RunCompletePayload {
            run_id: RunId::new("run-1"),
            status: RunStatus::Ok,
            error: None,
        }),
        Message::ActiveFileChange(Some(EditorFile {
            path: FilePath::new("src/prompts.ts"),
            is_dirty: false,
            language_id: "typescript".into(),
            cursor: Some(Cursor {
                offset: ByteOffset::new(12),
                line: 1,
                character: 4,
            }),
            selection: None,
        })),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageKind;

    #[test]
    fn samples_cover_every_kind_once() {
        let kinds: Vec<MessageKind> = sample_messages().iter().map(Message::kind).collect();
        assert_eq!(kinds, MessageKind::ALL.to_vec());
    }
}
