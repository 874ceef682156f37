use expect_test::expect;
use serde_json::json;
use wrkspc_core::versioned::decode_family;
use wrkspc_core::{
    AuthGateway, ContentHash, DatasetEntry, DatasetId, DatasetMeta, FilePath, PersistedState,
    RunId, Settings, VersionError, WebviewState,
};

fn meta(path: &str) -> DatasetMeta {
    DatasetMeta {
        id: DatasetId::new("ds-1"),
        path: FilePath::new(path),
        hash: ContentHash::new("e3b0c442"),
        size: 12,
        rows: 2,
        header: vec!["name".into()],
        settings: None,
    }
}

#[test]
fn default_state_wire_shape() {
    let encoded = serde_json::to_string(&WebviewState::new()).unwrap();
    expect![[r#"{"version":2,"datasets":{},"runId":null}"#]].assert_eq(&encoded);
}

#[test]
fn populated_state_wire_shape() {
    let mut state = WebviewState::new();
    state.auth = Some(AuthGateway::from_key("vercel", "vck_secret_9876"));
    state.settings = Some(Settings {
        streaming: Some(false),
        playground: None,
    });
    state
        .datasets
        .insert(FilePath::new("a.csv"), DatasetEntry::new(meta("a.csv")));
    state.run_id = Some(RunId::new("run-1"));

    let encoded = serde_json::to_string(&state).unwrap();
    expect![[r#"{"version":2,"auth":{"provider":"vercel","maskedKey":"****9876"},"settings":{"streaming":false},"datasets":{"a.csv":{"meta":{"id":"ds-1","path":"a.csv","hash":"e3b0c442","size":12,"rows":2,"header":["name"]}}},"runId":"run-1"}"#]].assert_eq(&encoded);
}

#[test]
fn v1_reader_ignores_v2_only_fields() {
    let value = json!({
        "version": 1,
        "csvs": { "old.csv": serde_json::to_value(meta("old.csv")).unwrap() },
        "datasets": { "new.csv": { "meta": serde_json::to_value(meta("new.csv")).unwrap() } },
        "runId": "run-from-v2",
        "testRunId": "run-from-v1",
    });

    let PersistedState::V1(v1) = decode_family::<PersistedState>(value).unwrap() else {
        panic!("expected v1");
    };
    assert_eq!(v1.csvs.len(), 1);
    assert!(v1.csvs.contains_key(&FilePath::new("old.csv")));
    assert_eq!(v1.test_run_id, Some(RunId::new("run-from-v1")));

    let latest = PersistedState::V1(v1).into_latest();
    assert_eq!(
        latest.datasets.keys().cloned().collect::<Vec<_>>(),
        vec![FilePath::new("old.csv")]
    );
    assert_eq!(latest.run_id, Some(RunId::new("run-from-v1")));
}

#[test]
fn v2_reader_ignores_v1_only_fields() {
    let value = json!({
        "version": 2,
        "csvs": { "old.csv": serde_json::to_value(meta("old.csv")).unwrap() },
        "testRunId": "run-from-v1",
    });

    let PersistedState::V2(v2) = decode_family::<PersistedState>(value).unwrap() else {
        panic!("expected v2");
    };
    assert!(v2.datasets.is_empty());
    assert_eq!(v2.run_id, None);
}

#[test]
fn unknown_versions_are_rejected() {
    let err = decode_family::<PersistedState>(json!({ "version": 9, "runId": null })).unwrap_err();
    assert_eq!(
        err,
        VersionError::Unknown {
            family: "WebviewState",
            found: 9
        }
    );
    assert_eq!(err.to_string(), "unknown WebviewState version 9");
}

#[test]
fn missing_version_is_rejected() {
    let err = decode_family::<PersistedState>(json!({ "runId": null })).unwrap_err();
    assert_eq!(err, VersionError::Missing);
}

#[test]
fn known_version_with_wrong_shape_is_rejected() {
    let err = decode_family::<PersistedState>(json!({ "version": 2, "datasets": [] }))
        .unwrap_err();
    assert!(matches!(
        err,
        VersionError::Shape {
            family: "WebviewState",
            version: 2,
            ..
        }
    ));
}

#[test]
fn missing_slices_fall_back_to_defaults() {
    let state = decode_family::<PersistedState>(json!({ "version": 2 }))
        .unwrap()
        .into_latest();
    assert_eq!(state, WebviewState::new());
}
