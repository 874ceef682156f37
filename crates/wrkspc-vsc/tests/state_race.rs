//! Whole-object replacement: the last write wins.

use wrkspc_core::{AuthGateway, FilePath, Settings, WebviewState};
use wrkspc_message::test_support::sample_dataset;
use wrkspc_vsc::memory::channel;
use wrkspc_vsc::{CloneGuard, StateStore, UpdateQueue};

#[test]
fn concurrent_read_modify_write_loses_the_earlier_edit() {
    let (_host, endpoint) = channel();
    let writer_a = StateStore::new(&endpoint, CloneGuard::new(true));
    let writer_b = StateStore::new(&endpoint, CloneGuard::new(true));

    let mut from_a = writer_a.get_state();
    let mut from_b = writer_b.get_state();

    from_a.auth = Some(AuthGateway::from_key("vercel", "vck_writer_a"));
    writer_a.set_state(&from_a);

    from_b.datasets.insert(
        FilePath::new("data/users.csv"),
        sample_dataset("data/users.csv"),
    );
    writer_b.set_state(&from_b);

    let observed = writer_a.get_state();
    assert_eq!(observed.auth, None, "A's auth edit is overwritten by B");
    assert_eq!(observed.datasets.len(), 1);
    assert_eq!(observed, from_b);
}

#[test]
fn sequential_updates_keep_both_edits() {
    let (_host, endpoint) = channel();
    let writer_a = StateStore::new(&endpoint, CloneGuard::new(true));
    let writer_b = StateStore::new(&endpoint, CloneGuard::new(true));

    writer_a.set_auth(Some(AuthGateway::from_key("vercel", "vck_writer_a")));
    writer_b.insert_dataset(sample_dataset("data/users.csv"));

    let observed = writer_a.get_state();
    assert!(observed.auth.is_some());
    assert_eq!(observed.datasets.len(), 1);
}

#[test]
fn queued_edits_land_together() {
    let (_host, endpoint) = channel();
    let store = StateStore::new(&endpoint, CloneGuard::new(true));
    let mut queue = UpdateQueue::new();
    queue.push(|state| state.auth = Some(AuthGateway::from_key("vercel", "vck_queued")));
    queue.push(|state| {
        state.settings = Some(Settings {
            streaming: Some(true),
            playground: None,
        });
    });
    queue.push(|state| {
        state.datasets.insert(
            FilePath::new("data/users.csv"),
            sample_dataset("data/users.csv"),
        );
    });
    let written = queue.flush(&store).unwrap();

    assert_eq!(store.get_state(), written);
    assert!(written.auth.is_some() && written.settings.is_some());
    assert_ne!(written, WebviewState::new());
}

#[test]
fn setting_the_same_state_twice_is_observed_once() {
    let (_host, endpoint) = channel();
    let store = StateStore::new(&endpoint, CloneGuard::new(true));
    let mut state = WebviewState::new();
    state.datasets.insert(
        FilePath::new("data/users.csv"),
        sample_dataset("data/users.csv"),
    );
    store.set_state(&state);
    store.set_state(&state);
    assert_eq!(store.get_state(), state);
}
