//! Webview-side state container.
//!
//! [`StateStore`] wraps the webview's persisted-state slot. Reads never fail:
//! a missing, unreadable or unknown-version value yields the default state.
//! Writes replace the whole object.
//!
//! There is no merge and no locking. Two read-modify-write sequences that start
//! from the same read race, and the later write wins: an edit made by the
//! earlier one to a different slice is lost. Callers that need several slice
//! edits applied together fold them through an [`UpdateQueue`].

use tracing::{debug, info, warn};

use wrkspc_core::versioned::decode_family;
use wrkspc_core::{
    AuthGateway, DatasetEntry, FilePath, PersistedState, RunId, Settings, WebviewState,
};

use crate::clone::{to_transfer, CloneGuard};
use crate::transport::WebviewApi;

#[derive(Debug)]
pub struct StateStore<A> {
    api: A,
    guard: CloneGuard,
}

impl<A: WebviewApi> StateStore<A> {
    pub fn new(api: A, guard: CloneGuard) -> Self {
        Self { api, guard }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn get_state(&self) -> WebviewState {
        let Some(raw) = self.api.get_state() else {
            debug!("no persisted state; using defaults");
            return WebviewState::new();
        };
        match decode_family::<PersistedState>(raw) {
            Ok(PersistedState::V2(state)) => state,
            Ok(older) => {
                info!(from = older.version(), "upgrading persisted state");
                older.into_latest()
            }
            Err(err) => {
                warn!(error = %err, "persisted state unreadable; using defaults");
                WebviewState::new()
            }
        }
    }

    /// Replace the persisted state with `next`.
    pub fn set_state(&self, next: &WebviewState) {
        match to_transfer(next) {
            Ok(value) => self.api.set_state(value),
            Err(err) => self.guard.report("state write", &err),
        }
    }

    /// Read, edit and write back. Returns the state that was written.
    pub fn update(&self, edit: impl FnOnce(&mut WebviewState)) -> WebviewState {
        let mut state = self.get_state();
        edit(&mut state);
        self.set_state(&state);
        state
    }

    pub fn set_auth(&self, auth: Option<AuthGateway>) -> WebviewState {
        self.update(|state| state.auth = auth)
    }

    pub fn set_settings(&self, settings: Option<Settings>) -> WebviewState {
        self.update(|state| state.settings = settings)
    }

    /// Insert or replace the dataset loaded from `entry.meta.path`.
    pub fn insert_dataset(&self, entry: DatasetEntry) -> WebviewState {
        self.update(|state| {
            state.datasets.insert(entry.meta.path.clone(), entry);
        })
    }

    pub fn remove_dataset(&self, path: &FilePath) -> WebviewState {
        self.update(|state| {
            if state.datasets.remove(path).is_none() {
                debug!(path = %path, "dataset to remove was not loaded");
            }
        })
    }

    pub fn set_run_id(&self, run_id: Option<RunId>) -> WebviewState {
        self.update(|state| state.run_id = run_id)
    }
}

type Edit = Box<dyn FnOnce(&mut WebviewState)>;

/// Slice edits collected by one writer and applied in a single read-modify-write.
#[derive(Default)]
pub struct UpdateQueue {
    edits: Vec<Edit>,
}

impl UpdateQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, edit: impl FnOnce(&mut WebviewState) + 'static) {
        self.edits.push(Box::new(edit));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Apply every queued edit in push order. `None` when nothing was queued.
    pub fn flush<A: WebviewApi>(&mut self, store: &StateStore<A>) -> Option<WebviewState> {
        if self.edits.is_empty() {
            return None;
        }
        let edits = std::mem::take(&mut self.edits);
        Some(store.update(|state| {
            for edit in edits {
                edit(state);
            }
        }))
    }
}

impl std::fmt::Debug for UpdateQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateQueue")
            .field("edits", &self.edits.len())
            .finish()
    }
}
