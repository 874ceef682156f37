//! Host session module map.
//! - core: session lifecycle, outbox, receive/dispatch, completion callbacks
//! - reduce: pure `(state, message) -> Reduction` transition
//! - tests: session unit tests

mod core;
mod reduce;


use std::collections::VecDeque;

use wrkspc_core::{RunId, Settings, Slice, WebviewState};
use wrkspc_message::{CsvRequestPayload, GatewayKeyPayload, Message, PendingRequests};

use crate::clone::CloneGuard;
use crate::framing::Framing;

pub use self::reduce::{reduce, Reduction, GATEWAY_PROVIDER};

/// Work the session cannot do itself. The embedder performs it and reports
/// back through the matching session callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEffect {
    /// Read (or ask the user to pick) a CSV file; answer with `complete_csv`
    /// or `cancel_csv_selection`.
    LoadCsv(CsvRequestPayload),
    /// Persist the key in secret storage.
    StoreGatewayKey(GatewayKeyPayload),
    ClearGatewayKey,
    /// Check the stored key; answer with `set_auth`.
    RevalidateGateway,
    SignOut,
    /// Write changed settings back to the editor configuration.
    WriteSettings(Settings),
    /// Launch a test run; answer with `finish_run`.
    StartRun(RunId),
    CancelRun(RunId),
}

/// What handling one incoming message produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Slices whose value changed.
    pub changed: Vec<Slice>,
    pub effects: Vec<HostEffect>,
}

impl DispatchOutcome {
    fn merge(&mut self, other: DispatchOutcome) {
        for slice in other.changed {
            if !self.changed.contains(&slice) {
                self.changed.push(slice);
            }
        }
        self.effects.extend(other.effects);
    }
}

/// Host-side owner of one webview's state.
///
/// The session holds the authoritative [`WebviewState`] and pushes it to the
/// webview after every change. Until the webview reports ready, outgoing
/// messages wait in a bounded outbox.
#[derive(Debug)]
pub struct HostSession<P> {
    port: P,
    state: WebviewState,
    ready: bool,
    outbox: VecDeque<Message>,
    max_queued: usize,
    framing: Framing,
    pending_csv: PendingRequests<CsvRequestPayload>,
    guard: CloneGuard,
}
