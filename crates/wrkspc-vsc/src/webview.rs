//! Webview-side client.
//!
//! [`WebviewClient`] owns the acquired [`WebviewApi`]. It applies host messages
//! to the persisted state through a [`StateStore`], tracks the requests it has
//! sent and then hands every accepted message to the UI's [`MessageBus`].

use serde_json::Value;
use tracing::{debug, warn};

use wrkspc_core::{FilePath, RequestId, RunId, WebviewState};
use wrkspc_message::{
    accept, CsvContentPayload, CsvRequestPayload, Message, MessageKind, Origin, PendingRequests,
    RequestIdGenerator,
};

use crate::bus::{MessageBus, SubscriptionId};
use crate::clone::CloneGuard;
use crate::config::SessionConfig;
use crate::error::TransportError;
use crate::framing::Framing;
use crate::store::StateStore;
use crate::transport::WebviewApi;

const CSV_REQUEST_PREFIX: &str = "csv-data-request";

#[derive(Debug)]
pub struct WebviewClient<A> {
    store: StateStore<A>,
    bus: MessageBus,
    framing: Framing,
    guard: CloneGuard,
    csv_ids: RequestIdGenerator,
    pending_csv: PendingRequests<Option<FilePath>>,
}

impl<A: WebviewApi> WebviewClient<A> {
    pub fn new(api: A, config: &SessionConfig) -> Self {
        let guard = CloneGuard::from_config(config);
        Self {
            store: StateStore::new(api, guard),
            bus: MessageBus::new(),
            framing: Framing::new(config),
            guard,
            csv_ids: RequestIdGenerator::per_incarnation(CSV_REQUEST_PREFIX),
            pending_csv: PendingRequests::new(),
        }
    }

    pub fn store(&self) -> &StateStore<A> {
        &self.store
    }

    pub fn state(&self) -> WebviewState {
        self.store.get_state()
    }

    pub fn bus_mut(&mut self) -> &mut MessageBus {
        &mut self.bus
    }

    pub fn on(
        &mut self,
        kind: MessageKind,
        handler: impl FnMut(&Message) -> anyhow::Result<()> + 'static,
    ) -> SubscriptionId {
        self.bus.on(kind, handler)
    }

    /// Announce that this webview can receive messages.
    pub fn ready(&mut self) -> Result<(), TransportError> {
        self.framing.restart();
        self.send(&Message::WebviewReady)
    }

    pub fn send(&mut self, message: &Message) -> Result<(), TransportError> {
        if message.origin() != Origin::Webview {
            return Err(TransportError::WrongDirection(message.kind()));
        }
        let value = match self.framing.frame(message) {
            Ok(value) => value,
            Err(err) => {
                self.guard.report(message.kind().as_str(), &err);
                return Err(err.into());
            }
        };
        self.store.api().post_message(value)
    }

    /// Ask the host for a CSV file. Without `path` the host lets the user pick one.
    pub fn request_csv(
        &mut self,
        path: Option<FilePath>,
        delimiter: Option<String>,
    ) -> Result<RequestId, TransportError> {
        let request_id = self.csv_ids.next_id();
        self.send(&Message::CsvRequest(CsvRequestPayload {
            request_id: request_id.clone(),
            path: path.clone(),
            delimiter,
        }))?;
        self.pending_csv.insert(request_id.clone(), path);
        Ok(request_id)
    }

    /// Stop waiting for a CSV reply. A reply arriving later is ignored.
    pub fn cancel_csv(&mut self, request_id: &RequestId) -> bool {
        self.pending_csv.cancel(request_id).is_some()
    }

    #[must_use]
    pub fn is_pending(&self, request_id: &RequestId) -> bool {
        self.pending_csv.contains(request_id)
    }

    /// Handle one raw value posted by the host. Returns how many messages were applied.
    pub fn receive(&mut self, raw: Value) -> usize {
        let mut applied = 0;
        for value in self.framing.unframe(raw) {
            if let Some(message) = accept(value, Origin::Webview) {
                if self.apply(&message) {
                    self.bus.emit(&message);
                    applied += 1;
                }
            }
        }
        applied
    }

    /// Update persisted state for `message`. `false` means the message is dropped.
    fn apply(&mut self, message: &Message) -> bool {
        match message {
            Message::StatePush(state) => self.store.set_state(state),
            Message::AuthUpdate(payload) => {
                self.store.set_auth(payload.auth.clone());
            }
            Message::SettingsUpdate(settings) => {
                self.store.set_settings(Some(settings.clone()));
            }
            Message::CsvContent(payload) => {
                if self.pending_csv.resolve(payload.request_id()).is_none() {
                    return false;
                }
                match payload {
                    CsvContentPayload::Ok(loaded) => {
                        self.store.insert_dataset(loaded.entry.clone());
                    }
                    CsvContentPayload::Error(failed) => {
                        warn!(
                            request_id = %failed.request_id,
                            error = %failed.error,
                            "csv request failed"
                        );
                    }
                }
            }
            Message::CsvSelectCancel(payload) => {
                if self.pending_csv.cancel(&payload.request_id).is_none() {
                    debug!(
                        request_id = %payload.request_id,
                        "selection cancelled for unknown request"
                    );
                    return false;
                }
            }
            Message::RunComplete(payload) => {
                self.finish_run(&payload.run_id);
            }
            Message::ActiveFileChange(_) => {}

            Message::WebviewReady
            | Message::AuthLogout
            | Message::GatewaySet(_)
            | Message::GatewayClear
            | Message::GatewayRevalidate
            | Message::StreamingSet(_)
            | Message::CsvRequest(_)
            | Message::DatasetRemove(_)
            | Message::RunStart(_)
            | Message::RunCancel(_) => {
                warn!(
                    kind = %message.kind(),
                    "ignoring webview message delivered to the webview"
                );
                return false;
            }
        }
        true
    }

    fn finish_run(&self, run_id: &RunId) {
        self.store.update(|state| {
            if state.run_id.as_ref() == Some(run_id) {
                state.run_id = None;
            } else {
                debug!(run_id = %run_id, "completion for a run that is not active");
            }
        });
    }
}
