//! Session lifecycle + dispatch.
//! - HostSession::new/accessors
//! - receive/handle: decode, reduce, push state
//! - send/outbox: queue until ready, flush on ready
//! - completion callbacks: csv, runs, settings, auth, editor

use std::collections::VecDeque;

use serde_json::Value;
use tracing::{debug, info, warn};

use wrkspc_core::{
    AuthGateway, DatasetEntry, EditorFile, RequestId, RunId, Settings, Slice, WebviewState,
};
use wrkspc_message::{
    accept, AuthUpdatePayload, CsvContentPayload, CsvFailed, CsvLoaded, Message, Origin,
    PendingRequests, RequestRef, RunCompletePayload, RunStatus,
};

use crate::clone::CloneGuard;
use crate::config::SessionConfig;
use crate::error::TransportError;
use crate::framing::Framing;
use crate::transport::HostPort;

use super::{reduce, DispatchOutcome, HostEffect, HostSession, Reduction};

impl<P: HostPort> HostSession<P> {
    pub fn new(port: P, config: &SessionConfig) -> Self {
        Self::with_state(port, config, WebviewState::new())
    }

    /// Session resuming from state the host kept for a previous webview.
    pub fn with_state(port: P, config: &SessionConfig, state: WebviewState) -> Self {
        Self {
            port,
            state,
            ready: false,
            outbox: VecDeque::new(),
            max_queued: config.max_queued_messages,
            framing: Framing::new(config),
            pending_csv: PendingRequests::new(),
            guard: CloneGuard::from_config(config),
        }
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn state(&self) -> &WebviewState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Messages waiting for the webview to become ready.
    pub fn queued(&self) -> usize {
        self.outbox.len()
    }

    pub fn pending_csv_requests(&self) -> usize {
        self.pending_csv.len()
    }

    /// Handle one raw value posted by the webview.
    pub fn receive(&mut self, raw: Value) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        for value in self.framing.unframe(raw) {
            if let Some(message) = accept(value, Origin::Host) {
                outcome.merge(self.handle(&message));
            }
        }
        outcome
    }

    pub fn handle(&mut self, message: &Message) -> DispatchOutcome {
        let Reduction {
            state,
            effects,
            webview_ready,
        } = reduce(&self.state, message);

        if webview_ready {
            self.mark_ready();
        }
        for effect in &effects {
            if let HostEffect::LoadCsv(request) = effect {
                self.pending_csv
                    .insert(request.request_id.clone(), request.clone());
            }
        }

        let changed = self.state.changed_slices(&state);
        self.state = state;
        if webview_ready || !changed.is_empty() {
            self.push_state();
        }
        DispatchOutcome { changed, effects }
    }

    /// Send a host message now, or queue it until the webview is ready.
    pub fn send(&mut self, message: Message) -> Result<(), TransportError> {
        if message.origin() != Origin::Host {
            return Err(TransportError::WrongDirection(message.kind()));
        }
        if self.ready {
            return self.post(&message);
        }
        self.enqueue(message);
        Ok(())
    }

    /// The webview went away. Queued messages and pending requests are discarded;
    /// the state stays for the next webview.
    pub fn dispose(&mut self) {
        info!(
            queued = self.outbox.len(),
            pending = self.pending_csv.len(),
            "webview disposed"
        );
        self.ready = false;
        self.outbox.clear();
        self.pending_csv.clear();
    }

    fn mark_ready(&mut self) {
        if self.ready {
            info!(pending = self.pending_csv.len(), "webview reloaded");
            self.pending_csv.clear();
        }
        self.ready = true;
        self.framing.restart();
        let queued = std::mem::take(&mut self.outbox);
        debug!(count = queued.len(), "flushing queued messages");
        for message in queued {
            if let Err(err) = self.post(&message) {
                warn!(kind = %message.kind(), error = %err, "failed to flush queued message");
            }
        }
    }

    fn enqueue(&mut self, message: Message) {
        if self.max_queued == 0 {
            warn!(
                kind = %message.kind(),
                "webview not ready and queueing disabled; dropping message"
            );
            return;
        }
        if self.outbox.len() >= self.max_queued {
            if let Some(dropped) = self.outbox.pop_front() {
                warn!(
                    kind = %dropped.kind(),
                    limit = self.max_queued,
                    "outbox full; dropping oldest queued message"
                );
            }
        }
        debug!(kind = %message.kind(), "queued until webview is ready");
        self.outbox.push_back(message);
    }

    fn post(&mut self, message: &Message) -> Result<(), TransportError> {
        let value = match self.framing.frame(message) {
            Ok(value) => value,
            Err(err) => {
                self.guard.report(message.kind().as_str(), &err);
                return Err(err.into());
            }
        };
        self.port.post_message(value)
    }

    fn push_state(&mut self) {
        if !self.ready {
            debug!("state push deferred until webview is ready");
            return;
        }
        let message = Message::StatePush(self.state.clone());
        if let Err(err) = self.post(&message) {
            warn!(error = %err, "failed to push state");
        }
    }

    fn commit(&mut self, edit: impl FnOnce(&mut WebviewState)) -> Vec<Slice> {
        let mut next = self.state.clone();
        edit(&mut next);
        let changed = self.state.changed_slices(&next);
        self.state = next;
        if !changed.is_empty() {
            self.push_state();
        }
        changed
    }

    /// Answer a [`HostEffect::LoadCsv`]. Returns `Ok(false)` when the request is
    /// no longer pending.
    ///
    /// A loaded dataset is committed even when the reply cannot be sent. The
    /// request stays pending until a reply goes out, so the caller may retry.
    pub fn complete_csv(
        &mut self,
        request_id: &RequestId,
        result: Result<DatasetEntry, String>,
    ) -> Result<bool, TransportError> {
        if !self.pending_csv.contains(request_id) {
            debug!(request_id = %request_id, "ignoring load for unknown or cancelled request");
            return Ok(false);
        }
        let sent = match result {
            Ok(entry) => {
                let sent = self.send(Message::CsvContent(CsvContentPayload::Ok(CsvLoaded {
                    request_id: request_id.clone(),
                    entry: entry.clone(),
                })));
                self.commit(|state| {
                    state.datasets.insert(entry.meta.path.clone(), entry);
                });
                sent
            }
            Err(error) => {
                warn!(request_id = %request_id, error = %error, "csv load failed");
                self.send(Message::CsvContent(CsvContentPayload::Error(CsvFailed {
                    request_id: request_id.clone(),
                    error,
                })))
            }
        };
        sent?;
        self.pending_csv.resolve(request_id);
        Ok(true)
    }

    /// The user dismissed the file picker opened for `request_id`.
    pub fn cancel_csv_selection(&mut self, request_id: &RequestId) -> Result<bool, TransportError> {
        if !self.pending_csv.contains(request_id) {
            return Ok(false);
        }
        self.send(Message::CsvSelectCancel(RequestRef {
            request_id: request_id.clone(),
        }))?;
        self.pending_csv.cancel(request_id);
        Ok(true)
    }

    /// Report the end of a run. Completions for a run that is no longer active are ignored.
    pub fn finish_run(
        &mut self,
        run_id: &RunId,
        status: RunStatus,
        error: Option<String>,
    ) -> Result<bool, TransportError> {
        if self.state.run_id.as_ref() != Some(run_id) {
            debug!(run_id = %run_id, "ignoring completion of inactive run");
            return Ok(false);
        }
        self.send(Message::RunComplete(RunCompletePayload {
            run_id: run_id.clone(),
            status,
            error,
        }))?;
        self.commit(|state| state.run_id = None);
        Ok(true)
    }

    pub fn update_settings(&mut self, settings: Settings) -> Result<(), TransportError> {
        self.send(Message::SettingsUpdate(settings.clone()))?;
        self.commit(|state| state.settings = Some(settings));
        Ok(())
    }

    /// Record the outcome of sign-in or gateway validation.
    pub fn set_auth(&mut self, auth: Option<AuthGateway>) -> Result<(), TransportError> {
        self.send(Message::AuthUpdate(AuthUpdatePayload { auth: auth.clone() }))?;
        self.commit(|state| state.auth = auth);
        Ok(())
    }

    /// The active editor changed. Not part of the synchronized state.
    pub fn set_active_file(&mut self, file: Option<EditorFile>) -> Result<(), TransportError> {
        self.send(Message::ActiveFileChange(file))
    }
}
