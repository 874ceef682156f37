//! Pure host transition: `(state, message) -> Reduction`.
//!
//! The match below has no wildcard arm. Adding a [`Message`] variant fails to
//! build until its host behavior is decided here.

use tracing::{debug, warn};

use wrkspc_core::{AuthGateway, Settings, WebviewState};
use wrkspc_message::Message;

use super::HostEffect;

/// Provider recorded for keys entered through `auth-wv-gateway-set`.
pub const GATEWAY_PROVIDER: &str = "vercel";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduction {
    pub state: WebviewState,
    pub effects: Vec<HostEffect>,
    /// The webview announced it can receive messages.
    pub webview_ready: bool,
}

#[must_use]
pub fn reduce(state: &WebviewState, message: &Message) -> Reduction {
    let mut next = state.clone();
    let mut effects = Vec::new();
    let mut webview_ready = false;

    match message {
        Message::WebviewReady => webview_ready = true,

        Message::AuthLogout => {
            next.auth = None;
            effects.push(HostEffect::SignOut);
        }
        Message::GatewaySet(payload) => {
            next.auth = Some(AuthGateway::from_key(GATEWAY_PROVIDER, &payload.key));
            effects.push(HostEffect::StoreGatewayKey(payload.clone()));
        }
        Message::GatewayClear => {
            next.auth = None;
            effects.push(HostEffect::ClearGatewayKey);
        }
        Message::GatewayRevalidate => effects.push(HostEffect::RevalidateGateway),

        Message::StreamingSet(payload) => {
            let settings = Settings {
                streaming: Some(payload.enabled),
                ..state.settings_or_default()
            };
            next.settings = Some(settings.clone());
            effects.push(HostEffect::WriteSettings(settings));
        }

        Message::CsvRequest(payload) => effects.push(HostEffect::LoadCsv(payload.clone())),
        Message::DatasetRemove(payload) => {
            if next.datasets.remove(&payload.path).is_none() {
                debug!(path = %payload.path, "dataset to remove was not loaded");
            }
        }

        Message::RunStart(payload) => {
            if next.run_id.as_ref() == Some(&payload.run_id) {
                debug!(run_id = %payload.run_id, "run already active");
            } else {
                if let Some(previous) = next.run_id.replace(payload.run_id.clone()) {
                    effects.push(HostEffect::CancelRun(previous));
                }
                effects.push(HostEffect::StartRun(payload.run_id.clone()));
            }
        }
        Message::RunCancel(payload) => {
            if next.run_id.as_ref() == Some(&payload.run_id) {
                next.run_id = None;
                effects.push(HostEffect::CancelRun(payload.run_id.clone()));
            } else {
                debug!(run_id = %payload.run_id, "ignoring cancel for inactive run");
            }
        }

        Message::StatePush(_)
        | Message::AuthUpdate(_)
        | Message::SettingsUpdate(_)
        | Message::CsvContent(_)
        | Message::CsvSelectCancel(_)
        | Message::RunComplete(_)
        | Message::ActiveFileChange(_) => {
            warn!(kind = %message.kind(), "ignoring host message delivered to the host");
        }
    }

    Reduction {
        state: next,
        effects,
        webview_ready,
    }
}
