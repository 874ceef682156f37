//! In-process transport: a FIFO channel pair plus a persisted-state slot.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::TransportError;
use crate::transport::{HostPort, WebviewApi};

/// Connected host and webview endpoints.
#[must_use]
pub fn channel() -> (HostEndpoint, WebviewEndpoint) {
    let (to_webview, from_host) = unbounded();
    let (to_host, from_webview) = unbounded();
    (
        HostEndpoint {
            to_webview,
            from_webview,
        },
        WebviewEndpoint {
            to_host,
            from_host,
            state: Arc::new(Mutex::new(None)),
        },
    )
}

#[derive(Debug, Clone)]
pub struct HostEndpoint {
    to_webview: Sender<Value>,
    from_webview: Receiver<Value>,
}

impl HostEndpoint {
    #[must_use]
    pub fn try_recv(&self) -> Option<Value> {
        self.from_webview.try_recv().ok()
    }

    #[must_use]
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Value> {
        self.from_webview.recv_timeout(timeout).ok()
    }

    /// Everything the webview has posted so far.
    #[must_use]
    pub fn drain(&self) -> Vec<Value> {
        self.from_webview.try_iter().collect()
    }
}

impl HostPort for HostEndpoint {
    fn post_message(&self, message: Value) -> Result<(), TransportError> {
        self.to_webview
            .send(message)
            .map_err(|_| TransportError::Disconnected)
    }
}

/// Webview side. Clones share the channel and the persisted-state slot, the
/// way a reloaded webview sees what its previous incarnation stored.
#[derive(Debug, Clone)]
pub struct WebviewEndpoint {
    to_host: Sender<Value>,
    from_host: Receiver<Value>,
    state: Arc<Mutex<Option<Value>>>,
}

impl WebviewEndpoint {
    #[must_use]
    pub fn try_recv(&self) -> Option<Value> {
        self.from_host.try_recv().ok()
    }

    #[must_use]
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Value> {
        self.from_host.recv_timeout(timeout).ok()
    }

    #[must_use]
    pub fn drain(&self) -> Vec<Value> {
        self.from_host.try_iter().collect()
    }
}

impl WebviewApi for WebviewEndpoint {
    fn post_message(&self, message: Value) -> Result<(), TransportError> {
        self.to_host
            .send(message)
            .map_err(|_| TransportError::Disconnected)
    }

    fn get_state(&self) -> Option<Value> {
        self.state.lock().clone()
    }

    fn set_state(&self, state: Value) {
        *self.state.lock() = Some(state);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn delivery_is_fifo_in_both_directions() {
        let (host, webview) = channel();
        for n in 0..3 {
            host.post_message(json!(n)).unwrap();
            webview.post_message(json!(n + 10)).unwrap();
        }
        assert_eq!(webview.drain(), vec![json!(0), json!(1), json!(2)]);
        assert_eq!(host.drain(), vec![json!(10), json!(11), json!(12)]);
        assert_eq!(host.try_recv(), None);
    }

    #[test]
    fn persisted_state_is_shared_by_clones() {
        let (_host, webview) = channel();
        assert_eq!(webview.get_state(), None);
        webview.set_state(json!({ "version": 2 }));
        let reloaded = webview.clone();
        assert_eq!(reloaded.get_state(), Some(json!({ "version": 2 })));
    }

    #[test]
    fn posting_to_a_dropped_peer_fails() {
        let (host, webview) = channel();
        drop(webview);
        assert!(matches!(
            host.post_message(json!(1)),
            Err(TransportError::Disconnected)
        ));
    }
}
