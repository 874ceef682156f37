//! Capabilities each side acquires from its environment.
//!
//! Values cross as [`Value`]s produced by [`crate::clone::to_transfer`].
//! `post_message` hands the value to the transport and returns without waiting
//! for delivery.

use std::sync::Arc;

use serde_json::Value;

use crate::error::TransportError;

/// The API a webview acquires once at startup.
pub trait WebviewApi {
    fn post_message(&self, message: Value) -> Result<(), TransportError>;

    /// State persisted by this webview (or a previous incarnation of it).
    fn get_state(&self) -> Option<Value>;

    /// Replace the persisted state.
    fn set_state(&self, state: Value);
}

/// The host's handle on one webview.
pub trait HostPort {
    fn post_message(&self, message: Value) -> Result<(), TransportError>;
}

impl<T: WebviewApi + ?Sized> WebviewApi for &T {
    fn post_message(&self, message: Value) -> Result<(), TransportError> {
        (**self).post_message(message)
    }

    fn get_state(&self) -> Option<Value> {
        (**self).get_state()
    }

    fn set_state(&self, state: Value) {
        (**self).set_state(state);
    }
}

impl<T: WebviewApi + ?Sized> WebviewApi for Arc<T> {
    fn post_message(&self, message: Value) -> Result<(), TransportError> {
        (**self).post_message(message)
    }

    fn get_state(&self) -> Option<Value> {
        (**self).get_state()
    }

    fn set_state(&self, state: Value) {
        (**self).set_state(state);
    }
}

impl<T: HostPort + ?Sized> HostPort for &T {
    fn post_message(&self, message: Value) -> Result<(), TransportError> {
        (**self).post_message(message)
    }
}

impl<T: HostPort + ?Sized> HostPort for Arc<T> {
    fn post_message(&self, message: Value) -> Result<(), TransportError> {
        (**self).post_message(message)
    }
}
