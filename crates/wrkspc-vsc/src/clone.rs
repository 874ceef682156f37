//! The structured clone boundary.
//!
//! Everything handed to the transport or to the webview's persisted-state slot
//! is converted to a [`Value`] first. The conversion plays the role of the
//! platform's structured clone: values that cannot survive it (non-string map
//! keys, non-finite floats) are rejected here, before they reach the peer.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::error;

use crate::config::SessionConfig;
use crate::error::CloneError;

pub fn to_transfer<T: Serialize + ?Sized>(value: &T) -> Result<Value, CloneError> {
    serde_json::to_value(value).map_err(CloneError::Outbound)
}

pub fn from_transfer<T: DeserializeOwned>(value: Value) -> Result<T, CloneError> {
    serde_json::from_value(value).map_err(CloneError::Inbound)
}

/// What the receiving side would observe after a transfer.
pub fn structured_clone<T: Serialize + DeserializeOwned>(value: &T) -> Result<T, CloneError> {
    from_transfer(to_transfer(value)?)
}

/// Reaction to a clone-boundary violation.
///
/// A violation is a programming error: every type sent across the boundary is
/// plain data. Strict guards panic so the bug is caught in development; lenient
/// guards log and let the caller drop the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloneGuard {
    strict: bool,
}

impl CloneGuard {
    #[must_use]
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.strict_clone_boundary)
    }

    #[must_use]
    pub fn is_strict(self) -> bool {
        self.strict
    }

    /// Report a violation raised while handling `context`.
    ///
    /// # Panics
    ///
    /// Panics when the guard is strict.
    pub fn report(self, context: &str, err: &CloneError) {
        error!(context, error = %err, "clone boundary violation");
        assert!(!self.strict, "clone boundary violation in {context}: {err}");
    }
}

impl Default for CloneGuard {
    fn default() -> Self {
        Self::new(cfg!(debug_assertions))
    }
}
