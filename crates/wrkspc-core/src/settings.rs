//! User/workspace settings snapshot.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Settings the host reads from the editor configuration section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streaming: Option<bool>,
    /// Playground section, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playground: Option<Value>,
}

impl Settings {
    /// Streaming is on unless explicitly disabled.
    #[must_use]
    pub fn streaming_enabled(&self) -> bool {
        self.streaming.unwrap_or(true)
    }
}
