//! Opaque authentication reference kept in the `auth` slice.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

const MASK: &str = "****";
const VISIBLE_SUFFIX: usize = 4;

/// Reference to the session gateway the host authenticated against.
///
/// Only the provider name and a masked key hint ever reach the webview; the
/// secret stays with the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthGateway {
    pub provider: SmolStr,
    pub masked_key: String,
}

impl AuthGateway {
    /// Build a reference from a raw key, keeping only its last four characters.
    #[must_use]
    pub fn from_key(provider: impl Into<SmolStr>, key: &str) -> Self {
        let key = key.trim();
        let count = key.chars().count();
        let masked_key = if count <= VISIBLE_SUFFIX {
            MASK.to_string()
        } else {
            let suffix: String = key.chars().skip(count - VISIBLE_SUFFIX).collect();
            format!("{MASK}{suffix}")
        };
        Self {
            provider: provider.into(),
            masked_key,
        }
    }
}
