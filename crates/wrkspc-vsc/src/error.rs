//! Boundary errors.

use thiserror::Error;

use wrkspc_message::MessageKind;

/// A value could not cross the structured clone boundary.
#[derive(Debug, Error)]
pub enum CloneError {
    #[error("value cannot be cloned across the boundary: {0}")]
    Outbound(#[source] serde_json::Error),

    #[error("cloned value does not match the expected shape: {0}")]
    Inbound(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum TransportError {
    /// The other side of the channel is gone (webview disposed, host shut down).
    #[error("peer disconnected")]
    Disconnected,

    /// The sender tried to emit a message only the other side may send.
    #[error("`{0}` cannot be sent from this side")]
    WrongDirection(MessageKind),

    #[error(transparent)]
    Clone(#[from] CloneError),
}
