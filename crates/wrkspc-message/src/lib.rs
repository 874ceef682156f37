//! Messages crossing the wrkspc host/webview boundary.
//!
//! - message: the closed `Message` union and its `MessageKind` mirror
//! - payload: plain-data payload shapes
//! - decode: narrowing untrusted values, unknown-type tolerance
//! - sequence: sequence numbers and reordering for non-FIFO transports
//! - correlation: request ids and pending-reply tracking

pub mod correlation;
pub mod decode;
pub mod message;
pub mod payload;
pub mod sequence;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use correlation::{PendingRequests, RequestIdGenerator};
pub use decode::{accept, decode, encode, DecodeError, Decoded};
pub use message::{Message, MessageKind, Origin};
pub use payload::{
    AuthUpdatePayload, CsvContentPayload, CsvFailed, CsvLoaded, CsvRequestPayload,
    GatewayKeyPayload, PathPayload, RequestRef, RunCompletePayload, RunPayload, RunStatus,
    StreamingPayload,
};
pub use sequence::{Reorderer, Sequenced, Sequencer};
