//! Narrowing raw boundary values into [`Message`]s.
//!
//! A value crossing the boundary is untrusted: the other side may run a
//! different build. Unknown `type` literals are reported as
//! [`Decoded::Unknown`] so receivers can log and move on.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::message::{Message, MessageKind, Origin};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("message is not an object")]
    NotAnObject,

    #[error("message has no string `type`")]
    MissingType,

    #[error("malformed `{kind}` message: {reason}")]
    Malformed { kind: MessageKind, reason: String },
}

/// Result of narrowing a well-formed envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Known(Message),
    /// Envelope with a `type` this build does not know.
    Unknown { type_name: String },
}

pub fn decode(raw: Value) -> Result<Decoded, DecodeError> {
    let Some(object) = raw.as_object() else {
        return Err(DecodeError::NotAnObject);
    };
    let Some(type_name) = object.get("type").and_then(Value::as_str) else {
        return Err(DecodeError::MissingType);
    };
    let Some(kind) = MessageKind::from_type(type_name) else {
        return Ok(Decoded::Unknown {
            type_name: type_name.to_string(),
        });
    };
    serde_json::from_value(raw)
        .map(Decoded::Known)
        .map_err(|err| DecodeError::Malformed {
            kind,
            reason: err.to_string(),
        })
}

/// Decode for a receiver on `receiver` side, logging and discarding anything it
/// cannot act on: undecodable values, unknown types and messages that only the
/// receiver itself may emit.
#[must_use]
pub fn accept(raw: Value, receiver: Origin) -> Option<Message> {
    match decode(raw) {
        Ok(Decoded::Known(message)) => {
            if message.origin() == receiver {
                warn!(
                    kind = %message.kind(),
                    receiver = receiver.as_str(),
                    "ignoring message sent in the wrong direction"
                );
                return None;
            }
            debug!(kind = %message.kind(), "received message");
            Some(message)
        }
        Ok(Decoded::Unknown { type_name }) => {
            warn!(
                type_name = %type_name,
                receiver = receiver.as_str(),
                "ignoring message of unknown type"
            );
            None
        }
        Err(err) => {
            warn!(error = %err, receiver = receiver.as_str(), "ignoring undecodable message");
            None
        }
    }
}

pub fn encode(message: &Message) -> Result<Value, serde_json::Error> {
    serde_json::to_value(message)
}
