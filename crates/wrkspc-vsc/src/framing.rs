//! Outgoing and incoming framing for one side of the channel.
//!
//! With [`Ordering::Fifo`] messages travel bare. With [`Ordering::Sequenced`]
//! they are wrapped in [`Sequenced`] envelopes and incoming envelopes are
//! released through a [`Reorderer`].

use serde_json::Value;
use tracing::warn;

use wrkspc_message::{Message, Reorderer, Sequenced, Sequencer};

use crate::clone::{from_transfer, to_transfer};
use crate::config::{Ordering, SessionConfig};
use crate::error::CloneError;

#[derive(Debug)]
pub(crate) struct Framing {
    ordering: Ordering,
    sequencer: Sequencer,
    reorderer: Reorderer<Value>,
}

impl Framing {
    pub(crate) fn new(config: &SessionConfig) -> Self {
        Self {
            ordering: config.ordering,
            sequencer: Sequencer::new(),
            reorderer: Reorderer::new(config.reorder_window),
        }
    }

    pub(crate) fn frame(&mut self, message: &Message) -> Result<Value, CloneError> {
        match self.ordering {
            Ordering::Fifo => to_transfer(message),
            Ordering::Sequenced => to_transfer(&self.sequencer.wrap(message)),
        }
    }

    /// Raw messages ready for decoding, in order.
    pub(crate) fn unframe(&mut self, raw: Value) -> Vec<Value> {
        match self.ordering {
            Ordering::Fifo => vec![raw],
            Ordering::Sequenced => match from_transfer::<Sequenced<Value>>(raw) {
                Ok(envelope) => self.reorderer.push(envelope),
                Err(err) => {
                    warn!(error = %err, "dropping message without a sequence envelope");
                    Vec::new()
                }
            },
        }
    }

    /// Move outgoing messages to a new epoch numbered from the first sequence number.
    pub(crate) fn restart(&mut self) {
        self.sequencer.reset();
    }
}
