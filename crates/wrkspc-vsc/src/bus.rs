//! Per-kind message subscriptions for the webview UI.
//!
//! Handlers run in registration order. A handler error is logged and does not
//! stop the remaining handlers or the receive loop.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use wrkspc_message::{Message, MessageKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&Message) -> anyhow::Result<()>>;

struct Subscription {
    handler: Handler,
    once: bool,
}

#[derive(Default)]
pub struct MessageBus {
    subscriptions: FxHashMap<MessageKind, IndexMap<SubscriptionId, Subscription>>,
    owners: FxHashMap<SubscriptionId, MessageKind>,
    next_id: u64,
}

impl MessageBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(
        &mut self,
        kind: MessageKind,
        handler: impl FnMut(&Message) -> anyhow::Result<()> + 'static,
    ) -> SubscriptionId {
        self.subscribe(kind, Box::new(handler), false)
    }

    /// Subscribe for the next message of `kind` only.
    pub fn once(
        &mut self,
        kind: MessageKind,
        handler: impl FnMut(&Message) -> anyhow::Result<()> + 'static,
    ) -> SubscriptionId {
        self.subscribe(kind, Box::new(handler), true)
    }

    fn subscribe(&mut self, kind: MessageKind, handler: Handler, once: bool) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscriptions
            .entry(kind)
            .or_default()
            .insert(id, Subscription { handler, once });
        self.owners.insert(id, kind);
        id
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        let Some(kind) = self.owners.remove(&id) else {
            return false;
        };
        if let Some(bucket) = self.subscriptions.get_mut(&kind) {
            bucket.shift_remove(&id);
            if bucket.is_empty() {
                self.subscriptions.remove(&kind);
            }
        }
        true
    }

    /// Deliver `message` to its subscribers. Returns how many handlers ran.
    pub fn emit(&mut self, message: &Message) -> usize {
        let kind = message.kind();
        let Some(bucket) = self.subscriptions.get_mut(&kind) else {
            debug!(kind = %kind, "no subscribers");
            return 0;
        };

        let mut finished = Vec::new();
        for (id, subscription) in bucket.iter_mut() {
            if let Err(err) = (subscription.handler)(message) {
                warn!(kind = %kind, error = %err, "message handler failed");
            }
            if subscription.once {
                finished.push(*id);
            }
        }
        let ran = bucket.len();
        for id in finished {
            self.off(id);
        }
        ran
    }

    #[must_use]
    pub fn listener_count(&self, kind: MessageKind) -> usize {
        self.subscriptions.get(&kind).map_or(0, IndexMap::len)
    }

    pub fn clear(&mut self) {
        self.subscriptions.clear();
        self.owners.clear();
    }
}

impl std::fmt::Debug for MessageBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut counts: Vec<_> = self
            .subscriptions
            .iter()
            .map(|(kind, bucket)| (kind.as_str(), bucket.len()))
            .collect();
        counts.sort_unstable();
        f.debug_struct("MessageBus")
            .field("subscriptions", &counts)
            .finish()
    }
}
