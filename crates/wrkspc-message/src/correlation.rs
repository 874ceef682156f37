//! Request/reply correlation.
//!
//! Request-shaped messages embed a [`RequestId`] that the reply echoes. The
//! requester keeps the id in a [`PendingRequests`] table until the reply
//! arrives. Cancelling removes the id, so a reply that shows up afterwards is
//! recognized as late and ignored.
//!
//! A reloaded webview starts a fresh generator, so [`RequestIdGenerator::per_incarnation`]
//! folds an [`incarnation_nonce`] into the prefix to keep ids from colliding
//! with requests the previous incarnation left behind.

use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;
use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::{debug, warn};

use wrkspc_core::RequestId;

static INCARNATIONS: AtomicU64 = AtomicU64::new(0);

/// A value that differs between endpoint incarnations, across reloads and
/// within one process.
#[must_use]
pub fn incarnation_nonce() -> u32 {
    let count = INCARNATIONS.fetch_add(1, Ordering::Relaxed);
    let hash = RandomState::new().hash_one(count);
    let high = u32::try_from(hash >> 32).unwrap_or_default();
    let low = u32::try_from(hash & u64::from(u32::MAX)).unwrap_or_default();
    high ^ low
}

/// Mints ids of the form `<prefix>-<n>`, unique per generator.
#[derive(Debug, Clone)]
pub struct RequestIdGenerator {
    prefix: SmolStr,
    next: u64,
}

impl RequestIdGenerator {
    #[must_use]
    pub fn new(prefix: impl Into<SmolStr>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }

    /// Generator whose ids are `<prefix>-<nonce>-<n>`.
    #[must_use]
    pub fn per_incarnation(prefix: &str) -> Self {
        Self::new(format!("{prefix}-{:08x}", incarnation_nonce()))
    }

    pub fn next_id(&mut self) -> RequestId {
        let id = RequestId::new(format!("{}-{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

/// Outstanding requests with the context needed to handle their reply.
#[derive(Debug)]
pub struct PendingRequests<C> {
    requests: FxHashMap<RequestId, C>,
}

impl<C> Default for PendingRequests<C> {
    fn default() -> Self {
        Self {
            requests: FxHashMap::default(),
        }
    }
}

impl<C> PendingRequests<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `id`. A request re-sent under the same id replaces the earlier context.
    pub fn insert(&mut self, id: RequestId, context: C) -> Option<C> {
        let previous = self.requests.insert(id.clone(), context);
        if previous.is_some() {
            warn!(request_id = %id, "request id reused while still pending");
        }
        previous
    }

    /// Take the context for a reply. `None` means the reply is late or unsolicited.
    pub fn resolve(&mut self, id: &RequestId) -> Option<C> {
        let context = self.requests.remove(id);
        if context.is_none() {
            warn!(request_id = %id, "ignoring reply to unknown or cancelled request");
        }
        context
    }

    pub fn cancel(&mut self, id: &RequestId) -> Option<C> {
        let context = self.requests.remove(id);
        if context.is_some() {
            debug!(request_id = %id, "request cancelled");
        }
        context
    }

    #[must_use]
    pub fn contains(&self, id: &RequestId) -> bool {
        self.requests.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn clear(&mut self) {
        self.requests.clear();
    }
}
