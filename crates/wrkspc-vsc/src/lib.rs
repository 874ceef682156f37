//! Host and webview sides of the wrkspc state synchronization layer.
//!
//! - transport: capability traits each side acquires
//! - memory: in-process channel pair implementing both traits
//! - clone: structured clone boundary and violation policy
//! - store: webview state container (read, replace, read-modify-write)
//! - host: host session owning the state, reducer and outbox
//! - webview: webview client applying host messages
//! - bus: per-kind subscriptions for the webview UI
//! - config/logging: session settings and `tracing` setup

pub mod bus;
pub mod clone;
pub mod config;
pub mod error;
mod framing;
pub mod host;
pub mod logging;
pub mod memory;
pub mod store;
pub mod transport;
pub mod webview;

pub use bus::{MessageBus, SubscriptionId};
pub use clone::{from_transfer, structured_clone, to_transfer, CloneGuard};
pub use config::{Ordering, SessionConfig};
pub use error::{CloneError, TransportError};
pub use host::{reduce, DispatchOutcome, HostEffect, HostSession, Reduction};
pub use store::{StateStore, UpdateQueue};
pub use transport::{HostPort, WebviewApi};
pub use webview::WebviewClient;
