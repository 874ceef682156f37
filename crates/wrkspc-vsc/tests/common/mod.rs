#![allow(dead_code)]

use wrkspc_vsc::memory::{channel, HostEndpoint, WebviewEndpoint};
use wrkspc_vsc::{HostEffect, HostSession, SessionConfig, WebviewClient};

pub fn strict_config() -> SessionConfig {
    SessionConfig {
        strict_clone_boundary: true,
        ..SessionConfig::default()
    }
}

/// A host session and a webview client wired through the in-memory channel.
pub struct Harness {
    pub host: HostSession<HostEndpoint>,
    pub webview: WebviewClient<WebviewEndpoint>,
}

impl Harness {
    pub fn new(config: &SessionConfig) -> Self {
        wrkspc_vsc::logging::try_init_for_tests();
        let (host, webview) = channel();
        Self {
            host: HostSession::new(host, config),
            webview: WebviewClient::new(webview, config),
        }
    }

    /// Deliver everything the webview posted to the host.
    pub fn pump_host(&mut self) -> Vec<HostEffect> {
        let mut effects = Vec::new();
        for raw in self.host.port().drain() {
            effects.extend(self.host.receive(raw).effects);
        }
        effects
    }

    /// Deliver everything the host posted to the webview.
    pub fn pump_webview(&mut self) -> usize {
        let inbox = self.webview.store().api().drain();
        inbox.into_iter().map(|raw| self.webview.receive(raw)).sum()
    }

    /// Pump both directions until nothing is in flight.
    pub fn settle(&mut self) -> Vec<HostEffect> {
        let mut effects = Vec::new();
        loop {
            let host_effects = self.pump_host();
            let applied = self.pump_webview();
            let idle = host_effects.is_empty() && applied == 0;
            effects.extend(host_effects);
            if idle {
                break;
            }
        }
        effects
    }
}
