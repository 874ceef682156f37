//! Session configuration loaded from `wrkspc.toml`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

pub(crate) const CONFIG_FILES: &[&str] = &["wrkspc.toml", ".wrkspc.toml"];

/// Environment flag forcing the clone-boundary policy on or off.
pub const STRICT_CLONE_ENV: &str = "WRKSPC_STRICT_CLONE";

const DEFAULT_MAX_QUEUED: usize = 256;
const DEFAULT_REORDER_WINDOW: usize = 64;
const DEFAULT_LOG_FILTER: &str = "info";

/// How messages on one channel are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ordering {
    /// The transport delivers in send order; messages go out bare.
    #[default]
    Fifo,
    /// Messages are wrapped in sequence envelopes and reordered on receipt.
    Sequenced,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Config file path (if found).
    pub config_path: Option<PathBuf>,
    /// Host messages held while the webview is not ready. Oldest are dropped past this.
    pub max_queued_messages: usize,
    pub ordering: Ordering,
    /// Envelopes buffered while waiting for a missing sequence number.
    pub reorder_window: usize,
    /// Panic on clone-boundary violations instead of logging them.
    pub strict_clone_boundary: bool,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            config_path: None,
            max_queued_messages: DEFAULT_MAX_QUEUED,
            ordering: Ordering::Fifo,
            reorder_window: DEFAULT_REORDER_WINDOW,
            strict_clone_boundary: cfg!(debug_assertions),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl SessionConfig {
    /// Load configuration for a workspace root, then apply environment overrides.
    #[must_use]
    pub fn load(root: &Path) -> Self {
        Self::load_file(root).with_env(|name| std::env::var(name).ok())
    }

    /// Apply overrides read through `lookup`, which maps a variable name to its value.
    #[must_use]
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(STRICT_CLONE_ENV) {
            self.strict_clone_boundary = parse_flag(&raw);
        }
        self
    }

    /// Install the global subscriber using the `[log] filter` key.
    ///
    /// Returns `false` when a subscriber was already installed.
    pub fn init_logging(&self) -> bool {
        crate::logging::init(&self.log_filter)
    }

    fn load_file(root: &Path) -> Self {
        let Some(path) = find_config_file(root) else {
            return SessionConfig::default();
        };
        let Ok(contents) = std::fs::read_to_string(&path) else {
            warn!("Failed to read wrkspc config at {}", path.display());
            return SessionConfig {
                config_path: Some(path),
                ..SessionConfig::default()
            };
        };
        SessionConfig::from_contents(Some(path), &contents)
    }

    #[must_use]
    pub fn from_contents(config_path: Option<PathBuf>, contents: &str) -> Self {
        let mut config = SessionConfig {
            config_path,
            ..SessionConfig::default()
        };
        let parsed: ConfigFile = match toml::from_str(contents) {
            Ok(parsed) => parsed,
            Err(err) => {
                if let Some(path) = &config.config_path {
                    warn!("Failed to parse wrkspc config at {}: {err}", path.display());
                } else {
                    warn!("Failed to parse wrkspc config: {err}");
                }
                return config;
            }
        };

        let session = parsed.session;
        if let Some(max) = session.max_queued_messages {
            config.max_queued_messages = max;
        }
        if let Some(ordering) = session.ordering {
            config.ordering = ordering;
        }
        if let Some(window) = session.reorder_window {
            config.reorder_window = window;
        }
        if let Some(strict) = session.strict_clone_boundary {
            config.strict_clone_boundary = strict;
        }
        if let Some(filter) = parsed.log.filter {
            config.log_filter = filter;
        }
        config
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    session: SessionSection,
    #[serde(default)]
    log: LogSection,
}

#[derive(Debug, Default, Deserialize)]
struct SessionSection {
    max_queued_messages: Option<usize>,
    ordering: Option<Ordering>,
    reorder_window: Option<usize>,
    strict_clone_boundary: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct LogSection {
    filter: Option<String>,
}

pub(crate) fn find_config_file(root: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
}

fn parse_flag(raw: &str) -> bool {
    let value = raw.trim().to_ascii_lowercase();
    matches!(value.as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "wrkspc-config-{name}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn parses_session_and_log_sections() {
        let config = SessionConfig::from_contents(
            None,
            r#"
[session]
max_queued_messages = 8
ordering = "sequenced"
reorder_window = 3
strict_clone_boundary = false

[log]
filter = "wrkspc_vsc=debug"
"#,
        );
        assert_eq!(config.max_queued_messages, 8);
        assert_eq!(config.ordering, Ordering::Sequenced);
        assert_eq!(config.reorder_window, 3);
        assert!(!config.strict_clone_boundary);
        assert_eq!(config.log_filter, "wrkspc_vsc=debug");
    }

    #[test]
    fn missing_keys_keep_defaults() {
        let config = SessionConfig::from_contents(None, "[session]\nreorder_window = 5\n");
        let defaults = SessionConfig::default();
        assert_eq!(config.reorder_window, 5);
        assert_eq!(config.max_queued_messages, defaults.max_queued_messages);
        assert_eq!(config.ordering, Ordering::Fifo);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn invalid_toml_falls_back_to_defaults() {
        let path = PathBuf::from("wrkspc.toml");
        let config = SessionConfig::from_contents(Some(path.clone()), "[session\nordering = 1");
        assert_eq!(
            config,
            SessionConfig {
                config_path: Some(path),
                ..SessionConfig::default()
            }
        );
    }

    #[test]
    fn unknown_ordering_is_a_parse_failure() {
        let config = SessionConfig::from_contents(None, "[session]\nordering = \"lifo\"\n");
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn load_finds_hidden_config_file() {
        let root = scratch_dir("hidden");
        std::fs::write(
            root.join(".wrkspc.toml"),
            "[session]\nmax_queued_messages = 2\n",
        )
        .unwrap();
        let config = SessionConfig::load_file(&root);
        assert_eq!(config.max_queued_messages, 2);
        assert_eq!(config.config_path, Some(root.join(".wrkspc.toml")));
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn load_without_file_uses_defaults() {
        let root = scratch_dir("empty");
        assert_eq!(SessionConfig::load_file(&root), SessionConfig::default());
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn env_override_wins_over_the_file() {
        let root = scratch_dir("override");
        std::fs::write(
            root.join("wrkspc.toml"),
            "[session]\nstrict_clone_boundary = false\n",
        )
        .unwrap();
        let forced = SessionConfig::load_file(&root)
            .with_env(|name| (name == STRICT_CLONE_ENV).then(|| "on".to_string()));
        assert!(forced.strict_clone_boundary);
        let unset = SessionConfig::load_file(&root).with_env(|_| None);
        assert!(!unset.strict_clone_boundary);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn load_reads_the_process_environment() {
        let root = scratch_dir("env");
        std::fs::write(
            root.join("wrkspc.toml"),
            "[session]\nstrict_clone_boundary = true\nreorder_window = 9\n",
        )
        .unwrap();
        std::env::set_var(STRICT_CLONE_ENV, "0");
        let config = SessionConfig::load(&root);
        std::env::remove_var(STRICT_CLONE_ENV);
        assert!(!config.strict_clone_boundary);
        assert_eq!(config.reorder_window, 9);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn init_logging_installs_once() {
        let config = SessionConfig::from_contents(None, "[log]\nfilter = \"wrkspc_vsc=trace\"\n");
        config.init_logging();
        assert!(!config.init_logging());
    }

    #[test]
    fn flag_values() {
        for raw in ["1", "true", " YES ", "on"] {
            assert!(parse_flag(raw), "{raw}");
        }
        for raw in ["0", "false", "off", ""] {
            assert!(!parse_flag(raw), "{raw}");
        }
    }
}
