//! Environment configuration.

use std::time::Duration;

use scanstock_observability::LogFormat;
use scanstock_store::SettingsState;
use scanstock_sync::TriggerPolicy;

pub const DEFAULT_CARTRIDGE_SERVER_URL: &str = "http://localhost:4000/graphql";
pub const DEFAULT_DOCS_SERVER_URL: &str = "http://localhost:8000";
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub cartridge_server_url: String,
    pub docs_server_url: String,
    pub trigger: TriggerPolicy,
    pub http_timeout: Duration,
    pub log_format: LogFormat,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            cartridge_server_url: DEFAULT_CARTRIDGE_SERVER_URL.to_string(),
            docs_server_url: DEFAULT_DOCS_SERVER_URL.to_string(),
            trigger: TriggerPolicy::default(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            log_format: LogFormat::default(),
        }
    }
}

impl ClientConfig {
    /// Read `SCANSTOCK_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Malformed values fall back to
    /// the default with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("SCANSTOCK_CARTRIDGE_SERVER_URL") {
            config.cartridge_server_url = url;
        }
        if let Some(url) = lookup("SCANSTOCK_DOCS_SERVER_URL") {
            config.docs_server_url = url;
        }
        if let Some(raw) = lookup("SCANSTOCK_TRIGGER") {
            match raw.parse() {
                Ok(trigger) => config.trigger = trigger,
                Err(err) => tracing::warn!(%raw, %err, "ignoring SCANSTOCK_TRIGGER"),
            }
        }
        if let Some(raw) = lookup("SCANSTOCK_HTTP_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.http_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(%raw, "ignoring SCANSTOCK_HTTP_TIMEOUT_SECS"),
            }
        }
        if let Some(raw) = lookup("SCANSTOCK_LOG_FORMAT") {
            match raw.parse() {
                Ok(format) => config.log_format = format,
                Err(err) => tracing::warn!(%raw, %err, "ignoring SCANSTOCK_LOG_FORMAT"),
            }
        }

        config
    }

    /// Initial settings slice of the store.
    pub fn settings(&self) -> SettingsState {
        SettingsState {
            cartridge_server_url: self.cartridge_server_url.clone(),
            docs_server_url: self.docs_server_url.clone(),
        }
    }
}
