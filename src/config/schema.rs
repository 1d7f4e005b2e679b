//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the merger.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration for the subscription merger.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Public route settings.
    pub route: RouteConfig,

    /// Where the list of sources comes from.
    pub source_list: SourceListConfig,

    /// Per-subscription fetch settings.
    pub subscriptions: SubscriptionConfig,

    /// Optional descriptive response headers.
    pub profile: ProfileConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Route configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouteConfig {
    /// Secret path segment every request must start with.
    pub prefix: String,
}

/// How the source list is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Read a document from the local filesystem.
    Local,
    /// Download the document over HTTP.
    #[default]
    Remote,
}

/// Source list configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceListConfig {
    pub mode: SourceMode,

    /// Path of the local document (local mode).
    pub local_path: PathBuf,

    /// Location of the remote document (remote mode).
    pub url: String,

    /// Optional token sent as a bearer credential (remote mode).
    pub token: Option<String>,

    /// Timeout of the source-list download in milliseconds.
    pub timeout_ms: u64,
}

impl Default for SourceListConfig {
    fn default() -> Self {
        Self {
            mode: SourceMode::Remote,
            local_path: PathBuf::from("configs.txt"),
            url: String::new(),
            token: None,
            timeout_ms: 6000,
        }
    }
}

impl SourceListConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Subscription fetch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SubscriptionConfig {
    /// Timeout of a single subscription fetch in milliseconds.
    pub timeout_ms: u64,

    /// Line prefixes recognized as inline entries.
    pub inline_prefixes: Vec<String>,

    /// User-Agent sent upstream.
    pub user_agent: String,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 3000,
            inline_prefixes: vec!["vless://".to_string()],
            user_agent: concat!("subscription-merger/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl SubscriptionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Values for the optional profile headers. `None` means the header is omitted.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProfileConfig {
    pub title: Option<String>,
    pub support_url: Option<String>,
    pub web_page_url: Option<String>,
    pub announce: Option<String>,
    pub update_interval: Option<String>,
    pub provider_id: Option<String>,
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format ("compact" or "json").
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "compact".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
