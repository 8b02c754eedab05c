//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::routing::RewriteSource;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Front-controller defaults and link base.
    pub app: ApplicationConfig,

    /// Route rules, in priority order.
    pub routes: Vec<RouteConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Front-controller settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Controller used when the resolved path is empty.
    pub default_controller: String,

    /// Action used when the resolved path names none.
    pub default_action: String,

    /// Base URL prefixed to composed links. May be empty (relative links).
    pub base_url: String,

    /// Named links, usually external, looked up by key.
    ///
    /// ```toml
    /// [app.urls]
    /// docs = "https://docs.example.com/"
    /// ```
    pub urls: BTreeMap<String, String>,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            default_controller: "home".to_string(),
            default_action: "index".to_string(),
            base_url: String::new(),
            urls: BTreeMap::new(),
        }
    }
}

/// One `(pattern, rewrite)` registration.
///
/// ```toml
/// [[routes]]
/// pattern = "home/[*]"
/// rewrite = ["mycollections", "get", "[*]"]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route identifier for logging.
    #[serde(default)]
    pub name: Option<String>,

    /// Pattern matched against the request path.
    pub pattern: String,

    /// Target path, as one string or a pre-split list.
    pub rewrite: RewriteSource,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    pub log_level: String,

    /// Pretty for development, JSON for production.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
