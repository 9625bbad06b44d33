//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::handler::DEFAULT_FAIL_MESSAGE;

/// Root configuration: server settings plus the route tree.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener settings for the bundled server.
    pub server: ServerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Fallback installed on the root node.
    pub fallback: FallbackConfig,

    /// Handler for the root node itself.
    pub handler: Option<String>,

    /// Middleware run on every request.
    pub middleware: Vec<String>,

    /// Children of the root node, in matching order.
    pub routes: Vec<RouteConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of plain text.
    pub json: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9100".to_string(),
        }
    }
}

/// Status and message written when nothing else answers.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub status: u16,
    pub message: String,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            status: 501,
            message: DEFAULT_FAIL_MESSAGE.to_string(),
        }
    }
}

/// One node of the route tree.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouteConfig {
    /// Route identifier for logging.
    pub name: String,

    /// Accepted methods; absent means any.
    pub methods: Option<Vec<String>>,

    /// Accepted schemes; absent means any.
    pub schemes: Option<Vec<String>>,

    /// Path template, e.g. `/song/{id:int}`.
    pub path: Option<String>,

    /// Literal prefix stripped before children match.
    pub path_prefix: Option<String>,

    /// Registry name of the terminal handler.
    pub handler: Option<String>,

    /// Registry name of the fallback handler.
    pub fail: Option<String>,

    /// Registry names of middleware, in order.
    pub middleware: Vec<String>,

    /// Child routes, in matching order.
    pub routes: Vec<RouteConfig>,
}
