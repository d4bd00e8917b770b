//! Configuration schema definitions.
//!
//! All types derive Serde traits and carry defaults, so an empty config file
//! (or none at all) still yields a runnable server.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the server lifecycle controller.
///
/// Immutable once handed to the server; there is no reload path.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address (e.g., "0.0.0.0:8080").
    pub addr: String,

    /// Upper bound in seconds for each shutdown step: admission-gate drain
    /// and listener drain each get their own deadline of this length.
    pub shutdown_timeout_secs: u64,

    /// Secondary drain window in seconds, observed after the listener
    /// shutdown resolved. Outliving it is logged, never enforced.
    pub graceful_timeout_secs: u64,

    /// Path the caller is expected to wire its health route at.
    pub health_path: String,

    /// API version tag, available to route builders.
    pub api_version: String,

    /// Per-request timeout in seconds. The request path allows twice this
    /// as headroom for slow clients.
    pub request_timeout_secs: u64,

    /// Requests per second, consumed by external rate-limit middleware.
    /// The lifecycle controller never enforces it.
    pub rate_limit: u64,

    /// TLS settings for the listener.
    pub tls: TlsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_string(),
            shutdown_timeout_secs: 20,
            graceful_timeout_secs: 21,
            health_path: "/_health".to_string(),
            api_version: "v1".to_string(),
            request_timeout_secs: 20,
            rate_limit: 1000,
            tls: TlsConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    pub fn graceful_timeout(&self) -> Duration {
        Duration::from_secs(self.graceful_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// TLS configuration for the listener.
///
/// Cert and key paths are only read when `enabled` is set.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Serve TLS when set; cert_path and key_path must then be non-empty.
    pub enabled: bool,

    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}
