//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! lifecycle events → logging.rs (tracing subscriber, stdout)
//! request path     → metrics.rs (gauge/counter → Prometheus registry)
//!                       → scraped via GET /_metrics on the same listener
//! ```
//!
//! # Design Decisions
//! - Operators observe lifecycle state exclusively through log lines
//! - Metrics are cheap (atomic updates) and share the serving listener

pub mod logging;
pub mod metrics;
