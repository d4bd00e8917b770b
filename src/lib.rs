//! Graceful lifecycle controller for a network-facing HTTP server.
//!
//! Starts one listener, serves until told to stop, and on termination drains
//! in-flight work within bounded time before returning.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌────────────────────────────────────────────────────┐
//!                  │                  graceful-server                    │
//!                  │                                                     │
//!  Client request  │  ┌───────────┐   ┌─────────────┐   caller's Router  │
//!  ────────────────┼─▶│ admission │──▶│ timeout +   │──▶ (+ /_metrics    │
//!                  │  │   gate    │   │ trace layer │     overlay)       │
//!                  │  └───────────┘   └─────────────┘                    │
//!                  │                                                     │
//!  SIGINT/SIGTERM  │  ┌───────────┐   ┌─────────────────────────────┐   │
//!  ────────────────┼─▶│  signal   │──▶│ shutdown sequence:          │   │
//!                  │  │  watcher  │   │ close gate → cleanup →      │   │
//!                  │  └───────────┘   │ drain listener → grace race │   │
//!                  │                  └─────────────────────────────┘   │
//!                  └────────────────────────────────────────────────────┘
//! ```
//!
//! The listener and the admission gate are owned by [`server::Server`] for
//! their entire lifetime. Exactly one shutdown sequence runs per process;
//! repeated signals are ignored. The drain is cooperative, not preemptive:
//! handlers that ignore cancellation may still be running at process exit.

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod server;

pub use config::{load_config, ConfigError, ServerConfig, TlsConfig};
pub use lifecycle::{AdmissionGate, AdmissionPermit, DrainTimeout, Shutdown};
pub use server::{Routes, Server, ServerError, METRICS_PATH};
