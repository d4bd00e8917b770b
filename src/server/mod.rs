//! Server lifecycle controller.
//!
//! # Responsibilities
//! - Overlay the metrics route on the caller's router
//! - Bind and serve, plaintext or TLS
//! - Arm the signal watcher and run the shutdown sequence
//! - Distinguish intentional stop from genuine listener failure
//!
//! # States
//! ```text
//! Starting → Serving → ShuttingDown → Stopped
//! ```
//! ShuttingDown is entered exactly once, from Serving, by the first trigger;
//! Stopped is terminal.
//!
//! # Shutdown sequence
//! ```text
//! trigger
//!     → close admission gate   (bounded; errors logged, sequence continues)
//!     → run cleanup hook       (synchronous, caller's responsibility)
//!     → drain listener         (bounded; errors logged, sequence stops)
//!     → grace race             (informational log only)
//! ```
//! Gate closing always precedes cleanup, and cleanup always precedes the
//! listener drain: cleanup code may rely on no new requests arriving while
//! the listener's resources are still alive.

use std::net::SocketAddr;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use metrics::{counter, gauge};
use tokio::sync::watch;
use tokio::time;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::lifecycle::gate::AdmissionGate;
use crate::lifecycle::shutdown::{Shutdown, ShutdownContext};
use crate::lifecycle::signals;
use crate::observability;

/// Path the Prometheus exposition route is mounted at.
pub const METRICS_PATH: &str = "/_metrics";

/// Anything that can yield the request-routing entry point.
pub trait Routes {
    fn into_router(self) -> Router;
}

impl Routes for Router {
    fn into_router(self) -> Router {
        self
    }
}

/// Errors fatal to the serving lifecycle.
///
/// Shutdown-path failures never surface here; they are logged and absorbed
/// so shutdown always completes.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid listen address {addr:?}: {source}")]
    Address {
        addr: String,
        source: std::net::AddrParseError,
    },

    #[error("failed to load TLS material: {0}")]
    Tls(#[source] std::io::Error),

    #[error("listener error: {0}")]
    Listener(#[from] std::io::Error),
}

/// The server lifecycle controller.
///
/// Owns the listener and the admission gate for their entire lifetime; no
/// other component mutates them.
pub struct Server {
    config: ServerConfig,
    shutdown: Shutdown,
    gate: AdmissionGate,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            shutdown: Shutdown::new(),
            gate: AdmissionGate::new(),
        }
    }

    /// Handle embedders and tests use to request shutdown without an OS
    /// signal.
    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Bring the listener up and serve until shutdown.
    ///
    /// Blocks for the entire serving lifetime. Returns `Ok(())` after a
    /// clean intentional shutdown; a genuine listener failure (bind error,
    /// bad TLS material) is logged and returned. `cleanup` runs once, during
    /// the shutdown sequence, after admission has closed and before the
    /// listener stops.
    pub async fn start<R, F>(self, routes: R, cleanup: F) -> Result<(), ServerError>
    where
        R: Routes,
        F: FnOnce() + Send + 'static,
    {
        let Server {
            config,
            shutdown,
            gate,
        } = self;

        let addr: SocketAddr = config.addr.parse().map_err(|source| ServerError::Address {
            addr: config.addr.clone(),
            source,
        })?;

        // Install the recorder before traffic so gate metrics land in the
        // registry from the first request.
        let _ = observability::metrics::prometheus_handle();

        let app = routes
            .into_router()
            .route(METRICS_PATH, get(render_metrics))
            // Allow twice the nominal request budget so slow clients do not
            // trip the cutoff meant for hung handlers.
            .layer(TimeoutLayer::new(config.request_timeout() * 2))
            .layer(middleware::from_fn_with_state(gate.clone(), admit))
            .layer(TraceLayer::new_for_http());

        let handle = Handle::new();
        let (done_tx, done_rx) = watch::channel(false);

        let armed = signals::arm(shutdown.clone());
        tokio::spawn(run_shutdown_sequence(
            shutdown,
            config.clone(),
            gate,
            handle.clone(),
            done_rx,
            armed,
            cleanup,
        ));

        info!(address = %addr, api_version = %config.api_version, "Starting a new server");

        let served = if config.tls.enabled {
            let tls = RustlsConfig::from_pem_file(&config.tls.cert_path, &config.tls.key_path)
                .await
                .map_err(|e| {
                    error!("A tls server listener error: {e}");
                    ServerError::Tls(e)
                })?;
            axum_server::bind_rustls(addr, tls)
                .handle(handle)
                .serve(app.into_make_service())
                .await
        } else {
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await
        };

        let _ = done_tx.send(true);

        let result = served.map_err(|e| {
            error!("A server listener error: {e}");
            ServerError::Listener(e)
        });
        info!("Server is down");
        result
    }
}

/// The shutdown sequence, run once per process lifetime.
///
/// Every failure past the trigger is absorbed and logged: shutdown must
/// complete even when a step degrades.
async fn run_shutdown_sequence<F>(
    shutdown: Shutdown,
    config: ServerConfig,
    gate: AdmissionGate,
    handle: Handle,
    mut served: watch::Receiver<bool>,
    armed: signals::SignalGuard,
    cleanup: F,
) where
    F: FnOnce() + Send + 'static,
{
    let mut trigger = shutdown.subscribe();
    // The subscription may postdate a very early trigger; the flag covers
    // that window.
    if !shutdown.is_triggered() && trigger.recv().await.is_err() {
        return;
    }

    info!("Shutting down the http server");

    let shutdown_timeout = config.shutdown_timeout();

    // Stop admitting new requests and give in-flight ones a bounded window.
    // A drain timeout degrades the shutdown but must not abort it: the
    // listener still gets told to stop below.
    if let Err(e) = gate.begin_closing(shutdown_timeout).await {
        error!("Error closing the admission gate: {e}");
    }

    // The context owns the signal guard: whichever way the sequence exits,
    // dropping it disarms further signal notifications.
    let ctx = ShutdownContext::begin(shutdown_timeout, armed);

    // Runs after admission closed and before the listener stops, so cleanup
    // code can rely on no new requests while the listener's resources are
    // still alive. Its errors are the caller's responsibility.
    cleanup();

    // Stop accepting connections and finish in-flight responses, forcing the
    // cutoff at the context deadline. Deadline checked first: a spent budget
    // is reported even if the listener resolved in the same instant.
    handle.graceful_shutdown(Some(ctx.remaining()));
    tokio::select! {
        biased;
        _ = time::sleep_until(ctx.deadline()) => {
            error!("Error shutting down the http server: graceful shutdown deadline exceeded");
            return;
        }
        _ = served.changed() => {}
    }

    // Purely observational: the listener's fate was decided above, this only
    // reports whether the drain outlived the grace window.
    tokio::select! {
        biased;
        _ = time::sleep_until(ctx.deadline()) => {}
        _ = time::sleep(config.graceful_timeout()) => info!("Not all connections are done"),
    }
}

/// Admission-gate middleware.
///
/// Refuses new requests once the server is shutting down and accounts
/// in-flight work while it is serving.
async fn admit(State(gate): State<AdmissionGate>, req: Request, next: Next) -> Response {
    let Some(_permit) = gate.admit() else {
        counter!("server_requests_rejected_total").increment(1);
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    };
    gauge!("server_requests_in_flight").increment(1.0);
    let response = next.run(req).await;
    gauge!("server_requests_in_flight").decrement(1.0);
    response
}

/// `GET /_metrics`: Prometheus text exposition.
async fn render_metrics() -> String {
    observability::metrics::prometheus_handle().render()
}
