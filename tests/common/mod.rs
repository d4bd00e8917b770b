//! Shared utilities for lifecycle integration tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tokio::task::JoinHandle;

use graceful_server::{Server, ServerConfig, ServerError, Shutdown};

/// Config pointing at a fixed loopback port, with short timeouts so failed
/// drains surface quickly.
#[allow(dead_code)]
pub fn test_config(port: u16) -> ServerConfig {
    ServerConfig {
        addr: format!("127.0.0.1:{port}"),
        shutdown_timeout_secs: 2,
        graceful_timeout_secs: 3,
        ..ServerConfig::default()
    }
}

/// Router with an instant route and a slow one for drain tests.
#[allow(dead_code)]
pub fn test_routes() -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                "slow ok"
            }),
        )
}

/// Spawn a server on `config`. Returns the shutdown handle, a counter of
/// cleanup invocations, and the join handle of the blocked `start` call.
#[allow(dead_code)]
pub fn spawn_server(
    config: ServerConfig,
) -> (
    Shutdown,
    Arc<AtomicU32>,
    JoinHandle<Result<(), ServerError>>,
) {
    let server = Server::new(config);
    let shutdown = server.shutdown_handle();
    let cleanups = Arc::new(AtomicU32::new(0));
    let counter = cleanups.clone();
    let task = tokio::spawn(async move {
        server
            .start(test_routes(), move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .await
    });
    (shutdown, cleanups, task)
}

/// Poll until the server accepts TCP connections.
#[allow(dead_code)]
pub async fn wait_until_serving(addr: &str) {
    for _ in 0..100 {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("server at {addr} never came up");
}
