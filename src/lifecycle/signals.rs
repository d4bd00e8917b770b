//! OS signal handling.
//!
//! # Responsibilities
//! - Register SIGINT/SIGTERM handlers
//! - Translate the first signal into a shutdown trigger
//! - Stop listening after the first signal (no re-entrant shutdown)

use tokio::task::JoinHandle;

use crate::lifecycle::shutdown::Shutdown;

/// Arm the signal watcher.
///
/// The watcher triggers `shutdown` on the first SIGINT or SIGTERM and then
/// exits. Dropping the returned guard disarms it.
pub fn arm(shutdown: Shutdown) -> SignalGuard {
    let task = tokio::spawn(async move {
        termination_signal().await;
        tracing::debug!("termination signal received");
        shutdown.trigger();
    });
    SignalGuard { task }
}

/// Disarms the signal watcher when dropped.
pub struct SignalGuard {
    task: JoinHandle<()>,
}

impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Resolves on the first termination signal the process receives.
///
/// SIGTERM is what Kubernetes and service managers send; SIGINT covers
/// Ctrl-C in local runs. On non-Unix targets only Ctrl-C is available.
async fn termination_signal() {
    let interrupt = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => {}
        _ = terminate => {}
    }
}
