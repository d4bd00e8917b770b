//! Shutdown coordination.
//!
//! # Data Flow
//! ```text
//! SIGTERM/SIGINT (signals.rs) or an embedder's handle
//!     → Shutdown::trigger (first call wins)
//!     → broadcast to the orchestration task
//!     → ShutdownContext scopes the drain deadline and the signal disarm
//! ```
//!
//! # Design Decisions
//! - Trigger is CAS-guarded: repeated signals never start a second sequence
//! - The coordinator is owned and injectable, not process-global state, so
//!   multiple server instances can coexist in one process

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::Instant;

use crate::lifecycle::signals::SignalGuard;

/// Clonable one-shot trigger for graceful shutdown.
#[derive(Clone)]
pub struct Shutdown {
    inner: Arc<ShutdownInner>,
}

struct ShutdownInner {
    tx: broadcast::Sender<()>,
    triggered: AtomicBool,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            inner: Arc::new(ShutdownInner {
                tx,
                triggered: AtomicBool::new(false),
            }),
        }
    }

    /// Subscribe to the shutdown notification.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.inner.tx.subscribe()
    }

    /// Request shutdown.
    ///
    /// Only the first call per process lifetime fires; later calls (repeated
    /// signals) are ignored. Returns whether this call initiated shutdown.
    pub fn trigger(&self) -> bool {
        if self
            .inner
            .triggered
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            let _ = self.inner.tx.send(());
            true
        } else {
            false
        }
    }

    /// True once shutdown has been requested.
    pub fn is_triggered(&self) -> bool {
        self.inner.triggered.load(Ordering::Acquire)
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Scope of one shutdown sequence run.
///
/// Carries the drain deadline and owns the signal-watcher guard: whichever
/// way the sequence exits, dropping the context disarms further signal
/// notifications.
pub struct ShutdownContext {
    deadline: Instant,
    _signals: SignalGuard,
}

impl ShutdownContext {
    pub fn begin(timeout: Duration, signals: SignalGuard) -> Self {
        Self {
            deadline: Instant::now()
                .checked_add(timeout)
                .unwrap_or_else(|| Instant::now() + Duration::from_secs(86400 * 365 * 30)),
            _signals: signals,
        }
    }

    /// Deadline for every blocking operation scoped to this sequence.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Budget left until the deadline; zero once elapsed.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}
