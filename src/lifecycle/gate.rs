//! Request admission gate.
//!
//! # Responsibilities
//! - Admit requests while the server is serving
//! - Refuse new requests once shutdown begins
//! - Track in-flight requests so shutdown can wait for them
//!
//! The gate has two states, open and closing. It starts open and moves to
//! closing exactly once, from the shutdown sequence; it never reopens. While
//! open, admission costs one atomic increment on the request path.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::{self, Instant};

/// The gate could not drain before its deadline.
#[derive(Debug, thiserror::Error)]
#[error("drain deadline elapsed with {in_flight} request(s) still in flight")]
pub struct DrainTimeout {
    /// Requests still admitted when the deadline hit.
    pub in_flight: usize,
}

/// Admission control for the request path.
///
/// Cheap to clone; clones share state.
#[derive(Clone, Default)]
pub struct AdmissionGate {
    inner: Arc<GateInner>,
}

#[derive(Default)]
struct GateInner {
    closing: AtomicBool,
    in_flight: AtomicUsize,
    drained: Notify,
}

impl AdmissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit one request.
    ///
    /// Returns a permit to hold for the request's lifetime, or `None` once
    /// the gate is closing.
    pub fn admit(&self) -> Option<AdmissionPermit> {
        if self.inner.closing.load(Ordering::Acquire) {
            return None;
        }
        self.inner.in_flight.fetch_add(1, Ordering::AcqRel);
        // Closing may have begun between the check and the increment. The
        // closing side reads the counter after setting the flag, so undo the
        // slot and refuse to keep the drain count honest.
        if self.inner.closing.load(Ordering::Acquire) {
            self.inner.release();
            return None;
        }
        Some(AdmissionPermit {
            inner: Arc::clone(&self.inner),
        })
    }

    /// True once `begin_closing` has been called.
    pub fn is_closing(&self) -> bool {
        self.inner.closing.load(Ordering::Acquire)
    }

    /// Number of requests currently admitted.
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    /// Stop admitting new requests, then wait for in-flight ones to finish.
    ///
    /// Returns once the gate has drained or `drain_timeout` elapses,
    /// whichever comes first. The deadline is checked before the drained
    /// state, so a zero timeout always reports [`DrainTimeout`]. Invoked at
    /// most once per process lifetime; a second call is a usage error.
    pub async fn begin_closing(&self, drain_timeout: Duration) -> Result<(), DrainTimeout> {
        self.inner.closing.store(true, Ordering::Release);

        let deadline = Instant::now()
            .checked_add(drain_timeout)
            .unwrap_or_else(|| Instant::now() + Duration::from_secs(86400 * 365 * 30));

        tokio::select! {
            biased;
            _ = time::sleep_until(deadline) => Err(DrainTimeout {
                in_flight: self.in_flight(),
            }),
            _ = self.drained() => Ok(()),
        }
    }

    async fn drained(&self) {
        loop {
            // Register before reading the counter so a release between the
            // read and the await cannot be missed.
            let notified = self.inner.drained.notified();
            if self.inner.in_flight.load(Ordering::Acquire) == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl GateInner {
    fn release(&self) {
        if self.in_flight.fetch_sub(1, Ordering::AcqRel) == 1 && self.closing.load(Ordering::Acquire)
        {
            self.drained.notify_waiters();
        }
    }
}

/// Held for the lifetime of one admitted request.
///
/// Dropping the permit releases the in-flight slot; the last release during
/// closing wakes the drain waiter. Release happens on drop, so it holds even
/// when the handler panics.
pub struct AdmissionPermit {
    inner: Arc<GateInner>,
}

impl Drop for AdmissionPermit {
    fn drop(&mut self) {
        self.inner.release();
    }
}
