//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Serving:
//!     request → gate.rs (admit, track in flight) → handler
//!
//! Shutdown:
//!     signals.rs (SIGTERM/SIGINT)
//!         → shutdown.rs (one-shot trigger, broadcast)
//!         → server orchestration task:
//!             close gate → run cleanup → drain listener → grace race
//! ```
//!
//! # Design Decisions
//! - Ordered shutdown: stop admission, then cleanup, then listener drain
//! - Every step bounded by its own deadline; a stuck step degrades the
//!   shutdown, it never hangs it
//! - Signal disarm is scoped to the sequence's activation record (Drop)

pub mod gate;
pub mod shutdown;
pub mod signals;

pub use gate::{AdmissionGate, AdmissionPermit, DrainTimeout};
pub use shutdown::{Shutdown, ShutdownContext};
pub use signals::SignalGuard;
