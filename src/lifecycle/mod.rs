//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → Log chain → Bind listener → Start signal watcher → Serve
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!     second signal  → immediate exit
//!
//! Shutdown (shutdown.rs):
//!     Trigger → Stop accepting → Drain open connections (bounded) → Exit
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
