//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events on stderr)
//!     → tower_http TraceLayer (per-request spans at debug level)
//! ```

pub mod logging;
