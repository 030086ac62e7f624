//! Request capture subsystem.
//!
//! # Data Flow
//! ```text
//! POST body / GET query string
//!     → params.rs (split into key/value pairs)
//!     → decode::DecodeChain (per value, failures isolated per key)
//!     → report.rs (render one text block per request)
//!     → sink.rs (stdout, or a channel for tests)
//! ```
//!
//! # Design Decisions
//! - POST always logs raw values; GET only logs decode attempts
//! - A failed decode is reported inline and never affects other keys
//! - Blocks are written whole to keep concurrent requests readable

pub mod params;
pub mod report;
pub mod sink;

pub use params::{parse_params, CapturedParam};
pub use report::{get_report, post_report};
pub use sink::{ChannelSink, ReportSink, StdoutSink};
