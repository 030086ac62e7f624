//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process arguments
//!     → cli.rs (split off the decode chain word, clap for the rest)
//!     → DecodeChain::from_str (reject unknown selectors)
//!     → Config (validated, immutable)
//!     → shared via Arc with every handler
//! ```
//!
//! # Design Decisions
//! - Config is immutable once built; there is no reload
//! - All fields have defaults, so no arguments means plaintext mode on :4000
//! - Any configuration error is fatal before the listener binds

pub mod cli;
pub mod schema;

pub use cli::{parse_args, ConfigError};
pub use schema::{Config, DecodeConfig, ListenerConfig, ObservabilityConfig};
