//! Decoding subsystem.
//!
//! # Data Flow
//! ```text
//! selector string ("0bu")
//!     → chain.rs (parse into DecodeChain, validated once at startup)
//!     → decoder.rs (Hex / Base64 / URL / HTML transforms)
//!         html.rs (character references, browser rules)
//!     → Decoded { bytes, applied } or ChainError { index, stage, .. }
//! ```
//!
//! # Design Decisions
//! - The decoder set is a closed enum; dispatch is an exhaustive match
//! - A failing stage aborts the whole chain, no partial output escapes
//! - Text stages decode UTF-8 lossily and never reject input themselves

pub mod chain;
pub mod decoder;
pub mod html;

pub use chain::{apply_chain, ChainError, ChainParseError, DecodeChain, Decoded};
pub use decoder::{DecodeError, Decoder};
