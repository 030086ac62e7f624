//! Diagnostic HTTP capture listener library.

pub mod capture;
pub mod config;
pub mod decode;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::Config;
pub use decode::{apply_chain, DecodeChain, Decoder};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
