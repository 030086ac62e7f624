//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, body limit, trace layer)
//!     → handlers.rs (acknowledge, then spawn capture work)
//!     → capture::report (render block)
//!     → capture::sink (stdout)
//! ```

pub mod handlers;
pub mod server;

pub use server::{AppState, HttpServer};
