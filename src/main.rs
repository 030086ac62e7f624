//! Exfil Listener
//!
//! A diagnostic HTTP listener that captures request data and reverses a
//! configurable chain of encodings applied to it.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request          ┌──────────────────────────────────────────────┐
//!     ────────────────────────┼─▶ http::server ──▶ http::handlers ──▶ 200 ack │
//!                             │                         │                    │
//!                             │                   (spawned task)             │
//!                             │                         ▼                    │
//!                             │   capture::params ──▶ decode::chain          │
//!                             │                         │                    │
//!                             │                         ▼                    │
//!                             │   capture::report ──▶ capture::sink ──▶ stdout
//!                             │                                              │
//!                             │   config (cli) · lifecycle · observability   │
//!                             └──────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

use exfil_listener::config::{self, ConfigError};
use exfil_listener::lifecycle::startup;
use exfil_listener::observability::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match config::parse_args(std::env::args_os()) {
        Ok(config) => config,
        // Prints usage or the clap error and exits with clap's status code.
        Err(ConfigError::Args(e)) => e.exit(),
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    logging::init(&config.observability.log_level);

    tracing::info!(
        bind_address = %config.listener.socket_addr(),
        chain = %config.decode.chain,
        max_body_size = config.listener.max_body_size,
        "exfil-listener v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = startup::run(config).await {
        tracing::error!(error = %e, "Server failed");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
