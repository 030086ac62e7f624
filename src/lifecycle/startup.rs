//! Startup orchestration.
//!
//! Order: announce the decode chain, bind the listener, start the signal
//! watcher, then serve. Any failure before serving is fatal.

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::capture::StdoutSink;
use crate::config::Config;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};

/// Bind and serve until a shutdown signal arrives.
pub async fn run(config: Config) -> Result<(), std::io::Error> {
    if config.decode.chain.is_empty() {
        tracing::info!("No decoding (plaintext mode)");
    } else {
        tracing::info!(chain = %config.decode.chain, "Decode chain: {}", config.decode.chain.describe());
    }

    let listener = TcpListener::bind(config.listener.socket_addr()).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Server listening on port {}", local_addr.port());

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let watcher = signals::spawn_signal_watcher(shutdown);

    let server = HttpServer::new(config, Arc::new(StdoutSink));
    let result = server.run(listener, server_shutdown).await;

    watcher.abort();
    result
}
