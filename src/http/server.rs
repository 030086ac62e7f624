//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the capture handlers
//! - Wire up middleware (tracing, body limit)
//! - Serve on a bound listener until shutdown is signalled
//! - Bound the connection drain after shutdown by a deadline

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, oneshot};
use tower_http::trace::TraceLayer;

use crate::capture::ReportSink;
use crate::config::Config;
use crate::http::handlers::{get_handler, head_handler, post_handler};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sink: Arc<dyn ReportSink>,
}

/// HTTP server for the capture listener.
pub struct HttpServer {
    router: Router,
    config: Arc<Config>,
}

impl HttpServer {
    /// Create a new HTTP server writing capture blocks to `sink`.
    pub fn new(config: Config, sink: Arc<dyn ReportSink>) -> Self {
        let config = Arc::new(config);
        let state = AppState {
            config: config.clone(),
            sink,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &Config, state: AppState) -> Router {
        // An explicit HEAD route keeps `get` from answering HEAD.
        let capture = get(get_handler).post(post_handler).head(head_handler);

        Router::new()
            .route("/", capture.clone())
            .route("/{*path}", capture)
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.listener.max_body_size))
            .layer(TraceLayer::new_for_http())
    }

    /// Router with state applied, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Returns once `shutdown` fires (or its sender is dropped) and open
    /// connections have drained, or once `shutdown_timeout_secs` have passed
    /// since the signal, whichever comes first.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        let grace = Duration::from_secs(self.config.listener.shutdown_timeout_secs);
        tracing::info!(address = %addr, "HTTP server starting");

        let (draining_tx, draining_rx) = oneshot::channel::<()>();
        let serve = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                let _ = draining_tx.send(());
            })
            .into_future();

        let deadline = async move {
            if draining_rx.await.is_err() {
                // Serve finished without a shutdown signal.
                std::future::pending::<()>().await;
            }
            tokio::time::sleep(grace).await;
        };

        tokio::select! {
            result = serve => result?,
            _ = deadline => {
                tracing::warn!(
                    timeout_secs = grace.as_secs(),
                    "Shutdown deadline reached, dropping open connections"
                );
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &Config {
        &self.config
    }
}
