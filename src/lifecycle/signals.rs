//! OS signal handling.
//!
//! SIGINT (Ctrl+C) and, on Unix, SIGTERM both request shutdown. A second
//! signal while connections are still draining exits the process at once.

use crate::lifecycle::Shutdown;

/// Resolve once the process receives an interrupt or terminate signal.
pub async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

/// Exit status used when a second signal cuts the drain short.
pub const FORCED_EXIT_CODE: i32 = 1;

/// Spawn a task that triggers `shutdown` on the first signal and exits the
/// process on the second.
pub fn spawn_signal_watcher(shutdown: Shutdown) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        wait_for_signal().await;
        tracing::info!("Shutting down...");
        shutdown.trigger();

        wait_for_signal().await;
        tracing::warn!("Second signal received, exiting without draining");
        std::process::exit(FORCED_EXIT_CODE);
    })
}
