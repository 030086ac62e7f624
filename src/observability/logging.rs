//! Structured logging.
//!
//! Diagnostics go to stderr through `tracing`; stdout is reserved for
//! capture blocks so the two can be redirected separately.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter for a given level, e.g. `exfil_listener=info,tower_http=info`.
///
/// `TraceLayer` emits its request spans at debug, so they show up with
/// `--log-level debug`.
pub fn default_filter(level: &str) -> String {
    format!("exfil_listener={level},tower_http={level}")
}

/// Install the global subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
