//! Configuration schema definitions.
//!
//! The whole configuration is built once at startup and never changes
//! afterwards; handlers receive it behind an `Arc`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::decode::DecodeChain;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 4000;

/// Default cap on request bodies (10 MiB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Default time open connections get to finish after a shutdown signal.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 5;

/// Root configuration for the listener.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Listener configuration (bind address, port, limits).
    pub listener: ListenerConfig,

    /// Decode chain applied to captured values.
    pub decode: DecodeConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Interface to bind (default `0.0.0.0`).
    pub bind_address: IpAddr,

    /// TCP port (default 4000, 0 picks an ephemeral port).
    pub port: u16,

    /// Largest accepted request body in bytes.
    pub max_body_size: usize,

    /// Seconds to wait for open connections once shutdown starts. Connections
    /// still open after that are dropped.
    pub shutdown_timeout_secs: u64,
}

impl ListenerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
        }
    }
}

/// Decode configuration.
#[derive(Debug, Clone, Default)]
pub struct DecodeConfig {
    /// Empty means plaintext mode.
    pub chain: DecodeChain,
}

/// Observability configuration.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
