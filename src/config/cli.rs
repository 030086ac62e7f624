//! Command line parsing.
//!
//! Regular options go through clap. The decode chain is written as a bare
//! dash-prefixed word (`-0bu`), which clap would read as a cluster of short
//! flags, so it is pulled out of the argument list before clap sees it.

use std::ffi::OsString;
use std::net::IpAddr;

use clap::Parser;
use thiserror::Error;

use crate::config::schema::{
    Config, DecodeConfig, ListenerConfig, ObservabilityConfig, DEFAULT_MAX_BODY_SIZE, DEFAULT_PORT,
    DEFAULT_SHUTDOWN_TIMEOUT_SECS,
};
use crate::decode::{ChainParseError, DecodeChain, Decoder};

const AFTER_HELP: &str = "\
Decoder flags (applied in order specified):
  0  Hex decode
  b  Base64 decode
  u  URL decode
  H  HTML entity decode

Examples:
  exfil-listener              # No decoding (plaintext)
  exfil-listener -b           # Base64 decode
  exfil-listener -bH          # Base64 decode, then HTML decode
  exfil-listener -0bu         # Hex decode, Base64 decode, URL decode
  exfil-listener -p 8080 -b   # Custom port with Base64 decode";

/// Options that consume the following argument.
const TAKES_VALUE: [&str; 6] = [
    "-p",
    "--port",
    "--bind",
    "--log-level",
    "--max-body-size",
    "--shutdown-timeout",
];

#[derive(Debug, Parser)]
#[command(name = "exfil-listener")]
#[command(about = "HTTP server with configurable data decoding", long_about = None)]
#[command(override_usage = "exfil-listener [-p PORT] [-<decoders>]")]
#[command(after_help = AFTER_HELP)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    bind: IpAddr,

    /// Diagnostic log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Largest accepted request body in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_BODY_SIZE)]
    max_body_size: usize,

    /// Seconds to let open connections finish after a shutdown signal
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_SHUTDOWN_TIMEOUT_SECS)]
    shutdown_timeout: u64,
}

/// Error type for startup configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Bad option, bad port, or a help request.
    #[error(transparent)]
    Args(#[from] clap::Error),

    #[error("{0}\nValid decoders: {legend}", legend = Decoder::legend())]
    Chain(#[from] ChainParseError),
}

/// Separate the decode chain word from the rest of the arguments.
///
/// The first item is the program name and is kept as is. When several chain
/// words are given, the last one wins.
fn split_chain_arg<I>(args: I) -> (Vec<OsString>, Option<String>)
where
    I: IntoIterator<Item = OsString>,
{
    let mut args = args.into_iter();
    let mut rest: Vec<OsString> = args.next().into_iter().collect();
    let mut chain = None;

    while let Some(arg) = args.next() {
        let text = arg.to_string_lossy().into_owned();

        if TAKES_VALUE.contains(&text.as_str()) {
            rest.push(arg);
            rest.extend(args.next());
        } else if text.starts_with("--") || text == "-h" || !text.starts_with('-') {
            rest.push(arg);
        } else {
            chain = Some(text[1..].to_string());
        }
    }

    (rest, chain)
}

/// Build the startup configuration from process arguments.
pub fn parse_args<I, T>(args: I) -> Result<Config, ConfigError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let (rest, chain) = split_chain_arg(args.into_iter().map(Into::into));
    let cli = Cli::try_parse_from(rest)?;
    let chain: DecodeChain = chain.as_deref().unwrap_or_default().parse()?;

    Ok(Config {
        listener: ListenerConfig {
            bind_address: cli.bind,
            port: cli.port,
            max_body_size: cli.max_body_size,
            shutdown_timeout_secs: cli.shutdown_timeout,
        },
        decode: DecodeConfig { chain },
        observability: ObservabilityConfig {
            log_level: cli.log_level,
        },
    })
}
