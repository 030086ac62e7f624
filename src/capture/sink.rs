//! Destinations for rendered capture blocks.

use std::io::Write;

use tokio::sync::mpsc;

/// Receives complete capture blocks, one call per request.
pub trait ReportSink: Send + Sync + 'static {
    fn emit(&self, report: &str);
}

/// Writes blocks to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl ReportSink for StdoutSink {
    fn emit(&self, report: &str) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = out.write_all(report.as_bytes()).and_then(|_| out.flush()) {
            tracing::warn!(error = %e, "Failed to write capture report");
        }
    }
}

/// Forwards blocks over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ReportSink for ChannelSink {
    fn emit(&self, report: &str) {
        // Receiver gone means nobody is listening anymore.
        let _ = self.tx.send(report.to_owned());
    }
}
