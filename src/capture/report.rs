//! Rendering of one request's capture block.
//!
//! A block is built in memory and handed to the sink in one piece, so blocks
//! from concurrent requests never interleave.

use std::fmt::{self, Write as _};

use crate::capture::params::{parse_params, query_of};
use crate::decode::DecodeChain;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const SEPARATOR_WIDTH: usize = 50;

/// Accumulates the lines of one capture block.
#[derive(Debug, Default)]
struct Report {
    buf: String,
}

impl Report {
    fn line(&mut self, args: fmt::Arguments<'_>) {
        // Writing into a String cannot fail.
        let _ = self.buf.write_fmt(args);
        self.buf.push('\n');
    }

    fn decode(&mut self, chain: &DecodeChain, key: Option<&str>, value: &[u8]) {
        match chain.apply(value) {
            Ok(decoded) => {
                let text = String::from_utf8_lossy(&decoded.bytes);
                match key {
                    Some(key) => self.line(format_args!("Decoded {} ({}):", key, decoded.steps())),
                    None => self.line(format_args!("Decoded ({}):", decoded.steps())),
                }
                self.line(format_args!("{}", text));
            }
            Err(e) => {
                tracing::debug!(
                    key = key.unwrap_or("<body>"),
                    stage = e.stage,
                    index = e.index,
                    error = %e.source,
                    "Decode failed"
                );
                match key {
                    Some(key) => self.line(format_args!("Decode failed for {}: {}", key, e)),
                    None => self.line(format_args!("Decode failed: {}", e)),
                }
            }
        }
    }

    fn finish(mut self) -> String {
        self.line(format_args!("{}", "=".repeat(SEPARATOR_WIDTH)));
        self.buf.push('\n');
        self.buf
    }
}

/// Render the block for a POST to `target`.
///
/// Form bodies are logged per key; anything else is logged as one raw value.
/// Raw values are always logged, decoded values only when `chain` has stages.
pub fn post_report(chain: &DecodeChain, target: &str, content_type: &str, body: &[u8]) -> String {
    let mut report = Report::default();
    report.line(format_args!("PATH: {}", target));

    if content_type.contains(FORM_CONTENT_TYPE) {
        let form = String::from_utf8_lossy(body);
        for param in parse_params(&form) {
            report.line(format_args!("Raw {}: {}", param.key, param.value));
            if !chain.is_empty() {
                report.decode(chain, Some(param.key), param.value.as_bytes());
            }
        }
    } else {
        report.line(format_args!("Raw:"));
        report.line(format_args!("{}", String::from_utf8_lossy(body)));
        if !chain.is_empty() {
            report.decode(chain, None, body);
        }
    }

    report.finish()
}

/// Render the block for a GET of `target`.
///
/// Query values are only logged as decode attempts; with an empty chain the
/// block holds just the path.
pub fn get_report(chain: &DecodeChain, target: &str) -> String {
    let mut report = Report::default();
    report.line(format_args!("PATH: {}", target));

    if let Some(query) = query_of(target) {
        if !chain.is_empty() {
            for param in parse_params(query) {
                report.decode(chain, Some(param.key), param.value.as_bytes());
            }
        }
    }

    report.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEPARATOR: &str = "==================================================\n\n";

    fn chain(s: &str) -> DecodeChain {
        s.parse().unwrap()
    }

    #[test]
    fn test_post_form_with_base64() {
        let report = post_report(
            &chain("b"),
            "/",
            "application/x-www-form-urlencoded",
            b"msg=aGVsbG8=",
        );
        assert_eq!(
            report,
            format!("PATH: /\nRaw msg: aGVsbG8=\nDecoded msg (Base64):\nhello\n{SEPARATOR}")
        );
    }

    #[test]
    fn test_post_form_failure_is_isolated() {
        let report = post_report(
            &chain("b"),
            "/upload",
            "application/x-www-form-urlencoded; charset=utf-8",
            b"good=aGVsbG8&bad=!!!!&after=d29ybGQ",
        );
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[0], "PATH: /upload");
        assert_eq!(lines[1], "Raw good: aGVsbG8");
        assert_eq!(lines[2], "Decoded good (Base64):");
        assert_eq!(lines[3], "hello");
        assert_eq!(lines[4], "Raw bad: !!!!");
        assert!(lines[5].starts_with("Decode failed for bad: Base64 decode failed at stage 0"));
        assert_eq!(lines[6], "Raw after: d29ybGQ");
        assert_eq!(lines[7], "Decoded after (Base64):");
        assert_eq!(lines[8], "world");
        assert!(report.ends_with(SEPARATOR));
    }

    #[test]
    fn test_post_raw_body() {
        let report = post_report(&chain("0"), "/raw", "text/plain", b"6869");
        assert_eq!(
            report,
            format!("PATH: /raw\nRaw:\n6869\nDecoded (Hex):\nhi\n{SEPARATOR}")
        );

        let report = post_report(&chain("0"), "/raw", "text/plain", b"xyz");
        assert!(report.contains("Raw:\nxyz\nDecode failed: Hex decode failed at stage 0"));
    }

    #[test]
    fn test_post_without_chain_logs_raw_only() {
        let report = post_report(
            &DecodeChain::default(),
            "/",
            "application/x-www-form-urlencoded",
            b"a=1&b",
        );
        assert_eq!(report, format!("PATH: /\nRaw a: 1\nRaw b: \n{SEPARATOR}"));

        let report = post_report(&DecodeChain::default(), "/", "application/json", b"{\"a\":1}");
        assert_eq!(report, format!("PATH: /\nRaw:\n{{\"a\":1}}\n{SEPARATOR}"));
        assert!(!report.contains("Decoded"));
    }

    #[test]
    fn test_post_binary_body_is_lossy() {
        let report = post_report(&DecodeChain::default(), "/", "application/octet-stream", &[b'o', 0xff, b'k']);
        assert!(report.contains("Raw:\no\u{FFFD}k\n"));
    }

    #[test]
    fn test_get_decodes_query_values() {
        let value = hex::encode("dGVzdA==");
        let target = format!("/?x={value}");
        let report = get_report(&chain("0b"), &target);
        assert_eq!(
            report,
            format!("PATH: {target}\nDecoded x (Hex -> Base64):\ntest\n{SEPARATOR}")
        );
        assert!(!report.contains("Raw"));
    }

    #[test]
    fn test_get_failure_is_isolated() {
        let report = get_report(&chain("b"), "/cb?a=aGk&b=%%%");
        assert!(report.contains("Decoded a (Base64):\nhi\n"));
        assert!(report.contains("Decode failed for b: "));
    }

    #[test]
    fn test_get_without_chain_or_query() {
        assert_eq!(
            get_report(&DecodeChain::default(), "/?a=1"),
            format!("PATH: /?a=1\n{SEPARATOR}")
        );
        assert_eq!(get_report(&chain("b"), "/plain"), format!("PATH: /plain\n{SEPARATOR}"));
    }
}
