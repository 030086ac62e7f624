//! Decoder registry.
//!
//! Every decoder is selected by a single character on the command line and
//! exposes one fallible byte-to-byte transform. Text-based stages read their
//! input as UTF-8, replacing invalid sequences with U+FFFD.

use std::fmt;

use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use percent_encoding::percent_decode_str;
use thiserror::Error;

use crate::decode::html;

/// Standard alphabet, padding required, non-zero trailing bits accepted.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Failure of a single decoder stage.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid {encoding} input: {reason}")]
    InvalidEncoding {
        encoding: &'static str,
        reason: String,
    },
}

/// One of the built-in decoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decoder {
    Hex,
    Base64,
    Url,
    Html,
}

impl Decoder {
    /// Full registry, in legend order.
    pub const ALL: [Decoder; 4] = [Decoder::Hex, Decoder::Base64, Decoder::Url, Decoder::Html];

    /// Look up a decoder by its selector character.
    pub fn from_selector(selector: char) -> Option<Self> {
        match selector {
            '0' => Some(Decoder::Hex),
            'b' => Some(Decoder::Base64),
            'u' => Some(Decoder::Url),
            'H' => Some(Decoder::Html),
            _ => None,
        }
    }

    pub fn selector(self) -> char {
        match self {
            Decoder::Hex => '0',
            Decoder::Base64 => 'b',
            Decoder::Url => 'u',
            Decoder::Html => 'H',
        }
    }

    /// Label used in logs and stage lists.
    pub fn name(self) -> &'static str {
        match self {
            Decoder::Hex => "Hex",
            Decoder::Base64 => "Base64",
            Decoder::Url => "URL",
            Decoder::Html => "HTML",
        }
    }

    /// Run this decoder over `input`.
    pub fn apply(self, input: &[u8]) -> Result<Vec<u8>, DecodeError> {
        match self {
            Decoder::Hex => hex_decode(input),
            Decoder::Base64 => base64_decode(input),
            Decoder::Url => Ok(url_decode(input)),
            Decoder::Html => Ok(html_decode(input)),
        }
    }

    /// Human readable list of valid selectors, e.g. `0 (hex), b (base64), ...`.
    pub fn legend() -> String {
        Self::ALL
            .iter()
            .map(|d| format!("{} ({})", d.selector(), d.name().to_lowercase()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl TryFrom<char> for Decoder {
    type Error = char;

    fn try_from(selector: char) -> Result<Self, Self::Error> {
        Decoder::from_selector(selector).ok_or(selector)
    }
}

impl fmt::Display for Decoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn hex_decode(input: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let text: String = String::from_utf8_lossy(input)
        .chars()
        .filter(|c| !matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r'))
        .collect();

    hex::decode(text).map_err(|e| DecodeError::InvalidEncoding {
        encoding: "hex",
        reason: e.to_string(),
    })
}

fn base64_decode(input: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut text = String::from_utf8_lossy(input).into_owned();
    let remainder = text.len() % 4;
    if remainder != 0 {
        text.extend(std::iter::repeat('=').take(4 - remainder));
    }

    BASE64.decode(text).map_err(|e| DecodeError::InvalidEncoding {
        encoding: "base64",
        reason: e.to_string(),
    })
}

fn url_decode(input: &[u8]) -> Vec<u8> {
    let text = String::from_utf8_lossy(input);
    percent_decode_str(&text)
        .decode_utf8_lossy()
        .into_owned()
        .into_bytes()
}

fn html_decode(input: &[u8]) -> Vec<u8> {
    html::unescape(&String::from_utf8_lossy(input)).into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD_NO_PAD;
    use proptest::prelude::*;

    #[test]
    fn test_selector_lookup() {
        for decoder in Decoder::ALL {
            assert_eq!(Decoder::from_selector(decoder.selector()), Some(decoder));
        }
        assert_eq!(Decoder::from_selector('x'), None);
        assert_eq!(Decoder::from_selector('h'), None); // case sensitive
        assert_eq!(Decoder::try_from('B'), Err('B'));
    }

    #[test]
    fn test_legend() {
        assert_eq!(
            Decoder::legend(),
            "0 (hex), b (base64), u (url), H (html)"
        );
    }

    #[test]
    fn test_hex_round_trip() {
        let all_bytes: Vec<u8> = (0..=255u8).collect();
        let samples: [&[u8]; 4] = [b"", b"hello", &[0xff, 0x00, 0x80], &all_bytes];

        for sample in samples {
            let encoded = hex::encode(sample);
            assert_eq!(Decoder::Hex.apply(encoded.as_bytes()).unwrap(), sample);

            let upper = hex::encode_upper(sample);
            assert_eq!(Decoder::Hex.apply(upper.as_bytes()).unwrap(), sample);
        }
    }

    #[test]
    fn test_hex_strips_spaces_and_newlines() {
        let decoded = Decoder::Hex.apply(b"68 65\n6c 6c\n6f").unwrap();
        assert_eq!(decoded, b"hello");
    }

    #[test]
    fn test_hex_strips_crlf_and_tabs() {
        let decoded = Decoder::Hex.apply(b"68\t65\r\n6c6c\t6f\r\n").unwrap();
        assert_eq!(decoded, b"hello");
    }

    #[test]
    fn test_hex_rejects_bad_input() {
        let odd = Decoder::Hex.apply(b"abc").unwrap_err();
        assert!(matches!(odd, DecodeError::InvalidEncoding { encoding: "hex", .. }));

        assert!(Decoder::Hex.apply(b"zz").is_err());
        assert!(Decoder::Hex.apply(b"68\xc2\xa065").is_err()); // NBSP is not skipped
    }

    #[test]
    fn test_base64_padding() {
        assert_eq!(Decoder::Base64.apply(b"aGVsbG8=").unwrap(), b"hello");
        assert_eq!(Decoder::Base64.apply(b"aGVsbG8").unwrap(), b"hello");
        assert_eq!(Decoder::Base64.apply(b"aGk").unwrap(), b"hi");
        assert_eq!(Decoder::Base64.apply(b"aA").unwrap(), b"h");
        assert_eq!(Decoder::Base64.apply(b"").unwrap(), b"");

        // Length 1 mod 4 can never be valid once padded.
        assert!(Decoder::Base64.apply(b"aGVsb").is_err());
    }

    #[test]
    fn test_base64_rejects_bad_alphabet() {
        let err = Decoder::Base64.apply(b"!!!!").unwrap_err();
        assert!(err.to_string().starts_with("invalid base64 input"));
        assert!(Decoder::Base64.apply(b"aGVs bG8=").is_err());
    }

    #[test]
    fn test_base64_allows_trailing_bits() {
        // "aB" has non-zero bits past the single decoded byte.
        assert_eq!(Decoder::Base64.apply(b"aB").unwrap(), b"h");
    }

    #[test]
    fn test_url_decode() {
        assert_eq!(Decoder::Url.apply(b"a%20b%2Fc").unwrap(), b"a b/c");
        assert_eq!(Decoder::Url.apply(b"a+b").unwrap(), b"a+b");
        assert_eq!(Decoder::Url.apply(b"100%").unwrap(), b"100%");
        assert_eq!(Decoder::Url.apply(b"%zz%4").unwrap(), b"%zz%4");
        assert_eq!(Decoder::Url.apply(b"caf%C3%A9").unwrap(), "café".as_bytes());
        // Invalid UTF-8 after unquoting is replaced, not rejected.
        assert_eq!(Decoder::Url.apply(b"%FF").unwrap(), "\u{FFFD}".as_bytes());
    }

    #[test]
    fn test_html_decode() {
        assert_eq!(
            Decoder::Html.apply(b"&lt;a href=&quot;x&quot;&gt;&amp;&#39;").unwrap(),
            b"<a href=\"x\">&'"
        );
        assert_eq!(Decoder::Html.apply(b"&#x41;&#66;").unwrap(), b"AB");
        assert_eq!(Decoder::Html.apply(b"plain text").unwrap(), b"plain text");
    }

    #[test]
    fn test_html_decode_browser_rules() {
        assert_eq!(Decoder::Html.apply(b"&amp").unwrap(), b"&");
        assert_eq!(Decoder::Html.apply(b"&#39").unwrap(), b"'");
        assert_eq!(Decoder::Html.apply(b"&lt;b&gt").unwrap(), b"<b>");
        assert_eq!(Decoder::Html.apply(b"&#x80;").unwrap(), "\u{20AC}".as_bytes());
        assert_eq!(Decoder::Html.apply(b"&#0;").unwrap(), "\u{FFFD}".as_bytes());
        assert_eq!(Decoder::Html.apply(b"&notit;").unwrap(), "\u{AC}it;".as_bytes());
    }

    #[test]
    fn test_lossy_input() {
        assert_eq!(
            Decoder::Html.apply(&[b'a', 0xff, b'b']).unwrap(),
            "a\u{FFFD}b".as_bytes()
        );
        assert!(Decoder::Hex.apply(&[0xff, 0xfe]).is_err());
    }

    proptest! {
        #[test]
        fn prop_hex_round_trip(bytes in any::<Vec<u8>>(), upper in any::<bool>()) {
            let encoded = if upper { hex::encode_upper(&bytes) } else { hex::encode(&bytes) };
            prop_assert_eq!(Decoder::Hex.apply(encoded.as_bytes()).ok(), Some(bytes));
        }

        #[test]
        fn prop_base64_padding_matches_padded_validity(text in "[A-Za-z0-9+/= !]{0,16}") {
            let padded = format!("{}{}", text, "=".repeat((4 - text.len() % 4) % 4));
            prop_assert_eq!(
                Decoder::Base64.apply(text.as_bytes()).is_ok(),
                BASE64.decode(&padded).is_ok()
            );
        }

        #[test]
        fn prop_base64_unpadded_round_trip(bytes in any::<Vec<u8>>()) {
            let encoded = STANDARD_NO_PAD.encode(&bytes);
            prop_assert_eq!(Decoder::Base64.apply(encoded.as_bytes()).ok(), Some(bytes));
        }
    }
}
