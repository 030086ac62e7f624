//! HTML character reference decoding.
//!
//! Follows the WHATWG rules browsers apply to text content: the legacy named
//! references (`&amp`, `&copy`, ...) and numeric references may omit the
//! trailing `;`, a longer name falls back to its longest legacy prefix
//! (`&notit;` → `¬it;`), and numeric values are remapped through the
//! windows-1252 table, replaced with U+FFFD, or dropped when they name a
//! code point HTML forbids.

use html_escape::NAMED_ENTITIES;

const REPLACEMENT: char = '\u{FFFD}';

/// Longest name looked at after `&`, in characters.
const MAX_NAME_CHARS: usize = 32;

/// Named references that are recognised without a trailing `;`.
const LEGACY_NAMES: [&str; 106] = [
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil",
    "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT",
    "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN",
    "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave",
    "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren", "deg",
    "divide", "eacute", "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34", "gt",
    "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr", "micro",
    "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm", "oslash",
    "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg", "sect", "shy", "sup1",
    "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml",
    "yacute", "yen", "yuml",
];

/// windows-1252 meaning of numeric references 0x80..=0x9F.
const CP1252: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

/// Replace every character reference in `text`.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];

        let consumed = match after.strip_prefix('#') {
            Some(number) => numeric_reference(number, &mut out).map(|n| n + 1),
            None => named_reference(after, &mut out),
        };

        match consumed {
            Some(n) => rest = &after[n..],
            None => {
                out.push('&');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Decode `123;` / `x7B;` (the text after `&#`). Returns bytes consumed.
fn numeric_reference(text: &str, out: &mut String) -> Option<usize> {
    let (radix, start) = match text.as_bytes().first() {
        Some(b'x' | b'X') => (16, 1),
        _ => (10, 0),
    };

    let digits = text[start..]
        .bytes()
        .take_while(|b| match radix {
            16 => b.is_ascii_hexdigit(),
            _ => b.is_ascii_digit(),
        })
        .count();
    if digits == 0 {
        return None;
    }

    let mut end = start + digits;
    let value = text[start..end].chars().fold(0u32, |acc, c| {
        acc.saturating_mul(radix)
            .saturating_add(c.to_digit(radix).unwrap_or(0))
    });
    if text[end..].starts_with(';') {
        end += 1;
    }

    if let Some(c) = numeric_char(value) {
        out.push(c);
    }
    Some(end)
}

/// Character for a numeric reference; `None` means the reference is dropped.
fn numeric_char(value: u32) -> Option<char> {
    match value {
        0 => Some(REPLACEMENT),
        0x80..=0x9F => Some(CP1252[(value - 0x80) as usize]),
        0xD800..=0xDFFF | 0x11_0000..=u32::MAX => Some(REPLACEMENT),
        0x01..=0x08 | 0x0B | 0x0E..=0x1F | 0x7F | 0xFDD0..=0xFDEF => None,
        v if v & 0xFFFE == 0xFFFE => None,
        v => char::from_u32(v),
    }
}

/// Decode a named reference (the text after `&`). Returns bytes consumed.
fn named_reference(text: &str, out: &mut String) -> Option<usize> {
    let name_end = text
        .char_indices()
        .take(MAX_NAME_CHARS)
        .take_while(|(_, c)| !matches!(c, '\t' | '\n' | '\x0C' | ' ' | '<' | '&' | '#' | ';'))
        .last()
        .map(|(i, c)| i + c.len_utf8())?;

    let name = &text[..name_end];
    let semicolon = text[name_end..].starts_with(';');
    let consumed = name_end + usize::from(semicolon);

    let exact = if semicolon || LEGACY_NAMES.contains(&name) {
        lookup(name)
    } else {
        None
    };
    if let Some(value) = exact {
        out.push_str(value);
        return Some(consumed);
    }

    // Fall back to the longest legacy name the reference starts with.
    let bounds: Vec<usize> = name
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(name.len()))
        .collect();
    let longest = if semicolon { bounds.len() - 1 } else { bounds.len() - 2 };

    for chars in (2..=longest).rev() {
        let prefix = &name[..bounds[chars]];
        if !LEGACY_NAMES.contains(&prefix) {
            continue;
        }
        if let Some(value) = lookup(prefix) {
            out.push_str(value);
            out.push_str(&text[bounds[chars]..consumed]);
            return Some(consumed);
        }
    }

    None
}

fn lookup(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES
        .binary_search_by(|(entity, _)| entity.cmp(&name.as_bytes()))
        .ok()
        .map(|index| NAMED_ENTITIES[index].1)
}
