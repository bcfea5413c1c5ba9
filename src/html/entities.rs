//! HTML character reference decoding.
//!
//! Named references are resolved against the five XML predefined entities
//! (via `quick-xml`) plus the handful of HTML entities that show up in
//! tester reports. Numeric references (`&#65;`, `&#x41;`) are always decoded.
//! Anything unrecognized, including a bare `&`, is kept verbatim.

use memchr::memchr;
use quick_xml::escape::resolve_predefined_entity;
use std::borrow::Cow;

/// Longest entity name accepted between `&` and `;`.
const MAX_ENTITY_LEN: usize = 32;

fn resolve_html_entity(name: &str) -> Option<&'static str> {
    if let Some(resolved) = resolve_predefined_entity(name) {
        return Some(resolved);
    }
    Some(match name {
        "nbsp" => "\u{A0}",
        "copy" => "\u{A9}",
        "reg" => "\u{AE}",
        "trade" => "\u{2122}",
        "euro" => "\u{20AC}",
        "pound" => "\u{A3}",
        "yen" => "\u{A5}",
        "cent" => "\u{A2}",
        "deg" => "\u{B0}",
        "plusmn" => "\u{B1}",
        "times" => "\u{D7}",
        "divide" => "\u{F7}",
        "middot" => "\u{B7}",
        "laquo" => "\u{AB}",
        "raquo" => "\u{BB}",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "hellip" => "\u{2026}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201C}",
        "rdquo" => "\u{201D}",
        _ => return None,
    })
}

fn resolve_numeric(reference: &str) -> Option<char> {
    let code = if let Some(hex) = reference
        .strip_prefix('x')
        .or_else(|| reference.strip_prefix('X'))
    {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        reference.parse::<u32>().ok()?
    };
    match char::from_u32(code) {
        Some('\0') | None => Some('\u{FFFD}'),
        Some(c) => Some(c),
    }
}

/// Decode character references in `raw`.
///
/// Returns the input unchanged (borrowed) when it contains no `&`.
pub fn decode_entities(raw: &str) -> Cow<'_, str> {
    let bytes = raw.as_bytes();
    let Some(first) = memchr(b'&', bytes) else {
        return Cow::Borrowed(raw);
    };

    let mut out = String::with_capacity(raw.len());
    out.push_str(&raw[..first]);
    let mut pos = first;

    while pos < bytes.len() {
        // bytes[pos] == b'&'
        let window_end = (pos + 2 + MAX_ENTITY_LEN).min(bytes.len());
        let decoded = memchr(b';', &bytes[pos + 1..window_end]).and_then(|semi| {
            let name = &raw[pos + 1..pos + 1 + semi];
            let consumed = semi + 2;
            if let Some(numeric) = name.strip_prefix('#') {
                resolve_numeric(numeric).map(|c| (Cow::Owned(c.to_string()), consumed))
            } else {
                resolve_html_entity(name).map(|s| (Cow::Borrowed(s), consumed))
            }
        });

        match decoded {
            Some((text, consumed)) => {
                out.push_str(&text);
                pos += consumed;
            },
            None => {
                out.push('&');
                pos += 1;
            },
        }

        let next = memchr(b'&', &bytes[pos..])
            .map(|off| pos + off)
            .unwrap_or(bytes.len());
        out.push_str(&raw[pos..next]);
        pos = next;
    }

    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_entities_borrows() {
        assert!(matches!(decode_entities("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn test_predefined_and_html() {
        assert_eq!(decode_entities("a &lt; b&nbsp;c"), "a < b\u{A0}c");
        assert_eq!(decode_entities("&quot;x&quot;"), "\"x\"");
    }

    #[test]
    fn test_numeric() {
        assert_eq!(decode_entities("&#65;&#x42;&#X43;"), "ABC");
        assert_eq!(decode_entities("&#0;"), "\u{FFFD}");
    }

    #[test]
    fn test_unknown_and_bare_ampersand_kept() {
        assert_eq!(decode_entities("R&D; A & B"), "R&D; A & B");
        assert_eq!(decode_entities("&unknown;&amp;"), "&unknown;&");
        assert_eq!(decode_entities("tail &"), "tail &");
    }
}
