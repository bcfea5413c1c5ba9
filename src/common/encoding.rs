//! Text decoding for report documents.
//!
//! MetaTrader 4 writes optimization reports as 8-bit text (usually UTF-8 or
//! plain ASCII), while MetaTrader 5 writes UTF-16LE with a byte order mark.
//! Both are accepted here.

use encoding_rs::Encoding;
use std::borrow::Cow;

/// Decode raw document bytes into text.
///
/// A byte order mark selects the encoding when present. Without one, input
/// that looks like little-endian UTF-16 (NUL in every odd byte of the first
/// two code units) is decoded as UTF-16LE; anything else is decoded as UTF-8
/// with malformed sequences replaced by U+FFFD.
pub fn decode_document(bytes: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return text;
    }

    if looks_like_utf16le(bytes) {
        let (text, _had_errors) = encoding_rs::UTF_16LE.decode_without_bom_handling(bytes);
        return text;
    }

    let (text, _had_errors) = encoding_rs::UTF_8.decode_without_bom_handling(bytes);
    text
}

#[inline]
fn looks_like_utf16le(bytes: &[u8]) -> bool {
    bytes.len() >= 4 && bytes[0] != 0 && bytes[1] == 0 && bytes[2] != 0 && bytes[3] == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_utf8() {
        assert_eq!(decode_document(b"<table>"), "<table>");
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        assert_eq!(decode_document(b"\xEF\xBB\xBF<td>"), "<td>");
    }

    #[test]
    fn test_utf16le_with_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "<tr>".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode_document(&bytes), "<tr>");
    }

    #[test]
    fn test_utf16le_without_bom() {
        let bytes: Vec<u8> = "<td>1</td>"
            .encode_utf16()
            .flat_map(|u| u.to_le_bytes())
            .collect();
        assert_eq!(decode_document(&bytes), "<td>1</td>");
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        assert_eq!(decode_document(b"a\xFFb"), "a\u{FFFD}b");
    }
}
