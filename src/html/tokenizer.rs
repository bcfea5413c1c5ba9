//! Tolerant HTML tokenizer.
//!
//! Splits a document into start tags, end tags and text runs. The scanner is
//! forgiving in the way browsers are: unquoted attribute values, missing
//! closing quotes, stray `<` characters and unterminated comments never
//! produce an error, they just degrade into text or end the token stream.
//!
//! Comments, doctypes and processing instructions are skipped. The content of
//! raw-text elements (`script`, `style`) is skipped up to the matching close
//! tag so markup-looking text inside them cannot leak into the tree.

use memchr::{memchr, memmem};

use super::entities::decode_entities;

/// Elements whose content is not markup.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// A single lexical unit of an HTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// `<name attr=value ...>` with the name lowercased and values decoded.
    StartTag {
        name: String,
        attrs: Vec<(String, String)>,
        self_closing: bool,
    },
    /// `</name>` with the name lowercased.
    EndTag { name: String },
    /// Raw (still entity-encoded) character data between tags.
    Text(&'a str),
}

/// Streaming tokenizer over a borrowed document.
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    /// Set after a raw-text start tag; the next call skips to its close tag.
    raw_text_end: Option<&'static str>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            raw_text_end: None,
        }
    }

    #[inline]
    fn rest(&self) -> &'a [u8] {
        &self.input.as_bytes()[self.pos..]
    }

    /// Skip past `</name` (ASCII case-insensitive) and its closing `>`.
    fn skip_raw_text(&mut self, name: &str) {
        let bytes = self.input.as_bytes();
        let mut search = self.pos;
        while let Some(offset) = memchr(b'<', &bytes[search..]) {
            let lt = search + offset;
            let candidate = &bytes[lt..];
            if candidate.len() >= name.len() + 2
                && candidate[1] == b'/'
                && candidate[2..2 + name.len()].eq_ignore_ascii_case(name.as_bytes())
            {
                self.pos = match memchr(b'>', &bytes[lt..]) {
                    Some(gt) => lt + gt + 1,
                    None => bytes.len(),
                };
                return;
            }
            search = lt + 1;
        }
        self.pos = bytes.len();
    }

    /// Skip to just after `terminator`, or to the end of input.
    fn skip_past(&mut self, terminator: &[u8]) {
        self.pos = match memmem::find(self.rest(), terminator) {
            Some(idx) => self.pos + idx + terminator.len(),
            None => self.input.len(),
        };
    }

    /// Parse a start tag whose `<` is at `self.pos`.
    fn read_start_tag(&mut self) -> Token<'a> {
        let bytes = self.input.as_bytes();
        let mut i = self.pos + 1;
        let name_start = i;
        while i < bytes.len() && is_name_byte(bytes[i]) {
            i += 1;
        }
        let name = self.input[name_start..i].to_ascii_lowercase();

        let mut attrs = Vec::new();
        let mut self_closing = false;

        loop {
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i >= bytes.len() {
                break;
            }
            match bytes[i] {
                b'>' => {
                    i += 1;
                    break;
                },
                b'/' => {
                    i += 1;
                    if bytes.get(i) == Some(&b'>') {
                        self_closing = true;
                        i += 1;
                        break;
                    }
                    continue;
                },
                _ => {},
            }

            let attr_start = i;
            while i < bytes.len()
                && !bytes[i].is_ascii_whitespace()
                && !matches!(bytes[i], b'=' | b'>' | b'/')
            {
                i += 1;
            }
            if i == attr_start {
                // Lone '=' or similar junk.
                i += 1;
                continue;
            }
            let attr_name = self.input[attr_start..i].to_ascii_lowercase();

            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }

            let mut value = String::new();
            if bytes.get(i) == Some(&b'=') {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                match bytes.get(i) {
                    Some(&quote @ (b'"' | b'\'')) => {
                        let value_start = i + 1;
                        let value_end = memchr(quote, &bytes[value_start..])
                            .map(|off| value_start + off)
                            .unwrap_or(bytes.len());
                        value = decode_entities(&self.input[value_start..value_end]).into_owned();
                        i = (value_end + 1).min(bytes.len());
                    },
                    Some(_) => {
                        let value_start = i;
                        while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>'
                        {
                            i += 1;
                        }
                        value = decode_entities(&self.input[value_start..i]).into_owned();
                    },
                    None => {},
                }
            }

            // First occurrence wins, as in browsers.
            if !attrs.iter().any(|(n, _)| *n == attr_name) {
                attrs.push((attr_name, value));
            }
        }

        self.pos = i;

        if !self_closing {
            self.raw_text_end = RAW_TEXT_ELEMENTS.iter().copied().find(|raw| *raw == name);
        }

        Token::StartTag {
            name,
            attrs,
            self_closing,
        }
    }

    /// Parse an end tag whose `</` is at `self.pos`.
    fn read_end_tag(&mut self) -> Option<Token<'a>> {
        let bytes = self.input.as_bytes();
        let name_start = self.pos + 2;
        let mut i = name_start;
        while i < bytes.len() && is_name_byte(bytes[i]) {
            i += 1;
        }
        let name = self.input[name_start..i].to_ascii_lowercase();
        self.pos = match memchr(b'>', &bytes[i..]) {
            Some(gt) => i + gt + 1,
            None => bytes.len(),
        };
        if name.is_empty() {
            None
        } else {
            Some(Token::EndTag { name })
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(raw) = self.raw_text_end.take() {
            self.skip_raw_text(raw);
        }

        loop {
            if self.pos >= self.input.len() {
                return None;
            }

            let rest = self.rest();
            if rest[0] != b'<' {
                let end = memchr(b'<', rest)
                    .map(|off| self.pos + off)
                    .unwrap_or(self.input.len());
                let text = &self.input[self.pos..end];
                self.pos = end;
                return Some(Token::Text(text));
            }

            match rest.get(1) {
                Some(b'!') => {
                    if rest.starts_with(b"<!--") {
                        self.pos += 4;
                        self.skip_past(b"-->");
                    } else {
                        self.skip_past(b">");
                    }
                },
                Some(b'?') => self.skip_past(b">"),
                Some(b'/') => {
                    if let Some(token) = self.read_end_tag() {
                        return Some(token);
                    }
                },
                Some(b) if b.is_ascii_alphabetic() => return Some(self.read_start_tag()),
                _ => {
                    // A '<' that does not open markup is literal text.
                    let end = memchr(b'<', &rest[1..])
                        .map(|off| self.pos + 1 + off)
                        .unwrap_or(self.input.len());
                    let text = &self.input[self.pos..end];
                    self.pos = end;
                    return Some(Token::Text(text));
                },
            }
        }
    }
}

#[inline]
fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(name: &str, attrs: &[(&str, &str)]) -> Token<'static> {
        Token::StartTag {
            name: name.to_string(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            self_closing: false,
        }
    }

    #[test]
    fn test_basic_row() {
        let tokens: Vec<_> = Tokenizer::new("<TR><td title=\"a&amp;b\">1</td></tr>").collect();
        assert_eq!(
            tokens,
            vec![
                start("tr", &[]),
                start("td", &[("title", "a&b")]),
                Token::Text("1"),
                Token::EndTag {
                    name: "td".to_string()
                },
                Token::EndTag {
                    name: "tr".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_unquoted_and_bare_attributes() {
        let tokens: Vec<_> =
            Tokenizer::new("<table width=820 cellspacing=1 border=0 nowrap>").collect();
        assert_eq!(
            tokens,
            vec![start(
                "table",
                &[
                    ("width", "820"),
                    ("cellspacing", "1"),
                    ("border", "0"),
                    ("nowrap", "")
                ]
            )]
        );
    }

    #[test]
    fn test_comments_and_doctype_skipped() {
        let tokens: Vec<_> =
            Tokenizer::new("<!DOCTYPE html><!-- <table> -->x<?xml version=\"1.0\"?>").collect();
        assert_eq!(tokens, vec![Token::Text("x")]);
    }

    #[test]
    fn test_script_content_skipped() {
        let tokens: Vec<_> =
            Tokenizer::new("<script>var s = '<table>';</SCRIPT><table>").collect();
        assert_eq!(tokens, vec![start("script", &[]), start("table", &[])]);
    }

    #[test]
    fn test_stray_lt_is_text() {
        let tokens: Vec<_> = Tokenizer::new("a < b").collect();
        assert_eq!(tokens, vec![Token::Text("a "), Token::Text("< b")]);
    }

    #[test]
    fn test_unterminated_tag_does_not_panic() {
        let tokens: Vec<_> = Tokenizer::new("<td title=\"open").collect();
        assert_eq!(tokens, vec![start("td", &[("title", "open")])]);
    }

    #[test]
    fn test_self_closing() {
        let tokens: Vec<_> = Tokenizer::new("<br/>").collect();
        assert_eq!(
            tokens,
            vec![Token::StartTag {
                name: "br".to_string(),
                attrs: vec![],
                self_closing: true
            }]
        );
    }
}
