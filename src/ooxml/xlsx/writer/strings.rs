//! Workbook-wide shared strings (`xl/sharedStrings.xml`).

use crate::common::Result;
use crate::common::xml::escape_xml;
use std::collections::HashMap;
use std::fmt::Write as FmtWrite;

/// Shared strings table.
///
/// Excel stores strings in one workbook-wide table and cells refer to them
/// by index. This structure manages the collection of unique strings and
/// counts how many cells reference the table in total.
#[derive(Debug, Default)]
pub struct SharedStrings {
    /// Unique strings in first-seen order
    strings: Vec<String>,
    index_of: HashMap<String, usize>,
    /// Number of references handed out (the `count` attribute)
    references: usize,
}

impl SharedStrings {
    /// Create a new empty shared strings table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `s` in the table, interning it on first use.
    ///
    /// Every call counts as one cell reference.
    pub fn add_string(&mut self, s: &str) -> usize {
        self.references += 1;
        if let Some(&index) = self.index_of.get(s) {
            return index;
        }
        let index = self.strings.len();
        self.strings.push(s.to_owned());
        self.index_of.insert(s.to_owned(), index);
        index
    }

    /// Distinct strings (the `uniqueCount` attribute).
    pub fn unique_count(&self) -> usize {
        self.strings.len()
    }

    /// References handed out (the `count` attribute).
    pub fn count(&self) -> usize {
        self.references
    }

    /// Serialize the shared strings table to XML.
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(256 + self.strings.len() * 32);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);

        write!(
            xml,
            r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{}" uniqueCount="{}">"#,
            self.references,
            self.strings.len()
        )?;

        for s in &self.strings {
            // Leading or trailing whitespace is dropped by Excel unless preserved.
            if s.starts_with(char::is_whitespace) || s.ends_with(char::is_whitespace) {
                write!(xml, r#"<si><t xml:space="preserve">{}</t></si>"#, escape_xml(s))?;
            } else {
                write!(xml, "<si><t>{}</t></si>", escape_xml(s))?;
            }
        }

        xml.push_str("</sst>");

        Ok(xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_detail_is_interned_once() {
        let mut ss = SharedStrings::new();
        let lots = ss.add_string("Lots=0.1");
        let period = ss.add_string("Period=14");
        let again = ss.add_string("Lots=0.1");

        assert_eq!((lots, period, again), (0, 1, 0));
        assert_eq!(ss.unique_count(), 2);
        assert_eq!(ss.count(), 3);
    }

    #[test]
    fn test_to_xml_escapes_and_preserves_space() {
        let mut ss = SharedStrings::new();
        ss.add_string("a<b");
        ss.add_string(" padded");

        let xml = ss.to_xml().unwrap();
        assert!(xml.contains(r#"count="2" uniqueCount="2""#));
        assert!(xml.contains("<si><t>a&lt;b</t></si>"));
        assert!(xml.contains(r#"<t xml:space="preserve"> padded</t>"#));
    }
}
