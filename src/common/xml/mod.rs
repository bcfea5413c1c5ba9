//! XML text helpers used when serializing package parts.

pub mod escape;

pub use escape::{escape_xml, sanitize_xml_text};
