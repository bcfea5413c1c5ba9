//! Minimal, tolerant HTML parsing.
//!
//! Tester reports are machine-generated but not well-formed XML: attribute
//! values are often unquoted and some writers leave cells unclosed. This
//! module turns such input into a small element tree that supports the
//! queries the report extractor needs (`find_all`, attributes, text).
//!
//! ```
//! use optreport::html::Document;
//!
//! let doc = Document::parse("<table><tr><td title=x>1</td></tr></table>");
//! let cell = doc.find_all("td").next().unwrap();
//! assert_eq!(cell.attr("title"), Some("x"));
//! assert_eq!(cell.stripped_text(), "1");
//! ```

pub mod entities;
pub mod tokenizer;
pub mod tree;

pub use entities::decode_entities;
pub use tree::{Document, Element, Node};
