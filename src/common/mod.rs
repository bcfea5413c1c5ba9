//! Common types and utilities shared across the extractor and the spreadsheet writer.

// Submodule declarations
pub mod encoding;
pub mod error;
pub mod xml;

// Re-exports for convenience
pub use encoding::decode_document;
pub use error::{Error, Result};
