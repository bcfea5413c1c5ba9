//! Office Open XML (OOXML) writing.
//!
//! The module is organized in two layers:
//!
//! 1. **OPC Layer** (`opc`): package assembly (ZIP, parts, relationships,
//!    content types)
//! 2. **SpreadsheetML** (`xlsx`): workbook, worksheets, shared strings and
//!    styles, serialized into an OPC package
pub mod opc;
pub mod xlsx;

pub use opc::{Package, PackageWriter, Part};
