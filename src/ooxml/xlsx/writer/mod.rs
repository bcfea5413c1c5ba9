//! Worksheet and workbook writer components for XLSX.

pub mod sheet;
pub mod strings;
pub mod styles;
pub mod workbook;

// Re-export main types
pub use sheet::{CellStyleMap, Worksheet, sanitize_sheet_name};
pub use strings::SharedStrings;
pub use styles::StylesBuilder;
pub use workbook::Workbook;
