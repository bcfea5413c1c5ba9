//! Excel (.xlsx) spreadsheet writing.
//!
//! A small SpreadsheetML writer: worksheets with typed cells, shared
//! strings, deduplicated cell styles and column widths, packaged as an OPC
//! zip container.
//!
//! # Example
//!
//! ```rust
//! use optreport::ooxml::xlsx::{CellFont, CellFormat, Workbook};
//!
//! # fn main() -> optreport::Result<()> {
//! let mut workbook = Workbook::new();
//! let sheet = workbook.add_worksheet("Data");
//! sheet.set_cell_value(1, 1, "Name");
//! sheet.set_cell_value(2, 1, 42i64);
//! sheet.set_cell_format(1, 1, CellFormat {
//!     font: Some(CellFont { bold: true, ..Default::default() }),
//!     ..Default::default()
//! });
//!
//! let bytes = workbook.to_bytes()?;
//! assert_eq!(&bytes[..2], b"PK");
//! # Ok(())
//! # }
//! ```

pub mod cell;
pub mod format;
pub mod writer;

pub use cell::{CellValue, cell_reference, column_to_letters};
pub use format::{CellAlignment, CellFill, CellFillPatternType, CellFont, CellFormat};
pub use writer::{SharedStrings, StylesBuilder, Workbook, Worksheet};
