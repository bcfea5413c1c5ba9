//! optreport - converts strategy tester optimization reports into spreadsheets
//!
//! A tester optimization report is an HTML page whose second table lists one
//! optimization pass per row. This crate reads those rows into typed records,
//! adds the profit-to-drawdown ratio and writes them to a styled `.xlsx`
//! workbook, one workbook per report.
//!
//! # Features
//!
//! - **Tolerant HTML parsing**: unquoted attributes, unclosed cells and
//!   UTF-16 reports
//! - **Typed columns**: numbers become numeric cells, anything else keeps its
//!   original text
//! - **Self-contained XLSX writer**: shared strings, styles and column widths
//! - **Batch mode**: whole folders, optionally in parallel
//!
//! # Example - Converting one report
//!
//! ```no_run
//! use optreport::{ConvertOptions, extract_records, write_report};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = ConvertOptions::default();
//! let html = std::fs::read_to_string("audusd-143.htm")?;
//!
//! let extraction = extract_records("audusd-143.htm", &html, &options);
//! if !extraction.records.is_empty() {
//!     write_report(&extraction.records, "audusd-143.xlsx", &options)?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Converting a folder
//!
//! ```no_run
//! use optreport::{ConvertOptions, convert_folder};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = ConvertOptions::new().with_parallel(true);
//! let summary = convert_folder(Path::new("OptimizeLot"), Path::new("Output"), &options)?;
//! println!("{} spreadsheets, {} rows", summary.written, summary.total_records);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod common;
pub mod config;
pub mod html;
pub mod ooxml;
pub mod report;

pub use batch::{BatchSummary, DocumentOutcome, convert_document, convert_folder};
pub use common::{Error, Result};
pub use config::ConvertOptions;
pub use report::{
    CellInput, ExtractWarning, Extraction, HEADERS, ResultRecord, extract_records, write_report,
};
