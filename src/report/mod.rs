//! Optimization report conversion.
//!
//! [`extract_records`] reads the result rows of one tester report and
//! [`write_report`] lays them out as a styled spreadsheet. The two steps
//! share nothing but the record sequence.

pub mod extract;
pub mod numeric;
pub mod record;
pub mod sheet;

pub use extract::{ExtractWarning, Extraction, extract_records};
pub use record::{CellInput, HEADERS, ResultRecord};
pub use sheet::{build_workbook, write_report};
