//! Spreadsheet layout for result records.

use std::path::Path;

use super::record::{DETAIL_COLUMN, HEADERS, ResultRecord};
use crate::common::{Error, Result};
use crate::config::ConvertOptions;
use crate::ooxml::xlsx::{
    CellAlignment, CellFill, CellFont, CellFormat, CellValue, Workbook, Worksheet,
};

/// Lay out `records` as a single-sheet workbook.
///
/// Row 1 holds the styled header, then one row per record. Every column is
/// sized to its widest value plus a margin, capped per column.
pub fn build_workbook(records: &[ResultRecord], options: &ConvertOptions) -> Result<Workbook> {
    if records.is_empty() {
        return Err(Error::EmptyRecords);
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet(&options.sheet_name);

    let header_format = header_format(options);
    for (col, header) in (1u32..).zip(HEADERS) {
        sheet.set_cell_value(1, col, header);
        sheet.set_cell_format(1, col, header_format.clone());
    }

    for (row, record) in (2u32..).zip(records) {
        for (col, input) in (1u32..).zip(record.columns()) {
            sheet.set_cell_value(row, col, input);
        }
    }

    autosize_columns(sheet, options);

    Ok(workbook)
}

/// Build the spreadsheet for `records` and write it to `path`.
///
/// An empty record sequence is rejected with [`Error::EmptyRecords`] and
/// nothing is written. The file either appears complete or not at all.
pub fn write_report<P: AsRef<Path>>(
    records: &[ResultRecord],
    path: P,
    options: &ConvertOptions,
) -> Result<()> {
    let workbook = build_workbook(records, options)?;
    workbook.save(path)
}

fn header_format(options: &ConvertOptions) -> CellFormat {
    CellFormat {
        font: Some(CellFont {
            bold: true,
            color: Some(options.header_font_color.clone()),
            ..Default::default()
        }),
        fill: Some(CellFill::solid(options.header_fill.clone())),
        alignment: Some(CellAlignment::Centered),
    }
}

/// Width for a column whose widest value is `max_len` characters.
#[inline]
pub fn column_width(max_len: usize, col: u32, options: &ConvertOptions) -> usize {
    let cap = if col == DETAIL_COLUMN {
        options.max_detail_width
    } else {
        options.max_width
    };
    (max_len + options.width_margin).min(cap)
}

/// Characters a value takes when displayed.
///
/// Integral floats count with a trailing `.0`, the way the value is echoed
/// back as text (`2.0`, not `2`). Magnitudes of 1e16 and above, or tiny
/// ones, are counted in positional notation rather than exponent form, so
/// they come out longer than `1e+16`; the width cap bounds the difference.
pub fn display_len(value: &CellValue) -> usize {
    match value {
        CellValue::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 => {
            value.to_string().chars().count() + 2
        },
        _ => value.to_string().chars().count(),
    }
}

fn autosize_columns(sheet: &mut Worksheet, options: &ConvertOptions) {
    for col in 1..=HEADERS.len() as u32 {
        let max_len = sheet
            .column_values(col)
            .map(display_len)
            .max()
            .unwrap_or(0);
        let width = column_width(max_len, col, options);
        sheet.set_column_width(col, width as f64);
    }
}
