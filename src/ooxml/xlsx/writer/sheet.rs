//! Worksheet writer.

use crate::common::Result;
use crate::ooxml::xlsx::cell::{CellValue, cell_reference};
use crate::ooxml::xlsx::format::CellFormat;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as FmtWrite;

use super::strings::SharedStrings;

/// Cell position (0-based row, 0-based column) to style index.
pub type CellStyleMap = HashMap<(u32, u32), usize>;

/// A worksheet under construction.
///
/// The public API takes 1-based rows and columns, as Excel shows them;
/// storage is 0-based. Cells are kept ordered by (row, column) so the
/// serialized `sheetData` needs no sorting pass.
#[derive(Debug, Clone)]
pub struct Worksheet {
    name: String,
    sheet_id: u32,
    /// Cell values by (row, col)
    cells: BTreeMap<(u32, u32), CellValue>,
    /// Cell formats by (row, col)
    cell_formats: HashMap<(u32, u32), CellFormat>,
    /// Column widths in characters by col
    column_widths: BTreeMap<u32, f64>,
}

impl Worksheet {
    /// Create a new empty worksheet.
    pub fn new(name: String, sheet_id: u32) -> Self {
        Self {
            name,
            sheet_id,
            cells: BTreeMap::new(),
            cell_formats: HashMap::new(),
            column_widths: BTreeMap::new(),
        }
    }

    /// Get the worksheet name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the sheet ID.
    pub fn sheet_id(&self) -> u32 {
        self.sheet_id
    }

    /// Set a cell value.
    ///
    /// # Arguments
    /// * `row` - 1-based row number (1 = first row)
    /// * `col` - 1-based column number (1 = column A)
    pub fn set_cell_value<V: Into<CellValue>>(&mut self, row: u32, col: u32, value: V) {
        debug_assert!(row >= 1 && col >= 1, "cell coordinates are 1-based");
        // Convert from 1-based (API) to 0-based (internal storage)
        self.cells
            .insert((row.saturating_sub(1), col.saturating_sub(1)), value.into());
    }

    /// Get a cell value (1-based coordinates).
    pub fn cell_value(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.cells
            .get(&(row.checked_sub(1)?, col.checked_sub(1)?))
    }

    /// Set cell formatting.
    pub fn set_cell_format(&mut self, row: u32, col: u32, format: CellFormat) {
        self.cell_formats
            .insert((row.saturating_sub(1), col.saturating_sub(1)), format);
    }

    /// Formats keyed by 0-based position.
    pub fn cell_formats(&self) -> impl Iterator<Item = (&(u32, u32), &CellFormat)> {
        self.cell_formats.iter()
    }

    /// All populated values of a column (1-based), top to bottom.
    pub fn column_values(&self, col: u32) -> impl Iterator<Item = &CellValue> + '_ {
        let col = col.saturating_sub(1);
        self.cells
            .iter()
            .filter(move |((_, c), _)| *c == col)
            .map(|(_, value)| value)
    }

    /// Set column width in characters (Excel default is 8.43).
    ///
    /// # Arguments
    /// * `col` - 1-based column number (1 = column A)
    pub fn set_column_width(&mut self, col: u32, width: f64) {
        self.column_widths.insert(col.saturating_sub(1), width);
    }

    /// Get a column width set with [`Worksheet::set_column_width`].
    pub fn column_width(&self, col: u32) -> Option<f64> {
        self.column_widths.get(&col.checked_sub(1)?).copied()
    }

    /// Bounding box of populated cells as 0-based (min_row, min_col, max_row, max_col).
    pub fn used_range(&self) -> Option<(u32, u32, u32, u32)> {
        let (&(min_row, _), _) = self.cells.first_key_value()?;
        let (&(max_row, _), _) = self.cells.last_key_value()?;

        let (min_col, max_col) = self
            .cells
            .keys()
            .fold((u32::MAX, 0), |(lo, hi), &(_, col)| (lo.min(col), hi.max(col)));

        Some((min_row, min_col, max_row, max_col))
    }

    /// Serialize the worksheet to XML.
    ///
    /// # Arguments
    /// * `shared_strings` - Shared strings table that string cells are added to
    /// * `style_indices` - Map of cell positions to style indices
    pub fn to_xml(
        &self,
        shared_strings: &mut SharedStrings,
        style_indices: &CellStyleMap,
    ) -> Result<String> {
        let mut xml = String::with_capacity(1024 + self.cells.len() * 48);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        );

        // Write sheet dimensions
        // NOTE: Excel uses 1-based row/column numbering in XML
        match self.used_range() {
            Some((min_row, min_col, max_row, max_col)) => write!(
                xml,
                r#"<dimension ref="{}:{}"/>"#,
                cell_reference(min_row + 1, min_col + 1),
                cell_reference(max_row + 1, max_col + 1)
            )?,
            None => xml.push_str(r#"<dimension ref="A1"/>"#),
        }

        xml.push_str(r#"<sheetViews><sheetView tabSelected="1" workbookViewId="0"/></sheetViews>"#);
        xml.push_str(r#"<sheetFormatPr defaultRowHeight="15"/>"#);

        self.write_cols(&mut xml)?;

        xml.push_str("<sheetData>");
        self.write_sheet_data(&mut xml, shared_strings, style_indices)?;
        xml.push_str("</sheetData>");

        xml.push_str(r#"<pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/>"#);
        xml.push_str("</worksheet>");

        Ok(xml)
    }

    fn write_sheet_data(
        &self,
        xml: &mut String,
        shared_strings: &mut SharedStrings,
        style_indices: &CellStyleMap,
    ) -> Result<()> {
        let mut current_row: Option<u32> = None;

        for (&(row, col), value) in &self.cells {
            if current_row != Some(row) {
                if current_row.is_some() {
                    xml.push_str("</row>");
                }
                // NOTE: Excel uses 1-based row numbering
                write!(xml, r#"<row r="{}">"#, row + 1)?;
                current_row = Some(row);
            }

            let cell_ref = cell_reference(row + 1, col + 1);
            let style_index = style_indices.get(&(row, col)).copied();
            self.write_cell(xml, &cell_ref, value, shared_strings, style_index)?;
        }

        if current_row.is_some() {
            xml.push_str("</row>");
        }

        Ok(())
    }

    /// Write a single cell to XML.
    fn write_cell(
        &self,
        xml: &mut String,
        cell_ref: &str,
        value: &CellValue,
        shared_strings: &mut SharedStrings,
        style_index: Option<usize>,
    ) -> Result<()> {
        // Helper to add style attribute if present
        let style_attr = match style_index {
            Some(idx) if idx != 0 => format!(r#" s="{}""#, idx),
            _ => String::new(),
        };

        match value {
            CellValue::Empty => {
                // A styled empty cell still needs an element to carry the style.
                if !style_attr.is_empty() {
                    write!(xml, r#"<c r="{}"{}/>"#, cell_ref, style_attr)?;
                }
            },
            CellValue::String(s) => {
                let string_index = shared_strings.add_string(s);
                write!(
                    xml,
                    r#"<c r="{}"{} t="s"><v>{}</v></c>"#,
                    cell_ref, style_attr, string_index
                )?;
            },
            CellValue::Int(i) => {
                write!(xml, r#"<c r="{}"{}><v>{}</v></c>"#, cell_ref, style_attr, i)?;
            },
            CellValue::Float(f) if f.is_finite() => {
                write!(xml, r#"<c r="{}"{}><v>{}</v></c>"#, cell_ref, style_attr, f)?;
            },
            CellValue::Float(_) => {
                write!(
                    xml,
                    r#"<c r="{}"{} t="e"><v>#NUM!</v></c>"#,
                    cell_ref, style_attr
                )?;
            },
        }

        Ok(())
    }

    /// Write column widths.
    fn write_cols(&self, xml: &mut String) -> Result<()> {
        if self.column_widths.is_empty() {
            return Ok(());
        }

        xml.push_str("<cols>");

        for (&col, &width) in &self.column_widths {
            // NOTE: Excel uses 1-based column numbering for min/max attributes
            write!(
                xml,
                r#"<col min="{}" max="{}" width="{}" customWidth="1"/>"#,
                col + 1,
                col + 1,
                width
            )?;
        }

        xml.push_str("</cols>");
        Ok(())
    }
}

/// Make `name` acceptable as a sheet name.
///
/// Excel rejects names containing any of `[]:*?/\`, names longer than 31
/// characters, names starting or ending with an apostrophe and empty names.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c => c,
        })
        .take(31)
        .collect();
    let trimmed = cleaned.trim_matches('\'');
    if trimmed.trim().is_empty() {
        "Sheet1".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::xlsx::format::CellFont;

    #[test]
    fn test_sheet_data_is_row_ordered() {
        let mut ws = Worksheet::new("Data".to_string(), 1);
        ws.set_cell_value(2, 2, 3.5);
        ws.set_cell_value(1, 1, "Pass");
        ws.set_cell_value(2, 1, 7i64);

        let mut ss = SharedStrings::new();
        let xml = ws.to_xml(&mut ss, &CellStyleMap::new()).unwrap();

        assert!(xml.contains(r#"<dimension ref="A1:B2"/>"#));
        assert!(xml.contains(
            r#"<sheetData><row r="1"><c r="A1" t="s"><v>0</v></c></row><row r="2"><c r="A2"><v>7</v></c><c r="B2"><v>3.5</v></c></row></sheetData>"#
        ));
        assert_eq!(ss.unique_count(), 1);
    }

    #[test]
    fn test_style_and_width_written() {
        let mut ws = Worksheet::new("Data".to_string(), 1);
        ws.set_cell_value(1, 1, "Header");
        ws.set_cell_format(
            1,
            1,
            CellFormat {
                font: Some(CellFont {
                    bold: true,
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        ws.set_column_width(1, 12.0);

        let mut styles = CellStyleMap::new();
        styles.insert((0, 0), 1);
        let xml = ws.to_xml(&mut SharedStrings::new(), &styles).unwrap();

        assert!(xml.contains(r#"<cols><col min="1" max="1" width="12" customWidth="1"/></cols>"#));
        assert!(xml.contains(r#"<c r="A1" s="1" t="s">"#));
        assert_eq!(ws.column_width(1), Some(12.0));
    }

    #[test]
    fn test_non_finite_float_written_as_error() {
        let mut ws = Worksheet::new("Data".to_string(), 1);
        ws.set_cell_value(1, 1, f64::INFINITY);
        let xml = ws.to_xml(&mut SharedStrings::new(), &CellStyleMap::new()).unwrap();
        assert!(xml.contains(r#"<c r="A1" t="e"><v>#NUM!</v></c>"#));
    }

    #[test]
    fn test_column_values() {
        let mut ws = Worksheet::new("Data".to_string(), 1);
        ws.set_cell_value(1, 2, "b1");
        ws.set_cell_value(3, 2, "b3");
        ws.set_cell_value(2, 1, "a2");
        let values: Vec<String> = ws.column_values(2).map(|v| v.to_string()).collect();
        assert_eq!(values, vec!["b1", "b3"]);
    }

    #[test]
    fn test_sanitize_sheet_name() {
        assert_eq!(sanitize_sheet_name("Optimization Results"), "Optimization Results");
        assert_eq!(sanitize_sheet_name("a/b:c"), "a_b_c");
        assert_eq!(sanitize_sheet_name(&"x".repeat(40)).chars().count(), 31);
        assert_eq!(sanitize_sheet_name("''"), "Sheet1");
    }
}
