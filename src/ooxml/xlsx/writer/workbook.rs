/// Workbook assembly for XLSX.
use crate::common::Result;
use crate::common::xml::escape_xml;
use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use crate::ooxml::opc::{Package, PackageWriter, Part, Relationships};
use std::fmt::Write as FmtWrite;
use std::path::Path;

use super::sheet::{CellStyleMap, Worksheet, sanitize_sheet_name};
use super::strings::SharedStrings;
use super::styles::StylesBuilder;

/// A workbook being written.
///
/// Shared strings and styles are collected from the worksheets when the
/// workbook is serialized, so worksheets can be filled in any order.
#[derive(Debug, Default)]
pub struct Workbook {
    worksheets: Vec<Worksheet>,
}

impl Workbook {
    /// Create a new workbook without worksheets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new worksheet.
    ///
    /// The name is sanitized to what Excel accepts.
    pub fn add_worksheet(&mut self, name: &str) -> &mut Worksheet {
        let sheet_id = (self.worksheets.len() + 1) as u32;
        let index = self.worksheets.len();
        self.worksheets
            .push(Worksheet::new(sanitize_sheet_name(name), sheet_id));
        &mut self.worksheets[index]
    }

    /// Get a worksheet by index.
    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    /// Get the number of worksheets.
    pub fn worksheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// Build styles from all worksheets.
    ///
    /// Returns the StylesBuilder and, per worksheet, the cell position to
    /// style index mapping.
    pub fn build_styles(&self) -> (StylesBuilder, Vec<CellStyleMap>) {
        let mut builder = StylesBuilder::new();
        let mut worksheet_style_indices = Vec::with_capacity(self.worksheets.len());

        for ws in &self.worksheets {
            let mut style_map = CellStyleMap::new();
            for (pos, format) in ws.cell_formats() {
                let style_index = builder.add_cell_format(format);
                style_map.insert(*pos, style_index);
            }
            worksheet_style_indices.push(style_map);
        }

        (builder, worksheet_style_indices)
    }

    /// Generate workbook.xml content with the worksheets' relationship IDs.
    fn generate_workbook_xml(&self, worksheet_rel_ids: &[String]) -> Result<String> {
        let mut xml = String::with_capacity(512 + self.worksheets.len() * 96);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
        );
        xml.push_str(
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        );

        xml.push_str("<bookViews><workbookView/></bookViews>");

        xml.push_str("<sheets>");
        for (ws, rel_id) in self.worksheets.iter().zip(worksheet_rel_ids) {
            write!(
                xml,
                r#"<sheet name="{}" sheetId="{}" r:id="{}"/>"#,
                escape_xml(ws.name()),
                ws.sheet_id(),
                rel_id
            )?;
        }
        xml.push_str("</sheets>");

        xml.push_str("</workbook>");

        Ok(xml)
    }

    /// Assemble the OPC package for this workbook.
    pub fn to_package(&self) -> Result<Package> {
        let (styles, style_maps) = self.build_styles();
        let mut shared_strings = SharedStrings::new();
        let mut workbook_rels = Relationships::new();
        let mut worksheet_rel_ids = Vec::with_capacity(self.worksheets.len());
        let mut worksheet_parts = Vec::with_capacity(self.worksheets.len());

        for (index, (ws, style_map)) in self.worksheets.iter().zip(&style_maps).enumerate() {
            let target = format!("worksheets/sheet{}.xml", index + 1);
            worksheet_rel_ids.push(workbook_rels.relate_to(&target, rt::WORKSHEET));

            // Worksheets must be serialized before sharedStrings.xml so it
            // holds every string they reference.
            let xml = ws.to_xml(&mut shared_strings, style_map)?;
            worksheet_parts.push(Part::new(
                format!("/xl/{}", target),
                ct::SML_WORKSHEET,
                xml.into_bytes(),
            ));
        }

        workbook_rels.relate_to("styles.xml", rt::STYLES);
        workbook_rels.relate_to("sharedStrings.xml", rt::SHARED_STRINGS);

        let workbook_xml = self.generate_workbook_xml(&worksheet_rel_ids)?;

        let mut package = Package::new();
        package.relate_to("xl/workbook.xml", rt::OFFICE_DOCUMENT);
        package.add_part(
            Part::new(
                "/xl/workbook.xml",
                ct::SML_SHEET_MAIN,
                workbook_xml.into_bytes(),
            )
            .with_rels(workbook_rels),
        );
        for part in worksheet_parts {
            package.add_part(part);
        }
        package.add_part(Part::new(
            "/xl/styles.xml",
            ct::SML_STYLES,
            styles.to_xml()?.into_bytes(),
        ));
        package.add_part(Part::new(
            "/xl/sharedStrings.xml",
            ct::SML_SHARED_STRINGS,
            shared_strings.to_xml()?.into_bytes(),
        ));

        Ok(package)
    }

    /// Serialize the workbook to .xlsx bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        PackageWriter::to_bytes(&self.to_package()?)
    }

    /// Write the workbook to `path`, replacing any existing file atomically.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        PackageWriter::write(path, &self.to_package()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn read_member(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut out = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn test_add_worksheet_assigns_ids() {
        let mut wb = Workbook::new();
        assert_eq!(wb.add_worksheet("One").sheet_id(), 1);
        assert_eq!(wb.add_worksheet("Two").sheet_id(), 2);
        assert_eq!(wb.worksheet_count(), 2);
        assert_eq!(wb.worksheet(1).map(Worksheet::name), Some("Two"));
    }

    #[test]
    fn test_package_parts_and_relationships() {
        let mut wb = Workbook::new();
        let ws = wb.add_worksheet("Results");
        ws.set_cell_value(1, 1, "Pass");
        ws.set_cell_value(2, 1, 1i64);

        let bytes = wb.to_bytes().unwrap();

        let workbook = read_member(&bytes, "xl/workbook.xml");
        assert!(workbook.contains(r#"<sheet name="Results" sheetId="1" r:id="rId1"/>"#));

        let rels = read_member(&bytes, "xl/_rels/workbook.xml.rels");
        assert!(rels.contains(r#"Target="worksheets/sheet1.xml""#));
        assert!(rels.contains(r#"Target="styles.xml""#));
        assert!(rels.contains(r#"Target="sharedStrings.xml""#));

        let root_rels = read_member(&bytes, "_rels/.rels");
        assert!(root_rels.contains(r#"Target="xl/workbook.xml""#));

        let sst = read_member(&bytes, "xl/sharedStrings.xml");
        assert!(sst.contains("<si><t>Pass</t></si>"));

        let content_types = read_member(&bytes, "[Content_Types].xml");
        assert!(content_types.contains(r#"PartName="/xl/worksheets/sheet1.xml""#));
        assert!(content_types.contains(r#"PartName="/xl/sharedStrings.xml""#));
    }
}
