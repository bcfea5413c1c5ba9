//! Styles.xml generator for XLSX files.
//!
//! This module handles the generation of the styles.xml file, which defines
//! the formatting information (fonts, fills and cell formats) used in a
//! workbook. Only a single empty border is ever written.

use crate::common::Result;
use crate::common::xml::escape_xml;
use crate::ooxml::xlsx::format::{
    CellAlignment, CellFill, CellFillPatternType, CellFont, CellFormat,
};
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::fmt::Write as FmtWrite;
use std::hash::{Hash, Hasher};

/// Size of the default font, in points.
const DEFAULT_FONT_SIZE: f64 = 11.0;

/// One `<xf>` record of `cellXfs`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Xf {
    font_id: usize,
    fill_id: usize,
    alignment: Option<CellAlignment>,
}

/// Builder for generating styles.xml content.
///
/// This struct collects all unique fonts, fills and cell formats, assigns
/// indices to them, and generates the complete styles.xml content.
#[derive(Debug)]
pub struct StylesBuilder {
    /// Unique fonts (index -> font)
    fonts: Vec<CellFont>,
    /// Font lookup (font hash -> index)
    font_map: HashMap<u64, usize>,
    /// Unique fills (index -> fill)
    fills: Vec<CellFill>,
    /// Fill lookup (fill hash -> index)
    fill_map: HashMap<u64, usize>,
    /// Cell formats (XF records)
    cell_formats: Vec<Xf>,
    /// Cell format lookup (format hash -> index)
    cell_format_map: HashMap<u64, usize>,
}

impl StylesBuilder {
    /// Create a new StylesBuilder with default styles.
    pub fn new() -> Self {
        let mut builder = Self {
            fonts: Vec::new(),
            font_map: HashMap::new(),
            fills: Vec::new(),
            fill_map: HashMap::new(),
            cell_formats: Vec::new(),
            cell_format_map: HashMap::new(),
        };

        // Add default font (required by Excel)
        builder.add_font(&CellFont::default());

        // Add default fills (required by Excel - must be first two)
        for pattern_type in [CellFillPatternType::None, CellFillPatternType::Gray125] {
            builder.add_fill(&CellFill::pattern(pattern_type));
        }

        // Add default cell format (style index 0)
        builder.cell_formats.push(Xf {
            font_id: 0,
            fill_id: 0,
            alignment: None,
        });
        builder
            .cell_format_map
            .insert(Self::hash_cell_format(&CellFormat::default()), 0);

        builder
    }

    /// Add a cell format and return its style index.
    ///
    /// If the format has already been added, returns the existing index.
    pub fn add_cell_format(&mut self, format: &CellFormat) -> usize {
        let format_hash = Self::hash_cell_format(format);

        // Check if this format already exists
        if let Some(&index) = self.cell_format_map.get(&format_hash) {
            return index;
        }

        let font_id = match format.font {
            Some(ref font) => self.add_font(font),
            None => 0,
        };
        let fill_id = match format.fill {
            Some(ref fill) => self.add_fill(fill),
            None => 0,
        };

        let index = self.cell_formats.len();
        self.cell_formats.push(Xf {
            font_id,
            fill_id,
            alignment: format.alignment,
        });
        self.cell_format_map.insert(format_hash, index);

        index
    }

    /// Number of cell formats, the default one included.
    pub fn cell_format_count(&self) -> usize {
        self.cell_formats.len()
    }

    /// Add a font and return its index.
    fn add_font(&mut self, font: &CellFont) -> usize {
        let hash = Self::hash_font(font);
        if let Some(&index) = self.font_map.get(&hash) {
            return index;
        }

        let index = self.fonts.len();
        self.fonts.push(font.clone());
        self.font_map.insert(hash, index);
        index
    }

    /// Add a fill and return its index.
    fn add_fill(&mut self, fill: &CellFill) -> usize {
        let hash = Self::hash_fill(fill);
        if let Some(&index) = self.fill_map.get(&hash) {
            return index;
        }

        let index = self.fills.len();
        self.fills.push(fill.clone());
        self.fill_map.insert(hash, index);
        index
    }

    /// Generate the complete styles.xml content.
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(2048);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        // Write fonts
        write!(xml, r#"<fonts count="{}">"#, self.fonts.len())?;
        for font in &self.fonts {
            self.write_font(&mut xml, font)?;
        }
        xml.push_str("</fonts>");

        // Write fills
        write!(xml, r#"<fills count="{}">"#, self.fills.len())?;
        for fill in &self.fills {
            self.write_fill(&mut xml, fill)?;
        }
        xml.push_str("</fills>");

        xml.push_str(
            r#"<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>"#,
        );

        // Write cell style XFs (required, even if empty)
        xml.push_str(r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#);

        // Write cell XFs (the actual cell formats)
        write!(xml, r#"<cellXfs count="{}">"#, self.cell_formats.len())?;
        for xf in &self.cell_formats {
            write!(
                xml,
                r#"<xf numFmtId="0" fontId="{}" fillId="{}" borderId="0" xfId="0""#,
                xf.font_id, xf.fill_id
            )?;

            // Add applyXXX attributes if non-default
            if xf.font_id != 0 {
                xml.push_str(r#" applyFont="1""#);
            }
            if xf.fill_id != 0 {
                xml.push_str(r#" applyFill="1""#);
            }

            match xf.alignment {
                Some(ref alignment) => {
                    xml.push_str(r#" applyAlignment="1">"#);
                    self.write_alignment(&mut xml, alignment);
                    xml.push_str("</xf>");
                },
                None => xml.push_str("/>"),
            }
        }
        xml.push_str("</cellXfs>");

        // Write cell styles (required, even if minimal)
        xml.push_str(r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#);

        xml.push_str("</styleSheet>");

        Ok(xml)
    }

    /// Write a font element to XML.
    fn write_font(&self, xml: &mut String, font: &CellFont) -> Result<()> {
        xml.push_str("<font>");

        if font.bold {
            xml.push_str("<b/>");
        }
        write!(xml, r#"<sz val="{}"/>"#, DEFAULT_FONT_SIZE)?;

        if let Some(ref color) = font.color {
            write!(xml, r#"<color rgb="{}"/>"#, escape_xml(color))?;
        }

        xml.push_str(r#"<name val="Calibri"/><family val="2"/>"#);
        xml.push_str("</font>");
        Ok(())
    }

    /// Write a fill element to XML.
    fn write_fill(&self, xml: &mut String, fill: &CellFill) -> Result<()> {
        xml.push_str("<fill>");

        write!(
            xml,
            r#"<patternFill patternType="{}">"#,
            fill.pattern_type.as_str()
        )?;

        if let Some(ref fg_color) = fill.fg_color {
            write!(xml, r#"<fgColor rgb="{}"/>"#, escape_xml(fg_color))?;
        }

        xml.push_str("</patternFill></fill>");
        Ok(())
    }

    fn write_alignment(&self, xml: &mut String, alignment: &CellAlignment) {
        xml.push_str("<alignment ");
        xml.push_str(alignment.attributes());
        xml.push_str("/>");
    }

    /// Hash a font for deduplication.
    fn hash_font(font: &CellFont) -> u64 {
        let mut hasher = DefaultHasher::new();
        font.bold.hash(&mut hasher);
        font.color.hash(&mut hasher);
        hasher.finish()
    }

    /// Hash a fill for deduplication.
    fn hash_fill(fill: &CellFill) -> u64 {
        let mut hasher = DefaultHasher::new();
        fill.pattern_type.hash(&mut hasher);
        fill.fg_color.hash(&mut hasher);
        hasher.finish()
    }

    /// Hash a cell format for deduplication.
    fn hash_cell_format(format: &CellFormat) -> u64 {
        let mut hasher = DefaultHasher::new();
        format.font.as_ref().map(Self::hash_font).hash(&mut hasher);
        format.fill.as_ref().map(Self::hash_fill).hash(&mut hasher);
        format.alignment.hash(&mut hasher);
        hasher.finish()
    }
}

impl Default for StylesBuilder {
    fn default() -> Self {
        Self::new()
    }
}
