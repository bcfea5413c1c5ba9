//! Cell formatting types for the XLSX writer.

/// Cell format information.
#[derive(Debug, Clone, Default)]
pub struct CellFormat {
    pub font: Option<CellFont>,
    pub fill: Option<CellFill>,
    pub alignment: Option<CellAlignment>,
}

/// Font properties for a cell. The face is always 11pt Calibri.
#[derive(Debug, Clone, Default)]
pub struct CellFont {
    pub bold: bool,
    /// ARGB hex, e.g. `"FFFFFFFF"`
    pub color: Option<String>,
}

/// Fill properties for a cell.
#[derive(Debug, Clone)]
pub struct CellFill {
    pub pattern_type: CellFillPatternType,
    pub fg_color: Option<String>,
}

impl CellFill {
    /// A solid fill of one ARGB color.
    pub fn solid(argb: impl Into<String>) -> Self {
        Self {
            pattern_type: CellFillPatternType::Solid,
            fg_color: Some(argb.into()),
        }
    }

    /// A fill without color, used for the two fills Excel reserves.
    pub(crate) fn pattern(pattern_type: CellFillPatternType) -> Self {
        Self {
            pattern_type,
            fg_color: None,
        }
    }
}

/// Cell fill pattern types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellFillPatternType {
    None,
    Solid,
    Gray125,
}

impl CellFillPatternType {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Solid => "solid",
            Self::Gray125 => "gray125",
        }
    }
}

/// Alignment of a cell's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellAlignment {
    /// Centered on both axes
    Centered,
}

impl CellAlignment {
    /// Attributes of the `<alignment>` element.
    pub(crate) fn attributes(&self) -> &'static str {
        match self {
            Self::Centered => r#"horizontal="center" vertical="center""#,
        }
    }
}
