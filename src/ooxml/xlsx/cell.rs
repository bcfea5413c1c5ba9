//! Cell values and cell references.

use std::fmt;

/// Value stored in a worksheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Empty cell
    Empty,
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point number
    Float(f64),
    /// String value, written through the shared strings table
    String(String),
}

impl CellValue {
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

/// The displayed form of the value, as Excel's General format shows it.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(x) => write!(f, "{}", x),
            CellValue::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::String(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

/// Convert column number to Excel column letters (e.g., 1 -> "A", 26 -> "Z", 27 -> "AA").
pub fn column_to_letters(col: u32) -> String {
    let mut letters = String::new();
    let mut col = col;

    while col > 0 {
        col -= 1;
        let letter = ((col % 26) as u8 + b'A') as char;
        letters.insert(0, letter);
        col /= 26;
    }

    letters
}

/// A1-style reference for 1-based `row` and `col`.
#[inline]
pub fn cell_reference(row: u32, col: u32) -> String {
    format!("{}{}", column_to_letters(col), row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(column_to_letters(1), "A");
        assert_eq!(column_to_letters(9), "I");
        assert_eq!(column_to_letters(26), "Z");
        assert_eq!(column_to_letters(27), "AA");
        assert_eq!(column_to_letters(703), "AAA");
    }

    #[test]
    fn test_display_matches_general_format() {
        assert_eq!(CellValue::from(1250.5).to_string(), "1250.5");
        assert_eq!(CellValue::from(2.0).to_string(), "2");
        assert_eq!(CellValue::from(-7i64).to_string(), "-7");
        assert_eq!(CellValue::Empty.to_string(), "");
    }

    #[test]
    fn test_cell_reference() {
        assert_eq!(cell_reference(1, 9), "I1");
    }
}
