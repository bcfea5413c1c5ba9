//! Result records and their spreadsheet columns.

use super::numeric::{parse_decimal, parse_int, parse_money};
use crate::ooxml::xlsx::CellValue;

/// Header labels, in column order.
pub const HEADERS: [&str; 9] = [
    "Pass",
    "Profit",
    "Total trades",
    "Profit factor",
    "Expected Payoff",
    "Drawdown $",
    "Drawdown %",
    "Profit/Drawdown$",
    "Detail",
];

/// 1-based index of the Detail column.
pub const DETAIL_COLUMN: u32 = 9;

/// One optimization pass, as read from a result row.
///
/// The seven source fields hold the trimmed cell text exactly as the report
/// printed it; [`ResultRecord::columns`] resolves them to typed values.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    pub pass: String,
    pub profit: String,
    pub total_trades: String,
    pub profit_factor: String,
    pub expected_payoff: String,
    pub drawdown_absolute: String,
    pub drawdown_percent: String,
    /// Profit over absolute drawdown, always numeric.
    pub profit_to_drawdown: f64,
    /// `title` attribute of the pass cell, empty when absent.
    pub detail: String,
}

/// A field after coercion: the parsed number, or the original text when it
/// did not parse.
#[derive(Debug, Clone, PartialEq)]
pub enum CellInput {
    Int(i64),
    Number(f64),
    Text(String),
}

impl CellInput {
    /// Integer, or the text itself.
    pub fn integer(text: &str) -> Self {
        match parse_int(text) {
            Some(value) => CellInput::Int(value),
            None => CellInput::Text(text.to_string()),
        }
    }

    /// Decimal, or the text itself.
    pub fn decimal(text: &str) -> Self {
        match parse_decimal(text) {
            Some(value) => CellInput::Number(value),
            None => CellInput::Text(text.to_string()),
        }
    }

    /// Decimal with thousands separators removed first, or the text itself.
    pub fn money(text: &str) -> Self {
        match parse_money(text) {
            Some(value) => CellInput::Number(value),
            None => CellInput::Text(text.to_string()),
        }
    }
}

impl From<CellInput> for CellValue {
    fn from(input: CellInput) -> Self {
        match input {
            CellInput::Int(value) => CellValue::Int(value),
            CellInput::Number(value) => CellValue::Float(value),
            CellInput::Text(text) => CellValue::String(text),
        }
    }
}

impl ResultRecord {
    /// The nine column values in header order.
    pub fn columns(&self) -> [CellInput; 9] {
        [
            CellInput::integer(&self.pass),
            CellInput::money(&self.profit),
            CellInput::integer(&self.total_trades),
            CellInput::decimal(&self.profit_factor),
            CellInput::decimal(&self.expected_payoff),
            CellInput::money(&self.drawdown_absolute),
            CellInput::decimal(&self.drawdown_percent),
            CellInput::Number(self.profit_to_drawdown),
            CellInput::Text(self.detail.clone()),
        ]
    }
}
