//! Result table extraction.
//!
//! A tester report holds several tables; by the report template the
//! optimization results are in the second one (document order, nested
//! tables included). Its first row is the header, every following row with
//! at least seven `td` cells is one optimization pass:
//!
//! | cell | field |
//! |---|---|
//! | 0 | pass (text) and detail (`title` attribute) |
//! | 1 | profit |
//! | 2 | total trades |
//! | 3 | profit factor |
//! | 4 | expected payoff |
//! | 5 | drawdown, absolute |
//! | 6 | drawdown, percent |
//!
//! Extraction never fails. Shape problems are reported as
//! [`ExtractWarning`]s and logged, and the rows that can be read are kept.

use std::fmt;

use super::numeric::profit_to_drawdown;
use super::record::ResultRecord;
use crate::config::ConvertOptions;
use crate::html::{Document, Element};

/// Cells a row needs to fill every field of a record.
const RECORD_CELLS: usize = 7;

/// A non-fatal problem found while reading a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractWarning {
    /// The document has no table at the configured position.
    TableMissing {
        tables_found: usize,
        table_index: usize,
    },
    /// A row was discarded. `row` is 1-based, the header row being row 1.
    RowSkipped { row: usize, cells: usize },
    /// The result table exists but no row produced a record.
    NoValidRows,
}

impl fmt::Display for ExtractWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractWarning::TableMissing {
                tables_found,
                table_index,
            } => write!(
                f,
                "result table #{} not found ({} table(s) in document)",
                table_index, tables_found
            ),
            ExtractWarning::RowSkipped { row, cells } => {
                write!(f, "row {} skipped ({} cell(s))", row, cells)
            },
            ExtractWarning::NoValidRows => f.write_str("no valid result rows"),
        }
    }
}

/// Outcome of reading one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// Records in row order.
    pub records: Vec<ResultRecord>,
    /// Data rows that produced no record.
    pub skipped_rows: usize,
    pub warnings: Vec<ExtractWarning>,
}

impl Extraction {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read the result records from a report.
///
/// `name` identifies the document in warnings and log events.
pub fn extract_records(name: &str, html: &str, options: &ConvertOptions) -> Extraction {
    let document = Document::parse(html);
    let mut extraction = Extraction::default();

    let tables: Vec<&Element> = document.find_all("table").collect();
    let Some(table) = tables.get(options.table_index) else {
        tracing::warn!(
            document = name,
            tables = tables.len(),
            table_index = options.table_index,
            "Result table not found, document has no results."
        );
        extraction.warnings.push(ExtractWarning::TableMissing {
            tables_found: tables.len(),
            table_index: options.table_index,
        });
        return extraction;
    };

    let min_cells = options.min_cells.max(RECORD_CELLS);

    // Row 1 is the header.
    for (offset, row) in table.find_all("tr").enumerate().skip(1) {
        let row_number = offset + 1;
        let cells: Vec<&Element> = row.find_all("td").collect();

        let record = if cells.len() >= min_cells {
            read_record(&cells)
        } else {
            None
        };

        match record {
            Some(record) => extraction.records.push(record),
            None => {
                tracing::warn!(
                    document = name,
                    row = row_number,
                    cells = cells.len(),
                    "Skipping malformed result row."
                );
                extraction.skipped_rows += 1;
                extraction.warnings.push(ExtractWarning::RowSkipped {
                    row: row_number,
                    cells: cells.len(),
                });
            },
        }
    }

    if extraction.records.is_empty() {
        tracing::warn!(document = name, "No valid result rows in document.");
        extraction.warnings.push(ExtractWarning::NoValidRows);
    } else {
        tracing::debug!(
            document = name,
            records = extraction.records.len(),
            skipped = extraction.skipped_rows,
            "Extracted result rows."
        );
    }

    extraction
}

/// Build a record from the cells of one row.
fn read_record(cells: &[&Element]) -> Option<ResultRecord> {
    let text = |index: usize| cells.get(index).map(|cell| cell.stripped_text());

    let pass_cell = cells.first()?;
    let profit = text(1)?;
    let drawdown_absolute = text(5)?;

    Some(ResultRecord {
        pass: pass_cell.stripped_text(),
        profit_to_drawdown: profit_to_drawdown(&profit, &drawdown_absolute),
        profit,
        total_trades: text(2)?,
        profit_factor: text(3)?,
        expected_payoff: text(4)?,
        drawdown_absolute,
        drawdown_percent: text(6)?,
        detail: pass_cell.attr("title").unwrap_or_default().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTINGS: &str = "<table><tr><td>Symbol</td><td>EURUSD</td></tr></table>";

    fn report(rows: &str) -> String {
        format!(
            "<html><body>{}<table><tr><td>Pass</td><td>Profit</td><td>Total trades</td>\
             <td>Profit factor</td><td>Expected Payoff</td><td>Drawdown $</td>\
             <td>Drawdown %</td></tr>{}</table></body></html>",
            SETTINGS, rows
        )
    }

    fn row(title: Option<&str>, values: [&str; 7]) -> String {
        let title = title
            .map(|t| format!(" title=\"{}\"", t))
            .unwrap_or_default();
        let mut out = format!("<tr><td{}>{}</td>", title, values[0]);
        for value in &values[1..] {
            out.push_str(&format!("<td class=mspt>{}</td>", value));
        }
        out.push_str("</tr>");
        out
    }

    fn extract(html: &str) -> Extraction {
        extract_records("test.htm", html, &ConvertOptions::default())
    }

    #[test]
    fn test_no_tables_or_single_table() {
        for html in ["<html></html>", SETTINGS] {
            let extraction = extract(html);
            assert!(extraction.is_empty());
            assert!(matches!(
                extraction.warnings.as_slice(),
                [ExtractWarning::TableMissing { .. }]
            ));
        }
    }

    #[test]
    fn test_header_only_table_yields_nothing() {
        let extraction = extract(&report(""));
        assert!(extraction.is_empty());
        assert_eq!(extraction.skipped_rows, 0);
        assert_eq!(extraction.warnings, vec![ExtractWarning::NoValidRows]);
    }

    #[test]
    fn test_ratio_from_separated_profit() {
        let html = report(&row(
            Some("Lots=0.1"),
            ["1", "1,250.50", "48", "1.85", "26.05", "500.00", "4.12"],
        ));
        let extraction = extract(&html);
        assert_eq!(extraction.records.len(), 1);
        let rec = &extraction.records[0];
        assert_eq!(rec.profit, "1,250.50");
        assert_eq!(rec.profit_to_drawdown, 2.5);
        assert_eq!(rec.detail, "Lots=0.1");
        assert!(extraction.warnings.is_empty());
    }

    #[test]
    fn test_zero_drawdown_gives_zero_ratio() {
        let html = report(&row(None, ["2", "9,999.99", "3", "99", "3333.33", "0", "0"]));
        assert_eq!(extract(&html).records[0].profit_to_drawdown, 0.0);
    }

    #[test]
    fn test_missing_title_gives_empty_detail() {
        let html = report(&row(None, ["3", "10.00", "1", "1.1", "10", "5.00", "0.5"]));
        let rec = &extract(&html).records[0];
        assert_eq!(rec.detail, "");
        assert_eq!(rec.pass, "3");
        assert_eq!(rec.total_trades, "1");
        assert_eq!(rec.drawdown_percent, "0.5");
        assert_eq!(rec.profit_to_drawdown, 2.0);
    }

    #[test]
    fn test_short_row_skipped_without_affecting_later_rows() {
        let rows = format!(
            "{}<tr><td>total</td><td>5</td></tr>{}",
            row(None, ["1", "100", "1", "1", "1", "50", "1"]),
            row(None, ["2", "300", "1", "1", "1", "100", "1"]),
        );
        let extraction = extract(&report(&rows));
        let passes: Vec<_> = extraction.records.iter().map(|r| r.pass.as_str()).collect();
        assert_eq!(passes, vec!["1", "2"]);
        assert_eq!(extraction.records[1].profit_to_drawdown, 3.0);
        assert_eq!(extraction.skipped_rows, 1);
        assert_eq!(
            extraction.warnings,
            vec![ExtractWarning::RowSkipped { row: 3, cells: 2 }]
        );
    }

    #[test]
    fn test_text_is_stripped_and_decoded() {
        let html = report(
            "<tr><td title=\"Lots=0.1; &quot;fast&quot;\">\n 7 \n</td><td> 1&nbsp;</td>\
             <td>2</td><td>3</td><td>4</td><td>5</td><td>6</td></tr>",
        );
        let rec = &extract(&html).records[0];
        assert_eq!(rec.pass, "7");
        assert_eq!(rec.detail, "Lots=0.1; \"fast\"");
        // NBSP is whitespace to `str::trim`.
        assert_eq!(rec.profit, "1");
    }

    #[test]
    fn test_unclosed_cells_still_read() {
        let html = report("<tr><td title=x>4<td>10<td>1<td>1<td>1<td>5<td>1</tr>");
        let rec = &extract(&html).records[0];
        assert_eq!(rec.pass, "4");
        assert_eq!(rec.detail, "x");
        assert_eq!(rec.profit_to_drawdown, 2.0);
    }

    #[test]
    fn test_configured_table_index() {
        let html = format!(
            "{}<table><tr><td>h</td></tr>{}</table>",
            SETTINGS,
            row(None, ["9", "1", "1", "1", "1", "1", "1"])
        );
        let options = ConvertOptions::new().with_table_index(0);
        let extraction = extract_records("x", &html, &options);
        // Table 0 is the settings table; its only row is read as the header.
        assert!(extraction.is_empty());

        let extraction = extract_records("x", &html, &ConvertOptions::default());
        assert_eq!(extraction.records[0].pass, "9");
    }
}
