//! Capital/total row extraction from financial-statement filings.
//!
//! Statement attachments come as either a workbook or an HTML page with a
//! plain `<table>`. Both paths look for rows labeled with "سرمایه" or
//! "جمع" and take the first parseable number in the row; a value of exactly
//! zero is dropped.

use scraper::{Html, Selector};
use tracing::warn;

use crate::extract::number::normalize_number;
use crate::extract::sheet::{Cell, Workbook};
use crate::extract::text::normalize_loose;
use crate::extract::title::{format_month_fa, is_date_cell};

const INCOME_STATEMENT_MARKERS: &[&str] = &["صورت سود", "سود و زیان"];
const ROW_LABEL_MARKERS: &[&str] = &["سرمایه", "جمع"];

/// One extracted statement line: which filing it came from, the label cell
/// as printed, and the first number found on that row.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementRow {
    pub title: String,
    pub label: String,
    pub value: f64,
}

fn is_income_statement_marker(text: &str) -> bool {
    INCOME_STATEMENT_MARKERS.iter().any(|m| text.contains(m))
}

fn is_row_label(text: &str) -> bool {
    ROW_LABEL_MARKERS.iter().any(|m| text.contains(m))
}

/// Walk every sheet row-major. Once a cell mentions the income statement the
/// sheet is in scope; from then on each labeled cell yields the first
/// parseable number of its row, zero excluded.
pub fn extract_statement_rows(workbook: &Workbook, title: &str) -> Vec<StatementRow> {
    let mut out = Vec::new();
    for sheet in &workbook.sheets {
        let mut in_scope = false;
        for row in &sheet.rows {
            for cell in row {
                let Cell::Text(raw) = cell else { continue };
                let text = normalize_loose(raw);
                if is_income_statement_marker(&text) {
                    in_scope = true;
                }
                if in_scope && is_row_label(&text) {
                    let value = row.iter().find_map(Cell::number);
                    match value {
                        Some(v) if v != 0.0 => out.push(StatementRow {
                            title: title.to_string(),
                            label: raw.trim().to_string(),
                            value: v,
                        }),
                        _ => {}
                    }
                }
            }
        }
    }
    out
}

/// Fallback for attachments that are really an HTML page: every two-cell
/// table row with a labeled first cell and a non-zero second cell counts.
pub fn extract_statement_rows_html(html: &str, title: &str) -> Vec<StatementRow> {
    let doc = Html::parse_document(html);
    let tr = Selector::parse("table tr").expect("tr selector is valid");
    let td = Selector::parse("td").expect("td selector is valid");

    let mut out = Vec::new();
    for row in doc.select(&tr) {
        let cells: Vec<String> = row
            .select(&td)
            .map(|c| c.text().collect::<String>().trim().to_string())
            .collect();
        if cells.len() < 2 {
            continue;
        }
        let label = &cells[0];
        match normalize_number(&cells[1]) {
            Some(v) if v != 0.0 && is_row_label(&normalize_loose(label)) => {
                out.push(StatementRow {
                    title: title.to_string(),
                    label: label.clone(),
                    value: v,
                });
            }
            _ => {}
        }
    }
    if out.is_empty() {
        warn!(title, "no capital/total rows in HTML attachment");
    }
    out
}

/// Output hygiene for emitted tables: keep labeled rows, drop single-cell
/// rows that are just a number, rewrite date cells to month names.
pub fn clean_table(rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
    rows.into_iter()
        .filter(|row| {
            let first = row.first().map(|s| s.trim()).unwrap_or("");
            if is_row_label(&normalize_loose(first)) {
                return true;
            }
            !(row.len() == 1 && first.chars().next().is_some_and(|c| c.is_ascii_digit()))
        })
        .map(|row| {
            row.into_iter()
                .map(|cell| {
                    if is_date_cell(&cell) {
                        format_month_fa(&cell)
                    } else {
                        cell
                    }
                })
                .collect()
        })
        .collect()
}
