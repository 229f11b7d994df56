//! Monthly-sales fact extraction from a decoded report workbook.
//!
//! Monthly activity reports announce each reporting sub-period with a header
//! cell like "دوره ۱ ماهه منتهی به ۱۴۰۴/۰۵/۳۱". Somewhere below and to the
//! right of that cell sits a "مبلغ فروش" column header, and the block of
//! product rows under it ends with one or more "جمع" rows before the next
//! period block begins. The extractor walks that structure positionally:
//! locate the period group, bind the sales column, then keep the last total
//! value seen before the block boundary. Corrections appear lower in the
//! block, so later rows win.

use tracing::debug;

use crate::extract::number::format_amount_fa;
use crate::extract::sheet::{Cell, Row, Sheet, Workbook};
use crate::extract::text::{normalize_digits, normalize_tight};
use crate::extract::title::period_label;

const PERIOD_MARKER: &str = "دوره";
const MONTHS_MARKER: &str = "ماهه";
const AMOUNT_MARKER: &str = "مبلغ";
const SALES_MARKER: &str = "فروش";
const TOTAL_LABEL: &str = "جمع";
const FISCAL_YEAR_START_MARKER: &str = "از ابتدای سال مالی";
const PRODUCT_STATUS_MARKER: &str = "وضعیت محصول";

/// Period headers always sit near the top of a sheet; rows past this depth
/// are never inspected for one.
const GROUP_SCAN_ROWS: usize = 30;
/// The sales-amount header is bound within this many rows below the group
/// cell and this many columns from it (inclusive of the group column).
const BINDING_ROW_SPAN: usize = 6;
const BINDING_COL_SPAN: usize = 6;

/// One extracted (symbol, period, amount) record.
#[derive(Debug, Clone, PartialEq)]
pub struct Fact {
    pub symbol: String,
    pub period: String,
    pub sales_amount: String,
}

/// First cell, in row-major order over the first `GROUP_SCAN_ROWS` rows,
/// whose text carries the period and months markers plus the target date in
/// either digit system. `None` means the sheet has no block for this period
/// and is skipped.
pub fn find_period_group(sheet: &Sheet, target_date: &str) -> Option<(usize, usize)> {
    let ascii_date = normalize_digits(target_date);
    for (r, row) in sheet.rows.iter().take(GROUP_SCAN_ROWS).enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let Some(text) = cell.loose() else { continue };
            if text.contains(PERIOD_MARKER)
                && text.contains(MONTHS_MARKER)
                && (text.contains(target_date) || text.contains(&ascii_date))
            {
                return Some((r, c));
            }
        }
    }
    None
}

/// First cell naming the sales amount, scanned row-major in the window
/// below-and-right of the group cell.
pub fn find_sales_column(sheet: &Sheet, group: (usize, usize)) -> Option<(usize, usize)> {
    let (group_row, group_col) = group;
    for r in (group_row + 1)..=(group_row + BINDING_ROW_SPAN) {
        let Some(row) = sheet.rows.get(r) else { break };
        let col_end = (group_col + BINDING_COL_SPAN).min(row.len());
        for c in group_col..col_end {
            let Some(text) = row[c].loose() else { continue };
            if text.contains(AMOUNT_MARKER) && text.contains(SALES_MARKER) {
                return Some((r, c));
            }
        }
    }
    None
}

fn row_loose_text(row: &Row) -> String {
    let mut joined = String::new();
    for cell in row {
        if let Some(text) = cell.loose() {
            if !joined.is_empty() {
                joined.push(' ');
            }
            joined.push_str(&text);
        }
    }
    joined
}

/// A row whose concatenated text announces the next block: another period
/// header, the since-fiscal-year-start section, or the product-status grid.
fn is_group_boundary(row_text: &str) -> bool {
    (row_text.contains(PERIOD_MARKER) && row_text.contains(MONTHS_MARKER))
        || row_text.contains(FISCAL_YEAR_START_MARKER)
        || row_text.contains(PRODUCT_STATUS_MARKER)
}

fn is_total_row(row: &Row) -> bool {
    row.iter().take(3).any(|cell| match cell {
        Cell::Text(s) => normalize_tight(s) == TOTAL_LABEL,
        _ => false,
    })
}

/// Walk the rows under the bound header and keep the last parseable total
/// in the sales column before the block boundary. Unparseable totals leave
/// the running value alone.
pub fn extract_last_total(sheet: &Sheet, header_row: usize, sales_col: usize) -> Option<f64> {
    let mut last_sale = None;
    for row in sheet.rows.iter().skip(header_row + 1) {
        if is_group_boundary(&row_loose_text(row)) {
            break;
        }
        if !is_total_row(row) {
            continue;
        }
        if let Some(value) = row.get(sales_col).and_then(|cell| cell.number()) {
            last_sale = Some(value);
        }
    }
    last_sale
}

/// Run the full heuristic over one sheet. Every miss along the way — no
/// period group, no sales column, no total row — is a normal `None`.
pub fn extract_sheet_sales(sheet: &Sheet, target_date: &str) -> Option<f64> {
    let group = find_period_group(sheet, target_date)?;
    let (header_row, sales_col) = find_sales_column(sheet, group)?;
    debug!(
        sheet = %sheet.name,
        group_row = group.0,
        header_row,
        sales_col,
        "sales column bound"
    );
    extract_last_total(sheet, header_row, sales_col)
}

/// At most one fact per report: the first sheet (in file order) that yields
/// a value wins, and a report whose title carries no period date is
/// excluded outright.
pub fn extract_report_fact(
    workbook: &Workbook,
    symbol: &str,
    title: &str,
    target_date: &str,
) -> Option<Fact> {
    let period = period_label(title)?;
    for sheet in &workbook.sheets {
        if let Some(value) = extract_sheet_sales(sheet, target_date) {
            return Some(Fact {
                symbol: symbol.to_string(),
                period,
                sales_amount: format_amount_fa(value),
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_row(cells: &[&str]) -> Row {
        cells
            .iter()
            .map(|s| {
                if s.is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(s.to_string())
                }
            })
            .collect()
    }

    fn sheet_of(rows: Vec<Row>) -> Sheet {
        Sheet::new("فروش ماهانه", rows)
    }

    const GROUP_HEADER: &str = "دوره ۱ ماهه منتهی به 1404/05/31";

    #[test]
    fn group_search_stops_at_scan_depth() {
        // matching cell sits at row 30, one past the scanned range
        let mut rows = vec![text_row(&["محصول"]); 30];
        rows.push(text_row(&[GROUP_HEADER]));
        assert_eq!(find_period_group(&sheet_of(rows), "1404/05/31"), None);

        let mut rows = vec![text_row(&["محصول"]); 29];
        rows.push(text_row(&[GROUP_HEADER]));
        assert_eq!(
            find_period_group(&sheet_of(rows), "1404/05/31"),
            Some((29, 0))
        );
    }

    #[test]
    fn group_matches_either_digit_system() {
        let rows = vec![text_row(&["", "دوره ۱ ماهه منتهی به ۱۴۰۴/۰۵/۳۱"])];
        assert_eq!(
            find_period_group(&sheet_of(rows), "۱۴۰۴/۰۵/۳۱"),
            Some((0, 1))
        );
        // ASCII-converted target finds an ASCII sheet too
        let rows = vec![text_row(&["", GROUP_HEADER])];
        assert_eq!(
            find_period_group(&sheet_of(rows), "1404/05/31"),
            Some((0, 1))
        );
    }

    #[test]
    fn binding_window_is_six_by_six() {
        // header one row below, five columns right: inside the window
        let mut near = vec![text_row(&[GROUP_HEADER])];
        near.push(text_row(&["", "", "", "", "", "مبلغ فروش"]));
        let sheet = sheet_of(near);
        assert_eq!(find_sales_column(&sheet, (0, 0)), Some((1, 5)));

        // seven columns right: outside
        let mut far = vec![text_row(&[GROUP_HEADER])];
        far.push(text_row(&["", "", "", "", "", "", "", "مبلغ فروش"]));
        let sheet = sheet_of(far);
        assert_eq!(find_sales_column(&sheet, (0, 0)), None);
    }

    #[test]
    fn last_total_before_boundary_wins() {
        let rows = vec![
            text_row(&["نام محصول", "واحد", "مبلغ فروش"]), // header row 0
            text_row(&["جمع", "", "100"]),
            text_row(&["جمع", "", "200"]),
            text_row(&["جمع", "", "300"]),
            text_row(&["دوره ۱ ماهه منتهی به 1404/06/31"]), // next block
            text_row(&["جمع", "", "999"]),
        ];
        assert_eq!(extract_last_total(&sheet_of(rows), 0, 2), Some(300.0));
    }

    #[test]
    fn unparseable_total_does_not_clear_the_running_value() {
        let rows = vec![
            text_row(&["نام محصول", "واحد", "مبلغ فروش"]),
            text_row(&["جمع", "", "1,500"]),
            text_row(&["جمع", "", "نامشخص"]),
        ];
        assert_eq!(extract_last_total(&sheet_of(rows), 0, 2), Some(1500.0));
    }

    #[test]
    fn total_label_matches_only_exactly() {
        let rows = vec![
            text_row(&["نام محصول", "واحد", "مبلغ فروش"]),
            text_row(&["جمع کل", "", "100"]),
            text_row(&[" جمع ", "", "250"]),
        ];
        // "جمع کل" is not the total label; the padded "جمع" is
        assert_eq!(extract_last_total(&sheet_of(rows), 0, 2), Some(250.0));
    }

    #[test]
    fn fiscal_year_start_row_is_a_boundary() {
        let rows = vec![
            text_row(&["نام محصول", "واحد", "مبلغ فروش"]),
            text_row(&["جمع", "", "100"]),
            text_row(&["از ابتدای سال مالی تا پایان دوره"]),
            text_row(&["جمع", "", "900"]),
        ];
        assert_eq!(extract_last_total(&sheet_of(rows), 0, 2), Some(100.0));
    }

    #[test]
    fn full_sheet_end_to_end() {
        // group at (2,1), sales header at (4,2), one total row, boundary after
        let rows = vec![
            text_row(&["شرکت نمونه"]),
            text_row(&[]),
            text_row(&["", GROUP_HEADER]),
            text_row(&["نام محصول", "واحد"]),
            text_row(&["", "تعداد", "مبلغ فروش"]),
            text_row(&["جمع", "", "1,000"]),
            text_row(&["از ابتدای سال مالی"]),
            text_row(&["جمع", "", "9,999"]),
        ];
        let workbook = Workbook {
            sheets: vec![sheet_of(rows)],
        };
        let fact = extract_report_fact(
            &workbook,
            "غکورش",
            "گزارش فعالیت ماهانه دوره ۱ ماهه منتهی به 1404/05/31",
            "1404/05/31",
        )
        .expect("one fact");
        assert_eq!(fact.symbol, "غکورش");
        assert_eq!(fact.period, "دوره ۱ ماهه منتهی به 1404/05/31");
        assert_eq!(fact.sales_amount, "۱٬۰۰۰");
    }

    #[test]
    fn first_matching_sheet_short_circuits() {
        let matching = |amount: &str| {
            vec![
                text_row(&[GROUP_HEADER]),
                text_row(&["شرح", "مبلغ فروش"]),
                text_row(&["جمع", amount]),
            ]
        };
        let workbook = Workbook {
            sheets: vec![
                Sheet::new("اول", matching("111")),
                Sheet::new("دوم", matching("222")),
            ],
        };
        let fact = extract_report_fact(
            &workbook,
            "نماد",
            "گزارش فعالیت ماهانه منتهی به 1404/05/31",
            "1404/05/31",
        )
        .expect("fact from first sheet");
        assert_eq!(fact.sales_amount, "۱۱۱");
    }

    #[test]
    fn dateless_title_excludes_the_report() {
        let rows = vec![
            text_row(&[GROUP_HEADER]),
            text_row(&["مبلغ فروش"]),
            text_row(&["جمع", "", ""]),
        ];
        let workbook = Workbook {
            sheets: vec![sheet_of(rows)],
        };
        assert_eq!(
            extract_report_fact(&workbook, "نماد", "گزارش بدون تاریخ", "1404/05/31"),
            None
        );
    }
}
