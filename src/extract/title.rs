//! Report-title parsing: period-end dates, period labels, and the title
//! substrings that classify a filing.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extract::text::{contains_loose, normalize_digits};

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{4}/\d{2}/\d{2}").expect("date pattern is valid"));

/// The first `YYYY/MM/DD` substring of the title, in the digit system the
/// title used. Matching happens on the digit-normalized title; the returned
/// slice is taken from the original so Eastern digits survive untouched.
pub fn title_date(title: &str) -> Option<String> {
    let ascii = normalize_digits(title);
    let m = DATE_RE.find(&ascii)?;
    // normalize_digits is one char per char, so char offsets line up
    let start = ascii[..m.start()].chars().count();
    let len = m.as_str().chars().count();
    Some(title.chars().skip(start).take(len).collect())
}

/// Period label for a monthly report, derived from its title. A title
/// without a date cannot yield an attributable fact and maps to `None`.
pub fn period_label(title: &str) -> Option<String> {
    title_date(title).map(|d| format!("دوره ۱ ماهه منتهی به {}", normalize_digits(&d)))
}

pub fn is_monthly_activity(title: &str) -> bool {
    contains_loose(title, "گزارش فعالیت ماهانه")
}

pub fn is_financial_statements(title: &str) -> bool {
    contains_loose(title, "صورت‌های مالی")
}

pub fn is_annual(title: &str) -> bool {
    contains_loose(title, "سال مالی منتهی")
}

pub fn is_interim(title: &str) -> bool {
    contains_loose(title, "میاندوره‌ای")
}

const MONTHS_FA: [&str; 12] = [
    "فروردین",
    "اردیبهشت",
    "خرداد",
    "تیر",
    "مرداد",
    "شهریور",
    "مهر",
    "آبان",
    "آذر",
    "دی",
    "بهمن",
    "اسفند",
];

/// `"1404/05/31"` → `"مرداد 1404"`. Anything that does not split into a
/// year and a month 1..=12 passes through unchanged.
pub fn format_month_fa(date: &str) -> String {
    let ascii = normalize_digits(date);
    let mut parts = ascii.split('/');
    let (Some(year), Some(month)) = (parts.next(), parts.next()) else {
        return date.to_string();
    };
    match month.parse::<usize>() {
        Ok(m) if (1..=12).contains(&m) => format!("{} {}", MONTHS_FA[m - 1], year),
        _ => date.to_string(),
    }
}

/// A cell that is exactly a `YYYY/MM/DD` date, in either digit system.
pub fn is_date_cell(s: &str) -> bool {
    DATE_RE.is_match(&normalize_digits(s)) && normalize_digits(s).len() == 10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_survives_in_original_digits() {
        assert_eq!(
            title_date("گزارش فعالیت ماهانه دوره ۱ ماهه منتهی به ۱۴۰۴/۰۵/۳۱").as_deref(),
            Some("۱۴۰۴/۰۵/۳۱")
        );
        assert_eq!(
            title_date("صورت‌های مالی سال مالی منتهی به 1403/12/29").as_deref(),
            Some("1403/12/29")
        );
    }

    #[test]
    fn titles_without_dates_yield_none() {
        assert_eq!(title_date("آگهی دعوت به مجمع عمومی عادی"), None);
        assert_eq!(period_label("آگهی دعوت به مجمع عمومی عادی"), None);
    }

    #[test]
    fn period_label_is_ascii_dated() {
        assert_eq!(
            period_label("گزارش فعالیت ماهانه منتهی به ۱۴۰۴/۰۵/۳۱").as_deref(),
            Some("دوره ۱ ماهه منتهی به 1404/05/31")
        );
    }

    #[test]
    fn classification_by_title_substring() {
        assert!(is_monthly_activity("گزارش فعالیت ماهانه دوره ۱ ماهه"));
        assert!(is_financial_statements("صورت‌های مالی سال مالی منتهی به 1403/12/29"));
        // joiner-free spelling still classifies
        assert!(is_financial_statements("صورت های مالی میاندوره‌ای"));
        assert!(is_annual("صورت‌های مالی سال مالی منتهی به 1403/12/29"));
        assert!(is_interim("صورت‌های مالی میاندوره‌ای ۶ ماهه"));
        assert!(!is_annual("صورت‌های مالی میاندوره‌ای ۶ ماهه"));
    }

    #[test]
    fn month_names_render() {
        assert_eq!(format_month_fa("1404/05/31"), "مرداد 1404");
        assert_eq!(format_month_fa("۱۴۰۴/۱۲/۲۹"), "اسفند 1404");
        assert_eq!(format_month_fa("not a date"), "not a date");
    }

    #[test]
    fn date_cells_detected_in_both_digit_systems() {
        assert!(is_date_cell("1404/05/31"));
        assert!(is_date_cell("۱۴۰۴/۰۵/۳۱"));
        assert!(!is_date_cell("مرداد 1404"));
        assert!(!is_date_cell("1404/05/31 09:30"));
    }
}
