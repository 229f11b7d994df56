//! Numeric cell parsing and Persian amount formatting.

use crate::extract::text::{eastern_digits, normalize_digits};

/// Parse a monetary cell into a number, tolerating Eastern digits,
/// thousands separators, and accounting-style parentheses for negatives.
///
/// Returns `None` for anything that does not reduce to a finite number —
/// an absent value is a normal outcome here, not an error.
pub fn normalize_number(raw: &str) -> Option<f64> {
    let mut s = normalize_digits(raw);
    // (1234) is a negative in accounting notation
    if s.contains('(') {
        s = s.replace('(', "-").replace(')', "");
    }
    let cleaned: String = s
        .chars()
        .filter(|&c| !matches!(c, ',' | '\u{066C}' | '\u{060C}') && !c.is_whitespace())
        .filter(|&c| c.is_ascii_digit() || c == '.' || c == '-')
        .collect();
    if cleaned.is_empty() || cleaned == "-" || cleaned == "." {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Render an amount the way the output table shows it: rounded to an
/// integer, grouped by thousands with U+066C, digits in the Persian block.
pub fn format_amount_fa(value: f64) -> String {
    let negative = value < 0.0;
    let digits = format!("{}", value.abs().round() as u64);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('\u{066C}');
        }
        grouped.push(ch);
    }
    let fa = eastern_digits(&grouped);
    if negative {
        format!("-{}", fa)
    } else {
        fa
    }
}
