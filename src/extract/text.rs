//! Persian text and digit normalization.
//!
//! Codal sheets mix Persian (U+06F0..U+06F9) and Arabic (U+0660..U+0669)
//! digit blocks with ASCII, and labels are typed inconsistently with Arabic
//! yeh/kaf variants and zero-width joiners. Everything that compares cell
//! text goes through one of the two normal forms below.

/// Map every Eastern Arabic-Indic digit to its ASCII equivalent.
/// All other characters pass through unchanged.
pub fn normalize_digits(s: &str) -> String {
    s.chars().map(ascii_digit).collect()
}

fn ascii_digit(c: char) -> char {
    match c {
        // Persian block: ۰..۹
        '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
        // Arabic block: ٠..٩
        '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
        _ => c,
    }
}

/// Render ASCII digits in the Persian digit block; everything else unchanged.
pub fn eastern_digits(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '0'..='9' => char::from_u32(0x06F0 + (c as u32 - '0' as u32)).unwrap_or(c),
            _ => c,
        })
        .collect()
}

fn unify_letter(c: char) -> char {
    match c {
        '\u{064A}' => '\u{06CC}', // Arabic yeh → Persian yeh
        '\u{0643}' => '\u{06A9}', // Arabic kaf → Persian kaf
        _ => c,
    }
}

fn is_joiner(c: char) -> bool {
    c == '\u{200C}' || c == '\u{200D}'
}

/// Loose normal form: joiner marks become spaces, whitespace runs collapse
/// to a single space, the result is trimmed. Used for `contains` checks.
pub fn normalize_loose(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        let ch = unify_letter(ch);
        if is_joiner(ch) || ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// Tight normal form: joiner marks and all whitespace removed. Used for
/// exact label equality, e.g. a cell that is exactly the word "جمع".
pub fn normalize_tight(s: &str) -> String {
    s.chars()
        .map(unify_letter)
        .filter(|c| !is_joiner(*c) && !c.is_whitespace())
        .collect()
}

/// `haystack` contains `needle`, with both sides in the loose normal form.
pub fn contains_loose(haystack: &str, needle: &str) -> bool {
    normalize_loose(haystack).contains(&normalize_loose(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_map_to_fixed_ascii() {
        assert_eq!(normalize_digits("۰۱۲۳۴۵۶۷۸۹"), "0123456789");
        assert_eq!(normalize_digits("٠١٢٣٤٥٦٧٨٩"), "0123456789");
    }

    #[test]
    fn digits_identity_elsewhere() {
        let s = "abc جمع 123 /-.";
        assert_eq!(normalize_digits(s), s);
        assert_eq!(normalize_digits(""), "");
    }

    #[test]
    fn eastern_round_trips_ascii() {
        assert_eq!(eastern_digits("1404/05/31"), "۱۴۰۴/۰۵/۳۱");
        assert_eq!(normalize_digits(&eastern_digits("1,000")), "1,000");
    }

    #[test]
    fn loose_unifies_arabic_letters() {
        assert_eq!(normalize_loose("علي"), "علی");
        assert_eq!(normalize_loose("كل"), "کل");
    }

    #[test]
    fn loose_collapses_whitespace_and_joiners() {
        assert_eq!(normalize_loose("صورت‌های  مالی "), "صورت های مالی");
        assert_eq!(normalize_loose("  جمع\t\nکل"), "جمع کل");
    }

    #[test]
    fn tight_strips_all_whitespace() {
        assert_eq!(normalize_tight(" جمع "), "جمع");
        assert_eq!(normalize_tight("جمع‌ کل"), "جمعکل");
    }

    #[test]
    fn both_forms_are_idempotent() {
        for s in ["صورت‌های مالی", "  جمع  كل ", "علي\u{200D}", "۱۲۳ abc"] {
            let loose = normalize_loose(s);
            assert_eq!(normalize_loose(&loose), loose);
            let tight = normalize_tight(s);
            assert_eq!(normalize_tight(&tight), tight);
        }
    }

    #[test]
    fn contains_loose_ignores_joiner_differences() {
        assert!(contains_loose(
            "گزارش فعالیت ماهانه دوره ۱ ماهه",
            "فعالیت ماهانه"
        ));
        assert!(contains_loose("صورت های مالی سالانه", "صورت‌های مالی"));
    }
}
