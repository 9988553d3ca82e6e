//! Text → scalar conversions with browser semantics.
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static DECIMAL_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$").expect("static regex"));

/// Naive layouts, read as UTC.
const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

fn is_js_whitespace(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// JavaScript `Number(text)`; `None` where that would be `NaN`.
///
/// Whitespace-only text is `0`, `0x`/`0o`/`0b` literals are accepted
/// unsigned, and `Infinity` may carry a sign.
pub fn parse_js_number(text: &str) -> Option<f64> {
    let s = text.trim_matches(is_js_whitespace);
    if s.is_empty() {
        return Some(0.0);
    }
    match s {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    if let Some(radix) = radix_prefix(s) {
        return parse_radix(&s[2..], radix);
    }
    if !DECIMAL_LITERAL.is_match(s) {
        return None;
    }
    s.parse::<f64>().ok()
}

fn radix_prefix(s: &str) -> Option<u32> {
    match s.get(..2)? {
        "0x" | "0X" => Some(16),
        "0o" | "0O" => Some(8),
        "0b" | "0B" => Some(2),
        _ => None,
    }
}

fn parse_radix(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * radix as f64 + d as f64)
    })
}

/// Parse a submitted date or date-time.
///
/// Accepts RFC 3339, RFC 2822, naive `YYYY-MM-DD[T ]HH:MM[:SS[.fff]]`
/// (taken as UTC) and bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let s = text.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = DateTime::parse_from_rfc3339(s) {
        return Some(d.with_timezone(&Utc));
    }
    if let Ok(d) = DateTime::parse_from_rfc2822(s) {
        return Some(d.with_timezone(&Utc));
    }
    for fmt in NAIVE_DATE_TIME_FORMATS {
        if let Ok(d) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(d.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn decimal_numbers() {
        assert_eq!(parse_js_number("30"), Some(30.0));
        assert_eq!(parse_js_number(" -2.5 "), Some(-2.5));
        assert_eq!(parse_js_number("1e3"), Some(1000.0));
        assert_eq!(parse_js_number(".5"), Some(0.5));
        assert_eq!(parse_js_number("5."), Some(5.0));
        assert_eq!(parse_js_number("+7"), Some(7.0));
    }

    #[test]
    fn js_specific_forms() {
        assert_eq!(parse_js_number("   "), Some(0.0));
        assert_eq!(parse_js_number("0x1F"), Some(31.0));
        assert_eq!(parse_js_number("0b101"), Some(5.0));
        assert_eq!(parse_js_number("0o17"), Some(15.0));
        assert_eq!(parse_js_number("-Infinity"), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn not_a_number() {
        for s in ["abc", "12abc", "inf", "NaN", "1,5", "0x", "0xZZ", "-0x10", "1e", "--1"] {
            assert_eq!(parse_js_number(s), None, "{s}");
        }
    }

    #[test]
    fn dates() {
        let midnight = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_date("2023-01-01T00:00:00.000Z"), Some(midnight));
        assert_eq!(parse_date("2023-01-01T02:00:00+02:00"), Some(midnight));
        assert_eq!(parse_date("2023-01-01"), Some(midnight));
        assert_eq!(parse_date("2023-01-01T00:00"), Some(midnight));
        assert_eq!(parse_date("2023-01-01 00:00:00"), Some(midnight));
        assert_eq!(parse_date("Sun, 01 Jan 2023 00:00:00 +0000"), Some(midnight));
    }

    #[test]
    fn invalid_dates() {
        for s in ["", "not a date", "2023-13-01", "2023-02-30"] {
            assert_eq!(parse_date(s), None, "{s}");
        }
    }
}
