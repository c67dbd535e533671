//! Display formatting for the metrics summary and the recent-window table.
//!
//! All four numeric rules share one availability guard ([`is_unavailable`])
//! and one coercion step ([`coerce`]); either failing yields [`NOT_AVAILABLE`].

use crate::domain::InfoValue;

/// Placeholder shown for any missing or unusable value.
pub const NOT_AVAILABLE: &str = "N/A";

/// True for absent values, the provider's "N/A" sentinel, and NaN.
pub fn is_unavailable(value: &InfoValue) -> bool {
    match value {
        InfoValue::Missing => true,
        InfoValue::Text(s) => s == NOT_AVAILABLE,
        InfoValue::Number(n) => n.is_nan(),
    }
}

/// Numeric view of a value that passed the guard.
///
/// Text is parsed after trimming; anything that does not parse to a finite
/// number (including "nan" and "inf" spellings) is rejected.
pub fn coerce(value: &InfoValue) -> Option<f64> {
    if is_unavailable(value) {
        return None;
    }
    let n = match value {
        InfoValue::Number(n) => *n,
        InfoValue::Text(s) => s.trim().parse::<f64>().ok()?,
        InfoValue::Missing => return None,
    };
    n.is_finite().then_some(n)
}

/// `$1,234.57`
pub fn format_currency(value: &InfoValue) -> String {
    match coerce(value) {
        Some(n) => format!("${}", group_decimal(n, 2)),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Market caps and volumes: `$2.95T`, `$1.50B`, `$12.30M`, `$4.56K`, `$999`.
pub fn format_large_number(value: &InfoValue) -> String {
    let Some(n) = coerce(value) else {
        return NOT_AVAILABLE.to_string();
    };
    if n >= 1e12 {
        format!("${:.2}T", n / 1e12)
    } else if n >= 1e9 {
        format!("${:.2}B", n / 1e9)
    } else if n >= 1e6 {
        format!("${:.2}M", n / 1e6)
    } else if n >= 1e3 {
        format!("${:.2}K", n / 1e3)
    } else {
        format!("${}", group_decimal(n, 0))
    }
}

/// The input is a fraction: `0.0123` renders as `1.23%`.
pub fn format_percentage(value: &InfoValue) -> String {
    match coerce(value) {
        Some(n) => format!("{:.2}%", n * 100.0),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// P/E, beta: plain two decimals.
pub fn format_ratio(value: &InfoValue) -> String {
    match coerce(value) {
        Some(n) => format!("{n:.2}"),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Format an integer with comma thousands separators.
pub fn group_thousands(n: u64) -> String {
    group_digits(&n.to_string())
}

/// Insert a comma every three digits from the right of an ASCII digit run.
fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Fixed-point rendering with a grouped integer part; the sign stays in front.
fn group_decimal(n: f64, decimals: usize) -> String {
    let fixed = format!("{n:.decimals$}");
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };
    let grouped = group_digits(int_part);
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}
