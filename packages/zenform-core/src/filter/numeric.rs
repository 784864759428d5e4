use super::FilterResult;
use crate::notice::Notice;

fn keep_integer_chars(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '+' || *c == '-')
        .collect()
}

fn keep_float_chars(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.'))
        .collect()
}

/// Record key: empty (new record) or a non-negative integer.
///
/// Stray characters are dropped before parsing, so `"4a2"` reads as `42`.
pub fn filter_key(raw: &str) -> FilterResult {
    if raw.is_empty() {
        return FilterResult::ok("");
    }
    match keep_integer_chars(raw).parse::<u64>() {
        Ok(id) => FilterResult::ok(id.to_string()),
        Err(_) => FilterResult::ok(raw).with_error(Notice::WrongKey),
    }
}

/// Signed integer with non-numeric characters removed.
pub fn filter_integer(raw: &str) -> FilterResult {
    let cleaned = keep_integer_chars(raw);
    let mut result = if cleaned.is_empty() {
        FilterResult::ok("")
    } else {
        match cleaned.parse::<i64>() {
            Ok(n) => FilterResult::ok(n.to_string()),
            Err(_) => FilterResult::ok(cleaned.as_str()).with_error(Notice::WrongInt),
        }
    };
    if cleaned.len() != raw.len() {
        result = result.with_warning(Notice::NumberCleared);
    }
    result
}

/// Decimal number with non-numeric characters removed.
pub fn filter_float(raw: &str) -> FilterResult {
    let cleaned = keep_float_chars(raw);
    let mut result = if cleaned.is_empty() {
        FilterResult::ok("")
    } else {
        match cleaned.parse::<f64>() {
            Ok(n) if n.is_finite() => FilterResult::ok(n.to_string()),
            _ => FilterResult::ok(cleaned.as_str()).with_error(Notice::WrongFloat),
        }
    };
    if cleaned.len() != raw.len() {
        result = result.with_warning(Notice::NumberCleared);
    }
    result
}
