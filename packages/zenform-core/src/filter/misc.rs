use std::sync::LazyLock;

use regex::Regex;

use super::FilterResult;
use crate::notice::Notice;

/// Stored value of a checked boolean.
pub const BOOLEAN_TRUE: &str = "1";

/// Stored value of an unchecked or absent boolean.
pub const BOOLEAN_FALSE: &str = "0";

/// `YYYY-MM-DD` in the 1900-2099 range; `-`, space, `/` or `.` separate parts.
static DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(19|20)[0-9]{2}[- /.](0[1-9]|1[012])[- /.](0[1-9]|[12][0-9]|3[01])$")
        .expect("valid date regex")
});

/// Checkbox value; only recognised truthy tokens map to true.
pub fn filter_boolean(raw: &str) -> FilterResult {
    let token = raw.trim().to_ascii_lowercase();
    match token.as_str() {
        "1" | "true" | "on" | "yes" => FilterResult::ok(BOOLEAN_TRUE),
        _ => FilterResult::ok(BOOLEAN_FALSE),
    }
}

/// Calendar date. Day-of-month validity is not checked.
pub fn filter_date(raw: &str) -> FilterResult {
    if raw.is_empty() || DATE_REGEX.is_match(raw) {
        FilterResult::ok(raw)
    } else {
        FilterResult::ok(raw).with_error(Notice::WrongDate)
    }
}
