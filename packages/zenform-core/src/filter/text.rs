use std::sync::LazyLock;

use regex::Regex;

use super::FilterResult;
use crate::notice::Notice;
use crate::types::{LONG_TEXT_WARN_BYTES, OPTION_LABEL_MAX_BYTES, SHORT_TEXT_MAX_BYTES};

/// Opening, closing and unterminated tags, comments and declarations.
static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z!?][^>]*(>|$)").expect("valid tag regex"));

/// Removes markup tags from `value`.
pub fn strip_tags(value: &str) -> String {
    TAG_REGEX.replace_all(value, "").into_owned()
}

/// Truncates `value` to at most `max_bytes` UTF-8 bytes.
///
/// Only whole code points are kept, so the result is always valid UTF-8 and
/// may be a few bytes shorter than the limit. Returns whether anything was cut.
pub fn truncate_utf8(value: &str, max_bytes: usize) -> (&str, bool) {
    if value.len() <= max_bytes {
        return (value, false);
    }
    let mut end = 0;
    for (idx, ch) in value.char_indices() {
        let next = idx + ch.len_utf8();
        if next > max_bytes {
            break;
        }
        end = next;
    }
    (&value[..end], true)
}

fn filter_bounded(raw: &str, max_bytes: usize) -> FilterResult {
    let (kept, truncated) = truncate_utf8(raw, max_bytes);
    let result = FilterResult::ok(strip_tags(kept));
    if truncated {
        result.with_warning(Notice::StringTooLong)
    } else {
        result
    }
}

/// Short text: 299 bytes at most, markup removed.
pub fn filter_short_text(raw: &str) -> FilterResult {
    filter_bounded(raw, SHORT_TEXT_MAX_BYTES)
}

/// New option label of an extendable select: 60 bytes at most, markup removed.
pub fn filter_option_label(raw: &str) -> FilterResult {
    filter_bounded(raw, OPTION_LABEL_MAX_BYTES)
}

/// Long text is kept whole; oversize values only raise a warning.
pub fn filter_long_text(raw: &str) -> FilterResult {
    let result = FilterResult::ok(raw);
    if raw.len() > LONG_TEXT_WARN_BYTES {
        result.with_warning(Notice::TextTooLong)
    } else {
        result
    }
}
