//! Per-type input filters.
//!
//! Every filter is a pure function from a trimmed raw value to a
//! [`FilterResult`]. Filters never fail: problems come back as notices.

mod misc;
mod numeric;
mod text;

pub use misc::{filter_boolean, filter_date, BOOLEAN_FALSE, BOOLEAN_TRUE};
pub use numeric::{filter_float, filter_integer, filter_key};
pub use text::{filter_long_text, filter_option_label, filter_short_text, strip_tags, truncate_utf8};

use serde::Serialize;

use crate::notice::Notice;
use crate::types::TypeTag;

/// Sanitized value plus the notices raised while producing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterResult {
    pub value: String,
    pub errors: Vec<Notice>,
    pub warnings: Vec<Notice>,
}

impl FilterResult {
    /// Result carrying a value and no notices.
    pub fn ok(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn with_error(mut self, notice: Notice) -> Self {
        self.errors.push(notice);
        self
    }

    pub fn with_warning(mut self, notice: Notice) -> Self {
        self.warnings.push(notice);
        self
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Applies the filter registered for `tag` to `raw`.
///
/// # Arguments
/// * `tag` - Type tag of the field
/// * `raw` - Submitted value, already trimmed
///
/// # Returns
/// The sanitized value with any errors and warnings.
pub fn filter(tag: TypeTag, raw: &str) -> FilterResult {
    match tag {
        TypeTag::Key | TypeTag::SingleSelect | TypeTag::RadioSelect => filter_key(raw),
        TypeTag::ShortText => filter_short_text(raw),
        TypeTag::LongText => filter_long_text(raw),
        TypeTag::Integer => filter_integer(raw),
        TypeTag::Float => filter_float(raw),
        TypeTag::ExtendableSelect => filter_option_label(raw),
        TypeTag::Date => filter_date(raw),
        TypeTag::Boolean => filter_boolean(raw),
        TypeTag::ImageFile | TypeTag::IconFile | TypeTag::GenericFile => FilterResult::ok(raw),
    }
}

/// Characters removed from both ends of every submitted value.
const TRIM_CHARS: [char; 6] = [' ', '\t', '\n', '\r', '\0', '\x0B'];

/// Trims whitespace and NUL bytes from both ends of a value.
pub fn trim_value(raw: &str) -> &str {
    raw.trim_matches(|c| TRIM_CHARS.contains(&c))
}
