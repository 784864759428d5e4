use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ConfigError;

/// Discriminator selecting a field's filter and widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    /// Numeric record identifier; exactly one per table
    Key,
    /// Short single-line text, up to 299 bytes
    ShortText,
    /// Text of arbitrary length
    LongText,
    Integer,
    Float,
    /// Dropdown bound to an option set
    SingleSelect,
    /// Radio group bound to an option set
    RadioSelect,
    /// Dropdown whose option set can be grown from the form
    ExtendableSelect,
    Date,
    Boolean,
    ImageFile,
    IconFile,
    GenericFile,
}

impl TypeTag {
    /// Every tag, in catalogue order.
    pub const ALL: [TypeTag; 13] = [
        TypeTag::Key,
        TypeTag::ShortText,
        TypeTag::LongText,
        TypeTag::Integer,
        TypeTag::Float,
        TypeTag::SingleSelect,
        TypeTag::RadioSelect,
        TypeTag::ExtendableSelect,
        TypeTag::Date,
        TypeTag::Boolean,
        TypeTag::ImageFile,
        TypeTag::IconFile,
        TypeTag::GenericFile,
    ];

    /// Canonical name used in schema files.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Key => "key",
            TypeTag::ShortText => "short_text",
            TypeTag::LongText => "long_text",
            TypeTag::Integer => "integer",
            TypeTag::Float => "float",
            TypeTag::SingleSelect => "single_select",
            TypeTag::RadioSelect => "radio_select",
            TypeTag::ExtendableSelect => "extendable_select",
            TypeTag::Date => "date",
            TypeTag::Boolean => "boolean",
            TypeTag::ImageFile => "image_file",
            TypeTag::IconFile => "icon_file",
            TypeTag::GenericFile => "generic_file",
        }
    }

    /// Short legacy tag accepted as an alias in schema files.
    pub fn legacy_tag(&self) -> &'static str {
        match self {
            TypeTag::Key => "_KEYS",
            TypeTag::ShortText => "_WORD",
            TypeTag::LongText => "_TEXT",
            TypeTag::Integer => "_RINT",
            TypeTag::Float => "_RFLT",
            TypeTag::SingleSelect => "_LLST",
            TypeTag::RadioSelect => "_RLST",
            TypeTag::ExtendableSelect => "_ELST",
            TypeTag::Date => "_DATE",
            TypeTag::Boolean => "_BOOL",
            TypeTag::ImageFile => "_IMGS",
            TypeTag::IconFile => "_ICON",
            TypeTag::GenericFile => "_FILE",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s || tag.legacy_tag() == s)
            .ok_or_else(|| ConfigError::UnknownType {
                type_tag: s.to_string(),
            })
    }
}
