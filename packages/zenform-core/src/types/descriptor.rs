use serde::Serialize;

use super::type_tag::TypeTag;
use crate::error::ConfigError;

/// How a list-typed field presents its option set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ListKind {
    /// Not a list type
    None,
    DropdownSelect,
    RadioGroup,
}

/// Form control used to edit a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Widget {
    Hidden,
    TextInput { max_length: Option<u32> },
    TextArea { rows: u32, cols: u32 },
    Select,
    RadioGroup,
    Checkbox,
    FileInput,
}

/// Immutable metadata attached to a type tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDescriptor {
    pub tag: TypeTag,
    pub widget: Widget,
    pub list_kind: ListKind,
    /// Accepts a new option label next to the option selection
    pub extendable: bool,
    /// Browsers omit unchecked values of this type
    pub boolean: bool,
    pub file: bool,
    pub image: bool,
    pub max_bytes: Option<u64>,
    /// Target (width, height) for image uploads
    pub resize: Option<(u32, u32)>,
    pub must_resize: Option<bool>,
}

impl TypeDescriptor {
    /// Descriptor for a plain scalar type edited with `widget`.
    pub fn scalar(tag: TypeTag, widget: Widget) -> Self {
        Self {
            tag,
            widget,
            list_kind: ListKind::None,
            extendable: false,
            boolean: false,
            file: false,
            image: false,
            max_bytes: None,
            resize: None,
            must_resize: None,
        }
    }

    /// Descriptor for a type bound to an option set.
    pub fn list(tag: TypeTag, list_kind: ListKind, extendable: bool) -> Self {
        let widget = match list_kind {
            ListKind::RadioGroup => Widget::RadioGroup,
            _ => Widget::Select,
        };
        Self {
            list_kind,
            extendable,
            ..Self::scalar(tag, widget)
        }
    }

    /// Descriptor for a generic file upload.
    pub fn file(tag: TypeTag, max_bytes: u64) -> Self {
        Self {
            file: true,
            max_bytes: Some(max_bytes),
            ..Self::scalar(tag, Widget::FileInput)
        }
    }

    /// Descriptor for an image upload with resize settings.
    pub fn image(tag: TypeTag, max_bytes: u64, width: u32, height: u32) -> Self {
        Self {
            image: true,
            resize: Some((width, height)),
            must_resize: Some(true),
            ..Self::file(tag, max_bytes)
        }
    }

    pub fn is_list_type(&self) -> bool {
        self.list_kind != ListKind::None
    }

    pub fn is_extendable(&self) -> bool {
        self.extendable
    }

    pub fn is_file_type(&self) -> bool {
        self.file
    }

    pub fn is_image_type(&self) -> bool {
        self.image
    }

    pub fn has_boolean_semantics(&self) -> bool {
        self.boolean
    }

    pub fn max_bytes(&self) -> Option<u64> {
        self.max_bytes
    }

    pub fn resize_dimensions(&self) -> Option<(u32, u32)> {
        self.resize
    }

    /// Checks the invariants a descriptor must satisfy before registration.
    ///
    /// Image types must carry size limit, dimensions and resize flag;
    /// file types must carry a size limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let missing = |property: &'static str| ConfigError::MissingImageMetadata {
            type_tag: self.tag.to_string(),
            property,
        };

        if self.image {
            if self.max_bytes.is_none() {
                return Err(missing("max_bytes"));
            }
            if self.resize.is_none() {
                return Err(missing("resize_dimensions"));
            }
            if self.must_resize.is_none() {
                return Err(missing("must_resize"));
            }
        }
        if self.file && self.max_bytes.is_none() {
            return Err(missing("max_bytes"));
        }
        Ok(())
    }
}
