use super::descriptor::{ListKind, TypeDescriptor, Widget};
use super::type_registry::TypeRegistry;
use super::type_tag::TypeTag;
use crate::error::ConfigError;

/// Byte limit of short text values.
pub const SHORT_TEXT_MAX_BYTES: usize = 299;

/// Byte limit of new option labels typed into an extendable select.
pub const OPTION_LABEL_MAX_BYTES: usize = 60;

/// Size above which long text raises a warning.
pub const LONG_TEXT_WARN_BYTES: usize = 65535;

/// Default upload limit for images and generic files.
pub const DEFAULT_FILE_MAX_BYTES: u64 = 1_000_000;

/// Default upload limit for icons.
pub const DEFAULT_ICON_MAX_BYTES: u64 = 300_000;

/// Registers the built-in field types.
///
/// # Arguments
/// * `registry` - Registry to populate
///
/// # Returns
/// `Ok(())` if all types registered, `Err(ConfigError)` if one was already present.
pub fn register_builtin_types(registry: &mut TypeRegistry) -> Result<(), ConfigError> {
    registry.register(TypeDescriptor::scalar(TypeTag::Key, Widget::Hidden))?;
    registry.register(TypeDescriptor::scalar(
        TypeTag::ShortText,
        Widget::TextInput {
            max_length: Some(SHORT_TEXT_MAX_BYTES as u32),
        },
    ))?;
    registry.register(TypeDescriptor::scalar(
        TypeTag::LongText,
        Widget::TextArea { rows: 5, cols: 40 },
    ))?;
    registry.register(TypeDescriptor::scalar(
        TypeTag::Integer,
        Widget::TextInput { max_length: None },
    ))?;
    registry.register(TypeDescriptor::scalar(
        TypeTag::Float,
        Widget::TextInput { max_length: None },
    ))?;

    // List types
    registry.register(TypeDescriptor::list(
        TypeTag::SingleSelect,
        ListKind::DropdownSelect,
        false,
    ))?;
    registry.register(TypeDescriptor::list(
        TypeTag::RadioSelect,
        ListKind::RadioGroup,
        false,
    ))?;
    registry.register(TypeDescriptor::list(
        TypeTag::ExtendableSelect,
        ListKind::DropdownSelect,
        true,
    ))?;

    registry.register(TypeDescriptor::scalar(
        TypeTag::Date,
        Widget::TextInput {
            max_length: Some(10),
        },
    ))?;
    registry.register(TypeDescriptor {
        boolean: true,
        ..TypeDescriptor::scalar(TypeTag::Boolean, Widget::Checkbox)
    })?;

    // File types
    registry.register(TypeDescriptor::image(
        TypeTag::ImageFile,
        DEFAULT_FILE_MAX_BYTES,
        800,
        600,
    ))?;
    registry.register(TypeDescriptor::image(
        TypeTag::IconFile,
        DEFAULT_ICON_MAX_BYTES,
        50,
        50,
    ))?;
    registry.register(TypeDescriptor::file(
        TypeTag::GenericFile,
        DEFAULT_FILE_MAX_BYTES,
    ))?;

    Ok(())
}
