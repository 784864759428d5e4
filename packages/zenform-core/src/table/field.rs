//! Field definition within a table.

use serde::Serialize;

use crate::error::ConfigError;
use crate::types::{TypeDescriptor, TypeRegistry, TypeTag};

/// Suffix of the companion parameter carrying a new option label or a
/// file deletion flag.
pub const NEW_VALUE_SUFFIX: &str = "_nv";

/// Field definition within a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    /// Field name, also the request parameter name
    pub name: String,
    /// Type tag
    pub tag: TypeTag,
    /// Human-readable label used in views and reports
    pub label: String,
    /// Descriptor of `tag`, cached from the registry
    #[serde(skip)]
    pub descriptor: TypeDescriptor,
}

impl Field {
    /// Creates a field whose tag must be known to `registry`.
    ///
    /// # Arguments
    /// * `name` - Field name
    /// * `tag` - Type tag
    /// * `label` - Display label
    /// * `registry` - Registry resolving the tag
    ///
    /// # Returns
    /// `Err(ConfigError::UnknownType)` if the registry lacks the tag.
    pub fn new(
        name: impl Into<String>,
        tag: TypeTag,
        label: impl Into<String>,
        registry: &TypeRegistry,
    ) -> Result<Self, ConfigError> {
        let descriptor = registry.lookup(tag)?.clone();
        Ok(Self {
            name: name.into(),
            tag,
            label: label.into(),
            descriptor,
        })
    }

    pub fn is_key(&self) -> bool {
        self.tag == TypeTag::Key
    }

    /// Name of the `<field>_nv` companion parameter.
    pub fn companion_name(&self) -> String {
        format!("{}{}", self.name, NEW_VALUE_SUFFIX)
    }
}
