//! Table schema.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::ConfigError;

use super::field::Field;

/// Table schema: a name and its fields in declaration order.
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    /// Table name
    pub name: String,
    /// Field definitions in declaration order
    fields: Vec<Field>,
    /// Position of the key field within `fields`
    key_index: usize,
}

impl Table {
    /// Creates a table from its field definitions.
    ///
    /// # Arguments
    /// * `name` - Table name
    /// * `fields` - Field definitions, in display order
    ///
    /// # Returns
    /// `Err(ConfigError)` if field names repeat or the table does not have
    /// exactly one key field.
    pub fn create(name: impl Into<String>, fields: Vec<Field>) -> Result<Self, ConfigError> {
        let name = name.into();

        let mut seen_names = HashSet::new();
        for field in &fields {
            if !seen_names.insert(field.name.as_str()) {
                return Err(ConfigError::DuplicateFieldName {
                    table: name.clone(),
                    field: field.name.clone(),
                });
            }
        }

        let mut key_index = None;
        for (index, field) in fields.iter().enumerate() {
            if !field.is_key() {
                continue;
            }
            if key_index.is_some() {
                return Err(ConfigError::DuplicateKey {
                    table: name.clone(),
                    field: field.name.clone(),
                });
            }
            key_index = Some(index);
        }
        let key_index = key_index.ok_or_else(|| ConfigError::NoKeyField {
            table: name.clone(),
        })?;

        Ok(Self {
            name,
            fields,
            key_index,
        })
    }

    /// The key field.
    pub fn key(&self) -> &Field {
        &self.fields[self.key_index]
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Fields bound to an option set.
    pub fn list_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.descriptor.is_list_type())
    }

    /// Fields holding uploaded files.
    pub fn file_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.descriptor.is_file_type())
    }
}
