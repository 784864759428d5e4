use std::collections::HashMap;

use super::builtin_types::register_builtin_types;
use super::descriptor::TypeDescriptor;
use super::type_tag::TypeTag;
use crate::error::ConfigError;

/// Registry of field type descriptors.
///
/// Populated once at startup and shared read-only afterwards, so lookups
/// take no lock.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    types: HashMap<TypeTag, TypeDescriptor>,
}

impl TypeRegistry {
    /// Creates a new empty type registry.
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// Creates a registry holding every built-in type.
    pub fn builtin() -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        register_builtin_types(&mut registry)?;
        Ok(registry)
    }

    /// Registers a type descriptor.
    ///
    /// # Arguments
    /// * `descriptor` - Descriptor to register
    ///
    /// # Returns
    /// `Ok(())` if successful, `Err(ConfigError)` if the tag is already
    /// registered or the descriptor is incomplete.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> Result<(), ConfigError> {
        descriptor.validate()?;

        if self.types.contains_key(&descriptor.tag) {
            return Err(ConfigError::AlreadyRegistered {
                type_tag: descriptor.tag.to_string(),
            });
        }

        self.types.insert(descriptor.tag, descriptor);
        Ok(())
    }

    /// Replaces the descriptor of an already registered tag.
    pub fn replace(&mut self, descriptor: TypeDescriptor) -> Result<(), ConfigError> {
        descriptor.validate()?;

        match self.types.get_mut(&descriptor.tag) {
            Some(slot) => {
                *slot = descriptor;
                Ok(())
            }
            None => Err(ConfigError::UnknownType {
                type_tag: descriptor.tag.to_string(),
            }),
        }
    }

    /// Retrieves the descriptor of a tag.
    ///
    /// # Returns
    /// `Err(ConfigError::UnknownType)` if the tag was never registered.
    pub fn lookup(&self, tag: TypeTag) -> Result<&TypeDescriptor, ConfigError> {
        self.types.get(&tag).ok_or_else(|| ConfigError::UnknownType {
            type_tag: tag.to_string(),
        })
    }

    /// Parses a tag name and checks that it is registered.
    pub fn resolve(&self, name: &str) -> Result<TypeTag, ConfigError> {
        let tag: TypeTag = name.parse()?;
        self.lookup(tag)?;
        Ok(tag)
    }

    /// Checks if a tag is registered.
    pub fn contains(&self, tag: TypeTag) -> bool {
        self.types.contains_key(&tag)
    }

    /// Upload limit for a tag, `None` when the type carries no limit.
    pub fn max_bytes_for(&self, tag: TypeTag) -> Option<u64> {
        self.types.get(&tag).and_then(|d| d.max_bytes)
    }

    /// Registered descriptors in catalogue order.
    pub fn descriptors(&self) -> Vec<&TypeDescriptor> {
        TypeTag::ALL
            .iter()
            .filter_map(|tag| self.types.get(tag))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
