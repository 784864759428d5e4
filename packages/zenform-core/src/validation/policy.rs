use std::collections::HashSet;

use crate::config::TableOptions;

/// Per-table rules applied on top of the type filters.
#[derive(Debug, Clone, Default)]
pub struct ValidationPolicy {
    restricted: HashSet<String>,
    write_through: HashSet<String>,
    not_null: HashSet<String>,
    unique: HashSet<String>,
}

impl ValidationPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restrict(mut self, field: impl Into<String>) -> Self {
        self.restricted.insert(field.into());
        self
    }

    pub fn write_through(mut self, field: impl Into<String>) -> Self {
        self.write_through.insert(field.into());
        self
    }

    pub fn not_null(mut self, field: impl Into<String>) -> Self {
        self.not_null.insert(field.into());
        self
    }

    pub fn unique(mut self, field: impl Into<String>) -> Self {
        self.unique.insert(field.into());
        self
    }

    /// Whether the form may change `field`.
    pub fn is_editable(&self, field: &str) -> bool {
        !self.restricted.contains(field)
    }

    /// Whether a submitted value for `field` is rejected.
    pub fn is_blocked(&self, field: &str) -> bool {
        !self.is_editable(field) && !self.write_through.contains(field)
    }

    pub fn requires_value(&self, field: &str) -> bool {
        self.not_null.contains(field)
    }

    pub fn requires_unique(&self, field: &str) -> bool {
        self.unique.contains(field)
    }
}

impl From<&TableOptions> for ValidationPolicy {
    fn from(options: &TableOptions) -> Self {
        let set = |fields: &Vec<String>| -> HashSet<String> { fields.iter().cloned().collect() };
        Self {
            restricted: set(&options.restricted_fields),
            write_through: set(&options.write_through_fields),
            not_null: set(&options.not_null_fields),
            unique: set(&options.unique_fields),
        }
    }
}
