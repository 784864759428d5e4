//! Engine configuration.
//!
//! Tables, per-table options and type overrides are read from a JSON schema
//! file and turned into a [`Schema`] once at startup. Any defect found here
//! is a [`ConfigError`] and the caller must refuse to start.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::table::{Field, Table};
use crate::types::TypeRegistry;

/// Schema file format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Schema version
    #[serde(default = "default_version")]
    pub version: u32,
    /// Table definitions, in menu order
    pub tables: Vec<TableSchema>,
    /// Overrides of built-in type limits, keyed by type tag
    #[serde(default)]
    pub types: IndexMap<String, TypeOverride>,
}

fn default_version() -> u32 {
    1
}

/// Table definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name
    pub name: String,
    /// Field definitions
    pub fields: Vec<FieldSchema>,
    /// Presentation and validation options
    #[serde(default)]
    pub options: TableOptions,
}

/// Field definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Field name
    pub name: String,
    /// Type tag, canonical (`short_text`) or legacy (`_WORD`)
    pub r#type: String,
    /// Display label; defaults to the field name
    #[serde(default)]
    pub label: Option<String>,
    /// Initial option labels for list types
    #[serde(default)]
    pub options: Vec<String>,
}

/// Limits replacing those of a built-in type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeOverride {
    pub max_bytes: Option<u64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub must_resize: Option<bool>,
}

/// Per-table options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    /// Fields the form may not change; listing the key makes the table read-only
    pub restricted_fields: Vec<String>,
    /// Restricted fields whose default is still submitted and stored
    pub write_through_fields: Vec<String>,
    pub not_null_fields: Vec<String>,
    pub unique_fields: Vec<String>,
    /// Values prefilled into new-record forms
    pub form_defaults: IndexMap<String, String>,
    pub form_hidden_fields: Vec<String>,
    pub list_hidden_fields: Vec<String>,
    pub find_hidden_fields: Vec<String>,
    pub records_per_page: usize,
    pub order_by: Option<String>,
    pub reverse_order: bool,
    pub list_show_keys: bool,
    pub form_show_keys: bool,
    pub list_viewable: bool,
    pub list_deletable: bool,
    pub list_searchable: bool,
    pub no_pages: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            restricted_fields: Vec::new(),
            write_through_fields: Vec::new(),
            not_null_fields: Vec::new(),
            unique_fields: Vec::new(),
            form_defaults: IndexMap::new(),
            form_hidden_fields: Vec::new(),
            list_hidden_fields: Vec::new(),
            find_hidden_fields: Vec::new(),
            records_per_page: 50,
            order_by: None,
            reverse_order: false,
            list_show_keys: true,
            form_show_keys: true,
            list_viewable: true,
            list_deletable: true,
            list_searchable: true,
            no_pages: false,
        }
    }
}

impl TableOptions {
    /// Whether the form may change `field`.
    pub fn is_editable(&self, field: &str) -> bool {
        !self.restricted_fields.iter().any(|f| f == field)
    }

    pub fn is_write_through(&self, field: &str) -> bool {
        self.write_through_fields.iter().any(|f| f == field)
    }

    /// Checks that every field named by an option exists in `table`.
    pub fn validate(&self, table: &Table) -> Result<(), ConfigError> {
        let lists: [(&'static str, &Vec<String>); 7] = [
            ("restricted_fields", &self.restricted_fields),
            ("write_through_fields", &self.write_through_fields),
            ("not_null_fields", &self.not_null_fields),
            ("unique_fields", &self.unique_fields),
            ("form_hidden_fields", &self.form_hidden_fields),
            ("list_hidden_fields", &self.list_hidden_fields),
            ("find_hidden_fields", &self.find_hidden_fields),
        ];
        let named = lists
            .iter()
            .flat_map(|(option, fields)| fields.iter().map(move |f| (*option, f)))
            .chain(self.form_defaults.keys().map(|f| ("form_defaults", f)))
            .chain(self.order_by.iter().map(|f| ("order_by", f)));

        for (option, field) in named {
            if !table.has_field(field) {
                return Err(ConfigError::UnknownOptionField {
                    table: table.name.clone(),
                    option,
                    field: field.clone(),
                });
            }
        }
        Ok(())
    }
}

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Largest accepted request body in bytes
    pub max_body_bytes: usize,
    /// Folder receiving image uploads
    pub image_folder: PathBuf,
    /// Folder receiving other uploads
    pub file_folder: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 5000,
            max_body_bytes: 2 * 1024 * 1024,
            image_folder: PathBuf::from("./img"),
            file_folder: PathBuf::from("./dat"),
        }
    }
}

/// A table together with everything configured for it.
#[derive(Debug, Clone)]
pub struct TableDefinition {
    pub table: Table,
    pub options: TableOptions,
    /// Initial option labels per list field
    pub option_sets: IndexMap<String, Vec<String>>,
}

/// Validated registry and tables, ready to hand to the engine.
#[derive(Debug, Clone)]
pub struct Schema {
    pub registry: TypeRegistry,
    pub tables: Vec<TableDefinition>,
}

impl EngineConfig {
    /// Parses a schema from JSON text.
    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(contents)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse schema: {}", e)))?;

        if config.version != 1 {
            return Err(ConfigError::Parse(format!(
                "Unsupported schema version: {}",
                config.version
            )));
        }
        Ok(config)
    }

    /// Reads and parses a schema file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            ConfigError::Parse(format!(
                "Failed to read schema file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&contents)
    }

    /// Builds the type registry and all tables.
    ///
    /// # Returns
    /// `Err(ConfigError)` on unknown type tags, incomplete image metadata,
    /// key or name violations, duplicate tables or options naming unknown fields.
    pub fn build(&self) -> Result<Schema, ConfigError> {
        let mut registry = TypeRegistry::builtin()?;
        for (name, type_override) in &self.types {
            let tag = registry.resolve(name)?;
            let mut descriptor = registry.lookup(tag)?.clone();
            if let Some(max_bytes) = type_override.max_bytes {
                descriptor.max_bytes = Some(max_bytes);
            }
            if let (Some(width), Some(height)) = (type_override.width, type_override.height) {
                descriptor.resize = Some((width, height));
            }
            if let Some(must_resize) = type_override.must_resize {
                descriptor.must_resize = Some(must_resize);
            }
            registry.replace(descriptor)?;
            debug!(type_tag = %tag, "Applied type override");
        }

        let mut tables: Vec<TableDefinition> = Vec::with_capacity(self.tables.len());
        for table_schema in &self.tables {
            if tables.iter().any(|t| t.table.name == table_schema.name) {
                return Err(ConfigError::DuplicateTable(table_schema.name.clone()));
            }

            let mut fields = Vec::with_capacity(table_schema.fields.len());
            let mut option_sets = IndexMap::new();
            for field_schema in &table_schema.fields {
                let tag = registry.resolve(&field_schema.r#type)?;
                let label = field_schema
                    .label
                    .clone()
                    .unwrap_or_else(|| field_schema.name.clone());
                let field = Field::new(field_schema.name.clone(), tag, label, &registry)?;
                if field.descriptor.is_list_type() {
                    option_sets.insert(field.name.clone(), field_schema.options.clone());
                }
                fields.push(field);
            }

            let table = Table::create(table_schema.name.clone(), fields)?;
            table_schema.options.validate(&table)?;
            debug!(table = %table.name, fields = table.fields().len(), "Built table");

            tables.push(TableDefinition {
                table,
                options: table_schema.options.clone(),
                option_sets,
            });
        }

        Ok(Schema { registry, tables })
    }
}
