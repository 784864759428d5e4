//! Engine error types.
//!
//! User input problems are never reported through these types; they end up
//! as [`Notice`](crate::notice::Notice) entries in a validation report.

use thiserror::Error;

/// Configuration defects detected while building the registry and tables.
///
/// Any of these is fatal: the composition root must refuse to start.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Type tag not present in the registry
    #[error("Type '{type_tag}' is not defined in the type registry")]
    UnknownType { type_tag: String },

    /// Image type without the metadata needed to process uploads
    #[error("Image type '{type_tag}' has no '{property}' defined")]
    MissingImageMetadata {
        type_tag: String,
        property: &'static str,
    },

    /// Type registered twice
    #[error("Type '{type_tag}' already registered")]
    AlreadyRegistered { type_tag: String },

    /// Table has no key field
    #[error("No key field defined for table '{table}' (must be exactly one per table)")]
    NoKeyField { table: String },

    /// Table has a second key field
    #[error("Field '{field}' is a duplicate key in table '{table}'")]
    DuplicateKey { table: String, field: String },

    /// Field name used twice in one table
    #[error("Field name '{field}' is already used in table '{table}'")]
    DuplicateFieldName { table: String, field: String },

    /// Table name used twice
    #[error("Table '{0}' already exists")]
    DuplicateTable(String),

    /// Table option references a field the table does not have
    #[error("Option '{option}' of table '{table}' references unknown field '{field}'")]
    UnknownOptionField {
        table: String,
        option: &'static str,
        field: String,
    },

    /// Schema file could not be parsed
    #[error("Schema parse error: {0}")]
    Parse(String),
}

/// Failures reported by the storage and upload collaborators.
#[derive(Error, Debug, Clone)]
pub enum StorageError {
    /// Table not known to the storage backend
    #[error("Table '{table}' not found in storage")]
    TableNotFound { table: String },

    /// Record not found
    #[error("Record {id} not found in table '{table}'")]
    RecordNotFound { table: String, id: u64 },

    /// Update attempted without a key value
    #[error("No key '{key}' supplied for update of table '{table}'")]
    NoKeySupplied { table: String, key: String },

    /// Field is not a list type, so it has no option set
    #[error("Field '{field}' of table '{table}' has no option set")]
    NoOptionSet { table: String, field: String },

    /// I/O error while handling uploaded files
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

/// Errors surfacing at the request boundary.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Request names a table the engine does not serve
    #[error("Table '{0}' not found")]
    TableNotFound(String),

    /// Collaborator failure, propagated without retry
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration defect
    #[error(transparent)]
    Config(#[from] ConfigError),
}
