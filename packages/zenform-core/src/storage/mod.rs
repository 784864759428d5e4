//! Storage and upload collaborator contracts.
//!
//! The engine never talks to a database or the file system directly; it goes
//! through [`Storage`] for records and option sets and through
//! [`UploadStore`] for uploaded files.

mod files;
mod memory;

pub use files::DiskUploadStore;
pub use memory::MemoryStorage;

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::StorageError;
use crate::request::UploadedFile;
use crate::table::{Field, Table};

/// Field values of one record keyed by field name.
pub type Record = IndexMap<String, String>;

/// Option set of a list field: option id to label.
pub type OptionSet = IndexMap<u64, String>;

/// Prefix filter on one field.
///
/// List-type fields match on the option label, not the stored id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FindFilter {
    pub field: String,
    pub prefix: String,
}

/// Parameters of a list request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    /// Maximum number of rows; `None` returns all
    pub limit: Option<usize>,
    pub offset: usize,
    /// Field to order by; the key when `None`
    pub order_field: Option<String>,
    pub reverse: bool,
    pub filters: Vec<FindFilter>,
}

/// One page of rows and the number of rows matching the filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListPage {
    pub rows: Vec<Record>,
    pub total: usize,
}

/// Record persistence.
pub trait Storage: Send + Sync {
    /// Fetches one record, `None` if it does not exist.
    fn fetch_by_id(&self, table: &Table, id: u64) -> Result<Option<Record>, StorageError>;

    /// Inserts a record and returns its new id.
    fn insert(&self, table: &Table, record: &Record) -> Result<u64, StorageError>;

    /// Overwrites the fields present in `record`.
    ///
    /// Fails with [`StorageError::NoKeySupplied`] when `record` has no key value.
    fn update(&self, table: &Table, record: &Record) -> Result<(), StorageError>;

    /// Deletes records and returns how many existed.
    fn delete(&self, table: &Table, ids: &[u64]) -> Result<usize, StorageError>;

    /// Lists records matching `query`.
    fn list(&self, table: &Table, query: &ListQuery) -> Result<ListPage, StorageError>;

    /// Whether no record other than `exclude_key` holds `value` in `field`.
    fn is_unique(
        &self,
        table: &Table,
        field: &str,
        value: &str,
        exclude_key: Option<u64>,
    ) -> Result<bool, StorageError>;

    /// Option set of a list field.
    fn list_option_values(&self, table: &Table, field: &str) -> Result<OptionSet, StorageError>;

    /// Adds a label to a field's option set and returns its id.
    fn add_option_value(&self, table: &Table, field: &str, label: &str)
        -> Result<u64, StorageError>;

    /// Removes extendable options no record refers to; returns how many went.
    fn prune_options(&self, table: &Table) -> Result<usize, StorageError>;
}

/// Storage of uploaded files, one file per record and field.
pub trait UploadStore: Send + Sync {
    /// Path of the file currently stored for a record, if any.
    fn locate(&self, table: &Table, field: &Field, id: u64) -> Result<Option<PathBuf>, StorageError>;

    /// Removes the file stored for a record, if any.
    fn delete_existing(&self, table: &Table, field: &Field, id: u64) -> Result<(), StorageError>;

    /// Moves a received file into place, replacing the previous one.
    fn store(
        &self,
        table: &Table,
        field: &Field,
        id: u64,
        file: &UploadedFile,
    ) -> Result<PathBuf, StorageError>;

    /// Drops a received file that will not be stored.
    fn discard(&self, file: &UploadedFile) -> Result<(), StorageError>;
}

/// Numeric key of a record, if it has one.
pub fn record_key(table: &Table, record: &Record) -> Option<u64> {
    record
        .get(&table.key().name)
        .and_then(|v| v.trim().parse().ok())
}
