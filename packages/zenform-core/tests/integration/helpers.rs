//! Test helpers: recording collaborators and table fixtures.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use zenform_core::error::StorageError;
use zenform_core::storage::{
    ListPage, ListQuery, MemoryStorage, OptionSet, Record, Storage, UploadStore,
};
use zenform_core::table::{Field, Table};
use zenform_core::types::{TypeRegistry, TypeTag};
use zenform_core::UploadedFile;

/// Call made on a collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Insert(Record),
    Update(Record),
    Delete(Vec<u64>),
    IsUnique { field: String, value: String },
    AddOption { field: String, label: String },
    DeleteFile { field: String, id: u64 },
    StoreFile { field: String, id: u64 },
    Discard(String),
}

/// Storage backed by [`MemoryStorage`] that records every mutating call.
///
/// With `force_duplicates` set every uniqueness check reports a duplicate.
pub struct RecordingStorage {
    inner: MemoryStorage,
    pub calls: Mutex<Vec<Call>>,
    pub force_duplicates: bool,
}

impl RecordingStorage {
    pub fn new(table: &Table) -> Self {
        let inner = MemoryStorage::new();
        inner.create_table(table);
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
            force_duplicates: false,
        }
    }

    pub fn with_duplicates(table: &Table) -> Self {
        Self {
            force_duplicates: true,
            ..Self::new(table)
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn inserts(&self) -> Vec<Record> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Insert(record) => Some(record),
                _ => None,
            })
            .collect()
    }

    /// Number of insert and update calls.
    pub fn persistence_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Insert(_) | Call::Update(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

impl Storage for RecordingStorage {
    fn fetch_by_id(&self, table: &Table, id: u64) -> Result<Option<Record>, StorageError> {
        self.inner.fetch_by_id(table, id)
    }

    fn insert(&self, table: &Table, record: &Record) -> Result<u64, StorageError> {
        self.record(Call::Insert(record.clone()));
        self.inner.insert(table, record)
    }

    fn update(&self, table: &Table, record: &Record) -> Result<(), StorageError> {
        self.record(Call::Update(record.clone()));
        self.inner.update(table, record)
    }

    fn delete(&self, table: &Table, ids: &[u64]) -> Result<usize, StorageError> {
        self.record(Call::Delete(ids.to_vec()));
        self.inner.delete(table, ids)
    }

    fn list(&self, table: &Table, query: &ListQuery) -> Result<ListPage, StorageError> {
        self.inner.list(table, query)
    }

    fn is_unique(
        &self,
        table: &Table,
        field: &str,
        value: &str,
        exclude_key: Option<u64>,
    ) -> Result<bool, StorageError> {
        self.record(Call::IsUnique {
            field: field.to_string(),
            value: value.to_string(),
        });
        if self.force_duplicates {
            return Ok(false);
        }
        self.inner.is_unique(table, field, value, exclude_key)
    }

    fn list_option_values(&self, table: &Table, field: &str) -> Result<OptionSet, StorageError> {
        self.inner.list_option_values(table, field)
    }

    fn add_option_value(
        &self,
        table: &Table,
        field: &str,
        label: &str,
    ) -> Result<u64, StorageError> {
        self.record(Call::AddOption {
            field: field.to_string(),
            label: label.to_string(),
        });
        self.inner.add_option_value(table, field, label)
    }

    fn prune_options(&self, table: &Table) -> Result<usize, StorageError> {
        self.inner.prune_options(table)
    }
}

/// Upload store that keeps nothing and records every call.
#[derive(Default)]
pub struct RecordingUploads {
    pub calls: Mutex<Vec<Call>>,
}

impl RecordingUploads {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }
}

impl UploadStore for RecordingUploads {
    fn locate(&self, _table: &Table, _field: &Field, _id: u64) -> Result<Option<PathBuf>, StorageError> {
        Ok(None)
    }

    fn delete_existing(&self, _table: &Table, field: &Field, id: u64) -> Result<(), StorageError> {
        self.calls.lock().push(Call::DeleteFile {
            field: field.name.clone(),
            id,
        });
        Ok(())
    }

    fn store(
        &self,
        table: &Table,
        field: &Field,
        id: u64,
        file: &UploadedFile,
    ) -> Result<PathBuf, StorageError> {
        self.calls.lock().push(Call::StoreFile {
            field: field.name.clone(),
            id,
        });
        Ok(PathBuf::from(format!(
            "{}_{}_{}{}",
            table.name,
            field.name,
            id,
            file.extension()
        )))
    }

    fn discard(&self, file: &UploadedFile) -> Result<(), StorageError> {
        self.calls
            .lock()
            .push(Call::Discard(file.original_name.clone()));
        Ok(())
    }
}

/// Table with a key and one short text field.
pub fn people_table() -> Table {
    let registry = TypeRegistry::builtin().unwrap();
    Table::create(
        "people",
        vec![
            Field::new("id", TypeTag::Key, "ID", &registry).unwrap(),
            Field::new("name", TypeTag::ShortText, "Name", &registry).unwrap(),
        ],
    )
    .unwrap()
}

/// Table exercising every type family.
pub fn inventory_table() -> Table {
    let registry = TypeRegistry::builtin().unwrap();
    Table::create(
        "items",
        vec![
            Field::new("id", TypeTag::Key, "ID", &registry).unwrap(),
            Field::new("title", TypeTag::ShortText, "Title", &registry).unwrap(),
            Field::new("notes", TypeTag::LongText, "Notes", &registry).unwrap(),
            Field::new("count", TypeTag::Integer, "Count", &registry).unwrap(),
            Field::new("price", TypeTag::Float, "Price", &registry).unwrap(),
            Field::new("added", TypeTag::Date, "Added", &registry).unwrap(),
            Field::new("in_stock", TypeTag::Boolean, "In Stock", &registry).unwrap(),
            Field::new("maker", TypeTag::ExtendableSelect, "Maker", &registry).unwrap(),
            Field::new("photo", TypeTag::ImageFile, "Photo", &registry).unwrap(),
        ],
    )
    .unwrap()
}

pub fn shared<T>(value: T) -> Arc<T> {
    Arc::new(value)
}
