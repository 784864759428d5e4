//! In-memory storage backend.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use parking_lot::RwLock;
use tracing::debug;

use super::{record_key, ListPage, ListQuery, OptionSet, Record, Storage};
use crate::config::Schema;
use crate::error::StorageError;
use crate::table::Table;

#[derive(Debug)]
struct OptionTable {
    items: BTreeMap<u64, String>,
    next_id: u64,
}

impl Default for OptionTable {
    fn default() -> Self {
        Self {
            items: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl OptionTable {
    fn add(&mut self, label: &str) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.insert(id, label.to_string());
        id
    }
}

#[derive(Debug)]
struct MemoryTable {
    rows: BTreeMap<u64, Record>,
    next_id: u64,
    options: HashMap<String, OptionTable>,
}

/// Storage keeping every table in process memory.
///
/// Record ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    tables: RwLock<HashMap<String, MemoryTable>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage for every table of `schema` with its option sets seeded.
    pub fn from_schema(schema: &Schema) -> Result<Self, StorageError> {
        let storage = Self::new();
        for def in &schema.tables {
            storage.create_table(&def.table);
            for (field, labels) in &def.option_sets {
                storage.seed_options(&def.table, field, labels)?;
            }
        }
        Ok(storage)
    }

    /// Creates empty storage for `table`; existing data is kept.
    pub fn create_table(&self, table: &Table) {
        let mut tables = self.tables.write();
        tables.entry(table.name.clone()).or_insert_with(|| MemoryTable {
            rows: BTreeMap::new(),
            next_id: 1,
            options: table
                .list_fields()
                .map(|f| (f.name.clone(), OptionTable::default()))
                .collect(),
        });
    }

    /// Appends labels to a field's option set.
    pub fn seed_options(
        &self,
        table: &Table,
        field: &str,
        labels: &[String],
    ) -> Result<(), StorageError> {
        self.with_table_mut(table, |t| {
            let options = option_table_mut(t, table, field)?;
            for label in labels {
                options.add(label);
            }
            Ok(())
        })
    }

    /// Number of records stored for `table`.
    pub fn record_count(&self, table: &Table) -> usize {
        self.tables
            .read()
            .get(&table.name)
            .map(|t| t.rows.len())
            .unwrap_or(0)
    }

    fn with_table<R>(
        &self,
        table: &Table,
        f: impl FnOnce(&MemoryTable) -> Result<R, StorageError>,
    ) -> Result<R, StorageError> {
        let tables = self.tables.read();
        let t = tables
            .get(&table.name)
            .ok_or_else(|| StorageError::TableNotFound {
                table: table.name.clone(),
            })?;
        f(t)
    }

    fn with_table_mut<R>(
        &self,
        table: &Table,
        f: impl FnOnce(&mut MemoryTable) -> Result<R, StorageError>,
    ) -> Result<R, StorageError> {
        let mut tables = self.tables.write();
        let t = tables
            .get_mut(&table.name)
            .ok_or_else(|| StorageError::TableNotFound {
                table: table.name.clone(),
            })?;
        f(t)
    }
}

fn option_table<'a>(
    t: &'a MemoryTable,
    table: &Table,
    field: &str,
) -> Result<&'a OptionTable, StorageError> {
    t.options
        .get(field)
        .ok_or_else(|| StorageError::NoOptionSet {
            table: table.name.clone(),
            field: field.to_string(),
        })
}

fn option_table_mut<'a>(
    t: &'a mut MemoryTable,
    table: &Table,
    field: &str,
) -> Result<&'a mut OptionTable, StorageError> {
    t.options
        .get_mut(field)
        .ok_or_else(|| StorageError::NoOptionSet {
            table: table.name.clone(),
            field: field.to_string(),
        })
}

/// Numbers compare numerically, everything else as text.
fn compare_values(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}

fn matches_filters(t: &MemoryTable, table: &Table, row: &Record, query: &ListQuery) -> bool {
    query.filters.iter().all(|filter| {
        let stored = row.get(&filter.field).map(String::as_str).unwrap_or("");
        let is_list = table
            .field(&filter.field)
            .is_some_and(|f| f.descriptor.is_list_type());
        let text = if is_list {
            stored
                .parse::<u64>()
                .ok()
                .and_then(|id| t.options.get(&filter.field)?.items.get(&id))
                .map(String::as_str)
                .unwrap_or("")
        } else {
            stored
        };
        text.to_lowercase()
            .starts_with(&filter.prefix.to_lowercase())
    })
}

impl Storage for MemoryStorage {
    fn fetch_by_id(&self, table: &Table, id: u64) -> Result<Option<Record>, StorageError> {
        self.with_table(table, |t| Ok(t.rows.get(&id).cloned()))
    }

    fn insert(&self, table: &Table, record: &Record) -> Result<u64, StorageError> {
        let key = table.key().name.clone();
        self.with_table_mut(table, |t| {
            let id = t.next_id;
            t.next_id += 1;

            let mut row: Record = table
                .fields()
                .iter()
                .filter(|f| f.name != key)
                .filter_map(|f| record.get(&f.name).map(|v| (f.name.clone(), v.clone())))
                .collect();
            row.insert(key.clone(), id.to_string());
            t.rows.insert(id, row);

            debug!(table = %table.name, id, "Inserted record");
            Ok(id)
        })
    }

    fn update(&self, table: &Table, record: &Record) -> Result<(), StorageError> {
        let key = &table.key().name;
        let id = record_key(table, record).ok_or_else(|| StorageError::NoKeySupplied {
            table: table.name.clone(),
            key: key.clone(),
        })?;

        self.with_table_mut(table, |t| {
            let row = t
                .rows
                .get_mut(&id)
                .ok_or_else(|| StorageError::RecordNotFound {
                    table: table.name.clone(),
                    id,
                })?;
            for (name, value) in record {
                if name != key && table.has_field(name) {
                    row.insert(name.clone(), value.clone());
                }
            }
            debug!(table = %table.name, id, "Updated record");
            Ok(())
        })
    }

    fn delete(&self, table: &Table, ids: &[u64]) -> Result<usize, StorageError> {
        self.with_table_mut(table, |t| {
            let removed = ids.iter().filter(|id| t.rows.remove(id).is_some()).count();
            debug!(table = %table.name, removed, "Deleted records");
            Ok(removed)
        })
    }

    fn list(&self, table: &Table, query: &ListQuery) -> Result<ListPage, StorageError> {
        self.with_table(table, |t| {
            let mut rows: Vec<&Record> = t
                .rows
                .values()
                .filter(|row| matches_filters(t, table, row, query))
                .collect();

            let order_field = query
                .order_field
                .as_deref()
                .unwrap_or(table.key().name.as_str());
            rows.sort_by(|a, b| {
                let a = a.get(order_field).map(String::as_str).unwrap_or("");
                let b = b.get(order_field).map(String::as_str).unwrap_or("");
                compare_values(a, b)
            });
            if query.reverse {
                rows.reverse();
            }

            let total = rows.len();
            let rows = rows
                .into_iter()
                .skip(query.offset)
                .take(query.limit.unwrap_or(usize::MAX))
                .cloned()
                .collect();
            Ok(ListPage { rows, total })
        })
    }

    fn is_unique(
        &self,
        table: &Table,
        field: &str,
        value: &str,
        exclude_key: Option<u64>,
    ) -> Result<bool, StorageError> {
        self.with_table(table, |t| {
            let duplicate = t.rows.iter().any(|(id, row)| {
                Some(*id) != exclude_key && row.get(field).map(String::as_str) == Some(value)
            });
            Ok(!duplicate)
        })
    }

    fn list_option_values(&self, table: &Table, field: &str) -> Result<OptionSet, StorageError> {
        self.with_table(table, |t| {
            let options = option_table(t, table, field)?;
            let mut items: Vec<(u64, String)> = options
                .items
                .iter()
                .map(|(id, label)| (*id, label.clone()))
                .collect();
            let extendable = table
                .field(field)
                .is_some_and(|f| f.descriptor.is_extendable());
            if extendable {
                items.sort_by(|a, b| a.1.cmp(&b.1));
            }
            Ok(items.into_iter().collect())
        })
    }

    fn add_option_value(
        &self,
        table: &Table,
        field: &str,
        label: &str,
    ) -> Result<u64, StorageError> {
        self.with_table_mut(table, |t| {
            let id = option_table_mut(t, table, field)?.add(label);
            debug!(table = %table.name, field, id, "Added option");
            Ok(id)
        })
    }

    fn prune_options(&self, table: &Table) -> Result<usize, StorageError> {
        self.with_table_mut(table, |t| {
            let mut pruned = 0;
            for field in table.list_fields().filter(|f| f.descriptor.is_extendable()) {
                let referenced: HashSet<u64> = t
                    .rows
                    .values()
                    .filter_map(|row| row.get(&field.name)?.parse().ok())
                    .collect();
                if let Some(options) = t.options.get_mut(&field.name) {
                    let before = options.items.len();
                    options.items.retain(|id, _| referenced.contains(id));
                    pruned += before - options.items.len();
                }
            }
            if pruned > 0 {
                debug!(table = %table.name, pruned, "Pruned unreferenced options");
            }
            Ok(pruned)
        })
    }
}
