//! Request engine.
//!
//! Ties the phase machine, the validation pipeline, the collaborators and
//! the view builders together. One call to [`Engine::handle`] serves one
//! request from start to rendered artifact.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{Schema, TableOptions};
use crate::error::{EngineError, StorageError};
use crate::filter::trim_value;
use crate::phase::Phase;
use crate::request::{Action, RequestContext};
use crate::storage::{record_key, FindFilter, ListQuery, Record, Storage, UploadStore};
use crate::table::Table;
use crate::types::TypeRegistry;
use crate::validation::{validate, ValidationPolicy, ValidationReport};
use crate::view::{FormView, ListView, Lookups, View};

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Outcome of one request.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    /// Phase the request ended in
    pub phase: Phase,
    pub view: View,
    /// Notices raised while validating a submission; empty otherwise
    pub report: ValidationReport,
}

/// Table served by the engine, with its options and derived policy.
#[derive(Debug)]
struct TableEntry {
    table: Table,
    options: TableOptions,
    policy: ValidationPolicy,
}

/// Serves requests against the configured tables.
///
/// Registry and tables are fixed at construction and shared read-only.
pub struct Engine {
    registry: Arc<TypeRegistry>,
    tables: IndexMap<String, TableEntry>,
    storage: Arc<dyn Storage>,
    uploads: Arc<dyn UploadStore>,
}

impl Engine {
    /// Creates an engine over a built schema.
    ///
    /// # Arguments
    /// * `schema` - Registry and tables produced by [`crate::config::EngineConfig::build`]
    /// * `storage` - Record and option set storage
    /// * `uploads` - Uploaded file storage
    pub fn new(schema: Schema, storage: Arc<dyn Storage>, uploads: Arc<dyn UploadStore>) -> Self {
        let tables = schema
            .tables
            .into_iter()
            .map(|def| {
                let policy = ValidationPolicy::from(&def.options);
                let entry = TableEntry {
                    table: def.table,
                    options: def.options,
                    policy,
                };
                (entry.table.name.clone(), entry)
            })
            .collect();

        Self {
            registry: Arc::new(schema.registry),
            tables,
            storage,
            uploads,
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Names of the served tables, in configuration order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name).map(|entry| &entry.table)
    }

    /// Serves one request against table `name`.
    ///
    /// # Returns
    /// The final phase with its view and report, or the first collaborator
    /// failure. Failures are not retried.
    pub fn handle(&self, name: &str, mut ctx: RequestContext) -> Result<Response> {
        let entry = self
            .tables
            .get(name)
            .ok_or_else(|| EngineError::TableNotFound(name.to_string()))?;

        let phase = Phase::initial(ctx.action, ctx.has_values());
        debug!(table = name, action = ctx.action.as_str(), ?phase, "Request phase decided");

        match phase {
            Phase::List => self.list(entry, &ctx, Vec::new(), phase),
            Phase::Delete => {
                let deleted = self.delete(entry, &ctx.delete_ids)?;
                self.list(entry, &ctx, deleted, phase.after_delete())
            }
            Phase::FormView => self.show_form(entry, &ctx),
            Phase::FormSave | Phase::FormError => {
                if ctx.target.is_none() {
                    ctx.target = ctx
                        .value(&entry.table.key().name)
                        .and_then(|v| v.trim().parse().ok());
                }
                self.submit(entry, &ctx, phase)
            }
        }
    }

    fn list(
        &self,
        entry: &TableEntry,
        ctx: &RequestContext,
        deleted: Vec<u64>,
        phase: Phase,
    ) -> Result<Response> {
        let TableEntry { table, options, .. } = entry;

        let filters = if ctx.action == Action::Find {
            find_filters(table, ctx)
        } else {
            Vec::new()
        };
        let paged = !options.no_pages && options.records_per_page > 0;
        let (order_field, reverse) = match &ctx.sort {
            Some(sort) => (Some(sort.field.clone()), sort.reverse),
            None => (options.order_by.clone(), options.reverse_order),
        };
        let query = ListQuery {
            limit: paged.then_some(options.records_per_page),
            offset: if paged {
                ctx.page.saturating_mul(options.records_per_page)
            } else {
                0
            },
            order_field,
            reverse,
            filters,
        };

        let page = self.storage.list(table, &query)?;
        let mut lookups = self.option_lookups(table)?;
        for row in &page.rows {
            if let Some(id) = record_key(table, row) {
                self.add_file_lookups(table, id, &mut lookups)?;
            }
        }
        debug!(table = %table.name, rows = page.rows.len(), total = page.total, "Listed records");

        let mut view = ListView::build(table, options, ctx, page, &lookups);
        view.deleted = deleted;
        Ok(Response {
            phase,
            view: View::List(view),
            report: ValidationReport::new(),
        })
    }

    fn delete(&self, entry: &TableEntry, ids: &[u64]) -> Result<Vec<u64>> {
        let table = &entry.table;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let removed = self.storage.delete(table, ids)?;
        for id in ids {
            for field in table.file_fields() {
                self.uploads.delete_existing(table, field, *id)?;
            }
        }
        let pruned = self.storage.prune_options(table)?;
        info!(table = %table.name, requested = ids.len(), removed, pruned, "Deleted records");
        Ok(ids.to_vec())
    }

    fn show_form(&self, entry: &TableEntry, ctx: &RequestContext) -> Result<Response> {
        let table = &entry.table;
        let (id, values) = match ctx.target {
            Some(id) => {
                let record = self
                    .storage
                    .fetch_by_id(table, id)?
                    .ok_or_else(|| StorageError::RecordNotFound {
                        table: table.name.clone(),
                        id,
                    })?;
                (Some(id), record)
            }
            None => (None, Record::new()),
        };

        let lookups = self.form_lookups(table, id)?;
        let view = FormView::build(table, &entry.options, id, &values, &lookups);
        Ok(Response {
            phase: Phase::FormView,
            view: View::Form(view),
            report: ValidationReport::new(),
        })
    }

    fn submit(&self, entry: &TableEntry, ctx: &RequestContext, phase: Phase) -> Result<Response> {
        let TableEntry {
            table,
            options,
            policy,
        } = entry;

        let validated = validate(table, ctx, policy, self.storage.as_ref(), self.uploads.as_ref())?;
        let phase = phase.after_validation(&validated.report);
        let target = validated.key.or(ctx.target);

        if phase == Phase::FormError {
            warn!(
                table = %table.name,
                errors = validated.report.error_count(),
                "Submitted record rejected"
            );
            for upload in validated.accepted_uploads.values() {
                self.uploads.discard(upload)?;
            }
            let lookups = self.form_lookups(table, target)?;
            let view = FormView::build(table, options, target, &validated.record, &lookups);
            return Ok(Response {
                phase,
                view: View::Form(view),
                report: validated.report,
            });
        }

        let mut record = validated.record;
        for field in table.fields().iter().filter(|f| f.descriptor.is_extendable()) {
            let Some(label) = record.shift_remove(&field.companion_name()) else {
                continue;
            };
            if !label.is_empty() {
                let option_id = self.storage.add_option_value(table, &field.name, &label)?;
                record.insert(field.name.clone(), option_id.to_string());
            }
        }

        let key_name = table.key().name.clone();
        let id = match target {
            Some(id) => {
                record.insert(key_name, id.to_string());
                self.storage.update(table, &record)?;
                let pruned = self.storage.prune_options(table)?;
                info!(table = %table.name, id, pruned, "Updated record");
                id
            }
            None => {
                record.shift_remove(&key_name);
                let id = self.storage.insert(table, &record)?;
                info!(table = %table.name, id, "Inserted record");
                id
            }
        };

        for (name, upload) in &validated.accepted_uploads {
            if let Some(field) = table.field(name) {
                let path = self.uploads.store(table, field, id, upload)?;
                info!(table = %table.name, id, field = %name, path = %path.display(), "Stored upload");
            }
        }

        let persisted = self.storage.fetch_by_id(table, id)?.unwrap_or(record);
        let lookups = self.form_lookups(table, Some(id))?;
        let view = FormView::build(table, options, Some(id), &persisted, &lookups);
        Ok(Response {
            phase,
            view: View::Form(view),
            report: validated.report,
        })
    }

    fn option_lookups(&self, table: &Table) -> Result<Lookups> {
        let mut lookups = Lookups::default();
        for field in table.list_fields() {
            let options = self.storage.list_option_values(table, &field.name)?;
            lookups.options.insert(field.name.clone(), options);
        }
        Ok(lookups)
    }

    fn add_file_lookups(&self, table: &Table, id: u64, lookups: &mut Lookups) -> Result<()> {
        for field in table.file_fields() {
            if let Some(path) = self.uploads.locate(table, field, id)? {
                lookups.files.insert((id, field.name.clone()), path);
            }
        }
        Ok(())
    }

    fn form_lookups(&self, table: &Table, id: Option<u64>) -> Result<Lookups> {
        let mut lookups = self.option_lookups(table)?;
        if let Some(id) = id {
            self.add_file_lookups(table, id, &mut lookups)?;
        }
        Ok(lookups)
    }
}

/// Prefix filters from the non-empty search values of a FIND request.
fn find_filters(table: &Table, ctx: &RequestContext) -> Vec<FindFilter> {
    ctx.values
        .iter()
        .filter(|(name, _)| table.has_field(name))
        .filter_map(|(name, value)| {
            let prefix = trim_value(value);
            (!prefix.is_empty()).then(|| FindFilter {
                field: name.clone(),
                prefix: prefix.to_string(),
            })
        })
        .collect()
}
