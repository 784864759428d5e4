use indexmap::IndexMap;
use tracing::{debug, warn};

use super::policy::ValidationPolicy;
use super::report::ValidationReport;
use crate::error::StorageError;
use crate::filter::{filter, filter_key, trim_value, FilterResult, BOOLEAN_FALSE};
use crate::notice::{Notice, ALL_FIELDS_LABEL};
use crate::request::{RequestContext, UploadedFile};
use crate::storage::{Record, Storage, UploadStore};
use crate::table::{Field, Table};

/// Outcome of validating one submitted record.
#[derive(Debug, Clone)]
pub struct Validated {
    /// Sanitized values, including `<field>_nv` labels of extendable fields
    pub record: Record,
    pub report: ValidationReport,
    /// Uploads that passed the checks, keyed by field name
    pub accepted_uploads: IndexMap<String, UploadedFile>,
    /// Parsed key value, `None` for a new record
    pub key: Option<u64>,
}

impl Validated {
    pub fn is_savable(&self) -> bool {
        self.report.is_savable()
    }
}

fn merge(report: &mut ValidationReport, label: &str, result: &FilterResult) {
    for notice in &result.errors {
        report.add_error(label, *notice);
    }
    for notice in &result.warnings {
        report.add_warning(label, *notice);
    }
}

/// A sanitized value counts as content unless empty or an unchecked box.
fn has_content(field: &Field, value: &str) -> bool {
    !value.is_empty() && !(field.descriptor.has_boolean_semantics() && value == BOOLEAN_FALSE)
}

/// Validates the values submitted in `ctx` against `table`.
///
/// Fields are processed in declaration order. Uniqueness checks and file
/// deletions reach the collaborators as they come; nothing is persisted.
///
/// # Arguments
/// * `table` - Table the values belong to
/// * `ctx` - Request carrying the values and uploads
/// * `policy` - Editability, not-null and uniqueness rules
/// * `storage` - Answers uniqueness queries
/// * `uploads` - Removes files flagged for deletion and discards oversize uploads
///
/// # Returns
/// The sanitized record and its report, or the first collaborator failure.
pub fn validate(
    table: &Table,
    ctx: &RequestContext,
    policy: &ValidationPolicy,
    storage: &dyn Storage,
    uploads: &dyn UploadStore,
) -> Result<Validated, StorageError> {
    let mut report = ValidationReport::new();
    let key_field = table.key();
    if !policy.is_editable(&key_field.name) {
        report.add_error(&key_field.label, Notice::KeyBlocked);
    }

    let mut values: IndexMap<String, String> = ctx
        .values
        .iter()
        .map(|(name, value)| (name.clone(), trim_value(value).to_string()))
        .collect();
    let key = values
        .get(&key_field.name)
        .and_then(|raw| filter_key(raw).value.parse::<u64>().ok());

    let mut record = Record::new();
    let mut accepted_uploads = IndexMap::new();
    let mut all_empty = true;

    for field in table.fields() {
        let descriptor = &field.descriptor;
        let label = field.label.as_str();

        if descriptor.has_boolean_semantics() && !values.contains_key(&field.name) {
            values.insert(field.name.clone(), BOOLEAN_FALSE.to_string());
        }

        if let Some(raw) = values.get(&field.name) {
            if policy.is_blocked(&field.name) {
                report.add_error(label, Notice::FieldBlocked);
            }
            if policy.requires_value(&field.name) && raw.is_empty() {
                report.add_error(label, Notice::CantBeNull);
            }
            if policy.requires_unique(&field.name)
                && !storage.is_unique(table, &field.name, raw, key)?
            {
                report.add_error(label, Notice::MustBeUnique);
            }

            if descriptor.is_extendable() {
                if has_content(field, raw) {
                    all_empty = false;
                }
                record.insert(field.name.clone(), raw.clone());

                let companion = field.companion_name();
                if let Some(new_label) = values.get(&companion).filter(|v| !v.is_empty()) {
                    let result = filter(field.tag, new_label);
                    merge(&mut report, label, &result);
                    if has_content(field, &result.value) {
                        all_empty = false;
                    }
                    record.insert(companion, result.value);
                }
            } else if !descriptor.is_file_type() {
                let result = filter(field.tag, raw);
                merge(&mut report, label, &result);
                if has_content(field, &result.value) {
                    all_empty = false;
                }
                record.insert(field.name.clone(), result.value);
            }
        }

        if descriptor.is_file_type() {
            if values.contains_key(&field.companion_name()) {
                if let Some(id) = key {
                    uploads.delete_existing(table, field, id)?;
                    debug!(table = %table.name, field = %field.name, id, "Deleted stored file on request");
                }
            }

            if let Some(upload) = ctx.uploads.get(&field.name) {
                if let Some(notice) = upload.failure_notice() {
                    warn!(field = %field.name, code = upload.error_code, "Upload failed");
                    report.add_warning(label, notice);
                } else if upload.is_ok() {
                    let too_big = descriptor.max_bytes().is_some_and(|max| upload.size > max);
                    if too_big {
                        warn!(field = %field.name, size = upload.size, "Upload exceeds type limit");
                        report.add_warning(label, Notice::FileSizeTooBig);
                        uploads.discard(upload)?;
                    } else {
                        all_empty = false;
                        accepted_uploads.insert(field.name.clone(), upload.clone());
                    }
                }
            }
        }
    }

    if all_empty {
        report.add_error(ALL_FIELDS_LABEL, Notice::GeneralSaveError);
    }

    debug!(
        table = %table.name,
        errors = report.error_count(),
        savable = report.is_savable(),
        "Validated submitted record"
    );

    Ok(Validated {
        record,
        report,
        accepted_uploads,
        key,
    })
}
