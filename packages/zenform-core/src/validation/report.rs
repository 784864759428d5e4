use indexmap::IndexMap;
use serde::Serialize;

use crate::notice::Notice;

/// Errors and warnings collected while validating one record, grouped by
/// field label in the order they were raised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: IndexMap<String, Vec<Notice>>,
    pub warnings: IndexMap<String, Vec<Notice>>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, label: &str, notice: Notice) {
        self.errors.entry(label.to_string()).or_default().push(notice);
    }

    pub fn add_warning(&mut self, label: &str, notice: Notice) {
        self.warnings
            .entry(label.to_string())
            .or_default()
            .push(notice);
    }

    /// The record may be persisted only when no error was raised.
    pub fn is_savable(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn errors_for(&self, label: &str) -> &[Notice] {
        self.errors.get(label).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn warnings_for(&self, label: &str) -> &[Notice] {
        self.warnings.get(label).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn error_count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }
}
