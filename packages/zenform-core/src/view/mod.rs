//! View models for lists and forms, and their HTML rendering.

mod form;
pub mod html;
mod list;

pub use form::{FormRow, FormView, FormWidget};
pub use list::{Cell, ListColumn, ListRow, ListView, SearchField};

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;

use crate::storage::OptionSet;

/// Rendered output of a request.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum View {
    List(ListView),
    Form(FormView),
}

/// Option sets and stored files needed to render a table.
#[derive(Debug, Clone, Default)]
pub struct Lookups {
    /// Option set per list field
    pub options: IndexMap<String, OptionSet>,
    /// Stored file per (record id, field)
    pub files: IndexMap<(u64, String), PathBuf>,
}

impl Lookups {
    /// Label of option `value` of `field`, if `value` names one.
    pub fn option_label(&self, field: &str, value: &str) -> Option<&str> {
        let id: u64 = value.trim().parse().ok()?;
        self.options.get(field)?.get(&id).map(String::as_str)
    }

    pub fn file(&self, id: u64, field: &str) -> Option<&PathBuf> {
        self.files.get(&(id, field.to_string()))
    }
}
