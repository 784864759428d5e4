//! Decoded request parameters.
//!
//! A [`RequestContext`] holds everything one request contributes: the action,
//! an optional target record, the submitted field values, received uploads,
//! delete checkboxes and list navigation. Nothing is carried between requests.

use std::collections::HashMap;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;

use crate::notice::Notice;
use crate::table::{Table, NEW_VALUE_SUFFIX};

/// Parameter naming the action.
pub const ACTION_PARAM: &str = "ZX_ACTION";
/// Parameter naming the target record id.
pub const TARGET_PARAM: &str = "ZX_TARGET";
/// Parameter naming the list page, zero-based.
pub const PAGE_PARAM: &str = "ZX_PAGE";
/// Parameter naming the sort field.
pub const SORT_PARAM: &str = "ZX_SORT";
/// Parameter naming the sort order; `1` sorts descending.
pub const SORT_ORDER_PARAM: &str = "ZX_SORD";

/// Upload error code meaning no file was chosen.
pub const UPLOAD_NO_FILE: u16 = 4;

/// What the request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Action {
    /// List filtered by the submitted values
    Find,
    /// Plain list
    #[default]
    Show,
    /// Show a form, or save it when values are submitted
    View,
    /// Delete the checked records, then list
    Delete,
}

impl Action {
    /// Reads an action parameter; absent or unrecognised values mean `Show`.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("FIND") => Action::Find,
            Some("VIEW") => Action::View,
            Some("DELETE") => Action::Delete,
            _ => Action::Show,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Find => "FIND",
            Action::Show => "SHOW",
            Action::View => "VIEW",
            Action::Delete => "DELETE",
        }
    }
}

/// Requested list ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub field: String,
    pub reverse: bool,
}

/// A file received with the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedFile {
    /// Name the file had on the client
    pub original_name: String,
    /// Where the received bytes were spooled
    pub temp_path: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// Transfer status: 0 on success, otherwise the failure code
    pub error_code: u16,
}

impl UploadedFile {
    /// A successfully received file.
    pub fn received(original_name: impl Into<String>, temp_path: PathBuf, size: u64) -> Self {
        Self {
            original_name: original_name.into(),
            temp_path,
            size,
            error_code: 0,
        }
    }

    /// A transfer that failed with `error_code`.
    pub fn failed(original_name: impl Into<String>, error_code: u16) -> Self {
        Self {
            original_name: original_name.into(),
            temp_path: PathBuf::new(),
            size: 0,
            error_code,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error_code == 0
    }

    /// The client submitted the form without choosing a file.
    pub fn is_missing(&self) -> bool {
        self.error_code == UPLOAD_NO_FILE
    }

    /// Extension of the original name, including the leading dot.
    pub fn extension(&self) -> &str {
        let base = self
            .original_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default();
        match base.rfind('.') {
            Some(pos) => &base[pos..],
            None => "",
        }
    }

    /// Warning describing a failed transfer; `None` on success or no file.
    pub fn failure_notice(&self) -> Option<Notice> {
        match self.error_code {
            0 | UPLOAD_NO_FILE => None,
            1 => Some(Notice::UploadExceedsServerLimit),
            2 => Some(Notice::UploadExceedsFormLimit),
            3 => Some(Notice::UploadPartial),
            6 => Some(Notice::UploadNoTempDir),
            7 => Some(Notice::UploadCantWrite),
            8 => Some(Notice::UploadExtensionBlocked),
            code => Some(Notice::UploadFailed(code)),
        }
    }
}

/// Parameters of a single request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RequestContext {
    pub action: Action,
    /// Record addressed by the request, if any
    pub target: Option<u64>,
    /// Submitted values keyed by field name or `<field>_nv`
    pub values: IndexMap<String, String>,
    /// Received files keyed by field name
    #[serde(skip)]
    pub uploads: HashMap<String, UploadedFile>,
    /// Ids whose delete checkbox was ticked
    pub delete_ids: Vec<u64>,
    /// Zero-based list page
    pub page: usize,
    pub sort: Option<SortSpec>,
}

impl RequestContext {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            ..Self::default()
        }
    }

    /// Decodes raw request parameters for `table`.
    ///
    /// Only parameters naming a field of the table or its `_nv` companion are
    /// kept as values; control parameters are decoded into their own slots and
    /// everything else is dropped.
    pub fn from_pairs<I, K, V>(table: &Table, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let delete_prefix = format!("ZX_{}_DEL_", table.name);
        let mut ctx = RequestContext::default();
        let mut action = None;
        let mut sort_field = None;
        let mut sort_order = None;

        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                ACTION_PARAM => action = Some(value.to_string()),
                TARGET_PARAM => ctx.target = value.trim().parse().ok(),
                PAGE_PARAM => ctx.page = value.trim().parse().unwrap_or(0),
                SORT_PARAM => sort_field = Some(value.trim().to_string()),
                SORT_ORDER_PARAM => sort_order = Some(value.trim().to_string()),
                _ => {
                    if let Some(id) = key.strip_prefix(&delete_prefix) {
                        if let Ok(id) = id.parse() {
                            ctx.delete_ids.push(id);
                        }
                    } else if is_table_parameter(table, key) {
                        ctx.values.insert(key.to_string(), value.to_string());
                    }
                }
            }
        }

        ctx.action = Action::parse(action.as_deref());
        if let Some(field) = sort_field.filter(|f| table.has_field(f)) {
            ctx.sort = Some(SortSpec {
                field,
                reverse: sort_order.as_deref() == Some("1"),
            });
        }
        ctx
    }

    /// Adds a submitted value.
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Adds a received file.
    pub fn with_upload(mut self, field: impl Into<String>, file: UploadedFile) -> Self {
        self.uploads.insert(field.into(), file);
        self
    }

    pub fn with_target(mut self, id: u64) -> Self {
        self.target = Some(id);
        self
    }

    /// Whether the request submitted any field values.
    pub fn has_values(&self) -> bool {
        !self.values.is_empty()
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

fn is_table_parameter(table: &Table, key: &str) -> bool {
    table.has_field(key)
        || key
            .strip_suffix(NEW_VALUE_SUFFIX)
            .is_some_and(|base| table.has_field(base))
}
