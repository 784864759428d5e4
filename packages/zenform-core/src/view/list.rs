use std::path::Path;

use serde::Serialize;

use super::Lookups;
use crate::config::TableOptions;
use crate::filter::BOOLEAN_FALSE;
use crate::request::{RequestContext, SortSpec};
use crate::storage::{record_key, ListPage};
use crate::table::{Field, Table};

/// Visible column of a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListColumn {
    pub name: String,
    pub label: String,
}

/// Cell contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Cell {
    Text(String),
    Image(String),
    File(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListRow {
    pub id: u64,
    pub cells: Vec<Cell>,
}

/// Text box of the search form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchField {
    pub name: String,
    pub label: String,
    pub value: String,
}

/// One page of a table's records.
#[derive(Debug, Clone, Serialize)]
pub struct ListView {
    pub table: String,
    pub columns: Vec<ListColumn>,
    pub rows: Vec<ListRow>,
    /// Records matching the search
    pub total: usize,
    pub page: usize,
    /// Number of page links; zero when paging is off
    pub page_count: usize,
    pub viewable: bool,
    pub deletable: bool,
    /// Search form; `None` when the table is not searchable
    pub search: Option<Vec<SearchField>>,
    pub sort: Option<SortSpec>,
    /// Ids removed by this request
    pub deleted: Vec<u64>,
}

fn is_listed(field: &Field, options: &TableOptions) -> bool {
    if field.is_key() && !options.list_show_keys {
        return false;
    }
    !options.list_hidden_fields.contains(&field.name)
}

fn cell_for(field: &Field, id: u64, value: Option<&str>, lookups: &Lookups) -> Cell {
    let descriptor = &field.descriptor;
    if descriptor.is_file_type() {
        return match lookups.file(id, &field.name) {
            Some(path) if descriptor.is_image_type() => Cell::Image(display_path(path)),
            Some(path) => Cell::File(display_path(path)),
            None => Cell::Text(String::new()),
        };
    }

    let value = value.unwrap_or("");
    if descriptor.has_boolean_semantics() {
        let checked = !value.is_empty() && value != BOOLEAN_FALSE;
        return Cell::Text(if checked { "+".to_string() } else { String::new() });
    }
    if descriptor.is_list_type() {
        let label = lookups.option_label(&field.name, value).unwrap_or("");
        return Cell::Text(label.to_string());
    }
    Cell::Text(value.to_string())
}

pub(crate) fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

impl ListView {
    /// Builds the list model from one page of storage rows.
    pub fn build(
        table: &Table,
        options: &TableOptions,
        ctx: &RequestContext,
        page: ListPage,
        lookups: &Lookups,
    ) -> Self {
        let listed: Vec<&Field> = table
            .fields()
            .iter()
            .filter(|f| is_listed(f, options))
            .collect();

        let columns = listed
            .iter()
            .map(|f| ListColumn {
                name: f.name.clone(),
                label: f.label.clone(),
            })
            .collect();

        let rows = page
            .rows
            .iter()
            .filter_map(|row| {
                let id = record_key(table, row)?;
                let cells = listed
                    .iter()
                    .map(|f| cell_for(f, id, row.get(&f.name).map(String::as_str), lookups))
                    .collect();
                Some(ListRow { id, cells })
            })
            .collect();

        let page_count = if options.no_pages || options.records_per_page == 0 {
            0
        } else {
            page.total.div_ceil(options.records_per_page)
        };

        let search = options.list_searchable.then(|| {
            table
                .fields()
                .iter()
                .filter(|f| !(f.is_key() && !options.list_show_keys))
                .filter(|f| !f.descriptor.is_file_type())
                .filter(|f| !options.find_hidden_fields.contains(&f.name))
                .map(|f| SearchField {
                    name: f.name.clone(),
                    label: f.label.clone(),
                    value: ctx.value(&f.name).unwrap_or("").to_string(),
                })
                .collect()
        });

        Self {
            table: table.name.clone(),
            columns,
            rows,
            total: page.total,
            page: ctx.page,
            page_count,
            viewable: options.list_viewable,
            deletable: options.list_deletable,
            search,
            sort: ctx.sort.clone(),
            deleted: Vec::new(),
        }
    }
}
