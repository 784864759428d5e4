use serde::Serialize;

use super::list::display_path;
use super::Lookups;
use crate::config::TableOptions;
use crate::filter::BOOLEAN_FALSE;
use crate::storage::Record;
use crate::table::{Field, Table};
use crate::types::{ListKind, Widget};

/// Form control of one field, with its current value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum FormWidget {
    Text {
        value: String,
        max_length: Option<u32>,
    },
    TextArea {
        value: String,
        rows: u32,
        cols: u32,
    },
    Select {
        options: Vec<(u64, String)>,
        selected: String,
        /// Companion text box for a new option label
        new_value: Option<String>,
    },
    Radio {
        options: Vec<(u64, String)>,
        selected: String,
    },
    Checkbox {
        checked: bool,
    },
    File {
        current: Option<String>,
        image: bool,
    },
    /// Field the form may not change
    ReadOnly {
        text: String,
        /// Default submitted through a hidden input
        write_through: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormRow {
    pub name: String,
    pub label: String,
    pub widget: FormWidget,
}

/// Detail form of one record.
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    pub table: String,
    /// Record shown, `None` for a new one
    pub id: Option<u64>,
    pub key_name: String,
    pub key_label: String,
    /// Value posted back in the hidden key input
    pub key_value: String,
    pub show_key: bool,
    /// Whether the save button is offered
    pub editable: bool,
    pub rows: Vec<FormRow>,
}

fn option_list(field: &Field, lookups: &Lookups) -> Vec<(u64, String)> {
    lookups
        .options
        .get(&field.name)
        .map(|set| set.iter().map(|(id, label)| (*id, label.clone())).collect())
        .unwrap_or_default()
}

fn widget_for(
    field: &Field,
    value: &str,
    values: &Record,
    id: Option<u64>,
    lookups: &Lookups,
) -> FormWidget {
    let descriptor = &field.descriptor;
    match descriptor.widget {
        Widget::TextArea { rows, cols } => FormWidget::TextArea {
            value: value.to_string(),
            rows,
            cols,
        },
        Widget::Select | Widget::RadioGroup if descriptor.list_kind == ListKind::RadioGroup => {
            FormWidget::Radio {
                options: option_list(field, lookups),
                selected: value.to_string(),
            }
        }
        Widget::Select | Widget::RadioGroup => FormWidget::Select {
            options: option_list(field, lookups),
            selected: value.to_string(),
            new_value: descriptor.is_extendable().then(|| {
                values
                    .get(&field.companion_name())
                    .cloned()
                    .unwrap_or_default()
            }),
        },
        Widget::Checkbox => FormWidget::Checkbox {
            checked: !value.is_empty() && value != BOOLEAN_FALSE,
        },
        Widget::FileInput => FormWidget::File {
            current: id
                .and_then(|id| lookups.file(id, &field.name))
                .map(|p| display_path(p)),
            image: descriptor.is_image_type(),
        },
        Widget::TextInput { max_length } => FormWidget::Text {
            value: value.to_string(),
            max_length,
        },
        Widget::Hidden => FormWidget::Text {
            value: value.to_string(),
            max_length: None,
        },
    }
}

fn read_only_text(field: &Field, value: &str, lookups: &Lookups) -> String {
    let descriptor = &field.descriptor;
    if descriptor.is_list_type() {
        lookups
            .option_label(&field.name, value)
            .unwrap_or("")
            .to_string()
    } else if descriptor.has_boolean_semantics() {
        if !value.is_empty() && value != BOOLEAN_FALSE {
            "+".to_string()
        } else {
            String::new()
        }
    } else {
        value.to_string()
    }
}

impl FormView {
    /// Builds the form model.
    ///
    /// # Arguments
    /// * `table` - Table being edited
    /// * `options` - Table options
    /// * `id` - Record shown, `None` for a new record
    /// * `values` - Current values: stored, or as submitted when re-shown after errors
    /// * `lookups` - Option sets and stored files
    pub fn build(
        table: &Table,
        options: &TableOptions,
        id: Option<u64>,
        values: &Record,
        lookups: &Lookups,
    ) -> Self {
        let key = table.key();
        let is_new = id.is_none();
        let current = |field: &Field| -> String {
            match values.get(&field.name) {
                Some(v) => v.clone(),
                None if is_new => options
                    .form_defaults
                    .get(&field.name)
                    .cloned()
                    .unwrap_or_default(),
                None => String::new(),
            }
        };

        let rows = table
            .fields()
            .iter()
            .filter(|f| !f.is_key())
            .filter(|f| !options.form_hidden_fields.contains(&f.name))
            .map(|field| {
                let value = current(field);
                let widget = if options.is_editable(&field.name) {
                    widget_for(field, &value, values, id, lookups)
                } else {
                    FormWidget::ReadOnly {
                        text: read_only_text(field, &value, lookups),
                        write_through: options
                            .is_write_through(&field.name)
                            .then(|| options.form_defaults.get(&field.name).cloned())
                            .flatten(),
                    }
                };
                FormRow {
                    name: field.name.clone(),
                    label: field.label.clone(),
                    widget,
                }
            })
            .collect();

        Self {
            table: table.name.clone(),
            id,
            key_name: key.name.clone(),
            key_label: key.label.clone(),
            key_value: id.map(|id| id.to_string()).unwrap_or_default(),
            show_key: options.form_show_keys,
            editable: options.is_editable(&key.name),
            rows,
        }
    }

    pub fn row(&self, name: &str) -> Option<&FormRow> {
        self.rows.iter().find(|r| r.name == name)
    }
}
