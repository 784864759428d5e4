//! HTML rendering of list and form views.
//!
//! Output is a fragment meant to be embedded in a page. Every value coming
//! from storage or the request is escaped; element classes (`zx_lst`,
//! `zx_frm`, `zx_err`, `zx_wrn`, `zx_pgs`, `zx_fnd`, `zx_add`) are the
//! styling hooks.

use std::fmt::Write;

use html_escape::{encode_single_quoted_attribute, encode_text};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use super::{Cell, FormView, FormWidget, ListView, View};
use crate::notice::Notice;
use crate::request::{ACTION_PARAM, PAGE_PARAM, SORT_ORDER_PARAM, SORT_PARAM, TARGET_PARAM};
use crate::table::NEW_VALUE_SUFFIX;
use crate::validation::ValidationReport;

const DETAILS: &str = "Details";
const DELETE_SYMBOL: &str = "\u{2718}";
const DELETE_HINT: &str = "Delete Selected Records";
const SAVE: &str = "Save";
const BACK: &str = "Back";
const ADD: &str = "Add";
const SEARCH: &str = "Search";
const RESET: &str = "Reset";
const PAGES: &str = "Pages: ";
const ERROR_HEADER: &str = "Error!";
const WARNING_HEADER: &str = "Warning!";
const ERROR_AT: &str = "Error at Field";
const NOTE_AT: &str = "Data at Field";
const DELETE_FILE: &str = "Delete Existing File";

fn attr(value: &str) -> String {
    encode_single_quoted_attribute(value).into_owned()
}

fn text(value: &str) -> String {
    encode_text(value).replace('\n', "<br />")
}

fn query_value(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

/// Renders the report tables followed by the view.
pub fn render(view: &View, report: &ValidationReport) -> String {
    let mut out = render_report(report);
    match view {
        View::List(list) => out.push_str(&render_list(list)),
        View::Form(form) => out.push_str(&render_form(form)),
    }
    out
}

fn report_table(out: &mut String, class: &str, header: &str, at: &str, entries: &indexmap::IndexMap<String, Vec<Notice>>) {
    let _ = write!(
        out,
        "<table class='{class}'><thead><tr><td colspan='2'>{header}</td></tr></thead><tbody>"
    );
    for (label, notices) in entries {
        for notice in notices {
            let _ = write!(
                out,
                "<tr><td>{at} '{}':</td><td>{}</td></tr>",
                text(label),
                text(&notice.to_string())
            );
        }
    }
    out.push_str("</tbody></table>");
}

/// Error table (`zx_err`) and warning table (`zx_wrn`); empty when both are.
pub fn render_report(report: &ValidationReport) -> String {
    let mut out = String::new();
    if !report.errors.is_empty() {
        report_table(&mut out, "zx_err", ERROR_HEADER, ERROR_AT, &report.errors);
    }
    if !report.warnings.is_empty() {
        report_table(&mut out, "zx_wrn", WARNING_HEADER, NOTE_AT, &report.warnings);
    }
    out
}

/// Query string carrying the search values of a list.
fn search_query(list: &ListView) -> String {
    let mut query = String::new();
    if let Some(fields) = &list.search {
        for field in fields.iter().filter(|f| !f.value.is_empty()) {
            let _ = write!(
                query,
                "&{}={}",
                query_value(&field.name),
                query_value(&field.value)
            );
        }
        if !query.is_empty() {
            query.insert_str(0, &format!("&{ACTION_PARAM}=FIND"));
        }
    }
    query
}

pub fn render_list(list: &ListView) -> String {
    let mut out = String::new();
    let search = search_query(list);
    let sort_query = list
        .sort
        .as_ref()
        .map(|s| {
            format!(
                "&{SORT_PARAM}={}&{SORT_ORDER_PARAM}={}",
                query_value(&s.field),
                u8::from(s.reverse)
            )
        })
        .unwrap_or_default();

    if list.deletable {
        let _ = write!(
            out,
            "<div class='zx_add'><form method='post'><p>\
             <input type='hidden' name='{ACTION_PARAM}' value='VIEW' />\
             <input type='submit' value='{ADD}' /></p></form></div>"
        );
    }

    if let Some(fields) = &list.search {
        let _ = write!(
            out,
            "<form method='get'><p><input type='hidden' name='{ACTION_PARAM}' value='FIND' /></p>\
             <table class='zx_fnd'><tr><th colspan='2'>{SEARCH}</th></tr>"
        );
        for field in fields {
            let _ = write!(
                out,
                "<tr><td>{}</td><td><input type='text' name='{}' value='{}' /></td></tr>",
                text(&field.label),
                attr(&field.name),
                attr(&field.value)
            );
        }
        let _ = write!(
            out,
            "<tr><td><input type='submit' value='{SEARCH}' /></td><td><a href='?'>{RESET}</a></td></tr></table></form>"
        );
    }

    if list.deletable {
        let _ = write!(
            out,
            "<form method='post'><p><input type='hidden' name='{ACTION_PARAM}' value='DELETE' /></p>"
        );
    }
    out.push_str("<table class='zx_lst'><thead><tr>");
    if list.viewable {
        out.push_str("<th> </th>");
    }
    if list.deletable {
        let _ = write!(
            out,
            "<th><input type='submit' value='{DELETE_SYMBOL}' title='{DELETE_HINT}' /></th>"
        );
    }
    for column in &list.columns {
        let current = list.sort.as_ref().filter(|s| s.field == column.name);
        let reverse = current.is_some_and(|s| !s.reverse);
        let _ = write!(
            out,
            "<th><a href='?{SORT_PARAM}={}&amp;{SORT_ORDER_PARAM}={}{}'>{}</a>",
            attr(&query_value(&column.name)),
            u8::from(reverse),
            attr(&search),
            text(&column.label)
        );
        if let Some(sort) = current {
            out.push_str(if sort.reverse { "&nbsp;\u{25BC}" } else { "&nbsp;\u{25B2}" });
        }
        out.push_str("</th>");
    }
    out.push_str("</tr></thead><tbody>");

    for row in &list.rows {
        out.push_str("<tr>");
        if list.viewable {
            let _ = write!(
                out,
                "<td><a href='?{TARGET_PARAM}={}&amp;{ACTION_PARAM}=VIEW'>{DETAILS}</a></td>",
                row.id
            );
        }
        if list.deletable {
            let _ = write!(
                out,
                "<td><input type='checkbox' name='ZX_{}_DEL_{}' /></td>",
                attr(&list.table),
                row.id
            );
        }
        for cell in &row.cells {
            match cell {
                Cell::Text(value) => {
                    let _ = write!(out, "<td>{}</td>", text(value));
                }
                Cell::Image(path) => {
                    let _ = write!(out, "<td><img src='{}' alt='' /></td>", attr(path));
                }
                Cell::File(path) => {
                    let _ = write!(
                        out,
                        "<td><a href='{}' class='zx_att'>{}</a></td>",
                        attr(path),
                        text(path.rsplit('/').next().unwrap_or(path))
                    );
                }
            }
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
    if list.deletable {
        out.push_str("</form>");
    }

    if list.page_count > 0 {
        let _ = write!(out, "<div class='zx_pgs'>{PAGES}");
        for page in 0..list.page_count {
            if page == list.page {
                let _ = write!(out, "<b>{}</b> ", page + 1);
            } else {
                let _ = write!(
                    out,
                    "<a href='?{PAGE_PARAM}={page}{}'>{}</a> ",
                    attr(&format!("{sort_query}{search}")),
                    page + 1
                );
            }
        }
        out.push_str("</div>");
    }
    out
}

fn options_html(out: &mut String, options: &[(u64, String)], selected: &str) {
    for (id, label) in options {
        let mark = if id.to_string() == selected { " selected='selected'" } else { "" };
        let _ = write!(out, "<option value='{id}'{mark}>{}</option>", text(label));
    }
}

fn widget_html(out: &mut String, name: &str, widget: &FormWidget) {
    let name_attr = attr(name);
    match widget {
        FormWidget::Text { value, max_length } => {
            let max = max_length
                .map(|m| format!(" maxlength='{m}'"))
                .unwrap_or_default();
            let _ = write!(
                out,
                "<input type='text' name='{name_attr}' value='{}'{max} />",
                attr(value)
            );
        }
        FormWidget::TextArea { value, rows, cols } => {
            let _ = write!(
                out,
                "<textarea name='{name_attr}' rows='{rows}' cols='{cols}'>{}</textarea>",
                encode_text(value)
            );
        }
        FormWidget::Select {
            options,
            selected,
            new_value,
        } => {
            let _ = write!(out, "<select name='{name_attr}'><option value=''></option>");
            options_html(out, options, selected);
            out.push_str("</select>");
            if let Some(new_value) = new_value {
                let _ = write!(
                    out,
                    " <input type='text' name='{name_attr}{NEW_VALUE_SUFFIX}' value='{}' maxlength='60' />",
                    attr(new_value)
                );
            }
        }
        FormWidget::Radio { options, selected } => {
            for (id, label) in options {
                let mark = if id.to_string() == *selected { " checked='checked'" } else { "" };
                let _ = write!(
                    out,
                    "<label><input type='radio' name='{name_attr}' value='{id}'{mark} />{}</label> ",
                    text(label)
                );
            }
        }
        FormWidget::Checkbox { checked } => {
            let mark = if *checked { " checked='checked'" } else { "" };
            let _ = write!(out, "<input type='checkbox' name='{name_attr}' value='1'{mark} />");
        }
        FormWidget::File { current, image } => {
            if let Some(path) = current {
                if *image {
                    let _ = write!(out, "<img src='{}' alt='' /><br />", attr(path));
                } else {
                    let _ = write!(out, "<a href='{}' class='zx_att'>{}</a><br />", attr(path), text(path));
                }
                let _ = write!(
                    out,
                    "<label><input type='checkbox' name='{name_attr}{NEW_VALUE_SUFFIX}' value='1' />{DELETE_FILE}</label><br />"
                );
            }
            let _ = write!(out, "<input type='file' name='{name_attr}' />");
        }
        FormWidget::ReadOnly {
            text: shown,
            write_through,
        } => {
            out.push_str(&text(shown));
            if let Some(value) = write_through {
                let _ = write!(
                    out,
                    "<input type='hidden' name='{name_attr}' value='{}' />",
                    attr(value)
                );
            }
        }
    }
}

pub fn render_form(form: &FormView) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<div class='zx_frm'><form method='post' enctype='multipart/form-data'>\
         <p><input type='hidden' name='{ACTION_PARAM}' value='VIEW' /></p><table><tbody>"
    );
    if form.show_key {
        let _ = write!(
            out,
            "<tr><th>{}</th><td>{}</td></tr>",
            text(&form.key_label),
            text(&form.key_value)
        );
    }
    for row in &form.rows {
        let _ = write!(out, "<tr><th>{}</th><td>", text(&row.label));
        widget_html(&mut out, &row.name, &row.widget);
        out.push_str("</td></tr>");
    }
    if form.editable {
        let _ = write!(
            out,
            "<tr class='zx_frb'><th colspan='2'>\
             <input type='hidden' name='{}' value='{}' />\
             <input type='submit' value='{SAVE}' /></th></tr>",
            attr(&form.key_name),
            attr(&form.key_value)
        );
    }
    let _ = write!(out, "</tbody></table></form><a href='?'>{BACK}</a></div>");
    out
}
