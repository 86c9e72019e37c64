//! Two-column (Id, Name) tables for business group and reservation listings.

use crate::types::{ListFormat, Listing};
use serde_json::Value;
use std::borrow::Cow;

/// Column headers of an id/name table.
pub const ID_NAME_HEADERS: [&str; 2] = ["Id", "Name"];

/// An item that can be shown as one row of an id/name table.
pub trait IdName {
    /// Identifier column.
    fn id(&self) -> Cow<'_, str>;
    /// Name column.
    fn name(&self) -> Cow<'_, str>;
}

impl IdName for Value {
    fn id(&self) -> Cow<'_, str> {
        field_text(self, "id")
    }

    fn name(&self) -> Cow<'_, str> {
        field_text(self, "name")
    }
}

fn field_text<'a>(value: &'a Value, key: &str) -> Cow<'a, str> {
    match value.get(key) {
        Some(Value::String(text)) => Cow::Borrowed(text),
        Some(Value::Null) | None => Cow::Borrowed(""),
        Some(other) => Cow::Owned(other.to_string()),
    }
}

/// Render items as a bordered two-column table, one row per item.
#[must_use]
pub fn render_id_name_table<T: IdName>(items: &[T]) -> String {
    let rows: Vec<[Cow<'_, str>; 2]> = items.iter().map(|item| [item.id(), item.name()]).collect();

    let mut widths = ID_NAME_HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = format!("+-{}-+-{}-+\n", "-".repeat(widths[0]), "-".repeat(widths[1]));
    let line = |cells: [&str; 2]| {
        format!(
            "| {:<w0$} | {:<w1$} |\n",
            cells[0],
            cells[1],
            w0 = widths[0],
            w1 = widths[1]
        )
    };

    let mut output = String::new();
    output.push_str(&border);
    output.push_str(&line(ID_NAME_HEADERS));
    output.push_str(&border);
    for row in &rows {
        output.push_str(&line([&*row[0], &*row[1]]));
    }
    output.push_str(&border);
    output
}

/// Shape items into the requested [`ListFormat`].
#[must_use]
pub fn into_listing<T: IdName>(items: Vec<T>, format: ListFormat) -> Listing<T> {
    match format {
        ListFormat::Table => Listing::Table(render_id_name_table(&items)),
        ListFormat::Structured => Listing::Structured(items),
    }
}
