//! Coercion of JSON field values into single CSV cells.

use serde_json::Value;

/// Separator placed between the elements of a list-valued field.
pub const LIST_SEPARATOR: &str = " | ";

/// Render one field value as a CSV cell.
///
/// Lists join their elements with [`LIST_SEPARATOR`], mappings become compact
/// JSON (non-ASCII kept literal), scalars use their natural text and null is
/// the empty string.
pub fn flatten_value(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(render_element)
            .collect::<Vec<_>>()
            .join(LIST_SEPARATOR),
        Value::Object(_) => compact_json(value),
        other => render_scalar(other),
    }
}

fn render_element(value: &Value) -> String {
    match value {
        Value::Array(_) | Value::Object(_) => compact_json(value),
        other => render_scalar(other),
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        nested => compact_json(nested),
    }
}

fn compact_json(value: &Value) -> String {
    // Display on Value is the compact serializer and cannot fail.
    value.to_string()
}
