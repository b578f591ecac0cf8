//! Base record loading and record identity.

use crate::core::error::MergeError;
use crate::core::output::compact_line;
use serde_json::{Map, Value};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// One JSON object, fields in document order.
pub type Record = Map<String, Value>;

/// Field that identifies a record in both inputs.
pub const ID_FIELD: &str = "id";

/// Join key derived from a record's `id` value.
///
/// The key is the compact JSON text of the value, so the string `"7"` and the
/// number `7` never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey(String);

impl RecordKey {
    pub fn from_value(value: &Value) -> Self {
        RecordKey(value.to_string())
    }

    /// Key of `record`, or `None` when it has no `id` field.
    pub fn of(record: &Record) -> Option<Self> {
        record.get(ID_FIELD).map(Self::from_value)
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Load the base collection: a JSON document whose top level is an array of objects.
pub fn load_base_records(path: &Path) -> Result<Vec<Record>, MergeError> {
    let file = File::open(path).map_err(|e| MergeError::io(path, e))?;
    parse_base_records(BufReader::new(file), path)
}

pub fn parse_base_records<R: Read>(reader: R, path: &Path) -> Result<Vec<Record>, MergeError> {
    let parse_err = |message: String| MergeError::Parse {
        path: path.to_path_buf(),
        line: None,
        message,
    };

    let document: Value = serde_json::from_reader(reader).map_err(|e| parse_err(e.to_string()))?;
    let items = match document {
        Value::Array(items) => items,
        other => {
            return Err(parse_err(format!(
                "top-level value must be an array of records, found {}",
                json_kind(&other)
            )));
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(record) => Ok(record),
            other => Err(parse_err(format!(
                "record {} is {}, not an object: {}",
                index,
                json_kind(&other),
                compact_line(&other.to_string(), 60)
            ))),
        })
        .collect()
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
