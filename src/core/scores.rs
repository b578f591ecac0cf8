//! Score index built from a JSON Lines file.

use crate::core::error::MergeError;
use crate::core::output::compact_line;
use crate::core::record::{ID_FIELD, Record, RecordKey, json_kind};
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Score records keyed by `id`. Read-only once built.
#[derive(Debug, Default)]
pub struct ScoreIndex {
    scores: HashMap<RecordKey, Record>,
    duplicates: usize,
}

impl ScoreIndex {
    /// Insert a score record. A later record for the same id replaces the earlier one.
    pub fn insert(&mut self, key: RecordKey, record: Record) {
        if self.scores.insert(key, record).is_some() {
            self.duplicates += 1;
        }
    }

    pub fn get(&self, key: &RecordKey) -> Option<&Record> {
        self.scores.get(key)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Number of records that replaced an earlier record with the same id.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

pub fn load_score_index(path: &Path) -> Result<ScoreIndex, MergeError> {
    let file = File::open(path).map_err(|e| MergeError::io(path, e))?;
    build_score_index(BufReader::new(file), path)
}

/// Build the index from JSON Lines. Blank lines are skipped; anything else
/// must be one JSON object carrying an `id`.
pub fn build_score_index<R: BufRead>(reader: R, path: &Path) -> Result<ScoreIndex, MergeError> {
    let mut index = ScoreIndex::default();

    for (offset, line) in reader.lines().enumerate() {
        let line_no = offset + 1;
        let line = line.map_err(|e| MergeError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }

        let parse_err = |message: String| MergeError::Parse {
            path: path.to_path_buf(),
            line: Some(line_no),
            message,
        };

        let value: Value = serde_json::from_str(&line)
            .map_err(|e| parse_err(format!("{} (near '{}')", e, compact_line(&line, 60))))?;
        let record = match value {
            Value::Object(record) => record,
            other => {
                return Err(parse_err(format!(
                    "expected a score object, found {}",
                    json_kind(&other)
                )));
            }
        };

        let key = RecordKey::of(&record).ok_or_else(|| MergeError::MissingKey {
            key: ID_FIELD.to_string(),
            context: format!("{} line {}", path.display(), line_no),
        })?;
        index.insert(key, record);
    }

    Ok(index)
}
