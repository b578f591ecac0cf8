//! Column schema and the per-record left join against the score index.

use crate::core::error::MergeError;
use crate::core::flatten::flatten_value;
use crate::core::record::{ID_FIELD, Record, RecordKey};
use crate::core::scores::ScoreIndex;
use serde_json::{Map, Value};

pub const PHOTO_INSERT_SCORE: &str = "photo_insert_score";
pub const PHOTO_INSERT_BUCKET: &str = "photo_insert_bucket";
pub const PHOTO_INSERT_REASONING: &str = "photo_insert_reasoning";
pub const PHOTO_SCORING_PROVIDER: &str = "photo_scoring_provider";
pub const PHOTO_SCORING_MODEL: &str = "photo_scoring_model";
pub const PHOTO_SCORING_PROMPT_VERSION: &str = "photo_scoring_prompt_version";

/// Nested mapping on a score record that carries provenance.
pub const SCORING_METADATA: &str = "scoring_metadata";

/// Derived columns appended after the base fields, in output order.
pub const DERIVED_FIELDS: [&str; 6] = [
    PHOTO_INSERT_SCORE,
    PHOTO_INSERT_BUCKET,
    PHOTO_INSERT_REASONING,
    PHOTO_SCORING_PROVIDER,
    PHOTO_SCORING_MODEL,
    PHOTO_SCORING_PROMPT_VERSION,
];

/// Score fields copied verbatim: (score record field, output column).
const SCORE_FIELD_MAP: [(&str, &str); 3] = [
    (PHOTO_INSERT_SCORE, PHOTO_INSERT_SCORE),
    (PHOTO_INSERT_BUCKET, PHOTO_INSERT_BUCKET),
    (PHOTO_INSERT_REASONING, PHOTO_INSERT_REASONING),
];

/// Metadata fields: (field inside `scoring_metadata`, output column).
const METADATA_FIELD_MAP: [(&str, &str); 3] = [
    ("provider", PHOTO_SCORING_PROVIDER),
    ("model", PHOTO_SCORING_MODEL),
    ("prompt_version", PHOTO_SCORING_PROMPT_VERSION),
];

/// Header for the run: the first record's fields in order, then [`DERIVED_FIELDS`].
pub fn derive_schema(records: &[Record]) -> Vec<String> {
    records
        .first()
        .map(|first| first.keys().cloned().collect::<Vec<_>>())
        .unwrap_or_default()
        .into_iter()
        .chain(DERIVED_FIELDS.iter().map(|f| f.to_string()))
        .collect()
}

/// One output row: every field of the base record plus the derived fields,
/// all coerced to strings.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRow {
    pub cells: Map<String, Value>,
    pub matched: bool,
}

impl EnrichedRow {
    /// Cell for `column`, empty when the row has no such field.
    pub fn cell(&self, column: &str) -> &str {
        self.cells
            .get(column)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Cells in `schema` order.
    pub fn project<'a>(&'a self, schema: &'a [String]) -> impl Iterator<Item = &'a str> + 'a {
        schema.iter().map(|column| self.cell(column))
    }

    /// Whether the row carries fields the header has no column for.
    pub fn has_fields_outside(&self, schema: &[String]) -> bool {
        self.cells.keys().any(|k| !schema.contains(k))
    }
}

/// Left-join `record` against `scores` and flatten every value.
///
/// `index` is the record's position in the base collection and only feeds the
/// error message when the record has no `id`.
pub fn enrich_record(
    record: &Record,
    index: usize,
    scores: &ScoreIndex,
) -> Result<EnrichedRow, MergeError> {
    let key = RecordKey::of(record).ok_or_else(|| MergeError::MissingKey {
        key: ID_FIELD.to_string(),
        context: format!("base record {}", index),
    })?;

    let mut merged = record.clone();
    let scored = scores.get(&key);
    match scored {
        Some(score) => {
            for (source, column) in SCORE_FIELD_MAP {
                merged.insert(column.to_string(), field_or_empty(Some(score), source));
            }
            let metadata = score.get(SCORING_METADATA).and_then(Value::as_object);
            for (source, column) in METADATA_FIELD_MAP {
                merged.insert(column.to_string(), field_or_empty(metadata, source));
            }
        }
        None => {
            for column in DERIVED_FIELDS {
                merged.insert(column.to_string(), Value::String(String::new()));
            }
        }
    }

    let cells = merged
        .into_iter()
        .map(|(k, v)| {
            let flat = flatten_value(&v);
            (k, Value::String(flat))
        })
        .collect();

    Ok(EnrichedRow {
        cells,
        matched: scored.is_some(),
    })
}

fn field_or_empty(source: Option<&Map<String, Value>>, field: &str) -> Value {
    source
        .and_then(|m| m.get(field))
        .cloned()
        .unwrap_or_else(|| Value::String(String::new()))
}
