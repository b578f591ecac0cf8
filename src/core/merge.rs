//! Whole-run orchestration: index scores, load records, join, write CSV.

use crate::core::enrich::{derive_schema, enrich_record};
use crate::core::error::MergeError;
use crate::core::export::CsvSink;
use crate::core::output::Reporter;
use crate::core::record::load_base_records;
use crate::core::scores::load_score_index;
use serde::Serialize;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// JSON document holding the base records.
    pub input: PathBuf,
    /// JSON Lines file holding one score record per line.
    pub scores: PathBuf,
    /// CSV destination, created or truncated.
    pub output: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    pub scores_loaded: usize,
    pub records_loaded: usize,
    pub matched: usize,
    pub duplicate_score_ids: usize,
    pub records_with_dropped_fields: usize,
}

impl MergeSummary {
    /// Summary printed by `--format json`: envelope header, the summary
    /// fields, `total` and the output path.
    pub fn envelope(&self, output: &Path) -> Result<Value, MergeError> {
        let mut envelope = json!({
            "envelope_version": "1.0.0",
            "cmd": "merge",
            "status": "ok",
        });
        if let (Some(obj), Value::Object(fields)) =
            (envelope.as_object_mut(), serde_json::to_value(self)?)
        {
            obj.extend(fields);
            obj.insert("total".to_string(), json!(self.records_loaded));
            obj.insert("output".to_string(), json!(output.display().to_string()));
        }
        Ok(envelope)
    }
}

pub fn merge_files(opts: &MergeOptions, reporter: &Reporter) -> Result<MergeSummary, MergeError> {
    reporter.milestone(&format!("Loading scores from {}...", opts.scores.display()));
    let scores = load_score_index(&opts.scores)?;
    reporter.milestone(&format!("Loaded {} scored records", scores.len()));
    if scores.duplicates() > 0 {
        reporter.note(&format!(
            "{} score lines repeated an earlier id; the last one was kept",
            scores.duplicates()
        ));
    }

    reporter.milestone(&format!("Loading records from {}...", opts.input.display()));
    let records = load_base_records(&opts.input)?;
    reporter.milestone(&format!("Loaded {} records", records.len()));

    let schema = derive_schema(&records);
    reporter.milestone(&format!("Writing enriched CSV to {}...", opts.output.display()));
    let mut sink = CsvSink::create(&opts.output, schema)?;

    let mut summary = MergeSummary {
        scores_loaded: scores.len(),
        records_loaded: records.len(),
        duplicate_score_ids: scores.duplicates(),
        ..MergeSummary::default()
    };
    for (index, record) in records.iter().enumerate() {
        let row = enrich_record(record, index, &scores)?;
        if row.matched {
            summary.matched += 1;
        }
        if row.has_fields_outside(sink.schema()) {
            summary.records_with_dropped_fields += 1;
        }
        sink.write_row(&row)?;
    }
    sink.finish()?;

    if summary.records_with_dropped_fields > 0 {
        reporter.note(&format!(
            "{} records had fields missing from the header; those fields were dropped",
            summary.records_with_dropped_fields
        ));
    }
    reporter.done(summary.matched, summary.records_loaded);
    Ok(summary)
}
