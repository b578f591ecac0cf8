use scoremerge::core::enrich::DERIVED_FIELDS;
use scoremerge::core::error::MergeError;
use scoremerge::core::merge::{MergeOptions, MergeSummary, merge_files};
use scoremerge::core::output::Reporter;
use std::fs;
use std::path::Path;
use tempfile::{TempDir, tempdir};

fn setup(base: &str, scores: &str) -> (TempDir, MergeOptions) {
    let tmp = tempdir().unwrap();
    let input = tmp.path().join("base.json");
    let scores_path = tmp.path().join("scores.jsonl");
    fs::write(&input, base).unwrap();
    fs::write(&scores_path, scores).unwrap();
    let opts = MergeOptions {
        input,
        scores: scores_path,
        output: tmp.path().join("out.csv"),
    };
    (tmp, opts)
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect()
}

fn header(base: &[&str]) -> Vec<String> {
    base.iter()
        .copied()
        .chain(DERIVED_FIELDS)
        .map(String::from)
        .collect()
}

#[test]
fn test_merge_end_to_end_example() {
    let (_tmp, opts) = setup(
        r#"[{"id": "a1", "title": "x"}, {"id": "b2", "title": "y"}]"#,
        r#"{"id": "a1", "photo_insert_score": 7, "scoring_metadata": {"provider": "acme", "model": "m1", "prompt_version": "v2"}}
"#,
    );

    let summary = merge_files(&opts, &Reporter::silent()).unwrap();
    assert_eq!(
        summary,
        MergeSummary {
            scores_loaded: 1,
            records_loaded: 2,
            matched: 1,
            duplicate_score_ids: 0,
            records_with_dropped_fields: 0,
        }
    );

    let text = fs::read_to_string(&opts.output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "id,title,photo_insert_score,photo_insert_bucket,photo_insert_reasoning,photo_scoring_provider,photo_scoring_model,photo_scoring_prompt_version",
            "a1,x,7,,,acme,m1,v2",
            "b2,y,,,,,,",
        ]
    );
}

#[test]
fn test_empty_base_writes_header_only() {
    let (_tmp, opts) = setup("[]", "{\"id\": \"a1\"}\n");
    let summary = merge_files(&opts, &Reporter::silent()).unwrap();
    assert_eq!(summary.records_loaded, 0);
    assert_eq!(summary.matched, 0);
    assert_eq!(read_rows(&opts.output), vec![header(&[])]);
}

#[test]
fn test_column_order_ignores_which_records_are_scored() {
    let (_tmp, opts) = setup(
        r#"[{"title": "x", "id": "a1", "year": 1970}, {"id": "b2", "title": "y", "year": 1971}]"#,
        "{\"id\": \"b2\", \"photo_insert_bucket\": \"high\"}\n",
    );
    merge_files(&opts, &Reporter::silent()).unwrap();
    let rows = read_rows(&opts.output);
    assert_eq!(rows[0], header(&["title", "id", "year"]));
    assert_eq!(rows[1], vec!["x", "a1", "1970", "", "", "", "", "", ""]);
    assert_eq!(rows[2], vec!["y", "b2", "1971", "", "high", "", "", "", ""]);
}

#[test]
fn test_lists_and_mappings_flatten_into_cells() {
    let (_tmp, opts) = setup(
        r#"[{"id": "a1", "authors": ["Sekula", "Buchloh"], "source": {"archive": "Köln", "box": 3}, "note": "a, \"b\""}]"#,
        "",
    );
    merge_files(&opts, &Reporter::silent()).unwrap();
    let rows = read_rows(&opts.output);
    assert_eq!(rows[1][0], "a1");
    assert_eq!(rows[1][1], "Sekula | Buchloh");
    assert_eq!(rows[1][2], r#"{"archive":"Köln","box":3}"#);
    assert_eq!(rows[1][3], "a, \"b\"");
}

#[test]
fn test_duplicate_score_ids_keep_last() {
    let (_tmp, opts) = setup(
        r#"[{"id": "a1"}]"#,
        "{\"id\": \"a1\", \"photo_insert_score\": 1}\n{\"id\": \"a1\", \"photo_insert_score\": 9}\n",
    );
    let summary = merge_files(&opts, &Reporter::silent()).unwrap();
    assert_eq!(summary.scores_loaded, 1);
    assert_eq!(summary.duplicate_score_ids, 1);
    assert_eq!(read_rows(&opts.output)[1][1], "9");
}

#[test]
fn test_fields_missing_from_first_record_are_dropped() {
    let (_tmp, opts) = setup(
        r#"[{"id": "a1", "title": "x"}, {"id": "b2", "title": "y", "late": "dropped"}]"#,
        "",
    );
    let summary = merge_files(&opts, &Reporter::silent()).unwrap();
    assert_eq!(summary.records_with_dropped_fields, 1);
    let rows = read_rows(&opts.output);
    assert_eq!(rows[0], header(&["id", "title"]));
    assert!(rows.iter().all(|r| r.len() == rows[0].len()));
    assert!(!rows[2].iter().any(|cell| cell == "dropped"));
}

#[test]
fn test_later_record_missing_first_record_field_gets_empty_cell() {
    let (_tmp, opts) = setup(r#"[{"id": "a1", "title": "x"}, {"id": "b2"}]"#, "");
    merge_files(&opts, &Reporter::silent()).unwrap();
    let rows = read_rows(&opts.output);
    assert_eq!(rows[2][..2], ["b2".to_string(), String::new()]);
}

#[test]
fn test_malformed_scores_abort_before_output() {
    let (_tmp, opts) = setup("[]", "{\"id\": \"a1\"}\n{broken\n");
    let err = merge_files(&opts, &Reporter::silent()).unwrap_err();
    assert!(matches!(err, MergeError::Parse { line: Some(2), .. }));
    assert!(!opts.output.exists());
}

#[test]
fn test_base_that_is_not_a_sequence_is_parse_error() {
    let (_tmp, opts) = setup(r#"{"id": "a1"}"#, "");
    let err = merge_files(&opts, &Reporter::silent()).unwrap_err();
    assert!(matches!(err, MergeError::Parse { line: None, .. }));
}

#[test]
fn test_missing_base_id_aborts_and_keeps_written_rows() {
    let (_tmp, opts) = setup(
        r#"[{"id": "a1", "title": "x"}, {"title": "no id"}, {"id": "c3", "title": "z"}]"#,
        "",
    );
    let err = merge_files(&opts, &Reporter::silent()).unwrap_err();
    assert!(matches!(err, MergeError::MissingKey { .. }));
    assert!(err.to_string().contains("base record 1"));

    let rows = read_rows(&opts.output);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][0], "a1");
}

#[test]
fn test_missing_input_is_io_error_naming_path() {
    let (_tmp, mut opts) = setup("[]", "");
    opts.scores = opts.scores.with_file_name("absent.jsonl");
    let err = merge_files(&opts, &Reporter::silent()).unwrap_err();
    assert!(matches!(err, MergeError::Io { .. }));
    assert!(err.to_string().contains("absent.jsonl"));
}

#[test]
fn test_existing_output_is_overwritten() {
    let (_tmp, opts) = setup(r#"[{"id": "a1"}]"#, "");
    fs::write(&opts.output, "stale,content\nmore,stale\nlines,here\n").unwrap();
    merge_files(&opts, &Reporter::silent()).unwrap();
    let rows = read_rows(&opts.output);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], header(&["id"]));
}

#[test]
fn test_integers_beyond_u64_keep_exact_digits_and_identity() {
    let (_tmp, opts) = setup(
        r#"[{"id": 100000000000000000000001, "n": 123456789012345678901234567890}]"#,
        "{\"id\": 100000000000000000000002, \"photo_insert_score\": 9}\n",
    );
    let summary = merge_files(&opts, &Reporter::silent()).unwrap();
    assert_eq!(summary.matched, 0);

    let rows = read_rows(&opts.output);
    assert_eq!(
        rows[1],
        vec![
            "100000000000000000000001",
            "123456789012345678901234567890",
            "",
            "",
            "",
            "",
            "",
            "",
        ]
    );
}
