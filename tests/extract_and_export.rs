#[path = "common/mod.rs"]
mod common;

use common::*;
use serde_json::json;
use std::collections::BTreeMap;
use styletl::{
    aggregate, read_dataset_json, write_dataset_csv, write_dataset_json, write_distribution_csv,
    AggregateCfg,
};

fn small_corpus() -> styletl::Corpus {
    let users = serde_json::from_value(json!({
        "1": {"id": 1, "bdate": "1.1.1990", "sex": 2, "has_photo": 1, "university": 5}
    }))
    .unwrap();
    let comments = serde_json::from_value(json!({
        "1": ["Plain words here.", "Another line of text!"]
    }))
    .unwrap();
    aggregate(&users, &comments, &AggregateCfg { min_comments: 2, ..Default::default() })
}

/// The flat projection carries user columns plus the derived ratios only:
/// raw counts never appear.
#[test]
fn csv_header_excludes_raw_counts() {
    let corpus = small_corpus();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("csv_data.csv");
    write_dataset_csv(&corpus.entries, &out, 64 * 1024).unwrap();

    let rows = read_csv_rows(&out);
    assert_eq!(
        rows[0],
        vec![
            "u_id",
            "u_sex",
            "u_photo",
            "u_uni",
            "u_year",
            "f_char_cnt_sent",
            "f_word_cnt_sent",
            "f_word_len_avg",
            "f_punct_cnt_sent",
            "f_punct_cnt_word",
            "f_punct_cnt_char",
        ]
    );
    for excluded in ["f_char_cnt", "f_word_cnt", "f_sent_cnt", "f_punct_cnt"] {
        assert!(!rows[0].iter().any(|c| c == excluded), "{excluded} leaked into the CSV");
    }
    // one data row per entry, plus the header
    assert_eq!(rows.len(), corpus.entries.len() + 1);
}

#[test]
fn csv_rows_carry_user_columns() {
    let corpus = small_corpus();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("csv_data.csv");
    write_dataset_csv(&corpus.entries, &out, 64 * 1024).unwrap();

    let rows = read_csv_rows(&out);
    let first = &rows[1];
    assert_eq!(&first[..5], ["1", "2", "1", "1", "1990"]);
}

#[test]
fn distribution_csv_is_two_sorted_columns() {
    let mut table = BTreeMap::new();
    table.insert(10usize, 4u64);
    table.insert(12usize, 1u64);
    table.insert(11usize, 2u64);

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("by_comments_count.csv");
    write_distribution_csv(&table, &out, 64 * 1024).unwrap();

    let rows = read_csv_rows(&out);
    assert_eq!(rows, vec![vec!["10", "4"], vec!["11", "2"], vec!["12", "1"]]);
}

#[test]
fn dataset_json_round_trips() {
    let corpus = small_corpus();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("preprocessed_data.json");

    write_dataset_json(&corpus.entries, &out, 64 * 1024).unwrap();
    let back = read_dataset_json(&out, 64 * 1024).unwrap();
    assert_eq!(back, corpus.entries);
}

/// Dump documents survive both storage encodings.
#[test]
fn dump_reads_plain_and_zstd() {
    let doc = json!({
        "users": {"1": {"id": 1, "bdate": "1.1.1990"}},
        "data": {"1": ["Some comment text."]}
    });

    let dir = tempfile::tempdir().unwrap();
    let plain = dir.path().join("data_plain.json");
    let packed = dir.path().join("data_packed.json.zst");
    write_dump_json(&plain, &doc);
    write_dump_zst(&packed, &doc);

    let a = styletl::Dump::read(&plain, 64 * 1024).unwrap();
    let b = styletl::Dump::read(&packed, 64 * 1024).unwrap();
    assert_eq!(a.users.len(), 1);
    assert_eq!(a.users.len(), b.users.len());
    assert_eq!(a.data["1"], b.data["1"]);
}

#[test]
fn dump_write_read_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data_rt.json.zst");

    let mut dump = styletl::Dump::default();
    dump.users.insert("7".into(), json!({"id": 7, "bdate": "2.3.1988"}));
    dump.data.insert("7".into(), json!(["Round trip text."]));
    dump.write(&path, 64 * 1024).unwrap();

    let back = styletl::Dump::read(&path, 64 * 1024).unwrap();
    assert_eq!(back.users["7"], dump.users["7"]);
    assert_eq!(back.data["7"], dump.data["7"]);
}

#[test]
fn discover_dumps_filters_and_sorts() {
    let dir = tempfile::tempdir().unwrap();
    let doc = json!({"users": {}, "data": {}});
    write_dump_json(&dir.path().join("data_b.json"), &doc);
    write_dump_zst(&dir.path().join("data_a.json.zst"), &doc);
    write_dump_json(&dir.path().join("notes.json"), &doc);
    write_dump_json(&dir.path().join("data_bad.txt"), &doc);

    let found = styletl::discover_dumps(dir.path());
    let names: Vec<String> = found
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["data_a.json.zst", "data_b.json"]);
}
