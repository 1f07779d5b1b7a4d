use serde_json::json;
use std::collections::BTreeMap;
use styletl::{aggregate, by_birth_year, by_comment_count, AggregateCfg};

#[test]
fn comment_count_tally_sorted_ascending() {
    let table = by_comment_count(&[12, 10, 12, 37, 10, 12]);
    let pairs: Vec<(usize, u64)> = table.into_iter().collect();
    assert_eq!(pairs, vec![(10, 2), (12, 3), (37, 1)]);
}

#[test]
fn comment_count_tally_empty_input() {
    assert!(by_comment_count(&[]).is_empty());
}

/// The birth-year table is dense: every year in the inclusive range gets an
/// entry, zero counts included, no gaps, ascending.
#[test]
fn birth_year_table_is_dense_and_ordered() {
    let users = serde_json::from_value(json!({
        "1": {"id": 1, "bdate": "1.1.1990"},
        "2": {"id": 2, "bdate": "2.2.1992"}
    }))
    .unwrap();
    let comments = serde_json::from_value(json!({
        "1": ["Some words here.", "More words here."],
        "2": ["Other words here."]
    }))
    .unwrap();
    let cfg = AggregateCfg { min_comments: 1, ..Default::default() };
    let corpus = aggregate(&users, &comments, &cfg);

    let table: BTreeMap<i32, u64> = by_birth_year(&corpus.entries, 1989, 1993);
    let years: Vec<i32> = table.keys().copied().collect();
    assert_eq!(years, vec![1989, 1990, 1991, 1992, 1993]);

    assert_eq!(table[&1989], 0);
    assert_eq!(table[&1990], 2); // one row per retained comment
    assert_eq!(table[&1991], 0);
    assert_eq!(table[&1992], 1);
    assert_eq!(table[&1993], 0);
}

#[test]
fn birth_year_counts_rows_not_users() {
    let users = serde_json::from_value(json!({
        "1": {"id": 1, "bdate": "1.1.1990"}
    }))
    .unwrap();
    let comments = serde_json::from_value(json!({
        "1": ["First comment text.", "Second comment text.", "Third comment text."]
    }))
    .unwrap();

    // Averaged: one row per user, so one count for the year.
    let avg = AggregateCfg { min_comments: 3, average: true, ..Default::default() };
    let corpus = aggregate(&users, &comments, &avg);
    assert_eq!(by_birth_year(&corpus.entries, 1990, 1990)[&1990], 1);

    // Per-comment: three rows, three counts.
    let flat = AggregateCfg { min_comments: 3, average: false, ..Default::default() };
    let corpus = aggregate(&users, &comments, &flat);
    assert_eq!(by_birth_year(&corpus.entries, 1990, 1990)[&1990], 3);
}
