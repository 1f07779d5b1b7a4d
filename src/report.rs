//! Pure reductions over the aggregated dataset: frequency tables.

use crate::aggregate::CorpusEntry;
use std::collections::BTreeMap;

/// Tally of users by retained-comment count, keyed and sorted ascending by
/// that count.
pub fn by_comment_count(retained_counts: &[usize]) -> BTreeMap<usize, u64> {
    let mut table = BTreeMap::new();
    for &n in retained_counts {
        *table.entry(n).or_insert(0) += 1;
    }
    table
}

/// Tally of dataset rows per birth year, dense over the inclusive range:
/// every year in `[year_from, year_to]` gets an entry, zero-filled,
/// ascending. Years outside the range cannot occur in a dataset built with
/// the same bounds and are ignored.
pub fn by_birth_year(entries: &[CorpusEntry], year_from: i32, year_to: i32) -> BTreeMap<i32, u64> {
    let mut table: BTreeMap<i32, u64> = (year_from..=year_to).map(|y| (y, 0)).collect();
    for e in entries {
        if let Some(slot) = table.get_mut(&e.user.year) {
            *slot += 1;
        }
    }
    table
}
