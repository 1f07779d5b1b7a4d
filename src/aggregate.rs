//! Corpus aggregation: per-user filtering, feature extraction, averaging.

use crate::features::{extract, FeatureVector};
use crate::normalize::normalize_comment;
use crate::profile::{normalize_profile, RawProfile, UserRecord};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Aggregation knobs, copied from `PipelineOptions` at the start of a run.
#[derive(Clone, Debug)]
pub struct AggregateCfg {
    pub min_comments: usize,
    pub year_from: i32,
    pub year_to: i32,
    pub squash_punct: bool,
    pub average: bool,
}

impl Default for AggregateCfg {
    fn default() -> Self {
        Self {
            min_comments: 10,
            year_from: 1957,
            year_to: 2010,
            squash_punct: true,
            average: false,
        }
    }
}

/// One dataset row: a user paired with one comment's features, or with the
/// user's averaged features when averaging is on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub user: UserRecord,
    pub features: FeatureVector,
}

/// Aggregation result: the ordered dataset plus, per emitted user in
/// emission order, how many of their comments survived normalization.
/// Append-only while being built; never mutated afterwards.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Corpus {
    pub entries: Vec<CorpusEntry>,
    pub retained_counts: Vec<usize>,
}

impl Corpus {
    pub fn merge(&mut self, other: Corpus) {
        self.entries.extend(other.entries);
        self.retained_counts.extend(other.retained_counts);
    }
}

/// Build the dataset for one dump.
///
/// Users are visited in the order of the `comments` mapping. Per-user work
/// is independent and runs on the rayon pool; results are collected in index
/// order, so the output is identical to a sequential pass.
pub fn aggregate(
    users: &BTreeMap<String, Value>,
    comments: &BTreeMap<String, Value>,
    cfg: &AggregateCfg,
) -> Corpus {
    let jobs: Vec<(&String, &Value)> = comments.iter().collect();
    let per_user: Vec<Option<(UserRecord, Vec<FeatureVector>)>> = jobs
        .par_iter()
        .map(|(id, raw_comments)| process_user(users.get(*id), id, raw_comments, cfg))
        .collect();

    let mut corpus = Corpus::default();
    for result in per_user {
        let Some((user, feats)) = result else { continue };
        corpus.retained_counts.push(feats.len());
        if cfg.average {
            corpus.entries.push(CorpusEntry {
                user,
                features: FeatureVector::mean(&feats),
            });
        } else {
            for features in feats {
                corpus.entries.push(CorpusEntry {
                    user: user.clone(),
                    features,
                });
            }
        }
    }
    corpus
}

/// Process a single user; `None` means the user contributes no rows.
///
/// Validation rejections (no profile, bad birth data, too few comments) are
/// silent. Shape errors (non-object profile, non-string comment) drop the
/// user with a warning; they never abort the surrounding run.
fn process_user(
    profile: Option<&Value>,
    id: &str,
    raw_comments: &Value,
    cfg: &AggregateCfg,
) -> Option<(UserRecord, Vec<FeatureVector>)> {
    let profile = profile?;
    let raw: RawProfile = match serde_json::from_value(profile.clone()) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(user = id, error = %e, "skipping user: malformed profile");
            return None;
        }
    };
    let user = normalize_profile(id, &raw, &(cfg.year_from..=cfg.year_to))?;

    let list = match raw_comments.as_array() {
        Some(list) => list,
        None => {
            tracing::warn!(user = id, "skipping user: comment list is not an array");
            return None;
        }
    };
    // Cheap pre-filter on the raw count before any text processing.
    if list.len() < cfg.min_comments {
        return None;
    }

    let mut feats = Vec::with_capacity(list.len());
    for c in list {
        let Some(text) = c.as_str() else {
            tracing::warn!(user = id, "skipping user: non-string comment");
            return None;
        };
        if let Some(clean) = normalize_comment(text, cfg.squash_punct) {
            feats.push(extract(&clean));
        }
    }
    // Stricter second filter: only comments that survived normalization
    // count, and averaging needs at least one sample.
    if feats.is_empty() || feats.len() < cfg.min_comments {
        return None;
    }
    Some((user, feats))
}
