//! Lexical feature extraction over normalized comments.

use serde::{Deserialize, Serialize};

use crate::tokenize::{split_sentences, wordpunct_tokens};

/// The closed set of stylometric features computed from one comment.
///
/// Counts are integral in per-comment vectors and fractional after per-user
/// averaging, so every feature is carried as `f64`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub sent_cnt: f64,
    pub char_cnt: f64,
    pub char_cnt_sent: f64,
    pub word_cnt: f64,
    pub word_cnt_sent: f64,
    pub word_len_avg: f64,
    pub punct_cnt: f64,
    pub punct_cnt_sent: f64,
    pub punct_cnt_word: f64,
    pub punct_cnt_char: f64,
}

impl FeatureVector {
    /// Features that make it into the flat tabular projection. The raw
    /// counts (`sent_cnt`, `char_cnt`, `word_cnt`, `punct_cnt`) are
    /// intermediate and excluded.
    pub const EXPORTED: [&'static str; 6] = [
        "char_cnt_sent",
        "word_cnt_sent",
        "word_len_avg",
        "punct_cnt_sent",
        "punct_cnt_word",
        "punct_cnt_char",
    ];

    /// Values in the same order as [`FeatureVector::EXPORTED`].
    pub fn exported_values(&self) -> [f64; 6] {
        [
            self.char_cnt_sent,
            self.word_cnt_sent,
            self.word_len_avg,
            self.punct_cnt_sent,
            self.punct_cnt_word,
            self.punct_cnt_char,
        ]
    }

    /// Element-wise arithmetic mean over `samples`, folded into a fresh
    /// vector (no sample is aliased as the accumulator).
    ///
    /// Panics on an empty slice; callers gate on retained-comment count
    /// before averaging.
    pub fn mean(samples: &[FeatureVector]) -> FeatureVector {
        assert!(!samples.is_empty(), "mean() requires at least one sample");
        let n = samples.len() as f64;
        let mut acc = FeatureVector::default();
        for s in samples {
            acc.sent_cnt += s.sent_cnt;
            acc.char_cnt += s.char_cnt;
            acc.char_cnt_sent += s.char_cnt_sent;
            acc.word_cnt += s.word_cnt;
            acc.word_cnt_sent += s.word_cnt_sent;
            acc.word_len_avg += s.word_len_avg;
            acc.punct_cnt += s.punct_cnt;
            acc.punct_cnt_sent += s.punct_cnt_sent;
            acc.punct_cnt_word += s.punct_cnt_word;
            acc.punct_cnt_char += s.punct_cnt_char;
        }
        acc.sent_cnt /= n;
        acc.char_cnt /= n;
        acc.char_cnt_sent /= n;
        acc.word_cnt /= n;
        acc.word_cnt_sent /= n;
        acc.word_len_avg /= n;
        acc.punct_cnt /= n;
        acc.punct_cnt_sent /= n;
        acc.punct_cnt_word /= n;
        acc.punct_cnt_char /= n;
        acc
    }
}

/// Compute the feature vector for a normalized, non-empty comment.
///
/// An empty input here is an upstream bug (normalization returns `None` for
/// such comments), so this fails fast rather than guessing.
pub fn extract(text: &str) -> FeatureVector {
    assert!(!text.trim().is_empty(), "extract() called on empty text");

    // Character count is taken from the normalized string itself, up front,
    // not reconstructed from tokens.
    let char_cnt = text.chars().count() as f64;

    let mut sent_cnt = 0u64;
    let mut word_cnt = 0u64;
    let mut punct_cnt = 0u64;
    let mut word_len = 0u64;

    for sentence in split_sentences(text.trim()) {
        sent_cnt += 1;
        for token in wordpunct_tokens(sentence) {
            if token.chars().all(|c| c.is_ascii_punctuation()) {
                punct_cnt += 1;
            } else {
                word_cnt += 1;
                word_len += token.chars().count() as u64;
            }
        }
    }

    let sents = sent_cnt as f64;
    let words = word_cnt as f64;
    let puncts = punct_cnt as f64;
    FeatureVector {
        sent_cnt: sents,
        char_cnt,
        char_cnt_sent: char_cnt / sents,
        word_cnt: words,
        word_cnt_sent: words / sents,
        word_len_avg: if word_cnt > 0 { word_len as f64 / words } else { 0.0 },
        punct_cnt: puncts,
        punct_cnt_sent: puncts / sents,
        punct_cnt_word: if word_cnt > 0 { puncts / words } else { 0.0 },
        punct_cnt_char: puncts / char_cnt,
    }
}
