use styletl::{extract, normalize_comment, FeatureVector};

/// End-to-end: normalize then extract the canonical example comment.
#[test]
fn extract_example_counts() {
    let clean = normalize_comment("Check this http://x.co now!!! :)", true).unwrap();
    assert_eq!(clean, "Check this now!");

    let f = extract(&clean);
    assert_eq!(f.sent_cnt, 1.0);
    assert_eq!(f.word_cnt, 3.0);
    assert_eq!(f.punct_cnt, 1.0);
    assert_eq!(f.char_cnt, clean.chars().count() as f64);

    assert_eq!(f.char_cnt_sent, f.char_cnt);
    assert_eq!(f.word_cnt_sent, 3.0);
    assert_eq!(f.word_len_avg, (5.0 + 4.0 + 3.0) / 3.0);
    assert_eq!(f.punct_cnt_sent, 1.0);
    assert_eq!(f.punct_cnt_word, 1.0 / 3.0);
    assert_eq!(f.punct_cnt_char, 1.0 / f.char_cnt);
}

#[test]
fn multiple_sentences_are_counted() {
    let f = extract("First one. Second one! Third?");
    assert_eq!(f.sent_cnt, 3.0);
    assert_eq!(f.word_cnt, 6.0);
    assert_eq!(f.punct_cnt, 3.0);
}

/// A period after a known abbreviation keeps the sentence open.
#[test]
fn abbreviations_do_not_split_sentences() {
    let f = extract("See fig. 2 for details.");
    assert_eq!(f.sent_cnt, 1.0);

    let f = extract("Это т.е. одно предложение");
    assert_eq!(f.sent_cnt, 1.0);
}

#[test]
fn single_letter_initials_do_not_split() {
    let f = extract("Written by A. Smith yesterday.");
    assert_eq!(f.sent_cnt, 1.0);
}

/// Non-empty input always yields at least one sentence, even without any
/// terminal punctuation.
#[test]
fn sent_cnt_at_least_one() {
    for s in ["hello", "no terminator here", "...", "! ?"] {
        assert!(extract(s).sent_cnt >= 1.0, "no sentence for {s:?}");
    }
}

/// Ratios over `word_cnt` are zero-guarded; per-sentence ratios are not
/// (they cannot divide by zero).
#[test]
fn word_ratios_zero_when_no_words() {
    let f = extract("! ?");
    assert_eq!(f.word_cnt, 0.0);
    assert_eq!(f.word_len_avg, 0.0);
    assert_eq!(f.punct_cnt_word, 0.0);
    assert!(f.punct_cnt_sent > 0.0);
    assert!(f.punct_cnt_char > 0.0);
}

#[test]
fn word_stats_positive_when_words_present() {
    let f = extract("hello world");
    assert_eq!(f.word_cnt, 2.0);
    assert!(f.word_len_avg > 0.0);
    assert_eq!(f.punct_cnt, 0.0);
}

/// Cyrillic words count characters, not bytes.
#[test]
fn char_counts_are_unicode_aware() {
    let f = extract("Привет мир");
    assert_eq!(f.char_cnt, 10.0);
    assert_eq!(f.word_len_avg, (6.0 + 3.0) / 2.0);
}

/// Element-wise mean over samples; the averaged vector is fresh, inputs are
/// untouched.
#[test]
fn mean_is_element_wise() {
    let a = FeatureVector { char_cnt: 10.0, word_cnt: 2.0, ..Default::default() };
    let b = FeatureVector { char_cnt: 20.0, word_cnt: 4.0, ..Default::default() };
    let m = FeatureVector::mean(&[a, b]);
    assert_eq!(m.char_cnt, 15.0);
    assert_eq!(m.word_cnt, 3.0);
    assert_eq!(m.sent_cnt, 0.0);
    // inputs not aliased as accumulator
    assert_eq!(a.char_cnt, 10.0);
    assert_eq!(b.char_cnt, 20.0);
}

#[test]
#[should_panic]
fn extract_on_empty_text_is_a_contract_error() {
    extract("   ");
}
