//! Sentence and word/punct tokenizers used by feature extraction.

use ahash::AHashSet;
use regex::Regex;
use std::sync::LazyLock;

/// Run of terminal punctuation, optional trailing closers, then whitespace.
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[.!?…]+[)\]»"']*\s+"#).unwrap());

/// Word-punct convention: a token is either a run of word characters or a
/// run of characters that are neither word characters nor whitespace.
static WORDPUNCT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+|[^\w\s]+").unwrap());

/// Dotted abbreviations that do not close a sentence. Lowercase, stored
/// without the trailing period; mixed Latin/Cyrillic, matching the corpora
/// this pipeline is pointed at.
static ABBREVIATIONS: LazyLock<AHashSet<&'static str>> = LazyLock::new(|| {
    [
        "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "approx", "dept",
        "fig", "no", "e.g", "i.e", "p.s", "a.m", "p.m",
        "г", "гг", "т.е", "т.д", "т.п", "т.к", "др", "пр", "см", "стр", "рис", "табл",
        "им", "ул", "гл", "тыс", "млн",
    ]
    .into_iter()
    .collect()
});

/// Split `text` into sentences at terminal punctuation followed by
/// whitespace. A bare period after a known abbreviation or a single-letter
/// initial does not split. For non-empty (trimmed) input the result always
/// holds at least one sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut last = 0usize;

    for m in SENTENCE_END.find_iter(text) {
        let punct = m.as_str().trim_end_matches(char::is_whitespace);
        if punct == "." && is_non_breaking(&text[..m.start()]) {
            continue;
        }
        let sent = text[last..m.start() + punct.len()].trim();
        if !sent.is_empty() {
            sentences.push(sent);
        }
        last = m.end();
    }

    let tail = text[last..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    if sentences.is_empty() {
        let whole = text.trim();
        if !whole.is_empty() {
            sentences.push(whole);
        }
    }
    sentences
}

/// True when the word ending at a period should keep its sentence open:
/// a single-letter initial ("A. Smith") or a listed abbreviation.
fn is_non_breaking(prefix: &str) -> bool {
    let word = prefix.rsplit(char::is_whitespace).next().unwrap_or("");
    let word = word.trim_start_matches(|c: char| !c.is_alphanumeric());
    if word.is_empty() {
        return false;
    }
    let mut chars = word.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_alphabetic() {
            return true;
        }
    }
    ABBREVIATIONS.contains(word.trim_matches('.').to_lowercase().as_str())
}

/// Word-punct tokens of `text`, in order.
pub fn wordpunct_tokens(text: &str) -> impl Iterator<Item = &str> {
    WORDPUNCT.find_iter(text).map(|m| m.as_str())
}
