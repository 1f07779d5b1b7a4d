//! Comment noise removal: reply references, markup, hashtags, links, HTML
//! escapes, repeated whitespace/punctuation, emoticon tokens.
//!
//! The stages are order-sensitive (links must go before whitespace squashing,
//! squashing before the emoticon pass), so `normalize_comment` applies them
//! in one fixed sequence.

use ahash::AHashSet;
use regex::Regex;
use std::sync::LazyLock;

/// Leading reply-to reference: `[id12345|name],` at the start only.
static REFERENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\[id\d+\|\w+\],").unwrap());

/// HTML-like opening/closing tags.
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?\w+[^>]*>").unwrap());

/// Hashtag token, including the whitespace that introduced it.
static HASH_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\s|^)#\w+").unwrap());

/// URL-ish substring: optional scheme and `www.`, a domain-like token
/// (single-letter hosts like `x.co` included), a 2-6 letter top-level
/// label, then an optional path/query tail.
static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(https?://)?(www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-z]{2,6}\b([-a-zA-Z0-9@:%_+.~#?&/=]*)")
        .unwrap()
});

/// HTML numeric/named escape sequences (`&amp;`, `&quot;`, ...).
static ESCAPED_SYMBOLS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&\w+;").unwrap());

/// Any run of 2+ whitespace characters.
static SQUASH_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

const POSITIVE_SMILEYS: &[&str] = &[
    ":-)", ":)", ":D", ":o)", ":]", ":3", ":c)", ":>", "=]", "8)", "=)", ":}", ":^)", ":?)",
    "?", ":-D", "8-D", "8D", "x-D", "xD", "XD", "=3", "B^D", ":-))", ":*", ":^*", ")+", ";-)",
    ";)", "*-)", "*)", ";-]", ";]", ";D", ":-P", ":P", "xp", "XP", ":-p", ":p", "=p",
];
const NEGATIVE_SMILEYS: &[&str] = &[
    ">:[", ":-(", ":(", ":-c", ":c", ":<", ":-[", ":[", ":{", ";(", ":@", ">:(", ":'-(",
    ":'(", "D:", "D8", "D;", ":-.", ":/", ":\\", "=/", "=\\", ":L", "=L", ":S", ">.<",
];
const NEUTRAL_SMILEYS: &[&str] = &[
    ">:O", ":-O", ":O", "O_O", "o-o", "O_o", "o_O", "o_o", "O-O", "Oo", "Оо", "оО", "О_о",
    ":|", ":-|", "<3", "%-)", "%)", ":-&", ":&",
];

/// Case-sensitive emoticon set, matched against whole whitespace-delimited
/// tokens. Covers ASCII conventions plus the Cyrillic "confused" variants.
static SMILEYS: LazyLock<AHashSet<&'static str>> = LazyLock::new(|| {
    POSITIVE_SMILEYS
        .iter()
        .chain(NEGATIVE_SMILEYS)
        .chain(NEUTRAL_SMILEYS)
        .copied()
        .collect()
});

/// Collapse runs of 2+ identical ASCII punctuation characters into one
/// occurrence. The regex crate has no backreferences; a linear scan does.
fn squash_repeated_punct(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    for c in text.chars() {
        if prev == Some(c) && c.is_ascii_punctuation() {
            continue;
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

/// Strip structural noise from one raw comment.
///
/// Returns `None` when nothing usable remains — the caller discards the
/// comment. Pure: no state is shared between calls.
pub fn normalize_comment(raw: &str, squash_punct: bool) -> Option<String> {
    let text = REFERENCE.replace(raw, "").into_owned();
    let text = HTML_TAG.replace_all(&text, "").into_owned();
    let text = HASH_TAG.replace_all(&text, "").into_owned();
    let text = LINK.replace_all(&text, "").into_owned();
    let text = ESCAPED_SYMBOLS.replace_all(&text, "").into_owned();
    let text = SQUASH_SPACE.replace_all(&text, " ").into_owned();
    let text = if squash_punct { squash_repeated_punct(&text) } else { text };
    let text = text.trim();

    // Emoticons are whole tokens by now: spaces are already collapsed.
    let text = text
        .split(' ')
        .filter(|token| !SMILEYS.contains(token))
        .collect::<Vec<_>>()
        .join(" ");

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
