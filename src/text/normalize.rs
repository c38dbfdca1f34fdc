// Lowercasing, punctuation folding, stopword-aware tokenization and
// n-token shingles.
//
// Everything here is a pure function of its input. Only ASCII letters and
// digits survive normalization; every other run of characters (punctuation,
// whitespace, non-ASCII letters) collapses into a single space.

use std::collections::HashSet;

/// Maximum length of an intent tag name, in characters.
pub const MAX_TAG_LENGTH: usize = 32;

/// Words dropped by `tokenize`. Kept deliberately small: titles and snippets
/// are short, and aggressive stopword lists erase the phrases we care about.
const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "for", "to", "in", "of", "on", "with", "by", "from", "is",
    "are", "be", "as", "at", "it", "this", "that", "these", "those", "your", "you",
];

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// Lowercase `text`, collapse every non-alphanumeric run to one space, trim.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_space = false;

    for ch in lowered.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        } else {
            pending_space = true;
        }
    }

    out
}

/// Normalize, split on spaces and drop stopwords.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|token| !token.is_empty() && !is_stopword(token))
        .map(str::to_string)
        .collect()
}

/// Contiguous `size`-token windows joined by a space.
///
/// When the text has fewer than `size` tokens the token set itself is
/// returned, so the result is only empty for text with no tokens at all.
pub fn shingles(text: &str, size: usize) -> HashSet<String> {
    let tokens = tokenize(text);
    let size = size.max(1);

    if tokens.len() < size {
        return tokens.into_iter().collect();
    }

    tokens.windows(size).map(|window| window.join(" ")).collect()
}

/// Truncate a tag name to at most `max_len` characters.
pub fn limit_tag_length(tag: &str, max_len: usize) -> String {
    tag.chars().take(max_len).collect()
}
