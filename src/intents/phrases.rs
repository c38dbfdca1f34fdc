// Candidate phrase extraction from a single post.

use crate::text::{tokenize, FrequencyCounter};

/// Phrases kept per post.
pub const MAX_PHRASES_PER_POST: usize = 5;

/// The `limit` most frequent bigrams and trigrams of `text`, highest count
/// first, ties ascending.
pub fn extract_phrases(text: &str, limit: usize) -> Vec<String> {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return Vec::new();
    }

    let counts: FrequencyCounter = tokens
        .windows(2)
        .chain(tokens.windows(3))
        .map(|window| window.join(" "))
        .collect();

    let mut ranked: Vec<(&str, u32)> = counts.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    ranked
        .into_iter()
        .take(limit)
        .map(|(phrase, _)| phrase.to_string())
        .collect()
}
