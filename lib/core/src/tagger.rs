//! Frequency-based keyword extraction.
//!
//! Tags are exact lowercased tokens ranked by frequency; no stemming or
//! lemmatization. The stopword set is small and hardcoded on purpose.

use std::sync::LazyLock;

use ahash::AHashMap;
use regex::Regex;

/// Runs of 3+ alphabetic characters; shorter runs are noise.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z]{3,}").expect("valid token regex"));

const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "that", "this", "you", "but", "are", "was", "from", "have",
    "not", "they", "your", "all", "any",
];

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

/// Extract up to `top_k` keyword tags from `text`.
///
/// Tokens are lowercased, stopwords dropped, and the result is ordered by
/// descending frequency with ties broken by first occurrence in the token
/// stream. Empty or all-stopword text yields an empty vec.
pub fn extract_keywords(text: &str, top_k: usize) -> Vec<String> {
    // (count, first position) per token; position breaks frequency ties
    let mut counts: AHashMap<String, (usize, usize)> = AHashMap::new();
    let mut position = 0usize;

    for m in TOKEN_RE.find_iter(text) {
        let word = m.as_str().to_lowercase();
        if is_stopword(&word) {
            continue;
        }
        counts
            .entry(word)
            .and_modify(|(count, _)| *count += 1)
            .or_insert((1, position));
        position += 1;
    }

    let mut ranked: Vec<(String, (usize, usize))> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));

    ranked.into_iter().take(top_k).map(|(word, _)| word).collect()
}
