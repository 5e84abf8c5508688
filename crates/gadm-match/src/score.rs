//! String similarity scoring for place names.
//!
//! The default scorer is a token-set measure: both strings are split into
//! word sets, so word order does not matter and a name carrying an extra
//! qualifier ("New York City") still scores 100 against the bare name
//! ("New York"). Character-level comparison uses the Indel distance from
//! `rapidfuzz`.
//!
//! Scores are truncated to whole percent, never rounded up, so an integer
//! threshold accepts exactly the candidates whose exact similarity reaches
//! it: 66.7 is reported as 66 and fails a threshold of 67.

use std::borrow::Cow;
use std::collections::BTreeSet;

use gadm_model::TokenNormalization;
use rapidfuzz::distance::indel;

/// Scores how similar two strings are, from 0 (unrelated) to 100 (same).
///
/// Implementations must be deterministic and free of side effects.
pub trait SimilarityScorer: Send + Sync {
    fn score(&self, query: &str, candidate: &str) -> u8;
}

/// Token-set similarity, tolerant of word reordering and subset containment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenSetScorer {
    normalization: TokenNormalization,
}

impl TokenSetScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_normalization(normalization: TokenNormalization) -> Self {
        Self { normalization }
    }

    pub fn normalization(&self) -> TokenNormalization {
        self.normalization
    }

    fn prepare<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        match self.normalization {
            TokenNormalization::None => Cow::Borrowed(raw),
            TokenNormalization::Processed => Cow::Owned(process(raw)),
        }
    }
}

impl SimilarityScorer for TokenSetScorer {
    fn score(&self, query: &str, candidate: &str) -> u8 {
        token_set_ratio(&self.prepare(query), &self.prepare(candidate))
    }
}

/// Token-set ratio of two strings, 0 to 100, truncated to a whole percent.
///
/// Empty against empty scores 100; empty against anything else scores 0.
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    match (tokens_a.is_empty(), tokens_b.is_empty()) {
        (true, true) => return 100,
        (true, false) | (false, true) => return 0,
        (false, false) => {}
    }

    let intersection = join_tokens(tokens_a.intersection(&tokens_b));
    let diff_ab = join_tokens(tokens_a.difference(&tokens_b));
    let diff_ba = join_tokens(tokens_b.difference(&tokens_a));

    // One side's words all appear in the other.
    if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100;
    }

    let combined_ab = join_parts(&intersection, &diff_ab);
    let combined_ba = join_parts(&intersection, &diff_ba);

    ratio(&intersection, &combined_ab)
        .max(ratio(&intersection, &combined_ba))
        .max(ratio(&combined_ab, &combined_ba))
}

/// Lowercase and replace every non-alphanumeric character with a space.
pub fn process(raw: &str) -> String {
    raw.chars()
        .map(|ch| if ch.is_alphanumeric() { ch } else { ' ' })
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

/// Indel similarity in whole percent, computed in integers so the floor is
/// exact.
fn ratio(a: &str, b: &str) -> u8 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 100;
    }
    let distance = indel::distance(a.chars(), b.chars()).min(total);
    let percent = (total - distance) * 100 / total;
    u8::try_from(percent).unwrap_or(100)
}

fn join_tokens<'a>(tokens: impl Iterator<Item = &'a &'a str>) -> String {
    tokens.copied().collect::<Vec<_>>().join(" ")
}

fn join_parts(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (false, true) => head.to_string(),
        (false, false) => format!("{head} {tail}"),
    }
}
