use crate::tokenize;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Cheap stand-ins for a human rating of the generated summary.
///
/// These are raw counts, not validated against human judgment:
/// `readability` is the word count, `coherence` the sentence count and
/// `relevance` the number of distinct whitespace-separated words, compared
/// case- and punctuation-sensitively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanProxyScores {
    pub readability: usize,
    pub coherence: usize,
    pub relevance: usize,
}

pub fn human_proxy_scores(generated: &str) -> HumanProxyScores {
    let words: Vec<&str> = generated.split_whitespace().collect();
    let distinct: HashSet<&str> = words.iter().copied().collect();

    HumanProxyScores {
        readability: words.len(),
        coherence: tokenize::sentences(generated).len(),
        relevance: distinct.len(),
    }
}
