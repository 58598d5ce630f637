use super::MetricError;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid rouge token regex"));

// Snowball English (Porter2). The classic Porter stemmer used by the Python
// rouge_score package differs on a few stems, e.g. "generously".
static STEMMER: Lazy<Stemmer> = Lazy::new(|| Stemmer::create(Algorithm::English));

/// Precision, recall and F1 of one ROUGE variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub precision: f64,
    pub recall: f64,
    pub fmeasure: f64,
}

impl Score {
    fn new(matches: usize, target_len: usize, prediction_len: usize) -> Self {
        let precision = matches as f64 / prediction_len.max(1) as f64;
        let recall = matches as f64 / target_len.max(1) as f64;
        let fmeasure = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self {
            precision,
            recall,
            fmeasure,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RougeScores {
    pub rouge1: Score,
    pub rouge2: Score,
    #[serde(rename = "rougeL")]
    pub rouge_l: Score,
}

/// ROUGE-1, ROUGE-2 and ROUGE-L of `prediction` against `target`, with stemming.
pub fn rouge_scores(target: &str, prediction: &str) -> Result<RougeScores, MetricError> {
    let target_tokens = tokenize(target);
    if target_tokens.is_empty() {
        return Err(MetricError::NoTokens("reference"));
    }
    let prediction_tokens = tokenize(prediction);
    if prediction_tokens.is_empty() {
        return Err(MetricError::NoTokens("summary"));
    }

    Ok(RougeScores {
        rouge1: rouge_n(&target_tokens, &prediction_tokens, 1),
        rouge2: rouge_n(&target_tokens, &prediction_tokens, 2),
        rouge_l: rouge_l(&target_tokens, &prediction_tokens),
    })
}

/// Lowercase, keep `[a-z0-9]` runs, stem words longer than three characters.
fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    NON_ALPHANUMERIC
        .split(&lowered)
        .filter(|t| !t.is_empty())
        .map(|t| {
            if t.len() > 3 {
                STEMMER.stem(t).into_owned()
            } else {
                t.to_string()
            }
        })
        .collect()
}

fn ngram_counts(tokens: &[String], n: usize) -> HashMap<&[String], usize> {
    let mut counts = HashMap::new();
    for window in tokens.windows(n) {
        *counts.entry(window).or_insert(0) += 1;
    }
    counts
}

fn rouge_n(target: &[String], prediction: &[String], n: usize) -> Score {
    let target_ngrams = ngram_counts(target, n);
    let prediction_ngrams = ngram_counts(prediction, n);

    let overlap: usize = target_ngrams
        .iter()
        .map(|(gram, count)| (*count).min(prediction_ngrams.get(gram).copied().unwrap_or(0)))
        .sum();

    Score::new(
        overlap,
        target_ngrams.values().sum(),
        prediction_ngrams.values().sum(),
    )
}

fn rouge_l(target: &[String], prediction: &[String]) -> Score {
    Score::new(lcs_len(target, prediction), target.len(), prediction.len())
}

/// Longest common subsequence length, two-row dynamic programming.
fn lcs_len(a: &[String], b: &[String]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for x in a {
        for (j, y) in b.iter().enumerate() {
            curr[j + 1] = if x == y {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_identical_text_scores_one() {
        let text = "Transformers summarize scientific papers with surprising accuracy.";
        let scores = rouge_scores(text, text).unwrap();
        for score in [scores.rouge1, scores.rouge2, scores.rouge_l] {
            assert!((score.fmeasure - 1.0).abs() < 1e-9);
            assert!((score.precision - 1.0).abs() < 1e-9);
            assert!((score.recall - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_tokenize_normalizes() {
        assert_eq!(
            tokenize("The Models, running!"),
            vec!["the", "model", "run"]
        );
    }

    #[test]
    fn test_stemmer_is_porter2() {
        // Classic Porter would reduce this to "gener".
        assert_eq!(tokenize("generously"), vec!["generous"]);
    }

    #[test]
    fn test_stemming_matches_inflections() {
        let scores = rouge_scores("models running", "model runs").unwrap();
        assert!((scores.rouge1.fmeasure - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rouge_n_partial_overlap() {
        let target = tokens(&["the", "cat", "sat", "on", "the", "mat"]);
        let prediction = tokens(&["the", "cat", "lay", "on", "a", "mat"]);
        let r1 = rouge_n(&target, &prediction, 1);
        // the, cat, on, mat
        assert!((r1.precision - 4.0 / 6.0).abs() < 1e-9);
        assert!((r1.recall - 4.0 / 6.0).abs() < 1e-9);
        let r2 = rouge_n(&target, &prediction, 2);
        // "the cat"
        assert!((r2.precision - 1.0 / 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_rouge_n_clips_repeats() {
        let target = tokens(&["the", "cat"]);
        let prediction = tokens(&["the", "the", "the"]);
        let r1 = rouge_n(&target, &prediction, 1);
        assert!((r1.precision - 1.0 / 3.0).abs() < 1e-9);
        assert!((r1.recall - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_rouge_l_uses_subsequence() {
        let target = tokens(&["a", "b", "c", "d"]);
        let prediction = tokens(&["a", "x", "c", "d", "y"]);
        assert_eq!(lcs_len(&target, &prediction), 3);
        let score = rouge_l(&target, &prediction);
        assert!((score.recall - 0.75).abs() < 1e-9);
        assert!((score.precision - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_no_overlap_is_zero() {
        let scores = rouge_scores("alpha beta", "gamma delta").unwrap();
        assert_eq!(scores.rouge1, Score::default());
        assert_eq!(scores.rouge_l.fmeasure, 0.0);
    }

    #[test]
    fn test_rouge2_single_token_inputs() {
        let scores = rouge_scores("cat", "cat").unwrap();
        assert_eq!(scores.rouge2, Score::default());
        assert!((scores.rouge1.fmeasure - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_inputs_error() {
        assert!(matches!(
            rouge_scores("", "text"),
            Err(MetricError::NoTokens("reference"))
        ));
        assert!(matches!(
            rouge_scores("text", "!!!"),
            Err(MetricError::NoTokens("summary"))
        ));
    }
}
