use super::MetricError;
use crate::tokenize;
use std::collections::HashMap;

/// Highest n-gram order; each order is weighted `1 / MAX_ORDER`.
const MAX_ORDER: usize = 4;

/// Sentence-level BLEU of `candidate` against a single `reference`.
///
/// Unsmoothed: an order with no matching n-grams contributes the smallest
/// positive float, which drives the score to effectively zero, and a
/// candidate with no unigram matches scores exactly 0.
pub fn bleu_score(reference: &str, candidate: &str) -> Result<f64, MetricError> {
    let reference = tokenize::word_tokens(reference);
    if reference.is_empty() {
        return Err(MetricError::NoTokens("reference"));
    }
    let candidate = tokenize::word_tokens(candidate);
    if candidate.is_empty() {
        return Err(MetricError::NoTokens("summary"));
    }

    let precisions: Vec<(usize, usize)> = (1..=MAX_ORDER)
        .map(|n| modified_precision(&reference, &candidate, n))
        .collect();

    if precisions[0].0 == 0 {
        return Ok(0.0);
    }

    let weight = 1.0 / MAX_ORDER as f64;
    let log_sum: f64 = precisions
        .iter()
        .map(|&(matched, total)| {
            let p = if matched == 0 {
                f64::MIN_POSITIVE
            } else {
                matched as f64 / total as f64
            };
            weight * p.ln()
        })
        .sum();

    Ok(brevity_penalty(reference.len(), candidate.len()) * log_sum.exp())
}

/// Clipped n-gram matches and the candidate n-gram total (at least 1).
fn modified_precision(reference: &[&str], candidate: &[&str], n: usize) -> (usize, usize) {
    let reference_counts = ngram_counts(reference, n);
    let candidate_counts = ngram_counts(candidate, n);

    let matched = candidate_counts
        .iter()
        .map(|(gram, count)| (*count).min(reference_counts.get(gram).copied().unwrap_or(0)))
        .sum();
    let total = candidate_counts.values().sum::<usize>().max(1);

    (matched, total)
}

fn ngram_counts<'a>(tokens: &'a [&'a str], n: usize) -> HashMap<&'a [&'a str], usize> {
    let mut counts = HashMap::new();
    for window in tokens.windows(n) {
        *counts.entry(window).or_insert(0) += 1;
    }
    counts
}

fn brevity_penalty(reference_len: usize, candidate_len: usize) -> f64 {
    if candidate_len > reference_len {
        1.0
    } else {
        (1.0 - reference_len as f64 / candidate_len as f64).exp()
    }
}
