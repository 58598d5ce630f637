//! Scoring of a generated summary against a reference abstract.
//!
//! Each metric is computed independently. A metric that cannot be computed
//! falls back to its zero value and adds a warning to the report, leaving
//! the other metrics untouched.

pub mod bleu;
pub mod human;
pub mod rouge;

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

pub use bleu::bleu_score;
pub use human::{human_proxy_scores, HumanProxyScores};
pub use rouge::{rouge_scores, RougeScores, Score};

#[derive(Debug, thiserror::Error)]
pub enum MetricError {
    #[error("the {0} contains no scoreable tokens")]
    NoTokens(&'static str),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// `None` when ROUGE could not be computed.
    pub rouge: Option<RougeScores>,
    pub bleu: f64,
    pub human: HumanProxyScores,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,
}

/// Score `generated` against `reference` with every metric.
pub fn evaluate(reference: &str, generated: &str) -> EvaluationReport {
    let mut warnings = Vec::new();

    let rouge = match rouge_scores(reference, generated) {
        Ok(scores) => Some(scores),
        Err(e) => {
            warn!(error = %e, "ROUGE scoring failed");
            warnings.push(format!("Error calculating ROUGE scores: {}", e));
            None
        }
    };

    let bleu = bleu_score(reference, generated).unwrap_or_else(|e| {
        warn!(error = %e, "BLEU scoring failed");
        warnings.push(format!("Error calculating BLEU score: {}", e));
        0.0
    });

    EvaluationReport {
        rouge,
        bleu,
        human: human_proxy_scores(generated),
        warnings,
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ROUGE Scores:")?;
        match &self.rouge {
            Some(scores) => {
                for (name, score) in [
                    ("rouge1", scores.rouge1),
                    ("rouge2", scores.rouge2),
                    ("rougeL", scores.rouge_l),
                ] {
                    writeln!(
                        f,
                        "  {:<7} precision={:.4} recall={:.4} fmeasure={:.4}",
                        name, score.precision, score.recall, score.fmeasure
                    )?;
                }
            }
            None => writeln!(f, "  (unavailable)")?,
        }
        writeln!(f, "BLEU Score: {:.4}", self.bleu)?;
        writeln!(f, "Human Evaluation Scores:")?;
        writeln!(f, "  readability={}", self.human.readability)?;
        writeln!(f, "  coherence={}", self.human.coherence)?;
        write!(f, "  relevance={}", self.human.relevance)?;
        for warning in &self.warnings {
            write!(f, "\nwarning: {}", warning)?;
        }
        Ok(())
    }
}
