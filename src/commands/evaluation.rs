use crate::metrics::EvaluationReport;
use crate::session::Session;
use std::fs;
use tracing::warn;

/// Score the generated abstract against a reference abstract.
pub fn evaluate_abstract(session: &Session, reference: &str) -> Result<EvaluationReport, String> {
    session.evaluate(reference).map_err(|e| {
        warn!(error = %e, "evaluation rejected");
        e.to_string()
    })
}

/// Read a reference abstract from a file.
pub fn read_reference(path: &str) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("Could not read reference {}: {}", path, e))
}
