use crate::config::AppSettings;
use crate::session::Session;
use tracing::{info, warn};

/// Generate an abstract for the current document with the session's model.
pub async fn generate_abstract(
    session: &mut Session,
    settings: &AppSettings,
) -> Result<String, String> {
    let (provider, model_id) = settings.resolve_provider(&session.model)?;
    info!(provider = provider.name(), model = %model_id, "generating abstract");

    session
        .generate(&provider, &model_id)
        .await
        .map(str::to_string)
        .map_err(|e| {
            warn!(error = %e, "abstract generation failed");
            format!("Error occurred during summarization: {}", e)
        })
}

/// The last generated abstract.
pub fn get_abstract(session: &Session) -> Result<String, String> {
    session
        .summary()
        .map(str::to_string)
        .ok_or_else(|| "Click 'generate' after entering the prompt.".to_string())
}
