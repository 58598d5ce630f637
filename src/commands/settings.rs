use crate::config::AppSettings;
use crate::session::Session;
use std::collections::BTreeMap;
use tracing::warn;

/// Current settings, API keys masked, plus the session's own overrides.
pub fn get_settings(settings: &AppSettings, session: &Session) -> BTreeMap<String, String> {
    let mut map: BTreeMap<String, String> = settings
        .masked()
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    map.insert("model".into(), session.model.clone());
    map.insert("prompt".into(), session.prompt.clone());
    map.insert("min_length".into(), session.options.min_length.to_string());
    map.insert("max_length".into(), session.options.max_length.to_string());
    map.insert("chunk_limit".into(), session.options.chunk_limit.to_string());
    map.insert(
        "max_chunk_tokens".into(),
        session.options.max_chunk_tokens.to_string(),
    );
    map.insert(
        "prompt_separator".into(),
        format!("{:?}", session.options.prompt_separator),
    );
    map
}

pub fn set_prompt(session: &mut Session, prompt: &str) -> Result<(), String> {
    if prompt.trim().is_empty() {
        return Err("Prompt must not be empty".into());
    }
    session.prompt = prompt.to_string();
    Ok(())
}

/// Switch model, checking that its provider is configured.
pub fn set_model(session: &mut Session, settings: &AppSettings, model: &str) -> Result<(), String> {
    settings.resolve_provider(model).map_err(|e| {
        warn!(model, error = %e, "model rejected");
        e
    })?;
    session.model = model.to_string();
    Ok(())
}
