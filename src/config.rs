use crate::llm::{claude::ClaudeConfig, huggingface, openai::OpenAiConfig, Provider};
use crate::summarizer::SummaryOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_PROMPT: &str = "Summarize the main findings of the research paper.";
pub const DEFAULT_MODEL: &str = "huggingface/facebook/bart-large-cnn";

/// Settings loaded from `config.toml`, then overridden by the environment.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AppSettings {
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub claude_api_key: Option<String>,
    pub claude_base_url: Option<String>,
    pub huggingface_api_key: Option<String>,
    pub huggingface_base_url: Option<String>,
    pub ollama_host: Option<String>,
    pub default_model: Option<String>,
    pub default_prompt: Option<String>,
    #[serde(default)]
    pub summary: SummaryOptions,
}

/// Environment variable for each overridable setting.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("openai_api_key", "OPENAI_API_KEY"),
    ("openai_base_url", "OPENAI_BASE_URL"),
    ("claude_api_key", "ANTHROPIC_API_KEY"),
    ("claude_base_url", "ANTHROPIC_BASE_URL"),
    ("huggingface_api_key", "HF_TOKEN"),
    ("huggingface_base_url", "HF_BASE_URL"),
    ("ollama_host", "OLLAMA_HOST"),
    ("default_model", "PAPER_DIGEST_MODEL"),
];

impl AppSettings {
    /// `<config_dir>/paper-digest/config.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("paper-digest").join("config.toml"))
    }

    /// Load from `path`, or the default location when it exists, then apply
    /// environment overrides. A missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(default) if default.exists() => Self::from_file(&default)?,
                _ => {
                    debug!("no config file, using defaults");
                    Self::default()
                }
            },
        };
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Overwrite settings with non-empty values returned by `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for &(key, var) in ENV_OVERRIDES {
            if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
                if let Some(slot) = self.field(key) {
                    *slot = Some(value);
                }
            }
        }
    }

    /// The string-valued setting named `key`.
    fn field(&mut self, key: &str) -> Option<&mut Option<String>> {
        match key {
            "openai_api_key" => Some(&mut self.openai_api_key),
            "openai_base_url" => Some(&mut self.openai_base_url),
            "claude_api_key" => Some(&mut self.claude_api_key),
            "claude_base_url" => Some(&mut self.claude_base_url),
            "huggingface_api_key" => Some(&mut self.huggingface_api_key),
            "huggingface_base_url" => Some(&mut self.huggingface_base_url),
            "ollama_host" => Some(&mut self.ollama_host),
            "default_model" => Some(&mut self.default_model),
            _ => None,
        }
    }

    pub fn model(&self) -> String {
        self.default_model
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }

    pub fn prompt(&self) -> String {
        self.default_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_PROMPT.to_string())
    }

    /// Settings for display, with API keys masked.
    pub fn masked(&self) -> BTreeMap<&'static str, String> {
        let mut view = self.clone();
        let mut map = BTreeMap::new();
        for &(key, _) in ENV_OVERRIDES {
            let Some(value) = view.field(key).and_then(Option::take) else {
                continue;
            };
            let value = if key.ends_with("_api_key") {
                mask(&value)
            } else {
                value
            };
            map.insert(key, value);
        }
        map.insert("model", self.model());
        map
    }

    /// Resolve a provider from a model string like "huggingface/facebook/bart-large-cnn",
    /// "openai/gpt-4o", "claude/...", "ollama/...".
    pub fn resolve_provider(&self, model: &str) -> Result<(Provider, String), String> {
        if let Some(model_id) = model
            .strip_prefix("huggingface/")
            .or_else(|| model.strip_prefix("hf/"))
        {
            let api_key = self.huggingface_api_key.clone().unwrap_or_default();
            let base_url = self
                .huggingface_base_url
                .clone()
                .unwrap_or_else(|| huggingface::DEFAULT_BASE_URL.to_string());
            Ok((
                Provider::HuggingFace(huggingface::HuggingFaceConfig { api_key, base_url }),
                model_id.to_string(),
            ))
        } else if let Some(model_id) = model.strip_prefix("ollama/") {
            let host = self
                .ollama_host
                .clone()
                .unwrap_or_else(|| "http://localhost:11434".to_string());
            Ok((Provider::ollama(host), model_id.to_string()))
        } else if let Some(model_id) = model.strip_prefix("claude/") {
            let api_key = self
                .claude_api_key
                .clone()
                .ok_or("Claude API key not configured")?;
            let base_url = self
                .claude_base_url
                .clone()
                .unwrap_or_else(|| "https://api.anthropic.com".to_string());
            Ok((
                Provider::Claude(ClaudeConfig { api_key, base_url }),
                model_id.to_string(),
            ))
        } else {
            let model_id = model.strip_prefix("openai/").unwrap_or(model);
            let api_key = self
                .openai_api_key
                .clone()
                .ok_or("OpenAI API key not configured")?;
            let base_url = self
                .openai_base_url
                .clone()
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string());
            Ok((
                Provider::OpenAi(OpenAiConfig { api_key, base_url }),
                model_id.to_string(),
            ))
        }
    }
}

fn mask(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = AppSettings::default();
        assert_eq!(settings.model(), DEFAULT_MODEL);
        assert_eq!(settings.prompt(), DEFAULT_PROMPT);
        assert_eq!(settings.summary, SummaryOptions::default());
        assert_eq!(settings.summary.chunk_limit, 5);
        assert_eq!(settings.summary.max_chunk_tokens, 64);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
default_model = "ollama/llama3"
default_prompt = "Summarize."

[summary]
chunk_limit = 3
prompt_separator = " "
"#
        )
        .unwrap();
        let settings = AppSettings::from_file(file.path()).unwrap();
        assert_eq!(settings.model(), "ollama/llama3");
        assert_eq!(settings.prompt(), "Summarize.");
        assert_eq!(settings.summary.chunk_limit, 3);
        assert_eq!(settings.summary.prompt_separator, " ");
        assert_eq!(settings.summary.max_length, 50);
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "default_model = ").unwrap();
        let err = AppSettings::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut settings = AppSettings {
            openai_api_key: Some("from-file".into()),
            ..AppSettings::default()
        };
        let env: HashMap<&str, &str> =
            [("OPENAI_API_KEY", "from-env"), ("HF_TOKEN", ""), ("OLLAMA_HOST", "http://gpu:11434")]
                .into_iter()
                .collect();
        settings.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(settings.openai_api_key.as_deref(), Some("from-env"));
        assert_eq!(settings.huggingface_api_key, None);
        assert_eq!(settings.ollama_host.as_deref(), Some("http://gpu:11434"));
    }

    #[test]
    fn test_masked_hides_keys() {
        let settings = AppSettings {
            openai_api_key: Some("sk-1234567890abcd".into()),
            claude_api_key: Some("short".into()),
            ..AppSettings::default()
        };
        let masked = settings.masked();
        assert_eq!(masked["openai_api_key"], "sk-1...abcd");
        assert_eq!(masked["claude_api_key"], "short");
        assert_eq!(masked["model"], DEFAULT_MODEL);
        assert!(!masked.contains_key("ollama_host"));
    }

    #[test]
    fn test_resolve_provider_prefixes() {
        let settings = AppSettings {
            openai_api_key: Some("sk".into()),
            claude_api_key: Some("ck".into()),
            ..AppSettings::default()
        };

        let (provider, id) = settings
            .resolve_provider("huggingface/facebook/bart-large-cnn")
            .unwrap();
        assert_eq!(provider.name(), "huggingface");
        assert_eq!(id, "facebook/bart-large-cnn");

        let (provider, id) = settings.resolve_provider("hf/google/pegasus-arxiv").unwrap();
        assert_eq!(provider.name(), "huggingface");
        assert_eq!(id, "google/pegasus-arxiv");

        let (provider, id) = settings.resolve_provider("claude/claude-haiku").unwrap();
        assert_eq!(provider.name(), "claude");
        assert_eq!(id, "claude-haiku");

        let (provider, id) = settings.resolve_provider("ollama/llama3").unwrap();
        assert_eq!(provider.name(), "ollama");
        assert_eq!(id, "llama3");

        let (provider, id) = settings.resolve_provider("gpt-4o").unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(id, "gpt-4o");
    }

    #[test]
    fn test_huggingface_defaults_to_router_host() {
        let (provider, _) = AppSettings::default()
            .resolve_provider(DEFAULT_MODEL)
            .unwrap();
        match provider {
            Provider::HuggingFace(config) => assert_eq!(
                config.base_url,
                "https://router.huggingface.co/hf-inference/models"
            ),
            other => panic!("unexpected provider {:?}", other),
        }
    }

    #[test]
    fn test_masked_lists_every_set_field() {
        let mut settings = AppSettings::default();
        settings.apply_env(|var| Some(format!("value-of-{}", var)));
        let masked = settings.masked();
        assert_eq!(masked["openai_base_url"], "value-of-OPENAI_BASE_URL");
        assert_eq!(masked["ollama_host"], "value-of-OLLAMA_HOST");
        assert_eq!(masked["claude_api_key"], "valu..._KEY");
        assert_eq!(masked["model"], "value-of-PAPER_DIGEST_MODEL");
        assert_eq!(masked.len(), ENV_OVERRIDES.len() + 1);
        assert_eq!(settings.ollama_host.as_deref(), Some("value-of-OLLAMA_HOST"));
    }

    #[test]
    fn test_resolve_provider_missing_key() {
        let settings = AppSettings::default();
        assert_eq!(
            settings.resolve_provider("openai/gpt-4o").unwrap_err(),
            "OpenAI API key not configured"
        );
        assert_eq!(
            settings.resolve_provider("claude/x").unwrap_err(),
            "Claude API key not configured"
        );
    }
}
