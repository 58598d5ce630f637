use crate::config::AppSettings;
use clap::Parser;
use std::path::PathBuf;

/// Summarize a research paper with a pretrained model and score the result
/// against its original abstract.
///
/// Without `--generate` an interactive session starts; type `help` for commands.
#[derive(Parser, Debug)]
#[command(name = "paper-digest", version, about)]
pub struct CliArgs {
    /// Path to config file (default: <config dir>/paper-digest/config.toml)
    #[arg(long, env = "PAPER_DIGEST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Model, e.g. huggingface/facebook/bart-large-cnn, openai/gpt-4o-mini, ollama/llama3
    #[arg(long)]
    pub model: Option<String>,

    /// Instruction prepended to every chunk
    #[arg(long)]
    pub prompt: Option<String>,

    /// PDF (or .txt/.md) file to load at startup
    #[arg(long)]
    pub pdf: Option<String>,

    /// Summarize the loaded file, print the result and exit
    #[arg(long, requires = "pdf")]
    pub generate: bool,

    /// Reference abstract file to score the summary against (with --generate)
    #[arg(long, requires = "generate")]
    pub reference: Option<String>,

    /// Maximum number of chunks sent to the model
    #[arg(long)]
    pub chunk_limit: Option<usize>,

    /// Minimum summary length per chunk, in model tokens
    #[arg(long)]
    pub min_length: Option<u32>,

    /// Maximum summary length per chunk, in model tokens
    #[arg(long)]
    pub max_length: Option<u32>,

    /// Print evaluation reports as JSON
    #[arg(long)]
    pub json: bool,
}

impl CliArgs {
    /// Apply command-line overrides on top of file and environment settings.
    pub fn apply(&self, settings: &mut AppSettings) {
        if let Some(model) = &self.model {
            settings.default_model = Some(model.clone());
        }
        if let Some(prompt) = &self.prompt {
            settings.default_prompt = Some(prompt.clone());
        }
        if let Some(limit) = self.chunk_limit {
            settings.summary.chunk_limit = limit;
        }
        if let Some(min) = self.min_length {
            settings.summary.min_length = min;
        }
        if let Some(max) = self.max_length {
            settings.summary.max_length = max;
        }
    }
}
