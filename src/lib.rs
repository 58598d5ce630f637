pub mod cli;
pub mod commands;
pub mod config;
pub mod doc_processor;
pub mod llm;
pub mod metrics;
pub mod repl;
pub mod session;
pub mod summarizer;
pub mod tokenize;

#[cfg(test)]
mod testing;

use anyhow::{bail, Context};
use clap::Parser;
use cli::CliArgs;
use commands::{document, evaluation, summary};
use config::AppSettings;
use repl::Repl;
use session::Session;
use std::io::{self, Write};
use tokio::io::BufReader;
use tracing::info;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = CliArgs::parse();
    let mut settings =
        AppSettings::load(args.config.as_deref()).context("failed to load settings")?;
    args.apply(&mut settings);

    let mut session = Session::new(&settings);
    info!(session = %session.id, model = %session.model, "session started");

    if let Some(pdf) = &args.pdf {
        preload(&mut session, pdf, args.generate, &mut io::stdout())?;
    }

    if args.generate {
        return run_once(&mut session, &settings, &args).await;
    }

    let stdin = BufReader::new(tokio::io::stdin());
    let mut repl = Repl::new(stdin, io::stdout(), session, settings, args.json);
    repl.run().await.context("terminal I/O failed")?;
    Ok(())
}

/// Load the `--pdf` file. A failure only aborts in one-shot mode; an
/// interactive session starts empty and the user can `open` another file.
fn preload<W: Write>(
    session: &mut Session,
    path: &str,
    one_shot: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    match document::upload_document(session, path) {
        Ok(_) if one_shot => {}
        Ok(preview) => writeln!(out, "Extracted Text:\n{}", preview)?,
        Err(e) if one_shot => bail!(e),
        Err(e) => writeln!(out, "warning: {}", e)?,
    }
    Ok(())
}

/// Non-interactive mode: print the abstract and, with `--reference`, its scores.
async fn run_once(
    session: &mut Session,
    settings: &AppSettings,
    args: &CliArgs,
) -> anyhow::Result<()> {
    let text = summary::generate_abstract(session, settings)
        .await
        .map_err(anyhow::Error::msg)?;

    let mut out = io::stdout().lock();
    writeln!(out, "Generated Abstract:\n{}", text)?;

    if let Some(path) = &args.reference {
        let reference = evaluation::read_reference(path).map_err(anyhow::Error::msg)?;
        let report =
            evaluation::evaluate_abstract(session, &reference).map_err(anyhow::Error::msg)?;
        if args.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        } else {
            writeln!(out, "Evaluation Metrics:\n{}", report)?;
        }
    }
    Ok(())
}
