//! Line-oriented front end driving a [`Session`].

use crate::commands::{document, evaluation, settings, summary};
use crate::config::AppSettings;
use crate::metrics::EvaluationReport;
use crate::session::Session;
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::warn;

const HELP: &str = "\
Commands:
  open <path>        load a PDF (or .txt/.md) and show its text
  text               show the loaded text again
  prompt [text]      show or set the summarization prompt
  model [id]         show or set the model
  generate           generate an abstract for the loaded paper
  summary            show the generated abstract
  evaluate [@path]   score the abstract; paste the reference, end with a line '.'
  evaluate <text>    score the abstract against inline text
  settings           show settings (API keys masked)
  help               show this help
  quit               leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(String),
    Text,
    Prompt(Option<String>),
    Model(Option<String>),
    Generate,
    Summary,
    Evaluate(Option<String>),
    Settings,
    Help,
    Quit,
    Unknown(String),
}

/// Parse one input line; blank lines yield `None`.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, Some(rest.trim().to_string())),
        None => (line, None),
    };
    let rest = rest.filter(|r| !r.is_empty());

    let command = match (verb.to_lowercase().as_str(), rest) {
        ("open" | "upload", Some(path)) => Command::Open(path),
        ("text", None) => Command::Text,
        ("prompt", arg) => Command::Prompt(arg),
        ("model", arg) => Command::Model(arg),
        ("generate", None) => Command::Generate,
        ("summary", None) => Command::Summary,
        ("evaluate", arg) => Command::Evaluate(arg),
        ("settings", None) => Command::Settings,
        ("help" | "?", None) => Command::Help,
        ("quit" | "exit", None) => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    };
    Some(command)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Repl<R, W> {
    input: Lines<R>,
    out: W,
    session: Session,
    settings: AppSettings,
    json: bool,
}

impl<R, W> Repl<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(input: R, out: W, session: Session, settings: AppSettings, json: bool) -> Self {
        Self {
            input: input.lines(),
            out,
            session,
            settings,
            json,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Read and execute commands until `quit` or end of input.
    pub async fn run(&mut self) -> io::Result<()> {
        writeln!(self.out, "Prompt-based Research Paper Summarization and Comparison Tool")?;
        writeln!(self.out, "Type 'help' for commands.")?;
        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;
            let Some(line) = self.input.next_line().await? else {
                break;
            };
            let Some(command) = parse_command(&line) else {
                continue;
            };
            if self.execute(command).await? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    /// Execute one command. Only output failures are returned as errors;
    /// command failures are printed and the session carries on.
    pub async fn execute(&mut self, command: Command) -> io::Result<Flow> {
        match command {
            Command::Open(path) => match document::upload_document(&mut self.session, &path) {
                Ok(preview) => {
                    writeln!(self.out, "Extracted Text:")?;
                    writeln!(self.out, "{}", preview)?;
                }
                Err(e) => self.print_warning(&e)?,
            },
            Command::Text => match document::document_preview(&self.session) {
                Ok(preview) => writeln!(self.out, "{}", preview)?,
                Err(e) => self.print_warning(&e)?,
            },
            Command::Prompt(None) => writeln!(self.out, "{}", self.session.prompt)?,
            Command::Prompt(Some(prompt)) => {
                match settings::set_prompt(&mut self.session, &prompt) {
                    Ok(()) => writeln!(self.out, "Prompt updated.")?,
                    Err(e) => self.print_warning(&e)?,
                }
            }
            Command::Model(None) => writeln!(self.out, "{}", self.session.model)?,
            Command::Model(Some(model)) => {
                match settings::set_model(&mut self.session, &self.settings, &model) {
                    Ok(()) => writeln!(self.out, "Model set to {}.", model)?,
                    Err(e) => self.print_warning(&e)?,
                }
            }
            Command::Generate => {
                writeln!(self.out, "Generating abstract...")?;
                match summary::generate_abstract(&mut self.session, &self.settings).await {
                    Ok(text) => {
                        writeln!(self.out, "Generated Abstract:")?;
                        writeln!(self.out, "{}", text)?;
                    }
                    Err(e) => self.print_warning(&e)?,
                }
            }
            Command::Summary => match summary::get_abstract(&self.session) {
                Ok(text) => writeln!(self.out, "{}", text)?,
                Err(e) => self.print_warning(&e)?,
            },
            Command::Evaluate(arg) => {
                let reference = match arg {
                    Some(arg) => match arg.strip_prefix('@') {
                        Some(path) => evaluation::read_reference(path),
                        None => Ok(arg),
                    },
                    None => self.read_pasted().await.map(Ok)?,
                };
                match reference
                    .and_then(|r| evaluation::evaluate_abstract(&self.session, &r))
                {
                    Ok(report) => self.print_report(&report)?,
                    Err(e) => self.print_warning(&e)?,
                }
            }
            Command::Settings => {
                for (key, value) in settings::get_settings(&self.settings, &self.session) {
                    writeln!(self.out, "{} = {}", key, value)?;
                }
            }
            Command::Help => writeln!(self.out, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Unknown(line) => {
                warn!(input = %line, "unknown command");
                self.print_warning(&format!("Unknown command: {}. Type 'help'.", line))?
            }
        }
        Ok(Flow::Continue)
    }

    /// Collect pasted lines up to a line holding only `.` or end of input.
    async fn read_pasted(&mut self) -> io::Result<String> {
        writeln!(self.out, "Paste the original abstract here, then a line with a single '.':")?;
        self.out.flush()?;
        let mut lines = Vec::new();
        while let Some(line) = self.input.next_line().await? {
            if line.trim() == "." {
                break;
            }
            lines.push(line);
        }
        Ok(lines.join("\n"))
    }

    fn print_report(&mut self, report: &EvaluationReport) -> io::Result<()> {
        if self.json {
            let json = serde_json::to_string_pretty(report).map_err(io::Error::other)?;
            writeln!(self.out, "{}", json)
        } else {
            writeln!(self.out, "Evaluation Metrics:")?;
            writeln!(self.out, "{}", report)
        }
    }

    fn print_warning(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "warning: {}", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repl(input: &'static str) -> Repl<&'static [u8], Vec<u8>> {
        let settings = AppSettings::default();
        let session = Session::new(&settings);
        Repl::new(input.as_bytes(), Vec::new(), session, settings, false)
    }

    fn output(repl: &Repl<&'static [u8], Vec<u8>>) -> String {
        String::from_utf8(repl.out.clone()).unwrap()
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("   "), None);
        assert_eq!(
            parse_command("open  paper one.pdf "),
            Some(Command::Open("paper one.pdf".into()))
        );
        assert_eq!(
            parse_command("UPLOAD a.pdf"),
            Some(Command::Open("a.pdf".into()))
        );
        assert_eq!(parse_command("prompt"), Some(Command::Prompt(None)));
        assert_eq!(
            parse_command("prompt List the datasets."),
            Some(Command::Prompt(Some("List the datasets.".into())))
        );
        assert_eq!(
            parse_command("evaluate @abs.txt"),
            Some(Command::Evaluate(Some("@abs.txt".into())))
        );
        assert_eq!(parse_command("exit"), Some(Command::Quit));
        assert_eq!(parse_command("open"), Some(Command::Unknown("open".into())));
        assert_eq!(
            parse_command("generate now"),
            Some(Command::Unknown("generate now".into()))
        );
    }

    #[tokio::test]
    async fn test_session_flow_without_model() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "Findings about transformers.").unwrap();
        let script = format!(
            "open {}\nprompt Summarize.\nprompt\nsummary\nevaluate\nsome reference\n.\nbogus\nquit\ntext\n",
            file.path().display()
        );
        let script: &'static str = Box::leak(script.into_boxed_str());

        let mut repl = repl(script);
        repl.run().await.unwrap();
        let out = output(&repl);

        assert!(out.contains("Extracted Text:\nFindings about transformers...."));
        assert!(out.contains("Prompt updated.\n"));
        assert!(out.contains("> Summarize.\n"));
        assert!(out.contains("warning: Click 'generate' after entering the prompt."));
        assert!(out.contains("warning: No generated abstract yet."));
        assert!(out.contains("warning: Unknown command: bogus."));
        // `text` after `quit` never runs.
        assert_eq!(out.matches("Findings about transformers").count(), 1);
        assert_eq!(repl.session().prompt, "Summarize.");
    }

    #[tokio::test]
    async fn test_open_failure_is_reported() {
        let mut repl = repl("");
        let flow = repl
            .execute(Command::Open("/nonexistent/paper.pdf".into()))
            .await
            .unwrap();
        assert_eq!(flow, Flow::Continue);
        assert!(output(&repl)
            .starts_with("warning: No text extracted from /nonexistent/paper.pdf"));
        assert!(repl.session().document().is_none());
    }

    #[tokio::test]
    async fn test_settings_and_help() {
        let mut repl = repl("");
        repl.execute(Command::Settings).await.unwrap();
        repl.execute(Command::Help).await.unwrap();
        let out = output(&repl);
        assert!(out.contains("model = huggingface/facebook/bart-large-cnn"));
        assert!(out.contains("chunk_limit = 5"));
        assert!(out.contains("open <path>"));
    }

    #[tokio::test]
    async fn test_model_switch_validates() {
        let mut repl = repl("");
        repl.execute(Command::Model(Some("openai/gpt-4o".into())))
            .await
            .unwrap();
        assert!(output(&repl).contains("warning: OpenAI API key not configured"));
        repl.execute(Command::Model(Some("ollama/llama3".into())))
            .await
            .unwrap();
        assert_eq!(repl.session().model, "ollama/llama3");
    }
}
