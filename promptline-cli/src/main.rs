//! promptline CLI - ask Gemini one question and stream the answer.
//!
//! Reads a prompt (from the arguments, or interactively from stdin), opens one
//! streaming generation request and prints every fragment as it arrives.

#![allow(clippy::print_stdout)] // CLI program intentionally uses stdout

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use promptline::prelude::*;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Text printed before reading the prompt from stdin.
const PROMPT_LABEL: &str = "Enter your prompt: ";

/// Ask a Gemini model one question and stream the answer to stdout.
///
/// The API key is taken from `GEMINI_API_KEY`.
#[derive(Parser, Debug)]
#[command(name = "promptline")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Prompt text; read from stdin when omitted
    prompt: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("failed to create tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging with the given verbosity level.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "promptline={level},promptline_cli={level},{}",
            if verbosity >= 3 { "debug" } else { "warn" }
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(io::stderr)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    let mut stdout = io::stdout().lock();

    let prompt = if cli.prompt.is_empty() {
        read_prompt(&mut io::stdin().lock(), &mut stdout)?
    } else {
        cli.prompt.join(" ")
    };

    let gemini = Gemini::from_env()?;
    if !gemini.has_api_key() {
        tracing::info!(
            "{} is not set, sending the request without a key",
            GeminiConfig::API_KEY_ENV
        );
    }

    let runner = PromptRunner::new(gemini);
    generate(&runner, &prompt, &mut stdout).await
}

/// Stream one reply into `out`.
///
/// A failed generation is reported on `out` and still counts as a normal
/// run; only an output sink that rejects writes is returned as an error.
async fn generate<P, W>(runner: &PromptRunner<P>, prompt: &str, out: &mut W) -> Result<()>
where
    P: ChatProvider,
    W: Write + ?Sized,
{
    match runner.run(prompt, out).await {
        RunOutcome::Completed(summary) => {
            tracing::info!(
                fragments = summary.fragments,
                bytes = summary.bytes,
                stop_reason = summary.stop_reason.map(tracing::field::display),
                usage = summary.usage.map(tracing::field::display),
                "done"
            );
            Ok(())
        }
        RunOutcome::Failed(Error::Io(e)) => Err(e.into()),
        RunOutcome::Failed(error) => {
            if error.as_llm().is_some_and(LlmError::is_auth) {
                tracing::info!("check the key in {}", GeminiConfig::API_KEY_ENV);
            }
            Ok(())
        }
    }
}

/// Print the prompt label and read one line.
///
/// The trailing line terminator is removed; EOF yields an empty prompt.
fn read_prompt<R, W>(input: &mut R, out: &mut W) -> io::Result<String>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    out.write_all(PROMPT_LABEL.as_bytes())?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    strip_line_ending(&mut line);
    Ok(line)
}

/// Remove exactly one trailing `\n` or `\r\n`.
fn strip_line_ending(line: &mut String) {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
}
