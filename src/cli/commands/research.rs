//! Research command implementation.

use super::Completion;
use crate::cli::output::truncate;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::{Orchestrator, ResearchOutcome};
use anyhow::Result;
use std::io::{self, BufRead, Write};

const PROMPT: &str = "What can I help you research? ";

/// How the outcome is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Structured rendering, falling back to raw text.
    Rendered,
    /// The agent's text verbatim.
    Raw,
    /// The JSON export.
    Json,
}

impl View {
    pub fn from_flags(raw: bool, json: bool) -> Self {
        match (raw, json) {
            (true, _) => View::Raw,
            (_, true) => View::Json,
            _ => View::Rendered,
        }
    }
}

/// Run the research command.
pub async fn run_research(
    query: Option<String>,
    save: Option<bool>,
    view: View,
    settings: Settings,
) -> Result<Completion> {
    if let Err(e) = preflight::check(Operation::Research, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'inquestor doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let query = match query {
        Some(q) => q,
        None => match prompt_for_query().await? {
            Some(q) => q,
            None => return Ok(Completion::Interrupted),
        },
    };

    if query.trim().is_empty() {
        Output::warning("Nothing to research.");
        return Ok(Completion::Done);
    }

    let orchestrator = Orchestrator::new(&settings)?;
    let save = save.unwrap_or(settings.output.save_by_default);

    let spinner = Output::spinner("Running agent...");
    let result = tokio::select! {
        result = orchestrator.research(&query, save) => result,
        _ = tokio::signal::ctrl_c() => {
            spinner.finish_and_clear();
            return Ok(Completion::Interrupted);
        }
    };
    spinner.finish_and_clear();

    match result {
        Ok(outcome) => {
            print_outcome(&outcome, view)?;
            Ok(Completion::Done)
        }
        Err(e) => {
            Output::error(&format!("Research failed: {}", e));
            Err(e.into())
        }
    }
}

/// Ask for a query on stdin. `None` means the user interrupted.
async fn prompt_for_query() -> Result<Option<String>> {
    print!("{}", PROMPT);
    io::stdout().flush()?;

    let read = tokio::task::spawn_blocking(|| {
        let mut input = String::new();
        io::stdin().lock().read_line(&mut input).map(|n| (n, input))
    });

    tokio::select! {
        read = read => {
            let (n, input) = read??;
            // EOF behaves like an interrupt: there is no query to run.
            if n == 0 {
                println!();
                return Ok(None);
            }
            Ok(Some(input.trim().to_string()))
        }
        _ = tokio::signal::ctrl_c() => {
            println!();
            Ok(None)
        }
    }
}

fn print_outcome(outcome: &ResearchOutcome, view: View) -> Result<()> {
    match view {
        View::Raw => println!("{}", outcome.raw_text),
        View::Json => println!("{}", outcome.export().to_json_pretty()?),
        View::Rendered => {
            match outcome.structured() {
                Some(result) => Output::research_result(result),
                None => {
                    Output::warning("Could not parse structured output. Showing raw text below.");
                    println!("\n{}\n", outcome.raw_text);
                }
            }

            if !outcome.tool_calls.is_empty() {
                Output::header(&format!("Tool calls ({})", outcome.tool_calls.len()));
                for call in &outcome.tool_calls {
                    Output::info(&format!("  {} {}", call.name, truncate(&call.arguments, 60)));
                }
                println!();
            }

            if let Some(path) = &outcome.saved_to {
                Output::success(&format!("Data successfully saved to {}", path.display()));
            }
            if let Some(err) = &outcome.save_error {
                Output::warning(&format!("Could not save output: {}", err));
            }

            Output::info(&format!("Completed in {} iteration(s)", outcome.iterations));
        }
    }
    Ok(())
}
