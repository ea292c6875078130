use clap::Parser;
use std::path::PathBuf;

mod client;
mod config;
mod error;
mod input;
mod models;
mod output;
mod progress;
mod repair;
mod report;
mod runner;

use crate::client::EvaluationClient;
use crate::config::{EvaluationConfig, Provider, ServiceConfig};
use crate::output::OutputFormat;
use crate::progress::ProgressReporter;
use crate::runner::{Runner, Session};

/// EvalFlow - submit a conversation transcript and retrieved context to the
/// evaluation service and render its reliability report
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the conversation JSON file
    conversation: PathBuf,

    /// Path to the context JSON file
    context: PathBuf,

    /// LLM provider the service should use for generation and judging
    #[arg(short, long, value_enum, default_value = "openai")]
    provider: Provider,

    /// Model name; must belong to the selected provider's catalog
    #[arg(short, long)]
    model: Option<String>,

    /// Path to a TOML file with service endpoint, timeout and key overrides
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format: plain or json
    #[arg(short, long, default_value = "plain")]
    output: OutputFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let service = match &args.config {
        Some(path) => ServiceConfig::from_file(path)?,
        None => ServiceConfig::default(),
    };
    let model = args
        .model
        .unwrap_or_else(|| args.provider.default_model().to_string());
    let config = EvaluationConfig::new(args.provider, model)?;

    // Unreadable files surface as MissingFile through the validator.
    let conversation = std::fs::read_to_string(&args.conversation).ok();
    let context = std::fs::read_to_string(&args.context).ok();

    let client = EvaluationClient::new(&service)?;
    let runner = Runner::new(client, config);
    let mut session = Session::new();
    let mut progress = ProgressReporter::new();

    let result = runner
        .run(
            &mut session,
            conversation.as_deref(),
            context.as_deref(),
            &mut progress,
        )
        .await;

    match result {
        Ok(()) => {
            if let Some(outcome) = session.current_report() {
                output::print_report(&outcome.sections, args.output);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("Error: {err}");
            // Input problems the operator can fix exit differently from
            // backend failures, for scripting.
            std::process::exit(if err.is_input_error() { 2 } else { 1 })
        }
    }
}
