//! Interview Evaluator — compares LLM scoring prompts on recorded interview answers.
//!
//! ## Commands
//!
//! - `run`: score every eligible candidate under every prompt variant and
//!   write one sheet per variant plus a JSON snapshot
//! - `find-missing`: list candidates absent from the newest sheet and write
//!   the exclusion file read by the next `run`

mod config;
mod db;
mod errors;
mod evaluation;
mod exclusions;
mod llm_client;
mod missing;
mod models;
mod pipeline;
mod reporting;
mod store;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::evaluation::engine::Evaluator;
use crate::evaluation::registry::PromptRegistry;
use crate::llm_client::OpenAiClient;
use crate::missing::{find_missing, render_missing, MissingStatus};
use crate::pipeline::{run_evaluation, RunOptions, RunStatus};
use crate::reporting::console::render_report;
use crate::store::PgCandidateStore;

#[derive(Parser)]
#[command(name = "interview-evaluator")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Score interview answers under several LLM prompt variants", long_about = None)]
struct Cli {
    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Directory for sheets, snapshots and the exclusion file (overrides OUTPUT_DIR)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score every eligible candidate under every registered prompt
    Run {
        /// Emails to skip, one per line (overrides EXCLUDE_FILE; default:
        /// <output-dir>/processed_emails_latest.txt)
        #[arg(long)]
        exclude_file: Option<PathBuf>,

        /// Candidates shown in the per-candidate comparison
        #[arg(long, default_value_t = 5)]
        compare: usize,
    },

    /// List candidates missing from the newest sheet and write the exclusion file
    FindMissing {
        /// Prompt variant whose sheet is reconciled
        #[arg(long, default_value = "original")]
        prompt: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }

    init_tracing(&config, cli.json);
    info!("Starting Interview Evaluator v{}", env!("CARGO_PKG_VERSION"));

    let pool = create_pool(&config.database_url).await?;
    let store = PgCandidateStore::new(pool);

    match cli.command {
        Command::Run {
            exclude_file,
            compare,
        } => {
            let client = OpenAiClient::new(
                config.openai_api_key()?.to_string(),
                config.openai_base_url.clone(),
            )?;
            info!("Scoring client initialized (model: {})", llm_client::MODEL);

            let evaluator = Evaluator::new(Arc::new(client), config.call_interval);
            let registry = PromptRegistry::builtin()?;
            let options = RunOptions {
                exclusion_file: exclude_file.unwrap_or_else(|| config.exclusion_file()),
                output_dir: config.output_dir.clone(),
            };

            match run_evaluation(&store, &evaluator, &registry, &options).await? {
                RunStatus::NoEligibleCandidates { eligible, excluded } => {
                    println!(
                        "No candidates to evaluate ({eligible} with completed interviews, {excluded} excluded)"
                    );
                }
                RunStatus::Completed(report) => {
                    println!("{}", render_report(&report, compare));
                }
            }
        }
        Command::FindMissing { prompt } => {
            match find_missing(&store, &config.output_dir, &prompt, Utc::now()).await? {
                MissingStatus::NoSheet { output_dir } => {
                    println!(
                        "No '{prompt}' sheet found in {}; run the evaluation first",
                        output_dir.display()
                    );
                }
                MissingStatus::Completed(report) => {
                    println!("{}", render_missing(&report));
                }
            }
        }
    }

    Ok(())
}

/// Structured logging to stderr so the console report on stdout stays clean.
fn init_tracing(config: &Config, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
