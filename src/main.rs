use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use sandcastle::collector::build_collectors;
use sandcastle::config::Config;
use sandcastle::output::terminal;
use sandcastle::pipeline::{self, collect::CollectRun};

/// Sandcastle: search and social demand research.
///
/// Collects search results and Reddit posts, merges near-duplicates, buckets
/// what is left into a keyword taxonomy, and labels recurring demand phrases
/// as structural or temporal.
#[derive(Parser)]
#[command(name = "sandcastle", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the search collectors and append new rows to the raw log
    Collect {
        /// Path to the TOML config
        #[arg(long, default_value = "sandcastle.toml")]
        config: PathBuf,
    },

    /// Collect Reddit posts per time window and rebuild the intent report
    Reddit {
        #[arg(long, default_value = "sandcastle.toml")]
        config: PathBuf,
    },

    /// Dedupe, cluster, extract terms and score quality from the raw log
    Process {
        #[arg(long, default_value = "sandcastle.toml")]
        config: PathBuf,
    },

    /// Summarize a JSONL log or JSON artifact
    Count {
        /// File to summarize
        #[arg(long)]
        file: PathBuf,
    },

    /// Check output directories and endpoint reachability
    Doctor {
        #[arg(long, default_value = "sandcastle.toml")]
        config: PathBuf,
    },
}

fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!(
            "Config file not found: {}\n\
             Pass --config <path> or create sandcastle.toml in the working directory.",
            path.display()
        );
    }
    Config::load(path)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sandcastle=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Collect { config } => {
            let config = load_config(&config)?;
            config.require_search()?;

            let collectors = build_collectors(&config.engines)?;
            let output = config.resolve(&config.outputs.raw_results);
            info!(
                queries = config.queries.len(),
                engines = collectors.len(),
                output = %output.display(),
                "Starting collection"
            );

            let summary = pipeline::collect::run(CollectRun {
                queries: &config.queries,
                collectors: &collectors,
                limits: &config.limits,
                blocked_domains: &config.filters.blocked_domains,
                output: &output,
            })
            .await?;

            terminal::display_collect_summary(&summary);
            println!(
                "\n{}",
                "Next: sandcastle process --config <path>".dimmed()
            );
        }

        Commands::Reddit { config } => {
            let config = load_config(&config)?;
            config.require_reddit()?;

            let (added, report) = pipeline::reddit::run(&config).await?;
            terminal::display_intents(&report, added);
        }

        Commands::Process { config } => {
            let config = load_config(&config)?;
            let (outcome, written) = pipeline::process::run(&config)?;
            terminal::display_process_summary(&outcome, &written);
        }

        Commands::Count { file } => {
            let summary = sandcastle::io::count_file(&file)?;
            terminal::display_file_summary(&summary)?;
        }

        Commands::Doctor { config } => {
            let config = load_config(&config)?;
            let report = sandcastle::doctor::run(&config).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.all_ok() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
