use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use newstopics::artifacts::{self, ArtifactPaths};
use newstopics::config::Config;
use newstopics::error::PipelineError;
use newstopics::output::terminal;
use newstopics::topics::summary;

/// newstopics: discover hidden topics in news headlines.
///
/// Trains an LDA topic model over a sample of headlines and shows the
/// keywords that characterize each topic.
#[derive(Parser)]
#[command(name = "newstopics", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the vectorizer and topic model from the headline CSV
    Train,

    /// Print the discovered topics in the terminal
    Topics,

    /// Show corpus and artifact status
    Status,

    /// Serve the topic viewer web page
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8080")]
        port: u16,

        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("newstopics=info")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Known operator mistakes get a one-line message; anything else
            // gets the full context chain.
            match PipelineError::find(&e) {
                Some(known) => terminal::display_error(&known.to_string()),
                None => terminal::display_error(&format!("{e:#}")),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<()> {
    let config = Config::load()?;

    match command {
        Commands::Train => {
            info!(corpus = %config.corpus_path.display(), "Starting training run");
            let report = newstopics::pipeline::train::run(&config, true)?;
            terminal::display_training_report(&report);
            terminal::display_topics(&report.topics);
            println!(
                "{}",
                "Run `newstopics serve` to browse the topics.".dimmed()
            );
        }

        Commands::Topics => {
            let paths = ArtifactPaths::in_dir(&config.artifact_dir);
            let loaded = artifacts::load(&paths, config.params.n_topics)?;
            let topics = summary::summarize(&loaded.model, &loaded.vectorizer, config.params.top_terms)?;
            terminal::display_topics(&topics);
        }

        Commands::Status => {
            newstopics::status::show(&config);
        }

        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            newstopics::web::run_server(config, port, &bind).await?;
        }
    }

    Ok(())
}
