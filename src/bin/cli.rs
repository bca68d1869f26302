//! intern-watch CLI
//!
//! Single-run entry point, meant to be invoked by a scheduler.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use intern_watch::{
    error::Result,
    models::Config,
    pipeline::{self, RunOptions},
};

/// intern-watch - Internship Listing Watcher
#[derive(Parser, Debug)]
#[command(
    name = "intern-watch",
    version,
    about = "Emails new internship listings from a paginated API"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "watch.toml")]
    config: PathBuf,

    /// Override the seen-state file
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch listings and email the new ones
    Run {
        /// Maximum number of pages to fetch
        #[arg(long)]
        max_pages: Option<u32>,

        /// Detect only: do not write state or send email
        #[arg(long)]
        dry_run: bool,
    },

    /// Mark all current listings as seen without emailing
    Seed {
        /// Maximum number of pages to fetch
        #[arg(long)]
        max_pages: Option<u32>,
    },

    /// Validate configuration
    Validate,

    /// Show seen-state info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    let debug_env = std::env::var("DEBUG").is_ok_and(|v| !v.is_empty());
    init_logging(cli.verbose || debug_env);

    if let Ok(path) = dotenv {
        log::debug!("Loaded environment from {}", path.display());
    }

    let mut config = Config::load_or_default(&cli.config)?;
    config.apply_env();
    if let Some(state) = cli.state {
        config.watch.state_file = state;
    }

    match cli.command {
        Command::Run { max_pages, dry_run } => {
            if let Some(pages) = max_pages {
                config.watch.max_pages = pages;
            }
            config.validate()?;
            let run = RunOptions {
                dry_run,
                baseline: false,
            };
            pipeline::run_watch(&config, run).await?;
        }

        Command::Seed { max_pages } => {
            if let Some(pages) = max_pages {
                config.watch.max_pages = pages;
            }
            config.validate()?;
            let run = RunOptions {
                dry_run: false,
                baseline: true,
            };
            pipeline::run_watch(&config, run).await?;
        }

        Command::Validate => pipeline::run_validate(&config)?,

        Command::Info => {
            pipeline::run_info(&config).await?;
        }
    }

    Ok(())
}
