pub mod commands;
pub mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to the per-user default.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape a single job posting
    Scrape {
        /// Job posting URL
        #[arg(required = true)]
        url: String,

        /// Also save the result to this JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Model identifier to use instead of the configured one
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Scrape several job postings sequentially
    Batch {
        /// Job posting URLs
        urls: Vec<String>,

        /// File with one URL per line (blank lines and # comments are skipped)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Save the result array to this JSON file instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Delay after each URL in milliseconds
        #[arg(short, long)]
        delay_ms: Option<u64>,

        /// Model identifier to use instead of the configured one
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Show the effective configuration
    Config {
        /// Write the built-in defaults to the default configuration file
        #[arg(long)]
        init: bool,
    },
}

/// Parse command line arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Process the command
pub async fn process_command(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Scrape { url, output, model } => {
            info!("Scraping {}", url);
            let config = commands::load_config(cli.config.as_deref(), model, None)?;
            commands::scrape(&config, url, output).await
        }
        Commands::Batch { urls, input, output, delay_ms, model } => {
            let config = commands::load_config(cli.config.as_deref(), model, delay_ms)?;
            let urls = commands::collect_urls(urls, input.as_deref())?;
            info!("Starting batch of {} URLs", urls.len());
            commands::batch(&config, urls, output).await
        }
        Commands::Config { init } => {
            if init {
                info!("Writing default configuration");
                commands::init_config()
            } else {
                commands::show_config(cli.config.as_deref())
            }
        }
    }
}
