use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::cli::config::{ScraperConfig, API_KEY_ENV};
use crate::crawler::controller::ScrapeController;
use crate::crawler::record::ScrapeResult;
use crate::storage::write_results;

/// Resolve the effective configuration: file, then environment, then flags
pub fn load_config(path: Option<&Path>, model: Option<String>, delay_ms: Option<u64>) -> Result<ScraperConfig> {
    let mut config = match path {
        Some(path) => ScraperConfig::load_from_file(path)?,
        None => ScraperConfig::load_default()?,
    }
    .with_env_overrides();

    if let Some(model) = model {
        config.llm.model = model;
    }

    if let Some(delay) = delay_ms {
        config.batch.rate_limit_delay_ms = delay;
    }

    if config.llm.api_key.is_none() {
        warn!(
            "No API key configured (set {} or llm.api_key); results will only contain heuristic fields",
            API_KEY_ENV
        );
    }

    Ok(config)
}

/// Merge URLs given as arguments with those listed in `input`
pub fn collect_urls(mut urls: Vec<String>, input: Option<&Path>) -> Result<Vec<String>> {
    if let Some(path) = input {
        let contents = fs::read_to_string(path)
            .context(format!("Failed to read URL list: {}", path.display()))?;
        urls.extend(parse_url_list(&contents));
    }

    if urls.is_empty() {
        anyhow::bail!("No URLs given; pass them as arguments or with --input");
    }

    Ok(urls)
}

fn parse_url_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Scrape one posting and print it
pub async fn scrape(config: &ScraperConfig, url: String, output: Option<PathBuf>) -> Result<()> {
    let controller = ScrapeController::new(config)?;
    let result = controller.scrape_job_posting(&url).await;

    println!("{}", serde_json::to_string_pretty(&result)?);

    if let Some(path) = output {
        write_results(&path, std::slice::from_ref(&result))?;
        info!("Result saved to {}", path.display());
    }

    Ok(())
}

/// Scrape every URL; print the results unless they were saved to a file
pub async fn batch(config: &ScraperConfig, urls: Vec<String>, output: Option<PathBuf>) -> Result<()> {
    let controller = ScrapeController::new(config)?;
    let results = controller.batch_scrape_jobs(&urls, None).await;

    if !save_results(output.as_deref(), &results) {
        println!("{}", serde_json::to_string_pretty(&results)?);
    }

    Ok(())
}

/// Write results to `output` if one was given. Returns false when nothing was saved.
fn save_results(output: Option<&Path>, results: &[ScrapeResult]) -> bool {
    let Some(path) = output else {
        return false;
    };

    match write_results(path, results) {
        Ok(()) => {
            info!("Results saved to {}", path.display());
            true
        }
        Err(e) => {
            error!("Could not save results to {}: {:#}; printing them instead", path.display(), e);
            false
        }
    }
}

/// Show the current configuration
pub fn show_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(path) => ScraperConfig::load_from_file(path)?,
        None => ScraperConfig::load_default()?,
    }
    .with_env_overrides();

    println!("Current configuration:");
    println!("{}", serde_yaml::to_string(&config.redacted())?);

    Ok(())
}

/// Write the built-in defaults to the default location
pub fn init_config() -> Result<()> {
    let path = ScraperConfig::default_path();
    if path.exists() {
        warn!("Overwriting existing configuration at {}", path.display());
    }

    ScraperConfig::default().save_as_default()?;
    println!("Wrote default configuration to {}", path.display());

    Ok(())
}
