use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::crawler::record::ScrapeResult;

/// Write results as a pretty-printed JSON array.
///
/// Non-ASCII text is written as-is (UTF-8), not escaped.
pub fn write_results(path: &Path, results: &[ScrapeResult]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    let contents = serde_json::to_string_pretty(results)
        .context("Failed to serialize scrape results")?;

    fs::write(path, contents)
        .context(format!("Failed to write results file: {}", path.display()))?;

    debug!("Wrote {} results to {}", results.len(), path.display());

    Ok(())
}

/// Load a results file written by `write_results`
pub fn read_results(path: &Path) -> Result<Vec<ScrapeResult>> {
    let contents = fs::read_to_string(path)
        .context(format!("Failed to read results file: {}", path.display()))?;

    serde_json::from_str(&contents)
        .context(format!("Failed to parse results file: {}", path.display()))
}
