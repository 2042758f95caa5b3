use anyhow::Result;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::cli::config::ScraperConfig;
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::crawler::record::{JobRecord, ScrapeResult};
use crate::error::ScrapeError;
use crate::extract::{baseline_record, extract_page_content};
use crate::llm::{LlmSynthesizer, Synthesizer};
use crate::storage::write_results;
use crate::utils::metrics::{RequestTimer, ScrapeMetrics};

/// Runs fetch, extraction, baseline and synthesis for each URL, one at a time
pub struct ScrapeController {
    fetcher: Box<dyn PageFetcher>,
    synthesizer: Box<dyn Synthesizer>,
    rate_limit_delay: Duration,
}

impl ScrapeController {
    /// Create a controller talking to real HTTP endpoints
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.fetcher)?;
        let synthesizer = LlmSynthesizer::new(config.llm.clone())?;

        Ok(Self::with_components(
            Box::new(fetcher),
            Box::new(synthesizer),
            Duration::from_millis(config.batch.rate_limit_delay_ms),
        ))
    }

    pub fn with_components(
        fetcher: Box<dyn PageFetcher>,
        synthesizer: Box<dyn Synthesizer>,
        rate_limit_delay: Duration,
    ) -> Self {
        Self {
            fetcher,
            synthesizer,
            rate_limit_delay,
        }
    }

    /// Scrape one job posting. Always returns a result; failures degrade it.
    pub async fn scrape_job_posting(&self, url: &str) -> ScrapeResult {
        let markup = match self.fetcher.fetch(url).await {
            Ok(markup) => markup,
            Err(e) => {
                warn!("Error fetching webpage {}: {}", url, e);
                return ScrapeResult::new(url, JobRecord::unknown(), Some(ScrapeError::from(e)));
            }
        };

        let content = extract_page_content(&markup, url);
        let baseline = baseline_record(&content, url);

        match self.synthesizer.synthesize(&content, url).await {
            Ok(fields) => ScrapeResult::new(url, baseline.merge(&fields), None),
            Err(e) => {
                warn!("Falling back to heuristic fields for {}: {}", url, e);
                ScrapeResult::new(url, baseline, Some(ScrapeError::from(e)))
            }
        }
    }

    /// Scrape every URL in order, pausing after each, and optionally save the results.
    ///
    /// A failed save is logged; the results are returned either way.
    pub async fn batch_scrape_jobs(&self, urls: &[String], output_file: Option<&Path>) -> Vec<ScrapeResult> {
        let (results, _) = self.batch_scrape_with_metrics(urls, output_file).await;
        results
    }

    /// Same as `batch_scrape_jobs`, also returning the batch counters
    pub async fn batch_scrape_with_metrics(
        &self,
        urls: &[String],
        output_file: Option<&Path>,
    ) -> (Vec<ScrapeResult>, ScrapeMetrics) {
        let mut results = Vec::with_capacity(urls.len());
        let mut metrics = ScrapeMetrics::new();

        for url in urls {
            info!("Scraping job posting at {}...", url);

            let timer = RequestTimer::start();
            let result = self.scrape_job_posting(url).await;
            metrics.record(&result, timer.end());
            results.push(result);

            // Politeness delay, applied after every URL regardless of outcome
            tokio::time::sleep(self.rate_limit_delay).await;
        }

        info!("Batch finished: {}", metrics.summary());

        if let Some(path) = output_file {
            match write_results(path, &results) {
                Ok(()) => info!("Results saved to {}", path.display()),
                Err(e) => error!("Could not save {} results to {}: {:#}", results.len(), path.display(), e),
            }
        }

        (results, metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::fetcher::MockPageFetcher;
    use crate::crawler::record::{SynthesizedFields, NULL_VALUE};
    use crate::error::{FailureKind, FetchError, SynthesisError};
    use crate::llm::MockSynthesizer;
    use std::time::Instant;

    const PAGE: &str = "<html><head><title>Engineer | Acme Careers</title></head>\
        <body><h1>Engineer</h1><p>Ship Rust services.</p></body></html>";

    fn page_fetcher() -> MockPageFetcher {
        let mut fetcher = MockPageFetcher::new();
        fetcher.expect_fetch().returning(|_| Ok(PAGE.to_string()));
        fetcher
    }

    fn controller(fetcher: MockPageFetcher, synthesizer: MockSynthesizer) -> ScrapeController {
        ScrapeController::with_components(Box::new(fetcher), Box::new(synthesizer), Duration::from_millis(0))
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_later_stages() {
        let mut fetcher = MockPageFetcher::new();
        fetcher
            .expect_fetch()
            .times(1)
            .returning(|_| Err(FetchError::Status { status: 404 }));

        let mut synthesizer = MockSynthesizer::new();
        synthesizer.expect_synthesize().never();

        let result = controller(fetcher, synthesizer)
            .scrape_job_posting("https://acme.com/jobs/7")
            .await;

        assert_eq!(result.url, "https://acme.com/jobs/7");
        assert_eq!(result.record, JobRecord::unknown());
        assert_eq!(result.failure, Some(FailureKind::Fetch));
        assert!(result.error.as_deref().unwrap().starts_with("Failed to fetch webpage content"));
    }

    #[tokio::test]
    async fn test_synthesis_failure_keeps_baseline() {
        let mut synthesizer = MockSynthesizer::new();
        synthesizer.expect_synthesize().returning(|_, _| {
            Err(SynthesisError::InvalidJson(
                serde_json::from_str::<serde_json::Value>("not json").unwrap_err(),
            ))
        });

        let result = controller(page_fetcher(), synthesizer)
            .scrape_job_posting("https://acme.com/jobs/7")
            .await;

        let expected = baseline_record(&extract_page_content(PAGE, "https://acme.com/jobs/7"), "https://acme.com/jobs/7");
        assert_eq!(result.record, expected);
        assert_eq!(result.record.job_title, "Engineer");
        assert_eq!(result.record.job_id, "7");
        assert_eq!(result.failure, Some(FailureKind::Synthesis));
        assert!(result.error.is_some());
    }

    #[tokio::test]
    async fn test_synthesized_fields_override_baseline() {
        let mut synthesizer = MockSynthesizer::new();
        synthesizer.expect_synthesize().times(1).returning(|content, url| {
            assert_eq!(url, "https://acme.com/jobs/7");
            assert!(content.all_text.contains("Ship Rust services."));
            Ok(SynthesizedFields {
                job_title: Some("Senior Engineer".to_string()),
                job_location: Some("Remote".to_string()),
                job_id: Some("NULL".to_string()),
                ..Default::default()
            })
        });

        let result = controller(page_fetcher(), synthesizer)
            .scrape_job_posting("https://acme.com/jobs/7")
            .await;

        assert_eq!(result.record.job_title, "Senior Engineer");
        assert_eq!(result.record.job_location, "Remote");
        assert_eq!(result.record.job_id, "7");
        assert_eq!(result.record.job_salary, NULL_VALUE);
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_batch_keeps_order_and_paces_requests() {
        let mut fetcher = MockPageFetcher::new();
        fetcher.expect_fetch().times(3).returning(|url| {
            if url.ends_with("/2") {
                Err(FetchError::Status { status: 500 })
            } else {
                Ok(PAGE.to_string())
            }
        });

        let mut synthesizer = MockSynthesizer::new();
        synthesizer
            .expect_synthesize()
            .times(2)
            .returning(|_, _| Ok(SynthesizedFields::default()));

        let delay = Duration::from_millis(30);
        let controller = ScrapeController::with_components(Box::new(fetcher), Box::new(synthesizer), delay);
        let urls: Vec<String> = (1..=3).map(|i| format!("https://acme.com/jobs/{}", i)).collect();

        let started = Instant::now();
        let (results, metrics) = controller.batch_scrape_with_metrics(&urls, None).await;
        let elapsed = started.elapsed();

        let got: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(got, urls.iter().map(String::as_str).collect::<Vec<_>>());
        assert!(results[1].is_degraded());
        assert_eq!(results[1].record, JobRecord::unknown());
        assert!(!results[0].is_degraded());
        assert!(!results[2].is_degraded());
        assert!(elapsed >= delay * 2);

        assert_eq!(metrics.total, 3);
        assert_eq!(metrics.fetch_failures, 1);
        assert_eq!(metrics.succeeded, 2);
    }

    #[tokio::test]
    async fn test_batch_writes_output_file() {
        let mut synthesizer = MockSynthesizer::new();
        synthesizer
            .expect_synthesize()
            .returning(|_, _| Ok(SynthesizedFields::default()));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        let urls = vec!["https://acme.com/jobs/1".to_string()];

        let results = controller(page_fetcher(), synthesizer)
            .batch_scrape_jobs(&urls, Some(&path))
            .await;
        assert_eq!(results.len(), 1);

        let saved = tokio_test::assert_ok!(crate::storage::read_results(&path));
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].record.job_title, "Engineer");
    }

    #[tokio::test]
    async fn test_unwritable_output_still_returns_results() {
        let mut synthesizer = MockSynthesizer::new();
        synthesizer
            .expect_synthesize()
            .times(2)
            .returning(|_, _| Ok(SynthesizedFields::default()));

        let mut fetcher = MockPageFetcher::new();
        fetcher.expect_fetch().times(2).returning(|_| Ok(PAGE.to_string()));

        // An existing directory cannot be overwritten as a file
        let dir = tempfile::tempdir().unwrap();
        let urls = vec!["https://acme.com/jobs/1".to_string(), "https://acme.com/jobs/2".to_string()];

        let (results, metrics) = controller(fetcher, synthesizer)
            .batch_scrape_with_metrics(&urls, Some(dir.path()))
            .await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[1].record.job_id, "2");
        assert_eq!(metrics.succeeded, 2);
        assert!(dir.path().is_dir());
    }
}
