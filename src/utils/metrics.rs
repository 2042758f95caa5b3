use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::crawler::record::ScrapeResult;
use crate::error::FailureKind;

/// Counters for one batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeMetrics {
    /// Start time of the batch
    pub start_time: DateTime<Utc>,

    pub total: usize,

    /// URLs whose pipeline ran without degrading
    pub succeeded: usize,

    pub fetch_failures: usize,

    pub synthesis_failures: usize,

    /// Wall-clock time per URL in milliseconds, in input order
    pub durations_ms: Vec<u64>,
}

impl Default for ScrapeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrapeMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Utc::now(),
            total: 0,
            succeeded: 0,
            fetch_failures: 0,
            synthesis_failures: 0,
            durations_ms: Vec::new(),
        }
    }

    /// Record one URL's outcome
    pub fn record(&mut self, result: &ScrapeResult, duration_ms: u64) {
        self.total += 1;
        self.durations_ms.push(duration_ms);

        match result.failure {
            None => self.succeeded += 1,
            Some(FailureKind::Fetch) => self.fetch_failures += 1,
            Some(FailureKind::Synthesis) => self.synthesis_failures += 1,
        }
    }

    pub fn average_duration_ms(&self) -> u64 {
        if self.durations_ms.is_empty() {
            return 0;
        }
        self.durations_ms.iter().sum::<u64>() / self.durations_ms.len() as u64
    }

    /// One-line human readable summary
    pub fn summary(&self) -> String {
        let elapsed = (Utc::now() - self.start_time).num_milliseconds().max(0);
        format!(
            "{} URLs in {}ms: {} ok, {} fetch failures, {} synthesis failures (avg {}ms/URL)",
            self.total,
            elapsed,
            self.succeeded,
            self.fetch_failures,
            self.synthesis_failures,
            self.average_duration_ms()
        )
    }
}

/// Request timer for measuring per-URL durations
pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed time in milliseconds
    pub fn end(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}
