use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure while retrieving a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("server returned HTTP {status}")]
    Status { status: u16 },

    #[error("could not read response body: {0}")]
    Body(#[source] reqwest::Error),
}

/// Failure while asking the language model to structure a page
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("no API key configured for the completion endpoint")]
    MissingApiKey,

    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("completion endpoint returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("model reply had no message content")]
    EmptyContent,

    #[error("failed to parse JSON response: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("model reply was JSON but not an object")]
    NotAnObject,

    #[error("failed to serialize page content for the prompt: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Stage at which a single URL's pipeline degraded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    Fetch,
    Synthesis,
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Failed to fetch webpage content: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to structure job details: {0}")]
    Synthesis(#[from] SynthesisError),
}

impl ScrapeError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ScrapeError::Fetch(_) => FailureKind::Fetch,
            ScrapeError::Synthesis(_) => FailureKind::Synthesis,
        }
    }
}
