pub mod client;
pub mod prompt;

use async_trait::async_trait;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::cli::config::LlmSettings;
use crate::crawler::record::{SynthesizedFields, NULL_VALUE};
use crate::error::SynthesisError;
use crate::extract::PageContent;

pub use client::CompletionClient;
pub use prompt::build_extraction_prompt;

/// Fills job record fields from page content
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, content: &PageContent, url: &str) -> Result<SynthesizedFields, SynthesisError>;
}

/// Synthesizer backed by a remote chat-completion model
pub struct LlmSynthesizer {
    client: CompletionClient,
}

impl LlmSynthesizer {
    pub fn new(settings: LlmSettings) -> Result<Self, SynthesisError> {
        Ok(Self {
            client: CompletionClient::new(settings)?,
        })
    }
}

#[async_trait]
impl Synthesizer for LlmSynthesizer {
    async fn synthesize(&self, content: &PageContent, url: &str) -> Result<SynthesizedFields, SynthesisError> {
        let prompt = build_extraction_prompt(content, url)?;

        debug!("Requesting structured fields for {} from {}", url, self.client.model());
        let reply = self.client.complete(&prompt).await?;

        parse_model_reply(&reply).map_err(|e| {
            warn!("Unusable model reply for {}: {}", url, e);
            e
        })
    }
}

/// Parse the model's reply into record fields.
///
/// A ```` ```json ```` fenced block anywhere in the reply takes precedence
/// over the raw text.
pub fn parse_model_reply(reply: &str) -> Result<SynthesizedFields, SynthesisError> {
    let payload = fenced_json(reply).unwrap_or(reply).trim();

    let value: Value = serde_json::from_str(payload).map_err(SynthesisError::InvalidJson)?;
    let Value::Object(object) = value else {
        return Err(SynthesisError::NotAnObject);
    };

    Ok(SynthesizedFields {
        job_title: field_text(&object, "job_title"),
        job_description: field_text(&object, "job_description"),
        job_location: field_text(&object, "job_location"),
        job_salary: field_text(&object, "job_salary"),
        job_id: field_text(&object, "job_id"),
        basic_qualifications: field_text(&object, "basic_qualifications"),
        preferred_qualifications: field_text(&object, "preferred_qualifications"),
    })
}

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json\s*([\s\S]*?)\s*```").expect("fence pattern is valid"));

fn fenced_json(reply: &str) -> Option<&str> {
    JSON_FENCE
        .captures(reply)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn field_text(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).map(value_text)
}

/// Render any JSON value as record text; blank text becomes `"NULL"`
fn value_text(value: &Value) -> String {
    let text = match value {
        Value::Null => NULL_VALUE.to_string(),
        Value::String(s) => s.trim().to_string(),
        Value::Number(_) | Value::Bool(_) | Value::Object(_) => value.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_text)
            .filter(|t| t != NULL_VALUE)
            .collect::<Vec<_>>()
            .join("\n"),
    };

    if text.is_empty() {
        NULL_VALUE.to_string()
    } else {
        text
    }
}
