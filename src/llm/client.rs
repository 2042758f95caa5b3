use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

use crate::cli::config::LlmSettings;
use crate::error::SynthesisError;

#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: Option<ReplyMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplyMessage {
    pub content: Option<String>,
}

impl CompletionResponse {
    /// `choices[0].message.content`
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
    }
}

/// Single-turn client for an OpenAI-style chat-completion endpoint
pub struct CompletionClient {
    client: Client,
    settings: LlmSettings,
}

impl CompletionClient {
    pub fn new(settings: LlmSettings) -> Result<Self, SynthesisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self { client, settings })
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    /// Send `prompt` as one user message and return the reply text
    pub async fn complete(&self, prompt: &str) -> Result<String, SynthesisError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(SynthesisError::MissingApiKey)?;

        let request = CompletionRequest {
            model: &self.settings.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut builder = self
            .client
            .post(&self.settings.endpoint)
            .bearer_auth(api_key)
            .header("Content-Type", "application/json")
            .json(&request);

        if let Some(site_url) = &self.settings.site_url {
            builder = builder.header("HTTP-Referer", site_url);
        }
        if let Some(site_name) = &self.settings.site_name {
            builder = builder.header("X-Title", site_name);
        }

        debug!("Sending completion request to {} (model {})", self.settings.endpoint, self.settings.model);

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!("Completion endpoint returned {}: {}", status, message);
            return Err(SynthesisError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: CompletionResponse = response.json().await?;

        body.first_content()
            .map(str::to_string)
            .ok_or(SynthesisError::EmptyContent)
    }
}
