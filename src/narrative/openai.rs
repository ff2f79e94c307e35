// OpenAI-compatible completions client.
//
// Posts the prompt to `{base}/completions` with fixed sampling parameters
// and returns the first choice's text as-is. No retries: a failed call is
// an ExternalService error for the whole analysis.
//
// API docs: https://platform.openai.com/docs/api-reference/completions

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::NarrativeGenerator;
use crate::error::AnalysisError;

const SERVICE: &str = "completion API";

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionParams {
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1000,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

/// Narrative generator backed by a hosted completion endpoint.
pub struct OpenAiNarrator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    params: CompletionParams,
}

impl OpenAiNarrator {
    pub fn new(api_key: String, base_url: &str, model: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build completion API client")?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            params: CompletionParams::default(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/completions", self.base_url)
    }
}

#[async_trait]
impl NarrativeGenerator for OpenAiNarrator {
    async fn generate(&self, prompt: &str) -> Result<String, AnalysisError> {
        let request = CompletionRequest {
            model: &self.model,
            prompt,
            temperature: self.params.temperature,
            max_tokens: self.params.max_tokens,
            top_p: self.params.top_p,
            frequency_penalty: self.params.frequency_penalty,
            presence_penalty: self.params.presence_penalty,
        };

        debug!(
            model = %self.model,
            prompt_chars = prompt.len(),
            "Requesting completion"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::external(SERVICE, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::external(
                SERVICE,
                format!("returned {status}: {body}"),
            ));
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::external(SERVICE, format!("malformed response: {e}")))?;

        first_choice(parsed)
    }
}

fn first_choice(response: CompletionResponse) -> Result<String, AnalysisError> {
    response
        .choices
        .into_iter()
        .next()
        .map(|c| c.text)
        .ok_or_else(|| AnalysisError::external(SERVICE, "response contained no choices"))
}

// --- Completions API request/response types ---

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f64,
    max_tokens: u32,
    top_p: f64,
    frequency_penalty: f64,
    presence_penalty: f64,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    text: String,
}
