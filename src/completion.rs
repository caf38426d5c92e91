//! Completion API client
//!
//! One POST to `{root_url}/responses`, no retry. Failures are split into
//! [`HarnessError::Transport`] (the call did not produce a 2xx response) and
//! [`HarnessError::MalformedResponse`] (it did, but the payload has no
//! `outputs[0].text`).

use crate::error::{HarnessError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Completion request body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub input: String,
    pub instructions: String,
}

impl CompletionRequest {
    pub fn new(
        model: impl Into<String>,
        input: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            input: input.into(),
            instructions: instructions.into(),
        }
    }
}

/// Build the HTTP client the workflow owns.
///
/// `timeout` of `None` leaves reqwest's default (no overall timeout).
pub fn build_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| HarnessError::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Issues completion requests over a borrowed client
#[derive(Debug, Clone)]
pub struct CompletionOrchestrator<'a> {
    client: &'a Client,
    root_url: String,
}

impl<'a> CompletionOrchestrator<'a> {
    pub fn new(client: &'a Client, root_url: impl Into<String>) -> Self {
        Self {
            client,
            root_url: root_url.into(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/responses", self.root_url.trim_end_matches('/'))
    }

    /// Send `request` authenticated with `credential` and return `outputs[0].text`
    pub async fn complete(&self, credential: &str, request: &CompletionRequest) -> Result<String> {
        let url = self.endpoint();
        info!("Requesting completion from {} with model {}", url, request.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(credential)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    HarnessError::Config(format!("Invalid completion URL {}: {}", url, e))
                } else {
                    HarnessError::Transport(format!("POST {} failed: {}", url, e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(HarnessError::Transport(format!(
                "{} returned {}: {}",
                url, status, error_text
            )));
        }

        let body = response.bytes().await.map_err(|e| {
            HarnessError::Transport(format!("Failed to read response from {}: {}", url, e))
        })?;
        debug!("Completion response: {} bytes", body.len());

        extract_answer(&body)
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    outputs: Option<Vec<Output>>,
}

#[derive(Debug, Deserialize)]
struct Output {
    #[serde(default)]
    text: Option<String>,
}

/// Pull `outputs[0].text` out of a response body
pub fn extract_answer(body: &[u8]) -> Result<String> {
    let parsed: ApiResponse = serde_json::from_slice(body)
        .map_err(|e| HarnessError::MalformedResponse(format!("invalid JSON body: {}", e)))?;

    let outputs = parsed
        .outputs
        .ok_or_else(|| HarnessError::MalformedResponse("missing `outputs`".to_string()))?;

    let first = outputs
        .into_iter()
        .next()
        .ok_or_else(|| HarnessError::MalformedResponse("`outputs` is empty".to_string()))?;

    first
        .text
        .ok_or_else(|| HarnessError::MalformedResponse("`outputs[0]` has no `text`".to_string()))
}
