//! Story-generation client.
//!
//! Thin wrapper over an Ollama-style `/api/generate` endpoint. There is no
//! contract on the generated text's content, length, or determinism.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use storyrec_core::{Error, Result};

use crate::retry::{send_with_retry, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

#[derive(Clone)]
pub struct GeneratorClient {
    client: Client,
    endpoint: String,
    model: String,
    timeout: Duration,
    max_retries: usize,
}

impl GeneratorClient {
    pub fn new(base_url: &str, model: &str) -> Result<Self> {
        if model.trim().is_empty() {
            return Err(Error::collaborator("generator", "missing model name"));
        }

        let client = Client::builder()
            .build()
            .map_err(|e| Error::collaborator("generator", e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/generate", base_url.trim_end_matches('/')),
            model: model.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Prompt used to spin a new story out of retrieved keywords.
    #[must_use]
    pub fn story_prompt(keywords: &[String]) -> String {
        format!("Write a story based on these keywords: {}", keywords.join(", "))
    }

    /// Generate text for a prompt.
    pub fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let resp = send_with_retry("generator", self.max_retries, || {
            self.client
                .post(&self.endpoint)
                .timeout(self.timeout)
                .json(&request)
        })?;

        let parsed: GenerateResponse = resp
            .json()
            .map_err(|e| Error::collaborator("generator", format!("malformed response: {}", e)))?;
        Ok(parsed.response)
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}
