//! Narration client.
//!
//! Speech synthesis for story text over an OpenAI-style `/audio/speech`
//! endpoint: narration text plus a voice identifier and style instructions
//! in, an audio byte stream out. Out of scope for the core beyond this
//! call contract.

use std::time::Duration;

use bytes::Bytes;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Serialize;
use storyrec_core::{Error, Result};

use crate::retry::{send_with_retry, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini-tts";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Voices accepted by the narration service.
pub const VOICES: &[&str] = &[
    "alloy", "ash", "ballad", "coral", "echo", "sage", "shimmer", "verse",
];

pub const DEFAULT_INSTRUCTIONS: &str =
    "Depending on the theme of the story, narrate in a way that engages and interests readers";

#[derive(Clone)]
pub struct NarratorClient {
    client: Client,
    endpoint: String,
    model: String,
    timeout: Duration,
    max_retries: usize,
}

impl NarratorClient {
    pub fn new(base_url: &str, model: &str, api_key: Option<&str>) -> Result<Self> {
        if model.trim().is_empty() {
            return Err(Error::collaborator("narrator", "missing model name"));
        }

        let mut headers = HeaderMap::new();
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            let auth = format!("Bearer {}", key.trim());
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&auth)
                    .map_err(|_| Error::collaborator("narrator", "invalid API key"))?,
            );
        }

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Error::collaborator("narrator", e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/audio/speech", base_url.trim_end_matches('/')),
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

    /// Synthesize narration audio for `text` in the given voice.
    ///
    /// `instructions` defaults to [`DEFAULT_INSTRUCTIONS`] when `None`.
    pub fn narrate(&self, text: &str, voice: &str, instructions: Option<&str>) -> Result<Bytes> {
        let request = SpeechRequest {
            model: &self.model,
            voice,
            input: text,
            instructions: instructions.unwrap_or(DEFAULT_INSTRUCTIONS),
        };

        let resp = send_with_retry("narrator", self.max_retries, || {
            self.client
                .post(&self.endpoint)
                .timeout(self.timeout)
                .json(&request)
        })?;

        resp.bytes()
            .map_err(|e| Error::collaborator("narrator", format!("failed to read audio stream: {}", e)))
    }
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    instructions: &'a str,
}
