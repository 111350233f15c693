//! Sentence-encoder client.
//!
//! Talks to an OpenAI-compatible embeddings endpoint and implements the
//! core [`Embedder`] seam. The model is a fixed pretrained encoder; its
//! vectors are deterministic per model version only.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use storyrec_core::{Embedder, Error, Result, Vector};
use tracing::debug;

use crate::retry::{send_with_retry, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT};

/// General-purpose 384-dimension sentence encoder.
pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/v1";
const DEFAULT_BATCH_SIZE: usize = 64;

/// Blocking embeddings client for OpenAI-compatible endpoints.
#[derive(Clone)]
pub struct EncoderClient {
    client: Client,
    endpoint: String,
    model: String,
    timeout: Duration,
    max_retries: usize,
    batch_size: usize,
}

impl EncoderClient {
    pub fn new(base_url: &str, model: &str, api_key: Option<&str>) -> Result<Self> {
        if model.trim().is_empty() {
            return Err(Error::collaborator("encoder", "missing model name"));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            let auth = format!("Bearer {}", key.trim());
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&auth)
                    .map_err(|_| Error::collaborator("encoder", "invalid API key"))?,
            );
        }

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Error::collaborator("encoder", e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            model: model.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            batch_size: DEFAULT_BATCH_SIZE,
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    fn encode_chunk(&self, inputs: &[&str]) -> Result<Vec<Vector>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: inputs,
        };

        let resp = send_with_retry("encoder", self.max_retries, || {
            self.client
                .post(&self.endpoint)
                .timeout(self.timeout)
                .json(&request)
        })?;

        let mut parsed: EmbeddingResponse = resp
            .json()
            .map_err(|e| Error::collaborator("encoder", format!("malformed response: {}", e)))?;
        parsed.data.sort_by_key(|entry| entry.index);

        if parsed.data.len() != inputs.len() {
            return Err(Error::collaborator(
                "encoder",
                format!("returned {} embeddings for {} inputs", parsed.data.len(), inputs.len()),
            ));
        }

        Ok(parsed
            .data
            .into_iter()
            .map(|entry| Vector::new(entry.embedding))
            .collect())
    }
}

impl Embedder for EncoderClient {
    /// Encode the texts in order, batching requests as needed.
    ///
    /// Any failure discards the whole run; partial vector sequences are
    /// never returned.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.batch_size) {
            debug!(count = chunk.len(), model = %self.model, "encoding batch");
            vectors.extend(self.encode_chunk(chunk)?);
        }
        Ok(vectors)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_normalization() {
        let client = EncoderClient::new("http://localhost:8080/v1/", DEFAULT_MODEL, None).unwrap();
        assert_eq!(client.endpoint, "http://localhost:8080/v1/embeddings");
    }

    #[test]
    fn test_empty_model_is_rejected() {
        assert!(EncoderClient::new(DEFAULT_BASE_URL, "  ", None).is_err());
    }

    #[test]
    fn test_response_entries_sort_by_index() {
        let json = r#"{"data":[{"embedding":[0.0,1.0],"index":1},{"embedding":[1.0,0.0],"index":0}]}"#;
        let mut parsed: EmbeddingResponse = serde_json::from_str(json).unwrap();
        parsed.data.sort_by_key(|entry| entry.index);
        assert_eq!(parsed.data[0].embedding, vec![1.0, 0.0]);
    }
}
