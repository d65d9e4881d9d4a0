//! HTTP embedding client for OpenAI-compatible `/embeddings` endpoints.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use super::EmbeddingProvider;
use crate::types::RagError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Deserialize)]
struct EmbeddingRow {
    index: usize,
    embedding: Vec<f32>,
}

/// Embedding provider backed by a remote OpenAI-compatible service.
///
/// Sends the whole batch in one request and returns rows re-ordered by
/// the service-reported index. Failures propagate to the caller
/// unrecovered; there are no internal retries.
pub struct HttpEmbeddingProvider {
    client: reqwest::Client,
    endpoint: Url,
    model: String,
    api_key: Option<String>,
}

impl HttpEmbeddingProvider {
    /// Client for `base_url` (the service root, e.g. `http://host:port`)
    /// and the given model identifier.
    pub fn new(base_url: &str, model: impl Into<String>) -> Result<Self, RagError> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(RagError::Embedding(
                "missing embedding model identifier".to_string(),
            ));
        }

        let endpoint = format!("{}/embeddings", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&endpoint)
            .map_err(|err| RagError::Embedding(format!("invalid endpoint '{endpoint}': {err}")))?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            model,
            api_key: None,
        })
    }

    /// Attach a bearer token sent with every request.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };

        let mut builder = self.client.post(self.endpoint.clone()).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(RagError::Embedding(format!(
                "embedding request failed ({status}): {body}"
            )));
        }

        let mut parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|err| RagError::Embedding(format!("unreadable embedding response: {err}")))?;

        parsed.data.sort_by_key(|row| row.index);
        if parsed.data.len() != texts.len() {
            return Err(RagError::Embedding(format!(
                "service returned {} embeddings for {} inputs",
                parsed.data.len(),
                texts.len()
            )));
        }

        Ok(parsed.data.into_iter().map(|row| row.embedding).collect())
    }
}
