//! Embedding client for HTTP /embed/batch.
//!
//! Implements the retrieval crate's [`Embedder`] seam against the external
//! embedding service. Unlike the classifier path, failures here are hard
//! errors: no ranking is possible without vectors.

use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use yammy_retrieval::Embedder;

use crate::config::EmbeddingSettings;

#[derive(Deserialize)]
struct EmbedBatchResponse {
    vectors: Option<Vec<Vec<f32>>>,
}

/// HTTP embedding client: POST `{base}/embed/batch` with `{texts, model?}`.
pub struct EmbeddingClient {
    client: reqwest::Client,
    base_url: String,
    model: Option<String>,
}

impl EmbeddingClient {
    /// Build a client from settings.
    #[must_use]
    pub fn new(settings: &EmbeddingSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: settings.url.trim_end_matches('/').to_string(),
            model: settings
                .model
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string),
        }
    }

    /// Embed a batch of texts.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or a
    /// reply without vectors.
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        let started = Instant::now();
        let url = format!("{}/embed/batch", self.base_url);
        let mut body = serde_json::json!({ "texts": texts });
        if let Some(ref model) = self.model {
            body["model"] = serde_json::Value::String(model.clone());
        }
        let resp = self.client.post(&url).json(&body).send().await?;
        if !resp.status().is_success() {
            return Err(anyhow::anyhow!(
                "embedding service returned {}",
                resp.status()
            ));
        }
        let data: EmbedBatchResponse = resp.json().await?;
        let vectors = data
            .vectors
            .ok_or_else(|| anyhow::anyhow!("embedding service reply carried no vectors"))?;
        tracing::debug!(
            event = "embedding.batch.completed",
            elapsed_ms = started.elapsed().as_millis(),
            vector_count = vectors.len(),
            "embedding batch completed"
        );
        Ok(vectors)
    }
}

#[async_trait]
impl Embedder for EmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let texts = [text.to_string()];
        self.embed_batch(&texts)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("embedding service returned an empty batch"))
    }
}
