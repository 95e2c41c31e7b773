//! Remote embedding provider.
//!
//! Calls an OpenAI-compatible `/embeddings` endpoint with a bounded request
//! timeout. A slow or unreachable endpoint surfaces as an error here; the
//! write path absorbs it and stores the record without a vector.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::{l2_normalize, EmbeddingProvider, EMBEDDING_DIM};
use crate::config::EmbeddingConfig;

pub struct RemoteEmbeddingProvider {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl RemoteEmbeddingProvider {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build embedding HTTP client")?;

        tracing::info!(
            endpoint = %config.endpoint,
            model = %config.model,
            timeout_secs = config.timeout_secs,
            "remote embedding provider ready"
        );

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
        })
    }
}

impl EmbeddingProvider for RemoteEmbeddingProvider {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "model": self.model, "input": [text] }))
            .send()
            .context("embedding request failed")?
            .error_for_status()
            .context("embedding provider returned an error status")?;

        let body: EmbeddingsResponse = response
            .json()
            .context("malformed embeddings response")?;

        let mut embedding = body
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| anyhow::anyhow!("embeddings response contained no vectors"))?;

        anyhow::ensure!(
            embedding.len() == EMBEDDING_DIM,
            "provider returned {} dimensions, expected {EMBEDDING_DIM}",
            embedding.len()
        );

        l2_normalize(&mut embedding);
        Ok(embedding)
    }
}
