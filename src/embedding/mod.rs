//! Text-to-vector embedding via an external provider.
//!
//! Provides the [`EmbeddingProvider`] trait and a remote implementation that
//! calls an OpenAI-compatible embeddings endpoint. Vector search is optional:
//! [`create_provider`] returns `None` when it is disabled, and a provider
//! failure degrades a write (the record is stored without a vector) instead of
//! failing it.

pub mod remote;

use std::sync::Arc;

use anyhow::Result;

/// Number of dimensions in the embedding vectors.
pub const EMBEDDING_DIM: usize = 384;

/// Trait for embedding text into vectors.
///
/// Implementations produce L2-normalized vectors of exactly [`EMBEDDING_DIM`]
/// dimensions. All methods are synchronous; callers in async contexts should
/// use `tokio::task::spawn_blocking`.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text string into a vector.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Return the number of dimensions this provider produces.
    fn dimensions(&self) -> usize {
        EMBEDDING_DIM
    }
}

/// Create an embedding provider from config, or `None` when vector search is disabled.
pub fn create_provider(
    config: &crate::config::EmbeddingConfig,
) -> Result<Option<Box<dyn EmbeddingProvider>>> {
    match config.provider.as_str() {
        "none" => Ok(None),
        "remote" => {
            let provider = remote::RemoteEmbeddingProvider::new(config)?;
            Ok(Some(Box::new(provider)))
        }
        other => anyhow::bail!("unknown embedding provider: {other}. Supported: remote, none"),
    }
}

/// Embed content for a write, absorbing provider failures into the degraded path.
///
/// Returns `None` when the module is disabled or the provider errors; the
/// caller stores the record without a vector either way.
pub async fn embed_degraded(
    provider: Option<Arc<dyn EmbeddingProvider>>,
    text: &str,
) -> Option<Vec<f32>> {
    let provider = provider?;
    let text = text.to_string();
    match tokio::task::spawn_blocking(move || provider.embed(&text)).await {
        Ok(Ok(vector)) => Some(vector),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "embedding failed, continuing without a vector");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "embedding task failed, continuing without a vector");
            None
        }
    }
}

/// L2-normalize a vector in place. No-op for the zero vector.
pub fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}
