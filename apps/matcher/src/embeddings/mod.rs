//! Embedding capability — the only optional, potentially slow dependency of the engine.
//!
//! `Embedder` is the pluggable backend (`embed(texts) -> vectors`).
//! `EmbeddingService` wraps a backend with an init-once warm-up call, an
//! availability flag, and a timeout on every call. Scoring only ever reads
//! through the service, so one instance is shared by all concurrent scorers.
//!
//! RULE: failures never escape `EmbeddingService::embed`. They are logged and
//! reported as `None` ("unavailable for this call") so callers take the
//! exact-match / Jaccard path instead.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

pub mod http;
pub mod similarity;

pub use http::HttpEmbedder;
pub use similarity::{cosine_similarity, max_similarity};

/// Text embedded once to decide whether the backend is usable at all.
const WARM_UP_TEXT: &str = "warm-up";

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Embedding backend returned {got} vectors for {expected} inputs")]
    CountMismatch { expected: usize, got: usize },

    #[error("Embedding backend returned no vectors")]
    EmptyResponse,

    #[error("Embedding call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Embedding capability unavailable")]
    Unavailable,
}

/// A backend that maps texts to vectors, one vector per input in input order.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

/// Process-wide, read-only embedding service with a lazy init-once lifecycle.
pub struct EmbeddingService {
    backend: Arc<dyn Embedder>,
    timeout: Duration,
    ready: OnceCell<bool>,
}

impl EmbeddingService {
    pub fn new(backend: Arc<dyn Embedder>, timeout: Duration) -> Self {
        Self {
            backend,
            timeout,
            ready: OnceCell::new(),
        }
    }

    /// Runs the warm-up call on first use and caches the outcome for the
    /// life of the service. Concurrent first callers share one warm-up.
    pub async fn is_available(&self) -> bool {
        *self.ready.get_or_init(|| self.warm_up()).await
    }

    /// Availability if already decided, without triggering the warm-up.
    pub fn availability(&self) -> Option<bool> {
        self.ready.get().copied()
    }

    async fn warm_up(&self) -> bool {
        match self.call_backend(&[WARM_UP_TEXT.to_string()]).await {
            Ok(_) => {
                info!(backend = self.backend.name(), "Embedding capability ready");
                true
            }
            Err(e) => {
                warn!(
                    backend = self.backend.name(),
                    error = %e,
                    "Embedding capability unavailable; falling back to exact matching"
                );
                false
            }
        }
    }

    /// Embeds `texts`, surfacing the failure reason for `embed` to log.
    async fn try_embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        if !self.is_available().await {
            return Err(EmbeddingError::Unavailable);
        }
        self.call_backend(texts).await
    }

    /// Embeds `texts`, or `None` if the capability is unavailable for this call.
    pub async fn embed(&self, texts: &[String]) -> Option<Vec<Vec<f32>>> {
        match self.try_embed(texts).await {
            Ok(vectors) => Some(vectors),
            Err(EmbeddingError::Unavailable) => None,
            Err(e) => {
                warn!(
                    backend = self.backend.name(),
                    inputs = texts.len(),
                    error = %e,
                    "Embedding call failed; using exact path for this call"
                );
                None
            }
        }
    }

    async fn call_backend(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let vectors = tokio::time::timeout(self.timeout, self.backend.embed(texts))
            .await
            .map_err(|_| EmbeddingError::Timeout(self.timeout))??;

        if vectors.is_empty() {
            return Err(EmbeddingError::EmptyResponse);
        }
        if vectors.len() != texts.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: texts.len(),
                got: vectors.len(),
            });
        }

        debug!(inputs = texts.len(), "Embedding call succeeded");
        Ok(vectors)
    }
}
