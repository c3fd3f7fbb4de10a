//! Match strategies — pluggable, trait-based matching of requirements and role text.
//!
//! `ExactStrategy`: verbatim token membership + Jaccard role relevance. Pure,
//! deterministic, no I/O.
//! `SemanticStrategy`: exact first, then embedding similarity for what exact
//! matching missed. Degrades to `ExactStrategy` behavior per call whenever the
//! embedding capability is unavailable.
//!
//! The engine holds an `Arc<dyn MatchStrategy>` chosen once at construction.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::embeddings::{max_similarity, EmbeddingService};

/// Minimum cosine for a requirement to count as semantically covered.
pub const SEMANTIC_THRESHOLD: f32 = 0.60;

/// Candidate tokens prepared for repeated coverage checks.
#[derive(Debug, Clone, Default)]
pub struct TokenIndex {
    tokens: Vec<String>,
    set: HashSet<String>,
    /// One vector per token, present only when the semantic strategy embedded them.
    vectors: Option<Vec<Vec<f32>>>,
}

impl TokenIndex {
    pub fn lexical(tokens: Vec<String>) -> Self {
        let set = tokens.iter().cloned().collect();
        Self {
            tokens,
            set,
            vectors: None,
        }
    }

    fn with_vectors(mut self, vectors: Vec<Vec<f32>>) -> Self {
        if vectors.len() == self.tokens.len() {
            self.vectors = Some(vectors);
        }
        self
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn contains(&self, token: &str) -> bool {
        self.set.contains(token)
    }

    pub fn is_semantic(&self) -> bool {
        self.vectors.is_some()
    }
}

/// Inputs for the role-relevance signal.
#[derive(Debug, Clone, Copy)]
pub struct RoleText<'a> {
    /// `"<title>. <JD excerpt>"`
    pub job_summary: &'a str,
    pub job_tokens: &'a [String],
    /// CV excerpt.
    pub cv_text: &'a str,
    pub cv_tokens: &'a [String],
}

/// The strategy trait. Implement this to swap matching backends without
/// touching the aggregator, gate, or ranking code.
#[async_trait]
pub trait MatchStrategy: Send + Sync {
    /// "exact" | "semantic" — reported on every run for transparency.
    fn backend(&self) -> &'static str;

    /// The backend that actually produced results. Differs from `backend()`
    /// only when a semantic capability turned out to be unavailable.
    fn effective_backend(&self) -> &'static str {
        self.backend()
    }

    /// Prepares candidate tokens for coverage checks.
    async fn index(&self, tokens: Vec<String>) -> TokenIndex;

    /// One flag per (already normalized) requirement: covered or not.
    async fn covered(&self, requirements: &[String], index: &TokenIndex) -> Vec<bool>;

    /// Similarity of the role description and the CV, in [0, 1].
    async fn role_relevance(&self, role: &RoleText<'_>) -> f64;
}

// ────────────────────────────────────────────────────────────────────────────
// ExactStrategy
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct ExactStrategy;

impl ExactStrategy {
    fn covered_now(requirements: &[String], index: &TokenIndex) -> Vec<bool> {
        requirements.iter().map(|r| index.contains(r)).collect()
    }
}

#[async_trait]
impl MatchStrategy for ExactStrategy {
    fn backend(&self) -> &'static str {
        "exact"
    }

    async fn index(&self, tokens: Vec<String>) -> TokenIndex {
        TokenIndex::lexical(tokens)
    }

    async fn covered(&self, requirements: &[String], index: &TokenIndex) -> Vec<bool> {
        Self::covered_now(requirements, index)
    }

    async fn role_relevance(&self, role: &RoleText<'_>) -> f64 {
        jaccard(role.job_tokens, role.cv_tokens)
    }
}

/// |A ∩ B| / |A ∪ B|; 0.0 if either side is empty.
pub fn jaccard(a: &[String], b: &[String]) -> f64 {
    let a: HashSet<&String> = a.iter().collect();
    let b: HashSet<&String> = b.iter().collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(&b).count();
    let union = a.union(&b).count();
    intersection as f64 / union as f64
}

// ────────────────────────────────────────────────────────────────────────────
// SemanticStrategy
// ────────────────────────────────────────────────────────────────────────────

/// Exact matching with an embedding-similarity fallback.
pub struct SemanticStrategy {
    service: Arc<EmbeddingService>,
    threshold: f32,
}

impl SemanticStrategy {
    pub fn new(service: Arc<EmbeddingService>) -> Self {
        Self {
            service,
            threshold: SEMANTIC_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }
}

#[async_trait]
impl MatchStrategy for SemanticStrategy {
    fn backend(&self) -> &'static str {
        "semantic"
    }

    fn effective_backend(&self) -> &'static str {
        match self.service.availability() {
            Some(false) => "exact",
            _ => "semantic",
        }
    }

    async fn index(&self, tokens: Vec<String>) -> TokenIndex {
        let vectors = if tokens.is_empty() {
            None
        } else {
            self.service.embed(&tokens).await
        };
        let index = TokenIndex::lexical(tokens);
        match vectors {
            Some(v) => index.with_vectors(v),
            None => index,
        }
    }

    async fn covered(&self, requirements: &[String], index: &TokenIndex) -> Vec<bool> {
        let mut flags = ExactStrategy::covered_now(requirements, index);

        let Some(token_vectors) = index.vectors.as_deref() else {
            return flags;
        };
        let misses: Vec<usize> = flags
            .iter()
            .enumerate()
            .filter(|(_, covered)| !**covered)
            .map(|(i, _)| i)
            .collect();
        if misses.is_empty() {
            return flags;
        }

        let queries: Vec<String> = misses.iter().map(|&i| requirements[i].clone()).collect();
        let Some(query_vectors) = self.service.embed(&queries).await else {
            return flags;
        };

        for (&i, query) in misses.iter().zip(query_vectors.iter()) {
            let best = max_similarity(query, token_vectors).unwrap_or(0.0);
            flags[i] = best >= self.threshold;
        }
        flags
    }

    async fn role_relevance(&self, role: &RoleText<'_>) -> f64 {
        if role.job_summary.trim().is_empty() || role.cv_text.trim().is_empty() {
            return jaccard(role.job_tokens, role.cv_tokens);
        }
        let texts = [role.job_summary.to_string(), role.cv_text.to_string()];
        match self.service.embed(&texts).await.as_deref() {
            Some([job, cv]) => {
                let sim = crate::embeddings::cosine_similarity(job, cv) as f64;
                sim.clamp(0.0, 1.0)
            }
            _ => jaccard(role.job_tokens, role.cv_tokens),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::embeddings::testing::{FailingEmbedder, TableEmbedder};
    use crate::embeddings::Embedder;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn semantic(backend: impl Embedder + 'static) -> SemanticStrategy {
        SemanticStrategy::new(Arc::new(EmbeddingService::new(
            Arc::new(backend),
            Duration::from_millis(200),
        )))
    }

    /// "postgresql" sits close to "postgres-db"; everything else is orthogonal.
    fn table() -> TableEmbedder {
        TableEmbedder::new(
            &[
                ("postgresql", vec![1.0, 0.0, 0.0]),
                ("postgres-db", vec![0.9, 0.1, 0.0]),
                ("kafka", vec![0.0, 1.0, 0.0]),
                ("Data Engineer. Airflow", vec![0.6, 0.8, 0.0]),
                ("Airflow pipelines", vec![0.6, 0.8, 0.0]),
            ],
            vec![0.0, 0.0, 1.0],
        )
    }

    #[tokio::test]
    async fn test_exact_covers_only_verbatim_tokens() {
        let strategy = ExactStrategy;
        let index = strategy.index(strings(&["airflow", "spark"])).await;
        let flags = strategy
            .covered(&strings(&["airflow", "databricks"]), &index)
            .await;
        assert_eq!(flags, vec![true, false]);
        assert!(!index.is_semantic());
    }

    #[test]
    fn test_jaccard_overlap() {
        let a = strings(&["rust", "tokio", "kafka"]);
        let b = strings(&["rust", "kafka", "python", "go"]);
        assert!((jaccard(&a, &b) - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_jaccard_empty_side_is_zero() {
        assert_eq!(jaccard(&[], &strings(&["rust"])), 0.0);
        assert_eq!(jaccard(&strings(&["rust"]), &[]), 0.0);
    }

    #[tokio::test]
    async fn test_semantic_covers_near_synonym() {
        let strategy = semantic(table());
        let index = strategy.index(strings(&["postgres-db", "airflow"])).await;
        assert!(index.is_semantic());

        let flags = strategy
            .covered(&strings(&["postgresql", "kafka", "airflow"]), &index)
            .await;
        assert_eq!(flags, vec![true, false, true]);
    }

    #[tokio::test]
    async fn test_semantic_threshold_is_respected() {
        let strategy = semantic(table()).with_threshold(0.999);
        let index = strategy.index(strings(&["postgres-db"])).await;
        let flags = strategy.covered(&strings(&["postgresql"]), &index).await;
        assert_eq!(flags, vec![false]);
    }

    #[tokio::test]
    async fn test_semantic_degrades_to_exact_when_unavailable() {
        let strategy = semantic(FailingEmbedder);
        let index = strategy.index(strings(&["postgres-db", "airflow"])).await;
        assert!(!index.is_semantic());

        let flags = strategy
            .covered(&strings(&["postgresql", "airflow"]), &index)
            .await;
        assert_eq!(flags, vec![false, true]);
    }

    #[tokio::test]
    async fn test_semantic_role_relevance_uses_cosine() {
        let strategy = semantic(table());
        let job_tokens = strings(&["data", "engineer", "airflow"]);
        let cv_tokens = strings(&["airflow", "pipelines"]);
        let role = RoleText {
            job_summary: "Data Engineer. Airflow",
            job_tokens: &job_tokens,
            cv_text: "Airflow pipelines",
            cv_tokens: &cv_tokens,
        };
        let relevance = strategy.role_relevance(&role).await;
        assert!((relevance - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_semantic_role_relevance_falls_back_to_jaccard() {
        let strategy = semantic(FailingEmbedder);
        let job_tokens = strings(&["data", "engineer", "airflow"]);
        let cv_tokens = strings(&["airflow", "pipelines"]);
        let role = RoleText {
            job_summary: "Data Engineer. Airflow",
            job_tokens: &job_tokens,
            cv_text: "Airflow pipelines",
            cv_tokens: &cv_tokens,
        };
        let relevance = strategy.role_relevance(&role).await;
        assert!((relevance - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_backend_names() {
        assert_eq!(ExactStrategy.backend(), "exact");
        assert_eq!(semantic(FailingEmbedder).backend(), "semantic");
    }

    #[tokio::test]
    async fn test_effective_backend_reports_degradation() {
        let degraded = semantic(FailingEmbedder);
        degraded.index(strings(&["airflow"])).await;
        assert_eq!(degraded.effective_backend(), "exact");

        let healthy = semantic(table());
        healthy.index(strings(&["airflow"])).await;
        assert_eq!(healthy.effective_backend(), "semantic");
        assert_eq!(ExactStrategy.effective_backend(), "exact");
    }
}
