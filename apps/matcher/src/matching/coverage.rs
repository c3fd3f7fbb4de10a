//! Coverage Scorer — does a candidate satisfy each requirement, and what fraction overall.
//!
//! Requirements are folded through the tokenizer's normalization (lower-case,
//! synonyms) before matching, so explicit `Postgres` meets a CV's `PostgreSQL`.

use crate::matching::strategy::{MatchStrategy, TokenIndex};
use crate::text::{normalize_token, tokenize};

/// One flag per requirement, in requirement order.
///
/// A multi-word requirement (`delta lake`, `AWS Certified Solutions Architect`)
/// is covered when every one of its tokens is covered.
pub async fn covered_flags(
    strategy: &dyn MatchStrategy,
    requirements: &[String],
    index: &TokenIndex,
) -> Vec<bool> {
    if requirements.is_empty() {
        return Vec::new();
    }

    // All tokens go to the strategy in one batch; `spans` maps them back.
    let mut queries: Vec<String> = Vec::new();
    let mut spans = Vec::with_capacity(requirements.len());
    for requirement in requirements {
        let start = queries.len();
        queries.extend(requirement_tokens(requirement));
        spans.push(start..queries.len());
    }

    let flags = strategy.covered(&queries, index).await;
    spans
        .into_iter()
        .map(|span| flags.get(span).is_some_and(|f| f.iter().all(|&c| c)))
        .collect()
}

/// The single normalized token of a requirement, or its tokens if it spans words.
fn requirement_tokens(requirement: &str) -> Vec<String> {
    let normalized = normalize_token(requirement);
    if !normalized.contains(char::is_whitespace) {
        return vec![normalized];
    }
    match tokenize(requirement) {
        tokens if tokens.is_empty() => vec![normalized],
        tokens => tokens,
    }
}

pub async fn is_covered(strategy: &dyn MatchStrategy, requirement: &str, index: &TokenIndex) -> bool {
    covered_flags(strategy, &[requirement.to_string()], index)
        .await
        .first()
        .copied()
        .unwrap_or(false)
}

/// covered / total. An empty requirement list is a configuration gap, not a pass: 0.0.
pub fn ratio(flags: &[bool]) -> f64 {
    if flags.is_empty() {
        return 0.0;
    }
    let covered = flags.iter().filter(|&&c| c).count();
    covered as f64 / flags.len() as f64
}

pub async fn coverage_ratio(
    strategy: &dyn MatchStrategy,
    requirements: &[String],
    index: &TokenIndex,
) -> f64 {
    ratio(&covered_flags(strategy, requirements, index).await)
}
