//! Vector similarity over embeddings.

use tracing::warn;

/// Cosine similarity in [-1, 1].
///
/// Mismatched dimensions or a zero vector yield 0.0 rather than an error.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        warn!(
            a_len = a.len(),
            b_len = b.len(),
            "embedding dimension mismatch; returning zero similarity"
        );
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Best cosine between `query` and any of `candidates`; `None` if there are none.
pub fn max_similarity(query: &[f32], candidates: &[Vec<f32>]) -> Option<f32> {
    candidates
        .iter()
        .map(|c| cosine_similarity(query, c))
        .fold(None, |best, sim| match best {
            Some(b) if b >= sim => Some(b),
            _ => Some(sim),
        })
}
