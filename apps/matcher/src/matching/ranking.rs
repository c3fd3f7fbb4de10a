//! Ranking Engine — orders one run's results and measures the gap to the top 5.

use std::cmp::Ordering;

use crate::models::match_result::{round4, MatchResult};

/// Results at or above the N-th score are "in the shortlist".
pub const TOP_N_CUTOFF: usize = 5;

/// Sorts by total score descending (stable: ties keep scoring order), assigns
/// 1-based ranks and fills `suggestions.delta_to_top5`.
///
/// Must see the complete result set of a run.
pub fn rank_results(results: &mut [MatchResult]) {
    results.sort_by(|a, b| {
        b.total_score
            .partial_cmp(&a.total_score)
            .unwrap_or(Ordering::Equal)
    });

    let Some(cutoff) = top_cutoff(results) else {
        return;
    };

    for (position, result) in results.iter_mut().enumerate() {
        result.rank = position + 1;
        result.suggestions.delta_to_top5 = if result.total_score < cutoff {
            round4(cutoff - result.total_score)
        } else {
            0.0
        };
    }
}

/// The 5th-highest score, or the lowest when fewer than 5 results exist.
/// Expects `results` already sorted.
pub fn top_cutoff(results: &[MatchResult]) -> Option<f64> {
    let index = results.len().min(TOP_N_CUTOFF).checked_sub(1)?;
    Some(results[index].total_score)
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::models::match_result::{Subscores, Suggestions};

    fn result(label: &str, score: f64) -> MatchResult {
        MatchResult {
            candidate_id: Uuid::new_v4(),
            candidate_label: label.to_string(),
            total_score: score,
            subscores: Subscores::default(),
            hard_blockers: vec![],
            rank: 0,
            suggestions: Suggestions::default(),
        }
    }

    fn labels(results: &[MatchResult]) -> Vec<&str> {
        results.iter().map(|r| r.candidate_label.as_str()).collect()
    }

    #[test]
    fn test_sorts_descending_and_assigns_ranks() {
        let mut results = vec![result("a", 0.3), result("b", 0.9), result("c", 0.6)];
        rank_results(&mut results);
        assert_eq!(labels(&results), vec!["b", "c", "a"]);
        assert_eq!(
            results.iter().map(|r| r.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_ties_keep_scoring_order() {
        let mut results = vec![
            result("first", 0.5),
            result("top", 0.8),
            result("second", 0.5),
            result("third", 0.5),
        ];
        rank_results(&mut results);
        assert_eq!(labels(&results), vec!["top", "first", "second", "third"]);
    }

    #[test]
    fn test_delta_to_top5_below_cutoff() {
        let scores = [0.95, 0.50, 0.88, 0.72, 0.81, 0.40, 0.77];
        let mut results: Vec<MatchResult> = scores
            .iter()
            .enumerate()
            .map(|(i, &s)| result(&format!("c{i}"), s))
            .collect();
        rank_results(&mut results);

        assert_eq!(results[4].total_score, 0.72);
        assert_eq!(results[5].total_score, 0.50);
        assert_eq!(results[5].rank, 6);
        assert_eq!(results[5].suggestions.delta_to_top5, 0.22);
        assert_eq!(results[6].suggestions.delta_to_top5, 0.32);
        assert!(results[..5]
            .iter()
            .all(|r| r.suggestions.delta_to_top5 == 0.0));
    }

    #[test]
    fn test_fewer_than_five_has_no_delta() {
        let mut results = vec![result("a", 0.2), result("b", 0.9), result("c", 0.1)];
        rank_results(&mut results);
        assert!(results.iter().all(|r| r.suggestions.delta_to_top5 == 0.0));
    }

    #[test]
    fn test_tie_at_cutoff_is_inside_top5() {
        let mut results: Vec<MatchResult> = [0.9, 0.8, 0.7, 0.6, 0.5, 0.5, 0.4]
            .iter()
            .map(|&s| result("c", s))
            .collect();
        rank_results(&mut results);
        assert_eq!(results[5].suggestions.delta_to_top5, 0.0);
        assert_eq!(results[6].suggestions.delta_to_top5, 0.1);
    }

    #[test]
    fn test_empty_run_is_a_no_op() {
        let mut results: Vec<MatchResult> = vec![];
        rank_results(&mut results);
        assert!(top_cutoff(&results).is_none());
    }
}
