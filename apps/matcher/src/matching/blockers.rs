//! Hard-Blocker Gate — a missing mandatory qualification caps the total at 0.60.
//!
//! Partial penalty: a blocked candidate keeps the rest of their signal and still ranks.

use crate::matching::coverage::covered_flags;
use crate::matching::strategy::{MatchStrategy, TokenIndex};

pub const BLOCKED_CAP: f64 = 0.60;
pub const OPEN_CAP: f64 = 1.00;

/// One message per uncovered mandatory qualification, in job order.
pub async fn hard_blockers(
    strategy: &dyn MatchStrategy,
    mandatory: &[String],
    index: &TokenIndex,
) -> Vec<String> {
    let flags = covered_flags(strategy, mandatory, index).await;
    mandatory
        .iter()
        .zip(flags)
        .filter(|(_, covered)| !covered)
        .map(|(cert, _)| format!("Missing mandatory cert: {cert}"))
        .collect()
}

pub fn score_cap(hard_blockers: &[String]) -> f64 {
    if hard_blockers.is_empty() {
        OPEN_CAP
    } else {
        BLOCKED_CAP
    }
}
