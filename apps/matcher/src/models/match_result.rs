use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::matching::requirements::Requirement;

/// Largest page `MatchRun::top` will return.
pub const MAX_TOP_N: usize = 50;

/// The eight normalized signals behind a total score. Each is in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Subscores {
    pub req_skills: f64,
    pub pref_skills: f64,
    pub role_relevance: f64,
    pub experience_level: f64,
    pub achievement_density: f64,
    pub education: f64,
    pub languages: f64,
    pub continuity: f64,
}

impl Default for Subscores {
    fn default() -> Self {
        Self {
            req_skills: 0.0,
            pref_skills: 0.0,
            role_relevance: 0.0,
            experience_level: 0.0,
            achievement_density: 0.0,
            education: 0.0,
            languages: 0.0,
            continuity: 1.0,
        }
    }
}

impl Subscores {
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            req_skills: f(self.req_skills),
            pref_skills: f(self.pref_skills),
            role_relevance: f(self.role_relevance),
            experience_level: f(self.experience_level),
            achievement_density: f(self.achievement_density),
            education: f(self.education),
            languages: f(self.languages),
            continuity: f(self.continuity),
        }
    }

    /// Every subscore forced into [0, 1]; NaN becomes 0.
    pub fn clamped(self) -> Self {
        self.map(|v| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) })
    }

    pub fn rounded(self) -> Self {
        self.map(round4)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletRewrite {
    pub original: String,
    pub rewrite: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreGain {
    pub label: String,
    pub delta: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimatedScoreGain {
    pub by_change: Vec<ScoreGain>,
}

/// Advisory payload: what to add, what to emphasize, what to rewrite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Suggestions {
    pub missing_skills: Vec<String>,
    pub skills_to_surface: Vec<String>,
    pub bullets_to_rewrite: Vec<BulletRewrite>,
    pub estimated_score_gain: EstimatedScoreGain,
    /// Gap to the 5th-highest score in the run; 0 inside the top 5.
    pub delta_to_top5: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub candidate_id: Uuid,
    pub candidate_label: String,
    /// In [0, 0.60] with any hard blocker, else [0, 1.00].
    pub total_score: f64,
    pub subscores: Subscores,
    pub hard_blockers: Vec<String>,
    /// 1-based; 0 until the run is ranked.
    pub rank: usize,
    pub suggestions: Suggestions,
}

/// A complete, ranked set of results for one job. Never partially built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRun {
    pub run_id: Uuid,
    pub job_title: String,
    pub created_at: DateTime<Utc>,
    /// "exact" | "semantic"
    pub scorer_backend: String,
    /// What the job was scored against, after extraction.
    pub requirements: Vec<Requirement>,
    pub results: Vec<MatchResult>,
}

impl MatchRun {
    /// First `n` ranked results, with `n` clamped to 1..=50.
    pub fn top(&self, n: usize) -> &[MatchResult] {
        let n = n.clamp(1, MAX_TOP_N).min(self.results.len());
        &self.results[..n]
    }
}

/// Rounds to 4 decimal places, the precision scores are reported at.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
