use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::matching::blockers::score_cap;
use crate::models::match_result::Subscores;
use crate::text::is_quantified;

/// Timeline-gap analysis is out of scope; continuity is reported as a constant.
pub const CONTINUITY_PLACEHOLDER: f64 = 1.0;

/// Achievement density when the CV has no detectable bullet lines.
const NO_BULLETS_DENSITY: f64 = 0.3;

static SENIOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(senior|lead|staff|principal)\b").unwrap());
static MID: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(mid|intermediate)\b").unwrap());
static JUNIOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(junior|entry)\b").unwrap());
static EDUCATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(msc|bsc|phd|master|bachelor|degree|licence|licentiate)\b").unwrap()
});
static LANGUAGES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(english|french|german|spanish|arabic|portuguese|italian|dutch)\b")
        .unwrap()
});

/// Fixed weight per subscore. Sums to 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscoreWeights {
    pub req_skills: f64,
    pub pref_skills: f64,
    pub role_relevance: f64,
    pub experience_level: f64,
    pub achievement_density: f64,
    pub education: f64,
    pub languages: f64,
    pub continuity: f64,
}

impl Default for SubscoreWeights {
    fn default() -> Self {
        Self {
            req_skills: 0.40,
            pref_skills: 0.10,
            role_relevance: 0.25,
            experience_level: 0.10,
            achievement_density: 0.07,
            education: 0.04,
            languages: 0.02,
            continuity: 0.02,
        }
    }
}

impl SubscoreWeights {
    pub fn total(&self) -> f64 {
        self.req_skills
            + self.pref_skills
            + self.role_relevance
            + self.experience_level
            + self.achievement_density
            + self.education
            + self.languages
            + self.continuity
    }

    /// Σ weight_i × subscore_i, uncapped.
    pub fn weighted_sum(&self, s: &Subscores) -> f64 {
        self.req_skills * s.req_skills
            + self.pref_skills * s.pref_skills
            + self.role_relevance * s.role_relevance
            + self.experience_level * s.experience_level
            + self.achievement_density * s.achievement_density
            + self.education * s.education
            + self.languages * s.languages
            + self.continuity * s.continuity
    }
}

/// min(weighted sum, cap) where the cap is 0.60 with any hard blocker, else 1.00.
pub fn total_score(subscores: &Subscores, weights: &SubscoreWeights, hard_blockers: &[String]) -> f64 {
    weights
        .weighted_sum(subscores)
        .min(score_cap(hard_blockers))
        .max(0.0)
}

/// senior/lead/staff/principal → 0.8, mid/intermediate → 0.6, junior/entry → 0.4, else 0.5.
pub fn experience_level(cv_text: &str) -> f64 {
    if SENIOR.is_match(cv_text) {
        0.8
    } else if MID.is_match(cv_text) {
        0.6
    } else if JUNIOR.is_match(cv_text) {
        0.4
    } else {
        0.5
    }
}

/// Fraction of bullets carrying a figure; 0.3 when there are no bullets.
pub fn achievement_density(bullets: &[String]) -> f64 {
    if bullets.is_empty() {
        return NO_BULLETS_DENSITY;
    }
    let quantified = bullets.iter().filter(|b| is_quantified(b)).count();
    (quantified as f64 / bullets.len() as f64).min(1.0)
}

pub fn education(cv_text: &str) -> f64 {
    if EDUCATION.is_match(cv_text) {
        0.7
    } else {
        0.4
    }
}

pub fn languages(cv_text: &str) -> f64 {
    if LANGUAGES.is_match(cv_text) {
        0.6
    } else {
        0.3
    }
}
