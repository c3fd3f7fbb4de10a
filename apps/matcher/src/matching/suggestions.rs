//! Suggestion Generator — gaps, skills worth surfacing, and weak bullets to rewrite.
//!
//! Score gains are fixed advisory constants per change category; nothing here rescores.

use crate::models::match_result::{BulletRewrite, EstimatedScoreGain, ScoreGain, Suggestions};
use crate::text::{is_quantified, normalize_token};

pub const MISSING_SKILLS_CAP: usize = 10;
pub const SKILLS_TO_SURFACE_CAP: usize = 6;
pub const BULLETS_TO_REWRITE_CAP: usize = 3;
const ORIGINAL_MAX_CHARS: usize = 220;
const REWRITE_MAX_CHARS: usize = 400;
/// Skills named in a gain label.
const LABEL_SKILLS: usize = 3;

pub const GAIN_MENTION_REQUIRED: f64 = 0.06;
pub const GAIN_QUANTIFY_BULLETS: f64 = 0.05;
pub const GAIN_SURFACE_PREFERRED: f64 = 0.02;

const GENERIC_SKILL_HINT: &str = "a key technology or metric";

/// Everything the generator reads, already computed by the scorer.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionInput<'a> {
    pub required: &'a [String],
    pub required_covered: &'a [bool],
    pub preferred: &'a [String],
    pub preferred_covered: &'a [bool],
    /// JD tokens in text order.
    pub jd_order: &'a [String],
    pub bullets: &'a [String],
}

/// Builds the advisory payload. `delta_to_top5` is left at 0 for ranking to fill.
pub fn build_suggestions(input: &SuggestionInput<'_>) -> Suggestions {
    let missing_skills = missing_in_jd_order(input);

    let skills_to_surface: Vec<String> = input
        .preferred
        .iter()
        .zip(input.preferred_covered)
        .filter(|&(_, &covered)| covered)
        .map(|(skill, _)| skill.clone())
        .take(SKILLS_TO_SURFACE_CAP)
        .collect();

    let skill_hint = missing_skills
        .first()
        .map(String::as_str)
        .unwrap_or(GENERIC_SKILL_HINT);
    let bullets_to_rewrite: Vec<BulletRewrite> = input
        .bullets
        .iter()
        .filter(|b| !is_quantified(b))
        .take(BULLETS_TO_REWRITE_CAP)
        .map(|b| BulletRewrite {
            original: truncate_chars(b, ORIGINAL_MAX_CHARS),
            rewrite: truncate_chars(&rewrite_hint(b, skill_hint), REWRITE_MAX_CHARS),
        })
        .collect();

    let mut by_change = Vec::new();
    if !missing_skills.is_empty() {
        by_change.push(ScoreGain {
            label: format!(
                "Mention required skills: {}",
                head(&missing_skills, LABEL_SKILLS).join(", ")
            ),
            delta: GAIN_MENTION_REQUIRED,
        });
    }
    if !bullets_to_rewrite.is_empty() {
        by_change.push(ScoreGain {
            label: format!("Quantify {} bullet(s)", bullets_to_rewrite.len()),
            delta: GAIN_QUANTIFY_BULLETS,
        });
    }
    if !skills_to_surface.is_empty() {
        by_change.push(ScoreGain {
            label: format!(
                "Surface preferred skills: {}",
                head(&skills_to_surface, LABEL_SKILLS).join(", ")
            ),
            delta: GAIN_SURFACE_PREFERRED,
        });
    }

    Suggestions {
        missing_skills,
        skills_to_surface,
        bullets_to_rewrite,
        estimated_score_gain: EstimatedScoreGain { by_change },
        delta_to_top5: 0.0,
    }
}

/// Uncovered required skills ordered by first appearance in the JD.
/// Skills never mentioned in the JD text (explicit lists) follow in list order.
fn missing_in_jd_order(input: &SuggestionInput<'_>) -> Vec<String> {
    let mut missing: Vec<&String> = input
        .required
        .iter()
        .zip(input.required_covered)
        .filter(|&(_, &covered)| !covered)
        .map(|(skill, _)| skill)
        .collect();
    missing.sort_by_cached_key(|skill| {
        let token = normalize_token(skill);
        input
            .jd_order
            .iter()
            .position(|t| *t == token)
            .unwrap_or(usize::MAX)
    });
    missing
        .into_iter()
        .take(MISSING_SKILLS_CAP)
        .cloned()
        .collect()
}

fn rewrite_hint(bullet: &str, skill_hint: &str) -> String {
    format!(
        "{}. Add a measurable outcome and mention {} (e.g., 'reduced X by 30%', 'built Y used by N users').",
        bullet.trim_end_matches('.'),
        skill_hint
    )
}

fn head(items: &[String], n: usize) -> &[String] {
    &items[..items.len().min(n)]
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    struct Fixture {
        required: Vec<String>,
        required_covered: Vec<bool>,
        preferred: Vec<String>,
        preferred_covered: Vec<bool>,
        jd_order: Vec<String>,
        bullets: Vec<String>,
    }

    impl Fixture {
        fn input(&self) -> SuggestionInput<'_> {
            SuggestionInput {
                required: &self.required,
                required_covered: &self.required_covered,
                preferred: &self.preferred,
                preferred_covered: &self.preferred_covered,
                jd_order: &self.jd_order,
                bullets: &self.bullets,
            }
        }
    }

    fn fixture() -> Fixture {
        Fixture {
            // salience order, not JD order
            required: strings(&["ci-cd", "terraform", "airflow", "kafka"]),
            required_covered: vec![false, false, true, false],
            preferred: strings(&["databricks", "dbt"]),
            preferred_covered: vec![true, false],
            jd_order: strings(&["kafka", "airflow", "terraform", "ci-cd", "databricks", "dbt"]),
            bullets: strings(&[
                "Built ETL pipelines in Airflow.",
                "Cut batch runtime by 40%",
                "Owned the data quality framework",
                "Mentored two juniors",
                "Wrote internal documentation",
            ]),
        }
    }

    #[test]
    fn test_missing_skills_follow_jd_order() {
        let s = build_suggestions(&fixture().input());
        assert_eq!(s.missing_skills, vec!["kafka", "terraform", "ci-cd"]);
    }

    #[test]
    fn test_missing_skills_not_in_jd_go_last() {
        let mut f = fixture();
        f.required.push("cobol".to_string());
        f.required_covered.push(false);
        f.jd_order.retain(|t| t != "terraform");
        let s = build_suggestions(&f.input());
        assert_eq!(s.missing_skills, vec!["kafka", "ci-cd", "terraform", "cobol"]);
    }

    #[test]
    fn test_missing_skills_capped() {
        let mut f = fixture();
        f.required = (0..25).map(|i| format!("tool{i}")).collect();
        f.required_covered = vec![false; 25];
        let s = build_suggestions(&f.input());
        assert_eq!(s.missing_skills.len(), MISSING_SKILLS_CAP);
    }

    #[test]
    fn test_skills_to_surface_are_covered_preferred() {
        let s = build_suggestions(&fixture().input());
        assert_eq!(s.skills_to_surface, vec!["databricks"]);
    }

    #[test]
    fn test_rewrites_unquantified_bullets_with_top_missing_skill() {
        let s = build_suggestions(&fixture().input());
        assert_eq!(s.bullets_to_rewrite.len(), 3);
        assert_eq!(s.bullets_to_rewrite[0].original, "Built ETL pipelines in Airflow.");
        assert_eq!(
            s.bullets_to_rewrite[0].rewrite,
            "Built ETL pipelines in Airflow. Add a measurable outcome and mention kafka (e.g., 'reduced X by 30%', 'built Y used by N users')."
        );
        assert_eq!(s.bullets_to_rewrite[1].original, "Owned the data quality framework");
        assert!(s
            .bullets_to_rewrite
            .iter()
            .all(|b| b.original != "Cut batch runtime by 40%"));
    }

    #[test]
    fn test_rewrite_uses_generic_hint_without_gaps() {
        let mut f = fixture();
        f.required_covered = vec![true; 4];
        let s = build_suggestions(&f.input());
        assert!(s.missing_skills.is_empty());
        assert!(s.bullets_to_rewrite[0]
            .rewrite
            .contains("mention a key technology or metric"));
    }

    #[test]
    fn test_long_bullets_are_truncated() {
        let mut f = fixture();
        f.bullets = vec!["x".repeat(1000)];
        let s = build_suggestions(&f.input());
        assert_eq!(s.bullets_to_rewrite[0].original.chars().count(), 220);
        assert_eq!(s.bullets_to_rewrite[0].rewrite.chars().count(), 400);
    }

    #[test]
    fn test_estimated_gains_are_fixed_constants() {
        let s = build_suggestions(&fixture().input());
        let gains = &s.estimated_score_gain.by_change;
        assert_eq!(gains.len(), 3);
        assert_eq!(gains[0].label, "Mention required skills: kafka, terraform, ci-cd");
        assert_eq!(gains[0].delta, GAIN_MENTION_REQUIRED);
        assert_eq!(gains[1].label, "Quantify 3 bullet(s)");
        assert_eq!(gains[1].delta, GAIN_QUANTIFY_BULLETS);
        assert_eq!(gains[2].label, "Surface preferred skills: databricks");
        assert_eq!(gains[2].delta, GAIN_SURFACE_PREFERRED);
    }

    #[test]
    fn test_nothing_to_suggest_for_empty_inputs() {
        let s = build_suggestions(&SuggestionInput {
            required: &[],
            required_covered: &[],
            preferred: &[],
            preferred_covered: &[],
            jd_order: &[],
            bullets: &[],
        });
        assert_eq!(s, Suggestions::default());
    }
}
