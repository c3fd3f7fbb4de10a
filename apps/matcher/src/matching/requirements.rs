//! Requirement Extractor — derives required / preferred skill lists from a raw job description.
//!
//! Explicit lists supplied with the job win. Otherwise the JD is sliced at the
//! first matching section heading and tokenized; a JD with no "required"
//! heading is treated as one big requirement pool (noisy, but never empty when
//! the JD has content). A JD with no "preferred" heading has no preferred skills.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::job::JobPosting;
use crate::text::tokenize;

pub const REQUIRED_CAP: usize = 40;
pub const PREFERRED_CAP: usize = 30;

/// Headings that open the required section, in priority order.
const REQUIRED_MARKERS: &[&str] = &[
    "requirements",
    "must have",
    "what you'll need",
    "what you\u{2019}ll need",
];

/// Headings that open the preferred section, in priority order.
const PREFERRED_MARKERS: &[&str] = &["nice to have", "preferred", "bonus", "good to have"];

/// Characters that mark a token as technology-like (`c++`, `node.js`, `ci-cd`).
const SYMBOL_CHARS: &[char] = &['+', '#', '.', '/', '-'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementClass {
    Required,
    Preferred,
    Mandatory,
}

/// A single normalized requirement tagged with its class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub text: String,
    pub class: RequirementClass,
}

/// Where a requirement list came from. Reported so the whole-text fallback is visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementSource {
    Explicit,
    Section,
    WholeText,
    #[default]
    Empty,
}

/// Everything a run scores against, extracted once per job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequirementSet {
    pub required: Vec<String>,
    pub preferred: Vec<String>,
    /// Mandatory qualifications as written on the job (used verbatim in blocker messages).
    pub mandatory: Vec<String>,
    pub required_source: RequirementSource,
    pub preferred_source: RequirementSource,
    /// JD tokens in text order, for ordering gap reports.
    pub jd_order: Vec<String>,
}

impl RequirementSet {
    pub fn for_job(job: &JobPosting) -> Self {
        let explicit_preferred = non_empty(job.jd_preferred_skills.as_deref())
            .map(|explicit| explicit_list(explicit, PREFERRED_CAP));

        // The JD is only parsed when no explicit required list is given; an
        // explicit required list without a preferred one means "no preferred".
        let (required, required_source, preferred, preferred_source) =
            match non_empty(job.jd_required_skills.as_deref()) {
                Some(explicit) => {
                    let (preferred, preferred_source) = match explicit_preferred {
                        Some(list) => (list, RequirementSource::Explicit),
                        None => (Vec::new(), RequirementSource::Empty),
                    };
                    (
                        explicit_list(explicit, REQUIRED_CAP),
                        RequirementSource::Explicit,
                        preferred,
                        preferred_source,
                    )
                }
                None => {
                    let (required, required_source) = derive_required(&job.jd_text);
                    let (preferred, preferred_source) = match explicit_preferred {
                        Some(list) => (list, RequirementSource::Explicit),
                        None => derive_preferred(&job.jd_text),
                    };
                    (required, required_source, preferred, preferred_source)
                }
            };

        Self {
            required,
            preferred,
            mandatory: mandatory_list(job.mandatory_certs.as_deref().unwrap_or_default()),
            required_source,
            preferred_source,
            jd_order: tokenize(&job.jd_text),
        }
    }

    /// All requirements, tagged, in class order.
    pub fn tagged(&self) -> Vec<Requirement> {
        let tag = |items: &[String], class| {
            items
                .iter()
                .map(move |text| Requirement {
                    text: text.clone(),
                    class,
                })
                .collect::<Vec<_>>()
        };
        let mut all = tag(&self.required, RequirementClass::Required);
        all.extend(tag(&self.preferred, RequirementClass::Preferred));
        all.extend(tag(&self.mandatory, RequirementClass::Mandatory));
        all
    }
}

/// `extract(jd_text, explicit_required?, explicit_preferred?) -> (required, preferred)`.
pub fn extract(
    jd_text: &str,
    explicit_required: Option<&[String]>,
    explicit_preferred: Option<&[String]>,
) -> (Vec<String>, Vec<String>) {
    let job = JobPosting {
        jd_text: jd_text.to_string(),
        jd_required_skills: explicit_required.map(<[String]>::to_vec),
        jd_preferred_skills: explicit_preferred.map(<[String]>::to_vec),
        ..JobPosting::default()
    };
    let set = RequirementSet::for_job(&job);
    (set.required, set.preferred)
}

fn non_empty(list: Option<&[String]>) -> Option<&[String]> {
    list.filter(|items| items.iter().any(|s| !s.trim().is_empty()))
}

/// Explicit lists are taken verbatim: trimmed, lower-cased, de-duplicated, capped in order.
fn explicit_list(items: &[String], cap: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.clone()))
        .take(cap)
        .collect()
}

/// Trimmed, blanks dropped, de-duplicated case-insensitively keeping the first spelling.
fn mandatory_list(items: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .filter(|c| seen.insert(c.to_lowercase()))
        .collect()
}

fn derive_required(jd_text: &str) -> (Vec<String>, RequirementSource) {
    if let Some(section) = slice_after_marker(jd_text, REQUIRED_MARKERS) {
        let tokens = tokenize(&section);
        if !tokens.is_empty() {
            return (by_salience(tokens, REQUIRED_CAP), RequirementSource::Section);
        }
    }
    let tokens = tokenize(jd_text);
    if tokens.is_empty() {
        return (Vec::new(), RequirementSource::Empty);
    }
    (by_salience(tokens, REQUIRED_CAP), RequirementSource::WholeText)
}

fn derive_preferred(jd_text: &str) -> (Vec<String>, RequirementSource) {
    match slice_after_marker(jd_text, PREFERRED_MARKERS).map(|s| tokenize(&s)) {
        Some(tokens) if !tokens.is_empty() => {
            (by_salience(tokens, PREFERRED_CAP), RequirementSource::Section)
        }
        _ => (Vec::new(), RequirementSource::Empty),
    }
}

/// Text from the first occurrence of the highest-priority marker present, to the end.
///
/// Returned lower-cased; tokenization lower-cases anyway, and slicing the
/// lower-cased copy keeps byte offsets valid for non-ASCII text.
fn slice_after_marker(text: &str, markers: &[&str]) -> Option<String> {
    let lower = text.to_lowercase();
    markers
        .iter()
        .find_map(|marker| lower.find(marker))
        .map(|start| lower[start..].to_string())
}

/// Favors tokens that look like technology names over generic words.
pub fn salience(token: &str) -> u8 {
    let mut score = 0;
    if token.chars().any(|c| c.is_ascii_digit()) {
        score += 2;
    }
    if token.contains(SYMBOL_CHARS) {
        score += 2;
    }
    if token.chars().count() >= 4 {
        score += 1;
    }
    score
}

/// Stable sort by descending salience (ties keep text order), then cap.
fn by_salience(mut tokens: Vec<String>, cap: usize) -> Vec<String> {
    tokens.sort_by_key(|t| std::cmp::Reverse(salience(t)));
    tokens.truncate(cap);
    tokens
}
