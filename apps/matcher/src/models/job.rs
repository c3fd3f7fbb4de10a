use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

/// A job to match candidates against. Immutable for the duration of a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub jd_text: String,
    /// Explicit required skills; when non-empty they replace parsing of `jd_text`.
    #[serde(default)]
    pub jd_required_skills: Option<Vec<String>>,
    /// Explicit preferred skills; when non-empty they replace parsing of `jd_text`.
    #[serde(default)]
    pub jd_preferred_skills: Option<Vec<String>>,
    /// Qualifications whose absence is a hard blocker.
    #[serde(default)]
    pub mandatory_certs: Option<Vec<String>>,
}

/// CV text for one candidate, already extracted from an upload or paste.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateText {
    pub candidate_id: Uuid,
    /// Display label (e.g. an external reference). Optional.
    #[serde(default)]
    pub label: Option<String>,
    pub raw_text: String,
}

impl CandidateText {
    pub fn new(candidate_id: Uuid, raw_text: impl Into<String>) -> Self {
        Self {
            candidate_id,
            label: None,
            raw_text: raw_text.into(),
        }
    }

    /// The caller's label, else `Candidate <first 8 chars of id>`.
    pub fn display_label(&self) -> String {
        match self.label.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => {
                let id = self.candidate_id.to_string();
                format!("Candidate {}", &id[..8])
            }
        }
    }
}

/// One run's input: a job plus every candidate to score against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRequest {
    pub job: JobPosting,
    pub candidates: Vec<CandidateText>,
}

impl RunRequest {
    pub fn from_json(body: &str) -> Result<Self, AppError> {
        let request: RunRequest = serde_json::from_str(body)?;
        request.validate()?;
        Ok(request)
    }

    /// Structural checks only. Empty JD or CV text is allowed and scores with defaults.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.candidates.is_empty() {
            return Err(AppError::Validation(
                "a run needs at least one candidate".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for candidate in &self.candidates {
            if !seen.insert(candidate.candidate_id) {
                return Err(AppError::Validation(format!(
                    "candidate {} appears more than once",
                    candidate.candidate_id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_optional_lists_default_to_none() {
        let job: JobPosting =
            serde_json::from_str(r#"{"title": "Data Engineer", "jd_text": "Airflow"}"#).unwrap();
        assert!(job.jd_required_skills.is_none());
        assert!(job.jd_preferred_skills.is_none());
        assert!(job.mandatory_certs.is_none());
    }

    #[test]
    fn test_display_label_prefers_caller_label() {
        let mut candidate = CandidateText::new(Uuid::new_v4(), "cv");
        candidate.label = Some("  REF-042 ".to_string());
        assert_eq!(candidate.display_label(), "REF-042");
    }

    #[test]
    fn test_display_label_falls_back_to_short_id() {
        let id = Uuid::parse_str("1b4e28ba-2fa1-11d2-883f-0016d3cca427").unwrap();
        let candidate = CandidateText::new(id, "cv");
        assert_eq!(candidate.display_label(), "Candidate 1b4e28ba");
    }

    #[test]
    fn test_run_request_rejects_empty_candidates() {
        let err = RunRequest::from_json(r#"{"job": {"title": "x", "jd_text": ""}, "candidates": []}"#)
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_run_request_rejects_duplicate_candidates() {
        let id = Uuid::new_v4();
        let request = RunRequest {
            job: JobPosting::default(),
            candidates: vec![CandidateText::new(id, "a"), CandidateText::new(id, "b")],
        };
        assert!(matches!(request.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_run_request_accepts_empty_cv_text() {
        let request = RunRequest {
            job: JobPosting::default(),
            candidates: vec![CandidateText::new(Uuid::new_v4(), "")],
        };
        assert!(request.validate().is_ok());
    }
}
