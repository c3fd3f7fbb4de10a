//! Match Engine — scores every candidate of a run against one job, then ranks.
//!
//! Flow: extract requirements (once per run) → per candidate: tokenize →
//!       coverage → subscores → hard-blocker gate → suggestions →
//!       rank the complete set.
//!
//! Candidates are scored concurrently (bounded); results keep input order
//! until ranking so ties break on submission order.

use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::embeddings::{EmbeddingService, HttpEmbedder};
use crate::matching::blockers::hard_blockers;
use crate::matching::coverage::{covered_flags, ratio};
use crate::matching::ranking::rank_results;
use crate::matching::requirements::RequirementSet;
use crate::matching::strategy::{ExactStrategy, MatchStrategy, RoleText, SemanticStrategy};
use crate::matching::subscores::{
    achievement_density, education, experience_level, languages, total_score, SubscoreWeights,
    CONTINUITY_PLACEHOLDER,
};
use crate::matching::suggestions::{build_suggestions, SuggestionInput};
use crate::models::job::{CandidateText, JobPosting};
use crate::models::match_result::{round4, MatchResult, MatchRun, Subscores};
use crate::text::{extract_bullets, tokenize};

/// JD characters embedded alongside the title for role relevance.
const JD_EXCERPT_CHARS: usize = 1200;
/// CV characters embedded for role relevance.
const CV_EXCERPT_CHARS: usize = 4000;
const DEFAULT_CONCURRENCY: usize = 8;

/// A job with everything derived from it computed once per run.
#[derive(Debug, Clone)]
pub struct PreparedJob {
    pub title: String,
    pub requirements: RequirementSet,
    /// tokenize(title + " " + jd_text), for lexical role relevance.
    pub job_tokens: Vec<String>,
    /// `"<title>. <JD excerpt>"`, for semantic role relevance.
    pub job_summary: String,
}

impl PreparedJob {
    pub fn new(job: &JobPosting) -> Self {
        Self {
            title: job.title.clone(),
            requirements: RequirementSet::for_job(job),
            job_tokens: tokenize(&format!("{} {}", job.title, job.jd_text)),
            job_summary: format!("{}. {}", job.title, excerpt(&job.jd_text, JD_EXCERPT_CHARS)),
        }
    }
}

/// Scores and ranks candidates. Cheap to clone; the strategy is shared.
#[derive(Clone)]
pub struct MatchEngine {
    strategy: Arc<dyn MatchStrategy>,
    weights: SubscoreWeights,
    concurrency: usize,
}

impl MatchEngine {
    pub fn new(strategy: Arc<dyn MatchStrategy>) -> Self {
        Self {
            strategy,
            weights: SubscoreWeights::default(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn exact() -> Self {
        Self::new(Arc::new(ExactStrategy))
    }

    /// Picks the strategy once: semantic when an embedding endpoint is
    /// configured and enabled, exact otherwise.
    pub fn from_config(config: &Config) -> Self {
        let endpoint = config
            .embeddings_url
            .as_deref()
            .filter(|_| config.embeddings_enabled());
        let strategy: Arc<dyn MatchStrategy> = match endpoint {
            Some(url) => match HttpEmbedder::new(
                url,
                config.embeddings_api_key.clone(),
                config.embeddings_model.clone(),
            ) {
                Ok(embedder) => {
                    info!(
                        url = %url,
                        model = %embedder.model(),
                        timeout_ms = config.embeddings_timeout_ms,
                        "Semantic matching enabled"
                    );
                    let service =
                        EmbeddingService::new(Arc::new(embedder), config.embeddings_timeout());
                    Arc::new(SemanticStrategy::new(Arc::new(service)))
                }
                Err(e) => {
                    warn!(error = %e, "Could not build embedding client; using exact matching");
                    Arc::new(ExactStrategy)
                }
            },
            None => {
                info!("Embeddings not configured; using exact matching");
                Arc::new(ExactStrategy)
            }
        };

        Self::new(strategy).with_concurrency(config.match_concurrency)
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_weights(mut self, weights: SubscoreWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn backend(&self) -> &'static str {
        self.strategy.backend()
    }

    /// Scores and ranks every candidate. Never fails: malformed or empty text
    /// scores with defaults, and embedding trouble degrades to exact matching.
    pub async fn run(&self, job: &JobPosting, candidates: &[CandidateText]) -> MatchRun {
        let run_id = Uuid::new_v4();
        let prepared = PreparedJob::new(job);
        info!(
            %run_id,
            candidates = candidates.len(),
            required = prepared.requirements.required.len(),
            preferred = prepared.requirements.preferred.len(),
            mandatory = prepared.requirements.mandatory.len(),
            required_source = ?prepared.requirements.required_source,
            backend = self.backend(),
            "Starting match run"
        );

        let mut results: Vec<MatchResult> = stream::iter(candidates)
            .map(|candidate| self.score_candidate(&prepared, candidate))
            .buffered(self.concurrency)
            .collect()
            .await;

        rank_results(&mut results);

        let scorer_backend = self.strategy.effective_backend().to_string();
        info!(
            %run_id,
            scored = results.len(),
            backend = %scorer_backend,
            top_score = results.first().map(|r| r.total_score).unwrap_or(0.0),
            "Match run complete"
        );

        MatchRun {
            run_id,
            job_title: prepared.title.clone(),
            created_at: Utc::now(),
            scorer_backend,
            requirements: prepared.requirements.tagged(),
            results,
        }
    }

    /// Scores one candidate. `rank` and `delta_to_top5` stay at 0 until the run is ranked.
    pub async fn score_candidate(&self, job: &PreparedJob, candidate: &CandidateText) -> MatchResult {
        let strategy = self.strategy.as_ref();
        let requirements = &job.requirements;

        let cv_tokens = tokenize(&candidate.raw_text);
        let index = strategy.index(cv_tokens.clone()).await;

        let required_covered = covered_flags(strategy, &requirements.required, &index).await;
        let preferred_covered = covered_flags(strategy, &requirements.preferred, &index).await;
        let blockers = hard_blockers(strategy, &requirements.mandatory, &index).await;

        let cv_excerpt = excerpt(&candidate.raw_text, CV_EXCERPT_CHARS);
        let role_relevance = strategy
            .role_relevance(&RoleText {
                job_summary: &job.job_summary,
                job_tokens: &job.job_tokens,
                cv_text: &cv_excerpt,
                cv_tokens: &cv_tokens,
            })
            .await;

        let bullets = extract_bullets(&candidate.raw_text);

        let subscores = Subscores {
            req_skills: ratio(&required_covered),
            pref_skills: ratio(&preferred_covered),
            role_relevance,
            experience_level: experience_level(&candidate.raw_text),
            achievement_density: achievement_density(&bullets),
            education: education(&candidate.raw_text),
            languages: languages(&candidate.raw_text),
            continuity: CONTINUITY_PLACEHOLDER,
        }
        .clamped();
        let total = round4(total_score(&subscores, &self.weights, &blockers));

        let suggestions = build_suggestions(&SuggestionInput {
            required: &requirements.required,
            required_covered: &required_covered,
            preferred: &requirements.preferred,
            preferred_covered: &preferred_covered,
            jd_order: &requirements.jd_order,
            bullets: &bullets,
        });

        debug!(
            candidate_id = %candidate.candidate_id,
            total_score = total,
            hard_blockers = blockers.len(),
            "Candidate scored"
        );

        MatchResult {
            candidate_id: candidate.candidate_id,
            candidate_label: candidate.display_label(),
            total_score: total,
            subscores: subscores.rounded(),
            hard_blockers: blockers,
            rank: 0,
            suggestions,
        }
    }
}

fn excerpt(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
