//! Candidate/job matching engine: explainable compatibility scores, ranking
//! and improvement suggestions for free-text CVs against a job description.

pub mod config;
pub mod embeddings;
pub mod errors;
pub mod matching;
pub mod models;
pub mod text;
