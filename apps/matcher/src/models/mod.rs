pub mod job;
pub mod match_result;

pub use job::{CandidateText, JobPosting, RunRequest};
pub use match_result::{MatchResult, MatchRun, Subscores, Suggestions};
