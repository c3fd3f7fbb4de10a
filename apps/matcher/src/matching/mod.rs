// Matching core: requirement extraction, coverage, subscores, gating,
// suggestions and ranking. The engine wires them into one run.

pub mod blockers;
pub mod coverage;
pub mod engine;
pub mod ranking;
pub mod requirements;
pub mod strategy;
pub mod subscores;
pub mod suggestions;

pub use engine::{MatchEngine, PreparedJob};
pub use requirements::{Requirement, RequirementClass, RequirementSet};
pub use strategy::{ExactStrategy, MatchStrategy, SemanticStrategy};
