pub mod engine;
pub mod keywords;
pub mod rates;
pub mod result;

pub use engine::ScoringEngine;
pub use result::{CriterionResult, KeywordHit, Metadata, ScoreDetail, ScoreRecord, ScoringResult};
