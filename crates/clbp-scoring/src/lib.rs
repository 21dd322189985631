//! clbp-scoring
//!
//! Assessment scoring as pure functions with no storage dependency. Maps each
//! answer to a numeric score according to its question's type, assembles
//! scored response lists, and derives the dashboard and mock prediction
//! figures from them.

pub mod answer;
pub mod dashboard;
pub mod error;
pub mod prediction;
pub mod responses;

pub use answer::score_answer;
pub use responses::{Completeness, rescore, score_responses, total_score};
