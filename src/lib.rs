//! # jeopardy-eval
//!
//! Evaluates how well a full-text index answers Jeopardy-style questions.
//!
//! Each question is turned into a plain-text query, the single best document
//! is retrieved, and its answer field is compared against the question's
//! ranked candidate answers. The run reports precision and mean reciprocal
//! rank.
//!
//! ## Features
//!
//! - Lazy question file parsing with strict 4-line groups
//! - Query escaping so clues are always searched literally
//! - Read-only index directories inverted in memory
//! - BM25 scoring with deterministic top-1 selection

pub mod analysis;
pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod evaluator;
pub mod index;
pub mod query;
pub mod question;
pub mod report;
pub mod retriever;

pub mod prelude {
    pub use crate::config::EvalConfig;
    pub use crate::driver::{evaluate_questions, run_evaluation, write_report};
    pub use crate::error::{EvalError, Result};
    pub use crate::evaluator::{MatchEntry, Outcome, ScoreState, evaluate};
    pub use crate::index::{IndexSearcher, InvertedIndexReader};
    pub use crate::question::{QuestionReader, QuestionRecord};
    pub use crate::report::ScoreReport;
    pub use crate::retriever::{AnswerRetriever, RetrievalResult};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
