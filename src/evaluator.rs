//! Scoring of retrieved answers against candidate answers.

use serde::{Deserialize, Serialize};

use crate::question::QuestionRecord;
use crate::retriever::RetrievalResult;

/// A question whose retrieved answer matched one of its candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEntry {
    /// Query text of the question.
    pub query: String,
    /// Answer returned by the index.
    pub retrieved_answer: String,
    /// Candidate that matched.
    pub expected_answer: String,
    /// 1-based rank of the matched candidate.
    pub rank: usize,
}

/// Running totals of an evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreState {
    /// Questions whose retrieved answer matched a candidate.
    pub answered_right: u64,
    /// Questions evaluated.
    pub answered_total: u64,
    /// Sum of `1 / rank` over matched questions.
    pub sum_reciprocal_rank: f64,
    /// One entry per matched question, in evaluation order.
    pub match_log: Vec<MatchEntry>,
}

impl ScoreState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of evaluated questions that did not match.
    pub fn answered_wrong(&self) -> u64 {
        self.answered_total - self.match_log.len() as u64
    }
}

/// Result of evaluating one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The retrieved answer equals the candidate at `rank` (1-based).
    Hit { rank: usize },
    /// No result, or no candidate equals the retrieved answer.
    Miss,
}

impl Outcome {
    /// Check whether this is a hit.
    pub fn is_hit(&self) -> bool {
        matches!(self, Outcome::Hit { .. })
    }
}

/// Find the 1-based rank of the first candidate equal to `answer`.
///
/// Comparison is exact and case sensitive on trimmed text.
pub fn match_rank(answer: &str, candidates: &[String]) -> Option<usize> {
    let answer = answer.trim();
    candidates
        .iter()
        .position(|candidate| candidate.trim() == answer)
        .map(|index| index + 1)
}

/// Score one question and fold it into `state`.
///
/// `answered_total` grows by exactly one whatever the outcome.
pub fn evaluate(
    record: &QuestionRecord,
    result: Option<&RetrievalResult>,
    state: &mut ScoreState,
) -> Outcome {
    state.answered_total += 1;

    let Some(result) = result else {
        return Outcome::Miss;
    };
    let Some(rank) = match_rank(&result.retrieved_answer, &record.candidate_answers) else {
        return Outcome::Miss;
    };

    state.answered_right += 1;
    state.sum_reciprocal_rank += 1.0 / rank as f64;
    state.match_log.push(MatchEntry {
        query: record.query.clone(),
        retrieved_answer: result.retrieved_answer.clone(),
        expected_answer: record.candidate_answers[rank - 1].clone(),
        rank,
    });
    Outcome::Hit { rank }
}
