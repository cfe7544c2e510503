//! Final metrics and the human-readable evaluation report.

use std::fmt;

use crate::error::{EvalError, Result};
use crate::evaluator::ScoreState;

/// Read-only view over a finished [`ScoreState`].
#[derive(Debug, Clone, Copy)]
pub struct ScoreReport<'a> {
    state: &'a ScoreState,
}

impl<'a> ScoreReport<'a> {
    /// Create a report over `state`.
    pub fn new(state: &'a ScoreState) -> Self {
        ScoreReport { state }
    }

    /// Fraction of questions whose top answer matched a candidate.
    pub fn precision(&self) -> Result<f64> {
        self.ratio(self.state.answered_right as f64, "precision")
    }

    /// Mean of `1 / rank` over all questions, misses counting as 0.
    pub fn mrr(&self) -> Result<f64> {
        self.ratio(self.state.sum_reciprocal_rank, "mean reciprocal rank")
    }

    /// Number of evaluated questions.
    pub fn total(&self) -> u64 {
        self.state.answered_total
    }

    fn ratio(&self, numerator: f64, metric: &str) -> Result<f64> {
        if self.state.answered_total == 0 {
            return Err(EvalError::no_data(format!(
                "{metric} is undefined without evaluated questions"
            )));
        }
        Ok(numerator / self.state.answered_total as f64)
    }
}

fn format_metric(value: Result<f64>) -> String {
    match value {
        Ok(value) => format!("{value:.4}"),
        Err(_) => "N/A".to_string(),
    }
}

impl fmt::Display for ScoreReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\tPrecision: {}", format_metric(self.precision()))?;
        writeln!(f, "\tMean Reciprocal Rank (MRR): {}", format_metric(self.mrr()))?;
        writeln!(f, "\tTotal Questions Processed: {}", self.total())?;

        writeln!(f)?;
        writeln!(f, "Error Analysis:")?;
        writeln!(f, "Number of Correct Answers: {}", self.state.match_log.len())?;
        writeln!(f, "Number of Incorrect Answers: {}", self.state.answered_wrong())?;

        for entry in &self.state.match_log {
            writeln!(f, "Question: {}", entry.query)?;
            writeln!(f, "Expected Answer: {}", entry.expected_answer)?;
            writeln!(f, "Correct Answer Provided: {}", entry.retrieved_answer)?;
            writeln!(f, "------")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::MatchEntry;

    #[test]
    fn test_metrics() {
        let state = ScoreState {
            answered_right: 2,
            answered_total: 3,
            sum_reciprocal_rank: 1.5,
            match_log: Vec::new(),
        };
        let report = ScoreReport::new(&state);

        assert!((report.precision().unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(report.mrr().unwrap(), 0.5);
    }

    #[test]
    fn test_empty_state_has_no_metrics() {
        let state = ScoreState::new();
        let report = ScoreReport::new(&state);

        assert!(matches!(report.precision(), Err(EvalError::NoData(_))));
        assert!(matches!(report.mrr(), Err(EvalError::NoData(_))));

        let text = report.to_string();
        assert!(text.contains("\tPrecision: N/A\n"));
        assert!(text.contains("\tMean Reciprocal Rank (MRR): N/A\n"));
        assert!(text.contains("\tTotal Questions Processed: 0\n"));
    }

    #[test]
    fn test_render() {
        let state = ScoreState {
            answered_right: 1,
            answered_total: 2,
            sum_reciprocal_rank: 0.5,
            match_log: vec![MatchEntry {
                query: "The red planet PLANETS".to_string(),
                retrieved_answer: "Mars".to_string(),
                expected_answer: "Mars".to_string(),
                rank: 2,
            }],
        };

        let expected = "\tPrecision: 0.5000\n\
                        \tMean Reciprocal Rank (MRR): 0.2500\n\
                        \tTotal Questions Processed: 2\n\
                        \n\
                        Error Analysis:\n\
                        Number of Correct Answers: 1\n\
                        Number of Incorrect Answers: 1\n\
                        Question: The red planet PLANETS\n\
                        Expected Answer: Mars\n\
                        Correct Answer Provided: Mars\n\
                        ------\n";
        assert_eq!(ScoreReport::new(&state).to_string(), expected);
    }
}
