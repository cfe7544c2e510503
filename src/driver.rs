//! End-to-end evaluation run: parse, retrieve, evaluate, report.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};

use log::{debug, info};

use crate::config::EvalConfig;
use crate::error::{EvalError, Result};
use crate::evaluator::{Outcome, ScoreState, evaluate};
use crate::index::reader::InvertedIndexReader;
use crate::question::QuestionReader;
use crate::report::ScoreReport;
use crate::retriever::AnswerRetriever;

/// Line printed once the report is written.
pub const COMPLETION_MESSAGE: &str = "Program completed, Thank you.";

/// Evaluate every question from `questions` against `retriever`.
///
/// Records are read lazily; each one is retrieved and scored before the next
/// is parsed. The first error aborts the run.
pub fn evaluate_questions<R: BufRead>(
    questions: R,
    retriever: &AnswerRetriever<'_>,
) -> Result<ScoreState> {
    let mut state = ScoreState::new();

    for record in QuestionReader::new(questions) {
        let record = record?;
        let result = retriever.retrieve(&record.query)?;
        let outcome = evaluate(&record, result.as_ref(), &mut state);

        match outcome {
            Outcome::Hit { rank } => debug!(
                "Question at line {} answered at rank {rank}: {}",
                record.line,
                result.as_ref().map_or("", |r| r.retrieved_answer.as_str())
            ),
            Outcome::Miss => debug!(
                "Question at line {} missed (retrieved {:?}, expected {:?})",
                record.line,
                result.as_ref().map(|r| r.retrieved_answer.as_str()),
                record.candidate_answers
            ),
        }
    }

    info!(
        "Evaluated {} questions, {} answered correctly",
        state.answered_total, state.answered_right
    );
    Ok(state)
}

/// Open the configured index and evaluate the configured question file.
pub fn run_evaluation(config: &EvalConfig) -> Result<ScoreState> {
    config.validate()?;

    let extra_fields: Vec<String> = config.search_field.iter().cloned().collect();
    let reader = InvertedIndexReader::open_with_fields(&config.index_path, &extra_fields)?;

    let mut retriever = AnswerRetriever::new(&reader).with_scoring(config.scoring);
    if let Some(field) = &config.search_field {
        retriever = retriever.with_search_field(field.clone());
    }
    if let Some(field) = &config.answer_field {
        retriever = retriever.with_answer_field(field.clone());
    }
    info!(
        "Searching field '{}', answers from '{}'",
        retriever.search_field(),
        retriever.answer_field()
    );

    let file = File::open(&config.questions_path).map_err(|e| {
        EvalError::Io(std::io::Error::new(
            e.kind(),
            format!("cannot open {}: {e}", config.questions_path.display()),
        ))
    })?;
    evaluate_questions(BufReader::new(file), &retriever)
}

/// Write the report for `state` followed by the completion line.
pub fn write_report<W: Write>(out: &mut W, state: &ScoreState) -> Result<()> {
    write!(out, "{}", ScoreReport::new(state))?;
    writeln!(out, "{COMPLETION_MESSAGE}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::analysis::analyzer::StandardAnalyzer;
    use crate::index::document::StoredDocument;
    use crate::index::meta::IndexMeta;

    fn reader() -> InvertedIndexReader {
        let docs = vec![
            StoredDocument::new()
                .with_field("title", "Mars")
                .with_field("tokens", "red planet fourth"),
            StoredDocument::new()
                .with_field("title", "Water")
                .with_field("tokens", "liquid h2o chemistry"),
        ];
        InvertedIndexReader::from_documents(
            IndexMeta::default(),
            Arc::new(StandardAnalyzer::new().unwrap()),
            docs,
        )
        .unwrap()
    }

    #[test]
    fn test_evaluate_questions() {
        let reader = reader();
        let retriever = AnswerRetriever::new(&reader);
        let questions = "PLANETS\nThe red planet\nBarsoom|Mars\n\n\
                         SCIENCE\nH2O\nIce\n\n\
                         MISC\nzebra\nHorse\n\n";

        let state = evaluate_questions(questions.as_bytes(), &retriever).unwrap();
        assert_eq!(state.answered_total, 3);
        assert_eq!(state.answered_right, 1);
        assert_eq!(state.sum_reciprocal_rank, 0.5);
        assert_eq!(state.match_log[0].query, "The red planet PLANETS");
    }

    #[test]
    fn test_malformed_input_aborts() {
        let reader = reader();
        let retriever = AnswerRetriever::new(&reader);

        let result = evaluate_questions("PLANETS\nThe red planet\nMars\n\nX\n".as_bytes(), &retriever);
        assert!(matches!(result, Err(EvalError::MalformedInput(_))));
    }

    #[test]
    fn test_write_report() {
        let mut out = Vec::new();
        write_report(&mut out, &ScoreState::new()).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Precision: N/A"));
        assert!(text.ends_with("Program completed, Thank you.\n"));
    }
}
