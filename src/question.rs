//! Question file parsing.
//!
//! A question file is a sequence of four-line groups:
//!
//! ```text
//! PLANETS
//! The red planet
//! Mars|Barsoom
//!
//! ```
//!
//! The first line is the category, the second the clue, the third the
//! `|`-delimited candidate answers in preference order, and the fourth a
//! blank separator.

use std::io::{BufRead, Lines};

use log::warn;

use crate::error::{EvalError, Result};

/// One parsed question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    /// Category line with line breaks stripped.
    pub category: String,
    /// Clue line.
    pub clue: String,
    /// Search text: clue, a space, then category.
    pub query: String,
    /// Acceptable answers, rank 1 first, each trimmed.
    pub candidate_answers: Vec<String>,
    /// 1-based line number of the category line.
    pub line: usize,
}

impl QuestionRecord {
    /// Build a record from its category, clue and answers lines.
    pub fn from_lines(category: &str, clue: &str, answers: &str, line: usize) -> Self {
        let category: String = category.chars().filter(|c| !matches!(c, '\r' | '\n')).collect();
        let query = format!("{clue} {category}");
        let candidate_answers = answers.split('|').map(|a| a.trim().to_string()).collect();

        QuestionRecord {
            category,
            clue: clue.to_string(),
            query,
            candidate_answers,
            line,
        }
    }
}

/// Lazy iterator of [`QuestionRecord`]s over a line source.
///
/// Stops cleanly when the input ends on a group boundary. Any malformed group
/// or read failure is yielded once as an error, after which the iterator
/// returns `None`.
pub struct QuestionReader<R> {
    lines: Lines<R>,
    /// Lines consumed so far.
    line: usize,
    done: bool,
}

impl<R: BufRead> QuestionReader<R> {
    /// Create a reader over `source`.
    pub fn new(source: R) -> Self {
        QuestionReader {
            lines: source.lines(),
            line: 0,
            done: false,
        }
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        match self.lines.next() {
            Some(line) => {
                self.line += 1;
                Ok(Some(line?))
            }
            None => Ok(None),
        }
    }

    fn read_record(&mut self) -> Result<Option<QuestionRecord>> {
        let Some(category) = self.next_line()? else {
            return Ok(None);
        };
        let start = self.line;

        let mut group = Vec::with_capacity(3);
        for _ in 0..3 {
            match self.next_line()? {
                Some(line) => group.push(line),
                None => {
                    return Err(EvalError::malformed_input(format!(
                        "incomplete question starting at line {start}: expected 4 lines, found {}",
                        group.len() + 1
                    )));
                }
            }
        }

        if !group[2].trim().is_empty() {
            return Err(EvalError::malformed_input(format!(
                "line {} should be a blank separator after the question starting at line {start}",
                self.line
            )));
        }

        Ok(Some(QuestionRecord::from_lines(
            &category, &group[0], &group[1], start,
        )))
    }
}

impl<R: BufRead> Iterator for QuestionReader<R> {
    type Item = Result<QuestionRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                warn!("Stopped reading questions: {e}");
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: BufRead> std::iter::FusedIterator for QuestionReader<R> {}

/// Parse every record in `text`.
pub fn parse_questions(text: &str) -> Result<Vec<QuestionRecord>> {
    QuestionReader::new(text.as_bytes()).collect()
}
