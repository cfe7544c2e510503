//! Boolean query implementation for combining multiple queries.

use std::any::Any;

use crate::error::Result;
use crate::index::reader::IndexReader;
use crate::query::query::{DocScores, Query, with_boost_suffix};
use crate::query::scorer::Bm25Config;

/// How a clause participates in a boolean query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occur {
    /// The clause must match.
    Must,
    /// The clause may match and adds to the score when it does.
    Should,
    /// The clause must not match.
    MustNot,
}

/// A clause in a boolean query.
#[derive(Debug, Clone)]
pub struct BooleanClause {
    /// The query for this clause.
    pub query: Box<dyn Query>,
    /// The occurrence requirement.
    pub occur: Occur,
}

impl BooleanClause {
    /// Create a new boolean clause.
    pub fn new(query: Box<dyn Query>, occur: Occur) -> Self {
        BooleanClause { query, occur }
    }
}

/// A query that combines other queries with Must/Should/MustNot logic.
///
/// With at least one Must clause, Should clauses only add to the score. With
/// none, at least one Should clause has to match. A query made only of
/// MustNot clauses matches nothing.
#[derive(Debug, Clone)]
pub struct BooleanQuery {
    clauses: Vec<BooleanClause>,
    boost: f32,
}

impl Default for BooleanQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl BooleanQuery {
    /// Create a new empty boolean query.
    pub fn new() -> Self {
        BooleanQuery {
            clauses: Vec::new(),
            boost: 1.0,
        }
    }

    /// Add a clause to this query.
    pub fn add_clause(&mut self, clause: BooleanClause) {
        self.clauses.push(clause);
    }

    /// Add a Must clause.
    pub fn add_must(&mut self, query: Box<dyn Query>) {
        self.add_clause(BooleanClause::new(query, Occur::Must));
    }

    /// Add a Should clause.
    pub fn add_should(&mut self, query: Box<dyn Query>) {
        self.add_clause(BooleanClause::new(query, Occur::Should));
    }

    /// Add a MustNot clause.
    pub fn add_must_not(&mut self, query: Box<dyn Query>) {
        self.add_clause(BooleanClause::new(query, Occur::MustNot));
    }

    /// Get the clauses.
    pub fn clauses(&self) -> &[BooleanClause] {
        &self.clauses
    }

    /// Check if the query has no clauses.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl Query for BooleanQuery {
    fn scores(&self, reader: &dyn IndexReader, config: &Bm25Config) -> Result<DocScores> {
        let mut required: Option<DocScores> = None;
        let mut optional: Vec<DocScores> = Vec::new();
        let mut excluded: Vec<DocScores> = Vec::new();

        for clause in &self.clauses {
            let scores = clause.query.scores(reader, config)?;
            match clause.occur {
                Occur::Must => {
                    required = Some(match required {
                        None => scores,
                        Some(mut acc) => {
                            acc.retain(|doc_id, _| scores.contains_key(doc_id));
                            for (doc_id, score) in acc.iter_mut() {
                                *score += scores.get(doc_id).copied().unwrap_or(0.0);
                            }
                            acc
                        }
                    });
                }
                Occur::Should => optional.push(scores),
                Occur::MustNot => excluded.push(scores),
            }
        }

        let mut result = match required {
            Some(mut acc) => {
                for scores in &optional {
                    for (doc_id, score) in acc.iter_mut() {
                        if let Some(extra) = scores.get(doc_id) {
                            *score += extra;
                        }
                    }
                }
                acc
            }
            None => {
                let mut acc = DocScores::new();
                for scores in &optional {
                    for (doc_id, score) in scores {
                        *acc.entry(*doc_id).or_insert(0.0) += score;
                    }
                }
                acc
            }
        };

        for scores in &excluded {
            result.retain(|doc_id, _| !scores.contains_key(doc_id));
        }

        if self.boost != 1.0 {
            for score in result.values_mut() {
                *score *= self.boost;
            }
        }

        Ok(result)
    }

    fn boost(&self) -> f32 {
        self.boost
    }

    fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }

    fn description(&self) -> String {
        if self.clauses.is_empty() {
            return "()".to_string();
        }

        let parts: Vec<String> = self
            .clauses
            .iter()
            .map(|clause| match clause.occur {
                Occur::Must => format!("+{}", clause.query.description()),
                Occur::Should => clause.query.description(),
                Occur::MustNot => format!("-{}", clause.query.description()),
            })
            .collect();

        with_boost_suffix(format!("({})", parts.join(" ")), self.boost)
    }

    fn clone_box(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Builder for boolean queries.
#[derive(Debug, Default)]
pub struct BooleanQueryBuilder {
    query: BooleanQuery,
}

impl BooleanQueryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a Must clause.
    pub fn must(mut self, query: Box<dyn Query>) -> Self {
        self.query.add_must(query);
        self
    }

    /// Add a Should clause.
    pub fn should(mut self, query: Box<dyn Query>) -> Self {
        self.query.add_should(query);
        self
    }

    /// Add a MustNot clause.
    pub fn must_not(mut self, query: Box<dyn Query>) -> Self {
        self.query.add_must_not(query);
        self
    }

    /// Build the query.
    pub fn build(self) -> BooleanQuery {
        self.query
    }
}
