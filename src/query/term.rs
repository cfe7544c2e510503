//! Term query implementation for exact term matching.

use std::any::Any;

use crate::error::Result;
use crate::index::reader::IndexReader;
use crate::query::query::{DocScores, Query, with_boost_suffix};
use crate::query::scorer::{BM25Scorer, Bm25Config};

/// A query that matches documents containing a specific term.
#[derive(Debug, Clone)]
pub struct TermQuery {
    /// The field to search in.
    field: String,
    /// The term to search for.
    term: String,
    /// The boost factor for this query.
    boost: f32,
}

impl TermQuery {
    /// Create a new term query.
    ///
    /// TermQuery does NOT analyze the term; it must already be in indexed form
    /// (lowercased, etc.). The query parser takes care of that.
    pub fn new<F, T>(field: F, term: T) -> Self
    where
        F: Into<String>,
        T: Into<String>,
    {
        TermQuery {
            field: field.into(),
            term: term.into(),
            boost: 1.0,
        }
    }

    /// Get the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Get the term.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Set the boost factor.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }
}

impl Query for TermQuery {
    fn scores(&self, reader: &dyn IndexReader, config: &Bm25Config) -> Result<DocScores> {
        let mut scores = DocScores::new();

        let (Some(postings), Some(stats)) = (
            reader.postings(&self.field, &self.term),
            reader.field_stats(&self.field),
        ) else {
            return Ok(scores);
        };

        let idf = config.idf(postings.doc_freq(), stats.doc_count);
        let scorer = BM25Scorer::new(idf, stats.avg_length, self.boost, config);

        for posting in postings.iter() {
            let field_length = reader.field_length(&self.field, posting.doc_id) as f32;
            scores.insert(
                posting.doc_id,
                scorer.score(posting.term_freq() as f32, field_length),
            );
        }

        Ok(scores)
    }

    fn boost(&self) -> f32 {
        self.boost
    }

    fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }

    fn description(&self) -> String {
        with_boost_suffix(format!("{}:{}", self.field, self.term), self.boost)
    }

    fn clone_box(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
