//! Phrase query implementation for matching exact term sequences.

use std::any::Any;

use crate::error::Result;
use crate::index::reader::{IndexReader, PostingList};
use crate::query::query::{DocScores, Query, with_boost_suffix};
use crate::query::scorer::{BM25Scorer, Bm25Config};

/// A query that matches documents containing terms at fixed relative positions.
///
/// Offsets come from the analyzer, so a stop word removed from the middle of
/// a phrase still occupies its slot: `"red the planet"` needs `planet` two
/// positions after `red`.
#[derive(Debug, Clone)]
pub struct PhraseQuery {
    field: String,
    /// `(offset, term)` pairs, offsets relative to the first term.
    terms: Vec<(u32, String)>,
    boost: f32,
}

impl PhraseQuery {
    /// Create a phrase from consecutive terms.
    pub fn new<F: Into<String>>(field: F, terms: Vec<String>) -> Self {
        let terms = terms
            .into_iter()
            .enumerate()
            .map(|(i, t)| (i as u32, t))
            .collect();
        PhraseQuery {
            field: field.into(),
            terms,
            boost: 1.0,
        }
    }

    /// Create a phrase from terms with explicit relative offsets.
    pub fn with_offsets<F: Into<String>>(field: F, terms: Vec<(u32, String)>) -> Self {
        PhraseQuery {
            field: field.into(),
            terms,
            boost: 1.0,
        }
    }

    /// Get the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Get the `(offset, term)` pairs.
    pub fn terms(&self) -> &[(u32, String)] {
        &self.terms
    }
}

impl Query for PhraseQuery {
    fn scores(&self, reader: &dyn IndexReader, config: &Bm25Config) -> Result<DocScores> {
        let mut scores = DocScores::new();
        let Some(stats) = reader.field_stats(&self.field) else {
            return Ok(scores);
        };
        if self.terms.is_empty() {
            return Ok(scores);
        }

        let mut lists: Vec<(u32, &PostingList)> = Vec::with_capacity(self.terms.len());
        for (offset, term) in &self.terms {
            match reader.postings(&self.field, term) {
                Some(list) => lists.push((*offset, list)),
                None => return Ok(scores),
            }
        }

        let idf: f32 = lists
            .iter()
            .map(|(_, list)| config.idf(list.doc_freq(), stats.doc_count))
            .sum();
        let scorer = BM25Scorer::new(idf, stats.avg_length, self.boost, config);

        let (first_offset, first) = lists[0];
        for posting in first.iter() {
            let doc_id = posting.doc_id;
            let others: Option<Vec<_>> = lists[1..]
                .iter()
                .map(|(offset, list)| list.get(doc_id).map(|p| (*offset, p)))
                .collect();
            let Some(others) = others else {
                continue;
            };

            let phrase_freq = posting
                .positions
                .iter()
                .filter(|&&start| {
                    let Some(base) = start.checked_sub(first_offset) else {
                        return false;
                    };
                    others
                        .iter()
                        .all(|(offset, p)| p.positions.binary_search(&(base + offset)).is_ok())
                })
                .count();

            if phrase_freq > 0 {
                let field_length = reader.field_length(&self.field, doc_id) as f32;
                scores.insert(doc_id, scorer.score(phrase_freq as f32, field_length));
            }
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
        let words: Vec<&str> = self.terms.iter().map(|(_, t)| t.as_str()).collect();
        with_boost_suffix(
            format!("{}:\"{}\"", self.field, words.join(" ")),
            self.boost,
        )
    }

    fn clone_box(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::analysis::analyzer::StandardAnalyzer;
    use crate::index::document::StoredDocument;
    use crate::index::meta::IndexMeta;
    use crate::index::reader::InvertedIndexReader;

    fn reader() -> InvertedIndexReader {
        let docs = vec![
            StoredDocument::new().with_field("tokens", "the red planet"),
            StoredDocument::new().with_field("tokens", "planet red"),
            StoredDocument::new().with_field("tokens", "red of planet"),
        ];
        InvertedIndexReader::from_documents(
            IndexMeta::default(),
            Arc::new(StandardAnalyzer::new().unwrap()),
            docs,
        )
        .unwrap()
    }

    #[test]
    fn test_phrase_requires_order_and_adjacency() {
        let reader = reader();
        let query = PhraseQuery::new("tokens", vec!["red".to_string(), "planet".to_string()]);
        let scores = query.scores(&reader, &Bm25Config::default()).unwrap();

        assert_eq!(scores.len(), 1);
        assert!(scores.contains_key(&0));
    }

    #[test]
    fn test_phrase_with_gap() {
        let reader = reader();
        let query = PhraseQuery::with_offsets(
            "tokens",
            vec![(0, "red".to_string()), (2, "planet".to_string())],
        );
        let scores = query.scores(&reader, &Bm25Config::default()).unwrap();

        assert_eq!(scores.len(), 1);
        assert!(scores.contains_key(&2));
    }

    #[test]
    fn test_missing_term_matches_nothing() {
        let reader = reader();
        let query = PhraseQuery::new("tokens", vec!["red".to_string(), "giant".to_string()]);
        assert!(query.scores(&reader, &Bm25Config::default()).unwrap().is_empty());
    }

    #[test]
    fn test_description() {
        let query = PhraseQuery::new("tokens", vec!["red".to_string(), "planet".to_string()]);
        assert_eq!(query.description(), "tokens:\"red planet\"");
    }
}
