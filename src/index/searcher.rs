//! Searcher implementation for executing queries against an index.

use log::debug;

use crate::error::Result;
use crate::index::document::{DocId, StoredDocument};
use crate::index::reader::IndexReader;
use crate::query::collector::{TopDocs, TopDocsCollector};
use crate::query::query::Query;
use crate::query::scorer::Bm25Config;

/// A searcher that executes queries against a borrowed index reader.
#[derive(Debug, Clone, Copy)]
pub struct IndexSearcher<'a> {
    /// The index reader to search against.
    reader: &'a dyn IndexReader,
    /// BM25 parameters used for scoring.
    scoring: &'a Bm25Config,
}

impl<'a> IndexSearcher<'a> {
    /// Create a new searcher over `reader`.
    pub fn new(reader: &'a dyn IndexReader, scoring: &'a Bm25Config) -> Self {
        IndexSearcher { reader, scoring }
    }

    /// Get the index reader.
    pub fn reader(&self) -> &'a dyn IndexReader {
        self.reader
    }

    /// Run `query` and keep the `top_k` best hits.
    ///
    /// Hits are ordered by score descending; equal scores keep the lower
    /// document id first.
    pub fn search(&self, query: &dyn Query, top_k: usize) -> Result<TopDocs> {
        let scores = query.scores(self.reader, self.scoring)?;

        let mut collector = TopDocsCollector::new(top_k);
        for (doc_id, score) in scores {
            collector.collect(doc_id, score);
        }

        let top_docs = collector.into_top_docs();
        debug!(
            "Query {} matched {} documents",
            query.description(),
            top_docs.total_hits
        );
        Ok(top_docs)
    }

    /// Load a stored document.
    pub fn doc(&self, doc_id: DocId) -> Result<Option<StoredDocument>> {
        self.reader.document(doc_id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::analysis::analyzer::StandardAnalyzer;
    use crate::index::meta::IndexMeta;
    use crate::index::reader::InvertedIndexReader;
    use crate::query::term::TermQuery;

    fn reader() -> InvertedIndexReader {
        let docs = vec![
            StoredDocument::new()
                .with_field("title", "Venus")
                .with_field("tokens", "second planet hot"),
            StoredDocument::new()
                .with_field("title", "Mars")
                .with_field("tokens", "red planet"),
            StoredDocument::new()
                .with_field("title", "Earth")
                .with_field("tokens", "third planet"),
        ];
        InvertedIndexReader::from_documents(
            IndexMeta::default(),
            Arc::new(StandardAnalyzer::new().unwrap()),
            docs,
        )
        .unwrap()
    }

    #[test]
    fn test_search_ranks_and_truncates() {
        let reader = reader();
        let config = Bm25Config::default();
        let searcher = IndexSearcher::new(&reader, &config);

        let top = searcher.search(&TermQuery::new("tokens", "red"), 1).unwrap();
        assert_eq!(top.total_hits, 1);
        assert_eq!(top.first().unwrap().doc_id, 1);

        let doc = searcher.doc(1).unwrap().unwrap();
        assert_eq!(doc.get("title"), Some("Mars"));
    }

    #[test]
    fn test_equal_scores_prefer_lower_doc_id() {
        let reader = reader();
        let config = Bm25Config::default();
        let searcher = IndexSearcher::new(&reader, &config);

        // "planet" appears once in every document; the two-token fields tie.
        let top = searcher.search(&TermQuery::new("tokens", "planet"), 3).unwrap();
        let ids: Vec<DocId> = top.hits.iter().map(|h| h.doc_id).collect();
        assert_eq!(ids, vec![1, 2, 0]);
    }

    #[test]
    fn test_no_match() {
        let reader = reader();
        let config = Bm25Config::default();
        let searcher = IndexSearcher::new(&reader, &config);

        let top = searcher.search(&TermQuery::new("tokens", "pluto"), 1).unwrap();
        assert_eq!(top.total_hits, 0);
        assert!(top.first().is_none());
    }
}
