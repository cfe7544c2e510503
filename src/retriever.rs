//! Top-1 answer retrieval.

use log::debug;

use crate::error::{EvalError, Result};
use crate::index::document::DocId;
use crate::index::reader::{IndexReader, InvertedIndexReader};
use crate::index::searcher::IndexSearcher;
use crate::query::parser::QueryParser;
use crate::query::scorer::Bm25Config;

/// The best document found for a question.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalResult {
    /// Answer field of the top document, trimmed.
    pub retrieved_answer: String,
    /// Query text the result was retrieved for, before escaping.
    pub source_query: String,
    /// BM25 score of the top document.
    pub score: f32,
    /// Id of the top document.
    pub doc_id: DocId,
}

/// Retrieves the single best answer for a query from a borrowed index.
#[derive(Debug)]
pub struct AnswerRetriever<'a> {
    reader: &'a InvertedIndexReader,
    parser: QueryParser,
    answer_field: String,
    scoring: Bm25Config,
}

impl<'a> AnswerRetriever<'a> {
    /// Create a retriever using the fields named in the index metadata.
    pub fn new(reader: &'a InvertedIndexReader) -> Self {
        let meta = reader.meta();
        AnswerRetriever {
            parser: QueryParser::new(meta.default_field.clone(), reader.analyzer()),
            answer_field: meta.answer_field.clone(),
            reader,
            scoring: Bm25Config::default(),
        }
    }

    /// Search `field` instead of the index's default field.
    pub fn with_search_field<S: Into<String>>(mut self, field: S) -> Self {
        self.parser = QueryParser::new(field, self.reader.analyzer());
        self
    }

    /// Read answers from `field` instead of the index's answer field.
    pub fn with_answer_field<S: Into<String>>(mut self, field: S) -> Self {
        self.answer_field = field.into();
        self
    }

    /// Use custom BM25 parameters.
    pub fn with_scoring(mut self, scoring: Bm25Config) -> Self {
        self.scoring = scoring;
        self
    }

    /// Field searched by [`retrieve`](Self::retrieve).
    pub fn search_field(&self) -> &str {
        self.parser.default_field()
    }

    /// Field the answer is read from.
    pub fn answer_field(&self) -> &str {
        &self.answer_field
    }

    /// Number of documents in the underlying index.
    pub fn doc_count(&self) -> u64 {
        self.reader.doc_count()
    }

    /// Retrieve the answer of the top-ranked document for `query_text`.
    ///
    /// The text is escaped before parsing, so it is always searched as plain
    /// terms. Returns `Ok(None)` when no document matches.
    pub fn retrieve(&self, query_text: &str) -> Result<Option<RetrievalResult>> {
        let escaped = QueryParser::escape(query_text);
        let query = self.parser.parse(&escaped)?;
        debug!("Searching for: {}", query.description());

        let searcher = IndexSearcher::new(self.reader, &self.scoring);
        let top_docs = searcher.search(query.as_ref(), 1)?;
        let Some(hit) = top_docs.first() else {
            debug!("No hits for query: {query_text}");
            return Ok(None);
        };

        let doc = searcher.doc(hit.doc_id)?.ok_or_else(|| {
            EvalError::index_unavailable(format!("document {} is missing", hit.doc_id))
        })?;
        let answer = doc.get(&self.answer_field).ok_or_else(|| {
            EvalError::index_unavailable(format!(
                "document {} has no '{}' field",
                hit.doc_id, self.answer_field
            ))
        })?;

        debug!("Top hit: doc {} ({:.4}) -> {answer}", hit.doc_id, hit.score);
        Ok(Some(RetrievalResult {
            retrieved_answer: answer.trim().to_string(),
            source_query: query_text.to_string(),
            score: hit.score,
            doc_id: hit.doc_id,
        }))
    }
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
                .with_field("title", "  Mars ")
                .with_field("tokens", "fourth planet red dusty"),
            StoredDocument::new()
                .with_field("title", "AT&T")
                .with_field("tokens", "telephone company bell"),
            StoredDocument::new().with_field("tokens", "orphan text without title"),
        ];
        InvertedIndexReader::from_documents(
            IndexMeta::default(),
            Arc::new(StandardAnalyzer::new().unwrap()),
            docs,
        )
        .unwrap()
    }

    #[test]
    fn test_retrieve_top_answer_trimmed() {
        let reader = reader();
        let retriever = AnswerRetriever::new(&reader);

        let result = retriever.retrieve("The red planet").unwrap().unwrap();
        assert_eq!(result.retrieved_answer, "Mars");
        assert_eq!(result.source_query, "The red planet");
        assert_eq!(result.doc_id, 0);
        assert!(result.score > 0.0);
    }

    #[test]
    fn test_reserved_characters_are_searched_literally() {
        let reader = reader();
        let retriever = AnswerRetriever::new(&reader);

        let result = retriever
            .retrieve("(Bell): the telephone company? AND OR NOT")
            .unwrap()
            .unwrap();
        assert_eq!(result.retrieved_answer, "AT&T");
    }

    #[test]
    fn test_no_hits() {
        let reader = reader();
        let retriever = AnswerRetriever::new(&reader);

        assert!(retriever.retrieve("zebra").unwrap().is_none());
        assert!(retriever.retrieve("").unwrap().is_none());
    }

    #[test]
    fn test_missing_answer_field() {
        let reader = reader();
        let retriever = AnswerRetriever::new(&reader);

        let err = retriever.retrieve("orphan").unwrap_err();
        assert!(matches!(err, EvalError::IndexUnavailable(_)));
    }

    #[test]
    fn test_field_overrides() {
        let reader = reader();
        let retriever = AnswerRetriever::new(&reader).with_answer_field("tokens");

        let result = retriever.retrieve("dusty").unwrap().unwrap();
        assert_eq!(result.retrieved_answer, "fourth planet red dusty");

        let retriever = AnswerRetriever::new(&reader).with_search_field("title");
        assert_eq!(retriever.search_field(), "title");
        // "title" is not inverted, so nothing matches.
        assert!(retriever.retrieve("Mars").unwrap().is_none());
    }
}
