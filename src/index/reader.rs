//! Read-only access to an index directory.
//!
//! An index directory holds `meta.json` and `documents.jsonl`. Opening it
//! loads the stored documents and inverts the indexed fields in memory with
//! the analyzer named in the metadata. Nothing is ever written back.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ahash::AHashMap;
use log::{debug, info};

use crate::analysis::analyzer::{Analyzer, analyzer_by_name};
use crate::error::{EvalError, Result};
use crate::index::document::{DocId, StoredDocument};
use crate::index::meta::IndexMeta;

/// File name of the stored documents inside an index directory.
pub const DOCUMENTS_FILE: &str = "documents.jsonl";

/// Occurrences of a term in one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    /// Document containing the term.
    pub doc_id: DocId,
    /// Token positions of the term in the field, ascending.
    pub positions: Vec<u32>,
}

impl Posting {
    /// Number of occurrences of the term in the document.
    pub fn term_freq(&self) -> u32 {
        self.positions.len() as u32
    }
}

/// Postings of one term, ordered by document id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostingList {
    postings: Vec<Posting>,
}

impl PostingList {
    /// Number of documents containing the term.
    pub fn doc_freq(&self) -> u64 {
        self.postings.len() as u64
    }

    /// Iterate postings in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, Posting> {
        self.postings.iter()
    }

    /// Find the posting for a document.
    pub fn get(&self, doc_id: DocId) -> Option<&Posting> {
        self.postings
            .binary_search_by_key(&doc_id, |p| p.doc_id)
            .ok()
            .map(|i| &self.postings[i])
    }
}

/// Statistics of an indexed field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldStats {
    /// Documents with at least one token in the field.
    pub doc_count: u64,
    /// Tokens across all documents.
    pub total_terms: u64,
    /// Average field length in tokens.
    pub avg_length: f64,
}

/// Trait for index readers.
pub trait IndexReader: Send + Sync + fmt::Debug {
    /// Get the number of documents in the index.
    fn doc_count(&self) -> u64;

    /// Get a document by ID.
    fn document(&self, doc_id: DocId) -> Result<Option<StoredDocument>>;

    /// Get posting list for a field and term.
    fn postings(&self, field: &str, term: &str) -> Option<&PostingList>;

    /// Get field statistics.
    fn field_stats(&self, field: &str) -> Option<FieldStats>;

    /// Length in tokens of a field in a document.
    fn field_length(&self, field: &str, doc_id: DocId) -> u32;
}

#[derive(Debug, Default)]
struct FieldIndex {
    terms: AHashMap<String, PostingList>,
    lengths: Vec<u32>,
    total_terms: u64,
    doc_count: u64,
}

/// Index reader over a directory loaded into memory.
pub struct InvertedIndexReader {
    path: Option<PathBuf>,
    meta: IndexMeta,
    analyzer: Arc<dyn Analyzer>,
    documents: Vec<StoredDocument>,
    fields: AHashMap<String, FieldIndex>,
}

impl InvertedIndexReader {
    /// Open the index directory at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_fields(path, &[])
    }

    /// Open the index at `path`, also inverting `extra_fields`.
    pub fn open_with_fields<P: AsRef<Path>>(path: P, extra_fields: &[String]) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(EvalError::index_unavailable(format!(
                "{} is not a directory",
                path.display()
            )));
        }

        let mut meta = IndexMeta::load(path)?;
        for field in extra_fields {
            if !meta.indexed_fields.contains(field) {
                meta.indexed_fields.push(field.clone());
            }
        }
        let analyzer = analyzer_by_name(&meta.analyzer)?;
        let documents = load_documents(&path.join(DOCUMENTS_FILE))?;

        let mut reader = Self::from_documents(meta, analyzer, documents)?;
        reader.path = Some(path.to_path_buf());
        info!(
            "Opened index {} ({} documents, analyzer '{}')",
            path.display(),
            reader.doc_count(),
            reader.meta.analyzer
        );
        Ok(reader)
    }

    /// Build a reader over documents already in memory.
    pub fn from_documents(
        meta: IndexMeta,
        analyzer: Arc<dyn Analyzer>,
        documents: Vec<StoredDocument>,
    ) -> Result<Self> {
        let meta = meta.validated()?;
        let mut fields = AHashMap::new();

        for field in &meta.indexed_fields {
            let mut field_index = FieldIndex {
                lengths: vec![0; documents.len()],
                ..FieldIndex::default()
            };

            for (doc_id, doc) in documents.iter().enumerate() {
                let Some(text) = doc.get(field) else {
                    continue;
                };

                let mut positions: AHashMap<String, Vec<u32>> = AHashMap::new();
                let mut length = 0u32;
                for token in analyzer.analyze(text)? {
                    positions
                        .entry(token.text)
                        .or_default()
                        .push(token.position as u32);
                    length += 1;
                }

                if length > 0 {
                    field_index.doc_count += 1;
                    field_index.total_terms += u64::from(length);
                }
                field_index.lengths[doc_id] = length;

                // Documents are visited in id order, so each list stays sorted.
                for (term, positions) in positions {
                    field_index
                        .terms
                        .entry(term)
                        .or_default()
                        .postings
                        .push(Posting {
                            doc_id: doc_id as DocId,
                            positions,
                        });
                }
            }

            debug!(
                "Inverted field '{}': {} terms, {} documents",
                field,
                field_index.terms.len(),
                field_index.doc_count
            );
            fields.insert(field.clone(), field_index);
        }

        Ok(InvertedIndexReader {
            path: None,
            meta,
            analyzer,
            documents,
            fields,
        })
    }

    /// Index metadata.
    pub fn meta(&self) -> &IndexMeta {
        &self.meta
    }

    /// Analyzer shared by the indexed fields and query parsing.
    pub fn analyzer(&self) -> Arc<dyn Analyzer> {
        Arc::clone(&self.analyzer)
    }

    /// Directory the reader was opened from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl fmt::Debug for InvertedIndexReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvertedIndexReader")
            .field("path", &self.path)
            .field("meta", &self.meta)
            .field("documents", &self.documents.len())
            .finish()
    }
}

impl IndexReader for InvertedIndexReader {
    fn doc_count(&self) -> u64 {
        self.documents.len() as u64
    }

    fn document(&self, doc_id: DocId) -> Result<Option<StoredDocument>> {
        Ok(self.documents.get(doc_id as usize).cloned())
    }

    fn postings(&self, field: &str, term: &str) -> Option<&PostingList> {
        self.fields.get(field)?.terms.get(term)
    }

    fn field_stats(&self, field: &str) -> Option<FieldStats> {
        let field_index = self.fields.get(field)?;
        let avg_length = if field_index.doc_count > 0 {
            field_index.total_terms as f64 / field_index.doc_count as f64
        } else {
            0.0
        };

        Some(FieldStats {
            doc_count: field_index.doc_count,
            total_terms: field_index.total_terms,
            avg_length,
        })
    }

    fn field_length(&self, field: &str, doc_id: DocId) -> u32 {
        self.fields
            .get(field)
            .and_then(|f| f.lengths.get(doc_id as usize).copied())
            .unwrap_or(0)
    }
}

fn load_documents(path: &Path) -> Result<Vec<StoredDocument>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => {
            EvalError::index_unavailable(format!("{} not found", path.display()))
        }
        _ => EvalError::index_unavailable(format!("cannot open {}: {e}", path.display())),
    })?;

    let mut documents = Vec::new();
    for (line_num, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| {
            EvalError::index_unavailable(format!("cannot read {}: {e}", path.display()))
        })?;
        if line.trim().is_empty() {
            continue;
        }
        documents.push(StoredDocument::parse_json_line(&line, line_num + 1)?);
    }
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::analysis::analyzer::StandardAnalyzer;
    use crate::index::meta::META_FILE;
    use tempfile::TempDir;

    fn planets() -> Vec<StoredDocument> {
        vec![
            StoredDocument::new()
                .with_field("title", "Mars")
                .with_field("tokens", "the red planet red dust"),
            StoredDocument::new()
                .with_field("title", "Jupiter")
                .with_field("tokens", "largest planet"),
            StoredDocument::new().with_field("title", "Untitled"),
        ]
    }

    fn reader() -> InvertedIndexReader {
        InvertedIndexReader::from_documents(
            IndexMeta::default(),
            Arc::new(StandardAnalyzer::new().unwrap()),
            planets(),
        )
        .unwrap()
    }

    #[test]
    fn test_postings_and_positions() {
        let reader = reader();

        let red = reader.postings("tokens", "red").unwrap();
        assert_eq!(red.doc_freq(), 1);
        let posting = red.get(0).unwrap();
        assert_eq!(posting.positions, vec![1, 3]);
        assert_eq!(posting.term_freq(), 2);

        let planet = reader.postings("tokens", "planet").unwrap();
        let ids: Vec<DocId> = planet.iter().map(|p| p.doc_id).collect();
        assert_eq!(ids, vec![0, 1]);

        assert!(reader.postings("tokens", "the").is_none());
        assert!(reader.postings("title", "mars").is_none());
    }

    #[test]
    fn test_field_stats() {
        let reader = reader();
        let stats = reader.field_stats("tokens").unwrap();

        assert_eq!(stats.doc_count, 2);
        assert_eq!(stats.total_terms, 6);
        assert!((stats.avg_length - 3.0).abs() < 1e-9);
        assert_eq!(reader.field_length("tokens", 0), 4);
        assert_eq!(reader.field_length("tokens", 2), 0);
        assert!(reader.field_stats("missing").is_none());
    }

    #[test]
    fn test_document_lookup() {
        let reader = reader();
        assert_eq!(reader.doc_count(), 3);
        assert_eq!(
            reader.document(1).unwrap().unwrap().get("title"),
            Some("Jupiter")
        );
        assert!(reader.document(9).unwrap().is_none());
    }

    #[test]
    fn test_open_directory() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(META_FILE), r#"{"version": 1}"#).unwrap();
        fs::write(
            temp_dir.path().join(DOCUMENTS_FILE),
            "{\"title\": \"Mars\", \"tokens\": \"red planet\"}\n\n{\"title\": \"Venus\", \"tokens\": \"hot planet\"}\n",
        )
        .unwrap();

        let reader = InvertedIndexReader::open(temp_dir.path()).unwrap();
        assert_eq!(reader.doc_count(), 2);
        assert_eq!(reader.path(), Some(temp_dir.path()));
        assert_eq!(reader.postings("tokens", "hot").unwrap().doc_freq(), 1);
        assert!(reader.postings("title", "mars").is_none());
    }

    #[test]
    fn test_open_with_extra_fields() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(META_FILE), r#"{"version": 1}"#).unwrap();
        fs::write(
            temp_dir.path().join(DOCUMENTS_FILE),
            "{\"title\": \"Mars\", \"tokens\": \"red planet\"}\n",
        )
        .unwrap();

        let reader =
            InvertedIndexReader::open_with_fields(temp_dir.path(), &["title".to_string()]).unwrap();
        assert_eq!(reader.meta().indexed_fields, vec!["tokens", "title"]);
        assert_eq!(reader.postings("title", "mars").unwrap().doc_freq(), 1);
    }

    #[test]
    fn test_open_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result = InvertedIndexReader::open(temp_dir.path().join("nope"));
        assert!(matches!(result, Err(EvalError::IndexUnavailable(_))));
    }

    #[test]
    fn test_open_missing_documents() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(META_FILE), "{}").unwrap();

        let err = InvertedIndexReader::open(temp_dir.path()).unwrap_err();
        assert!(matches!(err, EvalError::IndexUnavailable(_)));
        assert!(err.to_string().contains(DOCUMENTS_FILE));
    }

    #[test]
    fn test_open_unknown_analyzer() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(META_FILE), r#"{"analyzer": "klingon"}"#).unwrap();
        fs::write(temp_dir.path().join(DOCUMENTS_FILE), "").unwrap();

        assert!(matches!(
            InvertedIndexReader::open(temp_dir.path()),
            Err(EvalError::IndexUnavailable(_))
        ));
    }
}
