//! Index module.
//!
//! This module provides read-only access to a prebuilt index directory and
//! a searcher that ranks its documents against a query.

pub mod document;
pub mod meta;
pub mod reader;
pub mod searcher;

// Re-export commonly used types
pub use document::{DocId, StoredDocument};
pub use meta::IndexMeta;
pub use reader::{FieldStats, IndexReader, InvertedIndexReader, Posting, PostingList};
pub use searcher::IndexSearcher;
