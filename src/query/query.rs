//! Base query trait.

use std::any::Any;
use std::fmt::Debug;

use ahash::AHashMap;

use crate::error::Result;
use crate::index::document::DocId;
use crate::index::reader::IndexReader;
use crate::query::scorer::Bm25Config;

/// Scores of the documents a query matches.
pub type DocScores = AHashMap<DocId, f32>;

/// Trait for search queries.
pub trait Query: Send + Sync + Debug {
    /// Score every document this query matches.
    fn scores(&self, reader: &dyn IndexReader, config: &Bm25Config) -> Result<DocScores>;

    /// Get the boost factor for this query.
    fn boost(&self) -> f32;

    /// Set the boost factor for this query.
    fn set_boost(&mut self, boost: f32);

    /// Get a human-readable description of this query.
    fn description(&self) -> String;

    /// Clone this query.
    fn clone_box(&self) -> Box<dyn Query>;

    /// Get this query as Any for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl Clone for Box<dyn Query> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Append `^boost` to a description when the boost is not 1.
pub(crate) fn with_boost_suffix(description: String, boost: f32) -> String {
    if boost == 1.0 {
        description
    } else {
        format!("{description}^{boost}")
    }
}
