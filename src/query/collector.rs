//! Collectors for gathering the best-scoring documents.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::index::document::DocId;

/// A document and its relevance score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredDoc {
    /// The document ID.
    pub doc_id: DocId,
    /// The relevance score.
    pub score: f32,
}

/// Best hits of a search, ordered by score descending then doc id ascending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopDocs {
    /// Total number of matching documents.
    pub total_hits: u64,
    /// The kept hits, best first.
    pub hits: Vec<ScoredDoc>,
}

impl TopDocs {
    /// The best hit, if any document matched.
    pub fn first(&self) -> Option<&ScoredDoc> {
        self.hits.first()
    }
}

/// Heap entry ordered so that the worst kept hit sits on top.
#[derive(Debug, Clone, Copy)]
struct HeapEntry(ScoredDoc);

impl HeapEntry {
    /// Ranking order: higher score first, lower doc id breaks ties.
    fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .score
            .total_cmp(&self.0.score)
            .then_with(|| self.0.doc_id.cmp(&other.0.doc_id))
    }
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap on rank order puts the worst-ranked hit at the top.
        self.rank_cmp(other)
    }
}

/// A collector that keeps the top N documents by score.
#[derive(Debug)]
pub struct TopDocsCollector {
    /// Maximum number of documents to collect.
    max_docs: usize,
    /// Collected hits, worst on top.
    hits: BinaryHeap<HeapEntry>,
    /// Total number of documents processed.
    total_hits: u64,
}

impl TopDocsCollector {
    /// Create a new top docs collector.
    pub fn new(max_docs: usize) -> Self {
        TopDocsCollector {
            max_docs,
            hits: BinaryHeap::with_capacity(max_docs.saturating_add(1).min(1024)),
            total_hits: 0,
        }
    }

    /// Collect a document hit.
    pub fn collect(&mut self, doc_id: DocId, score: f32) {
        self.total_hits += 1;
        if self.max_docs == 0 {
            return;
        }

        let entry = HeapEntry(ScoredDoc { doc_id, score });
        if self.hits.len() < self.max_docs {
            self.hits.push(entry);
        } else if let Some(worst) = self.hits.peek()
            && entry.rank_cmp(worst) == Ordering::Less
        {
            self.hits.pop();
            self.hits.push(entry);
        }
    }

    /// Get the total number of hits collected.
    pub fn total_hits(&self) -> u64 {
        self.total_hits
    }

    /// Consume the collector, returning hits best first.
    pub fn into_top_docs(self) -> TopDocs {
        let mut hits: Vec<HeapEntry> = self.hits.into_vec();
        hits.sort_by(|a, b| a.rank_cmp(b));
        TopDocs {
            total_hits: self.total_hits,
            hits: hits.into_iter().map(|e| e.0).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_best_hits_in_order() {
        let mut collector = TopDocsCollector::new(2);
        collector.collect(0, 1.0);
        collector.collect(1, 3.0);
        collector.collect(2, 2.0);
        collector.collect(3, 0.5);

        let top = collector.into_top_docs();
        assert_eq!(top.total_hits, 4);
        let ids: Vec<DocId> = top.hits.iter().map(|h| h.doc_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_ties_prefer_lower_doc_id() {
        let mut collector = TopDocsCollector::new(1);
        collector.collect(7, 1.5);
        collector.collect(3, 1.5);
        collector.collect(9, 1.5);

        let top = collector.into_top_docs();
        assert_eq!(top.first().unwrap().doc_id, 3);
    }

    #[test]
    fn test_zero_capacity_only_counts() {
        let mut collector = TopDocsCollector::new(0);
        collector.collect(1, 1.0);

        let top = collector.into_top_docs();
        assert_eq!(top.total_hits, 1);
        assert!(top.first().is_none());
    }
}
