//! BM25 scoring for ranking search results.

use serde::{Deserialize, Serialize};

use crate::error::{EvalError, Result};

/// BM25 parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bm25Config {
    /// Term frequency saturation.
    pub k1: f32,

    /// Field length normalization.
    pub b: f32,
}

impl Default for Bm25Config {
    fn default() -> Self {
        Bm25Config { k1: 1.2, b: 0.75 }
    }
}

impl Bm25Config {
    /// Reject parameters outside the ranges BM25 is defined for.
    pub fn validate(&self) -> Result<()> {
        if !self.k1.is_finite() || self.k1 < 0.0 {
            return Err(EvalError::config(format!(
                "BM25 k1 must be a non-negative number, got {}",
                self.k1
            )));
        }
        if !(0.0..=1.0).contains(&self.b) {
            return Err(EvalError::config(format!(
                "BM25 b must be within [0, 1], got {}",
                self.b
            )));
        }
        Ok(())
    }

    /// Inverse document frequency: `ln(1 + (N - df + 0.5) / (df + 0.5))`.
    ///
    /// Always positive, so every matching document scores above zero.
    pub fn idf(&self, doc_freq: u64, doc_count: u64) -> f32 {
        if doc_freq == 0 || doc_count == 0 {
            return 0.0;
        }

        let n = doc_count as f32;
        let df = doc_freq as f32;

        (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
    }
}

/// BM25 scorer for one term (or one phrase) of a query.
#[derive(Debug, Clone)]
pub struct BM25Scorer {
    /// IDF weight, summed over the terms of a phrase.
    idf: f32,
    /// Average field length.
    avg_field_length: f64,
    /// Boost factor.
    boost: f32,
    k1: f32,
    b: f32,
}

impl BM25Scorer {
    /// Create a new BM25 scorer.
    pub fn new(idf: f32, avg_field_length: f64, boost: f32, config: &Bm25Config) -> Self {
        BM25Scorer {
            idf,
            avg_field_length,
            boost,
            k1: config.k1,
            b: config.b,
        }
    }

    /// Calculate the TF (Term Frequency) component.
    fn tf(&self, term_freq: f32, field_length: f32) -> f32 {
        if term_freq == 0.0 {
            return 0.0;
        }

        let avg_len = if self.avg_field_length > 0.0 {
            self.avg_field_length as f32
        } else {
            1.0
        };
        let norm_factor = 1.0 - self.b + self.b * (field_length / avg_len);

        // TF = (tf * (k1 + 1)) / (tf + k1 * norm_factor)
        (term_freq * (self.k1 + 1.0)) / (term_freq + self.k1 * norm_factor)
    }

    /// Score a document given the term (or phrase) frequency and field length.
    pub fn score(&self, term_freq: f32, field_length: f32) -> f32 {
        self.idf * self.tf(term_freq, field_length) * self.boost
    }

    /// The IDF weight this scorer was built with.
    pub fn idf(&self) -> f32 {
        self.idf
    }
}
