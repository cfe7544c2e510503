//! Analyzers combine a tokenizer with a chain of filters.
//!
//! ```text
//! Raw Text → Tokenizer → Filter 1 → ... → Filter N → Tokens
//! ```
//!
//! The same analyzer must be used for the searched field when the index is
//! opened and for query text when it is parsed, otherwise terms will not line
//! up. [`analyzer_by_name`] resolves the name stored in the index metadata.
//!
//! # Examples
//!
//! ```
//! use jeopardy_eval::analysis::analyzer::{Analyzer, StandardAnalyzer};
//!
//! let analyzer = StandardAnalyzer::new().unwrap();
//! let tokens: Vec<_> = analyzer.analyze("The quick brown fox").unwrap().collect();
//!
//! // "The" is removed as a stop word, others are lowercased
//! assert_eq!(tokens.len(), 3);
//! assert_eq!(tokens[0].text, "quick");
//! ```

use std::sync::Arc;

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::{Filter, LowercaseFilter, StopFilter};
use crate::analysis::tokenizer::{RegexTokenizer, Tokenizer};
use crate::error::{EvalError, Result};

/// Trait for analyzers that convert text into processed tokens.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// A configurable analyzer that combines a tokenizer with a chain of filters.
#[derive(Clone)]
pub struct PipelineAnalyzer {
    tokenizer: Arc<dyn Tokenizer>,
    filters: Vec<Arc<dyn Filter>>,
}

impl PipelineAnalyzer {
    /// Create a new pipeline analyzer with the given tokenizer.
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        PipelineAnalyzer {
            tokenizer,
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline.
    pub fn add_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Names of the filters in application order.
    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }
}

impl Analyzer for PipelineAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = self.tokenizer.tokenize(text)?;
        for filter in &self.filters {
            tokens = filter.filter(tokens)?;
        }
        Ok(tokens)
    }

    fn name(&self) -> &'static str {
        "pipeline"
    }
}

impl std::fmt::Debug for PipelineAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineAnalyzer")
            .field("tokenizer", &self.tokenizer.name())
            .field("filters", &self.filter_names())
            .finish()
    }
}

/// Regex tokenizer, lowercase normalization and English stop word removal.
#[derive(Debug, Clone)]
pub struct StandardAnalyzer {
    inner: PipelineAnalyzer,
}

impl StandardAnalyzer {
    /// Create a new standard analyzer with default settings.
    pub fn new() -> Result<Self> {
        let tokenizer = Arc::new(RegexTokenizer::new()?);
        let inner = PipelineAnalyzer::new(tokenizer)
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(StopFilter::new()));

        Ok(StandardAnalyzer { inner })
    }
}

impl Analyzer for StandardAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "standard"
    }
}

/// Regex tokenizer and lowercase normalization, no stop words.
#[derive(Debug, Clone)]
pub struct SimpleAnalyzer {
    inner: PipelineAnalyzer,
}

impl SimpleAnalyzer {
    /// Create a new simple analyzer.
    pub fn new() -> Result<Self> {
        let tokenizer = Arc::new(RegexTokenizer::new()?);
        let inner = PipelineAnalyzer::new(tokenizer).add_filter(Arc::new(LowercaseFilter::new()));

        Ok(SimpleAnalyzer { inner })
    }
}

impl Analyzer for SimpleAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "simple"
    }
}

/// Resolve an analyzer by the name recorded in index metadata.
pub fn analyzer_by_name(name: &str) -> Result<Arc<dyn Analyzer>> {
    match name {
        "standard" => Ok(Arc::new(StandardAnalyzer::new()?)),
        "simple" => Ok(Arc::new(SimpleAnalyzer::new()?)),
        other => Err(EvalError::index_unavailable(format!(
            "unknown analyzer '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    #[test]
    fn test_standard_analyzer() {
        let analyzer = StandardAnalyzer::new().unwrap();

        let tokens: Vec<Token> = analyzer
            .analyze("Hello the world and test")
            .unwrap()
            .collect();

        // "the" and "and" should be filtered out
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].text, "hello");
        assert_eq!(tokens[1].text, "world");
        assert_eq!(tokens[2].text, "test");
    }

    #[test]
    fn test_simple_analyzer_keeps_stop_words() {
        let analyzer = SimpleAnalyzer::new().unwrap();

        let tokens: Vec<Token> = analyzer.analyze("Hello the World").unwrap().collect();

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].text, "the");
        assert_eq!(tokens[2].text, "world");
    }

    #[test]
    fn test_analyzer_by_name() {
        assert_eq!(analyzer_by_name("standard").unwrap().name(), "standard");
        assert_eq!(analyzer_by_name("simple").unwrap().name(), "simple");
        assert!(matches!(
            analyzer_by_name("klingon"),
            Err(EvalError::IndexUnavailable(_))
        ));
    }

    #[test]
    fn test_pipeline_debug_lists_filters() {
        let analyzer = StandardAnalyzer::new().unwrap();
        let debug = format!("{analyzer:?}");
        assert!(debug.contains("lowercase"));
        assert!(debug.contains("stop"));
    }
}
