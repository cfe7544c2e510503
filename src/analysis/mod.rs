//! Text analysis: tokenizers, token filters and analyzers.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::{Analyzer, PipelineAnalyzer, SimpleAnalyzer, StandardAnalyzer, analyzer_by_name};
pub use token::{Token, TokenStream};
