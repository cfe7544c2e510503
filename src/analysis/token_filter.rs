//! Token filter implementations for token transformation.
//!
//! - [`LowercaseFilter`] - Converts tokens to lowercase
//! - [`StopFilter`] - Removes stop words
//!
//! # Examples
//!
//! ```
//! use jeopardy_eval::analysis::token::Token;
//! use jeopardy_eval::analysis::token_filter::{Filter, LowercaseFilter};
//!
//! let filter = LowercaseFilter::new();
//! let tokens = vec![Token::new("Hello", 0), Token::new("WORLD", 1)];
//! let filtered: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(filtered[0].text, "hello");
//! assert_eq!(filtered[1].text, "world");
//! ```

use std::sync::{Arc, LazyLock};

use ahash::AHashSet;

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// A filter that converts tokens to lowercase.
#[derive(Clone, Debug, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    /// Create a new lowercase filter.
    pub fn new() -> Self {
        LowercaseFilter
    }
}

impl Filter for LowercaseFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(tokens.map(|token| {
            let lowered = token.text.to_lowercase();
            token.with_text(lowered)
        })))
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}

/// Default English stop words list.
const DEFAULT_ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

static DEFAULT_ENGLISH_STOP_WORDS_SET: LazyLock<Arc<AHashSet<String>>> = LazyLock::new(|| {
    Arc::new(
        DEFAULT_ENGLISH_STOP_WORDS
            .iter()
            .map(|&s| s.to_string())
            .collect(),
    )
});

/// A filter that removes stop words from the token stream.
///
/// Removed tokens leave their position unused, so the surviving tokens keep
/// the positions the tokenizer assigned.
#[derive(Clone, Debug)]
pub struct StopFilter {
    stop_words: Arc<AHashSet<String>>,
}

impl StopFilter {
    /// Create a new stop filter with the default English stop words.
    pub fn new() -> Self {
        StopFilter {
            stop_words: Arc::clone(&DEFAULT_ENGLISH_STOP_WORDS_SET),
        }
    }

    /// Create a stop filter from a custom word list.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StopFilter {
            stop_words: Arc::new(words.into_iter().map(Into::into).collect()),
        }
    }

    /// Check if a word is a stop word.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }
}

impl Default for StopFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for StopFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let stop_words = Arc::clone(&self.stop_words);
        Ok(Box::new(
            tokens.filter(move |token| !stop_words.contains(&token.text)),
        ))
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    #[test]
    fn test_lowercase_filter() {
        let filter = LowercaseFilter::new();
        let tokens = vec![Token::new("Hello", 0), Token::new("WORLD", 1), Token::new("Ärger", 2)];

        let result: Vec<Token> = filter.filter(Box::new(tokens.into_iter())).unwrap().collect();

        assert_eq!(result.len(), 3);
        assert_eq!(result[0].text, "hello");
        assert_eq!(result[1].text, "world");
        assert_eq!(result[2].text, "ärger");
    }

    #[test]
    fn test_stop_filter_keeps_positions() {
        let filter = StopFilter::new();
        let tokens = vec![
            Token::new("this", 0),
            Token::new("planet", 1),
            Token::new("is", 2),
            Token::new("red", 3),
        ];

        let result: Vec<Token> = filter.filter(Box::new(tokens.into_iter())).unwrap().collect();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].text, "planet");
        assert_eq!(result[0].position, 1);
        assert_eq!(result[1].text, "red");
        assert_eq!(result[1].position, 3);
    }

    #[test]
    fn test_custom_stop_words() {
        let filter = StopFilter::from_words(vec!["custom"]);
        assert!(filter.is_stop_word("custom"));
        assert!(!filter.is_stop_word("the"));
    }

    #[test]
    fn test_filter_names() {
        assert_eq!(LowercaseFilter::new().name(), "lowercase");
        assert_eq!(StopFilter::new().name(), "stop");
    }
}
