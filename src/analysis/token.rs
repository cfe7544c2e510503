//! Token types for text analysis.
//!
//! A [`Token`] is the unit that flows from a tokenizer through filters and
//! ends up either as a posting in the index or as a term in a query.
//!
//! # Examples
//!
//! ```
//! use jeopardy_eval::analysis::token::Token;
//!
//! let token = Token::with_offsets("world", 1, 6, 11);
//! assert_eq!(token.text, "world");
//! assert_eq!(token.position, 1);
//! assert_eq!(token.start_offset, 6);
//! ```

use serde::{Deserialize, Serialize};

/// A token represents a single unit of text after tokenization.
///
/// `position` is assigned by the tokenizer and left untouched by filters, so
/// removed stop words leave gaps that phrase matching respects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The text content of the token
    pub text: String,

    /// The position of the token in the original token stream (0-based)
    pub position: usize,

    /// The byte offset where this token starts in the original text
    pub start_offset: usize,

    /// The byte offset where this token ends in the original text
    pub end_offset: usize,
}

impl Token {
    /// Create a new token with the given text and position.
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset: 0,
            end_offset: 0,
        }
    }

    /// Create a new token with text, position, and byte offsets.
    pub fn with_offsets<S: Into<String>>(
        text: S,
        position: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset,
            end_offset,
        }
    }

    /// Clone this token with updated text.
    pub fn with_text<S: Into<String>>(&self, text: S) -> Self {
        let mut token = self.clone();
        token.text = text.into();
        token
    }

    /// Check if the token is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A stream of tokens produced by a tokenizer or filter.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_text_keeps_position() {
        let token = Token::with_offsets("Mars", 3, 10, 14);
        let lowered = token.with_text("mars");

        assert_eq!(lowered.text, "mars");
        assert_eq!(lowered.position, 3);
        assert_eq!(lowered.start_offset, 10);
        assert_eq!(lowered.end_offset, 14);
    }
}
