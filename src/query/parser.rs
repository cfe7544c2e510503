//! Query parser for converting query strings to structured query objects.
//!
//! Supported syntax:
//! - Terms: `planet`, analyzed with the index analyzer
//! - Field-specific terms: `title:mars`
//! - Phrases: `"red planet"`
//! - Required / prohibited clauses: `+red -gas !giant`
//! - Operators: `AND`, `OR`, `NOT`, `&&`, `||`
//! - Grouping: `(red OR blue) AND planet`, `title:(red planet)`
//! - Boosts: `red^2`, `"red planet"^1.5`
//! - Backslash escapes: `AT\&T`, `\(1999\)`
//!
//! Range, fuzzy, wildcard and regex syntax (`[ ] { } ~ * ? /`) is rejected.
//! Free text that must be searched literally goes through
//! [`QueryParser::escape`] first.

use std::iter::Peekable;
use std::str::CharIndices;
use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::error::{EvalError, Result};
use crate::query::boolean::{BooleanClause, BooleanQuery, Occur};
use crate::query::phrase::PhraseQuery;
use crate::query::query::Query;
use crate::query::term::TermQuery;

/// Characters with a meaning in the query syntax.
const RESERVED_CHARS: &[char] = &[
    '\\', '+', '-', '!', '(', ')', ':', '^', '[', ']', '"', '{', '}', '~', '*', '?', '|', '&', '/',
];

/// Characters the parser recognizes but does not support.
const UNSUPPORTED_CHARS: &[char] = &['[', ']', '{', '}', '~', '*', '?', '/'];

/// Words acting as operators when written in upper case and unescaped.
const OPERATOR_WORDS: &[&str] = &["AND", "OR", "NOT"];

/// Nesting limit for parentheses.
const MAX_DEPTH: usize = 64;

/// A query parser bound to a default field and an analyzer.
#[derive(Clone)]
pub struct QueryParser {
    /// Field searched when no field is specified.
    default_field: String,
    /// Analyzer applied to terms and phrases.
    analyzer: Arc<dyn Analyzer>,
}

impl std::fmt::Debug for QueryParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryParser")
            .field("default_field", &self.default_field)
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

impl QueryParser {
    /// Create a new query parser.
    pub fn new<S: Into<String>>(default_field: S, analyzer: Arc<dyn Analyzer>) -> Self {
        QueryParser {
            default_field: default_field.into(),
            analyzer,
        }
    }

    /// Get the default field.
    pub fn default_field(&self) -> &str {
        &self.default_field
    }

    /// Escape `text` so that it parses as plain terms.
    ///
    /// Every reserved character is prefixed with a backslash, and standalone
    /// `AND`/`OR`/`NOT` words get a leading backslash so they are read as
    /// terms instead of operators.
    ///
    /// ```
    /// use jeopardy_eval::query::parser::QueryParser;
    ///
    /// assert_eq!(QueryParser::escape("(1999): AT&T"), "\\(1999\\)\\: AT\\&T");
    /// assert_eq!(QueryParser::escape("this AND that"), "this \\AND that");
    /// ```
    pub fn escape(text: &str) -> String {
        let mut escaped = String::with_capacity(text.len() + 8);
        for ch in text.chars() {
            if RESERVED_CHARS.contains(&ch) {
                escaped.push('\\');
            }
            escaped.push(ch);
        }

        let mut result = String::with_capacity(escaped.len() + 4);
        let mut word_start: Option<usize> = None;
        for (i, ch) in escaped.char_indices() {
            if ch.is_whitespace() {
                if let Some(start) = word_start.take() {
                    push_word(&mut result, &escaped[start..i]);
                }
                result.push(ch);
            } else if word_start.is_none() {
                word_start = Some(i);
            }
        }
        if let Some(start) = word_start {
            push_word(&mut result, &escaped[start..]);
        }
        result
    }

    /// Parse a query string into a Query object.
    ///
    /// An empty query, or one whose terms are all removed by the analyzer,
    /// yields an empty [`BooleanQuery`] that matches nothing.
    pub fn parse(&self, query_str: &str) -> Result<Box<dyn Query>> {
        let lexemes = Lexer::new(query_str).tokenize()?;
        let mut parser = QueryStringParser {
            lexemes: lexemes.into_iter().peekable(),
            parser: self,
        };

        let clauses = parser.parse_clauses(&self.default_field, 0)?;
        if let Some(lexeme) = parser.lexemes.next() {
            return Err(EvalError::query_syntax(format!(
                "unexpected {} at position {}",
                lexeme.kind.describe(),
                lexeme.position
            )));
        }
        Ok(into_query(clauses))
    }

    /// Analyze a term into a query on `field`.
    fn term_query(&self, field: &str, text: &str) -> Result<Option<Box<dyn Query>>> {
        let terms: Vec<String> = self.analyzer.analyze(text)?.map(|t| t.text).collect();

        Ok(match terms.len() {
            0 => None,
            1 => Some(Box::new(TermQuery::new(field, terms.into_iter().next().unwrap_or_default()))),
            _ => {
                let mut query = BooleanQuery::new();
                for term in terms {
                    query.add_should(Box::new(TermQuery::new(field, term)));
                }
                Some(Box::new(query))
            }
        })
    }

    /// Analyze a phrase into a query on `field`.
    fn phrase_query(&self, field: &str, text: &str) -> Result<Option<Box<dyn Query>>> {
        let tokens: Vec<_> = self.analyzer.analyze(text)?.collect();

        Ok(match tokens.len() {
            0 => None,
            1 => Some(Box::new(TermQuery::new(field, tokens[0].text.clone()))),
            _ => {
                let first = tokens[0].position;
                let terms = tokens
                    .into_iter()
                    .map(|t| ((t.position - first) as u32, t.text))
                    .collect();
                Some(Box::new(PhraseQuery::with_offsets(field, terms)))
            }
        })
    }
}

fn push_word(result: &mut String, word: &str) {
    if OPERATOR_WORDS.contains(&word) {
        result.push('\\');
    }
    result.push_str(word);
}

/// Collapse parsed clauses into a single query.
fn into_query(mut clauses: Vec<BooleanClause>) -> Box<dyn Query> {
    if clauses.len() == 1 && clauses[0].occur == Occur::Should {
        if let Some(clause) = clauses.pop() {
            return clause.query;
        }
    }

    let mut query = BooleanQuery::new();
    for clause in clauses {
        query.add_clause(clause);
    }
    Box::new(query)
}

#[derive(Debug, Clone, PartialEq)]
enum LexemeKind {
    /// A bare term; `escaped` is set when any backslash escape was used.
    Term { text: String, escaped: bool },
    Phrase(String),
    Colon,
    LParen,
    RParen,
    Plus,
    Minus,
    Not,
    And,
    Or,
    Boost(f32),
}

impl LexemeKind {
    fn describe(&self) -> String {
        match self {
            LexemeKind::Term { text, .. } => format!("term '{text}'"),
            LexemeKind::Phrase(text) => format!("phrase \"{text}\""),
            LexemeKind::Colon => "':'".to_string(),
            LexemeKind::LParen => "'('".to_string(),
            LexemeKind::RParen => "')'".to_string(),
            LexemeKind::Plus => "'+'".to_string(),
            LexemeKind::Minus => "'-'".to_string(),
            LexemeKind::Not => "NOT".to_string(),
            LexemeKind::And => "AND".to_string(),
            LexemeKind::Or => "OR".to_string(),
            LexemeKind::Boost(b) => format!("boost ^{b}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Lexeme {
    kind: LexemeKind,
    /// Character offset in the query string.
    position: usize,
}

struct Lexer<'a> {
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Lexer {
            chars: input.char_indices().peekable(),
        }
    }

    fn tokenize(mut self) -> Result<Vec<Lexeme>> {
        let mut lexemes = Vec::new();

        while let Some(&(position, ch)) = self.chars.peek() {
            let kind = match ch {
                c if c.is_whitespace() => {
                    self.chars.next();
                    continue;
                }
                '(' => self.single(LexemeKind::LParen),
                ')' => self.single(LexemeKind::RParen),
                ':' => self.single(LexemeKind::Colon),
                '+' => self.single(LexemeKind::Plus),
                '-' => self.single(LexemeKind::Minus),
                '!' => self.single(LexemeKind::Not),
                '&' => self.double('&', LexemeKind::And, position)?,
                '|' => self.double('|', LexemeKind::Or, position)?,
                '^' => self.boost(position)?,
                '"' => self.phrase(position)?,
                c if UNSUPPORTED_CHARS.contains(&c) => {
                    return Err(EvalError::query_syntax(format!(
                        "unsupported syntax '{c}' at position {position}"
                    )));
                }
                _ => self.term(position)?,
            };
            lexemes.push(Lexeme { kind, position });
        }

        Ok(lexemes)
    }

    fn single(&mut self, kind: LexemeKind) -> LexemeKind {
        self.chars.next();
        kind
    }

    fn double(&mut self, expected: char, kind: LexemeKind, position: usize) -> Result<LexemeKind> {
        self.chars.next();
        match self.chars.next() {
            Some((_, c)) if c == expected => Ok(kind),
            _ => Err(EvalError::query_syntax(format!(
                "single '{expected}' at position {position}, use '{expected}{expected}' or escape it"
            ))),
        }
    }

    fn boost(&mut self, position: usize) -> Result<LexemeKind> {
        self.chars.next();
        let mut number = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_ascii_digit() || c == '.' {
                number.push(c);
                self.chars.next();
            } else {
                break;
            }
        }

        number
            .parse::<f32>()
            .ok()
            .filter(|b| b.is_finite() && *b >= 0.0)
            .map(LexemeKind::Boost)
            .ok_or_else(|| {
                EvalError::query_syntax(format!("invalid boost at position {position}"))
            })
    }

    fn phrase(&mut self, position: usize) -> Result<LexemeKind> {
        self.chars.next();
        let mut text = String::new();
        loop {
            match self.chars.next() {
                Some((_, '"')) => return Ok(LexemeKind::Phrase(text)),
                Some((_, '\\')) => match self.chars.next() {
                    Some((_, c)) => text.push(c),
                    None => break,
                },
                Some((_, c)) => text.push(c),
                None => break,
            }
        }
        Err(EvalError::query_syntax(format!(
            "unterminated phrase starting at position {position}"
        )))
    }

    fn term(&mut self, position: usize) -> Result<LexemeKind> {
        let mut text = String::new();
        let mut escaped = false;

        while let Some(&(i, c)) = self.chars.peek() {
            match c {
                '\\' => {
                    self.chars.next();
                    match self.chars.next() {
                        Some((_, next)) => {
                            text.push(next);
                            escaped = true;
                        }
                        None => {
                            return Err(EvalError::query_syntax(format!(
                                "trailing escape character at position {i}"
                            )));
                        }
                    }
                }
                // '+' and '-' are term characters once a term has started.
                '+' | '-' => {
                    text.push(c);
                    self.chars.next();
                }
                c if c.is_whitespace() || matches!(c, '(' | ')' | ':' | '^' | '"') => break,
                c if UNSUPPORTED_CHARS.contains(&c) || matches!(c, '!' | '&' | '|') => {
                    return Err(EvalError::query_syntax(format!(
                        "unescaped '{c}' at position {i} in term starting at position {position}"
                    )));
                }
                _ => {
                    text.push(c);
                    self.chars.next();
                }
            }
        }

        if !escaped {
            match text.as_str() {
                "AND" => return Ok(LexemeKind::And),
                "OR" => return Ok(LexemeKind::Or),
                "NOT" => return Ok(LexemeKind::Not),
                _ => {}
            }
        }
        Ok(LexemeKind::Term { text, escaped })
    }
}

/// Internal parser over lexemes.
struct QueryStringParser<'a> {
    lexemes: Peekable<std::vec::IntoIter<Lexeme>>,
    parser: &'a QueryParser,
}

impl QueryStringParser<'_> {
    /// Parse clauses until end of input or a closing parenthesis.
    fn parse_clauses(&mut self, field: &str, depth: usize) -> Result<Vec<BooleanClause>> {
        if depth > MAX_DEPTH {
            return Err(EvalError::query_syntax("parentheses nested too deeply"));
        }

        let mut clauses: Vec<BooleanClause> = Vec::new();
        let mut seen_clause = false;

        loop {
            let Some(lexeme) = self.lexemes.peek() else {
                break;
            };
            if lexeme.kind == LexemeKind::RParen {
                if depth == 0 {
                    return Err(EvalError::query_syntax(format!(
                        "unbalanced ')' at position {}",
                        lexeme.position
                    )));
                }
                break;
            }

            let mut conjunction = None;
            if matches!(lexeme.kind, LexemeKind::And | LexemeKind::Or) {
                let lexeme = self.next_lexeme()?;
                if !seen_clause {
                    return Err(EvalError::query_syntax(format!(
                        "{} at position {} has no left operand",
                        lexeme.kind.describe(),
                        lexeme.position
                    )));
                }
                conjunction = Some(lexeme.kind);
            }

            let modifier = match self.lexemes.peek().map(|l| &l.kind) {
                Some(LexemeKind::Plus) => {
                    self.lexemes.next();
                    Some(Occur::Must)
                }
                Some(LexemeKind::Minus) | Some(LexemeKind::Not) => {
                    self.lexemes.next();
                    Some(Occur::MustNot)
                }
                _ => None,
            };

            let query = self.parse_clause(field, depth)?;
            seen_clause = true;

            if conjunction == Some(LexemeKind::And)
                && let Some(last) = clauses.last_mut()
                && last.occur == Occur::Should
            {
                last.occur = Occur::Must;
            }

            let occur = match (modifier, &conjunction) {
                (Some(occur), _) => occur,
                (None, Some(LexemeKind::And)) => Occur::Must,
                _ => Occur::Should,
            };

            if let Some(query) = query {
                clauses.push(BooleanClause::new(query, occur));
            }
        }

        Ok(clauses)
    }

    /// Parse one clause: `[field:](term | "phrase" | (group))[^boost]`.
    fn parse_clause(&mut self, field: &str, depth: usize) -> Result<Option<Box<dyn Query>>> {
        let lexeme = self.next_lexeme()?;

        let mut query = match lexeme.kind {
            LexemeKind::Term { text, .. } => {
                if self.peek_is(&LexemeKind::Colon) {
                    self.lexemes.next();
                    if text.is_empty() {
                        return Err(EvalError::query_syntax(format!(
                            "empty field name at position {}",
                            lexeme.position
                        )));
                    }
                    return self.parse_field_body(&text, depth);
                }
                self.parser.term_query(field, &text)?
            }
            LexemeKind::Phrase(text) => self.parser.phrase_query(field, &text)?,
            LexemeKind::LParen => self.parse_group(field, depth, lexeme.position)?,
            other => {
                return Err(EvalError::query_syntax(format!(
                    "unexpected {} at position {}",
                    other.describe(),
                    lexeme.position
                )));
            }
        };

        self.apply_boost(&mut query);
        Ok(query)
    }

    /// Parse what follows `field:`.
    fn parse_field_body(&mut self, field: &str, depth: usize) -> Result<Option<Box<dyn Query>>> {
        let lexeme = self.next_lexeme()?;
        let mut query = match lexeme.kind {
            LexemeKind::Term { text, .. } => self.parser.term_query(field, &text)?,
            LexemeKind::Phrase(text) => self.parser.phrase_query(field, &text)?,
            LexemeKind::LParen => self.parse_group(field, depth, lexeme.position)?,
            other => {
                return Err(EvalError::query_syntax(format!(
                    "expected term after '{field}:' but found {} at position {}",
                    other.describe(),
                    lexeme.position
                )));
            }
        };

        self.apply_boost(&mut query);
        Ok(query)
    }

    fn parse_group(
        &mut self,
        field: &str,
        depth: usize,
        open_position: usize,
    ) -> Result<Option<Box<dyn Query>>> {
        let clauses = self.parse_clauses(field, depth + 1)?;
        match self.lexemes.next() {
            Some(Lexeme {
                kind: LexemeKind::RParen,
                ..
            }) => {}
            _ => {
                return Err(EvalError::query_syntax(format!(
                    "missing ')' for '(' at position {open_position}"
                )));
            }
        }

        if clauses.is_empty() {
            return Ok(None);
        }
        let mut query = BooleanQuery::new();
        for clause in clauses {
            query.add_clause(clause);
        }
        Ok(Some(Box::new(query)))
    }

    fn apply_boost(&mut self, query: &mut Option<Box<dyn Query>>) {
        if let Some(Lexeme {
            kind: LexemeKind::Boost(boost),
            ..
        }) = self.lexemes.peek()
        {
            let boost = *boost;
            self.lexemes.next();
            if let Some(query) = query.as_mut() {
                query.set_boost(boost);
            }
        }
    }

    fn peek_is(&mut self, kind: &LexemeKind) -> bool {
        self.lexemes.peek().is_some_and(|l| &l.kind == kind)
    }

    fn next_lexeme(&mut self) -> Result<Lexeme> {
        self.lexemes
            .next()
            .ok_or_else(|| EvalError::query_syntax("unexpected end of query"))
    }
}
