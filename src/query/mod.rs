//! Query system for searching documents.

pub mod boolean;
pub mod collector;
pub mod parser;
pub mod phrase;
#[allow(clippy::module_inception)]
pub mod query;
pub mod scorer;
pub mod term;

pub use self::boolean::{BooleanClause, BooleanQuery, BooleanQueryBuilder, Occur};
pub use self::collector::{ScoredDoc, TopDocs, TopDocsCollector};
pub use self::parser::QueryParser;
pub use self::phrase::PhraseQuery;
pub use self::query::{DocScores, Query};
pub use self::scorer::{BM25Scorer, Bm25Config};
pub use self::term::TermQuery;
