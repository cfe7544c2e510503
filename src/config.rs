//! Run configuration.
//!
//! Values are layered from lowest to highest precedence: built-in defaults,
//! an optional JSON file, then command line flags (which clap also fills
//! from `JEOPARDY_INDEX` / `JEOPARDY_QUESTIONS`).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{EvalError, Result};
use crate::query::scorer::Bm25Config;

/// Configuration of an evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvalConfig {
    /// Index directory.
    pub index_path: PathBuf,

    /// Question file.
    pub questions_path: PathBuf,

    /// Field to search, overriding the index metadata.
    pub search_field: Option<String>,

    /// Field holding answers, overriding the index metadata.
    pub answer_field: Option<String>,

    /// BM25 parameters.
    pub scoring: Bm25Config,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            index_path: PathBuf::from("index"),
            questions_path: PathBuf::from("questions.txt"),
            search_field: None,
            answer_field: None,
            scoring: Bm25Config::default(),
        }
    }
}

impl EvalConfig {
    /// Load a configuration file, filling missing keys with defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            EvalError::config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        let config: EvalConfig = serde_json::from_str(&content).map_err(|e| {
            EvalError::config(format!("invalid config file {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Set the index directory.
    pub fn with_index_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.index_path = path.into();
        self
    }

    /// Set the question file.
    pub fn with_questions_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.questions_path = path.into();
        self
    }

    /// Set the searched field.
    pub fn with_search_field<S: Into<String>>(mut self, field: S) -> Self {
        self.search_field = Some(field.into());
        self
    }

    /// Set the answer field.
    pub fn with_answer_field<S: Into<String>>(mut self, field: S) -> Self {
        self.answer_field = Some(field.into());
        self
    }

    /// Check the configuration for values no run can use.
    pub fn validate(&self) -> Result<()> {
        for (name, field) in [
            ("search_field", &self.search_field),
            ("answer_field", &self.answer_field),
        ] {
            if field.as_deref().is_some_and(|f| f.trim().is_empty()) {
                return Err(EvalError::config(format!("{name} must not be empty")));
            }
        }
        self.scoring.validate()
    }
}
