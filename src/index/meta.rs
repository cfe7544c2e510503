//! Index metadata (`meta.json`).

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EvalError, Result};

/// File name of the metadata inside an index directory.
pub const META_FILE: &str = "meta.json";

/// Only format version understood by this reader.
pub const FORMAT_VERSION: u32 = 1;

/// Describes how the stored documents of an index are searched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexMeta {
    /// Format version of the index directory.
    pub version: u32,

    /// Field searched when a query names no field.
    pub default_field: String,

    /// Field holding the answer a hit stands for.
    pub answer_field: String,

    /// Fields inverted when the index is opened.
    pub indexed_fields: Vec<String>,

    /// Name of the analyzer used for indexed fields and queries.
    pub analyzer: String,
}

impl Default for IndexMeta {
    fn default() -> Self {
        IndexMeta {
            version: FORMAT_VERSION,
            default_field: "tokens".to_string(),
            answer_field: "title".to_string(),
            indexed_fields: vec!["tokens".to_string()],
            analyzer: "standard".to_string(),
        }
    }
}

impl IndexMeta {
    /// Load and validate the metadata of the index at `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(META_FILE);
        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                EvalError::index_unavailable(format!("{} not found", path.display()))
            }
            _ => EvalError::index_unavailable(format!("cannot read {}: {e}", path.display())),
        })?;

        let meta: IndexMeta = serde_json::from_str(&content).map_err(|e| {
            EvalError::index_unavailable(format!("invalid {}: {e}", path.display()))
        })?;
        meta.validated()
    }

    /// Check the version and make sure the default field is inverted.
    pub fn validated(mut self) -> Result<Self> {
        if self.version != FORMAT_VERSION {
            return Err(EvalError::index_unavailable(format!(
                "unsupported index format version {} (expected {FORMAT_VERSION})",
                self.version
            )));
        }
        if self.default_field.is_empty() || self.answer_field.is_empty() {
            return Err(EvalError::index_unavailable(
                "default_field and answer_field must not be empty",
            ));
        }
        if !self.indexed_fields.contains(&self.default_field) {
            self.indexed_fields.push(self.default_field.clone());
        }
        Ok(self)
    }
}
