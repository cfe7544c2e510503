//! Command line argument parsing using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::EvalConfig;
use crate::error::Result;

/// Jeopardy-style question answering evaluation over a full-text index
#[derive(Parser, Debug, Clone)]
#[command(name = "jeopardy-eval")]
#[command(about = "Score top-1 answers from a full-text index against Jeopardy questions")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct EvalArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl EvalArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n + 1,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Evaluate a question file against an index and print the report
    Evaluate(EvaluateArgs),

    /// Run a single query against an index and print the ranked hits
    Search(SearchArgs),
}

/// Arguments for an evaluation run
#[derive(Parser, Debug, Clone, Default)]
pub struct EvaluateArgs {
    /// Path to the index directory
    #[arg(short, long, value_name = "INDEX_DIR", env = "JEOPARDY_INDEX")]
    pub index: Option<PathBuf>,

    /// Path to the question file
    #[arg(long, value_name = "FILE", env = "JEOPARDY_QUESTIONS")]
    pub questions: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Field to search instead of the index default
    #[arg(long, value_name = "FIELD")]
    pub search_field: Option<String>,

    /// Field holding answers instead of the index default
    #[arg(long, value_name = "FIELD")]
    pub answer_field: Option<String>,
}

impl EvaluateArgs {
    /// Resolve the run configuration: defaults, then the config file, then flags.
    pub fn to_config(&self) -> Result<EvalConfig> {
        let mut config = match &self.config {
            Some(path) => EvalConfig::from_file(path)?,
            None => EvalConfig::default(),
        };

        if let Some(index) = &self.index {
            config = config.with_index_path(index);
        }
        if let Some(questions) = &self.questions {
            config = config.with_questions_path(questions);
        }
        if let Some(field) = &self.search_field {
            config = config.with_search_field(field);
        }
        if let Some(field) = &self.answer_field {
            config = config.with_answer_field(field);
        }

        config.validate()?;
        Ok(config)
    }
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Path to the index directory
    #[arg(short, long, value_name = "INDEX_DIR", env = "JEOPARDY_INDEX")]
    pub index: PathBuf,

    /// Query string
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Maximum number of results
    #[arg(short, long, default_value = "10")]
    pub limit: usize,

    /// Parse the query as written instead of escaping it
    #[arg(long)]
    pub raw: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_verbosity() {
        let args = EvalArgs::parse_from(["jeopardy-eval", "search", "-i", "idx", "mars"]);
        assert_eq!(args.verbosity(), 1);

        let args = EvalArgs::parse_from(["jeopardy-eval", "-vv", "search", "-i", "idx", "mars"]);
        assert_eq!(args.verbosity(), 3);

        let args = EvalArgs::parse_from(["jeopardy-eval", "-q", "-v", "search", "-i", "idx", "x"]);
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_search_args() {
        let args = EvalArgs::parse_from([
            "jeopardy-eval",
            "search",
            "--index",
            "idx",
            "--limit",
            "3",
            "--raw",
            "title:mars",
        ]);

        match args.command {
            Command::Search(search) => {
                assert_eq!(search.index, PathBuf::from("idx"));
                assert_eq!(search.limit, 3);
                assert!(search.raw);
                assert_eq!(search.query, "title:mars");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_flags_override_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("eval.json");
        fs::write(&path, r#"{"index_path": "from-file", "questions_path": "q.txt"}"#).unwrap();

        let args = EvaluateArgs {
            index: Some(PathBuf::from("from-flag")),
            config: Some(path),
            answer_field: Some("name".to_string()),
            ..EvaluateArgs::default()
        };
        let config = args.to_config().unwrap();

        assert_eq!(config.index_path, PathBuf::from("from-flag"));
        assert_eq!(config.questions_path, PathBuf::from("q.txt"));
        assert_eq!(config.answer_field.as_deref(), Some("name"));
    }

    #[test]
    fn test_defaults_without_flags() {
        let config = EvaluateArgs::default().to_config().unwrap();
        assert_eq!(config, EvalConfig::default());
    }
}
