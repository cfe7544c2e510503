//! Command implementations for the CLI.

use std::io::{self, Write};

use log::info;

use crate::cli::args::*;
use crate::driver::{run_evaluation, write_report};
use crate::error::Result;
use crate::index::reader::InvertedIndexReader;
use crate::index::searcher::IndexSearcher;
use crate::query::parser::QueryParser;
use crate::query::scorer::Bm25Config;

/// Execute a CLI command.
pub fn execute_command(args: EvalArgs) -> Result<()> {
    match &args.command {
        Command::Evaluate(evaluate_args) => evaluate(evaluate_args),
        Command::Search(search_args) => search_index(search_args, &args),
    }
}

/// Run a full evaluation and print the report.
fn evaluate(args: &EvaluateArgs) -> Result<()> {
    let config = args.to_config()?;
    info!(
        "Evaluating {} against index {}",
        config.questions_path.display(),
        config.index_path.display()
    );

    let state = run_evaluation(&config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &state)?;
    out.flush()?;
    Ok(())
}

/// Search an index and print the ranked hits.
fn search_index(args: &SearchArgs, cli_args: &EvalArgs) -> Result<()> {
    let reader = InvertedIndexReader::open(&args.index)?;
    let meta = reader.meta();
    let parser = QueryParser::new(meta.default_field.clone(), reader.analyzer());

    let query_text = if args.raw {
        args.query.clone()
    } else {
        QueryParser::escape(&args.query)
    };
    let query = parser.parse(&query_text)?;

    let scoring = Bm25Config::default();
    let searcher = IndexSearcher::new(&reader, &scoring);
    let top_docs = searcher.search(query.as_ref(), args.limit)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli_args.verbosity() > 1 {
        writeln!(out, "Query: {}", query.description())?;
    }
    writeln!(
        out,
        "{} matching documents, showing {}",
        top_docs.total_hits,
        top_docs.hits.len()
    )?;

    for (rank, hit) in top_docs.hits.iter().enumerate() {
        let answer = searcher
            .doc(hit.doc_id)?
            .and_then(|doc| doc.get(&meta.answer_field).map(|a| a.trim().to_string()))
            .unwrap_or_else(|| "<no answer>".to_string());
        writeln!(
            out,
            "{:>3}. {answer} (doc {}, score {:.4})",
            rank + 1,
            hit.doc_id,
            hit.score
        )?;
    }
    Ok(())
}
