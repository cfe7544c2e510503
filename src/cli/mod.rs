//! Command line interface for the evaluator.

pub mod args;
pub mod commands;

// Re-export commonly used types
pub use args::*;
pub use commands::*;
