//! Command-line interface orchestration for the distributed k-NN search (§6).
//!
//! Parses `-conf <path>` and `-mode homo|hetero`, drives `knn-core`'s search
//! and scoring pipeline, and renders the result to stdout.

mod commands;

pub use commands::{Cli, CliError, CliMode, RunSummary, Timings, render_summary, run_cli};

#[cfg(test)]
mod tests;
