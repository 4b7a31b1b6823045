//! CLI entry point for running the distributed k-NN hyperparameter search.
//!
//! Parses command-line arguments with clap, executes the search-then-score
//! pipeline, renders the summary to stdout, and maps errors to a non-zero
//! exit code with a rank-prefixed diagnostic (§6, §7). Logging is
//! initialized eagerly so subsequent operations can emit structured
//! diagnostics via `tracing`.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use knn_cli::{
    cli::{Cli, CliError, render_summary, run_cli},
    logging::{self, LoggingError},
};
use tracing::error;

/// Parse CLI arguments, execute the search, render the summary, and flush the
/// output stream.
fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let summary = run_cli(cli).context("failed to execute the search")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_summary(&summary, &mut writer).context("failed to render summary")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        let code = err.chain().find_map(|cause| {
            // Downcast each cause so context layers do not obscure `CliError`
            // instances that carry a structured code.
            let cause: &(dyn std::error::Error + 'static) = cause;
            cause.downcast_ref::<CliError>().map(CliError::code)
        });

        // Rank 0 is the only rank this binary ever runs as (§4.6): there is
        // no distributed launcher here, so every fatal diagnostic is this
        // process's own (§7: "prefixed with the rank").
        error!(error = %err, code = ?code, "rank 0: fatal error, aborting run");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Emit a fallback diagnostic to stderr when tracing initialization fails.
#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialized"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
