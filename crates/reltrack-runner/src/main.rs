//! reltrack command runner
//!
//! This binary:
//! 1. Reads protocol commands from stdin, or from the file named by the
//!    first argument / `RELTRACK_INPUT`
//! 2. Applies them to an in-memory graph
//! 3. Writes one line per `report` to stdout
//!
//! Logs go to stderr, filtered by `RUST_LOG`. Malformed input prints
//! `Error parsing instructions` on stderr and exits with status 1.

mod config;

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter};
use std::process::ExitCode;

use config::{DEFAULT_LOG_FILTER, RunnerConfig};
use eyre::WrapErr;
use reltrack_cmd::{CommandError, Session};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Diagnostic printed for malformed input.
const PARSE_ERROR_MESSAGE: &str = "Error parsing instructions";

fn main() -> eyre::Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = RunnerConfig::from_env();
    info!(?config, "starting reltrack");

    let input: Box<dyn BufRead> = match &config.input {
        Some(path) => {
            let file = File::open(path)
                .wrap_err_with(|| format!("failed to open input {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };

    let output = BufWriter::new(io::stdout().lock());
    let mut session = Session::new(output).flush_reports(config.flush_reports);

    match session.run(input) {
        Ok(summary) => {
            info!(?summary, "done");
            Ok(ExitCode::SUCCESS)
        }
        Err(CommandError::Io(e)) => Err(e).wrap_err("command stream failed"),
        Err(e) => {
            error!("{e}");
            eprintln!("{PARSE_ERROR_MESSAGE}");
            Ok(ExitCode::FAILURE)
        }
    }
}
