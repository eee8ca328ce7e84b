//! Runner configuration from arguments and environment.

use std::ffi::OsString;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// File to read commands from; stdin when `None`.
    pub input: Option<PathBuf>,
    /// Flush stdout after every report line.
    pub flush_reports: bool,
}

impl RunnerConfig {
    /// Read the first CLI argument, then `RELTRACK_INPUT` and `RELTRACK_FLUSH`.
    ///
    /// Without `RELTRACK_FLUSH`, reports are flushed only when stdout is a
    /// terminal.
    #[must_use]
    pub fn from_env() -> Self {
        Self::resolve(
            std::env::args_os().nth(1),
            std::env::var_os("RELTRACK_INPUT"),
            std::env::var("RELTRACK_FLUSH").ok(),
            io::stdout().is_terminal(),
        )
    }

    fn resolve(
        arg: Option<OsString>,
        input_var: Option<OsString>,
        flush_var: Option<String>,
        stdout_is_terminal: bool,
    ) -> Self {
        let input = arg
            .or(input_var)
            .filter(|path| !path.is_empty() && path != "-")
            .map(PathBuf::from);
        let flush_reports = flush_var
            .as_deref()
            .and_then(parse_flag)
            .unwrap_or(stdout_is_terminal);
        Self {
            input,
            flush_reports,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
