//! Command error types.

use thiserror::Error;

/// Error raised while reading commands.
///
/// Every variant is fatal for the input stream: the protocol has no way to
/// resynchronize after a malformed command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The keyword is not one of the protocol commands.
    #[error("unknown command {keyword:?} on line {line}")]
    UnknownCommand { keyword: String, line: usize },

    /// Input ended before all arguments of a command were read.
    #[error("`{command}` is missing argument {position} on line {line}")]
    MissingArgument {
        command: &'static str,
        position: usize,
        line: usize,
    },

    /// No command at all where one was required.
    #[error("empty command")]
    Empty,

    /// IO error on the input or output stream.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for command operations.
pub type CommandResult<T> = Result<T, CommandError>;
