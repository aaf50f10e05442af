//! Error types for the console library.

use rustyline::error::ReadlineError;
use std::io;

/// Errors produced by registry and loop operations.
///
/// Command handlers report their own failures through [`anyhow::Error`]; those
/// never surface here because the console turns them into an exit code.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("command '{0}' already exists")]
    DuplicateCommand(String),

    #[error("command name must not be empty")]
    EmptyName,

    #[error("unknown verbosity level '{0}', expected normal, warning or verbose")]
    InvalidVerbosity(String),

    #[error("line input error: {0}")]
    Readline(#[from] ReadlineError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ConsoleError>;
