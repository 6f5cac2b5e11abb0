//! Error types for iosfacts.

use std::io;
use thiserror::Error;

/// Main error type for iosfacts operations.
///
/// Command-level failures on the device ("% Invalid input", "LLDP is not
/// enabled") are not errors: they arrive as output text and the extractors
/// treat them as missing facts. Only failures of the runner itself and
/// contract breaches surface here.
#[derive(Error, Debug)]
pub enum Error {
    /// Command runner errors
    #[error("Runner error: {0}")]
    Runner(#[from] RunnerError),

    /// Facts collection errors
    #[error("Facts error: {0}")]
    Facts(#[from] FactsError),
}

/// Errors raised by a [`CommandRunner`](crate::runner::CommandRunner).
#[derive(Error, Debug)]
pub enum RunnerError {
    /// The session could not execute a command at all
    #[error("Command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },

    /// Malformed replay transcript
    #[error("Transcript line {line}: {message}")]
    Transcript { line: usize, message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errors raised while collecting facts.
#[derive(Error, Debug)]
pub enum FactsError {
    /// Runner returned a different number of outputs than commands issued
    #[error("Expected {expected} command outputs, runner returned {actual}")]
    ResponseMismatch { expected: usize, actual: usize },

    /// Unknown gather subset name
    #[error("Subset must be one of [{valid}], got {name}")]
    InvalidSubset { name: String, valid: String },
}

/// Result type alias using iosfacts's Error.
pub type Result<T> = std::result::Result<T, Error>;
