//! Error types for suite replay
//!
//! Building and replaying are all-or-nothing: every error here aborts the
//! operation that raised it and nothing is retried.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for building and replaying snapshots
#[derive(Error, Debug)]
pub enum Error {
    // === Snapshot Errors ===
    #[error("Invalid snapshot JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Unexpected JSON object, missing root suite")]
    MissingRootSuite,

    #[error("A failed test must have an \"err\" property. test: {title}")]
    FailedWithoutError { title: String },

    #[error("Malformed snapshot: {0}")]
    Structural(String),

    // === Replay Errors ===
    #[error("Test has no recorded state and is not pending. test: {full_title}")]
    UnexpectedState { full_title: String },

    #[error("Cannot {action} while replay is {state}")]
    DriverState { action: String, state: String },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },
}

/// Broad classification used for exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Structural,
    UnexpectedState,
    Usage,
    Io,
}

impl ErrorKind {
    /// Process exit code for this class of error
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Parse => 2,
            Self::Structural => 3,
            Self::UnexpectedState => 4,
            Self::Usage | Self::Io => 1,
        }
    }
}

impl Error {
    /// Create a structural error from anything displayable
    pub fn structural(message: impl std::fmt::Display) -> Self {
        Self::Structural(message.to_string())
    }

    /// Create an unexpected state error for a test that resolves to no outcome
    pub fn unexpected_state(full_title: &str) -> Self {
        Self::UnexpectedState {
            full_title: full_title.to_string(),
        }
    }

    /// Create a driver state error
    pub fn driver_state(action: &str, state: impl std::fmt::Display) -> Self {
        Self::DriverState {
            action: action.to_string(),
            state: state.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Parse(_) => ErrorKind::Parse,
            Error::MissingRootSuite | Error::FailedWithoutError { .. } | Error::Structural(_) => {
                ErrorKind::Structural
            }
            Error::UnexpectedState { .. } => ErrorKind::UnexpectedState,
            Error::DriverState { .. } | Error::Config(_) | Error::ConfigParse(_) => {
                ErrorKind::Usage
            }
            Error::Io(_) | Error::FileRead { .. } => ErrorKind::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_identify_offender() {
        let err = Error::FailedWithoutError {
            title: "t1".to_string(),
        };
        assert!(err.to_string().contains("t1"));
        assert!(Error::MissingRootSuite
            .to_string()
            .contains("missing root suite"));

        let err = Error::unexpected_state("outer inner t");
        assert_eq!(
            err.to_string(),
            "Test has no recorded state and is not pending. test: outer inner t"
        );
    }

    #[test]
    fn test_kinds_map_to_exit_codes() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(Error::Parse(parse).kind().exit_code(), 2);
        assert_eq!(Error::MissingRootSuite.kind(), ErrorKind::Structural);
        assert_eq!(Error::structural("bad").kind().exit_code(), 3);
        assert_eq!(Error::unexpected_state("t").kind().exit_code(), 4);
        assert_eq!(Error::driver_state("run", "completed").kind(), ErrorKind::Usage);
    }
}
