//! Error types for dispatch operations.
//!
//! This module defines [`Error`], the error type returned by the dispatcher,
//! and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Parse and resolution failures abort a run before anything executes
//! - Command hooks return `anyhow::Result`; the dispatcher wraps their
//!   failures with the name of the command that raised them
//! - All errors should read as actionable messages for users

use thiserror::Error;

/// Core error type for dispatch operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An option token could not be interpreted against the bound spec.
    #[error("Invalid option '{token}': {message}")]
    Parse { token: String, message: String },

    /// An option spec string passed to `OptionSpecCollection::add` is malformed.
    #[error("Invalid option spec '{spec}': {message}")]
    InvalidOptionSpec { spec: String, message: String },

    /// No namespace or parent command knows the requested name.
    #[error("Command '{name}' not found")]
    CommandNotFound { name: String },

    /// A command's `prepare` or `execute` hook failed.
    #[error("Command '{command}' failed: {source:#}")]
    Execution {
        command: String,
        #[source]
        source: anyhow::Error,
    },

    /// A command's `finish` hook failed during unwind.
    #[error("Command '{command}' failed to finish: {source:#}")]
    Finish {
        command: String,
        #[source]
        source: anyhow::Error,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub(crate) fn unknown_option(token: &str) -> Self {
        Self::Parse {
            token: token.to_string(),
            message: "unknown option".to_string(),
        }
    }

    pub(crate) fn missing_value(token: &str) -> Self {
        Self::Parse {
            token: token.to_string(),
            message: "expected a value".to_string(),
        }
    }

    pub(crate) fn unexpected_value(token: &str) -> Self {
        Self::Parse {
            token: token.to_string(),
            message: "option does not take a value".to_string(),
        }
    }

    pub(crate) fn repeated_option(token: &str) -> Self {
        Self::Parse {
            token: token.to_string(),
            message: "option specified more than once".to_string(),
        }
    }

    /// Whether the error was raised before any command executed.
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::InvalidOptionSpec { .. } | Self::CommandNotFound { .. }
        )
    }
}

/// Result type alias for dispatch operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_displays_token_and_message() {
        let err = Error::unknown_option("--frobnicate");
        let msg = err.to_string();
        assert!(msg.contains("--frobnicate"));
        assert!(msg.contains("unknown option"));
    }

    #[test]
    fn missing_value_names_the_option() {
        let err = Error::missing_value("--output");
        assert!(err.to_string().contains("--output"));
        assert!(err.to_string().contains("expected a value"));
    }

    #[test]
    fn command_not_found_displays_name() {
        let err = Error::CommandNotFound {
            name: "bundel".into(),
        };
        assert_eq!(err.to_string(), "Command 'bundel' not found");
    }

    #[test]
    fn execution_error_displays_command_and_cause() {
        let err = Error::Execution {
            command: "compile".into(),
            source: anyhow::anyhow!("package.ini not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("compile"));
        assert!(msg.contains("package.ini not found"));
    }

    #[test]
    fn finish_error_displays_command() {
        let err = Error::Finish {
            command: "bundle".into(),
            source: anyhow::anyhow!("lock held"),
        };
        assert!(err.to_string().contains("failed to finish"));
    }

    #[test]
    fn resolution_errors_are_classified() {
        assert!(Error::unknown_option("-x").is_resolution_error());
        assert!(Error::CommandNotFound { name: "x".into() }.is_resolution_error());
        assert!(!Error::Execution {
            command: "x".into(),
            source: anyhow::anyhow!("boom"),
        }
        .is_resolution_error());
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
