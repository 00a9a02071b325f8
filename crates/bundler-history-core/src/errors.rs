//! Error types for fetching and pivoting bundler history.

use std::path::PathBuf;

/// Errors that abort a history run.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// Transport failure or non-success HTTP status.
    #[error("network error: {message}")]
    Network { message: String },

    /// Response body is not a history document.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Timestamp token does not decode to a calendar date/time.
    #[error("invalid timestamp token '{token}': {reason}")]
    InvalidTimestamp { token: String, reason: String },

    /// Reading the input or writing a table failed.
    #[error("io error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HistoryError {
    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Network { .. } | Self::Parse { .. } => 3,
            Self::InvalidTimestamp { .. } => 4,
            Self::Io { .. } => 5,
        }
    }

    pub(crate) fn invalid_timestamp(token: &str, reason: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            token: token.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for HistoryError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for HistoryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            message: err.to_string(),
        }
    }
}

/// Result type for history operations.
pub type HistoryResult<T> = Result<T, HistoryError>;
