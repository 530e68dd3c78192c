//! Error taxonomy shared by the backend registry and the orchestrator.

use crate::services::backend::BackendId;

/// Terminal outcome of a failed search run.
///
/// Every `run` call ends in exactly one of these or in a `ResultSet`.
/// Malformed output lines never surface here: they are dropped by the parser.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Empty/blank query, multi-line query, or an empty or relative root set
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Backend name not recognized, or id not registered in the registry
    #[error("Unknown search backend: {0}")]
    UnknownBackend(String),

    /// The backend has no native flag for a requested option
    #[error("{backend} does not support {option}")]
    CapabilityUnsupported {
        backend: BackendId,
        option: &'static str,
    },

    /// The executable could not be started (missing, not executable, ...)
    #[error("Failed to launch {executable}: {source}")]
    LaunchFailure {
        executable: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran and reported a real error
    #[error("{backend} failed (exit code {code:?}): {stderr}")]
    BackendError {
        backend: BackendId,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Search cancelled")]
    Cancelled,
}

impl SearchError {
    /// Raw standard-error text of the backend, when there is any
    pub fn stderr(&self) -> Option<&str> {
        match self {
            SearchError::BackendError { stderr, .. } if !stderr.is_empty() => Some(stderr),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, SearchError::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
