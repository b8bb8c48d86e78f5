//! Error types for the table sync core library.

use thiserror::Error;

/// Errors reported by the edit model, the save orchestration, and the
/// transport adapters.
///
/// Every error is terminal for the action that raised it - nothing in this
/// crate retries - and none of them poison the model, so the caller can
/// surface a notification and let the user re-issue the action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// Save requested while the pending-edit overlay is empty.
    #[error("no pending changes to save")]
    NoChanges,

    /// HTTP or network failure talking to the backend.
    #[error("transport error: {message}")]
    Transport {
        /// HTTP status, when the failure came with a response.
        status: Option<u16>,
        message: String,
    },

    /// Item-store save attempted on a table with no stored item to address.
    #[error("table '{0}' has no item identifier in the store")]
    MissingIdentifier(String),

    /// A save for this session is already in flight.
    #[error("a save is already in flight")]
    SaveInFlight,

    /// Column name not present in the table snapshot.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// Error serializing/deserializing JSON
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Json(err.to_string())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;
