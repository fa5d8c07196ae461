//! Error types for the nutribot-store crate.
//!
//! All session operations return [`StoreError`] via [`StoreResult`].

use thiserror::Error;

/// Alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or mutating session state.
#[derive(Debug, Error)]
pub enum StoreError {
    /// JSON serialization or deserialization of a stored payload failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The requested record was not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A journey-scoped operation was attempted with no journey active.
    #[error("no active journey in session {session_id}")]
    NoActiveJourney { session_id: String },

    /// An invalid argument was provided to a store operation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
