//! Error types for the nutribot-catalog crate.

use std::path::PathBuf;

/// Errors raised while loading catalog data.  Queries themselves never fail:
/// an empty result is a valid answer.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Reading a data file from disk failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A data file did not parse as the expected JSON shape.
    #[error("invalid json in {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// The data parsed but is internally inconsistent.
    #[error("invalid catalog data: {0}")]
    InvalidData(String),
}

/// Convenience alias for catalog results.
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
