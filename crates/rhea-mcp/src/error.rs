//! Error types for the rhea MCP server.

use thiserror::Error;

/// Errors that can occur in the rhea MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid combination or value of tool arguments.
    #[error("Invalid arguments: {0}")]
    InvalidArgument(String),

    /// The URI is not a `file://` URI and can't be mapped to a path.
    #[error("Unknown URI: {0}")]
    UnknownUri(String),

    /// An error from the index.
    #[error("Index error: {0}")]
    Index(#[from] rhea::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A blocking index task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result type for rhea MCP operations.
pub type Result<T> = std::result::Result<T, Error>;
