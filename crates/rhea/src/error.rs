//! Error types for Rhea operations.
//!
//! Errors come in three layers:
//!
//! - **`Error`**: Top-level errors that halt an operation (bad configuration,
//!   missing project root, grammar setup failure). Parsing a single text
//!   also reports its `SyntaxError` through `Error::Syntax`.
//! - **`SyntaxError`**: A structured parse failure for one source text
//! - **`IndexError`**: File-level errors collected during a build but never
//!   returned to the caller of `build()`
//!
//! ## Error Philosophy
//!
//! Indexing is best effort:
//! - A single malformed or unreadable file shouldn't prevent indexing the rest
//! - Per-file errors become statistics, not return values
//! - Only infrastructure failures cause early termination
//!
//! ## Error Categorization
//!
//! `IndexErrorKind` uses a 4xx/5xx style categorization:
//! - Input problems (user's fault): syntax errors
//! - Internal problems (environment's fault): I/O errors

use std::path::PathBuf;
use thiserror::Error;

/// Result type for Rhea operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for Rhea operations.
#[derive(Debug, Error)]
pub enum Error {
    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tree-sitter parsing infrastructure failed
    #[error("parser error: {0}")]
    Parser(String),

    /// Source text is not valid Python
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    /// Invalid configuration or arguments
    #[error("configuration error: {0}")]
    Config(String),

    /// A URI that does not name a file on disk
    #[error("invalid file URI: {0}")]
    InvalidUri(String),
}

/// A syntax error with its location in the source text.
///
/// Line and offset are 1-indexed, matching what editors and compilers print.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{uri}:{line}:{offset}: {message}")]
pub struct SyntaxError {
    /// Human-readable description
    pub message: String,
    /// URI of the text that failed to parse
    pub uri: String,
    /// Line of the error (1-indexed)
    pub line: u32,
    /// Column of the error (1-indexed byte offset)
    pub offset: u32,
    /// The offending source line, without its terminator
    pub text: String,
}

/// Error encountered while indexing a specific file.
///
/// These errors are collected during indexing but don't halt the operation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct IndexError {
    /// Path to the file that failed
    pub path: PathBuf,
    /// Category of the error
    pub kind: IndexErrorKind,
    /// Human-readable error message
    pub message: String,
}

impl std::fmt::Display for IndexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} ({})",
            self.path.display(),
            self.message,
            self.kind
        )
    }
}

impl std::error::Error for IndexError {}

/// Categorization of indexing errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexErrorKind {
    // === Input Problems (analogous to HTTP 4xx) ===
    /// Source file has syntax errors that prevent parsing
    ParseFailed,

    // === Internal Problems (analogous to HTTP 5xx) ===
    /// Could not read the file from disk
    IoError,
}

impl std::fmt::Display for IndexErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParseFailed => write!(f, "parse failed"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl IndexErrorKind {
    /// Returns `true` if this is an input problem (4xx-style).
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::ParseFailed)
    }

    /// Returns `true` if this is an internal problem (5xx-style).
    #[must_use]
    pub fn is_internal_error(&self) -> bool {
        matches!(self, Self::IoError)
    }
}

impl IndexError {
    /// Create a new indexing error.
    #[must_use]
    pub fn new(path: PathBuf, kind: IndexErrorKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
        }
    }

    /// Create a parse error for a file.
    #[must_use]
    pub fn parse_failed(path: PathBuf, error: &SyntaxError) -> Self {
        Self::new(
            path,
            IndexErrorKind::ParseFailed,
            format!("{}:{}: {}", error.line, error.offset, error.message),
        )
    }

    /// Create an I/O error for a file.
    #[must_use]
    pub fn io_error(path: PathBuf, error: &std::io::Error) -> Self {
        Self::new(path, IndexErrorKind::IoError, error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_syntax_error() -> SyntaxError {
        SyntaxError {
            message: "invalid syntax".to_string(),
            uri: "file:///bad.py".to_string(),
            line: 1,
            offset: 5,
            text: "x = .".to_string(),
        }
    }

    #[test]
    fn index_error_kind_categorization() {
        assert!(IndexErrorKind::ParseFailed.is_input_error());
        assert!(!IndexErrorKind::ParseFailed.is_internal_error());

        assert!(IndexErrorKind::IoError.is_internal_error());
        assert!(!IndexErrorKind::IoError.is_input_error());
    }

    #[test]
    fn syntax_error_display_has_location() {
        assert_eq!(
            sample_syntax_error().to_string(),
            "file:///bad.py:1:5: invalid syntax"
        );
    }

    #[test]
    fn index_error_display_includes_path_and_kind() {
        let error = IndexError::parse_failed(PathBuf::from("pkg/bad.py"), &sample_syntax_error());

        let display = error.to_string();
        assert!(display.contains("pkg/bad.py"));
        assert!(display.contains("invalid syntax"));
        assert!(display.contains("parse failed"));
    }

    #[test]
    fn io_error_keeps_os_message() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error = IndexError::io_error(PathBuf::from("a.py"), &io);

        assert_eq!(error.kind, IndexErrorKind::IoError);
        assert_eq!(error.message, "gone");
    }
}
