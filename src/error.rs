//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`
//! ([`EditValidationError`], [`InvalidCamelotKey`], ...), while CLI/main uses
//! `anyhow` for convenient error propagation. Collaborator failures
//! (`AnalysisError`, `RecommendationError`) never surface here; they end up
//! as the session's error message.
//!
//! # Design
//!
//! - [`Error`]: Top-level application error enum
//! - Module-specific errors convert into it with `?`
//! - All errors implement `std::error::Error` for compatibility
//!
//! [`EditValidationError`]: crate::library::EditValidationError
//! [`InvalidCamelotKey`]: crate::harmony::InvalidCamelotKey

use std::path::PathBuf;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Reading or writing CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Track or file not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed input (CSV seed files, shell arguments)
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a not found error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

/// Read a text file, naming the path in the error.
pub fn read_to_string(path: impl Into<PathBuf>) -> Result<String> {
    let path = path.into();
    std::fs::read_to_string(&path).with_context(format!("reading {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::not_found("demo9.mp3");
        assert!(err.to_string().contains("demo9.mp3"));
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::InvalidFormat("row 3".to_string()).context("while loading seed");
        let msg = err.to_string();
        assert!(msg.contains("while loading seed"));
        assert!(msg.contains("row 3"));
    }

    #[test]
    fn test_csv_errors_convert() {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader("a,b\nc".as_bytes());
        let err: Error = reader.records().find_map(|r| r.err()).unwrap().into();
        assert!(matches!(err, Error::Csv(_)));
        assert!(err.to_string().starts_with("CSV error"));
    }

    #[test]
    fn test_result_ext() {
        let result: Result<()> = Err(Error::config("bad model"));
        let with_ctx = result.with_context("additional context");
        assert!(with_ctx.unwrap_err().to_string().contains("additional context"));
    }

    #[test]
    fn test_read_missing_file_names_path() {
        let err = read_to_string("/definitely/not/here.csv").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }
}
