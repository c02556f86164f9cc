//! Error types for Quarry operations.
//!
//! This module defines the main error type [`QuarryError`] which represents
//! everything that can go wrong while retrieving a document or decoding it
//! before matching. Queries themselves never fail: malformed query syntax
//! degrades to zero matches.
//!
//! # Example
//!
//! ```rust
//! use quarry_core::{Content, ErrorKind, Format, extract};
//!
//! match extract(&Content::from("{not json"), Format::Json, "id") {
//!     Ok(report) => println!("{report}"),
//!     Err(e) if e.kind() == ErrorKind::MalformedDocument => println!("bad document: {e}"),
//!     Err(e) => println!("Error: {e}"),
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for extraction operations.
#[derive(Error, Debug)]
pub enum QuarryError {
    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures and connection issues.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("HTTP request failed with status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// Request timeout.
    ///
    /// Returned when an HTTP request exceeds the configured timeout duration.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O errors while reading a file or stdin.
    #[error("Failed to read document: {0}")]
    ReadError(#[from] std::io::Error),

    /// The source produced no content (or only whitespace).
    #[error("Document is empty: {0}")]
    EmptyDocument(String),

    /// XML parsing errors.
    #[error("Failed to parse XML: {0}")]
    XmlParseError(String),

    /// JSON decoding errors.
    #[error("Failed to parse JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),

    /// Invalid character encoding.
    ///
    /// Returned when an XML document arrives as bytes that are not valid UTF-8.
    #[error("Invalid character encoding")]
    InvalidEncoding,

    /// A match report could not be serialized.
    #[error("Failed to serialize report: {0}")]
    ReportError(String),
}

/// Coarse classification of a [`QuarryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The document could not be retrieved (network, file, stdin, empty).
    SourceUnavailable,
    /// The document was retrieved but could not be decoded.
    MalformedDocument,
    /// Matching succeeded but the output could not be produced.
    Output,
}

impl QuarryError {
    /// Returns which side of the pipeline produced this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuarryError::XmlParseError(_) | QuarryError::JsonParseError(_) | QuarryError::InvalidEncoding => {
                ErrorKind::MalformedDocument
            }
            QuarryError::ReportError(_) => ErrorKind::Output,
            _ => ErrorKind::SourceUnavailable,
        }
    }
}

/// Result type alias for QuarryError.
pub type Result<T> = std::result::Result<T, QuarryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QuarryError::InvalidUrl("not a url".to_string());
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_timeout_error() {
        let err = QuarryError::Timeout { timeout: 30 };
        assert!(err.to_string().contains("30"));
        assert_eq!(err.kind(), ErrorKind::SourceUnavailable);
    }

    #[test]
    fn test_parse_errors_are_malformed() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(QuarryError::from(json_err).kind(), ErrorKind::MalformedDocument);
        assert_eq!(
            QuarryError::XmlParseError("unexpected end".into()).kind(),
            ErrorKind::MalformedDocument
        );
    }

    #[test]
    fn test_report_error_kind() {
        let err = QuarryError::ReportError("key must be a string".into());
        assert!(err.to_string().starts_with("Failed to serialize report"));
        assert_eq!(err.kind(), ErrorKind::Output);
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let err = QuarryError::FileNotFound(PathBuf::from("/nope.xml"));
        assert!(err.to_string().contains("/nope.xml"));
        assert_eq!(err.kind(), ErrorKind::SourceUnavailable);
    }
}
