//! Error types for Gleaner operations.
//!
//! The public extraction and scoring entry points never surface these to
//! callers; they log and fall back to empty values. [`GleanerError`] is
//! returned by the fallible building blocks underneath them (selector
//! parsing, URL resolution, JSON-LD decoding).
//!
//! # Example
//!
//! ```rust
//! use gleaner_core::{Document, GleanerError};
//!
//! let doc = Document::parse("<p>Hello</p>").unwrap();
//! assert!(matches!(doc.select("[[bad"), Err(GleanerError::HtmlParseError(_))));
//! ```

use thiserror::Error;

/// Main error type for metadata extraction and scoring helpers.
#[derive(Error, Debug)]
pub enum GleanerError {
    /// A URL could not be parsed or resolved against a base.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTML querying errors, most often an invalid CSS selector.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// A JSON-LD block could not be decoded.
    #[error("Invalid JSON-LD: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for GleanerError.
pub type Result<T> = std::result::Result<T, GleanerError>;
