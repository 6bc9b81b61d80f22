//! Error types for unscan library.

use std::io;
use thiserror::Error;

/// Result type alias for unscan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reconstructing a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input byte stream is empty.
    #[error("Empty input")]
    EmptyInput,

    /// The input is recognized but cannot be processed.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The input cannot be parsed as a document container at all.
    #[error("Unreadable source: {0}")]
    SourceUnreadable(String),

    /// Native extraction of a single page failed.
    #[error("Page {page} extraction failed: {message}")]
    PageExtraction {
        /// 1-based page number.
        page: u32,
        /// Failure description.
        message: String,
    },

    /// Rasterizing a page failed.
    #[error("Rasterization error: {0}")]
    Rasterize(String),

    /// Optical recognition failed.
    #[error("OCR error: {0}")]
    Ocr(String),

    /// An external tool is not installed.
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// The input was readable but produced no usable text.
    #[error("No text could be extracted")]
    EmptyResult,

    /// Invalid configuration or vocabulary.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error during rendering (Markdown, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// A page's text was already resolved.
    #[error("Page {0} was already resolved")]
    PageAlreadyResolved(u32),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::SourceUnreadable(err.to_string()),
        }
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(err.to_string())
    }
}
