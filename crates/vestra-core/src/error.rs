//! Error types for the vestra-core library.
//!
//! Line extraction itself never fails; these cover the layers around it
//! (PDF decoding, configuration, file access).

use thiserror::Error;

/// Main error type for the vestra library.
#[derive(Error, Debug)]
pub enum VestraError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// The data does not start with a PDF header.
    #[error("not a PDF document")]
    NotPdf,

    /// The document exceeds the configured upload limit.
    #[error("PDF is too large: {size} bytes (limit {limit} bytes)")]
    TooLarge { size: usize, limit: usize },

    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Result type for the vestra library.
pub type Result<T> = std::result::Result<T, VestraError>;
