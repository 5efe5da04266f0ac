//! PDF text decoding module.
//!
//! Turns uploaded invoice documents into the plain text consumed by the line
//! extractor.

mod extractor;

pub use extractor::{decode_invoice_text, PdfExtractor};

use crate::error::PdfError;

/// Type of PDF content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfType {
    /// Contains an extractable text layer.
    Text,
    /// No usable text (blank or scanned document).
    Empty,
}

impl PdfType {
    /// `Text` when the trimmed text has at least `min_text_length`
    /// characters (and never fewer than one).
    pub fn of_text(text: &str, min_text_length: usize) -> Self {
        if text.trim().chars().count() >= min_text_length.max(1) {
            PdfType::Text
        } else {
            PdfType::Empty
        }
    }
}

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Analyze the PDF to determine its type.
    fn analyze(&self) -> Result<PdfType>;

    /// Extract text from the entire PDF.
    fn extract_text(&self) -> Result<String>;

    /// Extract text from a specific page (1-indexed).
    fn extract_page_text(&self, page: u32) -> Result<String>;
}
