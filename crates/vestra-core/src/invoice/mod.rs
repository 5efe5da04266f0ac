//! Invoice payment line extraction module.

mod extractor;
pub mod rules;

pub use extractor::{extract_invoice_lines, ExtractionPath, InvoiceLineExtractor};

use crate::error::Result;
use crate::models::config::PdfConfig;
use crate::models::invoice::ParsedInvoice;
use crate::pdf::decode_invoice_text;

/// Trait for payment line extractors.
pub trait LineExtractor {
    /// Extract payment lines from plain text. Never fails; unrecognised input
    /// yields no lines.
    fn extract(&self, text: &str) -> ParsedInvoice;

    /// Decode a PDF and extract payment lines from its text layer.
    fn extract_from_pdf(&self, data: &[u8], config: &PdfConfig) -> Result<ParsedInvoice> {
        let text = decode_invoice_text(data, config)?;
        Ok(self.extract(&text))
    }
}
