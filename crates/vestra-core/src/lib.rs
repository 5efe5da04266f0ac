//! Core library for Vestra invoice processing.
//!
//! This crate provides:
//! - PDF text decoding (lopdf + pdf-extract)
//! - Payment line extraction from invoice text (EVM/NEAR addresses, chains, amounts)
//! - Payment line models serialized as `{ "lines": [...] }`

pub mod error;
pub mod invoice;
pub mod models;
pub mod pdf;

pub use error::{PdfError, Result, VestraError};
pub use invoice::{extract_invoice_lines, ExtractionPath, InvoiceLineExtractor, LineExtractor};
pub use models::config::{ExtractionConfig, PdfConfig, VestraConfig};
pub use models::invoice::{Chain, ParsedInvoice, ParsedInvoiceLine};
pub use pdf::{decode_invoice_text, PdfExtractor, PdfProcessor, PdfType};
