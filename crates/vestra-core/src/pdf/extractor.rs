//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, info, warn};

use super::{PdfProcessor, PdfType, Result};
use crate::error::PdfError;
use crate::models::config::PdfConfig;

/// Bytes searched for the `%PDF-` header.
const HEADER_SEARCH_LIMIT: usize = 1024;

/// PDF text extractor using lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
    max_file_size: usize,
    min_text_length: usize,
}

impl PdfExtractor {
    /// Create a new PDF extractor with default limits.
    pub fn new() -> Self {
        Self::with_config(&PdfConfig::default())
    }

    /// Create a new PDF extractor with the given limits.
    pub fn with_config(config: &PdfConfig) -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            max_file_size: config.max_file_size,
            min_text_length: config.min_text_length,
        }
    }

    fn check_upload(&self, data: &[u8]) -> Result<()> {
        if data.len() > self.max_file_size {
            return Err(PdfError::TooLarge {
                size: data.len(),
                limit: self.max_file_size,
            });
        }

        let head = &data[..data.len().min(HEADER_SEARCH_LIMIT)];
        if !head.windows(5).any(|w| w == b"%PDF-") {
            return Err(PdfError::NotPdf);
        }

        Ok(())
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or(PdfError::Parse("No document loaded".to_string()))
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        self.check_upload(data)?;

        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // Save decrypted document to raw_data for pdf_extract
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn analyze(&self) -> Result<PdfType> {
        let pdf_type = PdfType::of_text(&self.extract_text()?, self.min_text_length);
        debug!("PDF analysis: {:?}", pdf_type);
        Ok(pdf_type)
    }

    fn extract_text(&self) -> Result<String> {
        self.document()?;
        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        let doc = self.document()?;
        if page == 0 || page > self.page_count() {
            return Err(PdfError::InvalidPage(page));
        }

        doc.extract_text(&[page])
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }
}

/// Decode an uploaded invoice into plain text.
///
/// Scanned or blank documents decode to an empty string, which extracts to
/// no lines.
pub fn decode_invoice_text(data: &[u8], config: &PdfConfig) -> crate::Result<String> {
    let mut extractor = PdfExtractor::with_config(config);
    decode_with(&mut extractor, data, config.min_text_length)
}

/// Load `data` into `processor` and return its text layer.
///
/// Text extraction failures are returned as errors; only a successfully
/// extracted but blank layer maps to the empty string.
fn decode_with<P: PdfProcessor>(
    processor: &mut P,
    data: &[u8],
    min_text_length: usize,
) -> crate::Result<String> {
    processor.load(data)?;
    let text = processor.extract_text()?;

    match PdfType::of_text(&text, min_text_length) {
        PdfType::Empty => {
            warn!("PDF has no text layer; no invoice lines can be extracted");
            Ok(String::new())
        }
        PdfType::Text => {
            info!(
                "Decoded {} characters of text from {} pages",
                text.len(),
                processor.page_count()
            );
            Ok(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VestraError;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    const ADDR: &str = "0x4f3b892123456789012345678901234567890e92";

    /// Single-page PDF with one text line per entry, in Courier.
    fn text_pdf(lines: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 10.into()]),
            Operation::new("TL", vec![14.into()]),
            Operation::new("Td", vec![40.into(), 780.into()]),
        ];
        for line in lines {
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            operations.push(Operation::new("T*", vec![]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut data = Vec::new();
        doc.save_to(&mut data).unwrap();
        data
    }

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
    }

    #[test]
    fn test_rejects_non_pdf() {
        let mut extractor = PdfExtractor::new();
        let err = extractor.load(b"Recipient address: alice.near").unwrap_err();
        assert!(matches!(err, PdfError::NotPdf));
    }

    #[test]
    fn test_rejects_oversized_upload() {
        let config = PdfConfig {
            max_file_size: 16,
            ..PdfConfig::default()
        };
        let mut extractor = PdfExtractor::with_config(&config);
        let err = extractor.load(b"%PDF-1.7 0123456789abcdef").unwrap_err();
        assert!(matches!(err, PdfError::TooLarge { size: 25, limit: 16 }));
    }

    #[test]
    fn test_rejects_truncated_pdf() {
        let mut extractor = PdfExtractor::new();
        let err = extractor.load(b"%PDF-1.7\n%%EOF").unwrap_err();
        assert!(matches!(err, PdfError::Parse(_) | PdfError::NoPages));
    }

    #[test]
    fn test_text_requires_loaded_document() {
        let extractor = PdfExtractor::new();
        assert!(matches!(extractor.extract_text(), Err(PdfError::Parse(_))));
        assert!(matches!(extractor.extract_page_text(1), Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_load_generated_invoice() {
        let data = text_pdf(&["Recipient chain: Polygon", ADDR, "Amount: 250 USDC"]);
        let mut extractor = PdfExtractor::new();
        extractor.load(&data).unwrap();

        assert_eq!(extractor.page_count(), 1);
        assert_eq!(extractor.analyze().unwrap(), PdfType::Text);
        assert!(extractor.extract_text().unwrap().contains(ADDR));
        assert!(matches!(extractor.extract_page_text(2), Err(PdfError::InvalidPage(2))));
    }

    #[test]
    fn test_decode_invoice_text() {
        let data = text_pdf(&["Pay to", ADDR]);
        let text = decode_invoice_text(&data, &PdfConfig::default()).unwrap();

        assert!(text.contains(ADDR));
    }

    /// Loads anything but cannot decode its text layer.
    struct UndecodableText;

    impl PdfProcessor for UndecodableText {
        fn load(&mut self, _data: &[u8]) -> Result<()> {
            Ok(())
        }

        fn page_count(&self) -> u32 {
            1
        }

        fn analyze(&self) -> Result<PdfType> {
            self.extract_text().map(|text| PdfType::of_text(&text, 1))
        }

        fn extract_text(&self) -> Result<String> {
            Err(PdfError::TextExtraction("missing font encoding".to_string()))
        }

        fn extract_page_text(&self, page: u32) -> Result<String> {
            Err(PdfError::InvalidPage(page))
        }
    }

    #[test]
    fn test_decode_reports_text_extraction_failure() {
        let result = decode_with(&mut UndecodableText, b"%PDF-1.7", 1);

        assert!(matches!(
            result,
            Err(VestraError::Pdf(PdfError::TextExtraction(_)))
        ));
        assert!(matches!(
            UndecodableText.analyze(),
            Err(PdfError::TextExtraction(_))
        ));
    }

    #[test]
    fn test_pdf_type_of_text() {
        assert_eq!(PdfType::of_text("  \n\t ", 1), PdfType::Empty);
        assert_eq!(PdfType::of_text("", 0), PdfType::Empty);
        assert_eq!(PdfType::of_text(" ab ", 2), PdfType::Text);
        assert_eq!(PdfType::of_text(" ab ", 3), PdfType::Empty);
    }

    #[test]
    fn test_decode_blank_pdf_is_empty() {
        let data = text_pdf(&[]);
        let text = decode_invoice_text(&data, &PdfConfig::default()).unwrap();

        assert!(text.is_empty());
    }
}
