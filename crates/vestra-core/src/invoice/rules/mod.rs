//! Rule-based field extractors for payment invoices.

pub mod addresses;
pub mod amounts;
pub mod chains;
pub mod patterns;

pub use addresses::{is_evm_address, is_near_account, AddressCandidate, AddressExtractor, AddressKind};
pub use amounts::{is_known_currency, AmountExtractor, AmountToken};
pub use chains::ChainDetector;
pub use patterns::*;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value matched in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte range in the source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// Byte offset `count` characters before `offset`, or 0.
pub(crate) fn chars_before(text: &str, offset: usize, count: usize) -> usize {
    if count == 0 {
        return offset;
    }
    text[..offset]
        .char_indices()
        .rev()
        .nth(count - 1)
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Byte offset `count` characters after `offset`, or the end of the text.
pub(crate) fn chars_after(text: &str, offset: usize, count: usize) -> usize {
    text[offset..]
        .char_indices()
        .nth(count)
        .map(|(i, _)| offset + i)
        .unwrap_or(text.len())
}
