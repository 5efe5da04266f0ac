//! Invoice line extractor: address-anchored extraction with an amount-only fallback.

use tracing::{debug, trace};

use crate::models::config::ExtractionConfig;
use crate::models::invoice::{ParsedInvoice, ParsedInvoiceLine, PLACEHOLDER_AMOUNT};

use super::rules::{
    AddressCandidate, AddressExtractor, AmountExtractor, ChainDetector, FieldExtractor,
};
use super::LineExtractor;

/// Which extraction strategy applies to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionPath {
    /// At least one recipient address was found; one line per address.
    AddressAnchored(Vec<AddressCandidate>),
    /// No address anywhere; one line per amount in the text.
    AmountOnly,
}

/// Extracts payment lines from invoice text.
///
/// Holds only immutable settings, so one instance can serve any number of
/// documents and threads.
#[derive(Debug, Clone, Default)]
pub struct InvoiceLineExtractor {
    addresses: AddressExtractor,
    chains: ChainDetector,
    amounts: AmountExtractor,
}

impl InvoiceLineExtractor {
    /// Create an extractor with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            addresses: AddressExtractor::new(),
            chains: ChainDetector::new(config.chain_window),
            amounts: AmountExtractor::new()
                .with_token_lookahead(config.token_lookahead)
                .with_char_lookahead(config.char_lookahead)
                .with_default_currency(config.default_currency.clone())
                .with_extra_currencies(config.extra_currencies.clone()),
        }
    }

    /// Set the chain search window (characters each side of an address).
    pub fn with_chain_window(mut self, chars: usize) -> Self {
        self.chains = ChainDetector::new(chars);
        self
    }

    /// Set how many tokens after an address are tried for an amount.
    pub fn with_token_lookahead(mut self, tokens: usize) -> Self {
        self.amounts = self.amounts.with_token_lookahead(tokens);
        self
    }

    /// Set how many characters after an address are searched for an amount.
    pub fn with_char_lookahead(mut self, chars: usize) -> Self {
        self.amounts = self.amounts.with_char_lookahead(chars);
        self
    }

    /// Set the currency used when none is recognised.
    pub fn with_default_currency(mut self, currency: impl Into<String>) -> Self {
        self.amounts = self.amounts.with_default_currency(currency);
        self
    }

    /// Decide the extraction path for `text`.
    pub fn classify(&self, text: &str) -> ExtractionPath {
        let candidates = self.addresses.extract_all(text);
        if candidates.is_empty() {
            ExtractionPath::AmountOnly
        } else {
            ExtractionPath::AddressAnchored(candidates)
        }
    }

    /// One line per address: chain from the surrounding window, amount from
    /// the following tokens or characters, `"0"` when none is found.
    pub fn extract_address_lines(
        &self,
        text: &str,
        candidates: &[AddressCandidate],
    ) -> Vec<ParsedInvoiceLine> {
        candidates
            .iter()
            .map(|candidate| {
                let chain = self.chains.detect(text, candidate.offset);
                let line = match self.amounts.near_address(text, &candidate.value, candidate.end()) {
                    Some(token) => {
                        ParsedInvoiceLine::new(chain, &candidate.value, token.amount, token.currency)
                    }
                    None => ParsedInvoiceLine::new(
                        chain,
                        &candidate.value,
                        PLACEHOLDER_AMOUNT,
                        self.amounts.default_currency(),
                    ),
                };

                trace!(
                    "{:?} address {} -> chain={:?} amount={} {}",
                    candidate.kind,
                    line.address,
                    line.chain,
                    line.amount,
                    line.currency
                );
                line
            })
            .collect()
    }

    /// One address-less line per positive amount in the text.
    pub fn extract_amount_lines(&self, text: &str) -> Vec<ParsedInvoiceLine> {
        self.amounts
            .extract_all(text)
            .into_iter()
            .map(|m| ParsedInvoiceLine::amount_only(m.value.amount, m.value.currency))
            .collect()
    }
}

impl LineExtractor for InvoiceLineExtractor {
    fn extract(&self, text: &str) -> ParsedInvoice {
        let lines = match self.classify(text) {
            ExtractionPath::AddressAnchored(candidates) => {
                debug!(
                    "Found {} address candidates in {} characters",
                    candidates.len(),
                    text.len()
                );
                self.extract_address_lines(text, &candidates)
            }
            ExtractionPath::AmountOnly => {
                debug!("No addresses found, falling back to amount-only extraction");
                self.extract_amount_lines(text)
            }
        };

        debug!("Extracted {} invoice lines", lines.len());
        ParsedInvoice::new(lines)
    }
}

/// Extract payment lines from invoice text with default settings.
pub fn extract_invoice_lines(text: &str) -> ParsedInvoice {
    InvoiceLineExtractor::new().extract(text)
}
