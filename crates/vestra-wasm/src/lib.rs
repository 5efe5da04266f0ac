//! WASM bindings for Vestra invoice line extraction.
//!
//! Lets the browser app parse invoices client-side with the same rules as the CLI.

use wasm_bindgen::prelude::*;

use vestra_core::invoice::{InvoiceLineExtractor as CoreExtractor, LineExtractor};
use vestra_core::models::config::PdfConfig;
use vestra_core::models::invoice::ParsedInvoice;

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js(invoice: &ParsedInvoice) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(invoice).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Extract payment lines from invoice text.
///
/// Returns `{ lines: [{ chain?, address, amount, currency, description? }] }`.
#[wasm_bindgen]
pub fn extract_invoice_lines(text: &str) -> Result<JsValue, JsValue> {
    to_js(&vestra_core::extract_invoice_lines(text))
}

/// Extract payment lines from the bytes of a PDF invoice.
#[wasm_bindgen]
pub fn extract_invoice_lines_from_pdf(data: &[u8]) -> Result<JsValue, JsValue> {
    let invoice = CoreExtractor::new()
        .extract_from_pdf(data, &PdfConfig::default())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&invoice)
}

/// Check whether a string is an EVM address.
#[wasm_bindgen]
pub fn is_evm_address(address: &str) -> bool {
    vestra_core::invoice::rules::is_evm_address(address)
}

/// Check whether a string is a NEAR account name.
#[wasm_bindgen]
pub fn is_near_account(address: &str) -> bool {
    vestra_core::invoice::rules::is_near_account(address)
}

/// Configurable invoice line extractor for browser use.
#[wasm_bindgen]
pub struct InvoiceLineExtractor {
    inner: CoreExtractor,
}

#[wasm_bindgen]
impl InvoiceLineExtractor {
    /// Create an extractor with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: CoreExtractor::new(),
        }
    }

    /// Characters searched for a chain name on each side of an address.
    #[wasm_bindgen]
    pub fn set_chain_window(&mut self, chars: usize) {
        self.inner = self.inner.clone().with_chain_window(chars);
    }

    /// Tokens after an address tried for an amount.
    #[wasm_bindgen]
    pub fn set_token_lookahead(&mut self, tokens: usize) {
        self.inner = self.inner.clone().with_token_lookahead(tokens);
    }

    /// Characters after an address searched for an amount.
    #[wasm_bindgen]
    pub fn set_char_lookahead(&mut self, chars: usize) {
        self.inner = self.inner.clone().with_char_lookahead(chars);
    }

    /// Currency used when none is recognised.
    #[wasm_bindgen]
    pub fn set_default_currency(&mut self, currency: &str) {
        self.inner = self.inner.clone().with_default_currency(currency);
    }

    /// Extract payment lines from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.inner.extract(text))
    }
}

impl Default for InvoiceLineExtractor {
    fn default() -> Self {
        Self::new()
    }
}
