//! Configuration structures for PDF decoding and line extraction.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VestraError};

/// Main configuration for vestra.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VestraConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Invoice line extraction configuration.
    pub extraction: ExtractionConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Largest accepted document, in bytes.
    pub max_file_size: usize,

    /// Minimum text length to consider the PDF as text-based.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
            min_text_length: 1,
        }
    }
}

/// Invoice line extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Characters searched for a chain name on each side of an address.
    pub chain_window: usize,

    /// Whitespace-separated tokens scanned for an amount after an address.
    pub token_lookahead: usize,

    /// Characters after an address searched when the token scan finds nothing.
    pub char_lookahead: usize,

    /// Currency used when none is found next to an amount.
    pub default_currency: String,

    /// Currency codes accepted in addition to the built-in list.
    pub extra_currencies: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            chain_window: 350,
            token_lookahead: 4,
            char_lookahead: 200,
            default_currency: crate::models::invoice::DEFAULT_CURRENCY.to_string(),
            extra_currencies: Vec::new(),
        }
    }
}

impl VestraConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| VestraError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| VestraError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
