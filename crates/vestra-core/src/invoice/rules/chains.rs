//! Chain name detection around an address.

use lazy_static::lazy_static;
use regex::Regex;

use super::{chars_after, chars_before};
use crate::models::invoice::Chain;

lazy_static! {
    /// One case-insensitive pattern per chain, in matching priority order.
    /// Spaces inside a name match any run of whitespace ("BNB\nChain").
    static ref CHAIN_PATTERNS: Vec<(Chain, Regex)> = Chain::ALL
        .iter()
        .map(|chain| {
            let words: Vec<String> = chain.label().split(' ').map(regex::escape).collect();
            let pattern = format!(r"(?i){}", words.join(r"\s+"));
            (*chain, Regex::new(&pattern).unwrap())
        })
        .collect();
}

/// Finds the chain named closest in priority to an address.
#[derive(Debug, Clone, Copy)]
pub struct ChainDetector {
    window: usize,
}

impl ChainDetector {
    /// Create a detector looking `window` characters each side of the address.
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Detect the chain for an address starting at byte `offset`.
    ///
    /// Names are plain substring matches, so "Base" also matches inside
    /// "database". The first chain in [`Chain::ALL`] found in the window wins,
    /// regardless of its distance from the address.
    pub fn detect(&self, text: &str, offset: usize) -> Option<Chain> {
        let start = chars_before(text, offset, self.window);
        let end = chars_after(text, offset, self.window);
        detect_in(&text[start..end])
    }
}

impl Default for ChainDetector {
    fn default() -> Self {
        Self::new(350)
    }
}

/// First chain (in priority order) named anywhere in `text`.
pub fn detect_in(text: &str) -> Option<Chain> {
    CHAIN_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(text))
        .map(|(chain, _)| *chain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_case_insensitive() {
        assert_eq!(detect_in("network: ETHEREUM mainnet"), Some(Chain::Ethereum));
        assert_eq!(detect_in("send on arbitrum one"), Some(Chain::Arbitrum));
        assert_eq!(detect_in("no chain mentioned"), None);
    }

    #[test]
    fn test_multi_word_names_span_whitespace() {
        assert_eq!(detect_in("Network: BNB\n   Chain"), Some(Chain::BnbChain));
        assert_eq!(detect_in("x  layer"), Some(Chain::XLayer));
    }

    #[test]
    fn test_priority_follows_list_order() {
        // Polygon precedes Solana in the list even though Solana comes first here.
        assert_eq!(detect_in("Solana or Polygon"), Some(Chain::Polygon));
    }

    #[test]
    fn test_window_limits_search() {
        let address = "0x4f3b892123456789012345678901234567890e92";
        let text = format!("Polygon{}{}", " ".repeat(400), address);
        let offset = text.find(address).unwrap();

        assert_eq!(ChainDetector::new(350).detect(&text, offset), None);
        assert_eq!(ChainDetector::new(410).detect(&text, offset), Some(Chain::Polygon));
    }

    #[test]
    fn test_window_includes_text_after_address() {
        let address = "0x4f3b892123456789012345678901234567890e92";
        let text = format!("{} (Optimism)", address);

        assert_eq!(ChainDetector::default().detect(&text, 0), Some(Chain::Optimism));
    }
}
