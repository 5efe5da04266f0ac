//! Payment line models produced by invoice extraction.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Currency used when none is found next to an amount.
pub const DEFAULT_CURRENCY: &str = "USDC";

/// Amount emitted for an address with no amount nearby.
pub const PLACEHOLDER_AMOUNT: &str = "0";

/// Chains recognised by name in invoice text.
///
/// The order of [`Chain::ALL`] is the matching priority: when several names
/// appear near an address, the earliest one in this list wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chain {
    Ethereum,
    Polygon,
    Arbitrum,
    Base,
    Optimism,
    #[serde(rename = "NEAR")]
    Near,
    Solana,
    #[serde(rename = "BNB Chain")]
    BnbChain,
    Avalanche,
    Gnosis,
    Starknet,
    Sui,
    #[serde(rename = "TON")]
    Ton,
    #[serde(rename = "X Layer")]
    XLayer,
    Monad,
    Berachain,
}

impl Chain {
    /// All chains in matching priority order.
    pub const ALL: [Chain; 16] = [
        Chain::Ethereum,
        Chain::Polygon,
        Chain::Arbitrum,
        Chain::Base,
        Chain::Optimism,
        Chain::Near,
        Chain::Solana,
        Chain::BnbChain,
        Chain::Avalanche,
        Chain::Gnosis,
        Chain::Starknet,
        Chain::Sui,
        Chain::Ton,
        Chain::XLayer,
        Chain::Monad,
        Chain::Berachain,
    ];

    /// Human-readable name, as written on invoices and shown in the app.
    pub fn label(&self) -> &'static str {
        match self {
            Chain::Ethereum => "Ethereum",
            Chain::Polygon => "Polygon",
            Chain::Arbitrum => "Arbitrum",
            Chain::Base => "Base",
            Chain::Optimism => "Optimism",
            Chain::Near => "NEAR",
            Chain::Solana => "Solana",
            Chain::BnbChain => "BNB Chain",
            Chain::Avalanche => "Avalanche",
            Chain::Gnosis => "Gnosis",
            Chain::Starknet => "Starknet",
            Chain::Sui => "Sui",
            Chain::Ton => "TON",
            Chain::XLayer => "X Layer",
            Chain::Monad => "Monad",
            Chain::Berachain => "Berachain",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Chain {
    type Err = String;

    /// Parse a chain label, ignoring case and collapsing internal whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.split_whitespace().collect::<Vec<_>>().join(" ");
        Chain::ALL
            .into_iter()
            .find(|chain| chain.label().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("unknown chain: {}", s))
    }
}

/// A single payment instruction recovered from an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedInvoiceLine {
    /// Chain named near the address, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<Chain>,

    /// Recipient address. Empty for lines found without an address.
    pub address: String,

    /// Amount with `.` as the decimal separator.
    pub amount: String,

    /// Currency code, never empty.
    pub currency: String,

    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParsedInvoiceLine {
    /// Line anchored on a recipient address.
    pub fn new(
        chain: Option<Chain>,
        address: impl Into<String>,
        amount: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            chain,
            address: address.into(),
            amount: amount.into(),
            currency: currency.into(),
            description: None,
        }
    }

    /// Line with an amount but no recipient.
    pub fn amount_only(amount: impl Into<String>, currency: impl Into<String>) -> Self {
        Self::new(None, String::new(), amount, currency)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether the line has a recipient address.
    pub fn has_address(&self) -> bool {
        !self.address.is_empty()
    }

    /// Amount as a decimal, if it parses.
    pub fn amount_decimal(&self) -> Option<Decimal> {
        Decimal::from_str(&self.amount).ok()
    }
}

/// Result of invoice extraction: the payment lines in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedInvoice {
    pub lines: Vec<ParsedInvoiceLine>,
}

impl ParsedInvoice {
    pub fn new(lines: Vec<ParsedInvoiceLine>) -> Self {
        Self { lines }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Sum of line amounts per currency.
    ///
    /// Amounts that do not parse as a decimal, or that would overflow their
    /// currency's running total, are left out of the sum.
    pub fn totals_by_currency(&self) -> BTreeMap<String, Decimal> {
        let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
        for line in &self.lines {
            let Some(amount) = line.amount_decimal() else {
                continue;
            };
            let total = totals.entry(line.currency.clone()).or_insert(Decimal::ZERO);
            match total.checked_add(amount) {
                Some(sum) => *total = sum,
                None => warn!(
                    "Skipping {} {} in totals: sum overflows",
                    line.amount, line.currency
                ),
            }
        }
        totals
    }

    /// Lines whose address is empty or whose amount is the placeholder.
    pub fn incomplete_lines(&self) -> impl Iterator<Item = &ParsedInvoiceLine> {
        self.lines
            .iter()
            .filter(|line| !line.has_address() || line.amount == PLACEHOLDER_AMOUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_chain_labels_serialize() {
        assert_eq!(serde_json::to_string(&Chain::BnbChain).unwrap(), "\"BNB Chain\"");
        assert_eq!(serde_json::to_string(&Chain::Near).unwrap(), "\"NEAR\"");
        assert_eq!(serde_json::to_string(&Chain::Ethereum).unwrap(), "\"Ethereum\"");
        assert_eq!(
            serde_json::from_str::<Chain>("\"X Layer\"").unwrap(),
            Chain::XLayer
        );
    }

    #[test]
    fn test_chain_from_str() {
        assert_eq!("bnb   chain".parse::<Chain>(), Ok(Chain::BnbChain));
        assert_eq!("ton".parse::<Chain>(), Ok(Chain::Ton));
        assert!("Bitcoin".parse::<Chain>().is_err());
    }

    #[test]
    fn test_line_json_field_names() {
        let line = ParsedInvoiceLine::new(
            Some(Chain::Ethereum),
            "0x4f3b892123456789012345678901234567890e92",
            "1000",
            "USDC",
        );
        let json = serde_json::to_value(ParsedInvoice::new(vec![line])).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "lines": [{
                    "chain": "Ethereum",
                    "address": "0x4f3b892123456789012345678901234567890e92",
                    "amount": "1000",
                    "currency": "USDC"
                }]
            })
        );
    }

    #[test]
    fn test_amount_only_line_omits_chain() {
        let line = ParsedInvoiceLine::amount_only("12.50", "EUR").with_description("Design work");
        let json = serde_json::to_value(&line).unwrap();

        assert!(json.get("chain").is_none());
        assert_eq!(json["address"], "");
        assert_eq!(json["description"], "Design work");
    }

    #[test]
    fn test_totals_by_currency() {
        let invoice = ParsedInvoice::new(vec![
            ParsedInvoiceLine::amount_only("100.25", "USDC"),
            ParsedInvoiceLine::amount_only("50", "USDC"),
            ParsedInvoiceLine::amount_only("7", "EUR"),
        ]);

        let totals = invoice.totals_by_currency();
        assert_eq!(totals["USDC"], Decimal::from_str("150.25").unwrap());
        assert_eq!(totals["EUR"], Decimal::from(7));
    }

    #[test]
    fn test_totals_skip_overflowing_amount() {
        let max = "79228162514264337593543950335.0";
        let invoice = ParsedInvoice::new(vec![
            ParsedInvoiceLine::amount_only(max, "USD"),
            ParsedInvoiceLine::amount_only(max, "USD"),
            ParsedInvoiceLine::amount_only("1.5", "EUR"),
        ]);

        let totals = invoice.totals_by_currency();
        assert_eq!(totals["USD"], Decimal::MAX);
        assert_eq!(totals["EUR"], Decimal::from_str("1.5").unwrap());
    }

    #[test]
    fn test_totals_of_extracted_huge_amounts() {
        let invoice = crate::extract_invoice_lines(
            "Item 79228162514264337593543950335.0 USD\nItem 79228162514264337593543950335.0 USD",
        );

        assert_eq!(invoice.len(), 2);
        assert_eq!(invoice.totals_by_currency()["USD"], Decimal::MAX);
    }

    #[test]
    fn test_incomplete_lines() {
        let invoice = ParsedInvoice::new(vec![
            ParsedInvoiceLine::new(None, "alice.near", "0", "USDC"),
            ParsedInvoiceLine::new(None, "bob.near", "10", "USDC"),
            ParsedInvoiceLine::amount_only("5.00", "USDC"),
        ]);

        assert_eq!(invoice.incomplete_lines().count(), 2);
    }
}
