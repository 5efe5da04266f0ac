//! Amount and currency extraction for payment invoices.

use regex::Captures;

use super::patterns::{AMOUNT_WITH_CURRENCY, BARE_AMOUNT, TOKEN_AMOUNT};
use super::{chars_after, ExtractionMatch, FieldExtractor};
use crate::models::invoice::DEFAULT_CURRENCY;

/// Currency codes accepted next to an amount.
const KNOWN_CURRENCIES: &[&str] = &[
    // Stablecoins and fiat
    "USDC", "USDT", "DAI", "EURC", "PYUSD", "FDUSD", "USDE", "USD", "EUR", "GBP", "CHF", "CAD",
    "AUD", "JPY", "PLN",
    // Native and wrapped tokens
    "ETH", "WETH", "BTC", "WBTC", "NEAR", "SOL", "BNB", "AVAX", "MATIC", "POL", "OP", "ARB",
    "XDAI", "GNO", "STRK", "SUI", "TON", "OKB", "MON", "BERA",
];

/// Check whether a currency code is in the built-in list (case-insensitive).
pub fn is_known_currency(code: &str) -> bool {
    KNOWN_CURRENCIES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(code))
}

/// An amount paired with its currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountToken {
    /// Numeric string with `.` as the decimal separator.
    pub amount: String,
    /// Uppercased currency code.
    pub currency: String,
}

/// Amount field extractor.
///
/// Used in two ways: anchored after a known address
/// ([`AmountExtractor::near_address`]), or as a whole-text scan through
/// [`FieldExtractor`] when an invoice has no addresses at all.
#[derive(Debug, Clone)]
pub struct AmountExtractor {
    token_lookahead: usize,
    char_lookahead: usize,
    default_currency: String,
    extra_currencies: Vec<String>,
}

impl AmountExtractor {
    pub fn new() -> Self {
        Self {
            token_lookahead: 4,
            char_lookahead: 200,
            default_currency: DEFAULT_CURRENCY.to_string(),
            extra_currencies: Vec::new(),
        }
    }

    /// Set how many tokens after the address are tried.
    pub fn with_token_lookahead(mut self, tokens: usize) -> Self {
        self.token_lookahead = tokens;
        self
    }

    /// Set how many characters after the address are searched.
    pub fn with_char_lookahead(mut self, chars: usize) -> Self {
        self.char_lookahead = chars;
        self
    }

    /// Set the currency used when none is recognised.
    pub fn with_default_currency(mut self, currency: impl Into<String>) -> Self {
        self.default_currency = currency.into();
        self
    }

    /// Accept additional currency codes.
    pub fn with_extra_currencies(mut self, currencies: Vec<String>) -> Self {
        self.extra_currencies = currencies;
        self
    }

    pub fn default_currency(&self) -> &str {
        &self.default_currency
    }

    /// Find the amount for `address`, which ends at byte `address_end`.
    ///
    /// The token scan runs first; the character lookahead only runs when it
    /// finds nothing.
    pub fn near_address(&self, text: &str, address: &str, address_end: usize) -> Option<AmountToken> {
        self.from_tokens(text, address)
            .or_else(|| self.from_lookahead(text, address_end))
    }

    /// Look for a token that is entirely an amount among the tokens following
    /// the first token containing `address`.
    pub fn from_tokens(&self, text: &str, address: &str) -> Option<AmountToken> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let index = tokens.iter().position(|token| token.contains(address))?;

        tokens
            .iter()
            .skip(index + 1)
            .take(self.token_lookahead)
            .find_map(|token| TOKEN_AMOUNT.captures(token))
            .map(|caps| AmountToken {
                amount: caps[1].replace(',', "."),
                currency: self.resolve_currency(caps.get(2).map(|m| m.as_str())),
            })
    }

    /// Look for the first amount in the characters right after the address.
    pub fn from_lookahead(&self, text: &str, address_end: usize) -> Option<AmountToken> {
        let end = chars_after(text, address_end, self.char_lookahead);
        AMOUNT_WITH_CURRENCY
            .captures(&text[address_end..end])
            .map(|caps| self.token_from_captures(&caps))
    }

    fn token_from_captures(&self, caps: &Captures<'_>) -> AmountToken {
        let amount = match (caps.name("grouped"), caps.name("plain")) {
            (Some(grouped), _) => grouped.as_str().replace(',', ""),
            (None, Some(plain)) => plain.as_str().replace(',', "."),
            (None, None) => String::new(),
        };

        AmountToken {
            amount,
            currency: self.resolve_currency(caps.name("currency").map(|m| m.as_str())),
        }
    }

    /// Uppercase a recognised currency, or fall back to the default.
    pub fn resolve_currency(&self, letters: Option<&str>) -> String {
        match letters {
            Some(code) if is_known_currency(code) || self.is_extra_currency(code) => {
                code.to_uppercase()
            }
            _ => self.default_currency.clone(),
        }
    }

    fn is_extra_currency(&self, code: &str) -> bool {
        self.extra_currencies
            .iter()
            .any(|extra| extra.eq_ignore_ascii_case(code))
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<AmountToken>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    /// Every positive amount with a decimal separator in the text.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for caps in BARE_AMOUNT.captures_iter(text) {
            let token = self.token_from_captures(&caps);
            let positive = token
                .amount
                .parse::<f64>()
                .is_ok_and(|value| value.is_finite() && value > 0.0);

            if positive {
                let full_match = &caps[0];
                let (start, end) = caps
                    .get(0)
                    .map(|m| (m.start(), m.end()))
                    .unwrap_or_default();
                results.push(ExtractionMatch::new(token, full_match).with_position(start, end));
            }
        }

        results
    }
}
