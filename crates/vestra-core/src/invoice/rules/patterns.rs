//! Common regex patterns for payment invoice extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Recipient addresses
    pub static ref EVM_ADDRESS: Regex = Regex::new(
        r"0x[a-fA-F0-9]{40}"
    ).unwrap();

    pub static ref NEAR_ACCOUNT: Regex = Regex::new(
        r"[A-Za-z0-9._-]{2,64}\.(?:near|testnet)"
    ).unwrap();

    // Amount in a single whitespace-delimited token ("1000", "12,5", "250USDT")
    pub static ref TOKEN_AMOUNT: Regex = Regex::new(
        r"^(\d{1,20}(?:[.,]\d+)?)\s*([A-Za-z]{2,10})?$"
    ).unwrap();

    // Amount shortly after an address ("1,234.50 EUR", "1000", "12,5 USDC")
    pub static ref AMOUNT_WITH_CURRENCY: Regex = Regex::new(
        r"\b(?:(?P<grouped>\d{1,3}(?:,\d{3})+(?:\.\d+)?)|(?P<plain>\d+(?:[.,]\d+)?))\s*(?P<currency>[A-Za-z]{2,10})?"
    ).unwrap();

    // Amount anywhere in the text, decimal separator required
    pub static ref BARE_AMOUNT: Regex = Regex::new(
        r"\b(?:(?P<grouped>\d{1,3}(?:,\d{3})+(?:\.\d+)?)|(?P<plain>\d+[.,]\d+))\s*(?P<currency>[A-Za-z]{2,10})?"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evm_address_pattern() {
        let m = EVM_ADDRESS
            .find("to: 0x4f3b892123456789012345678901234567890e92.")
            .unwrap();
        assert_eq!(m.as_str(), "0x4f3b892123456789012345678901234567890e92");
        assert!(!EVM_ADDRESS.is_match("0x4f3b89"));
    }

    #[test]
    fn test_near_account_pattern() {
        let found: Vec<&str> = NEAR_ACCOUNT
            .find_iter("pay alice.near and bob-2.testnet, not x.near")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(found, vec!["alice.near", "bob-2.testnet"]);
    }

    #[test]
    fn test_token_amount_is_anchored() {
        assert!(TOKEN_AMOUNT.is_match("1000"));
        assert!(TOKEN_AMOUNT.is_match("250usdt"));
        assert!(!TOKEN_AMOUNT.is_match("Amount:1000"));
        assert!(!TOKEN_AMOUNT.is_match("1,234.50"));
    }

    #[test]
    fn test_grouped_amount_preferred() {
        let caps = AMOUNT_WITH_CURRENCY.captures("total 1,234.50 EUR").unwrap();
        assert_eq!(&caps["grouped"], "1,234.50");
        assert_eq!(&caps["currency"], "EUR");
    }

    #[test]
    fn test_bare_amount_requires_separator() {
        assert!(!BARE_AMOUNT.is_match("Invoice 2024"));
        assert!(BARE_AMOUNT.is_match("Total 99.90"));
        assert!(!BARE_AMOUNT.is_match("v2.1"));
    }
}
