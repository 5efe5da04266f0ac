//! Recipient address extraction (EVM and NEAR accounts).

use std::collections::HashSet;

use super::patterns::{EVM_ADDRESS, NEAR_ACCOUNT};
use super::FieldExtractor;

/// Address grammar a candidate was matched with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    /// `0x` followed by 40 hex characters.
    Evm,
    /// Named account ending in `.near` or `.testnet`.
    Near,
}

/// An address found in invoice text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressCandidate {
    /// Address exactly as written.
    pub value: String,
    /// Byte offset of the first occurrence.
    pub offset: usize,
    pub kind: AddressKind,
}

impl AddressCandidate {
    /// Byte offset just past the first occurrence.
    pub fn end(&self) -> usize {
        self.offset + self.value.len()
    }
}

/// Address extractor.
///
/// Runs the EVM pass, then the NEAR pass, and keeps the first occurrence of
/// each distinct string. Comparison is exact: differently-cased spellings of
/// the same EVM address are kept as separate candidates.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressExtractor;

impl AddressExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for AddressExtractor {
    type Output = AddressCandidate;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let evm = EVM_ADDRESS.find_iter(text).map(|m| (m, AddressKind::Evm));
        let near = NEAR_ACCOUNT.find_iter(text).map(|m| (m, AddressKind::Near));

        let mut seen = HashSet::new();
        evm.chain(near)
            .filter(|(m, _)| seen.insert(m.as_str()))
            .map(|(m, kind)| AddressCandidate {
                value: m.as_str().to_string(),
                offset: m.start(),
                kind,
            })
            .collect()
    }
}

/// Check whether the whole string is an EVM address.
pub fn is_evm_address(s: &str) -> bool {
    s.len() == 42 && s.starts_with("0x") && s[2..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Check whether the whole string is a NEAR account name.
pub fn is_near_account(s: &str) -> bool {
    NEAR_ACCOUNT
        .find(s)
        .is_some_and(|m| m.start() == 0 && m.end() == s.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ADDR_A: &str = "0x4f3b892123456789012345678901234567890e92";
    const ADDR_B: &str = "0x1111111111111111111111111111111111111111";

    #[test]
    fn test_evm_pass_runs_before_near_pass() {
        let text = format!("bob.near first, then {}", ADDR_A);
        let values: Vec<String> = AddressExtractor::new()
            .extract_all(&text)
            .into_iter()
            .map(|c| c.value)
            .collect();

        assert_eq!(values, vec![ADDR_A.to_string(), "bob.near".to_string()]);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let text = format!("{} 10\n{} 20\n{} 30", ADDR_A, ADDR_B, ADDR_A);
        let candidates = AddressExtractor::new().extract_all(&text);

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].value, ADDR_A);
        assert_eq!(candidates[0].offset, 0);
        assert_eq!(candidates[1].value, ADDR_B);
    }

    #[test]
    fn test_dedup_is_case_sensitive() {
        let upper = ADDR_A.replace("f3b", "F3B");
        let text = format!("{} and {}", ADDR_A, upper);

        assert_eq!(AddressExtractor::new().extract_all(&text).len(), 2);
    }

    #[test]
    fn test_candidate_offsets() {
        let text = format!("pay {}", ADDR_A);
        let candidate = AddressExtractor::new().extract(&text).unwrap();

        assert_eq!(candidate.offset, 4);
        assert_eq!(candidate.end(), text.len());
        assert_eq!(candidate.kind, AddressKind::Evm);
    }

    #[test]
    fn test_candidate_kinds() {
        let text = format!("carol.testnet {}", ADDR_B);
        let kinds: Vec<AddressKind> = AddressExtractor::new()
            .extract_all(&text)
            .into_iter()
            .map(|c| c.kind)
            .collect();

        assert_eq!(kinds, vec![AddressKind::Evm, AddressKind::Near]);
    }

    #[test]
    fn test_is_evm_address() {
        assert!(is_evm_address(ADDR_A));
        assert!(!is_evm_address("0x123"));
        assert!(!is_evm_address("0xZZ3b892123456789012345678901234567890e92"));
    }

    #[test]
    fn test_is_near_account() {
        assert!(is_near_account("alice.near"));
        assert!(is_near_account("team_pay.testnet"));
        assert!(!is_near_account("alice.eth"));
        assert!(!is_near_account("pay alice.near"));
    }
}
