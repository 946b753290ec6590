//! Suffix matching implementation.

use std::fmt;

use crate::crypto::Address;
use crate::error::SearchError;

/// The Bitcoin/Solana base-58 alphabet (no `0`, `O`, `I`, `l`).
pub const BASE58_ALPHABET: &[u8; 58] =
    b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Longest base-58 encoding of 32 bytes.
pub const MAX_ENCODED_LEN: usize = 44;

/// Plain contract form: encode `address` and test for a trailing `suffix`.
pub fn matches(address: &Address, suffix: &str) -> bool {
    address.to_base58().ends_with(suffix)
}

/// A validated, precompiled suffix.
#[derive(Clone, PartialEq, Eq)]
pub struct Suffix {
    /// The suffix as typed
    suffix: String,
    /// Alphabet index of each character, last character first
    digits_rev: Vec<u8>,
}

impl Suffix {
    /// Validates `suffix` and precomputes its base-58 digit values.
    pub fn new(suffix: impl Into<String>) -> Result<Self, SearchError> {
        let suffix = suffix.into();

        if suffix.is_empty() {
            return Err(SearchError::config("suffix cannot be empty"));
        }
        if suffix.len() > MAX_ENCODED_LEN {
            return Err(SearchError::config(format!(
                "suffix cannot be longer than {} characters (full address)",
                MAX_ENCODED_LEN
            )));
        }

        let digits_rev = suffix
            .chars()
            .rev()
            .map(|c| {
                BASE58_ALPHABET
                    .iter()
                    .position(|&a| c.is_ascii() && a == c as u8)
                    .map(|i| i as u8)
                    .ok_or_else(|| {
                        SearchError::config(format!(
                            "suffix contains '{}', which is not a base-58 character",
                            c
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { suffix, digits_rev })
    }

    /// Returns the suffix string.
    pub fn as_str(&self) -> &str {
        &self.suffix
    }

    /// Number of characters in the suffix.
    pub fn len(&self) -> usize {
        self.digits_rev.len()
    }

    /// Always false for a constructed suffix.
    pub fn is_empty(&self) -> bool {
        self.digits_rev.is_empty()
    }

    /// Matches an address against this suffix.
    #[inline]
    pub fn matches(&self, address: &Address) -> bool {
        self.matches_bytes(address.as_bytes())
    }

    /// Matches raw address bytes against this suffix.
    ///
    /// The low-order base-58 digits are peeled off by long division first;
    /// only candidates that survive are fully encoded and compared.
    #[inline]
    pub fn matches_bytes(&self, bytes: &[u8; 32]) -> bool {
        self.trailing_digits_match(bytes)
            && bs58::encode(bytes).into_string().ends_with(&self.suffix)
    }

    /// Compares the last `len()` base-58 digits of `bytes` with the suffix.
    ///
    /// Never rejects a true match: digits past the top of the number come out
    /// as zero, which is also how leading zero bytes encode ('1').
    #[inline]
    fn trailing_digits_match(&self, bytes: &[u8; 32]) -> bool {
        let mut n = *bytes;
        for &target in &self.digits_rev {
            let mut remainder = 0u32;
            for byte in n.iter_mut() {
                let acc = (remainder << 8) | u32::from(*byte);
                *byte = (acc / 58) as u8;
                remainder = acc % 58;
            }
            if remainder as u8 != target {
                return false;
            }
        }
        true
    }

    /// Expected number of seeds to try before a hit: 58^len.
    pub fn estimated_difficulty(&self) -> u64 {
        58u64.saturating_pow(self.len() as u32)
    }

    /// Returns a human-readable difficulty estimate.
    pub fn difficulty_description(&self) -> String {
        let diff = self.estimated_difficulty();
        match diff {
            0..=1_000 => "Very Easy (< 1 second)".into(),
            1_001..=100_000 => "Easy (seconds)".into(),
            100_001..=100_000_000 => "Medium (minutes)".into(),
            100_000_001..=10_000_000_000 => "Hard (hours)".into(),
            _ => "Very Hard (days or more)".into(),
        }
    }
}

impl fmt::Debug for Suffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Suffix({:?})", self.suffix)
    }
}

impl fmt::Display for Suffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::derive;

    fn golden() -> Address {
        "HZTPCxeTBLEr5FfUkjzLixXduWCzhgzjhvoNrKVspump".parse().unwrap()
    }

    #[test]
    fn test_suffix_match() {
        let addr = golden();
        assert!(Suffix::new("pump").unwrap().matches(&addr));
        assert!(Suffix::new("Vspump").unwrap().matches(&addr));
        assert!(matches(&addr, "pump"));
    }

    #[test]
    fn test_suffix_is_case_sensitive() {
        let addr = golden();
        assert!(!Suffix::new("PUMP").unwrap().matches(&addr));
        assert!(!Suffix::new("Pump").unwrap().matches(&addr));
        assert!(!matches(&addr, "PUMP"));
    }

    #[test]
    fn test_suffix_no_match() {
        let addr = golden();
        assert!(!Suffix::new("pum").unwrap().matches(&addr));
        assert!(!Suffix::new("xpump").unwrap().matches(&addr));
    }

    #[test]
    fn test_zero_address_matches_ones() {
        let addr = Address::from_bytes([0u8; 32]);
        assert!(Suffix::new("1111").unwrap().matches(&addr));
        assert!(!Suffix::new("2").unwrap().matches(&addr));
    }

    #[test]
    fn test_prefilter_agrees_with_encoding() {
        let pid: Address = "7d4pygUVej17wWKY6uiPdFSVPTDKEEAzR4YMmkc1Bss1".parse().unwrap();
        let candidates = ["p", "pump", "z", "11", "A1b"];
        for seed in 0u64..200 {
            let (addr, _) = derive(&pid, seed).unwrap();
            let text = addr.to_base58();
            for k in 1..=6 {
                let tail = &text[text.len() - k..];
                assert!(Suffix::new(tail).unwrap().matches(&addr), "{text} / {tail}");
            }
            for candidate in candidates {
                assert_eq!(
                    Suffix::new(candidate).unwrap().matches(&addr),
                    text.ends_with(candidate)
                );
            }
        }
    }

    #[test]
    fn test_invalid_suffixes() {
        assert!(Suffix::new("").is_err());
        assert!(Suffix::new("pum0").is_err());
        assert!(Suffix::new("Ol").is_err());
        assert!(Suffix::new("2".repeat(MAX_ENCODED_LEN + 1)).is_err());
        assert!(Suffix::new("2".repeat(MAX_ENCODED_LEN)).is_ok());
    }

    #[test]
    fn test_invalid_multibyte_char_named_in_error() {
        let err = Suffix::new("pum\u{e9}").unwrap_err().to_string();
        assert!(err.contains("'\u{e9}'"), "{err}");
        assert!(!err.contains('\u{a9}'), "{err}");
    }

    #[test]
    fn test_difficulty() {
        assert_eq!(Suffix::new("pump").unwrap().estimated_difficulty(), 11_316_496); // 58^4
    }
}
