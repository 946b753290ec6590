//! Suffix matching for base-58 encoded addresses.
//!
//! A match is a literal, case-sensitive trailing-substring comparison on the
//! canonical base-58 text of the 32-byte address.

mod suffix;

pub use suffix::{matches, Suffix, BASE58_ALPHABET, MAX_ENCODED_LEN};
