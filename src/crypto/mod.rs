//! Cryptographic operations for program-derived addresses.
//!
//! This module provides:
//! - A 32-byte address type with base-58 text encoding
//! - PDA derivation: SHA-256 over seeds, bump, program id and marker,
//!   rejecting candidates that decompress to an ed25519 point

mod address;
pub mod pda;

pub use address::{Address, ParseAddressError};
pub use pda::{create_program_address, derive, find_program_address, is_on_curve, PdaError};
