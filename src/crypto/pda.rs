//! Program-derived address computation.
//!
//! Matches the runtime's `create_program_address` / `find_program_address`:
//!   candidate = sha256(seed_0 || .. || seed_n || program_id || "ProgramDerivedAddress")
//! A candidate is only a valid PDA when it is *not* a point on the ed25519
//! curve, so nobody can hold a private key for it.

use curve25519_dalek::edwards::CompressedEdwardsY;
use sha2::{Digest, Sha256};

use super::Address;

/// Domain separator appended after the program id.
pub const PDA_MARKER: &[u8; 21] = b"ProgramDerivedAddress";
/// Maximum number of seeds, bump included.
pub const MAX_SEEDS: usize = 16;
/// Maximum length of a single seed in bytes.
pub const MAX_SEED_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PdaError {
    /// Every bump from 255 down to 0 produced an on-curve candidate.
    #[error("no valid program address found for any bump")]
    NoValidAddress,
    /// The candidate hash lies on the ed25519 curve.
    #[error("derived address lies on the ed25519 curve")]
    OnCurve,
    #[error("seed length exceeds 32 bytes")]
    MaxSeedLengthExceeded,
    #[error("more than 16 seeds supplied")]
    TooManySeeds,
}

/// Returns true if the 32 bytes decompress to a point on the ed25519 curve.
#[inline]
pub fn is_on_curve(bytes: &[u8; 32]) -> bool {
    CompressedEdwardsY(*bytes).decompress().is_some()
}

/// Hashes the PDA preimage without the curve check.
#[inline]
pub(crate) fn hash_seeds(seeds: &[&[u8]], program_id: &Address) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update(program_id.as_bytes());
    hasher.update(PDA_MARKER);
    hasher.finalize().into()
}

/// Hashes `seeds || bump || program_id || marker`.
#[inline]
fn hash_seeds_with_bump(seeds: &[&[u8]], bump: u8, program_id: &Address) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update([bump]);
    hasher.update(program_id.as_bytes());
    hasher.update(PDA_MARKER);
    hasher.finalize().into()
}

fn check_seeds(seeds: &[&[u8]]) -> Result<(), PdaError> {
    if seeds.len() > MAX_SEEDS {
        return Err(PdaError::TooManySeeds);
    }
    if seeds.iter().any(|s| s.len() > MAX_SEED_LEN) {
        return Err(PdaError::MaxSeedLengthExceeded);
    }
    Ok(())
}

/// Creates a program address from the exact seeds given (bump included, if any).
pub fn create_program_address(seeds: &[&[u8]], program_id: &Address) -> Result<Address, PdaError> {
    check_seeds(seeds)?;
    let hash = hash_seeds(seeds, program_id);
    if is_on_curve(&hash) {
        return Err(PdaError::OnCurve);
    }
    Ok(Address::from_bytes(hash))
}

/// Finds the canonical (highest valid) bump for `seeds` and the resulting address.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Address,
) -> Result<(Address, u8), PdaError> {
    if seeds.len() >= MAX_SEEDS {
        return Err(PdaError::TooManySeeds);
    }
    check_seeds(seeds)?;

    for bump in (0..=u8::MAX).rev() {
        let hash = hash_seeds_with_bump(seeds, bump, program_id);
        if !is_on_curve(&hash) {
            return Ok((Address::from_bytes(hash), bump));
        }
    }
    Err(PdaError::NoValidAddress)
}

/// Derives the PDA for a vanity seed: seeds = `[seed.to_le_bytes()]`.
///
/// Pure and deterministic; safe to call from any number of threads.
pub fn derive(program_id: &Address, seed: u64) -> Result<(Address, u8), PdaError> {
    find_program_address(&[&seed.to_le_bytes()], program_id)
}
