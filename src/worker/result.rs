//! Search results.

use crate::crypto::{derive, Address};

/// A seed whose canonical PDA ends with the requested suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundSeed {
    /// The vanity seed, passed on-chain as 8 little-endian bytes.
    pub seed: u64,
    /// The derived program address.
    pub address: Address,
    /// Canonical bump for `seed`.
    pub bump: u8,
    /// Worker ID that found it.
    pub worker_id: usize,
}

impl FoundSeed {
    /// Seed as it appears in the instruction payload.
    pub fn seed_le_bytes(&self) -> [u8; 8] {
        self.seed.to_le_bytes()
    }

    /// Seed payload bytes as hex (no 0x).
    pub fn seed_le_hex(&self) -> String {
        hex::encode(self.seed_le_bytes())
    }

    /// Re-derives the address from scratch and checks it against this result.
    pub fn verify(&self, program_id: &Address) -> bool {
        derive(program_id, self.seed) == Ok((self.address, self.bump))
    }
}

/// Outcome of a worker or of a whole search run.
///
/// The winning seed is whichever a worker reached first, not necessarily the
/// numerically smallest match in the space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult {
    /// A matching seed was found.
    Found(FoundSeed),
    /// The seed range was fully searched without a match.
    Exhausted,
    /// Stopped early: another worker won, or the caller cancelled.
    Cancelled,
}

impl SearchResult {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchResult::Found(_))
    }

    pub fn found(&self) -> Option<&FoundSeed> {
        match self {
            SearchResult::Found(found) => Some(found),
            _ => None,
        }
    }

    pub fn into_found(self) -> Option<FoundSeed> {
        match self {
            SearchResult::Found(found) => Some(found),
            _ => None,
        }
    }
}
