//! Seed ranges and their partitioning across workers.

use std::fmt;
use std::ops::RangeInclusive;

use crate::error::SearchError;

/// A non-empty, inclusive range of `u64` seeds.
///
/// Inclusive bounds let the full `0..=u64::MAX` domain be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeedRange {
    first: u64,
    last: u64,
}

impl SeedRange {
    /// Every `u64` seed.
    pub const FULL: SeedRange = SeedRange {
        first: 0,
        last: u64::MAX,
    };

    /// Creates `first..=last`; fails if the range would be empty.
    pub fn new(first: u64, last: u64) -> Result<Self, SearchError> {
        if first > last {
            return Err(SearchError::config(format!(
                "seed range is empty ({} > {})",
                first, last
            )));
        }
        Ok(Self { first, last })
    }

    /// Creates the range of `count` seeds starting at `start`.
    pub fn from_count(start: u64, count: u64) -> Result<Self, SearchError> {
        if count == 0 {
            return Err(SearchError::config("seed count must be at least 1"));
        }
        let last = start.checked_add(count - 1).ok_or_else(|| {
            SearchError::config(format!(
                "{} seeds starting at {} overflow the u64 seed space",
                count, start
            ))
        })?;
        Self::new(start, last)
    }

    /// Creates the range from `start` to `u64::MAX`.
    pub fn starting_at(start: u64) -> Self {
        Self {
            first: start,
            last: u64::MAX,
        }
    }

    pub fn first(&self) -> u64 {
        self.first
    }

    pub fn last(&self) -> u64 {
        self.last
    }

    /// Number of seeds in the range (up to 2^64, hence `u128`).
    pub fn len(&self) -> u128 {
        u128::from(self.last - self.first) + 1
    }

    /// Always false; an empty range cannot be constructed.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, seed: u64) -> bool {
        (self.first..=self.last).contains(&seed)
    }

    pub fn iter(&self) -> RangeInclusive<u64> {
        self.first..=self.last
    }

    /// Splits the range into contiguous, pairwise disjoint sub-ranges whose
    /// union is `self`, in ascending order.
    ///
    /// Sizes differ by at most one. When `parts` exceeds the number of seeds
    /// only one sub-range per seed is returned.
    pub fn partition(&self, parts: usize) -> Result<Vec<SeedRange>, SearchError> {
        if parts == 0 {
            return Err(SearchError::config("worker count must be at least 1"));
        }

        let total = self.len();
        let parts = (parts as u128).min(total);
        let base = total / parts;
        let extra = total % parts;

        let mut ranges = Vec::with_capacity(parts as usize);
        let mut cursor = u128::from(self.first);
        for i in 0..parts {
            let size = base + u128::from(i < extra);
            let last = cursor + size - 1;
            ranges.push(SeedRange {
                first: cursor as u64,
                last: last as u64,
            });
            cursor = last + 1;
        }
        Ok(ranges)
    }
}

impl fmt::Display for SeedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.first, self.last)
    }
}
