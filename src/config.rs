//! Runtime configuration for PDA vanity seed mining.

use std::time::Duration;

use clap::Parser;

use crate::crypto::Address;
use crate::error::SearchError;
use crate::matcher::Suffix;
use crate::worker::{SearchParams, SeedOrder, SeedRange};

/// Program the miner targets when none is given.
pub const DEFAULT_PROGRAM_ID: &str = "7d4pygUVej17wWKY6uiPdFSVPTDKEEAzR4YMmkc1Bss1";

/// PDA Vanity Seed Miner
///
/// Searches u64 seeds until the PDA derived from `[seed.to_le_bytes()]`
/// under the program id ends with the given base-58 suffix.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Suffix the PDA must end with (base-58 characters, case sensitive)
    #[arg(short, long, default_value = "pump")]
    pub suffix: String,

    /// Program id (base-58) the PDA is derived for
    #[arg(short, long, default_value = DEFAULT_PROGRAM_ID)]
    pub program_id: String,

    /// Number of worker threads (default: number of CPU cores)
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// First seed of the search space
    #[arg(long, default_value = "0")]
    pub start: u64,

    /// Number of seeds to search (default: up to u64::MAX)
    #[arg(short = 'n', long)]
    pub count: Option<u64>,

    /// Start each worker at a random point of its sub-range
    #[arg(long)]
    pub random_start: bool,

    /// Give up after this many seconds (0 = no limit)
    #[arg(short = 'T', long, default_value = "0")]
    pub timeout: u64,

    /// Progress report interval in seconds
    #[arg(short = 'r', long, default_value = "5")]
    pub report_interval: u64,
}

impl Config {
    /// Returns the number of workers, defaulting to CPU count.
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }

    /// Validates the configuration without starting anything.
    pub fn validate(&self) -> Result<(), SearchError> {
        self.search_params().map(|_| ())
    }

    pub fn program_id(&self) -> Result<Address, SearchError> {
        self.program_id
            .parse()
            .map_err(|e| SearchError::config(format!("program id '{}': {}", self.program_id, e)))
    }

    pub fn suffix(&self) -> Result<Suffix, SearchError> {
        Suffix::new(self.suffix.as_str())
    }

    /// The configured seed space.
    pub fn seed_range(&self) -> Result<SeedRange, SearchError> {
        match self.count {
            Some(count) => SeedRange::from_count(self.start, count),
            None => Ok(SeedRange::starting_at(self.start)),
        }
    }

    pub fn seed_order(&self) -> SeedOrder {
        if self.random_start {
            SeedOrder::RandomStart
        } else {
            SeedOrder::Sequential
        }
    }

    /// Caller deadline, if any.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout > 0).then(|| Duration::from_secs(self.timeout))
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval)
    }

    /// Builds the search parameters, failing fast on any invalid field.
    pub fn search_params(&self) -> Result<SearchParams, SearchError> {
        let workers = self.worker_count();
        if workers == 0 {
            return Err(SearchError::config("worker count must be at least 1"));
        }
        if self.report_interval == 0 {
            return Err(SearchError::config("report interval must be at least 1 second"));
        }

        Ok(
            SearchParams::new(self.program_id()?, self.suffix()?, self.seed_range()?)
                .with_workers(workers)
                .with_order(self.seed_order()),
        )
    }
}
