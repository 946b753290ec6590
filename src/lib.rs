//! # pda_vanity
//!
//! Vanity seed miner for Solana program-derived addresses (PDAs). Varies a
//! `u64` seed until `find_program_address([seed.to_le_bytes()], program_id)`
//! yields an address whose base-58 form ends with a chosen suffix.
//!
//! ## Architecture
//!
//! - `crypto`: Address type and PDA derivation
//! - `matcher`: Base-58 suffix matching
//! - `worker`: Seed partitioning, CPU workers and the coordinating pool
//! - `config`: Command-line configuration

pub mod config;
pub mod crypto;
pub mod error;
pub mod matcher;
pub mod worker;

pub use config::Config;
pub use crypto::{derive, Address, PdaError};
pub use error::SearchError;
pub use matcher::Suffix;
pub use worker::{search, FoundSeed, SearchParams, SearchResult, SeedRange, WorkerPool};
