//! Seed-space search: partitioning, CPU workers and the coordinating pool.
//!
//! This module provides:
//! - Contiguous, disjoint partitioning of the `u64` seed space
//! - Multi-threaded CPU workers with cooperative cancellation
//! - A pool that returns the first match and reaps every worker

mod cpu;
mod pool;
mod range;
mod result;

pub use cpu::{CpuWorker, SeedOrder, WorkerReport, WorkerStats};
pub use pool::{search, SearchParams, WorkerPool};
pub use range::SeedRange;
pub use result::{FoundSeed, SearchResult};
