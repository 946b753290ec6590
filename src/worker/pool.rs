//! Worker pool: partitions the seed space, fans out CPU workers and fans in
//! their reports.

use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};

use crate::crypto::Address;
use crate::error::SearchError;
use crate::matcher::Suffix;

use super::cpu::{CpuWorker, SeedOrder, WorkerReport, WorkerStats};
use super::{FoundSeed, SearchResult, SeedRange};

/// Everything a search run needs.
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Program whose PDAs are derived
    pub program_id: Address,
    /// Required base-58 suffix
    pub suffix: Suffix,
    /// Seeds to search
    pub space: SeedRange,
    /// Number of worker threads
    pub workers: usize,
    pub order: SeedOrder,
}

impl SearchParams {
    /// Defaults to one worker per CPU and sequential order.
    pub fn new(program_id: Address, suffix: Suffix, space: SeedRange) -> Self {
        Self {
            program_id,
            suffix,
            space,
            workers: num_cpus::get(),
            order: SeedOrder::default(),
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_order(mut self, order: SeedOrder) -> Self {
        self.order = order;
        self
    }
}

/// Searches `space` for a seed whose PDA under `program_id` ends with `suffix`.
///
/// Returns after every worker thread has stopped and been joined. With more
/// than one worker the winner is the first seed found, which is not
/// necessarily the smallest matching seed in `space`.
pub fn search(
    program_id: &Address,
    suffix: &str,
    workers: usize,
    space: SeedRange,
) -> Result<SearchResult, SearchError> {
    let suffix = Suffix::new(suffix)?;
    let params = SearchParams::new(*program_id, suffix, space).with_workers(workers);

    let mut pool = WorkerPool::spawn(params)?;
    let result = pool.wait();
    let seeds = pool.total_seeds();
    let elapsed = pool.elapsed();
    pool.join();

    log::info!(
        "search finished after {} seeds in {:.2?}: {}",
        seeds,
        elapsed,
        match &result {
            SearchResult::Found(f) => format!("seed {} -> {}", f.seed, f.address),
            SearchResult::Exhausted => "exhausted".to_string(),
            SearchResult::Cancelled => "cancelled".to_string(),
        }
    );
    Ok(result)
}

/// Manages the workers of one search run.
pub struct WorkerPool {
    /// Number of workers actually started
    num_workers: usize,
    /// Worker thread handles (Option to allow taking during join)
    handles: Option<Vec<JoinHandle<()>>>,
    report_rx: Receiver<WorkerReport>,
    /// Reports received so far
    reports: Vec<WorkerReport>,
    /// Terminal result, once decided
    outcome: Option<SearchResult>,
    /// Shared cancellation flag
    stop_flag: Arc<AtomicBool>,
    /// Write-once result slot
    winner: Arc<OnceLock<FoundSeed>>,
    stats: Arc<WorkerStats>,
    start_time: Instant,
}

impl WorkerPool {
    /// Validates `params`, partitions the space and starts one thread per
    /// sub-range.
    pub fn spawn(params: SearchParams) -> Result<Self, SearchError> {
        let ranges = params.space.partition(params.workers)?;
        if ranges.len() < params.workers {
            log::debug!(
                "only {} seeds to search, using {} workers instead of {}",
                params.space.len(),
                ranges.len(),
                params.workers
            );
        }

        // Each worker sends exactly one report, so sends never block.
        let (report_tx, report_rx) = bounded(ranges.len());
        let stop_flag = Arc::new(AtomicBool::new(false));
        let winner = Arc::new(OnceLock::new());
        let stats = Arc::new(WorkerStats::new());

        let mut handles = Vec::with_capacity(ranges.len());
        for (id, range) in ranges.iter().copied().enumerate() {
            let worker = CpuWorker::new(
                id,
                range,
                params.clone(),
                report_tx.clone(),
                stop_flag.clone(),
                winner.clone(),
                stats.clone(),
            );

            let spawned = thread::Builder::new()
                .name(format!("pda-vanity-worker-{}", id))
                .spawn(move || worker.run());

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    stop_flag.store(true, Ordering::Relaxed);
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(SearchError::Spawn(e));
                }
            }
        }

        drop(report_tx);

        Ok(Self {
            num_workers: ranges.len(),
            handles: Some(handles),
            report_rx,
            reports: Vec::with_capacity(ranges.len()),
            outcome: None,
            stop_flag,
            winner,
            stats,
            start_time: Instant::now(),
        })
    }

    /// Waits up to `timeout` for the search to be decided.
    ///
    /// Returns `None` if it is still running when the timeout expires, so the
    /// caller can report progress or enforce its own deadline via `stop()`.
    /// A `Found` result is returned as soon as it arrives; stragglers are
    /// left to observe the stop flag and are reaped by `join()`.
    pub fn wait_for_result(&mut self, timeout: Duration) -> Option<SearchResult> {
        if let Some(outcome) = &self.outcome {
            return Some(outcome.clone());
        }

        let deadline = Instant::now().checked_add(timeout);
        loop {
            let received = match deadline {
                Some(deadline) => self.report_rx.recv_deadline(deadline),
                None => self
                    .report_rx
                    .recv()
                    .map_err(|_| RecvTimeoutError::Disconnected),
            };

            match received {
                Ok(report) => {
                    if let Some(outcome) = self.accept(report) {
                        return Some(outcome);
                    }
                }
                Err(RecvTimeoutError::Timeout) => return None,
                Err(RecvTimeoutError::Disconnected) => {
                    log::error!(
                        "{} of {} workers exited without reporting",
                        self.num_workers - self.reports.len(),
                        self.num_workers
                    );
                    return Some(self.settle());
                }
            }
        }
    }

    /// Blocks until the search is decided.
    pub fn wait(&mut self) -> SearchResult {
        loop {
            if let Some(outcome) = self.wait_for_result(Duration::MAX) {
                return outcome;
            }
        }
    }

    fn accept(&mut self, report: WorkerReport) -> Option<SearchResult> {
        let found = report.result.is_found();
        if found {
            self.stop();
        }
        self.reports.push(report);

        if found || self.reports.len() == self.num_workers {
            Some(self.settle())
        } else {
            None
        }
    }

    /// Decides the terminal result from the slot and the reports so far.
    fn settle(&mut self) -> SearchResult {
        let outcome = if let Some(found) = self.winner.get() {
            SearchResult::Found(found.clone())
        } else if self.reports.len() < self.num_workers
            || self
                .reports
                .iter()
                .any(|r| r.result == SearchResult::Cancelled)
        {
            SearchResult::Cancelled
        } else {
            SearchResult::Exhausted
        };
        self.outcome = Some(outcome.clone());
        outcome
    }

    /// Signals all workers to stop.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Stops and joins every worker, returning one report per worker that
    /// managed to send one.
    pub fn join(mut self) -> Vec<WorkerReport> {
        self.stop();
        self.join_handles();
        let late: Vec<WorkerReport> = self.report_rx.try_iter().collect();
        self.reports.extend(late);
        mem::take(&mut self.reports)
    }

    fn join_handles(&mut self) {
        if let Some(handles) = self.handles.take() {
            for handle in handles {
                if handle.join().is_err() {
                    log::error!("worker thread panicked");
                }
            }
        }
    }

    /// Returns the number of workers.
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// The winning seed, if any worker has claimed the slot.
    pub fn winner(&self) -> Option<&FoundSeed> {
        self.winner.get()
    }

    /// Returns the total seeds examined across all workers.
    pub fn total_seeds(&self) -> u64 {
        self.stats.total_seeds()
    }

    /// Returns the number of seeds skipped for lack of an off-curve bump.
    pub fn total_skipped(&self) -> u64 {
        self.stats.total_skipped()
    }

    /// Returns the elapsed time since the pool was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn seeds_per_second(&self) -> f64 {
        let t = self.elapsed().as_secs_f64();
        if t > 0.0 {
            self.total_seeds() as f64 / t
        } else {
            0.0
        }
    }

    /// Returns a clone of the stop flag for external use (e.g., signal handlers).
    pub fn stop_flag_clone(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Returns true if the pool has been signaled to stop.
    pub fn is_stopped(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
        self.join_handles();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::derive;

    fn program() -> Address {
        "7d4pygUVej17wWKY6uiPdFSVPTDKEEAzR4YMmkc1Bss1".parse().unwrap()
    }

    #[test]
    fn test_zero_workers_rejected() {
        let params = SearchParams::new(program(), Suffix::new("pump").unwrap(), SeedRange::FULL)
            .with_workers(0);
        assert!(matches!(
            WorkerPool::spawn(params),
            Err(SearchError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_invalid_suffix_rejected_before_spawn() {
        let err = search(&program(), "0OIl", 2, SeedRange::FULL).unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_workers_clamped_to_seed_count() {
        let space = SeedRange::from_count(10, 3).unwrap();
        let params = SearchParams::new(program(), Suffix::new("zzzzzzzz").unwrap(), space)
            .with_workers(8);
        let mut pool = WorkerPool::spawn(params).unwrap();
        assert_eq!(pool.num_workers(), 3);
        assert_eq!(pool.wait(), SearchResult::Exhausted);
        let reports = pool.join();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports.iter().map(|r| r.seeds_checked).sum::<u64>(), 3);
    }

    #[test]
    fn test_external_stop_cancels() {
        let params = SearchParams::new(
            program(),
            Suffix::new("zzzzzzzzzzzz").unwrap(),
            SeedRange::FULL,
        )
        .with_workers(2);
        let mut pool = WorkerPool::spawn(params).unwrap();
        assert_eq!(pool.wait_for_result(Duration::from_millis(20)), None);
        pool.stop();
        assert_eq!(pool.wait(), SearchResult::Cancelled);
        let reports = pool.join();
        assert!(reports
            .iter()
            .all(|r| r.result == SearchResult::Cancelled));
    }

    #[test]
    fn test_found_result_is_stable() {
        let text = derive(&program(), 77).unwrap().0.to_base58();
        let suffix = Suffix::new(&text[text.len() - 8..]).unwrap();
        let space = SeedRange::from_count(0, 200).unwrap();
        let params = SearchParams::new(program(), suffix, space).with_workers(4);
        let mut pool = WorkerPool::spawn(params).unwrap();
        let first = pool.wait();
        assert_eq!(first.found().map(|f| f.seed), Some(77));
        assert_eq!(pool.wait_for_result(Duration::ZERO), Some(first.clone()));
        assert_eq!(pool.winner().map(|f| f.seed), Some(77));
        pool.join();
    }
}
