//! CPU worker for PDA vanity seed mining.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use crossbeam_channel::Sender;
use rand::Rng;

use crate::crypto::derive;

use super::{FoundSeed, SearchParams, SearchResult, SeedRange};

/// Order in which a worker visits the seeds of its range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedOrder {
    /// Ascending from the first seed; reproducible and resumable.
    #[default]
    Sequential,
    /// Ascending from a random seed inside the range, wrapping around to the
    /// start. Still visits every seed exactly once.
    RandomStart,
}

/// Shared counters across all workers.
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Seeds examined
    pub seeds_checked: AtomicU64,
    /// Seeds with no off-curve bump
    pub seeds_skipped: AtomicU64,
}

impl WorkerStats {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn total_seeds(&self) -> u64 {
        self.seeds_checked.load(Ordering::Relaxed)
    }
    pub fn total_skipped(&self) -> u64 {
        self.seeds_skipped.load(Ordering::Relaxed)
    }
}

/// The single message each worker sends when it stops.
#[derive(Debug, Clone)]
pub struct WorkerReport {
    pub worker_id: usize,
    /// The sub-range this worker owned.
    pub range: SeedRange,
    pub result: SearchResult,
    /// Seeds this worker examined before stopping.
    pub seeds_checked: u64,
}

pub struct CpuWorker {
    id: usize,
    range: SeedRange,
    params: SearchParams,
    report_tx: Sender<WorkerReport>,
    stop_flag: Arc<AtomicBool>,
    winner: Arc<OnceLock<FoundSeed>>,
    stats: Arc<WorkerStats>,
}

impl CpuWorker {
    pub fn new(
        id: usize,
        range: SeedRange,
        params: SearchParams,
        report_tx: Sender<WorkerReport>,
        stop_flag: Arc<AtomicBool>,
        winner: Arc<OnceLock<FoundSeed>>,
        stats: Arc<WorkerStats>,
    ) -> Self {
        Self {
            id,
            range,
            params,
            report_tx,
            stop_flag,
            winner,
            stats,
        }
    }

    /// Scans the range until a match, exhaustion, or the stop flag, then
    /// sends exactly one report.
    pub fn run(&self) {
        log::debug!("worker {} scanning {}", self.id, self.range);

        let (result, seeds_checked) = self.scan();

        log::debug!(
            "worker {} stopped after {} seeds: {:?}",
            self.id,
            seeds_checked,
            result
        );

        let report = WorkerReport {
            worker_id: self.id,
            range: self.range,
            result,
            seeds_checked,
        };
        // The pool may already be gone if the caller dropped it.
        let _ = self.report_tx.send(report);
    }

    fn scan(&self) -> (SearchResult, u64) {
        // Flush the shared counter in batches to reduce atomic contention
        const BATCH_SIZE: u64 = 1024;

        let mut checked = 0u64;
        let mut pending = 0u64;

        for seed in self.seeds() {
            if self.stop_flag.load(Ordering::Relaxed) {
                self.flush(pending);
                return (SearchResult::Cancelled, checked);
            }

            let hit = self.check(seed);
            checked += 1;
            pending += 1;

            if let Some(found) = hit {
                self.flush(pending);
                // First writer wins; a late finder reports itself cancelled.
                if self.winner.set(found.clone()).is_ok() {
                    self.stop_flag.store(true, Ordering::Relaxed);
                    return (SearchResult::Found(found), checked);
                }
                return (SearchResult::Cancelled, checked);
            }

            if pending == BATCH_SIZE {
                self.flush(pending);
                pending = 0;
            }
        }

        self.flush(pending);
        (SearchResult::Exhausted, checked)
    }

    fn seeds(&self) -> impl Iterator<Item = u64> {
        let (first, last) = (self.range.first(), self.range.last());
        let start = match self.params.order {
            SeedOrder::Sequential => first,
            SeedOrder::RandomStart => rand::thread_rng().gen_range(first..=last),
        };
        (start..=last).chain(first..start)
    }

    /// Derives the canonical PDA for `seed` and tests it against the suffix.
    #[inline]
    fn check(&self, seed: u64) -> Option<FoundSeed> {
        match derive(&self.params.program_id, seed) {
            Ok((address, bump)) => self.params.suffix.matches(&address).then(|| FoundSeed {
                seed,
                address,
                bump,
                worker_id: self.id,
            }),
            Err(e) => {
                self.stats.seeds_skipped.fetch_add(1, Ordering::Relaxed);
                log::warn!("skipping seed {}: {}", seed, e);
                None
            }
        }
    }

    #[inline]
    fn flush(&self, pending: u64) {
        if pending > 0 {
            self.stats.seeds_checked.fetch_add(pending, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    use crate::crypto::Address;
    use crate::matcher::Suffix;
    use crossbeam_channel::bounded;

    fn program() -> Address {
        "7d4pygUVej17wWKY6uiPdFSVPTDKEEAzR4YMmkc1Bss1".parse().unwrap()
    }

    fn run_worker(params: SearchParams, range: SeedRange, stop: bool) -> WorkerReport {
        let (tx, rx) = bounded(1);
        let worker = CpuWorker::new(
            3,
            range,
            params,
            tx,
            Arc::new(AtomicBool::new(stop)),
            Arc::new(OnceLock::new()),
            Arc::new(WorkerStats::new()),
        );
        worker.run();
        rx.try_recv().unwrap()
    }

    /// Suffix made of the last `k` characters of the PDA for `seed`.
    fn tail_of(seed: u64, k: usize) -> Suffix {
        let text = derive(&program(), seed).unwrap().0.to_base58();
        Suffix::new(&text[text.len() - k..]).unwrap()
    }

    #[test]
    fn test_finds_planted_seed() {
        let range = SeedRange::from_count(500, 50).unwrap();
        let params = SearchParams::new(program(), tail_of(520, 8), range);
        let report = run_worker(params, range, false);
        let found = report.result.found().unwrap();
        assert_eq!(found.seed, 520);
        assert_eq!(found.worker_id, 3);
        assert_eq!(report.seeds_checked, 21);
        assert!(found.verify(&program()));
    }

    #[test]
    fn test_exhausts_range() {
        let range = SeedRange::from_count(0, 40).unwrap();
        // Planted seed lies outside the range.
        let params = SearchParams::new(program(), tail_of(1_000, 8), range);
        let report = run_worker(params, range, false);
        assert_eq!(report.result, SearchResult::Exhausted);
        assert_eq!(report.seeds_checked, 40);
    }

    #[test]
    fn test_stop_flag_cancels_before_work() {
        let params = SearchParams::new(program(), tail_of(0, 8), SeedRange::FULL);
        let report = run_worker(params, SeedRange::FULL, true);
        assert_eq!(report.result, SearchResult::Cancelled);
        assert_eq!(report.seeds_checked, 0);
    }

    #[test]
    fn test_random_start_still_covers_range() {
        let range = SeedRange::from_count(300, 30).unwrap();
        let params = SearchParams::new(program(), tail_of(300, 8), range)
            .with_order(SeedOrder::RandomStart);
        let report = run_worker(params, range, false);
        assert_eq!(report.result.found().map(|f| f.seed), Some(300));
    }

    #[test]
    fn test_finds_seed_with_lower_canonical_bump() {
        // Seed 3's bump 255 hash is on-curve; its canonical bump is 252.
        let range = SeedRange::from_count(0, 10).unwrap();
        let params = SearchParams::new(program(), tail_of(3, 6), range);
        let report = run_worker(params, range, false);
        let found = report.result.found().unwrap();
        assert_eq!((found.seed, found.bump), (3, 252));
        assert!(found.address.to_base58().ends_with("hxUFVT"));
    }

    #[test]
    fn test_stops_within_a_batch_of_the_stop_flag() {
        const BATCH_SIZE: u64 = 1024;

        let (tx, rx) = bounded(1);
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stats = Arc::new(WorkerStats::new());
        let worker = CpuWorker::new(
            0,
            SeedRange::FULL,
            SearchParams::new(program(), Suffix::new("zzzzzzzzzzzz").unwrap(), SeedRange::FULL),
            tx,
            stop_flag.clone(),
            Arc::new(OnceLock::new()),
            stats.clone(),
        );
        let handle = thread::spawn(move || worker.run());

        while stats.total_seeds() < BATCH_SIZE {
            thread::sleep(Duration::from_millis(1));
        }
        stop_flag.store(true, Ordering::Relaxed);
        let flushed_at_stop = stats.total_seeds();
        handle.join().unwrap();

        let report = rx.try_recv().unwrap();
        assert_eq!(report.result, SearchResult::Cancelled);
        // Unflushed seeds plus the one in flight when the flag was raised.
        assert!(
            report.seeds_checked <= flushed_at_stop + 2 * BATCH_SIZE,
            "{} seeds after {} flushed",
            report.seeds_checked,
            flushed_at_stop
        );
    }
}
