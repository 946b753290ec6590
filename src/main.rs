//! PDA Vanity Seed Miner CLI
//!
//! Usage:
//!   pda_vanity                          # seed whose PDA ends with "pump"
//!   pda_vanity -s moon -p <PROGRAM_ID>  # custom suffix and program
//!   pda_vanity --start 0 -n 1000000     # bounded search space
//!
//! The printed seed goes into the program's instruction as 8 little-endian
//! bytes; the program re-derives the PDA with `seeds = [seed.to_le_bytes()]`.

use std::process;
use std::sync::atomic::Ordering;
use std::time::Instant;

use clap::Parser;

use pda_vanity::{Config, FoundSeed, SearchResult, WorkerPool};

const EXIT_CONFIG: i32 = 1;
const EXIT_EXHAUSTED: i32 = 2;
const EXIT_CANCELLED: i32 = 130;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::parse();

    let params = match config.search_params() {
        Ok(params) => params,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(EXIT_CONFIG);
        }
    };
    let program_id = params.program_id;

    println!("PDA Vanity Seed Miner");
    println!("=====================");
    println!("Program:    {}", program_id);
    println!("Suffix:     {}", params.suffix);
    println!("Difficulty: {}", params.suffix.difficulty_description());
    println!("Seeds:      {}", params.space);
    println!("Workers:    {}", params.workers);
    println!();

    let mut pool = match WorkerPool::spawn(params) {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(EXIT_CONFIG);
        }
    };

    let stop_flag = pool.stop_flag_clone();
    if let Err(e) = ctrlc::set_handler(move || {
        stop_flag.store(true, Ordering::Relaxed);
    }) {
        eprintln!("Warning: could not set Ctrl-C handler: {}", e);
    }

    println!("Searching... (Press Ctrl+C to stop)\n");

    let report_interval = config.report_interval();
    let deadline = config.timeout().map(|t| Instant::now() + t);

    let result = loop {
        let wait = match deadline {
            Some(d) if !pool.is_stopped() => {
                report_interval.min(d.saturating_duration_since(Instant::now()))
            }
            _ => report_interval,
        };

        if let Some(result) = pool.wait_for_result(wait) {
            break result;
        }

        if deadline.is_some_and(|d| Instant::now() >= d) {
            if !pool.is_stopped() {
                println!("\nTimeout reached, stopping workers.");
                pool.stop();
            }
        } else {
            print_progress(&pool);
        }
    };

    let exit_code = match &result {
        SearchResult::Found(found) => {
            if !found.verify(&program_id) {
                eprintln!(
                    "Error: seed {} does not re-derive to {} (bump {})",
                    found.seed, found.address, found.bump
                );
                EXIT_CONFIG
            } else {
                print_result(found);
                0
            }
        }
        SearchResult::Exhausted => {
            println!("Seed space exhausted without a match; widen --start/--count.");
            EXIT_EXHAUSTED
        }
        SearchResult::Cancelled => {
            println!("Stopped before a match was found.");
            EXIT_CANCELLED
        }
    };

    println!("\n--- Final Statistics ---");
    println!("Total seeds tried:  {}", format_number(pool.total_seeds()));
    println!("Seeds skipped:      {}", pool.total_skipped());
    println!("Time elapsed:       {:.2}s", pool.elapsed().as_secs_f64());
    println!(
        "Average speed:      {}/s",
        format_number(pool.seeds_per_second() as u64)
    );

    pool.join();
    process::exit(exit_code);
}

fn print_result(found: &FoundSeed) {
    println!("=== Match ===");
    println!("Seed:         {}", found.seed);
    println!("Seed (le):    0x{}", found.seed_le_hex());
    println!("PDA:          {}", found.address);
    println!("Bump:         {}", found.bump);
    println!("Worker:       {}", found.worker_id);
}

fn print_progress(pool: &WorkerPool) {
    let seeds = pool.total_seeds();
    let rate = pool.seeds_per_second();
    let elapsed = pool.elapsed().as_secs();
    println!(
        "[{:>4}s] Tried {} seeds ({}/s)",
        elapsed,
        format_number(seeds),
        format_number(rate as u64)
    );
}

fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1e9)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1e6)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1e3)
    } else {
        n.to_string()
    }
}
