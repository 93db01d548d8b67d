//! Worker threads must be gone by the time a run returns.
//!
//! Kept in its own test binary with a single test so no other test's
//! workers are alive while threads are counted.

#![cfg(target_os = "linux")]

use std::fs;
use std::thread;
use std::time::Duration;

use prime_finder::{partition, FinderConfig, Method, PrimeFinder, Range, TrialDivision};

/// Threads of this process whose name carries the crate's worker prefix.
fn live_workers() -> Vec<String> {
    let mut names = Vec::new();
    for entry in fs::read_dir("/proc/self/task").unwrap() {
        let comm = entry.unwrap().path().join("comm");
        // A thread can exit between read_dir and the read
        if let Ok(name) = fs::read_to_string(comm) {
            let name = name.trim().to_string();
            if name.starts_with("prime-") {
                names.push(name);
            }
        }
    }
    names
}

/// Joined threads can stay listed in /proc for a moment after the join
/// returns, so allow about a millisecond before reporting them.
fn workers_after_run() -> Vec<String> {
    for _ in 0..10 {
        let alive = live_workers();
        if alive.is_empty() {
            return alive;
        }
        thread::sleep(Duration::from_micros(100));
    }
    live_workers()
}

#[test]
fn test_no_worker_outlives_its_run() {
    assert!(live_workers().is_empty());

    for method in Method::ALL {
        for _ in 0..20 {
            let config = FinderConfig::new(1, 2000, 8).with_method(method);
            let result = PrimeFinder::new(config).run().unwrap();
            assert_eq!(result.primes_found, 303);

            let alive = workers_after_run();
            assert!(alive.is_empty(), "{} left threads running: {:?}", method, alive);
        }

        let chunks = partition(Range::new(1, 500), 4);
        method.execute(&chunks, 4, &TrialDivision).unwrap();
        let alive = workers_after_run();
        assert!(alive.is_empty(), "{} execute left {:?}", method, alive);
    }
}
