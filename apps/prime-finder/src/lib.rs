//! Parallel Prime Finder
//!
//! Splits an inclusive integer range into contiguous chunks, scans the
//! chunks concurrently against a primality oracle, and merges the
//! per-chunk results back into one ordered list.
//!
//! # Pipeline
//!
//! ```text
//! (start, end, workers)
//!        │
//!        ▼
//!   partition()  ──>  [c0, c1, ..., ck]      at most `workers` chunks
//!        │
//!        ▼
//!   Method::execute  ──>  one PartialResult per chunk, any order
//!        │
//!        ▼
//!   Aggregator::finish  ──>  primes in chunk-creation order
//!        │
//!        ▼
//!   AggregateResult { primes_found, execution_time_seconds, ... }
//! ```
//!
//! The merged output is identical for every worker count and strategy,
//! including a single sequential chunk.
//!
//! ```no_run
//! let result = prime_finder::find_primes(1, 1000, 4, true)?;
//! assert_eq!(result.primes_found, 168);
//! # Ok::<(), prime_finder::FinderError>(())
//! ```

pub mod aggregate;
pub mod config;
pub mod error;
pub mod executor;
pub mod finder;
pub mod oracle;
pub mod partition;
pub mod report;
pub mod timer;

pub use config::FinderConfig;
pub use error::{FinderError, Result};
pub use executor::Method;
pub use finder::{AggregateResult, PrimeFinder};
pub use oracle::{Oracle, TrialDivision};
pub use partition::{partition, Chunk, Range};

/// Find every prime in `[start, end]` with a pool of `workers` threads.
///
/// An empty range (`end < start`) yields zero primes. `workers == 0` is
/// treated as 1. The prime list is kept only when `include_prime_list`
/// is set; the count is always reported.
pub fn find_primes(
    start: i64,
    end: i64,
    workers: usize,
    include_prime_list: bool,
) -> Result<AggregateResult> {
    let config = FinderConfig::new(start, end, workers).with_primes(include_prime_list);
    PrimeFinder::new(config).run()
}
