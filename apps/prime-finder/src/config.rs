//! Run configuration handed from the CLI layer to the library.

use serde::Serialize;

use crate::executor::Method;
use crate::partition::Range;

pub const DEFAULT_START: i64 = 1;
pub const DEFAULT_END: i64 = 100_000;

/// Everything one invocation needs besides the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FinderConfig {
    pub range: Range,
    /// Requested worker count. Zero is clamped to one.
    pub workers: usize,
    pub method: Method,
    /// Keep the full prime list in the result, not only the count.
    pub include_primes: bool,
}

impl FinderConfig {
    pub fn new(start: i64, end: i64, workers: usize) -> Self {
        Self {
            range: Range::new(start, end),
            workers: workers.max(1),
            ..Self::default()
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_primes(mut self, include_primes: bool) -> Self {
        self.include_primes = include_primes;
        self
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            range: Range::new(DEFAULT_START, DEFAULT_END),
            workers: available_workers(),
            method: Method::default(),
            include_primes: false,
        }
    }
}

/// Hardware parallelism, or 1 when the platform cannot report it.
pub fn available_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
