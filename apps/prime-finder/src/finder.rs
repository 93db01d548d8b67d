//! The partition, execute, aggregate pipeline behind one timed call.

use serde::Serialize;

use crate::aggregate::Primes;
use crate::config::FinderConfig;
use crate::error::Result;
use crate::executor::Method;
use crate::oracle::{Oracle, TrialDivision};
use crate::partition::{partition, Range};
use crate::timer::timed;

/// Outcome of one full run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub start_range: i64,
    pub end_range: i64,
    pub primes_found: usize,
    pub execution_time_seconds: f64,
    pub workers: usize,
    pub method: Method,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub largest_prime: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primes: Option<Vec<i64>>,
}

impl AggregateResult {
    pub fn range(&self) -> Range {
        Range::new(self.start_range, self.end_range)
    }

    /// Primes per integer scanned.
    pub fn density(&self) -> f64 {
        let len = self.range().len();
        if len > 0 {
            self.primes_found as f64 / len as f64
        } else {
            0.0
        }
    }

    pub fn execution_time_ms(&self) -> f64 {
        self.execution_time_seconds * 1000.0
    }
}

/// Runs a configured scan against an oracle.
///
/// Each call to [`PrimeFinder::run`] creates its own workers and joins
/// them before returning, so runs never share threads or state.
#[derive(Debug, Clone)]
pub struct PrimeFinder<O = TrialDivision> {
    config: FinderConfig,
    oracle: O,
}

impl PrimeFinder<TrialDivision> {
    pub fn new(config: FinderConfig) -> Self {
        Self {
            config,
            oracle: TrialDivision,
        }
    }
}

impl<O: Oracle> PrimeFinder<O> {
    /// Replace the primality test.
    pub fn with_oracle<P: Oracle>(self, oracle: P) -> PrimeFinder<P> {
        PrimeFinder {
            config: self.config,
            oracle,
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.config.method = method;
        self
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    pub fn run(&self) -> Result<AggregateResult> {
        let FinderConfig {
            range,
            method,
            include_primes,
            ..
        } = self.config;
        let workers = method.effective_workers(self.config.workers);

        let (outcome, elapsed) = timed(|| -> Result<Primes> {
            let chunks = partition(range, workers);
            method
                .execute(&chunks, workers, &self.oracle)?
                .finish(include_primes)
        });
        let primes = outcome?;

        tracing::info!(
            method = method.name(),
            start = range.start,
            end = range.end,
            workers,
            primes_found = primes.count,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "scan complete"
        );

        Ok(AggregateResult {
            start_range: range.start,
            end_range: range.end,
            primes_found: primes.count,
            execution_time_seconds: elapsed.as_secs_f64(),
            workers,
            method,
            largest_prime: primes.largest,
            primes: primes.list,
        })
    }
}
