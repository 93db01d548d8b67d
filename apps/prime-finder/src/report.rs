//! JSON reports and the all-strategy comparison.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::config::{available_workers, FinderConfig};
use crate::error::Result;
use crate::executor::Method;
use crate::finder::{AggregateResult, PrimeFinder};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Configuration {
    pub start_range: i64,
    pub end_range: i64,
    pub cpu_count: usize,
}

/// One strategy's line in a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodSummary {
    pub primes_found: usize,
    pub execution_time_seconds: f64,
    pub workers: usize,
    /// Sequential time divided by this method's time. Absent for the
    /// sequential baseline itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speedup: Option<f64>,
}

/// Every strategy run over the same range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub configuration: Configuration,
    #[serde(flatten)]
    pub methods: BTreeMap<String, MethodSummary>,
    /// Whether every strategy found the same primes.
    pub consistent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primes: Option<Vec<i64>>,
}

impl Comparison {
    pub fn get(&self, method: Method) -> Option<&MethodSummary> {
        self.methods.get(method.name())
    }
}

/// Run `config` once per strategy, sequential first as the baseline.
pub fn compare(config: FinderConfig) -> Result<Comparison> {
    // Lists are needed to check agreement between strategies
    let listing = config.with_primes(true);
    let mut methods = BTreeMap::new();
    let mut baseline: Option<AggregateResult> = None;
    let mut consistent = true;

    for method in Method::ALL {
        let result = PrimeFinder::new(listing.with_method(method)).run()?;

        let speedup = match &baseline {
            Some(base) if result.execution_time_seconds > 0.0 => {
                Some(base.execution_time_seconds / result.execution_time_seconds)
            }
            _ => None,
        };

        if let Some(base) = &baseline {
            consistent &= base.primes == result.primes;
        }

        methods.insert(
            method.name().to_string(),
            MethodSummary {
                primes_found: result.primes_found,
                execution_time_seconds: result.execution_time_seconds,
                workers: result.workers,
                speedup,
            },
        );

        if baseline.is_none() {
            baseline = Some(result);
        }
    }

    if !consistent {
        tracing::warn!("strategies disagree on the primes found");
    }

    let primes = match baseline {
        Some(base) if config.include_primes => base.primes,
        _ => None,
    };

    Ok(Comparison {
        configuration: Configuration {
            start_range: config.range.start,
            end_range: config.range.end,
            cpu_count: available_workers(),
        },
        methods,
        consistent,
        primes,
    })
}

/// Write `value` as indented JSON to `path`, replacing any existing file.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
