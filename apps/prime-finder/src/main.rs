//! Parallel Prime Finder CLI
//!
//! Finds every prime in `[start, end]` with the selected execution
//! strategy, prints a summary, and writes the result as indented JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use prime_finder::config::{available_workers, DEFAULT_END, DEFAULT_START};
use prime_finder::report::{compare, write_json, Comparison};
use prime_finder::{partition, AggregateResult, FinderConfig, Method, PrimeFinder};

/// Strategy selection on the command line
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
enum MethodArg {
    /// Single thread, one chunk
    Sequential,
    /// One OS thread per chunk
    Threads,
    /// Fixed worker pool draining a chunk queue
    Pool,
    /// Rayon thread pool
    Rayon,
    /// Run every strategy and compare
    All,
}

impl MethodArg {
    fn method(self) -> Option<Method> {
        match self {
            MethodArg::Sequential => Some(Method::Sequential),
            MethodArg::Threads => Some(Method::Threads),
            MethodArg::Pool => Some(Method::Pool),
            MethodArg::Rayon => Some(Method::Rayon),
            MethodArg::All => None,
        }
    }
}

/// Parallel prime finder over an inclusive integer range
#[derive(Parser, Debug)]
#[command(name = "prime-finder")]
#[command(about = "Find primes in a range using a pool of workers", long_about = None)]
struct Args {
    /// Start of the range (inclusive)
    #[arg(short, long, default_value_t = DEFAULT_START, allow_negative_numbers = true)]
    start: i64,

    /// End of the range (inclusive)
    #[arg(short, long, default_value_t = DEFAULT_END, allow_negative_numbers = true)]
    end: i64,

    /// Number of workers (0 is treated as 1)
    #[arg(short, long, default_value_t = available_workers())]
    workers: usize,

    /// Execution strategy
    #[arg(short, long, value_enum, default_value_t = MethodArg::Pool)]
    method: MethodArg,

    /// Keep the list of primes in the JSON output
    #[arg(long, default_value_t = false)]
    save_primes: bool,

    /// JSON output file
    #[arg(short, long, default_value = "results.json")]
    output: PathBuf,

    /// Print a single CSV line instead of the summary
    #[arg(long, default_value_t = false)]
    csv: bool,

    /// Show chunk layout, the primes found, and debug logs
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> FinderConfig {
        FinderConfig::new(self.start, self.end, self.workers).with_primes(self.save_primes)
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Worker count the selected method will actually run with.
fn banner_workers(args: &Args, config: &FinderConfig) -> usize {
    match args.method.method() {
        Some(method) => method.effective_workers(config.workers),
        None => config.workers,
    }
}

fn print_banner(args: &Args, config: &FinderConfig) {
    let workers = banner_workers(args, config);

    println!("═══════════════════════════════════════════════════════════");
    println!("              PARALLEL PRIME NUMBER FINDER");
    println!("═══════════════════════════════════════════════════════════");
    println!("Configuration:");
    println!("  Range: {} to {}", config.range.start, config.range.end);
    println!("  Workers: {}", workers);
    println!("  Method: {:?}", args.method);
    println!("  CPU count: {}", available_workers());
    println!("═══════════════════════════════════════════════════════════");
    println!("\nFinding primes...\n");
}

fn print_result(args: &Args, result: &AggregateResult) {
    if args.csv {
        // CSV format: start,end,workers,method,time_ms,prime_count
        println!(
            "{},{},{},{},{:.3},{}",
            result.start_range,
            result.end_range,
            result.workers,
            result.method,
            result.execution_time_ms(),
            result.primes_found
        );
        return;
    }

    println!("═══════════════════════════════════════════════════════════");
    println!("                      RESULTS");
    println!("═══════════════════════════════════════════════════════════");
    println!("  Primes found:        {:>12}", result.primes_found);
    match result.largest_prime {
        Some(largest) => println!("  Largest prime:       {:>12}", largest),
        None => println!("  Largest prime:       {:>12}", "-"),
    }
    println!("  Prime density:       {:>12.6}", result.density());
    println!("───────────────────────────────────────────────────────────");
    println!("  Execution time:      {:>12.3} ms", result.execution_time_ms());
    println!("  Execution time:      {:>12.6} s", result.execution_time_seconds);
    println!("───────────────────────────────────────────────────────────");

    if args.verbose {
        println!("  Chunk layout ({}):", result.method);
        let chunks = partition(result.range(), result.workers);
        for (i, chunk) in chunks.iter().enumerate() {
            println!("    Chunk {}: [{:>10}, {:>10}]", i, chunk.lo, chunk.hi);
        }
        println!("═══════════════════════════════════════════════════════════");

        if let Some(primes) = &result.primes {
            println!("\nPrime numbers found:");
            for (i, prime) in primes.iter().enumerate() {
                if i > 0 && i % 10 == 0 {
                    println!();
                }
                print!("{:>8} ", prime);
            }
            println!();
        }
    } else {
        println!("═══════════════════════════════════════════════════════════");
    }
}

fn print_comparison(args: &Args, comparison: &Comparison) {
    if args.csv {
        for method in Method::ALL {
            if let Some(summary) = comparison.get(method) {
                println!(
                    "{},{},{},{},{:.3},{}",
                    comparison.configuration.start_range,
                    comparison.configuration.end_range,
                    summary.workers,
                    method,
                    summary.execution_time_seconds * 1000.0,
                    summary.primes_found
                );
            }
        }
        return;
    }

    println!("═══════════════════════════════════════════════════════════");
    println!("                 STRATEGY COMPARISON");
    println!("═══════════════════════════════════════════════════════════");
    println!(
        "  {:<12} {:>8} {:>10} {:>14} {:>8}",
        "Method", "Workers", "Primes", "Time (ms)", "Speedup"
    );
    println!("───────────────────────────────────────────────────────────");

    for method in Method::ALL {
        if let Some(summary) = comparison.get(method) {
            let speedup = summary
                .speedup
                .map(|s| format!("{:.2}x", s))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {:<12} {:>8} {:>10} {:>14.3} {:>8}",
                method.name(),
                summary.workers,
                summary.primes_found,
                summary.execution_time_seconds * 1000.0,
                speedup
            );
        }
    }

    println!("───────────────────────────────────────────────────────────");
    println!(
        "  Results consistent:  {:>12}",
        if comparison.consistent { "yes" } else { "NO" }
    );
    println!("═══════════════════════════════════════════════════════════");
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = args.config();

    match args.method.method() {
        Some(method) => {
            let finder = PrimeFinder::new(config.with_method(method));
            if !args.csv {
                print_banner(&args, finder.config());
            }

            let result = finder
                .run()
                .with_context(|| format!("{} run failed", method))?;
            print_result(&args, &result);
            write_json(&result, &args.output)
                .with_context(|| format!("failed to write {}", args.output.display()))?;
        }
        None => {
            if !args.csv {
                print_banner(&args, &config);
            }

            let comparison = compare(config).context("strategy comparison failed")?;
            print_comparison(&args, &comparison);
            write_json(&comparison, &args.output)
                .with_context(|| format!("failed to write {}", args.output.display()))?;
        }
    }

    if !args.csv {
        println!("\nResults saved to {}", args.output.display());
    }

    Ok(())
}
