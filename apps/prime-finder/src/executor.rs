//! Execution strategies for a partitioned scan.
//!
//! # Strategies
//!
//! ```text
//! Sequential: caller thread scans chunk 0, 1, 2, ... in order
//!
//! Threads:    one scoped thread per chunk, static assignment
//!             chunk i --> thread i --> join handle i
//!
//! Pool:       `workers` scoped threads draining a shared queue
//!
//!             ┌────────────┐  pop   ┌──────────┐
//!             │ WorkQueue  │ ─────> │ worker 0 │ ──┐
//!             │ [c0 c1 c2  │ ─────> │ worker 1 │ ──┼─> mpsc ─> Aggregator
//!             │  c3 ...]   │ ─────> │ worker 2 │ ──┘  (index, result)
//!             └────────────┘        └──────────┘
//!
//! Rayon:      a scoped rayon pool built and joined inside this call,
//!             chunks mapped with an order-preserving parallel collect
//! ```
//!
//! Every strategy blocks until all of its units are joined and returns a
//! fully populated [`Aggregator`]. No thread or pool outlives the call.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

use rayon::prelude::*;
use serde::Serialize;

use crate::aggregate::Aggregator;
use crate::error::{FinderError, Result};
use crate::oracle::{scan, Oracle, PartialResult};
use crate::partition::Chunk;

/// How the chunks of a run are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Single chunk on the calling thread
    Sequential,
    /// One OS thread per chunk
    Threads,
    /// Fixed pool of workers pulling chunks from a queue
    #[default]
    Pool,
    /// Rayon thread pool scoped to the run
    Rayon,
}

impl Method {
    pub const ALL: [Method; 4] = [
        Method::Sequential,
        Method::Threads,
        Method::Pool,
        Method::Rayon,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Method::Sequential => "sequential",
            Method::Threads => "threads",
            Method::Pool => "pool",
            Method::Rayon => "rayon",
        }
    }

    /// Worker count actually used by this method.
    pub fn effective_workers(&self, requested: usize) -> usize {
        match self {
            Method::Sequential => 1,
            _ => requested.max(1),
        }
    }

    /// Run every chunk against `oracle` and collect the results.
    pub fn execute<O>(
        &self,
        chunks: &[Chunk],
        workers: usize,
        oracle: &O,
    ) -> Result<Aggregator>
    where
        O: Oracle + ?Sized,
    {
        let mut aggregator = Aggregator::new(chunks.len());
        if chunks.is_empty() {
            return Ok(aggregator);
        }

        let workers = self.effective_workers(workers);
        tracing::debug!(
            method = self.name(),
            workers,
            chunks = chunks.len(),
            "dispatching chunks"
        );

        match self {
            Method::Sequential => run_sequential(chunks, oracle, &mut aggregator)?,
            Method::Threads => run_threads(chunks, oracle, &mut aggregator)?,
            Method::Pool => run_pool(chunks, workers, oracle, &mut aggregator)?,
            Method::Rayon => run_rayon(chunks, workers, oracle, &mut aggregator)?,
        }

        Ok(aggregator)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scan one chunk, turning a panic inside the oracle into an error value.
fn scan_guarded<O>(oracle: &O, chunk: Chunk) -> thread::Result<PartialResult>
where
    O: Oracle + ?Sized,
{
    panic::catch_unwind(AssertUnwindSafe(|| scan(oracle, chunk)))
}

fn run_sequential<O>(chunks: &[Chunk], oracle: &O, aggregator: &mut Aggregator) -> Result<()>
where
    O: Oracle + ?Sized,
{
    for (index, &chunk) in chunks.iter().enumerate() {
        let partial = scan_guarded(oracle, chunk)
            .map_err(|_| FinderError::WorkerPanicked { chunk: Some(index) })?;
        aggregator.accept(index, partial)?;
    }
    Ok(())
}

/// Start one named unit inside `scope`.
fn spawn_unit<'scope, 'env, F, T>(
    scope: &'scope thread::Scope<'scope, 'env>,
    builder: thread::Builder,
    worker: usize,
    f: F,
) -> Result<thread::ScopedJoinHandle<'scope, T>>
where
    F: FnOnce() -> T + Send + 'scope,
    T: Send + 'scope,
{
    builder
        .spawn_scoped(scope, f)
        .map_err(|source| FinderError::WorkerSpawn { worker, source })
}

/// Static assignment: chunk `i` runs on its own thread and hands its
/// result back through join handle `i`.
fn run_threads<O>(chunks: &[Chunk], oracle: &O, aggregator: &mut Aggregator) -> Result<()>
where
    O: Oracle + ?Sized,
{
    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(chunks.len());
        let mut spawn_error = None;

        for (index, &chunk) in chunks.iter().enumerate() {
            let builder = thread::Builder::new().name(format!("prime-chunk-{}", index));
            match spawn_unit(scope, builder, index, move || scan(oracle, chunk)) {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    spawn_error = Some(err);
                    break;
                }
            }
        }

        // Join everything before looking at results so that no panicked
        // thread is left for the scope to re-raise.
        let joined: Vec<_> = handles.into_iter().map(|handle| handle.join()).collect();

        if let Some(err) = spawn_error {
            return Err(err);
        }

        for (index, outcome) in joined.into_iter().enumerate() {
            let partial =
                outcome.map_err(|_| FinderError::WorkerPanicked { chunk: Some(index) })?;
            aggregator.accept(index, partial)?;
        }
        Ok(())
    })
}

/// Shared queue of chunk descriptors.
///
/// `pop` hands out each index exactly once across all callers. Once
/// closed, every later `pop` returns `None`.
struct WorkQueue<'a> {
    chunks: &'a [Chunk],
    next: AtomicUsize,
    closed: AtomicBool,
}

impl<'a> WorkQueue<'a> {
    fn new(chunks: &'a [Chunk]) -> Self {
        Self {
            chunks,
            next: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
        }
    }

    fn pop(&self) -> Option<(usize, Chunk)> {
        if self.closed.load(Ordering::Acquire) {
            return None;
        }
        let index = self.next.fetch_add(1, Ordering::Relaxed);
        self.chunks.get(index).map(|&chunk| (index, chunk))
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

type Delivery = (usize, thread::Result<PartialResult>);

/// Fixed pool: each worker pulls the next free chunk until the queue is
/// drained, sending `(chunk index, result)` to the collecting thread.
fn run_pool<O>(
    chunks: &[Chunk],
    workers: usize,
    oracle: &O,
    aggregator: &mut Aggregator,
) -> Result<()>
where
    O: Oracle + ?Sized,
{
    // Units beyond the chunk count would find the queue empty on arrival
    let units = workers.min(chunks.len());
    let queue = WorkQueue::new(chunks);
    let (tx, rx) = mpsc::channel::<Delivery>();

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(units);
        let mut failure = None;

        for worker in 0..units {
            let tx = tx.clone();
            let queue = &queue;
            let builder = thread::Builder::new().name(format!("prime-worker-{}", worker));
            let spawned = spawn_unit(scope, builder, worker, move || {
                let mut scanned = 0usize;
                while let Some((index, chunk)) = queue.pop() {
                    let outcome = scan_guarded(oracle, chunk);
                    let panicked = outcome.is_err();
                    if tx.send((index, outcome)).is_err() || panicked {
                        break;
                    }
                    scanned += 1;
                }
                scanned
            });

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    queue.close();
                    failure = Some(err);
                    break;
                }
            }
        }

        // The loop below ends once every worker has dropped its sender
        drop(tx);

        for (index, outcome) in rx {
            if failure.is_some() {
                continue;
            }
            let accepted = match outcome {
                Ok(partial) => aggregator.accept(index, partial),
                Err(_) => Err(FinderError::WorkerPanicked { chunk: Some(index) }),
            };
            if let Err(err) = accepted {
                queue.close();
                failure = Some(err);
            }
        }

        for (worker, handle) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(scanned) => tracing::trace!(worker, scanned, "worker finished"),
                Err(_) => {
                    failure.get_or_insert(FinderError::WorkerPanicked { chunk: None });
                }
            }
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    })
}

/// Rayon pool sized to `workers`. `build_scoped` joins every pool thread
/// before it returns.
fn run_rayon<O>(
    chunks: &[Chunk],
    workers: usize,
    oracle: &O,
    aggregator: &mut Aggregator,
) -> Result<()>
where
    O: Oracle + ?Sized,
{
    // `collect` on an indexed parallel iterator keeps chunk order
    let outcomes: Vec<thread::Result<PartialResult>> = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.min(chunks.len()))
        .thread_name(|index| format!("prime-rayon-{}", index))
        .build_scoped(
            |thread| thread.run(),
            |pool| {
                pool.install(|| {
                    chunks
                        .par_iter()
                        .map(|&chunk| scan_guarded(oracle, chunk))
                        .collect()
                })
            },
        )?;

    for (index, outcome) in outcomes.into_iter().enumerate() {
        let partial =
            outcome.map_err(|_| FinderError::WorkerPanicked { chunk: Some(index) })?;
        aggregator.accept(index, partial)?;
    }
    Ok(())
}
