//! Range partitioning
//!
//! ```text
//! Range: [start, end], len = end - start + 1
//!
//! size   = max(1, len / workers)
//! chunks = min(workers, len)
//!
//! Chunk 0:        [start,              start + size - 1]
//! Chunk 1:        [start + size,       start + 2*size - 1]
//! ...
//! Chunk last:     [start + k*size,     end]    <- absorbs the remainder
//! ```
//!
//! The output depends only on `(start, end, workers)`, so repeated calls
//! yield the same chunk sequence.

use serde::Serialize;

/// Inclusive integer interval `[start, end]`. Empty when `end < start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Range {
    pub start: i64,
    pub end: i64,
}

impl Range {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Number of integers in the range. `[i64::MIN, i64::MAX]` holds 2^64
    /// integers, one more than `u64` can count, so it saturates.
    pub fn len(&self) -> u64 {
        if self.is_empty() {
            return 0;
        }
        let width = self.end.abs_diff(self.start);
        width.saturating_add(1)
    }
}

/// Contiguous, non empty sub-range `[lo, hi]` handed to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Chunk {
    pub lo: i64,
    pub hi: i64,
}

impl Chunk {
    pub fn len(&self) -> u64 {
        if self.is_empty() {
            return 0;
        }
        self.hi.abs_diff(self.lo).saturating_add(1)
    }

    pub fn is_empty(&self) -> bool {
        self.hi < self.lo
    }
}

/// Split `range` into at most `workers` ascending, disjoint chunks whose
/// union is exactly `range`.
///
/// `workers == 0` is treated as 1.
pub fn partition(range: Range, workers: usize) -> Vec<Chunk> {
    if range.is_empty() {
        return vec![];
    }

    let workers = workers.max(1) as u64;
    let len = range.len();
    let size = (len / workers).max(1);
    let count = workers.min(len);

    let mut chunks = Vec::with_capacity(count as usize);
    let mut lo = range.start;

    for index in 0..count {
        let hi = if index + 1 == count {
            range.end
        } else {
            // Never the last chunk, so lo + size - 1 < end and fits in i64
            lo.wrapping_add_unsigned(size - 1)
        };

        chunks.push(Chunk { lo, hi });

        if hi < range.end {
            lo = hi + 1;
        }
    }

    tracing::debug!(
        start = range.start,
        end = range.end,
        workers,
        chunk_size = size,
        chunks = chunks.len(),
        "partitioned range"
    );

    chunks
}
