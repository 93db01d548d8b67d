//! Reassembles per-chunk results in chunk-creation order.
//!
//! Workers finish in whatever order the scheduler picks. Each result is
//! dropped into the slot of the chunk that produced it, and the final
//! sequence is read back slot by slot. Since chunks are disjoint,
//! ascending, and internally sorted, that concatenation is globally sorted
//! without a value sort.

use crate::error::{FinderError, Result};
use crate::oracle::PartialResult;

/// Merged output of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Primes {
    pub count: usize,
    pub largest: Option<i64>,
    /// `None` unless the caller asked for the list.
    pub list: Option<Vec<i64>>,
}

#[derive(Debug)]
pub struct Aggregator {
    slots: Vec<Option<PartialResult>>,
}

impl Aggregator {
    pub fn new(chunk_count: usize) -> Self {
        Self {
            slots: (0..chunk_count).map(|_| None).collect(),
        }
    }

    /// Store the result of chunk `index`. Each chunk may deliver once.
    pub fn accept(&mut self, index: usize, partial: PartialResult) -> Result<()> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(FinderError::UnknownChunk { chunk: index })?;

        if slot.is_some() {
            return Err(FinderError::DuplicateResult { chunk: index });
        }

        tracing::trace!(
            chunk = index,
            lo = partial.chunk.lo,
            hi = partial.chunk.hi,
            primes = partial.len(),
            "chunk result received"
        );
        *slot = Some(partial);
        Ok(())
    }

    /// Consume every slot in order. Fails if any chunk never reported.
    pub fn finish(self, include_primes: bool) -> Result<Primes> {
        let mut count = 0;
        let mut largest = None;
        let mut list = include_primes.then(Vec::new);

        for (index, slot) in self.slots.into_iter().enumerate() {
            let partial = slot.ok_or(FinderError::MissingResult { chunk: index })?;
            count += partial.len();
            largest = partial.primes.last().copied().or(largest);
            if let Some(list) = list.as_mut() {
                list.extend(partial.primes);
            }
        }

        Ok(Primes {
            count,
            largest,
            list,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::Chunk;

    fn partial(lo: i64, hi: i64, primes: &[i64]) -> PartialResult {
        PartialResult {
            chunk: Chunk { lo, hi },
            primes: primes.to_vec(),
        }
    }

    #[test]
    fn test_out_of_order_delivery_is_reordered() {
        let mut agg = Aggregator::new(3);
        agg.accept(2, partial(21, 30, &[23, 29])).unwrap();
        agg.accept(0, partial(1, 10, &[2, 3, 5, 7])).unwrap();
        agg.accept(1, partial(11, 20, &[11, 13, 17, 19])).unwrap();

        let primes = agg.finish(true).unwrap();
        assert_eq!(primes.count, 10);
        assert_eq!(primes.largest, Some(29));
        assert_eq!(
            primes.list,
            Some(vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29])
        );
    }

    #[test]
    fn test_count_only() {
        let mut agg = Aggregator::new(2);
        agg.accept(0, partial(1, 10, &[2, 3, 5, 7])).unwrap();
        agg.accept(1, partial(11, 12, &[11])).unwrap();

        let primes = agg.finish(false).unwrap();
        assert_eq!(primes.count, 5);
        assert_eq!(primes.largest, Some(11));
        assert_eq!(primes.list, None);
    }

    #[test]
    fn test_largest_skips_empty_tail_chunks() {
        let mut agg = Aggregator::new(2);
        agg.accept(0, partial(1, 10, &[2, 3, 5, 7])).unwrap();
        agg.accept(1, partial(24, 28, &[])).unwrap();
        assert_eq!(agg.finish(false).unwrap().largest, Some(7));
    }

    #[test]
    fn test_duplicate_delivery_rejected() {
        let mut agg = Aggregator::new(1);
        agg.accept(0, partial(1, 3, &[2, 3])).unwrap();
        let err = agg.accept(0, partial(1, 3, &[2, 3])).unwrap_err();
        assert!(matches!(err, FinderError::DuplicateResult { chunk: 0 }));
    }

    #[test]
    fn test_unknown_chunk_rejected() {
        let mut agg = Aggregator::new(1);
        let err = agg.accept(5, PartialResult::default()).unwrap_err();
        assert!(matches!(err, FinderError::UnknownChunk { chunk: 5 }));
    }

    #[test]
    fn test_missing_chunk_is_an_error() {
        let mut agg = Aggregator::new(2);
        agg.accept(1, partial(5, 8, &[5, 7])).unwrap();
        let err = agg.finish(true).unwrap_err();
        assert!(matches!(err, FinderError::MissingResult { chunk: 0 }));
    }

    #[test]
    fn test_no_chunks_is_empty_result() {
        let primes = Aggregator::new(0).finish(true).unwrap();
        assert_eq!(primes.count, 0);
        assert_eq!(primes.largest, None);
        assert_eq!(primes.list, Some(vec![]));
    }
}
