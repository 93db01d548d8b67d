//! Primality oracle and the per-chunk scan built on it.
//!
//! The oracle is a pure function from an integer to a boolean. It carries
//! no state, so a single instance is shared by reference across every
//! execution unit of a run.

use crate::partition::Chunk;

/// A primality test callable from any number of threads at once.
pub trait Oracle: Sync {
    /// Returns `true` if `n` is prime. Defined for every `i64`,
    /// including zero and negative values (which are never prime).
    fn is_prime(&self, n: i64) -> bool;
}

impl<F> Oracle for F
where
    F: Fn(i64) -> bool + Sync,
{
    fn is_prime(&self, n: i64) -> bool {
        self(n)
    }
}

/// Trial division by 2, 3 and then every `6k ± 1` up to `√n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrialDivision;

impl Oracle for TrialDivision {
    fn is_prime(&self, n: i64) -> bool {
        if n <= 1 {
            return false;
        }
        if n <= 3 {
            return true;
        }
        if n % 2 == 0 || n % 3 == 0 {
            return false;
        }

        // `i <= n / i` is `i * i <= n` without the overflow near i64::MAX
        let mut i: i64 = 5;
        while i <= n / i {
            if n % i == 0 || n % (i + 2) == 0 {
                return false;
            }
            i += 6;
        }
        true
    }
}

/// Primes found inside one chunk, in ascending order.
///
/// Owned by the unit that produced it until it is handed to the
/// aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PartialResult {
    pub chunk: Chunk,
    pub primes: Vec<i64>,
}

impl PartialResult {
    pub fn len(&self) -> usize {
        self.primes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primes.is_empty()
    }
}

/// Scan every integer of `chunk` against `oracle`.
pub fn scan<O: Oracle + ?Sized>(oracle: &O, chunk: Chunk) -> PartialResult {
    let primes = (chunk.lo..=chunk.hi).filter(|&n| oracle.is_prime(n)).collect();
    PartialResult { chunk, primes }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trial_division_known_values() {
        let cases = [
            (1, false),
            (2, true),
            (3, true),
            (4, false),
            (5, true),
            (6, false),
            (7, true),
            (9, false),
            (11, true),
            (25, false),
            (100, false),
            (101, true),
            (1000, false),
            (1009, true),
            (7919, true),
        ];

        for (n, expected) in cases {
            assert_eq!(TrialDivision.is_prime(n), expected, "is_prime({})", n);
        }
    }

    #[test]
    fn test_non_positive_is_never_prime() {
        for n in [0, -1, -2, -3, -7, i64::MIN] {
            assert!(!TrialDivision.is_prime(n), "{} reported prime", n);
        }
    }

    #[test]
    fn test_large_values_do_not_overflow() {
        assert!(TrialDivision.is_prime(1_000_000_007));
        assert!(!TrialDivision.is_prime(1_000_000_007 * 3));
        // 2^63 - 1 = 7^2 * 73 * 127 * 337 * 92737 * 649657
        assert!(!TrialDivision.is_prime(i64::MAX));
    }

    #[test]
    fn test_scan_is_ordered() {
        let result = scan(&TrialDivision, Chunk { lo: 10, hi: 30 });
        assert_eq!(result.primes, vec![11, 13, 17, 19, 23, 29]);
        assert_eq!(result.chunk, Chunk { lo: 10, hi: 30 });
    }

    #[test]
    fn test_closure_oracle() {
        let evens = |n: i64| n % 2 == 0;
        let result = scan(&evens, Chunk { lo: 1, hi: 6 });
        assert_eq!(result.primes, vec![2, 4, 6]);
    }
}
