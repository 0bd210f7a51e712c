//! Bucket-count schedule for [`Dictionary`](crate::Dictionary).
//!
//! Bucket counts are primes close to `2^(index + 3)` so that `hash % buckets`
//! does not inherit power-of-two bias from a hash function. The table is
//! fixed; running past its end is a capacity error rather than an extension.

use crate::error::{Error, Result};

/// Maximum average number of entries per bucket before a rebalance.
pub const LOAD_FACTOR: usize = 2;

/// Capacity hint used by `Dictionary::new`.
pub const DEFAULT_CAPACITY: usize = 10;

/// Prime bucket counts, one per rebalance step.
pub const BUCKET_COUNTS: [usize; 28] = [
    7,
    13,
    23,
    43,
    83,
    163,
    317,
    631,
    1_259,
    2_503,
    5_003,
    9_973,
    19_937,
    39_869,
    79_699,
    159_389,
    318_751,
    637_499,
    1_274_989,
    2_549_951,
    5_099_893,
    10_199_767,
    20_399_531,
    40_799_041,
    81_598_067,
    163_196_129,
    326_392_249,
    652_784_471,
];

/// Bucket count at position `index` of the schedule.
pub fn bucket_count(index: usize) -> Result<usize> {
    BUCKET_COUNTS
        .get(index)
        .copied()
        .ok_or(Error::CapacityExceeded {
            requested: BUCKET_COUNTS[BUCKET_COUNTS.len() - 1] * LOAD_FACTOR + 1,
        })
}

/// Smallest schedule position whose bucket count, scaled by the load
/// factor, holds more than `capacity` entries.
pub fn index_for_capacity(capacity: usize) -> Result<usize> {
    // `count > capacity / LOAD_FACTOR` over the reals, kept in integers.
    BUCKET_COUNTS
        .iter()
        .position(|&count| count * LOAD_FACTOR > capacity)
        .ok_or(Error::CapacityExceeded {
            requested: capacity,
        })
}

/// Largest number of entries the schedule can hold without exceeding the
/// load factor.
pub const fn max_capacity() -> usize {
    BUCKET_COUNTS[BUCKET_COUNTS.len() - 1] * LOAD_FACTOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_is_strictly_ascending_and_roughly_doubling() {
        for pair in BUCKET_COUNTS.windows(2) {
            assert!(pair[0] < pair[1]);
            let ratio = pair[1] as f64 / pair[0] as f64;
            assert!((1.7..=2.1).contains(&ratio), "ratio {ratio} for {pair:?}");
        }
    }

    #[test]
    fn schedule_entries_are_prime() {
        fn is_prime(n: usize) -> bool {
            n >= 2 && (2..).take_while(|d| d * d <= n).all(|d| n % d != 0)
        }
        for &count in BUCKET_COUNTS.iter().take(16) {
            assert!(is_prime(count), "{count} is not prime");
        }
    }

    /// Invariant: the chosen index is the first whose capacity exceeds the hint.
    #[test]
    fn capacity_maps_to_first_sufficient_index() {
        assert_eq!(index_for_capacity(0).unwrap(), 0);
        assert_eq!(index_for_capacity(10).unwrap(), 0);
        assert_eq!(index_for_capacity(13).unwrap(), 0);
        assert_eq!(index_for_capacity(14).unwrap(), 1);
        assert_eq!(index_for_capacity(DEFAULT_CAPACITY).unwrap(), 0);
        assert_eq!(index_for_capacity(1_000).unwrap(), 7);
        assert_eq!(
            index_for_capacity(max_capacity() - 1).unwrap(),
            BUCKET_COUNTS.len() - 1
        );
    }

    #[test]
    fn capacity_beyond_schedule_is_rejected() {
        assert_eq!(
            index_for_capacity(max_capacity()),
            Err(Error::CapacityExceeded {
                requested: max_capacity()
            })
        );
        assert!(bucket_count(BUCKET_COUNTS.len()).is_err());
        assert_eq!(bucket_count(0), Ok(7));
    }
}
