//!
//! src/random.rs
//!
//! Bounded uniform integer draws used to fill in search
//! parameters the caller left unset
//!

use rand::{Rng, SeedableRng, rngs::SmallRng};
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomError {
    #[error("invalid bound: upper bound must be positive, got {0}")]
    InvalidBound(i64),
    #[error("invalid range: min {min} exceeds max {max}")]
    InvalidRange { min: i64, max: i64 },
}

/// Uniform draw from [0, max_exclusive).
pub fn random_up_to(max_exclusive: i64) -> Result<i64, RandomError> {
    random_up_to_with(&mut SmallRng::from_entropy(), max_exclusive)
}

/// Uniform draw from [min, max], both ends included.
pub fn random_in_range(min: i64, max: i64) -> Result<i64, RandomError> {
    random_in_range_with(&mut SmallRng::from_entropy(), min, max)
}

/// Same draw against a caller supplied rng so tests can fix the seed
pub fn random_up_to_with(rng: &mut impl Rng, max_exclusive: i64) ->
    Result<i64, RandomError> {
    if max_exclusive <= 0 {
        return Err(RandomError::InvalidBound(max_exclusive));
    }
    Ok(rng.gen_range(0..max_exclusive))
}

pub fn random_in_range_with(rng: &mut impl Rng, min: i64, max: i64) ->
    Result<i64, RandomError> {
    if min > max {
        return Err(RandomError::InvalidRange { min, max });
    }
    Ok(rng.gen_range(min..=max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn up_to_stays_below_bound() {
        for _ in 0..1000 {
            let value = random_up_to(10).unwrap();
            assert!((0..10).contains(&value), "value {value} out of range");
        }
    }

    #[test]
    fn up_to_rejects_zero_and_negative_bounds() {
        assert_eq!(random_up_to(0), Err(RandomError::InvalidBound(0)));
        assert_eq!(random_up_to(-3), Err(RandomError::InvalidBound(-3)));
    }

    #[test]
    fn in_range_stays_inside_inclusive_bounds() {
        for _ in 0..1000 {
            let value = random_in_range(5, 8).unwrap();
            assert!((5..=8).contains(&value), "value {value} out of range");
        }
    }

    #[test]
    fn in_range_rejects_inverted_bounds() {
        assert_eq!(
            random_in_range(10, 5),
            Err(RandomError::InvalidRange { min: 10, max: 5 })
        );
    }

    #[test]
    fn in_range_degenerate_range_returns_min() {
        for _ in 0..100 {
            assert_eq!(random_in_range(7, 7).unwrap(), 7);
        }
    }

    #[test]
    fn fixed_seed_reproduces_the_sequence() {
        let mut a = SmallRng::seed_from_u64(42);
        let mut b = SmallRng::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(
                random_up_to_with(&mut a, 1000).unwrap(),
                random_up_to_with(&mut b, 1000).unwrap()
            );
            assert_eq!(
                random_in_range_with(&mut a, 1930, 2025).unwrap(),
                random_in_range_with(&mut b, 1930, 2025).unwrap()
            );
        }
    }
}
