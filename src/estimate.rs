//! Choosing how far to sieve.
//!
//! Mirrors the reasoning in GMP's `mpz_nextprime`: the average gap between primes near a `b`-bit
//! number is `b ln 2`, and sieving further than roughly `b^2.5` scaled by the number of expected
//! gaps in the window costs more than the primality tests it saves.

use core::f64::consts::LN_2;

use tracing::{event, Level};

use crate::error::SieveError;

/// Limits above this are clamped; sieving further rarely pays for itself.
pub const MAX_ESTIMATED_LIMIT: u64 = 10_000_000_000;

/// Limits below this are raised; a smaller sieve barely removes anything.
pub const MIN_ESTIMATED_LIMIT: u64 = 1_000;

/// Largest bit length the estimator accepts.
pub const MAX_BIT_LENGTH: f64 = 100_000.0;

/// Empirical divisor balancing sieve time against primality-test time.
const TUNING_CONSTANT: f64 = 124.0;

/// `e^γ`, from Mertens' third theorem.
const MERTENS_FACTOR: f64 = 1.7811;

/// Pick a sieve limit for a window of `gap` numbers of `bit_length` bits.
pub fn compute_sieve_limit(bit_length: f64, gap: u64) -> Result<u64, SieveError> {
    if !bit_length.is_finite() || bit_length <= 0.0 || bit_length > MAX_BIT_LENGTH {
        return Err(SieveError::InvalidBitLength { bits: bit_length });
    }
    if gap < 2 {
        return Err(SieveError::InvalidGap {
            gap,
            reason: "must be at least 2",
        });
    }

    // The number of average-sized prime gaps the window spans.
    let gaps_spanned = gap as f64 / (bit_length * LN_2);
    let limit = gaps_spanned * bit_length.powf(2.5) / TUNING_CONSTANT;

    if !limit.is_finite() || limit <= 0.0 {
        return Err(SieveError::UnusableLimit { limit });
    }

    if limit > MAX_ESTIMATED_LIMIT as f64 {
        event!(Level::WARN, "Large limit {:.2e}, clamping to {}", limit, MAX_ESTIMATED_LIMIT);
        return Ok(MAX_ESTIMATED_LIMIT);
    }
    if limit < MIN_ESTIMATED_LIMIT as f64 {
        event!(
            Level::DEBUG,
            "Small limit {:.1}, raising to {}",
            limit,
            MIN_ESTIMATED_LIMIT
        );
        return Ok(MIN_ESTIMATED_LIMIT);
    }
    Ok(limit as u64)
}

/// Expected survivors after sieving `gap` numbers with primes up to `limit`.
///
/// By Mertens' theorem, the fraction of integers with no prime factor up to `limit` is about
/// `1 / (e^γ ln limit)`.
#[must_use]
pub fn expected_survivors(gap: u64, limit: u64) -> f64 {
    if limit < 2 {
        return gap as f64;
    }
    gap as f64 / ((limit as f64).ln() * MERTENS_FACTOR)
}
