use num_bigint::BigUint;

/// Computes `n mod modulus` as a machine integer.
#[must_use]
#[inline]
pub fn residue(n: &BigUint, modulus: u64) -> u64 {
    assert_ne!(modulus, 0, "residue modulo zero");
    // The remainder is below `modulus`, so it has at most one 64-bit digit.
    (n % modulus).iter_u64_digits().next().unwrap_or(0)
}

/// The smallest offset `o >= 0` such that `n + o` is an odd multiple of `p`.
///
/// Uses a single residue modulo `2p`; the result lies in `[0, 2p)`. Requires an odd `p` with
/// `3p` representable.
#[must_use]
#[inline]
pub(crate) fn first_odd_multiple_offset(n: &BigUint, p: u64) -> u64 {
    let r = residue(n, 2 * p);
    if r <= p {
        p - r
    } else {
        3 * p - r
    }
}
