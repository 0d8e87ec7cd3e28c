use num_bigint::BigUint;
use num_traits::One;

/// Computes `ceil(a / b)`. Assumes `a + b` does not overflow.
#[must_use]
pub const fn ceil_div_usize(a: usize, b: usize) -> usize {
    (a + b - 1) / b
}

/// Computes `ceil(sqrt(n))`.
#[must_use]
pub(crate) fn ceil_sqrt(n: &BigUint) -> BigUint {
    let root = n.sqrt();
    if &(&root * &root) < n {
        root + BigUint::one()
    } else {
        root
    }
}

#[cfg(test)]
mod tests {
    use crate::util::{ceil_div_usize, ceil_sqrt};
    use num_bigint::BigUint;

    #[test]
    fn test_ceil_div() {
        assert_eq!(ceil_div_usize(0, 8), 0);
        assert_eq!(ceil_div_usize(1, 8), 1);
        assert_eq!(ceil_div_usize(8, 8), 1);
        assert_eq!(ceil_div_usize(9, 8), 2);
    }

    #[test]
    fn test_ceil_sqrt() {
        for (n, root) in [(0u32, 0u32), (1, 1), (2, 2), (4, 2), (5, 3), (20, 5), (25, 5), (26, 6)] {
            assert_eq!(ceil_sqrt(&BigUint::from(n)), BigUint::from(root), "ceil_sqrt({})", n);
        }
    }
}
