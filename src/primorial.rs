//! Anchors of the form `m * p# / d + a`, the usual way prime gaps are written down.

use core::fmt::{Display, Formatter};
use core::str::FromStr;

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, ToPrimitive};

use crate::error::SieveError;
use crate::segmented::SegmentedPrimes;
use crate::traits::PrimeSource;
use crate::trial_division::TrialDivision;

/// Largest `p` a [`PrimorialForm`] accepts. `40000#` already has about 57000 bits.
pub const MAX_PRIMORIAL_P: u64 = 40_000;

/// The product of all primes up to and including `p`.
#[must_use]
pub fn primorial(p: u64) -> BigUint {
    let mut product = BigUint::one();
    let mut primes = SegmentedPrimes::new();
    loop {
        let q = primes.next_prime();
        if q > p {
            return product;
        }
        product *= q;
    }
}

/// A validated `m * p# / d + a`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct PrimorialForm {
    pub m: u64,
    pub p: u64,
    pub d: u64,
    pub a: i64,
}

impl PrimorialForm {
    pub fn new(m: u64, p: u64, d: u64, a: i64) -> Result<Self, SieveError> {
        if m == 0 {
            return Err(SieveError::OutOfRange {
                field: "m",
                value: 0,
                expected: "a positive multiplier".into(),
            });
        }
        if p > MAX_PRIMORIAL_P {
            return Err(SieveError::OutOfRange {
                field: "p",
                value: p.into(),
                expected: format!("p <= {}", MAX_PRIMORIAL_P),
            });
        }
        if !TrialDivision::is_prime(p) {
            return Err(SieveError::NotPrime(p));
        }
        if d == 0 {
            return Err(SieveError::OutOfRange {
                field: "d",
                value: 0,
                expected: "a positive divisor".into(),
            });
        }
        if !primorial(p).is_multiple_of(&BigUint::from(d)) {
            return Err(SieveError::NonDividingDivisor { d, p });
        }
        Ok(Self { m, p, d, a })
    }

    /// `m * p# / d`, the number the offsets `a` are relative to.
    #[must_use]
    pub fn base(&self) -> BigUint {
        primorial(self.p) / self.d * self.m
    }

    /// `m * p# / d + a`.
    pub fn anchor(&self) -> Result<BigUint, SieveError> {
        self.at(self.a)
    }

    /// `m * p# / d + offset`.
    pub fn at(&self, offset: i64) -> Result<BigUint, SieveError> {
        let value = BigInt::from_biguint(Sign::Plus, self.base()) + offset;
        match value.to_biguint() {
            Some(n) => Ok(n),
            None => Err(SieveError::NegativeAnchor(self.label(offset))),
        }
    }

    /// `m * p# / d + offset` (or `- |offset|`), as printed for each survivor.
    #[must_use]
    pub fn label(&self, offset: i64) -> String {
        let sign = if offset < 0 { '-' } else { '+' };
        format!(
            "{} * {}# / {} {} {}",
            self.m,
            self.p,
            self.d,
            sign,
            offset.unsigned_abs()
        )
    }
}

impl Display for PrimorialForm {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.label(self.a))
    }
}

impl FromStr for PrimorialForm {
    type Err = SieveError;

    /// Accepts `m * P# / d ± a` and its variants: `m` may be omitted, `P#` may be parenthesized,
    /// and `d` may be `d#`, `(d1 * d2)` or `(d1# * d2)`. Whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let malformed = || SieveError::MalformedForm(s.to_string());
        let (m, p, d, a) = Cursor::new(&compact)
            .parse_form()
            .ok_or_else(malformed)?;
        PrimorialForm::new(m, p, d, a)
    }
}

/// Recursive-descent parser over the whitespace-free text of a form.
struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(s: &'a str) -> Self {
        Self { rest: s }
    }

    fn parse_form(mut self) -> Option<(u64, u64, u64, i64)> {
        let (m, p) = if self.peek() == Some('(') {
            (1, self.primorial_term()?)
        } else {
            let first = self.number()?;
            if self.eat('*') {
                (first, self.primorial_term()?)
            } else if self.eat('#') {
                (1, first)
            } else {
                return None;
            }
        };
        if !self.eat('/') {
            return None;
        }
        let d = self.divisor()?;
        let a = self.signed_offset()?;
        self.rest.is_empty().then_some((m, p, d, a))
    }

    /// `P#` or `(P#)`.
    fn primorial_term(&mut self) -> Option<u64> {
        let parenthesized = self.eat('(');
        let p = self.number()?;
        if !self.eat('#') {
            return None;
        }
        if parenthesized && !self.eat(')') {
            return None;
        }
        Some(p)
    }

    /// `d`, `d#`, `(d1 * d2)` or `(d1# * d2)`.
    fn divisor(&mut self) -> Option<u64> {
        if self.eat('(') {
            let first = self.maybe_primorial()?;
            if !self.eat('*') {
                return None;
            }
            let second = self.number()?;
            if !self.eat(')') {
                return None;
            }
            first.checked_mul(second)
        } else {
            self.maybe_primorial()
        }
    }

    /// `n` or `n#`, evaluated.
    fn maybe_primorial(&mut self) -> Option<u64> {
        let n = self.number()?;
        if self.eat('#') {
            // 59# already overflows a u64.
            if n >= 59 {
                return None;
            }
            primorial(n).to_u64()
        } else {
            Some(n)
        }
    }

    fn signed_offset(&mut self) -> Option<i64> {
        let negative = if self.eat('-') {
            true
        } else if self.eat('+') {
            false
        } else {
            return None;
        };
        let magnitude = i64::try_from(self.number()?).ok()?;
        Some(if negative { -magnitude } else { magnitude })
    }

    fn number(&mut self) -> Option<u64> {
        let end = self
            .rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.rest.len());
        if end == 0 {
            return None;
        }
        let (digits, rest) = self.rest.split_at(end);
        self.rest = rest;
        digits.parse().ok()
    }

    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn eat(&mut self, c: char) -> bool {
        match self.rest.strip_prefix(c) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }
}

/// The parameter ranges the `large_sieve` search accepts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SearchBounds {
    pub max_m: u64,
    /// Exclusive lower bound on `p`.
    pub min_p: u64,
    pub max_p: u64,
    pub min_a: i64,
    pub max_gap: u64,
}

impl Default for SearchBounds {
    fn default() -> Self {
        Self {
            max_m: i32::MAX as u64,
            min_p: 50,
            max_p: MAX_PRIMORIAL_P,
            min_a: -6_000_000,
            max_gap: 7_000_000,
        }
    }
}

impl SearchBounds {
    /// Check raw parameters before any primorial is computed.
    pub fn check(&self, m: u64, p: u64, a: i64, gap: u64) -> Result<(), SieveError> {
        if m == 0 || m > self.max_m {
            return Err(out_of_range("m", m.into(), format!("0 < m <= {}", self.max_m)));
        }
        if p <= self.min_p || p > self.max_p {
            return Err(out_of_range(
                "p",
                p.into(),
                format!("{} < p <= {}", self.min_p, self.max_p),
            ));
        }
        if a >= 0 || a < self.min_a {
            return Err(out_of_range("a", a.into(), format!("{} <= a < 0", self.min_a)));
        }
        if gap > self.max_gap {
            return Err(out_of_range(
                "gap",
                gap.into(),
                format!("gap <= {}", self.max_gap),
            ));
        }
        Ok(())
    }
}

fn out_of_range(field: &'static str, value: i128, expected: String) -> SieveError {
    SieveError::OutOfRange {
        field,
        value,
        expected,
    }
}
