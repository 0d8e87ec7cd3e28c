use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use rayon::prelude::*;
use tracing::{event, instrument, Level};

use crate::bitvec::BitVec;
use crate::config::SieveConfig;
use crate::error::SieveError;
use crate::estimate::compute_sieve_limit;
use crate::factors::{SmallestFactors, CONVENTIONAL_MARK};
use crate::residue::{first_odd_multiple_offset, residue};
use crate::traits::{PrimeSource, SieveMarks};
use crate::trial_division::TrialDivision;
use crate::util::ceil_sqrt;

/// Windows ending below this have every prime member checked in debug builds.
const DEBUG_PRIME_CHECK_BOUND: u64 = 1 << 20;

/// The result of sieving one window.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SieveOutcome<M> {
    /// One entry per offset; entry `i` describes `N + i`.
    pub marks: M,
    /// How many primes were sieved with, 2 included.
    pub primes_used: usize,
    /// The limit actually used, after tightening to `ceil(sqrt(N + gap))`.
    pub limit: u64,
}

/// Marks the members of `[N, N + gap]` that have a prime factor up to some limit.
///
/// A prime is never marked as a multiple of itself, and the values 0 and 1 are always marked.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntervalSieve {
    config: SieveConfig,
}

impl IntervalSieve {
    pub fn new(config: SieveConfig) -> Result<Self, SieveError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &SieveConfig {
        &self.config
    }

    /// Sieve `[n, n + gap]`, returning composite flags.
    pub fn composites(
        &self,
        n: &BigUint,
        gap: u64,
        limit: u64,
    ) -> Result<SieveOutcome<BitVec>, SieveError> {
        let mut primes = self.config.prime_source.build();
        self.sieve_with(n, gap, limit, &mut primes)
    }

    /// Sieve `[n, n + gap]`, recording the smallest prime factor found for each entry.
    pub fn smallest_factors(
        &self,
        n: &BigUint,
        gap: u64,
        limit: u64,
    ) -> Result<SieveOutcome<SmallestFactors>, SieveError> {
        let mut primes = self.config.prime_source.build();
        self.sieve_with(n, gap, limit, &mut primes)
    }

    /// Sieve `[n, n + gap]` with primes drawn from `primes`, which must be positioned before 2.
    #[instrument(level = "debug", skip(self, n, primes), fields(bits = n.bits()))]
    pub fn sieve_with<M, S>(
        &self,
        n: &BigUint,
        gap: u64,
        limit: u64,
        primes: &mut S,
    ) -> Result<SieveOutcome<M>, SieveError>
    where
        M: SieveMarks,
        S: PrimeSource + ?Sized,
    {
        let len = self.check_bounds::<M>(gap, limit)?;
        let limit = tighten_limit(n, gap, limit);
        let window = Window::new(n, gap, limit);

        let mut marks = M::with_len(len);
        let mut primes_used = 0;

        if limit >= 2 {
            let two = primes.next_prime();
            assert_eq!(two, 2, "prime source must start at 2");
            primes_used += 1;
            window.remove_evens(&mut marks);

            let mut p = primes.next_prime();

            // Small primes can divide several members of the window.
            while p <= limit && p <= gap {
                window.mark_multiples(&mut marks, p);
                primes_used += 1;
                p = primes.next_prime();
            }

            event!(
                Level::DEBUG,
                "{} / {} composite after primes up to {} ({} primes)",
                count_composites(&marks),
                len,
                p.min(limit),
                primes_used
            );

            // Past `gap`, odd multiples are more than the window apart: at most one hit each.
            while p <= limit {
                window.mark_single_multiple(&mut marks, p);
                primes_used += 1;
                p = primes.next_prime();
            }
        }

        window.mark_conventional(&mut marks);
        window.debug_check(&marks);

        Ok(SieveOutcome {
            marks,
            primes_used,
            limit,
        })
    }

    /// Sieve `[n, n + gap]` as independent sub-windows of `chunk_len` numbers on the rayon pool.
    ///
    /// Every sub-window is sieved against the full prime range with its own prime source, so the
    /// result is identical to [`IntervalSieve::sieve_with`]. `primes_used` and `limit` report the
    /// largest of any sub-window.
    pub fn sieve_parallel<M>(
        &self,
        n: &BigUint,
        gap: u64,
        limit: u64,
        chunk_len: u64,
    ) -> Result<SieveOutcome<M>, SieveError>
    where
        M: SieveMarks + Send,
    {
        self.check_bounds::<M>(gap, limit)?;
        let chunk_len = chunk_len.max(1);

        let chunks: Vec<(u64, u64)> = (0..=gap / chunk_len)
            .map(|i| {
                let start = i * chunk_len;
                let end = start.saturating_add(chunk_len - 1).min(gap);
                (start, end - start)
            })
            .collect();
        event!(Level::DEBUG, "Sieving {} sub-windows", chunks.len());

        let pieces = chunks
            .into_par_iter()
            .map(|(start, span)| {
                let anchor = n + start;
                let mut primes = self.config.prime_source.build();
                self.sieve_with::<M, _>(&anchor, span, limit, &mut primes)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut pieces = pieces.into_iter();
        let mut outcome = pieces
            .next()
            .expect("a window always has at least one sub-window");
        for piece in pieces {
            outcome.marks.append(piece.marks);
            outcome.primes_used = outcome.primes_used.max(piece.primes_used);
            outcome.limit = outcome.limit.max(piece.limit);
        }
        Ok(outcome)
    }

    /// Validate `gap` and `limit` against the configured ceilings, returning the window length.
    /// Nothing has been allocated when this fails.
    fn check_bounds<M: SieveMarks>(&self, gap: u64, limit: u64) -> Result<usize, SieveError> {
        if limit == 0 {
            return Err(SieveError::InvalidLimit { limit });
        }
        if limit > self.config.max_limit {
            return Err(SieveError::LimitTooLarge {
                limit,
                max: self.config.max_limit,
            });
        }
        if gap > self.config.max_gap {
            return Err(SieveError::GapTooLarge {
                gap,
                max: self.config.max_gap,
            });
        }
        let len = gap
            .checked_add(1)
            .and_then(|len| usize::try_from(len).ok())
            .ok_or(SieveError::GapTooLarge {
                gap,
                max: self.config.max_gap,
            })?;
        let bytes = (len as u128 * M::BITS_PER_ENTRY as u128).div_ceil(8);
        if bytes > self.config.max_marks_bytes as u128 {
            return Err(SieveError::MarksTooLarge {
                len: len as u64,
                bytes: u64::try_from(bytes).unwrap_or(u64::MAX),
                max: self.config.max_marks_bytes,
            });
        }
        Ok(len)
    }
}

/// Primes above `sqrt(N + gap)` cannot reveal a composite in the window, so lower `limit` to
/// `ceil(sqrt(N + gap))` when that is smaller. Never below 2, so that 0 keeps its factor 2.
fn tighten_limit(n: &BigUint, gap: u64, limit: u64) -> u64 {
    let end = n + gap;
    // The root of anything wider cannot fit in a u64; keep the caller's limit.
    if end.bits() > 2 * u64::BITS as u64 {
        return limit;
    }
    match ceil_sqrt(&end).to_u64() {
        Some(root) if root.max(2) < limit => {
            event!(
                Level::DEBUG,
                "Tightening limit from {} to {}",
                limit,
                root.max(2)
            );
            root.max(2)
        }
        _ => limit,
    }
}

fn count_composites<M: SieveMarks>(marks: &M) -> usize {
    (0..marks.len()).filter(|&i| marks.is_composite(i)).count()
}

/// The per-call view of `[N, N + gap]`.
struct Window<'a> {
    n: &'a BigUint,
    gap: u64,
    /// `N` as a machine integer, if it fits.
    start: Option<u64>,
    /// Whether `N > limit`, in which case no sieving prime is a member of the window.
    above_limit: bool,
}

impl<'a> Window<'a> {
    fn new(n: &'a BigUint, gap: u64, limit: u64) -> Self {
        let start = n.to_u64();
        let above_limit = start.map_or(true, |s| s > limit);
        Self {
            n,
            gap,
            start,
            above_limit,
        }
    }

    /// The offset of the absolute value `value`, if it lies in the window.
    fn offset_of(&self, value: u64) -> Option<usize> {
        let start = self.start?;
        let offset = value.checked_sub(start)?;
        (offset <= self.gap).then_some(offset as usize)
    }

    /// The offset holding `p` itself, which must not be marked by `p`.
    #[inline]
    fn self_offset(&self, p: u64) -> Option<u64> {
        if self.above_limit {
            None
        } else {
            self.offset_of(p).map(|o| o as u64)
        }
    }

    /// Mark every even member, then restore 2.
    fn remove_evens<M: SieveMarks>(&self, marks: &mut M) {
        let first = residue(self.n, 2);
        for offset in (first..=self.gap).step_by(2) {
            marks.mark(offset as usize, 2);
        }
        if let Some(two) = self.offset_of(2) {
            marks.unmark(two);
        }
    }

    /// Mark every odd multiple of `p` in the window, except `p` itself.
    fn mark_multiples<M: SieveMarks>(&self, marks: &mut M, p: u64) {
        let mut offset = first_odd_multiple_offset(self.n, p);
        if Some(offset) == self.self_offset(p) {
            offset += 2 * p;
        }
        while offset <= self.gap {
            marks.mark(offset as usize, p);
            offset += 2 * p;
        }
    }

    /// Mark the only odd multiple of `p` the window can hold, if any.
    fn mark_single_multiple<M: SieveMarks>(&self, marks: &mut M, p: u64) {
        let offset = first_odd_multiple_offset(self.n, p);
        if offset <= self.gap && Some(offset) != self.self_offset(p) {
            marks.mark(offset as usize, p);
        }
    }

    /// 0 and 1 are composite by convention. A factor already recorded for 0 is kept.
    fn mark_conventional<M: SieveMarks>(&self, marks: &mut M) {
        if self.n.is_zero() {
            marks.mark(0, CONVENTIONAL_MARK);
        }
        if let Some(one) = self.offset_of(1) {
            marks.mark(one, CONVENTIONAL_MARK);
        }
    }

    fn debug_check<M: SieveMarks>(&self, marks: &M) {
        debug_assert_eq!(marks.len() as u64, self.gap + 1);
        if let Some(two) = self.offset_of(2) {
            debug_assert!(!marks.is_composite(two), "2 marked composite");
        }
        if let Some(one) = self.offset_of(1) {
            debug_assert!(marks.is_composite(one), "1 left unmarked");
        }
        // Trial division is only affordable for small values.
        let small = self
            .start
            .filter(|&s| s.saturating_add(self.gap) < DEBUG_PRIME_CHECK_BOUND);
        if let Some(start) = small {
            if cfg!(debug_assertions) {
                for offset in 0..=self.gap {
                    let value = start + offset;
                    debug_assert!(
                        !(TrialDivision::is_prime(value) && marks.is_composite(offset as usize)),
                        "prime {} marked composite",
                        value
                    );
                }
            }
        }
    }
}

/// Sieve `[n, n + gap]` with the default configuration, returning `gap + 1` composite flags.
pub fn sieve_interval(n: &BigUint, gap: u64, limit: u64) -> Result<BitVec, SieveError> {
    Ok(IntervalSieve::default().composites(n, gap, limit)?.marks)
}

/// Sieve `[n, n + gap]` with a limit estimated from the size of `n`.
pub fn sieve_with_estimated_limit(
    n: &BigUint,
    gap: u64,
) -> Result<SieveOutcome<BitVec>, SieveError> {
    let bits = n.bits().max(1) as f64;
    let limit = compute_sieve_limit(bits, gap)?;
    IntervalSieve::default().composites(n, gap, limit)
}

/// Parse a window start, accepting only plain decimal digits.
pub fn parse_anchor(s: &str) -> Result<BigUint, SieveError> {
    let digits = s.trim();
    if let Some(rest) = digits.strip_prefix('-') {
        if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SieveError::NegativeAnchor(digits.to_string()));
        }
    }
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SieveError::MalformedAnchor(s.to_string()));
    }
    BigUint::parse_bytes(digits.as_bytes(), 10)
        .ok_or_else(|| SieveError::MalformedAnchor(s.to_string()))
}

#[cfg(test)]
mod tests {
    use core::str::FromStr;

    use num_bigint::{BigUint, RandBigInt};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::interval::{parse_anchor, sieve_interval, sieve_with_estimated_limit, Window};
    use crate::{
        BitVec, EratosthenesPrimes, IntervalSieve, PrimeSourceKind, SieveConfig, SieveError,
        SieveMarks, SieveOfEratosthenes, SmallestFactors, CONVENTIONAL_MARK, DEFAULT_MAX_GAP,
    };

    fn small_primes(limit: u64) -> Vec<u64> {
        SieveOfEratosthenes::generate(limit as usize + 1)
            .into_iter()
            .map(|p| p as u64)
            .collect()
    }

    /// Trial-divide every member of the window by every prime up to `limit`.
    fn brute_factors(start: u64, gap: u64, limit: u64) -> Vec<u64> {
        let primes = small_primes(limit);
        (start..=start + gap)
            .map(|v| {
                match primes.iter().find(|&&p| v % p == 0 && v != p) {
                    Some(&p) => p,
                    None if v <= 1 => CONVENTIONAL_MARK,
                    None => 0,
                }
            })
            .collect()
    }

    fn brute(start: u64, gap: u64, limit: u64) -> BitVec {
        brute_factors(start, gap, limit)
            .into_iter()
            .map(|f| f > 0)
            .collect()
    }

    fn sieve(start: u64, gap: u64, limit: u64) -> BitVec {
        sieve_interval(&BigUint::from(start), gap, limit).unwrap()
    }

    fn values_where(start: u64, marks: &BitVec, composite: bool) -> Vec<u64> {
        marks
            .iter()
            .enumerate()
            .filter(|&(_, c)| c == composite)
            .map(|(i, _)| start + i as u64)
            .collect()
    }

    #[test]
    fn ten_to_twenty() {
        let marks = sieve(10, 10, 5);
        assert_eq!(marks.len(), 11);
        assert_eq!(values_where(10, &marks, true), vec![10, 12, 14, 15, 16, 18, 20]);
        assert_eq!(values_where(10, &marks, false), vec![11, 13, 17, 19]);
    }

    #[test]
    fn lone_two_survives() {
        let marks = sieve(2, 0, 2);
        assert_eq!(marks.len(), 1);
        assert!(!marks.get(0));
    }

    #[test]
    fn matches_brute_force() {
        for (s, g, mp) in [
            (1, 100, 10),
            (11, 89, 10),
            (100, 100, 10),
            (1001, 100, 10),
            (1001, 1000, 10),
            (1001, 100, 50),
            (1001, 1000, 50),
            (5, 1000, 3),
        ] {
            assert_eq!(sieve(s, g, mp), brute(s, g, mp), "s={} g={} mp={}", s, g, mp);
        }
    }

    #[test]
    fn matches_brute_force_near_limit() {
        // Windows starting below, inside and above every limit, including the limit itself.
        for start in 0..64 {
            for gap in [0, 1, 2, 5, 17, 64] {
                for limit in [1, 2, 3, 5, 7, 10, 31, 53, 100] {
                    assert_eq!(
                        sieve(start, gap, limit),
                        brute(start, gap, limit),
                        "start={} gap={} limit={}",
                        start,
                        gap,
                        limit
                    );
                }
            }
        }
    }

    #[test]
    fn prime_counts() {
        for (s, g, mp, expected) in [
            (0, 100, 10, 25),
            (1, 99, 10, 25),
            (1, 99, 100, 25),
            (101, 100, 20, 21),
            (101, 100, 100, 21),
            (1001, 1000, 3, 334),
            (1001, 1000, 30, 151),
            (1001, 1000, 50, 135),
            (1000001, 10000, 1100, 753),
        ] {
            assert_eq!(sieve(s, g, mp).count_zeros(), expected, "s={} g={} mp={}", s, g, mp);
        }
    }

    #[test]
    fn limit_overlaps_window() {
        for (mp, expected) in [(2, 50), (3, 34), (5, 28), (7, 25), (11, 25), (100, 25), (200, 25)] {
            let marks = sieve(1, 99, mp);
            assert_eq!(marks.count_zeros(), expected, "mp={}", mp);
            assert_eq!(marks, brute(1, 99, mp), "mp={}", mp);
        }
    }

    #[test]
    fn limit_tightened_to_root() {
        let limit = 10_000_000_000;
        for (s, g, expected) in [(1, 99, 25), (1000, 1000, 135), (1_000_000, 100, 6), (1_000_000_000, 100, 7)] {
            let outcome = IntervalSieve::default()
                .composites(&BigUint::from(s), g, limit)
                .unwrap();
            assert!(outcome.limit < limit);
            assert!(outcome.limit * outcome.limit >= s + g);
            assert_eq!(outcome.marks.count_zeros(), expected, "s={} g={}", s, g);
        }
        // The root of s + g = 100 is exact.
        let outcome = IntervalSieve::default()
            .composites(&BigUint::from(1u8), 99, limit)
            .unwrap();
        assert_eq!(outcome.limit, 10);
        assert_eq!(outcome.primes_used, 4);
    }

    #[test]
    fn zero_and_one_composite() {
        for (s, g) in [(0, 10), (1, 5), (0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)] {
            for limit in [1, 2, 10] {
                let marks = sieve(s, g, limit);
                assert_eq!(marks.len() as u64, g + 1);
                if s == 0 {
                    assert!(marks.get(0), "0 in [{}, {}] limit {}", s, s + g, limit);
                }
                if s + g >= 1 {
                    assert!(marks.get((1 - s) as usize), "1 in [{}, {}] limit {}", s, s + g, limit);
                }
            }
        }
    }

    #[test]
    fn primes_never_marked() {
        for &q in &small_primes(2000) {
            for gap in [0, 1, 10] {
                let marks = sieve(q, gap, 2000);
                assert!(!marks.get(0), "prime {} marked composite", q);
            }
        }
    }

    #[test]
    fn limit_equal_to_window_start() {
        // 5 is both the limit and the first member; sqrt(25) keeps the limit at 5.
        let outcome = IntervalSieve::default()
            .smallest_factors(&BigUint::from(5u8), 20, 5)
            .unwrap();
        assert_eq!(outcome.limit, 5);
        assert_eq!(outcome.marks.factor(0), None);
        // 15 is marked by 3 before 5 gets to it, and 25 by 5.
        assert_eq!(outcome.marks.factor(10), Some(3));
        assert_eq!(outcome.marks.factor(20), Some(5));
        assert_eq!(outcome.marks.to_composites(), brute(5, 20, 5));

        let marks = sieve(3, 5, 3);
        assert_eq!(values_where(3, &marks, false), vec![3, 5, 7]);
    }

    #[test]
    fn smallest_factors_match_brute_force() {
        for start in [0u64, 1, 2, 3, 90, 1001] {
            for gap in [0u64, 7, 150] {
                for limit in [1u64, 2, 3, 11, 13, 50, 1000] {
                    let outcome = IntervalSieve::default()
                        .smallest_factors(&BigUint::from(start), gap, limit)
                        .unwrap();
                    assert_eq!(
                        outcome.marks.as_slice(),
                        brute_factors(start, gap, limit).as_slice(),
                        "start={} gap={} limit={}",
                        start,
                        gap,
                        limit
                    );
                    assert_eq!(
                        outcome.marks.to_composites(),
                        sieve(start, gap, limit),
                        "start={} gap={} limit={}",
                        start,
                        gap,
                        limit
                    );
                }
            }
        }
    }

    #[test]
    fn large_anchor_matches_trial_division() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let primes = small_primes(5000);
        for _ in 0..5 {
            let n = rng.gen_biguint(256);
            let gap = rng.gen_range(0..2000u64);
            let outcome = IntervalSieve::default()
                .smallest_factors(&n, gap, 5000)
                .unwrap();
            assert_eq!(outcome.limit, 5000);
            assert_eq!(outcome.primes_used, primes.len());

            let mut expected = vec![0u64; gap as usize + 1];
            for &p in &primes {
                let r = (&n % p).iter_u64_digits().next().unwrap_or(0);
                let mut offset = (p - r) % p;
                while offset <= gap {
                    if expected[offset as usize] == 0 {
                        expected[offset as usize] = p;
                    }
                    offset += p;
                }
            }
            assert_eq!(outcome.marks.as_slice(), expected.as_slice());
        }
    }

    #[test]
    fn u64_anchor_above_limit() {
        let start = 1_000_000_000_000u64;
        let marks = sieve(start, 300, 1000);
        assert_eq!(marks, brute(start, 300, 1000));
    }

    #[test]
    fn idempotent() {
        let n = BigUint::from_str("1000000000000000000000000000000000000000000").unwrap();
        let first = sieve_interval(&n, 5000, 30_000).unwrap();
        let second = sieve_interval(&n, 5000, 30_000).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 5001);
    }

    #[test]
    fn prime_sources_agree() {
        let config = SieveConfig {
            prime_source: PrimeSourceKind::Eratosthenes,
            ..SieveConfig::default()
        };
        let eratosthenes = IntervalSieve::new(config).unwrap();
        let segmented = IntervalSieve::default();
        let n = BigUint::from_str("123456789012345678901234567890").unwrap();
        assert_eq!(
            eratosthenes.composites(&n, 3000, 200_000).unwrap(),
            segmented.composites(&n, 3000, 200_000).unwrap()
        );

        let mut primes = EratosthenesPrimes::new();
        let explicit = segmented
            .sieve_with::<BitVec, _>(&n, 3000, 200_000, &mut primes)
            .unwrap();
        assert_eq!(explicit.marks, sieve_interval(&n, 3000, 200_000).unwrap());
    }

    #[test]
    fn parallel_matches_sequential() {
        let sieve = IntervalSieve::default();
        let n = BigUint::from_str("98765432109876543210987654321").unwrap();
        let sequential = sieve.composites(&n, 10_000, 50_000).unwrap();
        for chunk_len in [997, 4096, 10_001, 1 << 20, u64::MAX] {
            let parallel = sieve
                .sieve_parallel::<BitVec>(&n, 10_000, 50_000, chunk_len)
                .unwrap();
            assert_eq!(parallel.marks, sequential.marks, "chunk_len={}", chunk_len);
        }

        // Small windows cross 0, 1, 2 and the limit in different chunks.
        let sequential = sieve.smallest_factors(&BigUint::from(0u8), 200, 13).unwrap();
        let parallel = sieve
            .sieve_parallel::<SmallestFactors>(&BigUint::from(0u8), 200, 13, 7)
            .unwrap();
        assert_eq!(parallel.marks, sequential.marks);
    }

    #[test]
    fn estimated_limit() {
        let n = BigUint::from(1u8) << 1000;
        let outcome = sieve_with_estimated_limit(&n, 2000).unwrap();
        assert_eq!(outcome.marks.len(), 2001);
        assert!(outcome.limit >= 1000);
    }

    #[test]
    fn rejects_out_of_bounds() {
        let config = SieveConfig {
            max_gap: 100,
            max_limit: 1000,
            ..SieveConfig::default()
        };
        let sieve = IntervalSieve::new(config).unwrap();
        let n = BigUint::from(5u8);
        assert!(matches!(
            sieve.composites(&n, 101, 10),
            Err(SieveError::GapTooLarge { gap: 101, max: 100 })
        ));
        assert!(matches!(
            sieve.composites(&n, 10, 1001),
            Err(SieveError::LimitTooLarge { limit: 1001, max: 1000 })
        ));
        assert!(matches!(
            sieve.composites(&n, 10, 0),
            Err(SieveError::InvalidLimit { limit: 0 })
        ));
        assert!(matches!(
            sieve.sieve_parallel::<BitVec>(&n, 101, 10, 10),
            Err(SieveError::GapTooLarge { .. })
        ));
        assert!(sieve.composites(&n, 100, 1000).is_ok());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "prime 7 marked composite")]
    fn debug_check_catches_marked_prime() {
        let n = BigUint::from(5u8);
        let window = Window::new(&n, 4, 3);
        let mut marks = BitVec::with_len(5);
        marks.mark(1, 2);
        marks.mark(4, 3);
        marks.mark(2, 7);
        window.debug_check(&marks);
    }

    #[test]
    fn marks_budget_checked_before_allocation() {
        let n = BigUint::from(1u8) << 200;
        assert!(matches!(
            IntervalSieve::default().smallest_factors(&n, DEFAULT_MAX_GAP, 3),
            Err(SieveError::MarksTooLarge { .. })
        ));
        assert!(matches!(
            IntervalSieve::default().sieve_parallel::<SmallestFactors>(
                &n,
                DEFAULT_MAX_GAP,
                3,
                1 << 20
            ),
            Err(SieveError::MarksTooLarge { .. })
        ));

        let config = SieveConfig {
            max_marks_bytes: 16,
            ..SieveConfig::default()
        };
        let sieve = IntervalSieve::new(config).unwrap();
        // 128 flags or 2 factors fit in 16 bytes.
        assert_eq!(sieve.composites(&n, 127, 10).unwrap().marks.len(), 128);
        assert!(matches!(
            sieve.composites(&n, 128, 10),
            Err(SieveError::MarksTooLarge { len: 129, bytes: 17, max: 16 })
        ));
        assert_eq!(sieve.smallest_factors(&n, 1, 10).unwrap().marks.len(), 2);
        assert!(matches!(
            sieve.smallest_factors(&n, 2, 10),
            Err(SieveError::MarksTooLarge { len: 3, bytes: 24, max: 16 })
        ));
    }

    #[test]
    fn anchor_parsing() {
        assert_eq!(parse_anchor("0").unwrap(), BigUint::from(0u8));
        assert_eq!(
            parse_anchor(" 18361375334787046697 ").unwrap(),
            BigUint::from(18361375334787046697u64)
        );
        assert!(matches!(parse_anchor("-5"), Err(SieveError::NegativeAnchor(_))));
        for bad in ["", " ", "12a", "1_000", "+5", "1 000", "0x10", "1e9", "-"] {
            assert!(
                matches!(parse_anchor(bad), Err(SieveError::MalformedAnchor(_))),
                "{:?}",
                bad
            );
        }
    }
}
