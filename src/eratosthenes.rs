use crate::bitvec::BitVec;
use crate::traits::PrimeSource;

pub struct SieveOfEratosthenes;

impl SieveOfEratosthenes {
    /// Generate all primes up to a given `limit`, exclusive.
    pub fn generate(limit: usize) -> Vec<usize> {
        if limit < 2 {
            return vec![];
        }

        let mut is_nonprime = BitVec::new(limit);
        is_nonprime.set(0, true);
        is_nonprime.set(1, true);

        for n in 2..limit {
            if n * n >= limit {
                break;
            }
            if is_nonprime.get(n) {
                continue;
            }
            for multiple in (n * n..limit).step_by(n) {
                is_nonprime.set(multiple, true);
            }
        }

        (0..limit).filter(|&n| !is_nonprime.get(n)).collect()
    }
}

/// The length of the first segment sieved by an [`EratosthenesPrimes`] cursor.
const INITIAL_SEGMENT_LEN: u64 = 1 << 10;

/// Segments double in length up to this many numbers.
const MAX_SEGMENT_LEN: u64 = 1 << 20;

/// A [`PrimeSource`] backed by a plain sieve of Eratosthenes, run one segment at a time.
///
/// Only the primes of the current segment and the base primes up to the square root of its end
/// are held in memory. The base primes come from [`SieveOfEratosthenes::generate`], rerun with a
/// doubled bound whenever a segment reaches past the square of the largest one.
#[derive(Clone, Debug, Default)]
pub struct EratosthenesPrimes {
    /// Primes of the current segment, ascending.
    pending: Vec<u64>,
    position: usize,
    /// Everything below `bound` has been sieved.
    bound: u64,
    base_primes: Vec<u64>,
    /// `base_primes` holds every prime below this.
    base_bound: u64,
}

impl EratosthenesPrimes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sieve `[bound, bound + len)` into `pending`.
    fn next_segment(&mut self) {
        let low = self.bound;
        let len = low.clamp(INITIAL_SEGMENT_LEN, MAX_SEGMENT_LEN);
        let high = low + len;
        self.ensure_base_primes(high);

        let mut is_nonprime = BitVec::new(len as usize);
        for &p in &self.base_primes {
            if p * p >= high {
                break;
            }
            let first = (p * p).max(low.div_ceil(p) * p);
            for multiple in (first..high).step_by(p as usize) {
                is_nonprime.set((multiple - low) as usize, true);
            }
        }

        self.pending.clear();
        self.pending.extend(
            (0..len)
                .filter(|&i| !is_nonprime.get(i as usize))
                .map(|i| low + i)
                .filter(|&n| n >= 2),
        );
        self.position = 0;
        self.bound = high;
    }

    /// Make `base_primes` cover every prime whose square is below `high`.
    fn ensure_base_primes(&mut self, high: u64) {
        if self.base_bound.saturating_mul(self.base_bound) >= high {
            return;
        }
        while self.base_bound.saturating_mul(self.base_bound) < high {
            self.base_bound = (self.base_bound * 2).max(64);
        }
        self.base_primes = SieveOfEratosthenes::generate(self.base_bound as usize)
            .into_iter()
            .map(|p| p as u64)
            .collect();
    }
}

impl PrimeSource for EratosthenesPrimes {
    fn next_prime(&mut self) -> u64 {
        while self.position >= self.pending.len() {
            self.next_segment();
        }
        let p = self.pending[self.position];
        self.position += 1;
        p
    }
}

impl Iterator for EratosthenesPrimes {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        Some(self.next_prime())
    }
}
