use crate::traits::PrimeSource;

/// Numbers covered by one block. Large enough to amortise the per-block setup, small enough that
/// the odd-only flags stay in L1/L2 cache.
const BLOCK_SIZE: u64 = 1 << 16;

/// Flags per block; entry `i` stands for `block_start + 2i + 1`.
const ODD_BLOCK_SIZE: usize = (BLOCK_SIZE >> 1) as usize;

/// A cache-blocked segmented sieve, exposed as a [`PrimeSource`].
///
/// Only odd numbers are stored. Base primes are found lazily, just far enough to cover the square
/// root of the current block, so the cursor can run to any bound without materialising the primes
/// below it.
#[derive(Clone, Debug, Default)]
pub struct SegmentedPrimes {
    /// Whether 2 has been handed out yet.
    started: bool,
    /// First number of the current block, a multiple of `BLOCK_SIZE`.
    block_start: u64,
    /// Next flag to inspect in the current block.
    block_index: usize,
    is_prime: Vec<bool>,

    /// Odd primes used to sieve blocks, in increasing order.
    base_primes: Vec<u64>,
    /// For each base prime, the flag index of its next odd multiple, relative to the start of the
    /// block about to be sieved.
    next_multiple: Vec<u64>,
}

impl SegmentedPrimes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn sieve_block(&mut self) {
        let block_end = self.block_start + BLOCK_SIZE - 1;
        self.extend_base_primes(block_end);

        self.is_prime.clear();
        self.is_prime.resize(ODD_BLOCK_SIZE, true);

        for (&p, next) in self.base_primes.iter().zip(self.next_multiple.iter_mut()) {
            let mut i = *next;
            while i < ODD_BLOCK_SIZE as u64 {
                self.is_prime[i as usize] = false;
                // Consecutive odd multiples are 2p apart, i.e. p flags apart.
                i += p;
            }
            *next = i - ODD_BLOCK_SIZE as u64;
        }

        if self.block_start == 0 {
            // 1 is not prime.
            self.is_prime[0] = false;
        }
    }

    /// Add base primes until the largest one squared exceeds `block_end`.
    fn extend_base_primes(&mut self, block_end: u64) {
        loop {
            let last = self.base_primes.last().copied().unwrap_or(1);
            if last * last > block_end {
                return;
            }

            let mut candidate = last + 2;
            while !self.is_base_prime(candidate) {
                candidate += 2;
            }
            self.base_primes.push(candidate);

            // Start at the first odd multiple inside this block, but never below p^2; smaller
            // multiples have a smaller factor anyway, and p itself must stay unmarked.
            let first_multiple = candidate * candidate.max(self.block_start.div_ceil(candidate) | 1);
            self.next_multiple
                .push((first_multiple - self.block_start) >> 1);
        }
    }

    fn is_base_prime(&self, candidate: u64) -> bool {
        self.base_primes
            .iter()
            .take_while(|&&p| p * p <= candidate)
            .all(|&p| candidate % p != 0)
    }
}

impl PrimeSource for SegmentedPrimes {
    fn next_prime(&mut self) -> u64 {
        if !self.started {
            self.started = true;
            self.sieve_block();
            return 2;
        }

        loop {
            while self.block_index < ODD_BLOCK_SIZE {
                let i = self.block_index;
                self.block_index += 1;
                if self.is_prime[i] {
                    return self.block_start + 2 * i as u64 + 1;
                }
            }

            self.block_start += BLOCK_SIZE;
            self.block_index = 0;
            self.sieve_block();
        }
    }
}

impl Iterator for SegmentedPrimes {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        Some(self.next_prime())
    }
}
