/// A forward-only cursor over the primes `2, 3, 5, 7, ...`.
///
/// Implementations must yield every prime exactly once, in strictly increasing order, starting
/// from 2. The interval sieve only relies on this contract, never on how the primes are made.
pub trait PrimeSource {
    fn next_prime(&mut self) -> u64;
}

impl<S: PrimeSource + ?Sized> PrimeSource for Box<S> {
    fn next_prime(&mut self) -> u64 {
        (**self).next_prime()
    }
}

/// Storage for the result of an interval sieve, one entry per offset into the window.
pub trait SieveMarks: Sized {
    /// Storage cost of one entry, used to bound allocations before they are made.
    const BITS_PER_ENTRY: u64;

    fn with_len(len: usize) -> Self;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record that `prime` divides the value at `index`. An entry that is already marked keeps its
    /// earlier witness.
    fn mark(&mut self, index: usize, prime: u64);

    fn unmark(&mut self, index: usize);

    fn is_composite(&self, index: usize) -> bool;

    /// Concatenate `other`, whose offsets continue where `self` ends.
    fn append(&mut self, other: Self);
}
