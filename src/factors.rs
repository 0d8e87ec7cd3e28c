use crate::bitvec::BitVec;
use crate::traits::SieveMarks;

/// Recorded for entries that are composite by convention rather than by a found factor, i.e. the
/// values 0 and 1.
pub const CONVENTIONAL_MARK: u64 = 1;

/// A marking array that keeps the smallest prime found dividing each entry.
///
/// `0` means no factor was found, [`CONVENTIONAL_MARK`] means the entry is composite by convention,
/// and anything else is the smallest witnessing prime.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SmallestFactors {
    factors: Vec<u64>,
}

impl SmallestFactors {
    #[must_use]
    pub fn factor(&self, index: usize) -> Option<u64> {
        match self.factors[index] {
            0 => None,
            f => Some(f),
        }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u64] {
        &self.factors
    }

    /// The plain composite flags, i.e. `factor > 0` for every entry.
    #[must_use]
    pub fn to_composites(&self) -> BitVec {
        self.factors.iter().map(|&f| f > 0).collect()
    }
}

impl SieveMarks for SmallestFactors {
    const BITS_PER_ENTRY: u64 = u64::BITS as u64;

    fn with_len(len: usize) -> Self {
        Self {
            factors: vec![0; len],
        }
    }

    fn len(&self) -> usize {
        self.factors.len()
    }

    #[inline]
    fn mark(&mut self, index: usize, prime: u64) {
        let entry = &mut self.factors[index];
        if *entry == 0 {
            *entry = prime;
        }
    }

    #[inline]
    fn unmark(&mut self, index: usize) {
        self.factors[index] = 0;
    }

    #[inline]
    fn is_composite(&self, index: usize) -> bool {
        self.factors[index] != 0
    }

    fn append(&mut self, mut other: Self) {
        self.factors.append(&mut other.factors);
    }
}
