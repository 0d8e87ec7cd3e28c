use crate::traits::SieveMarks;
use crate::util::ceil_div_usize;
use core::fmt::{Debug, Formatter};

/// A packed array of flags. As a marking array, a set bit means "known composite".
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct BitVec {
    bytes: Vec<u8>,
    len: usize,
}

impl BitVec {
    #[must_use]
    pub fn new(len: usize) -> Self {
        let bytes = vec![0; ceil_div_usize(len, 8)];
        Self { bytes, len }
    }

    #[inline]
    pub fn set(&mut self, i: usize, v: bool) {
        assert!(i < self.len);
        let mask = 1 << (i % 8);
        if v {
            self.bytes[i / 8] |= mask;
        } else {
            self.bytes[i / 8] &= !mask;
        }
    }

    #[must_use]
    #[inline]
    pub fn get(&self, i: usize) -> bool {
        assert!(i < self.len);
        let byte = self.bytes[i / 8];
        byte & (1 << (i % 8)) != 0
    }

    #[must_use]
    #[inline]
    pub fn count_zeros(&self) -> usize {
        self.len() - self.count_ones()
    }

    #[must_use]
    #[inline]
    pub fn count_ones(&self) -> usize {
        self.bytes.iter().map(|byte| byte.count_ones()).sum::<u32>() as usize
    }

    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    fn resize(&mut self, len: usize) {
        // Shrinking might leave dirty bits, which we'd have to clear, or account for in Hash etc.
        assert!(len >= self.len, "Shrinking not supported for now");

        let num_bytes = ceil_div_usize(len, 8);
        self.bytes.resize(num_bytes, 0);
        self.len = len;
    }

    /// Append all bits of `other` after the last bit of `self`.
    pub fn extend_from(&mut self, other: &BitVec) {
        let offset = self.len;
        self.resize(offset + other.len);
        for (i, bit) in other.iter().enumerate() {
            if bit {
                self.set(offset + i, true);
            }
        }
    }

    #[must_use]
    pub fn iter(&self) -> BitVecIter {
        BitVecIter {
            bit_vec: self,
            position: 0,
        }
    }
}

impl SieveMarks for BitVec {
    const BITS_PER_ENTRY: u64 = 1;

    fn with_len(len: usize) -> Self {
        Self::new(len)
    }

    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn mark(&mut self, index: usize, _prime: u64) {
        self.set(index, true);
    }

    #[inline]
    fn unmark(&mut self, index: usize) {
        self.set(index, false);
    }

    #[inline]
    fn is_composite(&self, index: usize) -> bool {
        self.get(index)
    }

    fn append(&mut self, other: Self) {
        self.extend_from(&other);
    }
}

impl<const N: usize> From<[bool; N]> for BitVec {
    fn from(value: [bool; N]) -> Self {
        let mut result = BitVec::new(N);
        for (i, bit) in value.into_iter().enumerate() {
            result.set(i, bit);
        }
        result
    }
}

pub struct BitVecIter<'a> {
    bit_vec: &'a BitVec,
    position: usize,
}

impl<'a> Iterator for BitVecIter<'a> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        if self.position == self.bit_vec.len {
            None
        } else {
            let b = self.bit_vec.get(self.position);
            self.position += 1;
            Some(b)
        }
    }
}

impl FromIterator<bool> for BitVec {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        let mut res = Self::new(0);
        for b in iter {
            let i = res.len;
            res.resize(i + 1);
            res.set(i, b);
        }
        res
    }
}

impl Debug for BitVec {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        for i in 0..self.len {
            write!(f, "{}", self.get(i) as u8)?;
        }
        Ok(())
    }
}
