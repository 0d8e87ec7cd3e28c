use crate::traits::SieveMarks;

/// Offsets of the entries not marked composite, in ascending order.
pub fn survivors<M: SieveMarks>(marks: &M) -> impl Iterator<Item = usize> + '_ {
    (0..marks.len()).filter(move |&i| !marks.is_composite(i))
}

#[must_use]
pub fn extract_survivors<M: SieveMarks>(marks: &M) -> Vec<usize> {
    survivors(marks).collect()
}

#[must_use]
pub fn count_survivors<M: SieveMarks>(marks: &M) -> usize {
    survivors(marks).count()
}
