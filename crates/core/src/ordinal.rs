//! Ordinal indexing shared by every sequence in the notation.
//!
//! Indices are 1-based from the front and -1-based from the back: for a
//! sequence of size N, `1..=N` and `-N..=-1` are valid and `0` never is.

use std::marker::PhantomData;

use crate::error::IndexError;

/// Convert an ordinal index into a zero-based offset.
pub fn normalize(index: isize, size: usize) -> Result<usize, IndexError> {
    let out_of_bounds = IndexError { index, size };
    let magnitude = index.unsigned_abs();
    if index == 0 || magnitude > size {
        return Err(out_of_bounds);
    }
    if index > 0 {
        Ok(magnitude - 1)
    } else {
        Ok(size - magnitude)
    }
}

/// A finite sequence readable by ordinal index.
pub trait Indexed {
    type Item<'a>
    where
        Self: 'a;

    fn size(&self) -> usize;

    /// The item at a zero-based offset. The offset must be below `size`.
    fn at_offset(&self, offset: usize) -> Self::Item<'_>;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn item(&self, index: isize) -> Result<Self::Item<'_>, IndexError> {
        let offset = normalize(index, self.size())?;
        Ok(self.at_offset(offset))
    }

    /// Items from `first` through `last` inclusive. Empty when `last`
    /// comes before `first`.
    fn items(&self, first: isize, last: isize) -> Result<Vec<Self::Item<'_>>, IndexError> {
        let first = normalize(first, self.size())?;
        let last = normalize(last, self.size())?;
        Ok((first..=last).map(|offset| self.at_offset(offset)).collect())
    }

    /// Ordinal index of the first equal item, or 0 when there is none.
    fn index_of<'a>(&'a self, item: &Self::Item<'a>) -> usize
    where
        Self::Item<'a>: PartialEq,
    {
        (0..self.size())
            .find(|&offset| self.at_offset(offset) == *item)
            .map_or(0, |offset| offset + 1)
    }
}

/// Values with a successor, usable as the elements of an [`Interval`].
pub trait Discrete: Copy + PartialOrd {
    fn ordinal(self) -> i64;

    /// Inverse of [`Discrete::ordinal`] for ordinals lying between two
    /// valid values.
    fn from_ordinal(ordinal: i64) -> Self;
}

impl Discrete for i64 {
    fn ordinal(self) -> i64 {
        self
    }

    fn from_ordinal(ordinal: i64) -> Self {
        ordinal
    }
}

const SURROGATES_START: i64 = 0xD800;
const SURROGATES_SIZE: i64 = 0x800;

impl Discrete for char {
    /// Unicode scalar values are numbered without the surrogate gap.
    fn ordinal(self) -> i64 {
        let code = i64::from(u32::from(self));
        if code >= SURROGATES_START {
            code - SURROGATES_SIZE
        } else {
            code
        }
    }

    fn from_ordinal(ordinal: i64) -> Self {
        let code = if ordinal >= SURROGATES_START {
            ordinal + SURROGATES_SIZE
        } else {
            ordinal
        };
        u32::try_from(code)
            .ok()
            .and_then(char::from_u32)
            .unwrap_or(char::REPLACEMENT_CHARACTER)
    }
}

/// The values of a discrete range, first through last inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval<T> {
    first: i64,
    last: i64,
    values: PhantomData<T>,
}

impl<T: Discrete> Interval<T> {
    pub fn new(first: T, last: T) -> Self {
        Interval::from_ordinals(first.ordinal(), last.ordinal())
    }

    pub(crate) fn from_ordinals(first: i64, last: i64) -> Self {
        Interval {
            first,
            last,
            values: PhantomData,
        }
    }

    pub fn contains(&self, value: T) -> bool {
        (self.first..=self.last).contains(&value.ordinal())
    }

    pub fn first(&self) -> Option<T> {
        (!self.is_empty()).then(|| T::from_ordinal(self.first))
    }

    pub fn last(&self) -> Option<T> {
        (!self.is_empty()).then(|| T::from_ordinal(self.last))
    }
}

impl<T: Discrete> Indexed for Interval<T> {
    type Item<'a> = T where Self: 'a;

    /// Saturates at `usize::MAX` for intervals spanning the whole `i64` domain.
    fn size(&self) -> usize {
        let span = i128::from(self.last) - i128::from(self.first) + 1;
        usize::try_from(span.max(0)).unwrap_or(usize::MAX)
    }

    fn at_offset(&self, offset: usize) -> T {
        // `first + offset` never passes `last`, so the wrapped sum is exact.
        T::from_ordinal(self.first.wrapping_add(offset as i64))
    }

    fn index_of<'a>(&'a self, item: &Self::Item<'a>) -> usize
    where
        Self::Item<'a>: PartialEq,
    {
        if !self.contains(*item) {
            return 0;
        }
        let offset = i128::from(item.ordinal()) - i128::from(self.first);
        usize::try_from(offset + 1).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn normalizes_both_ends() {
        assert_eq!(normalize(1, 3), Ok(0));
        assert_eq!(normalize(3, 3), Ok(2));
        assert_eq!(normalize(-1, 3), Ok(2));
        assert_eq!(normalize(-3, 3), Ok(0));
    }

    #[test]
    fn rejects_zero_and_out_of_range() {
        assert_eq!(normalize(0, 3), Err(IndexError { index: 0, size: 3 }));
        assert!(normalize(4, 3).is_err());
        assert!(normalize(-4, 3).is_err());
        assert!(normalize(1, 0).is_err());
    }

    #[test]
    fn intervals_count_and_index_integers() {
        let interval = Interval::new(2i64, 5i64);
        assert_eq!(interval.size(), 4);
        assert_eq!(interval.item(1), Ok(2));
        assert_eq!(interval.item(-1), Ok(5));
        assert_eq!(interval.items(2, 3), Ok(vec![3, 4]));
        assert_eq!(interval.index_of(&4), 3);
        assert_eq!(interval.index_of(&9), 0);
        assert!(interval.contains(5));
        assert!(!interval.contains(6));
    }

    #[test]
    fn empty_intervals_have_no_items() {
        let interval = Interval::<i64>::from_ordinals(3, 2);
        assert_eq!(interval.size(), 0);
        assert!(interval.is_empty());
        assert_eq!(interval.first(), None);
        assert!(interval.item(1).is_err());
    }

    #[test]
    fn character_intervals_skip_surrogates() {
        let interval = Interval::new('\u{D7FF}', '\u{E000}');
        assert_eq!(interval.size(), 2);
        assert_eq!(interval.item(2), Ok('\u{E000}'));
        assert_eq!(Interval::new('a', 'z').size(), 26);
    }

    #[test]
    fn wide_intervals_count_without_overflow() {
        let wide = Interval::new(-9_000_000_000_000_000i64, 9_000_000_000_000_000i64);
        assert_eq!(wide.size(), 18_000_000_000_000_000_001);
        assert_eq!(wide.item(-1), Ok(9_000_000_000_000_000));
        assert_eq!(wide.index_of(&9_000_000_000_000_000), 18_000_000_000_000_000_001);
        assert_eq!(wide.index_of(&0), 9_000_000_000_000_000_001);

        let whole = Interval::new(i64::MIN, i64::MAX);
        assert_eq!(whole.size(), usize::MAX);
        assert_eq!(whole.item(1), Ok(i64::MIN));
        assert_eq!(whole.index_of(&i64::MIN), 1);
        assert_eq!(Interval::<i64>::from_ordinals(i64::MAX, i64::MIN).size(), 0);
    }

    proptest! {
        #[test]
        fn index_of_inverts_item(first in -1000i64..1000, len in 1i64..1000, seed in 0i64..1000) {
            let interval = Interval::new(first, first + len - 1);
            let value = first + seed % len;
            let index = interval.index_of(&value);
            prop_assert_eq!(interval.item(index as isize), Ok(value));
        }

        #[test]
        fn positive_and_negative_indices_meet(size in 1usize..500, seed in 0usize..500) {
            let index = (seed % size) as isize + 1;
            let mirror = index - size as isize - 1;
            prop_assert_eq!(normalize(index, size), normalize(mirror, size));
        }

        #[test]
        fn char_ordinals_round_trip(c in any::<char>()) {
            prop_assert_eq!(char::from_ordinal(c.ordinal()), c);
        }
    }
}
