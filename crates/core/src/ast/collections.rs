use std::cmp::Ordering;

use crate::ast::Component;
use crate::error::SemanticError;
use crate::literals::Primitive;
use crate::ordinal::{Discrete, Indexed, Interval};

#[derive(Debug, Clone, PartialEq)]
pub enum Collection {
    Series(Series),
    Structure(Structure),
    Range(Range),
}

// ──────────────────────────────────────────────
// Series
// ──────────────────────────────────────────────

/// Ordered values; duplicates allowed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series(Vec<Component>);

impl Series {
    pub fn new(values: Vec<Component>) -> Self {
        Series(values)
    }

    pub fn values(&self) -> &[Component] {
        &self.0
    }

    pub fn push(&mut self, value: impl Into<Component>) {
        self.0.push(value.into());
    }
}

impl Indexed for Series {
    type Item<'a> = &'a Component;

    fn size(&self) -> usize {
        self.0.len()
    }

    fn at_offset(&self, offset: usize) -> &Component {
        &self.0[offset]
    }
}

// ──────────────────────────────────────────────
// Structure
// ──────────────────────────────────────────────

/// A key bound to a value inside a structure. The key is fixed once bound.
#[derive(Debug, Clone, PartialEq)]
pub struct Association {
    key: Primitive,
    value: Component,
}

impl Association {
    pub fn new(key: Primitive, value: impl Into<Component>) -> Self {
        Association {
            key,
            value: value.into(),
        }
    }

    pub fn key(&self) -> &Primitive {
        &self.key
    }

    pub fn value(&self) -> &Component {
        &self.value
    }

    /// Replace the bound value, returning the previous one.
    pub fn set_value(&mut self, value: impl Into<Component>) -> Component {
        std::mem::replace(&mut self.value, value.into())
    }
}

/// Associations with pairwise distinct keys, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    associations: Vec<Association>,
}

impl Structure {
    pub fn new(associations: Vec<Association>) -> Result<Self, SemanticError> {
        let mut structure = Structure::default();
        for association in associations {
            structure.push(association)?;
        }
        Ok(structure)
    }

    pub fn associations(&self) -> &[Association] {
        &self.associations
    }

    pub fn associations_mut(&mut self) -> &mut [Association] {
        &mut self.associations
    }

    pub fn keys(&self) -> impl Iterator<Item = &Primitive> {
        self.associations.iter().map(Association::key)
    }

    pub fn get(&self, key: &Primitive) -> Option<&Component> {
        self.associations
            .iter()
            .find(|a| &a.key == key)
            .map(Association::value)
    }

    /// Bind a new key at the end of the structure.
    pub fn insert(&mut self, key: Primitive, value: impl Into<Component>) -> Result<(), SemanticError> {
        self.push(Association::new(key, value))
    }

    fn push(&mut self, association: Association) -> Result<(), SemanticError> {
        if self.associations.iter().any(|a| a.key == association.key) {
            return Err(SemanticError::DuplicateKey {
                key: association.key.to_string(),
            });
        }
        self.associations.push(association);
        Ok(())
    }
}

impl Indexed for Structure {
    type Item<'a> = &'a Association;

    fn size(&self) -> usize {
        self.associations.len()
    }

    fn at_offset(&self, offset: usize) -> &Association {
        &self.associations[offset]
    }
}

// ──────────────────────────────────────────────
// Range
// ──────────────────────────────────────────────

/// Which endpoints a range includes, from its bracket pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extent {
    /// `[a..b]`
    Inclusive,
    /// `[a..b)`
    Left,
    /// `(a..b]`
    Right,
    /// `(a..b)`
    Exclusive,
}

impl Extent {
    pub fn from_brackets(left: &str, right: &str) -> Option<Extent> {
        match (left, right) {
            ("[", "]") => Some(Extent::Inclusive),
            ("[", ")") => Some(Extent::Left),
            ("(", "]") => Some(Extent::Right),
            ("(", ")") => Some(Extent::Exclusive),
            _ => None,
        }
    }

    pub fn brackets(self) -> (&'static str, &'static str) {
        match self {
            Extent::Inclusive => ("[", "]"),
            Extent::Left => ("[", ")"),
            Extent::Right => ("(", "]"),
            Extent::Exclusive => ("(", ")"),
        }
    }

    pub fn includes_first(self) -> bool {
        matches!(self, Extent::Inclusive | Extent::Left)
    }

    pub fn includes_last(self) -> bool {
        matches!(self, Extent::Inclusive | Extent::Right)
    }
}

/// The values between two endpoints of the same orderable kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Range {
    first: Primitive,
    extent: Extent,
    last: Primitive,
}

impl Range {
    pub fn new(first: Primitive, extent: Extent, last: Primitive) -> Result<Self, SemanticError> {
        if first.kind() != last.kind() {
            return Err(SemanticError::MismatchedEndpoints {
                first: first.kind(),
                last: last.kind(),
            });
        }
        let discrete = first.is_discrete() && last.is_discrete();
        let continuous = first.is_continuous() && last.is_continuous();
        if !discrete && !continuous {
            return Err(SemanticError::UnorderedEndpoints {
                first: first.kind(),
                last: last.kind(),
            });
        }
        Ok(Range {
            first,
            extent,
            last,
        })
    }

    pub fn first(&self) -> &Primitive {
        &self.first
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn last(&self) -> &Primitive {
        &self.last
    }

    /// Whether `value` lies between the endpoints, honouring the extent.
    /// Values of another kind are never contained.
    pub fn contains(&self, value: &Primitive) -> bool {
        let above = match value.partial_cmp(&self.first) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Equal) => self.extent.includes_first(),
            _ => false,
        };
        let below = match value.partial_cmp(&self.last) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => self.extent.includes_last(),
            _ => false,
        };
        above && below
    }

    /// The integers of a range over whole numbers.
    pub fn integers(&self) -> Option<Interval<i64>> {
        match (&self.first, &self.last) {
            (Primitive::Number(first), Primitive::Number(last)) => {
                Some(self.interval(first.as_integer()?, last.as_integer()?))
            }
            _ => None,
        }
    }

    /// The characters of a range over runes.
    pub fn runes(&self) -> Option<Interval<char>> {
        match (&self.first, &self.last) {
            (Primitive::Rune(first), Primitive::Rune(last)) => {
                Some(self.interval(first.ordinal(), last.ordinal()))
            }
            _ => None,
        }
    }

    /// Number of values in an enumerable range.
    pub fn size(&self) -> Option<usize> {
        if let Some(integers) = self.integers() {
            return Some(integers.size());
        }
        if let Some(runes) = self.runes() {
            return Some(runes.size());
        }
        match (&self.first, &self.last) {
            (Primitive::Boolean(first), Primitive::Boolean(last)) => {
                Some(self.interval::<i64>(i64::from(*first), i64::from(*last)).size())
            }
            _ => None,
        }
    }

    fn interval<T: Discrete>(&self, first: i64, last: i64) -> Interval<T> {
        let first = if self.extent.includes_first() { Some(first) } else { first.checked_add(1) };
        let last = if self.extent.includes_last() { Some(last) } else { last.checked_sub(1) };
        match (first, last) {
            (Some(first), Some(last)) => Interval::from_ordinals(first, last),
            // An excluded endpoint at the edge of the domain leaves nothing.
            _ => Interval::from_ordinals(1, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literals::{Number, Quote};
    use rstest::rstest;

    fn integer(value: i64) -> Primitive {
        Primitive::Number(Number::real(value as f64))
    }

    #[rstest]
    #[case(Extent::Inclusive, 5, true, true)]
    #[case(Extent::Left, 4, true, false)]
    #[case(Extent::Right, 4, false, true)]
    #[case(Extent::Exclusive, 3, false, false)]
    fn extents_decide_size_and_membership(
        #[case] extent: Extent,
        #[case] size: usize,
        #[case] has_first: bool,
        #[case] has_last: bool,
    ) {
        let range = Range::new(integer(3), extent, integer(7)).unwrap();
        assert_eq!(range.size(), Some(size));
        assert_eq!(range.contains(&integer(3)), has_first);
        assert_eq!(range.contains(&integer(7)), has_last);
        assert!(range.contains(&integer(5)));
        assert!(!range.contains(&integer(8)));
        assert!(!range.contains(&Primitive::Rune('5')));
    }

    #[test]
    fn integer_ranges_index_like_the_interval() {
        let range = Range::new(integer(3), Extent::Right, integer(7)).unwrap();
        let integers = range.integers().unwrap();
        assert_eq!(integers.item(1), Ok(4));
        assert_eq!(integers.index_of(&3), 0);
        assert_eq!(integers.index_of(&7), 4);
    }

    #[test]
    fn wide_integer_ranges_count_without_overflow() {
        let range = Range::new(integer(-9_000_000_000_000_000), Extent::Inclusive, integer(9_000_000_000_000_000)).unwrap();
        assert_eq!(range.size(), Some(18_000_000_000_000_000_001));
        let integers = range.integers().unwrap();
        assert_eq!(integers.index_of(&1), 9_000_000_000_000_000_002);

        let open = Range::new(integer(-9_000_000_000_000_000), Extent::Exclusive, integer(9_000_000_000_000_000)).unwrap();
        assert_eq!(open.size(), Some(17_999_999_999_999_999_999));
    }

    #[test]
    fn excluded_endpoints_at_the_domain_edge_are_empty() {
        let range = Range::new(integer(0), Extent::Right, integer(0)).unwrap();
        assert_eq!(range.interval::<i64>(i64::MAX, i64::MAX).size(), 0);
        let range = Range::new(integer(0), Extent::Left, integer(0)).unwrap();
        assert_eq!(range.interval::<i64>(i64::MIN, i64::MIN).size(), 0);
    }

    #[test]
    fn rune_ranges_enumerate_characters() {
        let range = Range::new(Primitive::Rune('a'), Extent::Inclusive, Primitive::Rune('z')).unwrap();
        let runes = range.runes().unwrap();
        assert_eq!(runes.size(), 26);
        assert_eq!(runes.item(4), Ok('d'));
        assert_eq!(runes.index_of(&'m'), 13);
    }

    #[test]
    fn continuous_ranges_only_test_membership() {
        let range = Range::new(integer(0), Extent::Inclusive, Primitive::Number(Number::real(2.5))).unwrap();
        assert_eq!(range.size(), None);
        assert!(range.contains(&Primitive::Number(Number::real(1.25))));
    }

    #[test]
    fn endpoints_must_share_an_ordered_kind() {
        assert_eq!(
            Range::new(integer(1), Extent::Inclusive, Primitive::Rune('z')),
            Err(SemanticError::MismatchedEndpoints {
                first: "number",
                last: "rune"
            })
        );
        let quote = Primitive::Quote(Quote::new("abc"));
        assert_eq!(
            Range::new(quote.clone(), Extent::Inclusive, quote),
            Err(SemanticError::UnorderedEndpoints {
                first: "quote",
                last: "quote"
            })
        );
    }

    #[test]
    fn structures_keep_keys_unique() {
        let mut structure = Structure::new(vec![Association::new(integer(1), integer(10))]).unwrap();
        assert!(structure.insert(integer(2), integer(20)).is_ok());
        assert_eq!(
            structure.insert(integer(1), integer(30)),
            Err(SemanticError::DuplicateKey {
                key: "1".to_owned()
            })
        );
        assert_eq!(structure.get(&integer(2)), Some(&Component::new(integer(20))));
        assert_eq!(structure.size(), 2);

        let previous = structure.associations_mut()[0].set_value(integer(11));
        assert_eq!(previous, Component::new(integer(10)));
        assert_eq!(structure.get(&integer(1)), Some(&Component::new(integer(11))));
    }

    #[test]
    fn series_allow_duplicates() {
        let mut series = Series::default();
        series.push(integer(1));
        series.push(integer(1));
        assert_eq!(series.size(), 2);
        assert_eq!(series.index_of(&&Component::new(integer(1))), 1);
    }
}
