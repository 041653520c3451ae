//! Primitive literal values and their canonical text codec.
//!
//! Each literal kind is its own type that decodes with [`std::str::FromStr`]
//! and encodes its canonical spelling with [`std::fmt::Display`]. A decoded
//! value always re-encodes to text that decodes back to an equal value.

pub mod elements;
pub mod numeric;
pub mod strings;
pub mod temporal;

use std::cmp::Ordering;
use std::fmt;

pub use elements::{Pattern, Resource, Symbol, Tag};
pub use numeric::{Angle, Number, Percentage, Probability};
pub use strings::{Binary, Bytecode, Moniker, Narrative, Quote, Version};
pub use temporal::{Duration, Moment, Span};

/// A literal value: an element or a string.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Angle(Angle),
    Boolean(bool),
    Duration(Duration),
    Moment(Moment),
    Number(Number),
    Pattern(Pattern),
    Percentage(Percentage),
    Probability(Probability),
    Resource(Resource),
    Symbol(Symbol),
    Tag(Tag),
    Binary(Binary),
    Moniker(Moniker),
    Narrative(Narrative),
    Quote(Quote),
    Version(Version),
    /// A single character. Only appears as a range endpoint.
    Rune(char),
}

impl Primitive {
    /// Lower-case name of the literal kind, as used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Primitive::Angle(_) => "angle",
            Primitive::Boolean(_) => "boolean",
            Primitive::Duration(_) => "duration",
            Primitive::Moment(_) => "moment",
            Primitive::Number(_) => "number",
            Primitive::Pattern(_) => "pattern",
            Primitive::Percentage(_) => "percentage",
            Primitive::Probability(_) => "probability",
            Primitive::Resource(_) => "resource",
            Primitive::Symbol(_) => "symbol",
            Primitive::Tag(_) => "tag",
            Primitive::Binary(_) => "binary",
            Primitive::Moniker(_) => "moniker",
            Primitive::Narrative(_) => "narrative",
            Primitive::Quote(_) => "quote",
            Primitive::Version(_) => "version",
            Primitive::Rune(_) => "rune",
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(
            self,
            Primitive::Binary(_)
                | Primitive::Moniker(_)
                | Primitive::Narrative(_)
                | Primitive::Quote(_)
                | Primitive::Version(_)
        )
    }

    /// Values with a successor: a range over them can be enumerated.
    pub fn is_discrete(&self) -> bool {
        match self {
            Primitive::Boolean(_)
            | Primitive::Duration(_)
            | Primitive::Moment(_)
            | Primitive::Rune(_) => true,
            Primitive::Number(number) => number.as_integer().is_some(),
            _ => false,
        }
    }

    /// Values on a continuum: a range over them can only test membership.
    pub fn is_continuous(&self) -> bool {
        match self {
            Primitive::Angle(_) | Primitive::Percentage(_) | Primitive::Probability(_) => true,
            Primitive::Number(number) => number.is_real() && !number.is_undefined(),
            _ => false,
        }
    }
}

/// Only values of the same kind compare.
impl PartialOrd for Primitive {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        use Primitive as P;
        match (self, other) {
            (P::Angle(a), P::Angle(b)) => a.radians().partial_cmp(&b.radians()),
            (P::Boolean(a), P::Boolean(b)) => a.partial_cmp(b),
            (P::Duration(a), P::Duration(b)) => a.partial_cmp(b),
            (P::Moment(a), P::Moment(b)) => a.partial_cmp(b),
            (P::Number(a), P::Number(b)) if a.is_real() && b.is_real() => a.re().partial_cmp(&b.re()),
            (P::Percentage(a), P::Percentage(b)) => a.value().partial_cmp(&b.value()),
            (P::Probability(a), P::Probability(b)) => a.value().partial_cmp(&b.value()),
            (P::Resource(a), P::Resource(b)) => a.partial_cmp(b),
            (P::Symbol(a), P::Symbol(b)) => a.partial_cmp(b),
            (P::Tag(a), P::Tag(b)) => a.partial_cmp(b),
            (P::Binary(a), P::Binary(b)) => a.partial_cmp(b),
            (P::Moniker(a), P::Moniker(b)) => a.partial_cmp(b),
            (P::Narrative(a), P::Narrative(b)) => a.partial_cmp(b),
            (P::Quote(a), P::Quote(b)) => a.partial_cmp(b),
            (P::Version(a), P::Version(b)) => a.partial_cmp(b),
            (P::Rune(a), P::Rune(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

/// Top-level spelling. Nested narratives and long binaries are laid out
/// by the formatter.
impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Angle(v) => fmt::Display::fmt(v, f),
            Primitive::Boolean(v) => fmt::Display::fmt(v, f),
            Primitive::Duration(v) => fmt::Display::fmt(v, f),
            Primitive::Moment(v) => fmt::Display::fmt(v, f),
            Primitive::Number(v) => fmt::Display::fmt(v, f),
            Primitive::Pattern(v) => fmt::Display::fmt(v, f),
            Primitive::Percentage(v) => fmt::Display::fmt(v, f),
            Primitive::Probability(v) => fmt::Display::fmt(v, f),
            Primitive::Resource(v) => fmt::Display::fmt(v, f),
            Primitive::Symbol(v) => fmt::Display::fmt(v, f),
            Primitive::Tag(v) => fmt::Display::fmt(v, f),
            Primitive::Binary(v) => fmt::Display::fmt(v, f),
            Primitive::Moniker(v) => fmt::Display::fmt(v, f),
            Primitive::Narrative(v) => fmt::Display::fmt(v, f),
            Primitive::Quote(v) => fmt::Display::fmt(v, f),
            Primitive::Version(v) => fmt::Display::fmt(v, f),
            Primitive::Rune(c) => {
                f.write_str("\"")?;
                strings::write_escaped(f, c.encode_utf8(&mut [0; 4]))?;
                f.write_str("\"")
            }
        }
    }
}

macro_rules! primitive_from {
    ($($variant:ident($value:ty)),* $(,)?) => {
        $(
            impl From<$value> for Primitive {
                fn from(value: $value) -> Self {
                    Primitive::$variant(value)
                }
            }
        )*
    };
}

primitive_from!(
    Angle(Angle),
    Boolean(bool),
    Duration(Duration),
    Moment(Moment),
    Number(Number),
    Pattern(Pattern),
    Percentage(Percentage),
    Probability(Probability),
    Resource(Resource),
    Symbol(Symbol),
    Tag(Tag),
    Binary(Binary),
    Moniker(Moniker),
    Narrative(Narrative),
    Quote(Quote),
    Version(Version),
    Rune(char),
);
