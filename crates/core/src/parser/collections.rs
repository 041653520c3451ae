use super::Parser;
use crate::ast::{Association, Collection, Component, Extent, Range, Series, Structure};
use crate::error::Error;

const RANGE: &[&str] = &["$range", "$primitive"];
const ASSOCIATION: &[&str] = &["$association", "$primitive", "$component"];
const STRUCTURE: &[&str] = &["$structure", "$association", "$primitive", "$component"];
const SERIES: &[&str] = &["$series", "$component"];

impl<'a> Parser<'a> {
    // -- Collections --------------------------------------------

    /// A range, structure or series. Ranges are recognised by trial parse
    /// of `bracket endpoint ".."`; the bracket is shared with series,
    /// structures and parenthesized expressions.
    pub(super) fn parse_collection(&mut self) -> Result<Option<Collection>, Error> {
        if let Some(range) = self.parse_range()? {
            return Ok(Some(Collection::Range(range)));
        }
        if !self.take_delimiter("[") {
            return Ok(None);
        }

        if self.at_delimiter(":") {
            let mark = self.stream.mark();
            self.stream.next();
            if self.take_delimiter("]") {
                return Ok(Some(Collection::Structure(Structure::default())));
            }
            self.backtrack(mark, "$structure");
        }
        if self.take_delimiter("]") {
            return Ok(Some(Collection::Series(Series::default())));
        }

        let multiline = self.take_eol();
        let collection = match self.parse_association()? {
            Some(first) => Collection::Structure(self.parse_associations(first, multiline)?),
            None => Collection::Series(self.parse_values(multiline)?),
        };
        Ok(Some(collection))
    }

    fn parse_range(&mut self) -> Result<Option<Range>, Error> {
        let mark = self.stream.mark();
        let left = if self.take_delimiter("[") {
            "["
        } else if self.take_delimiter("(") {
            "("
        } else {
            return Ok(None);
        };
        let Some(first) = self.parse_endpoint()? else {
            self.backtrack(mark, "$range");
            return Ok(None);
        };
        if !self.take_delimiter("..") {
            self.backtrack(mark, "$range");
            return Ok(None);
        }

        let last = self
            .parse_endpoint()?
            .ok_or_else(|| self.violation("right endpoint", RANGE))?;
        let extent = if self.take_delimiter("]") {
            Extent::from_brackets(left, "]")
        } else if self.take_delimiter(")") {
            Extent::from_brackets(left, ")")
        } else {
            None
        };
        let extent = extent.ok_or_else(|| self.violation("right bracket", RANGE))?;
        Ok(Some(Range::new(first, extent, last)?))
    }

    // -- Structures ---------------------------------------------

    /// `key ":" value`. Without the colon the key was the first value of
    /// a series.
    fn parse_association(&mut self) -> Result<Option<Association>, Error> {
        let mark = self.stream.mark();
        let Some(key) = self.parse_primitive()? else {
            return Ok(None);
        };
        if !self.take_delimiter(":") {
            self.backtrack(mark, "$association");
            return Ok(None);
        }
        let value = self
            .parse_component()?
            .ok_or_else(|| self.violation("$component", ASSOCIATION))?;
        Ok(Some(Association::new(key, value)))
    }

    fn parse_associations(&mut self, first: Association, multiline: bool) -> Result<Structure, Error> {
        let mut associations = vec![first];
        if multiline {
            loop {
                if !self.take_eol() {
                    return Err(self.violation("EOL", STRUCTURE));
                }
                match self.parse_association()? {
                    Some(association) => associations.push(association),
                    None => break,
                }
            }
        } else {
            while self.take_delimiter(",") {
                let association = self
                    .parse_association()?
                    .ok_or_else(|| self.violation("$association", STRUCTURE))?;
                associations.push(association);
            }
        }
        if !self.take_delimiter("]") {
            return Err(self.violation("]", &["$structure", "$associations"]));
        }
        Ok(Structure::new(associations)?)
    }

    // -- Series -------------------------------------------------

    fn parse_values(&mut self, multiline: bool) -> Result<Series, Error> {
        let mut values: Vec<Component> = Vec::new();
        let first = self
            .parse_component()?
            .ok_or_else(|| self.violation("$component", SERIES))?;
        values.push(first);
        if multiline {
            loop {
                if !self.take_eol() {
                    return Err(self.violation("EOL", SERIES));
                }
                match self.parse_component()? {
                    Some(value) => values.push(value),
                    None => break,
                }
            }
        } else {
            while self.take_delimiter(",") {
                let value = self
                    .parse_component()?
                    .ok_or_else(|| self.violation("$component", SERIES))?;
                values.push(value);
            }
        }
        if !self.take_delimiter("]") {
            return Err(self.violation("]", SERIES));
        }
        Ok(Series::new(values))
    }
}
