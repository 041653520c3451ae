use super::Formatter;
use crate::ast::{Association, Collection, Component, Range, Series, Structure};

impl Formatter {
    // -- Collections --------------------------------------------

    pub(super) fn collection(&mut self, collection: &Collection) {
        match collection {
            Collection::Series(series) => self.series(series),
            Collection::Structure(structure) => self.structure(structure),
            Collection::Range(range) => self.range(range),
        }
    }

    fn series(&mut self, series: &Series) {
        match series.values() {
            [] => self.append("[ ]"),
            [only] if !only.is_annotated() => {
                self.append("[");
                self.component(only);
                self.append("]");
            }
            values => self.elements(values, |formatter, value: &Component| formatter.component(value)),
        }
    }

    fn structure(&mut self, structure: &Structure) {
        let association = |formatter: &mut Self, pair: &Association| {
            formatter.primitive(pair.key());
            formatter.append(": ");
            formatter.component(pair.value());
        };
        match structure.associations() {
            [] => self.append("[:]"),
            [only] if !only.value().is_annotated() => {
                self.append("[");
                association(self, only);
                self.append("]");
            }
            associations => self.elements(associations, association),
        }
    }

    /// One element per line, one level deeper than the brackets.
    fn elements<T>(&mut self, elements: &[T], mut element: impl FnMut(&mut Self, &T)) {
        self.append("[");
        self.indented(|formatter| {
            for item in elements {
                formatter.newline();
                element(formatter, item);
            }
        });
        self.newline();
        self.append("]");
    }

    fn range(&mut self, range: &Range) {
        let (left, right) = range.extent().brackets();
        self.append(left);
        self.primitive(range.first());
        self.append("..");
        self.primitive(range.last());
        self.append(right);
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Association, Component, Extent, Range, Series, Structure};
    use crate::formatter::format_component;
    use crate::literals::{Binary, Number, Primitive, Quote};
    use crate::parser::parse_document;
    use pretty_assertions::assert_eq;

    fn number(value: f64) -> Primitive {
        Primitive::Number(Number::real(value))
    }

    #[test]
    fn empty_collections_stay_on_one_line() {
        assert_eq!(format_component(&Component::new(Series::default())), "[ ]");
        assert_eq!(format_component(&Component::new(Structure::default())), "[:]");
    }

    #[test]
    fn single_elements_stay_inline_unless_annotated() {
        let series = Series::new(vec![Component::new(number(1.0))]);
        assert_eq!(format_component(&Component::new(series)), "[1]");

        let annotated = Series::new(vec![Component::new(number(1.0)).with_note("one")]);
        assert_eq!(format_component(&Component::new(annotated)), "[\n    1  ! one\n]");

        let structure = Structure::new(vec![Association::new(
            Primitive::Quote(Quote::new("key")),
            number(2.0),
        )])
        .unwrap();
        assert_eq!(format_component(&Component::new(structure)), "[\"key\": 2]");
    }

    #[test]
    fn nested_collections_indent_by_depth() {
        let inner = Series::new(vec![Component::new(number(1.0)), Component::new(number(2.0))]);
        let outer = Structure::new(vec![
            Association::new(number(1.0), Component::new(inner)),
            Association::new(number(2.0), Component::new(Structure::default())),
        ])
        .unwrap();
        assert_eq!(
            format_component(&Component::new(outer)),
            "[\n    1: [\n        1\n        2\n    ]\n    2: [:]\n]"
        );
    }

    #[test]
    fn ranges_take_brackets_from_their_extent() {
        let range = Range::new(number(3.0), Extent::Left, number(7.0)).unwrap();
        assert_eq!(format_component(&Component::new(range)), "[3..7)");
        let runes = Range::new(Primitive::Rune('a'), Extent::Right, Primitive::Rune('z')).unwrap();
        assert_eq!(format_component(&Component::new(runes)), "(\"a\"..\"z\"]");
    }

    #[test]
    fn long_binary_keys_wrap_like_values() {
        let key = Primitive::Binary(Binary(vec![0; 60]));
        let structure = Component::new(Structure::new(vec![Association::new(key, Primitive::from(true))]).unwrap());
        let text = format_component(&structure);
        assert_eq!(
            text,
            format!("['\n    {}\n    {}': true]", "A".repeat(60), "A".repeat(20))
        );
        assert_eq!(parse_document(&text).unwrap(), structure);
    }

    #[test]
    fn nested_binary_keys_indent_with_their_structure() {
        let key = Primitive::Binary(Binary(vec![0; 60]));
        let inner = Structure::new(vec![Association::new(key, Primitive::from(false))]).unwrap();
        let outer = Series::new(vec![Component::new(inner), Component::new(number(1.0))]);
        let text = format_component(&Component::new(outer.clone()));
        assert!(text.lines().all(|line| line.len() <= 72), "{}", text);
        assert_eq!(parse_document(&text).unwrap(), Component::new(outer));
    }
}
