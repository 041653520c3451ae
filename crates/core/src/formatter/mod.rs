//! Canonical formatter: the inverse of the parser.
//!
//! Each call owns a private buffer and an indentation depth. Layout is
//! fixed: `INDENTATION` per depth level, collections and procedures with
//! more than one element one element per line, binaries wrapped at
//! `BINARY_LINE_WIDTH` encoded characters.

mod collections;
mod expressions;
mod procedures;

use crate::ast::{Component, Context, Entity, Expression, Parameter, Procedure};
use crate::literals::Primitive;
use crate::{BINARY_LINE_WIDTH, INDENTATION};

/// Canonical text of a document.
pub fn format_component(component: &Component) -> String {
    let mut formatter = Formatter::default();
    formatter.component(component);
    formatter.finish()
}

/// Canonical text of a standalone expression.
pub fn format_expression(expression: &Expression) -> String {
    let mut formatter = Formatter::default();
    formatter.expression(expression);
    formatter.finish()
}

/// Canonical text of a standalone procedure, braces included.
pub fn format_procedure(procedure: &Procedure) -> String {
    let mut formatter = Formatter::default();
    formatter.procedure(procedure);
    formatter.finish()
}

#[derive(Debug, Default)]
pub(crate) struct Formatter {
    buffer: String,
    depth: usize,
}

impl Formatter {
    fn finish(self) -> String {
        self.buffer
    }

    fn append(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// A line break followed by the indentation of the current depth.
    fn newline(&mut self) {
        self.buffer.push('\n');
        for _ in 0..self.depth {
            self.buffer.push_str(INDENTATION);
        }
    }

    /// Run `layout` one level deeper.
    fn indented(&mut self, layout: impl FnOnce(&mut Self)) {
        self.depth += 1;
        layout(self);
        self.depth -= 1;
    }

    /// Interior lines of a block, each on its own line at the current
    /// depth. Blank lines carry no indentation.
    fn block_lines(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        for line in text.split('\n') {
            if line.is_empty() {
                self.buffer.push('\n');
            } else {
                self.newline();
                self.append(line);
            }
        }
    }

    // -- Components ---------------------------------------------

    pub(crate) fn component(&mut self, component: &Component) {
        self.bare_component(component);
        if let Some(note) = component.note.as_deref().filter(|note| !note.is_empty()) {
            self.append("  ! ");
            self.append(note);
        }
    }

    /// Entity and context; notes inside expressions belong to the statement.
    fn bare_component(&mut self, component: &Component) {
        match &component.entity {
            Entity::Primitive(primitive) => self.primitive(primitive),
            Entity::Collection(collection) => self.collection(collection),
            Entity::Procedure(procedure) => self.procedure(procedure),
        }
        if let Some(context) = &component.context {
            self.context(context);
        }
    }

    fn primitive(&mut self, primitive: &Primitive) {
        match primitive {
            Primitive::Binary(binary) => {
                let encoded = binary.encoded();
                if encoded.len() <= BINARY_LINE_WIDTH {
                    self.append("'");
                    self.append(&encoded);
                    self.append("'");
                    return;
                }
                self.append("'");
                self.indented(|formatter| {
                    // base 64 text is ASCII, so byte chunks are character chunks
                    for chunk in encoded.as_bytes().chunks(BINARY_LINE_WIDTH) {
                        formatter.newline();
                        formatter.append(&String::from_utf8_lossy(chunk));
                    }
                });
                self.append("'");
            }
            Primitive::Narrative(narrative) => {
                self.append("\">");
                self.indented(|formatter| formatter.block_lines(narrative.as_str()));
                self.newline();
                self.append("<\"");
            }
            other => self.append(&other.to_string()),
        }
    }

    /// Inline for a single plain parameter, one per line otherwise.
    fn context(&mut self, context: &Context) {
        self.append("(");
        let parameters = context.parameters();
        match parameters {
            [only] if !only.value.is_annotated() => self.parameter(only),
            _ => {
                self.indented(|formatter| {
                    for parameter in parameters {
                        formatter.newline();
                        formatter.parameter(parameter);
                    }
                });
                self.newline();
            }
        }
        self.append(")");
    }

    fn parameter(&mut self, parameter: &Parameter) {
        self.append(&parameter.name.to_string());
        self.append(": ");
        self.component(&parameter.value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literals::{Binary, Narrative, Number, Symbol};
    use pretty_assertions::assert_eq;

    fn number(value: f64) -> Component {
        Component::new(Primitive::Number(Number::real(value)))
    }

    #[test]
    fn notes_follow_two_spaces() {
        assert_eq!(format_component(&number(5.0).with_note("five")), "5  ! five");
    }

    #[test]
    fn binaries_wrap_past_the_line_width() {
        let short = Component::new(Primitive::Binary(Binary(vec![0; 45])));
        assert_eq!(format_component(&short), format!("'{}'", "A".repeat(60)));

        let long = Component::new(Primitive::Binary(Binary(vec![0; 46])));
        assert_eq!(
            format_component(&long),
            format!("'\n    {}\n    AA'", "A".repeat(60))
        );
    }

    #[test]
    fn narratives_indent_their_lines() {
        let narrative = Component::new(Primitive::Narrative(Narrative::new("one\n\n  two").unwrap()));
        assert_eq!(format_component(&narrative), "\">\n    one\n\n      two\n<\"");
    }

    #[test]
    fn contexts_go_multiline_past_one_parameter() {
        let symbol = |name| Symbol::new(name).unwrap();
        let single = Context::new(vec![Parameter::new(symbol("a"), number(1.0))]).unwrap();
        assert_eq!(format_component(&number(5.0).with_context(single)), "5($a: 1)");

        let double = Context::new(vec![
            Parameter::new(symbol("a"), number(1.0)),
            Parameter::new(symbol("b"), number(2.0)),
        ])
        .unwrap();
        assert_eq!(
            format_component(&number(5.0).with_context(double)),
            "5(\n    $a: 1\n    $b: 2\n)"
        );

        let annotated = Context::new(vec![Parameter::new(symbol("a"), number(1.0).with_note("one"))]).unwrap();
        assert_eq!(
            format_component(&number(5.0).with_context(annotated)),
            "5(\n    $a: 1  ! one\n)"
        );
    }
}
