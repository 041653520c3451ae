use super::Parser;
use crate::ast::{Component, Context, Entity, Parameter};
use crate::error::Error;
use crate::lexer::TokenKind;
use crate::literals::Symbol;

const CONTEXT: &[&str] = &["$context", "$parameters", "$parameter", "$name"];

impl<'a> Parser<'a> {
    // -- Components ---------------------------------------------

    /// `entity [context] [NOTE]`
    pub(super) fn parse_component(&mut self) -> Result<Option<Component>, Error> {
        let Some(mut component) = self.parse_bare_component()? else {
            return Ok(None);
        };
        component.note = self.parse_note();
        Ok(Some(component))
    }

    /// A component without its note. Inside an expression a trailing note
    /// belongs to the enclosing statement.
    pub(super) fn parse_bare_component(&mut self) -> Result<Option<Component>, Error> {
        self.nested(|parser| {
            let Some(entity) = parser.parse_entity()? else {
                return Ok(None);
            };
            let context = parser.parse_context()?;
            Ok(Some(Component {
                entity,
                context,
                note: None,
            }))
        })
    }

    fn parse_entity(&mut self) -> Result<Option<Entity>, Error> {
        if let Some(primitive) = self.parse_primitive()? {
            return Ok(Some(Entity::Primitive(primitive)));
        }
        if let Some(collection) = self.parse_collection()? {
            return Ok(Some(Entity::Collection(collection)));
        }
        Ok(self.parse_procedure()?.map(Entity::Procedure))
    }

    // -- Context ------------------------------------------------

    /// `"(" parameters ")"`. An opening parenthesis only starts a context
    /// when a newline or a `$name:` follows it.
    fn parse_context(&mut self) -> Result<Option<Context>, Error> {
        let mark = self.stream.mark();
        if !self.take_delimiter("(") {
            return Ok(None);
        }
        let multiline = self.take_eol();
        if !multiline && !self.at_parameter() {
            self.backtrack(mark, "$context");
            return Ok(None);
        }

        let mut parameters = Vec::new();
        if multiline {
            while let Some(parameter) = self.parse_parameter()? {
                parameters.push(parameter);
                if !self.take_eol() {
                    return Err(self.violation("EOL", CONTEXT));
                }
            }
            if parameters.is_empty() {
                return Err(self.violation("$parameter", CONTEXT));
            }
        } else {
            loop {
                let parameter = self
                    .parse_parameter()?
                    .ok_or_else(|| self.violation("$parameter", CONTEXT))?;
                parameters.push(parameter);
                if !self.take_delimiter(",") {
                    break;
                }
            }
        }

        if !self.take_delimiter(")") {
            return Err(self.violation(")", CONTEXT));
        }
        Ok(Some(Context::new(parameters)?))
    }

    /// Whether the next two tokens are `$name` and `:`.
    fn at_parameter(&mut self) -> bool {
        let mark = self.stream.mark();
        let found = self.stream.next().kind == TokenKind::Symbol
            && self.stream.next().is(TokenKind::Delimiter, ":");
        self.stream.reset(mark);
        found
    }

    /// `name ":" value`
    fn parse_parameter(&mut self) -> Result<Option<Parameter>, Error> {
        let Some(name) = self.take_kind(TokenKind::Symbol) else {
            return Ok(None);
        };
        let name: Symbol = name.parse()?;
        if !self.take_delimiter(":") {
            return Err(self.violation(":", &["$parameter", "$name"]));
        }
        let value = self
            .parse_component()?
            .ok_or_else(|| self.violation("$value", &["$parameter", "$value"]))?;
        Ok(Some(Parameter::new(name, value)))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Component, Entity};
    use crate::error::{Error, SemanticError};
    use crate::literals::{Primitive, Symbol};
    use crate::parser::parse_document;

    #[test]
    fn inline_context_and_note() {
        let component = parse_document("/bali/types/Text($type: /nebula/Name)  ! a name").unwrap();
        assert!(component.is_generic());
        assert_eq!(component.note.as_deref(), Some("a name"));
        let context = component.context.unwrap();
        let value = context.get(&Symbol::new("type").unwrap()).unwrap();
        assert_eq!(value.entity.kind(), "moniker");
    }

    #[test]
    fn multiline_context() {
        let component = parse_document("5(\n    $a: 1\n    $b: 2\n)").unwrap();
        let context = component.context.unwrap();
        assert_eq!(context.len(), 2);
        assert_eq!(context.parameters()[1].name.name(), "b");
    }

    #[test]
    fn parenthesis_without_a_parameter_is_not_a_context() {
        let error = parse_document("5(1)").unwrap_err();
        assert_eq!(error.kind(), "grammar");
        assert_eq!(
            parse_document("5").unwrap(),
            Component::new(Entity::Primitive(Primitive::Number(crate::literals::Number::real(5.0))))
        );
    }

    #[test]
    fn unterminated_context_names_its_rules() {
        match parse_document("5($a: 1") {
            Err(Error::Grammar(violation)) => {
                assert_eq!(violation.expected, ")");
                assert_eq!(violation.rules[0], "$context");
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn duplicate_parameters_are_semantic_errors() {
        assert!(matches!(
            parse_document("5($a: 1, $a: 2)"),
            Err(Error::Semantic(SemanticError::DuplicateParameter { .. }))
        ));
    }
}
