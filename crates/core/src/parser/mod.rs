//! Recursive-descent parser from document text to a syntax tree.
//!
//! Every `parse_*` method returns `Ok(None)` when its construct is absent,
//! leaving the token stream exactly where it was. Once the input has
//! committed to a construct (a clause keyword, an opening bracket) a missing
//! part is a [`GrammarViolation`] naming the rules being parsed.

mod collections;
mod components;
mod expressions;
mod primitives;
mod procedures;

use std::str::FromStr;

use tracing::{debug, trace};

use crate::ast::{Component, Expression, Procedure};
use crate::error::{Error, GrammarViolation};
use crate::lexer::{self, Token, TokenKind, TokenStream};
use crate::options::ParseOptions;

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

struct Parser<'a> {
    stream: TokenStream,
    options: &'a ParseOptions,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: Vec<Token>, options: &'a ParseOptions) -> Self {
        Parser {
            stream: TokenStream::new(tokens),
            options,
            depth: 0,
        }
    }

    fn peek(&self) -> &Token {
        self.stream.peek()
    }

    fn at(&self, kind: TokenKind, text: &str) -> bool {
        self.peek().is(kind, text)
    }

    fn at_delimiter(&self, text: &str) -> bool {
        self.at(TokenKind::Delimiter, text)
    }

    /// Consume the next token when it is `kind` spelled `text`.
    fn take(&mut self, kind: TokenKind, text: &str) -> bool {
        if self.at(kind, text) {
            self.stream.next();
            true
        } else {
            false
        }
    }

    fn take_delimiter(&mut self, text: &str) -> bool {
        self.take(TokenKind::Delimiter, text)
    }

    /// Keywords only match `Keyword` tokens with the exact text.
    fn take_keyword(&mut self, keyword: &str) -> bool {
        self.take(TokenKind::Keyword, keyword)
    }

    fn take_eol(&mut self) -> bool {
        if self.peek().kind == TokenKind::Eol {
            self.stream.next();
            true
        } else {
            false
        }
    }

    /// Consume the next token when it is of `kind`, returning its text.
    fn take_kind(&mut self, kind: TokenKind) -> Option<String> {
        if self.peek().kind == kind {
            Some(self.stream.next().text.clone())
        } else {
            None
        }
    }

    /// Consume a delimiter that spells an operator of type `O` accepted by
    /// `accept`.
    fn take_operator<O>(&mut self, accept: impl Fn(O) -> bool) -> Option<O>
    where
        O: FromStr + Copy,
    {
        let token = self.peek();
        if token.kind != TokenKind::Delimiter {
            return None;
        }
        let operator = token.text.parse::<O>().ok().filter(|&o| accept(o))?;
        self.stream.next();
        Some(operator)
    }

    /// Restore the stream after a failed trial of `rule`.
    fn backtrack(&mut self, mark: usize, rule: &'static str) {
        trace!(rule, cursor = mark, "backtrack");
        self.stream.reset(mark);
    }

    /// A violation at the token about to be read.
    fn violation(&self, expected: &str, rules: &[&'static str]) -> Error {
        let token = self.peek().clone();
        trace!(expected, ?rules, %token, "grammar violation");
        GrammarViolation::new(token, expected, rules).into()
    }

    /// Run `parse` one nesting level deeper, failing past `max_depth`.
    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<T, Error> {
        if self.depth >= self.options.max_depth {
            return Err(self.violation("$component", &["$component", "$entity"]));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    // -- Source -------------------------------------------------

    fn parse_source(&mut self) -> Result<Component, Error> {
        let component = self
            .parse_component()?
            .ok_or_else(|| self.violation("$component", &["$source", "$component"]))?;
        self.finish("$source")?;
        Ok(component)
    }

    /// Expect the end of input, allowing trailing newlines when configured.
    fn finish(&mut self, rule: &'static str) -> Result<(), Error> {
        if self.options.allow_trailing_newlines {
            while self.take_eol() {}
        }
        if self.peek().kind != TokenKind::Eof {
            return Err(self.violation("EOF", &[rule]));
        }
        Ok(())
    }
}

// ──────────────────────────────────────────────
// Entry points
// ──────────────────────────────────────────────

/// Parse a whole document: one component followed by the end of input.
pub fn parse_document(source: &str) -> Result<Component, Error> {
    parse_document_with(source, &ParseOptions::default())
}

pub fn parse_document_with(source: &str, options: &ParseOptions) -> Result<Component, Error> {
    let tokens = lexer::lex(source)?;
    debug!(tokens = tokens.len(), "parsing document");
    let mut parser = Parser::new(tokens, options);
    let component = parser.parse_source()?;
    debug!(kind = component.entity.kind(), "parsed document");
    Ok(component)
}

/// Parse text holding a single expression.
pub fn parse_expression(source: &str) -> Result<Expression, Error> {
    let options = ParseOptions::default();
    let mut parser = Parser::new(lexer::lex(source)?, &options);
    let expression = parser
        .parse_expression()?
        .ok_or_else(|| parser.violation("$expression", &["$expression"]))?;
    parser.finish("$expression")?;
    Ok(expression)
}

/// Parse text holding a single `{ ... }` procedure.
pub fn parse_procedure(source: &str) -> Result<Procedure, Error> {
    let options = ParseOptions::default();
    let mut parser = Parser::new(lexer::lex(source)?, &options);
    let procedure = parser
        .parse_procedure()?
        .ok_or_else(|| parser.violation("$procedure", &["$procedure"]))?;
    parser.finish("$procedure")?;
    Ok(procedure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Clause, Collection, Entity};
    use crate::literals::Primitive;

    fn violation(source: &str) -> GrammarViolation {
        match parse_document(source) {
            Err(Error::Grammar(violation)) => violation,
            other => panic!("expected a grammar violation, got {:?}", other),
        }
    }

    #[test]
    fn parses_a_bare_primitive() {
        let component = parse_document("true").unwrap();
        assert_eq!(component.entity, Entity::Primitive(Primitive::Boolean(true)));
        assert!(!component.is_generic());
    }

    #[test]
    fn trailing_newlines_are_optional() {
        assert!(parse_document("[ ]\n\n").is_ok());
        let strict = ParseOptions {
            allow_trailing_newlines: false,
            ..ParseOptions::default()
        };
        let error = parse_document_with("[ ]\n", &strict).unwrap_err();
        assert_eq!(error.kind(), "grammar");
    }

    #[test]
    fn extra_input_after_the_component_is_rejected() {
        let error = violation("1 2");
        assert_eq!(error.expected, "EOF");
        assert_eq!(error.rules, vec!["$source"]);
        assert_eq!(error.token.text, "2");
    }

    #[test]
    fn empty_input_has_no_component() {
        let error = violation("");
        assert_eq!(error.expected, "$component");
        assert_eq!(error.token.kind, TokenKind::Eof);
    }

    #[test]
    fn scan_errors_pass_through() {
        assert_eq!(parse_document("[`]").unwrap_err().kind(), "scan");
    }

    #[test]
    fn nesting_is_bounded() {
        let options = ParseOptions {
            max_depth: 4,
            ..ParseOptions::default()
        };
        assert!(parse_document_with("[[[1]]]", &options).is_ok());
        let error = parse_document_with("[[[[[1]]]]]", &options).unwrap_err();
        assert_eq!(error.kind(), "grammar");
    }

    #[test]
    fn default_depth_fits_a_default_thread_stack() {
        let depth = ParseOptions::default().max_depth;
        let brackets = |n: usize| format!("{}1{}", "[".repeat(n), "]".repeat(n));
        let parentheses = |n: usize| format!("{{$x := {}a{}}}", "(".repeat(n), ")".repeat(n));
        let blocks = |n: usize| (0..n).fold("{ }".to_owned(), |inner, _| format!("{{if $x do {}}}", inner));
        std::thread::spawn(move || {
            assert!(parse_document(&brackets(depth - 1)).is_ok());
            assert_eq!(parse_document(&brackets(depth)).unwrap_err().kind(), "grammar");
            assert_eq!(parse_document(&brackets(depth * 4)).unwrap_err().kind(), "grammar");

            assert!(parse_document(&parentheses(depth / 2)).is_ok());
            assert!(parse_document(&parentheses(depth * 4)).is_err());

            assert!(parse_document(&blocks(depth / 2)).is_ok());
            assert!(parse_document(&blocks(depth * 4)).is_err());
        })
        .join()
        .unwrap();
    }

    #[test]
    fn keywords_never_match_identifiers() {
        let procedure = parse_procedure("{return returning}").unwrap();
        assert_eq!(
            procedure.statements()[0].main_clause(),
            Some(&Clause::Return {
                result: Expression::variable("returning")
            })
        );
    }

    #[test]
    fn expressions_parse_standalone() {
        let expression = parse_expression("size(list) + 1").unwrap();
        assert_eq!(expression.to_string(), "size(list) + 1");
        assert!(matches!(
            parse_document("[1..3]").unwrap().entity,
            Entity::Collection(Collection::Range(_))
        ));
    }
}
