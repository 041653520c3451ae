use super::Parser;
use crate::error::Error;
use crate::lexer::TokenKind;
use crate::literals::Primitive;

impl<'a> Parser<'a> {
    // -- Literal parsing ----------------------------------------

    /// An element or string literal. The scanner has already recognised the
    /// lexeme, so the decoder only fails on values outside their domain.
    pub(super) fn parse_primitive(&mut self) -> Result<Option<Primitive>, Error> {
        let token = self.peek();
        let text = token.text.as_str();
        let primitive = match token.kind {
            TokenKind::Angle => Primitive::Angle(text.parse()?),
            TokenKind::Boolean => Primitive::Boolean(text == "true"),
            TokenKind::Duration => Primitive::Duration(text.parse()?),
            TokenKind::Moment => Primitive::Moment(text.parse()?),
            TokenKind::Number => Primitive::Number(text.parse()?),
            TokenKind::Pattern => Primitive::Pattern(text.parse()?),
            TokenKind::Percentage => Primitive::Percentage(text.parse()?),
            TokenKind::Probability => Primitive::Probability(text.parse()?),
            TokenKind::Resource => Primitive::Resource(text.parse()?),
            TokenKind::Symbol => Primitive::Symbol(text.parse()?),
            TokenKind::Tag => Primitive::Tag(text.parse()?),
            TokenKind::Binary => Primitive::Binary(text.parse()?),
            TokenKind::Moniker => Primitive::Moniker(text.parse()?),
            TokenKind::Narrative => Primitive::Narrative(text.parse()?),
            TokenKind::Quote => Primitive::Quote(text.parse()?),
            TokenKind::Version => Primitive::Version(text.parse()?),
            _ => return Ok(None),
        };
        self.stream.next();
        Ok(Some(primitive))
    }

    /// A range endpoint: a primitive, where a one-character quote is a rune.
    pub(super) fn parse_endpoint(&mut self) -> Result<Option<Primitive>, Error> {
        Ok(self.parse_primitive()?.map(|primitive| match primitive {
            Primitive::Quote(quote) => match quote.as_rune() {
                Some(rune) => Primitive::Rune(rune),
                None => Primitive::Quote(quote),
            },
            other => other,
        }))
    }

    /// The text of a note without its leading `! `.
    pub(super) fn parse_note(&mut self) -> Option<String> {
        let text = self.take_kind(TokenKind::Note)?;
        Some(text.strip_prefix("! ").unwrap_or(&text).to_owned())
    }
}
