use super::Parser;
use crate::ast::{
    ArithmeticOperator, ComparisonOperator, Expression, InversionOperator, InvocationOperator,
    LogicalOperator,
};
use crate::error::Error;
use crate::lexer::TokenKind;

impl<'a> Parser<'a> {
    // -- Expression parsing --------------------------------------
    //
    // Loosest to tightest: OR/XOR, AND/SANS, NOT, comparison, additive,
    // multiplicative, inversion, exponential, chaining, postfix, primary.

    pub(super) fn parse_expression(&mut self) -> Result<Option<Expression>, Error> {
        self.nested(|parser| parser.parse_disjunction())
    }

    /// An operand that must follow an operator already consumed.
    fn operand(
        &mut self,
        parse: fn(&mut Self) -> Result<Option<Expression>, Error>,
        rule: &'static str,
    ) -> Result<Expression, Error> {
        parse(self)?.ok_or_else(|| self.violation("$expression", &[rule, "$expression"]))
    }

    fn parse_disjunction(&mut self) -> Result<Option<Expression>, Error> {
        let Some(mut first) = self.parse_conjunction()? else {
            return Ok(None);
        };
        while let Some(operator) = self.take_operator(|o: LogicalOperator| !o.is_conjunctive()) {
            let second = self.operand(Self::parse_conjunction, "$logical")?;
            first = Expression::logical(first, operator, second);
        }
        Ok(Some(first))
    }

    fn parse_conjunction(&mut self) -> Result<Option<Expression>, Error> {
        let Some(mut first) = self.parse_complement()? else {
            return Ok(None);
        };
        while let Some(operator) = self.take_operator(LogicalOperator::is_conjunctive) {
            let second = self.operand(Self::parse_complement, "$logical")?;
            first = Expression::logical(first, operator, second);
        }
        Ok(Some(first))
    }

    fn parse_complement(&mut self) -> Result<Option<Expression>, Error> {
        if !self.take_delimiter("NOT") {
            return self.parse_comparison();
        }
        let operand = self.nested(|parser| parser.operand(Self::parse_complement, "$complement"))?;
        Ok(Some(Expression::Complement(Box::new(operand))))
    }

    /// Comparisons do not chain: `a < b < c` is not an expression.
    fn parse_comparison(&mut self) -> Result<Option<Expression>, Error> {
        let Some(first) = self.parse_additive()? else {
            return Ok(None);
        };
        let Some(operator) = self.take_operator(|_: ComparisonOperator| true) else {
            return Ok(Some(first));
        };
        let second = self.operand(Self::parse_additive, "$comparison")?;
        Ok(Some(Expression::comparison(first, operator, second)))
    }

    fn parse_additive(&mut self) -> Result<Option<Expression>, Error> {
        let Some(mut first) = self.parse_multiplicative()? else {
            return Ok(None);
        };
        while let Some(operator) = self.take_operator(|o: ArithmeticOperator| !o.is_multiplicative()) {
            let second = self.operand(Self::parse_multiplicative, "$arithmetic")?;
            first = Expression::arithmetic(first, operator, second);
        }
        Ok(Some(first))
    }

    fn parse_multiplicative(&mut self) -> Result<Option<Expression>, Error> {
        let Some(mut first) = self.parse_inversion()? else {
            return Ok(None);
        };
        while let Some(operator) = self.take_operator(ArithmeticOperator::is_multiplicative) {
            let second = self.operand(Self::parse_inversion, "$arithmetic")?;
            first = Expression::arithmetic(first, operator, second);
        }
        Ok(Some(first))
    }

    fn parse_inversion(&mut self) -> Result<Option<Expression>, Error> {
        let Some(operator) = self.take_operator(|_: InversionOperator| true) else {
            return self.parse_exponential();
        };
        let operand = self.nested(|parser| parser.operand(Self::parse_inversion, "$inversion"))?;
        Ok(Some(Expression::Inversion {
            operator,
            operand: Box::new(operand),
        }))
    }

    /// `^` associates to the right.
    fn parse_exponential(&mut self) -> Result<Option<Expression>, Error> {
        let Some(base) = self.parse_chaining()? else {
            return Ok(None);
        };
        if !self.take_delimiter("^") {
            return Ok(Some(base));
        }
        let exponent = self.nested(|parser| parser.operand(Self::parse_inversion, "$exponential"))?;
        Ok(Some(Expression::Exponential {
            base: Box::new(base),
            exponent: Box::new(exponent),
        }))
    }

    fn parse_chaining(&mut self) -> Result<Option<Expression>, Error> {
        let Some(mut first) = self.parse_postfix()? else {
            return Ok(None);
        };
        while self.take_delimiter("&") {
            let second = self.operand(Self::parse_postfix, "$chaining")?;
            first = Expression::Chaining {
                first: Box::new(first),
                second: Box::new(second),
            };
        }
        Ok(Some(first))
    }

    /// Item access and method invocation on a primary expression.
    fn parse_postfix(&mut self) -> Result<Option<Expression>, Error> {
        let Some(mut target) = self.parse_primary()? else {
            return Ok(None);
        };
        loop {
            if let Some(indices) = self.parse_indices()? {
                target = Expression::item(target, indices)?;
            } else if let Some(operator) = self.take_operator(|_: InvocationOperator| true) {
                let method = self
                    .take_kind(TokenKind::Identifier)
                    .ok_or_else(|| self.violation("$method", &["$invocation", "$method"]))?;
                let arguments = self
                    .parse_arguments()?
                    .ok_or_else(|| self.violation("$arguments", &["$invocation", "$arguments"]))?;
                target = Expression::Invocation {
                    target: Box::new(target),
                    operator,
                    method,
                    arguments,
                };
            } else {
                return Ok(Some(target));
            }
        }
    }

    // -- Primary expressions ------------------------------------

    fn parse_primary(&mut self) -> Result<Option<Expression>, Error> {
        if let Some(component) = self.parse_bare_component()? {
            return Ok(Some(Expression::Component(Box::new(component))));
        }
        if self.take_delimiter("|") {
            let operand = self.operand(Self::parse_expression, "$magnitude")?;
            if !self.take_delimiter("|") {
                return Err(self.violation("|", &["$magnitude"]));
            }
            return Ok(Some(Expression::Magnitude(Box::new(operand))));
        }
        if self.take_delimiter("@") {
            let operand = self.nested(|parser| parser.operand(Self::parse_postfix, "$dereference"))?;
            return Ok(Some(Expression::Dereference(Box::new(operand))));
        }
        if self.take_delimiter("(") {
            let inner = self.operand(Self::parse_expression, "$precedence")?;
            if !self.take_delimiter(")") {
                return Err(self.violation(")", &["$precedence"]));
            }
            return Ok(Some(Expression::Precedence(Box::new(inner))));
        }
        let Some(name) = self.take_kind(TokenKind::Identifier) else {
            return Ok(None);
        };
        match self.parse_arguments()? {
            Some(arguments) => Ok(Some(Expression::Intrinsic {
                function: name,
                arguments,
            })),
            None => Ok(Some(Expression::Variable(name))),
        }
    }

    /// `"(" [expression {"," expression}] ")"`
    fn parse_arguments(&mut self) -> Result<Option<Vec<Expression>>, Error> {
        if !self.take_delimiter("(") {
            return Ok(None);
        }
        let mut arguments = Vec::new();
        if !self.take_delimiter(")") {
            loop {
                arguments.push(self.operand(Self::parse_expression, "$arguments")?);
                if !self.take_delimiter(",") {
                    break;
                }
            }
            if !self.take_delimiter(")") {
                return Err(self.violation(")", &["$arguments", "$expression"]));
            }
        }
        Ok(Some(arguments))
    }

    /// `"[" expression {"," expression} "]"`
    pub(super) fn parse_indices(&mut self) -> Result<Option<Vec<Expression>>, Error> {
        if !self.take_delimiter("[") {
            return Ok(None);
        }
        let mut indices = Vec::new();
        loop {
            indices.push(self.operand(Self::parse_expression, "$indices")?);
            if !self.take_delimiter(",") {
                break;
            }
        }
        if !self.take_delimiter("]") {
            return Err(self.violation("]", &["$indices", "$expression"]));
        }
        Ok(Some(indices))
    }
}
