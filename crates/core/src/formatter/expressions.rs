use super::Formatter;
use crate::ast::{Expression, InversionOperator};

impl Formatter {
    // -- Expressions --------------------------------------------
    //
    // Grouping comes only from `Precedence` nodes; trees built by hand
    // must add them wherever a looser operator sits under a tighter one.

    pub(super) fn expression(&mut self, expression: &Expression) {
        match expression {
            Expression::Component(component) => self.bare_component(component),
            Expression::Intrinsic {
                function,
                arguments,
            } => {
                self.append(function);
                self.arguments(arguments);
            }
            Expression::Variable(name) => self.append(name),
            Expression::Precedence(inner) => {
                self.append("(");
                self.expression(inner);
                self.append(")");
            }
            Expression::Dereference(operand) => {
                self.append("@");
                self.expression(operand);
            }
            Expression::Invocation {
                target,
                operator,
                method,
                arguments,
            } => {
                self.expression(target);
                self.append(operator.as_str());
                self.append(method);
                self.arguments(arguments);
            }
            Expression::Item { composite, indices } => {
                self.expression(composite);
                self.indices(indices);
            }
            Expression::Chaining { first, second } => self.binary(first, "&", second),
            Expression::Exponential { base, exponent } => self.binary(base, "^", exponent),
            Expression::Inversion { operator, operand } => {
                self.append(operator.as_str());
                let operand_text = {
                    let mut nested = Formatter {
                        buffer: String::new(),
                        depth: self.depth,
                    };
                    nested.expression(operand);
                    nested.buffer
                };
                // `/x` would scan as a moniker and `//` as a remainder
                if *operator == InversionOperator::Multiplicative
                    && operand_text.starts_with(|c: char| c.is_alphabetic() || c == '/')
                {
                    self.append(" ");
                }
                self.append(&operand_text);
            }
            Expression::Arithmetic {
                first,
                operator,
                second,
            } => self.binary(first, operator.as_str(), second),
            Expression::Magnitude(operand) => {
                self.append("|");
                self.expression(operand);
                self.append("|");
            }
            Expression::Comparison {
                first,
                operator,
                second,
            } => self.binary(first, operator.as_str(), second),
            Expression::Complement(operand) => {
                self.append("NOT ");
                self.expression(operand);
            }
            Expression::Logical {
                first,
                operator,
                second,
            } => self.binary(first, operator.as_str(), second),
        }
    }

    fn binary(&mut self, first: &Expression, operator: &str, second: &Expression) {
        self.expression(first);
        self.append(" ");
        self.append(operator);
        self.append(" ");
        self.expression(second);
    }

    fn arguments(&mut self, arguments: &[Expression]) {
        self.append("(");
        self.list(arguments);
        self.append(")");
    }

    pub(super) fn indices(&mut self, indices: &[Expression]) {
        self.append("[");
        self.list(indices);
        self.append("]");
    }

    fn list(&mut self, expressions: &[Expression]) {
        for (i, expression) in expressions.iter().enumerate() {
            if i > 0 {
                self.append(", ");
            }
            self.expression(expression);
        }
    }
}
