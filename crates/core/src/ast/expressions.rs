use std::fmt;
use std::str::FromStr;

use crate::ast::Component;
use crate::error::SemanticError;

/// Defines a closed operator category. Parsing text outside the category
/// fails with [`SemanticError::InvalidOperator`].
macro_rules! operators {
    ($(#[$meta:meta])* $name:ident, $category:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = SemanticError;

            fn from_str(text: &str) -> Result<Self, Self::Err> {
                match text {
                    $($text => Ok($name::$variant),)+
                    _ => Err(SemanticError::InvalidOperator {
                        operator: text.to_owned(),
                        category: $category,
                    }),
                }
            }
        }

        impl TryFrom<&str> for $name {
            type Error = SemanticError;

            fn try_from(text: &str) -> Result<Self, Self::Error> {
                text.parse()
            }
        }
    };
}

operators!(
    /// Operators of an evaluate clause.
    AssignmentOperator, "assignment" {
        Assign => ":=",
        Conditional => "?=",
        Add => "+=",
        Subtract => "-=",
        Multiply => "*=",
        Divide => "/=",
    }
);

operators!(
    /// `.` calls synchronously, `<-` sends a message.
    InvocationOperator, "invocation" {
        Synchronous => ".",
        Asynchronous => "<-",
    }
);

operators!(
    /// Prefix inversions: additive, multiplicative and conjugate.
    InversionOperator, "inversion" {
        Additive => "-",
        Multiplicative => "/",
        Conjugate => "*",
    }
);

operators!(
    ArithmeticOperator, "arithmetic" {
        Product => "*",
        Quotient => "/",
        Remainder => "//",
        Sum => "+",
        Difference => "-",
    }
);

operators!(
    ComparisonOperator, "comparison" {
        Less => "<",
        Equal => "=",
        More => ">",
        Unequal => "≠",
        Is => "IS",
        Matches => "MATCHES",
    }
);

operators!(
    LogicalOperator, "logical" {
        And => "AND",
        Sans => "SANS",
        Xor => "XOR",
        Or => "OR",
    }
);

impl ArithmeticOperator {
    /// Multiplicative operators bind tighter than additive ones.
    pub fn is_multiplicative(self) -> bool {
        matches!(
            self,
            ArithmeticOperator::Product | ArithmeticOperator::Quotient | ArithmeticOperator::Remainder
        )
    }
}

impl LogicalOperator {
    /// `AND` and `SANS` bind tighter than `XOR` and `OR`.
    pub fn is_conjunctive(self) -> bool {
        matches!(self, LogicalOperator::And | LogicalOperator::Sans)
    }
}

/// An expression of the procedural language.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A literal or collection, possibly parameterized.
    Component(Box<Component>),
    /// A call to a built-in function such as `size(list)`.
    Intrinsic {
        function: String,
        arguments: Vec<Expression>,
    },
    Variable(String),
    /// A parenthesized expression.
    Precedence(Box<Expression>),
    /// `@expression`
    Dereference(Box<Expression>),
    /// `target.method(arguments)` or `target<-method(arguments)`.
    Invocation {
        target: Box<Expression>,
        operator: InvocationOperator,
        method: String,
        arguments: Vec<Expression>,
    },
    /// `composite[indices]`
    Item {
        composite: Box<Expression>,
        indices: Vec<Expression>,
    },
    /// `first & second`
    Chaining {
        first: Box<Expression>,
        second: Box<Expression>,
    },
    /// `base ^ exponent`
    Exponential {
        base: Box<Expression>,
        exponent: Box<Expression>,
    },
    Inversion {
        operator: InversionOperator,
        operand: Box<Expression>,
    },
    Arithmetic {
        first: Box<Expression>,
        operator: ArithmeticOperator,
        second: Box<Expression>,
    },
    /// `|expression|`
    Magnitude(Box<Expression>),
    Comparison {
        first: Box<Expression>,
        operator: ComparisonOperator,
        second: Box<Expression>,
    },
    /// `NOT expression`
    Complement(Box<Expression>),
    Logical {
        first: Box<Expression>,
        operator: LogicalOperator,
        second: Box<Expression>,
    },
}

impl Expression {
    pub fn component(component: impl Into<Component>) -> Self {
        Expression::Component(Box::new(component.into()))
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Expression::Variable(name.into())
    }

    /// An item access needs at least one index.
    pub fn item(composite: Expression, indices: Vec<Expression>) -> Result<Self, SemanticError> {
        if indices.is_empty() {
            return Err(SemanticError::Empty {
                construct: "an item expression",
                element: "index",
            });
        }
        Ok(Expression::Item {
            composite: Box::new(composite),
            indices,
        })
    }

    pub fn arithmetic(first: Expression, operator: ArithmeticOperator, second: Expression) -> Self {
        Expression::Arithmetic {
            first: Box::new(first),
            operator,
            second: Box::new(second),
        }
    }

    pub fn comparison(first: Expression, operator: ComparisonOperator, second: Expression) -> Self {
        Expression::Comparison {
            first: Box::new(first),
            operator,
            second: Box::new(second),
        }
    }

    pub fn logical(first: Expression, operator: LogicalOperator, second: Expression) -> Self {
        Expression::Logical {
            first: Box::new(first),
            operator,
            second: Box::new(second),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::formatter::format_expression(self))
    }
}
