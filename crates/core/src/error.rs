use serde::Serialize;

use crate::grammar;
use crate::lexer::{Position, Token};

/// Any fatal condition raised while scanning, parsing, decoding or
/// constructing a document.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The scanner found text that is not the start of any lexeme.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// A mandatory construct was missing or malformed.
    #[error(transparent)]
    Grammar(#[from] GrammarViolation),

    /// A value was structurally valid but broke a syntax tree invariant.
    #[error(transparent)]
    Semantic(#[from] SemanticError),

    /// Literal text was rejected by the decoder for its kind.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// An ordinal index fell outside its sequence.
    #[error(transparent)]
    Index(#[from] IndexError),
}

impl Error {
    /// Short, stable name of the error category.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Scan(_) => "scan",
            Error::Grammar(_) => "grammar",
            Error::Semantic(_) => "semantic",
            Error::Codec(_) => "codec",
            Error::Index(_) => "index",
        }
    }

    /// Source position of the failure, when the error came from a document.
    pub fn position(&self) -> Option<Position> {
        match self {
            Error::Scan(e) => Some(e.position),
            Error::Grammar(e) => Some(e.token.position),
            _ => None,
        }
    }

    /// Serialize to the diagnostic JSON shape described by
    /// `schema/diagnostic-schema.json`. Every key is always present.
    pub fn to_json_value(&self) -> serde_json::Value {
        let (token, rules) = match self {
            Error::Grammar(e) => (
                serde_json::to_value(&e.token).unwrap_or(serde_json::Value::Null),
                serde_json::json!(e.rules),
            ),
            _ => (serde_json::Value::Null, serde_json::json!([])),
        };
        let position = self.position();
        serde_json::json!({
            "column":  position.map(|p| p.column),
            "kind":    self.kind(),
            "line":    position.map(|p| p.line),
            "message": self.to_string(),
            "rules":   rules,
            "token":   token,
        })
    }
}

/// Unrecognised input at a source position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("unrecognized input at line {}, column {}: {snippet:?}", .position.line, .position.column)]
pub struct ScanError {
    pub position: Position,
    /// The rest of the offending line.
    pub snippet: String,
}

/// A mandatory construct did not match. Carries the offending token and
/// the chain of grammar rules, innermost first, that was being parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("An unexpected token was received by the parser: {token}\n{}", grammar::expecting(.expected, .rules))]
pub struct GrammarViolation {
    pub token: Token,
    pub expected: String,
    pub rules: Vec<&'static str>,
}

impl GrammarViolation {
    pub fn new(token: Token, expected: impl Into<String>, rules: &[&'static str]) -> Self {
        GrammarViolation {
            token,
            expected: expected.into(),
            rules: rules.to_vec(),
        }
    }
}

/// Invariant violations raised by syntax tree constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SemanticError {
    /// Two associations in one structure share a key.
    #[error("the key {key} appears more than once in the same structure")]
    DuplicateKey { key: String },

    /// Two context parameters share a name.
    #[error("the parameter {name} appears more than once in the same context")]
    DuplicateParameter { name: String },

    /// A construct that needs at least one element was given none.
    #[error("{construct} requires at least one {element}")]
    Empty {
        construct: &'static str,
        element: &'static str,
    },

    /// Range endpoints of different kinds.
    #[error("the endpoints of a range must be the same kind: found {first} and {last}")]
    MismatchedEndpoints {
        first: &'static str,
        last: &'static str,
    },

    /// Range endpoints that are neither both discrete nor both continuous.
    #[error("the endpoints of a range must both be discrete or both be continuous: found {first} and {last}")]
    UnorderedEndpoints {
        first: &'static str,
        last: &'static str,
    },

    /// An operator used outside its valid category.
    #[error("'{operator}' is not a valid {category} operator")]
    InvalidOperator {
        operator: String,
        category: &'static str,
    },

    /// A numeric value outside the domain of its literal kind.
    #[error("{value} is not a valid {kind} value")]
    OutOfDomain { kind: &'static str, value: String },
}

/// Literal text that does not decode as the requested kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{text:?} is not a valid {kind} literal")]
pub struct CodecError {
    pub kind: &'static str,
    pub text: String,
}

impl CodecError {
    pub fn new(kind: &'static str, text: impl Into<String>) -> Self {
        CodecError {
            kind,
            text: text.into(),
        }
    }
}

/// An ordinal index outside `1..=N` and `-N..=-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("the index {index} is out of bounds for a sequence of size {size}")]
pub struct IndexError {
    pub index: isize,
    pub size: usize,
}
