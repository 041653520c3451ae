use std::fmt;

use crate::ast::expressions::{AssignmentOperator, Expression};
use crate::error::SemanticError;
use crate::literals::Symbol;
use crate::ordinal::Indexed;

// ──────────────────────────────────────────────
// Procedure
// ──────────────────────────────────────────────

/// An ordered list of statements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Procedure(Vec<Statement>);

impl Procedure {
    pub fn new(statements: Vec<Statement>) -> Self {
        Procedure(statements)
    }

    pub fn statements(&self) -> &[Statement] {
        &self.0
    }
}

impl Indexed for Procedure {
    type Item<'a> = &'a Statement;

    fn size(&self) -> usize {
        self.0.len()
    }

    fn at_offset(&self, offset: usize) -> &Statement {
        &self.0[offset]
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::formatter::format_procedure(self))
    }
}

/// One line of a procedure: a main clause with its optional handler, or a
/// lone comment or note line. Either way it has something to write.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    annotation: Option<Annotation>,
    main_clause: Option<Clause>,
    on_clause: Option<OnClause>,
    note: Option<String>,
}

impl Statement {
    pub fn new(main_clause: Clause) -> Self {
        Statement {
            annotation: None,
            main_clause: Some(main_clause),
            on_clause: None,
            note: None,
        }
    }

    /// A main clause guarded by an exception handler.
    pub fn handled(main_clause: Clause, on_clause: OnClause) -> Self {
        Statement {
            on_clause: Some(on_clause),
            ..Statement::new(main_clause)
        }
    }

    /// A comment block on lines of its own.
    pub fn comment(text: impl Into<String>) -> Self {
        Statement {
            annotation: Some(Annotation::Comment(text.into())),
            main_clause: None,
            on_clause: None,
            note: None,
        }
    }

    /// A note on a line of its own, without the leading `! `.
    pub fn remark(text: impl Into<String>) -> Self {
        Statement {
            annotation: None,
            main_clause: None,
            on_clause: None,
            note: Some(text.into()),
        }
    }

    /// Parser entry; every caller has already checked that some part is set
    /// and that an on clause only follows a main clause.
    pub(crate) fn from_parts(
        annotation: Option<Annotation>,
        main_clause: Option<Clause>,
        on_clause: Option<OnClause>,
        note: Option<String>,
    ) -> Self {
        Statement {
            annotation,
            main_clause,
            on_clause,
            note,
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotation = Some(annotation);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn annotation(&self) -> Option<&Annotation> {
        self.annotation.as_ref()
    }

    pub fn main_clause(&self) -> Option<&Clause> {
        self.main_clause.as_ref()
    }

    pub fn on_clause(&self) -> Option<&OnClause> {
        self.on_clause.as_ref()
    }

    /// Trailing note text without the leading `! `.
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

/// A line preceding a statement: a one-line note or a comment block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// Text without the leading `! `.
    Note(String),
    /// Interior lines joined by `\n`, relative to the delimiters.
    Comment(String),
}

// ──────────────────────────────────────────────
// Clauses
// ──────────────────────────────────────────────

/// The action of a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// `accept message`
    Accept { message: Expression },
    /// `break loop`
    Break,
    /// `checkout recipient [at level ordinal] from moniker`
    Checkout {
        recipient: Recipient,
        level: Option<Expression>,
        moniker: Expression,
    },
    /// `continue loop`
    Continue,
    /// `discard document`
    Discard { document: Expression },
    Evaluate(EvaluateClause),
    /// `if condition do procedure`
    If(Block),
    /// `notarize document as moniker`
    Notarize {
        document: Expression,
        moniker: Expression,
    },
    /// `post message to bag`
    Post { message: Expression, bag: Expression },
    /// `publish event`
    Publish { event: Expression },
    /// `reject message`
    Reject { message: Expression },
    /// `retrieve recipient from bag`
    Retrieve { recipient: Recipient, bag: Expression },
    /// `return result`
    Return { result: Expression },
    /// `save document as recipient`
    Save {
        document: Expression,
        recipient: Recipient,
    },
    Select(SelectClause),
    /// `throw exception`
    Throw { exception: Expression },
    /// `while condition do procedure`
    While(Block),
    /// `with each item in sequence do procedure`
    With { item: Symbol, block: Block },
}

impl Clause {
    /// The keyword that starts the clause; empty for an evaluation.
    pub fn keyword(&self) -> &'static str {
        match self {
            Clause::Accept { .. } => "accept",
            Clause::Break => "break",
            Clause::Checkout { .. } => "checkout",
            Clause::Continue => "continue",
            Clause::Discard { .. } => "discard",
            Clause::Evaluate(_) => "",
            Clause::If(_) => "if",
            Clause::Notarize { .. } => "notarize",
            Clause::Post { .. } => "post",
            Clause::Publish { .. } => "publish",
            Clause::Reject { .. } => "reject",
            Clause::Retrieve { .. } => "retrieve",
            Clause::Return { .. } => "return",
            Clause::Save { .. } => "save",
            Clause::Select(_) => "select",
            Clause::Throw { .. } => "throw",
            Clause::While(_) => "while",
            Clause::With { .. } => "with",
        }
    }
}

/// `[recipient operator] expression`
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluateClause {
    pub assignment: Option<(Recipient, AssignmentOperator)>,
    pub expression: Expression,
}

impl EvaluateClause {
    pub fn new(expression: Expression) -> Self {
        EvaluateClause {
            assignment: None,
            expression,
        }
    }

    pub fn assign(recipient: Recipient, operator: AssignmentOperator, expression: Expression) -> Self {
        EvaluateClause {
            assignment: Some((recipient, operator)),
            expression,
        }
    }
}

/// `select target matching pattern do procedure ...`
#[derive(Debug, Clone, PartialEq)]
pub struct SelectClause {
    target: Expression,
    blocks: Vec<Block>,
}

impl SelectClause {
    pub fn new(target: Expression, blocks: Vec<Block>) -> Result<Self, SemanticError> {
        if blocks.is_empty() {
            return Err(SemanticError::Empty {
                construct: "a select clause",
                element: "matching block",
            });
        }
        Ok(SelectClause { target, blocks })
    }

    pub fn target(&self) -> &Expression {
        &self.target
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }
}

/// `on $exception matching pattern do procedure ...`
#[derive(Debug, Clone, PartialEq)]
pub struct OnClause {
    exception: Symbol,
    blocks: Vec<Block>,
}

impl OnClause {
    pub fn new(exception: Symbol, blocks: Vec<Block>) -> Result<Self, SemanticError> {
        if blocks.is_empty() {
            return Err(SemanticError::Empty {
                construct: "an on clause",
                element: "matching block",
            });
        }
        Ok(OnClause { exception, blocks })
    }

    pub fn exception(&self) -> &Symbol {
        &self.exception
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }
}

/// An expression with the procedure it guards or drives.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub expression: Expression,
    pub procedure: Procedure,
}

impl Block {
    pub fn new(expression: Expression, procedure: Procedure) -> Self {
        Block {
            expression,
            procedure,
        }
    }
}

// ──────────────────────────────────────────────
// Recipients
// ──────────────────────────────────────────────

/// Where a clause stores a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Recipient {
    Symbol(Symbol),
    Attribute(Attribute),
}

/// `variable[indices]`
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    variable: String,
    indices: Vec<Expression>,
}

impl Attribute {
    pub fn new(variable: impl Into<String>, indices: Vec<Expression>) -> Result<Self, SemanticError> {
        if indices.is_empty() {
            return Err(SemanticError::Empty {
                construct: "an attribute",
                element: "index",
            });
        }
        Ok(Attribute {
            variable: variable.into(),
            indices,
        })
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn indices(&self) -> &[Expression] {
        &self.indices
    }
}
