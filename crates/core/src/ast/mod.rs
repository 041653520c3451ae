//! Syntax tree of a document.
//!
//! Nodes are produced by the parser or built directly through their
//! constructors, which enforce the invariants the parser relies on.
//! Ownership is strictly tree-shaped: every node owns its children.

pub mod collections;
pub mod expressions;
pub mod procedures;

use std::fmt;

use crate::error::SemanticError;
use crate::literals::{Primitive, Symbol};

pub use collections::{Association, Collection, Extent, Range, Series, Structure};
pub use expressions::{
    ArithmeticOperator, AssignmentOperator, ComparisonOperator, Expression, InversionOperator,
    InvocationOperator, LogicalOperator,
};
pub use procedures::{
    Annotation, Attribute, Block, Clause, EvaluateClause, OnClause, Procedure, Recipient,
    SelectClause, Statement,
};

// ──────────────────────────────────────────────
// Component
// ──────────────────────────────────────────────

/// An entity with an optional parameter context and an optional note.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub entity: Entity,
    pub context: Option<Context>,
    /// Note text without the leading `! `.
    pub note: Option<String>,
}

impl Component {
    pub fn new(entity: impl Into<Entity>) -> Self {
        Component {
            entity: entity.into(),
            context: None,
            note: None,
        }
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn is_generic(&self) -> bool {
        self.context.is_some()
    }

    pub fn is_annotated(&self) -> bool {
        self.note.as_deref().is_some_and(|note| !note.is_empty())
    }
}

impl From<Entity> for Component {
    fn from(entity: Entity) -> Self {
        Component::new(entity)
    }
}

impl From<Primitive> for Component {
    fn from(primitive: Primitive) -> Self {
        Component::new(primitive)
    }
}

/// Canonical document text.
impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::formatter::format_component(self))
    }
}

// ──────────────────────────────────────────────
// Entity
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Primitive(Primitive),
    Collection(Collection),
    Procedure(Procedure),
}

impl Entity {
    pub fn kind(&self) -> &'static str {
        match self {
            Entity::Primitive(primitive) => primitive.kind(),
            Entity::Collection(Collection::Series(_)) => "series",
            Entity::Collection(Collection::Structure(_)) => "structure",
            Entity::Collection(Collection::Range(_)) => "range",
            Entity::Procedure(_) => "procedure",
        }
    }
}

impl From<Primitive> for Entity {
    fn from(primitive: Primitive) -> Self {
        Entity::Primitive(primitive)
    }
}

impl From<Collection> for Entity {
    fn from(collection: Collection) -> Self {
        Entity::Collection(collection)
    }
}

impl From<Series> for Entity {
    fn from(series: Series) -> Self {
        Entity::Collection(Collection::Series(series))
    }
}

impl From<Structure> for Entity {
    fn from(structure: Structure) -> Self {
        Entity::Collection(Collection::Structure(structure))
    }
}

impl From<Range> for Entity {
    fn from(range: Range) -> Self {
        Entity::Collection(Collection::Range(range))
    }
}

impl From<Procedure> for Entity {
    fn from(procedure: Procedure) -> Self {
        Entity::Procedure(procedure)
    }
}

// ──────────────────────────────────────────────
// Context
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: Symbol,
    pub value: Component,
}

impl Parameter {
    pub fn new(name: Symbol, value: impl Into<Component>) -> Self {
        Parameter {
            name,
            value: value.into(),
        }
    }
}

/// Ordered, uniquely named parameters of a generic component.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    parameters: Vec<Parameter>,
}

impl Context {
    pub fn new(parameters: Vec<Parameter>) -> Result<Self, SemanticError> {
        if parameters.is_empty() {
            return Err(SemanticError::Empty {
                construct: "a context",
                element: "parameter",
            });
        }
        for (i, parameter) in parameters.iter().enumerate() {
            if parameters[..i].iter().any(|p| p.name == parameter.name) {
                return Err(SemanticError::DuplicateParameter {
                    name: parameter.name.to_string(),
                });
            }
        }
        Ok(Context { parameters })
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn get(&self, name: &Symbol) -> Option<&Component> {
        self.parameters
            .iter()
            .find(|p| &p.name == name)
            .map(|p| &p.value)
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literals::Number;

    fn symbol(name: &str) -> Symbol {
        Symbol::new(name).unwrap()
    }

    #[test]
    fn components_report_context_and_note() {
        let plain = Component::new(Primitive::from(true));
        assert!(!plain.is_generic());
        assert!(!plain.is_annotated());

        let context = Context::new(vec![Parameter::new(symbol("type"), Primitive::from(Number::real(1.0)))]).unwrap();
        let generic = Component::new(Primitive::from(true)).with_context(context).with_note("flag");
        assert!(generic.is_generic());
        assert!(generic.is_annotated());
        assert_eq!(generic.entity.kind(), "boolean");
    }

    #[test]
    fn contexts_reject_empty_and_duplicate_parameters() {
        assert_eq!(
            Context::new(vec![]),
            Err(SemanticError::Empty {
                construct: "a context",
                element: "parameter"
            })
        );
        let duplicated = Context::new(vec![
            Parameter::new(symbol("a"), Primitive::from(true)),
            Parameter::new(symbol("a"), Primitive::from(false)),
        ]);
        assert_eq!(
            duplicated,
            Err(SemanticError::DuplicateParameter {
                name: "$a".to_owned()
            })
        );
    }

    #[test]
    fn contexts_look_up_by_name() {
        let context = Context::new(vec![
            Parameter::new(symbol("a"), Primitive::from(true)),
            Parameter::new(symbol("b"), Primitive::from(false)),
        ])
        .unwrap();
        assert_eq!(context.get(&symbol("b")), Some(&Component::new(Primitive::from(false))));
        assert_eq!(context.get(&symbol("c")), None);
        assert_eq!(context.len(), 2);
    }
}
