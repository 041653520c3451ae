#![allow(clippy::result_large_err)]
//! bdn-core: Bali Document Notation parser, formatter and syntax tree.
//!
//! A document is a single component: a primitive, a collection or a
//! procedure, with an optional parameter context and note. Parsing and
//! formatting are inverses on canonical text.
//!
//! # Public API
//!
//! Key types are re-exported at the crate root for convenience:
//!
//! - [`parse_document()`] -- text to [`Component`], failing on the first
//!   unrecoverable violation
//! - [`format_component()`] -- [`Component`] to canonical text
//! - [`ParseOptions`] -- trailing newline and nesting depth knobs
//! - [`Error`] -- scan, grammar, semantic, codec and index failures
//! - AST types: [`Component`], [`Entity`], [`Context`], [`Collection`],
//!   [`Procedure`], [`Statement`], [`Clause`], [`Expression`]
//! - Literal types: [`Primitive`] and the per-kind codecs in [`literals`]
//!
//! Standalone expressions and procedures have their own entry points for
//! tools that work below the document level.

/// Notation revision implemented by this crate.
pub const BDN_VERSION: &str = "v2";
/// Indentation emitted per nesting level.
pub const INDENTATION: &str = "    ";
/// Encoded characters per line of a wrapped binary literal.
pub const BINARY_LINE_WIDTH: usize = 60;

pub mod ast;
pub mod error;
pub mod formatter;
pub mod grammar;
pub mod lexer;
pub mod literals;
pub mod options;
pub mod ordinal;
pub mod parser;

// ── Convenience re-exports: key types ────────────────────────────────

pub use ast::{Clause, Collection, Component, Context, Entity, Expression, Procedure, Statement};
pub use error::{CodecError, Error, GrammarViolation, IndexError, ScanError, SemanticError};
pub use literals::Primitive;
pub use options::ParseOptions;
pub use ordinal::Indexed;

// ── Convenience re-exports: entry points ─────────────────────────────

pub use formatter::{format_component, format_expression, format_procedure};
pub use parser::{parse_document, parse_document_with, parse_expression, parse_procedure};
