//! Abstract Syntax Tree (AST) type definitions for Flux
//!
//! Every node is wrapped in [`Located`], which carries the node's source span
//! and a [`NodeId`] stamped by the parser in construction order. Node
//! categories are closed enums so consumers can match exhaustively, or use the
//! [`visitor::Visitor`] walk functions for pre-order traversal.

pub mod decl;
pub mod expr;
pub mod query;
pub mod stmt;
pub mod types;
pub mod visitor;

pub use decl::*;
pub use expr::*;
pub use stmt::*;
pub use types::*;

use crate::error::Span;
use nonempty::NonEmpty;
use serde::Serialize;
use std::fmt;

/// Identity of a node, unique within one parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(pub u32);

/// A wrapper for AST nodes that includes source location information
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Located<T> {
    pub node: T,
    pub span: Span,
    pub id: NodeId,
}

impl<T> Located<T> {
    pub fn new(node: T, span: Span, id: NodeId) -> Self {
        Self { node, span, id }
    }
}

pub type LocatedExpr = Located<Expr>;
pub type LocatedStmt = Located<Stmt>;
pub type LocatedDecl = Located<Declaration>;
pub type LocatedType = Located<Type>;

/// Dotted name such as `std.io.File`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualifiedName {
    pub segments: NonEmpty<String>,
}

impl QualifiedName {
    pub fn new(segments: NonEmpty<String>) -> Self {
        Self { segments }
    }

    pub fn single(name: impl Into<String>) -> Self {
        Self {
            segments: NonEmpty::new(name.into()),
        }
    }

    pub fn is_simple(&self) -> bool {
        self.segments.tail.is_empty()
    }

    pub fn last(&self) -> &str {
        self.segments.last()
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.segments.iter().map(String::as_str).collect();
        f.write_str(&joined.join("."))
    }
}

/// Root of one parse; owns the whole tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub declarations: Vec<LocatedDecl>,
    pub span: Span,
}

impl Program {
    pub fn new(declarations: Vec<LocatedDecl>, span: Span) -> Self {
        Self { declarations, span }
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}
