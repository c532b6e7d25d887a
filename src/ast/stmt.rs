//! Statement AST node definitions
//!
//! This module contains the statement forms that may appear inside function
//! bodies: control flow, `switch`, `try`/`catch`, locks and local variable
//! declarations.

use super::{LocatedDecl, LocatedExpr, LocatedStmt, LocatedType, QualifiedName, VariableDecl};
use crate::error::Span;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    Expression(LocatedExpr),
    Block(Block),
    VarDecl(VariableDecl),
    If(IfStmt),
    While(WhileStmt),
    DoWhile(DoWhileStmt),
    For(ForStmt),
    ForRange(ForRangeStmt),
    Switch(SwitchStmt),
    Return(Option<LocatedExpr>),
    Break,
    Continue,
    Try(TryStmt),
    Throw(ThrowStmt),
    Assert(LocatedExpr),
    Asm(String),
    Lock(LockStmt),
    /// A declaration that may not appear in a function body, kept in place
    /// after it was reported
    Misplaced(Box<LocatedDecl>),
}

/// Brace-delimited statement list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub statements: Vec<LocatedStmt>,
    pub span: Span,
}

impl Block {
    pub fn new(statements: Vec<LocatedStmt>, span: Span) -> Self {
        Self { statements, span }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfStmt {
    pub condition: LocatedExpr,
    pub then_branch: Box<LocatedStmt>,
    pub else_branch: Option<Box<LocatedStmt>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhileStmt {
    pub condition: LocatedExpr,
    pub body: Box<LocatedStmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoWhileStmt {
    pub body: Box<LocatedStmt>,
    pub condition: LocatedExpr,
}

/// Three-clause `for`. `init` holds one statement per declarator, so an
/// absent initializer is an empty list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForStmt {
    pub init: Vec<LocatedStmt>,
    pub condition: Option<LocatedExpr>,
    pub increment: Option<LocatedExpr>,
    pub body: Box<LocatedStmt>,
}

/// `for (x[, i] in expr)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForRangeStmt {
    pub variable: String,
    pub index_variable: Option<String>,
    pub range: LocatedExpr,
    pub body: Box<LocatedStmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchStmt {
    pub subject: LocatedExpr,
    pub cases: Vec<SwitchCase>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchCase {
    /// `None` for the default case
    pub pattern: Option<LocatedExpr>,
    pub body: Block,
    pub is_default: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TryStmt {
    pub body: Block,
    pub catches: Vec<CatchClause>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatchClause {
    pub exception_type: Option<LocatedType>,
    pub binding: Option<String>,
    pub handler: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThrowStmt {
    pub message: Option<LocatedExpr>,
    pub body: Option<Block>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LockKind {
    Lock,
    PreLock,
    PostLock,
}

impl LockKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            LockKind::Lock => "lock",
            LockKind::PreLock => "prelock",
            LockKind::PostLock => "postlock",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LockStmt {
    pub kind: LockKind,
    pub scope_path: QualifiedName,
    pub body: Option<Block>,
}
