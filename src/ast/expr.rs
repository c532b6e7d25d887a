//! Expression AST node definitions

use super::{LocatedExpr, LocatedStmt, LocatedType};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Literal(Literal),
    Identifier(String),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Assign(AssignExpr),
    Ternary(TernaryExpr),
    Call(CallExpr),
    Member(MemberExpr),
    Subscript(SubscriptExpr),
    Cast(CastExpr),
    SizeOf(Box<LocatedType>),
    TypeOf(Box<LocatedExpr>),
    Op(OpExpr),
    InterpolatedString(InterpolatedString),
    Array(Vec<LocatedExpr>),
    Dictionary(Vec<DictEntry>),
    Group(Box<LocatedExpr>),
    AnonymousBlock(Vec<LocatedStmt>),
    /// Marks a fragment that could not be parsed
    Placeholder,
}

impl Expr {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Expr::Placeholder)
    }

    /// Expressions that may appear on the left of an assignment
    pub fn is_assignable(&self) -> bool {
        match self {
            Expr::Identifier(_) | Expr::Member(_) | Expr::Subscript(_) => true,
            Expr::Unary(unary) => unary.op == UnaryOp::Deref,
            Expr::Group(inner) => inner.node.is_assignable(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    Int(u64),
    Float(f64),
    Bool(bool),
    Char(char),
    String(String),
    /// Binary digits of a `0b` literal
    BitData(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Box<LocatedExpr>,
    pub prefix: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Not,
    Negate,
    Plus,
    BitNot,
    Increment,
    Decrement,
    Deref,
    AddressOf,
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Negate => "-",
            UnaryOp::Plus => "+",
            UnaryOp::BitNot => "~",
            UnaryOp::Increment => "++",
            UnaryOp::Decrement => "--",
            UnaryOp::Deref => "*",
            UnaryOp::AddressOf => "@",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Box<LocatedExpr>,
    pub right: Box<LocatedExpr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Equal,
    NotEqual,
    Is,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Shl,
    Shr,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::BitAnd => "&",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Is => "is",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Power => "**",
        }
    }

    /// Binding strength, higher binds tighter
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::BitOr => 3,
            BinaryOp::BitXor => 4,
            BinaryOp::BitAnd => 5,
            BinaryOp::Equal | BinaryOp::NotEqual | BinaryOp::Is => 6,
            BinaryOp::Less | BinaryOp::LessEqual | BinaryOp::Greater | BinaryOp::GreaterEqual => 7,
            BinaryOp::Shl | BinaryOp::Shr => 8,
            BinaryOp::Add | BinaryOp::Subtract => 9,
            BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulo => 10,
            BinaryOp::Power => 11,
        }
    }

    pub fn is_right_associative(&self) -> bool {
        matches!(self, BinaryOp::Power)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignExpr {
    pub op: AssignOp,
    pub target: Box<LocatedExpr>,
    pub value: Box<LocatedExpr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssignOp {
    Assign,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Power,
}

impl AssignOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Subtract => "-=",
            AssignOp::Multiply => "*=",
            AssignOp::Divide => "/=",
            AssignOp::Modulo => "%=",
            AssignOp::BitAnd => "&=",
            AssignOp::BitOr => "|=",
            AssignOp::BitXor => "^=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
            AssignOp::Power => "**=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TernaryExpr {
    pub condition: Box<LocatedExpr>,
    pub then_expr: Box<LocatedExpr>,
    pub else_expr: Box<LocatedExpr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallExpr {
    pub callee: Box<LocatedExpr>,
    pub args: Vec<LocatedExpr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberExpr {
    pub object: Box<LocatedExpr>,
    pub member: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptExpr {
    pub object: Box<LocatedExpr>,
    pub index: Box<LocatedExpr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastExpr {
    pub target_type: Box<LocatedType>,
    pub operand: Box<LocatedExpr>,
}

/// `op<left NAME right>`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpExpr {
    pub left: Box<LocatedExpr>,
    pub operator_name: String,
    pub right: Box<LocatedExpr>,
}

/// `i"a{}b{}":{x; y;}`; `literal_parts` has one more entry than
/// `expr_parts` when the two agree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterpolatedString {
    pub literal_parts: Vec<String>,
    pub expr_parts: Vec<LocatedExpr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DictEntry {
    pub key: LocatedExpr,
    pub value: LocatedExpr,
}
