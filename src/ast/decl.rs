//! Declaration AST node definitions

use super::{Block, LocatedDecl, LocatedExpr, LocatedStmt, LocatedType, QualifiedName};
use crate::error::Span;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Declaration {
    Import(ImportDecl),
    Using(QualifiedName),
    Namespace(NamespaceDecl),
    Class(ClassDecl),
    Object(ObjectDecl),
    Struct(StructDecl),
    Function(FunctionDecl),
    Operator(OperatorDecl),
    Variable(VariableDecl),
    Template(TemplateDecl),
    Enum(EnumDecl),
    TypeAlias(TypeAliasDecl),
    Data(DataDecl),
    Asm(String),
    /// A statement written outside of any function
    Statement(Box<LocatedStmt>),
}

impl Declaration {
    /// Name introduced by this declaration, if it introduces one
    pub fn name(&self) -> Option<&str> {
        match self {
            Declaration::Namespace(decl) => Some(&decl.name),
            Declaration::Class(decl) => Some(&decl.name),
            Declaration::Object(decl) => Some(&decl.name),
            Declaration::Struct(decl) => Some(&decl.name),
            Declaration::Function(decl) => Some(&decl.name),
            Declaration::Variable(decl) => Some(&decl.name),
            Declaration::Template(decl) => decl.inner.node.name(),
            Declaration::Enum(decl) => Some(&decl.name),
            Declaration::TypeAlias(decl) => Some(&decl.name),
            Declaration::Data(decl) => Some(&decl.name),
            Declaration::Import(decl) => decl.alias.as_deref(),
            Declaration::Using(_)
            | Declaration::Operator(_)
            | Declaration::Asm(_)
            | Declaration::Statement(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportDecl {
    pub path: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamespaceDecl {
    pub name: String,
    pub members: Vec<LocatedDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassDecl {
    pub name: String,
    pub base_list: Vec<QualifiedName>,
    pub exclusion_list: Vec<QualifiedName>,
    pub members: Vec<LocatedDecl>,
    pub is_forward: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectDecl {
    pub name: String,
    pub base_list: Vec<QualifiedName>,
    pub members: Vec<LocatedDecl>,
    pub is_forward: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructDecl {
    pub name: String,
    pub fields: Vec<StructField>,
    pub is_forward: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructField {
    pub field_type: LocatedType,
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub param_type: LocatedType,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Parameter>,
    pub return_type: LocatedType,
    pub body: Option<Block>,
    pub is_prototype: bool,
}

impl FunctionDecl {
    pub fn prototype(name: String, params: Vec<Parameter>, return_type: LocatedType) -> Self {
        Self {
            name,
            params,
            return_type,
            body: None,
            is_prototype: true,
        }
    }

    /// Attach the body parsed after the signature
    pub fn attach_body(&mut self, body: Block) {
        self.body = Some(body);
        self.is_prototype = false;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatorDecl {
    pub symbol: String,
    pub params: Vec<Parameter>,
    pub return_type: LocatedType,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDecl {
    pub var_type: LocatedType,
    pub name: String,
    pub initializer: Option<LocatedExpr>,
    pub is_const: bool,
    pub is_volatile: bool,
    /// Present for `Type{} name` and `Type(args){} name`
    pub instantiation: Option<Instantiation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instantiation {
    pub args: Vec<LocatedExpr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateDecl {
    pub type_params: Vec<String>,
    pub inner: Box<LocatedDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumDecl {
    pub name: String,
    pub members: Vec<EnumMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumMember {
    pub name: String,
    pub value: Option<LocatedExpr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeAliasDecl {
    pub name: String,
    pub underlying: LocatedType,
}

/// `[signed|unsigned] data{N} as Name;`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataDecl {
    pub name: String,
    pub bit_width: u64,
    pub is_signed: bool,
}
