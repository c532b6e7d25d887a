//! Type expressions

use super::{LocatedExpr, LocatedType, QualifiedName};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Type {
    Builtin(BuiltinType),
    Named(String),
    Qualified(QualifiedName),
    Pointer(PointerType),
    Array(ArrayType),
    Function(FunctionType),
    Data(DataType),
    TemplateInstantiation(TemplateInstance),
    /// Stands in for a type that could not be parsed
    Placeholder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BuiltinType {
    Void,
    Auto,
    Class,
    Object,
    Struct,
}

impl BuiltinType {
    pub fn keyword(&self) -> &'static str {
        match self {
            BuiltinType::Void => "void",
            BuiltinType::Auto => "auto",
            BuiltinType::Class => "class",
            BuiltinType::Object => "object",
            BuiltinType::Struct => "struct",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointerType {
    pub pointee: Box<LocatedType>,
    pub is_const: bool,
    pub is_volatile: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayType {
    pub element: Box<LocatedType>,
    pub size: Option<Box<LocatedExpr>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionType {
    pub param_types: Vec<LocatedType>,
    pub return_type: Box<LocatedType>,
}

/// `[signed|unsigned] data{N}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DataType {
    pub bit_width: u64,
    pub is_signed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateInstance {
    pub base: Box<LocatedType>,
    pub args: Vec<LocatedType>,
}

impl Type {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Type::Placeholder)
    }

    /// Pointer to a function type, the shape of `R* name(P1, P2)` declarators
    pub fn as_function_pointer(&self) -> Option<&FunctionType> {
        match self {
            Type::Pointer(pointer) => match &pointer.pointee.node {
                Type::Function(function) => Some(function),
                _ => None,
            },
            _ => None,
        }
    }
}
