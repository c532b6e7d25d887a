//! Type rendering

use super::Printer;
use crate::ast::*;

impl Printer {
    pub(super) fn write_type(&mut self, ty: &LocatedType) {
        match &ty.node {
            Type::Builtin(builtin) => self.output.push_str(builtin.keyword()),
            Type::Named(name) => self.output.push_str(name),
            Type::Qualified(name) => self.output.push_str(&name.to_string()),
            Type::Pointer(pointer) => {
                self.write_type(&pointer.pointee);
                self.output.push('*');
                self.write_pointer_qualifiers(pointer);
            }
            Type::Array(array) => {
                self.write_type(&array.element);
                self.output.push('[');
                if let Some(size) = &array.size {
                    self.write_expression(size);
                }
                self.output.push(']');
            }
            Type::Function(function) => {
                self.output.push_str("def(");
                self.write_separated(&function.param_types, Self::write_type);
                self.output.push_str(") -> ");
                self.write_type(&function.return_type);
            }
            Type::Data(data) => self.write_data_type(data.bit_width, data.is_signed),
            Type::TemplateInstantiation(instance) => {
                self.write_type(&instance.base);
                self.output.push('<');
                self.write_separated(&instance.args, Self::write_type);
                self.output.push('>');
            }
            Type::Placeholder => self.output.push_str("/* missing type */"),
        }
    }

    pub(super) fn write_pointer_qualifiers(&mut self, pointer: &PointerType) {
        if pointer.is_const {
            self.output.push_str(" const");
        }
        if pointer.is_volatile {
            self.output.push_str(" volatile");
        }
    }

    /// Bare `data` is unsigned
    pub(super) fn write_data_type(&mut self, bit_width: u64, is_signed: bool) {
        if is_signed {
            self.output.push_str("signed ");
        }
        self.output.push_str(&format!("data{{{}}}", bit_width));
    }

    /// `Type name`, or `R* name(P1, P2)` for function pointers
    pub(super) fn write_declarator(&mut self, ty: &LocatedType, name: &str) {
        if let Type::Pointer(pointer) = &ty.node {
            if let Type::Function(function) = &pointer.pointee.node {
                self.write_type(&function.return_type);
                self.output.push('*');
                self.write_pointer_qualifiers(pointer);
                self.output.push(' ');
                self.output.push_str(name);
                self.output.push('(');
                self.write_separated(&function.param_types, Self::write_type);
                self.output.push(')');
                return;
            }
        }
        self.write_type(ty);
        self.output.push(' ');
        self.output.push_str(name);
    }
}
