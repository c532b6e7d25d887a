//! Declaration rendering

use super::utils::escape;
use super::Printer;
use crate::ast::*;

impl Printer {
    /// Indented declaration without a trailing newline
    pub(super) fn write_declaration(&mut self, decl: &LocatedDecl) {
        self.indent();
        self.write_declaration_inline(decl);
    }

    pub(super) fn write_declaration_inline(&mut self, decl: &LocatedDecl) {
        match &decl.node {
            Declaration::Import(import) => {
                self.output.push_str("import \"");
                self.output.push_str(&escape(&import.path, '"'));
                self.output.push('"');
                if let Some(alias) = &import.alias {
                    self.output.push_str(" as ");
                    self.output.push_str(alias);
                }
                self.output.push(';');
            }
            Declaration::Using(path) => {
                self.output.push_str("using ");
                self.output.push_str(&path.to_string());
                self.output.push(';');
            }
            Declaration::Namespace(namespace) => {
                self.output.push_str("namespace ");
                self.output.push_str(&namespace.name);
                self.output.push(' ');
                self.write_members(&namespace.members);
            }
            Declaration::Class(class) => {
                self.output.push_str("class ");
                self.output.push_str(&class.name);
                self.write_inheritance(&class.base_list, &class.exclusion_list);
                if class.is_forward {
                    self.output.push(';');
                } else {
                    self.output.push(' ');
                    self.write_members(&class.members);
                }
            }
            Declaration::Object(object) => {
                self.output.push_str("object ");
                self.output.push_str(&object.name);
                self.write_inheritance(&object.base_list, &[]);
                if object.is_forward {
                    self.output.push(';');
                } else {
                    self.output.push(' ');
                    self.write_members(&object.members);
                }
            }
            Declaration::Struct(decl) => {
                self.output.push_str("struct ");
                self.output.push_str(&decl.name);
                if decl.is_forward {
                    self.output.push(';');
                    return;
                }
                if decl.fields.is_empty() {
                    self.output.push_str(" {}");
                    return;
                }
                self.output.push_str(" {\n");
                self.indent_level += 1;
                for field in &decl.fields {
                    self.indent();
                    self.write_type(&field.field_type);
                    self.output.push(' ');
                    self.output.push_str(&field.name);
                    self.output.push_str(";\n");
                }
                self.indent_level -= 1;
                self.indent();
                self.output.push('}');
            }
            Declaration::Function(function) => {
                self.output.push_str("def ");
                self.output.push_str(&function.name);
                self.write_parameters(&function.params);
                self.output.push_str(" -> ");
                self.write_type(&function.return_type);
                match &function.body {
                    Some(body) => {
                        self.output.push(' ');
                        self.write_block(body);
                    }
                    None => self.output.push(';'),
                }
            }
            Declaration::Operator(operator) => {
                self.output.push_str("operator");
                self.write_parameters(&operator.params);
                self.output.push('[');
                self.output.push_str(&operator.symbol);
                self.output.push_str("] -> ");
                self.write_type(&operator.return_type);
                self.output.push(' ');
                self.write_block(&operator.body);
            }
            Declaration::Variable(var) => {
                self.write_variable(var);
                self.output.push(';');
            }
            Declaration::Template(template) => {
                self.output.push_str("template <");
                self.output.push_str(&template.type_params.join(", "));
                self.output.push_str("> ");
                self.write_declaration_inline(&template.inner);
            }
            Declaration::Enum(decl) => {
                self.output.push_str("enum ");
                self.output.push_str(&decl.name);
                if decl.members.is_empty() {
                    self.output.push_str(" {}");
                    return;
                }
                self.output.push_str(" {\n");
                self.indent_level += 1;
                for (index, member) in decl.members.iter().enumerate() {
                    self.indent();
                    self.output.push_str(&member.name);
                    if let Some(value) = &member.value {
                        self.output.push_str(" = ");
                        self.write_expression(value);
                    }
                    if index + 1 < decl.members.len() {
                        self.output.push(',');
                    }
                    self.output.push('\n');
                }
                self.indent_level -= 1;
                self.indent();
                self.output.push('}');
            }
            Declaration::TypeAlias(alias) => {
                self.output.push_str("type ");
                self.output.push_str(&alias.name);
                self.output.push_str(" = ");
                self.write_type(&alias.underlying);
                self.output.push(';');
            }
            Declaration::Data(data) => {
                self.write_data_type(data.bit_width, data.is_signed);
                self.output.push_str(" as ");
                self.output.push_str(&data.name);
                self.output.push(';');
            }
            Declaration::Asm(raw) => self.write_asm(raw),
            Declaration::Statement(stmt) => self.write_statement_inline(stmt),
        }
    }

    fn write_members(&mut self, members: &[LocatedDecl]) {
        if members.is_empty() {
            self.output.push_str("{}");
            return;
        }
        self.output.push_str("{\n");
        self.indent_level += 1;
        for member in members {
            self.write_declaration(member);
            self.output.push('\n');
        }
        self.indent_level -= 1;
        self.indent();
        self.output.push('}');
    }

    fn write_inheritance(&mut self, bases: &[QualifiedName], exclusions: &[QualifiedName]) {
        if bases.is_empty() && exclusions.is_empty() {
            return;
        }
        let entries: Vec<String> = bases
            .iter()
            .map(ToString::to_string)
            .chain(exclusions.iter().map(|name| format!("!{}", name)))
            .collect();
        self.output.push_str(" : ");
        self.output.push_str(&entries.join(", "));
    }

    fn write_parameters(&mut self, params: &[Parameter]) {
        self.output.push('(');
        self.write_separated(params, |printer, param| {
            printer.write_type(&param.param_type);
            printer.output.push(' ');
            printer.output.push_str(&param.name);
        });
        self.output.push(')');
    }

    /// Variable without its terminating `;`
    pub(super) fn write_variable(&mut self, var: &VariableDecl) {
        if var.is_const {
            self.output.push_str("const ");
        }
        if var.is_volatile {
            self.output.push_str("volatile ");
        }

        match &var.instantiation {
            Some(instantiation) => {
                self.write_type(&var.var_type);
                if !instantiation.args.is_empty() {
                    self.output.push('(');
                    self.write_separated(&instantiation.args, Self::write_expression);
                    self.output.push(')');
                }
                self.output.push_str("{} ");
                self.output.push_str(&var.name);
            }
            None => self.write_declarator(&var.var_type, &var.name),
        }

        if let Some(initializer) = &var.initializer {
            self.output.push_str(" = ");
            self.write_expression(initializer);
        }
    }
}
