//! Statement rendering

use super::Printer;
use crate::ast::*;

impl Printer {
    /// Indented statement without a trailing newline
    pub(super) fn write_statement(&mut self, stmt: &LocatedStmt) {
        self.indent();
        self.write_statement_inline(stmt);
    }

    pub(super) fn write_statement_inline(&mut self, stmt: &LocatedStmt) {
        match &stmt.node {
            Stmt::Expression(expr) => {
                self.write_expression(expr);
                self.output.push(';');
            }
            Stmt::Block(block) => self.write_block(block),
            Stmt::VarDecl(var) => {
                self.write_variable(var);
                self.output.push(';');
            }
            Stmt::If(if_stmt) => {
                self.output.push_str("if (");
                self.write_expression(&if_stmt.condition);
                self.output.push(')');
                self.write_body(&if_stmt.then_branch);

                if let Some(else_branch) = &if_stmt.else_branch {
                    if matches!(if_stmt.then_branch.node, Stmt::Block(_)) {
                        self.output.push_str(" else");
                    } else {
                        self.output.push('\n');
                        self.indent();
                        self.output.push_str("else");
                    }
                    if matches!(else_branch.node, Stmt::If(_)) {
                        self.output.push(' ');
                        self.write_statement_inline(else_branch);
                    } else {
                        self.write_body(else_branch);
                    }
                }
            }
            Stmt::While(while_stmt) => {
                self.output.push_str("while (");
                self.write_expression(&while_stmt.condition);
                self.output.push(')');
                self.write_body(&while_stmt.body);
            }
            Stmt::DoWhile(do_while) => {
                self.output.push_str("do");
                self.write_body(&do_while.body);
                if matches!(do_while.body.node, Stmt::Block(_)) {
                    self.output.push(' ');
                } else {
                    self.output.push('\n');
                    self.indent();
                }
                self.output.push_str("while (");
                self.write_expression(&do_while.condition);
                self.output.push_str(");");
            }
            Stmt::For(for_stmt) => {
                self.output.push_str("for (");
                self.write_for_init(&for_stmt.init);
                if let Some(condition) = &for_stmt.condition {
                    self.output.push(' ');
                    self.write_expression(condition);
                }
                self.output.push(';');
                if let Some(increment) = &for_stmt.increment {
                    self.output.push(' ');
                    self.write_expression(increment);
                }
                self.output.push(')');
                self.write_body(&for_stmt.body);
            }
            Stmt::ForRange(for_range) => {
                self.output.push_str("for (");
                self.output.push_str(&for_range.variable);
                if let Some(index) = &for_range.index_variable {
                    self.output.push_str(", ");
                    self.output.push_str(index);
                }
                self.output.push_str(" in ");
                self.write_expression(&for_range.range);
                self.output.push(')');
                self.write_body(&for_range.body);
            }
            Stmt::Switch(switch) => {
                self.output.push_str("switch (");
                self.write_expression(&switch.subject);
                self.output.push_str(") {\n");
                self.indent_level += 1;
                for case in &switch.cases {
                    self.indent();
                    self.output.push_str("case (");
                    match &case.pattern {
                        Some(pattern) => self.write_expression(pattern),
                        None => self.output.push_str("default"),
                    }
                    self.output.push_str(") ");
                    self.write_block(&case.body);
                    self.output.push('\n');
                }
                self.indent_level -= 1;
                self.indent();
                self.output.push('}');
            }
            Stmt::Return(value) => {
                self.output.push_str("return");
                if let Some(value) = value {
                    self.output.push(' ');
                    self.write_expression(value);
                }
                self.output.push(';');
            }
            Stmt::Break => self.output.push_str("break;"),
            Stmt::Continue => self.output.push_str("continue;"),
            Stmt::Try(try_stmt) => {
                self.output.push_str("try ");
                self.write_block(&try_stmt.body);
                for catch in &try_stmt.catches {
                    self.output.push_str(" catch ");
                    if let Some(exception_type) = &catch.exception_type {
                        self.output.push('(');
                        self.write_type(exception_type);
                        if let Some(binding) = &catch.binding {
                            self.output.push(' ');
                            self.output.push_str(binding);
                        }
                        self.output.push_str(") ");
                    }
                    self.write_block(&catch.handler);
                }
            }
            Stmt::Throw(throw) => match (&throw.message, &throw.body) {
                (None, None) => self.output.push_str("throw;"),
                (Some(message), None) => {
                    self.output.push_str("throw ");
                    self.write_expression(message);
                    self.output.push(';');
                }
                (Some(message), Some(body)) => {
                    self.output.push_str("throw (");
                    self.write_expression(message);
                    self.output.push_str(") ");
                    self.write_block(body);
                }
                (None, Some(body)) => {
                    self.output.push_str("throw ");
                    self.write_block(body);
                }
            },
            Stmt::Assert(condition) => {
                self.output.push_str("assert(");
                self.write_expression(condition);
                self.output.push_str(");");
            }
            Stmt::Asm(raw) => self.write_asm(raw),
            Stmt::Lock(lock) => {
                self.output.push_str(lock.kind.keyword());
                self.output.push(' ');
                self.output.push_str(&lock.scope_path.to_string());
                match &lock.body {
                    Some(body) => {
                        self.output.push(' ');
                        self.write_block(body);
                    }
                    None => self.output.push(';'),
                }
            }
            Stmt::Misplaced(decl) => self.write_declaration_inline(decl),
        }
    }

    /// Loop and branch bodies: blocks stay on the header line, single
    /// statements go on the next line one level deeper
    fn write_body(&mut self, body: &LocatedStmt) {
        if let Stmt::Block(block) = &body.node {
            self.output.push(' ');
            self.write_block(block);
            return;
        }
        self.output.push('\n');
        self.indent_level += 1;
        self.write_statement(body);
        self.indent_level -= 1;
    }

    pub(super) fn write_block(&mut self, block: &Block) {
        self.write_statement_list(&block.statements);
    }

    /// `{`, one statement per line, `}` at the current indentation
    pub(super) fn write_statement_list(&mut self, statements: &[LocatedStmt]) {
        if statements.is_empty() {
            self.output.push_str("{}");
            return;
        }
        self.output.push_str("{\n");
        self.indent_level += 1;
        for stmt in statements {
            self.write_statement(stmt);
            self.output.push('\n');
        }
        self.indent_level -= 1;
        self.indent();
        self.output.push('}');
    }

    /// Initializer clause of a three-clause `for`, including its `;`.
    /// Consecutive variables share one declaration.
    fn write_for_init(&mut self, init: &[LocatedStmt]) {
        let mut declared = false;
        for stmt in init {
            match &stmt.node {
                Stmt::VarDecl(var) if declared => {
                    self.output.push_str(", ");
                    self.output.push_str(&var.name);
                    if let Some(value) = &var.initializer {
                        self.output.push_str(" = ");
                        self.write_expression(value);
                    }
                }
                Stmt::VarDecl(var) => {
                    self.write_variable(var);
                    declared = true;
                }
                Stmt::Expression(expr) => self.write_expression(expr),
                _ => self.write_statement_inline(stmt),
            }
        }
        self.output.push(';');
    }

    pub(super) fn write_asm(&mut self, raw: &str) {
        self.output.push_str("asm { ");
        self.output.push_str(raw);
        self.output.push_str(" }");
    }
}
