//! Flux source generation from the AST.
//!
//! Renders a tree back to canonical Flux: four-space indentation, one
//! declarator per declaration, and parentheses only where the tree shape
//! requires them. Parsing the output of an error-free tree yields the same
//! tree shape.

mod declarations;
mod expressions;
mod statements;
mod types;
mod utils;

use crate::ast::*;

pub struct Printer {
    output: String,
    indent_level: usize,
}

impl Printer {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
        }
    }

    /// Render a whole program
    pub fn print_program(mut self, program: &Program) -> String {
        let mut previous_was_body = false;
        for (index, decl) in program.declarations.iter().enumerate() {
            let has_body = Self::has_body(&decl.node);
            if index > 0 && (has_body || previous_was_body) {
                self.output.push('\n');
            }
            self.write_declaration(decl);
            self.output.push('\n');
            previous_was_body = has_body;
        }
        self.output
    }

    pub fn print_expression(mut self, expr: &LocatedExpr) -> String {
        self.write_expression(expr);
        self.output
    }

    pub fn print_type(mut self, ty: &LocatedType) -> String {
        self.write_type(ty);
        self.output
    }

    pub fn print_statement(mut self, stmt: &LocatedStmt) -> String {
        self.write_statement(stmt);
        self.output
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render `program` as Flux source
pub fn print_program(program: &Program) -> String {
    Printer::new().print_program(program)
}
