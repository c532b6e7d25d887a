#![allow(dead_code)]

use flux_syntax::ast::query::AstQuery;
use flux_syntax::{
    parse_source, parse_source_with_config, print_program, Block, Config, Declaration, ErrorKind,
    LocatedDecl, LocatedExpr, LocatedStmt, ParseOutput, Program, Stmt,
};

/// Parse `code` with the default configuration
pub fn parse(code: &str) -> ParseOutput {
    parse_source(code)
}

pub fn parse_with(code: &str, config: Config) -> ParseOutput {
    parse_source_with_config(code, config)
}

/// Parse `code`, failing the test on any diagnostic
pub fn parse_clean(code: &str) -> Program {
    let output = parse_source(code);
    assert!(
        !output.has_errors(),
        "unexpected diagnostics for:\n{}\n---\n{}",
        code,
        output.errors
    );
    assert_well_formed(&output.program);
    output.program
}

/// Kinds of all diagnostics, in source order
pub fn error_kinds(output: &ParseOutput) -> Vec<ErrorKind> {
    output.errors.errors().iter().map(|error| error.kind).collect()
}

pub fn error_messages(output: &ParseOutput) -> Vec<String> {
    output
        .errors
        .errors()
        .iter()
        .map(|error| error.message.clone())
        .collect()
}

/// Spans nest and node ids are unique
pub fn assert_well_formed(program: &Program) {
    if let Some((parent, child)) = AstQuery::find_span_violation(program) {
        panic!("span {} escapes its parent {}", child, parent);
    }
    if let Some(id) = AstQuery::duplicate_node_id(program) {
        panic!("node id {:?} is used twice", id);
    }
}

/// Body of the first function declared at the top level
pub fn function_body<'a>(program: &'a Program, name: &str) -> &'a Block {
    program
        .declarations
        .iter()
        .find_map(|decl| match &decl.node {
            Declaration::Function(function) if function.name == name => function.body.as_ref(),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no function body named '{}'", name))
}

/// Statements of `def main() -> void { <body> }`
pub fn parse_body(body: &str) -> Vec<LocatedStmt> {
    let code = format!("def main() -> void {{\n{}\n}}", body);
    let program = parse_clean(&code);
    function_body(&program, "main").statements.clone()
}

/// Expression of the single statement `<expr>;` inside a function body
pub fn parse_expr(expr: &str) -> LocatedExpr {
    let statements = parse_body(&format!("{};", expr));
    assert_eq!(statements.len(), 1, "expected one statement for '{}'", expr);
    match &statements[0].node {
        Stmt::Expression(expr) => expr.clone(),
        other => panic!("expected an expression statement, got {:?}", other),
    }
}

/// The only top-level declaration of `code`
pub fn single_declaration(code: &str) -> LocatedDecl {
    let program = parse_clean(code);
    assert_eq!(
        program.declarations.len(),
        1,
        "expected exactly one declaration"
    );
    program.declarations[0].clone()
}

/// Expression rendered back to source, for compact shape assertions
pub fn render_expr(expr: &str) -> String {
    flux_syntax::Printer::new().print_expression(&parse_expr(expr))
}

/// Printing an error-free parse and parsing the result is a fixed point
pub fn assert_round_trip(code: &str) -> String {
    let program = parse_clean(code);
    let printed = print_program(&program);
    let reparsed = parse_clean(&printed);
    let reprinted = print_program(&reparsed);
    assert_eq!(printed, reprinted, "printer output is not stable for:\n{}", code);
    assert_eq!(
        AstQuery::count_nodes(&program),
        AstQuery::count_nodes(&reparsed),
        "re-parse changed the tree size"
    );
    printed
}
