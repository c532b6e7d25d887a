//! Statement grammar inside function bodies

mod common;

use common::{error_kinds, function_body, parse, parse_body};
use flux_syntax::{ErrorKind, Expr, LockKind, Stmt};

#[test]
fn test_if_else_chain() {
    let statements = parse_body("if (a) { x = 1; } else if (b) x = 2; else { x = 3; }");
    assert_eq!(statements.len(), 1);
    let Stmt::If(outer) = &statements[0].node else {
        panic!("expected if");
    };
    assert!(matches!(outer.then_branch.node, Stmt::Block(_)));
    let Some(else_branch) = &outer.else_branch else {
        panic!("expected an else branch");
    };
    let Stmt::If(inner) = &else_branch.node else {
        panic!("expected else-if");
    };
    assert!(matches!(inner.then_branch.node, Stmt::Expression(_)));
    assert!(inner.else_branch.is_some());
}

#[test]
fn test_loops() {
    let statements = parse_body(
        "while (i < 10) { i++; }\ndo { i--; } while (i > 0);\nfor (int i = 0, j = 1; i < n; i++) { continue; }\nfor (;;) break;",
    );
    assert_eq!(statements.len(), 4);
    assert!(matches!(statements[0].node, Stmt::While(_)));
    assert!(matches!(statements[1].node, Stmt::DoWhile(_)));

    let Stmt::For(counted) = &statements[2].node else {
        panic!("expected for");
    };
    assert_eq!(counted.init.len(), 2);
    assert!(counted.init.iter().all(|stmt| matches!(stmt.node, Stmt::VarDecl(_))));
    assert!(counted.condition.is_some());
    assert!(counted.increment.is_some());

    let Stmt::For(forever) = &statements[3].node else {
        panic!("expected for");
    };
    assert!(forever.init.is_empty());
    assert!(forever.condition.is_none());
    assert!(forever.increment.is_none());
    assert_eq!(forever.body.node, Stmt::Break);
}

#[test]
fn test_for_with_expression_init() {
    let statements = parse_body("for (i = 0; i < n; i += 2) { }");
    let Stmt::For(stmt) = &statements[0].node else {
        panic!("expected for");
    };
    assert_eq!(stmt.init.len(), 1);
    assert!(matches!(stmt.init[0].node, Stmt::Expression(_)));
}

#[test]
fn test_range_loops() {
    let statements = parse_body("for (item in items) { }\nfor (value, index in list.values()) { }");
    let Stmt::ForRange(simple) = &statements[0].node else {
        panic!("expected range loop");
    };
    assert_eq!(simple.variable, "item");
    assert!(simple.index_variable.is_none());

    let Stmt::ForRange(indexed) = &statements[1].node else {
        panic!("expected range loop");
    };
    assert_eq!(indexed.variable, "value");
    assert_eq!(indexed.index_variable.as_deref(), Some("index"));
    assert!(matches!(indexed.range.node, Expr::Call(_)));
}

#[test]
fn test_switch_cases() {
    let statements = parse_body(
        "switch (x) {\n    case (1) { y = 1; break; }\n    case (2) { y = 2; };\n    case (default) { y = 0; }\n}",
    );
    let Stmt::Switch(switch) = &statements[0].node else {
        panic!("expected switch");
    };
    assert_eq!(switch.cases.len(), 3);
    assert!(switch.cases[0].pattern.is_some());
    assert!(switch.cases[2].is_default);
    assert!(switch.cases[2].pattern.is_none());
}

#[test]
fn test_switch_default_case_rules() {
    let output = parse("def f() -> void {\n    switch (x) { case (1) { } }\n}");
    assert_eq!(error_kinds(&output), vec![ErrorKind::MissingDefaultCase]);

    let output = parse(
        "def f() -> void {\n    switch (x) { case (default) { } case (default) { } }\n}",
    );
    assert_eq!(error_kinds(&output), vec![ErrorKind::DuplicateDefaultCase]);
    let body = function_body(&output.program, "f");
    let Stmt::Switch(switch) = &body.statements[0].node else {
        panic!("expected switch");
    };
    assert_eq!(switch.cases.len(), 2);
}

#[test]
fn test_try_catch() {
    let statements = parse_body("try { risky(); } catch (Error e) { log(e); } catch { }");
    let Stmt::Try(stmt) = &statements[0].node else {
        panic!("expected try");
    };
    assert_eq!(stmt.catches.len(), 2);
    assert_eq!(stmt.catches[0].binding.as_deref(), Some("e"));
    assert!(stmt.catches[0].exception_type.is_some());
    assert!(stmt.catches[1].exception_type.is_none());
}

#[test]
fn test_try_without_catch_is_reported() {
    let output = parse("def f() -> void {\n    try { }\n    x = 1;\n}");
    assert_eq!(error_kinds(&output), vec![ErrorKind::ExpectedToken]);
}

#[test]
fn test_throw_forms() {
    let statements = parse_body("throw;\nthrow err;\nthrow(\"bad\") { cleanup(); }\nthrow { cleanup(); }");
    let throws: Vec<(bool, bool)> = statements
        .iter()
        .map(|stmt| match &stmt.node {
            Stmt::Throw(throw) => (throw.message.is_some(), throw.body.is_some()),
            other => panic!("expected throw, got {:?}", other),
        })
        .collect();
    assert_eq!(
        throws,
        vec![(false, false), (true, false), (true, true), (false, true)]
    );

    // Parentheses around a message with a body are not a group
    let Stmt::Throw(throw) = &statements[2].node else {
        panic!("expected throw");
    };
    assert!(matches!(
        throw.message.as_ref().map(|message| &message.node),
        Some(Expr::Literal(_))
    ));
}

#[test]
fn test_return_assert_asm_lock() {
    let statements = parse_body(
        "assert(x > 0);\nasm { nop }\nlock self.state;\nprelock shared.queue { push(1); }\nreturn;\nreturn x;",
    );
    assert!(matches!(statements[0].node, Stmt::Assert(_)));
    assert_eq!(statements[1].node, Stmt::Asm("nop".to_string()));

    let Stmt::Lock(lock) = &statements[2].node else {
        panic!("expected lock");
    };
    assert_eq!(lock.kind, LockKind::Lock);
    assert_eq!(lock.scope_path.to_string(), "self.state");
    assert!(lock.body.is_none());

    let Stmt::Lock(prelock) = &statements[3].node else {
        panic!("expected prelock");
    };
    assert_eq!(prelock.kind, LockKind::PreLock);
    assert!(prelock.body.is_some());

    assert_eq!(statements[4].node, Stmt::Return(None));
    assert!(matches!(statements[5].node, Stmt::Return(Some(_))));
}

#[test]
fn test_misplaced_jumps_stay_in_tree() {
    let output = parse("def f() -> void {\n    break;\n    continue;\n    switch (x) { case (default) { break; } }\n}");
    assert_eq!(
        error_kinds(&output),
        vec![ErrorKind::MisplacedJump, ErrorKind::MisplacedJump]
    );
    let body = function_body(&output.program, "f");
    assert_eq!(body.statements.len(), 3);
    assert_eq!(body.statements[0].node, Stmt::Break);
}

#[test]
fn test_continue_in_switch_inside_loop() {
    let statements = parse_body("while (true) { switch (x) { case (default) { continue; } } }");
    assert_eq!(statements.len(), 1);
}

#[test]
fn test_nested_blocks_and_empty_statements() {
    let statements = parse_body(";;{ { int x = 1; } ; }");
    assert_eq!(statements.len(), 1);
    let Stmt::Block(outer) = &statements[0].node else {
        panic!("expected block");
    };
    assert_eq!(outer.statements.len(), 1);
}

#[test]
fn test_local_multi_declaration_in_branch_is_grouped() {
    let statements = parse_body("if (ready) int a = 1, b = 2;");
    let Stmt::If(stmt) = &statements[0].node else {
        panic!("expected if");
    };
    let Stmt::Block(group) = &stmt.then_branch.node else {
        panic!("expected the declarators grouped in a block");
    };
    assert_eq!(group.statements.len(), 2);
}
