mod common;

use common::{parse, parse_clean, parse_expr};
use flux_syntax::ast::query::AstQuery;
use flux_syntax::ast::visitor::{walk_program, walk_statement, Visitor};
use flux_syntax::{LocatedStmt, Stmt};

#[test]
fn test_contains_calls() {
    assert!(!AstQuery::contains_calls(&parse_expr("x")));
    assert!(AstQuery::contains_calls(&parse_expr("foo()")));
    assert!(AstQuery::contains_calls(&parse_expr("foo() + 42")));
    assert_eq!(AstQuery::count_calls(&parse_expr("f(g(1), h(2)).run()")), 4);
}

#[test]
fn test_collect_identifiers() {
    let identifiers = AstQuery::collect_identifiers(&parse_expr("x = y + f(z, y)"));
    let mut names: Vec<_> = identifiers.into_iter().collect();
    names.sort();
    assert_eq!(names, vec!["f", "x", "y", "z"]);
}

#[test]
fn test_declared_names_skip_locals() {
    let program = parse_clean(
        "namespace app {\n    object Server { int port; def run() -> void { int local = 1; } }\n}\ntemplate <T> struct Box { T value; }\nint a, b;",
    );
    assert_eq!(
        AstQuery::declared_names(&program),
        vec!["app", "Server", "port", "run", "Box", "a", "b"]
    );
}

#[test]
fn test_count_nodes() {
    // Variable, its type and its initializer
    let program = parse_clean("int x = 1;");
    assert_eq!(AstQuery::count_nodes(&program), 3);

    // Function, return type, return statement and its value
    let program = parse_clean("def f() -> int { return 0; }");
    assert_eq!(AstQuery::count_nodes(&program), 4);
}

#[test]
fn test_contains_placeholder() {
    assert!(!AstQuery::contains_placeholder(&parse_clean("x = 1;")));

    let output = parse("def f() -> void { x = 1 + ; }");
    assert!(output.has_errors());
    assert!(AstQuery::contains_placeholder(&output.program));

    let output = parse("def f(int) -> void { }");
    assert!(output.has_errors());
    assert!(!AstQuery::contains_placeholder(&output.program));

    let output = parse("def f(, int a) -> void { }");
    assert!(AstQuery::contains_placeholder(&output.program));
}

#[test]
fn test_multi_declarators_have_unique_ids() {
    let program = parse_clean("List<int>* a, b, c;\ndef f() -> void { Map<string, int> x, y; }");
    assert_eq!(AstQuery::duplicate_node_id(&program), None);
    assert_eq!(AstQuery::find_span_violation(&program), None);
}

#[test]
fn test_custom_visitor() {
    struct Loops(usize);

    impl Visitor for Loops {
        fn visit_statement(&mut self, stmt: &LocatedStmt) {
            if matches!(
                stmt.node,
                Stmt::While(_) | Stmt::DoWhile(_) | Stmt::For(_) | Stmt::ForRange(_)
            ) {
                self.0 += 1;
            }
            walk_statement(self, stmt);
        }
    }

    let program = parse_clean(
        "def f() -> void { while (a) { for (x in xs) { } } do { } while (b); if (c) { for (;;) { } } }",
    );
    let mut loops = Loops(0);
    walk_program(&mut loops, &program);
    assert_eq!(loops.0, 4);
}
