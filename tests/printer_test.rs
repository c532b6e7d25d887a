//! Printing parsed programs back to source

mod common;

use common::{assert_round_trip, parse, parse_clean, render_expr};
use flux_syntax::{print_program, Printer};
use insta::assert_snapshot;

#[test]
fn test_declaration_layout() {
    let program = parse_clean(
        r#"import "std/io.fx" as io;
using std.io;
const int LIMIT = 10;
def add(int a, int b) -> int { return a + b; }
object Counter : Base { int count; def bump() -> void { count += 1; } }
def log(string message);
enum Color { Red, Green = 2 }
template <T> def id(T value) -> T { return value; }
"#,
    );

    assert_snapshot!(print_program(&program), @r###"
import "std/io.fx" as io;
using std.io;
const int LIMIT = 10;

def add(int a, int b) -> int {
    return a + b;
}

object Counter : Base {
    int count;
    def bump() -> void {
        count += 1;
    }
}

def log(string message) -> void;

enum Color {
    Red,
    Green = 2
}

template <T> def id(T value) -> T {
    return value;
}
"###);
}

#[test]
fn test_statement_layout() {
    let program = parse_clean(
        r#"def main() -> void {
    if (a) x = 1; else { x = 2; }
    for (int i = 0, j = 10; i < j; i++) { }
    for (item, index in items) print(item);
    switch (x) { case (1) { y = 1; } case (default) { } }
    do x--; while (x > 0);
    try { risky(); } catch (Error e) { } catch { }
    throw("bad") { cleanup(); }
    lock self.state;
}
"#,
    );

    assert_snapshot!(print_program(&program), @r###"
def main() -> void {
    if (a)
        x = 1;
    else {
        x = 2;
    }
    for (int i = 0, j = 10; i < j; i++) {}
    for (item, index in items)
        print(item);
    switch (x) {
        case (1) {
            y = 1;
        }
        case (default) {}
    }
    do
        x--;
    while (x > 0);
    try {
        risky();
    } catch (Error e) {} catch {}
    throw ("bad") {
        cleanup();
    }
    lock self.state;
}
"###);
}

#[test]
fn test_declarators() {
    let program = parse_clean(
        "int* fp(int, int) = @add;\nPoint{} origin;\nPoint(1, 2){} corner;\nconst volatile List<int>* items, spare;\nunsigned data{16}[4] ports;\nsigned data{32} as i32;",
    );

    assert_snapshot!(print_program(&program), @r###"
int* fp(int, int) = @add;
Point{} origin;
Point(1, 2){} corner;
const volatile List<int>* items;
const volatile List<int>* spare;
data{16}[4] ports;
signed data{32} as i32;
"###);
}

#[test]
fn test_expressions_keep_their_shape() {
    assert_eq!(render_expr("x = (a + b) * c"), "x = (a + b) * c");
    assert_eq!(render_expr("a ** b ** c"), "a ** b ** c");
    assert_eq!(render_expr("-(-w)"), "-(-w)");
    assert_eq!(render_expr("!!c"), "!!c");
    assert_eq!(render_expr("- -w"), "- -w");
    assert_eq!(render_expr("(int*)@value"), "(int*)@value");
    assert_eq!(render_expr("f(1, [2, 3])[0].next"), "f(1, [2, 3])[0].next");
    assert_eq!(render_expr("a ? b : c ? d : e"), "a ? b : c ? d : e");
    assert_eq!(render_expr("x = y = \"tab\\tend\""), "x = y = \"tab\\tend\"");
    assert_eq!(render_expr("sizeof(int[4])"), "sizeof(int[4])");
}

#[test]
fn test_placeholders_are_visible() {
    let output = parse("x = ;");
    assert!(output.has_errors());
    assert_eq!(print_program(&output.program), "x = /* missing */;\n");

    let output = parse("def f() -> void { struct Inner { int x; } }");
    assert!(output.has_errors());
    assert_eq!(
        print_program(&output.program),
        "def f() -> void {\n    struct Inner {\n        int x;\n    }\n}\n"
    );
}

#[test]
fn test_statement_printer() {
    let program = parse_clean("def f() -> void { while (running) { step(); } }");
    let function = match &program.declarations[0].node {
        flux_syntax::Declaration::Function(function) => function,
        other => panic!("expected a function, got {:?}", other),
    };
    let body = function.body.as_ref().expect("function body");
    assert_eq!(
        Printer::new().print_statement(&body.statements[0]),
        "while (running) {\n    step();\n}"
    );
}

#[test]
fn test_round_trips() {
    let sources = [
        "def main() -> void { x = (a + b) * c; y = a - (b - c); z = - -w; }",
        "namespace outer { namespace inner { int depth = 2; } }",
        "class Shape : Base, !Hidden { int sides; }\nobject Widget : Shape { def draw() -> void { } }",
        "struct Pair { int first; int second; }\nstruct Opaque;",
        "operator(Vec a, Vec b)[+] -> Vec { return a; }",
        "template <K, V> object Map { K[] keys; V[] values; }",
        "type Size = unsigned data{64};\ndata{8} as byte;",
        "def f() -> void { s = i\"x={} y={}\":{x; y;}; t = {a: 1, b: [2, 3]}; }",
        "def f() -> void { p = (int*)@value; q = *p; r = op<a plus b>; n = sizeof(int) + typeof(q); }",
        "def f() -> void { throw; throw err; throw { cleanup(); } assert(ok); asm { nop } }",
        "def f() -> void { prelock queue { push(1); } postlock queue; }",
        "def f() -> void { for (;;) { break; } for (i = 0; i < n; i++) continue; }",
        "def f() -> void { if (a) if (b) x(); else y(); }",
        "def f() -> void { g = { int local = 1; }; }",
        "volatile auto counter = 0;\nvoid* raw;\ndef(int) -> int callback;",
        "asm { mov eax, 1 }\nx = 'q';\ny = 0b1011;\nz = 2.5;",
    ];

    for source in sources {
        assert_round_trip(source);
    }
}
