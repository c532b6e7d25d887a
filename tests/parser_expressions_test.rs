//! Expression grammar: precedence, associativity and the primary forms

mod common;

use common::{parse, parse_body, parse_expr, render_expr};
use flux_syntax::{ErrorKind, Expr, Literal, LocatedExpr, Printer, Stmt, UnaryOp};

/// Fully parenthesized prefix form of an expression
fn shape(expr: &LocatedExpr) -> String {
    match &expr.node {
        Expr::Literal(Literal::Int(value)) => value.to_string(),
        Expr::Identifier(name) => name.clone(),
        Expr::Binary(binary) => format!(
            "({} {} {})",
            binary.op.symbol(),
            shape(&binary.left),
            shape(&binary.right)
        ),
        Expr::Unary(unary) if unary.prefix => {
            format!("({} {})", unary.op.symbol(), shape(&unary.operand))
        }
        Expr::Unary(unary) => format!("(post{} {})", unary.op.symbol(), shape(&unary.operand)),
        Expr::Assign(assign) => format!(
            "({} {} {})",
            assign.op.symbol(),
            shape(&assign.target),
            shape(&assign.value)
        ),
        Expr::Ternary(ternary) => format!(
            "(? {} {} {})",
            shape(&ternary.condition),
            shape(&ternary.then_expr),
            shape(&ternary.else_expr)
        ),
        Expr::Call(call) => {
            let args: Vec<String> = call.args.iter().map(shape).collect();
            format!("(call {} [{}])", shape(&call.callee), args.join(" "))
        }
        Expr::Member(member) => format!("(. {} {})", shape(&member.object), member.member),
        Expr::Subscript(subscript) => {
            format!("([] {} {})", shape(&subscript.object), shape(&subscript.index))
        }
        Expr::Cast(cast) => format!(
            "(cast {} {})",
            Printer::new().print_type(&cast.target_type),
            shape(&cast.operand)
        ),
        Expr::Group(inner) => format!("(group {})", shape(inner)),
        Expr::Placeholder => "?".to_string(),
        _ => Printer::new().print_expression(expr),
    }
}

fn shape_of(source: &str) -> String {
    shape(&parse_expr(source))
}

#[test]
fn test_multiplicative_binds_tighter_than_additive() {
    assert_eq!(shape_of("a + b * c"), "(+ a (* b c))");
    assert_eq!(shape_of("a * b + c"), "(+ (* a b) c)");
}

#[test]
fn test_full_precedence_ladder() {
    assert_eq!(
        shape_of("a || b && c | d ^ e & f == g < h << i + j * k ** l"),
        "(|| a (&& b (| c (^ d (& e (== f (< g (<< h (+ i (* j (** k l)))))))))))"
    );
}

#[test]
fn test_left_associative_operators() {
    assert_eq!(shape_of("a - b - c"), "(- (- a b) c)");
    assert_eq!(shape_of("a / b * c"), "(* (/ a b) c)");
    assert_eq!(shape_of("a << b >> c"), "(>> (<< a b) c)");
}

#[test]
fn test_power_is_right_associative() {
    assert_eq!(shape_of("a ** b ** c"), "(** a (** b c))");
    assert_eq!(shape_of("-a ** 2"), "(** (- a) 2)");
}

#[test]
fn test_assignment_and_ternary_are_right_associative() {
    assert_eq!(shape_of("a = b = c"), "(= a (= b c))");
    assert_eq!(shape_of("x += y * 2"), "(+= x (* y 2))");
    assert_eq!(shape_of("a ? b : c ? d : e"), "(? a b (? c d e))");
}

#[test]
fn test_unary_and_postfix() {
    assert_eq!(shape_of("!a && b"), "(&& (! a) b)");
    assert_eq!(shape_of("i++ + 1"), "(+ (post++ i) 1)");
    assert_eq!(shape_of("@value"), "(@ value)");
    assert_eq!(shape_of("&value"), "(@ value)");
    assert_eq!(shape_of("~mask"), "(~ mask)");
}

#[test]
fn test_double_star_prefix_is_two_dereferences() {
    let expr = parse_expr("**pp");
    let Expr::Unary(outer) = &expr.node else {
        panic!("expected a dereference, got {:?}", expr.node);
    };
    assert_eq!(outer.op, UnaryOp::Deref);
    let Expr::Unary(inner) = &outer.operand.node else {
        panic!("expected a nested dereference");
    };
    assert_eq!(inner.op, UnaryOp::Deref);
    assert!(outer.operand.span.start >= expr.span.start);
}

#[test]
fn test_call_member_subscript_chain() {
    assert_eq!(
        shape_of("obj.items[i].get(1, 2)"),
        "(call (. ([] (. obj items) i) get) [1 2])"
    );
}

#[test]
fn test_casts() {
    assert_eq!(shape_of("(Foo) x"), "(cast Foo x)");
    assert_eq!(shape_of("(int*) @x"), "(cast int* (@ x))");
    assert_eq!(shape_of("(data{8}) -x"), "(cast data{8} (- x))");
    assert_eq!(shape_of("(int[4]) x"), "(cast int[4] x)");
}

#[test]
fn test_parenthesized_subscript_is_a_group() {
    assert_eq!(shape_of("(a[(b[0])])"), "(group ([] a (group ([] b 0))))");
}

#[test]
fn test_parenthesized_name_is_a_group_when_no_operand_follows() {
    assert_eq!(shape_of("(a) + b"), "(+ (group a) b)");
    assert_eq!(shape_of("(a * b)"), "(group (* a b))");
    assert_eq!(shape_of("(f)(x)"), "(call (group f) [x])");
}

#[test]
fn test_sizeof_typeof_and_op() {
    assert_eq!(render_expr("sizeof(unsigned data{32})"), "sizeof(data{32})");
    assert_eq!(render_expr("sizeof(signed data{16}[4])"), "sizeof(signed data{16}[4])");
    assert_eq!(render_expr("typeof(a + b)"), "typeof(a + b)");
    assert_eq!(render_expr("op<a plus b>"), "op<a plus b>");
    assert_eq!(render_expr("op<op<a plus b> times c>"), "op<op<a plus b> times c>");
}

#[test]
fn test_literals() {
    let expr = parse_expr("0x1F");
    assert_eq!(expr.node, Expr::Literal(Literal::Int(31)));

    let expr = parse_expr("0b1010");
    assert_eq!(expr.node, Expr::Literal(Literal::BitData("1010".to_string())));

    let expr = parse_expr("2.5e-3");
    assert_eq!(expr.node, Expr::Literal(Literal::Float(2.5e-3)));

    let expr = parse_expr("'\\n'");
    assert_eq!(expr.node, Expr::Literal(Literal::Char('\n')));

    let expr = parse_expr("true");
    assert_eq!(expr.node, Expr::Literal(Literal::Bool(true)));
}

#[test]
fn test_array_dictionary_and_anonymous_block() {
    assert!(matches!(parse_expr("[1, 2, 3]").node, Expr::Array(ref items) if items.len() == 3));
    assert!(matches!(parse_expr("x = {}").node, Expr::Assign(_)));

    let statements = parse_body("d = {\"a\": 1, \"b\": 2};\nb = { f(); g(); };");
    let Stmt::Expression(first) = &statements[0].node else {
        panic!("expected an expression statement");
    };
    let Expr::Assign(assign) = &first.node else {
        panic!("expected an assignment");
    };
    assert!(matches!(assign.value.node, Expr::Dictionary(ref entries) if entries.len() == 2));

    let Stmt::Expression(second) = &statements[1].node else {
        panic!("expected an expression statement");
    };
    let Expr::Assign(assign) = &second.node else {
        panic!("expected an assignment");
    };
    assert!(matches!(assign.value.node, Expr::AnonymousBlock(ref body) if body.len() == 2));
}

#[test]
fn test_interpolated_string() {
    let expr = parse_expr("i\"{} + {} = {}\":{a; b; a + b;}");
    let Expr::InterpolatedString(interpolated) = &expr.node else {
        panic!("expected an interpolated string");
    };
    assert_eq!(interpolated.literal_parts, vec!["", " + ", " = ", ""]);
    assert_eq!(interpolated.expr_parts.len(), 3);
}

#[test]
fn test_interpolation_count_mismatch_is_reported() {
    let output = parse("def main() -> void { s = i\"{} and {}\":{a;}; }");
    assert_eq!(
        common::error_kinds(&output),
        vec![ErrorKind::InterpolationMismatch]
    );
}

#[test]
fn test_invalid_assignment_target_keeps_the_node() {
    let output = parse("def main() -> void { 1 + 2 = 3; }");
    assert_eq!(
        common::error_kinds(&output),
        vec![ErrorKind::InvalidAssignmentTarget]
    );
    let body = common::function_body(&output.program, "main");
    let Stmt::Expression(expr) = &body.statements[0].node else {
        panic!("expected an expression statement");
    };
    assert!(matches!(expr.node, Expr::Assign(_)));
}

#[test]
fn test_missing_operand_becomes_placeholder() {
    let output = parse("def main() -> void { x = a + ; }");
    assert_eq!(common::error_kinds(&output), vec![ErrorKind::ExpectedExpression]);
    let body = common::function_body(&output.program, "main");
    let Stmt::Expression(expr) = &body.statements[0].node else {
        panic!("expected an expression statement");
    };
    assert_eq!(shape(expr), "(= x (+ a ?))");
    common::assert_well_formed(&output.program);
}

#[test]
fn test_binary_span_covers_both_operands() {
    let expr = parse_expr("alpha + beta");
    let Expr::Binary(binary) = &expr.node else {
        panic!("expected a binary expression");
    };
    assert_eq!(expr.span.start, binary.left.span.start);
    assert_eq!(expr.span.end, binary.right.span.end);
}

#[test]
fn test_brace_contents_decide_dictionary_or_block() {
    let statements = parse_body(
        "a = { c ? 1 : 2; };\nb = { c ? 1 : 2 : 3 };\nd = { i\"{}\":{v;}: 1 };\ne = { sizeof(int): 4 };",
    );
    let values: Vec<&Expr> = statements
        .iter()
        .map(|stmt| match &stmt.node {
            Stmt::Expression(expr) => match &expr.node {
                Expr::Assign(assign) => &assign.value.node,
                other => panic!("expected an assignment, got {:?}", other),
            },
            other => panic!("expected an expression statement, got {:?}", other),
        })
        .collect();

    assert!(matches!(values[0], Expr::AnonymousBlock(body) if body.len() == 1));
    assert!(matches!(
        values[1],
        Expr::Dictionary(entries) if entries.len() == 1 && matches!(entries[0].key.node, Expr::Ternary(_))
    ));
    assert!(matches!(
        values[2],
        Expr::Dictionary(entries) if matches!(entries[0].key.node, Expr::InterpolatedString(_))
    ));
    assert!(matches!(values[3], Expr::Dictionary(entries) if entries.len() == 1));
}
