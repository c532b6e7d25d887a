//! Expression rendering with precedence-aware parenthesization

use super::utils::escape;
use super::Printer;
use crate::ast::*;

const ASSIGNMENT: u8 = 1;
const TERNARY: u8 = 2;
const BINARY_BASE: u8 = 3;
const UNARY: u8 = 15;
const POSTFIX: u8 = 16;
const CALL: u8 = 17;
const PRIMARY: u8 = 18;

/// Binding strength of an expression's outermost operator
fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Assign(_) => ASSIGNMENT,
        Expr::Ternary(_) => TERNARY,
        Expr::Binary(binary) => BINARY_BASE + binary.op.precedence(),
        Expr::Unary(unary) if unary.prefix => UNARY,
        Expr::Cast(_) => UNARY,
        Expr::Unary(_) => POSTFIX,
        Expr::Call(_) | Expr::Member(_) | Expr::Subscript(_) => CALL,
        _ => PRIMARY,
    }
}

/// Whether a prefix operator written directly before `operand` would lex as
/// a different token, as `- -x` would become `--x`
fn tokens_merge(symbol: &str, operand: &str) -> bool {
    matches!(
        (symbol.chars().last(), operand.chars().next()),
        (Some('-'), Some('-')) | (Some('+'), Some('+'))
    )
}

fn write_literal(output: &mut String, literal: &Literal) {
    match literal {
        Literal::Int(value) => output.push_str(&value.to_string()),
        Literal::Float(value) => output.push_str(&format!("{:?}", value)),
        Literal::Bool(value) => output.push_str(if *value { "true" } else { "false" }),
        Literal::Char(ch) => {
            output.push('\'');
            output.push_str(&escape(&ch.to_string(), '\''));
            output.push('\'');
        }
        Literal::String(text) => {
            output.push('"');
            output.push_str(&escape(text, '"'));
            output.push('"');
        }
        Literal::BitData(digits) => {
            output.push_str("0b");
            output.push_str(digits);
        }
    }
}

impl Printer {
    pub(super) fn write_expression(&mut self, expr: &LocatedExpr) {
        match &expr.node {
            Expr::Literal(literal) => write_literal(&mut self.output, literal),
            Expr::Identifier(name) => self.output.push_str(name),
            Expr::Unary(unary) if unary.prefix => {
                self.output.push_str(unary.op.symbol());
                let operand = self.render(&unary.operand, UNARY);
                if tokens_merge(unary.op.symbol(), &operand) {
                    self.output.push(' ');
                }
                self.output.push_str(&operand);
            }
            Expr::Unary(unary) => {
                self.write_operand(&unary.operand, POSTFIX);
                self.output.push_str(unary.op.symbol());
            }
            Expr::Binary(binary) => {
                let own = BINARY_BASE + binary.op.precedence();
                let (left_min, right_min) = if binary.op.is_right_associative() {
                    (own + 1, own)
                } else {
                    (own, own + 1)
                };
                self.write_operand(&binary.left, left_min);
                self.output.push(' ');
                self.output.push_str(binary.op.symbol());
                self.output.push(' ');
                self.write_operand(&binary.right, right_min);
            }
            Expr::Assign(assign) => {
                self.write_operand(&assign.target, TERNARY);
                self.output.push(' ');
                self.output.push_str(assign.op.symbol());
                self.output.push(' ');
                self.write_operand(&assign.value, ASSIGNMENT);
            }
            Expr::Ternary(ternary) => {
                self.write_operand(&ternary.condition, BINARY_BASE + 1);
                self.output.push_str(" ? ");
                self.write_operand(&ternary.then_expr, ASSIGNMENT);
                self.output.push_str(" : ");
                self.write_operand(&ternary.else_expr, TERNARY);
            }
            Expr::Call(call) => {
                self.write_operand(&call.callee, CALL);
                self.output.push('(');
                self.write_separated(&call.args, Self::write_expression);
                self.output.push(')');
            }
            Expr::Member(member) => {
                self.write_operand(&member.object, CALL);
                self.output.push('.');
                self.output.push_str(&member.member);
            }
            Expr::Subscript(subscript) => {
                self.write_operand(&subscript.object, CALL);
                self.output.push('[');
                self.write_expression(&subscript.index);
                self.output.push(']');
            }
            Expr::Cast(cast) => {
                self.output.push('(');
                self.write_type(&cast.target_type);
                self.output.push(')');
                self.write_operand(&cast.operand, UNARY);
            }
            Expr::SizeOf(ty) => {
                self.output.push_str("sizeof(");
                self.write_type(ty);
                self.output.push(')');
            }
            Expr::TypeOf(inner) => {
                self.output.push_str("typeof(");
                self.write_expression(inner);
                self.output.push(')');
            }
            Expr::Op(op) => {
                self.output.push_str("op<");
                self.write_operand(&op.left, UNARY);
                self.output.push(' ');
                self.output.push_str(&op.operator_name);
                self.output.push(' ');
                self.write_operand(&op.right, UNARY);
                self.output.push('>');
            }
            Expr::InterpolatedString(interpolated) => self.write_interpolated(interpolated),
            Expr::Array(elements) => {
                self.output.push('[');
                self.write_separated(elements, Self::write_expression);
                self.output.push(']');
            }
            Expr::Dictionary(entries) => {
                self.output.push('{');
                self.write_separated(entries, |printer, entry| {
                    printer.write_expression(&entry.key);
                    printer.output.push_str(": ");
                    printer.write_expression(&entry.value);
                });
                self.output.push('}');
            }
            Expr::Group(inner) => {
                self.output.push('(');
                self.write_expression(inner);
                self.output.push(')');
            }
            Expr::AnonymousBlock(statements) => self.write_statement_list(statements),
            Expr::Placeholder => self.output.push_str("/* missing */"),
        }
    }

    /// Write `expr`, parenthesized when it binds looser than `min_precedence`
    fn write_operand(&mut self, expr: &LocatedExpr, min_precedence: u8) {
        if precedence(&expr.node) < min_precedence {
            self.output.push('(');
            self.write_expression(expr);
            self.output.push(')');
        } else {
            self.write_expression(expr);
        }
    }

    /// Render an operand on its own, for lookahead on its first character
    fn render(&mut self, expr: &LocatedExpr, min_precedence: u8) -> String {
        let saved = std::mem::take(&mut self.output);
        self.write_operand(expr, min_precedence);
        std::mem::replace(&mut self.output, saved)
    }

    /// `i"a{}b"` followed by `:{x; y;}` when there are values
    fn write_interpolated(&mut self, interpolated: &InterpolatedString) {
        self.output.push_str("i\"");
        let joined: Vec<String> = interpolated
            .literal_parts
            .iter()
            .map(|part| escape(part, '"'))
            .collect();
        self.output.push_str(&joined.join("{}"));
        self.output.push('"');

        if interpolated.expr_parts.is_empty() && interpolated.literal_parts.len() <= 1 {
            return;
        }
        self.output.push_str(":{");
        for (index, part) in interpolated.expr_parts.iter().enumerate() {
            if index > 0 {
                self.output.push(' ');
            }
            self.write_expression(part);
            self.output.push(';');
        }
        self.output.push('}');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Span;

    fn expr(node: Expr) -> LocatedExpr {
        Located::new(node, Span::default(), NodeId(0))
    }

    fn ident(name: &str) -> LocatedExpr {
        expr(Expr::Identifier(name.to_string()))
    }

    fn binary(op: BinaryOp, left: LocatedExpr, right: LocatedExpr) -> LocatedExpr {
        expr(Expr::Binary(BinaryExpr {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }))
    }

    #[test]
    fn test_parenthesizes_looser_operands() {
        let sum = binary(BinaryOp::Add, ident("a"), ident("b"));
        let product = binary(BinaryOp::Multiply, sum, ident("c"));
        assert_eq!(Printer::new().print_expression(&product), "(a + b) * c");
    }

    #[test]
    fn test_left_associative_chain_needs_no_parentheses() {
        let inner = binary(BinaryOp::Subtract, ident("a"), ident("b"));
        let outer = binary(BinaryOp::Subtract, inner, ident("c"));
        assert_eq!(Printer::new().print_expression(&outer), "a - b - c");

        let right = binary(BinaryOp::Subtract, ident("b"), ident("c"));
        let outer = binary(BinaryOp::Subtract, ident("a"), right);
        assert_eq!(Printer::new().print_expression(&outer), "a - (b - c)");
    }

    #[test]
    fn test_power_is_right_associative() {
        let right = binary(BinaryOp::Power, ident("b"), ident("c"));
        let outer = binary(BinaryOp::Power, ident("a"), right);
        assert_eq!(Printer::new().print_expression(&outer), "a ** b ** c");

        let left = binary(BinaryOp::Power, ident("a"), ident("b"));
        let outer = binary(BinaryOp::Power, left, ident("c"));
        assert_eq!(Printer::new().print_expression(&outer), "(a ** b) ** c");
    }

    fn prefix(op: UnaryOp, operand: LocatedExpr) -> LocatedExpr {
        expr(Expr::Unary(UnaryExpr {
            op,
            operand: Box::new(operand),
            prefix: true,
        }))
    }

    #[test]
    fn test_stacked_prefix_operators() {
        let print = |e: &LocatedExpr| Printer::new().print_expression(e);

        let negated = prefix(UnaryOp::Negate, prefix(UnaryOp::Negate, ident("x")));
        assert_eq!(print(&negated), "- -x");
        let decremented = prefix(UnaryOp::Decrement, prefix(UnaryOp::Negate, ident("x")));
        assert_eq!(print(&decremented), "-- -x");
        let plus = prefix(UnaryOp::Plus, prefix(UnaryOp::Increment, ident("x")));
        assert_eq!(print(&plus), "+ ++x");

        let not = prefix(UnaryOp::Not, prefix(UnaryOp::Not, ident("c")));
        assert_eq!(print(&not), "!!c");
        let deref = prefix(UnaryOp::Deref, prefix(UnaryOp::Deref, ident("p")));
        assert_eq!(print(&deref), "**p");
        let mixed = prefix(UnaryOp::BitNot, prefix(UnaryOp::Negate, ident("x")));
        assert_eq!(print(&mixed), "~-x");
    }

    #[test]
    fn test_string_literals_are_escaped() {
        let literal = expr(Expr::Literal(Literal::String("say \"hi\"\n".to_string())));
        assert_eq!(
            Printer::new().print_expression(&literal),
            r#""say \"hi\"\n""#
        );
    }
}
