use super::visitor::{walk_declaration, walk_expression, walk_program, walk_statement, walk_type, Visitor};
use super::*;
use std::collections::HashSet;

/// Query API for common AST traversal patterns
pub struct AstQuery;

impl AstQuery {
    /// Names introduced by declarations, in source order, including nested
    /// namespace and class members
    pub fn declared_names(program: &Program) -> Vec<String> {
        struct Names(Vec<String>);

        impl Visitor for Names {
            fn visit_declaration(&mut self, decl: &LocatedDecl) {
                if let Some(name) = decl.node.name() {
                    self.0.push(name.to_string());
                }
                // Template names come from the inner declaration
                match &decl.node {
                    Declaration::Template(template) => walk_declaration(self, &template.inner),
                    _ => walk_declaration(self, decl),
                }
            }

            fn visit_statement(&mut self, _stmt: &LocatedStmt) {}
        }

        let mut names = Names(Vec::new());
        walk_program(&mut names, program);
        names.0
    }

    /// Check if an expression contains any function calls
    pub fn contains_calls(expr: &LocatedExpr) -> bool {
        Self::count_calls(expr) > 0
    }

    /// Count the number of function calls in an expression
    pub fn count_calls(expr: &LocatedExpr) -> usize {
        struct Calls(usize);

        impl Visitor for Calls {
            fn visit_expression(&mut self, expr: &LocatedExpr) {
                if matches!(expr.node, Expr::Call(_)) {
                    self.0 += 1;
                }
                walk_expression(self, expr);
            }
        }

        let mut calls = Calls(0);
        calls.visit_expression(expr);
        calls.0
    }

    /// Get all identifiers referenced in an expression
    pub fn collect_identifiers(expr: &LocatedExpr) -> HashSet<String> {
        struct Identifiers(HashSet<String>);

        impl Visitor for Identifiers {
            fn visit_expression(&mut self, expr: &LocatedExpr) {
                if let Expr::Identifier(name) = &expr.node {
                    self.0.insert(name.clone());
                }
                walk_expression(self, expr);
            }
        }

        let mut ids = Identifiers(HashSet::new());
        ids.visit_expression(expr);
        ids.0
    }

    /// Total number of declaration, statement, expression and type nodes
    pub fn count_nodes(program: &Program) -> usize {
        let mut counter = NodeCounter::default();
        walk_program(&mut counter, program);
        counter.count
    }

    /// Whether any part of the tree stands in for unparseable input
    pub fn contains_placeholder(program: &Program) -> bool {
        let mut counter = NodeCounter::default();
        walk_program(&mut counter, program);
        counter.placeholders > 0
    }

    /// First node id that occurs more than once, in traversal order
    pub fn duplicate_node_id(program: &Program) -> Option<NodeId> {
        let mut ids = IdCollector {
            seen: HashSet::new(),
            duplicate: None,
        };
        walk_program(&mut ids, program);
        ids.duplicate
    }

    /// First node whose span is not contained in its parent's span, as
    /// `(parent, child)`
    pub fn find_span_violation(program: &Program) -> Option<(Span, Span)> {
        let mut checker = SpanChecker {
            parents: vec![program.span],
            violation: None,
        };
        walk_program(&mut checker, program);
        checker.violation
    }
}

#[derive(Default)]
struct NodeCounter {
    count: usize,
    placeholders: usize,
}

impl Visitor for NodeCounter {
    fn visit_declaration(&mut self, decl: &LocatedDecl) {
        self.count += 1;
        walk_declaration(self, decl);
    }

    fn visit_statement(&mut self, stmt: &LocatedStmt) {
        self.count += 1;
        walk_statement(self, stmt);
    }

    fn visit_expression(&mut self, expr: &LocatedExpr) {
        self.count += 1;
        if expr.node.is_placeholder() {
            self.placeholders += 1;
        }
        walk_expression(self, expr);
    }

    fn visit_type(&mut self, ty: &LocatedType) {
        self.count += 1;
        if ty.node.is_placeholder() {
            self.placeholders += 1;
        }
        walk_type(self, ty);
    }
}

struct IdCollector {
    seen: HashSet<NodeId>,
    duplicate: Option<NodeId>,
}

impl IdCollector {
    fn record(&mut self, id: NodeId) {
        if !self.seen.insert(id) && self.duplicate.is_none() {
            self.duplicate = Some(id);
        }
    }
}

impl Visitor for IdCollector {
    fn visit_declaration(&mut self, decl: &LocatedDecl) {
        self.record(decl.id);
        walk_declaration(self, decl);
    }

    fn visit_statement(&mut self, stmt: &LocatedStmt) {
        self.record(stmt.id);
        walk_statement(self, stmt);
    }

    fn visit_expression(&mut self, expr: &LocatedExpr) {
        self.record(expr.id);
        walk_expression(self, expr);
    }

    fn visit_type(&mut self, ty: &LocatedType) {
        self.record(ty.id);
        walk_type(self, ty);
    }
}

struct SpanChecker {
    parents: Vec<Span>,
    violation: Option<(Span, Span)>,
}

impl SpanChecker {
    fn enter(&mut self, span: Span) {
        if self.violation.is_none() {
            if let Some(parent) = self.parents.last() {
                if !parent.contains(&span) {
                    self.violation = Some((*parent, span));
                }
            }
        }
        self.parents.push(span);
    }

    fn leave(&mut self) {
        self.parents.pop();
    }
}

impl Visitor for SpanChecker {
    fn visit_declaration(&mut self, decl: &LocatedDecl) {
        self.enter(decl.span);
        walk_declaration(self, decl);
        self.leave();
    }

    fn visit_statement(&mut self, stmt: &LocatedStmt) {
        self.enter(stmt.span);
        walk_statement(self, stmt);
        self.leave();
    }

    fn visit_expression(&mut self, expr: &LocatedExpr) {
        self.enter(expr.span);
        walk_expression(self, expr);
        self.leave();
    }

    fn visit_type(&mut self, ty: &LocatedType) {
        self.enter(ty.span);
        walk_type(self, ty);
        self.leave();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceLocation;

    fn span(start: usize, end: usize) -> Span {
        Span::new(
            SourceLocation::new(1, start + 1, start),
            SourceLocation::new(1, end + 1, end),
        )
    }

    fn located<T>(node: T, start: usize, end: usize) -> Located<T> {
        Located::new(node, span(start, end), NodeId(start as u32))
    }

    fn ident(name: &str, start: usize) -> LocatedExpr {
        located(Expr::Identifier(name.to_string()), start, start + name.len())
    }

    #[test]
    fn test_count_calls_and_identifiers() {
        // f(x) + g(h(y))
        let inner = located(
            Expr::Call(CallExpr {
                callee: Box::new(ident("h", 9)),
                args: vec![ident("y", 11)],
            }),
            9,
            13,
        );
        let right = located(
            Expr::Call(CallExpr {
                callee: Box::new(ident("g", 7)),
                args: vec![inner],
            }),
            7,
            14,
        );
        let left = located(
            Expr::Call(CallExpr {
                callee: Box::new(ident("f", 0)),
                args: vec![ident("x", 2)],
            }),
            0,
            4,
        );
        let sum = located(
            Expr::Binary(BinaryExpr {
                op: BinaryOp::Add,
                left: Box::new(left),
                right: Box::new(right),
            }),
            0,
            14,
        );

        assert_eq!(AstQuery::count_calls(&sum), 3);
        assert!(AstQuery::contains_calls(&sum));
        let ids = AstQuery::collect_identifiers(&sum);
        assert_eq!(ids.len(), 5);
        assert!(ids.contains("h"));
        assert!(!AstQuery::contains_calls(&ident("z", 0)));
    }

    #[test]
    fn test_span_violation_is_reported() {
        let stmt = located(Stmt::Expression(ident("abc", 10)), 0, 5);
        let decl = located(Declaration::Statement(Box::new(stmt)), 0, 5);
        let program = Program::new(vec![decl], span(0, 20));
        let (parent, child) = AstQuery::find_span_violation(&program).unwrap();
        assert_eq!(parent, span(0, 5));
        assert_eq!(child, span(10, 13));
    }
}
