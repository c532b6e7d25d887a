//! Statement parsing

use super::{ParseContext, Parser};
use crate::ast::*;
use crate::error::{ErrorKind, Span};
use crate::lexer::{LiteralValue, TokenKind};
use nonempty::NonEmpty;

impl Parser {
    /// A single statement, as used for `if`/`while`/`for` bodies. Several
    /// declarators in one declaration are grouped into a block.
    pub(super) fn parse_statement(&mut self, ctx: ParseContext) -> LocatedStmt {
        let start = self.start_location();
        if !self.descend() {
            let span = self.span_from(start);
            return self.placeholder_statement(span);
        }

        let mut items = self.parse_block_item(ctx);
        let stmt = if items.len() == 1 {
            items.remove(0)
        } else {
            let span = self.span_from(start);
            let block = Block::new(items, span);
            self.node_with_span(Stmt::Block(block), span)
        };

        self.ascend();
        stmt
    }

    /// Everything that may appear inside a block: keyword statements, nested
    /// blocks, local declarations and expression statements
    pub(super) fn parse_block_item(&mut self, ctx: ParseContext) -> Vec<LocatedStmt> {
        if let Some(stmt) = self.parse_keyword_statement(ctx) {
            return vec![stmt];
        }

        if let Some(decls) = self.parse_declaration(ctx) {
            return self.declarations_to_statements(decls);
        }

        vec![self.parse_expression_statement()]
    }

    /// Statement that is not a declaration, used where declarations were
    /// already tried
    pub(super) fn parse_non_declaration_statement(&mut self, ctx: ParseContext) -> LocatedStmt {
        match self.parse_keyword_statement(ctx) {
            Some(stmt) => stmt,
            None => self.parse_expression_statement(),
        }
    }

    /// Variables become local declarations; anything else is reported as
    /// misplaced and kept as a `Misplaced` statement
    fn declarations_to_statements(&mut self, decls: NonEmpty<LocatedDecl>) -> Vec<LocatedStmt> {
        let mut statements = Vec::new();
        for decl in decls {
            let Located { node, span, id } = decl;
            match node {
                Declaration::Variable(var) => {
                    statements.push(Located::new(Stmt::VarDecl(var), span, id));
                }
                other => {
                    let what = match other.name() {
                        Some(name) => format!("Declaration of '{}' is not allowed inside a function body", name),
                        None => "Declaration is not allowed inside a function body".to_string(),
                    };
                    self.report_structural(ErrorKind::MisplacedDeclaration, what, span);
                    let decl = Located::new(other, span, id);
                    statements.push(self.node_with_span(Stmt::Misplaced(Box::new(decl)), span));
                }
            }
        }
        statements
    }

    fn placeholder_statement(&mut self, span: Span) -> LocatedStmt {
        let expr = self.node_with_span(Expr::Placeholder, span);
        self.node_with_span(Stmt::Expression(expr), span)
    }

    fn parse_keyword_statement(&mut self, ctx: ParseContext) -> Option<LocatedStmt> {
        let stmt = match self.peek().kind {
            TokenKind::If => self.parse_if_statement(ctx),
            TokenKind::While => self.parse_while_statement(ctx),
            TokenKind::Do => self.parse_do_while_statement(ctx),
            TokenKind::For => self.parse_for_statement(ctx),
            TokenKind::Switch => self.parse_switch_statement(ctx),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::Break | TokenKind::Continue => self.parse_jump_statement(ctx),
            TokenKind::Try => self.parse_try_statement(ctx),
            TokenKind::Throw => self.parse_throw_statement(ctx),
            TokenKind::Assert => self.parse_assert_statement(),
            TokenKind::Asm => {
                let start = self.start_location();
                let raw = self.parse_asm_body();
                self.node(Stmt::Asm(raw), start)
            }
            TokenKind::Lock | TokenKind::PreLock | TokenKind::PostLock => {
                self.parse_lock_statement(ctx)
            }
            TokenKind::LeftBrace => {
                let block = self.parse_block(ctx);
                let span = block.span;
                self.node_with_span(Stmt::Block(block), span)
            }
            _ => return None,
        };
        Some(stmt)
    }

    /// `{ statements }`
    pub(super) fn parse_block(&mut self, ctx: ParseContext) -> Block {
        let start = self.start_location();
        if !self.check(TokenKind::LeftBrace) {
            // Leave the tokens to the enclosing body
            self.error_at_current("Expected '{'");
            let span = self.empty_span();
            return Block::new(Vec::new(), span);
        }
        self.advance();
        if !self.descend() {
            let span = self.span_from(start);
            return Block::new(Vec::new(), span);
        }

        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            if self.match_token(TokenKind::Semicolon) {
                continue;
            }

            let before = self.current;
            let items = self.parse_block_item(ctx);
            statements.extend(items);
            self.recover_after_item(before);
        }

        self.ascend();
        self.consume(TokenKind::RightBrace, "Expected '}' after block");
        Block::new(statements, self.span_from(start))
    }

    fn parse_expression_statement(&mut self) -> LocatedStmt {
        let start = self.start_location();
        let expr = self.parse_expression();
        self.expect_semicolon("expression");
        self.node(Stmt::Expression(expr), start)
    }

    /// `( expression )` as used by `if`, `while` and `switch`
    fn parse_condition(&mut self, keyword: &str) -> LocatedExpr {
        self.consume(TokenKind::LeftParen, &format!("Expected '(' after '{}'", keyword));
        let condition = self.parse_expression();
        self.consume(TokenKind::RightParen, "Expected ')' after condition");
        condition
    }

    fn parse_if_statement(&mut self, ctx: ParseContext) -> LocatedStmt {
        let start = self.start_location();
        self.advance();

        let condition = self.parse_condition("if");
        let then_branch = Box::new(self.parse_statement(ctx));
        let else_branch = if self.match_token(TokenKind::Else) {
            Some(Box::new(self.parse_statement(ctx)))
        } else {
            None
        };

        self.node(
            Stmt::If(IfStmt {
                condition,
                then_branch,
                else_branch,
            }),
            start,
        )
    }

    fn parse_while_statement(&mut self, ctx: ParseContext) -> LocatedStmt {
        let start = self.start_location();
        self.advance();

        let condition = self.parse_condition("while");
        let body = Box::new(self.parse_statement(ctx.looping()));
        self.node(Stmt::While(WhileStmt { condition, body }), start)
    }

    fn parse_do_while_statement(&mut self, ctx: ParseContext) -> LocatedStmt {
        let start = self.start_location();
        self.advance();

        let body = Box::new(self.parse_statement(ctx.looping()));
        self.consume(TokenKind::While, "Expected 'while' after 'do' body");
        let condition = self.parse_condition("while");
        self.expect_semicolon("do-while loop");
        self.node(Stmt::DoWhile(DoWhileStmt { body, condition }), start)
    }

    fn parse_for_statement(&mut self, ctx: ParseContext) -> LocatedStmt {
        let start = self.start_location();
        self.advance();
        self.consume(TokenKind::LeftParen, "Expected '(' after 'for'");

        if let Some((variable, index_variable)) = self.try_parse_range_header() {
            let range = self.parse_expression();
            self.consume(TokenKind::RightParen, "Expected ')' after range expression");
            let body = Box::new(self.parse_statement(ctx.looping()));
            return self.node(
                Stmt::ForRange(ForRangeStmt {
                    variable,
                    index_variable,
                    range,
                    body,
                }),
                start,
            );
        }

        let init = if self.match_token(TokenKind::Semicolon) {
            Vec::new()
        } else {
            match self.parse_declaration(ctx) {
                Some(decls) => self.declarations_to_statements(decls),
                None => vec![self.parse_expression_statement()],
            }
        };

        let condition = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression())
        };
        self.consume(TokenKind::Semicolon, "Expected ';' after loop condition");

        let increment = if self.check(TokenKind::RightParen) {
            None
        } else {
            Some(self.parse_expression())
        };
        self.consume(TokenKind::RightParen, "Expected ')' after for clauses");

        let body = Box::new(self.parse_statement(ctx.looping()));
        self.node(
            Stmt::For(ForStmt {
                init,
                condition,
                increment,
                body,
            }),
            start,
        )
    }

    /// `name [, index] in`, or `None` after rewinding
    fn try_parse_range_header(&mut self) -> Option<(String, Option<String>)> {
        let checkpoint = self.checkpoint();

        if !self.check(TokenKind::Identifier) {
            return None;
        }
        let variable = self.advance().lexeme.clone();
        let index_variable = if self.check(TokenKind::Comma)
            && self.peek_at(1).kind == TokenKind::Identifier
        {
            self.advance();
            Some(self.advance().lexeme.clone())
        } else {
            None
        };

        if !self.match_token(TokenKind::In) {
            self.rewind(checkpoint);
            return None;
        }
        self.commit(&checkpoint, "range loop header");
        Some((variable, index_variable))
    }

    fn parse_switch_statement(&mut self, ctx: ParseContext) -> LocatedStmt {
        let start = self.start_location();
        self.advance();

        let subject = self.parse_condition("switch");
        self.consume(TokenKind::LeftBrace, "Expected '{' after switch subject");

        let mut cases: Vec<SwitchCase> = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            let before = self.current;
            if self.check(TokenKind::Case) {
                let case = self.parse_switch_case(ctx.switching());
                if case.is_default && cases.iter().any(|existing| existing.is_default) {
                    self.report_structural(
                        ErrorKind::DuplicateDefaultCase,
                        "Switch statement has more than one default case",
                        case.span,
                    );
                }
                cases.push(case);
            } else {
                self.error_at_current("Expected 'case' in switch body");
            }
            self.recover_after_item(before);
        }

        self.consume(TokenKind::RightBrace, "Expected '}' after switch cases");
        let stmt = self.node(Stmt::Switch(SwitchStmt { subject, cases }), start);

        if let Stmt::Switch(switch) = &stmt.node {
            if !switch.cases.iter().any(|case| case.is_default) {
                self.report_structural(
                    ErrorKind::MissingDefaultCase,
                    "Switch statement has no 'case (default)'",
                    stmt.span,
                );
            }
        }
        stmt
    }

    /// `case (pattern) { ... } [;]` or `case (default) { ... } [;]`
    fn parse_switch_case(&mut self, ctx: ParseContext) -> SwitchCase {
        let start = self.start_location();
        self.advance();
        self.consume(TokenKind::LeftParen, "Expected '(' after 'case'");

        let (pattern, is_default) = if self.match_token(TokenKind::Default) {
            (None, true)
        } else {
            (Some(self.parse_expression()), false)
        };
        self.consume(TokenKind::RightParen, "Expected ')' after case pattern");

        let body = self.parse_block(ctx);
        self.match_token(TokenKind::Semicolon);

        SwitchCase {
            pattern,
            body,
            is_default,
            span: self.span_from(start),
        }
    }

    fn parse_return_statement(&mut self) -> LocatedStmt {
        let start = self.start_location();
        self.advance();

        let value = if self.check_any(&[TokenKind::Semicolon, TokenKind::RightBrace]) {
            None
        } else {
            Some(self.parse_expression())
        };
        self.expect_semicolon("return value");
        self.node(Stmt::Return(value), start)
    }

    /// `break;` and `continue;`, kept in the tree even when misplaced
    fn parse_jump_statement(&mut self, ctx: ParseContext) -> LocatedStmt {
        let start = self.start_location();
        let is_break = self.advance().kind == TokenKind::Break;
        let keyword = if is_break { "break" } else { "continue" };
        self.expect_semicolon(&format!("'{}'", keyword));

        let stmt = self.node(if is_break { Stmt::Break } else { Stmt::Continue }, start);
        let allowed = if is_break {
            ctx.in_loop || ctx.in_switch
        } else {
            ctx.in_loop
        };
        if !allowed {
            let message = if is_break {
                "'break' outside of a loop or switch"
            } else {
                "'continue' outside of a loop"
            };
            self.report_structural(ErrorKind::MisplacedJump, message, stmt.span);
        }
        stmt
    }

    /// `try { } catch (Type name) { } catch { }`
    fn parse_try_statement(&mut self, ctx: ParseContext) -> LocatedStmt {
        let start = self.start_location();
        self.advance();

        let body = self.parse_block(ctx);
        let mut catches = Vec::new();
        while self.check(TokenKind::Catch) {
            let catch_start = self.start_location();
            self.advance();

            let (exception_type, binding) = if self.match_token(TokenKind::LeftParen) {
                let exception_type = self.parse_type();
                let binding = if self.check(TokenKind::Identifier) {
                    Some(self.advance().lexeme.clone())
                } else {
                    None
                };
                self.consume(TokenKind::RightParen, "Expected ')' after catch parameter");
                (Some(exception_type), binding)
            } else {
                (None, None)
            };

            let handler = self.parse_block(ctx);
            catches.push(CatchClause {
                exception_type,
                binding,
                handler,
                span: self.span_from(catch_start),
            });
        }

        if catches.is_empty() {
            self.error_at_current("Expected 'catch' after try block");
        }

        self.node(Stmt::Try(TryStmt { body, catches }), start)
    }

    /// `throw;`, `throw e;`, `throw(e) { ... }` or `throw { ... }`
    fn parse_throw_statement(&mut self, ctx: ParseContext) -> LocatedStmt {
        let start = self.start_location();
        self.advance();

        if self.match_token(TokenKind::Semicolon) {
            return self.node(
                Stmt::Throw(ThrowStmt {
                    message: None,
                    body: None,
                }),
                start,
            );
        }

        if self.check(TokenKind::LeftBrace) {
            let body = self.parse_block(ctx);
            self.match_token(TokenKind::Semicolon);
            return self.node(
                Stmt::Throw(ThrowStmt {
                    message: None,
                    body: Some(body),
                }),
                start,
            );
        }

        let message = self.parse_expression();
        if self.check(TokenKind::LeftBrace) {
            let message = match message.node {
                Expr::Group(inner) => *inner,
                other => Located::new(other, message.span, message.id),
            };
            let body = self.parse_block(ctx);
            self.match_token(TokenKind::Semicolon);
            return self.node(
                Stmt::Throw(ThrowStmt {
                    message: Some(message),
                    body: Some(body),
                }),
                start,
            );
        }

        self.expect_semicolon("thrown value");
        self.node(
            Stmt::Throw(ThrowStmt {
                message: Some(message),
                body: None,
            }),
            start,
        )
    }

    fn parse_assert_statement(&mut self) -> LocatedStmt {
        let start = self.start_location();
        self.advance();

        self.consume(TokenKind::LeftParen, "Expected '(' after 'assert'");
        let condition = self.parse_expression();
        self.consume(TokenKind::RightParen, "Expected ')' after assertion");
        self.expect_semicolon("assertion");
        self.node(Stmt::Assert(condition), start)
    }

    /// `asm { raw }` or `asm "raw";`, returning the raw text
    pub(super) fn parse_asm_body(&mut self) -> String {
        self.advance();

        match self.peek().kind {
            TokenKind::AsmBlock => {
                let raw = match &self.advance().literal {
                    Some(LiteralValue::String(raw)) => raw.clone(),
                    _ => String::new(),
                };
                self.match_token(TokenKind::Semicolon);
                raw
            }
            TokenKind::StringLiteral => {
                let raw = match &self.advance().literal {
                    Some(LiteralValue::String(raw)) => raw.clone(),
                    _ => String::new(),
                };
                self.expect_semicolon("asm string");
                raw
            }
            _ => {
                self.error_at_current("Expected '{' or string after 'asm'");
                String::new()
            }
        }
    }

    /// `lock a.b;` or `lock a.b { ... }`, likewise `prelock` and `postlock`
    fn parse_lock_statement(&mut self, ctx: ParseContext) -> LocatedStmt {
        let start = self.start_location();
        let kind = match self.advance().kind {
            TokenKind::PreLock => LockKind::PreLock,
            TokenKind::PostLock => LockKind::PostLock,
            _ => LockKind::Lock,
        };

        let scope_path = self.parse_qualified_name("Expected lock scope");
        let body = if self.check(TokenKind::LeftBrace) {
            let body = self.parse_block(ctx);
            self.match_token(TokenKind::Semicolon);
            Some(body)
        } else {
            self.expect_semicolon("lock scope");
            None
        };

        self.node(
            Stmt::Lock(LockStmt {
                kind,
                scope_path,
                body,
            }),
            start,
        )
    }
}
