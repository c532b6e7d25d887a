//! Expression parsing: assignment, ternary, one method per binary
//! precedence level, unary/postfix operators, call chains and primaries

use super::error::describe_token;
use super::{ParseContext, Parser};
use crate::ast::*;
use crate::error::ErrorKind;
use crate::lexer::{LiteralValue, TokenKind};

fn assignment_operator(kind: TokenKind) -> Option<AssignOp> {
    let op = match kind {
        TokenKind::Equal => AssignOp::Assign,
        TokenKind::PlusEqual => AssignOp::Add,
        TokenKind::MinusEqual => AssignOp::Subtract,
        TokenKind::StarEqual => AssignOp::Multiply,
        TokenKind::SlashEqual => AssignOp::Divide,
        TokenKind::PercentEqual => AssignOp::Modulo,
        TokenKind::AmpEqual => AssignOp::BitAnd,
        TokenKind::PipeEqual => AssignOp::BitOr,
        TokenKind::CaretEqual => AssignOp::BitXor,
        TokenKind::ShlEqual => AssignOp::Shl,
        TokenKind::ShrEqual => AssignOp::Shr,
        TokenKind::StarStarEqual => AssignOp::Power,
        _ => return None,
    };
    Some(op)
}

fn binary_operator(kind: TokenKind) -> Option<BinaryOp> {
    let op = match kind {
        TokenKind::PipePipe => BinaryOp::Or,
        TokenKind::AmpAmp => BinaryOp::And,
        TokenKind::Pipe => BinaryOp::BitOr,
        TokenKind::Caret => BinaryOp::BitXor,
        TokenKind::Amp => BinaryOp::BitAnd,
        TokenKind::EqualEqual => BinaryOp::Equal,
        TokenKind::NotEqual => BinaryOp::NotEqual,
        TokenKind::Is => BinaryOp::Is,
        TokenKind::Less => BinaryOp::Less,
        TokenKind::LessEqual => BinaryOp::LessEqual,
        TokenKind::Greater => BinaryOp::Greater,
        TokenKind::GreaterEqual => BinaryOp::GreaterEqual,
        TokenKind::Shl => BinaryOp::Shl,
        TokenKind::Shr => BinaryOp::Shr,
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Subtract,
        TokenKind::Star => BinaryOp::Multiply,
        TokenKind::Slash => BinaryOp::Divide,
        TokenKind::Percent => BinaryOp::Modulo,
        TokenKind::StarStar => BinaryOp::Power,
        _ => return None,
    };
    Some(op)
}

fn prefix_operator(kind: TokenKind) -> Option<UnaryOp> {
    let op = match kind {
        TokenKind::Bang => UnaryOp::Not,
        TokenKind::Minus => UnaryOp::Negate,
        TokenKind::Plus => UnaryOp::Plus,
        TokenKind::Tilde => UnaryOp::BitNot,
        TokenKind::PlusPlus => UnaryOp::Increment,
        TokenKind::MinusMinus => UnaryOp::Decrement,
        TokenKind::Star => UnaryOp::Deref,
        TokenKind::At | TokenKind::Amp => UnaryOp::AddressOf,
        _ => return None,
    };
    Some(op)
}

/// A bare name in parentheses is only a cast when an operand follows that
/// cannot continue an expression
fn starts_cast_operand(target_type: &Type, next: TokenKind) -> bool {
    match target_type {
        Type::Named(_) | Type::Qualified(_) => {
            next == TokenKind::Identifier || next == TokenKind::At || is_literal(next)
        }
        _ => {
            matches!(
                next,
                TokenKind::Identifier | TokenKind::LeftParen | TokenKind::StarStar
            ) || is_literal(next)
                || prefix_operator(next).is_some()
        }
    }
}

fn is_literal(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::IntLiteral
            | TokenKind::FloatLiteral
            | TokenKind::CharLiteral
            | TokenKind::StringLiteral
            | TokenKind::BitLiteral
            | TokenKind::InterpolatedString
            | TokenKind::True
            | TokenKind::False
    )
}

impl Parser {
    pub(super) fn parse_expression(&mut self) -> LocatedExpr {
        self.guarded(Self::parse_assignment)
    }

    /// Run `parse` one nesting level deeper, or yield a placeholder when the
    /// depth limit is reached
    fn guarded(&mut self, parse: fn(&mut Self) -> LocatedExpr) -> LocatedExpr {
        let start = self.start_location();
        if !self.descend() {
            return self.node(Expr::Placeholder, start);
        }
        let expr = parse(self);
        self.ascend();
        expr
    }

    fn parse_assignment(&mut self) -> LocatedExpr {
        let start = self.start_location();
        let target = self.parse_ternary();

        let op = match assignment_operator(self.peek().kind) {
            Some(op) => op,
            None => return target,
        };
        self.advance();

        if !target.node.is_assignable() {
            self.report_structural(
                ErrorKind::InvalidAssignmentTarget,
                "Invalid assignment target",
                target.span,
            );
        }

        // Right-associative
        let value = self.parse_expression();
        self.node(
            Expr::Assign(AssignExpr {
                op,
                target: Box::new(target),
                value: Box::new(value),
            }),
            start,
        )
    }

    fn parse_ternary(&mut self) -> LocatedExpr {
        let start = self.start_location();
        let condition = self.parse_logical_or();

        if !self.match_token(TokenKind::Question) {
            return condition;
        }

        let then_expr = self.parse_expression();
        self.consume(TokenKind::Colon, "Expected ':' in conditional expression");
        let else_expr = self.guarded(Self::parse_ternary);
        self.node(
            Expr::Ternary(TernaryExpr {
                condition: Box::new(condition),
                then_expr: Box::new(then_expr),
                else_expr: Box::new(else_expr),
            }),
            start,
        )
    }

    fn parse_logical_or(&mut self) -> LocatedExpr {
        self.parse_binary_level(Self::parse_logical_and, &[TokenKind::PipePipe])
    }

    fn parse_logical_and(&mut self) -> LocatedExpr {
        self.parse_binary_level(Self::parse_bitwise_or, &[TokenKind::AmpAmp])
    }

    fn parse_bitwise_or(&mut self) -> LocatedExpr {
        self.parse_binary_level(Self::parse_bitwise_xor, &[TokenKind::Pipe])
    }

    fn parse_bitwise_xor(&mut self) -> LocatedExpr {
        self.parse_binary_level(Self::parse_bitwise_and, &[TokenKind::Caret])
    }

    fn parse_bitwise_and(&mut self) -> LocatedExpr {
        self.parse_binary_level(Self::parse_equality, &[TokenKind::Amp])
    }

    fn parse_equality(&mut self) -> LocatedExpr {
        self.parse_binary_level(
            Self::parse_relational,
            &[TokenKind::EqualEqual, TokenKind::NotEqual, TokenKind::Is],
        )
    }

    fn parse_relational(&mut self) -> LocatedExpr {
        self.parse_binary_level(
            Self::parse_shift,
            &[
                TokenKind::Less,
                TokenKind::LessEqual,
                TokenKind::Greater,
                TokenKind::GreaterEqual,
            ],
        )
    }

    fn parse_shift(&mut self) -> LocatedExpr {
        self.parse_binary_level(Self::parse_additive, &[TokenKind::Shl, TokenKind::Shr])
    }

    fn parse_additive(&mut self) -> LocatedExpr {
        self.parse_binary_level(Self::parse_multiplicative, &[TokenKind::Plus, TokenKind::Minus])
    }

    fn parse_multiplicative(&mut self) -> LocatedExpr {
        self.parse_binary_level(
            Self::parse_exponent,
            &[TokenKind::Star, TokenKind::Slash, TokenKind::Percent],
        )
    }

    /// `**` is right-associative
    fn parse_exponent(&mut self) -> LocatedExpr {
        let start = self.start_location();
        let base = self.parse_unary();
        if !self.match_token(TokenKind::StarStar) {
            return base;
        }

        // `a ** b ** c ** ...` recurses once per operator
        let exponent = self.guarded(Self::parse_exponent);
        self.node(
            Expr::Binary(BinaryExpr {
                op: BinaryOp::Power,
                left: Box::new(base),
                right: Box::new(exponent),
            }),
            start,
        )
    }

    /// One left-associative level: operands come from `next`, and the loop
    /// runs while an operator from `operators` follows
    fn parse_binary_level(
        &mut self,
        next: fn(&mut Self) -> LocatedExpr,
        operators: &[TokenKind],
    ) -> LocatedExpr {
        let start = self.start_location();
        let mut left = next(self);

        loop {
            let op = match binary_operator(self.peek().kind) {
                Some(op) if self.check_any(operators) => op,
                _ => break,
            };
            self.advance();
            let right = next(self);
            left = self.node(
                Expr::Binary(BinaryExpr {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                }),
                start,
            );
        }

        left
    }

    pub(super) fn parse_unary(&mut self) -> LocatedExpr {
        let start = self.start_location();

        // `**p` is lexed as one token
        if self.check(TokenKind::StarStar) {
            self.advance();
            let operand = self.guarded(Self::parse_unary);
            let span = self.span_from(start);
            let inner = self.node_with_span(
                Expr::Unary(UnaryExpr {
                    op: UnaryOp::Deref,
                    operand: Box::new(operand),
                    prefix: true,
                }),
                span,
            );
            return self.node(
                Expr::Unary(UnaryExpr {
                    op: UnaryOp::Deref,
                    operand: Box::new(inner),
                    prefix: true,
                }),
                start,
            );
        }

        if let Some(op) = prefix_operator(self.peek().kind) {
            self.advance();
            let operand = self.guarded(Self::parse_unary);
            return self.node(
                Expr::Unary(UnaryExpr {
                    op,
                    operand: Box::new(operand),
                    prefix: true,
                }),
                start,
            );
        }

        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> LocatedExpr {
        let start = self.start_location();
        let mut expr = self.parse_call_chain();

        while let Some(kind) = self.match_any(&[TokenKind::PlusPlus, TokenKind::MinusMinus]) {
            let op = if kind == TokenKind::PlusPlus {
                UnaryOp::Increment
            } else {
                UnaryOp::Decrement
            };
            expr = self.node(
                Expr::Unary(UnaryExpr {
                    op,
                    operand: Box::new(expr),
                    prefix: false,
                }),
                start,
            );
        }

        expr
    }

    fn parse_call_chain(&mut self) -> LocatedExpr {
        let start = self.start_location();
        let mut expr = self.parse_primary();

        loop {
            match self.peek().kind {
                TokenKind::LeftParen => {
                    self.advance();
                    let args = self.parse_arguments(TokenKind::RightParen);
                    self.consume(TokenKind::RightParen, "Expected ')' after arguments");
                    expr = self.node(
                        Expr::Call(CallExpr {
                            callee: Box::new(expr),
                            args,
                        }),
                        start,
                    );
                }
                TokenKind::Dot => {
                    self.advance();
                    let member = if self.check(TokenKind::Identifier) || self.peek().kind.is_keyword() {
                        self.advance().lexeme.clone()
                    } else {
                        self.error_at_current("Expected member name after '.'");
                        String::new()
                    };
                    expr = self.node(
                        Expr::Member(MemberExpr {
                            object: Box::new(expr),
                            member,
                        }),
                        start,
                    );
                }
                TokenKind::LeftBracket => {
                    self.advance();
                    let index = self.parse_expression();
                    self.consume(TokenKind::RightBracket, "Expected ']' after index");
                    expr = self.node(
                        Expr::Subscript(SubscriptExpr {
                            object: Box::new(expr),
                            index: Box::new(index),
                        }),
                        start,
                    );
                }
                _ => break,
            }
        }

        expr
    }

    /// Comma separated expressions up to (not including) `close`; a trailing
    /// comma is accepted
    pub(super) fn parse_arguments(&mut self, close: TokenKind) -> Vec<LocatedExpr> {
        let mut args = Vec::new();
        while !self.check(close) && !self.is_at_end() {
            args.push(self.parse_expression());
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        args
    }

    fn parse_primary(&mut self) -> LocatedExpr {
        match self.peek().kind {
            TokenKind::IntLiteral
            | TokenKind::FloatLiteral
            | TokenKind::CharLiteral
            | TokenKind::StringLiteral
            | TokenKind::BitLiteral
            | TokenKind::True
            | TokenKind::False => self.parse_literal(),
            TokenKind::Identifier => {
                let start = self.start_location();
                let name = self.advance().lexeme.clone();
                self.node(Expr::Identifier(name), start)
            }
            TokenKind::LeftParen => self.parse_group(),
            TokenKind::SizeOf => self.parse_sizeof(),
            TokenKind::TypeOf => self.parse_typeof(),
            TokenKind::Op => self.parse_op_expression(),
            TokenKind::InterpolatedString => self.parse_interpolated_string(),
            TokenKind::LeftBracket => self.parse_array_literal(),
            TokenKind::LeftBrace => self.parse_brace_expression(),
            _ => self.missing_expression(),
        }
    }

    fn parse_literal(&mut self) -> LocatedExpr {
        let start = self.start_location();
        let token = self.advance().clone();
        let literal = match (token.kind, token.literal) {
            (TokenKind::True, _) => Literal::Bool(true),
            (TokenKind::False, _) => Literal::Bool(false),
            (_, Some(LiteralValue::Int(value))) => Literal::Int(value),
            (_, Some(LiteralValue::Float(value))) => Literal::Float(value),
            (_, Some(LiteralValue::Char(value))) => Literal::Char(value),
            (_, Some(LiteralValue::String(value))) => Literal::String(value),
            (_, Some(LiteralValue::Bits(digits))) => Literal::BitData(digits),
            // Tokens from another source may omit the decoded value
            (kind, Some(LiteralValue::Parts(_)) | None) => Self::literal_from_lexeme(kind, &token.lexeme),
        };
        self.node(Expr::Literal(literal), start)
    }

    /// Cast, or an expression in parentheses
    fn parse_group(&mut self) -> LocatedExpr {
        if let Some(cast) = self.try_parse_cast() {
            return cast;
        }
        let start = self.start_location();
        self.advance();
        let inner = self.parse_expression();
        self.consume(TokenKind::RightParen, "Expected ')' after expression");
        self.node(Expr::Group(Box::new(inner)), start)
    }

    fn parse_sizeof(&mut self) -> LocatedExpr {
        let start = self.start_location();
        self.advance();
        self.consume(TokenKind::LeftParen, "Expected '(' after 'sizeof'");
        let ty = self.parse_type();
        self.consume(TokenKind::RightParen, "Expected ')' after type");
        self.node(Expr::SizeOf(Box::new(ty)), start)
    }

    fn parse_typeof(&mut self) -> LocatedExpr {
        let start = self.start_location();
        self.advance();
        self.consume(TokenKind::LeftParen, "Expected '(' after 'typeof'");
        let inner = self.parse_expression();
        self.consume(TokenKind::RightParen, "Expected ')' after expression");
        self.node(Expr::TypeOf(Box::new(inner)), start)
    }

    fn parse_array_literal(&mut self) -> LocatedExpr {
        let start = self.start_location();
        self.advance();
        let elements = self.parse_arguments(TokenKind::RightBracket);
        self.consume(TokenKind::RightBracket, "Expected ']' after array elements");
        self.node(Expr::Array(elements), start)
    }

    fn literal_from_lexeme(kind: TokenKind, lexeme: &str) -> Literal {
        match kind {
            TokenKind::FloatLiteral => Literal::Float(lexeme.parse().unwrap_or(0.0)),
            TokenKind::CharLiteral => Literal::Char(lexeme.trim_matches('\'').chars().next().unwrap_or('\0')),
            TokenKind::StringLiteral => Literal::String(lexeme.trim_matches('"').to_string()),
            TokenKind::BitLiteral => Literal::BitData(lexeme.trim_start_matches("0b").to_string()),
            _ => Literal::Int(lexeme.parse().unwrap_or(0)),
        }
    }

    /// Report a missing operand and stand in a placeholder
    fn missing_expression(&mut self) -> LocatedExpr {
        let token = self.peek();
        let span = token.span;
        let message = format!("Expected expression, found {}", describe_token(token));
        self.report(ErrorKind::ExpectedExpression, message, span);
        let span = self.empty_span();
        self.node_with_span(Expr::Placeholder, span)
    }

    /// `(Type) operand`, tried before a parenthesized expression
    fn try_parse_cast(&mut self) -> Option<LocatedExpr> {
        if !self.cast_ahead() {
            return None;
        }

        let start = self.start_location();
        let checkpoint = self.checkpoint();
        self.advance();
        let target_type = self.parse_type();
        self.consume(TokenKind::RightParen, "Expected ')' after cast type");
        self.commit(&checkpoint, "cast");

        let operand = self.guarded(Self::parse_unary);
        Some(self.node(
            Expr::Cast(CastExpr {
                target_type: Box::new(target_type),
                operand: Box::new(operand),
            }),
            start,
        ))
    }

    /// Whether a cast starts at the current `(`, judged on a skimmed type;
    /// the cursor is always restored
    fn cast_ahead(&mut self) -> bool {
        let checkpoint = self.checkpoint();
        self.advance();

        let is_cast = self.can_start_type() && {
            let target_type = self.skim_type();
            self.probe_clean(&checkpoint)
                && self.match_token(TokenKind::RightParen)
                && starts_cast_operand(&target_type.node, self.peek().kind)
        };

        self.rewind(checkpoint);
        is_cast
    }

    /// `op<left NAME right>`
    fn parse_op_expression(&mut self) -> LocatedExpr {
        let start = self.start_location();
        self.advance();
        self.consume(TokenKind::Less, "Expected '<' after 'op'");

        let left = self.guarded(Self::parse_unary);
        let operator_name = if self.check(TokenKind::Identifier)
            || (binary_operator(self.peek().kind).is_some()
                && !self.check_any(&[TokenKind::Greater, TokenKind::Shr]))
        {
            self.advance().lexeme.clone()
        } else {
            self.error_at_current("Expected operator name in 'op' expression");
            String::new()
        };
        let right = self.guarded(Self::parse_unary);
        self.consume_closing_angle("Expected '>' to close 'op' expression");

        self.node(
            Expr::Op(OpExpr {
                left: Box::new(left),
                operator_name,
                right: Box::new(right),
            }),
            start,
        )
    }

    /// `i"a{}b":{x; y;}`
    fn parse_interpolated_string(&mut self) -> LocatedExpr {
        let start = self.start_location();
        let token = self.advance().clone();
        let literal_parts = match token.literal {
            Some(LiteralValue::Parts(parts)) => parts,
            _ => {
                let text = token.lexeme.trim_start_matches('i').trim_matches('"');
                text.split("{}").map(str::to_string).collect()
            }
        };

        let mut expr_parts = Vec::new();
        let has_slots = literal_parts.len() > 1;
        if self.check(TokenKind::Colon) || has_slots {
            self.consume(TokenKind::Colon, "Expected ':' after interpolated string");
            self.consume(TokenKind::LeftBrace, "Expected '{' before interpolated values");
            while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
                let before = self.current;
                expr_parts.push(self.parse_expression());
                self.consume(TokenKind::Semicolon, "Expected ';' after interpolated value");
                if self.current == before {
                    break;
                }
            }
            self.consume(TokenKind::RightBrace, "Expected '}' after interpolated values");
        }

        let slots = literal_parts.len().saturating_sub(1);
        let values = expr_parts.len();
        let expr = self.node(
            Expr::InterpolatedString(InterpolatedString {
                literal_parts,
                expr_parts,
            }),
            start,
        );
        if slots != values {
            let message = format!(
                "Interpolated string has {} placeholder(s) but {} value(s)",
                slots, values
            );
            self.report_structural(ErrorKind::InterpolationMismatch, message, expr.span);
        }
        expr
    }

    /// `{}` and `{k: v, ...}` are dictionaries, anything else in braces is an
    /// anonymous block
    fn parse_brace_expression(&mut self) -> LocatedExpr {
        let start = self.start_location();

        if self.peek_at(1).kind == TokenKind::RightBrace {
            self.advance();
            self.advance();
            return self.node(Expr::Dictionary(Vec::new()), start);
        }

        if self.dictionary_ahead() {
            self.advance();
            let mut entries = Vec::new();
            loop {
                let key = self.parse_expression();
                self.consume(TokenKind::Colon, "Expected ':' after dictionary key");
                let value = self.parse_expression();
                entries.push(DictEntry { key, value });
                if !self.match_token(TokenKind::Comma) || self.check(TokenKind::RightBrace) {
                    break;
                }
            }
            self.consume(TokenKind::RightBrace, "Expected '}' after dictionary entries");
            return self.node(Expr::Dictionary(entries), start);
        }

        let block = self.parse_block(ParseContext::top_level().function_body());
        self.node(Expr::AnonymousBlock(block.statements), start)
    }

    /// Scan the first entry after `{`: a `:` on the outer level before any
    /// `;` makes a dictionary. Colons that close a `?` or follow an
    /// interpolated string belong to those.
    fn dictionary_ahead(&self) -> bool {
        let first = self.peek_at(1).kind;
        let starts_expression = !first.is_keyword()
            || matches!(
                first,
                TokenKind::True | TokenKind::False | TokenKind::SizeOf | TokenKind::TypeOf | TokenKind::Op
            );
        if !starts_expression {
            return false;
        }

        let mut depth = 0usize;
        let mut open_ternaries = 0usize;
        let mut offset = 1;
        loop {
            match self.peek_at(offset).kind {
                TokenKind::Eof => return false,
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => depth += 1,
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                    if depth == 0 {
                        return false;
                    }
                    depth -= 1;
                }
                TokenKind::Semicolon if depth == 0 => return false,
                TokenKind::Question if depth == 0 => open_ternaries += 1,
                TokenKind::Colon
                    if depth == 0 && self.peek_at(offset - 1).kind != TokenKind::InterpolatedString =>
                {
                    if open_ternaries == 0 {
                        return true;
                    }
                    open_ternaries -= 1;
                }
                _ => {}
            }
            offset += 1;
        }
    }
}
