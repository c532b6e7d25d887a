//! Type grammar

use super::Parser;
use crate::ast::*;
use crate::error::{ErrorKind, SourceLocation};
use crate::lexer::{LiteralValue, TokenKind};
use nonempty::NonEmpty;

impl Parser {
    /// Whether the current token can begin a type
    pub(super) fn can_start_type(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Identifier
                | TokenKind::Void
                | TokenKind::Auto
                | TokenKind::Class
                | TokenKind::Object
                | TokenKind::Struct
                | TokenKind::Data
                | TokenKind::Signed
                | TokenKind::Unsigned
                | TokenKind::Def
        )
    }

    /// Base type followed by any number of `*` and `[size]` modifiers
    pub(super) fn parse_type(&mut self) -> LocatedType {
        let start = self.start_location();
        if !self.descend() {
            return self.node(Type::Placeholder, start);
        }

        let mut ty = self.parse_base_type();
        loop {
            match self.peek().kind {
                TokenKind::Star => {
                    self.advance();
                    ty = self.parse_pointer_qualifiers(ty, start);
                }
                TokenKind::StarStar => {
                    self.advance();
                    let inner = self.plain_pointer(ty, start);
                    ty = self.parse_pointer_qualifiers(inner, start);
                }
                TokenKind::LeftBracket => {
                    self.advance();
                    let size = if self.check(TokenKind::RightBracket) {
                        None
                    } else if self.skimming {
                        let size_start = self.start_location();
                        self.skip_group();
                        Some(Box::new(self.node(Expr::Placeholder, size_start)))
                    } else {
                        Some(Box::new(self.parse_expression()))
                    };
                    self.consume(TokenKind::RightBracket, "Expected ']' after array size");
                    ty = self.node(
                        Type::Array(ArrayType {
                            element: Box::new(ty),
                            size,
                        }),
                        start,
                    );
                }
                _ => break,
            }
        }

        self.ascend();
        ty
    }

    fn parse_pointer_qualifiers(&mut self, pointee: LocatedType, start: SourceLocation) -> LocatedType {
        let mut is_const = false;
        let mut is_volatile = false;
        while let Some(kind) = self.match_any(&[TokenKind::Const, TokenKind::Volatile]) {
            match kind {
                TokenKind::Const => is_const = true,
                _ => is_volatile = true,
            }
        }
        self.node(
            Type::Pointer(PointerType {
                pointee: Box::new(pointee),
                is_const,
                is_volatile,
            }),
            start,
        )
    }

    // First half of a `**` token
    fn plain_pointer(&mut self, pointee: LocatedType, start: SourceLocation) -> LocatedType {
        self.node(
            Type::Pointer(PointerType {
                pointee: Box::new(pointee),
                is_const: false,
                is_volatile: false,
            }),
            start,
        )
    }

    fn parse_base_type(&mut self) -> LocatedType {
        let start = self.start_location();
        match self.peek().kind {
            TokenKind::Void => self.builtin_type(BuiltinType::Void),
            TokenKind::Auto => self.builtin_type(BuiltinType::Auto),
            TokenKind::Class => self.builtin_type(BuiltinType::Class),
            TokenKind::Object => self.builtin_type(BuiltinType::Object),
            TokenKind::Struct => self.builtin_type(BuiltinType::Struct),
            TokenKind::Data | TokenKind::Signed | TokenKind::Unsigned => {
                let data = self.parse_data_type();
                self.node(Type::Data(data), start)
            }
            TokenKind::Def => self.parse_function_type(),
            TokenKind::Identifier => {
                let name = self.parse_qualified_name("Expected type name");
                let base = if name.is_simple() {
                    self.node(Type::Named(name.segments.head), start)
                } else {
                    self.node(Type::Qualified(name), start)
                };

                if self.match_token(TokenKind::Less) {
                    let mut args = Vec::new();
                    if !self.check_any(&[TokenKind::Greater, TokenKind::Shr]) {
                        loop {
                            args.push(self.parse_type());
                            if !self.match_token(TokenKind::Comma) {
                                break;
                            }
                        }
                    }
                    self.consume_closing_angle("Expected '>' after template arguments");
                    return self.node(
                        Type::TemplateInstantiation(TemplateInstance {
                            base: Box::new(base),
                            args,
                        }),
                        start,
                    );
                }
                base
            }
            _ => {
                let token = self.peek();
                let span = token.span;
                let message = format!(
                    "Expected type, found {}",
                    super::error::describe_token(token)
                );
                self.report(ErrorKind::ExpectedType, message, span);
                let span = self.empty_span();
                self.node_with_span(Type::Placeholder, span)
            }
        }
    }

    fn builtin_type(&mut self, builtin: BuiltinType) -> LocatedType {
        let start = self.start_location();
        self.advance();
        self.node(Type::Builtin(builtin), start)
    }

    /// `[signed|unsigned] data{N}`; bare `data` is unsigned
    pub(super) fn parse_data_type(&mut self) -> DataType {
        let is_signed =
            self.match_any(&[TokenKind::Signed, TokenKind::Unsigned]) == Some(TokenKind::Signed);
        self.consume(TokenKind::Data, "Expected 'data'");
        self.consume(TokenKind::LeftBrace, "Expected '{' after 'data'");
        let bit_width = self.parse_bit_width();
        self.consume(TokenKind::RightBrace, "Expected '}' after bit width");
        DataType {
            bit_width,
            is_signed,
        }
    }

    fn parse_bit_width(&mut self) -> u64 {
        if self.check(TokenKind::IntLiteral) {
            let width = match self.advance().literal {
                Some(LiteralValue::Int(value)) => value,
                _ => 0,
            };
            return width;
        }
        self.error_at_current("Expected bit width");
        0
    }

    /// `def(T1, T2) -> R`
    fn parse_function_type(&mut self) -> LocatedType {
        let start = self.start_location();
        self.advance();
        self.consume(TokenKind::LeftParen, "Expected '(' after 'def' in function type");
        let param_types = self.parse_type_list(TokenKind::RightParen);
        self.consume(TokenKind::RightParen, "Expected ')' after parameter types");
        let return_type = self.parse_return_type();
        self.node(
            Type::Function(FunctionType {
                param_types,
                return_type: Box::new(return_type),
            }),
            start,
        )
    }

    /// Comma separated types up to (not including) `close`
    pub(super) fn parse_type_list(&mut self, close: TokenKind) -> Vec<LocatedType> {
        let mut types = Vec::new();
        if self.check(close) {
            return types;
        }
        loop {
            types.push(self.parse_type());
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        types
    }

    /// `-> Type`, or `void` when the arrow is absent
    pub(super) fn parse_return_type(&mut self) -> LocatedType {
        if self.match_token(TokenKind::Arrow) {
            return self.parse_type();
        }
        let span = self.empty_span();
        self.node_with_span(Type::Builtin(BuiltinType::Void), span)
    }

    /// Dotted identifier path such as `std.io`
    pub(super) fn parse_qualified_name(&mut self, message: &str) -> QualifiedName {
        let mut segments = NonEmpty::new(self.consume_identifier(message));
        while self.check(TokenKind::Dot) && self.peek_at(1).kind == TokenKind::Identifier {
            self.advance();
            segments.push(self.advance().lexeme.clone());
        }
        QualifiedName::new(segments)
    }
}
