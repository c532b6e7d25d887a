//! Parser error handling and recovery utilities

use super::Parser;
use crate::debug_println;
use crate::error::{ErrorKind, FluxError, Span};
use crate::lexer::{Token, TokenKind};

/// Tokens that begin a declaration or statement; synchronization stops here
fn is_synchronization_keyword(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Namespace
            | TokenKind::Class
            | TokenKind::Object
            | TokenKind::Struct
            | TokenKind::Def
            | TokenKind::Const
            | TokenKind::Import
            | TokenKind::Using
            | TokenKind::Operator
            | TokenKind::Template
            | TokenKind::Enum
            | TokenKind::Type
            | TokenKind::Data
            | TokenKind::Signed
            | TokenKind::Unsigned
            | TokenKind::Asm
            | TokenKind::If
            | TokenKind::Do
            | TokenKind::While
            | TokenKind::For
            | TokenKind::Return
            | TokenKind::Break
            | TokenKind::Continue
            | TokenKind::Throw
            | TokenKind::Try
            | TokenKind::Switch
            | TokenKind::Case
            | TokenKind::Assert
            | TokenKind::Lock
            | TokenKind::PreLock
            | TokenKind::PostLock
    )
}

/// Human readable description of a token for diagnostics
pub(super) fn describe_token(token: &Token) -> String {
    match token.kind {
        TokenKind::Identifier => format!("identifier '{}'", token.lexeme),
        TokenKind::IntLiteral
        | TokenKind::FloatLiteral
        | TokenKind::CharLiteral
        | TokenKind::StringLiteral
        | TokenKind::BitLiteral => format!("{} {}", token.kind.describe(), token.lexeme),
        kind => kind.describe().to_string(),
    }
}

impl Parser {
    /// Record an error and enter panic mode. While panicking the error is
    /// only counted, so speculative probes still notice it.
    pub(super) fn report(&mut self, kind: ErrorKind, message: impl Into<String>, span: Span) {
        self.failures += 1;
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;
        self.errors
            .add_error(FluxError::new(kind, message).with_span(span));
    }

    /// Record a well-formed but disallowed construct. The tree is unaffected,
    /// so parsing continues without entering panic mode.
    pub(super) fn report_structural(&mut self, kind: ErrorKind, message: impl Into<String>, span: Span) {
        if self.panic_mode {
            return;
        }
        self.errors
            .add_error(FluxError::new(kind, message).with_span(span));
    }

    /// Report an unexpected current token, e.g. "Expected ')' after
    /// arguments, found ';'"
    pub(super) fn error_at_current(&mut self, expected: &str) {
        let token = self.peek();
        let span = token.span;
        let (kind, message) = if token.kind == TokenKind::Eof {
            (ErrorKind::UnexpectedEof, format!("{}, found end of file", expected))
        } else {
            (
                ErrorKind::ExpectedToken,
                format!("{}, found {}", expected, describe_token(token)),
            )
        };
        self.report(kind, message, span);
    }

    /// Tokens after which a missing `;` is recovered in place
    fn can_start_statement(&self) -> bool {
        let kind = self.peek().kind;
        is_synchronization_keyword(kind)
            || matches!(
                kind,
                TokenKind::Identifier
                    | TokenKind::IntLiteral
                    | TokenKind::FloatLiteral
                    | TokenKind::CharLiteral
                    | TokenKind::StringLiteral
                    | TokenKind::BitLiteral
                    | TokenKind::InterpolatedString
                    | TokenKind::True
                    | TokenKind::False
                    | TokenKind::Auto
                    | TokenKind::Void
                    | TokenKind::Volatile
                    | TokenKind::LeftBrace
                    | TokenKind::RightBrace
                    | TokenKind::Eof
            )
    }

    /// Require the `;` that ends a statement or declaration
    pub(super) fn expect_semicolon(&mut self, after: &str) {
        if self.match_token(TokenKind::Semicolon) {
            return;
        }

        let was_panicking = self.panic_mode;
        self.error_at_current(&format!("Expected ';' after {}", after));
        if !was_panicking && self.can_start_statement() {
            // The statement is complete; resume at the next one
            self.panic_mode = false;
        }
    }

    /// Synchronize parser after an error to a known good state
    pub(super) fn synchronize(&mut self) {
        let from = self.current;

        while !self.is_at_end() {
            // Stop at statement boundaries
            if self.current > 0 && self.previous().kind == TokenKind::Semicolon {
                break;
            }

            let kind = self.peek().kind;
            if kind == TokenKind::RightBrace || is_synchronization_keyword(kind) {
                break;
            }

            self.advance();
        }

        // Unclosed constructs at the end of input are already reported
        if !self.is_at_end() {
            self.panic_mode = false;
        }

        if self.current > from {
            debug_println!(
                "[parser] synchronize skipped {} token(s), resuming at {}",
                self.current - from,
                describe_token(self.peek())
            );
        }
    }

    /// Shared tail of every body loop: guarantee progress and resynchronize
    /// after a failed item
    pub(super) fn recover_after_item(&mut self, before: usize) {
        if self.current == before && !self.is_at_end() {
            debug_println!(
                "[parser] no progress at {}, forcing advance",
                describe_token(self.peek())
            );
            self.advance();
            self.synchronize();
        } else if self.panic_mode {
            self.synchronize();
        }
    }
}
