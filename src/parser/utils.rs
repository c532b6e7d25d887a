//! Token cursor, node factory and speculative checkpoints

use super::Parser;
use crate::ast::{Located, LocatedType, NodeId};
use crate::debug_println;
use crate::error::{SourceLocation, Span};
use crate::lexer::{Token, TokenKind};

/// Saved parser state for a speculative parse
#[derive(Debug, Clone, Copy)]
pub(super) struct Checkpoint {
    position: usize,
    error_count: usize,
    panic_mode: bool,
    failures: usize,
    next_id: u32,
    last_end: SourceLocation,
    splits: usize,
}

impl Parser {
    /// Check if the current token matches a kind (without consuming)
    pub(super) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub(super) fn check_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.peek().kind)
    }

    /// Advance to the next token; never moves past `Eof`
    pub(super) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            let end = self.tokens[self.current].span.end;
            self.last_end = self.last_end.max(end);
            self.current += 1;
        }
        self.previous()
    }

    pub(super) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// Peek at the current token
    pub(super) fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    /// Peek `offset` tokens ahead; past the end this is the `Eof` token
    pub(super) fn peek_at(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.current + offset).min(last)]
    }

    /// Get the previous token (the current one before anything was consumed)
    pub(super) fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    /// Match and consume a token kind
    pub(super) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(super) fn match_any(&mut self, kinds: &[TokenKind]) -> Option<TokenKind> {
        let kind = self.peek().kind;
        if kinds.contains(&kind) {
            self.advance();
            Some(kind)
        } else {
            None
        }
    }

    /// Consume a token of the expected kind. On a mismatch the error is
    /// reported and a synthetic token of that kind is returned without
    /// consuming anything.
    pub(super) fn consume(&mut self, kind: TokenKind, message: &str) -> Token {
        if self.check(kind) {
            return self.advance().clone();
        }
        self.error_at_current(message);
        Token::new(kind, "", Span::single(self.peek().span.start))
    }

    /// Consume an identifier token, yielding an empty name on a mismatch
    pub(super) fn consume_identifier(&mut self, message: &str) -> String {
        self.consume(TokenKind::Identifier, message).lexeme
    }

    /// Consume a `>` that closes an angle-bracket list, splitting `>>`
    pub(super) fn consume_closing_angle(&mut self, message: &str) {
        if self.check(TokenKind::Shr) {
            self.split_shift_right();
        }
        self.consume(TokenKind::Greater, message);
    }

    fn split_shift_right(&mut self) {
        let original = self.peek().clone();
        let start = original.span.start;
        let middle = SourceLocation::new(start.line, start.column + 1, start.offset + 1);
        let first = Token::new(TokenKind::Greater, ">", Span::new(start, middle));
        let second = Token::new(TokenKind::Greater, ">", Span::new(middle, original.span.end));

        self.tokens[self.current] = first;
        self.tokens.insert(self.current + 1, second);
        self.splits.push((self.current, original));
    }

    pub(super) fn start_location(&self) -> SourceLocation {
        self.peek().span.start
    }

    /// Span from `start` to the end of everything produced since
    pub(super) fn span_from(&self, start: SourceLocation) -> Span {
        Span::new(start, self.last_end.max(start))
    }

    /// Empty span at the current token, for nodes that stand in for
    /// missing input
    pub(super) fn empty_span(&mut self) -> Span {
        let here = self.start_location().max(self.last_end);
        self.last_end = here;
        Span::single(here)
    }

    pub(super) fn next_node_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Node factory: stamps the node with its span and a fresh id
    pub(super) fn node<T>(&mut self, node: T, start: SourceLocation) -> Located<T> {
        let span = self.span_from(start);
        let id = self.next_node_id();
        Located::new(node, span, id)
    }

    pub(super) fn node_with_span<T>(&mut self, node: T, span: Span) -> Located<T> {
        let id = self.next_node_id();
        Located::new(node, span, id)
    }

    pub(super) fn id_counter(&mut self) -> &mut u32 {
        &mut self.next_id
    }

    pub(super) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            position: self.current,
            error_count: self.errors.error_count(),
            panic_mode: self.panic_mode,
            failures: self.failures,
            next_id: self.next_id,
            last_end: self.last_end,
            splits: self.splits.len(),
        }
    }

    /// Whether nothing was reported, suppressed or not, since `checkpoint`
    pub(super) fn probe_clean(&self, checkpoint: &Checkpoint) -> bool {
        self.failures == checkpoint.failures
    }

    /// Restore cursor, diagnostics and panic state; diagnostics produced
    /// since `checkpoint` are dropped and no longer count as failures
    pub(super) fn rewind(&mut self, checkpoint: Checkpoint) {
        while self.splits.len() > checkpoint.splits {
            if let Some((index, original)) = self.splits.pop() {
                self.tokens.remove(index + 1);
                self.tokens[index] = original;
            }
        }
        self.current = checkpoint.position;
        self.errors.truncate(checkpoint.error_count);
        self.panic_mode = checkpoint.panic_mode;
        self.failures = checkpoint.failures;
        self.next_id = checkpoint.next_id;
        self.last_end = checkpoint.last_end;
    }

    /// Parse a type for a lookahead decision. Array sizes are skipped
    /// whole, so the cost stays linear in the tokens covered.
    pub(super) fn skim_type(&mut self) -> LocatedType {
        let outer = std::mem::replace(&mut self.skimming, true);
        let ty = self.parse_type();
        self.skimming = outer;
        ty
    }

    /// Move to the bracket that closes the current group; nested groups are
    /// skipped whole and nothing is reported
    pub(super) fn skip_group(&mut self) {
        let mut depth = 0usize;
        while !self.is_at_end() {
            match self.peek().kind {
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => depth += 1,
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            self.advance();
        }
    }

    pub(super) fn commit(&self, checkpoint: &Checkpoint, what: &str) {
        debug_println!(
            "[parser] committed {} at token {} ({} tokens)",
            what,
            checkpoint.position,
            self.current - checkpoint.position
        );
    }

    /// Enter one nesting level; false when the configured limit is reached
    /// (the error is reported and one token consumed)
    pub(super) fn descend(&mut self) -> bool {
        if self.depth >= self.config.max_nesting_depth {
            let span = self.peek().span;
            self.report(
                crate::error::ErrorKind::NestingTooDeep,
                format!(
                    "Nesting exceeds the maximum depth of {}",
                    self.config.max_nesting_depth
                ),
                span,
            );
            self.advance();
            return false;
        }
        self.depth += 1;
        true
    }

    pub(super) fn ascend(&mut self) {
        self.depth -= 1;
    }
}
