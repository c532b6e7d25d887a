//! Parser for the Flux language
//!
//! This module implements a recursive descent parser that converts a stream of
//! tokens into an Abstract Syntax Tree (AST). Declarations, statements and
//! types are parsed by mutually recursive functions, with one function per
//! binary precedence level. Constructs that share a token prefix are told
//! apart by lookahead under a checkpoint; types are skimmed with their array
//! sizes skipped, so the chosen form is parsed only once. Malformed input is
//! handled in panic mode: the first error at a site is recorded, later ones
//! are suppressed until the parser resynchronizes at a statement or
//! declaration boundary.

mod declarations;
mod error;
mod expressions;
mod statements;
mod types;
mod utils;

use crate::ast::*;
use crate::config::Config;
use crate::error::{DiagnosticsSink, ErrorCollection, SourceLocation, Span};
use crate::lexer::{Token, TokenKind, TokenSource};

/// Kind of declaration body currently being parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Container {
    None,
    Namespace,
    Class,
    Object,
}

/// Syntactic context threaded by value through the grammar functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ParseContext {
    pub(crate) container: Container,
    pub(crate) in_function: bool,
    pub(crate) in_loop: bool,
    pub(crate) in_switch: bool,
}

impl ParseContext {
    pub(crate) fn top_level() -> Self {
        Self {
            container: Container::None,
            in_function: false,
            in_loop: false,
            in_switch: false,
        }
    }

    pub(crate) fn container(self, container: Container) -> Self {
        Self {
            container,
            in_function: false,
            in_loop: false,
            in_switch: false,
        }
    }

    pub(crate) fn function_body(self) -> Self {
        Self {
            in_function: true,
            in_loop: false,
            in_switch: false,
            ..self
        }
    }

    pub(crate) fn looping(self) -> Self {
        Self {
            in_loop: true,
            ..self
        }
    }

    pub(crate) fn switching(self) -> Self {
        Self {
            in_switch: true,
            ..self
        }
    }
}

pub struct Parser {
    pub(super) tokens: Vec<Token>,
    pub(super) current: usize,
    pub(super) config: Config,
    errors: ErrorCollection,
    panic_mode: bool,      // Suppresses cascading errors until the next synchronization
    failures: usize,       // Every report attempt, including suppressed ones
    depth: usize,          // Current nesting depth
    next_id: u32,          // Node factory counter
    last_end: SourceLocation,
    splits: Vec<(usize, Token)>, // `>>` tokens split into two `>`, with the original
    skimming: bool,        // Array sizes in types are skipped, not parsed
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_config(tokens, Config::default())
    }

    pub fn with_config(mut tokens: Vec<Token>, config: Config) -> Self {
        // A stream missing its Eof is terminated here
        if tokens.last().map_or(true, |token| token.kind != TokenKind::Eof) {
            let end = tokens
                .last()
                .map(|token| token.span.end)
                .unwrap_or_default();
            tokens.push(Token::eof(end));
        }

        let errors = ErrorCollection::with_limit(config.max_errors);
        Self {
            tokens,
            current: 0,
            config,
            errors,
            panic_mode: false,
            failures: 0,
            depth: 0,
            next_id: 0,
            last_end: SourceLocation::default(),
            splits: Vec::new(),
            skimming: false,
        }
    }

    /// Pull every token from `source` up to and including `Eof`
    pub fn from_token_source<S>(source: &mut S, config: Config) -> Self
    where
        S: TokenSource + ?Sized,
    {
        let mut tokens = Vec::new();
        loop {
            let token = source.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        Self::with_config(tokens, config)
    }

    /// Parse with error recovery, returning both the program and any errors found
    pub fn parse(&mut self) -> (Program, ErrorCollection) {
        let program = self.parse_program();
        let errors = std::mem::replace(
            &mut self.errors,
            ErrorCollection::with_limit(self.config.max_errors),
        );
        (program, errors)
    }

    /// Parse and forward every diagnostic to `sink`
    pub fn parse_into(&mut self, sink: &mut dyn DiagnosticsSink) -> Program {
        let (program, errors) = self.parse();
        for error in errors.into_errors() {
            sink.add_error(error);
        }
        program
    }

    fn parse_program(&mut self) -> Program {
        let start = self.start_location();
        let ctx = ParseContext::top_level();
        let mut declarations = Vec::new();

        while !self.is_at_end() {
            if self.match_token(TokenKind::Semicolon) {
                continue;
            }

            let before = self.current;
            self.parse_top_level_item(ctx, &mut declarations);
            self.recover_after_item(before);
        }

        let end = self.peek().span.start.max(self.last_end);
        Program::new(declarations, Span::new(start, end.max(start)))
    }

    fn parse_top_level_item(&mut self, ctx: ParseContext, declarations: &mut Vec<LocatedDecl>) {
        if let Some(decls) = self.parse_declaration(ctx) {
            declarations.extend(decls);
            return;
        }

        let stmt = self.parse_non_declaration_statement(ctx);
        if !self.config.allow_top_level_statements {
            self.report_structural(
                crate::error::ErrorKind::TopLevelStatement,
                "Statements are not allowed at the top level",
                stmt.span,
            );
        }
        let span = stmt.span;
        let id = self.next_node_id();
        declarations.push(Located::new(Declaration::Statement(Box::new(stmt)), span, id));
    }
}
