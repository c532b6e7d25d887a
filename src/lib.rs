//! Syntactic front end for the Flux systems language.
//!
//! `parse_source` lexes and parses a file in one step; `Parser` accepts any
//! token stream. Parsing never fails as a whole: malformed input yields a
//! best-effort tree plus diagnostics.

pub mod ast;
pub mod config;
pub mod debug;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod printer;

pub use ast::*;
pub use config::*;
pub use error::{DiagnosticsSink, ErrorCollection, ErrorFormatter, ErrorKind, FluxError, SourceLocation, Span};
pub use lexer::*;
pub use parser::*;
pub use printer::*;

use serde::Serialize;

/// Tree and diagnostics of one source file
#[derive(Debug, Serialize)]
pub struct ParseOutput {
    pub program: Program,
    pub errors: ErrorCollection,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        self.errors.has_errors()
    }
}

/// Lex and parse `source` with the default configuration
pub fn parse_source(source: &str) -> ParseOutput {
    parse_source_with_config(source, Config::default())
}

/// Lex and parse `source`; lexical and syntactic diagnostics are merged in
/// source order
pub fn parse_source_with_config(source: &str, config: Config) -> ParseOutput {
    let mut lexer = Lexer::new(source);
    let tokens = lexer.tokenize();

    let limit = config.max_errors;
    let mut parser = Parser::with_config(tokens, config);
    let (program, parse_errors) = parser.parse();

    let mut errors = ErrorCollection::with_limit(limit);
    errors.merge(lexer.take_errors());
    errors.merge(parse_errors);

    ParseOutput { program, errors }
}
