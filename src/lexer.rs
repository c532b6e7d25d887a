//! Tokens and the reference lexer for Flux source text
//!
//! The parser only depends on the [`TokenSource`] trait and the [`Token`]
//! shape; [`Lexer`] is the implementation used by the driver and the tests.

use crate::error::{ErrorCollection, ErrorKind, FluxError, SourceLocation, Span};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // Declaration keywords
    Namespace,
    Class,
    Object,
    Struct,
    Def,
    Const,
    Volatile,
    Import,
    Using,
    As,
    Operator,
    Template,
    Enum,
    Type,
    Data,
    Signed,
    Unsigned,
    Asm,
    Void,
    Auto,

    // Statement keywords
    If,
    Else,
    Do,
    While,
    For,
    In,
    Return,
    Break,
    Continue,
    Throw,
    Try,
    Catch,
    Switch,
    Case,
    Default,
    Assert,
    Lock,
    PreLock,
    PostLock,

    // Expression keywords
    SizeOf,
    TypeOf,
    Op,
    Is,
    True,
    False,

    // Identifiers and literals
    Identifier,
    IntLiteral,
    FloatLiteral,
    CharLiteral,
    StringLiteral,
    BitLiteral,
    InterpolatedString,
    AsmBlock,

    // Operators
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,
    Equal,
    PlusEqual,
    MinusEqual,
    StarEqual,
    StarStarEqual,
    SlashEqual,
    PercentEqual,
    AmpEqual,
    PipeEqual,
    CaretEqual,
    ShlEqual,
    ShrEqual,
    EqualEqual,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Shl,
    Shr,
    AmpAmp,
    PipePipe,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Bang,
    At,
    Question,
    Arrow,

    // Delimiters
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Semicolon,
    Colon,
    Comma,
    Dot,

    // Special
    Eof,
}

impl TokenKind {
    /// Human readable form used in diagnostics
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Namespace => "'namespace'",
            TokenKind::Class => "'class'",
            TokenKind::Object => "'object'",
            TokenKind::Struct => "'struct'",
            TokenKind::Def => "'def'",
            TokenKind::Const => "'const'",
            TokenKind::Volatile => "'volatile'",
            TokenKind::Import => "'import'",
            TokenKind::Using => "'using'",
            TokenKind::As => "'as'",
            TokenKind::Operator => "'operator'",
            TokenKind::Template => "'template'",
            TokenKind::Enum => "'enum'",
            TokenKind::Type => "'type'",
            TokenKind::Data => "'data'",
            TokenKind::Signed => "'signed'",
            TokenKind::Unsigned => "'unsigned'",
            TokenKind::Asm => "'asm'",
            TokenKind::Void => "'void'",
            TokenKind::Auto => "'auto'",
            TokenKind::If => "'if'",
            TokenKind::Else => "'else'",
            TokenKind::Do => "'do'",
            TokenKind::While => "'while'",
            TokenKind::For => "'for'",
            TokenKind::In => "'in'",
            TokenKind::Return => "'return'",
            TokenKind::Break => "'break'",
            TokenKind::Continue => "'continue'",
            TokenKind::Throw => "'throw'",
            TokenKind::Try => "'try'",
            TokenKind::Catch => "'catch'",
            TokenKind::Switch => "'switch'",
            TokenKind::Case => "'case'",
            TokenKind::Default => "'default'",
            TokenKind::Assert => "'assert'",
            TokenKind::Lock => "'lock'",
            TokenKind::PreLock => "'prelock'",
            TokenKind::PostLock => "'postlock'",
            TokenKind::SizeOf => "'sizeof'",
            TokenKind::TypeOf => "'typeof'",
            TokenKind::Op => "'op'",
            TokenKind::Is => "'is'",
            TokenKind::True => "'true'",
            TokenKind::False => "'false'",
            TokenKind::Identifier => "identifier",
            TokenKind::IntLiteral => "integer literal",
            TokenKind::FloatLiteral => "float literal",
            TokenKind::CharLiteral => "character literal",
            TokenKind::StringLiteral => "string literal",
            TokenKind::BitLiteral => "bit literal",
            TokenKind::InterpolatedString => "interpolated string",
            TokenKind::AsmBlock => "asm block",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::StarStar => "'**'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::PlusPlus => "'++'",
            TokenKind::MinusMinus => "'--'",
            TokenKind::Equal => "'='",
            TokenKind::PlusEqual => "'+='",
            TokenKind::MinusEqual => "'-='",
            TokenKind::StarEqual => "'*='",
            TokenKind::StarStarEqual => "'**='",
            TokenKind::SlashEqual => "'/='",
            TokenKind::PercentEqual => "'%='",
            TokenKind::AmpEqual => "'&='",
            TokenKind::PipeEqual => "'|='",
            TokenKind::CaretEqual => "'^='",
            TokenKind::ShlEqual => "'<<='",
            TokenKind::ShrEqual => "'>>='",
            TokenKind::EqualEqual => "'=='",
            TokenKind::NotEqual => "'!='",
            TokenKind::Less => "'<'",
            TokenKind::LessEqual => "'<='",
            TokenKind::Greater => "'>'",
            TokenKind::GreaterEqual => "'>='",
            TokenKind::Shl => "'<<'",
            TokenKind::Shr => "'>>'",
            TokenKind::AmpAmp => "'&&'",
            TokenKind::PipePipe => "'||'",
            TokenKind::Amp => "'&'",
            TokenKind::Pipe => "'|'",
            TokenKind::Caret => "'^'",
            TokenKind::Tilde => "'~'",
            TokenKind::Bang => "'!'",
            TokenKind::At => "'@'",
            TokenKind::Question => "'?'",
            TokenKind::Arrow => "'->'",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::LeftBrace => "'{'",
            TokenKind::RightBrace => "'}'",
            TokenKind::LeftBracket => "'['",
            TokenKind::RightBracket => "']'",
            TokenKind::Semicolon => "';'",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Eof => "end of file",
        }
    }

    /// Source text of fixed-spelling tokens
    pub fn symbol(&self) -> Option<&'static str> {
        let described = self.describe();
        if described.starts_with('\'') {
            Some(&described[1..described.len() - 1])
        } else {
            None
        }
    }

    pub fn is_keyword(&self) -> bool {
        keyword(self.symbol().unwrap_or("")) == Some(*self)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

fn keyword(text: &str) -> Option<TokenKind> {
    let kind = match text {
        "namespace" => TokenKind::Namespace,
        "class" => TokenKind::Class,
        "object" => TokenKind::Object,
        "struct" => TokenKind::Struct,
        "def" => TokenKind::Def,
        "const" => TokenKind::Const,
        "volatile" => TokenKind::Volatile,
        "import" => TokenKind::Import,
        "using" => TokenKind::Using,
        "as" => TokenKind::As,
        "operator" => TokenKind::Operator,
        "template" => TokenKind::Template,
        "enum" => TokenKind::Enum,
        "type" => TokenKind::Type,
        "data" => TokenKind::Data,
        "signed" => TokenKind::Signed,
        "unsigned" => TokenKind::Unsigned,
        "asm" => TokenKind::Asm,
        "void" => TokenKind::Void,
        "auto" => TokenKind::Auto,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "do" => TokenKind::Do,
        "while" => TokenKind::While,
        "for" => TokenKind::For,
        "in" => TokenKind::In,
        "return" => TokenKind::Return,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "throw" => TokenKind::Throw,
        "try" => TokenKind::Try,
        "catch" => TokenKind::Catch,
        "switch" => TokenKind::Switch,
        "case" => TokenKind::Case,
        "default" => TokenKind::Default,
        "assert" => TokenKind::Assert,
        "lock" => TokenKind::Lock,
        "prelock" => TokenKind::PreLock,
        "postlock" => TokenKind::PostLock,
        "sizeof" => TokenKind::SizeOf,
        "typeof" => TokenKind::TypeOf,
        "op" => TokenKind::Op,
        "is" => TokenKind::Is,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        _ => return None,
    };
    Some(kind)
}

/// Decoded payload of a literal token
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LiteralValue {
    Int(u64),
    Float(f64),
    Char(char),
    String(String),
    /// Binary digits of a `0b` literal, without the prefix
    Bits(String),
    /// Literal text segments of an interpolated string, split at `{}`
    Parts(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
    pub literal: Option<LiteralValue>,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
            literal: None,
        }
    }

    pub fn with_literal(mut self, literal: LiteralValue) -> Self {
        self.literal = Some(literal);
        self
    }

    pub fn eof(location: SourceLocation) -> Self {
        Self::new(TokenKind::Eof, "", Span::single(location))
    }
}

/// Pull interface over a lexical token stream. Once the stream is exhausted
/// every further call yields an `Eof` token.
pub trait TokenSource {
    fn next_token(&mut self) -> Token;
}

impl<I> TokenSource for I
where
    I: Iterator<Item = Token>,
{
    fn next_token(&mut self) -> Token {
        self.next()
            .unwrap_or_else(|| Token::eof(SourceLocation::default()))
    }
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    offset: usize,
    line: usize,
    column: usize,
    errors: ErrorCollection,
    // The previous token was `asm`; a following `{` opens a raw block
    after_asm: bool,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            offset: 0,
            line: 1,
            column: 1,
            errors: ErrorCollection::new(),
            after_asm: false,
        }
    }

    /// Lex the whole input; the result always ends with `Eof`
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    pub fn errors(&self) -> &ErrorCollection {
        &self.errors
    }

    pub fn take_errors(&mut self) -> ErrorCollection {
        std::mem::take(&mut self.errors)
    }

    fn lex_token(&mut self) -> Option<Token> {
        let start = self.location();
        let start_position = self.position;

        let ch = self.advance()?;

        if self.after_asm {
            self.after_asm = false;
            if ch == '{' {
                return Some(self.read_asm_block(start));
            }
        }

        let kind = match ch {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            '~' => TokenKind::Tilde,
            '@' => TokenKind::At,
            '?' => TokenKind::Question,
            '+' => {
                if self.match_char('+') {
                    TokenKind::PlusPlus
                } else if self.match_char('=') {
                    TokenKind::PlusEqual
                } else {
                    TokenKind::Plus
                }
            }
            '-' => {
                if self.match_char('-') {
                    TokenKind::MinusMinus
                } else if self.match_char('=') {
                    TokenKind::MinusEqual
                } else if self.match_char('>') {
                    TokenKind::Arrow
                } else {
                    TokenKind::Minus
                }
            }
            '*' => {
                if self.match_char('*') {
                    if self.match_char('=') {
                        TokenKind::StarStarEqual
                    } else {
                        TokenKind::StarStar
                    }
                } else if self.match_char('=') {
                    TokenKind::StarEqual
                } else {
                    TokenKind::Star
                }
            }
            '/' => {
                if self.match_char('=') {
                    TokenKind::SlashEqual
                } else {
                    TokenKind::Slash
                }
            }
            '%' => {
                if self.match_char('=') {
                    TokenKind::PercentEqual
                } else {
                    TokenKind::Percent
                }
            }
            '=' => {
                if self.match_char('=') {
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                }
            }
            '!' => {
                if self.match_char('=') {
                    TokenKind::NotEqual
                } else {
                    TokenKind::Bang
                }
            }
            '<' => {
                if self.match_char('<') {
                    if self.match_char('=') {
                        TokenKind::ShlEqual
                    } else {
                        TokenKind::Shl
                    }
                } else if self.match_char('=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                }
            }
            '>' => {
                if self.match_char('>') {
                    if self.match_char('=') {
                        TokenKind::ShrEqual
                    } else {
                        TokenKind::Shr
                    }
                } else if self.match_char('=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                }
            }
            '&' => {
                if self.match_char('&') {
                    TokenKind::AmpAmp
                } else if self.match_char('=') {
                    TokenKind::AmpEqual
                } else {
                    TokenKind::Amp
                }
            }
            '|' => {
                if self.match_char('|') {
                    TokenKind::PipePipe
                } else if self.match_char('=') {
                    TokenKind::PipeEqual
                } else {
                    TokenKind::Pipe
                }
            }
            '^' => {
                if self.match_char('=') {
                    TokenKind::CaretEqual
                } else {
                    TokenKind::Caret
                }
            }
            '"' => {
                let value = self.read_string(start, '"');
                return Some(self.token(TokenKind::StringLiteral, start, start_position)
                    .with_literal(LiteralValue::String(value)));
            }
            '\'' => return Some(self.read_char_literal(start, start_position)),
            'i' if self.peek() == Some('"') => {
                self.advance();
                let value = self.read_string(start, '"');
                let parts = value.split("{}").map(str::to_string).collect();
                return Some(
                    self.token(TokenKind::InterpolatedString, start, start_position)
                        .with_literal(LiteralValue::Parts(parts)),
                );
            }
            _ if ch.is_ascii_digit() => return Some(self.read_number(ch, start, start_position)),
            _ if ch.is_alphabetic() || ch == '_' => {
                self.read_while(|c| c.is_alphanumeric() || c == '_');
                let text: String = self.input[start_position..self.position].iter().collect();
                let kind = keyword(&text).unwrap_or(TokenKind::Identifier);
                if kind == TokenKind::Asm {
                    self.after_asm = true;
                }
                return Some(Token::new(kind, text, Span::new(start, self.location())));
            }
            _ => {
                self.errors.add_error(
                    FluxError::new(
                        ErrorKind::InvalidCharacter,
                        format!("Unexpected character '{}'", ch),
                    )
                    .with_span(Span::new(start, self.location())),
                );
                return None;
            }
        };

        Some(self.token(kind, start, start_position))
    }

    fn token(&self, kind: TokenKind, start: SourceLocation, start_position: usize) -> Token {
        let lexeme: String = self.input[start_position..self.position].iter().collect();
        Token::new(kind, lexeme, Span::new(start, self.location()))
    }

    /// Skip whitespace and comments
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_next() == Some('/') => {
                    self.read_while(|c| c != '\n');
                }
                Some('/') if self.peek_next() == Some('*') => {
                    let start = self.location();
                    self.advance();
                    self.advance();
                    let mut closed = false;
                    while !self.is_at_end() {
                        if self.peek() == Some('*') && self.peek_next() == Some('/') {
                            self.advance();
                            self.advance();
                            closed = true;
                            break;
                        }
                        self.advance();
                    }
                    if !closed {
                        self.errors.add_error(
                            FluxError::new(ErrorKind::UnterminatedComment, "Unterminated block comment")
                                .with_span(Span::new(start, self.location())),
                        );
                    }
                }
                _ => return,
            }
        }
    }

    fn read_string(&mut self, start: SourceLocation, quote: char) -> String {
        let mut value = String::new();
        loop {
            match self.advance() {
                None => {
                    self.errors.add_error(
                        FluxError::new(ErrorKind::UnterminatedString, "Unterminated string literal")
                            .with_span(Span::new(start, self.location())),
                    );
                    break;
                }
                Some(c) if c == quote => break,
                Some('\\') => {
                    if let Some(escaped) = self.read_escape() {
                        value.push(escaped);
                    }
                }
                Some(c) => value.push(c),
            }
        }
        value
    }

    fn read_escape(&mut self) -> Option<char> {
        let start = self.location();
        let escaped = match self.advance()? {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            other => {
                self.errors.add_error(
                    FluxError::new(
                        ErrorKind::InvalidEscape,
                        format!("Unknown escape sequence '\\{}'", other),
                    )
                    .with_span(Span::new(start, self.location())),
                );
                other
            }
        };
        Some(escaped)
    }

    fn read_char_literal(&mut self, start: SourceLocation, start_position: usize) -> Token {
        let value = match self.advance() {
            Some('\\') => self.read_escape(),
            Some('\'') | None => None,
            Some(c) => Some(c),
        };
        let closed = self.match_char('\'');
        let token = self.token(TokenKind::CharLiteral, start, start_position);
        match value {
            Some(c) if closed => token.with_literal(LiteralValue::Char(c)),
            _ => {
                self.errors.add_error(
                    FluxError::new(ErrorKind::InvalidCharacter, "Malformed character literal")
                        .with_span(token.span),
                );
                token.with_literal(LiteralValue::Char('\0'))
            }
        }
    }

    fn read_number(&mut self, first_digit: char, start: SourceLocation, start_position: usize) -> Token {
        if first_digit == '0' {
            let radix = match self.peek() {
                Some('x') | Some('X') => Some(16),
                Some('o') | Some('O') => Some(8),
                Some('b') | Some('B') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                self.advance();
                let digits: String = self
                    .read_while(|c| c.is_ascii_alphanumeric() || c == '_')
                    .chars()
                    .filter(|c| *c != '_')
                    .collect();
                let valid = !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix));
                if radix == 2 {
                    let token = self.token(TokenKind::BitLiteral, start, start_position);
                    if !valid {
                        self.invalid_number(&token);
                    }
                    return token.with_literal(LiteralValue::Bits(digits));
                }
                let token = self.token(TokenKind::IntLiteral, start, start_position);
                let value = if valid {
                    u64::from_str_radix(&digits, radix).ok()
                } else {
                    None
                };
                if value.is_none() {
                    self.invalid_number(&token);
                }
                return token.with_literal(LiteralValue::Int(value.unwrap_or(0)));
            }
        }

        self.read_while(|c| c.is_ascii_digit() || c == '_');
        let mut is_float = false;
        if self.peek() == Some('.') && self.peek_next().map_or(false, |c| c.is_ascii_digit()) {
            is_float = true;
            self.advance();
            self.read_while(|c| c.is_ascii_digit() || c == '_');
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            let sign_then_digit = matches!(self.peek_next(), Some('+') | Some('-'))
                && self
                    .input
                    .get(self.position + 2)
                    .map_or(false, |c| c.is_ascii_digit());
            if sign_then_digit || self.peek_next().map_or(false, |c| c.is_ascii_digit()) {
                is_float = true;
                self.advance();
                if sign_then_digit {
                    self.advance();
                }
                self.read_while(|c| c.is_ascii_digit());
            }
        }

        let kind = if is_float {
            TokenKind::FloatLiteral
        } else {
            TokenKind::IntLiteral
        };
        let token = self.token(kind, start, start_position);
        let text: String = token.lexeme.chars().filter(|c| *c != '_').collect();
        if is_float {
            match text.parse::<f64>() {
                Ok(value) => token.with_literal(LiteralValue::Float(value)),
                Err(_) => {
                    self.invalid_number(&token);
                    token.with_literal(LiteralValue::Float(0.0))
                }
            }
        } else {
            match text.parse::<u64>() {
                Ok(value) => token.with_literal(LiteralValue::Int(value)),
                Err(_) => {
                    self.invalid_number(&token);
                    token.with_literal(LiteralValue::Int(0))
                }
            }
        }
    }

    fn invalid_number(&mut self, token: &Token) {
        self.errors.add_error(
            FluxError::new(
                ErrorKind::InvalidNumber,
                format!("Invalid number literal '{}'", token.lexeme),
            )
            .with_span(token.span),
        );
    }

    /// Raw text of `asm { ... }` up to the matching close brace
    fn read_asm_block(&mut self, start: SourceLocation) -> Token {
        let body_start = self.position;
        let mut depth = 1;
        while let Some(c) = self.peek() {
            if c == '{' {
                depth += 1;
            } else if c == '}' {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            self.advance();
        }
        let raw: String = self.input[body_start..self.position].iter().collect();
        if !self.match_char('}') {
            self.errors.add_error(
                FluxError::new(ErrorKind::UnterminatedAsm, "Unterminated asm block")
                    .with_span(Span::new(start, self.location())),
            );
        }
        let lexeme: String = self.input[body_start - 1..self.position].iter().collect();
        Token::new(TokenKind::AsmBlock, lexeme, Span::new(start, self.location()))
            .with_literal(LiteralValue::String(raw.trim().to_string()))
    }

    fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column, self.offset)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = *self.input.get(self.position)?;
        self.position += 1;
        self.offset += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn read_while<F>(&mut self, mut predicate: F) -> String
    where
        F: FnMut(char) -> bool,
    {
        let mut value = String::new();
        while let Some(ch) = self.peek() {
            if !predicate(ch) {
                break;
            }
            self.advance();
            value.push(ch);
        }
        value
    }
}

impl TokenSource for Lexer {
    fn next_token(&mut self) -> Token {
        loop {
            self.skip_trivia();
            if self.is_at_end() {
                return Token::eof(self.location());
            }
            if let Some(token) = self.lex_token() {
                return token;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn test_operators_use_longest_match() {
        assert_eq!(
            kinds("a **= b ** c >>= d -> e"),
            vec![
                TokenKind::Identifier,
                TokenKind::StarStarEqual,
                TokenKind::Identifier,
                TokenKind::StarStar,
                TokenKind::Identifier,
                TokenKind::ShrEqual,
                TokenKind::Identifier,
                TokenKind::Arrow,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_and_literals() {
        let tokens = Lexer::new("unsigned data{32} as u32; x = 0x1F + 2.5e3 + 'a';").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Unsigned);
        assert_eq!(tokens[1].kind, TokenKind::Data);
        assert_eq!(tokens[3].literal, Some(LiteralValue::Int(32)));
        let hex = tokens.iter().find(|t| t.lexeme == "0x1F").unwrap();
        assert_eq!(hex.literal, Some(LiteralValue::Int(31)));
        let float = tokens.iter().find(|t| t.kind == TokenKind::FloatLiteral).unwrap();
        assert_eq!(float.literal, Some(LiteralValue::Float(2500.0)));
        let ch = tokens.iter().find(|t| t.kind == TokenKind::CharLiteral).unwrap();
        assert_eq!(ch.literal, Some(LiteralValue::Char('a')));
    }

    #[test]
    fn test_bit_and_interpolated_literals() {
        let tokens = Lexer::new(r#"0b1010 i"x={} y={}""#).tokenize();
        assert_eq!(tokens[0].kind, TokenKind::BitLiteral);
        assert_eq!(tokens[0].literal, Some(LiteralValue::Bits("1010".into())));
        assert_eq!(tokens[1].kind, TokenKind::InterpolatedString);
        assert_eq!(
            tokens[1].literal,
            Some(LiteralValue::Parts(vec!["x=".into(), " y=".into(), "".into()]))
        );
    }

    #[test]
    fn test_asm_block_is_raw() {
        let tokens = Lexer::new("asm { mov eax, {1}; int 0x80 } x").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Asm);
        assert_eq!(tokens[1].kind, TokenKind::AsmBlock);
        assert_eq!(
            tokens[1].literal,
            Some(LiteralValue::String("mov eax, {1}; int 0x80".into()))
        );
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
    }

    #[test]
    fn test_spans_track_lines_and_offsets() {
        let tokens = Lexer::new("a\n  bc // note\n/* x */ d").tokenize();
        let bc = &tokens[1];
        assert_eq!(bc.span.start, SourceLocation::new(2, 3, 4));
        assert_eq!(bc.span.end, SourceLocation::new(2, 5, 6));
        assert_eq!(tokens[2].lexeme, "d");
        assert_eq!(tokens[2].span.start.line, 3);
    }

    #[test]
    fn test_lexical_errors_are_collected() {
        let mut lexer = Lexer::new("x = \"open\n$ y");
        let tokens = lexer.tokenize();
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        let errors = lexer.take_errors();
        assert_eq!(errors.error_count(), 1);
        assert_eq!(errors.errors()[0].kind, ErrorKind::UnterminatedString);
    }
}
