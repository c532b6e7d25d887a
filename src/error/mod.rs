//! Diagnostics for the Flux front end
//!
//! This module provides the error type shared by the lexer and the parser,
//! source location tracking, the collection that acts as the diagnostics
//! sink, and a formatter that renders errors with a source snippet.

mod conversions;

pub use conversions::IntoFluxError;

use colored::*;
use serde::Serialize;
use std::fmt;

/// A position in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct SourceLocation {
    /// 1-based line number
    pub line: usize,
    /// 1-based column number, counted in characters
    pub column: usize,
    /// Byte offset from the start of the source
    pub offset: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open source range: `start` is the first character, `end` is one
/// past the last character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl Span {
    pub fn new(start: SourceLocation, end: SourceLocation) -> Self {
        Self { start, end }
    }

    /// An empty span sitting at `location`
    pub fn single(location: SourceLocation) -> Self {
        Self {
            start: location,
            end: location,
        }
    }

    /// Smallest span covering both `self` and `other`
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Span from the start of `self` to the end of `other`
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start,
            end: other.end.max(self.end),
        }
    }

    /// Whether `other` lies entirely inside `self`
    pub fn contains(&self, other: &Span) -> bool {
        self.start.offset <= other.start.offset && other.end.offset <= self.end.offset
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    pub fn start_line(&self) -> usize {
        self.start.line
    }

    pub fn start_column(&self) -> usize {
        self.start.column
    }

    pub fn end_line(&self) -> usize {
        self.end.line
    }

    pub fn end_column(&self) -> usize {
        self.end.column
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Error context providing additional information
#[derive(Debug, Clone, Default, Serialize)]
pub struct ErrorContext {
    pub span: Option<Span>,
    pub note: Option<String>,
    pub help: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// A single diagnostic produced by the lexer, the parser or the driver
#[derive(Debug, Clone, Serialize)]
pub struct FluxError {
    pub kind: ErrorKind,
    pub message: String,
    pub context: ErrorContext,
}

impl FluxError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: ErrorContext::new(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.context.span = Some(span);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.context.note = Some(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.context.help = Some(help.into());
        self
    }

    pub fn span(&self) -> Option<Span> {
        self.context.span
    }

    /// Stable diagnostic code, e.g. `E0101`
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

/// Broad classes of failure, mirroring how the parser recovers from each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCategory {
    /// Malformed characters or literals in the source text
    Lexical,
    /// A required token was missing; recovered with a synthetic token
    ExpectedToken,
    /// Well-formed tokens in a place the grammar does not allow them
    Structural,
    /// Recovery had to give up on a region of input
    Catastrophic,
    /// Driver-level failures (I/O, serialisation)
    Driver,
}

/// Categories of errors that can occur
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    // Lexer errors
    InvalidCharacter,
    UnterminatedString,
    UnterminatedComment,
    UnterminatedAsm,
    InvalidNumber,
    InvalidEscape,

    // Parser: expected-token errors
    ExpectedToken,
    UnexpectedEof,
    ExpectedExpression,
    ExpectedType,
    ExpectedDeclaration,
    ExpectedStatement,

    // Parser: structural errors
    InvalidAssignmentTarget,
    MissingDefaultCase,
    DuplicateDefaultCase,
    FunctionInClass,
    MisplacedDeclaration,
    InvalidExclusion,
    MisplacedJump,
    TopLevelStatement,
    InterpolationMismatch,
    NestingTooDeep,

    // Driver errors
    InternalError,
    IoError,
    SerializationError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidCharacter => "invalid character",
            ErrorKind::UnterminatedString => "unterminated string",
            ErrorKind::UnterminatedComment => "unterminated comment",
            ErrorKind::UnterminatedAsm => "unterminated asm block",
            ErrorKind::InvalidNumber => "invalid number",
            ErrorKind::InvalidEscape => "invalid escape sequence",
            ErrorKind::ExpectedToken => "expected token",
            ErrorKind::UnexpectedEof => "unexpected end of file",
            ErrorKind::ExpectedExpression => "expected expression",
            ErrorKind::ExpectedType => "expected type",
            ErrorKind::ExpectedDeclaration => "expected declaration",
            ErrorKind::ExpectedStatement => "expected statement",
            ErrorKind::InvalidAssignmentTarget => "invalid assignment target",
            ErrorKind::MissingDefaultCase => "missing default case",
            ErrorKind::DuplicateDefaultCase => "duplicate default case",
            ErrorKind::FunctionInClass => "function in class body",
            ErrorKind::MisplacedDeclaration => "misplaced declaration",
            ErrorKind::InvalidExclusion => "invalid exclusion",
            ErrorKind::MisplacedJump => "misplaced jump",
            ErrorKind::TopLevelStatement => "top-level statement",
            ErrorKind::InterpolationMismatch => "interpolation mismatch",
            ErrorKind::NestingTooDeep => "nesting too deep",
            ErrorKind::InternalError => "internal error",
            ErrorKind::IoError => "I/O error",
            ErrorKind::SerializationError => "serialization error",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidCharacter => "E0001",
            ErrorKind::UnterminatedString => "E0002",
            ErrorKind::UnterminatedComment => "E0003",
            ErrorKind::UnterminatedAsm => "E0004",
            ErrorKind::InvalidNumber => "E0005",
            ErrorKind::InvalidEscape => "E0006",
            ErrorKind::ExpectedToken => "E0101",
            ErrorKind::UnexpectedEof => "E0102",
            ErrorKind::ExpectedExpression => "E0103",
            ErrorKind::ExpectedType => "E0104",
            ErrorKind::ExpectedDeclaration => "E0105",
            ErrorKind::ExpectedStatement => "E0106",
            ErrorKind::InvalidAssignmentTarget => "E0201",
            ErrorKind::MissingDefaultCase => "E0202",
            ErrorKind::DuplicateDefaultCase => "E0203",
            ErrorKind::FunctionInClass => "E0204",
            ErrorKind::MisplacedDeclaration => "E0205",
            ErrorKind::InvalidExclusion => "E0206",
            ErrorKind::MisplacedJump => "E0207",
            ErrorKind::TopLevelStatement => "E0208",
            ErrorKind::InterpolationMismatch => "E0209",
            ErrorKind::NestingTooDeep => "E0301",
            ErrorKind::InternalError => "E0900",
            ErrorKind::IoError => "E0901",
            ErrorKind::SerializationError => "E0902",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorKind::InvalidCharacter
            | ErrorKind::UnterminatedString
            | ErrorKind::UnterminatedComment
            | ErrorKind::UnterminatedAsm
            | ErrorKind::InvalidNumber
            | ErrorKind::InvalidEscape => ErrorCategory::Lexical,
            ErrorKind::ExpectedToken
            | ErrorKind::UnexpectedEof
            | ErrorKind::ExpectedExpression
            | ErrorKind::ExpectedType
            | ErrorKind::ExpectedDeclaration
            | ErrorKind::ExpectedStatement => ErrorCategory::ExpectedToken,
            ErrorKind::InvalidAssignmentTarget
            | ErrorKind::MissingDefaultCase
            | ErrorKind::DuplicateDefaultCase
            | ErrorKind::FunctionInClass
            | ErrorKind::MisplacedDeclaration
            | ErrorKind::InvalidExclusion
            | ErrorKind::MisplacedJump
            | ErrorKind::TopLevelStatement
            | ErrorKind::InterpolationMismatch => ErrorCategory::Structural,
            ErrorKind::NestingTooDeep => ErrorCategory::Catastrophic,
            ErrorKind::InternalError | ErrorKind::IoError | ErrorKind::SerializationError => {
                ErrorCategory::Driver
            }
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FluxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context.span {
            Some(span) => write!(f, "{}: {}[{}]: {}", span, self.kind, self.code(), self.message)?,
            None => write!(f, "{}[{}]: {}", self.kind, self.code(), self.message)?,
        }

        if let Some(note) = &self.context.note {
            write!(f, "\nnote: {}", note)?;
        }

        if let Some(help) = &self.context.help {
            write!(f, "\nhelp: {}", help)?;
        }

        Ok(())
    }
}

impl std::error::Error for FluxError {}

/// Format error with source code snippet
pub struct ErrorFormatter<'a> {
    error: &'a FluxError,
    source: &'a str,
    filename: Option<&'a str>,
    use_color: bool,
}

impl<'a> ErrorFormatter<'a> {
    pub fn new(error: &'a FluxError, source: &'a str) -> Self {
        Self {
            error,
            source,
            filename: None,
            use_color: true,
        }
    }

    pub fn with_filename(mut self, filename: &'a str) -> Self {
        self.filename = Some(filename);
        self
    }

    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    pub fn format(&self) -> String {
        let mut output = String::new();

        if let Some(span) = &self.error.context.span {
            let location = match self.filename {
                Some(filename) => format!("{}:{}:{}", filename, span.start.line, span.start.column),
                None => format!("{}:{}", span.start.line, span.start.column),
            };
            output.push_str(&if self.use_color {
                location.bold().to_string()
            } else {
                location
            });
            output.push_str(": ");
        }

        let error_kind = format!("error[{}]", self.error.code());
        let error_label = if self.use_color {
            error_kind.red().bold().to_string()
        } else {
            error_kind
        };

        output.push_str(&format!("{}: {}\n", error_label, self.error.message));

        if let Some(span) = &self.error.context.span {
            if let Some(snippet) = self.extract_snippet(span) {
                output.push_str(&snippet);
            }
        }

        if let Some(note) = &self.error.context.note {
            let note_label = if self.use_color {
                "note".blue().bold()
            } else {
                "note".into()
            };
            output.push_str(&format!("\n{}: {}", note_label, note));
        }

        if let Some(help) = &self.error.context.help {
            let help_label = if self.use_color {
                "help".green().bold()
            } else {
                "help".into()
            };
            output.push_str(&format!("\n{}: {}", help_label, help));
        }

        output
    }

    fn extract_snippet(&self, span: &Span) -> Option<String> {
        let lines: Vec<&str> = self.source.lines().collect();

        // Line numbers are 1-based
        if span.start.line == 0 || span.start.line > lines.len() {
            return None;
        }

        let line = lines[span.start.line - 1];
        let gutter_width = span.start.line.to_string().len() + 2;

        let line_num = span.start.line.to_string();
        let line_num_str = if self.use_color {
            line_num.blue().bold().to_string()
        } else {
            line_num
        };
        let separator = if self.use_color {
            "|".blue().to_string()
        } else {
            "|".to_string()
        };

        let mut snippet = format!(
            "{:>width$} {} {}\n",
            line_num_str,
            separator,
            line,
            width = gutter_width - 2
        );

        let padding = " ".repeat(gutter_width);
        let pointer_padding = " ".repeat(span.start.column.saturating_sub(1));
        let pointer_length = if span.start.line == span.end.line {
            span.end.column.saturating_sub(span.start.column).max(1)
        } else {
            1
        };
        let pointer = "^".repeat(pointer_length);
        let pointer_str = if self.use_color {
            pointer.red().bold().to_string()
        } else {
            pointer
        };

        snippet.push_str(&format!(
            "{} {} {}{}",
            padding, separator, pointer_padding, pointer_str
        ));

        Some(snippet)
    }
}

/// Result type for fallible driver operations
pub type Result<T> = std::result::Result<T, FluxError>;

/// Receiver of diagnostics. The parser reports every recoverable failure
/// through this interface and never unwinds across it.
pub trait DiagnosticsSink {
    fn add_error(&mut self, error: FluxError);
}

/// Collection of errors for reporting multiple issues
#[derive(Debug, Default, Serialize)]
pub struct ErrorCollection {
    errors: Vec<FluxError>,
    warnings: Vec<FluxError>,
    #[serde(skip)]
    limit: Option<usize>,
}

impl ErrorCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `limit` errors; later ones are dropped
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn add_error(&mut self, error: FluxError) {
        if self.limit.map_or(true, |limit| self.errors.len() < limit) {
            self.errors.push(error);
        }
    }

    pub fn add_warning(&mut self, warning: FluxError) {
        self.warnings.push(warning);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    pub fn errors(&self) -> &[FluxError] {
        &self.errors
    }

    pub fn warnings(&self) -> &[FluxError] {
        &self.warnings
    }

    /// Drop every error recorded after the first `len`
    pub(crate) fn truncate(&mut self, len: usize) {
        self.errors.truncate(len);
    }

    /// Append all diagnostics of `other`, then restore source order
    pub fn merge(&mut self, other: ErrorCollection) {
        for error in other.errors {
            self.add_error(error);
        }
        self.warnings.extend(other.warnings);
        self.sort_by_location();
    }

    /// Stable sort by start offset; diagnostics without a span go last
    pub fn sort_by_location(&mut self) {
        self.errors
            .sort_by_key(|error| error.span().map_or(usize::MAX, |span| span.start.offset));
    }

    pub fn into_errors(self) -> Vec<FluxError> {
        self.errors
    }
}

impl DiagnosticsSink for ErrorCollection {
    fn add_error(&mut self, error: FluxError) {
        ErrorCollection::add_error(self, error);
    }
}

impl fmt::Display for ErrorCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "error: {}", error)?;
        }

        for warning in &self.warnings {
            writeln!(f, "warning: {}", warning)?;
        }

        if !self.is_empty() {
            write!(
                f,
                "\n{} error(s), {} warning(s)",
                self.error_count(),
                self.warning_count()
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(line: usize, column: usize, offset: usize) -> SourceLocation {
        SourceLocation::new(line, column, offset)
    }

    #[test]
    fn test_span_merge_and_contains() {
        let a = Span::new(at(1, 1, 0), at(1, 4, 3));
        let b = Span::new(at(1, 6, 5), at(2, 2, 9));
        let merged = a.merge(b);
        assert_eq!(merged.start, a.start);
        assert_eq!(merged.end, b.end);
        assert!(merged.contains(&a));
        assert!(merged.contains(&b));
        assert!(!a.contains(&b));
    }

    #[test]
    fn test_collection_limit() {
        let mut errors = ErrorCollection::with_limit(Some(2));
        for _ in 0..5 {
            errors.add_error(FluxError::new(ErrorKind::ExpectedToken, "expected ';'"));
        }
        assert_eq!(errors.error_count(), 2);
    }

    #[test]
    fn test_formatter_without_color() {
        let source = "int x = ;\n";
        let error = FluxError::new(ErrorKind::ExpectedExpression, "Expected expression, found ';'")
            .with_span(Span::new(at(1, 9, 8), at(1, 10, 9)))
            .with_help("add a value after '='");
        let rendered = ErrorFormatter::new(&error, source)
            .with_filename("main.fx")
            .with_color(false)
            .format();
        assert!(rendered.starts_with("main.fx:1:9: error[E0103]: Expected expression"));
        assert!(rendered.contains("1 | int x = ;"));
        assert!(rendered.contains("^"));
        assert!(rendered.ends_with("help: add a value after '='"));
    }
}
