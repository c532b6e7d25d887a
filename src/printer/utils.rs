//! Indentation and literal escaping

use super::Printer;
use crate::ast::*;

/// Escape a string or character body for the given quote character
pub(super) fn escape(text: &str, quote: char) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            '\0' => escaped.push_str("\\0"),
            '\\' => escaped.push_str("\\\\"),
            ch if ch == quote => {
                escaped.push('\\');
                escaped.push(ch);
            }
            ch => escaped.push(ch),
        }
    }
    escaped
}

impl Printer {
    /// Adds the current indentation level to the output
    pub(super) fn indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str("    ");
        }
    }

    /// Write `items` separated by `", "`
    pub(super) fn write_separated<T>(&mut self, items: &[T], mut write: impl FnMut(&mut Self, &T)) {
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                self.output.push_str(", ");
            }
            write(self, item);
        }
    }

    /// Declarations printed as a multi-line body, separated by blank lines
    /// at the top level
    pub(super) fn has_body(decl: &Declaration) -> bool {
        match decl {
            Declaration::Namespace(_) | Declaration::Enum(_) | Declaration::Operator(_) => true,
            Declaration::Class(class) => !class.is_forward,
            Declaration::Object(object) => !object.is_forward,
            Declaration::Struct(decl) => !decl.is_forward,
            Declaration::Function(function) => function.body.is_some(),
            Declaration::Template(template) => Self::has_body(&template.inner.node),
            _ => false,
        }
    }
}
