//! Fatal syntax errors raised by the scanner and parser.

use crate::DiagnosticMessage;
use blocklify_core::text::{LineAndColumn, TextPos};
use std::fmt;
use thiserror::Error;

/// Which stage rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxErrorKind {
    /// Malformed token: unterminated literal, bad escape, invalid numeral.
    Lex,
    /// Structurally invalid token sequence.
    Parse,
    /// Nesting deeper than the parser is willing to recurse.
    ResourceExhausted,
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxErrorKind::Lex => write!(f, "lex error"),
            SyntaxErrorKind::Parse => write!(f, "parse error"),
            SyntaxErrorKind::ResourceExhausted => write!(f, "resource exhausted"),
        }
    }
}

/// A fatal error with the offending offset and its line/column.
///
/// Displays as `"<message> (<line>:<column>)"`.
#[derive(Debug, Clone, PartialEq, Eq, Error, miette::Diagnostic)]
#[error("{message} ({loc})")]
#[diagnostic(code(blocklify::syntax))]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    /// Catalogue code of the message.
    pub code: u32,
    /// Resolved message text, without the location suffix.
    pub message: String,
    /// Char offset where the error was raised.
    pub pos: TextPos,
    pub loc: LineAndColumn,
}

impl SyntaxError {
    pub fn new(
        kind: SyntaxErrorKind,
        message: &DiagnosticMessage,
        args: &[&str],
        pos: TextPos,
        loc: LineAndColumn,
    ) -> Self {
        Self {
            kind,
            code: message.code,
            message: message.format(args),
            pos,
            loc,
        }
    }

    pub fn is_lex(&self) -> bool {
        self.kind == SyntaxErrorKind::Lex
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages;

    #[test]
    fn test_syntax_error_display() {
        let err = SyntaxError::new(
            SyntaxErrorKind::Lex,
            &messages::UNTERMINATED_COMMENT,
            &[],
            0,
            LineAndColumn::new(1, 0),
        );
        assert_eq!(err.to_string(), "Unterminated comment (1:0)");
        assert!(err.is_lex());
        assert_eq!(err.code, 1001);
    }

    #[test]
    fn test_syntax_error_with_argument() {
        let err = SyntaxError::new(
            SyntaxErrorKind::Parse,
            &messages::LABEL_0_IS_ALREADY_DECLARED,
            &["outer"],
            14,
            LineAndColumn::new(2, 3),
        );
        assert_eq!(err.to_string(), "Label 'outer' is already declared (2:3)");
        assert_eq!(err.kind, SyntaxErrorKind::Parse);
    }
}
