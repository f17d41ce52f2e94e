//! blocklify_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! Every message the pipeline can produce lives in the [`messages`]
//! catalogue. Fatal lexer and parser failures are reported as a
//! [`SyntaxError`]; non-fatal import gaps are collected as warning
//! [`Diagnostic`]s.

pub mod error;

pub use error::{SyntaxError, SyntaxErrorKind};

use blocklify_core::text::TextRange;
use std::fmt;

/// Diagnostic category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Message,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
            DiagnosticCategory::Message => write!(f, "message"),
        }
    }
}

/// A diagnostic message template with a code and category.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// The diagnostic code (1xxx lexer, 2xxx parser, 3xxx import, 4xxx generation).
    pub code: u32,
    /// The category of this diagnostic.
    pub category: DiagnosticCategory,
    /// The message template string. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
}

impl DiagnosticMessage {
    /// Fill the placeholders of this template.
    pub fn format(&self, args: &[&str]) -> String {
        format_message(self.message, args)
    }
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// The file path where this diagnostic occurred, if any.
    pub file: Option<String>,
    /// The source range where this diagnostic occurred, if any.
    pub span: Option<TextRange>,
    /// The resolved message text.
    pub message_text: String,
    /// The diagnostic code.
    pub code: u32,
    /// The category.
    pub category: DiagnosticCategory,
}

impl Diagnostic {
    /// Create a new diagnostic without location info.
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            file: None,
            span: None,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

    /// Create a new diagnostic attached to a source range.
    pub fn with_span(span: TextRange, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            span: Some(span),
            ..Self::new(message, args)
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}", file)?;
            if let Some(span) = self.span {
                write!(f, "({})", span.pos)?;
            }
            write!(f, ": ")?;
        }
        write!(f, "{} BL{}: {}", self.category, self.code, self.message_text)
    }
}

/// Format a diagnostic message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// Non-fatal diagnostics gathered over one import.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// The diagnostics ordered by start offset. Diagnostics without a span
    /// come first, and equal offsets keep the order they were added in.
    pub fn into_sorted(mut self) -> Vec<Diagnostic> {
        self.diagnostics
            .sort_by_key(|diagnostic| diagnostic.span.map(|span| span.pos));
        self.diagnostics
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Error, message: $msg }
        };
        ($code:expr, Warning, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Warning, message: $msg }
        };
        ($code:expr, Message, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Message, message: $msg }
        };
    }

    // ========================================================================
    // Lexer errors (1000-1099)
    // ========================================================================
    pub const UNTERMINATED_COMMENT: DiagnosticMessage = diag!(1001, Error, "Unterminated comment");
    pub const UNTERMINATED_STRING_CONSTANT: DiagnosticMessage = diag!(1002, Error, "Unterminated string constant");
    pub const UNTERMINATED_REGULAR_EXPRESSION: DiagnosticMessage = diag!(1003, Error, "Unterminated regular expression");
    pub const INVALID_REGEXP_FLAG: DiagnosticMessage = diag!(1004, Error, "Invalid regexp flag");
    pub const EXPECTED_HEXADECIMAL_NUMBER: DiagnosticMessage = diag!(1005, Error, "Expected hexadecimal number");
    pub const IDENTIFIER_DIRECTLY_AFTER_NUMBER: DiagnosticMessage = diag!(1006, Error, "Identifier directly after number");
    pub const INVALID_NUMBER: DiagnosticMessage = diag!(1007, Error, "Invalid number");
    pub const OCTAL_LITERAL_IN_STRICT_MODE: DiagnosticMessage = diag!(1008, Error, "Octal literal in strict mode");
    pub const BAD_CHARACTER_ESCAPE_SEQUENCE: DiagnosticMessage = diag!(1009, Error, "Bad character escape sequence");
    pub const EXPECTING_UNICODE_ESCAPE_SEQUENCE: DiagnosticMessage = diag!(1010, Error, "Expecting Unicode escape sequence \\uXXXX");
    pub const INVALID_UNICODE_ESCAPE: DiagnosticMessage = diag!(1011, Error, "Invalid Unicode escape");
    pub const THE_KEYWORD_0_IS_RESERVED: DiagnosticMessage = diag!(1012, Error, "The keyword '{0}' is reserved");
    pub const UNEXPECTED_CHARACTER_0: DiagnosticMessage = diag!(1013, Error, "Unexpected character '{0}'");

    // ========================================================================
    // Parser errors (2000-2099)
    // ========================================================================
    pub const UNEXPECTED_TOKEN: DiagnosticMessage = diag!(2001, Error, "Unexpected token");
    pub const RETURN_OUTSIDE_OF_FUNCTION: DiagnosticMessage = diag!(2002, Error, "'return' outside of function");
    pub const UNSYNTACTIC_0: DiagnosticMessage = diag!(2003, Error, "Unsyntactic {0}");
    pub const MULTIPLE_DEFAULT_CLAUSES: DiagnosticMessage = diag!(2004, Error, "Multiple default clauses");
    pub const ILLEGAL_NEWLINE_AFTER_THROW: DiagnosticMessage = diag!(2005, Error, "Illegal newline after throw");
    pub const MISSING_CATCH_OR_FINALLY_CLAUSE: DiagnosticMessage = diag!(2006, Error, "Missing catch or finally clause");
    pub const WITH_IN_STRICT_MODE: DiagnosticMessage = diag!(2007, Error, "'with' in strict mode");
    pub const LABEL_0_IS_ALREADY_DECLARED: DiagnosticMessage = diag!(2008, Error, "Label '{0}' is already declared");
    pub const ASSIGNING_TO_RVALUE: DiagnosticMessage = diag!(2009, Error, "Assigning to rvalue");
    pub const ASSIGNING_TO_0_IN_STRICT_MODE: DiagnosticMessage = diag!(2010, Error, "Assigning to {0} in strict mode");
    pub const BINDING_0_IN_STRICT_MODE: DiagnosticMessage = diag!(2011, Error, "Binding {0} in strict mode");
    pub const DELETING_LOCAL_VARIABLE_IN_STRICT_MODE: DiagnosticMessage = diag!(2012, Error, "Deleting local variable in strict mode");
    pub const REDEFINITION_OF_PROPERTY: DiagnosticMessage = diag!(2013, Error, "Redefinition of property");
    pub const DEFINING_0_IN_STRICT_MODE: DiagnosticMessage = diag!(2014, Error, "Defining '{0}' in strict mode");
    pub const ARGUMENT_NAME_CLASH_IN_STRICT_MODE: DiagnosticMessage = diag!(2015, Error, "Argument name clash in strict mode");
    pub const MAXIMUM_NESTING_DEPTH_EXCEEDED: DiagnosticMessage = diag!(2016, Error, "Maximum nesting depth exceeded");

    // ========================================================================
    // Import gaps (3000-3099)
    // ========================================================================
    pub const NODE_KIND_0_HAS_NO_BLOCK_MAPPING: DiagnosticMessage = diag!(3001, Warning, "Node kind '{0}' has no block mapping; imported as a placeholder");
    pub const NO_PATTERN_MATCHED_NODE_KIND_0: DiagnosticMessage = diag!(3002, Warning, "No pattern recognizer matched node kind '{0}'; imported as a placeholder");
    pub const RECOGNIZED_0_AS_1: DiagnosticMessage = diag!(3003, Message, "Recognized '{0}' as '{1}'");

    // ========================================================================
    // Generation errors (4000-4099)
    // ========================================================================
    pub const LANGUAGE_0_DOES_NOT_KNOW_BLOCK_TYPE_1: DiagnosticMessage = diag!(4001, Error, "Language \"{0}\" does not know how to generate code for block type \"{1}\".");
    pub const BLOCK_0_IS_MISSING_INPUT_1: DiagnosticMessage = diag!(4002, Error, "Block \"{0}\" is missing input \"{1}\".");
    pub const BLOCK_0_IS_MISSING_FIELD_1: DiagnosticMessage = diag!(4003, Error, "Block \"{0}\" is missing field \"{1}\".");
    pub const BLOCK_0_HAS_INVALID_MUTATION_1: DiagnosticMessage = diag!(4004, Error, "Block \"{0}\" has an invalid \"{1}\" mutation.");
    pub const BLOCK_0_HAS_INVALID_VALUE_1_IN_FIELD_2: DiagnosticMessage = diag!(4005, Error, "Block \"{0}\" has an invalid value \"{1}\" in field \"{2}\".");
    pub const PLACEHOLDER_FOR_0_CANNOT_BE_GENERATED: DiagnosticMessage = diag!(4006, Error, "Placeholder for unsupported node kind '{0}' cannot be generated.");
    pub const BLOCK_0_CANNOT_BE_USED_AS_A_VALUE: DiagnosticMessage = diag!(4007, Error, "Block \"{0}\" cannot be used as a value.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        let msg = format_message("The keyword '{0}' is reserved", &["enum"]);
        assert_eq!(msg, "The keyword 'enum' is reserved");
    }

    #[test]
    fn test_format_message_two_args() {
        let msg = messages::LANGUAGE_0_DOES_NOT_KNOW_BLOCK_TYPE_1.format(&["JavaScript", "foo"]);
        assert_eq!(
            msg,
            "Language \"JavaScript\" does not know how to generate code for block type \"foo\"."
        );
    }

    #[test]
    fn test_diagnostic_display() {
        let mut diag = Diagnostic::with_span(
            TextRange::new(10, 15),
            &messages::NODE_KIND_0_HAS_NO_BLOCK_MAPPING,
            &["TryStatement"],
        );
        assert_eq!(
            diag.to_string(),
            "warning BL3001: Node kind 'TryStatement' has no block mapping; imported as a placeholder"
        );
        diag.file = Some("input.js".to_string());
        let display = format!("{}", diag);
        assert!(display.starts_with("input.js(10): warning BL3001"));
        assert!(display.contains("TryStatement"));
    }

    #[test]
    fn test_diagnostic_without_location() {
        let diag = Diagnostic::new(&messages::UNEXPECTED_TOKEN, &[]);
        assert!(diag.file.is_none());
        assert!(diag.span.is_none());
        assert_eq!(diag.code, 2001);
        assert_eq!(diag.category, DiagnosticCategory::Error);
    }

    #[test]
    fn test_diagnostic_collection_orders_by_offset() {
        let gap = |pos, kind| {
            Diagnostic::with_span(
                TextRange::new(pos, pos + 1),
                &messages::NODE_KIND_0_HAS_NO_BLOCK_MAPPING,
                &[kind],
            )
        };
        let mut collection = DiagnosticCollection::new();
        collection.add(gap(10, "B"));
        collection.add(gap(5, "A"));
        collection.add(gap(10, "C"));
        collection.add(Diagnostic::new(&messages::UNEXPECTED_TOKEN, &[]));

        let sorted = collection.into_sorted();
        assert_eq!(sorted.len(), 4);
        assert!(sorted[0].span.is_none());
        assert!(sorted[1].message_text.contains("'A'"));
        assert!(sorted[2].message_text.contains("'B'"));
        assert!(sorted[3].message_text.contains("'C'"));
    }
}
