//! Token information produced by the scanner.

use blocklify_ast::syntax_kind::SyntaxKind;
use blocklify_ast::types::TokenFlags;

/// Information about a scanned token.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenInfo {
    /// The kind of token.
    pub kind: SyntaxKind,
    /// Start offset in the source text, in chars.
    pub pos: u32,
    /// End offset in the source text (exclusive).
    pub end: u32,
    /// Cooked text: identifier name, decoded string, regex body.
    pub text: String,
    /// The token exactly as written.
    pub raw: String,
    /// Numeric value of a numeric literal.
    pub number: Option<f64>,
    /// Flags of a regular expression literal.
    pub regex_flags: Option<String>,
    /// Token flags (preceding line break, numeric format, etc.).
    pub flags: TokenFlags,
}

impl TokenInfo {
    pub fn new(kind: SyntaxKind, pos: u32, end: u32) -> Self {
        Self {
            kind,
            pos,
            end,
            text: String::new(),
            raw: String::new(),
            number: None,
            regex_flags: None,
            flags: TokenFlags::NONE,
        }
    }

    pub fn with_text(mut self, text: String) -> Self {
        self.text = text;
        self
    }

    pub fn with_raw(mut self, raw: String) -> Self {
        self.raw = raw;
        self
    }

    pub fn with_flags(mut self, flags: TokenFlags) -> Self {
        self.flags = flags;
        self
    }

    /// The length of this token in chars.
    pub fn len(&self) -> u32 {
        self.end - self.pos
    }

    /// Whether this token has zero length.
    pub fn is_empty(&self) -> bool {
        self.pos == self.end
    }

    /// Whether there was a line break before this token.
    pub fn has_preceding_line_break(&self) -> bool {
        self.flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }
}
