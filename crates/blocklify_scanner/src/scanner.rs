//! The JavaScript scanner/lexer.
//!
//! Converts source text into tokens on demand. Whether a `/` starts a
//! regular expression or is a division operator depends on the previous
//! token: the scanner keeps a `regex_allowed` flag that is recomputed from
//! every token it produces, and callers may override it through
//! [`Scanner::next_token`] or [`Scanner::rescan_slash_token`].

use crate::char_codes::*;
use crate::reserved::{is_reserved_word_3, is_reserved_word_5, is_strict_reserved_word};
use crate::token::TokenInfo;
use blocklify_ast::syntax_kind::SyntaxKind;
use blocklify_ast::types::TokenFlags;
use blocklify_core::text::{LineAndColumn, LineMap, TextPos};
use blocklify_diagnostics::{messages, DiagnosticMessage, SyntaxError, SyntaxErrorKind};
use blocklify_options::{EcmaVersion, ParserOptions};
use regex::Regex;
use std::sync::OnceLock;

/// A comment skipped while scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// `/* ... */` rather than a line comment.
    pub block: bool,
    /// The comment text without its delimiters.
    pub text: String,
    /// Offset of the opening delimiter.
    pub start: TextPos,
    /// Offset just past the comment.
    pub end: TextPos,
}

fn is_valid_regexp_flags(flags: &str) -> bool {
    static FLAGS: OnceLock<Option<Regex>> = OnceLock::new();
    FLAGS
        .get_or_init(|| Regex::new("^[gmsiy]*$").ok())
        .as_ref()
        .map_or(false, |re| re.is_match(flags))
}

/// The scanner converts JavaScript source text into tokens.
pub struct Scanner {
    /// The source text being scanned.
    text: Vec<char>,
    /// Line starts, for error locations.
    line_map: LineMap,
    /// Current position in the text.
    pos: usize,
    /// Start of the current token (after leading trivia).
    token_start: usize,
    /// The current token kind.
    token: SyntaxKind,
    /// Cooked value of the current token.
    token_value: String,
    /// Value of the current numeric literal.
    token_number: Option<f64>,
    /// Flags of the current regular expression literal.
    token_regex_flags: String,
    /// Token flags for the current token.
    token_flags: TokenFlags,
    /// End of the previous token.
    last_end: usize,
    /// Whether a `/` at the next token starts a regular expression.
    regex_allowed: bool,
    /// The `regex_allowed` value the current token was scanned with.
    token_regex_allowed: bool,
    strict: bool,
    ecma_version: EcmaVersion,
    forbid_reserved: bool,
    record_comments: bool,
    comments: Vec<Comment>,
    /// Comments starting before this offset have already been recorded.
    comments_end: usize,
}

impl Scanner {
    /// Create a new scanner for the given source text with default options.
    pub fn new(text: &str) -> Self {
        Self::with_options(text, &ParserOptions::default())
    }

    /// Create a scanner honoring the reserved-word settings of `options`.
    pub fn with_options(text: &str, options: &ParserOptions) -> Self {
        let text: Vec<char> = text.chars().collect();
        let line_map = LineMap::from_chars(&text);
        Self {
            text,
            line_map,
            pos: 0,
            token_start: 0,
            token: SyntaxKind::Unknown,
            token_value: String::new(),
            token_number: None,
            token_regex_flags: String::new(),
            token_flags: TokenFlags::NONE,
            last_end: 0,
            regex_allowed: true,
            token_regex_allowed: true,
            strict: false,
            ecma_version: options.ecma_version,
            forbid_reserved: options.forbid_reserved,
            record_comments: false,
            comments: Vec::new(),
            comments_end: 0,
        }
    }

    /// Get the full source text length.
    pub fn text_len(&self) -> usize {
        self.text.len()
    }

    /// Enter or leave strict mode. Affects reserved words, octal literals
    /// and octal escapes of tokens scanned from now on.
    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Record skipped comments so they can be collected with
    /// [`Scanner::take_comments`].
    pub fn set_record_comments(&mut self, record: bool) {
        self.record_comments = record;
    }

    /// Override whether a `/` at the next token starts a regular expression.
    pub fn set_regex_allowed(&mut self, allowed: bool) {
        self.regex_allowed = allowed;
    }

    /// Take the comments recorded so far, in source order.
    pub fn take_comments(&mut self) -> Vec<Comment> {
        std::mem::take(&mut self.comments)
    }

    /// Get the current token kind.
    #[inline]
    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    /// Get the current token's cooked value.
    #[inline]
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    /// Get the value of the current numeric literal.
    #[inline]
    pub fn token_number(&self) -> Option<f64> {
        self.token_number
    }

    /// Get the flags of the current regular expression literal.
    #[inline]
    pub fn token_regex_flags(&self) -> &str {
        &self.token_regex_flags
    }

    /// Get the start position of the current token (after trivia).
    #[inline]
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    /// Get the current position (end of current token).
    #[inline]
    pub fn token_end(&self) -> usize {
        self.pos
    }

    /// Get the end of the token before the current one.
    #[inline]
    pub fn last_end(&self) -> usize {
        self.last_end
    }

    /// Get the current token flags.
    #[inline]
    pub fn token_flags(&self) -> TokenFlags {
        self.token_flags
    }

    /// Whether the current token was preceded by a line break.
    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.token_flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }

    /// The source text of the current token, exactly as written.
    pub fn token_text(&self) -> String {
        self.get_text_slice(self.token_start, self.pos)
    }

    /// Get a TokenInfo for the current token.
    pub fn token_info(&self) -> TokenInfo {
        let mut info = TokenInfo::new(self.token, self.token_start as u32, self.pos as u32)
            .with_text(self.token_value.clone())
            .with_raw(self.token_text())
            .with_flags(self.token_flags);
        info.number = self.token_number;
        if self.token == SyntaxKind::RegularExpressionLiteral {
            info.regex_flags = Some(self.token_regex_flags.clone());
        }
        info
    }

    /// Line and column of a char offset.
    pub fn line_and_column_of(&self, pos: TextPos) -> LineAndColumn {
        self.line_map.line_and_column_of(pos)
    }

    /// Get a slice of the source text as a String.
    pub fn get_text_slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.text.len());
        let start = start.min(end);
        self.text[start..end].iter().collect()
    }

    /// Reset the scanner to a specific position.
    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
        self.last_end = pos;
        self.token_start = pos;
        self.token = SyntaxKind::Unknown;
        self.token_value.clear();
        self.token_number = None;
        self.token_regex_flags.clear();
        self.token_flags = TokenFlags::NONE;
    }

    /// Scan one token starting at `pos`, with an explicit answer to whether
    /// a `/` there starts a regular expression.
    pub fn next_token(&mut self, pos: TextPos, regex_allowed: bool) -> Result<TokenInfo, SyntaxError> {
        self.set_pos(pos as usize);
        self.regex_allowed = regex_allowed;
        self.scan()?;
        Ok(self.token_info())
    }

    /// Scan the whole remaining input, ending with the end-of-file token.
    pub fn tokenize(&mut self) -> Result<Vec<TokenInfo>, SyntaxError> {
        let mut tokens = Vec::new();
        loop {
            let kind = self.scan()?;
            tokens.push(self.token_info());
            if kind == SyntaxKind::EndOfFileToken {
                return Ok(tokens);
            }
        }
    }

    /// Scan the current token again from the end of the previous one.
    /// Used after the strictness changed under an already scanned token.
    pub fn rescan_current_token(&mut self) -> Result<SyntaxKind, SyntaxError> {
        self.pos = self.last_end;
        self.regex_allowed = self.token_regex_allowed;
        self.scan()
    }

    /// Rescan the current `/` or `/=` token as a regex literal (called by
    /// the parser at the start of a statement).
    pub fn rescan_slash_token(&mut self) -> Result<SyntaxKind, SyntaxError> {
        self.pos = self.token_start + 1;
        self.token_value.clear();
        self.token_regex_flags.clear();
        self.token = self.scan_regex()?;
        self.regex_allowed = false;
        Ok(self.token)
    }

    // ========================================================================
    // Character access
    // ========================================================================

    /// Look at the character at the current position without advancing.
    #[inline]
    fn current_char(&self) -> Option<char> {
        self.text.get(self.pos).copied()
    }

    /// Look at the character at position pos + offset.
    #[inline]
    fn char_at(&self, offset: usize) -> Option<char> {
        self.text.get(self.pos + offset).copied()
    }

    /// Whether we've reached the end of the text.
    #[inline]
    fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn error(&self, pos: usize, message: &DiagnosticMessage, args: &[&str]) -> SyntaxError {
        let pos = pos as TextPos;
        SyntaxError::new(
            SyntaxErrorKind::Lex,
            message,
            args,
            pos,
            self.line_map.line_and_column_of(pos),
        )
    }

    // ========================================================================
    // Trivia
    // ========================================================================

    /// Skip whitespace and comments, setting token_flags for line breaks.
    fn skip_trivia(&mut self) -> Result<(), SyntaxError> {
        while let Some(ch) = self.current_char() {
            match ch {
                CARRIAGE_RETURN => {
                    self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                    self.pos += 1;
                    if self.current_char() == Some(LINE_FEED) {
                        self.pos += 1;
                    }
                }
                LINE_FEED | LINE_SEPARATOR | PARAGRAPH_SEPARATOR => {
                    self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                    self.pos += 1;
                }
                '/' if self.char_at(1) == Some('*') => self.skip_block_comment()?,
                '/' if self.char_at(1) == Some('/') => self.skip_line_comment(2),
                // `<!--` always opens a line comment.
                '<' if self.char_at(1) == Some('!')
                    && self.char_at(2) == Some('-')
                    && self.char_at(3) == Some('-') =>
                {
                    self.skip_line_comment(4)
                }
                // `-->` only at the start of a line.
                '-' if self.char_at(1) == Some('-')
                    && self.char_at(2) == Some('>')
                    && self.has_preceding_line_break() =>
                {
                    self.skip_line_comment(3)
                }
                c if is_white_space_single_line(c) => {
                    self.pos += 1;
                }
                _ => return Ok(()),
            }
        }
        Ok(())
    }

    fn skip_block_comment(&mut self) -> Result<(), SyntaxError> {
        let start = self.pos;
        self.pos += 2;
        loop {
            match self.current_char() {
                None => return Err(self.error(start, &messages::UNTERMINATED_COMMENT, &[])),
                Some('*') if self.char_at(1) == Some('/') => {
                    self.pos += 2;
                    break;
                }
                Some(ch) => {
                    if is_line_break(ch) {
                        self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                    }
                    self.pos += 1;
                }
            }
        }
        self.record_comment(true, start, start + 2, self.pos - 2);
        Ok(())
    }

    fn skip_line_comment(&mut self, delimiter_len: usize) {
        let start = self.pos;
        self.pos += delimiter_len;
        while !self.is_eof() && !is_line_break(self.text[self.pos]) {
            self.pos += 1;
        }
        self.record_comment(false, start, start + delimiter_len, self.pos);
    }

    fn record_comment(&mut self, block: bool, start: usize, text_start: usize, text_end: usize) {
        if !self.record_comments || start < self.comments_end {
            return;
        }
        self.comments.push(Comment {
            block,
            text: self.get_text_slice(text_start, text_end),
            start: start as TextPos,
            end: self.pos as TextPos,
        });
        self.comments_end = self.pos;
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    /// Scan the next token and return its kind.
    pub fn scan(&mut self) -> Result<SyntaxKind, SyntaxError> {
        self.last_end = self.pos;
        self.token_flags = TokenFlags::NONE;
        self.token_value.clear();
        self.token_number = None;
        self.token_regex_flags.clear();
        self.token_regex_allowed = self.regex_allowed;

        self.skip_trivia()?;
        self.token_start = self.pos;

        let ch = match self.current_char() {
            Some(ch) => ch,
            None => {
                self.token = SyntaxKind::EndOfFileToken;
                return Ok(self.token);
            }
        };

        self.token = match ch {
            '(' => { self.pos += 1; SyntaxKind::OpenParenToken }
            ')' => { self.pos += 1; SyntaxKind::CloseParenToken }
            '{' => { self.pos += 1; SyntaxKind::OpenBraceToken }
            '}' => { self.pos += 1; SyntaxKind::CloseBraceToken }
            '[' => { self.pos += 1; SyntaxKind::OpenBracketToken }
            ']' => { self.pos += 1; SyntaxKind::CloseBracketToken }
            ';' => { self.pos += 1; SyntaxKind::SemicolonToken }
            ',' => { self.pos += 1; SyntaxKind::CommaToken }
            ':' => { self.pos += 1; SyntaxKind::ColonToken }
            '?' => { self.pos += 1; SyntaxKind::QuestionToken }
            '~' => { self.pos += 1; SyntaxKind::TildeToken }

            '.' => self.scan_dot()?,
            '<' => self.scan_less_than(),
            '>' => self.scan_greater_than(),
            '=' => self.scan_equals(),
            '!' => self.scan_exclamation(),
            '+' => self.scan_plus(),
            '-' => self.scan_minus(),
            '*' => self.scan_asterisk(),
            '/' => self.scan_slash()?,
            '%' => self.scan_percent(),
            '&' => self.scan_ampersand(),
            '|' => self.scan_bar(),
            '^' => self.scan_caret(),

            '\'' | '"' => self.scan_string_literal(ch)?,

            '0' if matches!(self.char_at(1), Some('x' | 'X')) => self.scan_hex_number()?,
            '0'..='9' => self.scan_number(false)?,

            BACKSLASH => self.scan_identifier()?,
            _ if is_identifier_start(ch) => self.scan_identifier()?,

            _ => {
                return Err(self.error(
                    self.pos,
                    &messages::UNEXPECTED_CHARACTER_0,
                    &[&ch.to_string()],
                ));
            }
        };

        self.regex_allowed = self.token.is_before_expr();
        Ok(self.token)
    }

    // ========================================================================
    // Token-specific scanning methods
    // ========================================================================

    fn scan_dot(&mut self) -> Result<SyntaxKind, SyntaxError> {
        if self.char_at(1).map_or(false, is_digit) {
            self.scan_number(true)
        } else {
            self.pos += 1;
            Ok(SyntaxKind::DotToken)
        }
    }

    fn scan_less_than(&mut self) -> SyntaxKind {
        if self.char_at(1) == Some('<') {
            if self.char_at(2) == Some('=') {
                self.pos += 3;
                SyntaxKind::LessThanLessThanEqualsToken
            } else {
                self.pos += 2;
                SyntaxKind::LessThanLessThanToken
            }
        } else if self.char_at(1) == Some('=') {
            self.pos += 2;
            SyntaxKind::LessThanEqualsToken
        } else {
            self.pos += 1;
            SyntaxKind::LessThanToken
        }
    }

    fn scan_greater_than(&mut self) -> SyntaxKind {
        if self.char_at(1) == Some('>') {
            if self.char_at(2) == Some('>') {
                if self.char_at(3) == Some('=') {
                    self.pos += 4;
                    SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken
                } else {
                    self.pos += 3;
                    SyntaxKind::GreaterThanGreaterThanGreaterThanToken
                }
            } else if self.char_at(2) == Some('=') {
                self.pos += 3;
                SyntaxKind::GreaterThanGreaterThanEqualsToken
            } else {
                self.pos += 2;
                SyntaxKind::GreaterThanGreaterThanToken
            }
        } else if self.char_at(1) == Some('=') {
            self.pos += 2;
            SyntaxKind::GreaterThanEqualsToken
        } else {
            self.pos += 1;
            SyntaxKind::GreaterThanToken
        }
    }

    fn scan_equals(&mut self) -> SyntaxKind {
        if self.char_at(1) == Some('=') {
            if self.char_at(2) == Some('=') {
                self.pos += 3;
                SyntaxKind::EqualsEqualsEqualsToken
            } else {
                self.pos += 2;
                SyntaxKind::EqualsEqualsToken
            }
        } else {
            self.pos += 1;
            SyntaxKind::EqualsToken
        }
    }

    fn scan_exclamation(&mut self) -> SyntaxKind {
        if self.char_at(1) == Some('=') {
            if self.char_at(2) == Some('=') {
                self.pos += 3;
                SyntaxKind::ExclamationEqualsEqualsToken
            } else {
                self.pos += 2;
                SyntaxKind::ExclamationEqualsToken
            }
        } else {
            self.pos += 1;
            SyntaxKind::ExclamationToken
        }
    }

    fn scan_plus(&mut self) -> SyntaxKind {
        if self.char_at(1) == Some('+') {
            self.pos += 2;
            SyntaxKind::PlusPlusToken
        } else if self.char_at(1) == Some('=') {
            self.pos += 2;
            SyntaxKind::PlusEqualsToken
        } else {
            self.pos += 1;
            SyntaxKind::PlusToken
        }
    }

    fn scan_minus(&mut self) -> SyntaxKind {
        if self.char_at(1) == Some('-') {
            self.pos += 2;
            SyntaxKind::MinusMinusToken
        } else if self.char_at(1) == Some('=') {
            self.pos += 2;
            SyntaxKind::MinusEqualsToken
        } else {
            self.pos += 1;
            SyntaxKind::MinusToken
        }
    }

    fn scan_asterisk(&mut self) -> SyntaxKind {
        if self.char_at(1) == Some('=') {
            self.pos += 2;
            SyntaxKind::AsteriskEqualsToken
        } else {
            self.pos += 1;
            SyntaxKind::AsteriskToken
        }
    }

    fn scan_slash(&mut self) -> Result<SyntaxKind, SyntaxError> {
        // Comments are handled in skip_trivia, so this is division or a regex.
        if self.regex_allowed {
            self.pos += 1;
            return self.scan_regex();
        }
        if self.char_at(1) == Some('=') {
            self.pos += 2;
            Ok(SyntaxKind::SlashEqualsToken)
        } else {
            self.pos += 1;
            Ok(SyntaxKind::SlashToken)
        }
    }

    fn scan_percent(&mut self) -> SyntaxKind {
        if self.char_at(1) == Some('=') {
            self.pos += 2;
            SyntaxKind::PercentEqualsToken
        } else {
            self.pos += 1;
            SyntaxKind::PercentToken
        }
    }

    fn scan_ampersand(&mut self) -> SyntaxKind {
        if self.char_at(1) == Some('&') {
            self.pos += 2;
            SyntaxKind::AmpersandAmpersandToken
        } else if self.char_at(1) == Some('=') {
            self.pos += 2;
            SyntaxKind::AmpersandEqualsToken
        } else {
            self.pos += 1;
            SyntaxKind::AmpersandToken
        }
    }

    fn scan_bar(&mut self) -> SyntaxKind {
        if self.char_at(1) == Some('|') {
            self.pos += 2;
            SyntaxKind::BarBarToken
        } else if self.char_at(1) == Some('=') {
            self.pos += 2;
            SyntaxKind::BarEqualsToken
        } else {
            self.pos += 1;
            SyntaxKind::BarToken
        }
    }

    fn scan_caret(&mut self) -> SyntaxKind {
        if self.char_at(1) == Some('=') {
            self.pos += 2;
            SyntaxKind::CaretEqualsToken
        } else {
            self.pos += 1;
            SyntaxKind::CaretToken
        }
    }

    /// Scan a regex body and flags. `self.pos` is just past the opening `/`.
    fn scan_regex(&mut self) -> Result<SyntaxKind, SyntaxError> {
        let start = self.pos;
        let mut escaped = false;
        let mut in_class = false;
        loop {
            let ch = match self.current_char() {
                Some(ch) if !is_line_break(ch) => ch,
                _ => {
                    return Err(self.error(start, &messages::UNTERMINATED_REGULAR_EXPRESSION, &[]))
                }
            };
            if escaped {
                escaped = false;
            } else {
                if ch == '[' {
                    in_class = true;
                } else if ch == ']' && in_class {
                    in_class = false;
                } else if ch == '/' && !in_class {
                    break;
                }
                escaped = ch == BACKSLASH;
            }
            self.pos += 1;
        }
        let body = self.get_text_slice(start, self.pos);
        self.pos += 1;
        let flags = self.read_word()?;
        if !is_valid_regexp_flags(&flags) {
            return Err(self.error(start, &messages::INVALID_REGEXP_FLAG, &[]));
        }
        self.token_value = body;
        self.token_regex_flags = flags;
        Ok(SyntaxKind::RegularExpressionLiteral)
    }

    fn scan_string_literal(&mut self, quote: char) -> Result<SyntaxKind, SyntaxError> {
        self.pos += 1; // skip opening quote
        let mut out = String::new();
        loop {
            let ch = match self.current_char() {
                Some(ch) => ch,
                None => {
                    return Err(self.error(
                        self.token_start,
                        &messages::UNTERMINATED_STRING_CONSTANT,
                        &[],
                    ))
                }
            };
            if ch == quote {
                self.pos += 1;
                break;
            }
            if ch == BACKSLASH {
                self.pos += 1;
                self.scan_escape(&mut out)?;
                continue;
            }
            if is_line_break(ch) {
                return Err(self.error(
                    self.token_start,
                    &messages::UNTERMINATED_STRING_CONSTANT,
                    &[],
                ));
            }
            out.push(ch);
            self.pos += 1;
        }
        self.token_value = out;
        Ok(SyntaxKind::StringLiteral)
    }

    /// Decode one escape sequence. `self.pos` is just past the backslash.
    fn scan_escape(&mut self, out: &mut String) -> Result<(), SyntaxError> {
        let ch = match self.current_char() {
            Some(ch) => ch,
            // The string loop reports the unterminated constant.
            None => return Ok(()),
        };

        if let Some(digits) = self.octal_escape_digits() {
            if self.strict {
                return Err(self.error(self.pos - 1, &messages::OCTAL_LITERAL_IN_STRICT_MODE, &[]));
            }
            let code = digits
                .chars()
                .fold(0u32, |acc, d| acc * 8 + d.to_digit(8).unwrap_or(0));
            push_code_point(out, code);
            self.pos += digits.len();
            self.token_flags |= TokenFlags::OCTAL_ESCAPE;
            return Ok(());
        }

        self.pos += 1;
        match ch {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            'x' => {
                let code = self.read_hex_char(2)?;
                push_code_point(out, code);
            }
            'u' => {
                let code = self.read_hex_char(4)?;
                let code = self.combine_surrogate(code);
                push_code_point(out, code);
            }
            'U' => {
                let code = self.read_hex_char(8)?;
                push_code_point(out, code);
            }
            't' => out.push('\t'),
            'b' => out.push('\u{0008}'),
            'v' => out.push('\u{000B}'),
            'f' => out.push('\u{000C}'),
            '0' => out.push('\0'),
            // Line continuations contribute nothing.
            CARRIAGE_RETURN => {
                if self.current_char() == Some(LINE_FEED) {
                    self.pos += 1;
                }
            }
            LINE_FEED => {}
            other => out.push(other),
        }
        Ok(())
    }

    /// The digits of a legacy octal escape at the current position: up to
    /// three octal digits, shortened until the value fits in a byte. A lone
    /// `0` is the null escape, not an octal one.
    fn octal_escape_digits(&self) -> Option<String> {
        let mut digits: String = self.text[self.pos..]
            .iter()
            .take(3)
            .take_while(|c| is_octal_digit(**c))
            .collect();
        while !digits.is_empty() && u32::from_str_radix(&digits, 8).map_or(false, |v| v > 255) {
            digits.pop();
        }
        if digits.is_empty() || digits == "0" {
            None
        } else {
            Some(digits)
        }
    }

    /// Join a `\uD8xx` high surrogate with a directly following `\uDCxx`.
    fn combine_surrogate(&mut self, high: u32) -> u32 {
        if !(0xD800..0xDC00).contains(&high)
            || self.current_char() != Some(BACKSLASH)
            || self.char_at(1) != Some('u')
        {
            return high;
        }
        let save = self.pos;
        self.pos += 2;
        match self.read_int(16, Some(4)) {
            Some(low) if (0xDC00..0xE000).contains(&(low as u32)) => {
                0x10000 + ((high - 0xD800) << 10) + (low as u32 - 0xDC00)
            }
            _ => {
                self.pos = save;
                high
            }
        }
    }

    fn read_hex_char(&mut self, len: usize) -> Result<u32, SyntaxError> {
        match self.read_int(16, Some(len)) {
            Some(value) => Ok(value as u32),
            None => Err(self.error(
                self.token_start,
                &messages::BAD_CHARACTER_ESCAPE_SEQUENCE,
                &[],
            )),
        }
    }

    /// Read digits in `radix`. Returns `None` if no digits were read, or if
    /// `len` is given and a different number of digits was read.
    fn read_int(&mut self, radix: u32, len: Option<usize>) -> Option<f64> {
        let start = self.pos;
        let mut total = 0f64;
        while len.map_or(true, |len| self.pos - start < len) {
            match self.current_char().and_then(digit_value) {
                Some(value) if value < radix => {
                    total = total * radix as f64 + value as f64;
                    self.pos += 1;
                }
                _ => break,
            }
        }
        let count = self.pos - start;
        if count == 0 || len.map_or(false, |len| count != len) {
            None
        } else {
            Some(total)
        }
    }

    fn check_identifier_after_number(&self) -> Result<(), SyntaxError> {
        match self.current_char() {
            Some(ch) if is_identifier_start(ch) => Err(self.error(
                self.pos,
                &messages::IDENTIFIER_DIRECTLY_AFTER_NUMBER,
                &[],
            )),
            _ => Ok(()),
        }
    }

    fn scan_hex_number(&mut self) -> Result<SyntaxKind, SyntaxError> {
        self.pos += 2; // 0x
        let value = match self.read_int(16, None) {
            Some(value) => value,
            None => {
                return Err(self.error(
                    self.token_start + 2,
                    &messages::EXPECTED_HEXADECIMAL_NUMBER,
                    &[],
                ))
            }
        };
        self.check_identifier_after_number()?;
        self.token_flags |= TokenFlags::HEX_SPECIFIER;
        self.token_number = Some(value);
        self.token_value = self.token_text();
        Ok(SyntaxKind::NumericLiteral)
    }

    /// Scan an integer, legacy octal integer or floating-point number.
    fn scan_number(&mut self, starts_with_dot: bool) -> Result<SyntaxKind, SyntaxError> {
        let start = self.pos;
        let octal = self.current_char() == Some('0');
        let mut is_float = false;

        if !starts_with_dot && self.read_int(10, None).is_none() {
            return Err(self.error(start, &messages::INVALID_NUMBER, &[]));
        }
        if self.current_char() == Some('.') {
            self.pos += 1;
            self.read_int(10, None);
            is_float = true;
        }
        if matches!(self.current_char(), Some('e' | 'E')) {
            self.pos += 1;
            if matches!(self.current_char(), Some('+' | '-')) {
                self.pos += 1;
            }
            if self.read_int(10, None).is_none() {
                return Err(self.error(start, &messages::INVALID_NUMBER, &[]));
            }
            is_float = true;
            self.token_flags |= TokenFlags::SCIENTIFIC;
        }
        self.check_identifier_after_number()?;

        let text = self.get_text_slice(start, self.pos);
        let value = if is_float {
            text.parse::<f64>()
                .map_err(|_| self.error(start, &messages::INVALID_NUMBER, &[]))?
        } else if !octal || text.len() == 1 {
            parse_digits(&text, 10)
        } else if text.contains(['8', '9']) || self.strict {
            return Err(self.error(start, &messages::INVALID_NUMBER, &[]));
        } else {
            self.token_flags |= TokenFlags::OCTAL;
            parse_digits(&text, 8)
        };

        self.token_number = Some(value);
        self.token_value = text;
        Ok(SyntaxKind::NumericLiteral)
    }

    /// Read an identifier-like word, resolving `\uXXXX` escapes.
    fn read_word(&mut self) -> Result<String, SyntaxError> {
        let mut word = String::new();
        let mut first = true;
        loop {
            match self.current_char() {
                Some(BACKSLASH) => {
                    self.token_flags |= TokenFlags::CONTAINS_ESCAPE;
                    self.pos += 1;
                    if self.current_char() != Some('u') {
                        return Err(self.error(
                            self.pos,
                            &messages::EXPECTING_UNICODE_ESCAPE_SEQUENCE,
                            &[],
                        ));
                    }
                    self.pos += 1;
                    let code = self.read_hex_char(4)?;
                    let ch = match char::from_u32(code) {
                        Some(ch) => ch,
                        None => {
                            return Err(self.error(self.pos - 1, &messages::INVALID_UNICODE_ESCAPE, &[]))
                        }
                    };
                    let valid = if first {
                        is_identifier_start(ch)
                    } else {
                        is_identifier_part(ch)
                    };
                    if !valid {
                        return Err(self.error(self.pos - 4, &messages::INVALID_UNICODE_ESCAPE, &[]));
                    }
                    word.push(ch);
                }
                Some(ch) if is_identifier_part(ch) => {
                    word.push(ch);
                    self.pos += 1;
                }
                _ => break,
            }
            first = false;
        }
        Ok(word)
    }

    fn scan_identifier(&mut self) -> Result<SyntaxKind, SyntaxError> {
        let word = self.read_word()?;
        let mut kind = SyntaxKind::Identifier;
        // Words written with escapes are never keywords.
        if !self.token_flags.contains(TokenFlags::CONTAINS_ESCAPE) {
            if let Some(keyword) = SyntaxKind::from_keyword(&word) {
                kind = keyword;
            } else if self.is_reserved(&word) {
                return Err(self.error(
                    self.token_start,
                    &messages::THE_KEYWORD_0_IS_RESERVED,
                    &[&word],
                ));
            }
        }
        self.token_value = word;
        Ok(kind)
    }

    fn is_reserved(&self, word: &str) -> bool {
        let forbidden = self.forbid_reserved
            && match self.ecma_version {
                EcmaVersion::V3 => is_reserved_word_3(word),
                EcmaVersion::V5 => is_reserved_word_5(word),
            };
        forbidden || (self.strict && is_strict_reserved_word(word))
    }
}

fn parse_digits(text: &str, radix: u32) -> f64 {
    text.chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0f64, |acc, d| acc * radix as f64 + d as f64)
}

fn push_code_point(out: &mut String, code: u32) {
    out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regexp_flags_validation() {
        assert!(is_valid_regexp_flags(""));
        assert!(is_valid_regexp_flags("gim"));
        assert!(!is_valid_regexp_flags("gx"));
    }

    #[test]
    fn test_octal_escape_digits_trim() {
        let scanner = Scanner::new("477");
        assert_eq!(scanner.octal_escape_digits(), Some("47".to_string()));
        let scanner = Scanner::new("0a");
        assert_eq!(scanner.octal_escape_digits(), None);
    }

    #[test]
    fn test_parse_digits() {
        assert_eq!(parse_digits("017", 8), 15.0);
        assert_eq!(parse_digits("123", 10), 123.0);
    }
}
