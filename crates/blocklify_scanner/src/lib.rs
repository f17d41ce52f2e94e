//! blocklify_scanner: Lexer for ES3/ES5 JavaScript source.
//!
//! Produces tokens on demand with:
//! - regex-vs-divide disambiguation driven by the previous token
//! - `\uXXXX` escapes in identifiers and strings
//! - legacy octal numbers and escapes, rejected in strict mode
//! - HTML-style `<!--` and `-->` line comments
//! - an optional comment log for callers that want comments

mod char_codes;
mod reserved;
mod scanner;
mod token;

pub use char_codes::{is_identifier_part, is_identifier_start, is_line_break};
pub use reserved::{
    is_reserved_word_3, is_reserved_word_5, is_strict_bad_id_word, is_strict_reserved_word,
};
pub use scanner::{Comment, Scanner};
pub use token::TokenInfo;
