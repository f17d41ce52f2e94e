//! blocklify_parser: Recursive descent parser for ES5 JavaScript.
//!
//! Pulls tokens from the scanner on demand and builds an arena-allocated
//! AST. Statements are parsed by recursive descent; binary operators by
//! precedence climbing over the table shared with the code generator.

mod parser;
mod utilities;

pub use blocklify_scanner::Comment;
pub use parser::{parse, Parser, MAX_RECURSION_DEPTH};
