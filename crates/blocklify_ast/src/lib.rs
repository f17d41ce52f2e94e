//! blocklify_ast: Abstract Syntax Tree definitions for the JavaScript front end.
//!
//! This module defines the AST node types, the SyntaxKind enum shared by
//! tokens and nodes, the token flag type, and the operator precedence table
//! used by both the parser and the code generator.

pub mod dump;
pub mod generated;
pub mod node;
pub mod precedence;
pub mod syntax_kind;
pub mod types;

// Re-export key types
pub use node::*;
pub use precedence::Order;
pub use syntax_kind::SyntaxKind;
pub use types::*;
