//! blocklify_core: Core utilities shared by the blocklify pipeline.
//!
//! Provides source positions, ranges and the offset-to-line mapping used by
//! the scanner, parser and error reporting.

pub mod text;

// Re-export commonly used types
pub use text::{LineAndColumn, LineMap, SourceLocation, TextPos, TextRange};
