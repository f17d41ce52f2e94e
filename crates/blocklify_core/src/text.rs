//! Text range and line-mapping types for source location tracking.
//!
//! Offsets count `char`s from the start of the source, not bytes. Lines are
//! 1-based and columns 0-based, which is what error messages print as
//! `(line:column)`.

use serde::Serialize;
use std::fmt;

/// A position in source text, measured in chars from the start.
pub type TextPos = u32;

/// A text range with start and end positions.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Serialize)]
pub struct TextRange {
    /// The offset where this range starts (inclusive).
    pub pos: TextPos,
    /// The offset where this range ends (exclusive).
    pub end: TextPos,
}

impl TextRange {
    /// Create a new text range.
    #[inline]
    pub fn new(pos: TextPos, end: TextPos) -> Self {
        debug_assert!(end >= pos);
        Self { pos, end }
    }
}

impl fmt::Debug for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.pos, self.end)
    }
}

/// Line and column information derived from source text.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
pub struct LineAndColumn {
    /// 1-based line number.
    pub line: u32,
    /// 0-based column, in chars.
    pub column: u32,
}

impl LineAndColumn {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for LineAndColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Start and end positions of a node, attached when location tracking is on.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
pub struct SourceLocation {
    pub start: LineAndColumn,
    pub end: LineAndColumn,
}

/// A map from char offsets to line numbers, built from source text.
///
/// `\r\n` counts as a single line break; `\n`, `\r`, U+2028 and U+2029
/// each count as one.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Offsets of the start of each line.
    line_starts: Vec<TextPos>,
}

impl LineMap {
    /// Build a line map from source text.
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        Self::from_chars(&chars)
    }

    /// Build a line map from already decoded source chars.
    pub fn from_chars(chars: &[char]) -> Self {
        let mut line_starts = vec![0u32];
        let mut i = 0;
        while i < chars.len() {
            match chars[i] {
                '\r' => {
                    if chars.get(i + 1) == Some(&'\n') {
                        i += 1;
                    }
                    line_starts.push((i + 1) as u32);
                }
                '\n' | '\u{2028}' | '\u{2029}' => line_starts.push((i + 1) as u32),
                _ => {}
            }
            i += 1;
        }
        Self { line_starts }
    }

    /// Get the line index (0-based) for an offset.
    fn line_index_of(&self, pos: TextPos) -> usize {
        match self.line_starts.binary_search(&pos) {
            Ok(line) => line,
            Err(line) => line - 1,
        }
    }

    /// Get the line and column for an offset.
    pub fn line_and_column_of(&self, pos: TextPos) -> LineAndColumn {
        let index = self.line_index_of(pos);
        LineAndColumn {
            line: index as u32 + 1,
            column: pos - self.line_starts[index],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_range() {
        let range = TextRange::new(5, 15);
        assert_eq!(format!("{:?}", range), "5..15");
        assert_eq!(range, TextRange { pos: 5, end: 15 });
    }

    #[test]
    fn test_line_map() {
        let map = LineMap::new("line1\nline2\nline3");
        assert_eq!(map.line_and_column_of(0), LineAndColumn::new(1, 0));
        assert_eq!(map.line_and_column_of(5), LineAndColumn::new(1, 5));
        assert_eq!(map.line_and_column_of(6), LineAndColumn::new(2, 0));
        assert_eq!(map.line_and_column_of(8), LineAndColumn::new(2, 2));
        assert_eq!(map.line_and_column_of(16), LineAndColumn::new(3, 4));
    }

    #[test]
    fn test_line_map_crlf_counts_once() {
        let map = LineMap::new("a\r\nb\rc\u{2028}d");
        assert_eq!(map.line_and_column_of(3), LineAndColumn::new(2, 0));
        assert_eq!(map.line_and_column_of(5), LineAndColumn::new(3, 0));
        assert_eq!(map.line_and_column_of(7), LineAndColumn::new(4, 0));
    }

    #[test]
    fn test_line_map_counts_chars_not_bytes() {
        let map = LineMap::new("é\nxü");
        assert_eq!(map.line_and_column_of(4), LineAndColumn::new(2, 2));
    }
}
