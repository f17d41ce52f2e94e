//! Character classes used by the scanner.

use unicode_xid::UnicodeXID;

pub const LINE_FEED: char = '\n';
pub const CARRIAGE_RETURN: char = '\r';
pub const LINE_SEPARATOR: char = '\u{2028}';
pub const PARAGRAPH_SEPARATOR: char = '\u{2029}';
pub const BACKSLASH: char = '\\';

/// Check if a character is a line terminator.
#[inline]
pub fn is_line_break(ch: char) -> bool {
    ch == LINE_FEED
        || ch == CARRIAGE_RETURN
        || ch == LINE_SEPARATOR
        || ch == PARAGRAPH_SEPARATOR
}

/// Check if a character is whitespace (not line break).
#[inline]
pub fn is_white_space_single_line(ch: char) -> bool {
    matches!(
        ch,
        ' ' | '\t'
            | '\u{000B}' // vertical tab
            | '\u{000C}' // form feed
            | '\u{00A0}' // no-break space
            | '\u{1680}' // ogham space mark
            | '\u{180E}' // mongolian vowel separator
            | '\u{2000}'..='\u{200A}' // various spaces
            | '\u{202F}' // narrow no-break space
            | '\u{205F}' // medium mathematical space
            | '\u{3000}' // ideographic space
            | '\u{FEFF}' // BOM / zero-width no-break space
    )
}

/// Check if a character is a decimal digit.
#[inline]
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

/// Check if a character is an octal digit (0-7).
#[inline]
pub fn is_octal_digit(ch: char) -> bool {
    matches!(ch, '0'..='7')
}

/// Value of a digit in radixes up to 36, if `ch` is one.
#[inline]
pub fn digit_value(ch: char) -> Option<u32> {
    ch.to_digit(36)
}

/// Whether `ch` can start an identifier.
pub fn is_identifier_start(ch: char) -> bool {
    if ch.is_ascii() {
        ch.is_ascii_alphabetic() || ch == '$' || ch == '_'
    } else {
        UnicodeXID::is_xid_start(ch)
    }
}

/// Whether `ch` can continue an identifier.
pub fn is_identifier_part(ch: char) -> bool {
    if ch.is_ascii() {
        ch.is_ascii_alphanumeric() || ch == '$' || ch == '_'
    } else {
        UnicodeXID::is_xid_continue(ch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_classes() {
        assert!(is_identifier_start('$'));
        assert!(is_identifier_start('é'));
        assert!(is_identifier_start('変'));
        assert!(!is_identifier_start('1'));
        assert!(is_identifier_part('1'));
        assert!(!is_identifier_part('-'));
        assert!(!is_identifier_start('\\'));
    }

    #[test]
    fn test_whitespace_and_breaks() {
        assert!(is_white_space_single_line('\u{3000}'));
        assert!(!is_white_space_single_line('\n'));
        assert!(is_line_break('\u{2029}'));
        assert_eq!(digit_value('f'), Some(15));
        assert_eq!(digit_value('-'), None);
    }
}
