//! Flag types for tokens.

bitflags::bitflags! {
    /// Flags describing how a token was written.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TokenFlags: u16 {
        const NONE                              = 0;
        /// A line terminator lies between this token and the previous one.
        const PRECEDING_LINE_BREAK              = 1 << 0;
        /// The identifier was written with `\uXXXX` escapes.
        const CONTAINS_ESCAPE                   = 1 << 1;
        const SCIENTIFIC                        = 1 << 2;
        /// Legacy octal literal such as `017`.
        const OCTAL                             = 1 << 3;
        const HEX_SPECIFIER                     = 1 << 4;
        /// A string literal contained an octal escape.
        const OCTAL_ESCAPE                      = 1 << 5;

        const NUMERIC_LITERAL_FLAGS = Self::SCIENTIFIC.bits()
            | Self::OCTAL.bits()
            | Self::HEX_SPECIFIER.bits();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_flags() {
        let flags = TokenFlags::PRECEDING_LINE_BREAK | TokenFlags::HEX_SPECIFIER;
        assert!(flags.contains(TokenFlags::PRECEDING_LINE_BREAK));
        assert!(flags.intersects(TokenFlags::NUMERIC_LITERAL_FLAGS));
        assert!(!TokenFlags::CONTAINS_ESCAPE.intersects(TokenFlags::NUMERIC_LITERAL_FLAGS));
    }
}
