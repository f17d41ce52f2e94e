//! Reserved word sets.

/// Future reserved words of ECMAScript 3.
pub fn is_reserved_word_3(word: &str) -> bool {
    matches!(
        word,
        "abstract"
            | "boolean"
            | "byte"
            | "char"
            | "class"
            | "double"
            | "enum"
            | "export"
            | "extends"
            | "final"
            | "float"
            | "goto"
            | "implements"
            | "import"
            | "int"
            | "interface"
            | "long"
            | "native"
            | "package"
            | "private"
            | "protected"
            | "public"
            | "short"
            | "static"
            | "super"
            | "synchronized"
            | "throws"
            | "transient"
            | "volatile"
    )
}

/// Future reserved words of ECMAScript 5.
pub fn is_reserved_word_5(word: &str) -> bool {
    matches!(
        word,
        "class" | "enum" | "extends" | "super" | "const" | "export" | "import"
    )
}

/// Words reserved only in strict mode.
pub fn is_strict_reserved_word(word: &str) -> bool {
    matches!(
        word,
        "implements"
            | "interface"
            | "let"
            | "package"
            | "private"
            | "protected"
            | "public"
            | "static"
            | "yield"
    )
}

/// Names that may not be bound or assigned in strict mode.
pub fn is_strict_bad_id_word(word: &str) -> bool {
    matches!(word, "eval" | "arguments")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_sets() {
        assert!(is_reserved_word_3("goto"));
        assert!(!is_reserved_word_5("goto"));
        assert!(is_reserved_word_5("const"));
        assert!(!is_reserved_word_3("const"));
        assert!(is_strict_reserved_word("yield"));
        assert!(!is_strict_reserved_word("class"));
        assert!(is_strict_bad_id_word("arguments"));
        assert!(!is_strict_bad_id_word("args"));
    }
}
