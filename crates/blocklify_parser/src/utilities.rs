//! Parser utility types and predicates.

use blocklify_ast::syntax_kind::SyntaxKind;

/// What a `break` or `continue` may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Loop,
    Switch,
}

/// An entry of the label stack. Loops and switches push an unnamed entry;
/// labeled statements push a named one.
#[derive(Debug, Clone, Copy)]
pub struct Label<'a> {
    pub name: Option<&'a str>,
    pub kind: Option<LabelKind>,
}

impl<'a> Label<'a> {
    pub const LOOP: Label<'static> = Label {
        name: None,
        kind: Some(LabelKind::Loop),
    };

    pub const SWITCH: Label<'static> = Label {
        name: None,
        kind: Some(LabelKind::Switch),
    };

    pub fn named(name: &'a str, kind: Option<LabelKind>) -> Self {
        Self {
            name: Some(name),
            kind,
        }
    }
}

/// Whether `stack` holds a valid target for a `break` (`is_break`) or
/// `continue`, optionally naming `label`.
pub fn has_jump_target(stack: &[Label<'_>], label: Option<&str>, is_break: bool) -> bool {
    stack.iter().any(|entry| {
        let name_matches = match label {
            None => true,
            Some(name) => entry.name == Some(name),
        };
        name_matches
            && ((entry.kind.is_some() && (is_break || entry.kind == Some(LabelKind::Loop)))
                || (label.is_some() && is_break))
    })
}

/// The label kind given to a labeled statement whose body starts with
/// `kind`.
pub fn label_kind_for(kind: SyntaxKind) -> Option<LabelKind> {
    match kind {
        SyntaxKind::DoKeyword | SyntaxKind::ForKeyword | SyntaxKind::WhileKeyword => {
            Some(LabelKind::Loop)
        }
        SyntaxKind::SwitchKeyword => Some(LabelKind::Switch),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlabeled_break_needs_loop_or_switch() {
        assert!(!has_jump_target(&[], None, true));
        assert!(has_jump_target(&[Label::SWITCH], None, true));
        assert!(!has_jump_target(&[Label::SWITCH], None, false));
        assert!(has_jump_target(&[Label::LOOP], None, false));
    }

    #[test]
    fn test_labeled_jumps() {
        let block = Label::named("out", None);
        assert!(has_jump_target(&[block], Some("out"), true));
        assert!(!has_jump_target(&[block], Some("out"), false));
        assert!(!has_jump_target(&[block], Some("other"), true));

        let loop_label = Label::named("outer", Some(LabelKind::Loop));
        assert!(has_jump_target(&[loop_label, Label::LOOP], Some("outer"), false));
    }

    #[test]
    fn test_label_kind_for() {
        assert_eq!(label_kind_for(SyntaxKind::ForKeyword), Some(LabelKind::Loop));
        assert_eq!(label_kind_for(SyntaxKind::SwitchKeyword), Some(LabelKind::Switch));
        assert_eq!(label_kind_for(SyntaxKind::OpenBraceToken), None);
    }
}
