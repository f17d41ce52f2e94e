//! Operator precedence shared by the parser and the code generator.
//!
//! Orders follow the generator's convention: a smaller order binds tighter.
//! The parser climbs on binding power, which for binary operators is
//! `15 - order`, so both sides read the same table.

use crate::syntax_kind::SyntaxKind;

/// Binding order of an expression; smaller binds tighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Order(pub u8);

impl Order {
    pub const ATOMIC: Order = Order(0); // literals, identifiers, (...)
    pub const MEMBER: Order = Order(1); // . []
    pub const NEW: Order = Order(1); // new
    pub const FUNCTION_CALL: Order = Order(2); // ()
    pub const INCREMENT: Order = Order(3); // ++
    pub const DECREMENT: Order = Order(3); // --
    pub const LOGICAL_NOT: Order = Order(4); // !
    pub const BITWISE_NOT: Order = Order(4); // ~
    pub const UNARY_PLUS: Order = Order(4); // +
    pub const UNARY_NEGATION: Order = Order(4); // -
    pub const TYPEOF: Order = Order(4);
    pub const VOID: Order = Order(4);
    pub const DELETE: Order = Order(4);
    pub const MULTIPLICATION: Order = Order(5); // * / %
    pub const ADDITION: Order = Order(6); // + -
    pub const BITWISE_SHIFT: Order = Order(7); // << >> >>>
    pub const RELATIONAL: Order = Order(8); // < <= > >= in instanceof
    pub const EQUALITY: Order = Order(9); // == != === !==
    pub const BITWISE_AND: Order = Order(10);
    pub const BITWISE_XOR: Order = Order(11);
    pub const BITWISE_OR: Order = Order(12);
    pub const LOGICAL_AND: Order = Order(13);
    pub const LOGICAL_OR: Order = Order(14);
    pub const CONDITIONAL: Order = Order(15); // ?:
    pub const ASSIGNMENT: Order = Order(16); // = += -= ...
    pub const COMMA: Order = Order(17);
    pub const NONE: Order = Order(99);

    /// Parser binding power for a binary operator of this order.
    #[inline]
    pub fn binding_power(self) -> u8 {
        15u8.saturating_sub(self.0)
    }

    /// Whether an expression of this order must be parenthesized when it
    /// is placed where `context` was requested.
    ///
    /// The right operand of a left-associative binary operator also needs
    /// parentheses at equal order: `a - (b - c)`.
    #[inline]
    pub fn needs_parentheses(self, context: Order, right_operand: bool) -> bool {
        self > context || (right_operand && self == context && self != Order::ATOMIC)
    }
}

/// Order of a binary or logical operator, or `None` if `kind` is not one.
pub fn binary_operator_order(kind: SyntaxKind) -> Option<Order> {
    let order = match kind {
        SyntaxKind::BarBarToken => Order::LOGICAL_OR,
        SyntaxKind::AmpersandAmpersandToken => Order::LOGICAL_AND,
        SyntaxKind::BarToken => Order::BITWISE_OR,
        SyntaxKind::CaretToken => Order::BITWISE_XOR,
        SyntaxKind::AmpersandToken => Order::BITWISE_AND,
        SyntaxKind::EqualsEqualsToken
        | SyntaxKind::ExclamationEqualsToken
        | SyntaxKind::EqualsEqualsEqualsToken
        | SyntaxKind::ExclamationEqualsEqualsToken => Order::EQUALITY,
        SyntaxKind::LessThanToken
        | SyntaxKind::GreaterThanToken
        | SyntaxKind::LessThanEqualsToken
        | SyntaxKind::GreaterThanEqualsToken
        | SyntaxKind::InstanceOfKeyword
        | SyntaxKind::InKeyword => Order::RELATIONAL,
        SyntaxKind::LessThanLessThanToken
        | SyntaxKind::GreaterThanGreaterThanToken
        | SyntaxKind::GreaterThanGreaterThanGreaterThanToken => Order::BITWISE_SHIFT,
        SyntaxKind::PlusToken | SyntaxKind::MinusToken => Order::ADDITION,
        SyntaxKind::AsteriskToken | SyntaxKind::SlashToken | SyntaxKind::PercentToken => {
            Order::MULTIPLICATION
        }
        _ => return None,
    };
    Some(order)
}

/// Parser binding power of a binary operator, 0 when `kind` is not one.
#[inline]
pub fn binary_binding_power(kind: SyntaxKind) -> u8 {
    binary_operator_order(kind).map_or(0, Order::binding_power)
}

/// Order of a prefix unary or update operator.
pub fn unary_operator_order(kind: SyntaxKind) -> Option<Order> {
    let order = match kind {
        SyntaxKind::PlusPlusToken => Order::INCREMENT,
        SyntaxKind::MinusMinusToken => Order::DECREMENT,
        SyntaxKind::ExclamationToken => Order::LOGICAL_NOT,
        SyntaxKind::TildeToken => Order::BITWISE_NOT,
        SyntaxKind::PlusToken => Order::UNARY_PLUS,
        SyntaxKind::MinusToken => Order::UNARY_NEGATION,
        SyntaxKind::TypeOfKeyword => Order::TYPEOF,
        SyntaxKind::VoidKeyword => Order::VOID,
        SyntaxKind::DeleteKeyword => Order::DELETE,
        _ => return None,
    };
    Some(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_power_matches_order() {
        assert_eq!(binary_binding_power(SyntaxKind::BarBarToken), 1);
        assert_eq!(binary_binding_power(SyntaxKind::AmpersandAmpersandToken), 2);
        assert_eq!(binary_binding_power(SyntaxKind::BarToken), 3);
        assert_eq!(binary_binding_power(SyntaxKind::CaretToken), 4);
        assert_eq!(binary_binding_power(SyntaxKind::AmpersandToken), 5);
        assert_eq!(binary_binding_power(SyntaxKind::EqualsEqualsEqualsToken), 6);
        assert_eq!(binary_binding_power(SyntaxKind::InKeyword), 7);
        assert_eq!(binary_binding_power(SyntaxKind::GreaterThanGreaterThanToken), 8);
        assert_eq!(binary_binding_power(SyntaxKind::MinusToken), 9);
        assert_eq!(binary_binding_power(SyntaxKind::PercentToken), 10);
        assert_eq!(binary_binding_power(SyntaxKind::EqualsToken), 0);
    }

    #[test]
    fn test_needs_parentheses() {
        assert!(Order::ADDITION.needs_parentheses(Order::MULTIPLICATION, false));
        assert!(!Order::MULTIPLICATION.needs_parentheses(Order::ADDITION, false));
        assert!(!Order::ADDITION.needs_parentheses(Order::ADDITION, false));
        assert!(Order::ADDITION.needs_parentheses(Order::ADDITION, true));
        assert!(!Order::ATOMIC.needs_parentheses(Order::ATOMIC, true));
        assert!(!Order::COMMA.needs_parentheses(Order::NONE, false));
    }

    #[test]
    fn test_unary_orders() {
        assert_eq!(unary_operator_order(SyntaxKind::TypeOfKeyword), Some(Order(4)));
        assert_eq!(unary_operator_order(SyntaxKind::PlusPlusToken), Some(Order(3)));
        assert_eq!(unary_operator_order(SyntaxKind::AsteriskToken), None);
    }
}
