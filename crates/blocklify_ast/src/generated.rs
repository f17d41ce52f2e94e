//! Helpers for AST nodes: uniform access to node data and kind checks.

use crate::node::*;
use crate::syntax_kind::SyntaxKind;

/// Helper to get the NodeData from any statement.
impl<'a> Statement<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            Statement::Empty(d) => d,
            Statement::Debugger(d) => d,
            Statement::Expression(n) => &n.data,
            Statement::Block(n) => &n.data,
            Statement::If(n) => &n.data,
            Statement::Labeled(n) => &n.data,
            Statement::Break(n) => &n.data,
            Statement::Continue(n) => &n.data,
            Statement::With(n) => &n.data,
            Statement::Switch(n) => &n.data,
            Statement::Return(n) => &n.data,
            Statement::Throw(n) => &n.data,
            Statement::Try(n) => &n.data,
            Statement::While(n) => &n.data,
            Statement::DoWhile(n) => &n.data,
            Statement::For(n) => &n.data,
            Statement::ForIn(n) => &n.data,
            Statement::VariableDeclaration(n) => &n.data,
            Statement::FunctionDeclaration(n) => &n.data,
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data().kind
    }

    pub fn pos(&self) -> u32 {
        self.data().range.pos
    }

    pub fn end(&self) -> u32 {
        self.data().range.end
    }

    /// The string value of a directive such as `"use strict"`, if this
    /// statement is an expression statement holding only a string literal.
    pub fn directive(&self) -> Option<&'a str> {
        match self {
            Statement::Expression(ExpressionStatement {
                expression:
                    Expression::Literal(Literal {
                        value: LiteralValue::String(value),
                        ..
                    }),
                ..
            }) => Some(*value),
            _ => None,
        }
    }

    pub fn is_use_strict_directive(&self) -> bool {
        self.directive() == Some("use strict")
    }
}

/// Helper to get the NodeData from any expression.
impl<'a> Expression<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            Expression::This(d) => d,
            Expression::Identifier(n) => &n.data,
            Expression::Literal(n) => &n.data,
            Expression::Array(n) => &n.data,
            Expression::Object(n) => &n.data,
            Expression::Function(n) => &n.data,
            Expression::Sequence(n) => &n.data,
            Expression::Unary(n) => &n.data,
            Expression::Update(n) => &n.data,
            Expression::Binary(n) => &n.data,
            Expression::Logical(n) => &n.data,
            Expression::Assignment(n) => &n.data,
            Expression::Conditional(n) => &n.data,
            Expression::New(n) => &n.data,
            Expression::Call(n) => &n.data,
            Expression::Member(n) => &n.data,
        }
    }

    /// Mutable access, used by the parser to widen a parenthesized
    /// expression's range over its parentheses.
    pub fn data_mut(&mut self) -> &mut NodeData {
        match self {
            Expression::This(d) => d,
            Expression::Identifier(n) => &mut n.data,
            Expression::Literal(n) => &mut n.data,
            Expression::Array(n) => &mut n.data,
            Expression::Object(n) => &mut n.data,
            Expression::Function(n) => &mut n.data,
            Expression::Sequence(n) => &mut n.data,
            Expression::Unary(n) => &mut n.data,
            Expression::Update(n) => &mut n.data,
            Expression::Binary(n) => &mut n.data,
            Expression::Logical(n) => &mut n.data,
            Expression::Assignment(n) => &mut n.data,
            Expression::Conditional(n) => &mut n.data,
            Expression::New(n) => &mut n.data,
            Expression::Call(n) => &mut n.data,
            Expression::Member(n) => &mut n.data,
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data().kind
    }

    pub fn pos(&self) -> u32 {
        self.data().range.pos
    }

    pub fn end(&self) -> u32 {
        self.data().range.end
    }
}

impl<'a> ForInit<'a> {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            ForInit::VariableDeclaration(decl) => decl.data.kind,
            ForInit::Expression(expr) => expr.kind(),
        }
    }
}
