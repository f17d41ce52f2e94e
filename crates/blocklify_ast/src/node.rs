//! AST node definitions for the JavaScript front end.
//!
//! Node shapes follow ESTree. Nodes reference child nodes via
//! arena-allocated references and own no heap memory of their own, so a
//! whole tree is dropped with its arena.

use crate::syntax_kind::SyntaxKind;
use blocklify_core::text::{SourceLocation, TextRange};

// ============================================================================
// Core Node Wrapper
// ============================================================================

/// Common data shared by all AST nodes.
#[derive(Debug, Clone, Copy)]
pub struct NodeData {
    /// The kind of this node.
    pub kind: SyntaxKind,
    /// Source position range.
    pub range: TextRange,
    /// Line/column of the range, when location tracking is enabled.
    pub loc: Option<SourceLocation>,
}

impl NodeData {
    pub fn new(kind: SyntaxKind, pos: u32, end: u32) -> Self {
        Self {
            kind,
            range: TextRange::new(pos, end),
            loc: None,
        }
    }
}

/// A list of nodes, allocated in the arena.
pub type NodeList<'a, T> = &'a [T];

/// An optional arena-allocated node.
pub type OptionalNode<'a, T> = Option<&'a T>;

// ============================================================================
// Program
// ============================================================================

#[derive(Debug)]
pub struct Program<'a> {
    pub data: NodeData,
    pub body: NodeList<'a, Statement<'a>>,
    /// Whether the program starts with a `"use strict"` directive.
    pub strict: bool,
}

// ============================================================================
// Identifier
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct Identifier<'a> {
    pub data: NodeData,
    /// The identifier text with escapes resolved.
    pub name: &'a str,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug)]
pub enum Statement<'a> {
    Empty(NodeData),
    Debugger(NodeData),
    Expression(ExpressionStatement<'a>),
    Block(BlockStatement<'a>),
    If(IfStatement<'a>),
    Labeled(LabeledStatement<'a>),
    Break(JumpStatement<'a>),
    Continue(JumpStatement<'a>),
    With(WithStatement<'a>),
    Switch(SwitchStatement<'a>),
    Return(ReturnStatement<'a>),
    Throw(ThrowStatement<'a>),
    Try(TryStatement<'a>),
    While(WhileStatement<'a>),
    DoWhile(DoWhileStatement<'a>),
    For(ForStatement<'a>),
    ForIn(ForInStatement<'a>),
    VariableDeclaration(VariableDeclaration<'a>),
    FunctionDeclaration(Function<'a>),
}

#[derive(Debug)]
pub struct ExpressionStatement<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct BlockStatement<'a> {
    pub data: NodeData,
    pub body: NodeList<'a, Statement<'a>>,
}

#[derive(Debug)]
pub struct IfStatement<'a> {
    pub data: NodeData,
    pub test: &'a Expression<'a>,
    pub consequent: &'a Statement<'a>,
    pub alternate: OptionalNode<'a, Statement<'a>>,
}

#[derive(Debug)]
pub struct LabeledStatement<'a> {
    pub data: NodeData,
    pub label: Identifier<'a>,
    pub body: &'a Statement<'a>,
}

/// `break` or `continue`, told apart by `data.kind`.
#[derive(Debug)]
pub struct JumpStatement<'a> {
    pub data: NodeData,
    pub label: Option<Identifier<'a>>,
}

#[derive(Debug)]
pub struct WithStatement<'a> {
    pub data: NodeData,
    pub object: &'a Expression<'a>,
    pub body: &'a Statement<'a>,
}

#[derive(Debug)]
pub struct SwitchStatement<'a> {
    pub data: NodeData,
    pub discriminant: &'a Expression<'a>,
    pub cases: NodeList<'a, SwitchCase<'a>>,
}

#[derive(Debug)]
pub struct SwitchCase<'a> {
    pub data: NodeData,
    /// `None` for the `default` clause.
    pub test: OptionalNode<'a, Expression<'a>>,
    pub consequent: NodeList<'a, Statement<'a>>,
}

#[derive(Debug)]
pub struct ReturnStatement<'a> {
    pub data: NodeData,
    pub argument: OptionalNode<'a, Expression<'a>>,
}

#[derive(Debug)]
pub struct ThrowStatement<'a> {
    pub data: NodeData,
    pub argument: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct TryStatement<'a> {
    pub data: NodeData,
    pub block: BlockStatement<'a>,
    pub handler: Option<CatchClause<'a>>,
    pub finalizer: Option<BlockStatement<'a>>,
}

#[derive(Debug)]
pub struct CatchClause<'a> {
    pub data: NodeData,
    pub param: Identifier<'a>,
    pub body: BlockStatement<'a>,
}

#[derive(Debug)]
pub struct WhileStatement<'a> {
    pub data: NodeData,
    pub test: &'a Expression<'a>,
    pub body: &'a Statement<'a>,
}

#[derive(Debug)]
pub struct DoWhileStatement<'a> {
    pub data: NodeData,
    pub body: &'a Statement<'a>,
    pub test: &'a Expression<'a>,
}

/// The head of a `for` or `for-in` loop.
#[derive(Debug)]
pub enum ForInit<'a> {
    VariableDeclaration(&'a VariableDeclaration<'a>),
    Expression(&'a Expression<'a>),
}

#[derive(Debug)]
pub struct ForStatement<'a> {
    pub data: NodeData,
    pub init: Option<ForInit<'a>>,
    pub test: OptionalNode<'a, Expression<'a>>,
    pub update: OptionalNode<'a, Expression<'a>>,
    pub body: &'a Statement<'a>,
}

#[derive(Debug)]
pub struct ForInStatement<'a> {
    pub data: NodeData,
    pub left: ForInit<'a>,
    pub right: &'a Expression<'a>,
    pub body: &'a Statement<'a>,
}

#[derive(Debug)]
pub struct VariableDeclaration<'a> {
    pub data: NodeData,
    pub declarations: NodeList<'a, VariableDeclarator<'a>>,
}

#[derive(Debug)]
pub struct VariableDeclarator<'a> {
    pub data: NodeData,
    pub id: Identifier<'a>,
    pub init: OptionalNode<'a, Expression<'a>>,
}

/// A function declaration or expression, told apart by `data.kind`.
#[derive(Debug)]
pub struct Function<'a> {
    pub data: NodeData,
    pub id: Option<Identifier<'a>>,
    pub params: NodeList<'a, Identifier<'a>>,
    pub body: BlockStatement<'a>,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug)]
pub enum Expression<'a> {
    This(NodeData),
    Identifier(Identifier<'a>),
    Literal(Literal<'a>),
    Array(ArrayExpression<'a>),
    Object(ObjectExpression<'a>),
    Function(Function<'a>),
    Sequence(SequenceExpression<'a>),
    Unary(UnaryExpression<'a>),
    Update(UpdateExpression<'a>),
    Binary(BinaryExpression<'a>),
    Logical(BinaryExpression<'a>),
    Assignment(AssignmentExpression<'a>),
    Conditional(ConditionalExpression<'a>),
    New(CallExpression<'a>),
    Call(CallExpression<'a>),
    Member(MemberExpression<'a>),
}

/// The cooked value of a literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralValue<'a> {
    Null,
    Boolean(bool),
    Number(f64),
    String(&'a str),
    RegExp { pattern: &'a str, flags: &'a str },
}

#[derive(Debug)]
pub struct Literal<'a> {
    pub data: NodeData,
    pub value: LiteralValue<'a>,
    /// The literal exactly as written in the source.
    pub raw: &'a str,
}

#[derive(Debug)]
pub struct ArrayExpression<'a> {
    pub data: NodeData,
    /// `None` entries are holes (`[a, , b]`).
    pub elements: NodeList<'a, Option<Expression<'a>>>,
}

#[derive(Debug)]
pub struct ObjectExpression<'a> {
    pub data: NodeData,
    pub properties: NodeList<'a, ObjectElement<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Init,
    Get,
    Set,
}

#[derive(Debug)]
pub enum PropertyKey<'a> {
    Identifier(Identifier<'a>),
    Literal(Literal<'a>),
}

impl<'a> PropertyKey<'a> {
    /// The property name the key denotes, used for duplicate detection.
    pub fn name(&self) -> String {
        match self {
            PropertyKey::Identifier(id) => id.name.to_string(),
            PropertyKey::Literal(lit) => match lit.value {
                LiteralValue::String(s) => s.to_string(),
                LiteralValue::Number(n) => crate::dump::number_to_string(n),
                _ => lit.raw.to_string(),
            },
        }
    }

    pub fn data(&self) -> &NodeData {
        match self {
            PropertyKey::Identifier(id) => &id.data,
            PropertyKey::Literal(lit) => &lit.data,
        }
    }
}

#[derive(Debug)]
pub struct ObjectElement<'a> {
    pub data: NodeData,
    pub key: PropertyKey<'a>,
    pub value: &'a Expression<'a>,
    pub kind: PropertyKind,
}

#[derive(Debug)]
pub struct SequenceExpression<'a> {
    pub data: NodeData,
    pub expressions: NodeList<'a, Expression<'a>>,
}

#[derive(Debug)]
pub struct UnaryExpression<'a> {
    pub data: NodeData,
    pub operator: SyntaxKind,
    pub argument: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct UpdateExpression<'a> {
    pub data: NodeData,
    pub operator: SyntaxKind,
    pub prefix: bool,
    pub argument: &'a Expression<'a>,
}

/// A binary or logical expression, told apart by `data.kind`.
#[derive(Debug)]
pub struct BinaryExpression<'a> {
    pub data: NodeData,
    pub operator: SyntaxKind,
    pub left: &'a Expression<'a>,
    pub right: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct AssignmentExpression<'a> {
    pub data: NodeData,
    pub operator: SyntaxKind,
    pub left: &'a Expression<'a>,
    pub right: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct ConditionalExpression<'a> {
    pub data: NodeData,
    pub test: &'a Expression<'a>,
    pub consequent: &'a Expression<'a>,
    pub alternate: &'a Expression<'a>,
}

/// A call or `new` expression, told apart by `data.kind`.
#[derive(Debug)]
pub struct CallExpression<'a> {
    pub data: NodeData,
    pub callee: &'a Expression<'a>,
    pub arguments: NodeList<'a, Expression<'a>>,
}

#[derive(Debug)]
pub struct MemberExpression<'a> {
    pub data: NodeData,
    pub object: &'a Expression<'a>,
    pub property: &'a Expression<'a>,
    /// `a[b]` rather than `a.b`.
    pub computed: bool,
}
