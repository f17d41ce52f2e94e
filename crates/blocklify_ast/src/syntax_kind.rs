//! SyntaxKind enum - all token and node kinds in the JavaScript AST.
//!
//! Node kinds are named after their ESTree `type` so that `Display` yields
//! the name reported by import placeholders.

/// The kind of a syntax token or node in the AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum SyntaxKind {
    // ========================================================================
    // Tokens
    // ========================================================================
    Unknown = 0,
    EndOfFileToken,

    // Literals
    NumericLiteral,
    StringLiteral,
    RegularExpressionLiteral,

    // Punctuation
    OpenBraceToken,
    CloseBraceToken,
    OpenParenToken,
    CloseParenToken,
    OpenBracketToken,
    CloseBracketToken,
    DotToken,
    SemicolonToken,
    CommaToken,
    QuestionToken,
    ColonToken,

    // Operators
    LessThanToken,
    GreaterThanToken,
    LessThanEqualsToken,
    GreaterThanEqualsToken,
    EqualsEqualsToken,
    ExclamationEqualsToken,
    EqualsEqualsEqualsToken,
    ExclamationEqualsEqualsToken,
    PlusToken,
    MinusToken,
    AsteriskToken,
    SlashToken,
    PercentToken,
    PlusPlusToken,
    MinusMinusToken,
    LessThanLessThanToken,
    GreaterThanGreaterThanToken,
    GreaterThanGreaterThanGreaterThanToken,
    AmpersandToken,
    BarToken,
    CaretToken,
    ExclamationToken,
    TildeToken,
    AmpersandAmpersandToken,
    BarBarToken,

    // Assignments
    EqualsToken,
    PlusEqualsToken,
    MinusEqualsToken,
    AsteriskEqualsToken,
    SlashEqualsToken,
    PercentEqualsToken,
    LessThanLessThanEqualsToken,
    GreaterThanGreaterThanEqualsToken,
    GreaterThanGreaterThanGreaterThanEqualsToken,
    AmpersandEqualsToken,
    BarEqualsToken,
    CaretEqualsToken,

    // Identifiers (token and node)
    Identifier,

    // Keywords
    BreakKeyword,
    CaseKeyword,
    CatchKeyword,
    ContinueKeyword,
    DebuggerKeyword,
    DefaultKeyword,
    DeleteKeyword,
    DoKeyword,
    ElseKeyword,
    FalseKeyword,
    FinallyKeyword,
    ForKeyword,
    FunctionKeyword,
    IfKeyword,
    InKeyword,
    InstanceOfKeyword,
    NewKeyword,
    NullKeyword,
    ReturnKeyword,
    SwitchKeyword,
    ThisKeyword,
    ThrowKeyword,
    TrueKeyword,
    TryKeyword,
    TypeOfKeyword,
    VarKeyword,
    VoidKeyword,
    WhileKeyword,
    WithKeyword,

    // ========================================================================
    // Nodes
    // ========================================================================
    Program,

    // Statements
    EmptyStatement,
    DebuggerStatement,
    ExpressionStatement,
    BlockStatement,
    IfStatement,
    LabeledStatement,
    BreakStatement,
    ContinueStatement,
    WithStatement,
    SwitchStatement,
    SwitchCase,
    ReturnStatement,
    ThrowStatement,
    TryStatement,
    CatchClause,
    WhileStatement,
    DoWhileStatement,
    ForStatement,
    ForInStatement,
    VariableDeclaration,
    VariableDeclarator,
    FunctionDeclaration,

    // Expressions
    ThisExpression,
    Literal,
    ArrayExpression,
    ObjectExpression,
    ObjectElement,
    FunctionExpression,
    SequenceExpression,
    UnaryExpression,
    UpdateExpression,
    BinaryExpression,
    LogicalExpression,
    AssignmentExpression,
    ConditionalExpression,
    NewExpression,
    CallExpression,
    MemberExpression,
}

impl SyntaxKind {
    /// Whether this is a keyword token.
    #[inline]
    pub fn is_keyword(self) -> bool {
        self >= SyntaxKind::BreakKeyword && self <= SyntaxKind::WithKeyword
    }

    /// Whether this is a punctuation or operator token.
    #[inline]
    pub fn is_punctuation(self) -> bool {
        self >= SyntaxKind::OpenBraceToken && self <= SyntaxKind::CaretEqualsToken
    }

    /// Whether this is an assignment operator (`=`, `+=`, ...).
    #[inline]
    pub fn is_assignment_operator(self) -> bool {
        self >= SyntaxKind::EqualsToken && self <= SyntaxKind::CaretEqualsToken
    }

    /// Whether this is a literal token.
    #[inline]
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            SyntaxKind::NumericLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::RegularExpressionLiteral
        )
    }

    /// Whether this kind names an AST node rather than a token.
    #[inline]
    pub fn is_node(self) -> bool {
        self >= SyntaxKind::Program || self == SyntaxKind::Identifier
    }

    /// Whether this is a prefix-only unary operator.
    pub fn is_prefix_operator(self) -> bool {
        matches!(
            self,
            SyntaxKind::ExclamationToken
                | SyntaxKind::TildeToken
                | SyntaxKind::PlusToken
                | SyntaxKind::MinusToken
                | SyntaxKind::TypeOfKeyword
                | SyntaxKind::VoidKeyword
                | SyntaxKind::DeleteKeyword
        )
    }

    /// Whether this is `++` or `--`.
    #[inline]
    pub fn is_update_operator(self) -> bool {
        matches!(self, SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken)
    }

    /// Whether this is `&&` or `||`.
    #[inline]
    pub fn is_logical_operator(self) -> bool {
        matches!(
            self,
            SyntaxKind::AmpersandAmpersandToken | SyntaxKind::BarBarToken
        )
    }

    /// Whether an expression may start right after this token.
    ///
    /// After such a token a `/` begins a regular expression rather than a
    /// division.
    pub fn is_before_expr(self) -> bool {
        match self {
            SyntaxKind::OpenBracketToken
            | SyntaxKind::OpenBraceToken
            | SyntaxKind::OpenParenToken
            | SyntaxKind::CommaToken
            | SyntaxKind::SemicolonToken
            | SyntaxKind::ColonToken
            | SyntaxKind::QuestionToken => true,
            SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken => false,
            SyntaxKind::CaseKeyword
            | SyntaxKind::ElseKeyword
            | SyntaxKind::ReturnKeyword
            | SyntaxKind::ThrowKeyword
            | SyntaxKind::NewKeyword
            | SyntaxKind::InKeyword
            | SyntaxKind::InstanceOfKeyword
            | SyntaxKind::TypeOfKeyword
            | SyntaxKind::VoidKeyword
            | SyntaxKind::DeleteKeyword => true,
            kind => kind >= SyntaxKind::LessThanToken && kind <= SyntaxKind::CaretEqualsToken,
        }
    }

    /// Get the keyword text for a keyword kind, or None if not a keyword.
    pub fn keyword_text(self) -> Option<&'static str> {
        match self {
            SyntaxKind::BreakKeyword => Some("break"),
            SyntaxKind::CaseKeyword => Some("case"),
            SyntaxKind::CatchKeyword => Some("catch"),
            SyntaxKind::ContinueKeyword => Some("continue"),
            SyntaxKind::DebuggerKeyword => Some("debugger"),
            SyntaxKind::DefaultKeyword => Some("default"),
            SyntaxKind::DeleteKeyword => Some("delete"),
            SyntaxKind::DoKeyword => Some("do"),
            SyntaxKind::ElseKeyword => Some("else"),
            SyntaxKind::FalseKeyword => Some("false"),
            SyntaxKind::FinallyKeyword => Some("finally"),
            SyntaxKind::ForKeyword => Some("for"),
            SyntaxKind::FunctionKeyword => Some("function"),
            SyntaxKind::IfKeyword => Some("if"),
            SyntaxKind::InKeyword => Some("in"),
            SyntaxKind::InstanceOfKeyword => Some("instanceof"),
            SyntaxKind::NewKeyword => Some("new"),
            SyntaxKind::NullKeyword => Some("null"),
            SyntaxKind::ReturnKeyword => Some("return"),
            SyntaxKind::SwitchKeyword => Some("switch"),
            SyntaxKind::ThisKeyword => Some("this"),
            SyntaxKind::ThrowKeyword => Some("throw"),
            SyntaxKind::TrueKeyword => Some("true"),
            SyntaxKind::TryKeyword => Some("try"),
            SyntaxKind::TypeOfKeyword => Some("typeof"),
            SyntaxKind::VarKeyword => Some("var"),
            SyntaxKind::VoidKeyword => Some("void"),
            SyntaxKind::WhileKeyword => Some("while"),
            SyntaxKind::WithKeyword => Some("with"),
            _ => None,
        }
    }

    /// Look up a keyword SyntaxKind from text.
    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        match text {
            "break" => Some(SyntaxKind::BreakKeyword),
            "case" => Some(SyntaxKind::CaseKeyword),
            "catch" => Some(SyntaxKind::CatchKeyword),
            "continue" => Some(SyntaxKind::ContinueKeyword),
            "debugger" => Some(SyntaxKind::DebuggerKeyword),
            "default" => Some(SyntaxKind::DefaultKeyword),
            "delete" => Some(SyntaxKind::DeleteKeyword),
            "do" => Some(SyntaxKind::DoKeyword),
            "else" => Some(SyntaxKind::ElseKeyword),
            "false" => Some(SyntaxKind::FalseKeyword),
            "finally" => Some(SyntaxKind::FinallyKeyword),
            "for" => Some(SyntaxKind::ForKeyword),
            "function" => Some(SyntaxKind::FunctionKeyword),
            "if" => Some(SyntaxKind::IfKeyword),
            "in" => Some(SyntaxKind::InKeyword),
            "instanceof" => Some(SyntaxKind::InstanceOfKeyword),
            "new" => Some(SyntaxKind::NewKeyword),
            "null" => Some(SyntaxKind::NullKeyword),
            "return" => Some(SyntaxKind::ReturnKeyword),
            "switch" => Some(SyntaxKind::SwitchKeyword),
            "this" => Some(SyntaxKind::ThisKeyword),
            "throw" => Some(SyntaxKind::ThrowKeyword),
            "true" => Some(SyntaxKind::TrueKeyword),
            "try" => Some(SyntaxKind::TryKeyword),
            "typeof" => Some(SyntaxKind::TypeOfKeyword),
            "var" => Some(SyntaxKind::VarKeyword),
            "void" => Some(SyntaxKind::VoidKeyword),
            "while" => Some(SyntaxKind::WhileKeyword),
            "with" => Some(SyntaxKind::WithKeyword),
            _ => None,
        }
    }

    /// Get the punctuation text for a punctuation kind, or None.
    pub fn punctuation_text(self) -> Option<&'static str> {
        match self {
            SyntaxKind::OpenBraceToken => Some("{"),
            SyntaxKind::CloseBraceToken => Some("}"),
            SyntaxKind::OpenParenToken => Some("("),
            SyntaxKind::CloseParenToken => Some(")"),
            SyntaxKind::OpenBracketToken => Some("["),
            SyntaxKind::CloseBracketToken => Some("]"),
            SyntaxKind::DotToken => Some("."),
            SyntaxKind::SemicolonToken => Some(";"),
            SyntaxKind::CommaToken => Some(","),
            SyntaxKind::QuestionToken => Some("?"),
            SyntaxKind::ColonToken => Some(":"),
            SyntaxKind::LessThanToken => Some("<"),
            SyntaxKind::GreaterThanToken => Some(">"),
            SyntaxKind::LessThanEqualsToken => Some("<="),
            SyntaxKind::GreaterThanEqualsToken => Some(">="),
            SyntaxKind::EqualsEqualsToken => Some("=="),
            SyntaxKind::ExclamationEqualsToken => Some("!="),
            SyntaxKind::EqualsEqualsEqualsToken => Some("==="),
            SyntaxKind::ExclamationEqualsEqualsToken => Some("!=="),
            SyntaxKind::PlusToken => Some("+"),
            SyntaxKind::MinusToken => Some("-"),
            SyntaxKind::AsteriskToken => Some("*"),
            SyntaxKind::SlashToken => Some("/"),
            SyntaxKind::PercentToken => Some("%"),
            SyntaxKind::PlusPlusToken => Some("++"),
            SyntaxKind::MinusMinusToken => Some("--"),
            SyntaxKind::LessThanLessThanToken => Some("<<"),
            SyntaxKind::GreaterThanGreaterThanToken => Some(">>"),
            SyntaxKind::GreaterThanGreaterThanGreaterThanToken => Some(">>>"),
            SyntaxKind::AmpersandToken => Some("&"),
            SyntaxKind::BarToken => Some("|"),
            SyntaxKind::CaretToken => Some("^"),
            SyntaxKind::ExclamationToken => Some("!"),
            SyntaxKind::TildeToken => Some("~"),
            SyntaxKind::AmpersandAmpersandToken => Some("&&"),
            SyntaxKind::BarBarToken => Some("||"),
            SyntaxKind::EqualsToken => Some("="),
            SyntaxKind::PlusEqualsToken => Some("+="),
            SyntaxKind::MinusEqualsToken => Some("-="),
            SyntaxKind::AsteriskEqualsToken => Some("*="),
            SyntaxKind::SlashEqualsToken => Some("/="),
            SyntaxKind::PercentEqualsToken => Some("%="),
            SyntaxKind::LessThanLessThanEqualsToken => Some("<<="),
            SyntaxKind::GreaterThanGreaterThanEqualsToken => Some(">>="),
            SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken => Some(">>>="),
            SyntaxKind::AmpersandEqualsToken => Some("&="),
            SyntaxKind::BarEqualsToken => Some("|="),
            SyntaxKind::CaretEqualsToken => Some("^="),
            _ => None,
        }
    }

    /// Source text of an operator token, including keyword operators such
    /// as `typeof` and `in`.
    pub fn operator_text(self) -> Option<&'static str> {
        self.punctuation_text().or_else(|| match self {
            SyntaxKind::InKeyword
            | SyntaxKind::InstanceOfKeyword
            | SyntaxKind::TypeOfKeyword
            | SyntaxKind::VoidKeyword
            | SyntaxKind::DeleteKeyword => self.keyword_text(),
            _ => None,
        })
    }

    /// Inverse of [`SyntaxKind::operator_text`].
    pub fn from_operator_text(text: &str) -> Option<SyntaxKind> {
        let kind = match text {
            "<" => SyntaxKind::LessThanToken,
            ">" => SyntaxKind::GreaterThanToken,
            "<=" => SyntaxKind::LessThanEqualsToken,
            ">=" => SyntaxKind::GreaterThanEqualsToken,
            "==" => SyntaxKind::EqualsEqualsToken,
            "!=" => SyntaxKind::ExclamationEqualsToken,
            "===" => SyntaxKind::EqualsEqualsEqualsToken,
            "!==" => SyntaxKind::ExclamationEqualsEqualsToken,
            "+" => SyntaxKind::PlusToken,
            "-" => SyntaxKind::MinusToken,
            "*" => SyntaxKind::AsteriskToken,
            "/" => SyntaxKind::SlashToken,
            "%" => SyntaxKind::PercentToken,
            "++" => SyntaxKind::PlusPlusToken,
            "--" => SyntaxKind::MinusMinusToken,
            "<<" => SyntaxKind::LessThanLessThanToken,
            ">>" => SyntaxKind::GreaterThanGreaterThanToken,
            ">>>" => SyntaxKind::GreaterThanGreaterThanGreaterThanToken,
            "&" => SyntaxKind::AmpersandToken,
            "|" => SyntaxKind::BarToken,
            "^" => SyntaxKind::CaretToken,
            "!" => SyntaxKind::ExclamationToken,
            "~" => SyntaxKind::TildeToken,
            "&&" => SyntaxKind::AmpersandAmpersandToken,
            "||" => SyntaxKind::BarBarToken,
            "=" => SyntaxKind::EqualsToken,
            "+=" => SyntaxKind::PlusEqualsToken,
            "-=" => SyntaxKind::MinusEqualsToken,
            "*=" => SyntaxKind::AsteriskEqualsToken,
            "/=" => SyntaxKind::SlashEqualsToken,
            "%=" => SyntaxKind::PercentEqualsToken,
            "<<=" => SyntaxKind::LessThanLessThanEqualsToken,
            ">>=" => SyntaxKind::GreaterThanGreaterThanEqualsToken,
            ">>>=" => SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken,
            "&=" => SyntaxKind::AmpersandEqualsToken,
            "|=" => SyntaxKind::BarEqualsToken,
            "^=" => SyntaxKind::CaretEqualsToken,
            "in" => SyntaxKind::InKeyword,
            "instanceof" => SyntaxKind::InstanceOfKeyword,
            "typeof" => SyntaxKind::TypeOfKeyword,
            "void" => SyntaxKind::VoidKeyword,
            "delete" => SyntaxKind::DeleteKeyword,
            _ => return None,
        };
        Some(kind)
    }

    /// A short description of a token for listings: its text when fixed,
    /// otherwise the kind name.
    pub fn token_text(self) -> &'static str {
        match self {
            SyntaxKind::EndOfFileToken => "eof",
            SyntaxKind::NumericLiteral => "num",
            SyntaxKind::StringLiteral => "string",
            SyntaxKind::RegularExpressionLiteral => "regexp",
            SyntaxKind::Identifier => "name",
            _ => self
                .punctuation_text()
                .or_else(|| self.keyword_text())
                .unwrap_or("unknown"),
        }
    }
}

impl std::fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
