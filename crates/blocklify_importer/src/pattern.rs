//! Pattern recognizers for the Blockly core block set.
//!
//! Recognizers are heuristics. Each one inspects a node (and, for some, its
//! neighbors in the enclosing statement list) and either produces a block,
//! asks for the node to be elided, or declines so the next recognizer is
//! tried.

use crate::atomic::name_block;
use crate::context::{AstNode, ImportContext};
use blocklify_ast::dump::number_to_string;
use blocklify_ast::{Expression, ForInit, ForStatement, LiteralValue, Statement, SyntaxKind};
use blocklify_blocks::{Block, BlockError};

/// What a recognizer made of a node.
#[derive(Debug)]
pub enum Recognition {
    Block(Block),
    /// Produce nothing for this statement; a neighbor absorbs it.
    Skip,
    Decline,
}

pub trait PatternRecognizer: Send + Sync {
    fn name(&self) -> &'static str;

    fn recognize<'a>(
        &self,
        node: AstNode<'a>,
        cx: &mut ImportContext<'a, '_>,
    ) -> Result<Recognition, BlockError>;
}

/// The Blockly core recognizers, in the order they are tried.
pub fn blockly_recognizers() -> Vec<Box<dyn PatternRecognizer>> {
    vec![
        Box::new(LiteralRecognizer),
        Box::new(IfRecognizer),
        Box::new(ListRecognizer),
        Box::new(WhileUntilRecognizer),
        Box::new(ArithmeticRecognizer),
        Box::new(CountedRepeatRecognizer),
        Box::new(ForInDeclarationRecognizer),
    ]
}

// ============================================================================
// Values
// ============================================================================

/// `null`, numbers, strings and booleans as `logic_null`, `math_number`,
/// `text` and `logic_boolean`.
pub struct LiteralRecognizer;

impl PatternRecognizer for LiteralRecognizer {
    fn name(&self) -> &'static str {
        "literal"
    }

    fn recognize<'a>(&self, node: AstNode<'a>, _cx: &mut ImportContext<'a, '_>) -> Result<Recognition, BlockError> {
        let AstNode::Expression(Expression::Literal(literal)) = node else {
            return Ok(Recognition::Decline);
        };
        let block = match literal.value {
            LiteralValue::Null => Block::new("logic_null"),
            LiteralValue::Number(n) => Block::new("math_number").with_field("NUM", number_to_string(n)),
            LiteralValue::String(s) => Block::new("text").with_field("TEXT", s),
            LiteralValue::Boolean(b) => {
                Block::new("logic_boolean").with_field("BOOL", if b { "TRUE" } else { "FALSE" })
            }
            LiteralValue::RegExp { .. } => return Ok(Recognition::Decline),
        };
        Ok(Recognition::Block(block))
    }
}

/// Array literals as `lists_create_with`.
pub struct ListRecognizer;

impl PatternRecognizer for ListRecognizer {
    fn name(&self) -> &'static str {
        "lists_create_with"
    }

    fn recognize<'a>(&self, node: AstNode<'a>, cx: &mut ImportContext<'a, '_>) -> Result<Recognition, BlockError> {
        let AstNode::Expression(Expression::Array(array)) = node else {
            return Ok(Recognition::Decline);
        };
        let mut block = Block::new("lists_create_with");
        cx.set_array_elements(&mut block, "items", "ADD", array.elements, "logic_null")?;
        Ok(Recognition::Block(block))
    }
}

/// `+ - * /` as `math_arithmetic`.
pub struct ArithmeticRecognizer;

impl PatternRecognizer for ArithmeticRecognizer {
    fn name(&self) -> &'static str {
        "math_arithmetic"
    }

    fn recognize<'a>(&self, node: AstNode<'a>, cx: &mut ImportContext<'a, '_>) -> Result<Recognition, BlockError> {
        let AstNode::Expression(Expression::Binary(binary)) = node else {
            return Ok(Recognition::Decline);
        };
        let op = match binary.operator {
            SyntaxKind::PlusToken => "ADD",
            SyntaxKind::MinusToken => "MINUS",
            SyntaxKind::AsteriskToken => "MULTIPLY",
            SyntaxKind::SlashToken => "DIVIDE",
            _ => return Ok(Recognition::Decline),
        };
        let mut block = Block::new("math_arithmetic");
        cx.set_value(&mut block, "A", binary.left)?;
        block.set_field("OP", op);
        cx.set_value(&mut block, "B", binary.right)?;
        Ok(Recognition::Block(block))
    }
}

// ============================================================================
// Control flow
// ============================================================================

/// `if` / `else if` / `else` as `controls_if`.
pub struct IfRecognizer;

impl PatternRecognizer for IfRecognizer {
    fn name(&self) -> &'static str {
        "controls_if"
    }

    fn recognize<'a>(&self, node: AstNode<'a>, cx: &mut ImportContext<'a, '_>) -> Result<Recognition, BlockError> {
        let AstNode::Statement(Statement::If(statement)) = node else {
            return Ok(Recognition::Decline);
        };
        cx.conditional_block("controls_if", statement).map(Recognition::Block)
    }
}

/// `while (x)` as `controls_whileUntil` in WHILE mode, `while (!x)` in
/// UNTIL mode on `x`.
pub struct WhileUntilRecognizer;

impl PatternRecognizer for WhileUntilRecognizer {
    fn name(&self) -> &'static str {
        "controls_whileUntil"
    }

    fn recognize<'a>(&self, node: AstNode<'a>, cx: &mut ImportContext<'a, '_>) -> Result<Recognition, BlockError> {
        let AstNode::Statement(Statement::While(statement)) = node else {
            return Ok(Recognition::Decline);
        };
        let (mode, test) = match statement.test {
            Expression::Unary(unary) if unary.operator == SyntaxKind::ExclamationToken => ("UNTIL", unary.argument),
            test => ("WHILE", test),
        };
        let mut block = Block::new("controls_whileUntil").with_field("MODE", mode);
        cx.set_value(&mut block, "BOOL", test)?;
        if let Some(body) = cx.statement_body(statement.body)? {
            block.set_statement("DO", body)?;
        }
        Ok(Recognition::Block(block))
    }
}

/// `for (var count = 0; count < N; count++)` as `controls_repeat_ext`.
///
/// The loop variable must be the only declaration, start with `count`,
/// start at 0, be compared with `<`, and step by exactly one (`++` or
/// `+= 1`). Anything else is left to the `for` mapping.
pub struct CountedRepeatRecognizer;

impl CountedRepeatRecognizer {
    fn counter<'a>(statement: &'a ForStatement<'a>) -> Option<&'a str> {
        let Some(ForInit::VariableDeclaration(declaration)) = &statement.init else {
            return None;
        };
        let [declarator] = declaration.declarations else {
            return None;
        };
        let name = declarator.id.name;
        let starts_at_zero = matches!(
            declarator.init,
            Some(Expression::Literal(literal)) if literal.value == LiteralValue::Number(0.0)
        );
        (name.starts_with("count") && starts_at_zero).then_some(name)
    }

    fn is_named(expr: &Expression<'_>, name: &str) -> bool {
        matches!(expr, Expression::Identifier(id) if id.name == name)
    }

    fn steps_by_one(update: &Expression<'_>, name: &str) -> bool {
        match update {
            Expression::Update(update) => {
                update.operator == SyntaxKind::PlusPlusToken && Self::is_named(update.argument, name)
            }
            Expression::Assignment(assignment) => {
                assignment.operator == SyntaxKind::PlusEqualsToken
                    && Self::is_named(assignment.left, name)
                    && matches!(
                        assignment.right,
                        Expression::Literal(literal) if literal.value == LiteralValue::Number(1.0)
                    )
            }
            _ => false,
        }
    }
}

impl PatternRecognizer for CountedRepeatRecognizer {
    fn name(&self) -> &'static str {
        "controls_repeat_ext"
    }

    fn recognize<'a>(&self, node: AstNode<'a>, cx: &mut ImportContext<'a, '_>) -> Result<Recognition, BlockError> {
        let AstNode::Statement(Statement::For(statement)) = node else {
            return Ok(Recognition::Decline);
        };
        let Some(name) = Self::counter(statement) else {
            return Ok(Recognition::Decline);
        };
        let limit = match statement.test {
            Some(Expression::Binary(test))
                if test.operator == SyntaxKind::LessThanToken && Self::is_named(test.left, name) =>
            {
                test.right
            }
            _ => return Ok(Recognition::Decline),
        };
        if !statement.update.is_some_and(|update| Self::steps_by_one(update, name)) {
            return Ok(Recognition::Decline);
        }

        let mut block = Block::new("controls_repeat_ext");
        cx.set_value(&mut block, "TIMES", limit)?;
        if let Some(body) = cx.statement_body(statement.body)? {
            block.set_statement("DO", body)?;
        }
        Ok(Recognition::Block(block))
    }
}

/// `var k; for (k in o) ...` as a single `for (var k in o)` loop: the bare
/// declaration is elided and the loop declares its variable.
pub struct ForInDeclarationRecognizer;

impl ForInDeclarationRecognizer {
    /// The name a bare single `var x;` declares.
    fn bare_declaration<'a>(stmt: &'a Statement<'a>) -> Option<&'a str> {
        match stmt {
            Statement::VariableDeclaration(declaration) => match declaration.declarations {
                [declarator] if declarator.init.is_none() => Some(declarator.id.name),
                _ => None,
            },
            _ => None,
        }
    }

    /// The identifier a `for (x in o)` loop assigns.
    fn loop_variable<'a>(stmt: &'a Statement<'a>) -> Option<&'a str> {
        match stmt {
            Statement::ForIn(statement) => match &statement.left {
                ForInit::Expression(Expression::Identifier(id)) => Some(id.name),
                _ => None,
            },
            _ => None,
        }
    }
}

impl PatternRecognizer for ForInDeclarationRecognizer {
    fn name(&self) -> &'static str {
        "for_in_declaration"
    }

    fn recognize<'a>(&self, node: AstNode<'a>, cx: &mut ImportContext<'a, '_>) -> Result<Recognition, BlockError> {
        let AstNode::Statement(stmt) = node else {
            return Ok(Recognition::Decline);
        };
        if let Some(declared) = Self::bare_declaration(stmt) {
            let absorbed = cx
                .next_statement()
                .and_then(Self::loop_variable)
                .is_some_and(|name| name == declared);
            return Ok(if absorbed { Recognition::Skip } else { Recognition::Decline });
        }
        if let (Some(name), Statement::ForIn(statement)) = (Self::loop_variable(stmt), stmt) {
            let declared = cx
                .previous_statement()
                .and_then(Self::bare_declaration)
                .is_some_and(|declared| declared == name);
            if declared {
                return cx.for_in_block(statement, true).map(Recognition::Block);
            }
        }
        Ok(Recognition::Decline)
    }
}
