//! The atomic mapping: one fixed `js_*` block type per node kind.

use crate::context::ImportContext;
use blocklify_ast::dump::number_to_string;
use blocklify_ast::{
    Expression, ForInStatement, ForInit, ForStatement, Function, IfStatement, Literal, LiteralValue,
    MemberExpression, ObjectExpression, PropertyKey, PropertyKind, Statement, SyntaxKind,
    VariableDeclaration, VariableDeclarator,
};
use blocklify_blocks::{Block, BlockError};
use blocklify_diagnostics::messages;

/// A `js_identifier` naming `name`.
pub fn name_block(name: &str) -> Block {
    Block::new("js_identifier").with_field("NAME", name)
}

/// The `js_*` literal block for `literal`.
pub fn literal_block(literal: &Literal<'_>) -> Block {
    match literal.value {
        LiteralValue::Null => Block::new("js_null_value"),
        LiteralValue::Boolean(_) => Block::new("js_literal_bool").with_field("BOOL", literal.raw),
        LiteralValue::Number(n) => Block::new("js_literal_number").with_field("NUMBER", number_to_string(n)),
        LiteralValue::String(s) => Block::new("js_literal_string").with_field("STRING", s),
        LiteralValue::RegExp { pattern, flags } => Block::new("js_regexp_literal")
            .with_field("PATTERN", pattern)
            .with_field("FLAGS", flags),
    }
}

fn operator_text(operator: SyntaxKind) -> &'static str {
    operator.operator_text().unwrap_or("")
}

impl<'a, 'r> ImportContext<'a, 'r> {
    pub(crate) fn atomic_statement(
        &mut self,
        stmt: &'a Statement<'a>,
    ) -> Result<Option<Block>, BlockError> {
        let block = match stmt {
            Statement::Empty(_) => return Ok(None),
            Statement::Expression(statement) => self.convert_expression(statement.expression)?,
            Statement::Block(block) => return self.statement_list(block.body),
            Statement::If(statement) => self.conditional_block("js_if_statement", statement)?,
            Statement::VariableDeclaration(declaration) => self.variable_declaration(declaration)?,
            Statement::FunctionDeclaration(function) => {
                let mut block = self.function_block(function)?;
                block.set_output(false)?;
                block
            }
            Statement::Return(statement) => {
                let mut block = Block::new("js_return_statement");
                if let Some(argument) = statement.argument {
                    self.set_value(&mut block, "VALUE", argument)?;
                }
                block
            }
            Statement::While(statement) => {
                let mut block = Block::new("js_while_statement");
                self.set_value(&mut block, "TEST", statement.test)?;
                if let Some(body) = self.statement_body(statement.body)? {
                    block.set_statement("DO", body)?;
                }
                block
            }
            Statement::For(statement) => self.for_block(statement)?,
            Statement::ForIn(statement) => self.for_in_block(statement, false)?,
            Statement::Break(jump) | Statement::Continue(jump) if jump.label.is_none() => {
                if jump.data.kind == SyntaxKind::BreakStatement {
                    Block::new("js_break_statement")
                } else {
                    Block::new("js_continue_statement")
                }
            }
            Statement::Throw(statement) => {
                let mut block = Block::new("js_throw_statement");
                self.set_value(&mut block, "ARGUMENT", statement.argument)?;
                block
            }
            _ => {
                let data = stmt.data();
                self.placeholder(data.kind, data.range, &messages::NODE_KIND_0_HAS_NO_BLOCK_MAPPING)
            }
        };
        Ok(Some(block))
    }

    pub(crate) fn atomic_expression(&mut self, expr: &'a Expression<'a>) -> Result<Block, BlockError> {
        let block = match expr {
            Expression::This(_) => Block::new("js_this_expression"),
            Expression::Identifier(id) if id.name == "undefined" => Block::new("js_undefined_value"),
            Expression::Identifier(id) => name_block(id.name),
            Expression::Literal(literal) => literal_block(literal),
            Expression::Array(array) => {
                let mut block = Block::new("js_array_expression");
                self.set_array_elements(&mut block, "elements", "ELEMENT", array.elements, "js_null_value")?;
                block
            }
            Expression::Object(object) => self.object_block(object)?,
            Expression::Function(function) => self.function_block(function)?,
            Expression::Unary(unary) => {
                let mut block = Block::new("js_unary_expression")
                    .with_field("OPERATOR", operator_text(unary.operator));
                self.set_value(&mut block, "ARGUMENT", unary.argument)?;
                block
            }
            Expression::Update(update) => {
                let block_type = if update.prefix {
                    "js_update_expression_prefix"
                } else {
                    "js_update_expression_noprefix"
                };
                let mut block = Block::new(block_type).with_field("OPERATOR", operator_text(update.operator));
                self.set_value(&mut block, "ARGUMENT", update.argument)?;
                block
            }
            Expression::Binary(binary) | Expression::Logical(binary) => {
                let block_type = if binary.data.kind == SyntaxKind::LogicalExpression {
                    "js_logical_expression"
                } else {
                    "js_binary_expression"
                };
                let mut block = Block::new(block_type);
                self.set_value(&mut block, "LEFT", binary.left)?;
                block.set_field("OPERATOR", operator_text(binary.operator));
                self.set_value(&mut block, "RIGHT", binary.right)?;
                block
            }
            Expression::Assignment(assignment) => {
                let mut block = Block::new("js_assignment_expression");
                self.set_value(&mut block, "VAR", assignment.left)?;
                block.set_field("OPERATOR", operator_text(assignment.operator));
                self.set_value(&mut block, "VALUE", assignment.right)?;
                block
            }
            Expression::Conditional(conditional) => {
                let mut block = Block::new("js_conditional_expression");
                self.set_value(&mut block, "TEST", conditional.test)?;
                self.set_value(&mut block, "CONSEQUENT", conditional.consequent)?;
                self.set_value(&mut block, "ALTERNATE", conditional.alternate)?;
                block
            }
            Expression::Call(call) | Expression::New(call) => {
                let block_type = if call.data.kind == SyntaxKind::NewExpression {
                    "js_new_expression"
                } else {
                    "js_call_expression"
                };
                let mut block = Block::new(block_type);
                self.set_value(&mut block, "NAME", call.callee)?;
                self.set_clone_values(&mut block, "arguments", "ARGUMENT", call.arguments)?;
                block
            }
            Expression::Member(member) => self.member_block(member)?,
            Expression::Sequence(_) => {
                let data = expr.data();
                self.placeholder(data.kind, data.range, &messages::NODE_KIND_0_HAS_NO_BLOCK_MAPPING)
            }
        };
        Ok(block)
    }

    // ========================================================================
    // Shared shapes
    // ========================================================================

    /// An `if` with its `else if` clauses flattened into `IF{n}`/`DO{n}`
    /// inputs and the final `else` in `ELSE`.
    pub fn conditional_block(
        &mut self,
        block_type: &str,
        statement: &'a IfStatement<'a>,
    ) -> Result<Block, BlockError> {
        let mut clauses = vec![(statement.test, statement.consequent)];
        let mut otherwise = None;
        let mut alternate = statement.alternate;
        while let Some(next) = alternate {
            match next {
                Statement::If(inner) => {
                    clauses.push((inner.test, inner.consequent));
                    alternate = inner.alternate;
                }
                other => {
                    otherwise = Some(other);
                    alternate = None;
                }
            }
        }

        let mut block = Block::new(block_type);
        if clauses.len() > 1 {
            block.set_mutation("elseif", (clauses.len() - 1).to_string());
        }
        if otherwise.is_some() {
            block.set_mutation("else", "1");
        }
        for (i, (test, consequent)) in clauses.into_iter().enumerate() {
            self.set_value(&mut block, format!("IF{}", i), test)?;
            if let Some(body) = self.statement_body(consequent)? {
                block.set_statement(format!("DO{}", i), body)?;
            }
        }
        if let Some(otherwise) = otherwise {
            if let Some(body) = self.statement_body(otherwise)? {
                block.set_statement("ELSE", body)?;
            }
        }
        Ok(block)
    }

    /// `js_for_in_statement`; `declare` marks a loop variable that is
    /// declared by the loop head.
    pub fn for_in_block(
        &mut self,
        statement: &'a ForInStatement<'a>,
        declare: bool,
    ) -> Result<Block, BlockError> {
        let mut block = Block::new("js_for_in_statement");
        match &statement.left {
            ForInit::VariableDeclaration(declaration) => match declaration.declarations {
                [declarator] if declarator.init.is_none() => {
                    block.set_mutation("declare", "true");
                    block.set_value("VAR", name_block(declarator.id.name))?;
                }
                _ => {
                    return Ok(self.placeholder(
                        statement.data.kind,
                        statement.data.range,
                        &messages::NODE_KIND_0_HAS_NO_BLOCK_MAPPING,
                    ))
                }
            },
            ForInit::Expression(left) => {
                block.set_mutation("declare", declare.to_string());
                self.set_value(&mut block, "VAR", left)?;
            }
        }
        self.set_value(&mut block, "OBJECT", statement.right)?;
        if let Some(body) = self.statement_body(statement.body)? {
            block.set_statement("DO", body)?;
        }
        Ok(block)
    }

    /// Each expression of a comma list as a statement of one chain.
    pub fn expression_chain(&mut self, expr: &'a Expression<'a>) -> Result<Option<Block>, BlockError> {
        let expressions = match expr {
            Expression::Sequence(sequence) => sequence.expressions,
            other => std::slice::from_ref(other),
        };
        let mut blocks = Vec::with_capacity(expressions.len());
        for expression in expressions {
            let block = self.convert_expression(expression)?;
            blocks.push(crate::context::to_statement(block)?);
        }
        Block::link(blocks)
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn variable_declaration(&mut self, declaration: &'a VariableDeclaration<'a>) -> Result<Block, BlockError> {
        if let [declarator] = declaration.declarations {
            let mut block = Block::new("js_variable_declaration_unary");
            self.declarator_slots(&mut block, declarator)?;
            return Ok(block);
        }
        let mut declarators = Vec::with_capacity(declaration.declarations.len());
        for declarator in declaration.declarations {
            let mut block = Block::new("js_variable_declarator");
            self.declarator_slots(&mut block, declarator)?;
            declarators.push(block);
        }
        let mut block = Block::new("js_variable_declaration");
        if let Some(head) = Block::link(declarators)? {
            block.set_statement("DECLARATIONS", head)?;
        }
        Ok(block)
    }

    fn declarator_slots(&mut self, block: &mut Block, declarator: &'a VariableDeclarator<'a>) -> Result<(), BlockError> {
        block.set_value("VAR", name_block(declarator.id.name))?;
        if let Some(init) = declarator.init {
            self.set_value(block, "VALUE", init)?;
        }
        Ok(())
    }

    fn for_block(&mut self, statement: &'a ForStatement<'a>) -> Result<Block, BlockError> {
        let mut block = Block::new("js_for_statement");
        let first = match &statement.init {
            Some(ForInit::VariableDeclaration(declaration)) => Some(self.variable_declaration(declaration)?),
            Some(ForInit::Expression(init)) => self.expression_chain(init)?,
            None => None,
        };
        if let Some(first) = first {
            block.set_statement("FIRST", first)?;
        }
        if let Some(test) = statement.test {
            self.set_value(&mut block, "CONDITION", test)?;
        }
        if let Some(update) = statement.update {
            if let Some(step) = self.expression_chain(update)? {
                block.set_statement("STEP", step)?;
            }
        }
        if let Some(body) = self.statement_body(statement.body)? {
            block.set_statement("DO", body)?;
        }
        Ok(block)
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn function_block(&mut self, function: &'a Function<'a>) -> Result<Block, BlockError> {
        let mut block = match function.id {
            Some(id) => {
                let mut block = Block::new("js_function_expression");
                block.set_value("NAME", name_block(id.name))?;
                block
            }
            None => Block::new("js_anonimous_function_expression"),
        };
        block.set_mutation("params", function.params.len().to_string());
        for (i, param) in function.params.iter().enumerate() {
            block.set_value(format!("PARAM{}", i), name_block(param.name))?;
        }
        if let Some(stack) = self.statement_list(function.body.body)? {
            block.set_statement("STACK", stack)?;
        }
        Ok(block)
    }

    fn object_block(&mut self, object: &'a ObjectExpression<'a>) -> Result<Block, BlockError> {
        let mut elements = Vec::with_capacity(object.properties.len());
        for property in object.properties {
            if property.kind != PropertyKind::Init {
                let data = property.data;
                elements.push(self.placeholder(data.kind, data.range, &messages::NODE_KIND_0_HAS_NO_BLOCK_MAPPING));
                continue;
            }
            let key = match &property.key {
                PropertyKey::Identifier(id) => name_block(id.name),
                PropertyKey::Literal(literal) => literal_block(literal),
            };
            let mut element = Block::new("js_json_element");
            element.set_value("KEY", key)?;
            self.set_value(&mut element, "VALUE", property.value)?;
            elements.push(element);
        }
        let mut block = Block::new("js_json_object");
        if let Some(head) = Block::link(elements)? {
            block.set_statement("ELEMENTS", head)?;
        }
        Ok(block)
    }

    /// Flatten `a.b[c].d` into one block: `MEMBER0` holds the innermost
    /// object, `MEMBER1..` the properties from the inside out.
    fn member_block(&mut self, member: &'a MemberExpression<'a>) -> Result<Block, BlockError> {
        let mut accesses = vec![member];
        let mut object = member.object;
        while let Expression::Member(inner) = object {
            accesses.push(inner);
            object = inner.object;
        }

        let mut block = Block::new("js_member_expression");
        block.set_mutation("members", (accesses.len() + 1).to_string());
        self.set_value(&mut block, "MEMBER0", object)?;
        for (i, access) in accesses.into_iter().rev().enumerate() {
            let property = match access.property {
                Expression::Identifier(id) if access.computed => {
                    let mut computed = Block::new("js_computed_member_expression");
                    computed.set_value("MEMBER", name_block(id.name))?;
                    computed
                }
                Expression::Identifier(id) => name_block(id.name),
                other => self.convert_expression(other)?,
            };
            block.set_value(format!("MEMBER{}", i + 1), property)?;
        }
        Ok(block)
    }
}
