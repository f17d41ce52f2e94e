//! Emitters for the `js_*` block types.

use crate::{
    conditional, expression_statement, invalid_field, missing_input, mutation_count, number_field,
    quote, required_field, required_value, Code, Emitter, EmitterTable, GenerateError, Generator,
};
use blocklify_ast::precedence::{binary_operator_order, unary_operator_order};
use blocklify_ast::{Order, SyntaxKind};
use blocklify_blocks::Block;

/// The table every generator consults first.
pub struct JavaScriptTable;

impl EmitterTable for JavaScriptTable {
    fn name(&self) -> &str {
        "javascript"
    }

    fn emitter(&self, block_type: &str) -> Option<Emitter> {
        let emitter: Emitter = match block_type {
            "js_literal_number" => literal_number,
            "js_literal_string" => literal_string,
            "js_literal_bool" => literal_bool,
            "js_null_value" => |_, _| atom("null"),
            "js_undefined_value" => |_, _| atom("undefined"),
            "js_this_expression" => |_, _| atom("this"),
            "js_regexp_literal" => regexp_literal,
            "js_identifier" => identifier,
            "js_computed_member_expression" => computed_member_expression,
            "js_member_expression" => member_expression,
            "js_assignment_expression" => assignment_expression,
            "js_variable_declarator" | "js_variable_declaration_unary" => variable_declaration_unary,
            "js_variable_declaration" => variable_declaration,
            "js_call_expression" => call_expression,
            "js_new_expression" => new_expression,
            "js_function_expression" => function_expression,
            "js_anonimous_function_expression" => anonymous_function_expression,
            "js_return_statement" => return_statement,
            "js_update_expression_prefix" => update_expression_prefix,
            "js_update_expression_noprefix" => update_expression_noprefix,
            "js_binary_expression" | "js_logical_expression" => binary_expression,
            "js_unary_expression" => unary_expression,
            "js_conditional_expression" => conditional_expression,
            "js_json_object" => json_object,
            "js_json_element" => json_element,
            "js_array_expression" => array_expression,
            "js_if_statement" => conditional,
            "js_while_statement" => while_statement,
            "js_for_statement" => for_statement,
            "js_for_in_statement" => for_in_statement,
            "js_break_statement" => |_, _| Ok(Code::Statement("break;\n".to_string())),
            "js_continue_statement" => |_, _| Ok(Code::Statement("continue;\n".to_string())),
            "js_throw_statement" => throw_statement,
            "js_expression_statement" => expression_statement_block,
            "js_blocklify" => verbatim,
            "js_notimplemented" => not_implemented,
            _ => return None,
        };
        Some(emitter)
    }
}

fn atom(code: impl Into<String>) -> Result<Code, GenerateError> {
    Ok(Code::Value(code.into(), Order::ATOMIC))
}

// ============================================================================
// Literals and names
// ============================================================================

fn literal_number(_: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    number_field(block, "NUMBER")
}

fn literal_string(_: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    atom(quote(required_field(block, "STRING")?))
}

fn literal_bool(_: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    match required_field(block, "BOOL")? {
        "true" | "TRUE" => atom("true"),
        "false" | "FALSE" => atom("false"),
        other => Err(invalid_field(block, "BOOL", other)),
    }
}

fn regexp_literal(_: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    let pattern = match required_field(block, "PATTERN")? {
        "" => "(?:)",
        pattern => pattern,
    };
    let flags = block.field("FLAGS").unwrap_or("");
    atom(format!("/{}/{}", pattern, flags))
}

fn identifier(_: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    atom(required_field(block, "NAME")?)
}

// ============================================================================
// Members
// ============================================================================

/// The key of a computed access stands for its own expression.
fn computed_member_expression(generator: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    let key = required_value(block, "MEMBER")?;
    generator.block_to_code(key)
}

/// `MEMBER0.MEMBER1[MEMBER2]...`: identifiers become dotted names, every
/// other block becomes a bracketed key.
fn member_expression(generator: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    let count = mutation_count(block, "members")?;
    if count == 0 {
        return Err(GenerateError::InvalidMutation {
            block_type: block.block_type().to_string(),
            mutation: "members".to_string(),
        });
    }
    let object = required_value(block, "MEMBER0")?;
    let (mut code, object_order) = match generator.block_to_code(object)? {
        Code::Value(code, order) if order.needs_parentheses(Order::FUNCTION_CALL, false) => {
            (format!("({})", code), Order::ATOMIC)
        }
        Code::Value(code, order) => (code, order),
        Code::Statement(_) => {
            return Err(GenerateError::NotAValue {
                block_type: object.block_type().to_string(),
            })
        }
    };
    if !code.is_empty() && code.bytes().all(|b| b.is_ascii_digit()) {
        code = format!("({})", code);
    }

    for i in 1..count {
        let name = format!("MEMBER{}", i);
        let property = required_value(block, &name)?;
        if property.block_type() == "js_identifier" {
            code.push('.');
            code.push_str(required_field(property, "NAME")?);
        } else {
            let key = generator.expression(property, Order::NONE, false)?;
            code.push('[');
            code.push_str(&key);
            code.push(']');
        }
    }

    // A call inside the chain keeps `new` from taking the chain as its callee.
    let order = if object_order == Order::FUNCTION_CALL {
        Order::FUNCTION_CALL
    } else {
        Order::MEMBER
    };
    Ok(Code::Value(code, order))
}

// ============================================================================
// Assignment and declarations
// ============================================================================

fn assignment_expression(generator: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    let operator = required_field(block, "OPERATOR")?;
    let is_assignment = SyntaxKind::from_operator_text(operator)
        .is_some_and(|kind| kind.is_assignment_operator());
    if !is_assignment {
        return Err(invalid_field(block, "OPERATOR", operator));
    }
    let target = generator.value_to_code(block, "VAR", Order::ASSIGNMENT)?;
    let value = generator.value_to_code(block, "VALUE", Order::ASSIGNMENT)?;
    Ok(Code::Value(
        format!("{} {} {}", target, operator, value),
        Order::ASSIGNMENT,
    ))
}

fn declarator(generator: &mut Generator, block: &Block) -> Result<String, GenerateError> {
    let name = generator.value_to_code(block, "VAR", Order::ATOMIC)?;
    Ok(match generator.optional_value(block, "VALUE", Order::ASSIGNMENT)? {
        Some(value) => format!("{} = {}", name, value),
        None => name,
    })
}

fn variable_declaration_unary(generator: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    let declarator = declarator(generator, block)?;
    Ok(Code::Statement(format!("var {};\n", declarator)))
}

fn variable_declaration(generator: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    let head = block
        .statement("DECLARATIONS")
        .ok_or_else(|| missing_input(block, "DECLARATIONS"))?;
    let mut declarators = Vec::new();
    for item in head.chain() {
        declarators.push(declarator(generator, item)?);
    }
    Ok(Code::Statement(format!("var {};\n", declarators.join(", "))))
}

// ============================================================================
// Calls and functions
// ============================================================================

fn call_expression(generator: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    let callee = generator.value_to_code(block, "NAME", Order::FUNCTION_CALL)?;
    let arguments = generator.clone_values(block, "arguments", "ARGUMENT", Order::ASSIGNMENT, None)?;
    Ok(Code::Value(
        format!("{}({})", callee, arguments),
        Order::FUNCTION_CALL,
    ))
}

fn new_expression(generator: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    let callee = generator.value_to_code(block, "NAME", Order::NEW)?;
    let arguments = generator.clone_values(block, "arguments", "ARGUMENT", Order::ASSIGNMENT, None)?;
    Ok(Code::Value(format!("new {}({})", callee, arguments), Order::NEW))
}

fn function_code(
    generator: &mut Generator,
    block: &Block,
    name: Option<&str>,
) -> Result<String, GenerateError> {
    let params = generator.clone_values(block, "params", "PARAM", Order::ATOMIC, None)?;
    let body = generator.with_in_operator(true, |g| g.statement_input(block, "STACK"))?;
    Ok(match name {
        Some(name) => format!("function {}({}) {{\n{}}}", name, params, body),
        None => format!("function ({}) {{\n{}}}", params, body),
    })
}

/// A named function: a declaration when it has no output, an expression
/// otherwise.
fn function_expression(generator: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    let name = generator.value_to_code(block, "NAME", Order::ATOMIC)?;
    let code = function_code(generator, block, Some(&name))?;
    if block.has_output() {
        Ok(Code::Value(code, Order::ATOMIC))
    } else {
        Ok(Code::Statement(code + "\n"))
    }
}

fn anonymous_function_expression(generator: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    Ok(Code::Value(function_code(generator, block, None)?, Order::ATOMIC))
}

fn return_statement(generator: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    Ok(Code::Statement(
        match generator.optional_value(block, "VALUE", Order::NONE)? {
            Some(value) => format!("return {};\n", value),
            None => "return;\n".to_string(),
        },
    ))
}

// ============================================================================
// Operators
// ============================================================================

fn update_operator(block: &Block) -> Result<&str, GenerateError> {
    match required_field(block, "OPERATOR")? {
        operator @ ("++" | "--") => Ok(operator),
        other => Err(invalid_field(block, "OPERATOR", other)),
    }
}

fn update_expression_prefix(generator: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    let operator = update_operator(block)?;
    let argument = generator.value_to_code(block, "ARGUMENT", Order::INCREMENT)?;
    Ok(Code::Value(format!("{}{}", operator, argument), Order::INCREMENT))
}

fn update_expression_noprefix(generator: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    let operator = update_operator(block)?;
    let argument = generator.value_to_code(block, "ARGUMENT", Order::INCREMENT)?;
    Ok(Code::Value(format!("{}{}", argument, operator), Order::INCREMENT))
}

fn binary_expression(generator: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    let operator = required_field(block, "OPERATOR")?;
    let order = SyntaxKind::from_operator_text(operator)
        .and_then(binary_operator_order)
        .ok_or_else(|| invalid_field(block, "OPERATOR", operator))?;
    let left = generator.value_to_code(block, "LEFT", order)?;
    let right = generator.right_operand_to_code(block, "RIGHT", order)?;
    let code = format!("{} {} {}", left, operator, right);
    if operator == "in" && !generator.in_allowed() {
        return atom(format!("({})", code));
    }
    Ok(Code::Value(code, order))
}

fn unary_expression(generator: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    let operator = required_field(block, "OPERATOR")?;
    let order = SyntaxKind::from_operator_text(operator)
        .filter(|kind| !kind.is_update_operator())
        .and_then(unary_operator_order)
        .ok_or_else(|| invalid_field(block, "OPERATOR", operator))?;
    let argument = generator.value_to_code(block, "ARGUMENT", order)?;
    let is_word = operator.bytes().all(|b| b.is_ascii_alphabetic());
    // `- -x` and `+ +x` must not fuse into `--x` and `++x`.
    let fuses = matches!(operator, "-" | "+") && argument.starts_with(operator);
    let separator = if is_word || fuses { " " } else { "" };
    Ok(Code::Value(format!("{}{}{}", operator, separator, argument), order))
}

fn conditional_expression(generator: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    let test = generator.right_operand_to_code(block, "TEST", Order::CONDITIONAL)?;
    let consequent = generator.value_to_code(block, "CONSEQUENT", Order::ASSIGNMENT)?;
    let alternate = generator.value_to_code(block, "ALTERNATE", Order::ASSIGNMENT)?;
    Ok(Code::Value(
        format!("{} ? {} : {}", test, consequent, alternate),
        Order::CONDITIONAL,
    ))
}

// ============================================================================
// Objects and arrays
// ============================================================================

fn json_object(generator: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    let Some(head) = block.statement("ELEMENTS") else {
        return atom("{}");
    };
    let mut elements = Vec::new();
    for element in head.chain() {
        match generator.block_to_code(element)? {
            Code::Value(code, _) => elements.push(code),
            Code::Statement(_) => {
                return Err(GenerateError::NotAValue {
                    block_type: element.block_type().to_string(),
                })
            }
        }
    }
    let body = generator.indent(&format!("{}\n", elements.join(",\n")));
    atom(format!("{{\n{}}}", body))
}

/// `KEY: VALUE`, only meaningful inside a `js_json_object`.
fn json_element(generator: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    let key = required_value(block, "KEY")?;
    let key = if key.block_type() == "js_identifier" {
        required_field(key, "NAME")?.to_string()
    } else {
        generator.expression(key, Order::ATOMIC, false)?
    };
    let value = generator.value_to_code(block, "VALUE", Order::ASSIGNMENT)?;
    Ok(Code::Value(format!("{}: {}", key, value), Order::COMMA))
}

fn array_expression(generator: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    let elements = generator.clone_values(block, "elements", "ELEMENT", Order::ASSIGNMENT, None)?;
    atom(format!("[{}]", elements))
}

// ============================================================================
// Loops and jumps
// ============================================================================

fn while_statement(generator: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    let test = generator.value_to_code(block, "TEST", Order::NONE)?;
    let body = generator.statement_input(block, "DO")?;
    Ok(Code::Statement(format!("while ({}) {{\n{}}}\n", test, body)))
}

fn for_statement(generator: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    let first = generator.with_in_operator(false, |g| g.inline_statements(block, "FIRST"))?;
    let condition = generator.optional_value(block, "CONDITION", Order::NONE)?;
    let step = generator.inline_statements(block, "STEP")?;
    let body = generator.statement_input(block, "DO")?;

    let mut code = format!("for ({};", first);
    if let Some(condition) = condition {
        code.push(' ');
        code.push_str(&condition);
    }
    code.push(';');
    if !step.is_empty() {
        code.push(' ');
        code.push_str(&step);
    }
    code.push_str(&format!(") {{\n{}}}\n", body));
    Ok(Code::Statement(code))
}

fn for_in_statement(generator: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    let declare = if block.mutation("declare") == Some("true") {
        "var "
    } else {
        ""
    };
    let target = generator.value_to_code(block, "VAR", Order::NONE)?;
    let object = generator.value_to_code(block, "OBJECT", Order::NONE)?;
    let body = generator.statement_input(block, "DO")?;
    Ok(Code::Statement(format!(
        "for ({}{} in {}) {{\n{}}}\n",
        declare, target, object, body
    )))
}

fn throw_statement(generator: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    let argument = generator.value_to_code(block, "ARGUMENT", Order::NONE)?;
    Ok(Code::Statement(format!("throw {};\n", argument)))
}

fn expression_statement_block(generator: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    let code = generator.value_to_code(block, "EXPRESSION", Order::NONE)?;
    Ok(Code::Statement(expression_statement(&code)))
}

// ============================================================================
// Raw code and placeholders
// ============================================================================

/// `CODE` as written. As a value it is parenthesized wherever any
/// operator binds.
fn verbatim(_: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    let code = required_field(block, "CODE")?;
    if block.has_output() {
        return Ok(Code::Value(code.to_string(), Order::NONE));
    }
    let mut code = code.to_string();
    if !code.ends_with('\n') {
        code.push('\n');
    }
    Ok(Code::Statement(code))
}

fn not_implemented(_: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    Err(GenerateError::Placeholder {
        node_kind: block.field("TYPE").unwrap_or("unknown").to_string(),
    })
}
