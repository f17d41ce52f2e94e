//! Emitters for the Blockly core blocks the pattern importer produces.

use crate::{
    conditional, invalid_field, number_field, quote, required_field, Code, Emitter, EmitterTable,
    GenerateError, Generator,
};
use blocklify_ast::Order;
use blocklify_blocks::Block;

/// The Blockly core dialect, registered as an external table by default.
pub struct BlocklyTable;

impl EmitterTable for BlocklyTable {
    fn name(&self) -> &str {
        "blockly"
    }

    fn emitter(&self, block_type: &str) -> Option<Emitter> {
        let emitter: Emitter = match block_type {
            "logic_null" => |_, _| Ok(Code::Value("null".to_string(), Order::ATOMIC)),
            "math_number" => |_, block| number_field(block, "NUM"),
            "text" => text,
            "logic_boolean" => logic_boolean,
            "controls_if" => conditional,
            "lists_create_with" => lists_create_with,
            "controls_whileUntil" => controls_while_until,
            "math_arithmetic" => math_arithmetic,
            "controls_repeat" => controls_repeat,
            "controls_repeat_ext" => controls_repeat_ext,
            _ => return None,
        };
        Some(emitter)
    }
}

/// An optional operand; Blockly fills empty sockets with a default.
fn operand(
    generator: &mut Generator,
    block: &Block,
    name: &str,
    order: Order,
    right_operand: bool,
    default: &str,
) -> Result<String, GenerateError> {
    match block.value(name) {
        Some(child) => generator.expression(child, order, right_operand),
        None => Ok(default.to_string()),
    }
}

fn text(_: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    Ok(Code::Value(quote(required_field(block, "TEXT")?), Order::ATOMIC))
}

fn logic_boolean(_: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    let code = match required_field(block, "BOOL")? {
        "TRUE" => "true",
        "FALSE" => "false",
        other => return Err(invalid_field(block, "BOOL", other)),
    };
    Ok(Code::Value(code.to_string(), Order::ATOMIC))
}

fn lists_create_with(generator: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    let items = generator.clone_values(block, "items", "ADD", Order::ASSIGNMENT, Some("null"))?;
    Ok(Code::Value(format!("[{}]", items), Order::ATOMIC))
}

fn controls_while_until(generator: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    let condition = match block.field("MODE").unwrap_or("WHILE") {
        "WHILE" => operand(generator, block, "BOOL", Order::NONE, false, "false")?,
        "UNTIL" => {
            let test = operand(generator, block, "BOOL", Order::LOGICAL_NOT, false, "false")?;
            format!("!{}", test)
        }
        other => return Err(invalid_field(block, "MODE", other)),
    };
    let body = generator.statement_input(block, "DO")?;
    Ok(Code::Statement(format!("while ({}) {{\n{}}}\n", condition, body)))
}

fn math_arithmetic(generator: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    let (operator, order) = match required_field(block, "OP")? {
        "ADD" => (" + ", Order::ADDITION),
        "MINUS" => (" - ", Order::ADDITION),
        "MULTIPLY" => (" * ", Order::MULTIPLICATION),
        "DIVIDE" => (" / ", Order::MULTIPLICATION),
        "POWER" => {
            let a = operand(generator, block, "A", Order::ASSIGNMENT, false, "0")?;
            let b = operand(generator, block, "B", Order::ASSIGNMENT, false, "0")?;
            return Ok(Code::Value(
                format!("Math.pow({}, {})", a, b),
                Order::FUNCTION_CALL,
            ));
        }
        other => return Err(invalid_field(block, "OP", other)),
    };
    let a = operand(generator, block, "A", order, false, "0")?;
    let b = operand(generator, block, "B", order, true, "0")?;
    Ok(Code::Value(format!("{}{}{}", a, operator, b), order))
}

fn repeat_loop(generator: &mut Generator, block: &Block, times: String) -> Result<Code, GenerateError> {
    let code = generator.with_repeat_counter(|generator, counter| {
        let body = generator.statement_input(block, "DO")?;
        Ok(format!(
            "for (var {c} = 0; {c} < {times}; {c}++) {{\n{body}}}\n",
            c = counter,
            times = times,
            body = body
        ))
    })?;
    Ok(Code::Statement(code))
}

fn controls_repeat(generator: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    let times = match number_field(block, "TIMES")? {
        Code::Value(code, _) | Code::Statement(code) => code,
    };
    repeat_loop(generator, block, times)
}

fn controls_repeat_ext(generator: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    let times = operand(generator, block, "TIMES", Order::RELATIONAL, true, "0")?;
    repeat_loop(generator, block, times)
}
