//! blocklify_generator: Block tree to code.
//!
//! The [`Generator`] walks a [`BlockDocument`] and asks an emitter for each
//! block. Value blocks answer with their code and its binding [`Order`], so
//! the parent can decide whether the child needs parentheses. Statement
//! blocks answer with finished lines.
//!
//! Emitters are looked up in the local `js_*` table first and then in the
//! external tables, in registration order. The Blockly core table is
//! registered by default.

pub mod blockly;
pub mod javascript;

pub use blockly::BlocklyTable;
pub use javascript::JavaScriptTable;

use blocklify_ast::dump::number_to_string;
use blocklify_ast::Order;
use blocklify_blocks::{Block, BlockDocument, BlockError, MAX_NESTING_DEPTH};
use blocklify_diagnostics::{messages, DiagnosticMessage};
use blocklify_options::GeneratorOptions;
use thiserror::Error;
use tracing::debug;

// ============================================================================
// Errors
// ============================================================================

fn render1(message: &DiagnosticMessage, a: &str) -> String {
    message.format(&[a])
}

fn render2(message: &DiagnosticMessage, a: &str, b: &str) -> String {
    message.format(&[a, b])
}

fn render3(message: &DiagnosticMessage, a: &str, b: &str, c: &str) -> String {
    message.format(&[a, b, c])
}

/// A block tree that cannot be turned into code.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum GenerateError {
    #[error("{}", render2(&messages::LANGUAGE_0_DOES_NOT_KNOW_BLOCK_TYPE_1, .language, .block_type))]
    #[diagnostic(code(blocklify::generate::unsupported_block))]
    UnsupportedBlockType { language: String, block_type: String },

    #[error("{}", render2(&messages::BLOCK_0_IS_MISSING_INPUT_1, .block_type, .input))]
    #[diagnostic(code(blocklify::generate::missing_input))]
    MissingInput { block_type: String, input: String },

    #[error("{}", render2(&messages::BLOCK_0_IS_MISSING_FIELD_1, .block_type, .field))]
    #[diagnostic(code(blocklify::generate::missing_field))]
    MissingField { block_type: String, field: String },

    #[error("{}", render2(&messages::BLOCK_0_HAS_INVALID_MUTATION_1, .block_type, .mutation))]
    #[diagnostic(code(blocklify::generate::invalid_mutation))]
    InvalidMutation { block_type: String, mutation: String },

    #[error("{}", render3(&messages::BLOCK_0_HAS_INVALID_VALUE_1_IN_FIELD_2, .block_type, .value, .field))]
    #[diagnostic(code(blocklify::generate::invalid_field))]
    InvalidField {
        block_type: String,
        field: String,
        value: String,
    },

    /// An import gap reached the generator.
    #[error("{}", render1(&messages::PLACEHOLDER_FOR_0_CANNOT_BE_GENERATED, .node_kind))]
    #[diagnostic(code(blocklify::generate::placeholder))]
    Placeholder { node_kind: String },

    #[error("{}", render1(&messages::BLOCK_0_CANNOT_BE_USED_AS_A_VALUE, .block_type))]
    #[diagnostic(code(blocklify::generate::not_a_value))]
    NotAValue { block_type: String },

    #[error(transparent)]
    #[diagnostic(code(blocklify::generate::document))]
    Block(#[from] BlockError),
}

// ============================================================================
// Emitters
// ============================================================================

/// What an emitter produces for one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Code {
    /// An expression and the order of its outermost operator.
    Value(String, Order),
    /// Complete statement lines, each ending in a newline.
    Statement(String),
}

/// Produces the code for one block.
pub type Emitter = fn(&mut Generator, &Block) -> Result<Code, GenerateError>;

/// A lookup table from block type to emitter.
pub trait EmitterTable: Send + Sync {
    fn name(&self) -> &str;

    fn emitter(&self, block_type: &str) -> Option<Emitter>;
}

// ============================================================================
// Generator
// ============================================================================

pub struct Generator {
    options: GeneratorOptions,
    local: JavaScriptTable,
    externals: Vec<Box<dyn EmitterTable>>,
    /// Nesting depth of counted repeat loops, used to name their counters.
    repeat_depth: usize,
    /// Blocks currently being generated, outermost first.
    depth: usize,
    /// Cleared inside `for` initializers, where a bare `in` would start a
    /// `for-in` loop.
    in_allowed: bool,
}

impl Generator {
    /// A generator with the Blockly core table registered.
    pub fn new(options: GeneratorOptions) -> Self {
        Self::with_tables(options, vec![Box::new(BlocklyTable)])
    }

    pub fn with_tables(options: GeneratorOptions, externals: Vec<Box<dyn EmitterTable>>) -> Self {
        Self {
            options,
            local: JavaScriptTable,
            externals,
            repeat_depth: 0,
            depth: 0,
            in_allowed: true,
        }
    }

    /// Append a table; it is consulted after the ones already registered.
    pub fn register(&mut self, table: Box<dyn EmitterTable>) {
        self.externals.push(table);
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Generate the code for every top-level chain of `document`.
    ///
    /// Chains are separated by a blank line; the result carries no
    /// trailing newline.
    pub fn generate(&mut self, document: &BlockDocument) -> Result<String, GenerateError> {
        self.repeat_depth = 0;
        self.depth = 0;
        self.in_allowed = true;
        let mut chains = Vec::with_capacity(document.blocks.len());
        for head in &document.blocks {
            chains.push(self.chain_to_code(head)?);
        }
        let code = chains.join("\n");
        Ok(code.trim_end_matches('\n').to_string())
    }

    fn find_emitter(&self, block_type: &str) -> Option<Emitter> {
        if let Some(emitter) = self.local.emitter(block_type) {
            return Some(emitter);
        }
        self.externals.iter().find_map(|table| {
            let emitter = table.emitter(block_type)?;
            debug!(table = table.name(), block_type, "emitter found in external table");
            Some(emitter)
        })
    }

    /// Run the emitter registered for `block`.
    pub fn block_to_code(&mut self, block: &Block) -> Result<Code, GenerateError> {
        let Some(emitter) = self.find_emitter(block.block_type()) else {
            return Err(GenerateError::UnsupportedBlockType {
                language: self.options.language_name.clone(),
                block_type: block.block_type().to_string(),
            });
        };
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(BlockError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
            }
            .into());
        }
        self.depth += 1;
        let result = emitter(self, block);
        self.depth -= 1;
        result
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// The lines for one block placed in a statement position.
    pub fn statement_to_code(&mut self, block: &Block) -> Result<String, GenerateError> {
        Ok(match self.block_to_code(block)? {
            Code::Statement(code) => code,
            Code::Value(code, _) => expression_statement(&code),
        })
    }

    /// The lines for `head` and every block linked after it.
    pub fn chain_to_code(&mut self, head: &Block) -> Result<String, GenerateError> {
        let mut code = String::new();
        for block in head.chain() {
            code.push_str(&self.statement_to_code(block)?);
        }
        Ok(code)
    }

    /// The indented body held by the statement input `name`, empty when
    /// the input is absent.
    pub fn statement_input(&mut self, block: &Block, name: &str) -> Result<String, GenerateError> {
        match block.statement(name) {
            Some(head) => {
                let code = self.chain_to_code(head)?;
                Ok(self.indent(&code))
            }
            None => Ok(String::new()),
        }
    }

    /// A statement chain flattened to one line per statement without the
    /// trailing `;`, as found in `for` headers.
    pub fn inline_statements(&mut self, block: &Block, name: &str) -> Result<String, GenerateError> {
        let Some(head) = block.statement(name) else {
            return Ok(String::new());
        };
        let mut parts = Vec::new();
        for statement in head.chain() {
            let code = self.statement_to_code(statement)?;
            let code = code.trim_end_matches('\n');
            parts.push(code.strip_suffix(';').unwrap_or(code).to_string());
        }
        Ok(parts.join(", "))
    }

    /// Prefix every non-empty line of `code` with one indentation level.
    pub fn indent(&self, code: &str) -> String {
        let mut out = String::with_capacity(code.len() + self.options.indent.len() * 4);
        for line in code.split_inclusive('\n') {
            if line != "\n" {
                out.push_str(&self.options.indent);
            }
            out.push_str(line);
        }
        out
    }

    // ========================================================================
    // Values
    // ========================================================================

    /// Code for the child block `child` requested at `order`.
    ///
    /// The child is parenthesized when its own order binds looser than
    /// `order`, or equally when it is the right operand of a binary
    /// operator.
    pub fn expression(
        &mut self,
        child: &Block,
        order: Order,
        right_operand: bool,
    ) -> Result<String, GenerateError> {
        match self.block_to_code(child)? {
            Code::Value(code, inner) if inner.needs_parentheses(order, right_operand) => {
                Ok(format!("({})", code))
            }
            Code::Value(code, _) => Ok(code),
            Code::Statement(_) => Err(GenerateError::NotAValue {
                block_type: child.block_type().to_string(),
            }),
        }
    }

    /// Code for the value input `name`, which must be present.
    pub fn value_to_code(&mut self, block: &Block, name: &str, order: Order) -> Result<String, GenerateError> {
        let child = required_value(block, name)?;
        self.expression(child, order, false)
    }

    /// Like [`value_to_code`](Self::value_to_code) for the right operand of
    /// a left-associative operator.
    pub fn right_operand_to_code(
        &mut self,
        block: &Block,
        name: &str,
        order: Order,
    ) -> Result<String, GenerateError> {
        let child = required_value(block, name)?;
        self.expression(child, order, true)
    }

    /// Code for the value input `name`, or `None` when it is empty.
    pub fn optional_value(
        &mut self,
        block: &Block,
        name: &str,
        order: Order,
    ) -> Result<Option<String>, GenerateError> {
        match block.value(name) {
            Some(child) => self.expression(child, order, false).map(Some),
            None => Ok(None),
        }
    }

    /// Code for the clone inputs `prefix0..` counted by `count`, joined
    /// with `", "`.
    pub fn clone_values(
        &mut self,
        block: &Block,
        count: &str,
        prefix: &str,
        order: Order,
        empty: Option<&str>,
    ) -> Result<String, GenerateError> {
        let n = mutation_count(block, count)?;
        let mut parts = Vec::with_capacity(n);
        for i in 0..n {
            let name = format!("{}{}", prefix, i);
            let code = match (self.optional_value(block, &name, order)?, empty) {
                (Some(code), _) => code,
                (None, Some(empty)) => empty.to_string(),
                (None, None) => return Err(missing_input(block, &name)),
            };
            parts.push(code);
        }
        Ok(parts.join(", "))
    }

    /// Whether a binary `in` may appear unparenthesized here.
    pub fn in_allowed(&self) -> bool {
        self.in_allowed
    }

    /// Run `body` with the `in` operator allowed or forbidden outside
    /// parentheses.
    pub fn with_in_operator<R>(
        &mut self,
        allowed: bool,
        body: impl FnOnce(&mut Self) -> Result<R, GenerateError>,
    ) -> Result<R, GenerateError> {
        let saved = std::mem::replace(&mut self.in_allowed, allowed);
        let result = body(self);
        self.in_allowed = saved;
        result
    }

    // ========================================================================
    // Loop counters
    // ========================================================================

    /// Run `body` with a fresh repeat counter name: `count`, `count2`, ...
    pub fn with_repeat_counter<R>(
        &mut self,
        body: impl FnOnce(&mut Self, &str) -> Result<R, GenerateError>,
    ) -> Result<R, GenerateError> {
        let name = match self.repeat_depth {
            0 => "count".to_string(),
            depth => format!("count{}", depth + 1),
        };
        self.repeat_depth += 1;
        let result = body(self, &name);
        self.repeat_depth -= 1;
        result
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(GeneratorOptions::default())
    }
}

// ============================================================================
// Helpers shared by the tables
// ============================================================================

/// `code;` on its own line. Code that would read as a declaration or a
/// block is parenthesized.
pub fn expression_statement(code: &str) -> String {
    if code.starts_with("function") || code.starts_with('{') {
        format!("({});\n", code)
    } else {
        format!("{};\n", code)
    }
}

/// A single-quoted string literal.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

pub fn required_field<'b>(block: &'b Block, name: &str) -> Result<&'b str, GenerateError> {
    block.field(name).ok_or_else(|| GenerateError::MissingField {
        block_type: block.block_type().to_string(),
        field: name.to_string(),
    })
}

pub fn required_value<'b>(block: &'b Block, name: &str) -> Result<&'b Block, GenerateError> {
    block.value(name).ok_or_else(|| missing_input(block, name))
}

pub fn missing_input(block: &Block, name: &str) -> GenerateError {
    GenerateError::MissingInput {
        block_type: block.block_type().to_string(),
        input: name.to_string(),
    }
}

pub fn invalid_field(block: &Block, field: &str, value: &str) -> GenerateError {
    GenerateError::InvalidField {
        block_type: block.block_type().to_string(),
        field: field.to_string(),
        value: value.to_string(),
    }
}

/// A numeric mutation attribute; absent counts as zero.
pub fn mutation_count(block: &Block, name: &str) -> Result<usize, GenerateError> {
    match block.mutation(name) {
        None => Ok(0),
        Some(text) => text.trim().parse().map_err(|_| GenerateError::InvalidMutation {
            block_type: block.block_type().to_string(),
            mutation: name.to_string(),
        }),
    }
}

/// The number held by `field`, normalized. Negative numbers bind like a
/// unary minus.
pub fn number_field(block: &Block, field: &str) -> Result<Code, GenerateError> {
    let text = required_field(block, field)?;
    let value: f64 = text.trim().parse().map_err(|_| invalid_field(block, field, text))?;
    let code = number_to_string(value);
    let order = if code.starts_with('-') {
        Order::UNARY_NEGATION
    } else {
        Order::ATOMIC
    };
    Ok(Code::Value(code, order))
}

/// `if (..) {..} else if (..) {..} else {..}` for `controls_if` style
/// blocks: `IF0`/`DO0`, then the `elseif` count of further pairs, then
/// `ELSE`.
pub fn conditional(generator: &mut Generator, block: &Block) -> Result<Code, GenerateError> {
    let branches = mutation_count(block, "elseif")? + 1;
    let mut code = String::new();
    for i in 0..branches {
        if i > 0 {
            code.push_str(" else ");
        }
        let condition = generator.value_to_code(block, &format!("IF{}", i), Order::NONE)?;
        let body = generator.statement_input(block, &format!("DO{}", i))?;
        code.push_str(&format!("if ({}) {{\n{}}}", condition, body));
    }
    if mutation_count(block, "else")? > 0 || block.statement("ELSE").is_some() {
        let body = generator.statement_input(block, "ELSE")?;
        code.push_str(&format!(" else {{\n{}}}", body));
    }
    code.push('\n');
    Ok(Code::Statement(code))
}

// ============================================================================
// Entry points
// ============================================================================

/// Generate code for `document` with default options.
pub fn block_tree_to_code(document: &BlockDocument) -> Result<String, GenerateError> {
    Generator::default().generate(document)
}

/// Read a block XML document and generate its code with default options.
pub fn generate_from_xml(xml: &str) -> Result<String, GenerateError> {
    let document = BlockDocument::from_xml(xml)?;
    block_tree_to_code(&document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote() {
        assert_eq!(quote("it's"), r"'it\'s'");
        assert_eq!(quote("a\\b\nc"), r"'a\\b\nc'");
        assert_eq!(quote(""), "''");
    }

    #[test]
    fn test_expression_statement() {
        assert_eq!(expression_statement("f()"), "f();\n");
        assert_eq!(expression_statement("function () {\n}"), "(function () {\n});\n");
        assert_eq!(expression_statement("{}"), "({});\n");
    }

    #[test]
    fn test_indent() {
        let generator = Generator::default();
        assert_eq!(generator.indent("a();\n\nb();\n"), "  a();\n\n  b();\n");
        assert_eq!(generator.indent(""), "");
    }

    #[test]
    fn test_number_field() {
        let block = Block::new("js_literal_number").with_field("NUMBER", "1.50");
        assert_eq!(number_field(&block, "NUMBER").unwrap(), Code::Value("1.5".into(), Order::ATOMIC));
        let negative = Block::new("math_number").with_field("NUM", "-2");
        assert_eq!(
            number_field(&negative, "NUM").unwrap(),
            Code::Value("-2".into(), Order::UNARY_NEGATION)
        );
        let bad = Block::new("math_number").with_field("NUM", "ten");
        assert!(matches!(
            number_field(&bad, "NUM"),
            Err(GenerateError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_mutation_count() {
        let mut block = Block::new("js_if_statement");
        assert_eq!(mutation_count(&block, "elseif").unwrap(), 0);
        block.set_mutation("elseif", "3");
        assert_eq!(mutation_count(&block, "elseif").unwrap(), 3);
        block.set_mutation("elseif", "many");
        let err = mutation_count(&block, "elseif").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Block \"js_if_statement\" has an invalid \"elseif\" mutation."
        );
    }

    #[test]
    fn test_repeat_counter_names() {
        let mut generator = Generator::default();
        let names = generator
            .with_repeat_counter(|g, outer| {
                let inner = g.with_repeat_counter(|g, inner| {
                    let third = g.with_repeat_counter(|_, third| Ok(third.to_string()))?;
                    Ok(format!("{} {}", inner, third))
                })?;
                Ok(format!("{} {}", outer, inner))
            })
            .unwrap();
        assert_eq!(names, "count count2 count3");
        assert_eq!(generator.repeat_depth, 0);
    }
}
