//! Block schema registry.
//!
//! Each block type declares its slots: text fields, value inputs that hold
//! one nested expression block, and statement inputs that hold the head of
//! a `next` chain. Clone slots (`ARGUMENT0`, `ARGUMENT1`, ...) are numbered
//! inputs whose count lives in a mutation attribute.

use crate::block::BlockError;
use rustc_hash::FxHashMap;
use std::sync::OnceLock;

/// The role a slot plays inside its block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Field,
    Value,
    Statement,
}

/// Whether a slot appears once or as a numbered series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Single,
    /// `NAME0`, `NAME1`, ...; the mutation attribute `count` holds how many.
    Numbered { count: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSpec {
    pub name: &'static str,
    pub kind: SlotKind,
    pub repeat: Repeat,
}

impl SlotSpec {
    pub const fn field(name: &'static str) -> Self {
        Self {
            name,
            kind: SlotKind::Field,
            repeat: Repeat::Single,
        }
    }

    pub const fn value(name: &'static str) -> Self {
        Self {
            name,
            kind: SlotKind::Value,
            repeat: Repeat::Single,
        }
    }

    pub const fn statement(name: &'static str) -> Self {
        Self {
            name,
            kind: SlotKind::Statement,
            repeat: Repeat::Single,
        }
    }

    pub const fn numbered(name: &'static str, kind: SlotKind, count: &'static str) -> Self {
        Self {
            name,
            kind,
            repeat: Repeat::Numbered { count },
        }
    }

    /// Whether `slot` names this slot (or one of its numbered instances).
    pub fn matches(&self, slot: &str) -> bool {
        match self.repeat {
            Repeat::Single => slot == self.name,
            Repeat::Numbered { .. } => slot
                .strip_prefix(self.name)
                .is_some_and(|index| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit())),
        }
    }
}

/// How a block type connects to its surroundings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputRole {
    /// Always produces a value.
    Value,
    /// Always a statement in a `next` chain.
    Statement,
    /// Either, toggled by the `output` mutation attribute.
    Switchable { default_output: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSchema {
    pub block_type: &'static str,
    /// The AST node kind this block type is the primary mapping for.
    pub node_kind: Option<&'static str>,
    pub output: OutputRole,
    pub slots: &'static [SlotSpec],
}

impl BlockSchema {
    pub fn has_output_by_default(&self) -> bool {
        match self.output {
            OutputRole::Value => true,
            OutputRole::Statement => false,
            OutputRole::Switchable { default_output } => default_output,
        }
    }

    pub fn is_switchable(&self) -> bool {
        matches!(self.output, OutputRole::Switchable { .. })
    }

    /// Whether this block type may take the given output role.
    pub fn allows_output(&self, output: bool) -> bool {
        match self.output {
            OutputRole::Value => output,
            OutputRole::Statement => !output,
            OutputRole::Switchable { .. } => true,
        }
    }

    pub fn slot(&self, name: &str) -> Option<&SlotSpec> {
        self.slots.iter().find(|slot| slot.matches(name))
    }
}

const fn schema(
    block_type: &'static str,
    node_kind: Option<&'static str>,
    output: OutputRole,
    slots: &'static [SlotSpec],
) -> BlockSchema {
    BlockSchema {
        block_type,
        node_kind,
        output,
        slots,
    }
}

const VALUE: OutputRole = OutputRole::Value;
const STATEMENT: OutputRole = OutputRole::Statement;
const AS_STATEMENT: OutputRole = OutputRole::Switchable {
    default_output: false,
};
const AS_VALUE: OutputRole = OutputRole::Switchable {
    default_output: true,
};

const CONDITIONAL_SLOTS: &[SlotSpec] = &[
    SlotSpec::numbered("IF", SlotKind::Value, "elseif"),
    SlotSpec::numbered("DO", SlotKind::Statement, "elseif"),
    SlotSpec::statement("ELSE"),
];

// ============================================================================
// JavaScript dialect
// ============================================================================

/// Block types of the `js_*` dialect the atomic importer produces.
pub static JAVASCRIPT_SCHEMAS: &[BlockSchema] = &[
    schema("js_literal_number", Some("Literal"), VALUE, &[SlotSpec::field("NUMBER")]),
    schema("js_literal_string", None, VALUE, &[SlotSpec::field("STRING")]),
    schema("js_literal_bool", None, VALUE, &[SlotSpec::field("BOOL")]),
    schema("js_null_value", None, VALUE, &[]),
    schema("js_undefined_value", None, VALUE, &[]),
    schema(
        "js_regexp_literal",
        None,
        VALUE,
        &[SlotSpec::field("PATTERN"), SlotSpec::field("FLAGS")],
    ),
    schema("js_identifier", Some("Identifier"), VALUE, &[SlotSpec::field("NAME")]),
    schema("js_this_expression", Some("ThisExpression"), VALUE, &[]),
    schema(
        "js_computed_member_expression",
        None,
        VALUE,
        &[SlotSpec::value("MEMBER")],
    ),
    schema(
        "js_member_expression",
        Some("MemberExpression"),
        VALUE,
        &[SlotSpec::numbered("MEMBER", SlotKind::Value, "members")],
    ),
    schema(
        "js_assignment_expression",
        Some("AssignmentExpression"),
        AS_STATEMENT,
        &[
            SlotSpec::value("VAR"),
            SlotSpec::field("OPERATOR"),
            SlotSpec::value("VALUE"),
        ],
    ),
    schema(
        "js_variable_declarator",
        Some("VariableDeclarator"),
        STATEMENT,
        &[SlotSpec::value("VAR"), SlotSpec::value("VALUE")],
    ),
    schema(
        "js_variable_declaration_unary",
        Some("VariableDeclaration"),
        STATEMENT,
        &[SlotSpec::value("VAR"), SlotSpec::value("VALUE")],
    ),
    schema(
        "js_variable_declaration",
        None,
        STATEMENT,
        &[SlotSpec::statement("DECLARATIONS")],
    ),
    schema(
        "js_call_expression",
        Some("CallExpression"),
        AS_STATEMENT,
        &[
            SlotSpec::value("NAME"),
            SlotSpec::numbered("ARGUMENT", SlotKind::Value, "arguments"),
        ],
    ),
    schema(
        "js_new_expression",
        Some("NewExpression"),
        AS_VALUE,
        &[
            SlotSpec::value("NAME"),
            SlotSpec::numbered("ARGUMENT", SlotKind::Value, "arguments"),
        ],
    ),
    schema(
        "js_function_expression",
        Some("FunctionExpression"),
        AS_VALUE,
        &[
            SlotSpec::value("NAME"),
            SlotSpec::numbered("PARAM", SlotKind::Value, "params"),
            SlotSpec::statement("STACK"),
        ],
    ),
    schema(
        "js_anonimous_function_expression",
        None,
        AS_VALUE,
        &[
            SlotSpec::numbered("PARAM", SlotKind::Value, "params"),
            SlotSpec::statement("STACK"),
        ],
    ),
    schema(
        "js_return_statement",
        Some("ReturnStatement"),
        STATEMENT,
        &[SlotSpec::value("VALUE")],
    ),
    schema(
        "js_update_expression_prefix",
        Some("UpdateExpression"),
        AS_STATEMENT,
        &[SlotSpec::field("OPERATOR"), SlotSpec::value("ARGUMENT")],
    ),
    schema(
        "js_update_expression_noprefix",
        None,
        AS_STATEMENT,
        &[SlotSpec::field("OPERATOR"), SlotSpec::value("ARGUMENT")],
    ),
    schema(
        "js_binary_expression",
        Some("BinaryExpression"),
        VALUE,
        &[
            SlotSpec::value("LEFT"),
            SlotSpec::field("OPERATOR"),
            SlotSpec::value("RIGHT"),
        ],
    ),
    schema(
        "js_logical_expression",
        Some("LogicalExpression"),
        VALUE,
        &[
            SlotSpec::value("LEFT"),
            SlotSpec::field("OPERATOR"),
            SlotSpec::value("RIGHT"),
        ],
    ),
    schema(
        "js_unary_expression",
        Some("UnaryExpression"),
        VALUE,
        &[SlotSpec::field("OPERATOR"), SlotSpec::value("ARGUMENT")],
    ),
    schema(
        "js_conditional_expression",
        Some("ConditionalExpression"),
        VALUE,
        &[
            SlotSpec::value("TEST"),
            SlotSpec::value("CONSEQUENT"),
            SlotSpec::value("ALTERNATE"),
        ],
    ),
    schema(
        "js_json_object",
        Some("ObjectExpression"),
        VALUE,
        &[SlotSpec::statement("ELEMENTS")],
    ),
    schema(
        "js_json_element",
        Some("ObjectElement"),
        STATEMENT,
        &[SlotSpec::value("KEY"), SlotSpec::value("VALUE")],
    ),
    schema(
        "js_array_expression",
        Some("ArrayExpression"),
        VALUE,
        &[SlotSpec::numbered("ELEMENT", SlotKind::Value, "elements")],
    ),
    schema("js_if_statement", Some("IfStatement"), STATEMENT, CONDITIONAL_SLOTS),
    schema(
        "js_while_statement",
        Some("WhileStatement"),
        STATEMENT,
        &[SlotSpec::value("TEST"), SlotSpec::statement("DO")],
    ),
    schema(
        "js_for_statement",
        Some("ForStatement"),
        STATEMENT,
        &[
            SlotSpec::statement("FIRST"),
            SlotSpec::value("CONDITION"),
            SlotSpec::statement("STEP"),
            SlotSpec::statement("DO"),
        ],
    ),
    schema(
        "js_for_in_statement",
        Some("ForInStatement"),
        STATEMENT,
        &[
            SlotSpec::value("VAR"),
            SlotSpec::value("OBJECT"),
            SlotSpec::statement("DO"),
        ],
    ),
    schema("js_break_statement", Some("BreakStatement"), STATEMENT, &[]),
    schema("js_continue_statement", Some("ContinueStatement"), STATEMENT, &[]),
    schema(
        "js_throw_statement",
        Some("ThrowStatement"),
        STATEMENT,
        &[SlotSpec::value("ARGUMENT")],
    ),
    schema(
        "js_expression_statement",
        Some("ExpressionStatement"),
        STATEMENT,
        &[SlotSpec::value("EXPRESSION")],
    ),
    schema("js_blocklify", None, AS_STATEMENT, &[SlotSpec::field("CODE")]),
    schema("js_notimplemented", None, AS_STATEMENT, &[SlotSpec::field("TYPE")]),
];

// ============================================================================
// Blockly core dialect
// ============================================================================

/// The subset of Blockly's core blocks the pattern recognizers produce.
pub static BLOCKLY_SCHEMAS: &[BlockSchema] = &[
    schema("logic_null", None, VALUE, &[]),
    schema("math_number", None, VALUE, &[SlotSpec::field("NUM")]),
    schema("text", None, VALUE, &[SlotSpec::field("TEXT")]),
    schema("logic_boolean", None, VALUE, &[SlotSpec::field("BOOL")]),
    schema("controls_if", None, STATEMENT, CONDITIONAL_SLOTS),
    schema(
        "lists_create_with",
        None,
        VALUE,
        &[SlotSpec::numbered("ADD", SlotKind::Value, "items")],
    ),
    schema(
        "controls_whileUntil",
        None,
        STATEMENT,
        &[
            SlotSpec::field("MODE"),
            SlotSpec::value("BOOL"),
            SlotSpec::statement("DO"),
        ],
    ),
    schema(
        "math_arithmetic",
        None,
        VALUE,
        &[
            SlotSpec::value("A"),
            SlotSpec::field("OP"),
            SlotSpec::value("B"),
        ],
    ),
    schema(
        "controls_repeat_ext",
        None,
        STATEMENT,
        &[SlotSpec::value("TIMES"), SlotSpec::statement("DO")],
    ),
];

// ============================================================================
// Registry
// ============================================================================

/// Lookup from block type and from AST node kind to a schema.
///
/// Block types absent from the registry belong to external editors and are
/// accepted without slot validation.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    by_type: FxHashMap<&'static str, &'static BlockSchema>,
    by_kind: FxHashMap<&'static str, &'static BlockSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding both built-in dialects.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for schema in JAVASCRIPT_SCHEMAS.iter().chain(BLOCKLY_SCHEMAS) {
            registry.register(schema);
        }
        registry
    }

    /// The shared built-in registry.
    pub fn global() -> &'static SchemaRegistry {
        static REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();
        REGISTRY.get_or_init(SchemaRegistry::with_builtin)
    }

    /// Add a schema, replacing any earlier one for the same block type.
    pub fn register(&mut self, schema: &'static BlockSchema) {
        self.by_type.insert(schema.block_type, schema);
        if let Some(kind) = schema.node_kind {
            self.by_kind.insert(kind, schema);
        }
    }

    pub fn schema(&self, block_type: &str) -> Option<&'static BlockSchema> {
        self.by_type.get(block_type).copied()
    }

    /// The primary schema for an AST node kind such as `"BinaryExpression"`.
    pub fn schema_for(&self, node_kind: &str) -> Option<&'static BlockSchema> {
        self.by_kind.get(node_kind).copied()
    }

    /// Check that `slot` exists with the given kind on a registered type.
    pub fn validate_slot(&self, block_type: &str, slot: &str, kind: SlotKind) -> Result<(), BlockError> {
        let Some(schema) = self.schema(block_type) else {
            return Ok(());
        };
        match schema.slot(slot) {
            Some(spec) if spec.kind == kind => Ok(()),
            _ => Err(BlockError::UnknownSlot {
                block_type: block_type.to_string(),
                slot: slot.to_string(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_slot_matching() {
        let slot = SlotSpec::numbered("ARGUMENT", SlotKind::Value, "arguments");
        assert!(slot.matches("ARGUMENT0"));
        assert!(slot.matches("ARGUMENT12"));
        assert!(!slot.matches("ARGUMENT"));
        assert!(!slot.matches("ARGUMENTx"));
        assert!(!SlotSpec::value("VALUE").matches("VALUE0"));
    }

    #[test]
    fn test_schema_for_node_kind() {
        let registry = SchemaRegistry::global();
        assert_eq!(
            registry.schema_for("BinaryExpression").map(|s| s.block_type),
            Some("js_binary_expression")
        );
        assert_eq!(
            registry.schema_for("IfStatement").map(|s| s.block_type),
            Some("js_if_statement")
        );
        assert!(registry.schema_for("TryStatement").is_none());
    }

    #[test]
    fn test_block_types_are_unique() {
        let total = JAVASCRIPT_SCHEMAS.len() + BLOCKLY_SCHEMAS.len();
        assert_eq!(SchemaRegistry::global().len(), total);
    }

    #[test]
    fn test_validate_slot() {
        let registry = SchemaRegistry::global();
        assert!(registry.validate_slot("js_if_statement", "DO2", SlotKind::Statement).is_ok());
        assert!(registry.validate_slot("js_if_statement", "IF1", SlotKind::Value).is_ok());
        assert!(registry.validate_slot("js_if_statement", "IF1", SlotKind::Statement).is_err());
        assert!(registry.validate_slot("js_identifier", "VALUE", SlotKind::Value).is_err());
        // Unregistered types are not validated.
        assert!(registry.validate_slot("custom_block", "ANY", SlotKind::Value).is_ok());
    }

    #[test]
    fn test_output_roles() {
        let registry = SchemaRegistry::global();
        let assignment = registry.schema("js_assignment_expression").unwrap();
        assert!(assignment.is_switchable());
        assert!(!assignment.has_output_by_default());
        assert!(assignment.allows_output(true));

        let ret = registry.schema("js_return_statement").unwrap();
        assert!(!ret.allows_output(true));
        assert!(registry.schema("math_number").unwrap().has_output_by_default());
    }
}
