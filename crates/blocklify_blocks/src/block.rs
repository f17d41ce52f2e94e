//! The block tree model.

use crate::schema::{SchemaRegistry, SlotKind};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Deepest nesting of blocks inside value and statement inputs that the
/// importer builds, the XML reader accepts and the generator walks. Blocks
/// linked through `next` do not add to it.
pub const MAX_NESTING_DEPTH: usize = 200;

/// Structural violations of the block tree and its serialized forms.
#[derive(Debug, Error)]
pub enum BlockError {
    #[error("block \"{block_type}\" has an output and cannot be linked into a statement chain")]
    OutputInChain { block_type: String },
    #[error("block \"{block_type}\" cannot be used as a {role}")]
    FixedOutputRole { block_type: String, role: &'static str },
    #[error("block \"{block_type}\" has no {slot} slot")]
    UnknownSlot { block_type: String, slot: String },
    #[error("blocks nested more than {limit} levels deep")]
    NestingTooDeep { limit: usize },
    #[error("malformed block XML at {line}:{column}: {message}")]
    Xml { line: u64, column: u64, message: String },
    #[error("cannot write block XML: {0}")]
    XmlWrite(#[from] xml::writer::Error),
    #[error("malformed block JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A nested input of a block.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// A single expression block.
    Value(Block),
    /// The head of a statement chain.
    Statement(Block),
}

impl Input {
    pub fn block(&self) -> &Block {
        match self {
            Input::Value(block) | Input::Statement(block) => block,
        }
    }

    pub fn kind(&self) -> SlotKind {
        match self {
            Input::Value(_) => SlotKind::Value,
            Input::Statement(_) => SlotKind::Statement,
        }
    }
}

/// One node of a block tree.
///
/// The output role and the `next` link are mutually exclusive: a block that
/// produces a value is never part of a statement chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    block_type: String,
    output: bool,
    inline: Option<bool>,
    mutation: IndexMap<String, String>,
    fields: IndexMap<String, String>,
    inputs: IndexMap<String, Input>,
    next: Option<Box<Block>>,
}

impl Block {
    /// Create a block in the default role its schema declares.
    pub fn new(block_type: impl Into<String>) -> Self {
        let block_type = block_type.into();
        let schema = SchemaRegistry::global().schema(&block_type);
        let output = schema.is_some_and(|s| s.has_output_by_default());
        let mut mutation = IndexMap::new();
        if schema.is_some_and(|s| s.is_switchable()) {
            mutation.insert("output".to_string(), output.to_string());
        }
        Self {
            block_type,
            output,
            inline: None,
            mutation,
            fields: IndexMap::new(),
            inputs: IndexMap::new(),
            next: None,
        }
    }

    pub fn block_type(&self) -> &str {
        &self.block_type
    }

    // ========================================================================
    // Output role
    // ========================================================================

    pub fn has_output(&self) -> bool {
        self.output
    }

    /// Whether this block may be switched between value and statement.
    pub fn is_switchable(&self) -> bool {
        SchemaRegistry::global()
            .schema(&self.block_type)
            .map_or(true, |s| s.is_switchable())
    }

    pub fn set_output(&mut self, output: bool) -> Result<(), BlockError> {
        let schema = SchemaRegistry::global().schema(&self.block_type);
        if schema.is_some_and(|s| !s.allows_output(output)) {
            return Err(BlockError::FixedOutputRole {
                block_type: self.block_type.clone(),
                role: if output { "value" } else { "statement" },
            });
        }
        if output && self.next.is_some() {
            return Err(BlockError::OutputInChain {
                block_type: self.block_type.clone(),
            });
        }
        self.output = output;
        if schema.map_or(true, |s| s.is_switchable()) {
            self.mutation
                .insert("output".to_string(), output.to_string());
        }
        Ok(())
    }

    pub fn inline(&self) -> Option<bool> {
        self.inline
    }

    pub fn set_inline(&mut self, inline: bool) {
        self.inline = Some(inline);
    }

    // ========================================================================
    // Fields and mutation
    // ========================================================================

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_field(name, value);
        self
    }

    pub fn mutation(&self, name: &str) -> Option<&str> {
        self.mutation.get(name).map(String::as_str)
    }

    pub fn mutations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.mutation.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn set_mutation(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.mutation.insert(name.into(), value.into());
    }

    // ========================================================================
    // Inputs
    // ========================================================================

    pub fn input(&self, name: &str) -> Option<&Input> {
        self.inputs.get(name)
    }

    pub fn inputs(&self) -> impl Iterator<Item = (&str, &Input)> {
        self.inputs.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn value(&self, name: &str) -> Option<&Block> {
        match self.inputs.get(name) {
            Some(Input::Value(block)) => Some(block),
            _ => None,
        }
    }

    pub fn statement(&self, name: &str) -> Option<&Block> {
        match self.inputs.get(name) {
            Some(Input::Statement(block)) => Some(block),
            _ => None,
        }
    }

    /// Place `child` into a value input, switching it to its output role.
    pub fn set_value(&mut self, name: impl Into<String>, mut child: Block) -> Result<(), BlockError> {
        let name = name.into();
        SchemaRegistry::global().validate_slot(&self.block_type, &name, SlotKind::Value)?;
        child.set_output(true)?;
        self.inputs.insert(name, Input::Value(child));
        Ok(())
    }

    /// Place a statement chain into a statement input.
    pub fn set_statement(&mut self, name: impl Into<String>, head: Block) -> Result<(), BlockError> {
        let name = name.into();
        SchemaRegistry::global().validate_slot(&self.block_type, &name, SlotKind::Statement)?;
        if head.output {
            return Err(BlockError::OutputInChain {
                block_type: head.block_type.clone(),
            });
        }
        self.inputs.insert(name, Input::Statement(head));
        Ok(())
    }

    // ========================================================================
    // Statement chain
    // ========================================================================

    pub fn next(&self) -> Option<&Block> {
        self.next.as_deref()
    }

    pub fn set_next(&mut self, next: Block) -> Result<(), BlockError> {
        if self.output {
            return Err(BlockError::OutputInChain {
                block_type: self.block_type.clone(),
            });
        }
        if next.output {
            return Err(BlockError::OutputInChain {
                block_type: next.block_type.clone(),
            });
        }
        self.next = Some(Box::new(next));
        Ok(())
    }

    pub fn take_next(&mut self) -> Option<Block> {
        self.next.take().map(|next| *next)
    }

    /// This block followed by every block reachable through `next`.
    pub fn chain(&self) -> Chain<'_> {
        Chain { current: Some(self) }
    }

    /// Link `blocks` into one statement chain and return its head.
    pub fn link(blocks: Vec<Block>) -> Result<Option<Block>, BlockError> {
        let mut head: Option<Block> = None;
        for mut block in blocks.into_iter().rev() {
            if let Some(next) = head.take() {
                block.set_next(next)?;
            }
            head = Some(block);
        }
        Ok(head)
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        // Unlink long chains iteratively.
        let mut next = self.next.take();
        while let Some(mut block) = next {
            next = block.next.take();
        }
    }
}

/// Iterator over a statement chain.
pub struct Chain<'b> {
    current: Option<&'b Block>,
}

impl<'b> Iterator for Chain<'b> {
    type Item = &'b Block;

    fn next(&mut self) -> Option<&'b Block> {
        let block = self.current?;
        self.current = block.next();
        Some(block)
    }
}

// ============================================================================
// Document
// ============================================================================

/// A block workspace: the top-level statement chains.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockDocument {
    pub blocks: Vec<Block>,
}

impl BlockDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn to_xml(&self) -> Result<String, BlockError> {
        crate::xml::write_document(self, false)
    }

    pub fn to_xml_pretty(&self) -> Result<String, BlockError> {
        crate::xml::write_document(self, true)
    }

    pub fn from_xml(text: &str) -> Result<Self, BlockError> {
        crate::xml::read_document(text)
    }

    pub fn to_json(&self) -> Result<String, BlockError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, BlockError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, BlockError> {
        Ok(serde_json::from_str(text)?)
    }
}

// ============================================================================
// JSON form
// ============================================================================
//
// Statement chains are written as arrays so that long chains do not nest.

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockRepr {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    output: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline: Option<bool>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    mutation: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    fields: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    values: IndexMap<String, BlockRepr>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    statements: IndexMap<String, Vec<BlockRepr>>,
}

#[derive(Serialize, Deserialize)]
struct DocumentRepr {
    blocks: Vec<Vec<BlockRepr>>,
}

impl BlockRepr {
    fn from_block(block: &Block) -> Self {
        let mut values = IndexMap::new();
        let mut statements = IndexMap::new();
        for (name, input) in &block.inputs {
            match input {
                Input::Value(child) => {
                    values.insert(name.clone(), BlockRepr::from_block(child));
                }
                Input::Statement(head) => {
                    statements.insert(name.clone(), BlockRepr::from_chain(head));
                }
            }
        }
        Self {
            block_type: block.block_type.clone(),
            output: block.output,
            inline: block.inline,
            mutation: block.mutation.clone(),
            fields: block.fields.clone(),
            values,
            statements,
        }
    }

    fn from_chain(head: &Block) -> Vec<Self> {
        head.chain().map(BlockRepr::from_block).collect()
    }

    fn into_block(self) -> Result<Block, BlockError> {
        let mut block = Block::new(self.block_type);
        block.mutation = self.mutation;
        block.fields = self.fields;
        block.inline = self.inline;
        block.set_output(self.output)?;
        for (name, child) in self.values {
            block.set_value(name, child.into_block()?)?;
        }
        for (name, chain) in self.statements {
            if let Some(head) = BlockRepr::into_chain(chain)? {
                block.set_statement(name, head)?;
            }
        }
        Ok(block)
    }

    fn into_chain(chain: Vec<Self>) -> Result<Option<Block>, BlockError> {
        let blocks = chain
            .into_iter()
            .map(BlockRepr::into_block)
            .collect::<Result<Vec<_>, _>>()?;
        Block::link(blocks)
    }
}

impl Serialize for BlockDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        DocumentRepr {
            blocks: self.blocks.iter().map(BlockRepr::from_chain).collect(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BlockDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = DocumentRepr::deserialize(deserializer)?;
        let mut blocks = Vec::with_capacity(repr.blocks.len());
        for chain in repr.blocks {
            if let Some(head) = BlockRepr::into_chain(chain).map_err(serde::de::Error::custom)? {
                blocks.push(head);
            }
        }
        Ok(BlockDocument { blocks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identifier(name: &str) -> Block {
        Block::new("js_identifier").with_field("NAME", name)
    }

    #[test]
    fn test_default_roles() {
        assert!(identifier("a").has_output());
        let call = Block::new("js_call_expression");
        assert!(!call.has_output());
        assert_eq!(call.mutation("output"), Some("false"));
        assert!(!Block::new("js_return_statement").has_output());
        assert!(Block::new("js_identifier").mutation("output").is_none());
    }

    #[test]
    fn test_value_input_forces_output() {
        let mut ret = Block::new("js_return_statement");
        ret.set_value("VALUE", Block::new("js_call_expression")).unwrap();
        let call = ret.value("VALUE").unwrap();
        assert!(call.has_output());
        assert_eq!(call.mutation("output"), Some("true"));
    }

    #[test]
    fn test_statement_block_rejected_as_value() {
        let mut ret = Block::new("js_return_statement");
        let err = ret.set_value("VALUE", Block::new("js_break_statement")).unwrap_err();
        assert!(matches!(err, BlockError::FixedOutputRole { .. }));
    }

    #[test]
    fn test_output_and_next_are_exclusive() {
        let mut value = identifier("a");
        assert!(matches!(
            value.set_next(Block::new("js_break_statement")),
            Err(BlockError::OutputInChain { .. })
        ));

        let mut call = Block::new("js_call_expression");
        call.set_next(Block::new("js_break_statement")).unwrap();
        assert!(call.set_output(true).is_err());

        let mut brk = Block::new("js_break_statement");
        assert!(brk.set_next(identifier("b")).is_err());
    }

    #[test]
    fn test_unknown_slot() {
        let mut block = identifier("a");
        let err = block.set_value("VALUE", identifier("b")).unwrap_err();
        assert_eq!(err.to_string(), "block \"js_identifier\" has no VALUE slot");
    }

    #[test]
    fn test_link_and_chain() {
        let head = Block::link(vec![
            Block::new("js_break_statement"),
            Block::new("js_continue_statement"),
            Block::new("js_break_statement"),
        ])
        .unwrap()
        .unwrap();
        let types: Vec<&str> = head.chain().map(Block::block_type).collect();
        assert_eq!(
            types,
            ["js_break_statement", "js_continue_statement", "js_break_statement"]
        );
        assert!(Block::link(Vec::new()).unwrap().is_none());
    }

    #[test]
    fn test_long_chain_drops() {
        let blocks = (0..100_000).map(|_| Block::new("js_break_statement")).collect();
        let head = Block::link(blocks).unwrap().unwrap();
        assert_eq!(head.chain().count(), 100_000);
        drop(head);
    }

    #[test]
    fn test_json_round_trip() {
        let mut assignment = Block::new("js_assignment_expression");
        assignment.set_value("VAR", identifier("x")).unwrap();
        assignment.set_field("OPERATOR", "=");
        assignment
            .set_value("VALUE", Block::new("js_literal_number").with_field("NUMBER", "1"))
            .unwrap();
        let mut head = Block::new("js_break_statement");
        head.set_next(assignment).unwrap();
        let document = BlockDocument { blocks: vec![head] };

        let json = document.to_json().unwrap();
        assert!(json.starts_with("{\"blocks\":[[{\"type\":\"js_break_statement\"}"));
        assert_eq!(BlockDocument::from_json(&json).unwrap(), document);
    }

    #[test]
    fn test_json_rejects_output_in_chain() {
        let json = r#"{"blocks":[[{"type":"js_identifier"},{"type":"js_break_statement"}]]}"#;
        assert!(BlockDocument::from_json(json).is_err());
    }
}
