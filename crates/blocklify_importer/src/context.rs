//! Conversion state shared by the atomic mapping and the recognizers.

use crate::pattern::{PatternRecognizer, Recognition};
use blocklify_ast::{Expression, NodeData, Statement, SyntaxKind};
use blocklify_blocks::{Block, BlockError, MAX_NESTING_DEPTH};
use blocklify_core::text::TextRange;
use blocklify_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};
use blocklify_options::{ImportOptions, ImportStrategy};
use tracing::{debug, warn};

/// A node handed to the conversion dispatcher.
#[derive(Debug, Clone, Copy)]
pub enum AstNode<'a> {
    Statement(&'a Statement<'a>),
    Expression(&'a Expression<'a>),
}

impl<'a> AstNode<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            AstNode::Statement(stmt) => stmt.data(),
            AstNode::Expression(expr) => expr.data(),
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data().kind
    }
}

/// Per-import state: options, recognizers, collected gaps, and the
/// statement list being walked for neighbor lookahead.
pub struct ImportContext<'a, 'r> {
    options: &'r ImportOptions,
    recognizers: &'r [Box<dyn PatternRecognizer>],
    gaps: DiagnosticCollection,
    siblings: &'a [Statement<'a>],
    index: usize,
    /// Nodes currently being converted.
    depth: usize,
}

impl<'a, 'r> ImportContext<'a, 'r> {
    pub fn new(options: &'r ImportOptions, recognizers: &'r [Box<dyn PatternRecognizer>]) -> Self {
        Self {
            options,
            recognizers,
            gaps: DiagnosticCollection::new(),
            siblings: &[],
            index: 0,
            depth: 0,
        }
    }

    pub fn options(&self) -> &ImportOptions {
        self.options
    }

    /// The gaps met so far, in source order.
    pub fn into_gaps(self) -> Vec<Diagnostic> {
        self.gaps.into_sorted()
    }

    // ========================================================================
    // Neighbors
    // ========================================================================

    /// The statement before the one being converted, in the same list.
    pub fn previous_statement(&self) -> Option<&'a Statement<'a>> {
        let siblings = self.siblings;
        self.index.checked_sub(1).and_then(|i| siblings.get(i))
    }

    /// The statement after the one being converted, in the same list.
    pub fn next_statement(&self) -> Option<&'a Statement<'a>> {
        let siblings = self.siblings;
        siblings.get(self.index + 1)
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    fn convert_node(&mut self, node: AstNode<'a>) -> Result<Option<Block>, BlockError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(BlockError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
            });
        }
        self.depth += 1;
        let result = self.convert_node_worker(node);
        self.depth -= 1;
        result
    }

    fn convert_node_worker(&mut self, node: AstNode<'a>) -> Result<Option<Block>, BlockError> {
        if self.options.strategy != ImportStrategy::Atomic {
            let recognizers = self.recognizers;
            for recognizer in recognizers {
                match recognizer.recognize(node, self)? {
                    Recognition::Decline => continue,
                    Recognition::Block(block) => {
                        debug!(
                            recognizer = recognizer.name(),
                            offset = node.data().range.pos,
                            "{}",
                            messages::RECOGNIZED_0_AS_1
                                .format(&[&node.kind().to_string(), block.block_type()])
                        );
                        return Ok(Some(block));
                    }
                    Recognition::Skip => {
                        debug!(
                            recognizer = recognizer.name(),
                            kind = %node.kind(),
                            offset = node.data().range.pos,
                            "node elided"
                        );
                        return Ok(None);
                    }
                }
            }
            if self.options.strategy == ImportStrategy::Pattern {
                let data = *node.data();
                return Ok(Some(self.placeholder(
                    data.kind,
                    data.range,
                    &messages::NO_PATTERN_MATCHED_NODE_KIND_0,
                )));
            }
        }
        match node {
            AstNode::Statement(stmt) => self.atomic_statement(stmt),
            AstNode::Expression(expr) => self.atomic_expression(expr).map(Some),
        }
    }

    /// Convert one statement. `None` means the statement produces no block.
    pub fn convert_statement(&mut self, stmt: &'a Statement<'a>) -> Result<Option<Block>, BlockError> {
        match stmt {
            Statement::Empty(_) => Ok(None),
            Statement::Expression(statement) => self.convert_expression(statement.expression).map(Some),
            Statement::Block(block) => self.statement_list(block.body),
            _ => self.convert_node(AstNode::Statement(stmt)),
        }
    }

    pub fn convert_expression(&mut self, expr: &'a Expression<'a>) -> Result<Block, BlockError> {
        match self.convert_node(AstNode::Expression(expr))? {
            Some(block) => Ok(block),
            None => Ok(self.placeholder(
                expr.kind(),
                expr.data().range,
                &messages::NODE_KIND_0_HAS_NO_BLOCK_MAPPING,
            )),
        }
    }

    // ========================================================================
    // Statement chains
    // ========================================================================

    /// Convert a statement list into a `next` chain. Nested blocks are
    /// spliced into the chain and empty statements are dropped.
    pub fn statement_list(&mut self, body: &'a [Statement<'a>]) -> Result<Option<Block>, BlockError> {
        let mut blocks = Vec::with_capacity(body.len());
        self.collect_statements(body, &mut blocks)?;
        Block::link(blocks)
    }

    /// The chain for a loop or branch body, braced or not.
    pub fn statement_body(&mut self, stmt: &'a Statement<'a>) -> Result<Option<Block>, BlockError> {
        self.statement_list(std::slice::from_ref(stmt))
    }

    fn collect_statements(
        &mut self,
        body: &'a [Statement<'a>],
        blocks: &mut Vec<Block>,
    ) -> Result<(), BlockError> {
        let saved = (self.siblings, self.index);
        self.siblings = body;
        for (index, stmt) in body.iter().enumerate() {
            self.index = index;
            if let Statement::Block(inner) = stmt {
                self.collect_statements(inner.body, blocks)?;
                continue;
            }
            if let Some(block) = self.convert_statement(stmt)? {
                blocks.push(to_statement(block)?);
            }
        }
        (self.siblings, self.index) = saved;
        Ok(())
    }

    /// Convert `expr` and place it into the value input `name` of `parent`.
    pub fn set_value(
        &mut self,
        parent: &mut Block,
        name: impl Into<String>,
        expr: &'a Expression<'a>,
    ) -> Result<(), BlockError> {
        let child = self.convert_expression(expr)?;
        if self.options.is_no_inline(&expr.kind().to_string()) {
            parent.set_inline(false);
        }
        parent.set_value(name, child)
    }

    /// Fill a clone slot: `count` mutation plus `PREFIX0..` value inputs.
    pub fn set_clone_values(
        &mut self,
        parent: &mut Block,
        count: &str,
        prefix: &str,
        items: &'a [Expression<'a>],
    ) -> Result<(), BlockError> {
        parent.set_mutation(count, items.len().to_string());
        for (i, item) in items.iter().enumerate() {
            self.set_value(parent, format!("{}{}", prefix, i), item)?;
        }
        Ok(())
    }

    /// Like [`set_clone_values`](Self::set_clone_values) for array
    /// elements, where holes become `hole_type` blocks.
    pub fn set_array_elements(
        &mut self,
        parent: &mut Block,
        count: &str,
        prefix: &str,
        elements: &'a [Option<Expression<'a>>],
        hole_type: &str,
    ) -> Result<(), BlockError> {
        parent.set_mutation(count, elements.len().to_string());
        for (i, element) in elements.iter().enumerate() {
            let name = format!("{}{}", prefix, i);
            match element {
                Some(expr) => self.set_value(parent, name, expr)?,
                None => parent.set_value(name, Block::new(hole_type))?,
            }
        }
        Ok(())
    }

    /// Record an import gap and return the placeholder standing in for it.
    pub fn placeholder(
        &mut self,
        kind: SyntaxKind,
        range: TextRange,
        message: &DiagnosticMessage,
    ) -> Block {
        let kind = kind.to_string();
        warn!(kind = %kind, offset = range.pos, "no block mapping");
        self.gaps.add(Diagnostic::with_span(range, message, &[&kind]));
        Block::new("js_notimplemented").with_field("TYPE", kind)
    }
}

/// Turn a converted block into something that can sit in a statement
/// chain: switchable blocks drop their output, pure value blocks are
/// wrapped in `js_expression_statement`.
pub fn to_statement(mut block: Block) -> Result<Block, BlockError> {
    if !block.has_output() {
        return Ok(block);
    }
    if block.is_switchable() {
        block.set_output(false)?;
        return Ok(block);
    }
    let mut wrapper = Block::new("js_expression_statement");
    wrapper.set_value("EXPRESSION", block)?;
    Ok(wrapper)
}
