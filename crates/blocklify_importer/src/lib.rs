//! blocklify_importer: AST to block tree conversion.
//!
//! Three strategies are available:
//! - atomic: every node kind maps to one fixed `js_*` block type;
//! - pattern: ordered [`PatternRecognizer`]s map idiomatic shapes to
//!   Blockly core blocks, and anything unrecognized becomes a placeholder;
//! - mixed: recognizers first, falling back to the atomic mapping per node.
//!
//! Unsupported constructs never fail the import. They become
//! `js_notimplemented` placeholders and are reported as gaps.

mod atomic;
mod context;
pub mod pattern;

pub use context::{AstNode, ImportContext};
pub use pattern::{blockly_recognizers, PatternRecognizer, Recognition};

use blocklify_ast::Program;
use blocklify_blocks::{BlockDocument, BlockError};
use blocklify_diagnostics::{Diagnostic, SyntaxError};
use blocklify_options::{ImportOptions, ImportStrategy, ParserOptions};
use bumpalo::Bump;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Block(#[from] BlockError),
}

/// The imported document and the gaps met along the way.
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub document: BlockDocument,
    pub gaps: Vec<Diagnostic>,
}

impl ImportReport {
    /// Whether every node found a block mapping.
    pub fn is_complete(&self) -> bool {
        self.gaps.is_empty()
    }
}

/// Converts programs to block documents with a fixed set of options and
/// recognizers.
pub struct Importer {
    options: ImportOptions,
    recognizers: Vec<Box<dyn PatternRecognizer>>,
}

impl Importer {
    /// An importer with the Blockly core recognizers registered.
    pub fn new(options: ImportOptions) -> Self {
        Self {
            options,
            recognizers: blockly_recognizers(),
        }
    }

    pub fn with_recognizers(
        options: ImportOptions,
        recognizers: Vec<Box<dyn PatternRecognizer>>,
    ) -> Self {
        Self {
            options,
            recognizers,
        }
    }

    /// Append a recognizer; it is tried after the ones already registered.
    pub fn register(&mut self, recognizer: Box<dyn PatternRecognizer>) {
        self.recognizers.push(recognizer);
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    pub fn import_program(&self, program: &Program<'_>) -> Result<ImportReport, BlockError> {
        let mut cx = ImportContext::new(&self.options, &self.recognizers);
        let head = cx.statement_list(program.body)?;
        Ok(ImportReport {
            document: BlockDocument {
                blocks: head.into_iter().collect(),
            },
            gaps: cx.into_gaps(),
        })
    }

    /// Parse `source` and import it.
    pub fn code_to_block_tree(
        &self,
        source: &str,
        parser_options: &ParserOptions,
    ) -> Result<ImportReport, ImportError> {
        let arena = Bump::new();
        let program = blocklify_parser::parse(&arena, source, parser_options)?;
        Ok(self.import_program(&program)?)
    }
}

impl Default for Importer {
    fn default() -> Self {
        Self::new(ImportOptions::default())
    }
}

/// Parse and import `source` with default options and the given strategy.
pub fn code_to_block_tree(source: &str, strategy: ImportStrategy) -> Result<ImportReport, ImportError> {
    Importer::new(ImportOptions::with_strategy(strategy))
        .code_to_block_tree(source, &ParserOptions::default())
}
