//! blocklify_tests: Helpers shared by the cross-crate tests.
//!
//! Structural equality is checked on the span-free AST dump, so layout,
//! redundant parentheses and comments never count as differences.

use blocklify_ast::dump::dump_program;
use blocklify_diagnostics::SyntaxError;
use blocklify_generator::{GenerateError, Generator};
use blocklify_importer::{code_to_block_tree, ImportError};
use blocklify_options::{ImportStrategy, ParserOptions};
use bumpalo::Bump;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoundTripError {
    #[error("import failed: {0}")]
    Import(#[from] ImportError),
    #[error("generation failed: {0}")]
    Generate(#[from] GenerateError),
}

/// Parse `source` with default options and dump it.
pub fn parse_dump(source: &str) -> Result<String, SyntaxError> {
    let arena = Bump::new();
    let program = blocklify_parser::parse(&arena, source, &ParserOptions::default())?;
    Ok(dump_program(&program))
}

/// Import `source` and generate it back.
pub fn regenerate(source: &str, strategy: ImportStrategy) -> Result<String, RoundTripError> {
    let report = code_to_block_tree(source, strategy)?;
    Ok(Generator::default().generate(&report.document)?)
}

/// The outcome of one import/generate cycle.
#[derive(Debug)]
pub struct RoundTrip {
    pub code: String,
    pub original: String,
    pub regenerated: Result<String, SyntaxError>,
}

impl RoundTrip {
    pub fn preserves_structure(&self) -> bool {
        self.regenerated.as_ref() == Ok(&self.original)
    }
}

/// Run `source` through import and generation and dump both programs.
pub fn round_trip(source: &str, strategy: ImportStrategy) -> Result<RoundTrip, RoundTripError> {
    let original = parse_dump(source).map_err(ImportError::Syntax)?;
    let code = regenerate(source, strategy)?;
    let regenerated = parse_dump(&code);
    Ok(RoundTrip {
        code,
        original,
        regenerated,
    })
}
