//! blocklify_blocks: The block tree consumed and produced by visual editors.
//!
//! A [`Block`] carries a type name, text fields, named value and statement
//! inputs, mutation attributes (clone counts, `elseif`/`else` counts, the
//! output toggle), and an optional `next` link to the following statement.
//! The [`schema`] module describes which slots each block type owns, and
//! [`xml`] reads and writes the document format editors exchange.

pub mod block;
pub mod schema;
pub mod xml;

pub use block::{Block, BlockDocument, BlockError, Chain, Input, MAX_NESTING_DEPTH};
pub use schema::{BlockSchema, OutputRole, SchemaRegistry, SlotKind, SlotSpec};
