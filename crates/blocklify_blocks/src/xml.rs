//! The XML document format exchanged with block editors.
//!
//! ```xml
//! <xml xmlns="https://developers.google.com/blockly/xml">
//!   <block type="js_return_statement">
//!     <value name="VALUE">
//!       <block type="js_identifier"><field name="NAME">a</field></block>
//!     </value>
//!     <next><block type="js_break_statement" /></next>
//!   </block>
//! </xml>
//! ```
//!
//! Statement chains nest through `<next>` elements, so both directions work
//! on the `xml-rs` event stream with explicit stacks instead of building an
//! element tree.

use crate::block::{Block, BlockDocument, BlockError, Input, MAX_NESTING_DEPTH};
use xml::attribute::OwnedAttribute;
use xml::common::{Position, TextPosition};
use xml::reader::{ParserConfig, XmlEvent as ReadEvent};
use xml::writer::{EmitterConfig, EventWriter, XmlEvent as WriteEvent};

pub const XML_NAMESPACE: &str = "https://developers.google.com/blockly/xml";

// ============================================================================
// Writer
// ============================================================================

type Writer = EventWriter<Vec<u8>>;

fn write_chain(writer: &mut Writer, head: &Block) -> Result<(), BlockError> {
    let mut depth = 0;
    for block in head.chain() {
        if depth > 0 {
            writer.write(WriteEvent::start_element("next"))?;
        }
        write_block_body(writer, block)?;
        depth += 1;
    }
    for remaining in (0..depth).rev() {
        writer.write(WriteEvent::end_element())?;
        if remaining > 0 {
            writer.write(WriteEvent::end_element())?;
        }
    }
    Ok(())
}

/// Everything of `block` except its closing tag and its `next`.
fn write_block_body(writer: &mut Writer, block: &Block) -> Result<(), BlockError> {
    let mut start = WriteEvent::start_element("block").attr("type", block.block_type());
    if let Some(inline) = block.inline() {
        start = start.attr("inline", if inline { "true" } else { "false" });
    }
    writer.write(start)?;

    let mut mutations = block.mutations().peekable();
    if mutations.peek().is_some() {
        let mut mutation = WriteEvent::start_element("mutation");
        for (name, value) in mutations {
            mutation = mutation.attr(name, value);
        }
        writer.write(mutation)?;
        writer.write(WriteEvent::end_element())?;
    }

    for (name, value) in block.fields() {
        writer.write(WriteEvent::start_element("field").attr("name", name))?;
        writer.write(WriteEvent::characters(value))?;
        writer.write(WriteEvent::end_element())?;
    }

    for (name, input) in block.inputs() {
        let tag = match input {
            Input::Value(_) => "value",
            Input::Statement(_) => "statement",
        };
        writer.write(WriteEvent::start_element(tag).attr("name", name))?;
        write_chain(writer, input.block())?;
        writer.write(WriteEvent::end_element())?;
    }
    Ok(())
}

/// Serialize a document, optionally indented two spaces per level.
pub fn write_document(document: &BlockDocument, pretty: bool) -> Result<String, BlockError> {
    let mut writer = EmitterConfig::new()
        .perform_indent(pretty)
        .write_document_declaration(false)
        .create_writer(Vec::with_capacity(1024));
    writer.write(WriteEvent::start_element("xml").default_ns(XML_NAMESPACE))?;
    for head in &document.blocks {
        write_chain(&mut writer, head)?;
    }
    writer.write(WriteEvent::end_element())?;
    String::from_utf8(writer.into_inner()).map_err(|e| BlockError::Xml {
        line: 0,
        column: 0,
        message: e.to_string(),
    })
}

// ============================================================================
// Reader
// ============================================================================

enum Frame {
    Root(Vec<Block>),
    Block(Block),
    Input {
        name: String,
        statement: bool,
        child: Option<Block>,
    },
    Next(Option<Block>),
    Field {
        name: String,
        text: String,
    },
    /// `<mutation>`, or an element the block model has no use for such as
    /// `<comment>`.
    Ignored,
}

fn malformed(position: TextPosition, message: impl Into<String>) -> BlockError {
    BlockError::Xml {
        line: position.row + 1,
        column: position.column + 1,
        message: message.into(),
    }
}

fn attribute<'v>(attributes: &'v [OwnedAttribute], name: &str) -> Option<&'v str> {
    attributes
        .iter()
        .find(|attribute| attribute.name.local_name == name)
        .map(|attribute| attribute.value.as_str())
}

/// Parse a document produced by [`write_document`] or by an editor.
pub fn read_document(text: &str) -> Result<BlockDocument, BlockError> {
    let mut reader = ParserConfig::new()
        .trim_whitespace(false)
        .whitespace_to_characters(true)
        .cdata_to_characters(true)
        .ignore_comments(true)
        .create_reader(text.as_bytes());
    let mut stack: Vec<Frame> = Vec::new();
    let mut document: Option<BlockDocument> = None;
    // Open `<value>` and `<statement>` elements.
    let mut inputs = 0;

    loop {
        let event = reader
            .next()
            .map_err(|e| malformed(e.position(), e.msg()))?;
        match event {
            ReadEvent::EndDocument => break,
            ReadEvent::Characters(text) => match stack.last_mut() {
                Some(Frame::Field { text: field, .. }) => field.push_str(&text),
                Some(Frame::Ignored) => {}
                _ if text.trim().is_empty() => {}
                _ => return Err(malformed(reader.position(), "unexpected text")),
            },
            ReadEvent::StartElement {
                name, attributes, ..
            } => {
                let frame = open_frame(&mut stack, &name.local_name, &attributes)
                    .map_err(|message| malformed(reader.position(), message))?;
                match &frame {
                    Frame::Input { .. } => inputs += 1,
                    Frame::Block(_) if inputs >= MAX_NESTING_DEPTH => {
                        return Err(BlockError::NestingTooDeep {
                            limit: MAX_NESTING_DEPTH,
                        });
                    }
                    _ => {}
                }
                stack.push(frame);
            }
            ReadEvent::EndElement { .. } => {
                if let Some(Frame::Input { .. }) = stack.last() {
                    inputs -= 1;
                }
                close_frame(&mut stack, &mut document)?;
            }
            _ => {}
        }
    }

    document.ok_or_else(|| malformed(reader.position(), "missing <xml> root element"))
}

fn open_frame(stack: &mut [Frame], name: &str, attributes: &[OwnedAttribute]) -> Result<Frame, String> {
    let Some(parent) = stack.last_mut() else {
        if name != "xml" {
            return Err(format!("unexpected <{}> at the top level", name));
        }
        return Ok(Frame::Root(Vec::new()));
    };
    if let Frame::Ignored = parent {
        return Ok(Frame::Ignored);
    }
    let frame = match (name, parent) {
        ("block" | "shadow", Frame::Root(_) | Frame::Input { .. } | Frame::Next(_)) => {
            let block_type =
                attribute(attributes, "type").ok_or("<block> without a type attribute")?;
            let mut block = Block::new(block_type);
            match attribute(attributes, "inline") {
                Some("true") => block.set_inline(true),
                Some("false") => block.set_inline(false),
                _ => {}
            }
            Frame::Block(block)
        }
        ("mutation", Frame::Block(block)) => {
            for attribute in attributes {
                block.set_mutation(attribute.name.local_name.clone(), attribute.value.clone());
            }
            Frame::Ignored
        }
        ("field", Frame::Block(_)) => Frame::Field {
            name: attribute(attributes, "name")
                .ok_or("<field> without a name attribute")?
                .to_string(),
            text: String::new(),
        },
        ("value" | "statement", Frame::Block(_)) => Frame::Input {
            name: attribute(attributes, "name")
                .ok_or_else(|| format!("<{}> without a name attribute", name))?
                .to_string(),
            statement: name == "statement",
            child: None,
        },
        ("next", Frame::Block(_)) => Frame::Next(None),
        ("block" | "shadow" | "mutation" | "field" | "value" | "statement" | "next", _) => {
            return Err(format!("unexpected <{}>", name));
        }
        _ => Frame::Ignored,
    };
    Ok(frame)
}

fn close_frame(stack: &mut Vec<Frame>, document: &mut Option<BlockDocument>) -> Result<(), BlockError> {
    let Some(frame) = stack.pop() else {
        return Ok(());
    };
    match frame {
        Frame::Root(blocks) => *document = Some(BlockDocument { blocks }),
        Frame::Block(block) => attach_block(stack, block)?,
        Frame::Input {
            name,
            statement,
            child,
        } => {
            if let (Some(child), Some(Frame::Block(parent))) = (child, stack.last_mut()) {
                if statement {
                    parent.set_statement(name, child)?;
                } else {
                    parent.set_value(name, child)?;
                }
            }
        }
        Frame::Next(child) => {
            if let (Some(child), Some(Frame::Block(parent))) = (child, stack.last_mut()) {
                parent.set_next(child)?;
            }
        }
        Frame::Field { name, text } => {
            if let Some(Frame::Block(parent)) = stack.last_mut() {
                parent.set_field(name, text);
            }
        }
        Frame::Ignored => {}
    }
    Ok(())
}

fn attach_block(stack: &mut [Frame], mut block: Block) -> Result<(), BlockError> {
    match stack.last_mut() {
        Some(Frame::Root(blocks)) => {
            // Loose top-level blocks keep whatever role their mutation names.
            if let Some(output) = block.mutation("output").and_then(|v| v.parse::<bool>().ok()) {
                block.set_output(output)?;
            }
            blocks.push(block);
        }
        Some(Frame::Input {
            statement, child, ..
        }) => {
            if *statement && block.has_output() && block.is_switchable() {
                block.set_output(false)?;
            }
            *child = Some(block);
        }
        Some(Frame::Next(child)) => {
            if block.has_output() && block.is_switchable() {
                block.set_output(false)?;
            }
            *child = Some(block);
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prolog_and_comments_are_skipped() {
        let document = read_document(
            "<?xml version=\"1.0\"?><!-- saved --><xml><block type=\"js_break_statement\"/></xml>",
        )
        .unwrap();
        assert_eq!(document.blocks.len(), 1);
    }

    #[test]
    fn test_field_text_keeps_whitespace_and_cdata() {
        let document = read_document(
            "<xml><block type=\"js_literal_string\"><mutation output=\"false\"/>\
             <field name=\"STRING\"> a <![CDATA[<b>]]></field></block></xml>",
        )
        .unwrap();
        assert_eq!(document.blocks[0].field("STRING"), Some(" a <b>"));
    }

    #[test]
    fn test_empty_root() {
        let document = read_document("<xml xmlns=\"https://developers.google.com/blockly/xml\"/>").unwrap();
        assert!(document.is_empty());
        let xml = write_document(&document, false).unwrap();
        assert!(xml.starts_with("<xml"));
        assert!(xml.contains(XML_NAMESPACE));
    }

    fn nested_unary(depth: usize) -> String {
        let open = "<block type=\"js_unary_expression\"><field name=\"OPERATOR\">!</field>\
                    <value name=\"ARGUMENT\">";
        format!(
            "<xml>{}<block type=\"js_identifier\"><field name=\"NAME\">a</field></block>{}</xml>",
            open.repeat(depth),
            "</value></block>".repeat(depth)
        )
    }

    #[test]
    fn test_nesting_depth_is_bounded() {
        let document = read_document(&nested_unary(MAX_NESTING_DEPTH - 1)).unwrap();
        assert_eq!(document.blocks.len(), 1);

        match read_document(&nested_unary(MAX_NESTING_DEPTH)) {
            Err(BlockError::NestingTooDeep { limit }) => assert_eq!(limit, MAX_NESTING_DEPTH),
            other => panic!("expected a nesting error, got {:?}", other),
        }
        assert!(matches!(
            read_document(&nested_unary(5000)),
            Err(BlockError::NestingTooDeep { .. })
        ));
    }

    #[test]
    fn test_error_position() {
        match read_document("<xml>\n  <block type=\"a\">\n  </value>\n</xml>") {
            Err(BlockError::Xml { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected an XML error, got {:?}", other),
        }
    }
}
