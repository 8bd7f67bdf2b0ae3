//! Outline printer - dump a [`MemoryTree`] subtree to a terminal.
//!
//! One line per node, indented by depth:
//!
//! ```text
//! <ul class="todo-list">
//!   <li data-id="1" class="completed">
//!     <input class="toggle" type="checkbox" .checked=true @change>
//!     "Buy milk"
//! ```
//!
//! Attributes print as `name="value"`, live properties as `.name=value`, filled
//! handler slots as `@event`. Styling goes through crossterm's `queue!`, so the
//! writer is flushed once by the caller.

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

use crate::engine::{MemoryTree, NodeId, NodeKind};
use crate::types::PropValue;

/// How [`write_outline`] prints.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineOptions {
    /// Spaces per depth level.
    pub indent: usize,
    /// Emit colour escapes. Turn off for plain text (tests, logs, pipes).
    pub color: bool,
    /// Print live properties.
    pub show_properties: bool,
    /// Print filled handler slots.
    pub show_handlers: bool,
    /// Colour of tag names.
    pub tag_color: Color,
    /// Colour of attribute and property names.
    pub name_color: Color,
    /// Colour of text nodes.
    pub text_color: Color,
    /// Colour of handler markers.
    pub handler_color: Color,
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            color: true,
            show_properties: true,
            show_handlers: true,
            tag_color: Color::Cyan,
            name_color: Color::Yellow,
            text_color: Color::Green,
            handler_color: Color::Magenta,
        }
    }
}

impl OutlineOptions {
    /// Defaults without colour.
    pub fn plain() -> Self {
        Self {
            color: false,
            ..Self::default()
        }
    }
}

/// Write the outline of `node` and its descendants.
///
/// # Arguments
///
/// * `out` - Destination, usually a locked stdout
/// * `tree` - Tree holding `node`
/// * `node` - Subtree root; unknown ids print nothing
/// * `options` - Formatting
pub fn write_outline<W: Write>(
    out: &mut W,
    tree: &MemoryTree,
    node: NodeId,
    options: &OutlineOptions,
) -> io::Result<()> {
    write_node(out, tree, node, 0, options)
}

/// Render the outline into a `String`.
pub fn outline_string(tree: &MemoryTree, node: NodeId, options: &OutlineOptions) -> String {
    let mut buffer = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_outline(&mut buffer, tree, node, options);
    String::from_utf8_lossy(&buffer).into_owned()
}

fn write_node<W: Write>(
    out: &mut W,
    tree: &MemoryTree,
    node: NodeId,
    depth: usize,
    options: &OutlineOptions,
) -> io::Result<()> {
    let Some(kind) = tree.kind(node) else {
        return Ok(());
    };

    queue!(out, Print(" ".repeat(depth * options.indent)))?;

    match kind {
        NodeKind::Text { content } => {
            paint(out, options, options.text_color, &format!("{content:?}"))?;
            queue!(out, Print("\n"))?;
        }
        NodeKind::Element { tag } => {
            queue!(out, Print("<"))?;
            paint(out, options, options.tag_color, tag)?;

            for (name, value) in tree.attributes(node) {
                queue!(out, Print(" "))?;
                paint(out, options, options.name_color, name)?;
                queue!(out, Print(format!("={value:?}")))?;
            }

            if options.show_properties {
                for (name, value) in tree.properties(node) {
                    queue!(out, Print(" ."))?;
                    paint(out, options, options.name_color, name)?;
                    queue!(out, Print(format!("={}", property_text(value))))?;
                }
            }

            if options.show_handlers {
                for event in tree.handler_names(node) {
                    queue!(out, Print(" "))?;
                    paint(out, options, options.handler_color, &format!("@{event}"))?;
                }
            }

            queue!(out, Print(">\n"))?;

            for &child in tree.children(node) {
                write_node(out, tree, child, depth + 1, options)?;
            }
        }
    }

    Ok(())
}

fn paint<W: Write>(out: &mut W, options: &OutlineOptions, color: Color, text: &str) -> io::Result<()> {
    if options.color {
        queue!(out, SetForegroundColor(color), Print(text), ResetColor)
    } else {
        queue!(out, Print(text))
    }
}

fn property_text(value: &PropValue<NodeId>) -> String {
    match value {
        PropValue::Str(text) => format!("{text:?}"),
        PropValue::Null => "null".to_string(),
        PropValue::Handler(_) | PropValue::Hook(_) => "fn".to_string(),
        other => other.attribute_string().unwrap_or_default(),
    }
}
