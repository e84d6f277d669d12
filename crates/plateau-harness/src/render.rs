#![forbid(unsafe_code)]

//! Serialize a [`MemoryNode`] subtree to markup.
//!
//! Output is deterministic: `id` first, then `class`, then `style`, then the
//! remaining attributes in key order. Text is escaped; markup set through the
//! html facet is emitted verbatim. Properties (such as an input's live
//! `value`) are not attributes and are not rendered.

use crate::document::{Child, MemoryNode};

const VOID_TAGS: [&str; 6] = ["br", "hr", "img", "input", "link", "meta"];

/// Render `node` and its subtree.
#[must_use]
pub fn render(node: &MemoryNode) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

/// Render only the children of `node`.
#[must_use]
pub fn render_children(node: &MemoryNode) -> String {
    let mut out = String::new();
    write_children(node, &mut out);
    out
}

fn write_node(node: &MemoryNode, out: &mut String) {
    let tag = node.tag();
    out.push('<');
    out.push_str(&tag);

    let attributes = node.attributes();
    if let Some(id) = attributes.get("id") {
        write_attribute(out, "id", id);
    }
    let class_name = node.class_name();
    if !class_name.is_empty() {
        write_attribute(out, "class", &class_name);
    }
    let styles = node.styles();
    if !styles.is_empty() {
        let style = styles
            .iter()
            .map(|(property, value)| format!("{property}: {value}"))
            .collect::<Vec<_>>()
            .join("; ");
        write_attribute(out, "style", &style);
    }
    for (name, value) in attributes.iter().filter(|(name, _)| *name != "id") {
        write_attribute(out, name, value);
    }
    out.push('>');

    if VOID_TAGS.contains(&tag.as_str()) {
        return;
    }
    write_children(node, out);
    out.push_str("</");
    out.push_str(&tag);
    out.push('>');
}

fn write_children(node: &MemoryNode, out: &mut String) {
    for child in node.child_nodes() {
        match child {
            Child::Element(element) => write_node(&element, out),
            Child::Text(text) => out.push_str(&escape_text(&text)),
            Child::Markup(markup) => out.push_str(&markup),
        }
    }
}

fn write_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape_attribute(value));
    out.push('"');
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
