// ABOUTME: Deterministic HTML serialization for scraper trees with optional node and attribute filtering.
// ABOUTME: Used verbatim by the splitter and merger, and with a skip/truncate filter by the cleaner.

use std::borrow::Cow;

use ego_tree::{NodeId, NodeRef};
use scraper::{Html, Node};

/// Controls which nodes and attribute values reach the output.
pub trait NodeFilter {
    /// Returns true if the node and its subtree are left out.
    fn skip(&self, _id: NodeId) -> bool {
        false
    }

    /// Rewrites an attribute value before it is written.
    fn attr<'v>(&self, _name: &str, value: &'v str) -> Cow<'v, str> {
        Cow::Borrowed(value)
    }
}

/// Writes every node as-is.
pub struct Verbatim;

impl NodeFilter for Verbatim {}

/// Serialize a node including its own tag.
pub fn outer_html(node: NodeRef<Node>) -> String {
    let mut out = String::new();
    write_node(node, &Verbatim, &mut out);
    out
}

/// Serialize the whole document: every child of the tree root, in order.
pub fn document_html(doc: &Html) -> String {
    filtered_document_html(doc, &Verbatim)
}

/// Serialize the whole document through a filter.
pub fn filtered_document_html<F: NodeFilter>(doc: &Html, filter: &F) -> String {
    let mut out = String::new();
    for child in doc.tree.root().children() {
        write_node(child, filter, &mut out);
    }
    out
}

/// Serialize a node through a filter.
pub fn write_node<F: NodeFilter>(node: NodeRef<Node>, filter: &F, out: &mut String) {
    if filter.skip(node.id()) {
        return;
    }
    match node.value() {
        Node::Text(text) => {
            if in_raw_text_element(node) {
                out.push_str(text);
            } else {
                out.push_str(&escape_text(text));
            }
        }
        Node::Element(el) => {
            let name = el.name();
            out.push('<');
            out.push_str(name);
            for (k, v) in el.attrs() {
                out.push(' ');
                out.push_str(k);
                out.push_str("=\"");
                out.push_str(&escape_attr(&filter.attr(k, v)));
                out.push('"');
            }

            if is_void_element(name) {
                out.push_str(" />");
                return;
            }

            out.push('>');
            for child in node.children() {
                write_node(child, filter, out);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        Node::Comment(c) => {
            out.push_str("<!--");
            out.push_str(c);
            out.push_str("-->");
        }
        Node::Doctype(d) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(d.name());
            out.push('>');
        }
        Node::Document | Node::Fragment => {
            for child in node.children() {
                write_node(child, filter, out);
            }
        }
        _ => {}
    }
}

fn in_raw_text_element(node: NodeRef<Node>) -> bool {
    node.parent()
        .and_then(|p| p.value().as_element().map(|el| is_raw_text_element(el.name())))
        .unwrap_or(false)
}

/// Escape attribute value
pub fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('\u{a0}', "&nbsp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape text content
pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('\u{a0}', "&nbsp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Check if tag is void element
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag.to_lowercase().as_str(),
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Elements whose text children are written without escaping.
fn is_raw_text_element(tag: &str) -> bool {
    matches!(
        tag,
        "script" | "style" | "xmp" | "iframe" | "noembed" | "noframes" | "plaintext"
    )
}
