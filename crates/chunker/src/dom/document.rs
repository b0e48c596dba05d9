// ABOUTME: Parses markup into a scraper document and strips the wrappers the HTML5 parser invents.
// ABOUTME: A fragment parsed in isolation keeps only the html/head/body tags it actually spelled out.

use ego_tree::{NodeId, Tree};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node};

static HTML_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<html[\s/>]").unwrap());
static HEAD_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<head[\s/>]").unwrap());
static BODY_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<body[\s/>]").unwrap());

/// Returns true when the markup has nothing to chunk.
pub fn is_blank(markup: &str) -> bool {
    markup.trim().is_empty()
}

/// Parse markup into a document whose top level mirrors the markup.
///
/// The HTML5 tree builder always produces `html`, `head` and `body` elements. Any of
/// them that the markup does not spell out is unwrapped: its children take its place
/// and the element itself is removed. The children of the tree root are therefore the
/// markup's own top-level nodes. Do not call `Html::root_element` on the result; it
/// may have no `html` element at all.
pub fn parse_markup(markup: &str) -> Html {
    let mut doc = Html::parse_document(markup);

    let (html_id, head_id, body_id) = {
        let root = doc.root_element();
        let mut head = None;
        let mut body = None;
        for child in root.children().filter_map(ElementRef::wrap) {
            match child.value().name() {
                "head" if head.is_none() => head = Some(child.id()),
                "body" if body.is_none() => body = Some(child.id()),
                _ => {}
            }
        }
        (root.id(), head, body)
    };

    if let Some(id) = body_id {
        if !BODY_TAG_RE.is_match(markup) {
            unwrap_node(&mut doc.tree, id);
        }
    }
    if let Some(id) = head_id {
        if !HEAD_TAG_RE.is_match(markup) {
            unwrap_node(&mut doc.tree, id);
        }
    }
    if !HTML_TAG_RE.is_match(markup) {
        unwrap_node(&mut doc.tree, html_id);
    }

    doc
}

/// Replace a node by its children, preserving their order.
fn unwrap_node(tree: &mut Tree<Node>, id: NodeId) {
    let children: Vec<NodeId> = match tree.get(id) {
        Some(node) => node.children().map(|c| c.id()).collect(),
        None => return,
    };
    if let Some(mut node) = tree.get_mut(id) {
        for child in children {
            node.insert_id_before(child);
        }
        node.detach();
    }
}

/// Names of the top-level elements, in order. Test helper.
#[cfg(test)]
pub(crate) fn top_level_names(doc: &Html) -> Vec<String> {
    doc.tree
        .root()
        .children()
        .filter_map(ElementRef::wrap)
        .map(|el| el.value().name().to_string())
        .collect()
}
