// ABOUTME: Splits a document into the shallowest subtrees whose own markup fits under a token budget.
// ABOUTME: Each fragment is re-wrapped in its ancestors' tags so it parses on its own.

//! DOM splitting.
//!
//! The traversal is pre-order and greedy: a node whose serialized markup counts
//! fewer tokens than the budget becomes one [`Fragment`] and its subtree is not
//! visited further. Larger nodes are entered and their element children visited in
//! document order.
//!
//! A node larger than the budget is emitted whole, as an over-budget fragment, when
//! entering it would lose content: it has no element children, or it holds
//! non-whitespace text of its own. The budget is a soft ceiling.

use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dom::{self, wrap, PathEntry};
use crate::tokens::TokenCounter;

/// Tag recorded for a fragment covering the whole document.
pub const DOCUMENT_TAG: &str = "#document";

/// A self-contained piece of markup and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// Tag name of the captured node.
    pub tag: String,
    /// Attributes of the captured node, as written in the markup.
    pub attrs: Vec<(String, String)>,
    /// The node's markup wrapped in its ancestors' tags.
    pub content: String,
    /// Ancestors of the captured node, outermost first.
    pub path: Vec<PathEntry>,
    /// Token count of the node's own markup.
    pub tokens: usize,
}

impl Fragment {
    /// True if the captured node alone did not fit the budget it was split under.
    pub fn is_oversized(&self, budget: usize) -> bool {
        self.tokens >= budget
    }
}

/// Split markup into fragments of fewer than `budget` tokens where the tree allows.
pub fn split(markup: &str, budget: usize, counter: &dyn TokenCounter) -> Vec<Fragment> {
    if dom::is_blank(markup) {
        return Vec::new();
    }
    let doc = dom::parse_markup(markup);
    split_document(&doc, budget, counter)
}

/// Split an already parsed document.
pub fn split_document(doc: &Html, budget: usize, counter: &dyn TokenCounter) -> Vec<Fragment> {
    let mut splitter = Splitter::new(budget, counter);
    splitter.visit_document(doc);
    debug!(fragments = splitter.fragments.len(), budget, "split document");
    splitter.fragments
}

/// Traversal driver; owns the ancestor stack for one split.
struct Splitter<'c> {
    budget: usize,
    counter: &'c dyn TokenCounter,
    path: Vec<PathEntry>,
    fragments: Vec<Fragment>,
}

impl<'c> Splitter<'c> {
    fn new(budget: usize, counter: &'c dyn TokenCounter) -> Self {
        Self {
            budget,
            counter,
            path: Vec::new(),
            fragments: Vec::new(),
        }
    }

    /// The document root has no tag of its own and contributes no path entry.
    /// Top-level text follows the same rule as an element's own text: the whole
    /// document is emitted rather than entered.
    fn visit_document(&mut self, doc: &Html) {
        let content = dom::document_html(doc);
        if dom::is_blank(&content) {
            return;
        }

        let root = doc.tree.root();
        let tokens = self.counter.count(&content);
        if tokens < self.budget {
            self.emit_document(content, tokens);
            return;
        }
        if !can_descend(root) {
            warn!(
                tokens,
                budget = self.budget,
                "document exceeds budget and cannot be split without losing text"
            );
            self.emit_document(content, tokens);
            return;
        }

        for child in root.children().filter_map(ElementRef::wrap) {
            self.visit(child);
        }
    }

    fn emit_document(&mut self, content: String, tokens: usize) {
        self.fragments.push(Fragment {
            tag: DOCUMENT_TAG.to_string(),
            attrs: Vec::new(),
            content,
            path: Vec::new(),
            tokens,
        });
    }

    fn visit(&mut self, el: ElementRef) {
        let own = dom::outer_html(*el);
        let tokens = self.counter.count(&own);

        if tokens < self.budget {
            self.emit(el, &own, tokens);
            return;
        }
        if !can_descend(*el) {
            warn!(
                tag = el.value().name(),
                tokens,
                budget = self.budget,
                "node exceeds budget and cannot be split further"
            );
            self.emit(el, &own, tokens);
            return;
        }

        self.path.push(PathEntry::from_element(el.value()));
        for child in el.children().filter_map(ElementRef::wrap) {
            self.visit(child);
        }
        self.path.pop();
    }

    fn emit(&mut self, el: ElementRef, own: &str, tokens: usize) {
        self.fragments.push(Fragment {
            tag: el.value().name().to_string(),
            attrs: el
                .value()
                .attrs()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            content: wrap(&self.path, own),
            path: self.path.clone(),
            tokens,
        });
    }
}

/// A node may be entered if it has element children and no text of its own to lose.
fn can_descend(node: NodeRef<Node>) -> bool {
    let mut has_element = false;
    for child in node.children() {
        match child.value() {
            Node::Element(_) => has_element = true,
            Node::Text(t) if !t.trim().is_empty() => return false,
            _ => {}
        }
    }
    has_element
}
