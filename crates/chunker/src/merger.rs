// ABOUTME: Greedily recombines adjacent fragments while the merged markup stays within the token budget.
// ABOUTME: Merging finds the common tag+attribute root path of two fragments and grafts the second's content there.

//! Fragment merging.
//!
//! [`merge`] is a single left-to-right fold: the accumulator absorbs the next
//! fragment when the merged markup counts at most `budget` tokens, otherwise the
//! accumulator is finalized and the next fragment starts a new one. A finalized
//! fragment is never reopened, and no fragment is dropped or truncated; a fragment
//! that was already over budget passes through as-is.

use ego_tree::{NodeId, NodeRef, Tree};
use scraper::{ElementRef, Html, Node};
use tracing::debug;

use crate::dom::{self, document_html};
use crate::tokens::TokenCounter;

/// Deepest common structural prefix of two parsed fragments.
///
/// Walks both trees from the top in lock-step, following the first element child
/// on each side, for as long as the two elements have the same tag name and the same
/// attributes. Returns the matched elements of each tree, outermost first; both lists
/// have the same length.
pub fn common_root_path(a: &Html, b: &Html) -> (Vec<NodeId>, Vec<NodeId>) {
    let mut path_a = Vec::new();
    let mut path_b = Vec::new();
    let mut cur_a = first_element_child(a.tree.root());
    let mut cur_b = first_element_child(b.tree.root());

    while let (Some(x), Some(y)) = (cur_a, cur_b) {
        if !same_element(x, y) {
            break;
        }
        path_a.push(x.id());
        path_b.push(y.id());
        cur_a = first_element_child(*x);
        cur_b = first_element_child(*y);
    }

    (path_a, path_b)
}

/// Merge `b` into `a` at their common root path and serialize the result.
///
/// Every direct child of `b`'s deepest common node is appended, in order, to the
/// corresponding node of `a` (or to the top level when the fragments share no root).
/// The two fragments are parsed into separate trees, so no child of `b` is ever
/// already present in `a`.
pub fn merge_pair(a: &str, b: &str) -> String {
    let mut doc_a = dom::parse_markup(a);
    let doc_b = dom::parse_markup(b);

    let (path_a, path_b) = common_root_path(&doc_a, &doc_b);
    let anchor_a = path_a.last().copied().unwrap_or_else(|| doc_a.tree.root().id());
    let anchor_b = path_b.last().copied().unwrap_or_else(|| doc_b.tree.root().id());

    if let Some(source) = doc_b.tree.get(anchor_b) {
        for child in source.children() {
            graft(&mut doc_a.tree, anchor_a, child);
        }
    }

    document_html(&doc_a)
}

/// Fold adjacent fragments together while each merge stays within `budget` tokens.
pub fn merge<S: AsRef<str>>(
    fragments: &[S],
    budget: usize,
    counter: &dyn TokenCounter,
) -> Vec<String> {
    let mut rest = fragments.iter();
    let Some(first) = rest.next() else {
        return Vec::new();
    };

    let mut merged_chunks = Vec::new();
    let mut current = first.as_ref().to_string();

    for next in rest {
        let merged = merge_pair(&current, next.as_ref());
        let tokens = counter.count(&merged);
        if tokens <= budget {
            current = merged;
        } else {
            debug!(tokens, budget, "merge rejected, starting new chunk");
            merged_chunks.push(current);
            current = next.as_ref().to_string();
        }
    }

    merged_chunks.push(current);
    merged_chunks
}

fn first_element_child(node: NodeRef<Node>) -> Option<ElementRef> {
    node.children().find_map(ElementRef::wrap)
}

/// Same tag name and same attribute mapping, regardless of attribute order.
fn same_element(a: ElementRef, b: ElementRef) -> bool {
    if a.value().name() != b.value().name() {
        return false;
    }
    let mut attrs_a: Vec<(&str, &str)> = a.value().attrs().collect();
    let mut attrs_b: Vec<(&str, &str)> = b.value().attrs().collect();
    attrs_a.sort_unstable();
    attrs_b.sort_unstable();
    attrs_a == attrs_b
}

/// Deep-copy `src` and its subtree into `tree` as the last child of `parent`.
fn graft(tree: &mut Tree<Node>, parent: NodeId, src: NodeRef<Node>) {
    let id = match tree.get_mut(parent) {
        Some(mut p) => p.append(src.value().clone()).id(),
        None => return,
    };
    for child in src.children() {
        graft(tree, id, child);
    }
}
