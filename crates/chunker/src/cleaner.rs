// ABOUTME: Removes non-content nodes (hidden, script, style, aria-hidden, tabindex=-1) before chunking.
// ABOUTME: Builds a skip set rule by rule, then serializes once with long URL-like attributes truncated.

use std::borrow::Cow;
use std::collections::HashSet;

use aho_corasick::AhoCorasick;
use ego_tree::{NodeId, NodeRef};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dom::serialize::{filtered_document_html, NodeFilter};
use crate::dom::stylesheet::parse_stylesheet;
use crate::dom::parse_markup;

/// Attributes whose values are truncated to the cutoff length.
pub const TRUNCATED_ATTRS: &[&str] = &[
    "href",
    "src",
    "d",
    "url",
    "data-url",
    "data-src",
    "data-src-hq",
];

/// Appended to a truncated attribute value.
pub const ELLIPSIS: &str = "...";

// Inline style fragments that hide an element
const HIDDEN_STYLE_PATTERNS: &[&str] = &[
    "display:none",
    "display: none",
    "visibility:hidden",
    "visibility: hidden",
];

static HIDDEN_STYLE_MATCHER: Lazy<AhoCorasick> =
    Lazy::new(|| AhoCorasick::new(HIDDEN_STYLE_PATTERNS).unwrap());

/// Output of [`clean_html`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CleanResult {
    /// The cleaned markup.
    pub html: String,
    /// Text of every removed element, in removal order, joined by newlines.
    pub removed: String,
}

/// Nodes to drop and the attribute cutoff, applied while serializing.
struct CleanPlan {
    skip: HashSet<NodeId>,
    attr_max_len: usize,
}

impl NodeFilter for CleanPlan {
    fn skip(&self, id: NodeId) -> bool {
        self.skip.contains(&id)
    }

    fn attr<'v>(&self, name: &str, value: &'v str) -> Cow<'v, str> {
        truncate_attr(name, value, self.attr_max_len)
    }
}

/// Removal pass state: the skip set plus the captured text of removed elements.
struct Remover<'a> {
    doc: &'a Html,
    skip: HashSet<NodeId>,
    removed: Vec<String>,
}

impl<'a> Remover<'a> {
    fn new(doc: &'a Html) -> Self {
        Self {
            doc,
            skip: HashSet::new(),
            removed: Vec::new(),
        }
    }

    fn is_removed(&self, node: NodeRef<Node>) -> bool {
        self.skip.contains(&node.id()) || node.ancestors().any(|a| self.skip.contains(&a.id()))
    }

    /// Mark an element removed and capture its remaining text.
    fn remove(&mut self, el: ElementRef) {
        if self.is_removed(*el) {
            return;
        }
        self.removed.push(self.visible_text(*el));
        self.skip.insert(el.id());
    }

    /// Text of a subtree, leaving out parts that were removed earlier.
    fn visible_text(&self, node: NodeRef<Node>) -> String {
        let mut out = String::new();
        for child in node.children() {
            if self.skip.contains(&child.id()) {
                continue;
            }
            match child.value() {
                Node::Text(t) => out.push_str(t),
                Node::Element(_) => out.push_str(&self.visible_text(child)),
                _ => {}
            }
        }
        out
    }

    fn elements(&self) -> Vec<ElementRef<'a>> {
        self.doc
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .collect()
    }

    /// Elements matched by stylesheet rules that set display:none or visibility:hidden.
    fn remove_stylesheet_hidden(&mut self) {
        let sheets: Vec<String> = self
            .elements()
            .into_iter()
            .filter(|el| el.value().name() == "style")
            .map(|el| el.text().collect())
            .collect();

        for (index, css) in sheets.iter().enumerate() {
            let rules = match parse_stylesheet(css) {
                Ok(rules) => rules,
                Err(e) => {
                    debug!(stylesheet = index, error = %e, "skipping unreadable stylesheet");
                    continue;
                }
            };
            for rule in rules {
                if rule.targets_pseudo_element() || !rule.hides() {
                    continue;
                }
                let selector = match Selector::parse(&rule.selector) {
                    Ok(s) => s,
                    Err(e) => {
                        debug!(selector = %rule.selector, error = ?e, "skipping unsupported selector");
                        continue;
                    }
                };
                let matched: Vec<ElementRef> = self.doc.select(&selector).collect();
                for el in matched {
                    self.remove(el);
                }
            }
        }
    }

    fn remove_tags(&mut self, tags: &[&str]) {
        for tag in tags {
            for el in self.elements() {
                if el.value().name() == *tag {
                    self.remove(el);
                }
            }
        }
    }

    fn remove_inline_hidden(&mut self) {
        for el in self.elements() {
            let hidden = el
                .value()
                .attr("style")
                .is_some_and(|style| HIDDEN_STYLE_MATCHER.is_match(style));
            if hidden {
                self.remove(el);
            }
        }
    }

    fn remove_by_attr(&mut self, name: &str, value: &str) {
        for el in self.elements() {
            if el.value().attr(name) == Some(value) {
                self.remove(el);
            }
        }
    }
}

/// Clean markup for chunking.
///
/// Rules run in this order, each one over whatever the previous rules left:
/// stylesheet-hidden elements, `<script>`/`<style>`, inline `display:none` or
/// `visibility:hidden`, `aria-hidden="true"`, `tabindex="-1"`. Values of
/// [`TRUNCATED_ATTRS`] longer than `attr_max_len` are cut to `attr_max_len`
/// characters plus [`ELLIPSIS`]; `0` disables truncation.
pub fn clean_html(markup: &str, attr_max_len: usize) -> CleanResult {
    let doc = parse_markup(markup);

    let mut remover = Remover::new(&doc);
    remover.remove_stylesheet_hidden();
    remover.remove_tags(&["script", "style"]);
    remover.remove_inline_hidden();
    remover.remove_by_attr("aria-hidden", "true");
    remover.remove_by_attr("tabindex", "-1");

    let Remover { skip, removed, .. } = remover;
    debug!(removed = skip.len(), "cleaned markup");

    let plan = CleanPlan { skip, attr_max_len };
    CleanResult {
        html: filtered_document_html(&doc, &plan),
        removed: removed.join("\n"),
    }
}

/// Truncate a recognized attribute value longer than `max_len` characters.
pub fn truncate_attr<'v>(name: &str, value: &'v str, max_len: usize) -> Cow<'v, str> {
    if max_len == 0 || !TRUNCATED_ATTRS.contains(&name) {
        return Cow::Borrowed(value);
    }
    match value.char_indices().nth(max_len) {
        Some((cut, _)) => Cow::Owned(format!("{}{}", &value[..cut], ELLIPSIS)),
        None => Cow::Borrowed(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_script_and_style_removed() {
        let html = "<html><head><style>p { color: red }</style></head><body><script>console.log('hi')</script><p>Hello</p></body></html>";
        let result = clean_html(html, 0);
        assert!(!result.html.contains("<script"));
        assert!(!result.html.contains("<style"));
        assert!(result.html.contains("<p>Hello</p>"));
        assert_eq!(result.removed, "console.log('hi')\np { color: red }");
    }

    #[test]
    fn test_stylesheet_hidden_elements_removed_first() {
        let html = r#"<style>.hidden { display: none; } .ghost { visibility: hidden }</style><div class="hidden">secret</div><span class="ghost">boo</span><p>shown</p>"#;
        let result = clean_html(html, 0);
        assert_eq!(result.html, "<p>shown</p>");
        assert_eq!(result.removed, "secret\nboo\n.hidden { display: none; } .ghost { visibility: hidden }");
    }

    #[test]
    fn test_pseudo_element_rules_never_remove() {
        let html = r#"<style>p::before { display: none } p:after { display: none }</style><p>kept</p>"#;
        let result = clean_html(html, 0);
        assert_eq!(result.html, "<p>kept</p>");
    }

    #[test]
    fn test_bad_stylesheet_skipped_good_one_applied() {
        let html = r#"<style>.a { display: none</style><style>.b { display: none }</style><p class="a">a</p><p class="b">b</p>"#;
        let result = clean_html(html, 0);
        assert_eq!(result.html, r#"<p class="a">a</p>"#);
    }

    #[test]
    fn test_quoted_brace_does_not_discard_sheet() {
        let html = r#"<style>.q::after { content: "}" } .hidden { display: none }</style><div class="hidden">secret</div><p>shown</p>"#;
        let result = clean_html(html, 0);
        assert_eq!(result.html, "<p>shown</p>");
        assert!(result.removed.starts_with("secret\n"));
    }

    #[test]
    fn test_inline_hidden_styles_removed() {
        let html = r#"<p style="display:none">a</p><p style="color: red; visibility: hidden">b</p><p style="display: block">c</p>"#;
        let result = clean_html(html, 0);
        assert_eq!(result.html, r#"<p style="display: block">c</p>"#);
        assert_eq!(result.removed, "a\nb");
    }

    #[test]
    fn test_aria_hidden_and_tabindex_removed() {
        let html = r#"<nav aria-hidden="true">menu</nav><a tabindex="-1" href="/x">skip</a><a href="/y" tabindex="0">keep</a>"#;
        let result = clean_html(html, 0);
        assert_eq!(result.html, r#"<a href="/y" tabindex="0">keep</a>"#);
        assert_eq!(result.removed, "menu\nskip");
    }

    #[test]
    fn test_nested_removal_captured_once() {
        let html = r#"<div aria-hidden="true"><script>x()</script>text</div>"#;
        let result = clean_html(html, 0);
        assert_eq!(result.html, "");
        assert_eq!(result.removed, "x()\ntext");
    }

    #[test]
    fn test_attribute_truncation() {
        let href = "a".repeat(80);
        let html = format!(r#"<a href="{}">link</a>"#, href);

        let truncated = clean_html(&html, 40);
        assert_eq!(
            truncated.html,
            format!(r#"<a href="{}...">link</a>"#, "a".repeat(40))
        );

        let untouched = clean_html(&html, 0);
        assert_eq!(untouched.html, html);
    }

    #[test]
    fn test_truncate_attr_rules() {
        assert_eq!(truncate_attr("src", "abcdef", 3), "abc...");
        assert_eq!(truncate_attr("src", "abc", 3), "abc");
        assert_eq!(truncate_attr("title", "abcdef", 3), "abcdef");
        assert_eq!(truncate_attr("data-src-hq", "ééééé", 2), "éé...");
        assert_eq!(truncate_attr("href", "abcdef", 0), "abcdef");
    }

    #[test]
    fn test_empty_input() {
        let result = clean_html("", 40);
        assert_eq!(result, CleanResult::default());
    }
}
