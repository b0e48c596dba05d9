// ABOUTME: Ancestor path entries and the synthetic wrapper tags rebuilt around a captured subtree.
// ABOUTME: Multi-valued attributes are normalized to space-joined tokens for wrapper reconstruction.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::serialize::escape_attr;

/// Attributes whose value is a whitespace-separated token list.
const MULTI_VALUED_ATTRS: &[&str] = &[
    "class",
    "rel",
    "rev",
    "accept-charset",
    "headers",
    "accesskey",
    "dropzone",
];

/// One ancestor level: a tag name and its formatted attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathEntry {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
}

impl PathEntry {
    /// Build an entry from an element, formatting its attribute values.
    pub fn from_element(el: &scraper::node::Element) -> Self {
        Self {
            tag: el.name().to_string(),
            attrs: el
                .attrs()
                .map(|(k, v)| (k.to_string(), format_attr_value(k, v).into_owned()))
                .collect(),
        }
    }

    fn write_open(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (k, v) in &self.attrs {
            out.push(' ');
            out.push_str(k);
            out.push_str("=\"");
            out.push_str(&escape_attr(v));
            out.push('"');
        }
        out.push('>');
    }

    fn write_close(&self, out: &mut String) {
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

/// Render an attribute value the way the markup would: token lists joined by one space.
pub fn format_attr_value<'v>(name: &str, value: &'v str) -> Cow<'v, str> {
    if !MULTI_VALUED_ATTRS.contains(&name.to_ascii_lowercase().as_str()) {
        return Cow::Borrowed(value);
    }
    let joined = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if joined == value {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(joined)
    }
}

/// Wrap content in one opening tag per path entry and the matching closing tags.
pub fn wrap(path: &[PathEntry], content: &str) -> String {
    let mut out = String::with_capacity(content.len() + path.len() * 16);
    for entry in path {
        entry.write_open(&mut out);
    }
    out.push_str(content);
    for entry in path.iter().rev() {
        entry.write_close(&mut out);
    }
    out
}
