// ABOUTME: DOM parsing, serialization and ancestor-path utilities shared by every pipeline stage.
// ABOUTME: Provides helpers for working with scraper's HTML document tree.

//! DOM utilities for HTML chunking.
//!
//! Every stage of the pipeline parses markup through [`parse_markup`], writes it back
//! through [`serialize`], and describes ancestor chains with [`path::PathEntry`].

pub mod document;
pub mod path;
pub mod serialize;
pub mod stylesheet;

pub use document::{is_blank, parse_markup};
pub use path::{format_attr_value, wrap, PathEntry};
pub use serialize::{document_html, outer_html, NodeFilter, Verbatim};
