// ABOUTME: Main library entry point for the HTML chunker.
// ABOUTME: Re-exports the public API: Chunker, ChunkerBuilder, Options, ChunkError, split/merge/clean primitives.

//! HTML chunker - split large HTML documents into token-bounded, well-nested chunks.
//!
//! The pipeline cleans the markup (scripts, styles and hidden elements go), splits
//! the document at the shallowest subtrees that fit a token budget, re-wrapping each
//! in its ancestors' tags, then greedily merges neighbouring fragments back together
//! while the result stays within the budget.
//!
//! # Example
//!
//! ```no_run
//! use html_chunker::{Chunker, ChunkError};
//!
//! fn main() -> Result<(), ChunkError> {
//!     let chunker = Chunker::builder().max_tokens(500).build()?;
//!     for chunk in chunker.chunk("<html><body><p>Hello</p></body></html>") {
//!         println!("{}", chunk);
//!     }
//!     Ok(())
//! }
//! ```

pub mod chunker;
pub mod cleaner;
pub mod dom;
pub mod error;
pub mod merger;
pub mod options;
pub mod resource;
pub mod result;
pub mod splitter;
pub mod tokens;

pub use crate::chunker::{chunk_html, Chunker};
pub use crate::cleaner::{clean_html, CleanResult};
pub use crate::error::{ChunkError, ErrorCode, Result};
pub use crate::merger::{common_root_path, merge, merge_pair};
pub use crate::options::{ChunkerBuilder, Options};
pub use crate::result::{ChunkResult, ChunkStats};
pub use crate::splitter::{split, Fragment};
pub use crate::tokens::{count_tokens, TiktokenCounter, TokenCounter, DEFAULT_MODEL};
