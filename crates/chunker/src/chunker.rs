// ABOUTME: The Chunker runs the clean -> split -> merge pipeline with one configured tokenizer.
// ABOUTME: Also exposes chunk_html, the one-call entry point using the default model.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::cleaner::{clean_html, CleanResult};
use crate::error::Result;
use crate::merger;
use crate::options::{ChunkerBuilder, Options};
use crate::result::ChunkResult;
use crate::splitter::{self, Fragment};
use crate::tokens::TokenCounter;

/// Splits HTML into token-bounded chunks.
///
/// A Chunker holds no mutable state; one instance can serve any number of documents,
/// including from several threads.
#[derive(Clone)]
pub struct Chunker {
    opts: Options,
    counter: Arc<dyn TokenCounter>,
}

impl Chunker {
    /// Create a builder with default options.
    pub fn builder() -> ChunkerBuilder {
        ChunkerBuilder::new()
    }

    pub(crate) fn new(opts: Options, counter: Arc<dyn TokenCounter>) -> Self {
        Self { opts, counter }
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    pub fn token_counter(&self) -> &dyn TokenCounter {
        self.counter.as_ref()
    }

    pub fn count_tokens(&self, text: &str) -> usize {
        self.counter.count(text)
    }

    /// Clean markup with the configured attribute cutoff.
    pub fn clean(&self, html: &str) -> CleanResult {
        clean_html(html, self.opts.attr_cutoff)
    }

    /// Split markup into fragments under the configured budget.
    pub fn split(&self, html: &str) -> Vec<Fragment> {
        splitter::split(html, self.opts.max_tokens, self.counter.as_ref())
    }

    /// Merge adjacent fragments under the configured budget.
    pub fn merge<S: AsRef<str>>(&self, fragments: &[S]) -> Vec<String> {
        merger::merge(fragments, self.opts.max_tokens, self.counter.as_ref())
    }

    /// Clean (if enabled), split and merge.
    pub fn chunk(&self, html: &str) -> Vec<String> {
        self.chunk_with_metadata(html).chunks
    }

    /// Like [`Chunker::chunk`], also returning the text removed by cleaning.
    pub fn chunk_with_metadata(&self, html: &str) -> ChunkResult {
        let (markup, removed) = if self.opts.clean {
            let cleaned = self.clean(html);
            (cleaned.html, Some(cleaned.removed))
        } else {
            (html.to_string(), None)
        };

        let fragments = self.split(&markup);
        let contents: Vec<&str> = fragments.iter().map(|f| f.content.as_str()).collect();
        let chunks = self.merge(&contents);
        debug!(
            fragments = fragments.len(),
            chunks = chunks.len(),
            max_tokens = self.opts.max_tokens,
            model = self.counter.model(),
            "chunked document"
        );

        ChunkResult { chunks, removed }
    }
}

impl fmt::Debug for Chunker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunker")
            .field("opts", &self.opts)
            .field("model", &self.counter.model())
            .finish()
    }
}

/// Chunk markup with the default tokenizer model.
pub fn chunk_html(
    markup: &str,
    max_tokens: usize,
    clean: bool,
    attr_cutoff: usize,
) -> Result<Vec<String>> {
    let chunker = ChunkerBuilder::new()
        .max_tokens(max_tokens)
        .clean(clean)
        .attr_cutoff(attr_cutoff)
        .build()?;
    Ok(chunker.chunk(markup))
}
