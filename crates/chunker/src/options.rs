// ABOUTME: Configuration options for the chunker and the ChunkerBuilder used to construct a Chunker.
// ABOUTME: ChunkerBuilder validates the budget and resolves the tokenizer model when built.

use std::fmt;
use std::sync::Arc;

use crate::chunker::Chunker;
use crate::error::{ChunkError, Result};
use crate::tokens::{TiktokenCounter, TokenCounter, DEFAULT_MODEL};

/// Default token budget per chunk.
pub const DEFAULT_MAX_TOKENS: usize = 1000;

/// Default attribute cutoff applied while cleaning.
pub const DEFAULT_ATTR_CUTOFF: usize = 40;

/// Configuration options for a [`Chunker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Token budget for both splitting and merging.
    pub max_tokens: usize,
    /// Run the cleaner before splitting.
    pub clean: bool,
    /// Maximum length of URL-like attribute values; 0 means unlimited.
    pub attr_cutoff: usize,
    /// Tokenizer model or encoding name.
    pub model: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            clean: true,
            attr_cutoff: DEFAULT_ATTR_CUTOFF,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// Builder for constructing Chunker instances with custom configuration.
#[derive(Clone)]
pub struct ChunkerBuilder {
    opts: Options,
    counter: Option<Arc<dyn TokenCounter>>,
}

impl ChunkerBuilder {
    /// Create a new ChunkerBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
            counter: None,
        }
    }

    /// Start from existing options.
    pub fn from_options(opts: Options) -> Self {
        Self {
            opts,
            counter: None,
        }
    }

    /// Set the token budget per chunk.
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.opts.max_tokens = max_tokens;
        self
    }

    /// Enable or disable cleaning.
    pub fn clean(mut self, clean: bool) -> Self {
        self.opts.clean = clean;
        self
    }

    /// Set the attribute cutoff used while cleaning.
    pub fn attr_cutoff(mut self, attr_cutoff: usize) -> Self {
        self.opts.attr_cutoff = attr_cutoff;
        self
    }

    /// Set the tokenizer model.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.opts.model = model.into();
        self
    }

    /// Use a custom token counter instead of loading `model`.
    pub fn token_counter(mut self, counter: Arc<dyn TokenCounter>) -> Self {
        self.counter = Some(counter);
        self
    }

    /// Build the Chunker with the configured options.
    pub fn build(self) -> Result<Chunker> {
        if self.opts.max_tokens == 0 {
            return Err(ChunkError::invalid_options(
                "build chunker",
                Some(anyhow::anyhow!("max_tokens must be greater than zero")),
            ));
        }

        let counter = match self.counter {
            Some(counter) => counter,
            None => Arc::new(TiktokenCounter::new(&self.opts.model)?),
        };
        Ok(Chunker::new(self.opts, counter))
    }
}

impl Default for ChunkerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ChunkerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkerBuilder")
            .field("opts", &self.opts)
            .field("counter", &self.counter.as_ref().map(|c| c.model().to_string()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = Options::default();
        assert_eq!(opts.max_tokens, 1000);
        assert!(opts.clean);
        assert_eq!(opts.attr_cutoff, 40);
        assert_eq!(opts.model, "gpt-3.5-turbo");
    }

    #[test]
    fn test_builder_sets_options() {
        let chunker = ChunkerBuilder::new()
            .max_tokens(250)
            .clean(false)
            .attr_cutoff(0)
            .model("gpt-4")
            .build()
            .unwrap();
        let opts = chunker.options();
        assert_eq!(opts.max_tokens, 250);
        assert!(!opts.clean);
        assert_eq!(opts.attr_cutoff, 0);
        assert_eq!(opts.model, "gpt-4");
    }

    #[test]
    fn test_zero_budget_rejected() {
        let err = ChunkerBuilder::new().max_tokens(0).build().unwrap_err();
        assert!(err.is_invalid_options());
    }

    #[test]
    fn test_unknown_model_rejected() {
        let err = ChunkerBuilder::new().model("no-such-model").build().unwrap_err();
        assert!(err.is_tokenizer());
    }
}
