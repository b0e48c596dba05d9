// ABOUTME: Token counting adapter: the TokenCounter trait and its tiktoken-backed implementation.
// ABOUTME: Resolves model or encoding names explicitly; unknown names are reported, never defaulted.

//! Token counting.
//!
//! The splitter and merger treat token counting as an opaque oracle behind the
//! [`TokenCounter`] trait. [`TiktokenCounter`] is the production implementation;
//! tests and embedders may supply their own.

use std::fmt;

use tiktoken_rs::CoreBPE;

use crate::error::{ChunkError, Result};

/// Tokenizer model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Maps a markup string to a token count.
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;

    /// Identifier of the tokenizer model this counter encodes with.
    fn model(&self) -> &str;
}

/// Token counter backed by a tiktoken BPE encoding.
pub struct TiktokenCounter {
    model: String,
    bpe: CoreBPE,
}

impl TiktokenCounter {
    /// Load the encoding for a model name (e.g. "gpt-3.5-turbo", "gpt-4o") or an
    /// encoding name ("cl100k_base", "o200k_base", "p50k_base", "r50k_base").
    pub fn new(model: &str) -> Result<Self> {
        let name = model.trim().to_ascii_lowercase();
        if name.is_empty() {
            return Err(ChunkError::tokenizer(
                "load tokenizer",
                Some(anyhow::anyhow!("empty model identifier")),
            ));
        }

        let loaded = match name.as_str() {
            "cl100k_base" => tiktoken_rs::cl100k_base(),
            "o200k_base" => tiktoken_rs::o200k_base(),
            "p50k_base" => tiktoken_rs::p50k_base(),
            "r50k_base" => tiktoken_rs::r50k_base(),
            _ => tiktoken_rs::get_bpe_from_model(&name),
        };
        let bpe = loaded.map_err(|e| {
            ChunkError::tokenizer(
                "load tokenizer",
                Some(anyhow::anyhow!("model {:?}: {}", model, e)),
            )
        })?;

        Ok(Self {
            model: name,
            bpe,
        })
    }
}

impl TokenCounter for TiktokenCounter {
    fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    fn model(&self) -> &str {
        &self.model
    }
}

impl fmt::Debug for TiktokenCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TiktokenCounter")
            .field("model", &self.model)
            .finish()
    }
}

/// Count the tokens of `text` under `model`.
pub fn count_tokens(text: &str, model: &str) -> Result<usize> {
    Ok(TiktokenCounter::new(model)?.count(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_loads() {
        let counter = TiktokenCounter::new(DEFAULT_MODEL).unwrap();
        assert_eq!(counter.model(), "gpt-3.5-turbo");
        assert!(counter.count("<p>Hello world</p>") > 0);
    }

    #[test]
    fn test_empty_text_has_no_tokens() {
        let counter = TiktokenCounter::new(DEFAULT_MODEL).unwrap();
        assert_eq!(counter.count(""), 0);
    }

    #[test]
    fn test_encoding_name_accepted() {
        let counter = TiktokenCounter::new("cl100k_base").unwrap();
        assert_eq!(counter.model(), "cl100k_base");
    }

    #[test]
    fn test_unknown_model_is_tokenizer_error() {
        let err = TiktokenCounter::new("definitely-not-a-model").unwrap_err();
        assert!(err.is_tokenizer());

        let err = count_tokens("hello", "").unwrap_err();
        assert!(err.is_tokenizer());
    }

    #[test]
    fn test_counts_are_deterministic() {
        let a = count_tokens("<div class=\"a b\">same text</div>", DEFAULT_MODEL).unwrap();
        let b = count_tokens("<div class=\"a b\">same text</div>", DEFAULT_MODEL).unwrap();
        assert_eq!(a, b);
    }
}
