// ABOUTME: Error types for the chunker including ErrorCode enum and ChunkError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing the categories of chunking failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Tokenizer,
    InvalidOptions,
    Io,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::Tokenizer => "tokenizer error",
            ErrorCode::InvalidOptions => "invalid options",
            ErrorCode::Io => "io error",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for chunking operations.
#[derive(Debug, thiserror::Error)]
pub struct ChunkError {
    pub code: ErrorCode,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ChunkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "html-chunker: {}: {}", self.op, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ChunkError {
    /// Create a Tokenizer error.
    pub fn tokenizer(op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self {
            code: ErrorCode::Tokenizer,
            op: op.into(),
            source,
        }
    }

    /// Create an InvalidOptions error.
    pub fn invalid_options(op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self {
            code: ErrorCode::InvalidOptions,
            op: op.into(),
            source,
        }
    }

    /// Create an Io error.
    pub fn io(op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self {
            code: ErrorCode::Io,
            op: op.into(),
            source,
        }
    }

    /// Returns true if this is a Tokenizer error.
    pub fn is_tokenizer(&self) -> bool {
        self.code == ErrorCode::Tokenizer
    }

    /// Returns true if this is an InvalidOptions error.
    pub fn is_invalid_options(&self) -> bool {
        self.code == ErrorCode::InvalidOptions
    }

    /// Returns true if this is an Io error.
    pub fn is_io(&self) -> bool {
        self.code == ErrorCode::Io
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ChunkError>;
