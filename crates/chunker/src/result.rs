// ABOUTME: ChunkResult holding the chunks of one document plus the text removed by cleaning.
// ABOUTME: ChunkStats summarizes per-chunk token counts for reporting.

use serde::{Deserialize, Serialize};

use crate::tokens::TokenCounter;

/// The chunks produced for one document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChunkResult {
    pub chunks: Vec<String>,
    /// Text of the elements removed by cleaning; `None` when cleaning was off.
    pub removed: Option<String>,
}

/// Token statistics over a set of chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChunkStats {
    pub chunks: usize,
    pub total_tokens: usize,
    pub min_tokens: usize,
    pub max_tokens: usize,
    pub avg_tokens: usize,
}

impl ChunkResult {
    /// Number of chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns true if the document produced no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Count every chunk and summarize.
    pub fn stats(&self, counter: &dyn TokenCounter) -> ChunkStats {
        let counts: Vec<usize> = self.chunks.iter().map(|c| counter.count(c)).collect();
        ChunkStats::from_counts(&counts)
    }
}

impl ChunkStats {
    pub fn from_counts(counts: &[usize]) -> Self {
        if counts.is_empty() {
            return Self::default();
        }
        let total: usize = counts.iter().sum();
        Self {
            chunks: counts.len(),
            total_tokens: total,
            min_tokens: counts.iter().copied().min().unwrap_or(0),
            max_tokens: counts.iter().copied().max().unwrap_or(0),
            avg_tokens: total / counts.len(),
        }
    }
}
