//! Error types for tree queries and configuration.

use thiserror::Error;

/// Result type alias using [`TreeError`].
pub type Result<T, E = TreeError> = std::result::Result<T, E>;

/// Recoverable failures. None of these leave the tree modified.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TreeError {
    #[error("key not found")]
    KeyNotFound,

    #[error("tree is empty")]
    EmptyTree,

    #[error("rank {rank} out of range for tree of {len} keys")]
    RankOutOfRange { rank: usize, len: usize },

    #[error("no key greater than the given key")]
    NoSuccessor,

    #[error("no key smaller than the given key")]
    NoPredecessor,

    #[error("alpha must lie strictly between 0.5 and 1.0, got {0}")]
    InvalidAlpha(f64),

    #[error("sum of keys in range overflows the key type")]
    SumOverflow,
}
