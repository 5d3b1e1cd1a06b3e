use thiserror::Error;

/// Errors surfaced by chain operations and validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("no data supplied for new block")]
    EmptyData,

    #[error("hash mismatch at block {0}: stored hash does not match recomputed fields")]
    HashMismatch(u64),

    #[error("broken link at block {0}: previous_hash does not match predecessor")]
    BrokenLink(u64),
}
