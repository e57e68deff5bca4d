//! Error taxonomy for a single block invocation.
//!
//! Every variant is fatal to the invocation that produced it. Nothing in the
//! core retries, and no partially populated statistics are ever returned.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("band count mismatch: configured for {expected} bands, got {found}")]
    Configuration { expected: usize, found: usize },

    #[error("band count must be greater than zero")]
    NoBands,

    #[error("band {band} out of range for a block with {bands} bands")]
    BandOutOfRange { band: usize, bands: usize },

    #[error("invalid block size {block_size}: a block must contain at least one pixel")]
    InvalidBlockSize { block_size: usize },

    #[error("sample count mismatch: expected {expected} samples, got {found}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("accumulator overflow in band {band}")]
    Overflow { band: usize },

    #[error("no usable execution backend: {reason}")]
    DeviceUnavailable { reason: String },

    #[error("staging misuse: {reason}")]
    StagingMisuse { reason: &'static str },
}

pub type StatsResult<T> = std::result::Result<T, StatsError>;
