//! bandstat -- per-band statistics for hyperspectral pixel blocks.
//!
//! One block at a time: a [`block::BlockSource`] produces the samples, an
//! [`accel::ExecutionContext`] runs one worker per band, and the result comes
//! back as a complete [`kernel::BlockStatistics`] or an error.

pub mod accel;
pub mod block;
pub mod config;
pub mod error;
pub mod kernel;
pub mod report;

pub use accel::{AccelMetadata, Backend, ExecutionContext};
pub use block::{BlockSource, MockSource, PixelBlock};
pub use error::{StatsError, StatsResult};
pub use kernel::{BandCentroid, BandStats, BlockStatistics};

/// Load one block from `source` and compute full statistics for it.
pub fn process_block<S: BlockSource>(
    ctx: &ExecutionContext,
    source: &mut S,
    id: &str,
    block_size: usize,
) -> StatsResult<(BlockStatistics, AccelMetadata)> {
    let block = source.load_block(id, block_size, ctx.bands())?;
    tracing::info!(%id, block_size, bands = ctx.bands(), "processing block");
    ctx.execute(&accel::BandStatsOp, &block)
}

/// Load one block from `source` and compute only its centroids.
pub fn process_centroids<S: BlockSource>(
    ctx: &ExecutionContext,
    source: &mut S,
    id: &str,
    block_size: usize,
) -> StatsResult<(Vec<BandCentroid>, AccelMetadata)> {
    let block = source.load_block(id, block_size, ctx.bands())?;
    tracing::info!(%id, block_size, bands = ctx.bands(), "processing block (centroids only)");
    ctx.execute(&accel::CentroidOp, &block)
}
