use super::cpu::ScalarBackend;
use super::manager::AcceleratedOp;
use super::pool::ThreadPoolBackend;
use super::staging::run_pass;
use crate::block::PixelBlock;
use crate::error::StatsResult;
use crate::kernel::{BandCentroid, BandStats, BlockStatistics, CentroidKernel, StatsKernel};

/// Full per-band statistics (sum, sum of squares, centroid, mean, variance).
pub struct BandStatsOp;

impl BandStatsOp {
    fn collect(block: &PixelBlock, bands: Vec<BandStats>) -> BlockStatistics {
        BlockStatistics {
            block_size: block.block_size(),
            bands,
        }
    }
}

impl AcceleratedOp<BlockStatistics> for BandStatsOp {
    fn run_parallel(&self, block: &PixelBlock, pool: &ThreadPoolBackend) -> StatsResult<BlockStatistics> {
        let bands = run_pass(&StatsKernel, block, pool)?;
        Ok(Self::collect(block, bands))
    }

    fn run_scalar(&self, block: &PixelBlock) -> StatsResult<BlockStatistics> {
        let bands = run_pass(&StatsKernel, block, &ScalarBackend)?;
        Ok(Self::collect(block, bands))
    }
}

/// Truncated mean per band, nothing else.
pub struct CentroidOp;

impl AcceleratedOp<Vec<BandCentroid>> for CentroidOp {
    fn run_parallel(&self, block: &PixelBlock, pool: &ThreadPoolBackend) -> StatsResult<Vec<BandCentroid>> {
        run_pass(&CentroidKernel, block, pool)
    }

    fn run_scalar(&self, block: &PixelBlock) -> StatsResult<Vec<BandCentroid>> {
        run_pass(&CentroidKernel, block, &ScalarBackend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_matches_scalar() {
        let samples: Vec<u16> = (0..640u32).map(|i| (i * 7919 % 65536) as u16).collect();
        let block = PixelBlock::new(samples, 80, 8).unwrap();
        let pool = ThreadPoolBackend::new(4).unwrap();

        let parallel = BandStatsOp.run_parallel(&block, &pool).unwrap();
        let scalar = BandStatsOp.run_scalar(&block).unwrap();
        assert_eq!(parallel, scalar);

        let centroids = CentroidOp.run_parallel(&block, &pool).unwrap();
        assert_eq!(
            centroids.iter().map(|c| c.centroid).collect::<Vec<_>>(),
            parallel.centroids()
        );
    }

    #[test]
    fn test_results_in_band_order() {
        let block = PixelBlock::filled(2, 16, 6).unwrap();
        let pool = ThreadPoolBackend::new(3).unwrap();
        let stats = BandStatsOp.run_parallel(&block, &pool).unwrap();
        let order: Vec<usize> = stats.bands.iter().map(|b| b.band).collect();
        assert_eq!(order, (0..6).collect::<Vec<_>>());
    }
}
