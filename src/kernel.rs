//! Per-band statistics kernels.
//!
//! A kernel reduces the samples of exactly one band. It never looks at any
//! other band and never writes anywhere except its return value, so bands can
//! run in any order and on any thread.

use serde::Serialize;

use crate::block::PixelBlock;
use crate::error::{StatsError, StatsResult};

/// A reduction over the samples of a single band.
pub trait BandKernel: Sync {
    type Output: Send;

    fn reduce(&self, block: &PixelBlock, band: usize) -> StatsResult<Self::Output>;
}

/// Summary statistics for one band of one block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandStats {
    pub band: usize,
    pub sum: u64,
    pub sum_of_squares: u64,
    /// Truncated integer mean.
    pub centroid: u64,
    pub mean: f64,
    /// Population variance (no Bessel correction).
    pub variance: f64,
}

/// Statistics for every band of one block, indexed by band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockStatistics {
    pub block_size: usize,
    pub bands: Vec<BandStats>,
}

impl BlockStatistics {
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    pub fn centroids(&self) -> Vec<u64> {
        self.bands.iter().map(|b| b.centroid).collect()
    }
}

/// Centroid for one band, from the centroid-only pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BandCentroid {
    pub band: usize,
    pub centroid: u64,
}

/// Running integer sums for one band.
#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    sum: u64,
    sum_of_squares: u64,
}

impl Accumulator {
    #[inline]
    fn push(&mut self, value: u16, band: usize) -> StatsResult<()> {
        let v = u64::from(value);
        self.sum = self
            .sum
            .checked_add(v)
            .ok_or(StatsError::Overflow { band })?;
        self.sum_of_squares = self
            .sum_of_squares
            .checked_add(v * v)
            .ok_or(StatsError::Overflow { band })?;
        Ok(())
    }
}

/// Validate the block and the band index, returning the pixel count.
fn check_shape(block: &PixelBlock, band: usize) -> StatsResult<u64> {
    if band >= block.bands() {
        return Err(StatsError::BandOutOfRange {
            band,
            bands: block.bands(),
        });
    }
    match block.block_size() {
        0 => Err(StatsError::InvalidBlockSize { block_size: 0 }),
        n => Ok(n as u64),
    }
}

/// Sum, sum of squares, centroid, mean and population variance.
///
/// Variance uses the identity `E[X^2] - E[X]^2`. It is cheap and exact in the
/// integer accumulators, but the final subtraction happens in `f64` and loses
/// precision when the mean is large relative to the spread. Rounding can
/// push a true zero slightly negative; that is clamped to `0.0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsKernel;

impl BandKernel for StatsKernel {
    type Output = BandStats;

    fn reduce(&self, block: &PixelBlock, band: usize) -> StatsResult<BandStats> {
        let n = check_shape(block, band)?;

        let mut acc = Accumulator::default();
        for v in block.band(band) {
            acc.push(v, band)?;
        }

        let count = n as f64;
        let mean = acc.sum as f64 / count;
        let variance = acc.sum_of_squares as f64 / count - mean * mean;

        Ok(BandStats {
            band,
            sum: acc.sum,
            sum_of_squares: acc.sum_of_squares,
            centroid: acc.sum / n,
            mean,
            variance: variance.max(0.0),
        })
    }
}

/// Truncated mean only.
#[derive(Debug, Clone, Copy, Default)]
pub struct CentroidKernel;

impl BandKernel for CentroidKernel {
    type Output = BandCentroid;

    fn reduce(&self, block: &PixelBlock, band: usize) -> StatsResult<BandCentroid> {
        let n = check_shape(block, band)?;
        let mut sum: u64 = 0;
        for v in block.band(band) {
            sum = sum
                .checked_add(u64::from(v))
                .ok_or(StatsError::Overflow { band })?;
        }
        Ok(BandCentroid {
            band,
            centroid: sum / n,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alternating(block_size: usize, bands: usize) -> PixelBlock {
        let samples = (0..block_size)
            .flat_map(|i| std::iter::repeat(if i % 2 == 0 { 0 } else { 2 }).take(bands))
            .collect();
        PixelBlock::new(samples, block_size, bands).unwrap()
    }

    #[test]
    fn test_all_ones() {
        let block = PixelBlock::filled(1, 100, 4).unwrap();
        for band in 0..4 {
            let s = StatsKernel.reduce(&block, band).unwrap();
            assert_eq!(s.band, band);
            assert_eq!(s.sum, 100);
            assert_eq!(s.sum_of_squares, 100);
            assert_eq!(s.centroid, 1);
            assert_eq!(s.mean, 1.0);
            assert_eq!(s.variance, 0.0);
        }
    }

    #[test]
    fn test_alternating_zero_two() {
        let block = alternating(10, 3);
        let s = StatsKernel.reduce(&block, 2).unwrap();
        assert_eq!(s.sum, 10);
        assert_eq!(s.sum_of_squares, 20);
        assert_eq!(s.mean, 1.0);
        assert_eq!(s.variance, 1.0);
    }

    #[test]
    fn test_centroid_truncates() {
        // samples 1, 2 -> mean 1.5, centroid 1
        let block = PixelBlock::new(vec![1, 2], 2, 1).unwrap();
        let s = StatsKernel.reduce(&block, 0).unwrap();
        assert_eq!(s.centroid, 1);
        assert_eq!(s.mean, 1.5);
        assert_eq!(s.variance, 0.25);
        assert_eq!(CentroidKernel.reduce(&block, 0).unwrap().centroid, 1);
    }

    #[test]
    fn test_full_scale_samples_do_not_overflow() {
        // A 32-bit sum of squares would wrap here.
        let block = PixelBlock::filled(u16::MAX, 1000, 1).unwrap();
        let s = StatsKernel.reduce(&block, 0).unwrap();
        let max = u64::from(u16::MAX);
        assert_eq!(s.sum, 1000 * max);
        assert_eq!(s.sum_of_squares, 1000 * max * max);
        assert_eq!(s.centroid, max);
        assert_eq!(s.variance, 0.0);
    }

    #[test]
    fn test_bands_are_independent() {
        // band 0 constant, band 1 ramps
        let pixels: Vec<Vec<u16>> = (0..4).map(|i| vec![5, i]).collect();
        let block = PixelBlock::from_pixels(&pixels, 2).unwrap();
        let b0 = StatsKernel.reduce(&block, 0).unwrap();
        let b1 = StatsKernel.reduce(&block, 1).unwrap();
        assert_eq!(b0.mean, 5.0);
        assert_eq!(b0.variance, 0.0);
        assert_eq!(b1.sum, 6);
        assert_eq!(b1.mean, 1.5);
        assert_eq!(b1.variance, 1.25);
    }

    #[test]
    fn test_band_out_of_range_is_rejected() {
        let block = PixelBlock::new((0..8).collect(), 2, 4).unwrap();
        let expected = StatsError::BandOutOfRange { band: 5, bands: 4 };
        assert_eq!(StatsKernel.reduce(&block, 5).unwrap_err(), expected);
        assert_eq!(CentroidKernel.reduce(&block, 5).unwrap_err(), expected);
        assert_eq!(
            StatsKernel.reduce(&block, 4).unwrap_err(),
            StatsError::BandOutOfRange { band: 4, bands: 4 }
        );
    }

    #[test]
    fn test_overflow_is_reported() {
        let mut acc = Accumulator {
            sum: u64::MAX - 1,
            sum_of_squares: 0,
        };
        assert_eq!(acc.push(2, 3), Err(StatsError::Overflow { band: 3 }));
    }
}
