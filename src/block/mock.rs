use tracing::debug;

use super::{BlockSource, PixelBlock};
use crate::error::{StatsError, StatsResult};

/// Source that ignores the identifier and fills every sample with a constant.
#[derive(Debug, Clone)]
pub struct MockSource {
    fill: u16,
    bands: usize,
}

impl MockSource {
    /// `bands` is the configured band count; requests for any other count are
    /// rejected.
    pub fn new(fill: u16, bands: usize) -> Self {
        Self { fill, bands }
    }

    pub fn fill(&self) -> u16 {
        self.fill
    }
}

impl BlockSource for MockSource {
    fn load_block(&mut self, id: &str, block_size: usize, bands: usize) -> StatsResult<PixelBlock> {
        if bands != self.bands {
            return Err(StatsError::Configuration {
                expected: self.bands,
                found: bands,
            });
        }
        debug!(%id, block_size, bands, fill = self.fill, "loading mock block");
        PixelBlock::filled(self.fill, block_size, bands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_fills_constant() {
        let mut source = MockSource::new(1, 4);
        let block = source.load_block("hyperspectral_data_block.dat", 100, 4).unwrap();
        assert_eq!(block.block_size(), 100);
        assert_eq!(block.bands(), 4);
        assert!(block.samples().iter().all(|&v| v == 1));
    }

    #[test]
    fn test_mock_rejects_band_mismatch() {
        let mut source = MockSource::new(1, 4);
        let err = source.load_block("x", 10, 8).unwrap_err();
        assert_eq!(
            err,
            StatsError::Configuration {
                expected: 4,
                found: 8
            }
        );
    }

    #[test]
    fn test_mock_zero_block_size() {
        let mut source = MockSource::new(7, 2);
        assert_eq!(
            source.load_block("x", 0, 2).unwrap_err(),
            StatsError::InvalidBlockSize { block_size: 0 }
        );
    }
}
