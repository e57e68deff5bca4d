//! Pixel blocks and the sources that produce them.

pub mod mock;

pub use mock::MockSource;

use crate::error::{StatsError, StatsResult};

/// One block of band-interleaved samples.
///
/// Layout is pixel-major: the sample for pixel `i`, band `b` lives at
/// `i * bands + b`. A block is immutable once built; the engine only ever
/// reads from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBlock {
    samples: Vec<u16>,
    block_size: usize,
    bands: usize,
}

impl PixelBlock {
    /// Build a block from raw samples, checking the shape.
    pub fn new(samples: Vec<u16>, block_size: usize, bands: usize) -> StatsResult<Self> {
        if block_size == 0 {
            return Err(StatsError::InvalidBlockSize { block_size });
        }
        if bands == 0 {
            return Err(StatsError::NoBands);
        }
        let expected = block_size
            .checked_mul(bands)
            .ok_or(StatsError::ShapeMismatch {
                expected: usize::MAX,
                found: samples.len(),
            })?;
        if samples.len() != expected {
            return Err(StatsError::ShapeMismatch {
                expected,
                found: samples.len(),
            });
        }
        Ok(Self {
            samples,
            block_size,
            bands,
        })
    }

    /// A block where every sample holds `value`.
    pub fn filled(value: u16, block_size: usize, bands: usize) -> StatsResult<Self> {
        let len = block_size
            .checked_mul(bands)
            .ok_or(StatsError::ShapeMismatch {
                expected: usize::MAX,
                found: 0,
            })?;
        Self::new(vec![value; len], block_size, bands)
    }

    /// Build a block pixel by pixel. Each inner slice is one pixel and must
    /// hold exactly `bands` samples.
    pub fn from_pixels(pixels: &[Vec<u16>], bands: usize) -> StatsResult<Self> {
        let mut samples = Vec::with_capacity(pixels.len() * bands);
        for pixel in pixels {
            if pixel.len() != bands {
                return Err(StatsError::ShapeMismatch {
                    expected: bands,
                    found: pixel.len(),
                });
            }
            samples.extend_from_slice(pixel);
        }
        Self::new(samples, pixels.len(), bands)
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn bands(&self) -> usize {
        self.bands
    }

    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    #[inline]
    pub fn sample(&self, pixel: usize, band: usize) -> u16 {
        self.samples[pixel * self.bands + band]
    }

    /// Iterate the samples of one band, in pixel order.
    pub fn band(&self, band: usize) -> impl Iterator<Item = u16> + '_ {
        self.samples.iter().skip(band).step_by(self.bands).copied()
    }
}

/// Something that can produce the next block of pixels.
///
/// Storage formats live behind this trait; the statistics core never sees
/// them.
pub trait BlockSource {
    /// Produce a `block_size × bands` block for `id`.
    fn load_block(&mut self, id: &str, block_size: usize, bands: usize) -> StatsResult<PixelBlock>;
}
