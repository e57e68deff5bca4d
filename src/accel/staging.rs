//! Scoped storage for one block pass.
//!
//! `Staging` owns one output slot per band for the lifetime of a single pass.
//! Workers only ever see their own slot. Results leave staging all at once,
//! after the completion barrier, or not at all. Storage is released in `Drop`
//! whichever way the pass ends.

use tracing::debug;

use super::ParallelFor;
use crate::block::PixelBlock;
use crate::error::{StatsError, StatsResult};
use crate::kernel::BandKernel;

type Slot<T> = Option<StatsResult<T>>;

/// One band's worth of work: read-only input, exclusive output slot.
pub struct BandWorker<'a, K: BandKernel> {
    band: usize,
    input: &'a PixelBlock,
    kernel: &'a K,
    slot: &'a mut Slot<K::Output>,
}

impl<'a, K: BandKernel> BandWorker<'a, K> {
    pub fn run(self) {
        *self.slot = Some(self.kernel.reduce(self.input, self.band));
    }
}

pub struct Staging<'a, T> {
    input: &'a PixelBlock,
    slots: Vec<Slot<T>>,
    launched: bool,
}

impl<'a, T: Send> Staging<'a, T> {
    /// Stage `input` and allocate one empty output slot per band.
    pub fn acquire(input: &'a PixelBlock) -> StatsResult<Self> {
        if input.block_size() == 0 {
            return Err(StatsError::InvalidBlockSize { block_size: 0 });
        }
        let mut slots = Vec::with_capacity(input.bands());
        slots.resize_with(input.bands(), || None);
        debug!(
            bands = input.bands(),
            block_size = input.block_size(),
            "staging acquired"
        );
        Ok(Self {
            input,
            slots,
            launched: false,
        })
    }

    /// Launch the single pass and block until every band has finished.
    pub fn launch<K, P>(&mut self, kernel: &K, exec: &P) -> StatsResult<()>
    where
        K: BandKernel<Output = T>,
        P: ParallelFor,
    {
        if self.launched {
            return Err(StatsError::StagingMisuse {
                reason: "staging area already launched",
            });
        }
        self.launched = true;

        let input = self.input;
        exec.for_each_slot(&mut self.slots, |band, slot| {
            BandWorker {
                band,
                input,
                kernel,
                slot,
            }
            .run()
        });
        Ok(())
    }

    /// Copy results out in band order. Fails if any band failed or never ran.
    pub fn retrieve(mut self) -> StatsResult<Vec<T>> {
        if !self.launched {
            return Err(StatsError::StagingMisuse {
                reason: "results requested before launch",
            });
        }
        std::mem::take(&mut self.slots)
            .into_iter()
            .enumerate()
            .map(|(band, slot)| {
                slot.unwrap_or_else(|| {
                    Err(StatsError::DeviceUnavailable {
                        reason: format!("band {} was never scheduled", band),
                    })
                })
            })
            .collect()
    }
}

impl<T> Drop for Staging<'_, T> {
    fn drop(&mut self) {
        debug!(
            bands = self.input.bands(),
            pending = self.slots.len(),
            "staging released"
        );
    }
}

/// Acquire, launch, wait, retrieve.
pub fn run_pass<K, P>(kernel: &K, input: &PixelBlock, exec: &P) -> StatsResult<Vec<K::Output>>
where
    K: BandKernel,
    P: ParallelFor,
{
    let mut staging = Staging::acquire(input)?;
    staging.launch(kernel, exec)?;
    staging.retrieve()
}
