use std::fmt::Debug;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::pool::ThreadPoolBackend;
use super::{AccelMetadata, Backend};
use crate::block::PixelBlock;
use crate::config::EngineConfig;
use crate::error::{StatsError, StatsResult};

/// Trait that every block operation implements, once per backend.
pub trait AcceleratedOp<Output> {
    /// Data-parallel implementation (one pool task per band)
    fn run_parallel(&self, block: &PixelBlock, pool: &ThreadPoolBackend) -> StatsResult<Output>;

    /// Scalar implementation (Reference)
    fn run_scalar(&self, block: &PixelBlock) -> StatsResult<Output>;
}

/// Caller-owned execution context: the band count every block must match,
/// the selected backend and the worker pool behind it.
#[derive(Debug)]
pub struct ExecutionContext {
    bands: usize,
    backend: Backend,
    pool: Option<ThreadPoolBackend>,
    verify: bool,
}

impl ExecutionContext {
    /// Build a context for blocks with `bands` bands.
    ///
    /// Fails with `DeviceUnavailable` if the requested backend cannot be
    /// brought up. There is no fallback to another backend.
    pub fn new(bands: usize, config: &EngineConfig) -> StatsResult<Self> {
        if bands == 0 {
            return Err(StatsError::NoBands);
        }

        let pool = match config.backend {
            Backend::Parallel => Some(ThreadPoolBackend::new(config.threads)?),
            Backend::Scalar => None,
        };

        info!(
            bands,
            backend = %config.backend,
            threads = pool.as_ref().map(|p| p.threads()).unwrap_or(1),
            verify = config.verify,
            "ExecutionContext initialized"
        );

        Ok(Self {
            bands,
            backend: config.backend,
            pool,
            verify: config.verify,
        })
    }

    pub fn bands(&self) -> usize {
        self.bands
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Report which backends could be brought up on this machine.
    pub fn probe_backends(threads: usize) -> Vec<(Backend, Result<String, StatsError>)> {
        let parallel = ThreadPoolBackend::new(threads).map(|p| format!("{} worker threads", p.threads()));
        vec![
            (Backend::Parallel, parallel),
            (Backend::Scalar, Ok("calling thread".to_string())),
        ]
    }

    /// Run `op` over `block` with exactly one pass on the configured backend.
    ///
    /// With `verify` set on a non-scalar backend, debug builds follow the pass
    /// with a second, host-side run of the scalar reference and log a warning
    /// if the two disagree. That re-run happens after the result is final and
    /// never feeds into it; release builds skip it entirely.
    pub fn execute<Op, Output>(&self, op: &Op, block: &PixelBlock) -> StatsResult<(Output, AccelMetadata)>
    where
        Op: AcceleratedOp<Output>,
        Output: PartialEq + Debug,
    {
        if block.bands() != self.bands {
            return Err(StatsError::Configuration {
                expected: self.bands,
                found: block.bands(),
            });
        }
        if block.block_size() == 0 {
            return Err(StatsError::InvalidBlockSize { block_size: 0 });
        }

        let start = Instant::now();
        let result = match self.backend {
            Backend::Parallel => {
                let pool = self.pool.as_ref().ok_or_else(|| StatsError::DeviceUnavailable {
                    reason: "worker pool not initialized".to_string(),
                })?;
                op.run_parallel(block, pool)
            }
            Backend::Scalar => op.run_scalar(block),
        }?;
        let duration_us = start.elapsed().as_micros() as u64;

        #[cfg(debug_assertions)]
        {
            if self.verify && self.backend != Backend::Scalar {
                if let Ok(reference) = op.run_scalar(block) {
                    if result != reference {
                        warn!(
                            backend = %self.backend,
                            "Execution mismatch! Backend produced different result than Scalar."
                        );
                    } else {
                        debug!(backend = %self.backend, "Execution verification passed");
                    }
                }
            }
        }

        debug!(
            backend = %self.backend,
            bands = block.bands(),
            block_size = block.block_size(),
            duration_us,
            "block processed"
        );

        Ok((
            result,
            AccelMetadata {
                path_used: self.backend,
                bands: block.bands(),
                block_size: block.block_size(),
                duration_us,
            },
        ))
    }
}
