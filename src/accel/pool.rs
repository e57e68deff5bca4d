use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use super::ParallelFor;
use crate::error::{StatsError, StatsResult};

/// Data-parallel backend over a dedicated rayon pool.
///
/// The pool belongs to the execution context, not to the global rayon
/// registry, so two contexts never share workers.
pub struct ThreadPoolBackend {
    pool: ThreadPool,
}

impl ThreadPoolBackend {
    /// `threads == 0` lets rayon pick (one per logical CPU).
    pub fn new(threads: usize) -> StatsResult<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("bandstat-worker-{}", i))
            .build()
            .map_err(pool_unavailable)?;
        debug!(threads = pool.current_num_threads(), "worker pool started");
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

fn pool_unavailable(err: impl std::fmt::Display) -> StatsError {
    StatsError::DeviceUnavailable {
        reason: format!("failed to start worker pool: {}", err),
    }
}

impl ParallelFor for ThreadPoolBackend {
    fn for_each_slot<T, F>(&self, slots: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize, &mut T) + Send + Sync,
    {
        // `install` returns once every task spawned inside it has completed.
        self.pool.install(|| {
            slots
                .par_iter_mut()
                .with_max_len(1)
                .enumerate()
                .for_each(|(index, slot)| f(index, slot));
        });
    }
}

impl std::fmt::Debug for ThreadPoolBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPoolBackend")
            .field("threads", &self.threads())
            .finish()
    }
}
