//! Execution engine -- rayon thread pool / scalar reference.
//!
//! A block is staged, processed in exactly one pass with one worker per band,
//! and only read back once every worker has finished. The caller owns the
//! [`ExecutionContext`]; there is no process-wide queue.

pub mod cpu;
pub mod manager;
pub mod ops;
pub mod pool;
pub mod staging;

pub use manager::{AcceleratedOp, ExecutionContext};
pub use ops::{BandStatsOp, CentroidOp};

use std::fmt;
use std::str::FromStr;

/// Which execution path runs the per-band workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Dedicated rayon thread pool, one task per band
    Parallel,
    /// Sequential loop on the calling thread (reference)
    Scalar,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Parallel => write!(f, "parallel"),
            Backend::Scalar => write!(f, "scalar"),
        }
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "parallel" => Ok(Backend::Parallel),
            "scalar" => Ok(Backend::Scalar),
            other => Err(format!("unknown backend '{}' (expected parallel or scalar)", other)),
        }
    }
}

/// Metadata recording how a block was processed.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AccelMetadata {
    pub path_used: Backend,
    pub bands: usize,
    pub block_size: usize,
    pub duration_us: u64,
}

/// Run `f` once for every slot, handing each call the slot's index and an
/// exclusive borrow of that slot. Returns only after every call has finished.
pub trait ParallelFor {
    fn for_each_slot<T, F>(&self, slots: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize, &mut T) + Send + Sync;
}
