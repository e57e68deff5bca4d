//! TOML configuration for bandstat.
//!
//! Layered lookup: an explicit path, then the `BANDSTAT_CONFIG` environment
//! variable, then `./bandstat.toml`, then compiled-in defaults. The band count
//! set here is the single value shared by the block source, the execution
//! context and the statistics containers.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::accel::Backend;

/// Band count used when nothing else is configured.
pub const DEFAULT_BANDS: usize = 4;

/// Pixels per block used when nothing else is configured.
pub const DEFAULT_BLOCK_SIZE: usize = 100;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "BANDSTAT_CONFIG";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BandstatConfig {
    #[serde(default)]
    pub block: BlockConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BandstatConfig {
    /// Load configuration from a TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config file: {}", path.display()))?;
        info!(path = %path.display(), "loaded bandstat configuration");
        Ok(config)
    }

    /// Try, in order: `BANDSTAT_CONFIG`, `./bandstat.toml`, defaults.
    ///
    /// A config file that is named or present but cannot be loaded is an
    /// error, never a silent fallback to defaults.
    pub fn load_layered() -> Result<Self> {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        Self::resolve(env_path.as_deref(), Path::new("bandstat.toml"))
    }

    fn resolve(env_path: Option<&Path>, local_path: &Path) -> Result<Self> {
        if let Some(path) = env_path {
            return Self::load(path)
                .with_context(|| format!("{} points at an unusable config file", CONFIG_ENV));
        }

        if local_path.exists() {
            return Self::load(local_path);
        }

        debug!("no config file found, using compiled-in defaults");
        Ok(Self::default())
    }

    /// Reject shapes no block could ever satisfy.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.block.bands > 0, "block.bands must be greater than zero");
        anyhow::ensure!(
            self.block.block_size > 0,
            "block.block_size must be greater than zero"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// Shape and origin of the block to process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockConfig {
    /// Number of spectral bands per pixel.
    pub bands: usize,
    /// Pixels per block.
    pub block_size: usize,
    /// Identifier handed to the block source.
    pub source_id: String,
    /// Constant sample value produced by the mock source.
    pub fill: u16,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            bands: DEFAULT_BANDS,
            block_size: DEFAULT_BLOCK_SIZE,
            source_id: "hyperspectral_data_block.dat".to_string(),
            fill: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// `parallel` or `scalar`.
    pub backend: Backend,
    /// Worker threads for the parallel backend. 0 means one per logical CPU.
    pub threads: usize,
    /// In debug builds, cross-check the parallel result against the scalar
    /// reference.
    pub verify: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Parallel,
            threads: 0,
            verify: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum tracing level (`trace`, `debug`, `info`, `warn`, `error`).
    pub level: String,
    /// Emit JSON lines instead of human-readable logs.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
