use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use bandstat::config::{BandstatConfig, LoggingConfig};
use bandstat::{report, Backend, ExecutionContext, MockSource};

#[derive(Parser)]
#[command(
    name = "bandstat",
    about = "Per-band statistics for hyperspectral pixel blocks",
    version,
    long_about = None
)]
struct Cli {
    /// Path to a TOML config file (overrides BANDSTAT_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute statistics for one mock block
    Run {
        /// Pixels in the block
        #[arg(long)]
        block_size: Option<usize>,

        /// Spectral bands per pixel
        #[arg(long)]
        bands: Option<usize>,

        /// Constant sample value for the mock source
        #[arg(long)]
        fill: Option<u16>,

        /// Execution backend: parallel or scalar
        #[arg(long)]
        backend: Option<Backend>,

        /// Worker threads for the parallel backend (0 = one per CPU)
        #[arg(long)]
        threads: Option<usize>,

        /// Only compute the truncated mean per band
        #[arg(long)]
        centroid_only: bool,

        /// JSON output for machine parsing
        #[arg(long)]
        json: bool,
    },

    /// List execution backends and whether they can start here
    Backends,
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => BandstatConfig::load(path)?,
        None => BandstatConfig::load_layered()?,
    };
    init_tracing(&config.logging);

    match cli.command {
        Commands::Run {
            block_size,
            bands,
            fill,
            backend,
            threads,
            centroid_only,
            json,
        } => {
            if let Some(v) = block_size {
                config.block.block_size = v;
            }
            if let Some(v) = bands {
                config.block.bands = v;
            }
            if let Some(v) = fill {
                config.block.fill = v;
            }
            if let Some(v) = backend {
                config.engine.backend = v;
            }
            if let Some(v) = threads {
                config.engine.threads = v;
            }
            config.validate()?;

            let block = &config.block;
            tracing::info!(
                bands = block.bands,
                block_size = block.block_size,
                backend = %config.engine.backend,
                "Running block statistics"
            );

            let ctx = ExecutionContext::new(block.bands, &config.engine)
                .context("failed to create execution context")?;
            let mut source = MockSource::new(block.fill, block.bands);

            if centroid_only {
                let (centroids, meta) =
                    bandstat::process_centroids(&ctx, &mut source, &block.source_id, block.block_size)?;
                if json {
                    println!("{}", report::to_json(&centroids, &meta)?);
                } else {
                    print!("{}", report::format_centroids(&centroids));
                    println!("{}", report::format_metadata(&meta));
                }
            } else {
                let (stats, meta) =
                    bandstat::process_block(&ctx, &mut source, &block.source_id, block.block_size)?;
                if json {
                    println!("{}", report::to_json(&stats, &meta)?);
                } else {
                    println!("\nbandstat block statistics ({})", block.source_id);
                    print!("{}", report::format_summary(&stats));
                    println!("{}", report::format_metadata(&meta));
                }
            }
        }
        Commands::Backends => {
            println!("{:<10} | {:<10} | Details", "Backend", "Status");
            println!("{:-<10}-|-{:-<10}-|-{:-<30}", "", "", "");
            for (backend, status) in ExecutionContext::probe_backends(config.engine.threads) {
                match status {
                    Ok(details) => println!("{:<10} | {:<10} | {}", backend, "READY", details),
                    Err(e) => println!("{:<10} | {:<10} | {}", backend, "UNAVAILABLE", e),
                }
            }
        }
    }

    Ok(())
}
