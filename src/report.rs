//! Human-readable and JSON rendering of block statistics.

use crate::accel::AccelMetadata;
use crate::kernel::{BandCentroid, BlockStatistics};

/// One line per band with every statistic.
pub fn format_summary(stats: &BlockStatistics) -> String {
    let mut out = format!(
        "{:<6} | {:>12} | {:>16} | {:>8} | {:>12} | {:>14}\n",
        "Band", "Sum", "SumOfSquares", "Centroid", "Mean", "Variance"
    );
    out.push_str(&format!(
        "{:-<6}-|-{:-<12}-|-{:-<16}-|-{:-<8}-|-{:-<12}-|-{:-<14}\n",
        "", "", "", "", "", ""
    ));
    for b in &stats.bands {
        out.push_str(&format!(
            "{:<6} | {:>12} | {:>16} | {:>8} | {:>12.4} | {:>14.4}\n",
            b.band, b.sum, b.sum_of_squares, b.centroid, b.mean, b.variance
        ));
    }
    out
}

/// `Centroid[i] = c` lines, for the centroid-only pass.
pub fn format_centroids(centroids: &[BandCentroid]) -> String {
    centroids
        .iter()
        .map(|c| format!("Centroid[{}] = {}\n", c.band, c.centroid))
        .collect()
}

/// Short footer describing how the block was processed.
pub fn format_metadata(meta: &AccelMetadata) -> String {
    format!(
        "{} bands x {} pixels via {} in {}us",
        meta.bands, meta.block_size, meta.path_used, meta.duration_us
    )
}

/// Statistics plus metadata as pretty JSON.
pub fn to_json<T: serde::Serialize>(stats: &T, meta: &AccelMetadata) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&serde_json::json!({
        "statistics": stats,
        "metadata": meta,
    }))
}
