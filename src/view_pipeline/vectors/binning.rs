//! Spatial binning arithmetic.
//!
//! All buffers here are column-major: element `col * rows + row`.

use crate::view_pipeline::common::error::{Result, ViewVectorError};

/// Channel groups a sensor may declare (single detector, or VNIR + SWIR).
pub const MAX_CHANNEL_GROUPS: usize = 2;

/// Integer factor by which view vector rows must be combined to reach the
/// level-1 binning. Every channel group has to agree on it.
pub fn bin_scale(view_vector: &[u32], level1: &[u32]) -> Result<usize> {
    let mut scales = Vec::with_capacity(view_vector.len());
    for (&vv, &l1) in view_vector.iter().zip(level1) {
        let scale = l1 / vv.max(1);
        if scale == 0 {
            return Err(ViewVectorError::ResolutionError {
                view_vector_binning: vv,
                level1_binning: l1,
            });
        }
        scales.push(scale);
    }

    let (&first, rest) = scales
        .split_first()
        .ok_or(ViewVectorError::ConfigError { keys: level1_binning_keys(view_vector.len()) })?;
    if let Some(&other) = rest.iter().find(|&&s| s != first) {
        return Err(ViewVectorError::UnsupportedConfigurationError {
            vnir_scale: first,
            swir_scale: other,
        });
    }

    Ok(first as usize)
}

/// Header lines a level-1 file needs for the given number of channel groups.
pub fn level1_binning_keys(channel_groups: usize) -> &'static str {
    if channel_groups > 1 {
        "binning_VNIR = VALUE and binning_SWIR = VALUE"
    } else {
        "binning = VALUE"
    }
}

/// Averages non-overlapping runs of `scale` rows in every column.
///
/// Returns the binned buffer and its row count, `rows / scale`; rows left over
/// at the end of a column are dropped.
pub fn block_average(data: &[f64], rows: usize, cols: usize, scale: usize) -> (Vec<f64>, usize) {
    let binned_rows = rows / scale;
    if rows == 0 || binned_rows == 0 {
        return (Vec::new(), binned_rows);
    }

    let mut binned = Vec::with_capacity(binned_rows * cols);
    for column in data.chunks_exact(rows).take(cols) {
        for block in column.chunks_exact(scale).take(binned_rows) {
            let sum: f64 = block.iter().sum();
            binned.push(sum / scale as f64);
        }
    }
    (binned, binned_rows)
}

/// Drops the first `x_start` rows of every column.
pub fn trim_rows(data: &[f64], rows: usize, cols: usize, x_start: usize) -> Result<(Vec<f64>, usize)> {
    let kept = rows
        .checked_sub(x_start)
        .ok_or(ViewVectorError::TrimOutOfRange { x_start, binned_rows: rows })?;
    if rows == 0 {
        return Ok((Vec::new(), kept));
    }

    let trimmed = data
        .chunks_exact(rows)
        .take(cols)
        .flat_map(|column| column[x_start..].iter().copied())
        .collect();
    Ok((trimmed, kept))
}
