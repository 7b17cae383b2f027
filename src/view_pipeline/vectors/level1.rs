use std::path::Path;

use tracing::{debug, warn};

use crate::view_pipeline::common::error::{Result, ViewVectorError};
use crate::view_pipeline::raster::{BilFile, RasterSource};
use crate::view_pipeline::vectors::binning::{level1_binning_keys, MAX_CHANNEL_GROUPS};

/// Item of the level-1 `binning` list holding the spatial factor
/// (`binning = {spectral, spatial}`).
const SPATIAL_BINNING_ITEM: usize = 1;

/// Pixel geometry of a level-1 product that view vectors are reconciled to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level1Geometry {
    samples: usize,
    x_start: usize,
    binning: Vec<u32>,
}

impl Level1Geometry {
    /// Fails with [`ViewVectorError::ConfigError`] when any binning factor is zero,
    /// or [`ViewVectorError::UnsupportedChannelGroups`] for more than two factors.
    pub fn new(samples: usize, x_start: usize, binning: Vec<u32>) -> Result<Self> {
        if binning.len() > MAX_CHANNEL_GROUPS {
            return Err(ViewVectorError::UnsupportedChannelGroups(binning.len()));
        }
        if binning.is_empty() || binning.contains(&0) {
            return Err(ViewVectorError::ConfigError {
                keys: level1_binning_keys(binning.len()),
            });
        }
        Ok(Self { samples, x_start, binning })
    }

    /// Reads the geometry from a level-1 header. `channel_groups` selects
    /// between the `binning` key and the `binning_VNIR`/`binning_SWIR` pair.
    pub fn from_source(source: &dyn RasterSource, channel_groups: usize) -> Result<Self> {
        let samples = source.required_uint("samples")? as usize;
        let x_start = match source.header_uint("x start", 0)? {
            Some(x_start) => x_start as usize,
            None => {
                warn!(file = %source.describe(), "Level-1 header has no 'x start'; assuming 0");
                0
            }
        };

        let keys: &[&str] = if channel_groups == 1 {
            &["binning"]
        } else {
            &["binning_VNIR", "binning_SWIR"]
        };
        let binning = keys
            .iter()
            .map(|key| -> Result<u32> { Ok(source.header_uint(key, SPATIAL_BINNING_ITEM)?.unwrap_or(0)) })
            .collect::<Result<Vec<u32>>>()?;

        if binning.contains(&0) {
            return Err(ViewVectorError::ConfigError {
                keys: level1_binning_keys(channel_groups),
            });
        }

        debug!(samples, x_start, ?binning, "Read level-1 geometry");
        Ok(Self { samples, x_start, binning })
    }

    /// Opens a level-1 file just long enough to read its header.
    pub fn open<P: AsRef<Path>>(path: P, channel_groups: usize) -> Result<Self> {
        let mut level1 = BilFile::open(path)?;
        let geometry = Self::from_source(&level1, channel_groups);
        level1.close();
        geometry
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn x_start(&self) -> usize {
        self.x_start
    }

    pub fn binning(&self) -> &[u32] {
        &self.binning
    }
}
