use std::collections::TryReserveError;
use std::fmt;
use std::path::Path;

use tracing::{debug, info, instrument};

use crate::view_pipeline::common::error::{Result, ViewVectorError};
use crate::view_pipeline::raster::{BilFile, RasterSource};
use crate::view_pipeline::vectors::binning::{self, MAX_CHANNEL_GROUPS};
use crate::view_pipeline::vectors::level1::Level1Geometry;

/// Bands a view vector file must contain: rotations about X, Y and Z.
const VIEW_VECTOR_BANDS: u32 = 3;

/// The three rotation buffers of a view vector set, always of equal length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rotations {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl Rotations {
    fn try_zeroed(len: usize) -> std::result::Result<Self, TryReserveError> {
        fn band(len: usize) -> std::result::Result<Vec<f64>, TryReserveError> {
            let mut buffer = Vec::new();
            buffer.try_reserve_exact(len)?;
            buffer.resize(len, 0.0);
            Ok(buffer)
        }

        Ok(Self {
            x: band(len)?,
            y: band(len)?,
            z: band(len)?,
        })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    fn try_map<F>(&self, mut f: F) -> Result<Self>
    where
        F: FnMut(&[f64]) -> Result<Vec<f64>>,
    {
        Ok(Self {
            x: f(&self.x)?,
            y: f(&self.y)?,
            z: f(&self.z)?,
        })
    }
}

/// Per-pixel view vectors of an imaging sensor.
///
/// Buffers are column-major: the angle for `(row, col)` lives at
/// `col * rows + row`. `rows` runs along the spatial (binned and trimmed)
/// axis, `cols` along the other axis of the view vector raster.
///
/// A set loaded from disk keeps its raster open until it is dropped. Clones
/// carry only the data.
pub struct ViewVectorSet {
    rows: usize,
    cols: usize,
    rotations: Rotations,
    spatial_binning: Vec<u32>,
    source: Option<Box<dyn RasterSource>>,
}

impl ViewVectorSet {
    /// Loads the view vector raster at `path` without reconciliation.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = BilFile::open(path)?;
        Self::from_source(Box::new(source))
    }

    /// Loads the view vector raster at `path` and reconciles it with the
    /// level-1 file at `level1_path`.
    pub fn open_reconciled<P: AsRef<Path>, Q: AsRef<Path>>(path: P, level1_path: Q) -> Result<Self> {
        let mut set = Self::open(path)?;
        let target = Level1Geometry::open(level1_path, set.channel_groups())?;
        set.reconcile(&target)?;
        Ok(set)
    }

    /// Takes ownership of `source` and reads the three rotation bands from it.
    ///
    /// The source is closed exactly once: when the set is dropped, or right
    /// away if loading fails.
    pub fn from_source(source: Box<dyn RasterSource>) -> Result<Self> {
        let mut set = Self {
            rows: 0,
            cols: 0,
            rotations: Rotations::default(),
            spatial_binning: Vec::new(),
            source: Some(source),
        };
        set.load()?;
        Ok(set)
    }

    /// Loads from `source` and reconciles with the header of `level1`,
    /// which is closed once its geometry has been read.
    pub fn from_sources(source: Box<dyn RasterSource>, mut level1: Box<dyn RasterSource>) -> Result<Self> {
        let mut set = match Self::from_source(source) {
            Ok(set) => set,
            Err(e) => {
                level1.close();
                return Err(e);
            }
        };
        let target = Level1Geometry::from_source(&*level1, set.channel_groups());
        level1.close();
        set.reconcile(&target?)?;
        Ok(set)
    }

    #[instrument(skip(self))]
    fn load(&mut self) -> Result<()> {
        let source = self.source.as_deref_mut().ok_or_else(|| {
            ViewVectorError::InputReadError("view vector set has no raster to load from".to_string())
        })?;

        // The raster's `samples` field feeds rows and `lines` feeds columns.
        // This inversion is how view vector files are laid out; keep it.
        let rows = source.required_uint("samples")? as usize;
        let cols = source.required_uint("lines")? as usize;
        let bands = source.required_uint("bands")?;
        if bands != VIEW_VECTOR_BANDS {
            return Err(ViewVectorError::FormatError { bands });
        }

        let oversized = || ViewVectorError::InvalidHeaderValue {
            key: "samples * lines".to_string(),
            value: format!("{} * {}", rows, cols),
        };
        let len = rows.checked_mul(cols).ok_or_else(oversized)?;
        let bytes = len
            .checked_mul(VIEW_VECTOR_BANDS as usize * size_of::<f64>())
            .ok_or_else(oversized)?;
        if bytes > isize::MAX as usize {
            return Err(oversized());
        }
        let rotations = Rotations::try_zeroed(len).map_err(|_| oversized())?;

        self.rows = rows;
        self.cols = cols;
        self.rotations = rotations;

        self.spatial_binning = read_spatial_binning(source)?;

        source.read_band(0, &mut self.rotations.x)?;
        source.read_band(1, &mut self.rotations.y)?;
        source.read_band(2, &mut self.rotations.z)?;

        info!(
            rows,
            cols,
            spatial_binning = ?self.spatial_binning,
            file = %source.describe(),
            "Loaded view vectors"
        );
        Ok(())
    }

    /// Bins and trims the rows so they line up with `target`'s samples.
    ///
    /// Nothing is modified unless every check passes.
    #[instrument(skip(self, target), fields(rows = self.rows, cols = self.cols))]
    pub fn reconcile(&mut self, target: &Level1Geometry) -> Result<()> {
        if target.binning().len() != self.spatial_binning.len() {
            return Err(ViewVectorError::ConfigError {
                keys: binning::level1_binning_keys(self.spatial_binning.len()),
            });
        }

        let scale = binning::bin_scale(&self.spatial_binning, target.binning())?;
        let binned_rows = self.rows / scale;
        let x_start = target.x_start();
        let final_rows = binned_rows
            .checked_sub(x_start)
            .ok_or(ViewVectorError::TrimOutOfRange { x_start, binned_rows })?;

        if final_rows != target.samples() {
            return Err(ViewVectorError::SizeMismatchError {
                binned: final_rows,
                level1: target.samples(),
            });
        }

        let (rows, cols) = (self.rows, self.cols);
        let rotations = self.rotations.try_map(|band| {
            let (binned, binned_rows) = binning::block_average(band, rows, cols, scale);
            let (trimmed, _) = binning::trim_rows(&binned, binned_rows, cols, x_start)?;
            Ok(trimmed)
        })?;

        debug!(scale, binned_rows, x_start, final_rows, "Reconciled view vectors");
        self.rotations = rotations;
        self.rows = final_rows;
        Ok(())
    }

    /// Adds a constant boresight correction to every pixel, in place.
    pub fn apply_angle_rotations(&mut self, rx: f64, ry: f64, rz: f64) {
        for value in &mut self.rotations.x {
            *value += rx;
        }
        for value in &mut self.rotations.y {
            *value += ry;
        }
        for value in &mut self.rotations.z {
            *value += rz;
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rot_x(&self) -> &[f64] {
        &self.rotations.x
    }

    pub fn rot_y(&self) -> &[f64] {
        &self.rotations.y
    }

    pub fn rot_z(&self) -> &[f64] {
        &self.rotations.z
    }

    pub fn rotations(&self) -> &Rotations {
        &self.rotations
    }

    pub fn spatial_binning(&self) -> &[u32] {
        &self.spatial_binning
    }

    pub fn channel_groups(&self) -> usize {
        self.spatial_binning.len()
    }

    /// Whether this set still owns the raster it was loaded from.
    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Flat index of `(row, col)`.
    pub fn index(&self, row: usize, col: usize) -> usize {
        col * self.rows + row
    }

    /// `[x, y, z]` rotation of one pixel.
    pub fn angles(&self, row: usize, col: usize) -> Option<[f64; 3]> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let i = self.index(row, col);
        Some([self.rotations.x[i], self.rotations.y[i], self.rotations.z[i]])
    }
}

/// Reads `spatial binning`, one entry per channel group. A missing field
/// means a single group; missing or zero entries mean no binning.
fn read_spatial_binning(source: &dyn RasterSource) -> Result<Vec<u32>> {
    let groups = source
        .header("spatial binning")
        .map_or(1, |value| value.matches(',').count() + 1);
    if groups > MAX_CHANNEL_GROUPS {
        return Err(ViewVectorError::UnsupportedChannelGroups(groups));
    }

    (0..groups)
        .map(|i| -> Result<u32> {
            let value = source.header_uint("spatial binning", i)?.unwrap_or(0);
            Ok(value.max(1))
        })
        .collect()
}

impl Clone for ViewVectorSet {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            rotations: self.rotations.clone(),
            spatial_binning: self.spatial_binning.clone(),
            source: None,
        }
    }
}

impl Drop for ViewVectorSet {
    fn drop(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.close();
        }
    }
}

impl fmt::Debug for ViewVectorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewVectorSet")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("spatial_binning", &self.spatial_binning)
            .field("has_source", &self.has_source())
            .finish_non_exhaustive()
    }
}
