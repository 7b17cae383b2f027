use crate::view_pipeline::common::error::{Result, ViewVectorError};

/// Header lookup and band access for a raster file.
///
/// Keys are matched case-insensitively. List values (`{a, b}`) are exposed
/// with their braces stripped so that items can be addressed by position.
pub trait RasterSource {
    /// Raw value of `key`, or `None` when the header does not declare it.
    fn header(&self, key: &str) -> Option<String>;

    /// Fills `buffer` with every sample of the 0-based `band`.
    ///
    /// `buffer` must hold exactly `samples * lines` elements; element
    /// `line * samples + sample` receives the value at that position.
    fn read_band(&mut self, band: usize, buffer: &mut [f64]) -> Result<()>;

    /// Releases the underlying file. Calling it again is a no-op.
    fn close(&mut self);

    /// Human readable name used in error messages.
    fn describe(&self) -> String {
        "raster".to_string()
    }

    /// The `occurrence`-th comma separated item of `key`.
    fn header_value(&self, key: &str, occurrence: usize) -> Option<String> {
        let value = self.header(key)?;
        value
            .split(',')
            .map(str::trim)
            .nth(occurrence)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
    }

    /// Parses the `occurrence`-th item of `key` as an unsigned integer.
    fn header_uint(&self, key: &str, occurrence: usize) -> Result<Option<u32>> {
        match self.header_value(key, occurrence) {
            None => Ok(None),
            Some(value) => value
                .parse::<u32>()
                .map(Some)
                .map_err(|_| ViewVectorError::InvalidHeaderValue {
                    key: key.to_string(),
                    value,
                }),
        }
    }

    /// Like [`RasterSource::header_uint`] but the field must be present.
    fn required_uint(&self, key: &str) -> Result<u32> {
        self.header_uint(key, 0)?
            .ok_or_else(|| ViewVectorError::MissingHeaderField {
                key: key.to_string(),
                file: self.describe(),
            })
    }
}
