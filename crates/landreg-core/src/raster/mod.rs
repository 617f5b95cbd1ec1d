mod crs;
mod extent;
mod geotransform;

pub use crs::Crs;
pub use extent::Extent;
pub use geotransform::GeoTransform;

use ndarray::{Array2, Array3, ArrayView2, Axis};
use rand::Rng;

use crate::consts::SAMPLE_ATTEMPT_FACTOR;
use crate::error::{LandregError, Result};

/// A georeferenced multi-band raster held in memory.
/// Pixel values are raw f32 quantities (digital numbers, reflectance, ...).
#[derive(Clone, Debug)]
pub struct Raster {
    /// Band stack, shape = (bands, rows, cols)
    data: Array3<f32>,
    transform: GeoTransform,
    crs: Crs,
    /// Value marking missing cells, in addition to NaN
    nodata: Option<f32>,
}

/// A random location drawn from a raster, with the value of every band.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
    pub values: Vec<f32>,
}

impl Raster {
    pub fn new(data: Array3<f32>, transform: GeoTransform, crs: Crs) -> Result<Self> {
        let (bands, rows, cols) = data.dim();
        if bands == 0 || rows == 0 || cols == 0 {
            return Err(LandregError::InvalidDimensions { bands, rows, cols });
        }
        if !(transform.res_x > 0.0 && transform.res_y > 0.0) {
            return Err(LandregError::InvalidParameter(format!(
                "cell size must be positive, got {}x{}",
                transform.res_x, transform.res_y
            )));
        }
        Ok(Self {
            data,
            transform,
            crs,
            nodata: None,
        })
    }

    /// Build a single-band raster from a 2D array.
    pub fn from_band(band: Array2<f32>, transform: GeoTransform, crs: Crs) -> Result<Self> {
        Self::new(band.insert_axis(Axis(0)), transform, crs)
    }

    /// Stack equally sized 2D arrays into one raster.
    pub fn from_bands(bands: &[Array2<f32>], transform: GeoTransform, crs: Crs) -> Result<Self> {
        if bands.is_empty() {
            return Err(LandregError::InvalidDimensions {
                bands: 0,
                rows: 0,
                cols: 0,
            });
        }
        let views: Vec<ArrayView2<f32>> = bands.iter().map(|b| b.view()).collect();
        let data = ndarray::stack(Axis(0), &views).map_err(|_| {
            let first = bands.first().map(|b| b.dim()).unwrap_or((0, 0));
            let odd = bands
                .iter()
                .map(|b| b.dim())
                .find(|d| *d != first)
                .unwrap_or((0, 0));
            LandregError::DimensionMismatch {
                expected: first,
                actual: odd,
                path: "band stack".into(),
            }
        })?;
        Self::new(data, transform, crs)
    }

    pub fn with_nodata(mut self, nodata: Option<f32>) -> Self {
        self.nodata = nodata;
        self
    }

    pub fn data(&self) -> &Array3<f32> {
        &self.data
    }

    pub fn band(&self, band: usize) -> ArrayView2<'_, f32> {
        self.data.index_axis(Axis(0), band)
    }

    pub fn band_count(&self) -> usize {
        self.data.dim().0
    }

    pub fn rows(&self) -> usize {
        self.data.dim().1
    }

    pub fn cols(&self) -> usize {
        self.data.dim().2
    }

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    pub fn nodata(&self) -> Option<f32> {
        self.nodata
    }

    pub fn crs_equals(&self, other: &Raster) -> bool {
        self.crs == other.crs
    }

    /// Cell size as `(res_x, res_y)`.
    pub fn resolution(&self) -> (f64, f64) {
        (self.transform.res_x, self.transform.res_y)
    }

    pub fn extent(&self) -> Extent {
        self.transform.extent(self.rows(), self.cols())
    }

    /// Copy of this raster with its georeferencing translated by `(dx, dy)`
    /// map units. Pixel values are untouched.
    pub fn shift(&self, dx: f64, dy: f64) -> Raster {
        Raster {
            data: self.data.clone(),
            transform: self.transform.translate(dx, dy),
            crs: self.crs.clone(),
            nodata: self.nodata,
        }
    }

    fn is_missing(&self, value: f32) -> bool {
        value.is_nan() || self.nodata == Some(value)
    }

    /// Value of the cell containing `(x, y)`; `None` outside the raster or on
    /// a missing cell.
    pub fn value_at(&self, band: usize, x: f64, y: f64) -> Option<f32> {
        self.value_at_shifted(band, x, y, 0.0, 0.0)
    }

    /// Equivalent to `self.shift(dx, dy).value_at(band, x, y)` without
    /// copying the pixel data.
    pub fn value_at_shifted(&self, band: usize, x: f64, y: f64, dx: f64, dy: f64) -> Option<f32> {
        let (row, col) = self
            .transform
            .cell_of(x - dx, y - dy, self.rows(), self.cols())?;
        let v = self.data[[band, row, col]];
        if self.is_missing(v) {
            None
        } else {
            Some(v)
        }
    }

    /// Draw up to `count` uniformly distributed locations inside `extent`
    /// where every band holds a valid value.
    ///
    /// Locations on missing cells are rejected and redrawn. Fewer than
    /// `count` points are returned only when the attempt budget runs out.
    pub fn sample_random<R: Rng + ?Sized>(
        &self,
        count: usize,
        extent: &Extent,
        rng: &mut R,
    ) -> Vec<SamplePoint> {
        let mut samples = Vec::with_capacity(count);
        if extent.is_empty() {
            return samples;
        }

        let bands = self.band_count();
        let max_attempts = count.saturating_mul(SAMPLE_ATTEMPT_FACTOR);
        let mut attempts = 0;
        while samples.len() < count && attempts < max_attempts {
            attempts += 1;
            let x = rng.gen_range(extent.xmin..extent.xmax);
            let y = rng.gen_range(extent.ymin..extent.ymax);
            let values: Option<Vec<f32>> = (0..bands).map(|b| self.value_at(b, x, y)).collect();
            if let Some(values) = values {
                samples.push(SamplePoint { x, y, values });
            }
        }
        samples
    }

    /// Per-band `(min, max)` over valid cells; `None` for all-missing bands.
    pub fn band_ranges(&self) -> Vec<Option<(f32, f32)>> {
        self.data
            .axis_iter(Axis(0))
            .map(|band| {
                band.iter()
                    .copied()
                    .filter(|v| !self.is_missing(*v))
                    .fold(None, |acc, v| match acc {
                        None => Some((v, v)),
                        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                    })
            })
            .collect()
    }

    pub fn min_values(&self) -> Vec<Option<f32>> {
        self.band_ranges()
            .into_iter()
            .map(|r| r.map(|(lo, _)| lo))
            .collect()
    }

    pub fn max_values(&self) -> Vec<Option<f32>> {
        self.band_ranges()
            .into_iter()
            .map(|r| r.map(|(_, hi)| hi))
            .collect()
    }

    /// `(min, max)` across all bands; `None` when every cell is missing.
    pub fn value_range(&self) -> Option<(f32, f32)> {
        self.band_ranges()
            .into_iter()
            .flatten()
            .reduce(|(lo_a, hi_a), (lo_b, hi_b)| (lo_a.min(lo_b), hi_a.max(hi_b)))
    }
}
