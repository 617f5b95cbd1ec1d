use std::path::{Path, PathBuf};

use image::{ImageBuffer, Luma};
use ndarray::Array2;
use tracing::warn;

use crate::consts::U16_MAX_VALUE;
use crate::error::{LandregError, Result};
use crate::raster::{Crs, GeoTransform, Raster};

use super::world_file::{read_world_file, world_file_path, write_world_file};

/// Load a grayscale image file as raw digital numbers.
///
/// 8-bit files keep `0..=255`, 16-bit files keep `0..=65535`; nothing is
/// normalised.
pub fn load_band(path: &Path) -> Result<Array2<f32>> {
    let img = image::open(path)?;
    let gray = img.to_luma16();
    let (w, h) = gray.dimensions();
    let scale = if img.color().bytes_per_pixel() / img.color().channel_count() == 1 {
        // to_luma16 expands 8-bit samples by 257
        1.0 / 257.0
    } else {
        1.0
    };

    let mut data = Array2::<f32>::zeros((h as usize, w as usize));
    for row in 0..h as usize {
        for col in 0..w as usize {
            let pixel = gray.get_pixel(col as u32, row as u32);
            data[[row, col]] = (pixel.0[0] as f32 * scale).round();
        }
    }

    Ok(data)
}

/// Load one file per band into a raster.
///
/// The first file's world file georeferences the stack; without one the
/// raster gets a unit-cell transform at the origin.
pub fn load_raster(paths: &[PathBuf], crs: Crs, nodata: Option<f32>) -> Result<Raster> {
    let first = paths
        .first()
        .ok_or_else(|| LandregError::InvalidParameter("no band files given".into()))?;

    let bands: Vec<Array2<f32>> = paths
        .iter()
        .map(|p| load_band(p))
        .collect::<Result<_>>()?;
    let expected = bands[0].dim();
    for (band, path) in bands.iter().zip(paths) {
        if band.dim() != expected {
            return Err(LandregError::DimensionMismatch {
                expected,
                actual: band.dim(),
                path: path.display().to_string(),
            });
        }
    }

    let wf = world_file_path(first);
    let transform = if wf.exists() {
        read_world_file(&wf)?
    } else {
        warn!(
            "No world file next to {}; using a unit grid at the origin",
            first.display()
        );
        GeoTransform::new(0.0, expected.0 as f64, 1.0, 1.0)
    };

    Ok(Raster::from_bands(&bands, transform, crs)?.with_nodata(nodata))
}

/// Save a single band as a 16-bit grayscale image, format chosen by the
/// file extension (TIFF or PNG).
///
/// Values are rounded and clamped to `0..=65535`; missing cells become 0.
pub fn save_band(raster: &Raster, band: usize, path: &Path) -> Result<()> {
    let view = raster.band(band);
    let (h, w) = view.dim();

    let mut pixels: Vec<u16> = Vec::with_capacity(h * w);
    for row in 0..h {
        for col in 0..w {
            let v = view[[row, col]];
            let out = if v.is_nan() || raster.nodata() == Some(v) {
                0
            } else {
                v.round().clamp(0.0, U16_MAX_VALUE) as u16
            };
            pixels.push(out);
        }
    }

    let img = ImageBuffer::<Luma<u16>, Vec<u16>>::from_raw(w as u32, h as u32, pixels)
        .ok_or_else(|| LandregError::InvalidDimensions {
            bands: 1,
            rows: h,
            cols: w,
        })?;
    img.save(path)?;
    Ok(())
}

/// Save every band of a raster as a georeferenced 16-bit image.
///
/// A single-band raster is written to `path`; multi-band rasters become
/// `<stem>_b1.tif`, `<stem>_b2.tif`, ... next to it. Each file gets a world
/// file. Returns the written image paths.
pub fn save_raster(raster: &Raster, path: &Path) -> Result<Vec<PathBuf>> {
    let paths: Vec<PathBuf> = if raster.band_count() == 1 {
        vec![path.to_path_buf()]
    } else {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("raster");
        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        (1..=raster.band_count())
            .map(|b| dir.join(format!("{stem}_b{b}.tif")))
            .collect()
    };

    for (band, out) in paths.iter().enumerate() {
        save_band(raster, band, out)?;
        write_world_file(&world_file_path(out), raster.transform())?;
    }

    Ok(paths)
}
