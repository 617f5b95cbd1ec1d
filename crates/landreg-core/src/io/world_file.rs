//! ESRI world files: six lines of affine coefficients next to an image.
//!
//! ```text
//! A   pixel size in x
//! D   rotation (0)
//! B   rotation (0)
//! E   pixel size in y (negative for north-up)
//! C   x of the centre of the upper-left pixel
//! F   y of the centre of the upper-left pixel
//! ```

use std::path::{Path, PathBuf};

use crate::error::{LandregError, Result};
use crate::raster::GeoTransform;

/// Sidecar path for an image: `.tfw` for TIFF, `.pgw` for PNG, `.wld`
/// otherwise.
pub fn world_file_path(image: &Path) -> PathBuf {
    let ext = image
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let wf_ext = match ext.as_deref() {
        Some("tif" | "tiff") => "tfw",
        Some("png") => "pgw",
        _ => "wld",
    };
    image.with_extension(wf_ext)
}

pub fn parse_world_file(text: &str) -> Result<GeoTransform> {
    let coeffs: Vec<f64> = text
        .split_whitespace()
        .map(|t| {
            t.parse::<f64>()
                .map_err(|_| LandregError::WorldFile(format!("invalid number `{t}`")))
        })
        .collect::<Result<_>>()?;
    let &[a, d, b, e, c, f] = coeffs.as_slice() else {
        return Err(LandregError::WorldFile(format!(
            "expected 6 coefficients, found {}",
            coeffs.len()
        )));
    };
    if b != 0.0 || d != 0.0 {
        return Err(LandregError::WorldFile(
            "rotated grids are not supported".into(),
        ));
    }
    if a <= 0.0 || e >= 0.0 {
        return Err(LandregError::WorldFile(format!(
            "expected a north-up grid, got pixel size {a} x {e}"
        )));
    }

    let res_x = a;
    let res_y = -e;
    Ok(GeoTransform::new(
        c - res_x / 2.0,
        f + res_y / 2.0,
        res_x,
        res_y,
    ))
}

pub fn format_world_file(transform: &GeoTransform) -> String {
    let (cx, cy) = transform.cell_center(0, 0);
    format!(
        "{}\n0.0\n0.0\n{}\n{}\n{}\n",
        transform.res_x, -transform.res_y, cx, cy
    )
}

pub fn read_world_file(path: &Path) -> Result<GeoTransform> {
    parse_world_file(&std::fs::read_to_string(path)?)
}

pub fn write_world_file(path: &Path, transform: &GeoTransform) -> Result<()> {
    std::fs::write(path, format_world_file(transform))?;
    Ok(())
}
