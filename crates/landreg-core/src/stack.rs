//! Assemble band files listed in scene metadata into multi-band rasters.

use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{LandregError, Result};
use crate::io::image_io::load_band;
use crate::io::world_file::{read_world_file, world_file_path};
use crate::metadata::{BandCategory, BandInfo, Quantity, SceneMetadata};
use crate::raster::{GeoTransform, Raster};

/// Which bands to stack. Empty lists accept everything.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BandSelection {
    #[serde(default)]
    pub categories: Vec<BandCategory>,
    #[serde(default)]
    pub quantities: Vec<Quantity>,
}

impl BandSelection {
    pub fn accepts(&self, band: &BandInfo) -> bool {
        (self.categories.is_empty() || self.categories.contains(&band.category))
            && (self.quantities.is_empty() || self.quantities.contains(&band.quantity))
    }
}

/// A raster of equally sized bands with their unified names.
#[derive(Clone, Debug)]
pub struct BandStack {
    pub names: Vec<String>,
    pub resolution: f64,
    pub raster: Raster,
}

pub fn select_bands<'a>(scene: &'a SceneMetadata, selection: &BandSelection) -> Vec<&'a BandInfo> {
    scene.bands.iter().filter(|b| selection.accepts(b)).collect()
}

/// Group the selected bands by resolution, ascending.
pub fn group_by_resolution<'a>(bands: &[&'a BandInfo]) -> Vec<(f64, Vec<&'a BandInfo>)> {
    let mut groups: Vec<(f64, Vec<&'a BandInfo>)> = Vec::new();
    for &band in bands {
        match groups.iter_mut().find(|(res, _)| *res == band.resolution) {
            Some((_, members)) => members.push(band),
            None => groups.push((band.resolution, vec![band])),
        }
    }
    groups.sort_by(|a, b| a.0.total_cmp(&b.0));
    groups
}

/// Grid of a band group. MTL corner coordinates refer to the centre of the
/// upper-left pixel, so the origin sits half a cell further out.
fn group_transform(
    scene: &SceneMetadata,
    resolution: f64,
    first_file: &Path,
) -> Result<GeoTransform> {
    if let Some(ul) = scene.corner_ul {
        return Ok(GeoTransform::new(
            ul.x - resolution / 2.0,
            ul.y + resolution / 2.0,
            resolution,
            resolution,
        ));
    }
    let wf = world_file_path(first_file);
    if wf.exists() {
        return read_world_file(&wf);
    }
    Err(LandregError::MissingField(
        "CORNER_UL_PROJECTION_X_PRODUCT".into(),
    ))
}

/// Load the selected bands from `dir` into one raster per resolution.
pub fn stack_bands(
    scene: &SceneMetadata,
    dir: &Path,
    selection: &BandSelection,
) -> Result<Vec<BandStack>> {
    let selected = select_bands(scene, selection);
    if selected.is_empty() {
        return Err(LandregError::EmptySelection);
    }

    let crs = scene.crs();
    let mut stacks = Vec::new();
    for (resolution, members) in group_by_resolution(&selected) {
        info!(
            "Stacking {} bands at {} m: {}",
            members.len(),
            resolution,
            members
                .iter()
                .map(|b| b.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let mut bands: Vec<Array2<f32>> = Vec::with_capacity(members.len());
        for band in &members {
            let path = dir.join(&band.file);
            let data = load_band(&path)?;
            if let Some(first) = bands.first() {
                if data.dim() != first.dim() {
                    return Err(LandregError::DimensionMismatch {
                        expected: first.dim(),
                        actual: data.dim(),
                        path: path.display().to_string(),
                    });
                }
            }
            bands.push(data);
        }

        let transform = group_transform(scene, resolution, &dir.join(&members[0].file))?;
        let raster = Raster::from_bands(&bands, transform, crs.clone())?;
        stacks.push(BandStack {
            names: members.iter().map(|b| b.name.clone()).collect(),
            resolution,
            raster,
        });
    }

    Ok(stacks)
}
