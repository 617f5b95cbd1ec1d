use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use landreg_core::metadata::SceneMetadata;

#[derive(Args)]
pub struct InfoArgs {
    /// Landsat MTL metadata file
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let scene = SceneMetadata::from_file(&args.file)
        .with_context(|| format!("Failed to read metadata from {}", args.file.display()))?;

    println!("File:        {}", args.file.display());
    if let Some(id) = scene.product_id.as_ref().or(scene.scene_id.as_ref()) {
        println!("Scene:       {}", id);
    }
    println!("Spacecraft:  {}", scene.spacecraft);
    println!("Sensor:      {}", scene.sensor);
    if let Some(ref level) = scene.processing_level {
        println!("Level:       {}", level);
    }
    if let Some(ref date) = scene.date_acquired {
        match scene.scene_center_time {
            Some(ref time) => println!("Acquired:    {} {}", date, time),
            None => println!("Acquired:    {}", date),
        }
    }
    if let (Some(path), Some(row)) = (scene.wrs_path, scene.wrs_row) {
        println!("WRS:         {:03}/{:03}", path, row);
    }
    println!("CRS:         {}", scene.crs());
    if let Some(cc) = scene.cloud_cover {
        println!("Cloud cover: {:.2}%", cc);
    }
    if let (Some(az), Some(el)) = (scene.sun_azimuth, scene.sun_elevation) {
        println!("Sun:         azimuth {:.3}, elevation {:.3}", az, el);
    }

    println!();
    println!(
        "{:<16}  {:<8}  {:<20}  {:>6}  File",
        "Band", "Category", "Quantity", "Res"
    );
    println!("{}", "-".repeat(72));
    for band in &scene.bands {
        println!(
            "{:<16}  {:<8}  {:<20}  {:>6}  {}",
            band.name,
            band.category.to_string(),
            band.quantity.to_string(),
            band.resolution,
            band.file
        );
    }

    Ok(())
}
