use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use landreg_core::io::image_io::save_raster;
use landreg_core::metadata::{BandCategory, Quantity, SceneMetadata};
use landreg_core::stack::{stack_bands, BandSelection};

#[derive(Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    Image,
    Pan,
    Thermal,
    Qa,
    Aux,
}

impl From<CategoryArg> for BandCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Image => BandCategory::Image,
            CategoryArg::Pan => BandCategory::Pan,
            CategoryArg::Thermal => BandCategory::Thermal,
            CategoryArg::Qa => BandCategory::Qa,
            CategoryArg::Aux => BandCategory::Aux,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum QuantityArg {
    Dn,
    Sre,
    St,
    Qa,
    Other,
}

impl From<QuantityArg> for Quantity {
    fn from(arg: QuantityArg) -> Self {
        match arg {
            QuantityArg::Dn => Quantity::Dn,
            QuantityArg::Sre => Quantity::SurfaceReflectance,
            QuantityArg::St => Quantity::SurfaceTemperature,
            QuantityArg::Qa => Quantity::Qa,
            QuantityArg::Other => Quantity::Other,
        }
    }
}

#[derive(Args)]
pub struct StackArgs {
    /// Landsat MTL metadata file; band files are read from its directory
    pub file: PathBuf,

    /// Band categories to include (default: all)
    #[arg(long, value_enum, num_args = 1..)]
    pub category: Vec<CategoryArg>,

    /// Quantities to include (default: all)
    #[arg(long, value_enum, num_args = 1..)]
    pub quantity: Vec<QuantityArg>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

pub fn run(args: &StackArgs) -> Result<()> {
    let scene = SceneMetadata::from_file(&args.file)
        .with_context(|| format!("Failed to read metadata from {}", args.file.display()))?;
    let dir = args.file.parent().unwrap_or_else(|| Path::new("."));

    let selection = BandSelection {
        categories: args.category.iter().map(|&c| c.into()).collect(),
        quantities: args.quantity.iter().map(|&q| q.into()).collect(),
    };

    let prefix = scene
        .product_id
        .clone()
        .or_else(|| scene.scene_id.clone())
        .unwrap_or_else(|| "stack".to_string());

    let stacks = stack_bands(&scene, dir, &selection)?;
    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;

    for stack in &stacks {
        println!(
            "{} m: {} ({} bands)",
            stack.resolution,
            stack.names.join(", "),
            stack.names.len()
        );
        let out = args
            .output
            .join(format!("{}_{}m.tif", prefix, stack.resolution));
        for path in save_raster(&stack.raster, &out)? {
            println!("  Saved to {}", path.display());
        }
    }

    Ok(())
}
