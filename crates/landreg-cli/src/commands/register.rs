use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use landreg_core::coreg::{
    coregister_with_progress, enumerate_candidates, CandidateScore, Coregistration,
    CoregistrationConfig, ShiftCandidate, ShiftSpec,
};
use landreg_core::io::image_io::{load_raster, save_raster};
use landreg_core::raster::Crs;
use serde::Serialize;
use tracing::debug;

use crate::summary::print_registration_summary;

#[derive(Args)]
pub struct RegisterArgs {
    /// Master (reference) band files, one per band
    #[arg(long, required = true, num_args = 1..)]
    pub master: Vec<PathBuf>,

    /// Slave band files, one per band, in the same order as the master
    #[arg(long, required = true, num_args = 1..)]
    pub slave: Vec<PathBuf>,

    /// EPSG code of both images
    #[arg(long)]
    pub epsg: Option<u32>,

    /// Pixel value marking missing data
    #[arg(long)]
    pub nodata: Option<f32>,

    /// Load settings from a TOML config (flags below override it)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Search radius in pixels
    #[arg(long, conflicts_with = "shift")]
    pub radius: Option<f64>,

    /// Explicit candidate shift in pixels, as DX,DY (repeatable)
    #[arg(long, value_parser = parse_shift, allow_hyphen_values = true)]
    pub shift: Vec<(f64, f64)>,

    /// Step between radius candidates in pixels
    #[arg(long)]
    pub increment: Option<f64>,

    /// Number of random sample points
    #[arg(long)]
    pub samples: Option<usize>,

    /// Histogram bins per axis
    #[arg(long)]
    pub bins: Option<usize>,

    /// Random seed for sample locations
    #[arg(long)]
    pub seed: Option<u64>,

    /// Worker threads for candidate evaluation
    #[arg(long)]
    pub threads: Option<usize>,

    /// Show top N candidates
    #[arg(long, default_value = "10")]
    pub top: usize,

    /// Write the candidate table as TOML
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Output file path for the shifted slave
    #[arg(short, long, default_value = "registered.tif")]
    pub output: PathBuf,
}

fn parse_shift(s: &str) -> std::result::Result<(f64, f64), String> {
    let (dx, dy) = s
        .split_once(',')
        .ok_or_else(|| format!("expected DX,DY, got `{s}`"))?;
    let dx = dx.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let dy = dy.trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok((dx, dy))
}

#[derive(Serialize)]
struct ReportFile<'a> {
    best_mutual_information: f64,
    sample_count: usize,
    best_shift: ShiftCandidate,
    candidates: &'a [CandidateScore],
}

fn build_config(args: &RegisterArgs) -> Result<CoregistrationConfig> {
    let mut config = match args.config {
        Some(ref path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => CoregistrationConfig::default(),
    };

    if let Some(radius) = args.radius {
        config.shifts = ShiftSpec::Radius(radius);
    }
    if !args.shift.is_empty() {
        config.shifts = ShiftSpec::Explicit(args.shift.clone());
    }
    if let Some(increment) = args.increment {
        config.shift_increment = increment;
    }
    if let Some(samples) = args.samples {
        config.sample_count = samples;
    }
    if let Some(bins) = args.bins {
        config.bin_count = bins;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.threads.is_some() {
        config.threads = args.threads;
    }
    // The summary always needs the per-candidate table.
    config.report_stats = true;
    config.validate()?;
    debug!("Co-registration config: {:?}", config);
    Ok(config)
}

pub fn run(args: &RegisterArgs) -> Result<()> {
    if args.master.len() != args.slave.len() {
        bail!(
            "master has {} band files but slave has {}",
            args.master.len(),
            args.slave.len()
        );
    }
    let config = build_config(args)?;
    let crs = args.epsg.map(Crs::Epsg).unwrap_or_default();

    println!("Reading {} band(s) per image...", args.master.len());
    let master = load_raster(&args.master, crs.clone(), args.nodata)
        .context("Failed to load master image")?;
    let slave =
        load_raster(&args.slave, crs, args.nodata).context("Failed to load slave image")?;

    let total =
        enumerate_candidates(&config.shifts, config.shift_increment, master.resolution()).len();
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("Evaluating shifts [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );

    // Parallel candidates finish out of order; count completions instead.
    let result = coregister_with_progress(&slave, &master, &config, |_| pb.inc(1))?;
    pb.finish();

    let Coregistration::Report(report) = result else {
        bail!("co-registration returned no statistics");
    };

    print_registration_summary(&report, args.top);

    let written = save_raster(&report.shifted_image, &args.output)?;
    for path in &written {
        println!("Saved to {}", path.display());
    }

    if let Some(ref path) = args.report {
        let file = ReportFile {
            best_mutual_information: report.best_score().mutual_information,
            sample_count: report.sample_count,
            best_shift: report.best_shift,
            candidates: &report.candidates,
        };
        std::fs::write(path, toml::to_string_pretty(&file)?)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        println!("Report saved to {}", path.display());
    }

    Ok(())
}
