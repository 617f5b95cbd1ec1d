//! Shift search by mutual information maximisation.
//!
//! Random sample locations are drawn once inside the area shared by the
//! master and every shifted slave. For each candidate the slave is looked up
//! at those locations under the shift, both sides are binned, and the joint
//! histogram yields the mutual information. The candidate with the highest
//! MI wins; ties go to the earliest candidate.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::consts::{OVERLAP_SHRINK_FACTOR, PARALLEL_CANDIDATE_THRESHOLD};
use crate::error::{LandregError, Result};
use crate::raster::{Raster, SamplePoint};

use super::bins::BinEdges;
use super::candidates::{common_overlap, enumerate_candidates, ShiftCandidate};
use super::config::CoregistrationConfig;
use super::histogram::JointHistogram;
use super::report::{CandidateScore, Coregistration, CoregistrationReport};

/// Sample locations with the master's bin index for every band.
struct SampleSet {
    points: Vec<SamplePoint>,
    master_bins: Vec<Vec<usize>>,
}

/// Register `slave` onto `master` by searching the configured shifts.
pub fn coregister(
    slave: &Raster,
    master: &Raster,
    config: &CoregistrationConfig,
) -> Result<Coregistration> {
    coregister_with_progress(slave, master, config, |_| {})
}

/// Like [`coregister`], calling `on_candidate_done(done)` as each candidate
/// finishes evaluation.
pub fn coregister_with_progress<F>(
    slave: &Raster,
    master: &Raster,
    config: &CoregistrationConfig,
    on_candidate_done: F,
) -> Result<Coregistration>
where
    F: Fn(usize) + Send + Sync,
{
    if !master.crs_equals(slave) {
        return Err(LandregError::ProjectionMismatch {
            master: master.crs().clone(),
            slave: slave.crs().clone(),
        });
    }
    if master.band_count() != slave.band_count() {
        return Err(LandregError::BandCountMismatch {
            master: master.band_count(),
            slave: slave.band_count(),
        });
    }
    config.validate()?;

    let candidates =
        enumerate_candidates(&config.shifts, config.shift_increment, master.resolution());
    info!(
        "Evaluating {} shift candidates ({}, {} samples, {} bins)",
        candidates.len(),
        config.shifts,
        config.sample_count,
        config.bin_count
    );

    let master_edges = value_bins(master, "master", config.bin_count)?;
    let slave_edges = value_bins(slave, "slave", config.bin_count)?;

    let samples = draw_samples(slave, master, &candidates, &master_edges, config)?;
    debug!("Drew {} sample locations", samples.points.len());

    let histograms = evaluate_candidates(
        slave,
        &samples,
        &slave_edges,
        &candidates,
        config,
        on_candidate_done,
    )?;

    let scores: Vec<CandidateScore> = candidates
        .iter()
        .zip(&histograms)
        .map(|(c, h)| CandidateScore {
            dx: c.dx,
            dy: c.dy,
            mutual_information: h.mutual_information(),
        })
        .collect();

    let best_index = argmax_first(&scores);
    let best_shift = candidates[best_index];
    info!(
        "Best shift {} with MI {:.6}",
        best_shift, scores[best_index].mutual_information
    );

    let shifted_image = slave.shift(best_shift.dx, best_shift.dy);

    if !config.report_stats {
        return Ok(Coregistration::Image(shifted_image));
    }

    let joint_histograms: BTreeMap<String, JointHistogram> = candidates
        .iter()
        .zip(histograms)
        .map(|(c, h)| (c.key(), h))
        .collect();

    Ok(Coregistration::Report(Box::new(CoregistrationReport {
        candidates: scores,
        joint_histograms,
        best_shift,
        best_index,
        sample_count: samples.points.len(),
        shifted_image,
    })))
}

/// Equal-width bins over the global value range of all bands.
fn value_bins(raster: &Raster, image: &'static str, bin_count: usize) -> Result<BinEdges> {
    let (lo, hi) = raster.value_range().ok_or_else(|| {
        LandregError::InsufficientOverlap(format!("{image} image has no valid cells"))
    })?;
    if hi <= lo {
        return Err(LandregError::DegenerateRange { image, value: lo });
    }
    Ok(BinEdges::equal_width(lo as f64, hi as f64, bin_count))
}

fn draw_samples(
    slave: &Raster,
    master: &Raster,
    candidates: &[ShiftCandidate],
    master_edges: &BinEdges,
    config: &CoregistrationConfig,
) -> Result<SampleSet> {
    let overlap = common_overlap(&master.extent(), &slave.extent(), candidates)
        .ok_or_else(|| {
            LandregError::InsufficientOverlap(
                "master and shifted slave extents do not intersect".into(),
            )
        })?
        .scale(OVERLAP_SHRINK_FACTOR);
    debug!(
        "Sampling region x=[{:.3}, {:.3}] y=[{:.3}, {:.3}]",
        overlap.xmin, overlap.xmax, overlap.ymin, overlap.ymax
    );

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let points = master.sample_random(config.sample_count, &overlap, &mut rng);
    if points.is_empty() {
        return Err(LandregError::InsufficientOverlap(
            "no valid master cells inside the sampling region".into(),
        ));
    }

    // Sampled values lie within the master's global range, so every value
    // has a bin.
    let master_bins: Vec<Vec<usize>> = points
        .iter()
        .map(|p| {
            p.values
                .iter()
                .map(|&v| master_edges.bin_of(v as f64).unwrap_or(0))
                .collect()
        })
        .collect();

    Ok(SampleSet {
        points,
        master_bins,
    })
}

/// Joint histogram of master and slave bins for one candidate.
///
/// Band `k` of the master is paired with band `k` of the slave and all
/// bands share one table. Pairs whose slave value is missing under the
/// shift are left out.
fn joint_histogram(
    slave: &Raster,
    samples: &SampleSet,
    slave_edges: &BinEdges,
    master_bin_count: usize,
    candidate: &ShiftCandidate,
) -> Option<JointHistogram> {
    let pairs = samples
        .points
        .iter()
        .zip(&samples.master_bins)
        .flat_map(|(point, bins)| {
            bins.iter().enumerate().filter_map(move |(band, &a)| {
                let v = slave.value_at_shifted(band, point.x, point.y, candidate.dx, candidate.dy)?;
                slave_edges.bin_of(v as f64).map(|b| (a, b))
            })
        });
    JointHistogram::from_pairs(pairs, master_bin_count, slave_edges.bin_count())
}

fn evaluate_candidates<F>(
    slave: &Raster,
    samples: &SampleSet,
    slave_edges: &BinEdges,
    candidates: &[ShiftCandidate],
    config: &CoregistrationConfig,
    on_candidate_done: F,
) -> Result<Vec<JointHistogram>>
where
    F: Fn(usize) + Send + Sync,
{
    let counter = AtomicUsize::new(0);
    let master_bin_count = config.bin_count;

    let evaluate_one = |candidate: &ShiftCandidate| -> Result<JointHistogram> {
        let histogram =
            joint_histogram(slave, samples, slave_edges, master_bin_count, candidate)
                .ok_or_else(|| {
                    LandregError::InsufficientOverlap(format!(
                        "no valid sample pairs for shift {candidate}"
                    ))
                });
        let done = counter.fetch_add(1, Ordering::Relaxed) + 1;
        on_candidate_done(done);
        histogram
    };

    // Indexed collect keeps enumeration order regardless of completion order.
    let evaluate_all = || -> Vec<Result<JointHistogram>> {
        if candidates.len() >= PARALLEL_CANDIDATE_THRESHOLD {
            candidates.par_iter().map(&evaluate_one).collect()
        } else {
            candidates.iter().map(&evaluate_one).collect()
        }
    };

    let results = match config.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?;
            pool.install(evaluate_all)
        }
        None => evaluate_all(),
    };

    results.into_iter().collect()
}

/// Index of the largest MI; the first one wins on ties.
fn argmax_first(scores: &[CandidateScore]) -> usize {
    let mut best = 0;
    for (i, s) in scores.iter().enumerate().skip(1) {
        if s.mutual_information > scores[best].mutual_information {
            best = i;
        }
    }
    best
}
