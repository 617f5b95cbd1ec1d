use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{SEQUENCE_TOLERANCE, SHIFT_ROUNDING_SCALE};
use crate::raster::Extent;

use super::config::ShiftSpec;

/// A trial translation of the slave image, in map units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShiftCandidate {
    pub dx: f64,
    pub dy: f64,
}

impl ShiftCandidate {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Stable `"dx/dy"` key used to index joint histograms.
    pub fn key(&self) -> String {
        format!("{}/{}", self.dx, self.dy)
    }
}

impl fmt::Display for ShiftCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.dx, self.dy)
    }
}

/// Drop floating-point noise below the rounding scale. Also turns `-0.0`
/// into `0.0`.
fn snap(value: f64) -> f64 {
    (value * SHIFT_ROUNDING_SCALE).round() / SHIFT_ROUNDING_SCALE + 0.0
}

/// `-radius, -radius + step, ..., radius`.
fn symmetric_sequence(radius: f64, step: f64) -> Vec<f64> {
    let n = ((2.0 * radius) / step + SEQUENCE_TOLERANCE).floor() as usize + 1;
    (0..n).map(|i| snap(-radius + i as f64 * step)).collect()
}

fn scaled(px: f64, py: f64, res_x: f64, res_y: f64) -> ShiftCandidate {
    ShiftCandidate::new(snap(px * res_x), snap(py * res_y))
}

/// Enumerate candidate shifts in map units.
///
/// Radius specs produce the full x-by-y grid with x varying fastest. Pixel
/// offsets are scaled by the per-axis master resolution `(res_x, res_y)` and
/// snapped to the shift rounding scale.
pub fn enumerate_candidates(
    spec: &ShiftSpec,
    increment: f64,
    resolution: (f64, f64),
) -> Vec<ShiftCandidate> {
    let (res_x, res_y) = resolution;
    match spec {
        ShiftSpec::Radius(radius) => {
            let steps = symmetric_sequence(*radius, increment);
            steps
                .iter()
                .flat_map(|&py| {
                    steps
                        .iter()
                        .map(move |&px| scaled(px, py, res_x, res_y))
                })
                .collect()
        }
        ShiftSpec::Explicit(pairs) => pairs
            .iter()
            .map(|&(px, py)| scaled(px, py, res_x, res_y))
            .collect(),
    }
}

/// Component-wise minimum and maximum over a non-empty candidate set.
pub fn shift_bounds(candidates: &[ShiftCandidate]) -> (ShiftCandidate, ShiftCandidate) {
    candidates.iter().fold(
        (
            ShiftCandidate::new(f64::INFINITY, f64::INFINITY),
            ShiftCandidate::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        ),
        |(lo, hi), c| {
            (
                ShiftCandidate::new(lo.dx.min(c.dx), lo.dy.min(c.dy)),
                ShiftCandidate::new(hi.dx.max(c.dx), hi.dy.max(c.dy)),
            )
        },
    )
}

/// Region covered by the master and by the slave under both extreme shifts.
///
/// The slave extent is translated by the component-wise minimum and maximum
/// shift; their intersection with the master extent is the area where every
/// candidate can be evaluated.
pub fn common_overlap(
    master: &Extent,
    slave: &Extent,
    candidates: &[ShiftCandidate],
) -> Option<Extent> {
    let (lo, hi) = shift_bounds(candidates);
    slave
        .translate(lo.dx, lo.dy)
        .intersect(&slave.translate(hi.dx, hi.dy))?
        .intersect(master)
}
