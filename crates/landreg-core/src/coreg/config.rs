use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BIN_COUNT, DEFAULT_SAMPLE_COUNT, DEFAULT_SHIFT_INCREMENT, DEFAULT_SHIFT_RADIUS,
};
use crate::error::{LandregError, Result};

/// How the candidate shifts are specified, in pixels of the master image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftSpec {
    /// Every combination of `-r..=r` (stepped by the increment) in x and y.
    Radius(f64),
    /// Explicit `(dx, dy)` pixel offsets, evaluated in the given order.
    Explicit(Vec<(f64, f64)>),
}

impl Default for ShiftSpec {
    fn default() -> Self {
        ShiftSpec::Radius(DEFAULT_SHIFT_RADIUS)
    }
}

impl fmt::Display for ShiftSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftSpec::Radius(r) => write!(f, "Radius ±{r} px"),
            ShiftSpec::Explicit(pairs) => write!(f, "Explicit ({} shifts)", pairs.len()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoregistrationConfig {
    /// Step between radius candidates, in pixels. Ignored for explicit shifts.
    #[serde(default = "default_shift_increment")]
    pub shift_increment: f64,
    /// Number of random sample locations.
    #[serde(default = "default_sample_count")]
    pub sample_count: usize,
    /// Histogram bins per axis.
    #[serde(default = "default_bin_count")]
    pub bin_count: usize,
    /// Return the full per-candidate report instead of only the shifted image.
    #[serde(default)]
    pub report_stats: bool,
    /// Seed for the sample locations. `None` draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Worker threads for candidate evaluation. `None` uses the global pool.
    #[serde(default)]
    pub threads: Option<usize>,
    /// Candidate shifts, in master pixels.
    #[serde(default)]
    pub shifts: ShiftSpec,
}

fn default_shift_increment() -> f64 {
    DEFAULT_SHIFT_INCREMENT
}

fn default_sample_count() -> usize {
    DEFAULT_SAMPLE_COUNT
}

fn default_bin_count() -> usize {
    DEFAULT_BIN_COUNT
}

impl Default for CoregistrationConfig {
    fn default() -> Self {
        Self {
            shift_increment: DEFAULT_SHIFT_INCREMENT,
            sample_count: DEFAULT_SAMPLE_COUNT,
            bin_count: DEFAULT_BIN_COUNT,
            report_stats: false,
            seed: None,
            threads: None,
            shifts: ShiftSpec::default(),
        }
    }
}

impl CoregistrationConfig {
    /// Reject parameter combinations that cannot produce a result.
    pub fn validate(&self) -> Result<()> {
        match &self.shifts {
            ShiftSpec::Radius(r) => {
                if !r.is_finite() || *r < 0.0 {
                    return Err(LandregError::InvalidParameter(format!(
                        "shift radius must be a non-negative number, got {r}"
                    )));
                }
                if !(self.shift_increment.is_finite() && self.shift_increment > 0.0) {
                    return Err(LandregError::InvalidParameter(format!(
                        "shift increment must be positive, got {}",
                        self.shift_increment
                    )));
                }
            }
            ShiftSpec::Explicit(pairs) => {
                if pairs.is_empty() {
                    return Err(LandregError::InvalidParameter(
                        "explicit shift list is empty".into(),
                    ));
                }
                if pairs.iter().any(|(dx, dy)| !dx.is_finite() || !dy.is_finite()) {
                    return Err(LandregError::InvalidParameter(
                        "explicit shifts must be finite".into(),
                    ));
                }
            }
        }
        if self.sample_count == 0 {
            return Err(LandregError::InvalidParameter(
                "sample count must be at least 1".into(),
            ));
        }
        if self.bin_count == 0 {
            return Err(LandregError::InvalidParameter(
                "bin count must be at least 1".into(),
            ));
        }
        if self.threads == Some(0) {
            return Err(LandregError::InvalidParameter(
                "thread count must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
