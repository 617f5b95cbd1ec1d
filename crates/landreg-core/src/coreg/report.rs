use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::raster::Raster;

use super::candidates::ShiftCandidate;
use super::histogram::JointHistogram;

/// Mutual information obtained for one candidate shift.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub dx: f64,
    pub dy: f64,
    pub mutual_information: f64,
}

impl CandidateScore {
    pub fn shift(&self) -> ShiftCandidate {
        ShiftCandidate::new(self.dx, self.dy)
    }
}

/// Full statistics of a co-registration run.
#[derive(Clone, Debug)]
pub struct CoregistrationReport {
    /// One entry per candidate, in enumeration order.
    pub candidates: Vec<CandidateScore>,
    /// Joint histogram per candidate, keyed by [`ShiftCandidate::key`].
    pub joint_histograms: BTreeMap<String, JointHistogram>,
    pub best_shift: ShiftCandidate,
    /// Position of `best_shift` in `candidates`.
    pub best_index: usize,
    /// Number of sample locations actually used.
    pub sample_count: usize,
    /// The slave translated by `best_shift`.
    pub shifted_image: Raster,
}

impl CoregistrationReport {
    pub fn best_score(&self) -> &CandidateScore {
        &self.candidates[self.best_index]
    }

    /// Candidates sorted by mutual information, highest first.
    pub fn ranked(&self) -> Vec<CandidateScore> {
        let mut ranked = self.candidates.clone();
        ranked.sort_by(|a, b| b.mutual_information.total_cmp(&a.mutual_information));
        ranked
    }
}

/// Result of [`coregister`](super::coregister): just the shifted image, or
/// the full report when statistics were requested.
#[derive(Clone, Debug)]
pub enum Coregistration {
    Image(Raster),
    Report(Box<CoregistrationReport>),
}

impl Coregistration {
    pub fn image(&self) -> &Raster {
        match self {
            Self::Image(raster) => raster,
            Self::Report(report) => &report.shifted_image,
        }
    }

    pub fn into_image(self) -> Raster {
        match self {
            Self::Image(raster) => raster,
            Self::Report(report) => report.shifted_image,
        }
    }

    pub fn report(&self) -> Option<&CoregistrationReport> {
        match self {
            Self::Image(_) => None,
            Self::Report(report) => Some(report),
        }
    }
}
