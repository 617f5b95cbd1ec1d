pub mod bins;
pub mod candidates;
pub mod config;
pub mod histogram;
mod mutual_information;
pub mod report;

pub use candidates::{enumerate_candidates, ShiftCandidate};
pub use config::{CoregistrationConfig, ShiftSpec};
pub use histogram::JointHistogram;
pub use mutual_information::{coregister, coregister_with_progress};
pub use report::{CandidateScore, Coregistration, CoregistrationReport};
