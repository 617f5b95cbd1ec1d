use thiserror::Error;

use crate::raster::Crs;

#[derive(Error, Debug)]
pub enum LandregError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Projection mismatch: master is {master}, slave is {slave}")]
    ProjectionMismatch { master: Crs, slave: Crs },

    #[error("Band count mismatch: master has {master} bands, slave has {slave}")]
    BandCountMismatch { master: usize, slave: usize },

    #[error("Degenerate value range in {image} image (all values equal {value})")]
    DegenerateRange { image: &'static str, value: f32 },

    #[error("Insufficient overlap: {0}")]
    InsufficientOverlap(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid raster dimensions: {bands}x{rows}x{cols}")]
    InvalidDimensions {
        bands: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Dimension mismatch: expected {expected:?}, got {actual:?} in {path}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
        path: String,
    },

    #[error("Metadata parse error at line {line}: {message}")]
    Metadata { line: usize, message: String },

    #[error("Missing metadata field: {0}")]
    MissingField(String),

    #[error("No bands match the requested selection")]
    EmptySelection,

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("World file error: {0}")]
    WorldFile(String),
}

pub type Result<T> = std::result::Result<T, LandregError>;
