/// Default number of random sample points for mutual information estimation.
pub const DEFAULT_SAMPLE_COUNT: usize = 500;

/// Default number of histogram bins per axis.
pub const DEFAULT_BIN_COUNT: usize = 100;

/// Default shift search radius, in pixels.
pub const DEFAULT_SHIFT_RADIUS: f64 = 3.0;

/// Default step between shift candidates, in pixels.
pub const DEFAULT_SHIFT_INCREMENT: f64 = 1.0;

/// The sampling region is the overlap of all shifted slave extents with the
/// master extent, scaled about its centre by this factor to stay clear of
/// edge and no-data artifacts.
pub const OVERLAP_SHRINK_FACTOR: f64 = 0.9;

/// Random draws per requested sample before giving up on finding valid
/// (non-missing) master pixels.
pub const SAMPLE_ATTEMPT_FACTOR: usize = 20;

/// Minimum candidate count to evaluate candidates with Rayon parallelism.
pub const PARALLEL_CANDIDATE_THRESHOLD: usize = 4;

/// Tolerance used when generating `seq(-r, r, by = step)` so that `r` itself
/// is included despite floating-point accumulation.
pub const SEQUENCE_TOLERANCE: f64 = 1e-10;

/// Candidate shifts are snapped to multiples of `1 / SHIFT_ROUNDING_SCALE`
/// map units, so `3 * 0.1` becomes `0.3` in reports and histogram keys.
pub const SHIFT_ROUNDING_SCALE: f64 = 1e9;

/// EPSG code base for WGS 84 / UTM northern-hemisphere zones.
pub const EPSG_UTM_NORTH_BASE: u32 = 32600;

/// Largest value representable in a 16-bit output band.
pub const U16_MAX_VALUE: f32 = 65535.0;
