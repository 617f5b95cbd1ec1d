#[allow(dead_code)]
mod common;

use approx::assert_abs_diff_eq;
use landreg_core::coreg::bins::BinEdges;
use landreg_core::coreg::histogram::shannon_entropy;
use landreg_core::coreg::{coregister, CoregistrationConfig, JointHistogram, ShiftSpec};

use common::{noise_band, unit_raster};

#[test]
fn test_entropy_of_uniform_distribution() {
    assert_abs_diff_eq!(shannon_entropy([0.5f64, 0.5]), 2f64.ln(), epsilon = 1e-12);
    assert_abs_diff_eq!(shannon_entropy([0.25f64; 4]), 4f64.ln(), epsilon = 1e-12);
}

#[test]
fn test_entropy_skips_zero_cells() {
    assert_abs_diff_eq!(shannon_entropy([1.0f64, 0.0, 0.0]), 0.0);
    assert_abs_diff_eq!(
        shannon_entropy([0.5f32, 0.0, 0.5]),
        2f32.ln(),
        epsilon = 1e-6
    );
}

#[test]
fn test_empty_histogram_is_none() {
    assert!(JointHistogram::from_pairs(Vec::new(), 4, 4).is_none());
}

#[test]
fn test_diagonal_histogram_mi_equals_entropy() {
    let pairs: Vec<(usize, usize)> = (0..400).map(|i| (i % 4, i % 4)).collect();
    let hist = JointHistogram::from_pairs(pairs, 4, 4).unwrap();

    assert_eq!(hist.pair_count(), 400);
    assert_abs_diff_eq!(hist.probabilities().sum(), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(hist.joint_entropy(), 4f64.ln(), epsilon = 1e-12);
    assert_abs_diff_eq!(hist.mutual_information(), 4f64.ln(), epsilon = 1e-12);
}

#[test]
fn test_product_histogram_has_zero_mi() {
    // Every (a, b) combination exactly once: p(a, b) = p(a) p(b).
    let pairs: Vec<(usize, usize)> = (0..3)
        .flat_map(|a| (0..5).map(move |b| (a, b)))
        .collect();
    let hist = JointHistogram::from_pairs(pairs, 3, 5).unwrap();

    assert_abs_diff_eq!(hist.mutual_information(), 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(hist.joint_entropy(), 15f64.ln(), epsilon = 1e-12);
}

#[test]
fn test_marginals() {
    let pairs = vec![(0, 0), (0, 1), (1, 1), (1, 1)];
    let hist = JointHistogram::from_pairs(pairs, 2, 3).unwrap();

    let pa = hist.master_marginal();
    let pb = hist.slave_marginal();
    assert_eq!(pa.len(), 2);
    assert_eq!(pb.len(), 3);
    assert_abs_diff_eq!(pa[0], 0.5);
    assert_abs_diff_eq!(pa[1], 0.5);
    assert_abs_diff_eq!(pb[0], 0.25);
    assert_abs_diff_eq!(pb[1], 0.75);
    assert_abs_diff_eq!(pb[2], 0.0);
}

#[test]
fn test_mutual_information_is_symmetric() {
    let pairs = vec![(0, 2), (1, 0), (1, 1), (2, 2), (0, 2), (2, 0)];
    let swapped: Vec<(usize, usize)> = pairs.iter().map(|&(a, b)| (b, a)).collect();
    let h = JointHistogram::from_pairs(pairs, 3, 3).unwrap();
    let hs = JointHistogram::from_pairs(swapped, 3, 3).unwrap();
    assert_abs_diff_eq!(h.mutual_information(), hs.mutual_information(), epsilon = 1e-12);
}

#[test]
fn test_bin_edges_span_range() {
    let bins = BinEdges::equal_width(0.0, 255.0, 20);
    assert_eq!(bins.bin_count(), 20);
    assert_eq!(bins.edges().len(), 21);
    assert_abs_diff_eq!(bins.min(), 0.0);
    assert_abs_diff_eq!(bins.max(), 255.0);
    assert_eq!(bins.bin_of(255.0), Some(19));
    assert_eq!(bins.bin_of(0.0), Some(0));
}

#[test]
fn test_independent_images_have_low_mi() {
    let master = unit_raster(noise_band(100, 100, 256, 1));
    let slave = unit_raster(noise_band(100, 100, 256, 2));
    let config = CoregistrationConfig {
        shifts: ShiftSpec::Explicit(vec![(0.0, 0.0)]),
        sample_count: 5000,
        bin_count: 5,
        report_stats: true,
        seed: Some(3),
        ..Default::default()
    };

    let result = coregister(&slave, &master, &config).unwrap();
    let mi = result.report().unwrap().best_score().mutual_information;

    assert!(mi >= 0.0);
    assert!(mi < 0.02, "MI of independent noise was {mi}");
}
