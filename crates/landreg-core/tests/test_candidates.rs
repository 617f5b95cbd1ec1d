use approx::assert_abs_diff_eq;
use landreg_core::coreg::candidates::{common_overlap, shift_bounds};
use landreg_core::coreg::{enumerate_candidates, ShiftCandidate, ShiftSpec};
use landreg_core::raster::Extent;

#[test]
fn test_radius_one_grid_order() {
    let c = enumerate_candidates(&ShiftSpec::Radius(1.0), 1.0, (1.0, 1.0));
    let expected = [
        (-1.0, -1.0),
        (0.0, -1.0),
        (1.0, -1.0),
        (-1.0, 0.0),
        (0.0, 0.0),
        (1.0, 0.0),
        (-1.0, 1.0),
        (0.0, 1.0),
        (1.0, 1.0),
    ];
    assert_eq!(c.len(), expected.len());
    for (got, &(dx, dy)) in c.iter().zip(&expected) {
        assert_eq!(*got, ShiftCandidate::new(dx, dy));
    }
}

#[test]
fn test_zero_radius_is_identity_only() {
    let c = enumerate_candidates(&ShiftSpec::Radius(0.0), 1.0, (30.0, 30.0));
    assert_eq!(c, vec![ShiftCandidate::new(0.0, 0.0)]);
}

#[test]
fn test_fractional_increment_includes_radius() {
    let c = enumerate_candidates(&ShiftSpec::Radius(1.0), 0.1, (1.0, 1.0));
    assert_eq!(c.len(), 21 * 21);
    let last = c.last().unwrap();
    assert_abs_diff_eq!(last.dx, 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(last.dy, 1.0, epsilon = 1e-9);
}

#[test]
fn test_increment_not_dividing_radius() {
    // -1, -0.25, 0.5: the radius itself is not reached.
    let c = enumerate_candidates(&ShiftSpec::Radius(1.0), 0.75, (1.0, 1.0));
    assert_eq!(c.len(), 9);
    assert_abs_diff_eq!(c[2].dx, 0.5);
}

#[test]
fn test_pixel_offsets_scaled_per_axis() {
    let c = enumerate_candidates(&ShiftSpec::Radius(1.0), 1.0, (30.0, 15.0));
    assert_eq!(c[0], ShiftCandidate::new(-30.0, -15.0));
    assert_eq!(c[8], ShiftCandidate::new(30.0, 15.0));
}

#[test]
fn test_fractional_resolution_gives_clean_keys() {
    let c = enumerate_candidates(&ShiftSpec::Radius(3.0), 1.0, (0.1, 0.1));
    assert_eq!(c.len(), 49);
    assert_eq!(c[0], ShiftCandidate::new(-0.3, -0.3));
    assert_eq!(c[0].key(), "-0.3/-0.3");
    assert_eq!(c[1].key(), "-0.2/-0.3");
    assert_eq!(c[24].key(), "0/0");
    assert_eq!(c[48].key(), "0.3/0.3");

    let explicit = ShiftSpec::Explicit(vec![(3.0, -7.0)]);
    let c = enumerate_candidates(&explicit, 1.0, (0.1, 0.1));
    assert_eq!(c[0].key(), "0.3/-0.7");
}

#[test]
fn test_fractional_increment_gives_clean_keys() {
    let c = enumerate_candidates(&ShiftSpec::Radius(1.0), 0.1, (1.0, 1.0));
    assert_eq!(c[3].key(), "-0.7/-1");
    assert_eq!(c[10].key(), "0/-1");
    assert_eq!(c[21 * 10 + 10].key(), "0/0");
    assert_eq!(c[21 * 13 + 17].key(), "0.7/0.3");
}

#[test]
fn test_explicit_list_keeps_order() {
    let spec = ShiftSpec::Explicit(vec![(2.0, 0.0), (-1.0, 0.5), (0.0, 0.0)]);
    let c = enumerate_candidates(&spec, 99.0, (10.0, 10.0));
    assert_eq!(
        c,
        vec![
            ShiftCandidate::new(20.0, 0.0),
            ShiftCandidate::new(-10.0, 5.0),
            ShiftCandidate::new(0.0, 0.0),
        ]
    );
}

#[test]
fn test_candidate_key_and_display() {
    assert_eq!(ShiftCandidate::new(2.0, -3.0).key(), "2/-3");
    assert_eq!(ShiftCandidate::new(0.5, 15.0).key(), "0.5/15");
    assert_eq!(format!("{}", ShiftCandidate::new(-1.5, 2.0)), "(-1.5, 2)");
}

#[test]
fn test_shift_bounds_are_componentwise() {
    let c = [
        ShiftCandidate::new(3.0, -1.0),
        ShiftCandidate::new(-2.0, 4.0),
        ShiftCandidate::new(0.0, 0.0),
    ];
    let (lo, hi) = shift_bounds(&c);
    assert_eq!(lo, ShiftCandidate::new(-2.0, -1.0));
    assert_eq!(hi, ShiftCandidate::new(3.0, 4.0));
}

#[test]
fn test_common_overlap() {
    let master = Extent::new(0.0, 100.0, 0.0, 100.0);
    let slave = Extent::new(10.0, 90.0, 10.0, 90.0);
    let c = enumerate_candidates(&ShiftSpec::Radius(2.0), 1.0, (5.0, 5.0));

    let overlap = common_overlap(&master, &slave, &c).unwrap();

    assert_eq!(overlap, Extent::new(20.0, 80.0, 20.0, 80.0));
}

#[test]
fn test_common_overlap_clipped_by_master() {
    let master = Extent::new(0.0, 50.0, 0.0, 50.0);
    let slave = Extent::new(30.0, 80.0, 0.0, 50.0);
    let c = [ShiftCandidate::new(-5.0, 0.0), ShiftCandidate::new(5.0, 0.0)];

    let overlap = common_overlap(&master, &slave, &c).unwrap();

    assert_eq!(overlap, Extent::new(35.0, 50.0, 0.0, 50.0));
}

#[test]
fn test_common_overlap_none_when_shifts_exceed_extent() {
    let e = Extent::new(0.0, 10.0, 0.0, 10.0);
    let c = [ShiftCandidate::new(-6.0, 0.0), ShiftCandidate::new(6.0, 0.0)];
    assert!(common_overlap(&e, &e, &c).is_none());
}
