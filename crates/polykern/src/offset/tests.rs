use super::*;
use crate::geom2::rand::{draw_polygon_radial, RadialCfg, ReplayToken, VertexCount};
use crate::geom2::{approx_eq, area, convex_hull, is_self_intersecting, perimeter};
use proptest::prelude::*;

fn square(s: f64) -> Vec<Point> {
    vec![
        Point::new(0.0, 0.0),
        Point::new(s, 0.0),
        Point::new(s, s),
        Point::new(0.0, s),
    ]
}

/// Same ring up to the starting vertex.
fn same_ring(a: &[Point], b: &[Point], tol: f64) -> bool {
    if a.len() != b.len() {
        return false;
    }
    (0..b.len()).any(|shift| (0..a.len()).all(|k| approx_eq(a[k], b[(k + shift) % b.len()], tol)))
}

#[test]
fn square_inset_and_outset() {
    let inset = offset_polygon(&square(4.0), 1.0, OffsetCfg::default()).unwrap();
    assert_eq!(inset.status, OffsetStatus::Complete);
    assert_eq!(inset.rings.len(), 1);
    assert!(same_ring(
        &inset.rings[0],
        &[Point::new(1.0, 1.0), Point::new(3.0, 1.0), Point::new(3.0, 3.0), Point::new(1.0, 3.0)],
        1e-12
    ));
    let outset = offset_polygon(&square(4.0), -1.0, OffsetCfg::default()).unwrap();
    assert!((outset.total_area() - 36.0).abs() < 1e-9);
}

#[test]
fn clockwise_input_is_inset_by_positive_distance() {
    let mut ring = square(4.0);
    ring.reverse();
    let r = offset_polygon(&ring, 1.0, OffsetCfg::default()).unwrap();
    assert!((r.total_area() - 4.0).abs() < 1e-9);
    assert!(r.rings.iter().all(|ring| signed_area(ring) > 0.0));
}

#[test]
fn reference_winding_flips_the_sign() {
    let cfg = OffsetCfg {
        reference: Winding::Clockwise,
        ..OffsetCfg::default()
    };
    let r = offset_polygon(&square(4.0), 1.0, cfg).unwrap();
    assert!((r.total_area() - 36.0).abs() < 1e-9);
}

#[test]
fn deep_inset_collapses() {
    let r = offset_polygon(&square(4.0), 3.0, OffsetCfg::default()).unwrap();
    assert!(r.rings.is_empty());
    assert_eq!(r.status, OffsetStatus::Collapsed);
    let r = offset_polygon(&square(4.0), 2.0, OffsetCfg::default()).unwrap();
    assert_eq!(r.status, OffsetStatus::Collapsed);
}

#[test]
fn inset_past_inradius_collapses() {
    // Miter insets past the inradius come back point-reflected with the
    // input winding intact.
    let triangle = vec![Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(0.0, 3.0)];
    let ell = vec![
        Point::new(0.0, 0.0),
        Point::new(2.0, 0.0),
        Point::new(2.0, 1.0),
        Point::new(1.0, 1.0),
        Point::new(1.0, 2.0),
        Point::new(0.0, 2.0),
    ];
    let cases = [(square(4.0), 3.0), (square(4.0), 10.0), (triangle.clone(), 2.0), (ell, 1.5)];
    for (poly, d) in &cases {
        let r = offset_polygon(poly, *d, OffsetCfg::default()).unwrap();
        assert_eq!(r.status, OffsetStatus::Collapsed, "d = {d}");
        assert!(r.rings.is_empty(), "d = {d}");
    }

    // Inradius is 1; a shallower inset survives as a smaller triangle.
    let r = offset_polygon(&triangle, 0.5, OffsetCfg::default()).unwrap();
    assert_eq!(r.status, OffsetStatus::Complete);
    assert_eq!(r.rings.len(), 1);
    assert!(r.total_area() > 0.0 && r.total_area() < area(&triangle));
}

/// Two 4x4 rooms joined by a corridor 1 unit tall with slanted mouths.
fn dumbbell() -> Vec<Point> {
    vec![
        Point::new(0.0, 0.0),
        Point::new(4.0, 0.0),
        Point::new(5.0, 1.5),
        Point::new(7.0, 1.5),
        Point::new(8.0, 0.0),
        Point::new(12.0, 0.0),
        Point::new(12.0, 4.0),
        Point::new(8.0, 4.0),
        Point::new(7.0, 2.5),
        Point::new(5.0, 2.5),
        Point::new(4.0, 4.0),
        Point::new(0.0, 4.0),
    ]
}

#[test]
fn dumbbell_inset_splits_in_two() {
    let r = offset_polygon(&dumbbell(), 1.0, OffsetCfg::default()).unwrap();
    assert_eq!(r.status, OffsetStatus::Complete);
    assert_eq!(r.splits, 2);
    assert_eq!(r.rings.len(), 2);
    for ring in &r.rings {
        assert_eq!(ring.len(), 5);
        assert!(!is_self_intersecting(ring, 1e-12));
        assert!(signed_area(ring) > 5.0);
    }
    assert!((area(&r.rings[0]) - area(&r.rings[1])).abs() < 1e-9);
}

#[test]
fn zero_budget_is_observable() {
    let cfg = OffsetCfg {
        max_splits: Some(0),
        ..OffsetCfg::default()
    };
    let r = offset_polygon(&dumbbell(), 1.0, cfg).unwrap();
    assert!(r.truncated());
    assert_eq!(r.budget, 0);
    assert_eq!(r.splits, 0);
    assert_eq!(r.rings.len(), 1);
}

#[test]
fn self_intersecting_input_is_rejected() {
    let bowtie = vec![
        Point::new(0.0, 0.0),
        Point::new(1.0, 1.0),
        Point::new(1.0, 0.0),
        Point::new(0.0, 1.0),
    ];
    let r = offset_polygon(&bowtie, 0.1, OffsetCfg::default()).unwrap();
    assert_eq!(r.status, OffsetStatus::Rejected);
    assert_eq!(r.diagnostic, Some(Diagnostic::SelfIntersecting { first: 0, second: 2 }));
    assert!(r.rings.is_empty());
}

#[test]
fn invalid_arguments() {
    assert!(matches!(
        offset_polygon(&square(1.0)[..2], 0.1, OffsetCfg::default()),
        Err(KernelError::TooFewPoints { .. })
    ));
    assert!(matches!(
        offset_polygon(&square(1.0), f64::NAN, OffsetCfg::default()),
        Err(KernelError::InvalidParam(_))
    ));
}

#[test]
fn square_outset_keeps_mitred_corners() {
    // Miter joins on a square keep the square shape: perimeter grows by 8d.
    let r = offset_polygon(&square(2.0), -0.5, OffsetCfg::default()).unwrap();
    assert!((perimeter(&r.rings[0]) - 12.0).abs() < 1e-9);
}

proptest! {
    #[test]
    fn convex_round_trip(seed in 0u64..300, n in 3usize..16) {
        let raw = draw_polygon_radial(
            RadialCfg {
                vertex_count: VertexCount::Fixed(n),
                base_radius: 10.0,
                ..RadialCfg::default()
            },
            ReplayToken { seed, index: 3 },
        );
        let hull = convex_hull(&raw).unwrap();
        let d = 0.05;
        let inset = offset_polygon(&hull, d, OffsetCfg::default()).unwrap();
        prop_assume!(inset.rings.len() == 1 && inset.rings[0].len() == hull.len());
        let back = offset_polygon(&inset.rings[0], -d, OffsetCfg::default()).unwrap();
        prop_assert_eq!(back.rings.len(), 1);
        prop_assert!(same_ring(&back.rings[0], &hull, 1e-7));
    }
}
