use super::*;
use crate::geom2::rand::{draw_polygon_radial, RadialCfg, ReplayToken, VertexCount};
use crate::geom2::{area, signed_area};
use proptest::prelude::*;

fn square(x0: f64, y0: f64, s: f64) -> Vec<Point> {
    vec![
        Point::new(x0, y0),
        Point::new(x0 + s, y0),
        Point::new(x0 + s, y0 + s),
        Point::new(x0, y0 + s),
    ]
}

fn assert_indices_valid(t: &Tessellation) {
    assert_eq!(t.indices.len() % 3, 0);
    assert!(t.indices.iter().all(|&i| i < t.points.len()));
}

#[test]
fn square_gives_two_triangles() {
    let t = tessellate(&square(0.0, 0.0, 1.0), &[], TessellateCfg::default()).unwrap();
    assert_eq!(t.triangle_count(), 2);
    assert_indices_valid(&t);
    assert!((t.area() - 1.0).abs() < 1e-12);
    for [a, b, c] in t.triangles() {
        assert!(signed_area(&[t.points[a], t.points[b], t.points[c]]) > 0.0);
    }
}

#[test]
fn clockwise_outer_is_accepted() {
    let mut ring = square(0.0, 0.0, 2.0);
    ring.reverse();
    let t = tessellate(&ring, &[], TessellateCfg::default()).unwrap();
    assert_eq!(t.triangle_count(), 2);
    assert!((t.area() - 4.0).abs() < 1e-12);
}

#[test]
fn concave_ring_yields_n_minus_two() {
    // Arrow shape, one reflex vertex.
    let ring = vec![
        Point::new(0.0, 0.0),
        Point::new(4.0, 2.0),
        Point::new(0.0, 4.0),
        Point::new(1.0, 2.0),
    ];
    let t = tessellate(&ring, &[], TessellateCfg::default()).unwrap();
    assert_eq!(t.triangle_count(), 2);
    assert!((t.area() - area(&ring)).abs() < 1e-12);
}

#[test]
fn square_with_square_hole() {
    let outer = square(0.0, 0.0, 10.0);
    let hole = square(3.0, 3.0, 4.0);
    let t = tessellate(&outer, &[hole], TessellateCfg::default()).unwrap();
    assert_indices_valid(&t);
    assert_eq!(t.points.len(), 8);
    // Hole bridging adds two vertices to an 8-vertex ring: 8 + 2 - 2.
    assert_eq!(t.triangle_count(), 8);
    assert!((t.area() - 84.0).abs() < 1e-9);
    // Nothing covers the hole's center.
    let c = Point::new(5.0, 5.0);
    for [a, b, d] in t.triangles() {
        assert!(!crate::geom2::point_in_triangle(c, t.points[a], t.points[b], t.points[d]));
    }
}

#[test]
fn flat_input_with_hole_starts() {
    let mut pts = square(0.0, 0.0, 10.0);
    pts.extend(square(1.0, 1.0, 2.0));
    pts.extend(square(6.0, 6.0, 2.0));
    let t = tessellate_flat(pts, &[4, 8], TessellateCfg::default()).unwrap();
    assert_indices_valid(&t);
    assert!((t.area() - 92.0).abs() < 1e-9);
}

#[test]
fn too_few_points_is_an_error() {
    let err = tessellate(&[Point::new(0.0, 0.0), Point::new(1.0, 0.0)], &[], TessellateCfg::default())
        .unwrap_err();
    assert_eq!(err, KernelError::TooFewPoints { required: 3, got: 2 });
}

#[test]
fn bad_hole_starts_are_rejected() {
    let pts = square(0.0, 0.0, 1.0);
    let err = tessellate_flat(pts, &[9], TessellateCfg::default()).unwrap_err();
    assert!(matches!(err, KernelError::InvalidParam(_)));
}

#[test]
fn self_intersecting_outer_is_diagnosed() {
    let bowtie = vec![
        Point::new(0.0, 0.0),
        Point::new(1.0, 1.0),
        Point::new(1.0, 0.0),
        Point::new(0.0, 1.0),
    ];
    let t = tessellate(&bowtie, &[], TessellateCfg::default()).unwrap();
    assert!(t.indices.is_empty());
    assert_eq!(t.diagnostic, Some(Diagnostic::SelfIntersecting { first: 0, second: 2 }));
}

#[test]
fn self_intersecting_hole_reports_global_indices() {
    let outer = square(0.0, 0.0, 10.0);
    let hole = vec![
        Point::new(2.0, 2.0),
        Point::new(4.0, 4.0),
        Point::new(4.0, 2.0),
        Point::new(2.0, 4.0),
    ];
    let t = tessellate(&outer, &[hole], TessellateCfg::default()).unwrap();
    assert_eq!(t.diagnostic, Some(Diagnostic::SelfIntersecting { first: 4, second: 6 }));
}

#[test]
fn large_ring_uses_hashed_ears() {
    let ring = draw_polygon_radial(
        RadialCfg {
            vertex_count: VertexCount::Fixed(200),
            radial_jitter: 0.5,
            ..RadialCfg::default()
        },
        ReplayToken::new(9),
    );
    let t = tessellate(&ring, &[], TessellateCfg::default()).unwrap();
    assert_indices_valid(&t);
    assert!((t.area() - area(&ring)).abs() < 1e-9 * area(&ring));
}

proptest! {
    #[test]
    fn radial_rings_cover_their_area(seed in 0u64..400, n in 3usize..60) {
        let ring = draw_polygon_radial(
            RadialCfg {
                vertex_count: VertexCount::Fixed(n),
                radial_jitter: 0.6,
                ..RadialCfg::default()
            },
            ReplayToken { seed, index: 1 },
        );
        let t = tessellate(&ring, &[], TessellateCfg::default()).unwrap();
        prop_assert_eq!(t.triangle_count(), n - 2);
        prop_assert!(t.indices.iter().all(|&i| i < n));
        let a = area(&ring);
        prop_assert!((t.area() - a).abs() < 1e-9 * a.max(1.0));
    }
}
