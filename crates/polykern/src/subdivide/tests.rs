use super::*;
use crate::geom2::rand::{draw_polygon_radial, RadialCfg, VertexCount};
use crate::geom2::{is_convex, signed_area};
use proptest::prelude::*;

fn rect(w: f64, h: f64) -> Vec<Point> {
    vec![
        Point::new(0.0, 0.0),
        Point::new(w, 0.0),
        Point::new(w, h),
        Point::new(0.0, h),
    ]
}

#[test]
fn square_splits_into_four_quarters() {
    let cfg = SubdivideCfg {
        max_area: 4.5,
        ..SubdivideCfg::default()
    };
    let r = subdivide(&rect(4.0, 4.0), cfg).unwrap();
    assert!(!r.truncated);
    assert_eq!(r.unsplit, 0);
    assert_eq!(r.pieces.len(), 4);
    for p in &r.pieces {
        assert!((area(p) - 4.0).abs() < 1e-9);
        assert!(signed_area(p) > 0.0);
    }
    assert!((r.total_area() - 16.0).abs() < 1e-9);
    assert_eq!(r.iterations, 3);
}

#[test]
fn square_splits_at_exact_threshold() {
    for seed in [0, 1, 42] {
        let cfg = SubdivideCfg {
            max_area: 4.0,
            seed,
            ..SubdivideCfg::default()
        };
        let r = subdivide(&rect(4.0, 4.0), cfg).unwrap();
        assert!(!r.truncated, "seed {seed}");
        assert_eq!(r.pieces.len(), 4, "seed {seed}");
        for p in &r.pieces {
            assert!((area(p) - 4.0).abs() < 1e-9, "seed {seed}");
        }
        assert!((r.total_area() - 16.0).abs() < 1e-9);
    }
}

#[test]
fn small_input_is_returned_whole() {
    let r = subdivide(&rect(1.0, 1.0), SubdivideCfg::default()).unwrap();
    assert_eq!(r.pieces.len(), 1);
    assert_eq!(r.iterations, 0);
}

#[test]
fn concave_input_gives_small_convex_pieces() {
    let ell = vec![
        Point::new(0.0, 0.0),
        Point::new(6.0, 0.0),
        Point::new(6.0, 2.0),
        Point::new(2.0, 2.0),
        Point::new(2.0, 6.0),
        Point::new(0.0, 6.0),
    ];
    let cfg = SubdivideCfg {
        max_area: 2.0,
        variation: 0.4,
        seed: 11,
        ..SubdivideCfg::default()
    };
    let r = subdivide(&ell, cfg).unwrap();
    assert!(!r.truncated);
    assert!((r.total_area() - 20.0).abs() < 1e-9);
    for p in &r.pieces {
        assert!(area(p) <= 2.0 + 1e-12);
        assert!(is_convex(p, 1e-9));
    }
}

#[test]
fn same_seed_same_pieces() {
    let cfg = SubdivideCfg {
        max_area: 1.0,
        variation: 0.7,
        seed: 5,
        ..SubdivideCfg::default()
    };
    let a = subdivide(&rect(4.0, 4.0), cfg).unwrap();
    let b = subdivide(&rect(4.0, 4.0), cfg).unwrap();
    assert_eq!(a.pieces, b.pieces);
    let c = subdivide(&rect(4.0, 4.0), SubdivideCfg { seed: 6, ..cfg }).unwrap();
    assert_ne!(a.pieces, c.pieces);
}

#[test]
fn decomposition_budget_is_carried_onto_the_result() {
    let ell = vec![
        Point::new(0.0, 0.0),
        Point::new(6.0, 0.0),
        Point::new(6.0, 2.0),
        Point::new(2.0, 2.0),
        Point::new(2.0, 6.0),
        Point::new(0.0, 6.0),
    ];
    let full = subdivide(&ell, SubdivideCfg::default()).unwrap();
    assert!(!full.decompose_truncated);
    assert_eq!(full.decompose_unresolved, 0);

    let capped = subdivide(
        &ell,
        SubdivideCfg {
            decompose_max_iterations: Some(1),
            ..SubdivideCfg::default()
        },
    )
    .unwrap();
    assert!(capped.decompose_truncated);
    assert_eq!(capped.decompose_unresolved, 0);
    assert!((capped.total_area() - 20.0).abs() < 1e-9);
}

#[test]
fn exhausted_budget_flushes_the_queue() {
    let cfg = SubdivideCfg {
        max_area: 1.0,
        max_iterations: Some(1),
        ..SubdivideCfg::default()
    };
    let r = subdivide(&rect(4.0, 4.0), cfg).unwrap();
    assert!(r.truncated);
    assert_eq!(r.budget, 1);
    assert_eq!(r.iterations, 1);
    assert_eq!(r.pieces.len(), 2);
    assert!((r.total_area() - 16.0).abs() < 1e-9);
}

#[test]
fn budget_override_is_clamped_to_default() {
    let cfg = SubdivideCfg {
        max_area: 4.5,
        max_iterations: Some(1_000_000),
        ..SubdivideCfg::default()
    };
    let r = subdivide(&rect(4.0, 4.0), cfg).unwrap();
    // 4 * ceil(16 / 4.5) + 16
    assert_eq!(r.budget, 32);
}

#[test]
fn short_edges_block_every_cut() {
    // Both the across cut and the long-axis retry would leave edges under 2.
    let cfg = SubdivideCfg {
        max_area: 1.0,
        min_edge_length: 2.0,
        ..SubdivideCfg::default()
    };
    let r = subdivide(&rect(10.0, 1.0), cfg).unwrap();
    assert_eq!(r.pieces.len(), 1);
    assert_eq!(r.unsplit, 1);
    assert_eq!(r.fallback_cuts, 0);
    assert_eq!(r.iterations, 2);

    let no_retry = subdivide(
        &rect(10.0, 1.0),
        SubdivideCfg {
            fallback_long_axis: false,
            ..cfg
        },
    )
    .unwrap();
    assert_eq!(no_retry.unsplit, 1);
    assert_eq!(no_retry.iterations, 1);
}

#[test]
fn snapping_keeps_cuts_on_vertices() {
    // The center cut lands 0.1 from the middle vertex and snaps onto it.
    let ring = vec![
        Point::new(0.0, 0.0),
        Point::new(1.9, 0.0),
        Point::new(4.0, 0.0),
        Point::new(4.0, 2.0),
        Point::new(0.0, 2.0),
    ];
    let cfg = SubdivideCfg {
        max_area: 5.0,
        min_edge_length: 0.5,
        snap_points: true,
        ..SubdivideCfg::default()
    };
    let r = subdivide(&ring, cfg).unwrap();
    assert_eq!(r.pieces.len(), 2);
    assert!(r
        .pieces
        .iter()
        .all(|p| !p.iter().any(|q| (q.x - 2.0).abs() < 1e-12 && q.y == 0.0)));
    assert!((r.total_area() - 8.0).abs() < 1e-9);
}

#[test]
fn invalid_parameters() {
    let sq = rect(1.0, 1.0);
    for cfg in [
        SubdivideCfg {
            max_area: 0.0,
            ..SubdivideCfg::default()
        },
        SubdivideCfg {
            variation: 1.5,
            ..SubdivideCfg::default()
        },
        SubdivideCfg {
            min_edge_length: -1.0,
            ..SubdivideCfg::default()
        },
    ] {
        assert!(matches!(subdivide(&sq, cfg), Err(KernelError::InvalidParam(_))));
    }
    assert!(matches!(
        subdivide(&sq[..2], SubdivideCfg::default()),
        Err(KernelError::TooFewPoints { .. })
    ));
}

#[test]
fn self_intersecting_input_is_reported() {
    let bowtie = vec![
        Point::new(0.0, 0.0),
        Point::new(4.0, 4.0),
        Point::new(4.0, 0.0),
        Point::new(0.0, 4.0),
    ];
    let r = subdivide(&bowtie, SubdivideCfg::default()).unwrap();
    assert!(r.pieces.is_empty());
    assert_eq!(
        r.diagnostic,
        Some(Diagnostic::SelfIntersecting { first: 0, second: 2 })
    );
}

proptest! {
    #[test]
    fn area_is_conserved(seed in 0u64..200, n in 3usize..14, variation in 0.0f64..1.0) {
        let poly = draw_polygon_radial(
            RadialCfg {
                vertex_count: VertexCount::Fixed(n),
                base_radius: 5.0,
                ..RadialCfg::default()
            },
            ReplayToken { seed, index: 7 },
        );
        let cfg = SubdivideCfg { max_area: 4.0, variation, seed, ..SubdivideCfg::default() };
        let r = subdivide(&poly, cfg).unwrap();
        prop_assume!(r.diagnostic.is_none());
        let expected = area(&poly);
        prop_assert!((r.total_area() - expected).abs() <= 1e-9 * expected.max(1.0));
        if !r.truncated && r.unsplit == 0 {
            prop_assert!(r.pieces.iter().all(|p| area(p) <= r.threshold));
        }
    }
}
