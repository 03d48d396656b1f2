//! Convex decomposition of simple polygons by greedy convex-fan growth.
//!
//! Model
//! - The ring is normalized to CCW and cleaned of duplicate/collinear vertices.
//! - A work queue holds residual rings as index lists into the cleaned ring.
//!   For each residual, a convex fan is grown from a pivot (reflex vertices
//!   first) forwards and then backwards. A candidate vertex is accepted when
//!   the fan stays convex, the new triangle `(pivot, last, candidate)` holds
//!   no unconsumed vertex, and the closing diagonal crosses no residual edge.
//! - The fan is emitted; the residual minus the fan interior is requeued.
//!
//! Termination
//! - Every emitted fan removes at least one vertex from the residual, so the
//!   number of iterations is bounded by the vertex count. The caller-visible
//!   budget `max_iterations` is clamped to that bound; exhausting it flushes
//!   the queue unprocessed and sets `truncated`.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::error::Diagnostic;
use crate::geom2::{
    approx_eq, area, clean_ring, cross, first_self_intersection, is_convex, point_in_triangle,
    segment_intersection_params, turn, with_winding, GeomCfg, Point, Winding,
};

/// Decomposition configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct DecomposeCfg {
    pub geom: GeomCfg,
    /// Iteration budget; `None` means the input vertex count. Values above the
    /// vertex count are clamped to it.
    pub max_iterations: Option<usize>,
}

/// Convex pieces plus the bookkeeping needed to tell a partial result apart.
#[derive(Clone, Debug, Default)]
pub struct Decomposition {
    pub pieces: Vec<Vec<Point>>,
    pub iterations: usize,
    pub budget: usize,
    /// The budget ran out; trailing pieces may be non-convex residuals.
    pub truncated: bool,
    /// Residuals for which no convex fan could be grown (numerically broken
    /// input). They are emitted unsplit.
    pub unresolved: usize,
    /// Set when the input was rejected; `pieces` is then empty.
    pub diagnostic: Option<Diagnostic>,
}

impl Decomposition {
    #[inline]
    pub fn is_complete(&self) -> bool {
        !self.truncated && self.unresolved == 0 && self.diagnostic.is_none()
    }

    /// Sum of piece areas.
    pub fn total_area(&self) -> f64 {
        self.pieces.iter().map(|p| area(p)).sum()
    }
}

/// Split a simple polygon into convex pieces.
///
/// Rings with three or fewer points and rings that are already convex come
/// back unchanged as a single piece. Self-intersecting rings are rejected with
/// an empty result and a diagnostic.
pub fn decompose_convex(poly: &[Point], cfg: DecomposeCfg) -> Decomposition {
    let n = poly.len();
    let eps = cfg.geom.eps_area;
    let mut out = Decomposition {
        budget: cfg.max_iterations.unwrap_or(n).min(n),
        ..Decomposition::default()
    };
    if n <= 3 {
        out.pieces.push(poly.to_vec());
        return out;
    }
    if let Some((first, second)) = first_self_intersection(poly, cfg.geom.eps_det) {
        warn!(first, second, "decompose: self-intersecting input rejected");
        out.diagnostic = Some(Diagnostic::SelfIntersecting { first, second });
        return out;
    }
    if is_convex(poly, eps) {
        out.pieces.push(poly.to_vec());
        return out;
    }

    let ccw = with_winding(poly, Winding::CounterClockwise, eps);
    let pts = clean_ring(&ccw, cfg.geom.eps_dist, eps);
    if pts.is_empty() {
        debug!("decompose: input collapsed to zero area");
        return out;
    }

    let mut queue: VecDeque<Vec<usize>> = VecDeque::new();
    queue.push_back((0..pts.len()).collect());
    while let Some(ring) = queue.pop_front() {
        if out.iterations >= out.budget {
            queue.push_front(ring);
            break;
        }
        out.iterations += 1;
        if ring.len() <= 3 || is_convex(&resolve(&pts, &ring), eps) {
            out.pieces.push(resolve(&pts, &ring));
            continue;
        }
        match grow_fan(&pts, &ring, eps, cfg.geom.eps_dist) {
            Some(fan) => {
                let m = ring.len();
                let piece: Vec<usize> = fan.iter().map(|&k| ring[k]).collect();
                out.pieces.push(resolve(&pts, &piece));
                if fan.len() < m {
                    let front = fan[0];
                    let back = fan[fan.len() - 1];
                    let residual_len = m - fan.len() + 2;
                    let residual: Vec<usize> =
                        (0..residual_len).map(|k| ring[(back + k) % m]).collect();
                    debug_assert_eq!(residual[residual_len - 1], ring[front]);
                    queue.push_back(residual);
                }
            }
            None => {
                warn!(len = ring.len(), "decompose: no convex fan found, emitting residual");
                out.unresolved += 1;
                out.pieces.push(resolve(&pts, &ring));
            }
        }
    }
    if !queue.is_empty() {
        warn!(
            remaining = queue.len(),
            budget = out.budget,
            "decompose: iteration budget exhausted"
        );
        out.truncated = true;
        out.pieces
            .extend(queue.into_iter().map(|ring| resolve(&pts, &ring)));
    }
    debug!(
        pieces = out.pieces.len(),
        iterations = out.iterations,
        "decompose: done"
    );
    out
}

fn resolve(pts: &[Point], ring: &[usize]) -> Vec<Point> {
    ring.iter().map(|&i| pts[i]).collect()
}

/// Largest convex fan over reflex pivots, falling back to the first fan found
/// from any pivot. Returns ring positions in forward (CCW) order.
fn grow_fan(pts: &[Point], ring: &[usize], eps: f64, eps_dist: f64) -> Option<Vec<usize>> {
    let m = ring.len();
    let at = |k: usize| pts[ring[k % m]];
    let reflex: Vec<usize> = (0..m)
        .filter(|&k| turn(at(k + m - 1), at(k), at(k + 1)) < -eps)
        .collect();
    let mut best: Option<Vec<usize>> = None;
    for &start in &reflex {
        if let Some(fan) = fan_from(pts, ring, start, eps, eps_dist) {
            if best.as_ref().map_or(true, |b| fan.len() > b.len()) {
                best = Some(fan);
            }
        }
    }
    if best.is_some() {
        return best;
    }
    (0..m).find_map(|start| fan_from(pts, ring, start, eps, eps_dist))
}

fn fan_from(
    pts: &[Point],
    ring: &[usize],
    start: usize,
    eps: f64,
    eps_dist: f64,
) -> Option<Vec<usize>> {
    let m = ring.len();
    let mut chain: VecDeque<usize> = VecDeque::from(vec![start, (start + 1) % m]);
    loop {
        let cand = (chain[chain.len() - 1] + 1) % m;
        if cand == chain[0] {
            break;
        }
        let mut next = chain.clone();
        next.push_back(cand);
        let (pivot, last) = (chain[0], chain[chain.len() - 1]);
        if !accepts(pts, ring, &next, (pivot, last, cand), (cand, pivot), eps, eps_dist) {
            break;
        }
        chain = next;
    }
    loop {
        if chain.len() == m {
            break;
        }
        let cand = (chain[0] + m - 1) % m;
        let mut next = chain.clone();
        next.push_front(cand);
        let (first, last) = (chain[0], chain[chain.len() - 1]);
        if !accepts(pts, ring, &next, (cand, first, last), (last, cand), eps, eps_dist) {
            break;
        }
        chain = next;
    }
    (chain.len() >= 3).then(|| chain.into_iter().collect())
}

/// Check a grown chain: convex as a closed ring, the newly covered triangle is
/// free of unconsumed vertices, and the closing diagonal crosses no residual
/// edge.
fn accepts(
    pts: &[Point],
    ring: &[usize],
    chain: &VecDeque<usize>,
    tri: (usize, usize, usize),
    diag: (usize, usize),
    eps: f64,
    eps_dist: f64,
) -> bool {
    let m = ring.len();
    let at = |k: usize| pts[ring[k]];
    let k = chain.len();
    for i in 0..k {
        let a = at(chain[(i + k - 1) % k]);
        let b = at(chain[i]);
        let c = at(chain[(i + 1) % k]);
        if turn(a, b, c) < -eps {
            return false;
        }
    }

    let front = chain[0];
    let span = (chain[k - 1] + m - front) % m;
    let in_chain = |q: usize| (q + m - front) % m <= span;

    let (ta, tb, tc) = (at(tri.0), at(tri.1), at(tri.2));
    if cross(ta, tb, tc).abs() > eps {
        for q in (0..m).filter(|&q| !in_chain(q)) {
            let p = at(q);
            if approx_eq(p, ta, eps_dist) || approx_eq(p, tb, eps_dist) || approx_eq(p, tc, eps_dist)
            {
                continue;
            }
            if point_in_triangle(p, ta, tb, tc) {
                return false;
            }
        }
    }

    let (d0, d1) = diag;
    let (da, db) = (at(d0), at(d1));
    for q in 0..m {
        let q1 = (q + 1) % m;
        if q == d0 || q == d1 || q1 == d0 || q1 == d1 {
            continue;
        }
        if segment_intersection_params(da, db, at(q), at(q1), 0.0).is_some() {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom2::rand::{draw_polygon_radial, RadialCfg, ReplayToken, VertexCount};
    use crate::geom2::{signed_area, Rect};
    use nalgebra::vector;
    use proptest::prelude::*;

    fn l_shape() -> Vec<Point> {
        vec![
            vector![0.0, 0.0],
            vector![2.0, 0.0],
            vector![2.0, 1.0],
            vector![1.0, 1.0],
            vector![1.0, 2.0],
            vector![0.0, 2.0],
        ]
    }

    fn assert_convex_ccw(piece: &[Point]) {
        assert!(piece.len() >= 3);
        assert!(is_convex(piece, 1e-9), "piece not convex: {piece:?}");
        assert!(signed_area(piece) > 0.0);
    }

    #[test]
    fn triangle_and_convex_pass_through() {
        let tri = vec![vector![0.0, 0.0], vector![0.0, 1.0], vector![1.0, 0.0]];
        let d = decompose_convex(&tri, DecomposeCfg::default());
        assert_eq!(d.pieces, vec![tri]);

        let sq = Rect::from_size(3.0, 1.0).corners().to_vec();
        let d = decompose_convex(&sq, DecomposeCfg::default());
        assert_eq!(d.pieces, vec![sq]);
        assert!(d.is_complete());
    }

    #[test]
    fn l_shape_splits_in_two() {
        let d = decompose_convex(&l_shape(), DecomposeCfg::default());
        assert!(d.is_complete());
        assert_eq!(d.pieces.len(), 2);
        d.pieces.iter().for_each(|p| assert_convex_ccw(p));
        assert!((d.total_area() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn clockwise_input_is_normalized() {
        let mut cw = l_shape();
        cw.reverse();
        let d = decompose_convex(&cw, DecomposeCfg::default());
        assert!((d.total_area() - 3.0).abs() < 1e-9);
        d.pieces.iter().for_each(|p| assert_convex_ccw(p));
    }

    #[test]
    fn comb_polygon() {
        let comb = vec![
            vector![0.0, 0.0],
            vector![5.0, 0.0],
            vector![5.0, 3.0],
            vector![4.0, 3.0],
            vector![4.0, 1.0],
            vector![3.0, 1.0],
            vector![3.0, 3.0],
            vector![2.0, 3.0],
            vector![2.0, 1.0],
            vector![1.0, 1.0],
            vector![1.0, 3.0],
            vector![0.0, 3.0],
        ];
        let d = decompose_convex(&comb, DecomposeCfg::default());
        assert!(d.is_complete());
        d.pieces.iter().for_each(|p| assert_convex_ccw(p));
        assert!((d.total_area() - area(&comb)).abs() < 1e-9);
    }

    #[test]
    fn self_intersecting_is_rejected() {
        let bowtie = vec![
            vector![0.0, 0.0],
            vector![2.0, 2.0],
            vector![2.0, 0.0],
            vector![0.0, 2.0],
        ];
        let d = decompose_convex(&bowtie, DecomposeCfg::default());
        assert!(d.pieces.is_empty());
        assert_eq!(
            d.diagnostic,
            Some(Diagnostic::SelfIntersecting { first: 0, second: 2 })
        );
    }

    #[test]
    fn budget_exhaustion_is_observable() {
        let cfg = DecomposeCfg {
            max_iterations: Some(1),
            ..DecomposeCfg::default()
        };
        let star = draw_polygon_radial(
            RadialCfg {
                vertex_count: VertexCount::Fixed(16),
                radial_jitter: 0.6,
                ..RadialCfg::default()
            },
            ReplayToken { seed: 5, index: 0 },
        );
        let d = decompose_convex(&star, cfg);
        assert!(d.truncated);
        assert_eq!(d.iterations, 1);
        // The flushed residual keeps the area intact.
        assert!((d.total_area() - area(&star)).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn area_is_conserved(seed in 0u64..500, n in 4usize..30) {
            let ring = draw_polygon_radial(
                RadialCfg {
                    vertex_count: VertexCount::Fixed(n),
                    radial_jitter: 0.7,
                    ..RadialCfg::default()
                },
                ReplayToken { seed, index: 0 },
            );
            let d = decompose_convex(&ring, DecomposeCfg::default());
            prop_assert!(d.is_complete());
            prop_assert!((d.total_area() - area(&ring)).abs() < 1e-9 * area(&ring).max(1.0));
            for p in &d.pieces {
                prop_assert!(is_convex(p, 1e-9));
            }
        }
    }
}
