//! Split a ring into two along a line crossing its boundary exactly twice.

use nalgebra::Vector2;

use crate::geom2::{cross, Point};

/// Where the cut line meets the ring: on vertex `k`, or inside edge
/// `k → k+1` at the given point.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Cut {
    Vertex(usize),
    Edge(usize, Point),
}

impl Cut {
    /// Position along the ring in half steps: vertex `k` at `2k`, edge `k` at `2k + 1`.
    fn slot(&self) -> usize {
        match *self {
            Cut::Vertex(k) => 2 * k,
            Cut::Edge(k, _) => 2 * k + 1,
        }
    }

    fn point(&self, ring: &[Point]) -> Point {
        match *self {
            Cut::Vertex(k) => ring[k],
            Cut::Edge(_, x) => x,
        }
    }
}

/// Split `ring` by the line through `origin` along `dir`.
///
/// Vertices within `eps` of the line count as on it. With `snap`, a crossing
/// closer than `snap` to an endpoint of its edge moves onto that endpoint.
/// Returns `None` unless the line meets the boundary in exactly two places;
/// the two rings keep the input orientation and together cover it exactly.
pub fn split_polygon_by_line(
    ring: &[Point],
    origin: Point,
    dir: Vector2<f64>,
    eps: f64,
    snap: Option<f64>,
) -> Option<(Vec<Point>, Vec<Point>)> {
    let n = ring.len();
    if n < 3 || dir.norm() == 0.0 {
        return None;
    }
    let dir = dir.normalize();
    let side: Vec<f64> = ring
        .iter()
        .map(|&p| {
            let s = cross(origin, origin + dir, p);
            if s.abs() <= eps {
                0.0
            } else {
                s
            }
        })
        .collect();

    let mut cuts: Vec<Cut> = Vec::with_capacity(2);
    for k in 0..n {
        let (a, b) = (side[k], side[(k + 1) % n]);
        if a == 0.0 {
            cuts.push(Cut::Vertex(k));
        } else if a * b < 0.0 {
            let (p, q) = (ring[k], ring[(k + 1) % n]);
            let x = p + (q - p) * (a / (a - b));
            let snapped = snap.and_then(|tol| {
                if (x - p).norm() <= tol {
                    Some(Cut::Vertex(k))
                } else if (x - q).norm() <= tol {
                    Some(Cut::Vertex((k + 1) % n))
                } else {
                    None
                }
            });
            cuts.push(snapped.unwrap_or(Cut::Edge(k, x)));
        }
    }
    cuts.sort_by_key(Cut::slot);
    cuts.dedup_by_key(|c| c.slot());
    let &[c1, c2] = cuts.as_slice() else {
        return None;
    };

    let piece = |from: Cut, to: Cut| -> Vec<Point> {
        let mut out = vec![from.point(ring)];
        out.extend(between(n, from.slot(), to.slot()).map(|m| ring[m]));
        out.push(to.point(ring));
        out
    };
    Some((piece(c1, c2), piece(c2, c1)))
}

/// Ring vertices strictly between slots `from` and `to`, walking forward.
fn between(n: usize, from: usize, to: usize) -> impl Iterator<Item = usize> {
    let span = 2 * n;
    let rel = move |slot: usize| (slot + span - from) % span;
    let end = rel(to);
    (1..n)
        .map(move |step| (from / 2 + step) % n)
        .take_while(move |&m| {
            let r = rel(2 * m);
            r > 0 && r < end
        })
}
