//! Geometric predicates on point rings.
//!
//! Rings are ordered point sequences whose last point implicitly connects to
//! the first. None of these functions require a particular winding.

use super::types::{approx_eq, Point, Rect, Winding};

/// Turn at `b` for the path `a → b → c`: `(b - a) × (c - b)`.
///
/// Positive for a left (counter-clockwise) turn. Reversing the path negates
/// the value exactly, which keeps orientation votes complementary.
#[inline]
pub fn turn(a: Point, b: Point, c: Point) -> f64 {
    let u = b - a;
    let v = c - b;
    u.x * v.y - u.y * v.x
}

/// 2D cross product of `a - o` and `b - o` (twice the signed triangle area).
#[inline]
pub fn cross(o: Point, a: Point, b: Point) -> f64 {
    let u = a - o;
    let v = b - o;
    u.x * v.y - u.y * v.x
}

/// Majority vote over the turn signs of every consecutive vertex triple.
///
/// More negative (right) turns than positive ones means clockwise. Ties,
/// including rings with fewer than three points or fully collinear rings,
/// report `false`.
pub fn is_clockwise(points: &[Point]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut pos = 0usize;
    let mut neg = 0usize;
    for i in 0..n {
        let t = turn(points[(i + n - 1) % n], points[i], points[(i + 1) % n]);
        if t > 0.0 {
            pos += 1;
        } else if t < 0.0 {
            neg += 1;
        }
    }
    neg > pos
}

/// Shoelace signed area (positive for counter-clockwise rings).
pub fn signed_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for i in 0..n {
        let p = points[i];
        let q = points[(i + 1) % n];
        acc += p.x * q.y - q.x * p.y;
    }
    0.5 * acc
}

#[inline]
pub fn area(points: &[Point]) -> f64 {
    signed_area(points).abs()
}

/// Orientation by signed area; `None` for (near) zero-area rings.
pub fn winding(points: &[Point], eps_area: f64) -> Option<Winding> {
    let a = signed_area(points);
    if a > eps_area {
        Some(Winding::CounterClockwise)
    } else if a < -eps_area {
        Some(Winding::Clockwise)
    } else {
        None
    }
}

/// Return the ring in the requested orientation (reversing if needed).
pub fn with_winding(points: &[Point], target: Winding, eps_area: f64) -> Vec<Point> {
    let mut out = points.to_vec();
    if let Some(w) = winding(points, eps_area) {
        if w != target {
            out.reverse();
        }
    }
    out
}

/// Area centroid; `None` for degenerate rings.
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.len() < 3 {
        return None;
    }
    let mut a: f64 = 0.0;
    let mut cx: f64 = 0.0;
    let mut cy: f64 = 0.0;
    for i in 0..points.len() {
        let p = points[i];
        let q = points[(i + 1) % points.len()];
        let c = p.x * q.y - q.x * p.y;
        a += c;
        cx += (p.x + q.x) * c;
        cy += (p.y + q.y) * c;
    }
    a *= 0.5;
    if a.abs() < 1e-18 {
        return None;
    }
    Some(Point::new(cx / (6.0 * a), cy / (6.0 * a)))
}

/// Closed-ring perimeter.
pub fn perimeter(points: &[Point]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| (points[(i + 1) % n] - points[i]).norm())
        .sum()
}

/// Ray-cast parity test with a bounding-box rejection first.
///
/// Points exactly on the boundary may land on either side.
pub fn point_in_polygon(p: Point, poly: &[Point]) -> bool {
    let Some(bounds) = Rect::bounding(poly) else {
        return false;
    };
    if !bounds.contains_eps(p, 0.0) {
        return false;
    }
    let n = poly.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = poly[i];
        let b = poly[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Closed triangle containment, valid for either triangle orientation.
pub fn point_in_triangle(p: Point, a: Point, b: Point, c: Point) -> bool {
    let d1 = cross(a, b, p);
    let d2 = cross(b, c, p);
    let d3 = cross(c, a, p);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Intersection point of segments `p1p2` and `q1q2`.
///
/// Solves `p1 + t·r = q1 + u·s`. A determinant within `eps_det` of zero means
/// parallel (including collinear overlap) and yields `None`; otherwise both
/// parameters must lie in `[0, 1]`.
pub fn segment_intersection(p1: Point, p2: Point, q1: Point, q2: Point, eps_det: f64) -> Option<Point> {
    segment_intersection_params(p1, p2, q1, q2, eps_det).map(|(t, _)| p1 + (p2 - p1) * t)
}

/// Same as [`segment_intersection`] but returns the parameters `(t, u)`.
pub fn segment_intersection_params(
    p1: Point,
    p2: Point,
    q1: Point,
    q2: Point,
    eps_det: f64,
) -> Option<(f64, f64)> {
    let r = p2 - p1;
    let s = q2 - q1;
    let det = r.x * s.y - r.y * s.x;
    if det.abs() <= eps_det {
        return None;
    }
    let qp = q1 - p1;
    let t = (qp.x * s.y - qp.y * s.x) / det;
    let u = (qp.x * r.y - qp.y * r.x) / det;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some((t, u))
    } else {
        None
    }
}

/// Edges `i` and `j` of an `n`-ring share an endpoint index.
#[inline]
pub(crate) fn edges_adjacent(i: usize, j: usize, n: usize) -> bool {
    i == j || (i + 1) % n == j || (j + 1) % n == i
}

/// First pair of intersecting non-adjacent edges `(i, j)` with `i < j`, where
/// edge `k` runs from `points[k]` to `points[k + 1]`.
///
/// O(n²) pairwise test. Edges that share an endpoint index are skipped.
pub fn first_self_intersection(points: &[Point], eps_det: f64) -> Option<(usize, usize)> {
    let n = points.len();
    if n < 4 {
        return None;
    }
    for i in 0..n {
        let a1 = points[i];
        let a2 = points[(i + 1) % n];
        for j in (i + 2)..n {
            if edges_adjacent(i, j, n) {
                continue;
            }
            let b1 = points[j];
            let b2 = points[(j + 1) % n];
            if segment_intersection_params(a1, a2, b1, b2, eps_det).is_some() {
                return Some((i, j));
            }
        }
    }
    None
}

#[inline]
pub fn is_self_intersecting(points: &[Point], eps_det: f64) -> bool {
    first_self_intersection(points, eps_det).is_some()
}

/// All turns share one sign (near-zero turns ignored).
pub fn is_convex(points: &[Point], eps: f64) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut sign = 0i8;
    for i in 0..n {
        let t = turn(points[(i + n - 1) % n], points[i], points[(i + 1) % n]);
        if t.abs() <= eps {
            continue;
        }
        let s = if t > 0.0 { 1 } else { -1 };
        if sign == 0 {
            sign = s;
        } else if sign != s {
            return false;
        }
    }
    sign != 0
}

/// Drop coincident neighbours and collinear (zero-turn) vertices, including
/// spikes that fold back onto themselves. Returns an empty ring once fewer
/// than three vertices survive.
pub fn clean_ring(points: &[Point], eps_dist: f64, eps_area: f64) -> Vec<Point> {
    let mut ring: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if ring.last().is_some_and(|&q| approx_eq(p, q, eps_dist)) {
            continue;
        }
        ring.push(p);
    }
    while ring.len() > 1 && approx_eq(ring[0], ring[ring.len() - 1], eps_dist) {
        ring.pop();
    }
    let mut changed = true;
    while changed && ring.len() >= 3 {
        changed = false;
        let n = ring.len();
        for i in 0..n {
            let a = ring[(i + n - 1) % n];
            let b = ring[i];
            let c = ring[(i + 1) % n];
            if approx_eq(a, b, eps_dist) || cross(a, b, c).abs() <= 2.0 * eps_area {
                ring.remove(i);
                changed = true;
                break;
            }
        }
    }
    if ring.len() < 3 {
        ring.clear();
    }
    ring
}
