use super::predicates::cross;
use super::types::{Hs2, Point, Rect};

/// Andrew’s monotone chain convex hull (returns hull in CCW order).
///
/// Collinear boundary points are dropped. Returns `None` for fewer than three
/// distinct, non-collinear points.
pub fn convex_hull(points: &[Point]) -> Option<Vec<Point>> {
    if points.len() < 3 {
        return None;
    }
    let mut pts: Vec<_> = points.to_vec();
    pts.sort_by(|a, b| {
        match a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal) {
            std::cmp::Ordering::Equal => a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal),
            o => o,
        }
    });
    pts.dedup_by(|a, b| (*a - *b).norm() < 1e-12);
    if pts.len() < 3 {
        return None;
    }
    let mut lower: Vec<Point> = Vec::with_capacity(pts.len());
    for p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], *p) <= 0.0 {
            lower.pop();
        }
        lower.push(*p);
    }
    let mut upper: Vec<Point> = Vec::with_capacity(pts.len());
    for p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], *p) <= 0.0 {
            upper.pop();
        }
        upper.push(*p);
    }
    lower.pop();
    upper.pop();
    let mut hull = lower;
    hull.extend(upper);
    if hull.len() < 3 {
        return None;
    }
    Some(hull)
}

/// Sutherland–Hodgman clip of a ring against one half-space.
///
/// Exact for convex rings; concave rings may pick up zero-width bridges along
/// the clip line.
pub fn clip_to_halfspace(ring: &[Point], h: &Hs2) -> Vec<Point> {
    let n = ring.len();
    let mut out = Vec::with_capacity(n + 1);
    if n == 0 {
        return out;
    }
    for i in 0..n {
        let cur = ring[i];
        let nxt = ring[(i + 1) % n];
        let dc = h.eval(cur);
        let dn = h.eval(nxt);
        let cur_in = dc <= 0.0;
        let nxt_in = dn <= 0.0;
        if cur_in {
            out.push(cur);
        }
        if cur_in != nxt_in {
            let t = dc / (dc - dn);
            out.push(cur + (nxt - cur) * t);
        }
    }
    out
}

/// Clip a ring to an axis-aligned rectangle.
pub fn clip_to_rect(ring: &[Point], rect: &Rect) -> Vec<Point> {
    rect.halfspaces()
        .iter()
        .fold(ring.to_vec(), |acc, h| clip_to_halfspace(&acc, h))
}
