//! Polygon offset (inset/outset) with self-intersection recovery.
//!
//! Purpose
//! - Move every edge of a simple ring along its normal by a signed distance
//!   and return the resulting simple rings. A concave inset may fall apart
//!   into several rings; an inset past the inradius collapses to none.
//!
//! Model
//! - Each edge is translated along its left normal; each vertex moves to the
//!   intersection of its two translated edges (miter join). Antiparallel
//!   neighbours fall back to translating the vertex along one normal.
//! - Work runs from an explicit stack of pending rings. A ring whose offset
//!   self-intersects is cut at its first crossing through `PolyGraph`; both
//!   loops are pushed back with distance zero since they are already offset.
//!   Only loops with fewer vertices than their parent are pushed, so the
//!   stack drains; a proper crossing always yields such loops.
//! - Loops whose winding flipped are the inverted parts of the offset and are
//!   dropped. An inset past the inradius can also come out as a point-reflected
//!   ring with the original winding, so every inset ring must additionally
//!   keep all its vertices inside the source at least `distance` from its
//!   boundary.
//!
//! Sign convention
//! - Positive `distance` moves edges toward the left of a ring wound like
//!   `cfg.reference`; a ring wound the other way is offset with the sign
//!   flipped. With the default CCW reference, positive insets and negative
//!   outsets, whatever the input winding. Output rings are CCW.

mod graph;

use tracing::{debug, trace, warn};

use crate::error::{Diagnostic, KernelError, Result};
use crate::geom2::{
    clean_ring, first_self_intersection, point_in_polygon, segment_intersection, signed_area,
    winding, GeomCfg, Point, Winding,
};
use graph::PolyGraph;

/// Offset configuration.
#[derive(Clone, Copy, Debug)]
pub struct OffsetCfg {
    pub geom: GeomCfg,
    /// Winding for which positive distances move edges to the left.
    pub reference: Winding,
    /// Cap on crossing cuts; `None` means twice the vertex count. Never
    /// exceeds that default.
    pub max_splits: Option<usize>,
}

impl Default for OffsetCfg {
    fn default() -> Self {
        Self {
            geom: GeomCfg::default(),
            reference: Winding::CounterClockwise,
            max_splits: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OffsetStatus {
    Complete,
    /// Nothing survived: the inset consumed the whole polygon.
    Collapsed,
    /// The cut budget ran out; pending rings were emitted without cutting.
    Truncated,
    /// The input was self-intersecting; see `diagnostic`.
    Rejected,
}

#[derive(Clone, Debug)]
pub struct Offset {
    /// Simple CCW rings.
    pub rings: Vec<Vec<Point>>,
    pub status: OffsetStatus,
    pub splits: usize,
    pub budget: usize,
    pub diagnostic: Option<Diagnostic>,
}

impl Offset {
    #[inline]
    pub fn truncated(&self) -> bool {
        self.status == OffsetStatus::Truncated
    }

    pub fn total_area(&self) -> f64 {
        self.rings.iter().map(|r| signed_area(r)).sum()
    }
}

struct Pending {
    ring: Vec<Point>,
    /// Inward distance still to apply (the ring is CCW).
    distance: f64,
}

/// Offset `poly` by `distance` (see the module docs for the sign).
pub fn offset_polygon(poly: &[Point], distance: f64, cfg: OffsetCfg) -> Result<Offset> {
    if poly.len() < 3 {
        return Err(KernelError::TooFewPoints {
            required: 3,
            got: poly.len(),
        });
    }
    if !distance.is_finite() {
        return Err(KernelError::InvalidParam(format!("offset distance {distance}")));
    }
    let g = cfg.geom;
    let default_budget = 2 * poly.len();
    let budget = cfg.max_splits.map_or(default_budget, |m| m.min(default_budget));
    let mut out = Offset {
        rings: Vec::new(),
        status: OffsetStatus::Complete,
        splits: 0,
        budget,
        diagnostic: None,
    };

    if let Some((first, second)) = first_self_intersection(poly, g.eps_det) {
        let diag = Diagnostic::SelfIntersecting { first, second };
        warn!(?diag, "offset: self-intersecting input rejected");
        out.status = OffsetStatus::Rejected;
        out.diagnostic = Some(diag);
        return Ok(out);
    }
    let Some(w) = winding(poly, g.eps_area) else {
        out.status = OffsetStatus::Collapsed;
        return Ok(out);
    };
    let toward_left = if w == cfg.reference { distance } else { -distance };
    let (mut ring, inward) = match w {
        Winding::CounterClockwise => (poly.to_vec(), toward_left),
        Winding::Clockwise => (poly.iter().rev().copied().collect(), -toward_left),
    };
    ring = clean_ring(&ring, g.eps_dist, g.eps_area);
    if ring.is_empty() {
        out.status = OffsetStatus::Collapsed;
        return Ok(out);
    }
    let source = ring.clone();
    let keeps_clearance = |r: &[Point]| clears_source(r, &source, inward, g);

    let mut stack = vec![Pending {
        ring,
        distance: inward,
    }];
    while let Some(Pending { ring, distance }) = stack.pop() {
        let moved = if distance == 0.0 {
            ring
        } else {
            offset_ring(&ring, distance)
        };
        let moved = clean_ring(&moved, g.eps_dist, g.eps_area);
        if moved.is_empty() {
            continue;
        }
        let Some((i, j)) = first_self_intersection(&moved, g.eps_det) else {
            if signed_area(&moved) <= g.eps_area {
                trace!(len = moved.len(), "offset: inverted loop dropped");
            } else if !keeps_clearance(&moved) {
                trace!(len = moved.len(), "offset: reflected loop dropped");
            } else {
                out.rings.push(moved);
            }
            continue;
        };
        if out.splits >= budget {
            warn!(budget, "offset: cut budget exhausted, emitting uncut rings");
            out.status = OffsetStatus::Truncated;
            if signed_area(&moved) > g.eps_area {
                out.rings.push(moved);
            }
            continue;
        }
        out.splits += 1;
        for part in cut_at_crossing(&moved, i, j, g) {
            if part.len() < moved.len() {
                stack.push(Pending {
                    ring: part,
                    distance: 0.0,
                });
            } else if signed_area(&part) > g.eps_area && keeps_clearance(&part) {
                // Touching (collinear overlap) rather than crossing; no cut
                // can shrink it further.
                out.rings.push(part);
            }
        }
    }

    if out.rings.is_empty() && out.status == OffsetStatus::Complete {
        out.status = OffsetStatus::Collapsed;
    }
    debug!(
        rings = out.rings.len(),
        splits = out.splits,
        status = ?out.status,
        "offset: done"
    );
    Ok(out)
}

/// Whether every vertex of `ring` lies inside the CCW `source` and at least
/// `inward` from its boundary. Outsets (`inward <= 0`) always pass.
fn clears_source(ring: &[Point], source: &[Point], inward: f64, g: GeomCfg) -> bool {
    if inward <= 0.0 {
        return true;
    }
    let slack = g.eps_dist + 1e-9 * inward;
    ring.iter()
        .all(|&p| point_in_polygon(p, source) && boundary_distance(p, source) >= inward - slack)
}

/// Distance from `p` to the nearest edge of the closed ring.
fn boundary_distance(p: Point, ring: &[Point]) -> f64 {
    let n = ring.len();
    (0..n)
        .map(|k| {
            let a = ring[k];
            let ab = ring[(k + 1) % n] - a;
            let len2 = ab.norm_squared();
            let t = if len2 > 0.0 {
                ((p - a).dot(&ab) / len2).clamp(0.0, 1.0)
            } else {
                0.0
            };
            (p - (a + ab * t)).norm()
        })
        .fold(f64::INFINITY, f64::min)
}

/// Miter offset of a CCW ring: positive `d` moves edges to their left.
pub fn offset_ring(ring: &[Point], d: f64) -> Vec<Point> {
    let n = ring.len();
    let normal = |k: usize| {
        let e = ring[(k + 1) % n] - ring[k];
        let len = e.norm();
        if len == 0.0 {
            Point::zeros()
        } else {
            Point::new(-e.y, e.x) / len
        }
    };
    (0..n)
        .map(|k| {
            let n0 = normal((k + n - 1) % n);
            let n1 = normal(k);
            let denom = 1.0 + n0.dot(&n1);
            if denom <= 1e-12 {
                ring[k] + n1 * d
            } else {
                ring[k] + (n0 + n1) * (d / denom)
            }
        })
        .collect()
}

/// Cut `ring` where edges `i` and `j` cross; returns the cleaned loops.
fn cut_at_crossing(ring: &[Point], i: usize, j: usize, g: GeomCfg) -> Vec<Vec<Point>> {
    let n = ring.len();
    let (a, b) = (ring[i], ring[(i + 1) % n]);
    let Some(x) = segment_intersection(a, b, ring[j], ring[(j + 1) % n], g.eps_det) else {
        return vec![ring.to_vec()];
    };
    let mut graph = PolyGraph::from_ring(ring);
    graph.cut_crossing(i, j, x, g.eps_dist);
    graph
        .loops()
        .into_iter()
        .map(|l| clean_ring(&l, g.eps_dist, g.eps_area))
        .filter(|l| !l.is_empty())
        .collect()
}

#[cfg(test)]
mod tests;
