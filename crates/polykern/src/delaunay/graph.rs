//! Triangle arena plus Bowyer–Watson insertion.

use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;

use super::types::{DelaunayEdge, DelaunayPoint, DelaunayTriangle, InsertStats, PointId, TriangleId};
use crate::error::{KernelError, Result};
use crate::geom2::{approx_eq, turn, GeomCfg, Point, Rect};

/// Number of bounding corner sites; they always hold ids `0..4`.
pub const CORNERS: usize = 4;

/// Incremental Delaunay triangulation of a rectangle.
///
/// Sites live in `points`; triangles in an arena of optional slots whose
/// freed ids are reused. Every mutation of a site's incidence set goes
/// through `attach`/`detach`.
#[derive(Clone, Debug)]
pub struct DelaunayGraph {
    points: Vec<DelaunayPoint>,
    triangles: Vec<Option<DelaunayTriangle>>,
    free: Vec<TriangleId>,
    bounds: Rect,
    geom: GeomCfg,
    stats: InsertStats,
}

impl DelaunayGraph {
    /// Bootstrap with the four corners of `bounds` split along the
    /// `min`–`max` diagonal.
    pub fn new(bounds: Rect, geom: GeomCfg) -> Result<Self> {
        let mut g = Self {
            points: bounds.corners().iter().map(|&p| DelaunayPoint::new(p)).collect(),
            triangles: Vec::new(),
            free: Vec::new(),
            bounds,
            geom,
            stats: InsertStats::default(),
        };
        g.attach([PointId(0), PointId(1), PointId(2)])?;
        g.attach([PointId(0), PointId(2), PointId(3)])?;
        Ok(g)
    }

    /// Insert one site. Returns `Ok(None)` when `p` coincides with an existing
    /// site; `Err(OutOfBounds)` when it lies outside the bounds.
    pub fn insert(&mut self, p: Point) -> Result<Option<PointId>> {
        let eps = self.geom.eps_dist;
        if !p.x.is_finite() || !p.y.is_finite() || !self.bounds.contains_eps(p, eps) {
            return Err(KernelError::OutOfBounds {
                index: self.points.len(),
            });
        }
        let p = self.snap_to_border(p);
        let bad: Vec<TriangleId> = self
            .triangles()
            .filter(|(_, t)| t.circumcircle_contains(p, eps))
            .map(|(id, _)| id)
            .collect();
        let duplicate = bad.is_empty()
            || bad.iter().any(|&id| {
                self.tri(id)
                    .v
                    .iter()
                    .any(|&v| approx_eq(self.points[v.0].pos, p, eps))
            });
        if duplicate {
            self.stats.skipped_duplicates += 1;
            trace!(x = p.x, y = p.y, "delaunay: duplicate site skipped");
            return Ok(None);
        }

        // Cavity boundary: edges seen exactly once, kept in first-seen order
        // with the CCW direction of their bad triangle.
        let mut seen: BTreeMap<DelaunayEdge, usize> = BTreeMap::new();
        let mut boundary: Vec<((PointId, PointId), usize)> = Vec::new();
        for &id in &bad {
            for (a, b) in self.tri(id).directed_edges() {
                match seen.get(&DelaunayEdge::new(a, b)) {
                    Some(&k) => boundary[k].1 += 1,
                    None => {
                        seen.insert(DelaunayEdge::new(a, b), boundary.len());
                        boundary.push(((a, b), 1));
                    }
                }
            }
        }
        for id in bad {
            self.detach(id);
        }

        let pid = PointId(self.points.len());
        self.points.push(DelaunayPoint::new(p));
        for ((a, b), _) in boundary.into_iter().filter(|(_, count)| *count == 1) {
            let (pa, pb) = (self.points[a.0].pos, self.points[b.0].pos);
            let collinear = turn(pa, pb, p).abs() <= self.geom.eps_det * (pb - pa).norm_squared();
            if collinear && self.border_outward(pa, pb).is_some() {
                // `p` sits on a bounds edge; that edge is replaced by two halves.
                continue;
            }
            self.attach([a, b, pid])?;
        }
        self.stats.inserted += 1;
        Ok(Some(pid))
    }

    /// Clamp into the bounds and pull coordinates within `eps_dist` of a
    /// border exactly onto it.
    fn snap_to_border(&self, p: Point) -> Point {
        let eps = self.geom.eps_dist;
        let r = &self.bounds;
        let snap = |v: f64, lo: f64, hi: f64| {
            if (v - lo).abs() <= eps {
                lo
            } else if (v - hi).abs() <= eps {
                hi
            } else {
                v
            }
        };
        let p = r.clamp(p);
        Point::new(snap(p.x, r.min.x, r.max.x), snap(p.y, r.min.y, r.max.y))
    }

    /// Outward unit normal of the bounds side containing segment `ab`, if any.
    pub(super) fn border_outward(&self, a: Point, b: Point) -> Option<Point> {
        let eps = self.geom.eps_dist;
        let r = &self.bounds;
        let same = |u: f64, v: f64, w: f64| (u - w).abs() <= eps && (v - w).abs() <= eps;
        if same(a.x, b.x, r.min.x) {
            Some(Point::new(-1.0, 0.0))
        } else if same(a.x, b.x, r.max.x) {
            Some(Point::new(1.0, 0.0))
        } else if same(a.y, b.y, r.min.y) {
            Some(Point::new(0.0, -1.0))
        } else if same(a.y, b.y, r.max.y) {
            Some(Point::new(0.0, 1.0))
        } else {
            None
        }
    }

    fn attach(&mut self, v: [PointId; 3]) -> Result<TriangleId> {
        let pos = v.map(|id| self.points[id.0].pos);
        let t = DelaunayTriangle::new(v, pos, self.geom.eps_det)?;
        let id = match self.free.pop() {
            Some(id) => {
                self.triangles[id.0] = Some(t);
                id
            }
            None => {
                self.triangles.push(Some(t));
                TriangleId(self.triangles.len() - 1)
            }
        };
        for p in v {
            self.points[p.0].triangles.insert(id);
        }
        Ok(id)
    }

    fn detach(&mut self, id: TriangleId) {
        if let Some(t) = self.triangles[id.0].take() {
            for p in t.v {
                self.points[p.0].triangles.remove(&id);
            }
            self.free.push(id);
        }
    }

    fn tri(&self, id: TriangleId) -> &DelaunayTriangle {
        match &self.triangles[id.0] {
            Some(t) => t,
            None => unreachable!("triangle {id:?} is not live"),
        }
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    #[inline]
    pub fn geom(&self) -> GeomCfg {
        self.geom
    }

    #[inline]
    pub fn stats(&self) -> InsertStats {
        self.stats
    }

    /// All sites, bounding corners first.
    #[inline]
    pub fn points(&self) -> &[DelaunayPoint] {
        &self.points
    }

    #[inline]
    pub fn point(&self, id: PointId) -> &DelaunayPoint {
        &self.points[id.0]
    }

    pub fn positions(&self) -> Vec<Point> {
        self.points.iter().map(|p| p.pos).collect()
    }

    #[inline]
    pub fn is_corner(&self, id: PointId) -> bool {
        id.0 < CORNERS
    }

    /// Live triangles in id order.
    pub fn triangles(&self) -> impl Iterator<Item = (TriangleId, &DelaunayTriangle)> + '_ {
        self.triangles
            .iter()
            .enumerate()
            .filter_map(|(k, t)| t.as_ref().map(|t| (TriangleId(k), t)))
    }

    pub fn triangle(&self, id: TriangleId) -> Option<&DelaunayTriangle> {
        self.triangles.get(id.0).and_then(Option::as_ref)
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.iter().filter(|t| t.is_some()).count()
    }

    /// Triangles incident on `id`, in ascending triangle id order.
    pub fn incident(&self, id: PointId) -> impl Iterator<Item = &DelaunayTriangle> + '_ {
        self.points[id.0].triangles().map(|t| self.tri(t))
    }

    /// Unique undirected edges in sorted order.
    pub fn edges(&self) -> Vec<DelaunayEdge> {
        let set: BTreeSet<DelaunayEdge> = self.triangles().flat_map(|(_, t)| t.edges()).collect();
        set.into_iter().collect()
    }

    /// Triangles as CCW index triples into `points()`.
    pub fn index_triples(&self) -> Vec<[usize; 3]> {
        self.triangles().map(|(_, t)| t.v.map(|p| p.0)).collect()
    }
}
