//! Data types for the Delaunay graph: ids, points, triangles, edges.

use std::collections::BTreeSet;

use crate::error::{KernelError, Result};
use crate::geom2::Point;

/// Identifier types for clarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PointId(pub usize);
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TriangleId(pub usize);

/// A site plus the live triangles incident on it.
///
/// The incidence set changes only through `DelaunayGraph`'s attach/detach.
#[derive(Clone, Debug)]
pub struct DelaunayPoint {
    pub pos: Point,
    pub(super) triangles: BTreeSet<TriangleId>,
}

impl DelaunayPoint {
    pub(super) fn new(pos: Point) -> Self {
        Self {
            pos,
            triangles: BTreeSet::new(),
        }
    }

    /// Incident triangle ids in ascending order.
    pub fn triangles(&self) -> impl Iterator<Item = TriangleId> + '_ {
        self.triangles.iter().copied()
    }

    pub fn degree(&self) -> usize {
        self.triangles.len()
    }
}

/// CCW triangle with its circumcircle cached at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DelaunayTriangle {
    pub v: [PointId; 3],
    pub circumcenter: Point,
    pub radius_sq: f64,
}

impl DelaunayTriangle {
    /// Build from three sites, reordering to CCW.
    ///
    /// Fails with `DegenerateTriangle` when the circumcircle denominator
    /// vanishes relative to the squared edge lengths (collinear sites).
    pub fn new(v: [PointId; 3], pos: [Point; 3], eps_det: f64) -> Result<Self> {
        let [a, b, c] = pos;
        let ab = b - a;
        let ac = c - a;
        let d = 2.0 * (ab.x * ac.y - ab.y * ac.x);
        let scale = ab.norm_squared().max(ac.norm_squared());
        if d == 0.0 || d.abs() <= eps_det * scale {
            return Err(KernelError::DegenerateTriangle([v[0].0, v[1].0, v[2].0]));
        }
        let (ab2, ac2) = (ab.norm_squared(), ac.norm_squared());
        let u = Point::new((ac.y * ab2 - ab.y * ac2) / d, (ab.x * ac2 - ac.x * ab2) / d);
        let v = if d > 0.0 { v } else { [v[0], v[2], v[1]] };
        Ok(Self {
            v,
            circumcenter: a + u,
            radius_sq: u.norm_squared(),
        })
    }

    /// `p` lies strictly inside the circumcircle (relative tolerance `eps`).
    #[inline]
    pub fn circumcircle_contains(&self, p: Point, eps: f64) -> bool {
        (p - self.circumcenter).norm_squared() < self.radius_sq * (1.0 - eps)
    }

    #[inline]
    pub fn has_vertex(&self, id: PointId) -> bool {
        self.v.contains(&id)
    }

    /// Directed CCW edges `(v0,v1), (v1,v2), (v2,v0)`.
    pub fn directed_edges(&self) -> [(PointId, PointId); 3] {
        let [a, b, c] = self.v;
        [(a, b), (b, c), (c, a)]
    }

    pub fn edges(&self) -> [DelaunayEdge; 3] {
        self.directed_edges().map(|(a, b)| DelaunayEdge::new(a, b))
    }

    /// Exactly two shared vertices.
    pub fn shares_edge(&self, other: &DelaunayTriangle) -> bool {
        self.v.iter().filter(|id| other.has_vertex(**id)).count() == 2
    }
}

/// Unordered site pair; `new(a, b) == new(b, a)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DelaunayEdge {
    a: PointId,
    b: PointId,
}

impl DelaunayEdge {
    #[inline]
    pub fn new(a: PointId, b: PointId) -> Self {
        if a <= b {
            Self { a, b }
        } else {
            Self { a: b, b: a }
        }
    }

    #[inline]
    pub fn endpoints(&self) -> (PointId, PointId) {
        (self.a, self.b)
    }
}

/// Insertion counters of one triangulation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InsertStats {
    pub inserted: usize,
    /// Points coinciding with an existing site (within `eps_dist`).
    pub skipped_duplicates: usize,
}
