//! Voronoi cells as the dual of the triangulation.
//!
//! A site's cell is the ring of circumcenters of its incident triangles,
//! ordered by angle around the site. For sites whose neighbours are collinear
//! or cocircular several circumcenters coincide or tie in angle; their
//! relative order is then unspecified (ties keep ascending triangle id order)
//! and the ring may be degenerate.
//!
//! Sites on the bounds have unbounded cells. Each border edge leaving such a
//! site contributes one far point on its outward Voronoi ray, placed beyond
//! the bounds, so the ring is exact once clipped to the bounds.

use std::collections::BTreeSet;

use super::graph::DelaunayGraph;
use super::types::PointId;
use crate::geom2::{approx_eq, clip_to_rect, Point};

#[derive(Clone, Debug, PartialEq)]
pub struct VoronoiCell {
    pub site: PointId,
    pub position: Point,
    /// Cell ring in ascending angle around `position` (CCW).
    pub vertices: Vec<Point>,
}

impl DelaunayGraph {
    /// Unclipped cell of one site.
    pub fn voronoi_cell(&self, id: PointId) -> VoronoiCell {
        let site = self.point(id).pos;
        let bounds = self.bounds();
        let eps = self.geom().eps_dist;

        let mut ring: Vec<Point> = self.incident(id).map(|t| t.circumcenter).collect();
        if bounds.on_border(site, eps) {
            let reach = bounds.width() + bounds.height();
            let mut seen = BTreeSet::new();
            for t in self.incident(id) {
                for v in t.v {
                    if v == id || !seen.insert(v) {
                        continue;
                    }
                    // A border edge has exactly one incident triangle: this one.
                    if let Some(out) = self.border_outward(site, self.point(v).pos) {
                        let c = t.circumcenter;
                        ring.push(c + out * (reach + (c - site).norm()));
                    }
                }
            }
        }

        let mut keyed: Vec<(f64, Point)> = ring
            .into_iter()
            .map(|c| {
                let d = c - site;
                (d.y.atan2(d.x), c)
            })
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut vertices: Vec<Point> = Vec::with_capacity(keyed.len());
        for (_, c) in keyed {
            if vertices.last().map_or(true, |&l| !approx_eq(l, c, eps)) {
                vertices.push(c);
            }
        }
        if vertices.len() > 1 && approx_eq(vertices[0], vertices[vertices.len() - 1], eps) {
            vertices.pop();
        }
        VoronoiCell {
            site: id,
            position: site,
            vertices,
        }
    }

    /// Cells of every site, corners included. With `clip`, each cell is
    /// intersected with the bounding rectangle.
    pub fn voronoi_cells(&self, clip: bool) -> Vec<VoronoiCell> {
        let bounds = self.bounds();
        (0..self.points().len())
            .map(|k| {
                let mut cell = self.voronoi_cell(PointId(k));
                if clip {
                    cell.vertices = clip_to_rect(&cell.vertices, &bounds);
                }
                cell
            })
            .collect()
    }
}
