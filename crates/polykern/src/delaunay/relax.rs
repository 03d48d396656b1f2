//! Lloyd relaxation: move sites to their clipped Voronoi centroids and rebuild.

use tracing::debug;

use super::graph::{DelaunayGraph, CORNERS};
use super::types::PointId;
use crate::error::Result;
use crate::geom2::{centroid, clip_to_rect};

/// One relaxation step.
///
/// Every non-corner site moves to the area centroid of its Voronoi cell
/// clipped to the bounds (unchanged when the clipped cell is degenerate), then
/// a fresh triangulation is built from the moved sites in their old order.
pub fn relax_once(graph: &DelaunayGraph) -> Result<DelaunayGraph> {
    let bounds = graph.bounds();
    let mut next = DelaunayGraph::new(bounds, graph.geom())?;
    for k in CORNERS..graph.points().len() {
        let cell = graph.voronoi_cell(PointId(k));
        let clipped = clip_to_rect(&cell.vertices, &bounds);
        let target = centroid(&clipped).map_or(cell.position, |c| bounds.clamp(c));
        next.insert(target)?;
    }
    Ok(next)
}

/// `iterations` relaxation steps.
pub fn relax(graph: DelaunayGraph, iterations: usize) -> Result<DelaunayGraph> {
    let mut g = graph;
    for it in 0..iterations {
        g = relax_once(&g)?;
        debug!(iteration = it + 1, sites = g.points().len(), "delaunay: relaxed");
    }
    Ok(g)
}
