//! Delaunay triangulation (Bowyer–Watson), Lloyd relaxation and Voronoi cells.
//!
//! Purpose
//! - Triangulate a point set inside a rectangle, optionally even out the site
//!   distribution with Lloyd steps, and derive the dual Voronoi cells.
//!
//! Model
//! - The rectangle's four corners are the first sites and start as two
//!   triangles sharing the `min`–`max` diagonal. Sites are inserted one at a
//!   time: triangles whose circumcircle strictly contains the new site are
//!   removed and the cavity is re-filled with a fan from the site.
//! - Triangles live in an arena indexed by `TriangleId`; each site keeps the
//!   set of incident triangle ids, updated only when a triangle is attached
//!   or detached.
//! - Insertion scans every live triangle, so a run is O(n²). Iteration orders
//!   are fixed (ascending ids, `BTreeMap`/`BTreeSet`), so identical inputs give
//!   identical graphs.
//!
//! Conventions
//! - Triangles are stored CCW with their circumcircle cached at construction.
//! - Collinear triangles fail with `KernelError::DegenerateTriangle`.
//! - Sites within `eps_dist` of an existing site are skipped and counted.

mod graph;
mod relax;
mod types;
mod voronoi;

use tracing::debug;

use crate::error::{KernelError, Result};
use crate::geom2::rand::{sample_points_in_rect, ReplayToken};
use crate::geom2::{GeomCfg, Point, Rect};

pub use graph::{DelaunayGraph, CORNERS};
pub use relax::{relax, relax_once};
pub use types::{DelaunayEdge, DelaunayPoint, DelaunayTriangle, InsertStats, PointId, TriangleId};
pub use voronoi::VoronoiCell;

/// Triangulation configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct DelaunayCfg {
    pub geom: GeomCfg,
    /// Lloyd steps applied after the initial build.
    pub relax_iterations: usize,
}

/// Where the sites come from.
#[derive(Clone, Debug)]
pub enum DelaunayInput {
    /// `count` seeded uniform sites inside `[0, width] × [0, height]`.
    Synthetic {
        count: usize,
        width: f64,
        height: f64,
        seed: u64,
    },
    /// Explicit sites. Without `bounds` the tight bounding box is used.
    Points {
        points: Vec<Point>,
        bounds: Option<Rect>,
    },
}

/// Build the triangulation, then relax it `cfg.relax_iterations` times.
pub fn triangulate(input: DelaunayInput, cfg: DelaunayCfg) -> Result<DelaunayGraph> {
    let (points, bounds) = match input {
        DelaunayInput::Synthetic {
            count,
            width,
            height,
            seed,
        } => {
            if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
                return Err(KernelError::InvalidParam(format!(
                    "synthetic bounds must be positive and finite, got {width} x {height}"
                )));
            }
            let rect = Rect::from_size(width, height);
            (sample_points_in_rect(count, rect, ReplayToken::new(seed)), rect)
        }
        DelaunayInput::Points { points, bounds } => {
            let rect = match bounds {
                Some(r) => r,
                None => Rect::bounding(&points).ok_or(KernelError::TooFewPoints {
                    required: 1,
                    got: 0,
                })?,
            };
            (points, rect)
        }
    };
    let eps = cfg.geom.eps_dist;
    if let Some(index) = points
        .iter()
        .position(|p| !p.x.is_finite() || !p.y.is_finite() || !bounds.contains_eps(*p, eps))
    {
        return Err(KernelError::OutOfBounds { index });
    }

    let mut graph = DelaunayGraph::new(bounds, cfg.geom)?;
    for &p in &points {
        graph.insert(p)?;
    }
    let stats = graph.stats();
    debug!(
        inserted = stats.inserted,
        skipped = stats.skipped_duplicates,
        triangles = graph.triangle_count(),
        "delaunay: built"
    );
    relax(graph, cfg.relax_iterations)
}
