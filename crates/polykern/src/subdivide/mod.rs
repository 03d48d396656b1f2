//! Area-bounded recursive subdivision.
//!
//! Purpose
//! - Slice a polygon into convex pieces no larger than a target area, with
//!   seeded jitter on the cut positions so repeated runs over similar shapes
//!   do not produce a regular grid.
//!
//! Model
//! - Concave input is first split into convex pieces (`decompose`); each is
//!   processed independently through one work queue. The decomposition's
//!   own budget outcome is carried onto the result.
//! - A candidate's oriented bounding box gives the cut: a line across the
//!   long axis (parallel to the short axis), at fraction
//!   `0.5 + (u - 0.5) * variation` of the long extent, `u` uniform in [0, 1).
//! - A cut fails when the line does not cross the boundary twice, a piece has
//!   no area, or (snapping off) a piece has an edge shorter than
//!   `min_edge_length`. Failed candidates go to a fallback queue and are cut
//!   once more along the long axis through the box center; when that fails
//!   too, or fallback is off, they are emitted unsplit.
//! - Pieces at or under the threshold `max(max_area, input_area / 10000)` are
//!   emitted; larger ones are requeued.
//!
//! Termination
//! - Every processed candidate costs one iteration out of a budget of
//!   `4 * ceil(input_area / threshold) + 16`. An exhausted budget flushes both
//!   queues to the output and sets `truncated`.

mod slice;

use std::collections::VecDeque;

use rand::Rng;
use tracing::{debug, trace, warn};

use crate::decompose::{decompose_convex, DecomposeCfg};
use crate::error::{Diagnostic, KernelError, Result};
use crate::geom2::rand::ReplayToken;
use crate::geom2::{area, with_winding, GeomCfg, Point, Winding};
use crate::obb::fit_obb;

pub use slice::split_polygon_by_line;

/// Subdivision configuration.
#[derive(Clone, Copy, Debug)]
pub struct SubdivideCfg {
    pub geom: GeomCfg,
    pub max_area: f64,
    pub seed: u64,
    /// Cut jitter in `[0, 1]`; zero always cuts through the box center.
    pub variation: f64,
    /// Shortest acceptable edge; zero disables the check.
    pub min_edge_length: f64,
    /// Move cut crossings within `min_edge_length` of a vertex onto it.
    pub snap_points: bool,
    /// Retry failed cuts once along the long axis.
    pub fallback_long_axis: bool,
    /// Iteration budget; `None` uses the area-derived default, larger values
    /// are clamped to it.
    pub max_iterations: Option<usize>,
    /// Iteration cap handed to the convex decomposition step.
    pub decompose_max_iterations: Option<usize>,
}

impl Default for SubdivideCfg {
    fn default() -> Self {
        Self {
            geom: GeomCfg::default(),
            max_area: 1.0,
            seed: 0,
            variation: 0.0,
            min_edge_length: 0.0,
            snap_points: false,
            fallback_long_axis: true,
            max_iterations: None,
            decompose_max_iterations: None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Subdivision {
    /// CCW convex pieces.
    pub pieces: Vec<Vec<Point>>,
    /// Effective area threshold.
    pub threshold: f64,
    pub iterations: usize,
    pub budget: usize,
    pub truncated: bool,
    /// Candidates emitted above the threshold because no cut worked.
    pub unsplit: usize,
    /// Successful long-axis retries.
    pub fallback_cuts: usize,
    /// The decomposition step ran out of budget; some queued pieces may be
    /// concave and stay whole when no single line cuts them in two.
    pub decompose_truncated: bool,
    /// Residuals the decomposition step could not fan.
    pub decompose_unresolved: usize,
    /// Set when the input was rejected; `pieces` is then empty.
    pub diagnostic: Option<Diagnostic>,
}

impl Subdivision {
    pub fn total_area(&self) -> f64 {
        self.pieces.iter().map(|p| area(p)).sum()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CutKind {
    Across,
    LongAxis,
}

/// Subdivide `poly` until every piece is at most `cfg.max_area` (see the
/// module docs for the exceptions).
pub fn subdivide(poly: &[Point], cfg: SubdivideCfg) -> Result<Subdivision> {
    if poly.len() < 3 {
        return Err(KernelError::TooFewPoints {
            required: 3,
            got: poly.len(),
        });
    }
    if !(cfg.max_area.is_finite() && cfg.max_area > 0.0) {
        return Err(KernelError::InvalidParam(format!("max_area {}", cfg.max_area)));
    }
    if !(0.0..=1.0).contains(&cfg.variation) {
        return Err(KernelError::InvalidParam(format!("variation {}", cfg.variation)));
    }
    if !(cfg.min_edge_length.is_finite() && cfg.min_edge_length >= 0.0) {
        return Err(KernelError::InvalidParam(format!(
            "min_edge_length {}",
            cfg.min_edge_length
        )));
    }
    let g = cfg.geom;

    let convex = decompose_convex(
        poly,
        DecomposeCfg {
            geom: g,
            max_iterations: cfg.decompose_max_iterations,
        },
    );
    if let Some(diag) = convex.diagnostic {
        return Ok(Subdivision {
            diagnostic: Some(diag),
            ..Subdivision::default()
        });
    }
    let total = convex.total_area();
    let threshold = cfg.max_area.max(total / 10_000.0);
    let default_budget = 4 * (total / threshold).ceil() as usize + 16;
    let mut out = Subdivision {
        threshold,
        budget: cfg.max_iterations.map_or(default_budget, |m| m.min(default_budget)),
        decompose_truncated: convex.truncated,
        decompose_unresolved: convex.unresolved,
        ..Subdivision::default()
    };

    let mut rng = ReplayToken::new(cfg.seed).to_std_rng();
    let snap = (cfg.snap_points && cfg.min_edge_length > 0.0).then_some(cfg.min_edge_length);
    let mut queue: VecDeque<Vec<Point>> = convex
        .pieces
        .into_iter()
        .map(|p| with_winding(&p, Winding::CounterClockwise, g.eps_area))
        .collect();
    let mut fallback: VecDeque<Vec<Point>> = VecDeque::new();

    loop {
        let (ring, kind) = match queue.pop_front() {
            Some(r) => (r, CutKind::Across),
            None => match fallback.pop_front() {
                Some(r) => (r, CutKind::LongAxis),
                None => break,
            },
        };
        if area(&ring) <= threshold {
            out.pieces.push(ring);
            continue;
        }
        if out.iterations >= out.budget {
            warn!(
                budget = out.budget,
                remaining = queue.len() + fallback.len() + 1,
                "subdivide: iteration budget exhausted, flushing queue"
            );
            out.truncated = true;
            out.pieces.push(ring);
            out.pieces.extend(queue.drain(..));
            out.pieces.extend(fallback.drain(..));
            break;
        }
        out.iterations += 1;

        // Drawn for every across cut so the stream does not depend on outcomes.
        let u: f64 = if kind == CutKind::Across { rng.gen() } else { 0.5 };
        match cut(&ring, kind, u, cfg, snap) {
            Some((a, b)) => {
                if kind == CutKind::LongAxis {
                    out.fallback_cuts += 1;
                }
                for piece in [a, b] {
                    if area(&piece) <= threshold {
                        out.pieces.push(piece);
                    } else {
                        queue.push_back(piece);
                    }
                }
            }
            None if kind == CutKind::Across && cfg.fallback_long_axis => {
                trace!(len = ring.len(), "subdivide: cut failed, queued for long-axis retry");
                fallback.push_back(ring);
            }
            None => {
                trace!(len = ring.len(), "subdivide: emitting unsplit piece");
                out.unsplit += 1;
                out.pieces.push(ring);
            }
        }
    }
    debug!(
        pieces = out.pieces.len(),
        iterations = out.iterations,
        unsplit = out.unsplit,
        truncated = out.truncated,
        decompose_truncated = out.decompose_truncated,
        "subdivide: done"
    );
    Ok(out)
}

/// One cut of a convex CCW ring; `None` when the result is unusable.
fn cut(
    ring: &[Point],
    kind: CutKind,
    u: f64,
    cfg: SubdivideCfg,
    snap: Option<f64>,
) -> Option<(Vec<Point>, Vec<Point>)> {
    let g = cfg.geom;
    let obb = fit_obb(ring, g).ok()?;
    let (origin, dir) = match kind {
        CutKind::Across => {
            let t = 0.5 + (u - 0.5) * cfg.variation;
            let origin = obb.center + obb.long_axis * ((t - 0.5) * obb.long_extent);
            (origin, obb.short_axis)
        }
        CutKind::LongAxis => (obb.center, obb.long_axis),
    };
    let (a, b) = split_polygon_by_line(ring, origin, dir, g.eps_dist, snap)?;
    if area(&a) <= g.eps_area || area(&b) <= g.eps_area {
        return None;
    }
    if snap.is_none() && cfg.min_edge_length > 0.0 {
        let short = |r: &[Point]| {
            (0..r.len()).any(|k| (r[(k + 1) % r.len()] - r[k]).norm() < cfg.min_edge_length)
        };
        if short(&a) || short(&b) {
            return None;
        }
    }
    Some((a, b))
}

#[cfg(test)]
mod tests;
