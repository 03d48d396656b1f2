//! Hole elimination: bridge every hole into the outer ring.
//!
//! Holes are processed by increasing x of their leftmost vertex. For each
//! hole a leftward horizontal ray from its leftmost vertex finds the nearest
//! crossing outer edge; the endpoint of that edge with the smaller x is the
//! first bridge candidate. Reflex outer vertices inside the triangle spanned by
//! the hole point, the ray hit and the candidate can block the bridge; among
//! them the one with the smallest tangent angle to the ray wins (ties: larger
//! x, then sector containment). The hole is spliced in with a doubled bridge
//! edge and both sides are cleaned of degenerate vertices.

use tracing::trace;

use super::list::{in_triangle, NodeArena, NodeId};
use crate::geom2::Point;

/// Splice every hole ring into the ring through `outer`. `ranges` are
/// `[start, end)` slices of the concatenated point array.
pub(super) fn eliminate_holes(
    arena: &mut NodeArena,
    points: &[Point],
    ranges: &[(usize, usize)],
    mut outer: NodeId,
) -> NodeId {
    let mut queue: Vec<NodeId> = Vec::with_capacity(ranges.len());
    for &(start, end) in ranges {
        let Some(list) = arena.ring_from(points, start, end, false) else {
            continue;
        };
        if list == arena.next(list) {
            arena.nodes[list].steiner = true;
        }
        queue.push(arena.leftmost(list));
    }
    queue.sort_by(|&a, &b| {
        arena
            .p(a)
            .x
            .partial_cmp(&arena.p(b).x)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for hole in queue {
        outer = eliminate_hole(arena, hole, outer);
    }
    outer
}

fn eliminate_hole(arena: &mut NodeArena, hole: NodeId, outer: NodeId) -> NodeId {
    let Some(bridge) = find_hole_bridge(arena, hole, outer) else {
        trace!(hole = arena.nodes[hole].i, "no bridge found, hole dropped");
        return outer;
    };
    let bridge_reverse = arena.split(bridge, hole);
    let next = arena.next(bridge_reverse);
    arena.filter_points(bridge_reverse, Some(next));
    let next = arena.next(bridge);
    arena.filter_points(bridge, Some(next))
}

/// Outer-ring vertex that can see the hole's leftmost vertex `hole`.
fn find_hole_bridge(arena: &NodeArena, hole: NodeId, outer: NodeId) -> Option<NodeId> {
    let h = arena.p(hole);
    let mut p = outer;
    let mut qx = f64::NEG_INFINITY;
    let mut m: Option<NodeId> = None;

    // Nearest edge crossed by the leftward ray y = h.y, x < h.x.
    loop {
        let (pp, pn) = (arena.p(p), arena.p(arena.next(p)));
        if h.y <= pp.y && h.y >= pn.y && pn.y != pp.y {
            let x = pp.x + (h.y - pp.y) * (pn.x - pp.x) / (pn.y - pp.y);
            if x <= h.x && x > qx {
                qx = x;
                let cand = if pp.x < pn.x { p } else { arena.next(p) };
                if x == h.x {
                    // The hole touches the outer edge.
                    return Some(cand);
                }
                m = Some(cand);
            }
        }
        p = arena.next(p);
        if p == outer {
            break;
        }
    }
    let mut m = m?;

    // Reflex vertices inside triangle (hole, ray hit, m) can block the view;
    // pick the one with the smallest angle to the ray.
    let stop = m;
    let mp = arena.p(m);
    let mut tan_min = f64::INFINITY;
    p = m;
    loop {
        let pp = arena.p(p);
        let (a, c) = if h.y < mp.y {
            (Point::new(h.x, h.y), Point::new(qx, h.y))
        } else {
            (Point::new(qx, h.y), Point::new(h.x, h.y))
        };
        if h.x >= pp.x && pp.x >= mp.x && h.x != pp.x && in_triangle(a, mp, c, pp) {
            let tan = (h.y - pp.y).abs() / (h.x - pp.x);
            let mcur = arena.p(m);
            if arena.locally_inside(p, hole)
                && (tan < tan_min
                    || (tan == tan_min
                        && (pp.x > mcur.x || (pp.x == mcur.x && sector_contains_sector(arena, m, p)))))
            {
                m = p;
                tan_min = tan;
            }
        }
        p = arena.next(p);
        if p == stop {
            break;
        }
    }
    Some(m)
}

/// The sector at `m` contains the sector at `p` (both on the outer ring).
fn sector_contains_sector(arena: &NodeArena, m: NodeId, p: NodeId) -> bool {
    arena.turn(arena.prev(m), m, arena.prev(p)) > 0.0 && arena.turn(arena.next(p), m, arena.next(m)) > 0.0
}
