//! Ear-cut tessellation of polygons with holes.
//!
//! Purpose
//! - Triangulate an outer ring plus interior hole rings into a flat list of
//!   vertex indices into the concatenated point array (outer first, then each
//!   hole in order). This is the hand-off format for mesh assembly.
//!
//! Model
//! - Rings become one index-addressed circular list (`list.rs`). Holes are
//!   bridged into the outer ring (`holes.rs`), leaving a single hole-free ring.
//! - Ears are clipped in ring order. Above `HASH_THRESHOLD` vertices the ear
//!   test only scans candidates inside the ear's bounding box along a z-order
//!   curve, giving near O(n log n) behaviour.
//! - When no ear is found the ring goes through three recovery passes: drop
//!   degenerate vertices, cure local self-intersections, then split the ring
//!   along a valid diagonal. Passes run from an explicit job stack.
//!
//! Conventions
//! - The outer ring is walked CCW and holes CW, whatever their input
//!   orientation. Clipped ears are emitted CCW.
//! - A hole-free ring of `n` vertices in general position (no duplicate or
//!   collinear consecutive vertices) yields exactly `n - 2` triangles.

mod holes;
mod list;

use tracing::{debug, warn};

use crate::error::{Diagnostic, KernelError, Result};
use crate::geom2::{area, first_self_intersection, GeomCfg, Point};
use list::{in_triangle, NodeArena, NodeId};

/// Rings with more vertices than this use z-order hashed ear tests.
const HASH_THRESHOLD: usize = 80;

/// Tessellation configuration.
#[derive(Clone, Copy, Debug)]
pub struct TessellateCfg {
    pub geom: GeomCfg,
    /// Reject self-intersecting rings up front (O(n²) check).
    pub validate: bool,
}

impl Default for TessellateCfg {
    fn default() -> Self {
        Self {
            geom: GeomCfg::default(),
            validate: true,
        }
    }
}

/// Flat triangle list over the concatenated input points.
#[derive(Clone, Debug, Default)]
pub struct Tessellation {
    /// Outer ring followed by every hole ring.
    pub points: Vec<Point>,
    /// Three indices per triangle into `points`.
    pub indices: Vec<usize>,
    /// Set when validation rejected the input; `indices` is then empty.
    /// Edge numbers are global start indices into `points`.
    pub diagnostic: Option<Diagnostic>,
}

impl Tessellation {
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Sum of triangle areas.
    pub fn area(&self) -> f64 {
        self.triangles()
            .map(|[a, b, c]| area(&[self.points[a], self.points[b], self.points[c]]))
            .sum()
    }
}

/// Triangulate `outer` with `holes` cut out.
///
/// Holes with fewer than three points keep their slots in `points` but are
/// ignored.
pub fn tessellate(outer: &[Point], holes: &[Vec<Point>], cfg: TessellateCfg) -> Result<Tessellation> {
    let mut points = Vec::with_capacity(outer.len() + holes.iter().map(Vec::len).sum::<usize>());
    points.extend_from_slice(outer);
    let mut hole_starts = Vec::with_capacity(holes.len());
    for h in holes {
        hole_starts.push(points.len());
        points.extend_from_slice(h);
    }
    tessellate_flat(points, &hole_starts, cfg)
}

/// Triangulate a flat point array where `hole_starts` gives the first index of
/// each hole ring (strictly increasing, outer ring first).
pub fn tessellate_flat(
    points: Vec<Point>,
    hole_starts: &[usize],
    cfg: TessellateCfg,
) -> Result<Tessellation> {
    let outer_end = hole_starts.first().copied().unwrap_or(points.len());
    if outer_end < 3 {
        return Err(KernelError::TooFewPoints {
            required: 3,
            got: outer_end,
        });
    }
    let mut prev = outer_end;
    for &s in hole_starts {
        if s < prev || s > points.len() {
            return Err(KernelError::InvalidParam(format!(
                "hole start {s} out of order or beyond {} points",
                points.len()
            )));
        }
        prev = s;
    }
    let ranges: Vec<(usize, usize)> = hole_starts
        .iter()
        .enumerate()
        .map(|(k, &s)| (s, hole_starts.get(k + 1).copied().unwrap_or(points.len())))
        .collect();

    if cfg.validate {
        let rings = std::iter::once((0, outer_end)).chain(ranges.iter().copied());
        for (start, end) in rings {
            if end - start < 4 {
                continue;
            }
            if let Some((a, b)) = first_self_intersection(&points[start..end], cfg.geom.eps_det) {
                let diag = Diagnostic::SelfIntersecting {
                    first: start + a,
                    second: start + b,
                };
                warn!(?diag, "tessellate: self-intersecting ring rejected");
                return Ok(Tessellation {
                    points,
                    indices: Vec::new(),
                    diagnostic: Some(diag),
                });
            }
        }
    }

    let mut arena = NodeArena::with_capacity(points.len());
    let mut indices = Vec::with_capacity(points.len().saturating_sub(2) * 3);
    let Some(mut outer) = arena.ring_from(&points, 0, outer_end, true) else {
        return Ok(Tessellation {
            points,
            indices,
            diagnostic: None,
        });
    };
    if arena.next(outer) == arena.prev(outer) {
        return Ok(Tessellation {
            points,
            indices,
            diagnostic: None,
        });
    }
    let hole_ranges: Vec<(usize, usize)> = ranges.into_iter().filter(|(s, e)| e - s >= 3).collect();
    if !hole_ranges.is_empty() {
        outer = holes::eliminate_holes(&mut arena, &points, &hole_ranges, outer);
    }

    let hash = (points.len() > HASH_THRESHOLD).then(|| ZHash::new(&points[..outer_end]));
    clip_ears(&mut arena, outer, hash, &mut indices);

    for &i in &indices {
        debug_assert!(i < points.len(), "triangle index {i} beyond {} points", points.len());
        if i >= points.len() {
            return Err(KernelError::IndexOutOfRange {
                index: i,
                len: points.len(),
            });
        }
    }
    debug!(
        points = points.len(),
        holes = hole_starts.len(),
        triangles = indices.len() / 3,
        "tessellate: done"
    );
    Ok(Tessellation {
        points,
        indices,
        diagnostic: None,
    })
}

/// Z-order curve parameters (bounding box origin and inverse cell size).
#[derive(Clone, Copy, Debug)]
struct ZHash {
    min: Point,
    inv_size: f64,
}

impl ZHash {
    fn new(outer: &[Point]) -> Self {
        let mut min = outer[0];
        let mut max = outer[0];
        for p in outer {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        let size = (max.x - min.x).max(max.y - min.y);
        Self {
            min,
            inv_size: if size != 0.0 { 32767.0 / size } else { 0.0 },
        }
    }

    /// Interleave the bits of the quantized coordinates.
    fn z(&self, p: Point) -> u32 {
        let spread = |v: f64| -> u32 {
            let mut x = (v * self.inv_size) as u32;
            x = (x | (x << 8)) & 0x00FF_00FF;
            x = (x | (x << 4)) & 0x0F0F_0F0F;
            x = (x | (x << 2)) & 0x3333_3333;
            (x | (x << 1)) & 0x5555_5555
        };
        spread(p.x - self.min.x) | (spread(p.y - self.min.y) << 1)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pass {
    Plain,
    Filtered,
    Cured,
}

fn clip_ears(arena: &mut NodeArena, start: NodeId, hash: Option<ZHash>, out: &mut Vec<usize>) {
    let mut jobs: Vec<(NodeId, Pass)> = vec![(start, Pass::Plain)];
    while let Some((mut ear, pass)) = jobs.pop() {
        if pass == Pass::Plain {
            if let Some(h) = hash {
                index_curve(arena, ear, &h);
            }
        }
        let mut stop = ear;
        while arena.prev(ear) != arena.next(ear) {
            let prev = arena.prev(ear);
            let next = arena.next(ear);
            let is_ear = match hash {
                Some(h) => is_ear_hashed(arena, ear, &h),
                None => is_ear(arena, ear),
            };
            if is_ear {
                out.extend([arena.nodes[prev].i, arena.nodes[ear].i, arena.nodes[next].i]);
                arena.remove(ear);
                ear = arena.next(next);
                stop = ear;
                continue;
            }
            ear = next;
            if ear == stop {
                match pass {
                    Pass::Plain => {
                        let filtered = arena.filter_points(ear, None);
                        jobs.push((filtered, Pass::Filtered));
                    }
                    Pass::Filtered => {
                        let filtered = arena.filter_points(ear, None);
                        let cured = cure_local_intersections(arena, filtered, out);
                        jobs.push((cured, Pass::Cured));
                    }
                    Pass::Cured => {
                        if let Some((a, c)) = split_ring(arena, ear) {
                            jobs.push((c, Pass::Plain));
                            jobs.push((a, Pass::Plain));
                        }
                    }
                }
                break;
            }
        }
    }
}

fn is_ear(arena: &NodeArena, ear: NodeId) -> bool {
    let (a, b, c) = (arena.prev(ear), ear, arena.next(ear));
    if arena.turn(a, b, c) <= 0.0 {
        return false;
    }
    let (pa, pb, pc) = (arena.p(a), arena.p(b), arena.p(c));
    let (x0, x1) = (pa.x.min(pb.x).min(pc.x), pa.x.max(pb.x).max(pc.x));
    let (y0, y1) = (pa.y.min(pb.y).min(pc.y), pa.y.max(pb.y).max(pc.y));
    let mut p = arena.next(c);
    while p != a {
        let pp = arena.p(p);
        if pp.x >= x0
            && pp.x <= x1
            && pp.y >= y0
            && pp.y <= y1
            && in_triangle(pa, pb, pc, pp)
            && arena.turn(arena.prev(p), p, arena.next(p)) <= 0.0
        {
            return false;
        }
        p = arena.next(p);
    }
    true
}

fn is_ear_hashed(arena: &NodeArena, ear: NodeId, h: &ZHash) -> bool {
    let (a, b, c) = (arena.prev(ear), ear, arena.next(ear));
    if arena.turn(a, b, c) <= 0.0 {
        return false;
    }
    let (pa, pb, pc) = (arena.p(a), arena.p(b), arena.p(c));
    let (x0, x1) = (pa.x.min(pb.x).min(pc.x), pa.x.max(pb.x).max(pc.x));
    let (y0, y1) = (pa.y.min(pb.y).min(pc.y), pa.y.max(pb.y).max(pc.y));
    let min_z = h.z(Point::new(x0, y0));
    let max_z = h.z(Point::new(x1, y1));

    let blocks = |n: NodeId| -> bool {
        let pp = arena.p(n);
        n != a
            && n != c
            && pp.x >= x0
            && pp.x <= x1
            && pp.y >= y0
            && pp.y <= y1
            && in_triangle(pa, pb, pc, pp)
            && arena.turn(arena.prev(n), n, arena.next(n)) <= 0.0
    };

    let mut p = arena.nodes[ear].prev_z;
    let mut n = arena.nodes[ear].next_z;
    // Walk both directions of the z-order list while inside [min_z, max_z].
    while let (Some(pi), Some(ni)) = (p, n) {
        if arena.nodes[pi].z < min_z || arena.nodes[ni].z > max_z {
            break;
        }
        if blocks(pi) {
            return false;
        }
        p = arena.nodes[pi].prev_z;
        if blocks(ni) {
            return false;
        }
        n = arena.nodes[ni].next_z;
    }
    while let Some(pi) = p {
        if arena.nodes[pi].z < min_z {
            break;
        }
        if blocks(pi) {
            return false;
        }
        p = arena.nodes[pi].prev_z;
    }
    while let Some(ni) = n {
        if arena.nodes[ni].z > max_z {
            break;
        }
        if blocks(ni) {
            return false;
        }
        n = arena.nodes[ni].next_z;
    }
    true
}

/// Triangulate away local `a → p → p.next → b` self-intersections.
fn cure_local_intersections(arena: &mut NodeArena, start: NodeId, out: &mut Vec<usize>) -> NodeId {
    let mut start = start;
    let mut p = start;
    loop {
        let a = arena.prev(p);
        let pn = arena.next(p);
        let b = arena.next(pn);
        if !arena.equals(a, b)
            && arena.intersects(a, p, pn, b)
            && arena.locally_inside(a, b)
            && arena.locally_inside(b, a)
        {
            out.extend([arena.nodes[a].i, arena.nodes[p].i, arena.nodes[b].i]);
            arena.remove(p);
            arena.remove(pn);
            p = b;
            start = b;
        }
        p = arena.next(p);
        if p == start {
            break;
        }
    }
    arena.filter_points(p, None)
}

/// Split the ring along the first valid diagonal; both halves are cleaned.
fn split_ring(arena: &mut NodeArena, start: NodeId) -> Option<(NodeId, NodeId)> {
    let mut a = start;
    loop {
        let mut b = arena.next(arena.next(a));
        while b != arena.prev(a) {
            if arena.nodes[a].i != arena.nodes[b].i && arena.is_valid_diagonal(a, b) {
                let c = arena.split(a, b);
                let an = arena.next(a);
                let a = arena.filter_points(a, Some(an));
                let cn = arena.next(c);
                let c = arena.filter_points(c, Some(cn));
                return Some((a, c));
            }
            b = arena.next(b);
        }
        a = arena.next(a);
        if a == start {
            return None;
        }
    }
}

/// Link the ring through `start` in z-order (merge sort over `next_z`).
fn index_curve(arena: &mut NodeArena, start: NodeId, h: &ZHash) {
    let mut p = start;
    loop {
        if arena.nodes[p].z == 0 {
            arena.nodes[p].z = h.z(arena.p(p));
        }
        arena.nodes[p].prev_z = Some(arena.prev(p));
        arena.nodes[p].next_z = Some(arena.next(p));
        p = arena.next(p);
        if p == start {
            break;
        }
    }
    let tail = arena.prev(p);
    arena.nodes[tail].next_z = None;
    arena.nodes[p].prev_z = None;
    sort_linked(arena, p);
}

/// Simon Tatham's linked-list merge sort on the z-order links.
fn sort_linked(arena: &mut NodeArena, list: NodeId) {
    let mut list = Some(list);
    let mut in_size = 1usize;
    loop {
        let mut p = list;
        list = None;
        let mut tail: Option<NodeId> = None;
        let mut merges = 0;
        while p.is_some() {
            merges += 1;
            let mut q = p;
            let mut p_size = 0;
            for _ in 0..in_size {
                p_size += 1;
                q = q.and_then(|n| arena.nodes[n].next_z);
                if q.is_none() {
                    break;
                }
            }
            let mut q_size = in_size;
            loop {
                let e = match (p, q) {
                    (Some(pn), Some(qn)) if p_size > 0 && q_size > 0 => {
                        if arena.nodes[pn].z <= arena.nodes[qn].z {
                            p = arena.nodes[pn].next_z;
                            p_size -= 1;
                            pn
                        } else {
                            q = arena.nodes[qn].next_z;
                            q_size -= 1;
                            qn
                        }
                    }
                    (Some(pn), _) if p_size > 0 => {
                        p = arena.nodes[pn].next_z;
                        p_size -= 1;
                        pn
                    }
                    (_, Some(qn)) if q_size > 0 => {
                        q = arena.nodes[qn].next_z;
                        q_size -= 1;
                        qn
                    }
                    _ => break,
                };
                match tail {
                    Some(t) => arena.nodes[t].next_z = Some(e),
                    None => list = Some(e),
                }
                arena.nodes[e].prev_z = tail;
                tail = Some(e);
            }
            p = q;
        }
        if let Some(t) = tail {
            arena.nodes[t].next_z = None;
        }
        in_size *= 2;
        if merges <= 1 {
            break;
        }
    }
}

#[cfg(test)]
mod tests;
