//! Index-addressed circular doubly-linked vertex list.
//!
//! Nodes live in one `Vec`; `prev`/`next` (ring order) and `prev_z`/`next_z`
//! (z-order) are indices into it. Removing a node unlinks it but never frees
//! the slot, so indices stay valid for the whole tessellation.

use crate::geom2::{turn, Point};

pub(super) type NodeId = usize;

#[derive(Clone, Debug)]
pub(super) struct Node {
    /// Index into the concatenated input point array.
    pub i: usize,
    pub p: Point,
    pub prev: NodeId,
    pub next: NodeId,
    pub z: u32,
    pub prev_z: Option<NodeId>,
    pub next_z: Option<NodeId>,
    /// Single-point hole; never filtered away.
    pub steiner: bool,
}

#[derive(Clone, Debug, Default)]
pub(super) struct NodeArena {
    pub nodes: Vec<Node>,
}

impl NodeArena {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(n * 3 / 2 + 8),
        }
    }

    #[inline]
    pub fn p(&self, id: NodeId) -> Point {
        self.nodes[id].p
    }
    #[inline]
    pub fn next(&self, id: NodeId) -> NodeId {
        self.nodes[id].next
    }
    #[inline]
    pub fn prev(&self, id: NodeId) -> NodeId {
        self.nodes[id].prev
    }

    fn push(&mut self, i: usize, p: Point) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            i,
            p,
            prev: id,
            next: id,
            z: 0,
            prev_z: None,
            next_z: None,
            steiner: false,
        });
        id
    }

    /// Insert a new node after `last` (or as a one-node ring).
    pub fn insert_after(&mut self, i: usize, p: Point, last: Option<NodeId>) -> NodeId {
        let id = self.push(i, p);
        if let Some(last) = last {
            let after = self.nodes[last].next;
            self.nodes[id].next = after;
            self.nodes[id].prev = last;
            self.nodes[after].prev = id;
            self.nodes[last].next = id;
        }
        id
    }

    pub fn remove(&mut self, id: NodeId) {
        let Node {
            prev,
            next,
            prev_z,
            next_z,
            ..
        } = self.nodes[id];
        self.nodes[next].prev = prev;
        self.nodes[prev].next = next;
        if let Some(pz) = prev_z {
            self.nodes[pz].next_z = next_z;
        }
        if let Some(nz) = next_z {
            self.nodes[nz].prev_z = prev_z;
        }
    }

    /// Build a ring from `points[start..end]` (global indices) in the requested
    /// orientation. Returns the last inserted node.
    pub fn ring_from(
        &mut self,
        points: &[Point],
        start: usize,
        end: usize,
        ccw: bool,
    ) -> Option<NodeId> {
        let slice = &points[start..end];
        let forward = (crate::geom2::signed_area(slice) > 0.0) == ccw;
        let mut last: Option<NodeId> = None;
        if forward {
            for (k, &p) in slice.iter().enumerate() {
                last = Some(self.insert_after(start + k, p, last));
            }
        } else {
            for (k, &p) in slice.iter().enumerate().rev() {
                last = Some(self.insert_after(start + k, p, last));
            }
        }
        let last = last?;
        if self.equals(last, self.next(last)) {
            let nxt = self.next(last);
            self.remove(last);
            return Some(nxt);
        }
        Some(last)
    }

    #[inline]
    pub fn equals(&self, a: NodeId, b: NodeId) -> bool {
        self.p(a) == self.p(b)
    }

    /// Turn at `b` for `a → b → c` (positive = left/CCW).
    #[inline]
    pub fn turn(&self, a: NodeId, b: NodeId, c: NodeId) -> f64 {
        turn(self.p(a), self.p(b), self.p(c))
    }

    /// Remove duplicate and collinear nodes between `start` and `end`.
    pub fn filter_points(&mut self, start: NodeId, end: Option<NodeId>) -> NodeId {
        let mut end = end.unwrap_or(start);
        let mut p = start;
        loop {
            let mut again = false;
            let (prev, next) = (self.prev(p), self.next(p));
            if !self.nodes[p].steiner && (self.equals(p, next) || self.turn(prev, p, next) == 0.0) {
                self.remove(p);
                p = prev;
                end = prev;
                if p == self.next(p) {
                    break;
                }
                again = true;
            } else {
                p = next;
            }
            if !again && p == end {
                break;
            }
        }
        end
    }

    /// Link `a` and `b` with a bridge, splitting the ring in two. Returns the
    /// duplicate of `b` that heads the second ring.
    pub fn split(&mut self, a: NodeId, b: NodeId) -> NodeId {
        let (ai, ap) = (self.nodes[a].i, self.p(a));
        let (bi, bp) = (self.nodes[b].i, self.p(b));
        let a2 = self.push(ai, ap);
        let b2 = self.push(bi, bp);
        let an = self.next(a);
        let bprev = self.prev(b);

        self.nodes[a].next = b;
        self.nodes[b].prev = a;

        self.nodes[a2].next = an;
        self.nodes[an].prev = a2;

        self.nodes[b2].next = a2;
        self.nodes[a2].prev = b2;

        self.nodes[bprev].next = b2;
        self.nodes[b2].prev = bprev;
        b2
    }

    /// Segments `p1q1` and `p2q2` intersect (touching counts).
    pub fn intersects(&self, p1: NodeId, q1: NodeId, p2: NodeId, q2: NodeId) -> bool {
        let o1 = sign(self.turn(p1, q1, p2));
        let o2 = sign(self.turn(p1, q1, q2));
        let o3 = sign(self.turn(p2, q2, p1));
        let o4 = sign(self.turn(p2, q2, q1));
        if o1 != o2 && o3 != o4 {
            return true;
        }
        (o1 == 0 && on_segment(self.p(p1), self.p(p2), self.p(q1)))
            || (o2 == 0 && on_segment(self.p(p1), self.p(q2), self.p(q1)))
            || (o3 == 0 && on_segment(self.p(p2), self.p(p1), self.p(q2)))
            || (o4 == 0 && on_segment(self.p(p2), self.p(q1), self.p(q2)))
    }

    /// The diagonal `a → b` starts inside the polygon's local sector at `a`.
    pub fn locally_inside(&self, a: NodeId, b: NodeId) -> bool {
        let (ap, an) = (self.prev(a), self.next(a));
        if self.turn(ap, a, an) > 0.0 {
            self.turn(a, b, an) <= 0.0 && self.turn(a, ap, b) <= 0.0
        } else {
            self.turn(a, b, ap) > 0.0 || self.turn(a, an, b) > 0.0
        }
    }

    /// The midpoint of `a–b` lies inside the ring containing `a`.
    pub fn middle_inside(&self, a: NodeId, b: NodeId) -> bool {
        let m = (self.p(a) + self.p(b)) * 0.5;
        let mut p = a;
        let mut inside = false;
        loop {
            let (pp, pn) = (self.p(p), self.p(self.next(p)));
            if (pp.y > m.y) != (pn.y > m.y)
                && pn.y != pp.y
                && m.x < (pn.x - pp.x) * (m.y - pp.y) / (pn.y - pp.y) + pp.x
            {
                inside = !inside;
            }
            p = self.next(p);
            if p == a {
                break;
            }
        }
        inside
    }

    /// The diagonal `a–b` crosses some edge of the ring.
    pub fn intersects_polygon(&self, a: NodeId, b: NodeId) -> bool {
        let (ai, bi) = (self.nodes[a].i, self.nodes[b].i);
        let mut p = a;
        loop {
            let n = self.next(p);
            let (pi, ni) = (self.nodes[p].i, self.nodes[n].i);
            if pi != ai && ni != ai && pi != bi && ni != bi && self.intersects(p, n, a, b) {
                return true;
            }
            p = n;
            if p == a {
                return false;
            }
        }
    }

    /// A diagonal that splits the ring into two valid rings.
    pub fn is_valid_diagonal(&self, a: NodeId, b: NodeId) -> bool {
        let bi = self.nodes[b].i;
        let (an, ap) = (self.next(a), self.prev(a));
        let (bn, bp) = (self.next(b), self.prev(b));
        if self.nodes[an].i == bi || self.nodes[ap].i == bi || self.intersects_polygon(a, b) {
            return false;
        }
        (self.locally_inside(a, b)
            && self.locally_inside(b, a)
            && self.middle_inside(a, b)
            && (self.turn(ap, a, bp) != 0.0 || self.turn(a, bp, b) != 0.0))
            || (self.equals(a, b) && self.turn(ap, a, an) < 0.0 && self.turn(bp, b, bn) < 0.0)
    }

    /// Leftmost (then lowest) node of the ring through `start`.
    pub fn leftmost(&self, start: NodeId) -> NodeId {
        let mut p = start;
        let mut best = start;
        loop {
            let (pp, bp) = (self.p(p), self.p(best));
            if pp.x < bp.x || (pp.x == bp.x && pp.y < bp.y) {
                best = p;
            }
            p = self.next(p);
            if p == start {
                return best;
            }
        }
    }
}

/// Closed containment in a CCW triangle `abc`.
#[inline]
pub(super) fn in_triangle(a: Point, b: Point, c: Point, p: Point) -> bool {
    (c.x - p.x) * (a.y - p.y) >= (a.x - p.x) * (c.y - p.y)
        && (a.x - p.x) * (b.y - p.y) >= (b.x - p.x) * (a.y - p.y)
        && (b.x - p.x) * (c.y - p.y) >= (c.x - p.x) * (b.y - p.y)
}

#[inline]
fn sign(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// `q` lies within the bounding box of `p` and `r` (collinearity assumed).
#[inline]
fn on_segment(p: Point, q: Point, r: Point) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}
