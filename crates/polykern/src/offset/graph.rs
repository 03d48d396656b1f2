//! Index-addressed polygon graph used to cut a self-intersecting ring apart.
//!
//! Nodes hold a position and their incident edges sorted by the angle of the
//! ray leaving the node along each edge. Edges are directed and may be split
//! at a node, which replaces them by two edges. Closed loops are traced by
//! leaving every node through the outgoing edge angularly adjacent to the
//! edge we arrived on, so a crossing splits into two loops instead of being
//! walked straight through.

use crate::geom2::{approx_eq, Point};

pub(super) type NodeId = usize;
pub(super) type EdgeId = usize;

#[derive(Clone, Debug)]
struct Node {
    pos: Point,
    /// Incident edges (in and out), ascending by ray angle.
    edges: Vec<EdgeId>,
}

#[derive(Clone, Copy, Debug)]
struct Edge {
    from: NodeId,
    to: NodeId,
}

#[derive(Clone, Debug, Default)]
pub(super) struct PolyGraph {
    nodes: Vec<Node>,
    edges: Vec<Option<Edge>>,
}

impl PolyGraph {
    /// One node per vertex and one edge per ring edge (`k → k+1`).
    pub fn from_ring(ring: &[Point]) -> Self {
        let n = ring.len();
        let mut g = Self {
            nodes: ring
                .iter()
                .map(|&pos| Node {
                    pos,
                    edges: Vec::with_capacity(2),
                })
                .collect(),
            edges: Vec::with_capacity(n + 4),
        };
        for k in 0..n {
            g.add_edge(k, (k + 1) % n);
        }
        g
    }

    fn add_node(&mut self, pos: Point) -> NodeId {
        self.nodes.push(Node {
            pos,
            edges: Vec::with_capacity(4),
        });
        self.nodes.len() - 1
    }

    fn add_edge(&mut self, from: NodeId, to: NodeId) -> EdgeId {
        let id = self.edges.len();
        self.edges.push(Some(Edge { from, to }));
        self.attach(from, id);
        self.attach(to, id);
        id
    }

    fn edge(&self, id: EdgeId) -> Edge {
        match self.edges[id] {
            Some(e) => e,
            None => unreachable!("edge {id} was split away"),
        }
    }

    /// Angle of the ray leaving `node` along `edge`.
    fn ray_angle(&self, node: NodeId, edge: EdgeId) -> f64 {
        let e = self.edge(edge);
        let other = if e.from == node { e.to } else { e.from };
        let d = self.nodes[other].pos - self.nodes[node].pos;
        d.y.atan2(d.x)
    }

    fn attach(&mut self, node: NodeId, edge: EdgeId) {
        let a = self.ray_angle(node, edge);
        let pos = self.nodes[node]
            .edges
            .iter()
            .position(|&e| self.ray_angle(node, e) > a)
            .unwrap_or(self.nodes[node].edges.len());
        self.nodes[node].edges.insert(pos, edge);
    }

    fn detach(&mut self, node: NodeId, edge: EdgeId) {
        self.nodes[node].edges.retain(|&e| e != edge);
    }

    /// Replace `edge` by `from → node → to`.
    pub fn split_edge(&mut self, edge: EdgeId, node: NodeId) -> (EdgeId, EdgeId) {
        let Edge { from, to } = self.edge(edge);
        self.detach(from, edge);
        self.detach(to, edge);
        self.edges[edge] = None;
        (self.add_edge(from, node), self.add_edge(node, to))
    }

    /// Move every edge of `from` onto `into` and orphan `from`.
    fn merge(&mut self, from: NodeId, into: NodeId) {
        let moved = std::mem::take(&mut self.nodes[from].edges);
        for e in moved {
            if let Some(edge) = self.edges[e].as_mut() {
                if edge.from == from {
                    edge.from = into;
                }
                if edge.to == from {
                    edge.to = into;
                }
            }
            self.attach(into, e);
        }
    }

    /// Cut ring edges `ei` and `ej` at their crossing point `x`.
    ///
    /// An endpoint within `eps` of `x` is reused as the crossing node (and a
    /// second such endpoint merged into it) instead of creating a zero-length
    /// edge.
    pub fn cut_crossing(&mut self, ei: EdgeId, ej: EdgeId, x: Point, eps: f64) {
        let (a, b) = (self.edge(ei), self.edge(ej));
        let near: Vec<NodeId> = [a.from, a.to, b.from, b.to]
            .into_iter()
            .filter(|&n| approx_eq(self.nodes[n].pos, x, eps))
            .collect();
        let node = match near.first() {
            Some(&n) => n,
            None => self.add_node(x),
        };
        for &other in near.iter().skip(1) {
            if other != node {
                self.merge(other, node);
            }
        }
        for e in [ei, ej] {
            let Edge { from, to } = self.edge(e);
            if from != node && to != node {
                self.split_edge(e, node);
            }
        }
    }

    /// Trace every closed loop. Each live edge is used exactly once; loops
    /// start at their lowest unused edge id.
    pub fn loops(&self) -> Vec<Vec<Point>> {
        let mut used = vec![false; self.edges.len()];
        let mut out = Vec::new();
        for start in 0..self.edges.len() {
            if used[start] || self.edges[start].is_none() {
                continue;
            }
            let mut ring = Vec::new();
            let mut cur = start;
            loop {
                used[cur] = true;
                let e = self.edge(cur);
                ring.push(self.nodes[e.from].pos);
                match self.next_edge(cur, &used) {
                    Some(next) => cur = next,
                    None => break,
                }
            }
            out.push(ring);
        }
        out
    }

    /// Unused outgoing edge angularly adjacent to `incoming` at its head.
    fn next_edge(&self, incoming: EdgeId, used: &[bool]) -> Option<EdgeId> {
        let node = self.edge(incoming).to;
        let list = &self.nodes[node].edges;
        let k = list.iter().position(|&e| e == incoming)?;
        let m = list.len();
        let outgoing = |e: EdgeId| !used[e] && self.edge(e).from == node;
        (1..m)
            .flat_map(|step| [list[(k + step) % m], list[(k + m - step) % m]])
            .find(|&e| outgoing(e))
    }
}
