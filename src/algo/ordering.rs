//! Component F: st-numbering and bipolar orientation.
//!
//! Both are built on one shared core: an **open ear decomposition** grown
//! from `{s, t}` (Whitney's theorem guarantees one exists for any
//! biconnected graph). Each ear is found by a plain BFS rather than the
//! classical linear-time DFS/low-point machinery — a deliberate
//! correct-but-not-asymptotically-optimal simplification, the same kind
//! already used for SPQR triconnectivity and Kuratowski witness search.
//!
//! Growing the decomposition directly produces a total order of vertices
//! from `s` to `t` with the §3 bijection invariant (every non-terminal
//! vertex keeps a lower- and a higher-numbered neighbour): each ear's
//! interior vertices are spliced into the order strictly between its two
//! endpoints, so once two vertices are ordered relative to each other nothing
//! later disturbs that relation.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use hashbrown::HashSet;

use crate::error::Error;
use crate::graph::{EdgeId, Graph, VertexId};
use crate::mesh::{HalfEdgeId, HalfEdgeMesh};

/// The result of [`st_numbering`]: a bijection `vertex -> [1..n]` with
/// `number(s) == 1`, `number(t) == n`, and every other vertex holding both a
/// lower- and a higher-numbered neighbour.
#[derive(Debug, Clone)]
pub struct StNumbering {
    number: Vec<u32>,
    s: VertexId,
    t: VertexId,
}

impl StNumbering {
    #[must_use]
    pub fn number(&self, v: VertexId) -> u32 {
        self.number[v.index()]
    }

    #[must_use]
    pub fn s(&self) -> VertexId {
        self.s
    }

    #[must_use]
    pub fn t(&self) -> VertexId {
        self.t
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.number.len()
    }
}

/// The result of [`bipolar_orientation`]: one direction per edge id, acyclic
/// with unique source `s` and unique sink `t`.
#[derive(Debug, Clone)]
pub struct BipolarOrientation {
    from: Vec<VertexId>,
    to: Vec<VertexId>,
    s: VertexId,
    t: VertexId,
}

impl BipolarOrientation {
    #[must_use]
    pub fn source_of(&self, e: EdgeId) -> VertexId {
        self.from[e.index()]
    }

    #[must_use]
    pub fn sink_of(&self, e: EdgeId) -> VertexId {
        self.to[e.index()]
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.from.len()
    }

    #[must_use]
    pub fn s(&self) -> VertexId {
        self.s
    }

    #[must_use]
    pub fn t(&self) -> VertexId {
        self.t
    }
}

/// Grow the open ear decomposition of `(vertex_count, edges)` rooted at
/// `{s, t}`, returning the total vertex order from `s` to `t`.
///
/// # Errors
/// Returns [`Error::NotBiconnected`] if the growing procedure gets stuck
/// (some edge never becomes reachable from the covered set, or some vertex
/// is never covered), which happens exactly when the input is not
/// biconnected, or when `s == t`.
fn grow_ear_decomposition(
    vertex_count: usize,
    edges: &[(VertexId, VertexId)],
    adjacency: &[Vec<EdgeId>],
    s: VertexId,
    t: VertexId,
) -> Result<Vec<VertexId>, Error> {
    if s == t {
        return Err(Error::NotBiconnected);
    }

    let mut covered_vertices: HashSet<VertexId> = HashSet::new();
    covered_vertices.insert(s);
    covered_vertices.insert(t);
    let mut covered_edges: HashSet<EdgeId> = HashSet::new();
    let mut order: Vec<VertexId> = alloc::vec![s, t];

    loop {
        if covered_edges.len() == edges.len() {
            break;
        }

        let mut chosen: Option<(EdgeId, VertexId, VertexId)> = None;
        for (i, &(u, v)) in edges.iter().enumerate() {
            let e = EdgeId(i as u32);
            if covered_edges.contains(&e) || u == v {
                if u == v && covered_vertices.contains(&u) {
                    covered_edges.insert(e);
                }
                continue;
            }
            if covered_vertices.contains(&u) {
                chosen = Some((e, u, v));
                break;
            }
            if covered_vertices.contains(&v) {
                chosen = Some((e, v, u));
                break;
            }
        }

        let (e, a, b) = match chosen {
            Some(c) => c,
            None => return Err(Error::NotBiconnected),
        };

        if covered_vertices.contains(&b) {
            covered_edges.insert(e);
            continue;
        }

        let (interior, ear_edges, end) = bfs_ear(vertex_count, adjacency, edges, b, a, &covered_vertices)
            .ok_or(Error::NotBiconnected)?;

        covered_edges.insert(e);
        for ee in ear_edges {
            covered_edges.insert(ee);
        }
        for &v in &interior {
            covered_vertices.insert(v);
        }

        let position: hashbrown::HashMap<VertexId, usize> =
            order.iter().enumerate().map(|(i, &v)| (v, i)).collect();
        let pos_a = position[&a];
        let pos_end = position[&end];
        let lo = pos_a.min(pos_end);
        let ordered_interior: Vec<VertexId> = if pos_a < pos_end {
            interior
        } else {
            interior.into_iter().rev().collect()
        };
        for (i, v) in ordered_interior.into_iter().enumerate() {
            order.insert(lo + 1 + i, v);
        }
    }

    if order.len() != vertex_count {
        return Err(Error::NotBiconnected);
    }
    Ok(order)
}

/// BFS from `start` through vertices not yet covered (and never through
/// `exclude`, the ear's own starting endpoint — by biconnectivity some other
/// covered vertex is always reachable without it), stopping at the first
/// covered vertex reached. Returns the interior vertices (excluding the
/// terminal), the edges crossed, and the terminal vertex.
fn bfs_ear(
    vertex_count: usize,
    adjacency: &[Vec<EdgeId>],
    edges: &[(VertexId, VertexId)],
    start: VertexId,
    exclude: VertexId,
    covered: &HashSet<VertexId>,
) -> Option<(Vec<VertexId>, Vec<EdgeId>, VertexId)> {
    let mut visited = alloc::vec![false; vertex_count];
    let mut parent_edge: Vec<Option<EdgeId>> = alloc::vec![None; vertex_count];
    let mut parent_vertex: Vec<Option<VertexId>> = alloc::vec![None; vertex_count];
    visited[start.index()] = true;
    visited[exclude.index()] = true;
    let mut queue = VecDeque::new();
    queue.push_back(start);

    let mut end = None;
    while let Some(v) = queue.pop_front() {
        if covered.contains(&v) {
            end = Some(v);
            break;
        }
        for &e in &adjacency[v.index()] {
            let (u, w) = edges[e.index()];
            let other = if u == v { w } else { u };
            if other == v {
                continue; // self-loop
            }
            if visited[other.index()] {
                continue;
            }
            visited[other.index()] = true;
            parent_edge[other.index()] = Some(e);
            parent_vertex[other.index()] = Some(v);
            queue.push_back(other);
        }
    }

    let end = end?;
    let mut vertices = Vec::new();
    let mut path_edges = Vec::new();
    let mut cur = end;
    loop {
        match parent_vertex[cur.index()] {
            Some(p) => {
                path_edges.push(parent_edge[cur.index()].expect("reached via an edge"));
                vertices.push(cur);
                cur = p;
            }
            None => break,
        }
    }
    vertices.reverse();
    path_edges.reverse();
    Some((vertices, path_edges, end))
}

fn graph_edge_list<L>(graph: &Graph<L>) -> Vec<(VertexId, VertexId)> {
    graph.edge_ids().map(|e| {
        let rec = graph.edge(e);
        (rec.u, rec.v)
    }).collect()
}

/// Compute an st-numbering of a biconnected `graph`.
///
/// # Errors
/// Returns [`Error::NotBiconnected`] if `graph` is not biconnected
/// (equivalently: if no open ear decomposition rooted at `{s, t}` covers the
/// whole graph), or if `s == t`.
pub fn st_numbering<L>(graph: &Graph<L>, s: VertexId, t: VertexId) -> Result<StNumbering, Error> {
    let edges = graph_edge_list(graph);
    let adjacency: Vec<Vec<EdgeId>> = graph.vertices().map(|v| graph.adjacency(v).to_vec()).collect();
    let order = grow_ear_decomposition(graph.vertex_count(), &edges, &adjacency, s, t)?;

    let mut number = alloc::vec![0u32; graph.vertex_count()];
    for (i, v) in order.into_iter().enumerate() {
        number[v.index()] = (i + 1) as u32;
    }
    Ok(StNumbering { number, s, t })
}

/// Derive a bipolar orientation of `mesh`'s underlying graph from an
/// st-numbering rooted at `s, t`: every edge is directed from its
/// lower-numbered endpoint to its higher-numbered one.
///
/// # Errors
/// Returns [`Error::NotBiconnected`] under the same conditions as
/// [`st_numbering`], computed over the edges `mesh` was built from.
pub fn bipolar_orientation(mesh: &HalfEdgeMesh, s: VertexId, t: VertexId) -> Result<BipolarOrientation, Error> {
    let edge_count = mesh.half_edge_count() / 2;
    let mut edges = Vec::with_capacity(edge_count);
    let mut vertex_count = 0usize;
    for i in 0..edge_count {
        let h0 = HalfEdgeId((i * 2) as u32);
        let h1 = h0.twin();
        let u = mesh.origin(h0);
        let v = mesh.origin(h1);
        vertex_count = vertex_count.max(u.index() + 1).max(v.index() + 1);
        edges.push((u, v));
    }

    let mut adjacency: Vec<Vec<EdgeId>> = alloc::vec![Vec::new(); vertex_count];
    for (i, &(u, v)) in edges.iter().enumerate() {
        let e = EdgeId(i as u32);
        adjacency[u.index()].push(e);
        if v != u {
            adjacency[v.index()].push(e);
        } else {
            adjacency[u.index()].push(e);
        }
    }

    let order = grow_ear_decomposition(vertex_count, &edges, &adjacency, s, t)?;
    let mut position = alloc::vec![0usize; vertex_count];
    for (i, v) in order.iter().enumerate() {
        position[v.index()] = i;
    }

    let mut from = Vec::with_capacity(edge_count);
    let mut to = Vec::with_capacity(edge_count);
    for &(u, v) in &edges {
        if position[u.index()] < position[v.index()] {
            from.push(u);
            to.push(v);
        } else {
            from.push(v);
            to.push(u);
        }
    }

    Ok(BipolarOrientation { from, to, s, t })
}
