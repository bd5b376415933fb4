//! Component A: an immutable labeled multigraph with stable vertex/edge ids.
//!
//! A [`GraphBuilder`] accumulates vertices and edges in insertion order and
//! freezes them into a [`Graph`]. Once built, a `Graph` is never mutated;
//! every downstream algorithm in [`crate::algo`] produces new values instead.

use alloc::vec::Vec;

use crate::error::{Error, InvalidInputReason};

/// A vertex identifier. Dense and assigned at build time, in
/// [`GraphBuilder::add_vertex`] call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct VertexId(pub u32);

impl VertexId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An edge identifier. Dense and assigned at build time, in
/// [`GraphBuilder::add_edge`] call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct EdgeId(pub u32);

impl EdgeId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The unordered endpoint pair of an edge, plus whether it was declared
/// directed by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRecord {
    pub u: VertexId,
    pub v: VertexId,
    pub directed: bool,
}

impl EdgeRecord {
    /// `true` if `u == v`: this edge is a self-loop.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.u == self.v
    }

    /// The endpoint other than `from`, or `None` if `from` is not an
    /// endpoint of this edge.
    #[must_use]
    pub fn other(&self, from: VertexId) -> Option<VertexId> {
        if self.u == from {
            Some(self.v)
        } else if self.v == from {
            Some(self.u)
        } else {
            None
        }
    }
}

/// Accumulates vertices and edges in insertion order and freezes them into a
/// [`Graph`]. Mirrors `petgraph::graph::Graph`'s incremental-build shape, but
/// the resulting value is permanently read-only: TopoLoom's algorithms never
/// mutate a `Graph` in place, they derive new values from it.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder<L = ()> {
    labels: Vec<L>,
    edges: Vec<EdgeRecord>,
}

impl<L> GraphBuilder<L> {
    #[must_use]
    pub fn new() -> Self {
        GraphBuilder {
            labels: Vec::new(),
            edges: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_capacity(vertices: usize, edges: usize) -> Self {
        GraphBuilder {
            labels: Vec::with_capacity(vertices),
            edges: Vec::with_capacity(edges),
        }
    }

    /// Add a vertex carrying an arbitrary caller-supplied label, returning
    /// its freshly assigned id.
    pub fn add_vertex(&mut self, label: L) -> VertexId {
        let id = VertexId(self.labels.len() as u32);
        self.labels.push(label);
        id
    }

    /// Add an edge between two previously-added vertices, returning its
    /// freshly assigned id. `directed` records the caller's intent; most
    /// algorithms in this crate consume the undirected projection unless
    /// `forceUndirected` handling rejects directed input outright (see
    /// [`crate::error::InvalidInputReason::DirectedEdgeRejected`]).
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if either endpoint is out of range.
    pub fn add_edge(&mut self, u: VertexId, v: VertexId, directed: bool) -> Result<EdgeId, Error> {
        if u.index() >= self.labels.len() || v.index() >= self.labels.len() {
            return Err(Error::InvalidInput(InvalidInputReason::EndpointOutOfRange));
        }
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(EdgeRecord { u, v, directed });
        Ok(id)
    }

    /// Freeze the accumulated vertices and edges into an immutable [`Graph`].
    #[must_use]
    pub fn build(self) -> Graph<L> {
        let mut adjacency = alloc::vec![Vec::new(); self.labels.len()];
        for (i, edge) in self.edges.iter().enumerate() {
            let id = EdgeId(i as u32);
            adjacency[edge.u.index()].push(id);
            if edge.v != edge.u {
                adjacency[edge.v.index()].push(id);
            } else {
                // a self-loop contributes its edge id twice to one
                // vertex's adjacency, matching the rotation-system
                // invariant in §3: every edge id appears exactly twice.
                adjacency[edge.u.index()].push(id);
            }
        }
        Graph {
            labels: self.labels,
            edges: self.edges,
            adjacency,
        }
    }
}

/// An immutable labeled multigraph with dense, stable vertex and edge ids.
///
/// Self-loops and parallel edges are both permitted; see
/// [`Graph::has_self_loops`] and [`Graph::is_simple`] to query for them.
/// Adjacency lists preserve edge-insertion order, which every algorithm in
/// this crate relies on for determinism (`spec.md` §5).
#[derive(Debug, Clone, Default)]
pub struct Graph<L = ()> {
    labels: Vec<L>,
    edges: Vec<EdgeRecord>,
    adjacency: Vec<Vec<EdgeId>>,
}

impl<L> Graph<L> {
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.labels.len()).map(|i| VertexId(i as u32))
    }

    #[must_use]
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len()).map(|i| EdgeId(i as u32))
    }

    #[must_use]
    pub fn edge(&self, id: EdgeId) -> EdgeRecord {
        self.edges[id.index()]
    }

    #[must_use]
    pub fn label(&self, v: VertexId) -> &L {
        &self.labels[v.index()]
    }

    /// Incident edge ids at `v`, in insertion order. A self-loop appears
    /// twice.
    #[must_use]
    pub fn adjacency(&self, v: VertexId) -> &[EdgeId] {
        &self.adjacency[v.index()]
    }

    #[must_use]
    pub fn degree(&self, v: VertexId) -> usize {
        self.adjacency[v.index()].len()
    }

    #[must_use]
    pub fn has_self_loops(&self) -> bool {
        self.edges.iter().any(EdgeRecord::is_self_loop)
    }

    #[must_use]
    pub fn has_directed_edges(&self) -> bool {
        self.edges.iter().any(|e| e.directed)
    }

    /// `true` if no two edges share the same unordered endpoint pair and no
    /// edge is a self-loop.
    #[must_use]
    pub fn is_simple(&self) -> bool {
        if self.has_self_loops() {
            return false;
        }
        let mut seen = hashbrown::HashSet::with_capacity(self.edges.len());
        self.edges
            .iter()
            .all(|e| seen.insert(canonical_pair(e.u, e.v)))
    }

    /// Reject (with [`Error::InvalidInput`]) if the graph carries directed
    /// edges and `force_undirected` is `false`; otherwise return `self` to
    /// be consumed as an undirected projection. Every public entry point
    /// that only understands undirected graphs calls this first (resolving
    /// `spec.md`'s Open Question 2 in favour of a safe default).
    pub fn require_undirected(&self, force_undirected: bool) -> Result<(), Error> {
        if self.has_directed_edges() && !force_undirected {
            Err(Error::InvalidInput(InvalidInputReason::DirectedEdgeRejected))
        } else {
            Ok(())
        }
    }
}

#[must_use]
pub(crate) fn canonical_pair(u: VertexId, v: VertexId) -> (VertexId, VertexId) {
    if u <= v {
        (u, v)
    } else {
        (v, u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_triangle() {
        let mut b = GraphBuilder::new();
        let v: Vec<_> = (0..3).map(|i| b.add_vertex(i)).collect();
        b.add_edge(v[0], v[1], false).unwrap();
        b.add_edge(v[1], v[2], false).unwrap();
        b.add_edge(v[2], v[0], false).unwrap();
        let g = b.build();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.degree(v[0]), 2);
        assert!(g.is_simple());
        assert!(!g.has_self_loops());
    }

    #[test]
    fn self_loop_counts_twice_in_adjacency() {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let a = b.add_vertex(());
        let e = b.add_edge(a, a, false).unwrap();
        let g = b.build();
        assert_eq!(g.adjacency(a), &[e, e]);
        assert!(g.has_self_loops());
        assert!(!g.is_simple());
    }

    #[test]
    fn out_of_range_endpoint_is_rejected() {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let a = b.add_vertex(());
        let bogus = VertexId(a.0 + 1);
        assert_eq!(
            b.add_edge(a, bogus, false),
            Err(Error::InvalidInput(InvalidInputReason::EndpointOutOfRange))
        );
    }

    #[test]
    fn parallel_edges_are_detected() {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let a = b.add_vertex(());
        let c = b.add_vertex(());
        b.add_edge(a, c, false).unwrap();
        b.add_edge(a, c, false).unwrap();
        let g = b.build();
        assert!(!g.is_simple());
    }

    #[test]
    fn directed_edges_are_rejected_by_default() {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let a = b.add_vertex(());
        let c = b.add_vertex(());
        b.add_edge(a, c, true).unwrap();
        let g = b.build();
        assert_eq!(
            g.require_undirected(false),
            Err(Error::InvalidInput(InvalidInputReason::DirectedEdgeRejected))
        );
        assert_eq!(g.require_undirected(true), Ok(()));
    }
}
