//! A rotation system: for each vertex, the cyclic order of its incident
//! edges that defines a combinatorial embedding.

use alloc::vec::Vec;

use crate::graph::{EdgeId, Graph, VertexId};

/// A 2D ragged array: `per_vertex[v]` lists `v`'s incident edge ids in
/// rotation (embedding) order. Built fresh by every embedding-producing
/// operation; never mutated in place (`spec.md` §9 — "rotation system as
/// data, not behaviour").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationSystem {
    per_vertex: Vec<Vec<EdgeId>>,
}

impl RotationSystem {
    #[must_use]
    pub fn with_vertex_count(n: usize) -> Self {
        RotationSystem {
            per_vertex: alloc::vec![Vec::new(); n],
        }
    }

    #[must_use]
    pub fn from_rows(rows: Vec<Vec<EdgeId>>) -> Self {
        RotationSystem { per_vertex: rows }
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.per_vertex.len()
    }

    #[must_use]
    pub fn at(&self, v: VertexId) -> &[EdgeId] {
        &self.per_vertex[v.index()]
    }

    pub fn push(&mut self, v: VertexId, e: EdgeId) {
        self.per_vertex[v.index()].push(e);
    }

    /// The position of `edge` within `v`'s rotation, if present.
    #[must_use]
    pub fn position_of(&self, v: VertexId, edge: EdgeId) -> Option<usize> {
        self.per_vertex[v.index()].iter().position(|&e| e == edge)
    }

    /// The edge immediately following `edge` in `v`'s cyclic rotation.
    #[must_use]
    pub fn next_around(&self, v: VertexId, edge: EdgeId) -> Option<EdgeId> {
        let row = &self.per_vertex[v.index()];
        let pos = row.iter().position(|&e| e == edge)?;
        Some(row[(pos + 1) % row.len()])
    }

    /// The edge immediately preceding `edge` in `v`'s cyclic rotation.
    #[must_use]
    pub fn prev_around(&self, v: VertexId, edge: EdgeId) -> Option<EdgeId> {
        let row = &self.per_vertex[v.index()];
        let pos = row.iter().position(|&e| e == edge)?;
        Some(row[(pos + row.len() - 1) % row.len()])
    }

    /// Reverse every vertex's rotation in place semantics (returns a new
    /// system), producing the mirror-image embedding. Used by
    /// `spqr::flip_skeleton`.
    #[must_use]
    pub fn mirrored(&self) -> RotationSystem {
        let per_vertex = self
            .per_vertex
            .iter()
            .map(|row| row.iter().rev().copied().collect())
            .collect();
        RotationSystem { per_vertex }
    }

    /// Check the §3 invariant that every edge id appears exactly twice
    /// across the whole system (twice at the same vertex for a self-loop).
    #[must_use]
    pub fn each_edge_appears_twice(&self, edge_count: usize) -> bool {
        let mut counts = alloc::vec![0u8; edge_count];
        for row in &self.per_vertex {
            for &e in row {
                if e.index() >= counts.len() {
                    return false;
                }
                counts[e.index()] = counts[e.index()].saturating_add(1);
            }
        }
        counts.into_iter().all(|c| c == 2)
    }
}

/// A fallback rotation system built directly from a [`Graph`]'s adjacency
/// order, with no embedding check. `spec.md` §6 documents this as a
/// non-embedding-checked order: callers that need an actual planar
/// embedding must use [`crate::algo::planarity::test_planarity`] instead.
#[must_use]
pub fn rotation_from_adjacency<L>(graph: &Graph<L>) -> RotationSystem {
    let rows = graph
        .vertices()
        .map(|v| graph.adjacency(v).to_vec())
        .collect();
    RotationSystem::from_rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    #[test]
    fn adjacency_rotation_round_trips_edge_multiplicity() {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let a = b.add_vertex(());
        let c = b.add_vertex(());
        let d = b.add_vertex(());
        b.add_edge(a, c, false).unwrap();
        b.add_edge(c, d, false).unwrap();
        b.add_edge(d, a, false).unwrap();
        let g = b.build();
        let rot = rotation_from_adjacency(&g);
        assert!(rot.each_edge_appears_twice(g.edge_count()));
    }

    #[test]
    fn next_and_prev_around_are_inverses() {
        let mut rot = RotationSystem::with_vertex_count(1);
        let v = VertexId(0);
        for i in 0..4 {
            rot.push(v, EdgeId(i));
        }
        for i in 0..4 {
            let e = EdgeId(i);
            let next = rot.next_around(v, e).unwrap();
            assert_eq!(rot.prev_around(v, next).unwrap(), e);
        }
    }
}
