//! The `flip`/`permute`/`materialize` skeleton operators `spec.md` §4.E
//! names, plus [`validate_spqr_tree`]. Every operator is a pure function:
//! it returns a new [`SpqrNode`] rather than mutating the tree in place,
//! matching the crate-wide "derive, never mutate" discipline (`src/lib.rs`).

use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::graph::EdgeId;

use super::{SkeletonEdgeKind, SpqrNode, SpqrNodeId, SpqrNodeKind, SpqrTree};

/// A skeleton-local rotation system: `per_vertex[i]` lists, in order, the
/// indices into [`SpqrNode::edges`] incident to local vertex `i`. Distinct
/// from [`crate::rotation::RotationSystem`], which is keyed by real
/// [`EdgeId`]s only and so cannot represent a skeleton's virtual edges.
#[derive(Debug, Clone)]
pub struct SkeletonRotation {
    per_vertex: Vec<Vec<usize>>,
}

impl SkeletonRotation {
    #[must_use]
    pub fn at(&self, local_vertex: usize) -> &[usize] {
        &self.per_vertex[local_vertex]
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.per_vertex.len()
    }
}

/// Derive a rotation for `node`'s skeleton: each local vertex sees its
/// incident edges in `node.edges` order. For `P` and `S` skeletons this is
/// already the embedding (parallel bundle / cycle order); for `R`
/// skeletons it is the same "insertion order" convention
/// [`crate::rotation::rotation_from_adjacency`] uses elsewhere in the
/// crate, not a planarity-verified rotation.
#[must_use]
pub fn materialize_embedding(node: &SpqrNode) -> SkeletonRotation {
    let mut per_vertex: Vec<Vec<usize>> = alloc::vec![Vec::new(); node.vertex_map.len()];
    for (i, e) in node.edges.iter().enumerate() {
        per_vertex[e.a].push(i);
        per_vertex[e.b].push(i);
    }
    SkeletonRotation { per_vertex }
}

/// Mirror `node`'s skeleton by reversing its edge order — the other valid
/// embedding of a skeleton whose rotation can be taken clockwise or
/// counter-clockwise (`spec.md` §4.E).
#[must_use]
pub fn flip_skeleton(node: &SpqrNode) -> SpqrNode {
    let mut edges = node.edges.clone();
    edges.reverse();
    SpqrNode {
        kind: node.kind,
        vertex_map: node.vertex_map.clone(),
        edges,
    }
}

/// Reorder a `P`-node's parallel edges according to `order`, a permutation
/// of `0..node.edges.len()`. Returns `None` if `node` is not a `P` node or
/// `order` is not a valid permutation of that length.
#[must_use]
pub fn permute_parallel(node: &SpqrNode, order: &[usize]) -> Option<SpqrNode> {
    if node.kind != SpqrNodeKind::P {
        return None;
    }
    if order.len() != node.edges.len() {
        return None;
    }
    let mut seen = alloc::vec![false; order.len()];
    for &i in order {
        if i >= order.len() || seen[i] {
            return None;
        }
        seen[i] = true;
    }
    let edges = order.iter().map(|&i| node.edges[i]).collect();
    Some(SpqrNode {
        kind: node.kind,
        vertex_map: node.vertex_map.clone(),
        edges,
    })
}

/// Check `tree` against the invariants of `spec.md` §4.E / §3:
/// (i) every `P`-node has exactly 2 vertices and at least 3 parallel edges
/// (the producer rejects the degenerate 2-parallel-edge case outright
/// rather than emitting a node that would fail this check — see
/// `super::spqr_decompose`'s docs);
/// (ii) every `S`-node skeleton is a simple cycle of length ≥ 3;
/// (iii) every `R`-node skeleton has at least 4 vertices and at least as
/// many edges as vertices (a necessary, not sufficient, proxy for
/// 3-connectivity — this simplified decomposition does not re-verify full
/// triconnectivity on its own rigid output);
/// (iv) every virtual edge is matched by exactly one virtual edge in a tree
/// neighbour;
/// and a proxy for (v) — every real edge id appears in exactly one
/// skeleton across the whole tree.
#[must_use]
pub fn validate_spqr_tree(tree: &SpqrTree) -> bool {
    for node in tree.nodes() {
        let shape_ok = match node.kind {
            SpqrNodeKind::P => node.vertex_map.len() == 2 && node.edges.len() >= 3,
            SpqrNodeKind::S => {
                node.vertex_map.len() >= 3
                    && node.edges.len() == node.vertex_map.len()
                    && {
                        let mut degree = alloc::vec![0usize; node.vertex_map.len()];
                        for e in &node.edges {
                            degree[e.a] += 1;
                            degree[e.b] += 1;
                        }
                        degree.iter().all(|&d| d == 2)
                    }
            }
            SpqrNodeKind::R => node.vertex_map.len() >= 4 && node.edges.len() >= node.vertex_map.len(),
            SpqrNodeKind::Q => node.vertex_map.len() == 2 && node.edges.len() == 1,
        };
        if !shape_ok {
            return false;
        }
    }

    let mut incident_count: HashMap<SpqrNodeId, usize> = HashMap::new();
    for &(a, b) in tree.tree_edges() {
        *incident_count.entry(a).or_insert(0) += 1;
        *incident_count.entry(b).or_insert(0) += 1;
    }
    for (idx, node) in tree.nodes().iter().enumerate() {
        let virtual_count = node
            .edges
            .iter()
            .filter(|e| matches!(e.kind, SkeletonEdgeKind::Virtual(_)))
            .count();
        let expected = incident_count.get(&SpqrNodeId(idx as u32)).copied().unwrap_or(0);
        if virtual_count != expected {
            return false;
        }
    }

    let mut real_edge_ids: Vec<EdgeId> = tree
        .nodes()
        .iter()
        .flat_map(|n| {
            n.edges.iter().filter_map(|e| match e.kind {
                SkeletonEdgeKind::Real(eid) => Some(eid),
                SkeletonEdgeKind::Virtual(_) => None,
            })
        })
        .collect();
    let before = real_edge_ids.len();
    real_edge_ids.sort_by_key(EdgeId::index);
    real_edge_ids.dedup();
    real_edge_ids.len() == before
}
