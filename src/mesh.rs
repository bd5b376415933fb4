//! Component D: the half-edge mesh derived from a rotation system, with
//! face enumeration and outer-face selection.
//!
//! Arrays are indexed by integer id, never by back-pointer (`spec.md`
//! §9), following the index-newtype-plus-flat-`Vec` layout used by the
//! reference doubly-connected-edge-list example this module is grounded on.

use alloc::vec::Vec;

use crate::graph::{EdgeId, Graph, VertexId};
use crate::rotation::RotationSystem;

/// A half-edge id. `edge_id = h / 2`; the two half-edges of an edge are
/// `2*edge_id` and `2*edge_id + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct HalfEdgeId(pub u32);

impl HalfEdgeId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[must_use]
    pub fn edge(self) -> EdgeId {
        EdgeId(self.0 / 2)
    }

    #[must_use]
    pub fn twin(self) -> HalfEdgeId {
        HalfEdgeId(self.0 ^ 1)
    }
}

/// A face id, indexing into [`HalfEdgeMesh::faces`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct FaceId(pub u32);

impl FaceId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The half-edge mesh of §3: `next`/`origin`/`face` arrays indexed by
/// half-edge id, plus the discovered face cycles and the chosen outer face.
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh {
    origin: Vec<VertexId>,
    next: Vec<HalfEdgeId>,
    face: Vec<FaceId>,
    faces: Vec<Vec<HalfEdgeId>>,
    outer_face: FaceId,
}

impl HalfEdgeMesh {
    #[must_use]
    pub fn half_edge_count(&self) -> usize {
        self.origin.len()
    }

    #[must_use]
    pub fn origin(&self, h: HalfEdgeId) -> VertexId {
        self.origin[h.index()]
    }

    #[must_use]
    pub fn next(&self, h: HalfEdgeId) -> HalfEdgeId {
        self.next[h.index()]
    }

    #[must_use]
    pub fn twin(&self, h: HalfEdgeId) -> HalfEdgeId {
        h.twin()
    }

    #[must_use]
    pub fn face_of(&self, h: HalfEdgeId) -> FaceId {
        self.face[h.index()]
    }

    #[must_use]
    pub fn faces(&self) -> &[Vec<HalfEdgeId>] {
        &self.faces
    }

    #[must_use]
    pub fn face(&self, id: FaceId) -> &[HalfEdgeId] {
        &self.faces[id.index()]
    }

    #[must_use]
    pub fn outer_face(&self) -> FaceId {
        self.outer_face
    }

    #[must_use]
    pub fn half_edges(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        (0..self.origin.len() as u32).map(HalfEdgeId)
    }

    /// `next` is a permutation whose orbit from `h` returns to `h`.
    #[must_use]
    pub fn face_cycle_closes(&self, h: HalfEdgeId) -> bool {
        let mut cur = self.next(h);
        for _ in 0..self.origin.len() {
            if cur == h {
                return true;
            }
            cur = self.next(cur);
        }
        false
    }

    /// Euler characteristic check: `n - m + f == 1 + c` where `c` is the
    /// number of connected components of the underlying graph.
    #[must_use]
    pub fn satisfies_euler_formula(&self, n: usize, m: usize, components: usize) -> bool {
        let f = self.faces.len();
        n as isize - m as isize + f as isize == 1 + components as isize
    }
}

/// Build the half-edge mesh for `graph` under `rotation`.
///
/// `next[h]` is defined as the twin of the edge immediately *after* `h`'s
/// twin's edge in the rotation at the far vertex, so that face cycles are
/// closed walks turning left (`spec.md` §4.D). Faces are discovered in
/// increasing half-edge id order, a deterministic tie-break consistent with
/// `spec.md` §5.
#[must_use]
pub fn build_half_edge_mesh<L>(graph: &Graph<L>, rotation: &RotationSystem) -> HalfEdgeMesh {
    let m = graph.edge_count();
    let half_edge_count = 2 * m;
    let mut origin = alloc::vec![VertexId(0); half_edge_count];
    let mut next = alloc::vec![HalfEdgeId(0); half_edge_count];

    for edge_id in graph.edge_ids() {
        let rec = graph.edge(edge_id);
        let h0 = HalfEdgeId(edge_id.0 * 2);
        let h1 = h0.twin();
        origin[h0.index()] = rec.u;
        origin[h1.index()] = rec.v;
    }

    for h in (0..half_edge_count as u32).map(HalfEdgeId) {
        let twin = h.twin();
        let far_vertex = origin[twin.index()];
        let twin_edge = twin.edge();
        let next_edge_at_far = rotation
            .next_around(far_vertex, twin_edge)
            .expect("rotation system must list every incident edge");
        let candidate_a = HalfEdgeId(next_edge_at_far.0 * 2);
        let candidate_b = candidate_a.twin();
        // Whichever half-edge of `next_edge_at_far` originates at
        // `far_vertex` continues the face walk leaving `far_vertex`.
        let chosen = if origin[candidate_a.index()] == far_vertex {
            candidate_a
        } else {
            candidate_b
        };
        next[h.index()] = chosen;
    }

    let mut face = alloc::vec![FaceId(u32::MAX); half_edge_count];
    let mut faces: Vec<Vec<HalfEdgeId>> = Vec::new();
    for start in (0..half_edge_count as u32).map(HalfEdgeId) {
        if face[start.index()] != FaceId(u32::MAX) {
            continue;
        }
        let face_id = FaceId(faces.len() as u32);
        let mut cycle = Vec::new();
        let mut cur = start;
        loop {
            face[cur.index()] = face_id;
            cycle.push(cur);
            cur = next[cur.index()];
            if cur == start {
                break;
            }
        }
        faces.push(cycle);
    }

    let mut mesh = HalfEdgeMesh {
        origin,
        next,
        face,
        faces,
        outer_face: FaceId(0),
    };
    mesh.outer_face = select_outer_face(&mesh);
    mesh
}

/// Pick the outer face: largest boundary length, ties broken by the
/// smallest minimum vertex id on the boundary (`spec.md` §4.D; the
/// straight-line-area tie-break only applies once coordinates exist, which
/// is not the case for a bare mesh).
#[must_use]
pub fn select_outer_face(mesh: &HalfEdgeMesh) -> FaceId {
    let mut best_idx = 0usize;
    let mut best_key: Option<(usize, core::cmp::Reverse<u32>)> = None;
    for (idx, cycle) in mesh.faces.iter().enumerate() {
        let len = cycle.len();
        let min_vertex = cycle
            .iter()
            .map(|&h| mesh.origin(h).0)
            .min()
            .unwrap_or(u32::MAX);
        let key = (len, core::cmp::Reverse(min_vertex));
        let better = match best_key {
            Some(best) => key > best,
            None => true,
        };
        if better {
            best_key = Some(key);
            best_idx = idx;
        }
    }
    FaceId(best_idx as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::rotation::rotation_from_adjacency;

    fn triangle() -> Graph<()> {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let vs: Vec<_> = (0..3).map(|_| b.add_vertex(())).collect();
        b.add_edge(vs[0], vs[1], false).unwrap();
        b.add_edge(vs[1], vs[2], false).unwrap();
        b.add_edge(vs[2], vs[0], false).unwrap();
        b.build()
    }

    #[test]
    fn triangle_has_two_faces_and_closes_cycles() {
        let g = triangle();
        let rot = rotation_from_adjacency(&g);
        let mesh = build_half_edge_mesh(&g, &rot);
        assert_eq!(mesh.faces().len(), 2);
        for h in mesh.half_edges() {
            assert!(mesh.face_cycle_closes(h));
            assert_eq!(mesh.twin(mesh.twin(h)), h);
        }
        assert!(mesh.satisfies_euler_formula(3, 3, 1));
    }

    #[test]
    fn every_half_edge_belongs_to_exactly_one_face() {
        let g = triangle();
        let rot = rotation_from_adjacency(&g);
        let mesh = build_half_edge_mesh(&g, &rot);
        let total: usize = mesh.faces().iter().map(Vec::len).sum();
        assert_eq!(total, mesh.half_edge_count());
    }
}
