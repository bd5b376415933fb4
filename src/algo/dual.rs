//! Component G: the dual graph and shortest-face-path edge routing through
//! a fixed embedding.
//!
//! The dual's shortest path is found with a Dijkstra keyed by
//! `scored::MinScored`, the same `BinaryHeap` idiom `petgraph::algo::dijkstra`
//! uses (`src/scored.rs`); every arc has unit weight, so this is really a
//! BFS, but phrasing it as Dijkstra keeps it uniform with the rest of the
//! crate's shortest-path machinery and trivially extends if a future caller
//! wants weighted faces.

use alloc::collections::BinaryHeap;
use alloc::vec::Vec;

use crate::graph::{EdgeId, VertexId};
use crate::mesh::{FaceId, HalfEdgeId, HalfEdgeMesh};
use crate::scored::MinScored;

/// One directed arc of the dual graph: crossing primal half-edge `h` moves
/// from the face to `h`'s left to the face on `h`'s other side.
#[derive(Debug, Clone, Copy)]
pub struct DualArc {
    pub from: FaceId,
    pub to: FaceId,
    pub primal_edge: EdgeId,
    pub crossed_half_edge: HalfEdgeId,
}

/// The dual graph of a [`HalfEdgeMesh`]: one node per face, one arc per
/// primal half-edge. `edge_faces[e] = (left, right)` records, for each
/// primal edge, the two faces it separates.
#[derive(Debug, Clone)]
pub struct Dual {
    arcs_from: Vec<Vec<DualArc>>,
    edge_faces: Vec<(FaceId, FaceId)>,
}

impl Dual {
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.arcs_from.len()
    }

    #[must_use]
    pub fn arcs_from(&self, face: FaceId) -> &[DualArc] {
        &self.arcs_from[face.index()]
    }

    /// The `(left, right)` faces of primal edge `e`.
    #[must_use]
    pub fn edge_faces(&self, e: EdgeId) -> (FaceId, FaceId) {
        self.edge_faces[e.index()]
    }
}

/// Build the dual graph of `mesh`: one dual arc `left -> right` per primal
/// half-edge `h`, where `left = mesh.face_of(h)` and
/// `right = mesh.face_of(mesh.twin(h))` (`spec.md` §4.G).
#[must_use]
pub fn build_dual(mesh: &HalfEdgeMesh) -> Dual {
    let face_count = mesh.faces().len();
    let mut arcs_from: Vec<Vec<DualArc>> = alloc::vec![Vec::new(); face_count];
    let edge_count = mesh.half_edge_count() / 2;
    let mut edge_faces = alloc::vec![(FaceId(0), FaceId(0)); edge_count];

    for h in mesh.half_edges() {
        let twin = mesh.twin(h);
        let left = mesh.face_of(h);
        let right = mesh.face_of(twin);
        arcs_from[left.index()].push(DualArc {
            from: left,
            to: right,
            primal_edge: h.edge(),
            crossed_half_edge: h,
        });
        if h.index() < twin.index() {
            edge_faces[h.edge().index()] = (left, right);
        }
    }

    Dual {
        arcs_from,
        edge_faces,
    }
}

/// The faces incident to `v`: every face bounding a half-edge originating
/// at `v`, deduplicated and sorted by id (smallest-id tie-break,
/// `spec.md` §5).
fn faces_incident_to(mesh: &HalfEdgeMesh, v: VertexId) -> Vec<FaceId> {
    let mut faces: Vec<FaceId> = mesh
        .half_edges()
        .filter(|&h| mesh.origin(h) == v)
        .map(|h| mesh.face_of(h))
        .collect();
    faces.sort_by_key(FaceId::index);
    faces.dedup();
    faces
}

/// The outcome of [`route_edge_fixed_embedding`]: the primal edges a curve
/// from `u` to `v` must cross, in crossing order, to connect them without
/// altering the embedding.
#[derive(Debug, Clone)]
pub struct RouteResult {
    pub crossed_primal_edges: Vec<EdgeId>,
    pub start_face: FaceId,
    pub end_face: FaceId,
}

/// Find the minimum-length sequence of primal edges to cross to connect `u`
/// and `v` in `mesh` without altering the embedding: a shortest path in the
/// dual graph from any face incident to `u` to any face incident to `v`,
/// chosen to minimise edge crossings (`spec.md` §4.G). Ties are broken by
/// smallest-id faces at every step, matching `spec.md` §5's tie-break rule.
///
/// Returns `None` if `u` or `v` has no incident half-edge in `mesh` (i.e.
/// is not a vertex of the mesh).
#[must_use]
pub fn route_edge_fixed_embedding(mesh: &HalfEdgeMesh, u: VertexId, v: VertexId) -> Option<RouteResult> {
    let starts = faces_incident_to(mesh, u);
    let goals = faces_incident_to(mesh, v);
    if starts.is_empty() || goals.is_empty() {
        return None;
    }
    let goal_set: hashbrown::HashSet<FaceId> = goals.iter().copied().collect();
    if let Some(&shared) = starts.iter().find(|f| goal_set.contains(f)) {
        // u and v already share a face: the empty crossing sequence suffices.
        return Some(RouteResult {
            crossed_primal_edges: Vec::new(),
            start_face: shared,
            end_face: shared,
        });
    }

    let dual = build_dual(mesh);
    let face_count = dual.face_count();
    let mut dist = alloc::vec![u32::MAX; face_count];
    let mut incoming: Vec<Option<DualArc>> = alloc::vec![None; face_count];
    let mut heap = BinaryHeap::new();

    // Deterministic multi-source seeding: smallest face id pushed first so
    // equal-distance ties downstream favour the lexicographically smallest
    // path (`spec.md` §5).
    let mut sorted_starts = starts.clone();
    sorted_starts.sort_by_key(FaceId::index);
    for f in sorted_starts {
        if dist[f.index()] == u32::MAX {
            dist[f.index()] = 0;
            heap.push(MinScored(0u32, f));
        }
    }

    let mut reached_goal: Option<FaceId> = None;
    while let Some(MinScored(d, face)) = heap.pop() {
        if d > dist[face.index()] {
            continue;
        }
        if goal_set.contains(&face) {
            reached_goal = Some(face);
            break;
        }
        let mut arcs: Vec<&DualArc> = dual.arcs_from(face).iter().collect();
        arcs.sort_by_key(|a| a.to.index());
        for arc in arcs {
            let nd = d + 1;
            if nd < dist[arc.to.index()] {
                dist[arc.to.index()] = nd;
                incoming[arc.to.index()] = Some(*arc);
                heap.push(MinScored(nd, arc.to));
            }
        }
    }

    let goal = reached_goal?;
    let mut crossed = Vec::new();
    let mut cur = goal;
    while let Some(arc) = incoming[cur.index()] {
        crossed.push(arc.primal_edge);
        cur = arc.from;
    }
    crossed.reverse();

    Some(RouteResult {
        crossed_primal_edges: crossed,
        start_face: cur,
        end_face: goal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::mesh::build_half_edge_mesh;
    use crate::rotation::rotation_from_adjacency;

    fn square() -> crate::graph::Graph<()> {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let vs: Vec<_> = (0..4).map(|_| b.add_vertex(())).collect();
        b.add_edge(vs[0], vs[1], false).unwrap();
        b.add_edge(vs[1], vs[2], false).unwrap();
        b.add_edge(vs[2], vs[3], false).unwrap();
        b.add_edge(vs[3], vs[0], false).unwrap();
        b.build()
    }

    #[test]
    fn dual_has_one_node_per_face_and_one_arc_per_half_edge() {
        let g = square();
        let rot = rotation_from_adjacency(&g);
        let mesh = build_half_edge_mesh(&g, &rot);
        let dual = build_dual(&mesh);
        assert_eq!(dual.face_count(), mesh.faces().len());
        let total_arcs: usize = (0..dual.face_count())
            .map(|f| dual.arcs_from(FaceId(f as u32)).len())
            .sum();
        assert_eq!(total_arcs, mesh.half_edge_count());
    }

    #[test]
    fn routing_opposite_corners_of_a_square_crosses_exactly_one_edge() {
        let g = square();
        let rot = rotation_from_adjacency(&g);
        let mesh = build_half_edge_mesh(&g, &rot);
        let vs: Vec<_> = g.vertices().collect();
        // 0 and 2 are opposite corners of the square; they share no face,
        // so connecting them without altering the embedding must cross
        // exactly one of the two faces' boundary edges.
        let route = route_edge_fixed_embedding(&mesh, vs[0], vs[2]).unwrap();
        assert_eq!(route.crossed_primal_edges.len(), 1);
    }

    #[test]
    fn routing_adjacent_vertices_crosses_nothing() {
        let g = square();
        let rot = rotation_from_adjacency(&g);
        let mesh = build_half_edge_mesh(&g, &rot);
        let vs: Vec<_> = g.vertices().collect();
        let route = route_edge_fixed_embedding(&mesh, vs[0], vs[1]).unwrap();
        assert!(route.crossed_primal_edges.is_empty());
    }

    #[test]
    fn routing_unknown_vertex_returns_none() {
        let g = square();
        let rot = rotation_from_adjacency(&g);
        let mesh = build_half_edge_mesh(&g, &rot);
        let bogus = VertexId(99);
        assert!(route_edge_fixed_embedding(&mesh, bogus, VertexId(0)).is_none());
    }
}
