//! Property-based checks of the universal invariants `spec.md` §8 promises:
//! half-edge mesh consistency, determinism, and the bridge/articulation
//! characterisation. Grounded on the crate's own `proptest`-driven random
//! small-graph generation (the same dependency the teacher repo carries for
//! its `proptest` arbitrary-graph feature), kept small and local to this
//! crate's own types rather than pulling in that feature's generic
//! `GraphMap`/`StableGraph` strategy machinery.

use proptest::prelude::*;

use topoloom::algo::bcc::biconnected_components;
use topoloom::algo::planarity::{test_planarity, PlanarityOptions, PlanarityResult};
use topoloom::graph::{EdgeId, Graph, GraphBuilder, VertexId};
use topoloom::mesh::build_half_edge_mesh;

/// A small labelled multigraph: up to 7 vertices, each edge an unordered
/// pair (self-loops and parallels both possible, mirroring `spec.md` §3's
/// "self-loops permitted but flagged; parallel edges permitted").
fn small_graph() -> impl Strategy<Value = Graph<()>> {
    (1usize..=7).prop_flat_map(|n| {
        prop::collection::vec((0..n, 0..n), 0..=12).prop_map(move |pairs| {
            let mut builder: GraphBuilder<()> = GraphBuilder::with_capacity(n, pairs.len());
            for _ in 0..n {
                builder.add_vertex(());
            }
            for (u, v) in pairs {
                builder
                    .add_edge(VertexId(u as u32), VertexId(v as u32), false)
                    .unwrap();
            }
            builder.build()
        })
    })
}

fn connected_components(graph: &Graph<()>) -> usize {
    let n = graph.vertex_count();
    let mut comp = vec![usize::MAX; n];
    let mut count = 0;
    for start in 0..n {
        if comp[start] != usize::MAX {
            continue;
        }
        let mut stack = vec![start];
        comp[start] = count;
        while let Some(v) = stack.pop() {
            for &e in graph.adjacency(VertexId(v as u32)) {
                let rec = graph.edge(e);
                if let Some(other) = rec.other(VertexId(v as u32)) {
                    if comp[other.index()] == usize::MAX {
                        comp[other.index()] = count;
                        stack.push(other.index());
                    }
                }
            }
        }
        count += 1;
    }
    count
}

proptest! {
    /// `spec.md` §8: for a planar embedding, `twin∘twin = id`, `next` is a
    /// permutation whose every orbit closes, and Euler's formula holds.
    #[test]
    fn mesh_invariants_hold_for_any_planar_embedding(graph in small_graph()) {
        let options = PlanarityOptions::default();
        if let Ok(PlanarityResult::Planar { embedding, .. }) = test_planarity(&graph, options) {
            let mesh = build_half_edge_mesh(&graph, &embedding);
            for h in mesh.half_edges() {
                prop_assert_eq!(mesh.twin(mesh.twin(h)), h);
                prop_assert!(mesh.face_cycle_closes(h));
            }
            let total_half_edges: usize = mesh.faces().iter().map(Vec::len).sum();
            prop_assert_eq!(total_half_edges, mesh.half_edge_count());

            let n = graph.vertex_count();
            let m = graph.edge_count();
            let c = connected_components(&graph).max(1);
            prop_assert!(mesh.satisfies_euler_formula(n, m, c));
        }
    }

    /// `spec.md` §5: identical input and options produce bit-identical
    /// output — here, the same rotation system on repeated calls.
    #[test]
    fn planarity_test_is_deterministic(graph in small_graph()) {
        let options = PlanarityOptions::default();
        let first = test_planarity(&graph, options);
        let second = test_planarity(&graph, options);
        match (first, second) {
            (Ok(PlanarityResult::Planar { embedding: a, .. }), Ok(PlanarityResult::Planar { embedding: b, .. })) => {
                prop_assert_eq!(format!("{:?}", a), format!("{:?}", b));
            }
            (Ok(PlanarityResult::NonPlanar { witness: a }), Ok(PlanarityResult::NonPlanar { witness: b })) => {
                prop_assert_eq!(a.kind, b.kind);
                prop_assert_eq!(a.edges, b.edges);
            }
            (Err(_), Err(_)) => {}
            _ => prop_assert!(false, "planarity verdict flip-flopped between runs"),
        }
    }

    /// `spec.md` §8: an edge is a bridge iff it lies in a block of size 1;
    /// a vertex is an articulation point iff it lies in at least two
    /// blocks.
    #[test]
    fn bridges_are_exactly_singleton_blocks(graph in small_graph()) {
        let result = biconnected_components(&graph);
        let mut block_count_of: std::collections::HashMap<VertexId, usize> = std::collections::HashMap::new();
        for block in &result.blocks {
            let mut vertices_in_block = std::collections::HashSet::new();
            for &e in block {
                let rec = graph.edge(e);
                vertices_in_block.insert(rec.u);
                vertices_in_block.insert(rec.v);
            }
            for v in vertices_in_block {
                *block_count_of.entry(v).or_insert(0) += 1;
            }
        }

        let bridge_set: std::collections::HashSet<EdgeId> = result.bridges.iter().copied().collect();
        for block in &result.blocks {
            if block.len() == 1 {
                prop_assert!(bridge_set.contains(&block[0]));
            }
        }
        for &bridge in &result.bridges {
            let containing_single_edge_block = result
                .blocks
                .iter()
                .any(|b| b.len() == 1 && b[0] == bridge);
            prop_assert!(containing_single_edge_block);
        }

        for &articulation in &result.articulation_points {
            prop_assert!(block_count_of.get(&articulation).copied().unwrap_or(0) >= 2);
        }
    }
}
