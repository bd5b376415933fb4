//! The planarization pipeline (`spec.md` §4.I): makes a nonplanar graph
//! drawable by growing a maximal planar subgraph incrementally, then
//! routing every edge that didn't survive through the fixed embedding one
//! dummy vertex at a time.
//!
//! The "working graph" is never the caller's [`Graph`] itself — it is a
//! private, ever-growing edge list (`Working`) rebuilt into a fresh
//! [`Graph`] before every planarity test and routing call, the same
//! rebuild-don't-mutate posture [`crate::graph::Graph`] takes everywhere
//! else in this crate. Each working edge remembers which original edge id
//! it is a fragment of, so the final drawing can stitch a multi-dummy
//! chain back into one [`EdgePath`] per original edge.

use alloc::vec::Vec;

use crate::algo::dual::route_edge_fixed_embedding;
use crate::algo::planarity::{test_planarity, PlanarityOptions, PlanarityResult, SelfLoopPolicy};
use crate::error::Error;
use crate::graph::{EdgeId, Graph, GraphBuilder, VertexId};
use crate::mesh::build_half_edge_mesh;

use super::orthogonal::orthogonal_layout;
use super::straight_line::planar_straight_line;
use super::{self_loop_quad, EdgePath, LayoutResult, LayoutStats, PlanarizationMode, PlanarizationResult, Point};

#[derive(Debug, Clone, Copy)]
struct WorkingEdge {
    origin: EdgeId,
    u: VertexId,
    v: VertexId,
}

/// The growing edge list the pipeline routes into. `edges`/`active` are
/// parallel and indexed by a stable "working id" that never changes once
/// assigned; a split tombstones its edge and appends two new ones rather
/// than shifting indices, so every earlier reference to a working id stays
/// valid (`spec.md` §9: ids, never back-pointers).
struct Working {
    edges: Vec<WorkingEdge>,
    active: Vec<bool>,
    vertex_count: usize,
    origin_segments: Vec<Vec<usize>>,
}

impl Working {
    fn new(vertex_count: usize, edge_count: usize) -> Self {
        Working {
            edges: Vec::new(),
            active: Vec::new(),
            vertex_count,
            origin_segments: alloc::vec![Vec::new(); edge_count],
        }
    }

    fn add(&mut self, origin: EdgeId, u: VertexId, v: VertexId) -> usize {
        let id = self.edges.len();
        self.edges.push(WorkingEdge { origin, u, v });
        self.active.push(true);
        id
    }

    fn new_vertex(&mut self) -> VertexId {
        let id = VertexId(self.vertex_count as u32);
        self.vertex_count += 1;
        id
    }

    /// Rebuild a compact [`Graph`] from every still-active working edge,
    /// plus the map from a compacted graph edge id back to its working id
    /// (callers need this to translate a routed [`EdgeId`] back into
    /// [`WorkingEdge`] state).
    fn build_graph(&self) -> (Graph<()>, Vec<usize>) {
        let mut builder: GraphBuilder<()> = GraphBuilder::with_capacity(self.vertex_count, self.edges.len());
        for _ in 0..self.vertex_count {
            builder.add_vertex(());
        }
        let mut map = Vec::with_capacity(self.edges.len());
        for (id, edge) in self.edges.iter().enumerate() {
            if self.active[id] {
                builder
                    .add_edge(edge.u, edge.v, false)
                    .expect("working edge endpoints are always in range");
                map.push(id);
            }
        }
        (builder.build(), map)
    }

    /// Split working edge `id` at a freshly allocated dummy vertex,
    /// replacing it in place (within its origin's segment chain) by the two
    /// halves, in `u -> dummy` then `dummy -> v` order so the chain remains
    /// walkable from the original edge's `u` to its `v`.
    fn split(&mut self, id: usize) -> VertexId {
        let edge = self.edges[id];
        self.active[id] = false;
        let dummy = self.new_vertex();
        let head = self.add(edge.origin, edge.u, dummy);
        let tail = self.add(edge.origin, dummy, edge.v);
        let segs = &mut self.origin_segments[edge.origin.index()];
        let pos = segs
            .iter()
            .position(|&w| w == id)
            .expect("a working edge's origin always lists it until split");
        segs.splice(pos..=pos, [head, tail]);
        dummy
    }
}

const PLANARITY_OPTIONS: PlanarityOptions = PlanarityOptions {
    self_loops: SelfLoopPolicy::Ignore,
    force_undirected: true,
};

fn embed(graph: &Graph<()>) -> Result<crate::rotation::RotationSystem, Error> {
    match test_planarity(graph, PLANARITY_OPTIONS)? {
        PlanarityResult::Planar { embedding, .. } => Ok(embedding),
        PlanarityResult::NonPlanar { .. } => Err(Error::InternalInvariantViolation(
            "planarization's working graph became nonplanar; a split or kept edge broke planarity",
        )),
    }
}

/// Compute a maximal planar subgraph of `graph` incrementally (`spec.md`
/// §4.I step 1): edges are offered in insertion order, and kept iff the
/// candidate (kept-so-far plus this edge) is still planar. Self-loops never
/// affect planarity and are always kept directly.
fn grow_maximal_planar_subgraph<L>(graph: &Graph<L>, working: &mut Working) -> Result<Vec<EdgeId>, Error> {
    let n = graph.vertex_count();
    let mut remaining = Vec::new();
    let mut kept_pairs: Vec<(VertexId, VertexId)> = Vec::new();

    for e in graph.edge_ids() {
        let rec = graph.edge(e);
        if rec.is_self_loop() {
            let id = working.add(e, rec.u, rec.v);
            working.origin_segments[e.index()].push(id);
            continue;
        }

        let mut candidate: GraphBuilder<()> = GraphBuilder::with_capacity(n, kept_pairs.len() + 1);
        for _ in 0..n {
            candidate.add_vertex(());
        }
        for &(u, v) in &kept_pairs {
            candidate.add_edge(u, v, false).expect("endpoints in range");
        }
        candidate
            .add_edge(rec.u, rec.v, false)
            .expect("endpoints in range");
        let candidate = candidate.build();

        match test_planarity(&candidate, PLANARITY_OPTIONS)? {
            PlanarityResult::Planar { .. } => {
                kept_pairs.push((rec.u, rec.v));
                let id = working.add(e, rec.u, rec.v);
                working.origin_segments[e.index()].push(id);
            }
            PlanarityResult::NonPlanar { .. } => remaining.push(e),
        }
    }

    Ok(remaining)
}

/// Insert every edge in `remaining` into the (now planar) working graph:
/// build its mesh, route it through the dual, and replace every crossed
/// primal edge with a dummy-vertex split (`spec.md` §4.I step 2).
fn insert_remaining_edges<L>(graph: &Graph<L>, working: &mut Working, remaining: &[EdgeId]) -> Result<(), Error> {
    for &e in remaining {
        let rec = graph.edge(e);
        let (candidate, graph_to_working) = working.build_graph();
        let embedding = embed(&candidate)?;
        let mesh = build_half_edge_mesh(&candidate, &embedding);
        let route = route_edge_fixed_embedding(&mesh, rec.u, rec.v).ok_or(
            Error::InternalInvariantViolation("planarization route endpoint missing from mesh"),
        )?;

        let mut dummies = Vec::with_capacity(route.crossed_primal_edges.len());
        for &crossed in &route.crossed_primal_edges {
            let working_id = graph_to_working[crossed.index()];
            dummies.push(working.split(working_id));
        }

        let mut prev = rec.u;
        let mut chain = Vec::with_capacity(dummies.len() + 1);
        for &dummy in &dummies {
            chain.push(working.add(e, prev, dummy));
            prev = dummy;
        }
        chain.push(working.add(e, prev, rec.v));
        working.origin_segments[e.index()] = chain;
    }
    Ok(())
}

/// Planarize `graph` and draw it (`spec.md` §4.I): grow a maximal planar
/// subgraph, route every surviving edge through the fixed embedding with
/// dummy-vertex splits, then draw the resulting (planar-by-construction)
/// graph in `mode` and expand every original edge's polyline through its
/// assigned dummy chain.
///
/// # Errors
/// Propagates [`Error::Layout`] if `mode` is [`PlanarizationMode::Orthogonal`]
/// and the bend-minimisation flow is infeasible, or
/// [`Error::InternalInvariantViolation`] if an internal planarity
/// invariant is violated (a bug, never a property of valid input).
pub fn planarization_layout<L>(graph: &Graph<L>, mode: PlanarizationMode) -> Result<PlanarizationResult, Error> {
    let n = graph.vertex_count();
    let m = graph.edge_count();
    let mut working = Working::new(n, m);

    let remaining = grow_maximal_planar_subgraph(graph, &mut working)?;
    insert_remaining_edges(graph, &mut working, &remaining)?;

    let (final_graph, _map) = working.build_graph();
    let embedding = embed(&final_graph)?;
    let mesh = build_half_edge_mesh(&final_graph, &embedding);

    let base_layout = match mode {
        PlanarizationMode::Straight => planar_straight_line(&mesh),
        PlanarizationMode::Orthogonal => orthogonal_layout(&mesh)?,
    };

    let mut edge_paths = Vec::with_capacity(m);
    for orig in graph.edge_ids() {
        let segs = &working.origin_segments[orig.index()];
        let points: Vec<Point> = if graph.edge(orig).is_self_loop() {
            let v = working.edges[segs[0]].u;
            self_loop_quad(base_layout.position(v))
        } else {
            let mut points = Vec::with_capacity(segs.len() + 1);
            for (i, &seg_id) in segs.iter().enumerate() {
                let seg = working.edges[seg_id];
                if i == 0 {
                    points.push(base_layout.position(seg.u));
                }
                points.push(base_layout.position(seg.v));
            }
            points
        };
        edge_paths.push(EdgePath { edge: orig, points });
    }

    let bends: usize = match mode {
        PlanarizationMode::Orthogonal => edge_paths.iter().map(|p| p.points.len().saturating_sub(2)).sum(),
        PlanarizationMode::Straight => 0,
    };

    let layout = LayoutResult {
        positions: base_layout.positions().to_vec(),
        edge_paths,
        stats: LayoutStats {
            bends,
            area: base_layout.stats.area,
            crossings: working.vertex_count - n,
        },
    };

    Ok(PlanarizationResult {
        layout,
        remaining_edges: remaining,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    fn k5() -> Graph<()> {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let vs: Vec<_> = (0..5).map(|_| b.add_vertex(())).collect();
        for i in 0..5 {
            for j in (i + 1)..5 {
                b.add_edge(vs[i], vs[j], false).unwrap();
            }
        }
        b.build()
    }

    fn k33() -> Graph<()> {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let vs: Vec<_> = (0..6).map(|_| b.add_vertex(())).collect();
        for i in 0..3 {
            for j in 3..6 {
                b.add_edge(vs[i], vs[j], false).unwrap();
            }
        }
        b.build()
    }

    #[test]
    fn k5_planarizes_with_one_dummy_vertex() {
        let g = k5();
        let result = planarization_layout(&g, PlanarizationMode::Straight).unwrap();
        assert_eq!(result.remaining_edges.len(), 1);
        assert_eq!(result.layout.stats.crossings, 1);
        assert_eq!(result.layout.edge_paths().len(), g.edge_count());
    }

    #[test]
    fn k33_planarizes_with_one_dummy_vertex() {
        let g = k33();
        let result = planarization_layout(&g, PlanarizationMode::Straight).unwrap();
        assert_eq!(result.remaining_edges.len(), 1);
        assert_eq!(result.layout.stats.crossings, 1);
    }

    #[test]
    fn planar_input_needs_no_dummy_vertices() {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let vs: Vec<_> = (0..3).map(|_| b.add_vertex(())).collect();
        b.add_edge(vs[0], vs[1], false).unwrap();
        b.add_edge(vs[1], vs[2], false).unwrap();
        b.add_edge(vs[2], vs[0], false).unwrap();
        let g = b.build();

        let result = planarization_layout(&g, PlanarizationMode::Straight).unwrap();
        assert!(result.remaining_edges.is_empty());
        assert_eq!(result.layout.stats.crossings, 0);
    }

    #[test]
    fn every_original_edge_gets_a_polyline_that_starts_and_ends_at_its_endpoints() {
        let g = k5();
        let result = planarization_layout(&g, PlanarizationMode::Straight).unwrap();
        for path in result.layout.edge_paths() {
            let rec = g.edge(path.edge);
            let expected_start = result.layout.position(rec.u);
            let expected_end = result.layout.position(rec.v);
            assert_eq!(path.points.first().copied(), Some(expected_start));
            assert_eq!(path.points.last().copied(), Some(expected_end));
        }
    }

    #[test]
    fn orthogonal_mode_planarizes_k5() {
        let g = k5();
        let result = planarization_layout(&g, PlanarizationMode::Orthogonal).unwrap();
        assert_eq!(result.remaining_edges.len(), 1);
        assert_eq!(result.layout.stats.crossings, 1);
    }
}
