//! Component E: SPQR decomposition — the triconnectivity-based `S`/`P`/`R`/`Q`
//! tree of a biconnected graph, with per-node skeletons and the
//! flip/permute/materialize operators `spec.md` §4.E names.
//!
//! Triconnectivity here is a bounded brute-force 2-cut search
//! ([`triconnect`]) rather than the linear-time Hopcroft-Tarjan /
//! Gutwenger-Mutzel algorithm `spec.md` describes as the textbook approach
//! — the same "correct, not asymptotically optimal" trade the Kuratowski
//! witness search (`algo::planarity::witness`) already makes. See
//! `DESIGN.md` for the reasoning and its known limitations.

mod ops;
mod triconnect;

pub use self::ops::{flip_skeleton, materialize_embedding, permute_parallel, validate_spqr_tree, SkeletonRotation};

use alloc::vec::Vec;

use crate::algo::bcc::biconnected_components;
use crate::error::{Error, UnsupportedInputReason};
use crate::graph::{EdgeId, Graph, VertexId};

/// Identifies a node within a single [`SpqrTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct SpqrNodeId(pub u32);

impl SpqrNodeId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The four SPQR node kinds (`spec.md` §3): `S`eries (cycle), `P`arallel
/// (bond), `R`igid (triconnected), `Q` (single real edge).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpqrNodeKind {
    S,
    P,
    R,
    Q,
}

/// One skeleton edge: either a real edge of the original graph, or a
/// virtual edge paired with exactly one virtual edge in a neighbouring
/// node's skeleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkeletonEdgeKind {
    Real(EdgeId),
    Virtual(SpqrNodeId),
}

/// A skeleton edge; `a`/`b` are indices into the owning
/// [`SpqrNode::vertex_map`], not original [`VertexId`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkeletonEdge {
    pub a: usize,
    pub b: usize,
    pub kind: SkeletonEdgeKind,
}

/// One node of an [`SpqrTree`]: a tagged skeleton (`spec.md` §3).
#[derive(Debug, Clone)]
pub struct SpqrNode {
    pub kind: SpqrNodeKind,
    /// Maps local skeleton vertex indices back to original graph vertices.
    pub vertex_map: Vec<VertexId>,
    pub edges: Vec<SkeletonEdge>,
}

impl SpqrNode {
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertex_map.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// The SPQR tree of a single biconnected block.
#[derive(Debug, Clone)]
pub struct SpqrTree {
    nodes: Vec<SpqrNode>,
    tree_edges: Vec<(SpqrNodeId, SpqrNodeId)>,
    root: SpqrNodeId,
}

impl SpqrTree {
    #[must_use]
    pub fn nodes(&self) -> &[SpqrNode] {
        &self.nodes
    }

    #[must_use]
    pub fn node(&self, id: SpqrNodeId) -> &SpqrNode {
        &self.nodes[id.index()]
    }

    /// Tree edges connecting nodes through their matched virtual edges.
    #[must_use]
    pub fn tree_edges(&self) -> &[(SpqrNodeId, SpqrNodeId)] {
        &self.tree_edges
    }

    #[must_use]
    pub fn root(&self) -> SpqrNodeId {
        self.root
    }
}

fn block_vertices_and_edges<L>(graph: &Graph<L>, block: &[EdgeId]) -> (Vec<VertexId>, Vec<(VertexId, VertexId, EdgeId)>) {
    let edges: Vec<(VertexId, VertexId, EdgeId)> = block
        .iter()
        .map(|&eid| {
            let rec = graph.edge(eid);
            (rec.u, rec.v, eid)
        })
        .collect();
    let mut vertices: Vec<VertexId> = Vec::new();
    for &(u, v, _) in &edges {
        if !vertices.contains(&u) {
            vertices.push(u);
        }
        if !vertices.contains(&v) {
            vertices.push(v);
        }
    }
    vertices.sort_by_key(VertexId::index);
    (vertices, edges)
}

/// Build the tree for one block. Fails with
/// [`Error::UnsupportedInput`]`(`[`UnsupportedInputReason::ParallelEdges`]`)`
/// for the one shape this decomposition cannot represent: exactly 2
/// vertices joined by exactly 2 parallel edges. A `P`-node needs at least 3
/// parallel edges (`spec.md` §3); with only 2 real edges and no parent
/// virtual edge to make a third (this shape can only occur at the root of a
/// block — every recursive split already guarantees its own bond has ≥3
/// edges, see `triconnect::find_split_pair`), there is no node kind this
/// tree's invariants allow for it. Note this is distinct from exactly 1
/// edge, which is the ordinary bridge/trivial-block case below.
fn decompose_vertices_edges(vertices: Vec<VertexId>, edges: Vec<(VertexId, VertexId, EdgeId)>) -> Result<SpqrTree, Error> {
    if vertices.len() == 2 && edges.len() == 1 {
        let (u, v, eid) = edges[0];
        return Ok(SpqrTree {
            nodes: alloc::vec![SpqrNode {
                kind: SpqrNodeKind::Q,
                vertex_map: alloc::vec![u, v],
                edges: alloc::vec![SkeletonEdge {
                    a: 0,
                    b: 1,
                    kind: SkeletonEdgeKind::Real(eid),
                }],
            }],
            tree_edges: Vec::new(),
            root: SpqrNodeId(0),
        });
    }
    if vertices.len() == 2 && edges.len() == 2 {
        return Err(Error::UnsupportedInput(UnsupportedInputReason::ParallelEdges));
    }
    let (nodes, tree_edges, root) = triconnect::decompose_block(vertices, edges);
    Ok(SpqrTree {
        nodes,
        tree_edges,
        root,
    })
}

/// Decompose a **biconnected** `graph` into its SPQR tree.
///
/// # Errors
/// Returns [`Error::NotBiconnected`] if `graph` is not a single biconnected
/// block, propagates [`Graph::require_undirected`]'s error if `graph`
/// carries directed edges, or returns
/// [`Error::UnsupportedInput`]`(`[`UnsupportedInputReason::ParallelEdges`]`)`
/// if `graph` is exactly 2 vertices joined by exactly 2 parallel edges — the
/// one shape with no valid `P`/`S`/`R`/`Q` representation under this tree's
/// invariants (see [`decompose_vertices_edges`]'s docs). Use
/// [`spqr_decompose_all`] or [`spqr_decompose_safe`] for graphs that are not
/// biconnected.
pub fn spqr_decompose<L>(graph: &Graph<L>) -> Result<SpqrTree, Error> {
    graph.require_undirected(false)?;
    let bcc = biconnected_components(graph);
    if graph.vertex_count() < 2 || bcc.blocks.len() != 1 || !bcc.bridges.is_empty() {
        return Err(Error::NotBiconnected);
    }
    let (vertices, edges) = block_vertices_and_edges(graph, &bcc.blocks[0]);
    decompose_vertices_edges(vertices, edges)
}

/// The forest [`spqr_decompose_all`] returns: one [`SpqrTree`] per
/// biconnected block of `graph` (a bridge becomes a trivial single-`Q`-node
/// tree), plus the shared articulation-point list. `unsupported_blocks`
/// lists, by index into the block order `biconnected_components` produces,
/// any block with no valid SPQR representation (the 2-vertex/2-parallel-edge
/// shape `decompose_vertices_edges` rejects) — `trees` has no entry for
/// those blocks, rather than a tree that would fail [`validate_spqr_tree`].
#[derive(Debug, Clone)]
pub struct SpqrForest {
    pub trees: Vec<SpqrTree>,
    pub articulation_points: Vec<VertexId>,
    pub unsupported_blocks: Vec<usize>,
}

/// Decompose every block of `graph`, biconnected or not.
#[must_use]
pub fn spqr_decompose_all<L>(graph: &Graph<L>) -> SpqrForest {
    let bcc = biconnected_components(graph);
    let mut trees = Vec::new();
    let mut unsupported_blocks = Vec::new();
    for (idx, block) in bcc.blocks.iter().enumerate() {
        let (vertices, edges) = block_vertices_and_edges(graph, block);
        match decompose_vertices_edges(vertices, edges) {
            Ok(tree) => trees.push(tree),
            Err(_) => unsupported_blocks.push(idx),
        }
    }
    SpqrForest {
        trees,
        articulation_points: bcc.articulation_points,
        unsupported_blocks,
    }
}

/// Decompose the **largest** decomposable block of `graph` by edge count
/// (ties broken by smallest minimum edge id, `spec.md` §5), returning its
/// tree alongside a note about which block was chosen — a non-failing
/// alternative to [`spqr_decompose`] for graphs that are not biconnected.
/// Blocks with no valid SPQR representation (see [`SpqrForest`]'s docs) are
/// skipped in favour of the next-largest decomposable one.
///
/// # Errors
/// Returns [`Error::UnsupportedInput`]`(`[`UnsupportedInputReason::ParallelEdges`]`)`
/// if every block of `graph` is that undecomposable shape.
pub fn spqr_decompose_safe<L>(graph: &Graph<L>) -> Result<(SpqrTree, &'static str), Error> {
    let bcc = biconnected_components(graph);
    let mut order: Vec<usize> = (0..bcc.blocks.len()).collect();
    order.sort_by_key(|&idx| {
        let block = &bcc.blocks[idx];
        let min_edge = block.iter().map(EdgeId::index).min().unwrap_or(usize::MAX);
        (core::cmp::Reverse(block.len()), min_edge)
    });
    for idx in order {
        let (vertices, edges) = block_vertices_and_edges(graph, &bcc.blocks[idx]);
        if let Ok(tree) = decompose_vertices_edges(vertices, edges) {
            return Ok((tree, "chose the largest decomposable biconnected block by edge count"));
        }
    }
    Err(Error::UnsupportedInput(UnsupportedInputReason::ParallelEdges))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    fn square_with_diagonal() -> Graph<()> {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let vs: Vec<_> = (0..4).map(|_| b.add_vertex(())).collect();
        b.add_edge(vs[0], vs[1], false).unwrap();
        b.add_edge(vs[1], vs[2], false).unwrap();
        b.add_edge(vs[2], vs[3], false).unwrap();
        b.add_edge(vs[3], vs[0], false).unwrap();
        b.add_edge(vs[0], vs[2], false).unwrap();
        b.build()
    }

    #[test]
    fn square_with_diagonal_is_a_single_rigid_node() {
        let g = square_with_diagonal();
        let tree = spqr_decompose(&g).unwrap();
        assert_eq!(tree.nodes().len(), 1);
        let root = tree.node(tree.root());
        assert_eq!(root.kind, SpqrNodeKind::R);
        assert_eq!(root.vertex_count(), 4);
        assert_eq!(root.edge_count(), 5);
        assert!(validate_spqr_tree(&tree));
    }

    #[test]
    fn triangle_is_a_single_series_node() {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let vs: Vec<_> = (0..3).map(|_| b.add_vertex(())).collect();
        b.add_edge(vs[0], vs[1], false).unwrap();
        b.add_edge(vs[1], vs[2], false).unwrap();
        b.add_edge(vs[2], vs[0], false).unwrap();
        let g = b.build();

        let tree = spqr_decompose(&g).unwrap();
        assert_eq!(tree.nodes().len(), 1);
        let root = tree.node(tree.root());
        assert_eq!(root.kind, SpqrNodeKind::S);
        assert_eq!(root.vertex_count(), 3);
        assert!(validate_spqr_tree(&tree));
    }

    #[test]
    fn three_parallel_edges_form_a_single_parallel_node() {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let a = b.add_vertex(());
        let c = b.add_vertex(());
        b.add_edge(a, c, false).unwrap();
        b.add_edge(a, c, false).unwrap();
        b.add_edge(a, c, false).unwrap();
        let g = b.build();

        let tree = spqr_decompose(&g).unwrap();
        assert_eq!(tree.nodes().len(), 1);
        let root = tree.node(tree.root());
        assert_eq!(root.kind, SpqrNodeKind::P);
        assert_eq!(root.edge_count(), 3);
        assert!(validate_spqr_tree(&tree));
    }

    #[test]
    fn non_biconnected_graph_is_rejected() {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let vs: Vec<_> = (0..3).map(|_| b.add_vertex(())).collect();
        b.add_edge(vs[0], vs[1], false).unwrap();
        b.add_edge(vs[1], vs[2], false).unwrap();
        let g = b.build();
        assert!(matches!(spqr_decompose(&g), Err(Error::NotBiconnected)));
    }

    #[test]
    fn decompose_all_gives_one_trivial_q_tree_per_bridge() {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let vs: Vec<_> = (0..3).map(|_| b.add_vertex(())).collect();
        b.add_edge(vs[0], vs[1], false).unwrap();
        b.add_edge(vs[1], vs[2], false).unwrap();
        let g = b.build();

        let forest = spqr_decompose_all(&g);
        assert_eq!(forest.trees.len(), 2);
        assert_eq!(forest.articulation_points, alloc::vec![vs[1]]);
        for tree in &forest.trees {
            assert_eq!(tree.nodes().len(), 1);
            assert_eq!(tree.node(tree.root()).kind, SpqrNodeKind::Q);
            assert!(validate_spqr_tree(tree));
        }
    }

    #[test]
    fn decompose_safe_picks_the_larger_block() {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let vs: Vec<_> = (0..6).map(|_| b.add_vertex(())).collect();
        // A bridge 0-1 plus a triangle 1-2-3-1, joined at vertex 1; then
        // another bridge 3-4 and a lone edge 4-5.
        b.add_edge(vs[0], vs[1], false).unwrap();
        b.add_edge(vs[1], vs[2], false).unwrap();
        b.add_edge(vs[2], vs[3], false).unwrap();
        b.add_edge(vs[3], vs[1], false).unwrap();
        b.add_edge(vs[3], vs[4], false).unwrap();
        b.add_edge(vs[4], vs[5], false).unwrap();
        let g = b.build();

        let (tree, note) = spqr_decompose_safe(&g).unwrap();
        assert_eq!(note, "chose the largest decomposable biconnected block by edge count");
        assert_eq!(tree.nodes().len(), 1);
        assert_eq!(tree.node(tree.root()).kind, SpqrNodeKind::S);
        assert_eq!(tree.node(tree.root()).vertex_count(), 3);
    }

    #[test]
    fn two_parallel_edges_have_no_valid_spqr_tree() {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let a = b.add_vertex(());
        let c = b.add_vertex(());
        b.add_edge(a, c, false).unwrap();
        b.add_edge(a, c, false).unwrap();
        let g = b.build();

        assert!(matches!(
            spqr_decompose(&g),
            Err(Error::UnsupportedInput(UnsupportedInputReason::ParallelEdges))
        ));

        let forest = spqr_decompose_all(&g);
        assert!(forest.trees.is_empty());
        assert_eq!(forest.unsupported_blocks, alloc::vec![0]);

        assert!(matches!(
            spqr_decompose_safe(&g),
            Err(Error::UnsupportedInput(UnsupportedInputReason::ParallelEdges))
        ));
    }

    #[test]
    fn decompose_safe_skips_an_unsupported_block_for_a_smaller_valid_one() {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let vs: Vec<_> = (0..5).map(|_| b.add_vertex(())).collect();
        // Two parallel edges between 0-1 (the largest block by raw edge
        // count is a tie, but undecomposable) plus a triangle 2-3-4.
        b.add_edge(vs[0], vs[1], false).unwrap();
        b.add_edge(vs[0], vs[1], false).unwrap();
        b.add_edge(vs[2], vs[3], false).unwrap();
        b.add_edge(vs[3], vs[4], false).unwrap();
        b.add_edge(vs[4], vs[2], false).unwrap();
        let g = b.build();

        let (tree, _note) = spqr_decompose_safe(&g).unwrap();
        assert_eq!(tree.node(tree.root()).kind, SpqrNodeKind::S);
        assert_eq!(tree.node(tree.root()).vertex_count(), 3);
    }
}
