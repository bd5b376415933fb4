//! Component B: biconnected components, articulation points, bridges, and
//! the bipartite BC-tree built from them.
//!
//! Grounded on `petgraph::algo::connectivity::{biconnected_components,
//! cut_vertices}` for the public-surface shape, and on the
//! `pbialekk-spqr_trees` block-cut-tree construction for the BC-tree itself.

use alloc::vec::Vec;

use crate::algo::dfs::low_link_components;
use crate::graph::{EdgeId, Graph, VertexId};

/// The result of decomposing `graph` into biconnected blocks.
#[derive(Debug, Clone)]
pub struct BccResult {
    /// Biconnected blocks, each a list of edge ids. A bridge is its own
    /// block of length 1 (`spec.md` §3's "edge is a bridge ⇔ it lies in a
    /// block of size 1").
    pub blocks: Vec<Vec<EdgeId>>,
    /// Vertices whose removal disconnects `graph`.
    pub articulation_points: Vec<VertexId>,
    /// Edge ids that are bridges.
    pub bridges: Vec<EdgeId>,
    /// `block_membership[v]` lists the indices into `blocks` that vertex
    /// `v` participates in; an articulation vertex participates in 2 or
    /// more.
    block_membership: Vec<Vec<usize>>,
}

impl BccResult {
    /// Indices into [`BccResult::blocks`] that vertex `v` participates in.
    #[must_use]
    pub fn blocks_containing(&self, v: VertexId) -> &[usize] {
        &self.block_membership[v.index()]
    }
}

/// Decompose `graph` into biconnected blocks, articulation points, and
/// bridges. Works on disconnected graphs: each connected component is
/// decomposed independently.
#[must_use]
pub fn biconnected_components<L>(graph: &Graph<L>) -> BccResult {
    let low_link = low_link_components(graph);
    let n = graph.vertex_count();

    let articulation_points: Vec<VertexId> = (0..n)
        .filter(|&i| low_link.is_articulation[i])
        .map(|i| VertexId(i as u32))
        .collect();

    let bridges: Vec<EdgeId> = graph
        .edge_ids()
        .filter(|e| low_link.is_bridge[e.index()])
        .collect();

    let mut block_membership: Vec<Vec<usize>> = alloc::vec![Vec::new(); n];
    for (block_idx, block) in low_link.blocks.iter().enumerate() {
        let mut seen_here = hashbrown::HashSet::new();
        for &edge_id in block {
            let rec = graph.edge(edge_id);
            for v in [rec.u, rec.v] {
                if seen_here.insert(v) {
                    block_membership[v.index()].push(block_idx);
                }
            }
        }
    }

    BccResult {
        blocks: low_link.blocks,
        articulation_points,
        bridges,
        block_membership,
    }
}

/// A node of a [`BcTree`]: either one of [`BccResult::blocks`] or an
/// articulation vertex of the original graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BcNode {
    /// Indexes into the originating [`BccResult::blocks`].
    Block(usize),
    /// An articulation vertex of the originating graph.
    CutVertex(VertexId),
}

/// The bipartite block-cut tree of `spec.md` §3: block nodes and
/// articulation-vertex nodes, with a tree edge between a block and each
/// articulation vertex it contains.
#[derive(Debug, Clone)]
pub struct BcTree {
    nodes: Vec<BcNode>,
    edges: Vec<(usize, usize)>,
}

impl BcTree {
    #[must_use]
    pub fn nodes(&self) -> &[BcNode] {
        &self.nodes
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Tree edges as pairs of node indices into [`BcTree::nodes`].
    #[must_use]
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }
}

/// Build the BC-tree from a graph and its already-computed [`BccResult`].
/// Block nodes are emitted first, in `bcc.blocks` order, followed by cut
/// vertex nodes in increasing vertex-id order — a deterministic layout
/// regardless of which order `bcc` happened to discover them in.
#[must_use]
pub fn build_bc_tree<L>(graph: &Graph<L>, bcc: &BccResult) -> BcTree {
    let mut nodes = Vec::with_capacity(bcc.blocks.len() + bcc.articulation_points.len());
    for idx in 0..bcc.blocks.len() {
        nodes.push(BcNode::Block(idx));
    }
    let mut cut_vertex_node = hashbrown::HashMap::new();
    for &v in &bcc.articulation_points {
        cut_vertex_node.insert(v, nodes.len());
        nodes.push(BcNode::CutVertex(v));
    }

    let mut edges = Vec::new();
    for &v in &bcc.articulation_points {
        let cut_idx = cut_vertex_node[&v];
        for &block_idx in bcc.blocks_containing(v) {
            edges.push((block_idx, cut_idx));
        }
    }
    let _ = graph; // kept for API symmetry with other `build_*` functions
    BcTree { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    #[test]
    fn path_of_three_edges_has_three_blocks_and_five_bc_tree_nodes() {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let vs: Vec<_> = (0..4).map(|_| b.add_vertex(())).collect();
        b.add_edge(vs[0], vs[1], false).unwrap();
        b.add_edge(vs[1], vs[2], false).unwrap();
        b.add_edge(vs[2], vs[3], false).unwrap();
        let g = b.build();

        let bcc = biconnected_components(&g);
        assert_eq!(bcc.blocks.len(), 3);
        assert_eq!(bcc.bridges.len(), 3);
        assert_eq!(bcc.articulation_points.len(), 2);
        assert!(bcc.articulation_points.contains(&vs[1]));
        assert!(bcc.articulation_points.contains(&vs[2]));

        let tree = build_bc_tree(&g, &bcc);
        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.edges().len(), 4);
    }

    #[test]
    fn square_with_diagonal_is_a_single_block() {
        // 0-1-2-3-0 plus diagonal 0-2.
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let vs: Vec<_> = (0..4).map(|_| b.add_vertex(())).collect();
        b.add_edge(vs[0], vs[1], false).unwrap();
        b.add_edge(vs[1], vs[2], false).unwrap();
        b.add_edge(vs[2], vs[3], false).unwrap();
        b.add_edge(vs[3], vs[0], false).unwrap();
        b.add_edge(vs[0], vs[2], false).unwrap();
        let g = b.build();

        let bcc = biconnected_components(&g);
        assert_eq!(bcc.blocks.len(), 1);
        assert!(bcc.bridges.is_empty());
        assert!(bcc.articulation_points.is_empty());

        let tree = build_bc_tree(&g, &bcc);
        assert_eq!(tree.node_count(), 1);
        assert!(tree.edges().is_empty());
    }

    #[test]
    fn disconnected_graph_decomposes_each_component_independently() {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let vs: Vec<_> = (0..4).map(|_| b.add_vertex(())).collect();
        b.add_edge(vs[0], vs[1], false).unwrap();
        b.add_edge(vs[2], vs[3], false).unwrap();
        let g = b.build();

        let bcc = biconnected_components(&g);
        assert_eq!(bcc.blocks.len(), 2);
        assert_eq!(bcc.bridges.len(), 2);
        assert!(bcc.articulation_points.is_empty());
    }
}
