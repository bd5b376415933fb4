//! Component B core: the low-link DFS shared by biconnected-component,
//! articulation-point, and bridge detection.
//!
//! Grounded on `petgraph::algo::connectivity::{biconnected_components,
//! cut_vertices}` (color/pre/low bookkeeping) and the `pbialekk-spqr_trees`
//! block-cut-tree DFS (edge-id-indexed edge-stack block emission, which is
//! what lets this handle parallel edges and self-loops correctly where a
//! parent-vertex check alone would not).

use alloc::vec::Vec;

use crate::graph::{EdgeId, Graph, VertexId};

/// The result of one low-link DFS pass over (possibly disconnected) `graph`.
#[derive(Debug, Clone)]
pub struct LowLinkResult {
    /// DFS preorder number per vertex, assigned in visit order.
    pub disc: Vec<u32>,
    /// Lowest preorder reachable from the subtree rooted at each vertex.
    pub low: Vec<u32>,
    /// Whether each vertex is an articulation point.
    pub is_articulation: Vec<bool>,
    /// Biconnected blocks, each a list of edge ids, in DFS-completion order.
    pub blocks: Vec<Vec<EdgeId>>,
    /// Whether each edge is a bridge (lies in a block of size 1).
    pub is_bridge: Vec<bool>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum EdgeLabel {
    Unvisited,
    Tree,
    Back,
}

struct State<'g, L> {
    graph: &'g Graph<L>,
    time: u32,
    disc: Vec<u32>,
    low: Vec<u32>,
    edge_label: Vec<EdgeLabel>,
    edge_stack: Vec<EdgeId>,
    is_articulation: Vec<bool>,
    blocks: Vec<Vec<EdgeId>>,
}

const UNVISITED: u32 = u32::MAX;

impl<'g, L> State<'g, L> {
    fn visit(&mut self, v: VertexId, parent_edge: Option<EdgeId>) {
        self.disc[v.index()] = self.time;
        self.low[v.index()] = self.time;
        self.time += 1;
        let mut child_count = 0u32;

        for &edge_id in self.graph.adjacency(v) {
            if self.edge_label[edge_id.index()] != EdgeLabel::Unvisited {
                continue;
            }
            if Some(edge_id) == parent_edge {
                // Consume exactly one occurrence of the parent edge; a
                // second parallel copy is a legitimate back edge.
                continue;
            }
            let rec = self.graph.edge(edge_id);
            if rec.is_self_loop() {
                self.edge_label[edge_id.index()] = EdgeLabel::Back;
                self.blocks.push(alloc::vec![edge_id]);
                continue;
            }
            let w = rec.other(v).expect("edge incident to v");
            if self.disc[w.index()] == UNVISITED {
                self.edge_label[edge_id.index()] = EdgeLabel::Tree;
                child_count += 1;
                let stack_mark = self.edge_stack.len();
                self.edge_stack.push(edge_id);
                self.visit(w, Some(edge_id));
                let low_w = self.low[w.index()];
                if low_w < self.low[v.index()] {
                    self.low[v.index()] = low_w;
                }
                if low_w >= self.disc[v.index()] {
                    if parent_edge.is_some() || child_count > 1 {
                        self.is_articulation[v.index()] = true;
                    }
                    let block: Vec<EdgeId> = self.edge_stack.split_off(stack_mark);
                    self.blocks.push(block);
                }
            } else if self.disc[w.index()] < self.disc[v.index()] {
                self.edge_label[edge_id.index()] = EdgeLabel::Back;
                self.edge_stack.push(edge_id);
                if self.disc[w.index()] < self.low[v.index()] {
                    self.low[v.index()] = self.disc[w.index()];
                }
            }
        }

        if parent_edge.is_none() && child_count > 1 {
            self.is_articulation[v.index()] = true;
        }
    }
}

/// Run the low-link DFS over every connected component of `graph`, visiting
/// roots and each vertex's adjacency in insertion/id order for determinism.
#[must_use]
pub fn low_link_components<L>(graph: &Graph<L>) -> LowLinkResult {
    let n = graph.vertex_count();
    let m = graph.edge_count();
    let mut state = State {
        graph,
        time: 0,
        disc: alloc::vec![UNVISITED; n],
        low: alloc::vec![0; n],
        edge_label: alloc::vec![EdgeLabel::Unvisited; m],
        edge_stack: Vec::new(),
        is_articulation: alloc::vec![false; n],
        blocks: Vec::new(),
    };

    for v in graph.vertices() {
        if state.disc[v.index()] == UNVISITED {
            state.visit(v, None);
        }
    }

    let mut is_bridge = alloc::vec![false; m];
    for block in &state.blocks {
        if block.len() == 1 {
            is_bridge[block[0].index()] = true;
        }
    }

    LowLinkResult {
        disc: state.disc,
        low: state.low,
        is_articulation: state.is_articulation,
        blocks: state.blocks,
        is_bridge,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    #[test]
    fn path_of_three_edges_is_all_bridges() {
        // 0 - 1 - 2 - 3
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let vs: Vec<_> = (0..4).map(|_| b.add_vertex(())).collect();
        b.add_edge(vs[0], vs[1], false).unwrap();
        b.add_edge(vs[1], vs[2], false).unwrap();
        b.add_edge(vs[2], vs[3], false).unwrap();
        let g = b.build();
        let result = low_link_components(&g);
        assert_eq!(result.blocks.len(), 3);
        assert!(result.is_bridge.iter().all(|&b| b));
        assert!(result.is_articulation[vs[1].index()]);
        assert!(result.is_articulation[vs[2].index()]);
        assert!(!result.is_articulation[vs[0].index()]);
    }

    #[test]
    fn triangle_is_one_block_no_bridges() {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let vs: Vec<_> = (0..3).map(|_| b.add_vertex(())).collect();
        b.add_edge(vs[0], vs[1], false).unwrap();
        b.add_edge(vs[1], vs[2], false).unwrap();
        b.add_edge(vs[2], vs[0], false).unwrap();
        let g = b.build();
        let result = low_link_components(&g);
        assert_eq!(result.blocks.len(), 1);
        assert_eq!(result.blocks[0].len(), 3);
        assert!(result.is_bridge.iter().all(|&b| !b));
        assert!(result.is_articulation.iter().all(|&a| !a));
    }

    #[test]
    fn parallel_edges_form_one_block() {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let a = b.add_vertex(());
        let c = b.add_vertex(());
        b.add_edge(a, c, false).unwrap();
        b.add_edge(a, c, false).unwrap();
        let g = b.build();
        let result = low_link_components(&g);
        assert_eq!(result.blocks.len(), 1);
        assert_eq!(result.blocks[0].len(), 2);
        assert!(!result.is_bridge[0]);
        assert!(!result.is_bridge[1]);
    }
}
