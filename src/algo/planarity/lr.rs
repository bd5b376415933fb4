//! The de Fraysseix-Rosenstiehl / Brandes **left-right planarity test**.
//!
//! Three passes over a DFS tree, all keyed by edge id rather than vertex
//! pair so parallel edges never need special-casing inside the core:
//!
//! 1. **Orientation** — a DFS that orients every edge away from the root,
//!    computing `height`, `lowpt`/`lowpt2`, and a `nesting_depth` used to
//!    sort each vertex's DFS-successor edges.
//! 2. **Testing** — a second DFS that merges "conflict pairs" of interval
//!    of return edges on a stack; a merge that can't be resolved without
//!    crossing proves the graph nonplanar.
//! 2. **Embedding** — once every root passes testing, the `side` bits
//!    accumulated during testing are resolved (via `ref` chains) and used
//!    to splice each back edge into its ancestor's rotation, giving a
//!    rotation system consistent with a planar embedding.
//!
//! `excluded` is the set of edges the caller has already decided not to
//! feed to the core (redundant parallel copies and self-loops): with those
//! removed the remaining graph is simple, which is what this test assumes.

use alloc::vec::Vec;

use crate::graph::{EdgeId, Graph, VertexId};
use crate::rotation::RotationSystem;

#[derive(Debug, Clone, Copy, Default)]
struct Interval {
    low: Option<EdgeId>,
    high: Option<EdgeId>,
}

impl Interval {
    fn is_empty(&self) -> bool {
        self.low.is_none()
    }

    fn conflicting(&self, b: EdgeId, lowpt: &[u32]) -> bool {
        match self.high {
            Some(h) => lowpt[h.index()] > lowpt[b.index()],
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct ConflictPair {
    left: Interval,
    right: Interval,
}

impl ConflictPair {
    fn swap(&mut self) {
        core::mem::swap(&mut self.left, &mut self.right);
    }

    fn lowest(&self, lowpt: &[u32]) -> u32 {
        match (self.left.low, self.right.low) {
            (None, None) => u32::MAX,
            (None, Some(r)) => lowpt[r.index()],
            (Some(l), None) => lowpt[l.index()],
            (Some(l), Some(r)) => lowpt[l.index()].min(lowpt[r.index()]),
        }
    }
}

struct Orientation {
    height: Vec<Option<u32>>,
    lowpt: Vec<u32>,
    lowpt2: Vec<u32>,
    nesting_depth: Vec<u32>,
    dg_from: Vec<VertexId>,
    dg_to: Vec<VertexId>,
    is_tree: Vec<bool>,
    oriented: Vec<bool>,
    roots: Vec<VertexId>,
}

fn orient<L>(graph: &Graph<L>, excluded: &hashbrown::HashSet<EdgeId>) -> Orientation {
    let n = graph.vertex_count();
    let m = graph.edge_count();
    let mut o = Orientation {
        height: alloc::vec![None; n],
        lowpt: alloc::vec![0; m],
        lowpt2: alloc::vec![0; m],
        nesting_depth: alloc::vec![0; m],
        dg_from: alloc::vec![VertexId(0); m],
        dg_to: alloc::vec![VertexId(0); m],
        is_tree: alloc::vec![false; m],
        oriented: alloc::vec![false; m],
        roots: Vec::new(),
    };
    for v in graph.vertices() {
        if o.height[v.index()].is_none() {
            o.height[v.index()] = Some(0);
            o.roots.push(v);
            orient_from(graph, v, None, excluded, &mut o);
        }
    }
    o
}

fn orient_from<L>(
    graph: &Graph<L>,
    v: VertexId,
    parent_edge: Option<EdgeId>,
    excluded: &hashbrown::HashSet<EdgeId>,
    o: &mut Orientation,
) {
    let v_height = o.height[v.index()].expect("v visited before recursing");
    for &ei in graph.adjacency(v) {
        if excluded.contains(&ei) || o.oriented[ei.index()] {
            continue;
        }
        let rec = graph.edge(ei);
        let w = match rec.other(v) {
            Some(w) => w,
            None => continue, // self-loop; never reaches here since excluded.
        };
        o.oriented[ei.index()] = true;
        o.dg_from[ei.index()] = v;
        o.dg_to[ei.index()] = w;

        if o.height[w.index()].is_none() {
            o.is_tree[ei.index()] = true;
            o.height[w.index()] = Some(v_height + 1);
            o.lowpt[ei.index()] = v_height;
            o.lowpt2[ei.index()] = v_height;
            orient_from(graph, w, Some(ei), excluded, o);
        } else {
            o.lowpt[ei.index()] = o.height[w.index()].expect("ancestor already visited");
            o.lowpt2[ei.index()] = v_height;
        }

        let lp = o.lowpt[ei.index()];
        o.nesting_depth[ei.index()] = 2 * lp + u32::from(o.lowpt2[ei.index()] < v_height);

        if let Some(e) = parent_edge {
            if lp < o.lowpt[e.index()] {
                o.lowpt2[e.index()] = o.lowpt[e.index()].min(o.lowpt2[ei.index()]);
                o.lowpt[e.index()] = lp;
            } else if lp > o.lowpt[e.index()] {
                o.lowpt2[e.index()] = o.lowpt2[e.index()].min(lp);
            } else {
                o.lowpt2[e.index()] = o.lowpt2[e.index()].min(o.lowpt2[ei.index()]);
            }
        }
    }
}

struct TestState {
    height: Vec<Option<u32>>,
    lowpt: Vec<u32>,
    dg_from: Vec<VertexId>,
    dg_to: Vec<VertexId>,
    is_tree: Vec<bool>,
    ordered_adjs: Vec<Vec<EdgeId>>,
    stack: Vec<ConflictPair>,
    stack_bottom: Vec<usize>,
    lowpt_edge: Vec<Option<EdgeId>>,
    ref_edge: Vec<Option<EdgeId>>,
    side: Vec<i8>,
}

fn top_conflicts(state: &TestState, ei: EdgeId) -> bool {
    match state.stack.last() {
        Some(top) => top.left.conflicting(ei, &state.lowpt) || top.right.conflicting(ei, &state.lowpt),
        None => false,
    }
}

fn add_constraints(ei: EdgeId, e: EdgeId, state: &mut TestState) -> bool {
    let mut p = ConflictPair::default();
    loop {
        let mut q = match state.stack.pop() {
            Some(q) => q,
            None => return false,
        };
        if !q.left.is_empty() {
            q.swap();
        }
        if !q.left.is_empty() {
            return false;
        }
        if let Some(q_right_low) = q.right.low {
            if state.lowpt[q_right_low.index()] > state.lowpt[e.index()] {
                if p.right.is_empty() {
                    p.right = q.right;
                } else if let Some(pr_low) = p.right.low {
                    state.ref_edge[pr_low.index()] = q.right.high;
                    p.right.low = q.right.low;
                }
            } else {
                state.ref_edge[q_right_low.index()] = state.lowpt_edge[e.index()];
            }
        }
        if state.stack.len() == state.stack_bottom[ei.index()] {
            break;
        }
    }

    while top_conflicts(state, ei) {
        let mut q = match state.stack.pop() {
            Some(q) => q,
            None => break,
        };
        if q.right.conflicting(ei, &state.lowpt) {
            q.swap();
        }
        if q.right.conflicting(ei, &state.lowpt) {
            return false;
        }
        if let Some(pr_low) = p.right.low {
            state.ref_edge[pr_low.index()] = q.right.high;
        } else if p.right.is_empty() {
            p.right = q.right;
        }
        if q.right.low.is_some() {
            p.right.low = q.right.low;
        }

        if p.left.is_empty() {
            p.left = q.left;
        } else if let Some(pl_low) = p.left.low {
            state.ref_edge[pl_low.index()] = q.left.high;
            p.left.low = q.left.low;
        }
    }

    if !(p.left.is_empty() && p.right.is_empty()) {
        state.stack.push(p);
    }
    true
}

fn remove_back_edges(e: EdgeId, state: &mut TestState) {
    let u = state.dg_from[e.index()];
    let u_height = state.height[u.index()].expect("ancestor already visited");

    while let Some(top) = state.stack.last() {
        if top.lowest(&state.lowpt) != u_height {
            break;
        }
        let p = state.stack.pop().expect("just peeked");
        if let Some(low) = p.left.low {
            state.side[low.index()] = -1;
        }
    }

    let mut retained: Option<ConflictPair> = None;
    if let Some(mut p) = state.stack.pop() {
        while let Some(high) = p.left.high {
            if state.dg_to[high.index()] != u {
                break;
            }
            p.left.high = state.ref_edge[high.index()];
        }
        if p.left.high.is_none() {
            if let Some(low) = p.left.low {
                state.ref_edge[low.index()] = p.right.low;
                state.side[low.index()] = -1;
                p.left.low = None;
            }
        }
        while let Some(high) = p.right.high {
            if state.dg_to[high.index()] != u {
                break;
            }
            p.right.high = state.ref_edge[high.index()];
        }
        if p.right.high.is_none() {
            if let Some(low) = p.right.low {
                state.ref_edge[low.index()] = p.left.low;
                state.side[low.index()] = -1;
                p.right.low = None;
            }
        }
        retained = Some(p);
        state.stack.push(p);
    }

    if state.lowpt[e.index()] < u_height {
        let (hl, hr) = match retained {
            Some(p) => (p.left.high, p.right.high),
            None => (None, None),
        };
        state.ref_edge[e.index()] = match (hl, hr) {
            (Some(hl_e), Some(hr_e)) => {
                if state.lowpt[hl_e.index()] > state.lowpt[hr_e.index()] {
                    Some(hl_e)
                } else {
                    Some(hr_e)
                }
            }
            (Some(hl_e), None) => Some(hl_e),
            (None, other) => other,
        };
    }
}

fn dfs_testing(v: VertexId, parent_edge: Option<EdgeId>, state: &mut TestState) -> bool {
    let adjs = state.ordered_adjs[v.index()].clone();
    let first = adjs.first().copied();
    for &ei in &adjs {
        state.stack_bottom[ei.index()] = state.stack.len();
        if state.is_tree[ei.index()] {
            let w = state.dg_to[ei.index()];
            if !dfs_testing(w, Some(ei), state) {
                return false;
            }
        } else {
            state.lowpt_edge[ei.index()] = Some(ei);
            state.stack.push(ConflictPair {
                left: Interval::default(),
                right: Interval {
                    low: Some(ei),
                    high: Some(ei),
                },
            });
        }

        if state.lowpt[ei.index()] < state.height[v.index()].expect("v visited") {
            if Some(ei) == first {
                if let Some(e) = parent_edge {
                    state.lowpt_edge[e.index()] = state.lowpt_edge[ei.index()];
                }
            } else if let Some(e) = parent_edge {
                if !add_constraints(ei, e, state) {
                    return false;
                }
            }
        }
    }
    if let Some(e) = parent_edge {
        remove_back_edges(e, state);
    }
    true
}

fn sign(e: EdgeId, state: &mut TestState) -> i8 {
    if let Some(r) = state.ref_edge[e.index()] {
        let s = sign(r, state);
        state.side[e.index()] *= s;
        state.ref_edge[e.index()] = None;
    }
    state.side[e.index()]
}

fn insert_after(list: &mut Vec<EdgeId>, anchor: Option<EdgeId>, new_edge: EdgeId) {
    let pos = match anchor {
        Some(a) => list.iter().position(|&e| e == a).map_or(list.len(), |p| p + 1),
        None => list.len(),
    };
    list.insert(pos, new_edge);
}

fn insert_before(list: &mut Vec<EdgeId>, anchor: Option<EdgeId>, new_edge: EdgeId) {
    let pos = match anchor {
        Some(a) => list.iter().position(|&e| e == a).unwrap_or(0),
        None => 0,
    };
    list.insert(pos, new_edge);
}

#[allow(clippy::too_many_arguments)]
fn dfs_embedding(
    v: VertexId,
    state: &TestState,
    rotation: &mut [Vec<EdgeId>],
    left_ref: &mut [Option<EdgeId>],
    right_ref: &mut [Option<EdgeId>],
) {
    for &ei in &state.ordered_adjs[v.index()] {
        let w = state.dg_to[ei.index()];

        rotation[v.index()].push(ei);
        right_ref[v.index()] = Some(ei);
        if left_ref[v.index()].is_none() {
            left_ref[v.index()] = Some(ei);
        }

        if state.is_tree[ei.index()] {
            rotation[w.index()].insert(0, ei);
            left_ref[w.index()] = Some(ei);
            right_ref[w.index()] = Some(ei);
            dfs_embedding(w, state, rotation, left_ref, right_ref);
        } else if state.side[ei.index()] == 1 {
            insert_after(&mut rotation[w.index()], right_ref[w.index()], ei);
            right_ref[w.index()] = Some(ei);
        } else {
            insert_before(&mut rotation[w.index()], left_ref[w.index()], ei);
            left_ref[w.index()] = Some(ei);
        }
    }
}

/// Run the left-right planarity test over `graph`, skipping every edge in
/// `excluded` (self-loops and redundant parallel copies the caller has
/// already set aside). Returns `Some(rotation)` covering every
/// non-excluded edge on success, `None` if the graph is nonplanar.
#[must_use]
pub(super) fn test<L>(
    graph: &Graph<L>,
    excluded: &hashbrown::HashSet<EdgeId>,
) -> Option<RotationSystem> {
    let n = graph.vertex_count();
    let simple_edge_count = graph.edge_count() - excluded.len();
    if n > 2 && simple_edge_count > 3 * n - 6 {
        return None;
    }

    let o = orient(graph, excluded);

    let mut ordered_adjs = alloc::vec![Vec::new(); n];
    for v in graph.vertices() {
        let mut row: Vec<EdgeId> = graph
            .adjacency(v)
            .iter()
            .copied()
            .filter(|e| !excluded.contains(e) && o.dg_from[e.index()] == v)
            .collect();
        row.sort_by_key(|&e| o.nesting_depth[e.index()]);
        ordered_adjs[v.index()] = row;
    }

    let m = graph.edge_count();
    let mut state = TestState {
        height: o.height,
        lowpt: o.lowpt,
        dg_from: o.dg_from,
        dg_to: o.dg_to,
        is_tree: o.is_tree,
        ordered_adjs,
        stack: Vec::new(),
        stack_bottom: alloc::vec![0; m],
        lowpt_edge: alloc::vec![None; m],
        ref_edge: alloc::vec![None; m],
        side: alloc::vec![1i8; m],
    };

    for &root in &o.roots {
        if !dfs_testing(root, None, &mut state) {
            return None;
        }
    }

    for v in graph.vertices() {
        let adjs = state.ordered_adjs[v.index()].clone();
        for ei in adjs {
            sign(ei, &mut state);
        }
    }

    let mut rotation: Vec<Vec<EdgeId>> = alloc::vec![Vec::new(); n];
    let mut left_ref: Vec<Option<EdgeId>> = alloc::vec![None; n];
    let mut right_ref: Vec<Option<EdgeId>> = alloc::vec![None; n];
    for &root in &o.roots {
        dfs_embedding(root, &state, &mut rotation, &mut left_ref, &mut right_ref);
    }

    Some(RotationSystem::from_rows(rotation))
}
