//! Kuratowski witness extraction: given a graph the left-right test has
//! already rejected, find a subgraph homeomorphic to K5 or K3,3.
//!
//! Strategy: collect the degree->=3 "branch vertex" candidates (smallest ids
//! first, capped for tractability on a fast path — this search is
//! combinatorial, not linear-time, matching the §4.E SPQR triconnectivity
//! precedent of favouring a correct-but-not-asymptotically-optimal
//! implementation), try every way to pick 5 (K5) or 6-split-into-3+3 (K3,3)
//! of them, and for each candidate set route the required pairwise
//! internally-vertex-disjoint paths via a backtracking search that can
//! rip up and reroute an earlier pair's path rather than getting stuck on
//! whichever path a fixed-order greedy search found first. If the capped
//! candidate list doesn't yield a witness, the search retries once over the
//! full, untruncated candidate list before giving up — so a graph already
//! proven nonplanar never comes back as an internal-error verdict just
//! because its branch vertices happened to sort past the fast-path cap.
//! A graph that the LR test rejected is guaranteed by Kuratowski's theorem
//! to contain such a subdivision; this search finds *a* witness, not
//! necessarily the smallest.

use alloc::vec::Vec;

use hashbrown::HashSet;

use crate::graph::{EdgeId, Graph, VertexId};

/// Which forbidden subdivision a [`Witness`] certifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WitnessKind {
    K5,
    K33,
}

/// A certificate of nonplanarity: the listed edges induce a subdivision of
/// `kind`.
#[derive(Debug, Clone)]
pub struct Witness {
    pub kind: WitnessKind,
    pub edges: Vec<EdgeId>,
}

/// Fast-path cap on branch-vertex candidates considered before falling back
/// to the full, untruncated list (see module doc comment).
const CANDIDATE_CAP: usize = 20;
/// Work budget (combinations tried plus path alternatives explored) for the
/// fast, capped pass.
const FAST_ATTEMPTS: usize = 20_000;
/// Work budget for the fallback pass over the untruncated candidate list.
const FALLBACK_ATTEMPTS: usize = 200_000;
/// How many alternative simple paths the backtracking router considers for
/// a single pair before moving on; bounds the DFS in [`candidate_paths`].
const MAX_PATH_ALTERNATIVES: usize = 6;

fn branch_candidates<L>(graph: &Graph<L>, cap: usize) -> Vec<VertexId> {
    let mut candidates: Vec<VertexId> = graph.vertices().filter(|&v| graph.degree(v) >= 3).collect();
    candidates.truncate(cap);
    candidates
}

/// Enumerate up to `max_paths` simple paths from `from` to `to` avoiding
/// `forbidden` vertices and `used_edges`, shortest first. A bounded DFS
/// rather than a true k-shortest-paths search — enough to give the
/// backtracking search in [`route_disjoint`] real alternatives when the
/// first route it tries turns out to block a later pair.
fn candidate_paths<L>(
    graph: &Graph<L>,
    from: VertexId,
    to: VertexId,
    forbidden: &HashSet<VertexId>,
    used_edges: &HashSet<EdgeId>,
    max_paths: usize,
) -> Vec<(Vec<EdgeId>, Vec<VertexId>)> {
    let mut results = Vec::new();
    let mut visiting: HashSet<VertexId> = HashSet::new();
    visiting.insert(from);
    let mut path_edges = Vec::new();
    let mut path_vertices = Vec::new();
    dfs_collect_paths(
        graph,
        from,
        to,
        forbidden,
        used_edges,
        &mut visiting,
        &mut path_edges,
        &mut path_vertices,
        &mut results,
        max_paths,
    );
    results.sort_by_key(|(edges, _)| edges.len());
    results
}

#[allow(clippy::too_many_arguments)]
fn dfs_collect_paths<L>(
    graph: &Graph<L>,
    cur: VertexId,
    to: VertexId,
    forbidden: &HashSet<VertexId>,
    used_edges: &HashSet<EdgeId>,
    visiting: &mut HashSet<VertexId>,
    path_edges: &mut Vec<EdgeId>,
    path_vertices: &mut Vec<VertexId>,
    results: &mut Vec<(Vec<EdgeId>, Vec<VertexId>)>,
    max_paths: usize,
) {
    if results.len() >= max_paths {
        return;
    }
    if cur == to {
        results.push((path_edges.clone(), path_vertices.clone()));
        return;
    }
    for &e in graph.adjacency(cur) {
        if results.len() >= max_paths {
            return;
        }
        if used_edges.contains(&e) {
            continue;
        }
        let rec = graph.edge(e);
        if rec.is_self_loop() {
            continue;
        }
        let w = rec.other(cur).expect("edge incident to cur");
        if visiting.contains(&w) {
            continue;
        }
        if w != to && forbidden.contains(&w) {
            continue;
        }
        visiting.insert(w);
        path_edges.push(e);
        if w != to {
            path_vertices.push(w);
        }
        dfs_collect_paths(graph, w, to, forbidden, used_edges, visiting, path_edges, path_vertices, results, max_paths);
        if w != to {
            path_vertices.pop();
        }
        path_edges.pop();
        visiting.remove(&w);
    }
}

/// Route every pair in `pairs` as internally-vertex-disjoint paths among
/// `branch_set`, backtracking (ripping up and retrying with an alternative
/// route) when a later pair can't be completed with the routes chosen so
/// far, rather than committing to the first fixed-order BFS path found.
fn route_disjoint<L>(
    graph: &Graph<L>,
    branch_set: &HashSet<VertexId>,
    pairs: &[(VertexId, VertexId)],
    attempt_budget: usize,
) -> Option<Vec<EdgeId>> {
    let mut used_vertices: HashSet<VertexId> = HashSet::new();
    let mut used_edges: HashSet<EdgeId> = HashSet::new();
    let mut assigned: Vec<(Vec<EdgeId>, Vec<VertexId>)> = Vec::new();
    let mut attempts = attempt_budget;
    if !backtrack_routes(graph, branch_set, pairs, 0, &mut used_vertices, &mut used_edges, &mut assigned, &mut attempts) {
        return None;
    }
    let mut all_edges: Vec<EdgeId> = assigned.iter().flat_map(|(edges, _)| edges.iter().copied()).collect();
    all_edges.sort_by_key(EdgeId::index);
    all_edges.dedup();
    Some(all_edges)
}

#[allow(clippy::too_many_arguments)]
fn backtrack_routes<L>(
    graph: &Graph<L>,
    branch_set: &HashSet<VertexId>,
    pairs: &[(VertexId, VertexId)],
    idx: usize,
    used_vertices: &mut HashSet<VertexId>,
    used_edges: &mut HashSet<EdgeId>,
    assigned: &mut Vec<(Vec<EdgeId>, Vec<VertexId>)>,
    attempts: &mut usize,
) -> bool {
    if idx == pairs.len() {
        return true;
    }
    let (a, b) = pairs[idx];
    let mut forbidden: HashSet<VertexId> = branch_set.clone();
    forbidden.remove(&a);
    forbidden.remove(&b);
    for &v in used_vertices.iter() {
        forbidden.insert(v);
    }

    let candidates = candidate_paths(graph, a, b, &forbidden, used_edges, MAX_PATH_ALTERNATIVES);
    for (edges, interior) in candidates {
        if *attempts == 0 {
            return false;
        }
        *attempts -= 1;
        for &v in &interior {
            used_vertices.insert(v);
        }
        for &e in &edges {
            used_edges.insert(e);
        }
        assigned.push((edges.clone(), interior.clone()));
        if backtrack_routes(graph, branch_set, pairs, idx + 1, used_vertices, used_edges, assigned, attempts) {
            return true;
        }
        assigned.pop();
        for &v in &interior {
            used_vertices.remove(&v);
        }
        for &e in &edges {
            used_edges.remove(&e);
        }
    }
    false
}

fn k5_pairs(vs: &[VertexId; 5]) -> Vec<(VertexId, VertexId)> {
    let mut pairs = Vec::with_capacity(10);
    for i in 0..5 {
        for j in (i + 1)..5 {
            pairs.push((vs[i], vs[j]));
        }
    }
    pairs
}

fn k33_pairs(left: &[VertexId; 3], right: &[VertexId; 3]) -> Vec<(VertexId, VertexId)> {
    let mut pairs = Vec::with_capacity(9);
    for &l in left {
        for &r in right {
            pairs.push((l, r));
        }
    }
    pairs
}

/// Every way to split 6 branch vertices into two unordered triples: fixing
/// `vs[0]` in `left` and choosing 2 more of the remaining 5 gives exactly
/// `C(5,2) = 10` distinct partitions, covering every bipartition instead of
/// just the sorted-order first-three-versus-last-three split.
fn k33_partitions(vs: &[VertexId; 6]) -> Vec<([VertexId; 3], [VertexId; 3])> {
    let mut partitions = Vec::with_capacity(10);
    for i in 1..6 {
        for j in (i + 1)..6 {
            let left = [vs[0], vs[i], vs[j]];
            let right_idx: Vec<usize> = (1..6).filter(|&k| k != i && k != j).collect();
            let right = [vs[right_idx[0]], vs[right_idx[1]], vs[right_idx[2]]];
            partitions.push((left, right));
        }
    }
    partitions
}

/// Try every 5-combination of branch-vertex candidates, smallest ids first,
/// looking for a K5 subdivision.
fn try_k5<L>(graph: &Graph<L>, candidates: &[VertexId], attempt_budget: usize) -> Option<Witness> {
    let mut attempts = attempt_budget;
    let n = candidates.len();
    if n < 5 {
        return None;
    }
    for a in 0..n {
        for b in (a + 1)..n {
            for c in (b + 1)..n {
                for d in (c + 1)..n {
                    for e in (d + 1)..n {
                        if attempts == 0 {
                            return None;
                        }
                        attempts -= 1;
                        let vs = [candidates[a], candidates[b], candidates[c], candidates[d], candidates[e]];
                        let branch_set: HashSet<VertexId> = vs.iter().copied().collect();
                        if let Some(edges) = route_disjoint(graph, &branch_set, &k5_pairs(&vs), attempts) {
                            return Some(Witness {
                                kind: WitnessKind::K5,
                                edges,
                            });
                        }
                    }
                }
            }
        }
    }
    None
}

/// Try every 6-combination of branch-vertex candidates, smallest ids first,
/// and every bipartition of each combination into two triples, looking for
/// a K3,3 subdivision.
fn try_k33<L>(graph: &Graph<L>, candidates: &[VertexId], attempt_budget: usize) -> Option<Witness> {
    let mut attempts = attempt_budget;
    let n = candidates.len();
    if n < 6 {
        return None;
    }
    for a in 0..n {
        for b in (a + 1)..n {
            for c in (b + 1)..n {
                for d in (c + 1)..n {
                    for e in (d + 1)..n {
                        for f in (e + 1)..n {
                            if attempts == 0 {
                                return None;
                            }
                            let six = [candidates[a], candidates[b], candidates[c], candidates[d], candidates[e], candidates[f]];
                            for (left, right) in k33_partitions(&six) {
                                if attempts == 0 {
                                    return None;
                                }
                                attempts -= 1;
                                let mut branch_set: HashSet<VertexId> = left.iter().copied().collect();
                                branch_set.extend(right.iter().copied());
                                if let Some(edges) = route_disjoint(graph, &branch_set, &k33_pairs(&left, &right), attempts) {
                                    return Some(Witness {
                                        kind: WitnessKind::K33,
                                        edges,
                                    });
                                }
                            }
                        }
                    }
                }
            }
        }
    }
    None
}

/// Find a Kuratowski witness in a graph already known to be nonplanar.
/// Tries the capped candidate list first; if that comes up empty and the
/// full candidate list is actually larger, retries once over the full list
/// before giving up. Returns `None` only if both passes exhaust their
/// search budget, which signals an internal invariant violation to the
/// caller rather than a valid "planar" answer.
#[must_use]
pub fn find<L>(graph: &Graph<L>) -> Option<Witness> {
    let fast_candidates = branch_candidates(graph, CANDIDATE_CAP);
    if let Some(w) = try_k5(graph, &fast_candidates, FAST_ATTEMPTS).or_else(|| try_k33(graph, &fast_candidates, FAST_ATTEMPTS)) {
        return Some(w);
    }

    let full_candidates = branch_candidates(graph, usize::MAX);
    if full_candidates.len() <= fast_candidates.len() {
        return None;
    }
    try_k5(graph, &full_candidates, FALLBACK_ATTEMPTS).or_else(|| try_k33(graph, &full_candidates, FALLBACK_ATTEMPTS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    fn k33_with_parts(left: [usize; 3], right: [usize; 3]) -> Graph<()> {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let vs: Vec<_> = (0..6).map(|_| b.add_vertex(())).collect();
        for &l in &left {
            for &r in &right {
                b.add_edge(vs[l], vs[r], false).unwrap();
            }
        }
        b.build()
    }

    #[test]
    fn finds_witness_for_sorted_bipartition() {
        let g = k33_with_parts([0, 1, 2], [3, 4, 5]);
        let witness = find(&g).expect("K3,3 is nonplanar");
        assert_eq!(witness.kind, WitnessKind::K33);
        assert_eq!(witness.edges.len(), 9);
    }

    #[test]
    fn finds_witness_for_interleaved_bipartition() {
        // Branch vertices {0,2,4} / {1,3,5}: not the first-three/last-three
        // split a naive sorted-order partition would try first.
        let g = k33_with_parts([0, 2, 4], [1, 3, 5]);
        let witness = find(&g).expect("K3,3 is nonplanar regardless of how its parts sort");
        assert_eq!(witness.kind, WitnessKind::K33);
        assert_eq!(witness.edges.len(), 9);
    }

    #[test]
    fn k5_witness_is_found() {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let vs: Vec<_> = (0..5).map(|_| b.add_vertex(())).collect();
        for i in 0..5 {
            for j in (i + 1)..5 {
                b.add_edge(vs[i], vs[j], false).unwrap();
            }
        }
        let g = b.build();
        let witness = find(&g).expect("K5 is nonplanar");
        assert_eq!(witness.kind, WitnessKind::K5);
        assert_eq!(witness.edges.len(), 10);
    }
}
