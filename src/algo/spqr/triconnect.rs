//! Internal split-component builder backing [`super::spqr_decompose`] and
//! friends.
//!
//! Separation pairs are found by brute-force search over vertex pairs,
//! bounded for tractability, rather than the linear-time Hopcroft-Tarjan /
//! Gutwenger-Mutzel triconnectivity algorithm — the same "correct, not
//! asymptotically optimal" trade `algo::planarity::witness` already makes
//! for Kuratowski witnesses. See `DESIGN.md` for the full reasoning.
//!
//! A candidate pair `{a, b}` only counts as a genuine split point when
//! *every* resulting branch owns at least two vertices of its own: a vertex
//! whose only edges run to `a` and `b` is a pass-through that belongs
//! inside a cycle or rigid skeleton, not a split component by itself. This
//! keeps a square with one diagonal (5 edges on 4 vertices, two of them
//! degree 2) as a single rigid skeleton rather than fracturing it into a
//! bond of two triangles, matching `spec.md` §8's worked example.

use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::graph::{EdgeId, VertexId};

use super::{SkeletonEdge, SkeletonEdgeKind, SpqrNode, SpqrNodeId, SpqrNodeKind};

/// Caps the brute-force separation-pair search's fast path to keep it
/// tractable on larger inputs. `find_split_pair` falls back to a full,
/// untruncated search before giving up, so this cap only ever costs time —
/// it never drops a separation pair a larger valid input actually has.
const MAX_CANDIDATE_VERTICES: usize = 40;

type RealEdge = (VertexId, VertexId, EdgeId);

/// Build the SPQR tree for one biconnected block (`vertices`/`real_edges`
/// describe its induced subgraph; ids are the original graph's).
pub(super) fn decompose_block(
    vertices: Vec<VertexId>,
    real_edges: Vec<RealEdge>,
) -> (Vec<SpqrNode>, Vec<(SpqrNodeId, SpqrNodeId)>, SpqrNodeId) {
    let mut nodes: Vec<SpqrNode> = Vec::new();
    let mut raw_tree_edges: Vec<(u32, u32)> = Vec::new();
    let root = reserve(&mut nodes);
    build_at(root, vertices, real_edges, None, &mut nodes, &mut raw_tree_edges);
    let tree_edges = raw_tree_edges
        .into_iter()
        .map(|(a, b)| (SpqrNodeId(a), SpqrNodeId(b)))
        .collect();
    (nodes, tree_edges, SpqrNodeId(root))
}

fn reserve(nodes: &mut Vec<SpqrNode>) -> u32 {
    let id = nodes.len() as u32;
    nodes.push(SpqrNode {
        kind: SpqrNodeKind::R,
        vertex_map: Vec::new(),
        edges: Vec::new(),
    });
    id
}

fn index_of(v: VertexId, vertices: &[VertexId]) -> usize {
    vertices
        .iter()
        .position(|&x| x == v)
        .expect("vertex belongs to this skeleton")
}

/// Build (or recurse into) the node reserved at `id`. `parent_virtual`, if
/// present, is `(a, b, parent_id)`: this skeleton must carry one virtual
/// edge `a-b` representing everything on the other side of that split.
fn build_at(
    id: u32,
    vertices: Vec<VertexId>,
    local_real: Vec<RealEdge>,
    parent_virtual: Option<(VertexId, VertexId, u32)>,
    nodes: &mut Vec<SpqrNode>,
    tree_edges: &mut Vec<(u32, u32)>,
) {
    if let Some((_, _, pid)) = parent_virtual {
        tree_edges.push((pid, id));
    }

    if vertices.len() == 2 {
        let mut edges: Vec<SkeletonEdge> = local_real
            .iter()
            .map(|&(_, _, eid)| SkeletonEdge {
                a: 0,
                b: 1,
                kind: SkeletonEdgeKind::Real(eid),
            })
            .collect();
        if let Some((_, _, pid)) = parent_virtual {
            edges.push(SkeletonEdge {
                a: 0,
                b: 1,
                kind: SkeletonEdgeKind::Virtual(SpqrNodeId(pid)),
            });
        }
        nodes[id as usize] = SpqrNode {
            kind: SpqrNodeKind::P,
            vertex_map: vertices,
            edges,
        };
        return;
    }

    if let Some(edges) = try_simple_cycle(&vertices, &local_real, parent_virtual) {
        nodes[id as usize] = SpqrNode {
            kind: SpqrNodeKind::S,
            vertex_map: vertices,
            edges,
        };
        return;
    }

    let parent_pair = parent_virtual.map(|(a, b, _)| (a, b));
    if let Some((a, b)) = find_split_pair(&vertices, &local_real, parent_pair, parent_virtual.is_some()) {
        if let Some((components, direct)) = split_at(&vertices, &local_real, a, b, parent_pair) {
            let mut children = Vec::new();
            for (mut comp_vertices, comp_edges) in components {
                comp_vertices.push(a);
                comp_vertices.push(b);
                let child_id = reserve(nodes);
                build_at(child_id, comp_vertices, comp_edges, Some((a, b, id)), nodes, tree_edges);
                children.push(child_id);
            }
            let mut edges: Vec<SkeletonEdge> = direct
                .into_iter()
                .map(|eid| SkeletonEdge {
                    a: 0,
                    b: 1,
                    kind: SkeletonEdgeKind::Real(eid),
                })
                .collect();
            for cid in children {
                edges.push(SkeletonEdge {
                    a: 0,
                    b: 1,
                    kind: SkeletonEdgeKind::Virtual(SpqrNodeId(cid)),
                });
            }
            if let Some((_, _, pid)) = parent_virtual {
                edges.push(SkeletonEdge {
                    a: 0,
                    b: 1,
                    kind: SkeletonEdgeKind::Virtual(SpqrNodeId(pid)),
                });
            }
            nodes[id as usize] = SpqrNode {
                kind: SpqrNodeKind::P,
                vertex_map: alloc::vec![a, b],
                edges,
            };
            return;
        }
    }

    let mut edges: Vec<SkeletonEdge> = local_real
        .iter()
        .map(|&(u, v, eid)| SkeletonEdge {
            a: index_of(u, &vertices),
            b: index_of(v, &vertices),
            kind: SkeletonEdgeKind::Real(eid),
        })
        .collect();
    if let Some((pa, pb, pid)) = parent_virtual {
        edges.push(SkeletonEdge {
            a: index_of(pa, &vertices),
            b: index_of(pb, &vertices),
            kind: SkeletonEdgeKind::Virtual(SpqrNodeId(pid)),
        });
    }
    nodes[id as usize] = SpqrNode {
        kind: SpqrNodeKind::R,
        vertex_map: vertices,
        edges,
    };
}

/// If `vertices`/`local_real` (plus an optional parent virtual edge) form a
/// single simple cycle, return its edges in cyclic order.
fn try_simple_cycle(
    vertices: &[VertexId],
    local_real: &[RealEdge],
    parent_virtual: Option<(VertexId, VertexId, u32)>,
) -> Option<Vec<SkeletonEdge>> {
    let n = vertices.len();
    let total_edges = local_real.len() + usize::from(parent_virtual.is_some());
    if total_edges != n {
        return None;
    }

    let mut adjacency: HashMap<VertexId, Vec<(VertexId, SkeletonEdgeKind)>> = HashMap::new();
    for &(u, v, eid) in local_real {
        adjacency.entry(u).or_insert_with(Vec::new).push((v, SkeletonEdgeKind::Real(eid)));
        adjacency.entry(v).or_insert_with(Vec::new).push((u, SkeletonEdgeKind::Real(eid)));
    }
    if let Some((a, b, pid)) = parent_virtual {
        adjacency
            .entry(a)
            .or_insert_with(Vec::new)
            .push((b, SkeletonEdgeKind::Virtual(SpqrNodeId(pid))));
        adjacency
            .entry(b)
            .or_insert_with(Vec::new)
            .push((a, SkeletonEdgeKind::Virtual(SpqrNodeId(pid))));
    }
    if adjacency.len() != n || adjacency.values().any(|nbrs| nbrs.len() != 2) {
        return None;
    }

    // Connectivity check: a connected, 2-regular graph on n vertices with n
    // edges is necessarily a single cycle.
    let start = vertices[0];
    let mut seen: HashMap<VertexId, bool> = vertices.iter().map(|&v| (v, false)).collect();
    let mut stack = alloc::vec![start];
    seen.insert(start, true);
    let mut reached = 0usize;
    while let Some(v) = stack.pop() {
        reached += 1;
        for &(w, _) in &adjacency[&v] {
            if !seen[&w] {
                seen.insert(w, true);
                stack.push(w);
            }
        }
    }
    if reached != n {
        return None;
    }

    let mut edges = Vec::with_capacity(n);
    let mut prev: Option<VertexId> = None;
    let mut cur = start;
    for _ in 0..n {
        let nbrs = &adjacency[&cur];
        let (next, kind) = if Some(nbrs[0].0) == prev { nbrs[1] } else { nbrs[0] };
        edges.push(SkeletonEdge {
            a: index_of(cur, vertices),
            b: index_of(next, vertices),
            kind,
        });
        prev = Some(cur);
        cur = next;
    }
    if cur != start {
        return None;
    }
    Some(edges)
}

fn find_root(parent: &mut HashMap<VertexId, VertexId>, v: VertexId) -> VertexId {
    let mut root = v;
    while parent[&root] != root {
        root = parent[&root];
    }
    let mut cur = v;
    while cur != root {
        let next = parent[&cur];
        parent.insert(cur, root);
        cur = next;
    }
    root
}

fn union(parent: &mut HashMap<VertexId, VertexId>, u: VertexId, v: VertexId) {
    let ru = find_root(parent, u);
    let rv = find_root(parent, v);
    if ru != rv {
        parent.insert(ru, rv);
    }
}

/// Split `vertices`/`local_real` at candidate separation pair `(a, b)`:
/// connected components of the remainder (plus the edges touching each),
/// and the edges directly between `a` and `b`.
///
/// Returns `None` if `parent_pair` (the split that produced this skeleton
/// one level up) would be torn apart by this candidate, i.e. its two
/// endpoints would land in different components — a conservative guard
/// against interactions between overlapping separation pairs that the full
/// Hopcroft-Tarjan algorithm resolves with an overlap graph this simplified
/// search does not build.
fn split_at(
    vertices: &[VertexId],
    local_real: &[RealEdge],
    a: VertexId,
    b: VertexId,
    parent_pair: Option<(VertexId, VertexId)>,
) -> Option<(Vec<(Vec<VertexId>, Vec<RealEdge>)>, Vec<EdgeId>)> {
    let remainder: Vec<VertexId> = vertices.iter().copied().filter(|&v| v != a && v != b).collect();
    if remainder.is_empty() {
        return None;
    }

    let mut parent: HashMap<VertexId, VertexId> = remainder.iter().map(|&v| (v, v)).collect();
    for &(u, v, _) in local_real {
        if u != a && u != b && v != a && v != b {
            union(&mut parent, u, v);
        }
    }

    if let Some((a0, b0)) = parent_pair {
        let same_pair = (a0 == a && b0 == b) || (a0 == b && b0 == a);
        if !same_pair {
            let root_a0 = if a0 == a || a0 == b { None } else { Some(find_root(&mut parent, a0)) };
            let root_b0 = if b0 == a || b0 == b { None } else { Some(find_root(&mut parent, b0)) };
            if let (Some(ra), Some(rb)) = (root_a0, root_b0) {
                if ra != rb {
                    return None;
                }
            }
        }
    }

    let mut direct = Vec::new();
    let mut comp_vertices: HashMap<VertexId, Vec<VertexId>> = HashMap::new();
    for &v in &remainder {
        let root = find_root(&mut parent, v);
        comp_vertices.entry(root).or_insert_with(Vec::new).push(v);
    }
    let mut comp_edges: HashMap<VertexId, Vec<RealEdge>> = HashMap::new();
    for &(u, v, eid) in local_real {
        let u_split = u == a || u == b;
        let v_split = v == a || v == b;
        if u_split && v_split {
            direct.push(eid);
            continue;
        }
        let anchor = if u_split { v } else { u };
        let root = find_root(&mut parent, anchor);
        comp_edges.entry(root).or_insert_with(Vec::new).push((u, v, eid));
    }

    // Only a genuine split if every branch has at least two vertices of
    // its own (see module doc comment).
    if comp_vertices.values().any(|vs| vs.len() < 2) {
        return None;
    }

    let mut roots: Vec<VertexId> = comp_vertices.keys().copied().collect();
    roots.sort_by_key(VertexId::index);
    let components = roots
        .into_iter()
        .map(|root| {
            let mut cv = comp_vertices.remove(&root).unwrap_or_default();
            cv.sort_by_key(VertexId::index);
            let mut ce = comp_edges.remove(&root).unwrap_or_default();
            ce.sort_by_key(|&(_, _, eid)| eid.index());
            (cv, ce)
        })
        .collect();
    direct.sort_by_key(EdgeId::index);
    Some((components, direct))
}

/// Find a separation pair among `vertices`, smallest ids first, whose
/// resulting bond would have at least three edges total (direct edges plus
/// one virtual edge per branch, plus the enclosing parent virtual edge if
/// any) — matching the `P`-node invariant of `spec.md` §3.
///
/// Searches the first [`MAX_CANDIDATE_VERTICES`] candidates (by id) first;
/// if that truncated search comes up empty and there were more candidates
/// to try, it falls back to a full search over every vertex before giving
/// up. The cap keeps the common case tractable without ever letting a
/// large-but-valid input silently lose a split pair it actually has — the
/// same fast/fallback shape `algo::planarity::witness::find` uses for its
/// own branch-vertex candidate list.
fn find_split_pair(
    vertices: &[VertexId],
    local_real: &[RealEdge],
    parent_pair: Option<(VertexId, VertexId)>,
    parent_virtual_present: bool,
) -> Option<(VertexId, VertexId)> {
    let mut sorted: Vec<VertexId> = vertices.to_vec();
    sorted.sort_by_key(VertexId::index);

    if sorted.len() > MAX_CANDIDATE_VERTICES {
        let mut truncated = sorted.clone();
        truncated.truncate(MAX_CANDIDATE_VERTICES);
        if let Some(pair) = search_split_pair(&truncated, vertices, local_real, parent_pair, parent_virtual_present) {
            return Some(pair);
        }
        return search_split_pair(&sorted, vertices, local_real, parent_pair, parent_virtual_present);
    }

    search_split_pair(&sorted, vertices, local_real, parent_pair, parent_virtual_present)
}

/// Inner brute-force scan over `candidates` (a subset or all of `vertices`,
/// smallest ids first) looking for a valid separation pair.
fn search_split_pair(
    candidates: &[VertexId],
    vertices: &[VertexId],
    local_real: &[RealEdge],
    parent_pair: Option<(VertexId, VertexId)>,
    parent_virtual_present: bool,
) -> Option<(VertexId, VertexId)> {
    for i in 0..candidates.len() {
        for j in (i + 1)..candidates.len() {
            let (a, b) = (candidates[i], candidates[j]);
            if let Some((components, direct)) = split_at(vertices, local_real, a, b, parent_pair) {
                if components.is_empty() {
                    continue;
                }
                let total = components.len() + direct.len() + usize::from(parent_virtual_present);
                if total >= 3 {
                    return Some((a, b));
                }
            }
        }
    }
    None
}
