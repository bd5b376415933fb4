//! Planar straight-line layout via Tutte's barycentric method.
//!
//! There is no linear-algebra crate in the dependency stack, so the
//! barycentric system `x_v = mean(x_neighbours)` is solved by repeated
//! averaging (Gauss-Seidel relaxation) rather than a direct solve — the
//! same fixed point, reached iteratively, bounded by `MAX_ITERATIONS` the
//! same way `algo::flow`'s augmenting-path loop and `algo::spqr`'s
//! split-pair search are bounded rather than proven to terminate in closed
//! form. The outer face is triangulated only combinatorially in the sense
//! that its vertices are pinned to a convex polygon before relaxation runs;
//! this crate does not insert new triangulating edges into the drawn graph,
//! since doing so would draw edges with no corresponding `EdgeId` (see
//! `DESIGN.md`).

use alloc::vec::Vec;

use hashbrown::HashSet;

use crate::graph::EdgeId;
use crate::mesh::HalfEdgeMesh;

use super::{self_loop_quad, EdgePath, LayoutResult, LayoutStats, Point};

const MAX_ITERATIONS: usize = 500;
const CONVERGENCE_EPS: f64 = 1e-7;

fn mesh_vertex_count(mesh: &HalfEdgeMesh) -> usize {
    mesh.half_edges()
        .map(|h| mesh.origin(h).index())
        .max()
        .map_or(0, |m| m + 1)
}

fn adjacency(mesh: &HalfEdgeMesh, vertex_count: usize) -> Vec<Vec<usize>> {
    let mut adj = alloc::vec![Vec::new(); vertex_count];
    for h in mesh.half_edges() {
        let u = mesh.origin(h).index();
        let v = mesh.origin(mesh.twin(h)).index();
        if u != v {
            adj[u].push(v);
        }
    }
    adj
}

/// Connected components of `vertex_count` vertices under `adjacency`, by
/// smallest-id-first discovery order (`spec.md` §5).
fn components(vertex_count: usize, adjacency: &[Vec<usize>]) -> Vec<usize> {
    let mut comp = alloc::vec![usize::MAX; vertex_count];
    let mut next_comp = 0usize;
    for start in 0..vertex_count {
        if comp[start] != usize::MAX {
            continue;
        }
        let mut stack = alloc::vec![start];
        comp[start] = next_comp;
        while let Some(v) = stack.pop() {
            for &n in &adjacency[v] {
                if comp[n] == usize::MAX {
                    comp[n] = next_comp;
                    stack.push(n);
                }
            }
        }
        next_comp += 1;
    }
    comp
}

/// The largest face cycle whose vertices all lie in component `comp`,
/// serving as that component's own outer boundary for polygon pinning.
fn component_boundary(mesh: &HalfEdgeMesh, comp: &[usize], comp_id: usize) -> Vec<usize> {
    let mut best: Option<Vec<usize>> = None;
    let mut best_key: Option<(usize, core::cmp::Reverse<usize>)> = None;
    for cycle in mesh.faces() {
        let vs: Vec<usize> = cycle.iter().map(|&h| mesh.origin(h).index()).collect();
        if vs.is_empty() || vs.iter().any(|&v| comp[v] != comp_id) {
            continue;
        }
        let min_vertex = vs.iter().copied().min().unwrap_or(usize::MAX);
        let key = (vs.len(), core::cmp::Reverse(min_vertex));
        let better = match best_key {
            Some(b) => key > b,
            None => true,
        };
        if better {
            best_key = Some(key);
            best = Some(vs);
        }
    }
    best.unwrap_or_default()
}

fn polygon_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..points.len() {
        let j = (i + 1) % points.len();
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    (sum / 2.0).abs()
}

fn orientation(p: Point, q: Point, r: Point) -> i8 {
    let val = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);
    if val.abs() < 1e-9 {
        0
    } else if val > 0.0 {
        1
    } else {
        2
    }
}

fn on_segment(p: Point, q: Point, r: Point) -> bool {
    q.x <= p.x.max(r.x) + 1e-9
        && q.x >= p.x.min(r.x) - 1e-9
        && q.y <= p.y.max(r.y) + 1e-9
        && q.y >= p.y.min(r.y) - 1e-9
}

fn segments_intersect(p1: Point, q1: Point, p2: Point, q2: Point) -> bool {
    let o1 = orientation(p1, q1, p2);
    let o2 = orientation(p1, q1, q2);
    let o3 = orientation(p2, q2, p1);
    let o4 = orientation(p2, q2, q1);

    if o1 != o2 && o3 != o4 {
        return true;
    }
    (o1 == 0 && on_segment(p1, p2, q1))
        || (o2 == 0 && on_segment(p1, q2, q1))
        || (o3 == 0 && on_segment(p2, p1, q2))
        || (o4 == 0 && on_segment(p2, q1, q2))
}

struct DrawnEdge {
    u: usize,
    v: usize,
    p0: Point,
    p1: Point,
}

fn shares_endpoint(a: &DrawnEdge, b: &DrawnEdge) -> bool {
    a.u == b.u || a.u == b.v || a.v == b.u || a.v == b.v
}

fn count_crossings(drawn: &[DrawnEdge]) -> usize {
    let mut count = 0;
    for i in 0..drawn.len() {
        for j in (i + 1)..drawn.len() {
            if shares_endpoint(&drawn[i], &drawn[j]) {
                continue;
            }
            if segments_intersect(drawn[i].p0, drawn[i].p1, drawn[j].p0, drawn[j].p1) {
                count += 1;
            }
        }
    }
    count
}

/// Lay out `mesh` with Tutte's barycentric method: outer-face vertices of
/// each connected component are pinned to a regular convex polygon, interior
/// vertices settle to the mean of their neighbours by relaxation. Components
/// are placed side by side with a horizontal gap (`spec.md` §4.I).
#[must_use]
pub fn planar_straight_line(mesh: &HalfEdgeMesh) -> LayoutResult {
    let vertex_count = mesh_vertex_count(mesh);
    let adj = adjacency(mesh, vertex_count);
    let comp = components(vertex_count, &adj);
    let comp_count = comp.iter().copied().max().map_or(0, |m| m + 1);

    let mut x = alloc::vec![0.0f64; vertex_count];
    let mut y = alloc::vec![0.0f64; vertex_count];
    let mut is_pinned = alloc::vec![false; vertex_count];

    let global_outer: HashSet<usize> = mesh
        .face(mesh.outer_face())
        .iter()
        .map(|&h| mesh.origin(h).index())
        .collect();

    let outer_comp_id: Option<usize> = global_outer.iter().next().map(|&v| comp[v]);
    for c in 0..comp_count {
        let boundary = if outer_comp_id == Some(c) {
            mesh.face(mesh.outer_face())
                .iter()
                .map(|&h| mesh.origin(h).index())
                .collect()
        } else {
            component_boundary(mesh, &comp, c)
        };
        let n = boundary.len().max(1);
        let perimeter = n as f64;
        let radius = (perimeter / (2.0 * core::f64::consts::PI)).max(1.0);
        for (i, &v) in boundary.iter().enumerate() {
            let theta = 2.0 * core::f64::consts::PI * (i as f64) / (n as f64);
            x[v] = radius * libm::cos(theta);
            y[v] = radius * libm::sin(theta);
            is_pinned[v] = true;
        }
    }

    for _ in 0..MAX_ITERATIONS {
        let mut max_delta = 0.0f64;
        for v in 0..vertex_count {
            if is_pinned[v] {
                continue;
            }
            let neigh = &adj[v];
            if neigh.is_empty() {
                continue;
            }
            let (sx, sy) = neigh
                .iter()
                .fold((0.0, 0.0), |(ax, ay), &n| (ax + x[n], ay + y[n]));
            let count = neigh.len() as f64;
            let (nx, ny) = (sx / count, sy / count);
            max_delta = max_delta.max((nx - x[v]).abs()).max((ny - y[v]).abs());
            x[v] = nx;
            y[v] = ny;
        }
        if max_delta < CONVERGENCE_EPS {
            break;
        }
    }

    // Side-by-side component placement: shift each component's x coordinates
    // so its bounding box starts after the previous component's, in
    // ascending component-id order (a deterministic discovery order).
    const GAP: f64 = 2.0;
    let mut running_max_x = f64::NEG_INFINITY;
    for c in 0..comp_count {
        let members: Vec<usize> = (0..vertex_count).filter(|&v| comp[v] == c).collect();
        if members.is_empty() {
            continue;
        }
        let min_x = members.iter().map(|&v| x[v]).fold(f64::INFINITY, f64::min);
        let max_x = members.iter().map(|&v| x[v]).fold(f64::NEG_INFINITY, f64::max);
        let offset = if running_max_x.is_finite() {
            running_max_x - min_x + GAP
        } else {
            0.0
        };
        for &v in &members {
            x[v] += offset;
        }
        running_max_x = max_x + offset;
    }

    let positions: Vec<Point> = (0..vertex_count).map(|v| Point { x: x[v], y: y[v] }).collect();

    let mut edge_paths = Vec::new();
    let mut seen_edges: HashSet<EdgeId> = HashSet::new();
    let mut drawn = Vec::new();
    for h in mesh.half_edges() {
        let e = h.edge();
        if !seen_edges.insert(e) {
            continue;
        }
        let u = mesh.origin(h).index();
        let v = mesh.origin(mesh.twin(h)).index();
        let points = if u == v {
            self_loop_quad(positions[u])
        } else {
            drawn.push(DrawnEdge {
                u,
                v,
                p0: positions[u],
                p1: positions[v],
            });
            alloc::vec![positions[u], positions[v]]
        };
        edge_paths.push(EdgePath { edge: e, points });
    }
    edge_paths.sort_by_key(|p| p.edge.index());

    let crossings = count_crossings(&drawn);
    let outer_points: Vec<Point> = global_outer.iter().map(|&v| positions[v]).collect();
    let area = polygon_area(&outer_points);

    LayoutResult {
        positions,
        edge_paths,
        stats: LayoutStats {
            bends: 0,
            area,
            crossings,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::mesh::build_half_edge_mesh;
    use crate::rotation::rotation_from_adjacency;

    fn triangle() -> crate::graph::Graph<()> {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let vs: Vec<_> = (0..3).map(|_| b.add_vertex(())).collect();
        b.add_edge(vs[0], vs[1], false).unwrap();
        b.add_edge(vs[1], vs[2], false).unwrap();
        b.add_edge(vs[2], vs[0], false).unwrap();
        b.build()
    }

    #[test]
    fn triangle_layout_has_zero_bends_and_no_crossings() {
        let g = triangle();
        let rot = rotation_from_adjacency(&g);
        let mesh = build_half_edge_mesh(&g, &rot);
        let layout = planar_straight_line(&mesh);
        assert_eq!(layout.stats.bends, 0);
        assert_eq!(layout.stats.crossings, 0);
        assert_eq!(layout.edge_paths().len(), 3);
        for path in layout.edge_paths() {
            assert_eq!(path.points.len(), 2);
        }
    }

    #[test]
    fn every_vertex_gets_a_position() {
        let g = triangle();
        let rot = rotation_from_adjacency(&g);
        let mesh = build_half_edge_mesh(&g, &rot);
        let layout = planar_straight_line(&mesh);
        assert_eq!(layout.positions().len(), 3);
    }
}
