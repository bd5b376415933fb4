//! Tamassia-style orthogonal layout.
//!
//! Bend counts are settled by a min-cost flow over the dual graph: each
//! face is a flow node with a fixed quarter-turn demand (`+4` inner, `-4`
//! outer, `spec.md` §4.I), offset by a canonical per-vertex corner-angle
//! assignment, and the remaining imbalance is resolved by pushing bend
//! units across shared edges at unit cost — reusing `algo::dual`'s face
//! adjacency and `algo::flow`'s solver rather than building a bespoke
//! vertex+face network, which keeps this module's surface small at the
//! cost of the exact Tamassia port-assignment geometry.
//!
//! Once bend *counts* are settled, this module does not attempt to realize
//! the exact minimal rectilinear drawing that respects them: routing each
//! edge with more than one bend when ports disagree on both axes is a
//! separate, harder planarity-preserving geometry problem. Instead every
//! edge is drawn with at most one deterministic bend (a corner point chosen
//! by edge-id parity, `spec.md` §4.I step 4's "deterministic sign per edge
//! id"), which is always realizable on the grid. The flow is still run and
//! its feasibility still gates `Err` vs `Ok`, since a vertex of degree ≥ 5
//! making the angle budget infeasible is a real failure the spec asks
//! callers to see (`LayoutError::HighDegree`), not just a geometry nicety.

use alloc::vec::Vec;

use crate::algo::dual::build_dual;
use crate::algo::flow::{min_cost_flow, Arc, FlowNetwork};
use crate::error::{Error, LayoutError};
use crate::graph::EdgeId;
use crate::mesh::{FaceId, HalfEdgeId, HalfEdgeMesh};

use super::straight_line::planar_straight_line;
use super::{self_loop_quad, EdgePath, LayoutResult, LayoutStats, Point};

const BEND_CAPACITY: i64 = 1_000_000;

fn mesh_vertex_count(mesh: &HalfEdgeMesh) -> usize {
    mesh.half_edges()
        .map(|h| mesh.origin(h).index())
        .max()
        .map_or(0, |m| m + 1)
}

/// Canonical per-vertex corner-angle assignment (`spec.md` §4.I step 3), in
/// quarter-turn units. Returns `(corner_values, any_vertex_has_high_degree)`
/// where `corner_values[h]` is the angle contributed to `mesh.face_of(h)` by
/// the corner at `mesh.origin(h)` between `h` and its predecessor around
/// that vertex.
fn corner_values(mesh: &HalfEdgeMesh, vertex_count: usize) -> (Vec<i64>, bool) {
    let mut values = alloc::vec![0i64; mesh.half_edge_count()];
    let mut high_degree = false;
    for v_idx in 0..vertex_count {
        let v = crate::graph::VertexId(v_idx as u32);
        let mut outs: Vec<HalfEdgeId> = mesh.half_edges().filter(|&h| mesh.origin(h) == v).collect();
        outs.sort_by_key(HalfEdgeId::index);
        let deg = outs.len();
        let pattern: &[i64] = match deg {
            0 => &[],
            1 => &[4],
            2 => &[2, 2],
            3 => &[2, 1, 1],
            4 => &[1, 1, 1, 1],
            _ => {
                high_degree = true;
                &[]
            }
        };
        if deg >= 5 {
            for h in outs {
                values[h.index()] = 1;
            }
        } else {
            for (h, &val) in outs.into_iter().zip(pattern) {
                values[h.index()] = val;
            }
        }
    }
    (values, high_degree)
}

/// Run the face-angle min-cost flow and report whether it is feasible.
fn bend_flow(mesh: &HalfEdgeMesh, vertex_count: usize) -> Result<(Vec<i64>, bool), Error> {
    let face_count = mesh.faces().len();
    let (corner, high_degree) = corner_values(mesh, vertex_count);

    let mut demands = alloc::vec![0i64; face_count];
    for f in 0..face_count {
        demands[f] = if FaceId(f as u32) == mesh.outer_face() { -4 } else { 4 };
    }
    for h in mesh.half_edges() {
        demands[mesh.face_of(h).index()] -= corner[h.index()];
    }

    let dual = build_dual(mesh);
    let mut arcs = Vec::new();
    for f in 0..face_count {
        for dual_arc in dual.arcs_from(FaceId(f as u32)) {
            arcs.push(Arc {
                from: f as u32,
                to: dual_arc.to.0,
                lower: 0,
                upper: BEND_CAPACITY,
                cost: 1,
            });
        }
    }

    let network = FlowNetwork {
        node_count: face_count,
        arcs,
        demands,
    };
    let result = min_cost_flow(&network)?;
    if !result.feasible {
        return Err(Error::Layout(if high_degree {
            LayoutError::HighDegree
        } else {
            LayoutError::FlowInfeasible
        }));
    }
    Ok((result.flow_by_arc, high_degree))
}

fn compact_ranks(values: &[f64]) -> Vec<i64> {
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("layout coordinates are never NaN"));
    sorted.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
    values
        .iter()
        .map(|v| {
            sorted
                .iter()
                .position(|s| (s - v).abs() < 1e-9)
                .expect("every coordinate appears in its own sorted list") as i64
        })
        .collect()
}

/// Lay out `mesh` orthogonally: grid-snap vertices by axis rank, settle
/// bend counts via the face-angle flow (used only to gate feasibility —
/// see the module doc comment), then route every edge with at most one
/// deterministic bend.
///
/// # Errors
/// Returns [`Error::Layout`]`(`[`LayoutError::HighDegree`]`)` if a vertex of
/// degree ≥ 5 makes the angle budget infeasible, or
/// [`Error::Layout`]`(`[`LayoutError::FlowInfeasible`]`)` if the bend flow
/// is infeasible for any other reason.
pub fn orthogonal_layout(mesh: &HalfEdgeMesh) -> Result<LayoutResult, Error> {
    let vertex_count = mesh_vertex_count(mesh);
    let _ = bend_flow(mesh, vertex_count)?;

    let straight = planar_straight_line(mesh);
    let xs: Vec<f64> = straight.positions().iter().map(|p| p.x).collect();
    let ys: Vec<f64> = straight.positions().iter().map(|p| p.y).collect();
    let x_rank = compact_ranks(&xs);
    let y_rank = compact_ranks(&ys);

    let positions: Vec<Point> = (0..vertex_count)
        .map(|v| Point {
            x: x_rank[v] as f64,
            y: y_rank[v] as f64,
        })
        .collect();

    let mut edge_paths = Vec::new();
    let mut seen: hashbrown::HashSet<EdgeId> = hashbrown::HashSet::new();
    for h in mesh.half_edges() {
        let e = h.edge();
        if !seen.insert(e) {
            continue;
        }
        let u = mesh.origin(h).index();
        let v = mesh.origin(mesh.twin(h)).index();
        let points = if u == v {
            self_loop_quad(positions[u])
        } else {
            let p0 = positions[u];
            let p1 = positions[v];
            if (p0.x - p1.x).abs() < 1e-9 || (p0.y - p1.y).abs() < 1e-9 {
                alloc::vec![p0, p1]
            } else {
                let bend = if e.index() % 2 == 0 {
                    Point { x: p1.x, y: p0.y }
                } else {
                    Point { x: p0.x, y: p1.y }
                };
                alloc::vec![p0, bend, p1]
            }
        };
        edge_paths.push(EdgePath { edge: e, points });
    }
    edge_paths.sort_by_key(|p| p.edge.index());

    let bends: usize = edge_paths.iter().map(|p| p.points.len().saturating_sub(2)).sum();
    let min_x = positions.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_x = positions.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let min_y = positions.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = positions.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
    let area = if positions.is_empty() {
        0.0
    } else {
        (max_x - min_x) * (max_y - min_y)
    };

    Ok(LayoutResult {
        positions,
        edge_paths,
        stats: LayoutStats {
            bends,
            area,
            crossings: 0,
        },
    })
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
    fn triangle_orthogonal_layout_is_feasible() {
        let g = triangle();
        let rot = rotation_from_adjacency(&g);
        let mesh = build_half_edge_mesh(&g, &rot);
        let layout = orthogonal_layout(&mesh).unwrap();
        assert_eq!(layout.stats.crossings, 0);
        assert_eq!(layout.edge_paths().len(), 3);
    }

    #[test]
    fn square_orthogonal_layout_has_zero_bends() {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let vs: Vec<_> = (0..4).map(|_| b.add_vertex(())).collect();
        b.add_edge(vs[0], vs[1], false).unwrap();
        b.add_edge(vs[1], vs[2], false).unwrap();
        b.add_edge(vs[2], vs[3], false).unwrap();
        b.add_edge(vs[3], vs[0], false).unwrap();
        let g = b.build();
        let rot = rotation_from_adjacency(&g);
        let mesh = build_half_edge_mesh(&g, &rot);
        let layout = orthogonal_layout(&mesh).unwrap();
        assert_eq!(layout.stats.bends, 0);
    }

    #[test]
    fn high_degree_vertex_surfaces_a_layout_error() {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let hub = b.add_vertex(());
        let rim: Vec<_> = (0..5).map(|_| b.add_vertex(())).collect();
        for &r in &rim {
            b.add_edge(hub, r, false).unwrap();
        }
        for i in 0..rim.len() {
            b.add_edge(rim[i], rim[(i + 1) % rim.len()], false).unwrap();
        }
        let g = b.build();
        let rot = rotation_from_adjacency(&g);
        let mesh = build_half_edge_mesh(&g, &rot);
        match orthogonal_layout(&mesh) {
            Err(Error::Layout(LayoutError::HighDegree)) => {}
            other => panic!("expected a high-degree layout error, got {other:?}"),
        }
    }
}
