//! Component H: successive shortest augmenting paths min-cost flow, with
//! lower bounds, feasibility, and per-arc flows.
//!
//! Lower bounds are eliminated exactly as `spec.md` §4.H prescribes: shift
//! `f := f - lower` per arc, which turns every arc's capacity into
//! `upper - lower` and redistributes `demands` by the lower bound crossing
//! each node (`§4.H`). The shifted instance is then solved as an ordinary
//! supply/demand transportation problem against two auxiliary nodes, `S`
//! (collecting every positive-demand node) and `T` (every negative-demand
//! node), by repeatedly finding *a* shortest `S -> T` path in the residual
//! graph and pushing its bottleneck capacity.
//!
//! Each round's shortest path is found by Bellman-Ford (SPFA) rather than
//! Dijkstra-with-reduced-costs: residual arc costs can go negative after a
//! reversal, and recomputing from scratch every round sidesteps the
//! classic stale-potential correctness pitfall of reusing Johnson
//! potentials across rounds whose reachable set has changed. This mirrors
//! the crate's other "correct over asymptotically optimal" choices
//! (`algo::spqr`'s triconnectivity search, `algo::planarity::witness`'s
//! bounded Kuratowski search) — callers are responsible for pre-flight
//! size guards per `spec.md` §5.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::error::{Error, InfeasibleReason, InvalidInputReason};
use crate::util::{checked_add_i64, checked_mul_i64};

/// One arc of a [`FlowNetwork`]: `from -> to`, carrying flow in
/// `[lower, upper]` at `cost` per unit.
#[derive(Debug, Clone, Copy)]
pub struct Arc {
    pub from: u32,
    pub to: u32,
    pub lower: i64,
    pub upper: i64,
    pub cost: i64,
}

/// A min-cost-flow instance: node count, arcs, and per-node demands
/// (`spec.md` §3 — positive demand is a net supply at that node, negative a
/// net sink; `Σ demands == 0` is required for feasibility).
#[derive(Debug, Clone)]
pub struct FlowNetwork {
    pub node_count: usize,
    pub arcs: Vec<Arc>,
    pub demands: Vec<i64>,
}

/// The outcome of [`min_cost_flow`].
#[derive(Debug, Clone)]
pub struct FlowResult {
    /// `false` if demands are unbalanced, capacities are insufficient after
    /// the lower-bound shift, or a demanded node is unreachable.
    pub feasible: bool,
    /// Per-arc flow, in [`FlowNetwork::arcs`] order. Empty if `!feasible`.
    pub flow_by_arc: Vec<i64>,
    /// `Σ cost_a · flow_by_arc[a]`. `0` if `!feasible`.
    pub total_cost: i64,
    /// Final shortest-path distance labels for nodes `0..node_count`,
    /// usable as reduced-cost potentials; `0` for a node never reached by
    /// any augmenting round. Empty if `!feasible`.
    pub potentials: Vec<i64>,
}

#[derive(Debug, Clone, Copy)]
struct ResidualEdge {
    to: usize,
    cap: i64,
    cost: i64,
}

struct Residual {
    edges: Vec<ResidualEdge>,
    adj: Vec<Vec<usize>>,
}

impl Residual {
    fn new(node_count: usize) -> Self {
        Residual {
            edges: Vec::new(),
            adj: alloc::vec![Vec::new(); node_count],
        }
    }

    /// Add a forward/backward residual pair, returning the forward edge's
    /// index (always even; its backward twin is `index + 1`).
    fn add_edge(&mut self, u: usize, v: usize, cap: i64, cost: i64) -> usize {
        let idx = self.edges.len();
        self.edges.push(ResidualEdge { to: v, cap, cost });
        self.edges.push(ResidualEdge { to: u, cap: 0, cost: -cost });
        self.adj[u].push(idx);
        self.adj[v].push(idx + 1);
        idx
    }
}

const INF: i64 = i64::MAX / 4;

/// Bellman-Ford (SPFA) shortest path from `source` over edges with
/// positive residual capacity. Returns `(dist, prev_edge)`; `dist[v] ==
/// INF` means `v` is unreached.
fn spfa(residual: &Residual, source: usize, node_total: usize) -> (Vec<i64>, Vec<Option<usize>>) {
    let mut dist = alloc::vec![INF; node_total];
    let mut prev_edge: Vec<Option<usize>> = alloc::vec![None; node_total];
    let mut in_queue = alloc::vec![false; node_total];
    dist[source] = 0;
    let mut queue = VecDeque::new();
    queue.push_back(source);
    in_queue[source] = true;

    while let Some(u) = queue.pop_front() {
        in_queue[u] = false;
        let du = dist[u];
        for &e in &residual.adj[u] {
            let edge = residual.edges[e];
            if edge.cap <= 0 {
                continue;
            }
            let nd = du + edge.cost;
            if nd < dist[edge.to] {
                dist[edge.to] = nd;
                prev_edge[edge.to] = Some(e);
                if !in_queue[edge.to] {
                    in_queue[edge.to] = true;
                    queue.push_back(edge.to);
                }
            }
        }
    }

    (dist, prev_edge)
}

/// Solve `network` for a minimum-cost flow satisfying every node's demand
/// within its arcs' `[lower, upper]` bounds.
///
/// # Errors
/// Returns [`Error::InvalidInput`] if an arc references an out-of-range
/// node or has `lower > upper`, or [`Error::InfeasibleFlow`]`(`[`InfeasibleReason::ArithmeticOverflow`]`)`
/// if accumulating cost or demand would overflow. Ordinary infeasibility
/// (unbalanced demands, insufficient capacity, unreachable demand) is
/// reported via `FlowResult::feasible`, not an `Err`.
pub fn min_cost_flow(network: &FlowNetwork) -> Result<FlowResult, Error> {
    let n = network.node_count;
    if network.demands.len() != n {
        return Err(Error::InvalidInput(InvalidInputReason::EndpointOutOfRange));
    }
    for arc in &network.arcs {
        if arc.from as usize >= n || arc.to as usize >= n {
            return Err(Error::InvalidInput(InvalidInputReason::EndpointOutOfRange));
        }
        if arc.lower > arc.upper {
            return Err(Error::InvalidInput(InvalidInputReason::EndpointOutOfRange));
        }
    }

    let mut demand_sum = 0i64;
    for &d in &network.demands {
        demand_sum = checked_add_i64(demand_sum, d)?;
    }
    if demand_sum != 0 {
        return Ok(infeasible());
    }

    // Shift out lower bounds: f' = f - lower turns capacity into
    // `upper - lower` and pushes `lower` units of forced flow into the
    // node balance at both endpoints.
    let mut shifted_demand = network.demands.clone();
    for arc in &network.arcs {
        if arc.lower == 0 {
            continue;
        }
        shifted_demand[arc.from as usize] =
            checked_add_i64(shifted_demand[arc.from as usize], -arc.lower)?;
        shifted_demand[arc.to as usize] =
            checked_add_i64(shifted_demand[arc.to as usize], arc.lower)?;
    }

    let source = n;
    let sink = n + 1;
    let node_total = n + 2;
    let mut residual = Residual::new(node_total);
    let mut arc_edge_idx = Vec::with_capacity(network.arcs.len());
    for arc in &network.arcs {
        let cap = arc.upper - arc.lower;
        let idx = residual.add_edge(arc.from as usize, arc.to as usize, cap, arc.cost);
        arc_edge_idx.push(idx);
    }

    let mut total_supply = 0i64;
    for (v, &d) in shifted_demand.iter().enumerate() {
        if d > 0 {
            residual.add_edge(source, v, d, 0);
            total_supply = checked_add_i64(total_supply, d)?;
        } else if d < 0 {
            residual.add_edge(v, sink, -d, 0);
        }
    }

    let mut total_flow = 0i64;
    let mut total_cost = 0i64;
    let mut last_dist = alloc::vec![0i64; node_total];

    while total_flow < total_supply {
        let (dist, prev_edge) = spfa(&residual, source, node_total);
        if dist[sink] >= INF {
            break;
        }
        last_dist = dist.clone();

        let mut bottleneck = total_supply - total_flow;
        let mut v = sink;
        while v != source {
            let e = prev_edge[v].expect("prev_edge set for every node on the path");
            bottleneck = bottleneck.min(residual.edges[e].cap);
            v = residual.edges[e ^ 1].to;
        }

        let mut v = sink;
        while v != source {
            let e = prev_edge[v].expect("prev_edge set for every node on the path");
            residual.edges[e].cap -= bottleneck;
            residual.edges[e ^ 1].cap += bottleneck;
            v = residual.edges[e ^ 1].to;
        }

        total_flow = checked_add_i64(total_flow, bottleneck)?;
        let path_cost = checked_mul_i64(bottleneck, dist[sink])?;
        total_cost = checked_add_i64(total_cost, path_cost)?;
    }

    if total_flow != total_supply {
        return Ok(infeasible());
    }

    let mut flow_by_arc = Vec::with_capacity(network.arcs.len());
    for (arc, &edge_idx) in network.arcs.iter().zip(&arc_edge_idx) {
        let cap = arc.upper - arc.lower;
        let remaining = residual.edges[edge_idx].cap;
        let pushed = cap - remaining;
        flow_by_arc.push(arc.lower + pushed);
    }

    let potentials: Vec<i64> = last_dist[..n]
        .iter()
        .map(|&d| if d >= INF { 0 } else { d })
        .collect();

    Ok(FlowResult {
        feasible: true,
        flow_by_arc,
        total_cost,
        potentials,
    })
}

fn infeasible() -> FlowResult {
    FlowResult {
        feasible: false,
        flow_by_arc: Vec::new(),
        total_cost: 0,
        potentials: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_arc_meets_supply_and_demand() {
        let network = FlowNetwork {
            node_count: 2,
            arcs: alloc::vec![Arc { from: 0, to: 1, lower: 0, upper: 10, cost: 2 }],
            demands: alloc::vec![5, -5],
        };
        let result = min_cost_flow(&network).unwrap();
        assert!(result.feasible);
        assert_eq!(result.flow_by_arc, alloc::vec![5]);
        assert_eq!(result.total_cost, 10);
    }

    #[test]
    fn lower_bound_is_respected() {
        let network = FlowNetwork {
            node_count: 2,
            arcs: alloc::vec![Arc { from: 0, to: 1, lower: 1, upper: 10, cost: 2 }],
            demands: alloc::vec![3, -3],
        };
        let result = min_cost_flow(&network).unwrap();
        assert!(result.feasible);
        assert_eq!(result.flow_by_arc, alloc::vec![3]);
    }

    #[test]
    fn unbalanced_demands_are_infeasible() {
        let network = FlowNetwork {
            node_count: 2,
            arcs: alloc::vec![Arc { from: 0, to: 1, lower: 0, upper: 10, cost: 1 }],
            demands: alloc::vec![5, -4],
        };
        let result = min_cost_flow(&network).unwrap();
        assert!(!result.feasible);
    }

    #[test]
    fn insufficient_capacity_is_infeasible() {
        let network = FlowNetwork {
            node_count: 2,
            arcs: alloc::vec![Arc { from: 0, to: 1, lower: 0, upper: 2, cost: 1 }],
            demands: alloc::vec![5, -5],
        };
        let result = min_cost_flow(&network).unwrap();
        assert!(!result.feasible);
    }

    #[test]
    fn min_cost_path_is_chosen_among_two_parallel_routes() {
        // 0 -> 1 direct (cost 5) vs 0 -> 2 -> 1 (cost 1 + 1).
        let network = FlowNetwork {
            node_count: 3,
            arcs: alloc::vec![
                Arc { from: 0, to: 1, lower: 0, upper: 10, cost: 5 },
                Arc { from: 0, to: 2, lower: 0, upper: 10, cost: 1 },
                Arc { from: 2, to: 1, lower: 0, upper: 10, cost: 1 },
            ],
            demands: alloc::vec![4, -4, 0],
        };
        let result = min_cost_flow(&network).unwrap();
        assert!(result.feasible);
        assert_eq!(result.flow_by_arc[0], 0);
        assert_eq!(result.flow_by_arc[1], 4);
        assert_eq!(result.flow_by_arc[2], 4);
        assert_eq!(result.total_cost, 8);
    }

    #[test]
    fn conservation_holds_at_every_node() {
        let network = FlowNetwork {
            node_count: 4,
            arcs: alloc::vec![
                Arc { from: 0, to: 1, lower: 0, upper: 10, cost: 1 },
                Arc { from: 1, to: 2, lower: 0, upper: 10, cost: 1 },
                Arc { from: 0, to: 3, lower: 0, upper: 10, cost: 4 },
                Arc { from: 3, to: 2, lower: 0, upper: 10, cost: 1 },
            ],
            demands: alloc::vec![6, 0, -6, 0],
        };
        let result = min_cost_flow(&network).unwrap();
        assert!(result.feasible);
        let mut balance = alloc::vec![0i64; 4];
        for (arc, &f) in network.arcs.iter().zip(&result.flow_by_arc) {
            balance[arc.from as usize] += f;
            balance[arc.to as usize] -= f;
        }
        for (v, &b) in balance.iter().enumerate() {
            assert_eq!(b, network.demands[v], "conservation at node {v}");
        }
    }
}
