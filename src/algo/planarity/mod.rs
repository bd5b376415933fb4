//! Component C: planarity testing.
//!
//! Orchestrates the two sub-modules — [`lr`]'s core left-right test and
//! [`witness`]'s Kuratowski-witness search — behind [`test_planarity`],
//! the single entry point `spec.md` §4 describes. Self-loops and parallel
//! edges never reach the core: they are set aside into an `excluded` set
//! before [`lr::test`] runs and spliced back into the resulting rotation
//! system (or reported as `ignored_self_loops`) afterwards, so the core
//! only ever has to reason about a simple graph.

mod lr;
mod witness;

pub use self::witness::{Witness, WitnessKind};

use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};

use crate::error::Error;
use crate::graph::{canonical_pair, EdgeId, Graph, VertexId};
use crate::rotation::RotationSystem;

/// What to do with self-loops when testing planarity. A self-loop never
/// affects whether a graph is planar, but it does occupy two consecutive
/// slots in the embedding's rotation at its vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfLoopPolicy {
    /// Keep self-loops in the returned embedding's rotation system.
    Keep,
    /// Strip self-loops out entirely; report them via
    /// [`PlanarityResult::Planar::ignored_self_loops`] instead.
    Ignore,
}

impl Default for SelfLoopPolicy {
    fn default() -> Self {
        SelfLoopPolicy::Keep
    }
}

/// Options controlling [`test_planarity`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanarityOptions {
    pub self_loops: SelfLoopPolicy,
    /// If `true`, directed edges are accepted and treated as undirected
    /// (`spec.md` Open Question 2). Defaults to `false`: directed input is
    /// rejected.
    pub force_undirected: bool,
}

/// The outcome of [`test_planarity`].
#[derive(Debug, Clone)]
pub enum PlanarityResult {
    /// `graph` admits a planar embedding.
    Planar {
        /// A rotation system consistent with some planar embedding.
        embedding: RotationSystem,
        /// Self-loop edges omitted from `embedding` under
        /// [`SelfLoopPolicy::Ignore`].
        ignored_self_loops: Vec<EdgeId>,
    },
    /// `graph` does not admit a planar embedding.
    NonPlanar { witness: Witness },
}

/// Test whether `graph` is planar, returning either a rotation system
/// consistent with a planar embedding or a Kuratowski witness proving it
/// is not.
///
/// # Errors
/// Returns [`Error::InvalidInput`] if `graph` carries directed edges and
/// `options.force_undirected` is `false`, or
/// [`Error::InternalInvariantViolation`] if the graph is nonplanar but the
/// bounded witness search could not find a certificate (see
/// [`witness::find`]'s doc comment for why that search is bounded).
pub fn test_planarity<L>(graph: &Graph<L>, options: PlanarityOptions) -> Result<PlanarityResult, Error> {
    graph.require_undirected(options.force_undirected)?;

    let mut excluded: HashSet<EdgeId> = HashSet::new();
    let mut self_loops: Vec<EdgeId> = Vec::new();
    let mut representative_of_pair: HashMap<(VertexId, VertexId), EdgeId> = HashMap::new();
    let mut duplicates_of: HashMap<EdgeId, Vec<EdgeId>> = HashMap::new();

    for e in graph.edge_ids() {
        let rec = graph.edge(e);
        if rec.is_self_loop() {
            self_loops.push(e);
            excluded.insert(e);
            continue;
        }
        let pair = canonical_pair(rec.u, rec.v);
        match representative_of_pair.get(&pair) {
            Some(&rep) => {
                excluded.insert(e);
                duplicates_of.entry(rep).or_insert_with(Vec::new).push(e);
            }
            None => {
                representative_of_pair.insert(pair, e);
            }
        }
    }

    match lr::test(graph, &excluded) {
        Some(rotation) => {
            let embedding = splice_excluded(
                graph,
                rotation,
                &self_loops,
                &duplicates_of,
                options.self_loops,
            );
            let ignored_self_loops = match options.self_loops {
                SelfLoopPolicy::Ignore => self_loops,
                SelfLoopPolicy::Keep => Vec::new(),
            };
            Ok(PlanarityResult::Planar {
                embedding,
                ignored_self_loops,
            })
        }
        None => match witness::find(graph) {
            Some(witness) => Ok(PlanarityResult::NonPlanar { witness }),
            None => Err(Error::InternalInvariantViolation(
                "bounded Kuratowski witness search found no certificate for a graph the left-right test rejected",
            )),
        },
    }
}

/// Splice the excluded self-loops and redundant parallel edges back into a
/// rotation system the core test produced for the "representative" simple
/// projection of `graph`.
fn splice_excluded<L>(
    graph: &Graph<L>,
    core: RotationSystem,
    self_loops: &[EdgeId],
    duplicates_of: &HashMap<EdgeId, Vec<EdgeId>>,
    self_loop_policy: SelfLoopPolicy,
) -> RotationSystem {
    let n = core.vertex_count();
    let mut rows: Vec<Vec<EdgeId>> = (0..n)
        .map(|i| {
            let v = VertexId(i as u32);
            let mut row = Vec::with_capacity(core.at(v).len());
            for &e in core.at(v) {
                row.push(e);
                if let Some(extra) = duplicates_of.get(&e) {
                    row.extend_from_slice(extra);
                }
            }
            row
        })
        .collect();

    if self_loop_policy == SelfLoopPolicy::Keep {
        for &e in self_loops {
            let rec = graph.edge(e);
            rows[rec.u.index()].push(e);
            rows[rec.u.index()].push(e);
        }
    }

    RotationSystem::from_rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    fn triangle() -> Graph<()> {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let vs: Vec<_> = (0..3).map(|_| b.add_vertex(())).collect();
        b.add_edge(vs[0], vs[1], false).unwrap();
        b.add_edge(vs[1], vs[2], false).unwrap();
        b.add_edge(vs[2], vs[0], false).unwrap();
        b.build()
    }

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
    fn triangle_is_planar() {
        let g = triangle();
        let result = test_planarity(&g, PlanarityOptions::default()).unwrap();
        match result {
            PlanarityResult::Planar { embedding, .. } => {
                assert!(embedding.each_edge_appears_twice(g.edge_count()));
            }
            PlanarityResult::NonPlanar { .. } => panic!("triangle is planar"),
        }
    }

    #[test]
    fn k5_is_nonplanar_with_full_witness() {
        let g = k5();
        let result = test_planarity(&g, PlanarityOptions::default()).unwrap();
        match result {
            PlanarityResult::Planar { .. } => panic!("K5 is nonplanar"),
            PlanarityResult::NonPlanar { witness } => {
                assert_eq!(witness.kind, WitnessKind::K5);
                assert_eq!(witness.edges.len(), 10);
            }
        }
    }

    #[test]
    fn k33_is_nonplanar_with_bipartite_witness() {
        let g = k33();
        let result = test_planarity(&g, PlanarityOptions::default()).unwrap();
        match result {
            PlanarityResult::Planar { .. } => panic!("K3,3 is nonplanar"),
            PlanarityResult::NonPlanar { witness } => {
                assert_eq!(witness.kind, WitnessKind::K33);
                assert_eq!(witness.edges.len(), 9);
            }
        }
    }

    #[test]
    fn self_loop_is_kept_by_default_as_two_adjacent_entries() {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let a = b.add_vertex(());
        let c = b.add_vertex(());
        b.add_edge(a, c, false).unwrap();
        let loop_edge = b.add_edge(a, a, false).unwrap();
        let g = b.build();

        let result = test_planarity(&g, PlanarityOptions::default()).unwrap();
        match result {
            PlanarityResult::Planar { embedding, ignored_self_loops } => {
                assert!(ignored_self_loops.is_empty());
                let row = embedding.at(a);
                let positions: Vec<usize> = row
                    .iter()
                    .enumerate()
                    .filter(|(_, &e)| e == loop_edge)
                    .map(|(i, _)| i)
                    .collect();
                assert_eq!(positions.len(), 2);
                assert_eq!(positions[1], positions[0] + 1);
            }
            PlanarityResult::NonPlanar { .. } => panic!("graph is planar"),
        }
    }

    #[test]
    fn self_loop_can_be_ignored() {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let a = b.add_vertex(());
        let c = b.add_vertex(());
        b.add_edge(a, c, false).unwrap();
        let loop_edge = b.add_edge(a, a, false).unwrap();
        let g = b.build();

        let options = PlanarityOptions {
            self_loops: SelfLoopPolicy::Ignore,
            force_undirected: false,
        };
        let result = test_planarity(&g, options).unwrap();
        match result {
            PlanarityResult::Planar { embedding, ignored_self_loops } => {
                assert_eq!(ignored_self_loops, alloc::vec![loop_edge]);
                assert!(!embedding.at(a).contains(&loop_edge));
            }
            PlanarityResult::NonPlanar { .. } => panic!("graph is planar"),
        }
    }

    #[test]
    fn parallel_edges_are_preserved_adjacent_to_their_representative() {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let a = b.add_vertex(());
        let c = b.add_vertex(());
        let e0 = b.add_edge(a, c, false).unwrap();
        let e1 = b.add_edge(a, c, false).unwrap();
        let g = b.build();

        let result = test_planarity(&g, PlanarityOptions::default()).unwrap();
        match result {
            PlanarityResult::Planar { embedding, .. } => {
                assert!(embedding.each_edge_appears_twice(g.edge_count()));
                let row_a = embedding.at(a);
                let pos0 = row_a.iter().position(|&e| e == e0).unwrap();
                let pos1 = row_a.iter().position(|&e| e == e1).unwrap();
                assert_eq!(pos1, pos0 + 1);
            }
            PlanarityResult::NonPlanar { .. } => panic!("two parallel edges are planar"),
        }
    }

    #[test]
    fn directed_edges_are_rejected_unless_forced() {
        let mut b: GraphBuilder<()> = GraphBuilder::new();
        let a = b.add_vertex(());
        let c = b.add_vertex(());
        b.add_edge(a, c, true).unwrap();
        let g = b.build();
        assert!(test_planarity(&g, PlanarityOptions::default()).is_err());
        let options = PlanarityOptions {
            self_loops: SelfLoopPolicy::Keep,
            force_undirected: true,
        };
        assert!(test_planarity(&g, options).is_ok());
    }
}
