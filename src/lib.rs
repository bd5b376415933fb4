//! **TopoLoom** is a graph-topology kernel.
//!
//! Given an abstract undirected [`Graph`], it produces:
//!
//! * a planarity verdict with either a rotation-system embedding or a
//!   Kuratowski-style nonplanarity witness ([`algo::planarity`]),
//! * a half-edge mesh with enumerated faces ([`mesh`]),
//! * biconnected-component and SPQR decompositions
//!   ([`algo::bcc`], [`algo::spqr`]),
//! * an st-numbering and bipolar orientation ([`algo::ordering`]),
//! * dual-graph-based edge routing through a fixed embedding
//!   ([`algo::dual`]),
//! * a min-cost-flow solver ([`algo::flow`]),
//! * straight-line and orthogonal layouts, including a planarization
//!   pipeline for nonplanar inputs ([`algo::layout`]).
//!
//! Every artifact produced by this crate is a plain value: a `Graph` is
//! built once by a [`GraphBuilder`] and never mutated again, and every
//! downstream structure (mesh, SPQR tree, flow result, layout) is derived
//! from it by a pure function. There is no internal concurrency, no shared
//! mutable state, and no global caches.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod algo;
pub mod error;
pub mod graph;
pub mod mesh;
pub mod rotation;

#[cfg(feature = "serde")]
pub mod dataset;

mod scored;
mod util;

pub use crate::error::{Error, LayoutError, Result};
pub use crate::graph::{EdgeId, EdgeRecord, Graph, GraphBuilder, VertexId};
pub use crate::mesh::{FaceId, HalfEdgeId, HalfEdgeMesh};
pub use crate::rotation::{rotation_from_adjacency, RotationSystem};

pub use crate::algo::bcc::{biconnected_components, build_bc_tree, BcTree, BccResult};
pub use crate::algo::dual::{build_dual, route_edge_fixed_embedding, Dual, RouteResult};
pub use crate::algo::flow::{min_cost_flow, FlowNetwork, FlowResult};
pub use crate::algo::layout::{
    orthogonal_layout, planar_straight_line, planarization_layout, LayoutResult,
    PlanarizationMode, PlanarizationResult,
};
pub use crate::algo::ordering::{
    bipolar_orientation, st_numbering, BipolarOrientation, StNumbering,
};
pub use crate::algo::planarity::{
    test_planarity, PlanarityOptions, PlanarityResult, SelfLoopPolicy, Witness, WitnessKind,
};
pub use crate::algo::spqr::{
    flip_skeleton, materialize_embedding, permute_parallel, spqr_decompose, spqr_decompose_all,
    spqr_decompose_safe, validate_spqr_tree, SpqrForest, SpqrNode, SpqrNodeId, SpqrTree,
};
