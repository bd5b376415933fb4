//! Algorithms that operate on a built [`crate::graph::Graph`] or the
//! structures derived from it. One sub-module per algorithm family, mirroring
//! `petgraph`'s `algo::{bridges, articulation_points, maximum_flow, ...}`
//! layout.

pub mod bcc;
pub mod dfs;
pub mod dual;
pub mod flow;
pub mod layout;
pub mod ordering;
pub mod planarity;
pub mod spqr;
